use std::time::Duration;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::advisor::{self, ReportPaths};
use crate::config::EffectiveConfig;
use crate::core::{Findings, Report};
use crate::scan::{self, ScanContext};

#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub timeout: Duration,
    pub show_progress: bool,
}

#[derive(Clone)]
pub struct Engine {
    opts: EngineOptions,
    cfg: EffectiveConfig,
}

impl Engine {
    pub fn new(opts: EngineOptions, cfg: EffectiveConfig) -> Self {
        Self { opts, cfg }
    }

    /// The one public operation: no package, no work — not even a spawned
    /// process. With the package present, both detectors run and their
    /// findings reduce to exactly one advisory.
    pub fn check(&self, package_present: bool) -> Option<Report> {
        if !package_present {
            return None;
        }

        use std::io::IsTerminal;
        let progress_enabled = self.opts.show_progress && std::io::stderr().is_terminal();
        let pb = if progress_enabled {
            let pb = indicatif::ProgressBar::new_spinner();
            pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());
            pb.set_message("validating daemon configuration...");
            pb.enable_steady_tick(Duration::from_millis(120));
            Some(pb)
        } else {
            None
        };

        let ctx = ScanContext {
            daemon_binary: self.cfg.daemon.binary.clone(),
            override_path: self.cfg.service.override_path.clone(),
            timeout: std::cmp::min(self.opts.timeout, Duration::from_secs(10)),
        };
        let findings = Findings {
            options: scan::detect_deprecated_options(&ctx),
            arguments: scan::detect_deprecated_arguments(&ctx),
        };

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        let advisory = advisor::compose(
            &findings,
            &ReportPaths {
                daemon_config_path: self.cfg.daemon.config_path.clone(),
                override_path: self.cfg.service.override_path.display().to_string(),
                package_name: self.cfg.package.name.clone(),
            },
        );

        let generated_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());

        Some(Report {
            schema_version: "1.0".to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            generated_at,
            advisory,
        })
    }
}
