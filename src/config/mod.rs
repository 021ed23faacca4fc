use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub package: PackageConfig,
    pub daemon: DaemonConfig,
    pub service: ServiceConfig,
    pub ui: UiConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PackageConfig {
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaemonConfig {
    pub binary: String,
    pub config_path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    pub override_path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            package: PackageConfig {
                name: "mysql-server".to_string(),
            },
            daemon: DaemonConfig {
                binary: "mysqld".to_string(),
                config_path: "/etc/my.cnf".to_string(),
            },
            service: ServiceConfig {
                override_path: PathBuf::from("/etc/systemd/system/mysqld.service.d/override.conf"),
            },
            ui: UiConfig { color: true },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    package: Option<RawPackageConfig>,
    daemon: Option<RawDaemonConfig>,
    service: Option<RawServiceConfig>,
    ui: Option<RawUiConfig>,
}

#[derive(Debug, Deserialize)]
struct RawPackageConfig {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDaemonConfig {
    binary: Option<String>,
    config_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawServiceConfig {
    override_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("/etc/mysql-preflight/config.toml")
}

pub fn load(config_path: Option<&Path>) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(default_config_path);

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s).context("failed to parse config file (TOML)")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(package) = raw.package {
        if let Some(name) = package.name {
            cfg.package.name = name;
        }
    }

    if let Some(daemon) = raw.daemon {
        if let Some(binary) = daemon.binary {
            cfg.daemon.binary = binary;
        }
        if let Some(config_path) = daemon.config_path {
            cfg.daemon.config_path = config_path;
        }
    }

    if let Some(service) = raw.service {
        if let Some(override_path) = service.override_path {
            cfg.service.override_path = override_path;
        }
    }

    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("MYSQL_PREFLIGHT_PACKAGE_NAME") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.package.name = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("MYSQL_PREFLIGHT_DAEMON_BINARY") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.daemon.binary = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("MYSQL_PREFLIGHT_DAEMON_CONFIG_PATH") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.daemon.config_path = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("MYSQL_PREFLIGHT_SERVICE_OVERRIDE_PATH") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.service.override_path = PathBuf::from(v);
        }
    }
    if let Ok(v) = std::env::var("MYSQL_PREFLIGHT_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "MYSQL_PREFLIGHT_UI_COLOR")?;
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_stock_install() {
        let cfg = EffectiveConfig::default();
        assert_eq!(cfg.package.name, "mysql-server");
        assert_eq!(cfg.daemon.binary, "mysqld");
        assert_eq!(cfg.daemon.config_path, "/etc/my.cnf");
        assert_eq!(
            cfg.service.override_path,
            PathBuf::from("/etc/systemd/system/mysqld.service.d/override.conf")
        );
    }

    #[test]
    fn raw_config_overrides_only_what_it_names() {
        let mut cfg = EffectiveConfig::default();
        let raw: RawConfig = toml::from_str(
            r#"
[daemon]
binary = "/opt/mysql/bin/mysqld"
"#,
        )
        .expect("parse");
        apply_raw_config(&mut cfg, raw);
        assert_eq!(cfg.daemon.binary, "/opt/mysql/bin/mysqld");
        assert_eq!(cfg.daemon.config_path, "/etc/my.cnf");
        assert_eq!(cfg.package.name, "mysql-server");
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("1").expect("1"));
        assert!(parse_bool("Yes").expect("yes"));
        assert!(!parse_bool("off").expect("off"));
        assert!(parse_bool("maybe").is_err());
    }
}
