use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog;
use crate::platform;

/// Marker mysqld prints in front of deprecation warnings when running with
/// raised log verbosity.
const DEPRECATION_MARKER: &str = "deprecated";

const VALIDATE_ARGS: &[&str] = &["--validate-config", "--log-error-verbosity=2"];

#[derive(Debug, Clone)]
pub struct ScanContext {
    pub daemon_binary: String,
    pub override_path: PathBuf,
    pub timeout: Duration,
}

/// Catalog entries the daemon itself warns about when asked to validate its
/// configuration without serving. A missing binary, a timeout, or output
/// without the deprecation marker all yield the empty set: the advisory
/// path never blocks on a broken inspection.
pub fn detect_deprecated_options(ctx: &ScanContext) -> BTreeSet<String> {
    let output = match platform::run_command(&ctx.daemon_binary, VALIDATE_ARGS, ctx.timeout) {
        Ok(output) => output,
        Err(_) => return BTreeSet::new(),
    };
    // The exit code is deliberately ignored: mysqld exits non-zero for
    // unrelated configuration errors while still printing the warnings we
    // scan for.
    collect_deprecated_options(&output.stderr)
}

/// Catalog entries appearing in the service-manager override file. An
/// absent or unreadable file is the common case and yields the empty set.
pub fn detect_deprecated_arguments(ctx: &ScanContext) -> BTreeSet<String> {
    let Ok(text) = std::fs::read_to_string(&ctx.override_path) else {
        return BTreeSet::new();
    };
    collect_catalog_matches(&text)
}

fn collect_deprecated_options(stderr: &str) -> BTreeSet<String> {
    if !stderr.contains(DEPRECATION_MARKER) {
        return BTreeSet::new();
    }
    collect_catalog_matches(stderr)
}

fn collect_catalog_matches(text: &str) -> BTreeSet<String> {
    catalog::entries()
        .filter(|entry| text.contains(entry))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_plus_catalog_entry_is_a_finding() {
        let stderr = "2026-01-01T00:00:00Z 0 [Warning] [MY-011069] [Server] \
                      The syntax '--old' is deprecated and will be removed\n";
        let found = collect_deprecated_options(stderr);
        assert!(found.contains("--old"));
    }

    #[test]
    fn without_marker_no_options_are_reported() {
        // A catalog entry alone is not enough; only text the daemon flagged
        // as deprecated counts.
        let stderr = "[Server] unknown variable '--old'\n";
        assert!(collect_deprecated_options(stderr).is_empty());
    }

    #[test]
    fn empty_stderr_yields_empty_set() {
        assert!(collect_deprecated_options("").is_empty());
    }

    #[test]
    fn all_catalog_entries_in_output_are_collected() {
        let stderr = "deprecated: --old --new avoid_temporal_upgrade\n";
        let found = collect_deprecated_options(stderr);
        assert!(found.contains("--old"));
        assert!(found.contains("--new"));
        assert!(found.contains("avoid_temporal_upgrade"));
    }

    #[test]
    fn matching_is_substring_based_so_superstrings_also_match() {
        // Known limitation: '--ssl-ca' also trips the '--ssl' entry. The
        // detection strategy trades precision for simplicity on purpose.
        let found = collect_catalog_matches("ExecStart=/usr/sbin/mysqld --ssl-ca=/etc/pki/ca.pem\n");
        assert!(found.contains("--ssl"));
    }

    #[test]
    fn override_scan_needs_no_marker() {
        let found = collect_catalog_matches("[Service]\nExecStart=\nExecStart=/usr/sbin/mysqld --old\n");
        assert!(found.contains("--old"));
    }

    #[test]
    fn missing_override_file_yields_empty_set() {
        let ctx = ScanContext {
            daemon_binary: "mysqld".to_string(),
            override_path: PathBuf::from("/nonexistent/override.conf"),
            timeout: Duration::from_secs(1),
        };
        assert!(detect_deprecated_arguments(&ctx).is_empty());
    }

    #[test]
    fn missing_daemon_binary_yields_empty_set() {
        // Inspection failure is indistinguishable from a clean
        // configuration; that asymmetry is part of the contract.
        let ctx = ScanContext {
            daemon_binary: "/nonexistent/mysqld".to_string(),
            override_path: PathBuf::from("/nonexistent/override.conf"),
            timeout: Duration::from_secs(1),
        };
        assert!(detect_deprecated_options(&ctx).is_empty());
    }
}
