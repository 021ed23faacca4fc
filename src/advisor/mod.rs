use crate::core::{Advisory, ExternalLink, Findings, RelatedResource, Remediation, Severity};

const SERVER_INSTALLED_TITLE: &str = "Further action to upgrade MySQL might be needed";

const INVALID_CONFIG_TITLE: &str = "MySQL is using configuration that will be invalid after upgrade";

const SERVER_INSTALLED_SUMMARY: &str = "MySQL server component will be upgraded. \
     Since RHEL-10 includes MySQL server 8.4 by default, which is incompatible with 8.0 \
     included in RHEL-9, it is necessary to proceed with additional steps for the complete \
     upgrade of the MySQL data.";

const INVALID_CONFIG_SUMMARY_SUFFIX: &str = "The options listed in the remediation are no \
     longer valid in the new MySQL version. The mysqld service will refuse to start after the \
     upgrade until they are removed from its configuration.";

const SERVER_INSTALLED_HINT: &str = "Back up your data before proceeding with the upgrade \
     and follow steps in the documentation section \"Migrating to a RHEL 10 version of MySQL\" \
     after the upgrade.";

const REMOVE_OPTIONS_HINT_HEADER: &str = "Remove the following options from the places they \
     are configured in:";

const MIGRATION_LINK_TITLE: &str = "Migrating to a RHEL 10 version of MySQL";
const MIGRATION_LINK_URL: &str = "https://access.redhat.com/articles/7099234";

const GROUP_SERVICES: &str = "services";

/// Paths and names woven into the report text; they come from the effective
/// configuration so tests can redirect them.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub daemon_config_path: String,
    pub override_path: String,
    pub package_name: String,
}

/// Reduce the two finding sets to exactly one advisory. Empty findings
/// produce the plain upgrade advisory; anything else produces the
/// invalid-configuration warning with an origin-labeled enumeration in the
/// remediation hint. Output is byte-identical for identical inputs.
pub fn compose(findings: &Findings, paths: &ReportPaths) -> Advisory {
    let (title, summary, hint) = if findings.is_empty() {
        (
            SERVER_INSTALLED_TITLE,
            SERVER_INSTALLED_SUMMARY.to_string(),
            SERVER_INSTALLED_HINT.to_string(),
        )
    } else {
        (
            INVALID_CONFIG_TITLE,
            format!("{SERVER_INSTALLED_SUMMARY}\n\n{INVALID_CONFIG_SUMMARY_SUFFIX}"),
            removal_hint(findings, paths),
        )
    };

    Advisory {
        title: title.to_string(),
        summary,
        severity: Severity::Medium,
        groups: vec![GROUP_SERVICES.to_string()],
        external_links: vec![ExternalLink {
            title: MIGRATION_LINK_TITLE.to_string(),
            url: MIGRATION_LINK_URL.to_string(),
        }],
        related_resources: vec![RelatedResource {
            kind: "package".to_string(),
            name: paths.package_name.clone(),
        }],
        remediation: Remediation { hint },
    }
}

fn removal_hint(findings: &Findings, paths: &ReportPaths) -> String {
    use std::fmt::Write as _;

    let mut hint = format!("{SERVER_INSTALLED_HINT}\n{REMOVE_OPTIONS_HINT_HEADER}");

    // BTreeSet iteration keeps the enumeration canonical. An entry the
    // daemon already reported is not repeated under its override origin;
    // the configuration file is where it gets fixed.
    for option in &findings.options {
        let _ = write!(
            hint,
            "\n  - {option} (in configuration file {})",
            paths.daemon_config_path
        );
    }
    for argument in &findings.arguments {
        if findings.options.contains(argument) {
            continue;
        }
        let _ = write!(
            hint,
            "\n  - {argument} (in service override {})",
            paths.override_path
        );
    }

    hint
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn paths() -> ReportPaths {
        ReportPaths {
            daemon_config_path: "/etc/my.cnf".to_string(),
            override_path: "/etc/systemd/system/mysqld.service.d/override.conf".to_string(),
            package_name: "mysql-server".to_string(),
        }
    }

    fn set(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_findings_compose_the_plain_advisory() {
        let advisory = compose(&Findings::default(), &paths());
        assert_eq!(advisory.title, "Further action to upgrade MySQL might be needed");
        assert_eq!(advisory.severity, Severity::Medium);
        assert_eq!(advisory.groups, vec!["services".to_string()]);
        assert_eq!(advisory.external_links.len(), 1);
        assert_eq!(advisory.related_resources[0].name, "mysql-server");
        assert!(!advisory.remediation.hint.contains("\n  - "));
    }

    #[test]
    fn any_finding_composes_the_invalid_config_advisory() {
        let findings = Findings {
            options: set(&["--old"]),
            arguments: BTreeSet::new(),
        };
        let advisory = compose(&findings, &paths());
        assert_eq!(
            advisory.title,
            "MySQL is using configuration that will be invalid after upgrade"
        );
        assert!(advisory.summary.contains("refuse to start"));
        assert!(
            advisory
                .remediation
                .hint
                .contains("  - --old (in configuration file /etc/my.cnf)")
        );
    }

    #[test]
    fn arguments_alone_also_trigger_the_invalid_config_advisory() {
        let findings = Findings {
            options: BTreeSet::new(),
            arguments: set(&["--ssl"]),
        };
        let advisory = compose(&findings, &paths());
        assert_eq!(
            advisory.title,
            "MySQL is using configuration that will be invalid after upgrade"
        );
        assert!(advisory.remediation.hint.contains(
            "  - --ssl (in service override /etc/systemd/system/mysqld.service.d/override.conf)"
        ));
    }

    #[test]
    fn hint_enumerates_every_finding_exactly_once_with_its_origin() {
        let findings = Findings {
            options: set(&["--old", "--new"]),
            arguments: set(&["--ssl", "--admin-ssl"]),
        };
        let advisory = compose(&findings, &paths());
        let hint = &advisory.remediation.hint;
        for entry in ["--old", "--new", "--ssl", "--admin-ssl"] {
            assert_eq!(
                hint.matches(&format!("  - {entry} (")).count(),
                1,
                "{entry} should be listed exactly once"
            );
        }
        let new_pos = hint.find("  - --new (in configuration file").expect("--new");
        let old_pos = hint.find("  - --old (in configuration file").expect("--old");
        let ssl_pos = hint.find("  - --ssl (in service override").expect("--ssl");
        assert!(new_pos < old_pos, "options sort lexicographically");
        assert!(old_pos < ssl_pos, "options come before arguments");
    }

    #[test]
    fn entry_found_by_both_detectors_is_listed_under_the_config_file_only() {
        let findings = Findings {
            options: set(&["--old"]),
            arguments: set(&["--old", "--ssl"]),
        };
        let advisory = compose(&findings, &paths());
        let hint = &advisory.remediation.hint;
        assert_eq!(hint.matches("  - --old (").count(), 1);
        assert!(hint.contains("  - --old (in configuration file"));
        assert!(hint.contains("  - --ssl (in service override"));
    }

    #[test]
    fn composing_twice_is_byte_identical() {
        let findings = Findings {
            options: set(&["--old"]),
            arguments: set(&["--ssl"]),
        };
        let first = serde_json::to_string(&compose(&findings, &paths())).expect("serialize");
        let second = serde_json::to_string(&compose(&findings, &paths())).expect("serialize");
        assert_eq!(first, second);
    }
}
