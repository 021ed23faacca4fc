/// Options accepted by MySQL 8.0 that MySQL 8.4 removes or rejects.
/// Keep in sync with the upstream release notes; entries are matched as
/// literal substrings of diagnostic output and of the service override
/// file.
pub const REMOVED_OPTIONS: &[&str] = &[
    "--avoid-temporal-upgrade",
    "avoid_temporal_upgrade",
    "--show-old-temporals",
    "show_old_temporals",
    "--old",
    "--new",
    "--default-authentication-plugin",
    "default_authentication_plugin",
    "--no-dd-upgrade",
    "--language",
    "--ssl",
    "--admin-ssl",
    "--character-set-client-handshake",
    "--old-style-user-limits",
];

pub fn entries() -> impl Iterator<Item = &'static str> {
    REMOVED_OPTIONS.iter().copied()
}
