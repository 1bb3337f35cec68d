#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tempfile::TempDir;

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Empty home directory shared by every test run, so the default config
/// lookup never sees the developer's own `config.toml`.
fn home_dir() -> &'static Path {
    static HOME_DIR: OnceLock<TempDir> = OnceLock::new();
    HOME_DIR
        .get_or_init(|| tempfile::tempdir().expect("failed to create home dir for tests"))
        .path()
}

/// Create a `fav` command isolated from the caller's environment.
pub fn fav_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("fav"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env_remove("FAV_OUTPUT_FORMAT");
    cmd.env_remove("FAV_CONFIG");
    let home = home_dir();
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join(".config"));
    cmd.env("APPDATA", home.join("AppData"));
    cmd.env("NO_COLOR", "1");
    cmd
}
