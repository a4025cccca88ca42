#![allow(dead_code)]
use assert_cmd::{cargo_bin_cmd, Command};
use tempfile::TempDir;

pub fn ap() -> Command {
    let mut cmd = cargo_bin_cmd!("autopunch");
    // never pick up the developer's real credentials or config
    cmd.env_remove("AUTOPUNCH_PASSWORD")
        .env_remove("AUTOPUNCH_EMAIL")
        .env_remove("AUTOPUNCH_BASE_URL")
        .env_remove("AUTOPUNCH_LOG_FILE");
    cmd
}

/// Command with HOME (and APPDATA) pointed at a fresh temp dir, so the config
/// file lands in an isolated ~/.autopunch.
pub fn ap_in(home: &TempDir) -> Command {
    let mut cmd = ap();
    cmd.env("HOME", home.path()).env("APPDATA", home.path());
    cmd
}

pub fn temp_home() -> TempDir {
    TempDir::new().expect("temp home")
}
