use predicates::str::contains;

mod common;
use common::{ap, ap_in, temp_home};

#[test]
fn help_lists_all_subcommands() {
    ap().arg("--help")
        .assert()
        .success()
        .stdout(contains("setup"))
        .stdout(contains("login"))
        .stdout(contains("log-today"))
        .stdout(contains("log-week"))
        .stdout(contains("log-custom"))
        .stdout(contains("log-any"))
        .stdout(contains("debug"));
}

#[test]
fn log_custom_rejects_invalid_date_before_any_browser_work() {
    let home = temp_home();
    ap_in(&home)
        .args(["log-custom", "not-a-date"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn log_custom_rejects_invalid_time() {
    let home = temp_home();
    ap_in(&home)
        .args(["log-custom", "2025-09-01", "--in", "25:99"])
        .assert()
        .failure()
        .stderr(contains("Invalid time format"));
}

#[test]
fn log_custom_rejects_end_before_start() {
    let home = temp_home();
    ap_in(&home)
        .args(["log-custom", "2025-09-01", "--in", "17:00", "--out", "09:00"])
        .assert()
        .failure()
        .stderr(contains("Invalid work entry"));
}

#[test]
fn log_today_without_password_fails_before_launch() {
    let home = temp_home();
    ap_in(&home)
        .arg("log-today")
        .assert()
        .failure()
        .stderr(contains("AUTOPUNCH_PASSWORD"));
}

#[test]
fn setup_writes_the_config_file() {
    let home = temp_home();
    ap_in(&home).arg("setup").assert().success();

    let conf = home.path().join(".autopunch").join("autopunch.conf");
    let conf = if conf.exists() {
        conf
    } else {
        // windows layout
        home.path().join("autopunch").join("autopunch.conf")
    };
    let content = std::fs::read_to_string(conf).expect("config file written");
    assert!(content.contains("base_url"));
    assert!(content.contains("default_start"));
    // the password must never be persisted
    assert!(!content.to_lowercase().contains("password"));
}

#[test]
fn setup_refuses_to_overwrite_without_force() {
    let home = temp_home();
    ap_in(&home).arg("setup").assert().success();
    ap_in(&home)
        .arg("setup")
        .assert()
        .failure()
        .stderr(contains("--force"));
    ap_in(&home).args(["setup", "--force"]).assert().success();
}

#[test]
fn explicit_missing_config_path_is_an_error() {
    let home = temp_home();
    ap_in(&home)
        .args(["--config", "/nonexistent/autopunch.conf", "log-today"])
        .assert()
        .failure()
        .stderr(contains("configuration"));
}
