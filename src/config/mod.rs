use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root URL of the HR portal, e.g. https://hr.example.com
    pub base_url: String,
    /// Account email. The password is never stored here; set AUTOPUNCH_PASSWORD.
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_login_path")]
    pub login_path: String,
    #[serde(default = "default_timesheet_path")]
    pub timesheet_path: String,
    #[serde(default = "default_start")]
    pub default_start: String,
    #[serde(default = "default_end")]
    pub default_end: String,
    #[serde(default = "default_break_min")]
    pub default_break_min: u32,
    #[serde(default = "default_nav_timeout")]
    pub nav_timeout_secs: u64,
    #[serde(default = "default_op_timeout")]
    pub op_timeout_secs: u64,
    /// Post-action settle delay, used only where the vendor UI gives nothing to poll.
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_nav_retries")]
    pub nav_retries: u32,
}

fn default_login_path() -> String {
    "/login".to_string()
}
fn default_timesheet_path() -> String {
    "/attendance".to_string()
}
fn default_start() -> String {
    "09:00".to_string()
}
fn default_end() -> String {
    "17:30".to_string()
}
fn default_break_min() -> u32 {
    60
}
fn default_nav_timeout() -> u64 {
    30
}
fn default_op_timeout() -> u64 {
    10
}
fn default_settle_ms() -> u64 {
    800
}
fn default_nav_retries() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://hr.example.com".to_string(),
            email: String::new(),
            login_path: default_login_path(),
            timesheet_path: default_timesheet_path(),
            default_start: default_start(),
            default_end: default_end(),
            default_break_min: default_break_min(),
            nav_timeout_secs: default_nav_timeout(),
            op_timeout_secs: default_op_timeout(),
            settle_ms: default_settle_ms(),
            nav_retries: default_nav_retries(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("autopunch")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".autopunch")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("autopunch.conf")
    }

    /// Load configuration from file (or the override path), or defaults if not found
    pub fn load(override_path: Option<&Path>) -> AppResult<Self> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => Self::config_file(),
        };

        if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|_| AppError::ConfigLoad(path.display().to_string()))?;
            serde_yaml::from_str(&content)
                .map_err(|e| AppError::Config(format!("{}: {e}", path.display())))
        } else if override_path.is_some() {
            // An explicit --config pointing nowhere is a user error
            Err(AppError::ConfigLoad(path.display().to_string()))
        } else {
            Ok(Config::default())
        }
    }

    /// Environment overrides beat whatever the file said.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("AUTOPUNCH_BASE_URL") {
            self.base_url = v;
        }
        if let Ok(v) = env::var("AUTOPUNCH_EMAIL") {
            self.email = v;
        }
        if let Ok(v) = env::var("AUTOPUNCH_DEFAULT_START") {
            self.default_start = v;
        }
        if let Ok(v) = env::var("AUTOPUNCH_DEFAULT_END") {
            self.default_end = v;
        }
        if let Ok(v) = env::var("AUTOPUNCH_NAV_TIMEOUT") {
            if let Ok(n) = v.parse() {
                self.nav_timeout_secs = n;
            }
        }
        if let Ok(v) = env::var("AUTOPUNCH_OP_TIMEOUT") {
            if let Ok(n) = v.parse() {
                self.op_timeout_secs = n;
            }
        }
    }

    /// The password never touches the config file.
    pub fn password() -> AppResult<String> {
        env::var("AUTOPUNCH_PASSWORD")
            .map_err(|_| AppError::Config("AUTOPUNCH_PASSWORD is not set".to_string()))
    }

    pub fn login_url(&self) -> String {
        join_url(&self.base_url, &self.login_path)
    }

    pub fn timesheet_url(&self) -> String {
        join_url(&self.base_url, &self.timesheet_path)
    }

    /// Write the default configuration file. Refuses to overwrite unless forced.
    pub fn write_default(force: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        let path = Self::config_file();
        if path.exists() && !force {
            return Err(AppError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }

        let yaml = serde_yaml::to_string(&Config::default())
            .map_err(|_| AppError::ConfigSave(path.display().to_string()))?;
        let mut file =
            fs::File::create(&path).map_err(|_| AppError::ConfigSave(path.display().to_string()))?;
        file.write_all(yaml.as_bytes())
            .map_err(|_| AppError::ConfigSave(path.display().to_string()))?;

        Ok(path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
