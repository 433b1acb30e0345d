//! Server configuration read from `HKF_*` environment variables.
//!
//! Every setting has a default; a value that cannot be parsed is reported
//! with `warn!` and replaced by its default.

use log::warn;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DB_PATH: &str = "membership.sqlite";
pub const DEFAULT_FONTS_DIR: &str = "./fonts";
pub const DEFAULT_ADMIN_EMAIL: &str = "contact@hamburgkannadamitraru.com";
pub const DEFAULT_JSON_LIMIT: usize = 10 * 1024 * 1024; // 10 MB

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub fonts_dir: PathBuf,
    pub admin_email: String,
    /// `None` disables the admin login.
    pub admin_password: Option<String>,
    pub open_browser: bool,
    pub json_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            fonts_dir: PathBuf::from(DEFAULT_FONTS_DIR),
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            admin_password: None,
            open_browser: false,
            json_limit: DEFAULT_JSON_LIMIT,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            host: text("HKF_HOST").unwrap_or(defaults.host),
            port: parsed(&lookup, "HKF_PORT", defaults.port),
            db_path: text("HKF_DB_PATH").map(PathBuf::from).unwrap_or(defaults.db_path),
            fonts_dir: text("HKF_FONTS_DIR").map(PathBuf::from).unwrap_or(defaults.fonts_dir),
            admin_email: text("HKF_ADMIN_EMAIL").unwrap_or(defaults.admin_email),
            admin_password: text("HKF_ADMIN_PASSWORD"),
            open_browser: flag(&lookup, "HKF_OPEN_BROWSER", defaults.open_browser),
            json_limit: parsed(&lookup, "HKF_JSON_LIMIT", defaults.json_limit),
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}", key, raw);
            default
        }),
    }
}

fn flag<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_lowercase()) {
        None => default,
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                warn!("Ignoring invalid {}={:?}", key, v);
                default
            }
        },
    }
}
