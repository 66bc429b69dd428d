use std::path::PathBuf;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_COPART_LOT_DETAILS_URL: &str = "https://www.copart.com/public/data/lotdetails/solr/";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every setting has a default, so an empty environment yields a usable
/// development config. Kept separate from the real environment so tests can
/// drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        let value = raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let non_empty = |var: &str, default: &str| -> Result<String, ConfigError> {
        let raw = or_default(var, default);
        if raw.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(raw)
    };

    let env = parse_environment(&or_default("LOTPROBE_ENV", "development"))?;
    let log_level = or_default("LOTPROBE_LOG_LEVEL", "info");

    let cookie_dir = PathBuf::from(or_default("LOTPROBE_COOKIE_DIR", "."));
    let cookie_file_base = non_empty("LOTPROBE_COOKIE_FILE_BASE", "cookies_file.txt")?;

    let node_path = PathBuf::from(non_empty("LOTPROBE_NODE_PATH", "node")?);
    let minter_dir = PathBuf::from(or_default("LOTPROBE_MINTER_DIR", "."));
    let iaai_minter_script = non_empty("LOTPROBE_IAAI_MINTER_SCRIPT", "cookie.js")?;
    let copart_minter_script = non_empty("LOTPROBE_COPART_MINTER_SCRIPT", "cookieCopart.js")?;
    let minter_timeout_secs = parse_u64("LOTPROBE_MINTER_TIMEOUT_SECS", "120")?;
    let request_timeout_secs = parse_u64("LOTPROBE_REQUEST_TIMEOUT_SECS", "30")?;
    let connect_timeout_secs = parse_u64("LOTPROBE_CONNECT_TIMEOUT_SECS", "10")?;

    let proxy_url = lookup("LOTPROBE_PROXY_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let copart_lot_details_url = non_empty(
        "LOTPROBE_COPART_LOT_DETAILS_URL",
        DEFAULT_COPART_LOT_DETAILS_URL,
    )?;

    Ok(AppConfig {
        env,
        log_level,
        cookie_dir,
        cookie_file_base,
        node_path,
        minter_dir,
        iaai_minter_script,
        copart_minter_script,
        minter_timeout_secs,
        request_timeout_secs,
        connect_timeout_secs,
        proxy_url,
        copart_lot_details_url,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LOTPROBE_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
