use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Every variable is optional; the lookup is injectable so tests can use a
/// plain `HashMap` instead of mutating the process environment.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Set-but-blank counts as unset for optional string settings.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("ECOSCAN_ENV", "development"))?;
    let log_level = or_default("ECOSCAN_LOG_LEVEL", "info");

    let api_base_url = or_default("ECOSCAN_API_BASE_URL", "http://localhost:8080/api");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "ECOSCAN_API_BASE_URL".to_string(),
            reason: format!("expected an http(s) URL, got \"{api_base_url}\""),
        });
    }
    let api_base_url = api_base_url.trim_end_matches('/').to_string();

    let api_token = optional("ECOSCAN_API_TOKEN");
    let user_email = optional("ECOSCAN_USER_EMAIL");

    let request_timeout_secs = parse_u64("ECOSCAN_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("ECOSCAN_USER_AGENT", "ecoscan/0.1 (product-scoring)");
    let max_retries = parse_u32("ECOSCAN_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("ECOSCAN_RETRY_BACKOFF_BASE_MS", "500")?;

    let history_path = PathBuf::from(or_default("ECOSCAN_HISTORY_PATH", "./data/history.json"));
    let keywords_path = optional("ECOSCAN_KEYWORDS_PATH").map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        api_base_url,
        api_token,
        user_email,
        request_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_ms,
        history_path,
        keywords_path,
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
            var: "ECOSCAN_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
