//! Configuration loader
//!
//! Loads application configuration from environment variables and files.
//!
//! ## Loading Strategy
//! 1. A `.env` file in the working directory (if any) is loaded into the
//!    process environment
//! 2. The first config file found by [`probe_config_paths`] provides the base
//!    configuration; without one, built-in defaults are used
//! 3. `INVOICEDESK_*` environment variables override individual fields
//!
//! ## Environment Variables
//! - `INVOICEDESK_API_BASE_URL`: API root, e.g. `https://billing.example.com/api`
//! - `INVOICEDESK_API_TIMEOUT_SECONDS`: Per-request timeout in seconds
//! - `INVOICEDESK_API_MAX_ATTEMPTS`: Total attempts for GET requests
//! - `INVOICEDESK_STORAGE_BACKEND`: `file`, `keychain` or `memory`
//! - `INVOICEDESK_STORAGE_PATH`: Credential file path (`file` backend)
//! - `INVOICEDESK_KEYCHAIN_SERVICE`: Keychain service name (`keychain` backend)
//! - `INVOICEDESK_SYNC_DEBOUNCE_MS`: Debounce window in milliseconds
//! - `INVOICEDESK_SYNC_PAGE_SIZE`: Default page size for list screens
//! - `INVOICEDESK_LOG_FILTER`: Tracing filter directive
//! - `INVOICEDESK_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./invoicedesk.toml` or `./invoicedesk.json` (current working directory)
//! 2. `./config/invoicedesk.toml` or `./config/invoicedesk.json`
//! 3. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use invoicedesk_domain::{Config, DashboardError, Result, StorageBackend};

pub const ENV_API_BASE_URL: &str = "INVOICEDESK_API_BASE_URL";
pub const ENV_API_TIMEOUT_SECONDS: &str = "INVOICEDESK_API_TIMEOUT_SECONDS";
pub const ENV_API_MAX_ATTEMPTS: &str = "INVOICEDESK_API_MAX_ATTEMPTS";
pub const ENV_STORAGE_BACKEND: &str = "INVOICEDESK_STORAGE_BACKEND";
pub const ENV_STORAGE_PATH: &str = "INVOICEDESK_STORAGE_PATH";
pub const ENV_KEYCHAIN_SERVICE: &str = "INVOICEDESK_KEYCHAIN_SERVICE";
pub const ENV_SYNC_DEBOUNCE_MS: &str = "INVOICEDESK_SYNC_DEBOUNCE_MS";
pub const ENV_SYNC_PAGE_SIZE: &str = "INVOICEDESK_SYNC_PAGE_SIZE";
pub const ENV_LOG_FILTER: &str = "INVOICEDESK_LOG_FILTER";
pub const ENV_LOG_JSON: &str = "INVOICEDESK_LOG_JSON";

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `DashboardError::Config` if a probed file cannot be parsed or an
/// environment variable holds an invalid value.
pub fn load() -> Result<Config> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::debug!("No config file found, starting from defaults");
            Config::default()
        }
    };

    apply_env_overrides(&mut config)?;
    tracing::info!(
        base_url = %config.api.base_url,
        storage = %config.storage.backend,
        "Configuration loaded"
    );
    Ok(config)
}

/// Load configuration from defaults and environment variables only
///
/// Unset variables keep their default values.
///
/// # Errors
/// Returns `DashboardError::Config` if a variable holds an invalid value.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Overlay every `INVOICEDESK_*` variable that is set onto `config`.
///
/// # Errors
/// Returns `DashboardError::Config` naming the first invalid variable.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(base_url) = env_var(ENV_API_BASE_URL) {
        config.api.base_url = base_url;
    }
    if let Some(timeout) = env_parse(ENV_API_TIMEOUT_SECONDS)? {
        config.api.timeout_seconds = timeout;
    }
    if let Some(attempts) = env_parse(ENV_API_MAX_ATTEMPTS)? {
        config.api.max_attempts = attempts;
    }

    if let Some(backend) = env_var(ENV_STORAGE_BACKEND) {
        config.storage.backend = StorageBackend::from_str(&backend)?;
    }
    if let Some(path) = env_var(ENV_STORAGE_PATH) {
        config.storage.path = path;
    }
    if let Some(service) = env_var(ENV_KEYCHAIN_SERVICE) {
        config.storage.service_name = service;
    }

    if let Some(debounce) = env_parse(ENV_SYNC_DEBOUNCE_MS)? {
        config.sync.debounce_ms = debounce;
    }
    if let Some(page_size) = env_parse::<u64>(ENV_SYNC_PAGE_SIZE)? {
        if page_size == 0 {
            return Err(DashboardError::Config(format!("{ENV_SYNC_PAGE_SIZE} must be at least 1")));
        }
        config.sync.page_size = page_size;
    }

    if let Some(filter) = env_var(ENV_LOG_FILTER) {
        config.logging.filter = filter;
    }
    config.logging.json = env_bool(ENV_LOG_JSON, config.logging.json);

    Ok(())
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DashboardError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DashboardError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DashboardError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DashboardError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`). Missing
/// sections and fields take their defaults.
///
/// # Errors
/// Returns `DashboardError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DashboardError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DashboardError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(DashboardError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
        candidates.extend(candidates_in(&cwd.join("config")));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> [PathBuf; 2] {
    [dir.join("invoicedesk.toml"), dir.join("invoicedesk.json")]
}

/// Read a non-empty environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

/// Parse an environment variable, treating unset as `None`.
///
/// # Errors
/// Returns `DashboardError::Config` if the variable is set but unparseable.
fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_var(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| DashboardError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    env_var(key)
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 10] = [
        ENV_API_BASE_URL,
        ENV_API_TIMEOUT_SECONDS,
        ENV_API_MAX_ATTEMPTS,
        ENV_STORAGE_BACKEND,
        ENV_STORAGE_PATH,
        ENV_KEYCHAIN_SERVICE,
        ENV_SYNC_DEBOUNCE_MS,
        ENV_SYNC_PAGE_SIZE,
        ENV_LOG_FILTER,
        ENV_LOG_JSON,
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for value in ["1", "true", "yes", "on", "TRUE"] {
            std::env::set_var("INVOICEDESK_TEST_BOOL", value);
            assert!(env_bool("INVOICEDESK_TEST_BOOL", false), "{value}");
        }
        for value in ["0", "false", "no", "off"] {
            std::env::set_var("INVOICEDESK_TEST_BOOL", value);
            assert!(!env_bool("INVOICEDESK_TEST_BOOL", true), "{value}");
        }

        std::env::remove_var("INVOICEDESK_TEST_BOOL");
        assert!(env_bool("INVOICEDESK_TEST_BOOL", true));
        assert!(!env_bool("INVOICEDESK_TEST_BOOL", false));
    }

    #[test]
    fn test_load_from_env_without_vars_is_default() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        assert_eq!(load_from_env().unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_API_BASE_URL, "https://billing.example.com/api");
        std::env::set_var(ENV_API_TIMEOUT_SECONDS, "5");
        std::env::set_var(ENV_API_MAX_ATTEMPTS, "4");
        std::env::set_var(ENV_STORAGE_BACKEND, "Keychain");
        std::env::set_var(ENV_STORAGE_PATH, "/tmp/tokens.json");
        std::env::set_var(ENV_KEYCHAIN_SERVICE, "invoicedesk-staging");
        std::env::set_var(ENV_SYNC_DEBOUNCE_MS, "250");
        std::env::set_var(ENV_SYNC_PAGE_SIZE, "25");
        std::env::set_var(ENV_LOG_FILTER, "invoicedesk_core=debug");
        std::env::set_var(ENV_LOG_JSON, "yes");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.api.base_url, "https://billing.example.com/api");
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.api.max_attempts, 4);
        assert_eq!(config.storage.backend, StorageBackend::Keychain);
        assert_eq!(config.storage.path, "/tmp/tokens.json");
        assert_eq!(config.storage.service_name, "invoicedesk-staging");
        assert_eq!(config.sync.debounce_ms, 250);
        assert_eq!(config.sync.page_size, 25);
        assert_eq!(config.logging.filter, "invoicedesk_core=debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_numbers_are_config_errors() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_SYNC_DEBOUNCE_MS, "soon");
        let err = load_from_env().unwrap_err();
        clear_env();
        assert!(matches!(err, DashboardError::Config(ref msg) if msg.contains(ENV_SYNC_DEBOUNCE_MS)));

        std::env::set_var(ENV_SYNC_PAGE_SIZE, "0");
        let err = load_from_env().unwrap_err();
        clear_env();
        assert!(matches!(err, DashboardError::Config(_)));
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var(ENV_STORAGE_BACKEND, "redis");
        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let mut config = parse_config(
            r#"{ "api": { "base_url": "https://file.example.com" }, "sync": { "page_size": 50 } }"#,
            Path::new("invoicedesk.json"),
        )
        .unwrap();

        std::env::set_var(ENV_API_BASE_URL, "https://env.example.com");
        let result = apply_env_overrides(&mut config);
        clear_env();

        result.unwrap();
        assert_eq!(config.api.base_url, "https://env.example.com");
        assert_eq!(config.sync.page_size, 50);
    }

    #[test]
    fn test_parse_config_rejects_unknown_extension() {
        let result = parse_config("base_url: x", Path::new("invoicedesk.yaml"));
        assert!(matches!(result, Err(DashboardError::Config(ref msg)) if msg.contains("yaml")));
    }
}
