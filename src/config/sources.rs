use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::{Path, PathBuf};

const CONFIG_ENV_VAR: &str = "TRANSFORMBOX_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/transformbox.toml";
const ENV_PREFIX: &str = "TRANSFORMBOX";
const ENV_SEPARATOR: &str = "__";

/// Path of the TOML file: `TRANSFORMBOX_CONFIG` or the default location
pub fn config_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration with priority (lowest first):
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if it exists)
/// 3. `.env` file (via dotenvy)
/// 4. System environment variables
pub fn load() -> Result<Config, ConfigError> {
    load_from_sources(config_path())
}

/// Load from a specific file plus `.env` and environment overrides
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    load_with_dotenv(config_path, None)
}

/// `dotenv_path` of `None` searches the working directory and its parents.
/// Variables already set in the process are never replaced.
fn load_with_dotenv(config_path: PathBuf, dotenv_path: Option<&Path>) -> Result<Config, ConfigError> {
    let loaded = match dotenv_path {
        Some(path) => dotenvy::from_path(path).map(|_| path.to_path_buf()),
        None => dotenvy::dotenv(),
    };
    if let Ok(path) = loaded {
        tracing::debug!("Loaded environment from: {}", path.display());
    }

    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // TRANSFORMBOX__FETCH__REQUEST_TIMEOUT_MS -> fetch.request_timeout_ms
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    builder.build()?.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(config.transform.transformer, "identity");
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[server]
bind_addr = "127.0.0.1:9000"
max_event_bytes = "256KB"

[fetch]
connect_timeout_ms = 500
request_timeout_ms = 2000
max_redirects = 3
user_agent = "test-agent/1.0"

[transform]
transformer = "uppercase"
part_size = 1048576

[telemetry]
log_filter = "transformbox=debug"
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.max_event_bytes.as_u64(), 256 * 1024);
        assert_eq!(config.fetch.connect_timeout_ms, 500);
        assert_eq!(config.fetch.max_redirects, 3);
        assert_eq!(config.fetch.user_agent, "test-agent/1.0");
        assert_eq!(config.transform.transformer, "uppercase");
        assert_eq!(config.transform.part_size.as_u64(), 1024 * 1024);
        assert_eq!(config.telemetry.log_filter, "transformbox=debug");
    }

    #[test]
    fn test_dotenv_applies_with_explicit_config_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");
        let dotenv_path = temp_dir.path().join(".env");

        fs::write(&config_path, "[fetch]\nrequest_timeout_ms = 2000\n").unwrap();
        // Key unused by other tests; the process environment is shared
        fs::write(&dotenv_path, "TRANSFORMBOX__FETCH__REQUEST_TIMEOUT_MS=4321\n").unwrap();

        let config = load_with_dotenv(config_path, Some(&dotenv_path)).unwrap();
        assert_eq!(config.fetch.request_timeout_ms, 4321);
    }

    #[test]
    fn test_malformed_toml_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "[fetch\nconnect_timeout_ms = ").unwrap();

        assert!(load_from_sources(config_path).is_err());
    }
}
