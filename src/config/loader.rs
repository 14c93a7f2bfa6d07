//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{MessagePolicy, StubConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "BIND_ON_ADDRESS";
/// Environment variable overriding `listener.bind_port`.
pub const ENV_BIND_PORT: &str = "BIND_ON_PORT";
/// Environment variable overriding `transmitter.delay_secs`.
pub const ENV_DELAY: &str = "TIME_BETWEEN_MSG";
/// Environment variable overriding `transmitter.policy`.
pub const ENV_POLICY: &str = "MESSAGE_POLICY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {file}: {source}", file = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}' ({reason})")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file without applying any overrides.
pub fn load_config_file(path: &Path) -> Result<StubConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: StubConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Apply environment overrides on top of `config`.
///
/// `lookup` resolves a variable name to its value, so callers can pass
/// `std::env::var(..).ok()` or a fixed map in tests.
pub fn apply_env_overrides<F>(mut config: StubConfig, lookup: F) -> Result<StubConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(address) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = address;
    }

    if let Some(port) = lookup(ENV_BIND_PORT) {
        config.listener.bind_port = port.trim().parse::<u16>().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env {
                var: ENV_BIND_PORT,
                value: port.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    if let Some(delay) = lookup(ENV_DELAY) {
        config.transmitter.delay_secs = delay.trim().parse::<u64>().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env {
                var: ENV_DELAY,
                value: delay.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    if let Some(policy) = lookup(ENV_POLICY) {
        config.transmitter.policy = policy
            .parse::<MessagePolicy>()
            .map_err(|reason| ConfigError::Env {
                var: ENV_POLICY,
                value: policy.clone(),
                reason,
            })?;
    }

    Ok(config)
}

/// Build the effective configuration: defaults, then the optional file,
/// then environment overrides. The result is validated.
pub fn load<F>(path: Option<&Path>, lookup: F) -> Result<StubConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match path {
        Some(path) => load_config_file(path)?,
        None => StubConfig::default(),
    };

    let config = apply_env_overrides(base, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// `load` against the real process environment.
pub fn load_from_env(path: Option<&Path>) -> Result<StubConfig, ConfigError> {
    load(path, |name| std::env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn no_overrides_yields_defaults() {
        let config = load(None, env(&[])).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0");
        assert_eq!(config.listener.bind_port, 6000);
        assert_eq!(config.transmitter.delay(), Duration::from_secs(2));
    }

    #[test]
    fn env_overrides_apply() {
        let config = load(
            None,
            env(&[
                (ENV_BIND_ADDRESS, "127.0.0.1"),
                (ENV_BIND_PORT, "7100"),
                (ENV_DELAY, "0"),
                (ENV_POLICY, "Lenient"),
            ]),
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1");
        assert_eq!(config.listener.bind_port, 7100);
        assert_eq!(config.transmitter.delay_secs, 0);
        assert_eq!(config.transmitter.policy, MessagePolicy::Lenient);
    }

    #[test]
    fn unparseable_port_names_the_variable() {
        let err = load(None, env(&[(ENV_BIND_PORT, "sixty")])).unwrap_err();
        match err {
            ConfigError::Env { var, value, .. } => {
                assert_eq!(var, ENV_BIND_PORT);
                assert_eq!(value, "sixty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_address_fails_validation() {
        let err = load(None, env(&[(ENV_BIND_ADDRESS, "not-an-ip")])).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errors) if errors.len() == 1));
        assert!(err.to_string().contains("not-an-ip"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load(Some(Path::new("/definitely/not/here.toml")), env(&[])).unwrap_err();
        match &err {
            ConfigError::Io { path, .. } => assert_eq!(path, Path::new("/definitely/not/here.toml")),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }

    #[test]
    fn env_wins_over_file() {
        let path = std::env::temp_dir().join(format!("pager-stub-{}.toml", std::process::id()));
        fs::write(&path, "[listener]\nbind_port = 7001\n[transmitter]\ndelay_secs = 5\n").unwrap();

        let config = load(Some(&path), env(&[(ENV_DELAY, "1")])).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(config.listener.bind_port, 7001);
        assert_eq!(config.transmitter.delay_secs, 1);
    }
}
