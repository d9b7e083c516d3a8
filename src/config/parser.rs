use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration text, resolves secrets and validates the result
///
/// Passwords given through `password-env` are read from the environment here,
/// so the returned config always carries the resolved value.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;

    resolve_passwords(&mut config)?;
    validate(&config)?;

    Ok(config)
}

fn resolve_passwords(config: &mut Config) -> Result<(), ConfigError> {
    if let Some(session) = config.fetch.session.as_mut() {
        session.password = resolve_password(session.password.take(), session.password_env.as_deref())?;
    }

    if let Some(login) = config
        .fetch
        .browser
        .as_mut()
        .and_then(|browser| browser.login.as_mut())
    {
        login.password = resolve_password(login.password.take(), login.password_env.as_deref())?;
    }

    Ok(())
}

// An inline password wins; otherwise the named variable must be set.
fn resolve_password(inline: Option<String>, env_var: Option<&str>) -> Result<Option<String>, ConfigError> {
    match (inline, env_var) {
        (Some(password), _) => Ok(Some(password)),
        (None, Some(var)) => std::env::var(var)
            .map(Some)
            .map_err(|_| ConfigError::MissingEnv(var.to_string())),
        (None, None) => Ok(None),
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at start-up so a run can be tied back to the exact file used.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
