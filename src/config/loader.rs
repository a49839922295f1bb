//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ScrubberConfig;
use super::secret::secret_string;
use crate::domain::errors::ScrubError;
use crate::domain::result::Result;
use crate::masking::OffsetUnit;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ScrubberConfig
/// 4. Applies environment variable overrides (SCRUBBER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use scrubber::config::loader::load_config;
///
/// let config = load_config("scrubber.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ScrubberConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScrubError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScrubError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ScrubberConfig = toml::from_str(&contents)
        .map_err(|e| ScrubError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;
    validate(&config)?;

    Ok(config)
}

/// Loads configuration from `path` if it exists, else from defaults plus
/// environment variables
///
/// Lets the service run from `LANGUAGE_ENDPOINT` / `LANGUAGE_KEY` alone.
pub fn load_config_or_env(path: impl AsRef<Path>) -> Result<ScrubberConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults and environment"
    );

    let mut config = ScrubberConfig::default();
    apply_env_overrides(&mut config)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ScrubberConfig) -> Result<()> {
    config.validate().map_err(|e| {
        ScrubError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ScrubError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ScrubError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides from the process environment
fn apply_env_overrides(config: &mut ScrubberConfig) -> Result<()> {
    apply_overrides(config, |name| std::env::var(name).ok())
}

/// Applies overrides using `lookup` to read variables
///
/// Variables follow the pattern SCRUBBER_<SECTION>_<KEY>, for example
/// SCRUBBER_SERVER_PORT. `LANGUAGE_ENDPOINT` and `LANGUAGE_KEY` are also
/// honoured; the SCRUBBER_ form wins when both are set.
fn apply_overrides<F>(config: &mut ScrubberConfig, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    // Application overrides
    if let Some(val) = lookup("SCRUBBER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Server overrides
    if let Some(val) = lookup("SCRUBBER_SERVER_HOST") {
        config.server.host = val;
    }
    if let Some(val) = lookup("SCRUBBER_SERVER_PORT") {
        config.server.port = parse_var("SCRUBBER_SERVER_PORT", &val)?;
    }
    if let Some(val) = lookup("SCRUBBER_SERVER_REQUEST_TIMEOUT_SECONDS") {
        config.server.request_timeout_seconds =
            parse_var("SCRUBBER_SERVER_REQUEST_TIMEOUT_SECONDS", &val)?;
    }

    // Language service overrides
    if let Some(val) = lookup("LANGUAGE_ENDPOINT") {
        config.language.endpoint = val;
    }
    if let Some(val) = lookup("LANGUAGE_KEY") {
        config.language.key = Some(secret_string(val));
    }
    if let Some(val) = lookup("SCRUBBER_LANGUAGE_ENDPOINT") {
        config.language.endpoint = val;
    }
    if let Some(val) = lookup("SCRUBBER_LANGUAGE_KEY") {
        config.language.key = Some(secret_string(val));
    }
    if let Some(val) = lookup("SCRUBBER_LANGUAGE_API_VERSION") {
        config.language.api_version = val;
    }
    if let Some(val) = lookup("SCRUBBER_LANGUAGE_STRING_INDEX_TYPE") {
        config.language.string_index_type = OffsetUnit::from_str(&val)?;
    }
    if let Some(val) = lookup("SCRUBBER_LANGUAGE_TIMEOUT_SECONDS") {
        config.language.timeout_seconds = parse_var("SCRUBBER_LANGUAGE_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = lookup("SCRUBBER_LANGUAGE_RETRY_MAX_RETRIES") {
        config.language.retry.max_retries =
            parse_var("SCRUBBER_LANGUAGE_RETRY_MAX_RETRIES", &val)?;
    }

    // Logging overrides
    if let Some(val) = lookup("SCRUBBER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_var("SCRUBBER_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = lookup("SCRUBBER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = lookup("SCRUBBER_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    // Masking overrides
    config.masking.apply_overrides(&lookup)
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ScrubError::Configuration(format!("Invalid {name}: {value}")))
}
