//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use scrubber::config::{load_config, load_config_or_env};
use scrubber::masking::{MaskingPolicy, OffsetUnit};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::{NamedTempFile, TempDir};

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Helper function to clean up environment variables
fn cleanup_env_vars() {
    for name in [
        "SCRUBBER_APPLICATION_LOG_LEVEL",
        "SCRUBBER_SERVER_PORT",
        "SCRUBBER_LANGUAGE_ENDPOINT",
        "SCRUBBER_LANGUAGE_KEY",
        "SCRUBBER_LANGUAGE_STRING_INDEX_TYPE",
        "SCRUBBER_MASKING_DEFAULT_POLICY",
        "SCRUBBER_MASKING_MAX_TEXT_LENGTH",
        "LANGUAGE_ENDPOINT",
        "LANGUAGE_KEY",
        "TEST_SCRUBBER_ENDPOINT",
        "TEST_SCRUBBER_KEY",
    ] {
        std::env::remove_var(name);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[application]
log_level = "debug"

[server]
host = "0.0.0.0"
port = 8080
request_timeout_seconds = 10

[language]
endpoint = "https://my-resource.cognitiveservices.azure.com/"
key = "test-key-12345"
api_version = "2023-04-01"
string_index_type = "UnicodeCodePoint"
timeout_seconds = 5

[language.retry]
max_retries = 4
initial_delay_ms = 100
max_delay_ms = 1000
backoff_multiplier = 3.0

[masking]
default_policy = "hash"
default_language = "fr"
max_text_length = 1000

[masking.audit]
enabled = true
log_path = "/tmp/scrubber/audit.log"
json_format = false

[logging]
local_enabled = true
local_path = "/tmp/scrubber"
local_rotation = "hourly"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
    assert_eq!(config.server.request_timeout_seconds, 10);

    assert_eq!(
        config.language.endpoint,
        "https://my-resource.cognitiveservices.azure.com/"
    );
    assert!(config.language.key.as_ref().unwrap().expose_secret() == "test-key-12345");
    assert_eq!(config.language.api_version, "2023-04-01");
    assert_eq!(config.language.string_index_type, OffsetUnit::UnicodeCodePoint);
    assert_eq!(config.language.timeout_seconds, 5);
    assert_eq!(config.language.retry.max_retries, 4);
    assert_eq!(config.language.retry.backoff_multiplier, 3.0);

    assert_eq!(config.masking.default_policy, MaskingPolicy::Hash);
    assert_eq!(config.masking.default_language, "fr");
    assert_eq!(config.masking.max_text_length, 1000);
    assert!(config.masking.audit.enabled);
    assert!(!config.masking.audit.json_format);

    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
    assert!(config.require_detector().is_ok());
}

#[test]
fn test_load_empty_config_with_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config("");
    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.server.bind_address(), "127.0.0.1:3000");
    assert_eq!(config.server.request_timeout_seconds, 30);
    assert_eq!(config.language.api_version, "v3.1");
    assert_eq!(config.language.string_index_type, OffsetUnit::Utf16CodeUnit);
    assert_eq!(config.language.retry.max_retries, 2);
    assert_eq!(config.masking.default_policy, MaskingPolicy::Redact);
    assert_eq!(config.masking.default_language, "auto");
    assert_eq!(config.masking.max_text_length, 5120);
    assert!(!config.masking.audit.enabled);
    assert!(!config.logging.local_enabled);

    // Loading succeeds, but the service cannot start without a detector
    assert!(config.require_detector().is_err());
}

#[test]
fn test_env_var_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var(
        "TEST_SCRUBBER_ENDPOINT",
        "https://substituted.cognitiveservices.azure.com",
    );
    std::env::set_var("TEST_SCRUBBER_KEY", "substituted-key");

    let temp_file = write_config(
        r#"
[language]
endpoint = "${TEST_SCRUBBER_ENDPOINT}"
key = "${TEST_SCRUBBER_KEY}"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(
        config.language.endpoint,
        "https://substituted.cognitiveservices.azure.com"
    );
    assert!(config.language.key.as_ref().unwrap().expose_secret() == "substituted-key");

    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let temp_file = write_config(
        r#"
[language]
key = "${TEST_SCRUBBER_KEY}"
"#,
    );

    let result = load_config(temp_file.path());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("TEST_SCRUBBER_KEY"));
}

#[test]
fn test_env_var_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("SCRUBBER_APPLICATION_LOG_LEVEL", "trace");
    std::env::set_var("SCRUBBER_SERVER_PORT", "9090");
    std::env::set_var("SCRUBBER_LANGUAGE_STRING_INDEX_TYPE", "UnicodeCodePoint");
    std::env::set_var("SCRUBBER_MASKING_DEFAULT_POLICY", "pseudo");
    std::env::set_var("SCRUBBER_MASKING_MAX_TEXT_LENGTH", "2048");

    let temp_file = write_config(
        r#"
[application]
log_level = "info"

[server]
port = 3000

[masking]
default_policy = "redact"
"#,
    );

    let config = load_config(temp_file.path()).expect("Failed to load config");

    assert_eq!(config.application.log_level, "trace");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.language.string_index_type, OffsetUnit::UnicodeCodePoint);
    assert_eq!(config.masking.default_policy, MaskingPolicy::Pseudo);
    assert_eq!(config.masking.max_text_length, 2048);

    cleanup_env_vars();
}

#[test]
fn test_scrubber_prefix_wins_over_legacy_names() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("LANGUAGE_ENDPOINT", "https://legacy.cognitiveservices.azure.com");
    std::env::set_var("LANGUAGE_KEY", "legacy-key");
    std::env::set_var(
        "SCRUBBER_LANGUAGE_ENDPOINT",
        "https://preferred.cognitiveservices.azure.com",
    );

    let dir = TempDir::new().unwrap();
    let config = load_config_or_env(dir.path().join("absent.toml")).expect("Failed to load");

    assert_eq!(
        config.language.endpoint,
        "https://preferred.cognitiveservices.azure.com"
    );
    assert!(config.language.key.as_ref().unwrap().expose_secret() == "legacy-key");
    assert!(config.require_detector().is_ok());

    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("SCRUBBER_SERVER_PORT", "not-a-port");

    let temp_file = write_config("");
    let result = load_config(temp_file.path());
    assert!(result.is_err());

    cleanup_env_vars();
}

#[test]
fn test_invalid_config_validation() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let cases = [
        "[application]\nlog_level = \"verbose\"\n",
        "[server]\nport = 0\n",
        "[language]\nendpoint = \"ftp://example.com\"\n",
        "[language.retry]\nbackoff_multiplier = 0.5\n",
        "[masking]\nmax_text_length = 0\n",
        "[masking]\ndefault_policy = \"scramble\"\n",
        "[logging]\nlocal_rotation = \"size\"\n",
    ];

    for contents in cases {
        let temp_file = write_config(contents);
        assert!(
            load_config(temp_file.path()).is_err(),
            "expected rejection of:\n{contents}"
        );
    }
}

#[test]
fn test_missing_file() {
    let result = load_config("does-not-exist-scrubber.toml");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("not found"));
}
