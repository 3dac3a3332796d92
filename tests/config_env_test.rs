//! Config environment variable tests
//!
//! Verifies that Config::from_env() reads and applies environment
//! overrides. Config::from_env() also loads from a .env file via
//! dotenvy, so these tests pin OPENAI_API_KEY themselves.
//!
//! Tests use #[serial] to prevent race conditions on shared env vars.

use serial_test::serial;
use std::env;

use kaji_agent::config::{Config, LogFormat};

fn with_api_key() {
    env::set_var("OPENAI_API_KEY", "test-key");
}

#[test]
#[serial]
fn test_config_requires_api_key() {
    env::remove_var("OPENAI_API_KEY");
    // Only meaningful when no .env file supplies the key.
    if !std::path::Path::new(".env").exists() {
        let result = Config::from_env();
        assert!(result.is_err(), "missing OPENAI_API_KEY must fail");
    }
    with_api_key();
}

#[test]
#[serial]
fn test_config_defaults() {
    with_api_key();
    env::remove_var("OPENAI_BASE_URL");
    env::remove_var("OPENAI_MODEL");
    env::remove_var("TODO_PATH");
    env::remove_var("MAX_HISTORY");
    env::remove_var("MAX_INPUT_CHARS");
    env::remove_var("LOG_FORMAT");

    let config = Config::from_env().unwrap();
    assert_eq!(config.openai.base_url, "https://api.openai.com");
    assert_eq!(config.openai.model, "gpt-4o-mini");
    assert_eq!(config.store.todo_path.to_str().unwrap(), "./todos.json");
    assert_eq!(config.agent.max_history, 50);
    assert_eq!(config.agent.max_input_chars, 1000);
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_config_custom_base_url_and_model() {
    with_api_key();
    env::set_var("OPENAI_BASE_URL", "https://llm.example.com");
    env::set_var("OPENAI_MODEL", "gpt-4o");

    let config = Config::from_env().unwrap();
    assert_eq!(config.openai.base_url, "https://llm.example.com");
    assert_eq!(config.openai.model, "gpt-4o");

    env::remove_var("OPENAI_BASE_URL");
    env::remove_var("OPENAI_MODEL");
}

#[test]
#[serial]
fn test_config_custom_store_and_calendar_paths() {
    with_api_key();
    env::set_var("TODO_PATH", "/tmp/custom-todos.json");
    env::set_var("GOOGLE_CREDENTIALS_PATH", "/tmp/creds.json");
    env::set_var("GOOGLE_TOKEN_PATH", "/tmp/tok.json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.store.todo_path.to_str().unwrap(), "/tmp/custom-todos.json");
    assert_eq!(
        config.calendar.credentials_path.to_str().unwrap(),
        "/tmp/creds.json"
    );
    assert_eq!(config.calendar.token_path.to_str().unwrap(), "/tmp/tok.json");

    env::remove_var("TODO_PATH");
    env::remove_var("GOOGLE_CREDENTIALS_PATH");
    env::remove_var("GOOGLE_TOKEN_PATH");
}

#[test]
#[serial]
fn test_config_json_log_format() {
    with_api_key();
    env::set_var("LOG_FORMAT", "json");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);

    env::set_var("LOG_FORMAT", "pretty");
    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Pretty);

    env::remove_var("LOG_FORMAT");
}

#[test]
#[serial]
fn test_config_agent_limits_override() {
    with_api_key();
    env::set_var("MAX_HISTORY", "10");
    env::set_var("MAX_INPUT_CHARS", "200");

    let config = Config::from_env().unwrap();
    assert_eq!(config.agent.max_history, 10);
    assert_eq!(config.agent.max_input_chars, 200);

    // Unparsable values fall back to defaults.
    env::set_var("MAX_HISTORY", "not-a-number");
    let config = Config::from_env().unwrap();
    assert_eq!(config.agent.max_history, 50);

    env::remove_var("MAX_HISTORY");
    env::remove_var("MAX_INPUT_CHARS");
}
