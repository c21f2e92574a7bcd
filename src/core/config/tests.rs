use super::data::{path_display, Config};
use super::{ClientConfig, ClientConfigError, ConfigError};
use crate::core::credentials::{Credential, CredentialSource};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

fn env_credential(secret: &str) -> Option<Credential> {
    Some(Credential::new(secret, CredentialSource::Environment))
}

#[test]
fn test_load_nonexistent_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.base_url(), "https://openrouter.ai/api/v1");
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let config = Config {
        site_name: Some("My Chat".to_string()),
        max_retries: Some(5),
        ..Default::default()
    };
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    let mut config = loaded;
    config.unset_value("max-retries").expect("known key");
    config
        .save_to_path(&config_path)
        .expect("Failed to save modified config");
    let loaded = Config::load_from_path(&config_path).expect("Failed to load modified config");
    assert_eq!(loaded.max_retries, None);
    assert_eq!(loaded.site_name.as_deref(), Some("My Chat"));
}

#[test]
fn test_invalid_toml_reports_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "max_retries = \"three\"").expect("write");

    let err = Config::load_from_path(&config_path).expect_err("parse should fail");
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("config.toml"));
}

#[test]
fn test_retry_policy_defaults_and_overrides() {
    let config = Config::default();
    let policy = config.retry_policy();
    assert_eq!(policy.max_retries, 3);
    assert_eq!(policy.initial_delay, Duration::from_millis(1000));

    let config = Config {
        max_retries: Some(1),
        initial_retry_delay_ms: Some(250),
        ..Default::default()
    };
    let policy = config.retry_policy();
    assert_eq!(policy.max_retries, 1);
    assert_eq!(policy.initial_delay, Duration::from_millis(250));
}

#[test]
fn test_set_value_parses_and_validates() {
    let mut config = Config::default();
    config.set_value("render-cache-capacity", "64").unwrap();
    config.set_value("data-dir", "/tmp/chatroute").unwrap();
    assert_eq!(config.render_cache_capacity(), 64);
    assert_eq!(config.data_dir(), Some(PathBuf::from("/tmp/chatroute")));

    assert!(config.set_value("max-retries", "-1").is_err());
    assert!(config.set_value("site-name", "  ").is_err());
    assert!(config.set_value("colour", "blue").is_err());
}

#[test]
fn test_client_config_requires_credential() {
    let config = Config::default();
    assert_eq!(
        ClientConfig::resolve(&config, None).unwrap_err(),
        ClientConfigError::MissingCredential
    );
    assert_eq!(
        ClientConfig::resolve(&config, env_credential("  ")).unwrap_err(),
        ClientConfigError::MissingCredential
    );
}

#[test]
fn test_client_config_rejects_unusable_values() {
    let config = Config::default();
    assert_eq!(
        ClientConfig::resolve(&config, env_credential("bad\nkey")).unwrap_err(),
        ClientConfigError::InvalidCredential
    );

    let config = Config {
        base_url: Some("openrouter.ai/api/v1".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        ClientConfig::resolve(&config, env_credential("sk-or-1")),
        Err(ClientConfigError::InvalidBaseUrl(_))
    ));

    let config = Config {
        site_name: Some("line\nbreak".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        ClientConfig::resolve(&config, env_credential("sk-or-1")),
        Err(ClientConfigError::InvalidHeader { name: "X-Title", .. })
    ));
}

#[test]
fn test_client_config_carries_resolved_values() {
    let config = Config {
        site_url: Some("https://example.org".to_string()),
        max_retries: Some(2),
        ..Default::default()
    };
    let client = ClientConfig::resolve(&config, env_credential("sk-or-1")).expect("valid");
    assert_eq!(client.api_key(), "sk-or-1");
    assert_eq!(client.site_url, "https://example.org");
    assert_eq!(client.site_name, "chatroute");
    assert_eq!(client.retry.max_retries, 2);
}

#[test]
#[cfg(unix)]
fn test_path_display_uses_tilde_for_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config").join("chatroute");
        assert_eq!(path_display(&path), "~/.config/chatroute");
    }
    assert_eq!(path_display("/etc/chatroute"), "/etc/chatroute");
}
