use tasklist::config::Config;
use tasklist::constants::DEFAULT_API_URL;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_API_URL);
    assert_eq!(config.api.list_limit, 5);
    assert_eq!(config.api.timeout_secs, 10);
    assert!(!config.storage.in_memory);
    assert!(config.storage.database_path.is_empty());
    assert!(config.sync.replay_on_reconnect);
    assert_eq!(config.sync.probe_interval_secs, 15);
    assert!(!config.logging.enabled);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Invalid list limit should fail
    config.api.list_limit = 0;
    assert!(config.validate().is_err());

    // Reset and test invalid timeout
    config.api.list_limit = 5;
    config.api.timeout_secs = 1000;
    assert!(config.validate().is_err());

    // Reset and test invalid probe interval
    config.api.timeout_secs = 10;
    config.sync.probe_interval_secs = 0;
    assert!(config.validate().is_err());

    // Reset and test invalid log level
    config.sync.probe_interval_secs = 15;
    config.logging.level = "loud".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_rejects_bad_urls() {
    let mut config = Config::default();

    config.api.base_url = "not a url".to_string();
    assert!(config.validate().is_err());

    config.api.base_url = "ftp://example.com/todos".to_string();
    assert!(config.validate().is_err());

    config.api.base_url = "http://localhost:3000/todos".to_string();
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("list_limit = 5"));
    assert!(toml_str.contains("replay_on_reconnect = true"));
}

#[test]
fn test_partial_config_deserialization() {
    // Test that partial TOML configs merge with defaults
    let partial_toml = r#"
[api]
list_limit = 20

[logging]
enabled = true
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    // Check that specified values are used
    assert_eq!(config.api.list_limit, 20);
    assert!(config.logging.enabled);

    // Check that unspecified values use defaults
    assert_eq!(config.api.base_url, DEFAULT_API_URL);
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.logging.level, "info");
    assert!(config.sync.replay_on_reconnect);
}

#[test]
fn test_empty_config_deserialization() {
    // Test that empty TOML uses all defaults
    let config: Config = toml::from_str("").unwrap();
    let default_config = Config::default();

    assert_eq!(config.api.base_url, default_config.api.base_url);
    assert_eq!(config.api.list_limit, default_config.api.list_limit);
    assert_eq!(config.sync.probe_interval_secs, default_config.sync.probe_interval_secs);
    assert_eq!(config.logging.enabled, default_config.logging.enabled);
}

#[test]
fn test_generate_and_load_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasklist").join("config.toml");

    Config::generate_default_config(&path).unwrap();
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# tasklist Configuration File"));

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded.api.base_url, DEFAULT_API_URL);
}

#[test]
fn test_load_invalid_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nlist_limit = 0\n").unwrap();

    assert!(Config::load_from_file(&path).is_err());
}
