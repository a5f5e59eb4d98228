use super::*;
use std::fs::File;
use std::io::Write;
use tempfile::{TempDir, tempdir};

/// Helper function to create a test configuration file
fn create_test_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let config_path = dir.path().join("config.toml");
    let mut file = File::create(&config_path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    config_path
}

fn sample_config() -> Config {
    Config {
        database_url: "original.db".to_string(),
        bind_address: "127.0.0.1:4000".to_string(),
        log_format: LogFormat::Pretty,
        log_dir: None,
        fingerprint_scope: FingerprintScope::Strict,
        server_url: None,
    }
}

#[test]
fn test_apply_update_with_all_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        bind_address: Some("0.0.0.0:8080".to_string()),
        log_format: Some(LogFormat::Json),
        log_dir: Some(PathBuf::from("/var/log/deckwise")),
        fingerprint_scope: Some(FingerprintScope::Card),
        server_url: Some("http://example.test".to_string()),
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.bind_address, "0.0.0.0:8080");
    assert_eq!(updated.log_format, LogFormat::Json);
    assert_eq!(updated.log_dir, Some(PathBuf::from("/var/log/deckwise")));
    assert_eq!(updated.fingerprint_scope, FingerprintScope::Card);
    assert_eq!(updated.server_url.as_deref(), Some("http://example.test"));
}

#[test]
fn test_apply_update_with_partial_values() {
    let update = ConfigUpdate {
        database_url: Some("updated.db".to_string()),
        ..ConfigUpdate::default()
    };

    let updated = sample_config().apply_update(update);

    assert_eq!(updated.database_url, "updated.db");
    assert_eq!(updated.bind_address, "127.0.0.1:4000"); // Unchanged
    assert_eq!(updated.fingerprint_scope, FingerprintScope::Strict); // Unchanged
}

#[test]
fn test_base_config_defaults() {
    let config = base_config(None);

    assert_eq!(config.database_url, "deckwise.db");
    assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
    assert_eq!(config.log_format, LogFormat::Pretty);
    assert!(config.log_dir.is_none());
    assert_eq!(config.fingerprint_scope, FingerprintScope::Strict);
    assert!(config.server_url.is_none());
}

#[test]
fn test_base_config_with_path() {
    let temp_dir = tempdir().unwrap();
    let config = base_config(Some(temp_dir.path().to_path_buf()));

    let expected_db_path = temp_dir.path().join("deckwise.db").to_string_lossy().to_string();
    assert_eq!(config.database_url, expected_db_path);
}

#[test]
fn test_config_from_args_never_sets_server_url() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        fingerprint_scope: Some(FingerprintScope::Card),
        ..CliArgs::default()
    };

    let update = config_from_args(args);

    assert_eq!(update.database_url, Some("args.db".to_string()));
    assert_eq!(update.fingerprint_scope, Some(FingerprintScope::Card));
    assert_eq!(update.bind_address, None);
    assert_eq!(update.server_url, None);
}

#[test]
fn test_cli_args_parse_flags() {
    let args = CliArgs::try_parse_from([
        "deckwise",
        "--bind-address",
        "0.0.0.0:9000",
        "--log-format",
        "json",
        "--fingerprint-scope",
        "CARD",
    ])
    .unwrap();

    assert_eq!(args.bind_address.as_deref(), Some("0.0.0.0:9000"));
    assert_eq!(args.log_format, Some(LogFormat::Json));
    assert_eq!(args.fingerprint_scope, Some(FingerprintScope::Card));
}

#[test]
fn test_cli_args_reject_unknown_scope() {
    let result = CliArgs::try_parse_from(["deckwise", "--fingerprint-scope", "deck"]);
    assert!(result.is_err());
}

#[test]
fn test_config_from_file_with_no_path() {
    let update = config_from_file(None).unwrap();
    assert!(update.database_url.is_none());
    assert!(update.fingerprint_scope.is_none());
}

#[test]
fn test_config_from_file_with_valid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        bind_address = "0.0.0.0:3100"
        log_format = "json"
        log_dir = "/tmp/deckwise-logs"
        fingerprint_scope = "card"
        server_url = "http://study.local:3100"
    "#;
    let config_path = create_test_config_file(&temp_dir, config_content);

    let result = config_from_file(Some(config_path));

    assert!(result.is_ok(), "Failed to parse config file: {:?}", result.err());
    let update = result.unwrap();
    assert_eq!(update.database_url.as_deref(), Some("file.db"));
    assert_eq!(update.bind_address.as_deref(), Some("0.0.0.0:3100"));
    assert_eq!(update.log_format, Some(LogFormat::Json));
    assert_eq!(update.log_dir, Some(PathBuf::from("/tmp/deckwise-logs")));
    assert_eq!(update.fingerprint_scope, Some(FingerprintScope::Card));
    assert_eq!(update.server_url.as_deref(), Some("http://study.local:3100"));
}

#[test]
fn test_config_from_file_with_partial_values() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        # Intentionally missing other fields
    "#;
    let config_path = create_test_config_file(&temp_dir, config_content);

    let update = config_from_file(Some(config_path)).unwrap();
    assert_eq!(update.database_url.as_deref(), Some("file.db"));
    assert_eq!(update.log_format, None);
    assert_eq!(update.fingerprint_scope, None);
}

#[test]
fn test_config_from_file_with_invalid_toml() {
    let temp_dir = tempdir().unwrap();
    let config_content = r#"
        database_url = "file.db"
        fingerprint_scope = "per-deck"
    "#;
    let config_path = create_test_config_file(&temp_dir, config_content);

    let err = config_from_file(Some(config_path)).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn test_config_from_file_with_nonexistent_file() {
    let temp_dir = tempdir().unwrap();
    let nonexistent_path = temp_dir.path().join("nonexistent_config.toml");

    let update = config_from_file(Some(nonexistent_path)).unwrap();
    assert!(update.database_url.is_none());
}

#[test]
fn test_precedence_defaults_then_file_then_args() {
    let args = CliArgs {
        database_url: Some("args.db".to_string()),
        ..CliArgs::default()
    };
    let file_update = ConfigUpdate {
        database_url: Some("file.db".to_string()),
        bind_address: Some("0.0.0.0:3100".to_string()),
        ..ConfigUpdate::default()
    };

    let config = base_config(None)
        .apply_update(file_update)
        .apply_update(config_from_args(args));

    assert_eq!(config.database_url, "args.db"); // From args
    assert_eq!(config.bind_address, "0.0.0.0:3100"); // From file
    assert_eq!(config.log_format, LogFormat::Pretty); // From base
}
