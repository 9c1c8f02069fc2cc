// ==========================================
// 导入配置集成测试
// ==========================================
// 测试范围: config_kv 读取、默认值、格式错误、设置快照
// ==========================================

mod test_helpers;

use betaflow_import::config::{
    config_keys, ConfigManager, ImportConfigReader, ImportSettings,
};
use rusqlite::Connection;
use std::time::Duration;
use test_helpers::{create_test_db, insert_test_config};

#[tokio::test]
async fn test_defaults_when_config_kv_is_empty() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    assert_eq!(config.get_insert_timeout_ms().await.unwrap(), 10_000);
    assert_eq!(config.get_max_retries().await.unwrap(), 0);
    assert_eq!(config.get_retry_backoff_ms().await.unwrap(), 200);
    assert_eq!(config.get_delimiter().await.unwrap(), b',');

    let settings = ImportSettings::load(&config).await.unwrap();
    assert_eq!(settings, ImportSettings::default());
}

#[tokio::test]
async fn test_values_from_config_kv() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = Connection::open(&db_path).unwrap();
    insert_test_config(&conn, config_keys::IMPORT_INSERT_TIMEOUT_MS, "2500").unwrap();
    insert_test_config(&conn, config_keys::IMPORT_MAX_RETRIES, " 3 ").unwrap();
    insert_test_config(&conn, config_keys::IMPORT_RETRY_BACKOFF_MS, "50").unwrap();
    insert_test_config(&conn, config_keys::IMPORT_DELIMITER, ";").unwrap();

    let config = ConfigManager::new(&db_path).unwrap();
    let settings = ImportSettings::load(&config).await.unwrap();

    assert_eq!(settings.insert_timeout, Duration::from_millis(2500));
    assert_eq!(settings.max_retries, 3);
    assert_eq!(settings.retry_backoff, Duration::from_millis(50));
    assert_eq!(settings.delimiter, b';');
}

#[tokio::test]
async fn test_set_global_config_value_overwrites() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let config = ConfigManager::new(&db_path).unwrap();

    config
        .set_global_config_value(config_keys::IMPORT_MAX_RETRIES, "1")
        .unwrap();
    config
        .set_global_config_value(config_keys::IMPORT_MAX_RETRIES, "4")
        .unwrap();

    assert_eq!(
        config
            .get_global_config_value(config_keys::IMPORT_MAX_RETRIES)
            .unwrap(),
        Some("4".to_string())
    );
    assert_eq!(config.get_max_retries().await.unwrap(), 4);
}

#[tokio::test]
async fn test_malformed_values_are_errors() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = Connection::open(&db_path).unwrap();
    insert_test_config(&conn, config_keys::IMPORT_MAX_RETRIES, "-1").unwrap();
    insert_test_config(&conn, config_keys::IMPORT_DELIMITER, "::").unwrap();

    let config = ConfigManager::new(&db_path).unwrap();

    let err = config.get_max_retries().await.unwrap_err();
    assert!(err.to_string().contains(config_keys::IMPORT_MAX_RETRIES));
    assert!(config.get_delimiter().await.is_err());
    assert!(ImportSettings::load(&config).await.is_err());
}

#[tokio::test]
async fn test_quote_is_not_a_valid_delimiter() {
    let (_temp_file, db_path) = create_test_db().unwrap();
    let conn = Connection::open(&db_path).unwrap();
    insert_test_config(&conn, config_keys::IMPORT_DELIMITER, "\"").unwrap();

    let config = ConfigManager::new(&db_path).unwrap();
    assert!(config.get_delimiter().await.is_err());
}
