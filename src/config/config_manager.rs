// ==========================================
// Betaflow 制造管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// 缺省键 → 默认值；值格式错误 → 配置错误
// ==========================================

use crate::config::import_config_trait::{ConfigResult, ImportConfigReader};
use crate::config::import_settings::{
    parse_delimiter, DEFAULT_DELIMITER, DEFAULT_INSERT_TIMEOUT_MS, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_BACKOFF_MS,
};
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA（幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取并解析数值配置，缺省时返回默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_global_config_value(key)? {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| format!("配置项 {} 格式错误 ('{}'): {}", key, raw, e).into()),
            None => Ok(default),
        }
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_insert_timeout_ms(&self) -> ConfigResult<u64> {
        self.get_parsed_or_default(config_keys::IMPORT_INSERT_TIMEOUT_MS, DEFAULT_INSERT_TIMEOUT_MS)
    }

    async fn get_max_retries(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::IMPORT_MAX_RETRIES, DEFAULT_MAX_RETRIES)
    }

    async fn get_retry_backoff_ms(&self) -> ConfigResult<u64> {
        self.get_parsed_or_default(config_keys::IMPORT_RETRY_BACKOFF_MS, DEFAULT_RETRY_BACKOFF_MS)
    }

    async fn get_delimiter(&self) -> ConfigResult<u8> {
        match self.get_global_config_value(config_keys::IMPORT_DELIMITER)? {
            Some(raw) => parse_delimiter(&raw)
                .ok_or_else(|| format!("配置项 {} 格式错误: '{}'", config_keys::IMPORT_DELIMITER, raw).into()),
            None => Ok(DEFAULT_DELIMITER),
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 落库
    pub const IMPORT_INSERT_TIMEOUT_MS: &str = "import_insert_timeout_ms";
    pub const IMPORT_MAX_RETRIES: &str = "import_max_retries";
    pub const IMPORT_RETRY_BACKOFF_MS: &str = "import_retry_backoff_ms";

    // 解析
    pub const IMPORT_DELIMITER: &str = "import_delimiter";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_absent() {
        let config = manager();
        assert_eq!(config.get_insert_timeout_ms().await.unwrap(), 10_000);
        assert_eq!(config.get_max_retries().await.unwrap(), 0);
        assert_eq!(config.get_retry_backoff_ms().await.unwrap(), 200);
        assert_eq!(config.get_delimiter().await.unwrap(), b',');
    }

    #[tokio::test]
    async fn test_overrides_and_upsert() {
        let config = manager();
        config.set_global_config_value(config_keys::IMPORT_MAX_RETRIES, "2").unwrap();
        config.set_global_config_value(config_keys::IMPORT_MAX_RETRIES, " 3 ").unwrap();
        config.set_global_config_value(config_keys::IMPORT_DELIMITER, "tab").unwrap();

        assert_eq!(config.get_max_retries().await.unwrap(), 3);
        assert_eq!(config.get_delimiter().await.unwrap(), b'\t');
    }

    #[tokio::test]
    async fn test_malformed_value_is_error() {
        let config = manager();
        config
            .set_global_config_value(config_keys::IMPORT_INSERT_TIMEOUT_MS, "soon")
            .unwrap();
        config.set_global_config_value(config_keys::IMPORT_DELIMITER, ",,").unwrap();

        let err = config.get_insert_timeout_ms().await.unwrap_err();
        assert!(err.to_string().contains("import_insert_timeout_ms"));
        assert!(config.get_delimiter().await.is_err());
    }
}
