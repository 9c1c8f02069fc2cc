// ==========================================
// Betaflow 制造管理 - 导入配置快照
// ==========================================
// 每次导入开始时从 ImportConfigReader 加载一次
// ==========================================

use crate::config::import_config_trait::{ConfigResult, ImportConfigReader};
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_INSERT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_RETRIES: u32 = 0;
pub const DEFAULT_RETRY_BACKOFF_MS: u64 = 200;
pub const DEFAULT_DELIMITER: u8 = b',';

/// 解析分隔符配置；支持 "tab" / "\t" 别名
pub fn parse_delimiter(raw: &str) -> Option<u8> {
    match raw {
        "tab" | "\\t" | "\t" => return Some(b'\t'),
        _ => {}
    }
    let trimmed = raw.trim();
    let mut bytes = trimmed.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b), None) if b.is_ascii() && b != b'"' && b != b'\n' && b != b'\r' => Some(b),
        _ => None,
    }
}

// ==========================================
// ImportSettings
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSettings {
    pub insert_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub delimiter: u8,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            insert_timeout: Duration::from_millis(DEFAULT_INSERT_TIMEOUT_MS),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: Duration::from_millis(DEFAULT_RETRY_BACKOFF_MS),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl ImportSettings {
    /// 从配置读取器加载快照
    pub async fn load<C>(config: &C) -> ConfigResult<Self>
    where
        C: ImportConfigReader + ?Sized,
    {
        Ok(Self {
            insert_timeout: Duration::from_millis(config.get_insert_timeout_ms().await?),
            max_retries: config.get_max_retries().await?,
            retry_backoff: Duration::from_millis(config.get_retry_backoff_ms().await?),
            delimiter: config.get_delimiter().await?,
        })
    }
}

// ==========================================
// StaticImportConfig - 固定配置（无数据库）
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticImportConfig(pub ImportSettings);

#[async_trait]
impl ImportConfigReader for StaticImportConfig {
    async fn get_insert_timeout_ms(&self) -> ConfigResult<u64> {
        Ok(self.0.insert_timeout.as_millis() as u64)
    }

    async fn get_max_retries(&self) -> ConfigResult<u32> {
        Ok(self.0.max_retries)
    }

    async fn get_retry_backoff_ms(&self) -> ConfigResult<u64> {
        Ok(self.0.retry_backoff.as_millis() as u64)
    }

    async fn get_delimiter(&self) -> ConfigResult<u8> {
        Ok(self.0.delimiter)
    }
}
