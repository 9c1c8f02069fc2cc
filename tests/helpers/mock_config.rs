// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use betaflow_import::config::{ConfigResult, ImportConfigReader};

/// Mock 配置结构
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub insert_timeout_ms: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub delimiter: u8,
    /// 为 true 时所有读取返回错误
    pub broken: bool,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            insert_timeout_ms: 10_000,
            max_retries: 0,
            retry_backoff_ms: 1,
            delimiter: b',',
            broken: false,
        }
    }

    /// 短超时配置
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        let mut config = Self::default();
        config.insert_timeout_ms = timeout_ms;
        config
    }

    /// 允许重试
    pub fn with_retries(max_retries: u32) -> Self {
        let mut config = Self::default();
        config.max_retries = max_retries;
        config
    }

    /// 自定义分隔符
    pub fn with_delimiter(delimiter: u8) -> Self {
        let mut config = Self::default();
        config.delimiter = delimiter;
        config
    }

    /// 读取失败的配置源
    pub fn broken() -> Self {
        let mut config = Self::default();
        config.broken = true;
        config
    }

    fn check(&self) -> ConfigResult<()> {
        if self.broken {
            return Err("配置源不可用".into());
        }
        Ok(())
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_insert_timeout_ms(&self) -> ConfigResult<u64> {
        self.check()?;
        Ok(self.insert_timeout_ms)
    }

    async fn get_max_retries(&self) -> ConfigResult<u32> {
        self.check()?;
        Ok(self.max_retries)
    }

    async fn get_retry_backoff_ms(&self) -> ConfigResult<u64> {
        self.check()?;
        Ok(self.retry_backoff_ms)
    }

    async fn get_delimiter(&self) -> ConfigResult<u8> {
        self.check()?;
        Ok(self.delimiter)
    }
}
