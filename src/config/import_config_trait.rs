// ==========================================
// Betaflow 制造管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入管道所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use async_trait::async_trait;
use std::error::Error;

pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 实现者: ConfigManager（config_kv 表）/ StaticImportConfig（固定值）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 落库配置 =====

    /// 单行写入超时（毫秒）
    ///
    /// # 默认值
    /// - 10000
    async fn get_insert_timeout_ms(&self) -> ConfigResult<u64>;

    /// 瞬时错误的最大重试次数
    ///
    /// # 默认值
    /// - 0（不重试）
    async fn get_max_retries(&self) -> ConfigResult<u32>;

    /// 重试退避基数（毫秒），每次重试翻倍
    ///
    /// # 默认值
    /// - 200
    async fn get_retry_backoff_ms(&self) -> ConfigResult<u64>;

    // ===== 解析配置 =====

    /// 字段分隔符（单个 ASCII 字符）
    ///
    /// # 默认值
    /// - ','
    async fn get_delimiter(&self) -> ConfigResult<u8>;
}
