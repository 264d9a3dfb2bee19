//! 仿真链路配置
//!
//! 支持从 TOML 加载，所有字段都有默认值：
//!
//! ```toml
//! topic = "robot"
//! product_id = 941150534
//! receive_timeout_ms = 2
//! assists = 6
//! # device_id = 42   # 可选：覆盖宿主设备序列号
//! ```

use crate::error::DriverError;
use cutebot_protocol::{AssistFlags, CUTEBOT_PRODUCT_ID, SIM_TOPIC};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 仿真链路配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// 消息通道名称
    pub topic: String,
    /// 写入 `state` 消息的产品 ID
    pub product_id: u32,
    /// RX 接收超时（毫秒），同时决定 RX 线程检查退出标志的间隔
    pub receive_timeout_ms: u64,
    /// 辅助功能位掩码
    pub assists: u8,
    /// 覆盖宿主设备序列号
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<i32>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            topic: SIM_TOPIC.to_string(),
            product_id: CUTEBOT_PRODUCT_ID,
            receive_timeout_ms: 2,
            assists: AssistFlags::cutebot_default().bits(),
            device_id: None,
        }
    }
}

impl SimConfig {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml_str(content: &str) -> Result<Self, DriverError> {
        let config: SimConfig =
            toml::from_str(content).map_err(|e| DriverError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DriverError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DriverError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// 序列化为 TOML
    pub fn to_toml_string(&self) -> Result<String, DriverError> {
        toml::to_string(self).map_err(|e| DriverError::Config(e.to_string()))
    }

    /// 校验配置
    pub fn validate(&self) -> Result<(), DriverError> {
        if self.topic.is_empty() {
            return Err(DriverError::Config("topic must not be empty".to_string()));
        }
        if self.topic.contains('\0') {
            return Err(DriverError::Config("topic must not contain NUL".to_string()));
        }
        if self.receive_timeout_ms == 0 {
            return Err(DriverError::Config(
                "receive_timeout_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn assist_flags(&self) -> AssistFlags {
        AssistFlags::from(self.assists)
    }

    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms)
    }
}
