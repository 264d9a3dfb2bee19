//! # Cutebot Protocol
//!
//! 控制器与仿真器之间的消息协议定义（无传输依赖）
//!
//! ## 模块
//!
//! - `constants`: 协议常量（topic、产品 ID、传感器槽位）
//! - `flags`: 辅助功能 / 传感器位掩码
//! - `message`: `state` / `sensors` 消息与 JSON 编解码
//!
//! ## 消息方向
//!
//! ```text
//! 控制器 ──── {"type":"state", ...}   ───→ 仿真器
//! 控制器 ←─── {"type":"sensors", ...} ──── 仿真器
//! ```
//!
//! 入站解码是宽松的：[`decode`] 对任何无法识别的输入返回 `None`，
//! 调用方只需把它当作空操作处理。

pub mod constants;
pub mod flags;
pub mod message;

// 重新导出常用类型
pub use constants::*;
pub use flags::{AssistFlags, SensorFlags, SensorKind};
pub use message::{RobotSensorsMessage, RobotSimMessage, RobotStateMessage, decode, try_decode};

use thiserror::Error;

/// 协议错误类型
///
/// 只出现在严格路径上（[`try_decode`] 和编码）。宽松路径 [`decode`] 从不返回错误。
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payload is not valid UTF-8")]
    InvalidUtf8,
}
