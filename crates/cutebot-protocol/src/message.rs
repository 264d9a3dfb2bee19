//! 仿真消息定义与 JSON 编解码
//!
//! 线上格式为带 `type` 判别字段的 JSON 对象：
//!
//! ```text
//! {"type":"state","id":"0.42","deviceId":42,"productId":941150534,
//!  "motorTurnRatio":0,"motorSpeed":0,"motorLeft":50,"motorRight":-50,
//!  "armAperture":0,"color":0,"assists":6,"sensors":1}
//!
//! {"type":"sensors","id":"0.42","deviceId":42,
//!  "lineDetectors":[0,1,0,0,0],"obstacleDistance":37}
//! ```
//!
//! # 宽松解码
//!
//! `sensors` 消息中的 `lineDetectors` / `obstacleDistance` 按字段宽松解析：
//! 缺失或非数值的字段解析为 `None`，不影响同一消息中的其他字段。
//! 信封级错误（非 JSON、未知 `type`、`id`/`deviceId` 类型错误）使整条消息无效。

use crate::ProtocolError;
use crate::flags::{AssistFlags, SensorFlags};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::trace;

/// 控制器 → 仿真器：状态快照
///
/// 每次执行动作（电机 / 灯 / 舵机）都会生成一份新的快照。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotStateMessage {
    /// 会话令牌
    pub id: String,
    /// 设备序列号
    pub device_id: i32,
    /// 产品 ID（常量）
    pub product_id: u32,
    pub motor_turn_ratio: f64,
    /// 左右电机平均速度
    pub motor_speed: f64,
    pub motor_left: f64,
    pub motor_right: f64,
    /// 舵机开合度（0-100）
    pub arm_aperture: f64,
    /// 车灯颜色（0xRRGGBB）
    pub color: u32,
    pub assists: AssistFlags,
    pub sensors: SensorFlags,
}

/// 仿真器 → 控制器：传感器遥测
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSensorsMessage {
    /// 会话令牌（必须与本端会话一致）
    pub id: String,
    /// 设备序列号（必须与本端设备一致）
    pub device_id: i32,
    /// 巡线传感器原始读数（5 个槽位）
    ///
    /// - `None`: 字段缺失或不是数组
    /// - `Some(v)`: 每个元素为数值时是 `Some`，否则是 `None`
    #[serde(
        default,
        deserialize_with = "lenient_readings",
        skip_serializing_if = "Option::is_none"
    )]
    pub line_detectors: Option<Vec<Option<f64>>>,
    /// 障碍物距离原始值（厘米），缺失或非数值时为 `None`
    #[serde(
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub obstacle_distance: Option<f64>,
}

impl RobotSensorsMessage {
    /// 读取指定槽位的数值（越界、缺失、非数值均返回 `None`）
    pub fn line_slot(&self, index: usize) -> Option<f64> {
        self.line_detectors.as_ref().and_then(|slots| slots.get(index).copied().flatten())
    }
}

/// 仿真消息（按 `type` 判别）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RobotSimMessage {
    State(RobotStateMessage),
    Sensors(RobotSensorsMessage),
}

impl RobotSimMessage {
    /// 消息判别字段
    pub fn kind(&self) -> &'static str {
        match self {
            RobotSimMessage::State(_) => "state",
            RobotSimMessage::Sensors(_) => "sensors",
        }
    }

    /// 编码为 UTF-8 JSON 字节
    ///
    /// 对结构良好的消息不会失败（非有限浮点数编码为 `null`）。
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl From<RobotStateMessage> for RobotSimMessage {
    fn from(msg: RobotStateMessage) -> Self {
        RobotSimMessage::State(msg)
    }
}

impl From<RobotSensorsMessage> for RobotSimMessage {
    fn from(msg: RobotSensorsMessage) -> Self {
        RobotSimMessage::Sensors(msg)
    }
}

/// 严格解码：返回具体错误，用于诊断
pub fn try_decode(bytes: &[u8]) -> Result<RobotSimMessage, ProtocolError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ProtocolError::InvalidUtf8)?;
    Ok(serde_json::from_str(text)?)
}

/// 宽松解码：任何失败都返回 `None`
///
/// 调用方必须把 `None` 当作空操作，不得修改任何缓存状态。
pub fn decode(bytes: &[u8]) -> Option<RobotSimMessage> {
    match try_decode(bytes) {
        Ok(msg) => Some(msg),
        Err(e) => {
            trace!("Dropping undecodable payload ({} bytes): {}", bytes.len(), e);
            None
        },
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

fn lenient_readings<'de, D>(deserializer: D) -> Result<Option<Vec<Option<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(items) => Some(items.iter().map(|v| v.as_f64()).collect()),
        _ => None,
    })
}
