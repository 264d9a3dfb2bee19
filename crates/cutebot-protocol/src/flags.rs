//! 位掩码定义
//!
//! `state` 消息中的 `assists` 与 `sensors` 字段都是位掩码，
//! 使用 bilge 位域表示，线上格式为整数。

use bilge::prelude::*;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::{BitOr, BitOrAssign};

/// 传感器种类
///
/// 数值即 [`SensorFlags`] 中对应的位。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, num_enum::IntoPrimitive)]
#[repr(u8)]
pub enum SensorKind {
    /// 巡线传感器
    LineDetector = 1 << 0,
    /// 超声波测距
    Sonar = 1 << 1,
}

/// 传感器使用位掩码（`sensors` 字段）
///
/// 告知仿真器本会话中哪些传感器被程序查询过。
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorFlags {
    pub line_detector: bool, // Bit 0
    pub sonar: bool,         // Bit 1
    pub reserved: u6,        // Bit 2-7: 保留
}

impl SensorFlags {
    /// 空掩码
    pub fn none() -> Self {
        Self::from(0u8)
    }

    /// 是否包含指定传感器
    pub fn contains(self, kind: SensorKind) -> bool {
        u8::from(self) & u8::from(kind) != 0
    }

    /// 原始位值
    pub fn bits(self) -> u8 {
        u8::from(self)
    }
}

impl From<SensorKind> for SensorFlags {
    fn from(kind: SensorKind) -> Self {
        Self::from(u8::from(kind))
    }
}

impl BitOr for SensorFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::from(u8::from(self) | u8::from(rhs))
    }
}

impl BitOr<SensorKind> for SensorFlags {
    type Output = Self;

    fn bitor(self, rhs: SensorKind) -> Self {
        self | Self::from(rhs)
    }
}

impl BitOrAssign<SensorKind> for SensorFlags {
    fn bitor_assign(&mut self, rhs: SensorKind) {
        *self = *self | rhs;
    }
}

impl Serialize for SensorFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*self))
    }
}

impl<'de> Deserialize<'de> for SensorFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from)
    }
}

/// 机器人辅助功能位掩码（`assists` 字段）
///
/// 注意：`display` 位于 Bit 2（数值 4）。
#[bitsize(8)]
#[derive(FromBits, DebugBits, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssistFlags {
    pub line_following: bool, // Bit 0
    pub speed: bool,          // Bit 1
    pub display: bool,        // Bit 2
    pub reserved: u5,         // Bit 3-7: 保留
}

impl AssistFlags {
    /// Cutebot 默认辅助功能：速度 + 显示
    pub fn cutebot_default() -> Self {
        let mut flags = Self::from(0u8);
        flags.set_speed(true);
        flags.set_display(true);
        flags
    }

    /// 原始位值
    pub fn bits(self) -> u8 {
        u8::from(self)
    }
}

impl Serialize for AssistFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*self))
    }
}

impl<'de> Deserialize<'de> for AssistFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u8::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_kind_bits() {
        assert_eq!(u8::from(SensorKind::LineDetector), 1);
        assert_eq!(u8::from(SensorKind::Sonar), 2);
    }

    #[test]
    fn test_sensor_flags_accumulate() {
        let mut flags = SensorFlags::none();
        assert_eq!(flags.bits(), 0);

        flags |= SensorKind::Sonar;
        assert!(flags.sonar());
        assert!(!flags.line_detector());
        assert_eq!(flags.bits(), 2);

        flags |= SensorKind::LineDetector;
        flags |= SensorKind::Sonar;
        assert_eq!(flags.bits(), 3);
        assert!(flags.contains(SensorKind::LineDetector));
    }

    #[test]
    fn test_assist_default_bits() {
        let flags = AssistFlags::cutebot_default();
        assert_eq!(flags.bits(), 6);
        assert!(flags.speed());
        assert!(flags.display());
        assert!(!flags.line_following());
    }

    #[test]
    fn test_flags_serialize_as_integer() {
        let flags = SensorFlags::from(SensorKind::LineDetector) | SensorKind::Sonar;
        assert_eq!(serde_json::to_string(&flags).unwrap(), "3");

        let parsed: AssistFlags = serde_json::from_str("6").unwrap();
        assert_eq!(parsed, AssistFlags::cutebot_default());
    }
}
