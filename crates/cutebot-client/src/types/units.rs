//! 超声波距离单位换算
//!
//! 缓存中存储的是原始厘米值。换算结果向下取整；
//! 哨兵值 `-1` 经换算后仍为 `-1`（`floor(-0.3937) = -1`），表示尚无读数。

use cutebot_protocol::CM_TO_INCH;
use std::fmt;

/// 超声波距离单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SonarUnit {
    #[default]
    Centimeters,
    Inches,
}

impl SonarUnit {
    pub fn suffix(self) -> &'static str {
        match self {
            SonarUnit::Centimeters => "cm",
            SonarUnit::Inches => "in",
        }
    }
}

impl fmt::Display for SonarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

/// 原始厘米值换算为指定单位（向下取整）
#[inline]
pub fn convert(raw_cm: f64, unit: SonarUnit) -> i32 {
    let value = match unit {
        SonarUnit::Centimeters => raw_cm,
        SonarUnit::Inches => raw_cm * CM_TO_INCH,
    };
    value.floor() as i32
}
