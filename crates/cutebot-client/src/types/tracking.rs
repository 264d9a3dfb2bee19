//! 巡线状态分类
//!
//! 对缓存中取反后的左右读数（0 = 有线，1 = 无线）做四分类：
//!
//! | left | right | 状态 |
//! |---|---|---|
//! | 0 | 0 | `BothLine` |
//! | 1 | 0 | `RightOnly` |
//! | 0 | 1 | `LeftOnly` |
//! | 1 | 1 | `NeitherLine` |
//!
//! 分类结果只由缓存推导，从不存储。

use cutebot_driver::{LINE_DETECTED, SensorCache};
use std::fmt;

/// 巡线状态
///
/// 数值与积木块枚举值一致（0-3）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, num_enum::TryFromPrimitive, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum TrackingState {
    /// ● ● 左右都在线上
    BothLine = 0,
    /// ◌ ● 只有右侧在线上
    RightOnly = 1,
    /// ● ◌ 只有左侧在线上
    LeftOnly = 2,
    /// ◌ ◌ 左右都不在线上
    NeitherLine = 3,
}

impl TrackingState {
    pub const ALL: [TrackingState; 4] = [
        TrackingState::BothLine,
        TrackingState::RightOnly,
        TrackingState::LeftOnly,
        TrackingState::NeitherLine,
    ];

    /// 从缓存推导；任一侧仍为哨兵值时返回 `None`
    pub fn from_cache(cache: &SensorCache) -> Option<Self> {
        cache.has_line_data().then(|| classify(cache.line_left, cache.line_right))
    }

    /// 左侧是否在线上
    pub fn left_on_line(self) -> bool {
        matches!(self, TrackingState::BothLine | TrackingState::LeftOnly)
    }

    /// 右侧是否在线上
    pub fn right_on_line(self) -> bool {
        matches!(self, TrackingState::BothLine | TrackingState::RightOnly)
    }
}

impl fmt::Display for TrackingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = match self {
            TrackingState::BothLine => "● ●",
            TrackingState::RightOnly => "◌ ●",
            TrackingState::LeftOnly => "● ◌",
            TrackingState::NeitherLine => "◌ ◌",
        };
        f.write_str(glyph)
    }
}

/// 对取反后的左右读数分类
///
/// `0` 表示检测到线，其他任何值都视为未检测到线。
pub fn classify(left: f64, right: f64) -> TrackingState {
    match (left == LINE_DETECTED, right == LINE_DETECTED) {
        (true, true) => TrackingState::BothLine,
        (false, true) => TrackingState::RightOnly,
        (true, false) => TrackingState::LeftOnly,
        (false, false) => TrackingState::NeitherLine,
    }
}
