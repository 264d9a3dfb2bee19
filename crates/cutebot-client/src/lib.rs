//! # Cutebot Client
//!
//! Cutebot 小车的用户友好接口：
//! - [`Cutebot`]：动作（电机、车灯、舵机）与带传感器标记的查询
//! - [`Observer`]：纯只读查询，可克隆到其他线程
//! - 强类型枚举与单位（[`TrackingState`]、[`SonarUnit`]、[`RgbLights`]、[`ServoList`]）
//!
//! 如果需要直接控制会话或数据包，可以使用 `cutebot-driver`。

pub mod cutebot;
pub mod observer;
pub mod types;

pub use cutebot::{CRUISE_SPEED, Cutebot};
pub use observer::Observer;
pub use types::*;

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn classify_covers_boolean_table(left_line in any::<bool>(), right_line in any::<bool>()) {
            let left = if left_line { 0.0 } else { 1.0 };
            let right = if right_line { 0.0 } else { 1.0 };
            let state = classify(left, right);
            prop_assert_eq!(state.left_on_line(), left_line);
            prop_assert_eq!(state.right_on_line(), right_line);
        }

        #[test]
        fn centimeters_is_floor(raw in 0.0f64..10_000.0) {
            prop_assert_eq!(convert(raw, SonarUnit::Centimeters), raw.floor() as i32);
        }

        #[test]
        fn inches_never_exceed_centimeters(raw in 0.0f64..10_000.0) {
            prop_assert!(convert(raw, SonarUnit::Inches) <= convert(raw, SonarUnit::Centimeters));
        }
    }
}
