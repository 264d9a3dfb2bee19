//! 客户端类型

pub mod actuators;
pub mod tracking;
pub mod units;

pub use actuators::{RgbLights, ServoList, servo_angle_to_aperture};
pub use tracking::{TrackingState, classify};
pub use units::{SonarUnit, convert};
