//! 执行器选择枚举

/// 车灯选择
///
/// 仿真器只有一个通用车灯，选择项不影响下发内容。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, num_enum::TryFromPrimitive, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RgbLights {
    /// 右侧车灯
    Right = 0,
    /// 左侧车灯
    Left = 1,
    /// 全部车灯
    All = 3,
}

/// 舵机选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, num_enum::TryFromPrimitive, num_enum::IntoPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ServoList {
    S1 = 0,
    S2 = 1,
}

/// 舵机角度（0-180°）换算为开合度（0-100），超出范围的角度先限幅
pub fn servo_angle_to_aperture(angle: f64) -> f64 {
    let angle = if angle.is_finite() { angle.clamp(0.0, 180.0) } else { 0.0 };
    angle / 180.0 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servo_angle_to_aperture() {
        assert_eq!(servo_angle_to_aperture(0.0), 0.0);
        assert_eq!(servo_angle_to_aperture(90.0), 50.0);
        assert_eq!(servo_angle_to_aperture(180.0), 100.0);
        assert_eq!(servo_angle_to_aperture(270.0), 100.0);
        assert_eq!(servo_angle_to_aperture(-10.0), 0.0);
    }

    #[test]
    fn test_light_values() {
        assert_eq!(u8::from(RgbLights::Right), 0);
        assert_eq!(u8::from(RgbLights::Left), 1);
        assert_eq!(RgbLights::try_from(3u8).unwrap(), RgbLights::All);
        assert!(RgbLights::try_from(2u8).is_err());
    }
}
