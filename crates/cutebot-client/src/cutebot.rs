//! Cutebot 高层接口
//!
//! 对应积木块的动作与查询。每个动作都会立即发送一次完整的状态快照；
//! 查询只读取缓存，并把对应传感器标记为“已使用”（粘滞，不触发发送）。

use std::sync::Arc;

use crate::observer::Observer;
use crate::types::*;
use cutebot_driver::{DriverError, SimConfig, SimDriver};
use cutebot_link::{HostDevice, SplittableChannel};
use cutebot_protocol::SensorKind;
use tracing::debug;

/// 前进 / 后退 / 转向使用的固定速度
pub const CRUISE_SPEED: f64 = 80.0;

/// Cutebot 小车
pub struct Cutebot {
    driver: Arc<SimDriver>,
    observer: Observer,
}

impl Cutebot {
    /// 启动驱动并建立会话
    pub fn connect<C>(channel: C, host: &impl HostDevice, config: SimConfig) -> Result<Self, DriverError>
    where
        C: SplittableChannel + Send + 'static,
        C::Rx: Send + 'static,
        C::Tx: Send + 'static,
    {
        Ok(Self::from_driver(SimDriver::start(channel, host, config)?))
    }

    /// 包装一个已启动的驱动
    pub fn from_driver(driver: SimDriver) -> Self {
        let driver = Arc::new(driver);
        let observer = Observer::new(driver.clone());
        Cutebot { driver, observer }
    }

    /// 只读观察器（可克隆到其他线程）
    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// 底层驱动（诊断与指标）
    pub fn driver(&self) -> &SimDriver {
        &self.driver
    }

    /// 设置左右电机速度，各自限幅到 [-100, 100]
    pub fn motors(&self, left: f64, right: f64) -> Result<(), DriverError> {
        debug!("motors({}, {})", left, right);
        self.driver.set_motors(left, right)
    }

    pub fn forward(&self) -> Result<(), DriverError> {
        self.motors(CRUISE_SPEED, CRUISE_SPEED)
    }

    pub fn backforward(&self) -> Result<(), DriverError> {
        self.motors(-CRUISE_SPEED, -CRUISE_SPEED)
    }

    pub fn turnleft(&self) -> Result<(), DriverError> {
        self.motors(0.0, CRUISE_SPEED)
    }

    pub fn turnright(&self) -> Result<(), DriverError> {
        self.motors(CRUISE_SPEED, 0.0)
    }

    pub fn stopcar(&self) -> Result<(), DriverError> {
        self.motors(0.0, 0.0)
    }

    /// 设置车灯颜色（0xRRGGBB）
    ///
    /// 仿真器只有一个通用车灯，`light` 不影响下发内容。
    pub fn color_light(&self, light: RgbLights, color: u32) -> Result<(), DriverError> {
        debug!("color_light({:?}, {:#08x})", light, color);
        self.driver.set_headlight(color & 0x00ff_ffff)
    }

    /// 设置舵机角度（0-180°），换算为开合度下发
    pub fn set_servo(&self, servo: ServoList, angle: f64) -> Result<(), DriverError> {
        debug!("set_servo({:?}, {})", servo, angle);
        self.driver.set_arm_aperture(servo_angle_to_aperture(angle))
    }

    /// 巡线状态是否与目标一致（标记巡线传感器为已使用）
    pub fn tracking(&self, target: TrackingState) -> bool {
        self.driver.use_sensor(SensorKind::LineDetector);
        self.observer.matches_tracking(target)
    }

    /// 超声波距离（标记超声波传感器为已使用）
    pub fn ultrasonic(&self, unit: SonarUnit) -> i32 {
        self.driver.use_sensor(SensorKind::Sonar);
        self.observer.distance(unit)
    }
}
