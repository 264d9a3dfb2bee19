//! 状态快照发送器
//!
//! 记录当前下发的电机速度、车灯颜色、舵机开合度，并在每次动作时生成完整的
//! `state` 快照。
//!
//! # 发送策略
//!
//! - **不去重**：每次动作都生成新快照，即使数值与上次相同。
//!   下游渲染端在快照之间不保存状态，依赖连续的快照刷新画面。
//! - **传感器标志粘滞**：`sensors` 是会话开始以来所有被查询过的传感器的按位或，
//!   一旦置位在会话生命周期内不会清除。
//! - `motor_speed` 由左右速度求平均得到，不可单独设置。

use crate::session::Session;
use arc_swap::ArcSwap;
use cutebot_protocol::{
    AssistFlags, MOTOR_SPEED_MAX, MOTOR_SPEED_MIN, RobotStateMessage, SensorFlags, SensorKind,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// 当前下发的执行器状态
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CommandedState {
    pub motor_left: f64,
    pub motor_right: f64,
    pub turn_ratio: f64,
    /// 舵机开合度（0-100）
    pub arm_aperture: f64,
    /// 车灯颜色（0xRRGGBB）
    pub color: u32,
}

impl CommandedState {
    /// 左右电机平均速度
    pub fn motor_speed(&self) -> f64 {
        (self.motor_left + self.motor_right) / 2.0
    }
}

/// 电机速度限幅，非有限值视为 0
pub fn clamp_motor_speed(speed: f64) -> f64 {
    if speed.is_finite() {
        speed.clamp(MOTOR_SPEED_MIN, MOTOR_SPEED_MAX)
    } else {
        0.0
    }
}

/// 状态快照发送器
pub struct StateEmitter {
    session: Arc<Session>,
    product_id: u32,
    assists: AssistFlags,
    sensors_used: AtomicU8,
    commanded: ArcSwap<CommandedState>,
}

impl StateEmitter {
    pub fn new(session: Arc<Session>, product_id: u32, assists: AssistFlags) -> Self {
        Self {
            session,
            product_id,
            assists,
            sensors_used: AtomicU8::new(SensorFlags::none().bits()),
            commanded: ArcSwap::from_pointee(CommandedState::default()),
        }
    }

    /// 标记传感器已被使用（粘滞）
    ///
    /// 只影响后续快照的 `sensors` 字段，本身不触发发送。
    pub fn use_sensor(&self, kind: SensorKind) {
        self.sensors_used.fetch_or(u8::from(kind), Ordering::AcqRel);
    }

    /// 会话开始以来累计使用过的传感器
    pub fn sensors_used(&self) -> SensorFlags {
        SensorFlags::from(self.sensors_used.load(Ordering::Acquire))
    }

    /// 当前下发状态
    pub fn commanded(&self) -> CommandedState {
        **self.commanded.load()
    }

    /// 设置左右电机速度，返回新快照
    pub fn set_motors(&self, left: f64, right: f64) -> RobotStateMessage {
        let (left, right) = (clamp_motor_speed(left), clamp_motor_speed(right));
        self.update(|s| CommandedState {
            motor_left: left,
            motor_right: right,
            ..s
        })
    }

    /// 设置车灯颜色，返回新快照
    pub fn set_color(&self, color: u32) -> RobotStateMessage {
        self.update(|s| CommandedState { color, ..s })
    }

    /// 设置舵机开合度，返回新快照
    pub fn set_arm_aperture(&self, aperture: f64) -> RobotStateMessage {
        let aperture = if aperture.is_finite() { aperture.clamp(0.0, 100.0) } else { 0.0 };
        self.update(|s| CommandedState {
            arm_aperture: aperture,
            ..s
        })
    }

    /// 以当前状态生成快照（不修改状态）
    pub fn snapshot(&self) -> RobotStateMessage {
        self.build(&self.commanded())
    }

    fn update(&self, f: impl Fn(CommandedState) -> CommandedState) -> RobotStateMessage {
        // rcu 返回旧值；f 是确定性的，重新计算即得到本次写入的新值
        let prev = self.commanded.rcu(|old| Arc::new(f(**old)));
        self.build(&f(*prev))
    }

    fn build(&self, state: &CommandedState) -> RobotStateMessage {
        RobotStateMessage {
            id: self.session.token().to_string(),
            device_id: self.session.device_id(),
            product_id: self.product_id,
            motor_turn_ratio: state.turn_ratio,
            motor_speed: state.motor_speed(),
            motor_left: state.motor_left,
            motor_right: state.motor_right,
            arm_aperture: state.arm_aperture,
            color: state.color,
            assists: self.assists,
            sensors: self.sensors_used(),
        }
    }
}
