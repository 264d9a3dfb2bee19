//! 驱动层模块
//!
//! 本模块提供 Cutebot 仿真链路的驱动功能，包括：
//! - 会话管理（令牌 + 设备序列号，防止共享通道上的实例串扰）
//! - RX 线程：入站上报的解码、校验与缓存更新
//! - 传感器缓存（ArcSwap 无锁读取）
//! - 状态快照发送（每次动作发送，传感器标志粘滞）
//! - 链路指标
//!
//! # 使用场景
//!
//! 适用于需要直接访问原始缓存值或自定义发送时机的场景。
//! 大多数用户应该使用 `cutebot-client` 提供的 `Cutebot` 接口。

mod builder;
pub mod config;
mod driver;
pub mod emitter;
mod error;
pub mod metrics;
pub mod pipeline;
pub mod session;
pub mod state;

pub use builder::SimDriverBuilder;
pub use config::SimConfig;
pub use driver::SimDriver;
pub use emitter::{CommandedState, StateEmitter};
pub use error::DriverError;
pub use metrics::{MetricsSnapshot, SimMetrics};
pub use pipeline::{InboundOutcome, handle_packet, handle_payload, rx_loop};
pub use session::{Session, SessionManager};
pub use state::{LINE_ABSENT, LINE_DETECTED, SensorCache, SimContext};
