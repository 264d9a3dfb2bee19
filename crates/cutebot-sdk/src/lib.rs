//! Cutebot SDK - 仿真小车 Rust SDK
//!
//! 控制器与仿真器之间的状态同步：下发电机 / 车灯 / 舵机状态快照，
//! 接收巡线与超声波上报并缓存，供上层随时查询。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **协议层** (`protocol`): `state` / `sensors` 消息与 JSON 编解码
//! - **链路层** (`link`): topic 数据包通道（内存通道、UDP）
//! - **驱动层** (`driver`): 会话、RX 线程、传感器缓存、状态快照
//! - **客户端层** (`client`): 积木块风格的动作与查询
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use cutebot_sdk::prelude::*;
//!
//! # fn main() -> Result<(), DriverError> {
//! let channel = UdpChannel::bind("0.0.0.0:0", "127.0.0.1:7001")?;
//! let bot = Cutebot::connect(channel, &FixedDevice(42), SimConfig::default())?;
//! bot.forward()?;
//! if bot.tracking(TrackingState::BothLine) {
//!     println!("{} cm", bot.ultrasonic(SonarUnit::Centimeters));
//! }
//! # Ok(())
//! # }
//! ```

pub use cutebot_client as client;
pub use cutebot_driver as driver;
pub use cutebot_link as link;
pub use cutebot_protocol as protocol;

pub mod logging;
pub mod prelude;

// --- 用户以此为界 ---

pub use cutebot_link::{LinkError, SimChannel, SimPacket};
pub use cutebot_protocol::ProtocolError;

pub use cutebot_driver::{DriverError, SimConfig, SimDriver, SimDriverBuilder};

// 客户端层（推荐入口）
pub use cutebot_client::{Cutebot, Observer, RgbLights, ServoList, SonarUnit, TrackingState};
