//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use cutebot_sdk::prelude::*;
//! ```

// 客户端层
pub use crate::client::types::*;
pub use crate::client::{Cutebot, Observer};

// 链路层（常用 Trait 与通道）
pub use crate::link::{FixedDevice, HostDevice, MemoryChannel, SimChannel, UdpChannel};

// 驱动层
pub use crate::driver::{SimConfig, SimDriver, SimDriverBuilder};

// 错误类型
pub use crate::driver::DriverError;
pub use crate::link::LinkError;
pub use crate::protocol::ProtocolError;
