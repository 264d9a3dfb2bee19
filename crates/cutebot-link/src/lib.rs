//! # Cutebot Link Layer
//!
//! 仿真消息通道抽象层。
//!
//! 传输本身（仿真器宿主、物理驱动）属于外部协作方，本 crate 只定义：
//! - [`SimChannel`]：按 topic 收发字节的尽力而为通道
//! - [`HostDevice`]：宿主设备标识（会话初始化时读取）
//! - [`MemoryChannel`]：进程内回环通道（测试与嵌入使用）
//! - [`UdpChannel`]：基于 UDP 数据报的通道

use std::time::Duration;
use thiserror::Error;

pub mod memory;
pub mod udp;

pub use memory::{MemoryChannel, MemoryRxChannel, MemoryTxChannel};
pub use udp::{UdpChannel, UdpRxChannel, UdpTxChannel};

/// 通道上收到的一个数据包
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimPacket {
    /// 消息通道名称（如 `"robot"`）
    pub topic: String,
    /// 原始负载（UTF-8 JSON）
    pub payload: Vec<u8>,
}

impl SimPacket {
    pub fn new(topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

/// 通道层统一错误类型
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Device Error: {0}")]
    Device(#[from] LinkDeviceError),
    #[error("Read timeout")]
    Timeout,
    #[error("Channel closed")]
    Closed,
}

impl LinkError {
    /// 是否为致命错误（RX 线程应当退出）
    pub fn is_fatal(&self) -> bool {
        match self {
            LinkError::Closed => true,
            LinkError::Device(e) => e.is_fatal(),
            LinkError::Io(_) | LinkError::Timeout => false,
        }
    }
}

/// 设备/后端错误的结构化分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDeviceErrorKind {
    Unknown,
    /// 数据包格式错误（可恢复，丢弃即可）
    InvalidFrame,
    /// 后端不可用（不可恢复）
    Backend,
}

/// 结构化设备错误
#[derive(Error, Debug, Clone)]
#[error("{kind:?}: {message}")]
pub struct LinkDeviceError {
    pub kind: LinkDeviceErrorKind,
    pub message: String,
}

impl LinkDeviceError {
    pub fn new(kind: LinkDeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.kind, LinkDeviceErrorKind::Backend)
    }
}

impl From<&str> for LinkDeviceError {
    fn from(message: &str) -> Self {
        Self::new(LinkDeviceErrorKind::Unknown, message)
    }
}

/// 双向消息通道
///
/// 投递语义：尽力而为，不保证到达、顺序与延迟。
pub trait SimChannel {
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError>;
    fn receive(&mut self) -> Result<SimPacket, LinkError>;
    fn set_receive_timeout(&mut self, _timeout: Duration) {}
    fn receive_timeout(&mut self, timeout: Duration) -> Result<SimPacket, LinkError> {
        self.set_receive_timeout(timeout);
        self.receive()
    }
    fn try_receive(&mut self) -> Result<Option<SimPacket>, LinkError> {
        match self.receive_timeout(Duration::ZERO) {
            Ok(packet) => Ok(Some(packet)),
            Err(LinkError::Timeout) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// 只读半边（RX 线程持有）
pub trait RxChannel {
    fn receive(&mut self) -> Result<SimPacket, LinkError>;
}

/// 只写半边（发送方持有）
pub trait TxChannel {
    fn send(&mut self, topic: &str, payload: &[u8]) -> Result<(), LinkError>;
}

/// 可拆分为独立 RX/TX 半边的通道
pub trait SplittableChannel: SimChannel {
    type Rx: RxChannel;
    type Tx: TxChannel;
    fn split(self) -> Result<(Self::Rx, Self::Tx), LinkError>;
}

/// 宿主设备标识
pub trait HostDevice {
    /// 设备序列号（会话的 `deviceId`）
    fn device_serial_number(&self) -> i32;
}

/// 固定序列号的宿主设备
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDevice(pub i32);

impl HostDevice for FixedDevice {
    fn device_serial_number(&self) -> i32 {
        self.0
    }
}
