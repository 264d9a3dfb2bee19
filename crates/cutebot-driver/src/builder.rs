//! Builder 模式实现
//!
//! 提供链式构造 `SimDriver` 实例的便捷方式。

use crate::config::SimConfig;
use crate::driver::SimDriver;
use crate::error::DriverError;
use crate::session::Session;
use cutebot_link::{HostDevice, SplittableChannel};

/// SimDriver Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use cutebot_driver::SimDriverBuilder;
/// use cutebot_link::{FixedDevice, UdpChannel};
///
/// let channel = UdpChannel::bind("127.0.0.1:0", "127.0.0.1:7878").unwrap();
/// let driver = SimDriverBuilder::new()
///     .topic("robot")
///     .receive_timeout_ms(5)
///     .build(channel, &FixedDevice(42))
///     .unwrap();
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimDriverBuilder {
    config: SimConfig,
    session: Option<Session>,
}

impl SimDriverBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用完整配置（覆盖之前的单项设置）
    pub fn config(mut self, config: SimConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置消息通道名称（默认 `"robot"`）
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.config.topic = topic.into();
        self
    }

    /// 设置 RX 接收超时（毫秒）
    pub fn receive_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.receive_timeout_ms = timeout_ms;
        self
    }

    /// 覆盖宿主设备序列号
    pub fn device_id(mut self, device_id: i32) -> Self {
        self.config.device_id = Some(device_id);
        self
    }

    /// 设置产品 ID
    pub fn product_id(mut self, product_id: u32) -> Self {
        self.config.product_id = product_id;
        self
    }

    /// 使用固定会话（不生成新令牌）
    pub fn session(mut self, session: Session) -> Self {
        self.session = Some(session);
        self
    }

    /// 构建并启动驱动
    pub fn build<C>(self, channel: C, host: &impl HostDevice) -> Result<SimDriver, DriverError>
    where
        C: SplittableChannel + Send + 'static,
        C::Rx: Send + 'static,
        C::Tx: Send + 'static,
    {
        match self.session {
            Some(session) => SimDriver::with_session(channel, session, self.config),
            None => SimDriver::start(channel, host, self.config),
        }
    }
}
