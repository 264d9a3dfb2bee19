//! 会话管理
//!
//! 会话 = (令牌, 设备序列号)，在初始化时创建一次，之后不可变。
//! 所有入站上报都必须先通过 [`Session::validate`]，才能修改传感器缓存，
//! 以避免同一传输通道上多个实例之间的串扰。

use crate::error::DriverError;
use cutebot_link::HostDevice;
use cutebot_protocol::RobotSensorsMessage;
use rand::Rng;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// 会话标识（不可变）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    device_id: i32,
}

impl Session {
    /// 使用指定令牌创建会话
    pub fn new(token: impl Into<String>, device_id: i32) -> Self {
        Self {
            token: token.into(),
            device_id,
        }
    }

    /// 生成新令牌并读取宿主设备序列号
    pub fn generate(host: &impl HostDevice) -> Self {
        let token = format!("{}", rand::thread_rng().r#gen::<f64>());
        Self::new(token, host.device_serial_number())
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn device_id(&self) -> i32 {
        self.device_id
    }

    /// 入站上报是否属于本会话
    ///
    /// 设备序列号与令牌必须同时匹配，无副作用。
    pub fn validate(&self, report: &RobotSensorsMessage) -> bool {
        report.device_id == self.device_id && report.id == self.token
    }
}

/// 会话管理器
///
/// 持有唯一的会话。`initialize` 只能成功一次，重复调用返回
/// [`DriverError::AlreadyInitialized`]，已有会话保持不变。
#[derive(Debug, Default)]
pub struct SessionManager {
    session: OnceLock<Arc<Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初始化会话
    pub fn initialize(&self, host: &impl HostDevice) -> Result<Arc<Session>, DriverError> {
        self.install(Session::generate(host))
    }

    /// 安装一个已构造的会话（测试或固定令牌场景）
    pub fn install(&self, session: Session) -> Result<Arc<Session>, DriverError> {
        let session = Arc::new(session);
        self.session.set(session.clone()).map_err(|_| DriverError::AlreadyInitialized)?;
        info!(
            "Simulator session started: id={}, device_id={}",
            session.token(),
            session.device_id()
        );
        Ok(session)
    }

    /// 当前会话
    pub fn session(&self) -> Result<Arc<Session>, DriverError> {
        self.session.get().cloned().ok_or(DriverError::NotInitialized)
    }
}
