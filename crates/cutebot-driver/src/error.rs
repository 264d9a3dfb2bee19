//! 驱动层错误类型定义

use cutebot_link::LinkError;
use cutebot_protocol::ProtocolError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 通道错误
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    /// 协议编码错误
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// 会话已初始化（不会重新生成令牌）
    #[error("Session already initialized")]
    AlreadyInitialized,

    /// 会话尚未初始化
    #[error("Session not initialized")]
    NotInitialized,

    /// 锁被毒化（线程 panic）
    #[error("Poisoned lock (thread panic)")]
    PoisonedLock,

    /// 配置错误
    #[error("Config error: {0}")]
    Config(String),
}
