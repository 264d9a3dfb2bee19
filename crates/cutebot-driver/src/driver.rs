//! 仿真驱动（对外 API）
//!
//! 提供 `SimDriver` 结构体，封装会话、RX 线程与状态同步细节。
//!
//! # 线程模型
//!
//! - RX 线程：独占通道的只读半边，运行 [`rx_loop`](crate::pipeline::rx_loop)
//! - 调用方线程：每次动作在 TX 锁内更新下发状态、生成快照并发送，
//!   保证快照的发送顺序与状态修改顺序一致
//! - 查询：无锁读取 ArcSwap 中的缓存快照，立即返回

use crate::config::SimConfig;
use crate::emitter::{CommandedState, StateEmitter};
use crate::error::DriverError;
use crate::metrics::MetricsSnapshot;
use crate::pipeline::{InboundOutcome, handle_packet};
use crate::session::{Session, SessionManager};
use crate::state::{SensorCache, SimContext};
use cutebot_link::{FixedDevice, HostDevice, SimChannel, SimPacket, SplittableChannel, TxChannel};
use cutebot_protocol::{RobotSimMessage, RobotStateMessage, SensorFlags, SensorKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{JoinHandle, spawn};
use tracing::{error, info, trace, warn};

/// Cutebot 仿真驱动
pub struct SimDriver {
    config: SimConfig,
    session: Arc<Session>,
    ctx: Arc<SimContext>,
    emitter: StateEmitter,
    /// TX 半边（发送与状态更新在同一把锁内完成）
    tx: Mutex<Box<dyn TxChannel + Send>>,
    rx_thread: Option<JoinHandle<()>>,
    is_running: Arc<AtomicBool>,
}

impl SimDriver {
    /// 初始化会话并启动 RX 线程
    ///
    /// 这是唯一的初始化入口：生成新令牌、读取宿主设备序列号
    /// （`config.device_id` 存在时优先使用），之后会话不再改变。
    pub fn start<C>(channel: C, host: &impl HostDevice, config: SimConfig) -> Result<Self, DriverError>
    where
        C: SplittableChannel + Send + 'static,
        C::Rx: Send + 'static,
        C::Tx: Send + 'static,
    {
        config.validate()?;
        let sessions = SessionManager::new();
        let session = match config.device_id {
            Some(device_id) => sessions.initialize(&FixedDevice(device_id))?,
            None => sessions.initialize(host)?,
        };
        Self::spawn(channel, session, config)
    }

    /// 使用已知会话启动（固定令牌，用于测试与回放）
    pub fn with_session<C>(channel: C, session: Session, config: SimConfig) -> Result<Self, DriverError>
    where
        C: SplittableChannel + Send + 'static,
        C::Rx: Send + 'static,
        C::Tx: Send + 'static,
    {
        config.validate()?;
        let sessions = SessionManager::new();
        let session = sessions.install(session)?;
        Self::spawn(channel, session, config)
    }

    fn spawn<C>(
        mut channel: C,
        session: Arc<Session>,
        config: SimConfig,
    ) -> Result<Self, DriverError>
    where
        C: SplittableChannel + Send + 'static,
        C::Rx: Send + 'static,
        C::Tx: Send + 'static,
    {
        // 接收超时在拆分前设置，RX 半边继承
        channel.set_receive_timeout(config.receive_timeout());
        let (rx, tx) = channel.split()?;

        let ctx = Arc::new(SimContext::new());
        let is_running = Arc::new(AtomicBool::new(true));
        let emitter = StateEmitter::new(session.clone(), config.product_id, config.assist_flags());

        let ctx_clone = ctx.clone();
        let session_clone = session.clone();
        let topic = config.topic.clone();
        let running_clone = is_running.clone();
        let rx_thread = spawn(move || {
            crate::pipeline::rx_loop(rx, ctx_clone, session_clone, topic, running_clone);
        });

        info!("Simulator driver started on topic {:?}", config.topic);

        Ok(Self {
            config,
            session,
            ctx,
            emitter,
            tx: Mutex::new(Box::new(tx)),
            rx_thread: Some(rx_thread),
            is_running,
        })
    }

    /// 当前会话
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// 获取传感器缓存快照（无锁，立即返回，可能是哨兵值或过期值）
    pub fn sensors(&self) -> SensorCache {
        self.ctx.sensors()
    }

    /// 获取指标快照
    pub fn metrics(&self) -> MetricsSnapshot {
        self.ctx.metrics.snapshot()
    }

    /// RX 线程是否仍在运行
    pub fn is_healthy(&self) -> bool {
        self.is_running.load(Ordering::Acquire)
            && self.rx_thread.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// 标记传感器已被使用（粘滞，不触发发送）
    pub fn use_sensor(&self, kind: SensorKind) {
        self.emitter.use_sensor(kind);
    }

    pub fn sensors_used(&self) -> SensorFlags {
        self.emitter.sensors_used()
    }

    /// 当前下发状态
    pub fn commanded(&self) -> CommandedState {
        self.emitter.commanded()
    }

    /// 设置左右电机速度并发送快照
    pub fn set_motors(&self, left: f64, right: f64) -> Result<(), DriverError> {
        self.emit(|e| e.set_motors(left, right))
    }

    /// 设置车灯颜色并发送快照
    pub fn set_headlight(&self, color: u32) -> Result<(), DriverError> {
        self.emit(|e| e.set_color(color))
    }

    /// 设置舵机开合度（0-100）并发送快照
    pub fn set_arm_aperture(&self, aperture: f64) -> Result<(), DriverError> {
        self.emit(|e| e.set_arm_aperture(aperture))
    }

    /// 以当前状态重发一次快照
    pub fn resend(&self) -> Result<(), DriverError> {
        self.emit(|e| e.snapshot())
    }

    /// 在调用方线程处理一个入站数据包（单线程嵌入场景）
    pub fn handle_packet(&self, packet: &SimPacket) -> InboundOutcome {
        handle_packet(&self.ctx, &self.session, &self.config.topic, packet)
    }

    fn emit(&self, build: impl FnOnce(&StateEmitter) -> RobotStateMessage) -> Result<(), DriverError> {
        let mut tx = self.tx.lock().map_err(|_| DriverError::PoisonedLock)?;
        let msg = build(&self.emitter);
        let payload = RobotSimMessage::from(msg).encode()?;

        match tx.send(&self.config.topic, &payload) {
            Ok(()) => {
                self.ctx.metrics.tx_states_total.fetch_add(1, Ordering::Relaxed);
                trace!("State snapshot sent ({} bytes)", payload.len());
                Ok(())
            },
            Err(e) => {
                self.ctx.metrics.tx_errors.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to send state snapshot: {}", e);
                Err(e.into())
            },
        }
    }
}

impl Drop for SimDriver {
    fn drop(&mut self) {
        // 通知 RX 线程退出（最多等待一个接收超时周期）
        self.is_running.store(false, Ordering::Release);

        if let Some(handle) = self.rx_thread.take()
            && handle.join().is_err()
        {
            error!("RX thread panicked during shutdown");
        }
        trace!("Simulator driver dropped");
    }
}
