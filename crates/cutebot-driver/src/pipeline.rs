//! 入站处理流水线
//!
//! 负责 RX 线程的数据包接收、解码、会话校验和缓存更新。
//!
//! 每个数据包都完整处理后才处理下一个（run-to-completion）。处理顺序：
//!
//! ```text
//! SimPacket ─→ topic 过滤 ─→ decode ─→ 判别 type ─→ Session::validate ─→ SimContext::apply_report
//!               │ Ignored     │ Malformed  │ Ignored(state)   │ Rejected           │ Applied
//! ```
//!
//! 任何一步失败都只是丢弃该数据包，缓存保持原值，不会向上层返回错误。

use crate::session::Session;
use crate::state::SimContext;
use cutebot_link::{LinkError, RxChannel, SimPacket};
use cutebot_protocol::{RobotSimMessage, decode};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, trace, warn};

/// 单个入站数据包的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InboundOutcome {
    /// 通过校验，已写入缓存
    Applied,
    /// 会话令牌或设备序列号不匹配
    Rejected,
    /// 非本 topic，或是 `state` 消息（回显）
    Ignored,
    /// 无法解码
    Malformed,
}

/// 处理一个负载（已确认 topic）
pub fn handle_payload(ctx: &SimContext, session: &Session, payload: &[u8]) -> InboundOutcome {
    let outcome = match decode(payload) {
        None => {
            warn!("Dropping malformed simulator payload ({} bytes)", payload.len());
            InboundOutcome::Malformed
        },
        Some(RobotSimMessage::State(_)) => {
            trace!("Ignoring state echo");
            InboundOutcome::Ignored
        },
        Some(RobotSimMessage::Sensors(report)) => {
            if session.validate(&report) {
                ctx.apply_report(&report);
                trace!(
                    "Sensor report applied: lines={:?}, distance={:?}",
                    report.line_detectors, report.obstacle_distance
                );
                InboundOutcome::Applied
            } else {
                debug!(
                    "Discarding sensor report for another session: id={}, device_id={}",
                    report.id, report.device_id
                );
                InboundOutcome::Rejected
            }
        },
    };
    record_outcome(ctx, outcome);
    outcome
}

/// 处理一个数据包
pub fn handle_packet(
    ctx: &SimContext,
    session: &Session,
    topic: &str,
    packet: &SimPacket,
) -> InboundOutcome {
    ctx.metrics.rx_packets_total.fetch_add(1, Ordering::Relaxed);
    if packet.topic != topic {
        trace!("Ignoring packet on topic {:?}", packet.topic);
        record_outcome(ctx, InboundOutcome::Ignored);
        return InboundOutcome::Ignored;
    }
    handle_payload(ctx, session, &packet.payload)
}

fn record_outcome(ctx: &SimContext, outcome: InboundOutcome) {
    let counter = match outcome {
        InboundOutcome::Applied => &ctx.metrics.rx_reports_applied,
        InboundOutcome::Rejected => &ctx.metrics.rx_reports_rejected,
        InboundOutcome::Ignored => &ctx.metrics.rx_ignored,
        InboundOutcome::Malformed => &ctx.metrics.rx_malformed,
    };
    counter.fetch_add(1, Ordering::Relaxed);
}

/// RX 线程主循环
///
/// # 参数
/// - `rx`: RX 通道（接收超时已在构建时设置）
/// - `ctx`: 共享状态上下文
/// - `session`: 本端会话
/// - `topic`: 订阅的消息通道名称
/// - `is_running`: 运行标志（用于生命周期联动）
///
/// 超时是正常情况（仿真器可能长时间不上报），缓存保持原值。
/// 通道关闭或后端不可用时退出，并把 `is_running` 置为 false。
pub fn rx_loop(
    mut rx: impl RxChannel,
    ctx: Arc<SimContext>,
    session: Arc<Session>,
    topic: String,
    is_running: Arc<AtomicBool>,
) {
    loop {
        // Acquire: 看到 false 时，其他线程的清理写入均可见
        if !is_running.load(Ordering::Acquire) {
            trace!("RX thread: is_running flag is false, exiting");
            break;
        }

        let packet = match rx.receive() {
            Ok(packet) => packet,
            Err(LinkError::Timeout) => continue,
            Err(e) => {
                ctx.metrics.link_errors.fetch_add(1, Ordering::Relaxed);
                if e.is_fatal() {
                    error!("RX thread: fatal link error: {}", e);
                    // Release: 之前的写入对看到 false 的线程可见
                    is_running.store(false, Ordering::Release);
                    break;
                }
                warn!("RX thread: link error: {}", e);
                continue;
            },
        };

        handle_packet(&ctx, &session, &topic, &packet);
    }

    trace!("RX thread: loop exited");
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutebot_link::{LinkDeviceError, LinkDeviceErrorKind};
    use std::collections::VecDeque;
    use std::thread;
    use std::time::Duration;

    struct MockRxChannel {
        queue: VecDeque<Result<SimPacket, LinkError>>,
    }

    impl MockRxChannel {
        fn new(items: Vec<Result<SimPacket, LinkError>>) -> Self {
            Self {
                queue: items.into(),
            }
        }
    }

    impl RxChannel for MockRxChannel {
        fn receive(&mut self) -> Result<SimPacket, LinkError> {
            self.queue.pop_front().unwrap_or(Err(LinkError::Closed))
        }
    }

    fn session() -> Session {
        Session::new("tok", 42)
    }

    fn sensors_json(device_id: i32, id: &str, lines: &str, distance: &str) -> Vec<u8> {
        format!(
            r#"{{"type":"sensors","id":"{}","deviceId":{},"lineDetectors":{},"obstacleDistance":{}}}"#,
            id, device_id, lines, distance
        )
        .into_bytes()
    }

    #[test]
    fn test_accepted_report_updates_cache() {
        let ctx = SimContext::new();
        let payload = sensors_json(42, "tok", "[0,1,0,0,0]", "37");
        assert_eq!(handle_payload(&ctx, &session(), &payload), InboundOutcome::Applied);

        let cache = ctx.sensors();
        assert_eq!(cache.line_state(), [0.0, 1.0]);
        assert_eq!(cache.sonar_raw, 37.0);
        assert_eq!(ctx.metrics.snapshot().rx_reports_applied, 1);
    }

    #[test]
    fn test_foreign_device_is_rejected() {
        let ctx = SimContext::new();
        let payload = sensors_json(7, "tok", "[0,1,0,0,0]", "37");
        assert_eq!(handle_payload(&ctx, &session(), &payload), InboundOutcome::Rejected);
        assert_eq!(ctx.sensors(), crate::state::SensorCache::default());

        let payload = sensors_json(42, "other", "[0,1,0,0,0]", "37");
        assert_eq!(handle_payload(&ctx, &session(), &payload), InboundOutcome::Rejected);
        assert_eq!(ctx.sensors(), crate::state::SensorCache::default());
        assert_eq!(ctx.metrics.snapshot().rx_reports_rejected, 2);
    }

    #[test]
    fn test_malformed_payload_keeps_cache() {
        let ctx = SimContext::new();
        handle_payload(&ctx, &session(), &sensors_json(42, "tok", "[1,1,1,1,1]", "10"));
        let before = ctx.sensors();

        assert_eq!(handle_payload(&ctx, &session(), b"{oops"), InboundOutcome::Malformed);
        assert_eq!(
            handle_payload(&ctx, &session(), br#"{"type":"mystery","id":"tok","deviceId":42}"#),
            InboundOutcome::Malformed
        );
        assert_eq!(ctx.sensors(), before);
    }

    #[test]
    fn test_state_echo_is_ignored() {
        let ctx = SimContext::new();
        let payload = br#"{"type":"state","id":"tok","deviceId":42,"productId":1,"motorTurnRatio":0,"motorSpeed":0,"motorLeft":0,"motorRight":0,"armAperture":0,"color":0,"assists":6,"sensors":0}"#;
        assert_eq!(handle_payload(&ctx, &session(), payload), InboundOutcome::Ignored);
    }

    #[test]
    fn test_other_topic_is_ignored() {
        let ctx = SimContext::new();
        let packet = SimPacket::new("radio", sensors_json(42, "tok", "[0,1,0,0,0]", "37"));
        assert_eq!(handle_packet(&ctx, &session(), "robot", &packet), InboundOutcome::Ignored);
        assert_eq!(ctx.sensors(), crate::state::SensorCache::default());

        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.rx_packets_total, 1);
        assert_eq!(snapshot.rx_ignored, 1);
    }

    #[test]
    fn test_partial_report_applies_valid_fields() {
        let ctx = SimContext::new();
        handle_payload(&ctx, &session(), &sensors_json(42, "tok", "[0,0,0,0,0]", "15"));
        handle_payload(&ctx, &session(), &sensors_json(42, "tok", "\"broken\"", "22.5"));

        let cache = ctx.sensors();
        assert_eq!(cache.line_state(), [1.0, 1.0]);
        assert_eq!(cache.sonar_raw, 22.5);
    }

    #[test]
    fn test_rx_loop_processes_until_closed() {
        let ctx = Arc::new(SimContext::new());
        let is_running = Arc::new(AtomicBool::new(true));
        let rx = MockRxChannel::new(vec![
            Err(LinkError::Timeout),
            Ok(SimPacket::new("robot", sensors_json(42, "tok", "[0,1,0,1,0]", "9"))),
            Err(LinkError::Device(LinkDeviceError::new(
                LinkDeviceErrorKind::InvalidFrame,
                "bad datagram",
            ))),
            Ok(SimPacket::new("robot", b"garbage".to_vec())),
        ]);

        let ctx_clone = ctx.clone();
        let running_clone = is_running.clone();
        let handle = thread::spawn(move || {
            rx_loop(rx, ctx_clone, Arc::new(session()), "robot".to_string(), running_clone);
        });
        handle.join().unwrap();

        // 队列耗尽后返回 Closed（致命），线程退出并清除运行标志
        assert!(!is_running.load(Ordering::Acquire));
        assert_eq!(ctx.sensors().line_state(), [0.0, 0.0]);
        assert_eq!(ctx.sensors().sonar_raw, 9.0);

        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.rx_packets_total, 2);
        assert_eq!(snapshot.rx_malformed, 1);
        assert_eq!(snapshot.link_errors, 2);
    }

    #[test]
    fn test_rx_loop_exits_on_flag() {
        struct IdleRx;
        impl RxChannel for IdleRx {
            fn receive(&mut self) -> Result<SimPacket, LinkError> {
                thread::sleep(Duration::from_millis(1));
                Err(LinkError::Timeout)
            }
        }

        let ctx = Arc::new(SimContext::new());
        let is_running = Arc::new(AtomicBool::new(true));
        let running_clone = is_running.clone();
        let handle = thread::spawn(move || {
            rx_loop(IdleRx, ctx, Arc::new(session()), "robot".to_string(), running_clone);
        });

        thread::sleep(Duration::from_millis(10));
        is_running.store(false, Ordering::Release);
        handle.join().unwrap();
    }
}
