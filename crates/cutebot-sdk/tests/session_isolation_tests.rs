//! 会话隔离与幂等性测试
//!
//! 直接驱动入站流水线（不启动 RX 线程），覆盖任意负载。

use cutebot_sdk::driver::{InboundOutcome, Session, SimContext, handle_payload};
use cutebot_sdk::protocol::RobotSensorsMessage;
use proptest::prelude::*;
use serde_json::json;

const TOKEN: &str = "0.123456789";
const DEVICE_ID: i32 = 42;

fn session() -> Session {
    Session::new(TOKEN, DEVICE_ID)
}

fn report_bytes(id: &str, device_id: i32, lines: &[f64], distance: f64) -> Vec<u8> {
    json!({
        "type": "sensors",
        "id": id,
        "deviceId": device_id,
        "lineDetectors": lines,
        "obstacleDistance": distance
    })
    .to_string()
    .into_bytes()
}

#[test]
fn test_reapplying_report_is_idempotent() {
    let ctx = SimContext::new();
    let payload = report_bytes(TOKEN, DEVICE_ID, &[0.0, 1.0, 0.0, 0.0, 1.0], 37.0);

    assert_eq!(handle_payload(&ctx, &session(), &payload), InboundOutcome::Applied);
    let once = ctx.sensors();
    assert_eq!(handle_payload(&ctx, &session(), &payload), InboundOutcome::Applied);
    assert_eq!(ctx.sensors(), once);
}

#[test]
fn test_last_report_wins() {
    let ctx = SimContext::new();
    let newer = report_bytes(TOKEN, DEVICE_ID, &[0.0, 0.0, 0.0, 0.0, 0.0], 10.0);
    let older = report_bytes(TOKEN, DEVICE_ID, &[0.0, 1.0, 0.0, 1.0, 0.0], 99.0);

    handle_payload(&ctx, &session(), &newer);
    handle_payload(&ctx, &session(), &older);
    // 没有序号，乱序到达的旧上报同样覆盖
    assert_eq!(ctx.sensors().sonar_raw, 99.0);
    assert_eq!(ctx.sensors().line_state(), [0.0, 0.0]);
}

#[test]
fn test_unused_slots_never_read() {
    let ctx = SimContext::new();
    let a = report_bytes(TOKEN, DEVICE_ID, &[0.0, 1.0, 0.0, 0.0, 0.0], 1.0);
    let b = report_bytes(TOKEN, DEVICE_ID, &[1.0, 1.0, 1.0, 0.0, 1.0], 1.0);

    handle_payload(&ctx, &session(), &a);
    let first = ctx.sensors();
    handle_payload(&ctx, &session(), &b);
    assert_eq!(ctx.sensors(), first);
}

#[test]
fn test_session_fields_roundtrip_through_message_type() {
    let payload = report_bytes(TOKEN, DEVICE_ID, &[0.0; 5], 3.0);
    let value: serde_json::Value = serde_json::from_slice(&payload).unwrap();
    let report: RobotSensorsMessage = serde_json::from_value(value).unwrap();
    assert!(session().validate(&report));
}

proptest! {
    #[test]
    fn foreign_device_never_mutates_cache(
        device_id in any::<i32>().prop_filter("foreign device", |id| *id != DEVICE_ID),
        lines in prop::collection::vec(0.0f64..=1.0, 5),
        distance in -1.0f64..500.0,
    ) {
        let ctx = SimContext::new();
        let before = ctx.sensors();
        let payload = report_bytes(TOKEN, device_id, &lines, distance);
        prop_assert_eq!(handle_payload(&ctx, &session(), &payload), InboundOutcome::Rejected);
        prop_assert_eq!(ctx.sensors(), before);
    }

    #[test]
    fn foreign_token_never_mutates_cache(
        token in "[a-z0-9.]{1,16}".prop_filter("foreign token", |t| t != TOKEN),
        distance in 0.0f64..500.0,
    ) {
        let ctx = SimContext::new();
        let before = ctx.sensors();
        let payload = report_bytes(&token, DEVICE_ID, &[0.0; 5], distance);
        prop_assert_eq!(handle_payload(&ctx, &session(), &payload), InboundOutcome::Rejected);
        prop_assert_eq!(ctx.sensors(), before);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let ctx = SimContext::new();
        let before = ctx.sensors();
        let outcome = handle_payload(&ctx, &session(), &bytes);
        prop_assert_ne!(outcome, InboundOutcome::Applied);
        prop_assert_eq!(ctx.sensors(), before);
    }

    #[test]
    fn accepted_report_stores_inverted_slots(
        lines in prop::collection::vec(prop::sample::select(vec![0.0f64, 1.0]), 5),
        distance in 0u32..500,
    ) {
        let distance = f64::from(distance);
        let ctx = SimContext::new();
        let payload = report_bytes(TOKEN, DEVICE_ID, &lines, distance);
        prop_assert_eq!(handle_payload(&ctx, &session(), &payload), InboundOutcome::Applied);
        let cache = ctx.sensors();
        let invert = |raw: f64| if raw != 0.0 { 0.0 } else { 1.0 };
        prop_assert_eq!(cache.line_left, invert(lines[1]));
        prop_assert_eq!(cache.line_right, invert(lines[3]));
        prop_assert_eq!(cache.sonar_raw, distance);
    }
}
