//! 查询与入站流水线基准测试
//!
//! 查询路径只读 ArcSwap 快照；入站路径包含 JSON 解码、会话校验与缓存更新。

use criterion::{Criterion, criterion_group, criterion_main};
use cutebot_sdk::driver::{Session, SimContext, handle_payload};
use cutebot_sdk::prelude::*;
use cutebot_sdk::protocol::decode;
use std::hint::black_box;

const REPORT: &[u8] = br#"{"type":"sensors","id":"tok","deviceId":42,"lineDetectors":[0,1,0,0,0],"obstacleDistance":37}"#;

fn setup_cutebot() -> (Cutebot, MemoryChannel) {
    let (local, peer) = MemoryChannel::pair();
    let driver =
        SimDriver::with_session(local, Session::new("tok", 42), SimConfig::default()).unwrap();
    (Cutebot::from_driver(driver), peer)
}

fn bench_observer_tracking(c: &mut Criterion) {
    let (bot, _peer) = setup_cutebot();
    let observer = bot.observer().clone();

    c.bench_function("observer_matches_tracking", |b| {
        b.iter(|| {
            black_box(observer.matches_tracking(black_box(TrackingState::LeftOnly)));
        });
    });
}

fn bench_observer_distance(c: &mut Criterion) {
    let (bot, _peer) = setup_cutebot();
    let observer = bot.observer().clone();

    c.bench_function("observer_distance_inches", |b| {
        b.iter(|| {
            black_box(observer.distance(SonarUnit::Inches));
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_sensors_report", |b| {
        b.iter(|| {
            black_box(decode(black_box(REPORT)));
        });
    });
}

fn bench_handle_payload(c: &mut Criterion) {
    let ctx = SimContext::new();
    let session = Session::new("tok", 42);

    c.bench_function("handle_sensors_payload", |b| {
        b.iter(|| {
            black_box(handle_payload(&ctx, &session, black_box(REPORT)));
        });
    });
}

criterion_group!(
    benches,
    bench_observer_tracking,
    bench_observer_distance,
    bench_decode,
    bench_handle_payload
);
criterion_main!(benches);
