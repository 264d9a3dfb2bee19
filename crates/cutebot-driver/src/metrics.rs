//! 仿真链路指标
//!
//! 原子计数器，可在任意线程读取，不引入锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 仿真链路实时指标
#[derive(Debug, Default)]
pub struct SimMetrics {
    /// RX 收到的数据包总数（包括其他 topic）
    pub rx_packets_total: AtomicU64,

    /// 通过会话校验并写入缓存的上报数
    pub rx_reports_applied: AtomicU64,

    /// 会话/设备不匹配被丢弃的上报数
    ///
    /// 持续增长通常说明同一通道上还有其他实例在运行。
    pub rx_reports_rejected: AtomicU64,

    /// 无法解码的负载数
    pub rx_malformed: AtomicU64,

    /// 被忽略的数据包数（其他 topic、`state` 回显）
    pub rx_ignored: AtomicU64,

    /// 发送的 `state` 快照数
    pub tx_states_total: AtomicU64,

    /// 发送失败次数
    pub tx_errors: AtomicU64,

    /// 通道错误次数
    pub link_errors: AtomicU64,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rx_packets_total: self.rx_packets_total.load(Ordering::Relaxed),
            rx_reports_applied: self.rx_reports_applied.load(Ordering::Relaxed),
            rx_reports_rejected: self.rx_reports_rejected.load(Ordering::Relaxed),
            rx_malformed: self.rx_malformed.load(Ordering::Relaxed),
            rx_ignored: self.rx_ignored.load(Ordering::Relaxed),
            tx_states_total: self.tx_states_total.load(Ordering::Relaxed),
            tx_errors: self.tx_errors.load(Ordering::Relaxed),
            link_errors: self.link_errors.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.rx_packets_total.store(0, Ordering::Relaxed);
        self.rx_reports_applied.store(0, Ordering::Relaxed);
        self.rx_reports_rejected.store(0, Ordering::Relaxed);
        self.rx_malformed.store(0, Ordering::Relaxed);
        self.rx_ignored.store(0, Ordering::Relaxed);
        self.tx_states_total.store(0, Ordering::Relaxed);
        self.tx_errors.store(0, Ordering::Relaxed);
        self.link_errors.store(0, Ordering::Relaxed);
    }
}

/// 指标快照（不可变）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub rx_packets_total: u64,
    pub rx_reports_applied: u64,
    pub rx_reports_rejected: u64,
    pub rx_malformed: u64,
    pub rx_ignored: u64,
    pub tx_states_total: u64,
    pub tx_errors: u64,
    pub link_errors: u64,
}

impl MetricsSnapshot {
    /// 上报接受率（百分比），没有上报时返回 0.0
    pub fn acceptance_rate(&self) -> f64 {
        let reports = self.rx_reports_applied + self.rx_reports_rejected;
        if reports == 0 {
            return 0.0;
        }
        (self.rx_reports_applied as f64 / reports as f64) * 100.0
    }
}
