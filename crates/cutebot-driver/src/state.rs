//! 传感器状态缓存
//!
//! 缓存最近一次被接受的巡线读数（左、右）与超声波原始距离。
//! 初始值均为哨兵值 `-1`（尚未收到读数）。
//!
//! # 更新规则
//!
//! - 只读取巡线数组的槽位 1（左）与槽位 3（右），其余槽位忽略
//! - 原始读数为"置位 = 无线"极性，存储前取反：`stored = raw_asserted ? 0 : 1`，
//!   即 `0` 表示检测到线，`1` 表示未检测到线
//! - 超声波距离原样存储（不取反、不取整）
//! - 每个字段独立更新：缺失或非数值的字段跳过，不覆盖已有值

use crate::metrics::SimMetrics;
use arc_swap::ArcSwap;
use cutebot_protocol::{LINE_SLOT_LEFT, LINE_SLOT_RIGHT, NO_READING, RobotSensorsMessage};
use std::sync::Arc;

/// 巡线检测值：检测到线
pub const LINE_DETECTED: f64 = 0.0;
/// 巡线检测值：未检测到线
pub const LINE_ABSENT: f64 = 1.0;

/// 传感器缓存快照
///
/// 大小：24 字节，Copy 开销可以忽略
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorCache {
    /// 左侧巡线（取反后：0 = 有线，1 = 无线，-1 = 无数据）
    pub line_left: f64,
    /// 右侧巡线（取反后：0 = 有线，1 = 无线，-1 = 无数据）
    pub line_right: f64,
    /// 超声波原始距离（厘米，-1 = 无数据）
    pub sonar_raw: f64,
}

impl Default for SensorCache {
    fn default() -> Self {
        Self {
            line_left: NO_READING,
            line_right: NO_READING,
            sonar_raw: NO_READING,
        }
    }
}

/// 原始读数取反
///
/// 任何非零读数视为"置位"（= 无线）。
#[inline]
pub fn invert_line_reading(raw: f64) -> f64 {
    if raw != 0.0 { LINE_DETECTED } else { LINE_ABSENT }
}

impl SensorCache {
    /// 将一条已通过会话校验的上报应用到快照上，返回新快照
    ///
    /// 纯函数：不修改 `self`。
    pub fn apply(&self, report: &RobotSensorsMessage) -> SensorCache {
        let mut next = *self;
        if let Some(raw) = report.line_slot(LINE_SLOT_LEFT) {
            next.line_left = invert_line_reading(raw);
        }
        if let Some(raw) = report.line_slot(LINE_SLOT_RIGHT) {
            next.line_right = invert_line_reading(raw);
        }
        if let Some(distance) = report.obstacle_distance.filter(|d| d.is_finite()) {
            next.sonar_raw = distance;
        }
        next
    }

    /// 左右巡线读数 `[left, right]`
    pub fn line_state(&self) -> [f64; 2] {
        [self.line_left, self.line_right]
    }

    /// 是否已收到巡线数据
    pub fn has_line_data(&self) -> bool {
        self.line_left != NO_READING && self.line_right != NO_READING
    }

    /// 是否已收到测距数据
    pub fn has_sonar_data(&self) -> bool {
        self.sonar_raw != NO_READING
    }
}

/// 共享状态上下文
///
/// - 传感器缓存：ArcSwap，读取无锁；写入使用 `rcu` 做读-改-写，
///   多个写者并发时自动重试，保证逐字段更新不会互相覆盖
/// - 指标：原子计数器
pub struct SimContext {
    pub sensors: Arc<ArcSwap<SensorCache>>,
    pub metrics: Arc<SimMetrics>,
}

impl SimContext {
    pub fn new() -> Self {
        Self {
            sensors: Arc::new(ArcSwap::from_pointee(SensorCache::default())),
            metrics: Arc::new(SimMetrics::new()),
        }
    }

    /// 读取最新快照（可能是哨兵值或过期值，立即返回）
    pub fn sensors(&self) -> SensorCache {
        **self.sensors.load()
    }

    /// 应用一条已通过会话校验的上报
    pub fn apply_report(&self, report: &RobotSensorsMessage) {
        self.sensors.rcu(|old| Arc::new(old.apply(report)));
    }
}

impl Default for SimContext {
    fn default() -> Self {
        Self::new()
    }
}
