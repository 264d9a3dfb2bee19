//! Observer - 传感器观察器（View 模式）
//!
//! 直接持有 `SimDriver` 引用，无锁读取传感器缓存。
//! 所有方法都是纯查询：不标记传感器、不发送快照。
//!
//! # 使用示例
//!
//! ```rust,no_run
//! # use cutebot_client::{Observer, SonarUnit, TrackingState};
//! # fn example(observer: Observer) {
//! if observer.matches_tracking(TrackingState::BothLine) {
//!     println!("on line, {} cm ahead", observer.distance(SonarUnit::Centimeters));
//! }
//! # }
//! ```

use std::sync::Arc;

use crate::types::*;
use cutebot_driver::SimDriver;

/// 传感器观察器（只读接口）
#[derive(Clone)]
pub struct Observer {
    driver: Arc<SimDriver>,
}

impl Observer {
    /// 创建新的 Observer
    ///
    /// 通常通过 [`Cutebot::observer`](crate::Cutebot::observer) 获取。
    pub fn new(driver: Arc<SimDriver>) -> Self {
        Observer { driver }
    }

    /// 当前巡线状态是否与目标一致
    ///
    /// 直接对缓存分类后比较；哨兵值不等于 0，按“无线”处理。
    pub fn matches_tracking(&self, target: TrackingState) -> bool {
        let cache = self.driver.sensors();
        classify(cache.line_left, cache.line_right) == target
    }

    /// 当前巡线状态（尚无读数时为 `None`，仅用于诊断显示）
    pub fn tracking_state(&self) -> Option<TrackingState> {
        TrackingState::from_cache(&self.driver.sensors())
    }

    /// 超声波距离（向下取整；尚无读数时为 -1）
    pub fn distance(&self, unit: SonarUnit) -> i32 {
        convert(self.driver.sensors().sonar_raw, unit)
    }

    /// 取反后的左右巡线读数 `[left, right]`
    pub fn line_state(&self) -> [f64; 2] {
        self.driver.sensors().line_state()
    }

    /// 原始超声波读数（厘米）
    pub fn sonar_raw(&self) -> f64 {
        self.driver.sensors().sonar_raw
    }
}
