//! 监控命令
//!
//! 按固定频率读取巡线状态与超声波距离，直到 Ctrl+C 或达到次数上限。

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use cutebot_sdk::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::validation::validate_frequency;

/// 距离单位
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitArg {
    Cm,
    In,
}

impl From<UnitArg> for SonarUnit {
    fn from(arg: UnitArg) -> Self {
        match arg {
            UnitArg::Cm => SonarUnit::Centimeters,
            UnitArg::In => SonarUnit::Inches,
        }
    }
}

/// 监控命令参数
#[derive(Args, Debug)]
pub struct MonitorCommand {
    /// 更新频率（Hz）
    #[arg(short, long, default_value_t = 10)]
    pub frequency: u32,

    /// 采样次数（不指定则一直运行）
    #[arg(short = 'n', long)]
    pub count: Option<u64>,

    /// 距离单位
    #[arg(short, long, value_enum, default_value_t = UnitArg::Cm)]
    pub unit: UnitArg,
}

impl MonitorCommand {
    pub fn execute(&self, bot: &Cutebot) -> Result<()> {
        validate_frequency(self.frequency)?;

        let running = Arc::new(AtomicBool::new(true));
        let r = running.clone();
        ctrlc::set_handler(move || {
            r.store(false, Ordering::SeqCst);
        })
        .context("设置 Ctrl+C 处理失败")?;

        // 声明使用的传感器，仿真器据此开始上报
        announce_sensors(bot)?;

        println!("📊 监控中 ({} Hz)...", self.frequency);
        println!("按 Ctrl+C 停止\n");

        let period = Duration::from_secs_f64(1.0 / f64::from(self.frequency));
        let unit = SonarUnit::from(self.unit);
        let mut samples = 0u64;

        while running.load(Ordering::SeqCst) && self.count.is_none_or(|n| samples < n) {
            let tracking = bot
                .observer()
                .tracking_state()
                .map_or_else(|| "-".to_string(), |s| s.to_string());
            let distance = bot.ultrasonic(unit);
            println!("巡线 [{}]  距离 {:>4} {}", tracking, distance, unit);

            samples += 1;
            std::thread::sleep(period);
        }

        let metrics = bot.driver().metrics();
        println!(
            "\n上报: 接受 {} / 拒绝 {} / 无效 {}（接受率 {:.1}%）",
            metrics.rx_reports_applied,
            metrics.rx_reports_rejected,
            metrics.rx_malformed,
            metrics.acceptance_rate()
        );
        if !bot.driver().is_healthy() {
            anyhow::bail!("接收线程已退出");
        }
        Ok(())
    }
}

/// 标记两个传感器并重发一次快照
fn announce_sensors(bot: &Cutebot) -> Result<()> {
    bot.tracking(TrackingState::BothLine);
    bot.ultrasonic(SonarUnit::Centimeters);
    bot.driver().resend()?;
    Ok(())
}
