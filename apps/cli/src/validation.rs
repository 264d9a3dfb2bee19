//! 输入验证模块

use anyhow::{Context, Result};

/// 解析颜色（`#RRGGBB`、`0xRRGGBB` 或十进制）
pub fn parse_color(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    let color = if let Some(hex) = trimmed.strip_prefix('#').or_else(|| trimmed.strip_prefix("0x")) {
        u32::from_str_radix(hex, 16).with_context(|| format!("无效的十六进制颜色: {}", input))?
    } else {
        trimmed.parse::<u32>().with_context(|| format!("无效的颜色: {}", input))?
    };

    if color > 0x00ff_ffff {
        anyhow::bail!("颜色 {:#x} 超出 24 位 RGB 范围", color);
    }
    Ok(color)
}

/// 验证电机速度（超出范围会被限幅，这里只拒绝非有限值并提示）
pub fn validate_speed(name: &str, speed: f64) -> Result<()> {
    if !speed.is_finite() {
        anyhow::bail!("{} 速度必须是有限数值", name);
    }
    if !(-100.0..=100.0).contains(&speed) {
        tracing::warn!("{} speed {} will be clamped to [-100, 100]", name, speed);
    }
    Ok(())
}

/// 验证监控频率
pub fn validate_frequency(frequency: u32) -> Result<()> {
    if frequency == 0 || frequency > 100 {
        anyhow::bail!("监控频率 {} Hz 超出范围 [1, 100]", frequency);
    }
    Ok(())
}
