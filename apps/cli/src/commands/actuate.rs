//! 动作命令：电机、车灯、舵机
//!
//! 每个命令只发送一次状态快照。

use anyhow::Result;
use clap::{Args, ValueEnum};
use cutebot_sdk::prelude::*;

use crate::validation::{parse_color, validate_speed};

/// 电机命令参数
#[derive(Args, Debug)]
pub struct DriveCommand {
    /// 左电机速度（-100 到 100）
    #[arg(short, long, allow_hyphen_values = true)]
    pub left: f64,

    /// 右电机速度（-100 到 100）
    #[arg(short, long, allow_hyphen_values = true)]
    pub right: f64,
}

impl DriveCommand {
    pub fn execute(&self, bot: &Cutebot) -> Result<()> {
        validate_speed("left", self.left)?;
        validate_speed("right", self.right)?;

        bot.motors(self.left, self.right)?;
        let commanded = bot.driver().commanded();
        println!(
            "🚗 电机: 左 {:.0} / 右 {:.0}",
            commanded.motor_left, commanded.motor_right
        );
        Ok(())
    }
}

/// 车灯选择
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightArg {
    Left,
    Right,
    All,
}

impl From<LightArg> for RgbLights {
    fn from(arg: LightArg) -> Self {
        match arg {
            LightArg::Left => RgbLights::Left,
            LightArg::Right => RgbLights::Right,
            LightArg::All => RgbLights::All,
        }
    }
}

/// 车灯命令参数
#[derive(Args, Debug)]
pub struct LightCommand {
    /// 颜色（#RRGGBB、0xRRGGBB 或十进制）
    #[arg(short, long)]
    pub color: String,

    /// 车灯
    #[arg(short, long, value_enum, default_value_t = LightArg::All)]
    pub light: LightArg,
}

impl LightCommand {
    pub fn execute(&self, bot: &Cutebot) -> Result<()> {
        let color = parse_color(&self.color)?;
        bot.color_light(self.light.into(), color)?;
        println!("💡 车灯: #{:06x}", color);
        Ok(())
    }
}

/// 舵机选择
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoArg {
    S1,
    S2,
}

impl From<ServoArg> for ServoList {
    fn from(arg: ServoArg) -> Self {
        match arg {
            ServoArg::S1 => ServoList::S1,
            ServoArg::S2 => ServoList::S2,
        }
    }
}

/// 舵机命令参数
#[derive(Args, Debug)]
pub struct ServoCommand {
    /// 角度（0 到 180）
    #[arg(short, long)]
    pub angle: f64,

    /// 舵机
    #[arg(short, long, value_enum, default_value_t = ServoArg::S1)]
    pub servo: ServoArg,
}

impl ServoCommand {
    pub fn execute(&self, bot: &Cutebot) -> Result<()> {
        if !self.angle.is_finite() {
            anyhow::bail!("舵机角度必须是有限数值");
        }
        bot.set_servo(self.servo.into(), self.angle)?;
        println!("🦾 舵机开合度: {:.0}%", bot.driver().commanded().arm_aperture);
        Ok(())
    }
}
