//! 连接参数与配置解析
//!
//! 配置来源优先级：命令行参数 > `--config` 指定文件 > 默认配置文件 > 内置默认值。

use anyhow::{Context, Result};
use clap::Args;
use cutebot_sdk::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 默认配置文件路径
pub fn default_config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("cutebot");
    path.push("config.toml");
    Ok(path)
}

/// 全局连接参数
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// 本地 UDP 地址
    #[arg(long, global = true, default_value = "0.0.0.0:0")]
    pub bind: String,

    /// 仿真器 UDP 地址
    #[arg(long, global = true, default_value = "127.0.0.1:7001")]
    pub peer: String,

    /// 设备序列号（覆盖配置）
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub device_id: Option<i32>,

    /// 配置文件路径
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl ConnectionArgs {
    /// 解析最终配置
    pub fn resolve_config(&self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => {
                let path = default_config_file()?;
                if path.exists() { load_config(&path)? } else { SimConfig::default() }
            },
        };

        if let Some(device_id) = self.device_id {
            config.device_id = Some(device_id);
        }
        config.validate()?;
        Ok(config)
    }

    /// 建立会话
    pub fn connect(&self) -> Result<Cutebot> {
        let config = self.resolve_config()?;
        if config.device_id.is_none() {
            info!("No device id configured; run `cutebot-cli config init` to persist one");
        }

        let channel = UdpChannel::bind(self.bind.as_str(), self.peer.as_str())
            .with_context(|| format!("绑定 UDP 失败: {} -> {}", self.bind, self.peer))?;
        debug!("UDP channel {} -> {}", self.bind, self.peer);

        let bot = Cutebot::connect(channel, &EphemeralDevice::new(), config)?;
        info!(
            "Session established (device {}, topic {:?})",
            bot.driver().session().device_id(),
            bot.driver().config().topic
        );
        Ok(bot)
    }
}

/// 读取配置文件
pub fn load_config(path: &Path) -> Result<SimConfig> {
    SimConfig::load(path).with_context(|| format!("读取配置文件失败: {}", path.display()))
}

/// 写入配置文件（自动创建父目录）
pub fn save_config(path: &Path, config: &SimConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("创建配置目录失败")?;
    }
    let content = config.to_toml_string()?;
    fs::write(path, content).context("写入配置文件失败")?;
    Ok(())
}

/// 未配置序列号时使用的宿主设备：每个进程随机一个序列号
pub struct EphemeralDevice(i32);

impl EphemeralDevice {
    pub fn new() -> Self {
        Self(random_device_id())
    }
}

impl Default for EphemeralDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HostDevice for EphemeralDevice {
    fn device_serial_number(&self) -> i32 {
        self.0
    }
}

/// 随机正整数序列号
pub fn random_device_id() -> i32 {
    use rand::Rng;
    rand::thread_rng().gen_range(1..=i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(config: Option<PathBuf>, device_id: Option<i32>) -> ConnectionArgs {
        ConnectionArgs {
            bind: "127.0.0.1:0".to_string(),
            peer: "127.0.0.1:7001".to_string(),
            device_id,
            config,
        }
    }

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cutebot.toml");
        let stored = SimConfig {
            device_id: Some(1234),
            ..SimConfig::default()
        };
        save_config(&path, &stored).unwrap();

        let config = args(Some(path), None).resolve_config().unwrap();
        assert_eq!(config.device_id, Some(1234));
    }

    #[test]
    fn test_cli_device_id_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cutebot.toml");
        save_config(
            &path,
            &SimConfig {
                device_id: Some(1234),
                ..SimConfig::default()
            },
        )
        .unwrap();

        let config = args(Some(path), Some(-5)).resolve_config().unwrap();
        assert_eq!(config.device_id, Some(-5));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = args(Some(dir.path().join("missing.toml")), None).resolve_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_random_device_id_positive() {
        for _ in 0..100 {
            assert!(random_device_id() > 0);
        }
    }
}
