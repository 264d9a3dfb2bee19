//! 配置管理命令

use anyhow::Result;
use clap::Subcommand;
use cutebot_sdk::SimConfig;

use crate::connection::{
    ConnectionArgs, default_config_file, load_config, random_device_id, save_config,
};

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 生成配置文件（写入随机设备序列号）
    Init {
        /// 覆盖已有文件
        #[arg(long)]
        force: bool,
    },

    /// 显示生效的配置
    Show,

    /// 显示配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self, connection: &ConnectionArgs) -> Result<()> {
        let path = match &connection.config {
            Some(path) => path.clone(),
            None => default_config_file()?,
        };

        match self {
            ConfigCommand::Init { force } => {
                if path.exists() && !force {
                    let existing = load_config(&path)?;
                    println!("配置已存在: {} (device_id = {:?})", path.display(), existing.device_id);
                    println!("使用 --force 覆盖");
                    return Ok(());
                }

                let config = SimConfig {
                    device_id: Some(connection.device_id.unwrap_or_else(random_device_id)),
                    ..SimConfig::default()
                };
                save_config(&path, &config)?;
                println!("✅ 已写入 {}", path.display());
                Ok(())
            },

            ConfigCommand::Show => {
                let config = connection.resolve_config()?;
                print!("{}", config.to_toml_string()?);
                Ok(())
            },

            ConfigCommand::Path => {
                println!("{}", path.display());
                Ok(())
            },
        }
    }
}
