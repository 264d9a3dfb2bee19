//! # Cutebot CLI
//!
//! Command-line interface for driving a simulated Cutebot over UDP.
//!
//! ```bash
//! # 生成本机配置（随机设备序列号，之后保持不变）
//! cutebot-cli config init
//!
//! # 下发动作（内部：建立会话 -> 发送快照 -> 退出）
//! cutebot-cli --peer 127.0.0.1:7001 drive --left 80 --right 40
//! cutebot-cli light --color '#ff0000'
//! cutebot-cli servo --angle 90
//! cutebot-cli stop
//!
//! # 持续打印巡线状态与距离
//! cutebot-cli monitor --frequency 5 --unit in
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod connection;
mod validation;

use commands::{ConfigCommand, DriveCommand, LightCommand, MonitorCommand, ServoCommand};
use connection::ConnectionArgs;

/// Cutebot CLI - 仿真小车命令行工具
#[derive(Parser, Debug)]
#[command(name = "cutebot-cli")]
#[command(about = "Command-line interface for driving a simulated Cutebot", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 设置左右电机速度
    Drive {
        #[command(flatten)]
        args: DriveCommand,
    },

    /// 停车
    Stop,

    /// 设置车灯颜色
    Light {
        #[command(flatten)]
        args: LightCommand,
    },

    /// 设置舵机角度
    Servo {
        #[command(flatten)]
        args: ServoCommand,
    },

    /// 监控巡线状态与超声波距离
    Monitor {
        #[command(flatten)]
        args: MonitorCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cutebot_cli=info,warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&cli.connection),

        Commands::Drive { args } => {
            let bot = cli.connection.connect()?;
            args.execute(&bot)
        },

        Commands::Stop => {
            let bot = cli.connection.connect()?;
            bot.stopcar()?;
            println!("🛑 已停车");
            Ok(())
        },

        Commands::Light { args } => {
            let bot = cli.connection.connect()?;
            args.execute(&bot)
        },

        Commands::Servo { args } => {
            let bot = cli.connection.connect()?;
            args.execute(&bot)
        },

        Commands::Monitor { args } => {
            let bot = cli.connection.connect()?;
            args.execute(&bot)
        },
    }
}
