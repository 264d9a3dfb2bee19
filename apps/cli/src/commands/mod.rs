//! 命令定义和实现

pub mod actuate;
pub mod config;
pub mod monitor;

pub use actuate::{DriveCommand, LightCommand, ServoCommand};
pub use config::ConfigCommand;
pub use monitor::MonitorCommand;
