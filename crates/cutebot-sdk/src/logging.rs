//! 日志初始化
//!
//! 安装 `tracing` 全局订阅者，并把 `log` 门面的记录桥接进来。
//! 过滤规则优先读取 `RUST_LOG`，未设置时使用传入的默认指令。

use tracing_subscriber::EnvFilter;

/// 初始化日志（重复调用是安全的，只有第一次生效）
///
/// 返回本次调用是否成功安装了订阅者。
pub fn init(default_directive: &str) -> bool {
    // 已有 log 记录器时忽略错误
    let _ = tracing_log::LogTracer::init();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).finish();

    tracing::subscriber::set_global_default(subscriber).is_ok()
}

/// 初始化日志
///
/// ```rust
/// cutebot_sdk::init_logger!();
/// cutebot_sdk::init_logger!("cutebot_driver=trace");
/// ```
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::logging::init("info")
    };
    ($directive:expr) => {
        $crate::logging::init($directive)
    };
}
