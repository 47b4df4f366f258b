//! 日志初始化
//!
//! `RUST_LOG` 优先，未设置时使用配置中的默认过滤。日志写到 stderr。

use tracing_subscriber::{fmt, EnvFilter};

/// 安装全局 tracing subscriber
///
/// 已安装时返回 false（宿主可能自行初始化过日志）。
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .try_init()
        .is_ok()
}
