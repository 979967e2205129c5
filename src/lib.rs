//! Service Sentinel - Linux服务健康监控工具
//!
//! 这是一个用Rust编写的Linux服务健康监控工具，支持：
//! - systemd单元状态检测
//! - HTTP健康检测
//! - 频率受限的自动重启
//! - 单次与常驻运行模式
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod daemon;
pub mod error;
pub mod health;
pub mod logging;
pub mod status;

// 重新导出主要类型
pub use config::{CheckSpec, Config, ServiceSpec};
pub use error::ServiceSentinelError;
pub use health::{ActionTaken, CheckOutcome, CycleResult, ServiceMonitor};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
