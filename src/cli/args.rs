//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

/// Service Sentinel - Linux服务健康监控工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "service-sentinel",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "SERVICE_SENTINEL_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// 执行一次检测周期后退出
    #[arg(long, conflicts_with = "daemon", help = "执行一次检测周期后退出")]
    pub once: bool,

    /// 以常驻模式运行（默认模式）
    #[arg(short, long, help = "以常驻模式运行（默认模式）")]
    pub daemon: bool,

    /// 检测间隔（秒），覆盖配置文件取值
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        help = "检测间隔（秒），覆盖配置文件取值",
        env = "SERVICE_SENTINEL_INTERVAL"
    )]
    pub interval: Option<u64>,

    /// 干运行模式，记录但不执行实际重启
    #[arg(long, help = "干运行模式，记录但不执行实际重启")]
    pub dry_run: bool,

    /// 启用详细输出
    #[arg(short, long, help = "启用详细输出")]
    pub verbose: bool,

    /// 检测所有服务并打印状态表格后退出
    #[arg(
        long,
        conflicts_with_all = ["once", "daemon", "restart"],
        help = "检测所有服务并打印状态表格后退出"
    )]
    pub status: bool,

    /// 立即重启指定服务后退出，不受重启频率限制
    #[arg(
        long,
        value_name = "SERVICE",
        conflicts_with_all = ["once", "daemon"],
        help = "立即重启指定服务后退出，不受重启频率限制"
    )]
    pub restart: Option<String>,

    /// PID文件路径（常驻模式）
    #[arg(long, value_name = "FILE", help = "PID文件路径（常驻模式）")]
    pub pid_file: Option<PathBuf>,

    /// 日志级别，覆盖配置文件取值
    #[arg(
        long,
        value_enum,
        value_name = "LEVEL",
        help = "日志级别，覆盖配置文件取值",
        env = "SERVICE_SENTINEL_LOG_LEVEL"
    )]
    pub log_level: Option<LogLevel>,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum LogLevel {
    /// 追踪级别
    Trace,
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "trace"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

impl Args {
    /// 解析命令行参数
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// 获取配置文件路径
    pub fn get_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::get_default_config_path)
    }

    /// 解析生效的日志级别
    ///
    /// 优先级: --verbose > --log-level > 配置文件
    pub fn resolve_log_level(&self, config_level: &str) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if let Some(level) = self.log_level {
            level.into()
        } else {
            crate::logging::parse_level_filter(config_level)
        }
    }
}
