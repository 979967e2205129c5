//! 错误处理模块
//!
//! 定义应用程序的统一错误类型
//!
//! 探测失败与重启命令失败属于正常业务结论，体现在检测结果中，
//! 不在这里建模；本模块只覆盖基础设施层面的错误。

use thiserror::Error;

/// Service Sentinel 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum ServiceSentinelError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 健康检测相关错误
    #[error("健康检测错误: {0}")]
    Check(#[from] CheckError),

    /// 服务重启相关错误
    #[error("服务重启错误: {0}")]
    Restart(#[from] RestartError),

    /// 守护进程相关错误
    #[error("守护进程错误: {0}")]
    Daemon(String),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },
}

/// 健康检测错误类型
///
/// 仅覆盖探测之前的基础设施错误，探测本身的失败折叠为不健康结论。
#[derive(Error, Debug)]
pub enum CheckError {
    /// HTTP客户端构建错误
    #[error("HTTP客户端构建失败: {0}")]
    ClientError(#[from] reqwest::Error),
}

/// 服务重启错误类型
#[derive(Error, Debug)]
pub enum RestartError {
    /// 重启命令执行失败
    #[error("重启命令执行失败: {0}")]
    CommandError(String),

    /// 服务未在配置中定义
    #[error("服务未在配置中定义: {name}")]
    UnknownService { name: String },
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ServiceSentinelError>;
