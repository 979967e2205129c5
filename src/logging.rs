//! 日志系统模块
//!
//! 基于tracing的结构化日志，支持控制台与文件双输出

use log::LevelFilter;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// 全局日志初始化状态
#[derive(Debug, Default)]
struct GlobalLoggingState {
    /// 是否已初始化
    initialized: bool,
    /// 初始化结果
    init_result: Option<Result<(), String>>,
}

/// 全局日志状态管理器
static GLOBAL_LOGGING_STATE: OnceLock<Mutex<GlobalLoggingState>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 日志文件路径（可选）
    pub file_path: Option<PathBuf>,
    /// 是否输出到控制台
    pub console: bool,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file_path: None,
            console: true,
            json_format: false,
        }
    }
}

/// 日志系统管理器
pub struct LoggingSystem;

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 线程安全的单次初始化，重复调用返回首次初始化的
    /// 结果。日志文件打开失败时降级为仅控制台输出，不
    /// 中断程序启动。
    ///
    /// # 参数
    /// * `config` - 日志配置
    ///
    /// # 返回
    /// * `anyhow::Result<()>` - 初始化结果
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<()> {
        let state_mutex =
            GLOBAL_LOGGING_STATE.get_or_init(|| Mutex::new(GlobalLoggingState::default()));

        {
            let state = state_mutex.lock().unwrap();
            if state.initialized {
                return match &state.init_result {
                    Some(Ok(())) | None => Ok(()),
                    Some(Err(e)) => Err(anyhow::anyhow!("日志系统之前初始化失败: {}", e)),
                };
            }
        }

        let init_result = Self::perform_initialization(&config);

        {
            let mut state = state_mutex.lock().unwrap();
            state.initialized = true;
            state.init_result =
                Some(init_result.as_ref().map(|_| ()).map_err(|e| e.to_string()));
        }

        init_result
    }

    /// 执行实际的日志系统初始化
    fn perform_initialization(config: &LogConfig) -> anyhow::Result<()> {
        // log crate 到 tracing 的桥接
        Self::init_log_tracer()?;
        Self::init_tracing_subscriber(config)
    }

    /// 初始化 LogTracer
    fn init_log_tracer() -> anyhow::Result<()> {
        use tracing_log::LogTracer;

        static LOG_TRACER_INIT: OnceLock<Result<(), String>> = OnceLock::new();

        let result = LOG_TRACER_INIT.get_or_init(|| LogTracer::init().map_err(|e| e.to_string()));

        result
            .as_ref()
            .map_err(|e| anyhow::anyhow!("LogTracer初始化失败: {}", e))?;
        Ok(())
    }

    /// 初始化 tracing subscriber
    fn init_tracing_subscriber(config: &LogConfig) -> anyhow::Result<()> {
        let env_filter = EnvFilter::from_default_env()
            .add_directive(Self::convert_level_to_directive(config.level));

        let console_layer = if config.console {
            Some(if config.json_format {
                fmt::layer()
                    .json()
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .boxed()
            } else {
                fmt::layer()
                    .with_timer(fmt::time::ChronoUtc::rfc_3339())
                    .with_ansi(true)
                    .boxed()
            })
        } else {
            None
        };

        let file_layer = match &config.file_path {
            Some(path) => match Self::open_log_file(path) {
                Ok(file) => Some(
                    fmt::layer()
                        .with_writer(std::sync::Arc::new(file))
                        .with_ansi(false)
                        .with_timer(fmt::time::ChronoUtc::rfc_3339())
                        .boxed(),
                ),
                Err(e) => {
                    // 日志系统尚未就绪，降级警告只能走标准错误
                    eprintln!(
                        "警告: 无法打开日志文件 {}: {}，仅输出到控制台",
                        path.display(),
                        e
                    );
                    None
                }
            },
            None => None,
        };

        let result = registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init();

        match result {
            Ok(()) => {
                tracing::debug!("日志系统初始化完成");
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains(
                    "attempted to set a logger after the logging system was already initialized",
                ) || error_msg.contains("a global default trace dispatcher has already been set")
                {
                    // 已经初始化过了，按成功处理
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("tracing subscriber初始化失败: {}", error_msg))
                }
            }
        }
    }

    /// 打开日志文件，追加写入，父目录不存在时自动创建
    fn open_log_file(path: &Path) -> std::io::Result<File> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    /// 将 log::LevelFilter 转换为 tracing 的指令
    fn convert_level_to_directive(level: LevelFilter) -> tracing_subscriber::filter::Directive {
        use tracing_subscriber::filter::Directive;
        match level {
            LevelFilter::Off => "off".parse().unwrap(),
            LevelFilter::Error => Directive::from(tracing::Level::ERROR),
            LevelFilter::Warn => Directive::from(tracing::Level::WARN),
            LevelFilter::Info => Directive::from(tracing::Level::INFO),
            LevelFilter::Debug => Directive::from(tracing::Level::DEBUG),
            LevelFilter::Trace => Directive::from(tracing::Level::TRACE),
        }
    }

    /// 检查日志系统是否已初始化
    pub fn is_initialized() -> bool {
        if let Some(state_mutex) = GLOBAL_LOGGING_STATE.get() {
            let state = state_mutex.lock().unwrap();
            state.initialized
        } else {
            false
        }
    }
}

/// 将配置中的级别字符串解析为过滤级别
///
/// 配置校验保证取值合法，解析失败时回退到info级别。
pub fn parse_level_filter(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}

/// 获取默认日志文件路径
pub fn get_default_log_path() -> PathBuf {
    PathBuf::from("/var/log/service-sentinel.log")
}
