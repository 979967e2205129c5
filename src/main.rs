//! Service Sentinel 主程序入口
//!
//! Linux服务健康监控工具

use anyhow::{Context, Result};
use service_sentinel::cli::args::Args;
use service_sentinel::cli::commands::{Command, RestartCommand, StatusCommand};
use service_sentinel::config::{Config, ConfigLoader, JsonConfigLoader};
use service_sentinel::daemon::signal_handler::setup_signal_handlers;
use service_sentinel::daemon::PidFile;
use service_sentinel::health::{
    CycleResult, MonitorScheduler, ProbeExecutor, RestartGate, ServiceMonitor,
    SystemctlRestartExecutor,
};
use service_sentinel::logging::{LogConfig, LoggingSystem};
use service_sentinel::status::log_cycle_summary;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse_args();

    // 加载配置
    let config_path = args.get_config_path();
    let loader = JsonConfigLoader::new(true);
    let config = loader
        .load_from_file(&config_path)
        .await
        .with_context(|| format!("加载配置文件失败: {}", config_path.display()))?;

    // 初始化日志系统
    let log_config = LogConfig {
        level: args.resolve_log_level(&config.logging.level),
        file_path: config.logging.log_file.clone(),
        console: true,
        json_format: false,
    };
    LoggingSystem::setup_logging(log_config).context("初始化日志系统失败")?;

    info!("Service Sentinel v{} 启动", service_sentinel::VERSION);
    info!("配置加载完成，服务数量: {}", config.services.len());
    if args.dry_run {
        info!("干运行模式已启用，不会执行实际重启");
    }

    if let Err(e) = run(&args, config).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 根据命令行参数分发执行
async fn run(args: &Args, config: Config) -> Result<()> {
    if let Some(ref service_name) = args.restart {
        let command = RestartCommand::new(config, service_name.clone(), args.dry_run);
        return command.execute().await.map_err(|e| anyhow::anyhow!(e));
    }

    if args.status {
        let command = StatusCommand::new(config);
        return command.execute().await.map_err(|e| anyhow::anyhow!(e));
    }

    run_monitor(args, config).await
}

/// 启动监控循环
///
/// 根据`--once`标志决定执行单次检测周期后退出，还是以常驻模式
/// 持续运行直到收到关闭信号。
async fn run_monitor(args: &Args, config: Config) -> Result<()> {
    let interval_seconds = args.interval.unwrap_or(config.interval_seconds);

    let checker = Arc::new(ProbeExecutor::new(Duration::from_secs(
        config.command_timeout_seconds,
    ))?);
    let restarter = Arc::new(SystemctlRestartExecutor::new(
        Duration::from_secs(config.restart_timeout_seconds),
        args.dry_run,
    ));
    let gate = Arc::new(RestartGate::new(&config.services));
    let monitor = Arc::new(ServiceMonitor::new(checker, restarter, gate));

    let scheduler = MonitorScheduler::new(
        monitor,
        config.services.clone(),
        Duration::from_secs(interval_seconds),
    )
    .with_callback(Arc::new(|results: &[CycleResult]| log_cycle_summary(results)));

    if args.once {
        info!("单次检测模式");
        scheduler.run_once().await;
        return Ok(());
    }

    // PID文件在进程退出时由Drop自动清理
    let _pid_file = args.pid_file.as_ref().map(PidFile::create).transpose()?;

    info!("常驻监控模式，检测间隔: {}秒", interval_seconds);

    let (shutdown_tx, shutdown_rx) = broadcast::channel(4);
    setup_signal_handlers(shutdown_tx).await?;

    scheduler.run_forever(shutdown_rx).await;

    info!("服务已停止");
    Ok(())
}
