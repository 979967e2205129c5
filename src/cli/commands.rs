//! 命令处理逻辑
//!
//! 实现一次性CLI命令（状态查询、手动重启）的处理逻辑

use crate::config::Config;
use crate::error::{RestartError, Result};
use crate::health::{
    CheckExecutor, CycleResult, ProbeExecutor, RestartExecutor, SystemctlRestartExecutor,
};
use crate::status::render_status_table;
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::info;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self) -> Result<()>;
}

/// 状态命令
///
/// 对所有服务执行一轮探测并打印状态表格，只观测不重启。
pub struct StatusCommand {
    config: Config,
}

impl StatusCommand {
    /// 创建状态命令
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Command for StatusCommand {
    async fn execute(&self) -> Result<()> {
        let checker =
            ProbeExecutor::new(Duration::from_secs(self.config.command_timeout_seconds))?;
        let now = Utc::now();

        let mut results = Vec::with_capacity(self.config.services.len());
        for service in &self.config.services {
            let outcome = checker.evaluate(service).await;
            results
                .push(CycleResult::new(&service.name, outcome.healthy, now)
                    .with_detail(outcome.detail));
        }

        print!("{}", render_status_table(&self.config.services, &results));
        Ok(())
    }
}

/// 手动重启命令
///
/// 立即重启指定服务，绕过重启频率闸门，也不消耗额度。
pub struct RestartCommand {
    config: Config,
    service_name: String,
    dry_run: bool,
}

impl RestartCommand {
    /// 创建手动重启命令
    pub fn new(config: Config, service_name: String, dry_run: bool) -> Self {
        Self {
            config,
            service_name,
            dry_run,
        }
    }
}

#[async_trait]
impl Command for RestartCommand {
    async fn execute(&self) -> Result<()> {
        let service = self
            .config
            .services
            .iter()
            .find(|s| s.name == self.service_name)
            .ok_or_else(|| RestartError::UnknownService {
                name: self.service_name.clone(),
            })?;

        info!("手动重启服务: {}", service.name);
        let executor = SystemctlRestartExecutor::new(
            Duration::from_secs(self.config.restart_timeout_seconds),
            self.dry_run,
        );
        let outcome = executor.restart(&service.name).await;

        if outcome.succeeded {
            println!("✓ 服务重启成功: {}（{}）", service.name, outcome.detail);
            Ok(())
        } else {
            Err(RestartError::CommandError(format!(
                "重启服务 {} 失败: {}",
                service.name, outcome.detail
            ))
            .into())
        }
    }
}
