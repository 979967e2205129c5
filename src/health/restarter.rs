//! 服务重启执行器
//!
//! 通过`systemctl restart`重启服务，支持干运行模式

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

/// 单次重启尝试的结果
///
/// 重启过程中的任何失败（命令缺失、非零退出、超时）都
/// 折叠为失败结果，不向调用方返回错误。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestartOutcome {
    /// 重启命令是否成功
    pub succeeded: bool,
    /// 结果详情
    pub detail: String,
}

impl RestartOutcome {
    /// 成功结果
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            succeeded: true,
            detail: detail.into(),
        }
    }

    /// 失败结果
    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            detail: detail.into(),
        }
    }
}

/// 重启执行器trait，定义重启接口
#[async_trait]
pub trait RestartExecutor: Send + Sync {
    /// 重启指定服务
    ///
    /// # 参数
    /// * `name` - 服务名称
    ///
    /// # 返回
    /// * `RestartOutcome` - 重启结果
    async fn restart(&self, name: &str) -> RestartOutcome;
}

/// 基于systemctl的重启执行器
pub struct SystemctlRestartExecutor {
    /// 重启命令超时时间
    restart_timeout: Duration,
    /// 干运行模式，只记录不执行
    dry_run: bool,
}

impl SystemctlRestartExecutor {
    /// 创建新的重启执行器
    ///
    /// # 参数
    /// * `restart_timeout` - 重启命令超时时间
    /// * `dry_run` - 是否为干运行模式
    ///
    /// # 返回
    /// * `Self` - 执行器实例
    pub fn new(restart_timeout: Duration, dry_run: bool) -> Self {
        Self {
            restart_timeout,
            dry_run,
        }
    }
}

#[async_trait]
impl RestartExecutor for SystemctlRestartExecutor {
    async fn restart(&self, name: &str) -> RestartOutcome {
        if self.dry_run {
            info!("干运行模式，跳过实际重启: {}", name);
            return RestartOutcome::success("dry-run: would restart");
        }

        info!("正在重启服务: {}", name);
        let command = Command::new("systemctl").arg("restart").arg(name).output();

        match timeout(self.restart_timeout, command).await {
            Ok(Ok(output)) if output.status.success() => RestartOutcome::success("重启成功"),
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    RestartOutcome::failure(format!("systemctl restart {}", output.status))
                } else {
                    RestartOutcome::failure(stderr.to_string())
                }
            }
            Ok(Err(e)) => RestartOutcome::failure(format!("无法执行 systemctl: {}", e)),
            Err(_) => RestartOutcome::failure(format!(
                "重启超时（{}秒）",
                self.restart_timeout.as_secs()
            )),
        }
    }
}
