//! 健康检测执行器实现
//!
//! 提供systemd单元状态检测和HTTP健康检测，统一折叠为探测结论

use crate::config::{CheckSpec, ServiceSpec};
use crate::error::{CheckError, Result};
use crate::health::result::CheckOutcome;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// 健康检测执行器trait，定义检测接口
#[async_trait]
pub trait CheckExecutor: Send + Sync {
    /// 对单个服务执行一次健康检测
    ///
    /// 探测过程中的任何失败（命令缺失、网络错误、超时）都
    /// 折叠为不健康结论，不向调用方返回错误。
    ///
    /// # 参数
    /// * `service` - 服务声明
    ///
    /// # 返回
    /// * `CheckOutcome` - 探测结论
    async fn evaluate(&self, service: &ServiceSpec) -> CheckOutcome;
}

/// 探测执行器实现
///
/// systemd检测通过`systemctl is-active`查询单元状态，
/// HTTP检测对目标URL发起GET请求并比对状态码。
pub struct ProbeExecutor {
    /// HTTP客户端
    client: Client,
    /// systemctl查询超时时间
    command_timeout: Duration,
}

impl ProbeExecutor {
    /// 创建新的探测执行器
    ///
    /// # 参数
    /// * `command_timeout` - systemctl查询超时时间
    ///
    /// # 返回
    /// * `Result<Self>` - 执行器实例
    pub fn new(command_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(CheckError::ClientError)?;

        Ok(Self {
            client,
            command_timeout,
        })
    }

    /// 查询systemd单元状态
    ///
    /// # 参数
    /// * `unit` - 单元名称
    ///
    /// # 返回
    /// * `CheckOutcome` - 探测结论
    async fn probe_systemd(&self, unit: &str) -> CheckOutcome {
        let command = Command::new("systemctl").arg("is-active").arg(unit).output();

        match timeout(self.command_timeout, command).await {
            Ok(Ok(output)) => interpret_unit_state(
                output.status.success(),
                &String::from_utf8_lossy(&output.stdout),
            ),
            Ok(Err(e)) => CheckOutcome::unhealthy(format!("无法执行 systemctl: {}", e)),
            Err(_) => CheckOutcome::unhealthy(format!(
                "systemctl 查询超时（{}秒）",
                self.command_timeout.as_secs()
            )),
        }
    }

    /// 执行HTTP健康检测
    ///
    /// 仅比对状态码，不读取响应体。期望状态码本身可以是
    /// 错误码（如期望404且实际返回404时判定为健康）。
    ///
    /// # 参数
    /// * `url` - 目标URL
    /// * `timeout_seconds` - 请求超时时间
    /// * `expected_status` - 期望状态码
    ///
    /// # 返回
    /// * `CheckOutcome` - 探测结论
    async fn probe_http(&self, url: &str, timeout_seconds: u64, expected_status: u16) -> CheckOutcome {
        let request = self.client.get(url);

        match timeout(Duration::from_secs(timeout_seconds), request.send()).await {
            Ok(Ok(response)) => {
                let status = response.status().as_u16();
                if status == expected_status {
                    CheckOutcome::healthy(format!("HTTP {}", status))
                } else {
                    CheckOutcome::unhealthy(format!("HTTP {}（期望 {}）", status, expected_status))
                }
            }
            Ok(Err(e)) => CheckOutcome::unhealthy(format_request_error(&e)),
            Err(_) => CheckOutcome::unhealthy("Request timeout".to_string()),
        }
    }
}

#[async_trait]
impl CheckExecutor for ProbeExecutor {
    async fn evaluate(&self, service: &ServiceSpec) -> CheckOutcome {
        match &service.check {
            CheckSpec::Systemd => self.probe_systemd(&service.name).await,
            CheckSpec::Http {
                url,
                timeout_seconds,
                expected_status,
            } => self.probe_http(url, *timeout_seconds, *expected_status).await,
        }
    }
}

/// 将systemctl输出解释为探测结论
///
/// 仅当命令成功且输出为`active`时判定为健康，其余状态
/// （inactive、failed、activating等）一律不健康。
fn interpret_unit_state(command_succeeded: bool, stdout: &str) -> CheckOutcome {
    let state = stdout.trim();

    if command_succeeded && state == "active" {
        CheckOutcome::healthy("单元状态: active")
    } else if state.is_empty() {
        CheckOutcome::unhealthy("单元状态: unknown")
    } else {
        CheckOutcome::unhealthy(format!("单元状态: {}", state))
    }
}

/// 格式化请求错误信息，使其更加清晰易读
fn format_request_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else if error.is_request() {
        "Invalid request".to_string()
    } else {
        let error_str = error.to_string();
        if error_str.contains("dns") || error_str.contains("DNS") {
            "DNS resolution failed".to_string()
        } else if error_str.contains("certificate")
            || error_str.contains("tls")
            || error_str.contains("ssl")
        {
            "SSL/TLS certificate error".to_string()
        } else {
            format!("Request failed: {}", error_str)
        }
    }
}
