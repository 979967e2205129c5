//! 检测周期结果数据结构
//!
//! 定义单次探测结论、周期动作和周期结果类型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 单次探测结论
///
/// 探测本身的失败（命令缺失、网络错误、超时）一律折叠为
/// 不健康结论并把原因写入 detail，不向调用方抛出错误。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// 服务是否健康
    pub healthy: bool,
    /// 结论详情
    pub detail: String,
}

impl CheckOutcome {
    /// 健康结论
    pub fn healthy(detail: impl Into<String>) -> Self {
        Self {
            healthy: true,
            detail: detail.into(),
        }
    }

    /// 不健康结论
    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            healthy: false,
            detail: detail.into(),
        }
    }
}

/// 周期内对单个服务采取的动作
///
/// 每个服务每个周期恰好取一个值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    /// 无动作（健康，或未启用自动重启）
    None,
    /// 已发起重启且重启命令成功
    Restarted,
    /// 达到每小时重启上限，跳过重启
    RestartSkippedQuota,
    /// 已发起重启但重启命令失败
    RestartFailed,
    /// 检测任务本身执行失败
    CheckFailed,
}

impl std::fmt::Display for ActionTaken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionTaken::None => write!(f, "无动作"),
            ActionTaken::Restarted => write!(f, "已重启"),
            ActionTaken::RestartSkippedQuota => write!(f, "跳过重启(限额)"),
            ActionTaken::RestartFailed => write!(f, "重启失败"),
            ActionTaken::CheckFailed => write!(f, "检测失败"),
        }
    }
}

/// 单个服务在一个检测周期内的结果
///
/// 构造后不可变，所有权交给调用方（日志/状态渲染）。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleResult {
    /// 结果唯一标识
    pub id: Uuid,
    /// 服务名称
    pub service_name: String,
    /// 服务是否健康
    pub healthy: bool,
    /// 详情（状态描述或失败原因）
    pub detail: String,
    /// 本周期采取的动作
    pub action_taken: ActionTaken,
    /// 周期判定时刻
    pub timestamp: DateTime<Utc>,
}

impl CycleResult {
    /// 创建新的周期结果
    ///
    /// # 参数
    /// * `service_name` - 服务名称
    /// * `healthy` - 服务是否健康
    /// * `timestamp` - 周期判定时刻
    ///
    /// # 返回
    /// * `Self` - 周期结果实例
    pub fn new(service_name: impl Into<String>, healthy: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            service_name: service_name.into(),
            healthy,
            detail: String::new(),
            action_taken: ActionTaken::None,
            timestamp,
        }
    }

    /// 设置详情
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = detail.into();
        self
    }

    /// 设置动作
    pub fn with_action(mut self, action_taken: ActionTaken) -> Self {
        self.action_taken = action_taken;
        self
    }

    /// 状态文本，用于表格输出
    pub fn status_text(&self) -> &'static str {
        if self.healthy {
            "UP"
        } else {
            "DOWN"
        }
    }
}
