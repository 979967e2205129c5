//! 监控调度器模块
//!
//! 以固定间隔驱动检测周期，支持单次执行与常驻循环

use crate::config::ServiceSpec;
use crate::health::monitor::ServiceMonitor;
use crate::health::result::CycleResult;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// 周期结果回调函数类型
pub type CycleCallback = Arc<dyn Fn(&[CycleResult]) + Send + Sync>;

/// 调度器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// 尚未启动
    Idle,
    /// 周期执行中
    Running,
    /// 等待下一个周期
    Waiting,
    /// 已停止
    Stopped,
}

/// 监控调度器
///
/// 周期节奏使用单调时钟计算，下一次周期的等待时间为
/// 间隔减去本周期耗时。周期耗时超过间隔时立即开始下一
/// 周期，不做补偿执行。
pub struct MonitorScheduler {
    /// 服务监控器
    monitor: Arc<ServiceMonitor>,
    /// 服务声明列表
    services: Vec<ServiceSpec>,
    /// 检测间隔
    interval: Duration,
    /// 周期结果回调
    callback: Option<CycleCallback>,
    /// 当前状态
    state: Mutex<SchedulerState>,
}

impl MonitorScheduler {
    /// 创建新的监控调度器
    ///
    /// # 参数
    /// * `monitor` - 服务监控器
    /// * `services` - 服务声明列表
    /// * `interval` - 检测间隔
    ///
    /// # 返回
    /// * `Self` - 调度器实例
    pub fn new(monitor: Arc<ServiceMonitor>, services: Vec<ServiceSpec>, interval: Duration) -> Self {
        Self {
            monitor,
            services,
            interval,
            callback: None,
            state: Mutex::new(SchedulerState::Idle),
        }
    }

    /// 设置周期结果回调
    pub fn with_callback(mut self, callback: CycleCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// 查询当前状态
    pub fn state(&self) -> SchedulerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: SchedulerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// 执行单次检测后停止
    ///
    /// # 返回
    /// * `Vec<CycleResult>` - 周期结果列表
    pub async fn run_once(&self) -> Vec<CycleResult> {
        self.set_state(SchedulerState::Running);
        let results = self.execute_cycle().await;
        self.set_state(SchedulerState::Stopped);
        results
    }

    /// 常驻循环，直到收到停止信号
    ///
    /// 停止信号在周期执行期间不会中断周期，当前周期完成
    /// 后在周期间隙或等待期间生效。
    ///
    /// # 参数
    /// * `shutdown` - 停止信号接收器
    pub async fn run_forever(&self, mut shutdown: broadcast::Receiver<()>) {
        info!(
            "监控调度器已启动，检测间隔: {}秒，服务数量: {}",
            self.interval.as_secs(),
            self.services.len()
        );

        loop {
            self.set_state(SchedulerState::Running);
            let started = Instant::now();
            self.execute_cycle().await;

            // 周期间隙检查停止信号
            if shutdown.try_recv().is_ok() {
                break;
            }

            let elapsed = started.elapsed();
            let remaining = self.interval.saturating_sub(elapsed);
            if remaining.is_zero() {
                warn!(
                    "检测周期耗时 {:?} 超过间隔 {:?}，立即开始下一周期",
                    elapsed, self.interval
                );
                continue;
            }

            self.set_state(SchedulerState::Waiting);
            tokio::select! {
                _ = sleep(remaining) => {}
                _ = shutdown.recv() => break,
            }
        }

        self.set_state(SchedulerState::Stopped);
        info!("监控调度器已停止");
    }

    /// 执行一个检测周期并分发结果
    async fn execute_cycle(&self) -> Vec<CycleResult> {
        debug!("开始检测周期，服务数量: {}", self.services.len());
        let results = self.monitor.run_cycle(&self.services, Utc::now()).await;

        if let Some(callback) = &self.callback {
            callback(&results);
        }
        results
    }
}
