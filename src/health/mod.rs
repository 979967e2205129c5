//! 健康监控模块
//!
//! 提供健康检测、重启频率控制、重启执行和周期调度功能

pub mod checker;
pub mod gate;
pub mod monitor;
pub mod restarter;
pub mod result;
pub mod scheduler;

// 重新导出主要类型
pub use checker::{CheckExecutor, ProbeExecutor};
pub use gate::RestartGate;
pub use monitor::ServiceMonitor;
pub use restarter::{RestartExecutor, RestartOutcome, SystemctlRestartExecutor};
pub use result::{ActionTaken, CheckOutcome, CycleResult};
pub use scheduler::{CycleCallback, MonitorScheduler, SchedulerState};
