//! 监控周期协调器
//!
//! 组合探测执行器、重启闸门和重启执行器，对服务列表执行
//! 完整的检测周期并产出结果

use crate::config::ServiceSpec;
use crate::health::checker::CheckExecutor;
use crate::health::gate::RestartGate;
use crate::health::restarter::RestartExecutor;
use crate::health::result::{ActionTaken, CheckOutcome, CycleResult};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 服务监控器
///
/// 探测并发执行，重启决策按服务声明顺序串行执行，保证
/// 闸门的查询与记录不会交错。
pub struct ServiceMonitor {
    /// 健康检测执行器
    checker: Arc<dyn CheckExecutor>,
    /// 重启执行器
    restarter: Arc<dyn RestartExecutor>,
    /// 重启频率闸门
    gate: Arc<RestartGate>,
}

impl ServiceMonitor {
    /// 创建新的服务监控器
    ///
    /// # 参数
    /// * `checker` - 健康检测执行器
    /// * `restarter` - 重启执行器
    /// * `gate` - 重启频率闸门
    ///
    /// # 返回
    /// * `Self` - 监控器实例
    pub fn new(
        checker: Arc<dyn CheckExecutor>,
        restarter: Arc<dyn RestartExecutor>,
        gate: Arc<RestartGate>,
    ) -> Self {
        Self {
            checker,
            restarter,
            gate,
        }
    }

    /// 执行一个检测周期
    ///
    /// 对每个服务探测、决策并在需要时重启。结果顺序与输入
    /// 顺序一致，每个服务恰好产出一条结果，不向调用方返回
    /// 错误。
    ///
    /// # 参数
    /// * `services` - 服务声明列表
    /// * `now` - 周期判定时刻
    ///
    /// # 返回
    /// * `Vec<CycleResult>` - 周期结果列表
    pub async fn run_cycle(
        &self,
        services: &[ServiceSpec],
        now: DateTime<Utc>,
    ) -> Vec<CycleResult> {
        let probes: Vec<_> = services
            .iter()
            .map(|service| {
                let checker = Arc::clone(&self.checker);
                let service = service.clone();
                tokio::spawn(async move { checker.evaluate(&service).await })
            })
            .collect();

        let outcomes = futures::future::join_all(probes).await;

        let mut results = Vec::with_capacity(services.len());
        for (service, joined) in services.iter().zip(outcomes) {
            let result = match joined {
                Ok(outcome) => self.decide(service, outcome, now).await,
                // 探测任务本身崩溃时不触发重启，也不消耗重启额度
                Err(e) => {
                    error!("服务 {} 的检测任务执行失败: {}", service.name, e);
                    CycleResult::new(&service.name, false, now)
                        .with_detail(format!("检测任务执行失败: {}", e))
                        .with_action(ActionTaken::CheckFailed)
                }
            };
            results.push(result);
        }
        results
    }

    /// 根据探测结论决定本周期的动作
    async fn decide(
        &self,
        service: &ServiceSpec,
        outcome: CheckOutcome,
        now: DateTime<Utc>,
    ) -> CycleResult {
        if outcome.healthy {
            debug!("服务 {} 健康: {}", service.name, outcome.detail);
            return CycleResult::new(&service.name, true, now).with_detail(outcome.detail);
        }

        warn!("服务 {} 不健康: {}", service.name, outcome.detail);

        if !service.restart_on_failure {
            return CycleResult::new(&service.name, false, now).with_detail(outcome.detail);
        }

        if !self.gate.allow(&service.name, now) {
            error!(
                "服务 {} 已达重启频率上限（{}/{}），跳过重启",
                service.name,
                self.gate.used(&service.name, now),
                self.gate.cap(&service.name)
            );
            return CycleResult::new(&service.name, false, now)
                .with_detail(format!("{}；已达重启频率上限", outcome.detail))
                .with_action(ActionTaken::RestartSkippedQuota);
        }

        let restart = self.restarter.restart(&service.name).await;
        // 发起即记录，重启失败同样消耗额度
        self.gate.record(&service.name, now);

        if restart.succeeded {
            info!("服务 {} 重启成功", service.name);
            CycleResult::new(&service.name, false, now)
                .with_detail(format!("{}；{}", outcome.detail, restart.detail))
                .with_action(ActionTaken::Restarted)
        } else {
            error!("服务 {} 重启失败: {}", service.name, restart.detail);
            CycleResult::new(&service.name, false, now)
                .with_detail(format!("{}；重启失败: {}", outcome.detail, restart.detail))
                .with_action(ActionTaken::RestartFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckSpec;
    use crate::health::restarter::RestartOutcome;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// 返回固定结论的检测执行器
    struct StaticChecker {
        healthy: bool,
    }

    #[async_trait]
    impl CheckExecutor for StaticChecker {
        async fn evaluate(&self, _service: &ServiceSpec) -> CheckOutcome {
            if self.healthy {
                CheckOutcome::healthy("单元状态: active")
            } else {
                CheckOutcome::unhealthy("单元状态: failed")
            }
        }
    }

    /// 记录调用的重启执行器
    struct RecordingRestarter {
        succeed: bool,
        calls: Mutex<Vec<String>>,
    }

    impl RecordingRestarter {
        fn new(succeed: bool) -> Self {
            Self {
                succeed,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RestartExecutor for RecordingRestarter {
        async fn restart(&self, name: &str) -> RestartOutcome {
            self.calls.lock().unwrap().push(name.to_string());
            if self.succeed {
                RestartOutcome::success("重启成功")
            } else {
                RestartOutcome::failure("单元不存在")
            }
        }
    }

    fn service(name: &str, restart_on_failure: bool, cap: u32) -> ServiceSpec {
        ServiceSpec {
            name: name.to_string(),
            restart_on_failure,
            max_restarts_per_hour: cap,
            check: CheckSpec::Systemd,
        }
    }

    fn monitor(
        healthy: bool,
        restart_succeeds: bool,
        services: &[ServiceSpec],
    ) -> (ServiceMonitor, Arc<RecordingRestarter>, Arc<RestartGate>) {
        let restarter = Arc::new(RecordingRestarter::new(restart_succeeds));
        let gate = Arc::new(RestartGate::new(services));
        let monitor = ServiceMonitor::new(
            Arc::new(StaticChecker { healthy }),
            Arc::clone(&restarter) as Arc<dyn RestartExecutor>,
            Arc::clone(&gate),
        );
        (monitor, restarter, gate)
    }

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_healthy_service_no_action() {
        let services = vec![service("nginx", true, 3)];
        let (monitor, restarter, gate) = monitor(true, true, &services);

        let results = monitor.run_cycle(&services, at_noon()).await;

        assert_eq!(results.len(), 1);
        assert!(results[0].healthy);
        assert_eq!(results[0].action_taken, ActionTaken::None);
        assert_eq!(restarter.call_count(), 0);
        assert_eq!(gate.used("nginx", at_noon()), 0);
    }

    #[tokio::test]
    async fn test_unhealthy_without_restart_flag() {
        let services = vec![service("nginx", false, 3)];
        let (monitor, restarter, gate) = monitor(false, true, &services);

        let results = monitor.run_cycle(&services, at_noon()).await;

        assert!(!results[0].healthy);
        assert_eq!(results[0].action_taken, ActionTaken::None);
        assert_eq!(restarter.call_count(), 0);
        assert_eq!(gate.used("nginx", at_noon()), 0);
    }

    #[tokio::test]
    async fn test_unhealthy_restart_and_record() {
        let services = vec![service("nginx", true, 3)];
        let (monitor, restarter, gate) = monitor(false, true, &services);

        let results = monitor.run_cycle(&services, at_noon()).await;

        assert_eq!(results[0].action_taken, ActionTaken::Restarted);
        assert!(results[0].detail.contains("单元状态: failed"));
        assert_eq!(restarter.call_count(), 1);
        assert_eq!(gate.used("nginx", at_noon()), 1);
    }

    #[tokio::test]
    async fn test_quota_denied_skips_restart() {
        let services = vec![service("nginx", true, 0)];
        let (monitor, restarter, gate) = monitor(false, true, &services);

        let results = monitor.run_cycle(&services, at_noon()).await;

        assert_eq!(results[0].action_taken, ActionTaken::RestartSkippedQuota);
        assert!(results[0].detail.contains("已达重启频率上限"));
        assert_eq!(restarter.call_count(), 0);
        assert_eq!(gate.used("nginx", at_noon()), 0);
    }

    #[tokio::test]
    async fn test_restart_failure_still_consumes_quota() {
        let services = vec![service("nginx", true, 3)];
        let (monitor, _restarter, gate) = monitor(false, false, &services);

        let results = monitor.run_cycle(&services, at_noon()).await;

        assert_eq!(results[0].action_taken, ActionTaken::RestartFailed);
        assert!(results[0].detail.contains("重启失败"));
        assert_eq!(gate.used("nginx", at_noon()), 1);
    }

    #[tokio::test]
    async fn test_results_preserve_input_order() {
        let services = vec![
            service("alpha", true, 1),
            service("beta", true, 1),
            service("gamma", true, 1),
        ];
        let (monitor, _restarter, _gate) = monitor(false, true, &services);

        let results = monitor.run_cycle(&services, at_noon()).await;

        let names: Vec<_> = results.iter().map(|r| r.service_name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn test_empty_services_yield_empty_results() {
        let (monitor, _restarter, _gate) = monitor(true, true, &[]);

        let results = monitor.run_cycle(&[], at_noon()).await;
        assert!(results.is_empty());
    }
}
