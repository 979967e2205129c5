//! 状态报告模块
//!
//! 提供状态表格渲染与检测周期结果的日志汇总

use crate::config::ServiceSpec;
use crate::health::{ActionTaken, CycleResult};
use tracing::{debug, info};

/// 渲染服务状态表格
///
/// 每个服务一行，行顺序与服务声明顺序一致。
///
/// # 参数
/// * `services` - 服务声明列表
/// * `results` - 对应的周期结果列表
///
/// # 返回
/// * `String` - 渲染后的表格
pub fn render_status_table(services: &[ServiceSpec], results: &[CycleResult]) -> String {
    let mut table = String::new();
    table.push_str(&format!(
        "{:<20} {:<10} {:<8} {:<40}\n",
        "服务名称", "类型", "状态", "详情"
    ));
    table.push_str(&format!("{}\n", "-".repeat(80)));

    for (service, result) in services.iter().zip(results.iter()) {
        table.push_str(&format!(
            "{:<20} {:<10} {:<8} {:<40}\n",
            truncate_string(&service.name, 20),
            service.check.kind(),
            result.status_text(),
            truncate_string(&result.detail, 40)
        ));
    }

    table
}

/// 记录检测周期的汇总日志
///
/// 全部健康的周期属于例行输出，只记录debug级别。
pub fn log_cycle_summary(results: &[CycleResult]) {
    let healthy = results.iter().filter(|r| r.healthy).count();
    let restarted = results
        .iter()
        .filter(|r| r.action_taken == ActionTaken::Restarted)
        .count();

    if healthy == results.len() {
        debug!("检测周期完成: {}/{} 健康", healthy, results.len());
    } else if restarted > 0 {
        info!(
            "检测周期完成: {}/{} 健康，已重启 {} 个服务",
            healthy,
            results.len(),
            restarted
        );
    } else {
        info!("检测周期完成: {}/{} 健康", healthy, results.len());
    }
}

/// 按字符数截断字符串，超长时以省略号结尾
fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CheckSpec;
    use chrono::Utc;

    fn service(name: &str, check: CheckSpec) -> ServiceSpec {
        ServiceSpec {
            name: name.to_string(),
            restart_on_failure: false,
            max_restarts_per_hour: 0,
            check,
        }
    }

    #[test]
    fn test_render_status_table() {
        let services = vec![
            service("nginx", CheckSpec::Systemd),
            service(
                "api",
                CheckSpec::Http {
                    url: "http://localhost:8080/health".to_string(),
                    timeout_seconds: 5,
                    expected_status: 200,
                },
            ),
        ];
        let results = vec![
            CycleResult::new("nginx", true, Utc::now()).with_detail("单元状态: active"),
            CycleResult::new("api", false, Utc::now()).with_detail("HTTP 503（期望 200）"),
        ];

        let table = render_status_table(&services, &results);

        assert!(table.contains("服务名称"));
        assert!(table.contains("nginx"));
        assert!(table.contains("systemd"));
        assert!(table.contains("http"));
        assert!(table.contains("UP"));
        assert!(table.contains("DOWN"));

        // 行顺序与声明顺序一致
        let nginx_pos = table.find("nginx").unwrap();
        let api_pos = table.find("api").unwrap();
        assert!(nginx_pos < api_pos);
    }

    #[test]
    fn test_truncate_string_multibyte() {
        assert_eq!(truncate_string("nginx", 20), "nginx");

        // 中文字符按字符数截断，不能在字节边界处截断
        let long = "检测任务执行失败".repeat(10);
        let truncated = truncate_string(&long, 10);
        assert_eq!(truncated.chars().count(), 10);
        assert!(truncated.ends_with("..."));
    }
}
