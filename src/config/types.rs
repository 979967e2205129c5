//! 配置数据结构定义
//!
//! 定义监控配置文件对应的数据结构和验证逻辑

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// 主配置结构，包含全局参数和受监控服务列表
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 检测周期间隔（秒）
    #[serde(default = "default_interval_seconds")]
    pub interval_seconds: u64,
    /// systemd 状态查询命令超时时间（秒）
    #[serde(default = "default_command_timeout")]
    pub command_timeout_seconds: u64,
    /// 重启命令超时时间（秒）
    #[serde(default = "default_restart_timeout")]
    pub restart_timeout_seconds: u64,
    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 受监控服务列表
    pub services: Vec<ServiceSpec>,
}

/// 日志配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// 日志文件路径（打开失败时降级为仅控制台输出）
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            level: default_log_level(),
        }
    }
}

/// 单个服务的监控规格
///
/// 进程生命周期内只读，重新加载配置需要重启进程。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSpec {
    /// 服务名称，同时作为 systemd 单元名
    pub name: String,
    /// 检测到不健康时是否自动重启
    #[serde(default)]
    pub restart_on_failure: bool,
    /// 每小时最大重启次数，0 表示禁止自动重启
    #[serde(default)]
    pub max_restarts_per_hour: u32,
    /// 健康检测方式
    pub check: CheckSpec,
}

/// 健康检测方式
///
/// 封闭的带标签枚举，新的检测方式在这里扩展标签，
/// 由检测执行器在唯一分发点分发。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CheckSpec {
    /// 查询 systemd 单元激活状态
    Systemd,
    /// 发送 HTTP GET 请求并核对状态码
    Http {
        /// 探测地址
        url: String,
        /// 请求超时时间（秒）
        #[serde(default = "default_check_timeout")]
        timeout_seconds: u64,
        /// 期望的 HTTP 状态码
        #[serde(default = "default_expected_status")]
        expected_status: u16,
    },
}

impl CheckSpec {
    /// 检测方式名称，用于状态表格与日志
    pub fn kind(&self) -> &'static str {
        match self {
            CheckSpec::Systemd => "systemd",
            CheckSpec::Http { .. } => "http",
        }
    }
}

// 默认值函数
fn default_interval_seconds() -> u64 {
    30
}
fn default_command_timeout() -> u64 {
    5
}
fn default_restart_timeout() -> u64 {
    10
}
fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("/var/log/service-sentinel.log"))
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_check_timeout() -> u64 {
    5
}
fn default_expected_status() -> u16 {
    200
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    // 验证全局配置
    if config.interval_seconds == 0 {
        return Err("检测间隔不能为0".to_string());
    }

    if config.command_timeout_seconds == 0 {
        return Err("状态查询超时时间不能为0".to_string());
    }

    if config.restart_timeout_seconds == 0 {
        return Err("重启命令超时时间不能为0".to_string());
    }

    // 验证日志级别
    let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.logging.level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.logging.level, valid_log_levels
        ));
    }

    // 验证服务配置
    if config.services.is_empty() {
        return Err("至少需要配置一个服务".to_string());
    }

    let mut seen_names = HashSet::new();
    for service in &config.services {
        // 验证服务名称
        if service.name.trim().is_empty() {
            return Err("服务名称不能为空".to_string());
        }

        if !seen_names.insert(service.name.as_str()) {
            return Err(format!("服务名称重复: {}", service.name));
        }

        // 验证检测配置
        if let CheckSpec::Http {
            url,
            timeout_seconds,
            expected_status,
        } = &service.check
        {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(format!("服务 {} 的URL格式无效", service.name));
            }

            if *timeout_seconds == 0 {
                return Err(format!("服务 {} 的请求超时时间不能为0", service.name));
            }

            if !(100..=599).contains(expected_status) {
                return Err(format!(
                    "服务 {} 的期望状态码 {} 无效",
                    service.name, expected_status
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            interval_seconds: 30,
            command_timeout_seconds: 5,
            restart_timeout_seconds: 10,
            logging: LoggingConfig {
                log_file: None,
                level: "info".to_string(),
            },
            services: vec![
                ServiceSpec {
                    name: "nginx".to_string(),
                    restart_on_failure: true,
                    max_restarts_per_hour: 3,
                    check: CheckSpec::Systemd,
                },
                ServiceSpec {
                    name: "api".to_string(),
                    restart_on_failure: false,
                    max_restarts_per_hour: 0,
                    check: CheckSpec::Http {
                        url: "http://127.0.0.1:8080/health".to_string(),
                        timeout_seconds: 5,
                        expected_status: 200,
                    },
                },
            ],
        }
    }

    #[test]
    fn test_config_serialization() {
        let config = create_test_config();

        // 测试序列化
        let serialized = serde_json::to_string(&config).expect("序列化失败");
        assert!(!serialized.is_empty());

        // 测试反序列化
        let deserialized: Config = serde_json::from_str(&serialized).expect("反序列化失败");
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_minimal_service_defaults() {
        // 仅给出必填字段，其余使用默认值
        let json = r#"{
            "services": [
                {"name": "nginx", "check": {"type": "systemd"}},
                {"name": "api", "check": {"type": "http", "url": "http://127.0.0.1/health"}}
            ]
        }"#;

        let config: Config = serde_json::from_str(json).expect("解析失败");
        assert_eq!(config.interval_seconds, 30);
        assert_eq!(config.command_timeout_seconds, 5);
        assert_eq!(config.restart_timeout_seconds, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.log_file.is_some());

        let nginx = &config.services[0];
        assert!(!nginx.restart_on_failure);
        assert_eq!(nginx.max_restarts_per_hour, 0);

        match &config.services[1].check {
            CheckSpec::Http {
                timeout_seconds,
                expected_status,
                ..
            } => {
                assert_eq!(*timeout_seconds, 5);
                assert_eq!(*expected_status, 200);
            }
            _ => panic!("应为 http 检测"),
        }
    }

    #[test]
    fn test_unknown_check_type_rejected() {
        let json = r#"{
            "services": [{"name": "x", "check": {"type": "tcp"}}]
        }"#;

        let result = serde_json::from_str::<Config>(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_kind() {
        assert_eq!(CheckSpec::Systemd.kind(), "systemd");
        let http = CheckSpec::Http {
            url: "http://example.com".to_string(),
            timeout_seconds: 5,
            expected_status: 200,
        };
        assert_eq!(http.kind(), "http");
    }

    #[test]
    fn test_config_validation() {
        let config = create_test_config();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_config_validation_empty_services() {
        let mut config = create_test_config();
        config.services.clear();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("至少需要配置一个服务"));
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let mut config = create_test_config();
        config.interval_seconds = 0;

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("检测间隔不能为0"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = create_test_config();
        config.logging.level = "loud".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("无效的日志级别"));
    }

    #[test]
    fn test_config_validation_empty_name() {
        let mut config = create_test_config();
        config.services[0].name = "  ".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("服务名称不能为空"));
    }

    #[test]
    fn test_config_validation_duplicate_names() {
        let mut config = create_test_config();
        config.services[1].name = "nginx".to_string();

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("服务名称重复"));
    }

    #[test]
    fn test_config_validation_invalid_url() {
        let mut config = create_test_config();
        config.services[1].check = CheckSpec::Http {
            url: "invalid-url".to_string(),
            timeout_seconds: 5,
            expected_status: 200,
        };

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("URL格式无效"));
    }

    #[test]
    fn test_config_validation_invalid_status_code() {
        let mut config = create_test_config();
        config.services[1].check = CheckSpec::Http {
            url: "http://127.0.0.1/health".to_string(),
            timeout_seconds: 5,
            expected_status: 999,
        };

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("期望状态码"));
    }

    #[test]
    fn test_config_validation_zero_check_timeout() {
        let mut config = create_test_config();
        config.services[1].check = CheckSpec::Http {
            url: "http://127.0.0.1/health".to_string(),
            timeout_seconds: 0,
            expected_status: 200,
        };

        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("请求超时时间不能为0"));
    }
}
