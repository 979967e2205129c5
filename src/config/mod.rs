//! 配置管理模块
//!
//! 提供配置文件解析、验证和默认路径解析功能

pub mod loader;
pub mod types;

// 重新导出主要类型
pub use loader::{get_default_config_path, ConfigLoader, JsonConfigLoader};
pub use types::{validate_config, CheckSpec, Config, LoggingConfig, ServiceSpec};
