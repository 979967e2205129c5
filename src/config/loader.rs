//! 配置加载器实现
//!
//! 提供JSON配置文件解析、环境变量替换和默认路径解析功能

use crate::config::types::{validate_config, Config};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::Path;

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config>;

    /// 从字符串加载配置
    ///
    /// # 参数
    /// * `content` - 配置文件内容
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_string(&self, content: &str) -> Result<Config>;

    /// 验证配置
    ///
    /// # 参数
    /// * `config` - 要验证的配置
    ///
    /// # 返回
    /// * `Result<()>` - 验证结果
    fn validate(&self, config: &Config) -> Result<()>;
}

/// JSON配置加载器实现
#[derive(Debug, Clone)]
pub struct JsonConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl JsonConfigLoader {
    /// 创建新的JSON配置加载器
    ///
    /// # 参数
    /// * `enable_env_substitution` - 是否启用环境变量替换
    ///
    /// # 返回
    /// * `Self` - 配置加载器实例
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的环境变量
    ///
    /// # 参数
    /// * `content` - 要处理的字符串
    ///
    /// # 返回
    /// * `Result<String>` - 替换后的字符串或错误
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        // 匹配 ${VAR_NAME} 格式的环境变量
        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut result = content.to_string();

        for captures in env_var_regex.captures_iter(content) {
            let full_match = &captures[0];
            let var_name = &captures[1];

            match std::env::var(var_name) {
                Ok(value) => {
                    result = result.replace(full_match, &value);
                }
                Err(_) => {
                    return Err(ConfigError::EnvVarError {
                        var: var_name.to_string(),
                    }
                    .into());
                }
            }
        }

        Ok(result)
    }

    /// 解析JSON内容
    ///
    /// # 参数
    /// * `content` - JSON内容
    ///
    /// # 返回
    /// * `Result<Config>` - 解析的配置或错误
    fn parse_json(&self, content: &str) -> Result<Config> {
        // 替换环境变量
        let processed_content = self.substitute_env_vars(content)?;

        // 解析JSON
        let config: Config = serde_json::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("JSON解析失败: {}", e)))?;

        Ok(config)
    }
}

#[async_trait]
impl ConfigLoader for JsonConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();

        // 检查文件是否存在
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        // 读取文件内容
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        // 解析配置
        let config = self.parse_json(&content)?;

        // 验证配置
        self.validate(&config)?;

        log::info!("成功加载配置文件: {}", path.display());
        log::debug!("受监控服务数量: {}", config.services.len());

        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<Config> {
        // 解析配置
        let config = self.parse_json(content)?;

        // 验证配置
        self.validate(&config)?;

        log::debug!("成功解析配置字符串");

        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

/// 获取默认配置文件路径
///
/// 依次查找：当前目录 config.json、/etc/service-sentinel/config.json、
/// 用户配置目录，返回第一个存在的路径；都不存在时返回当前目录路径，
/// 由加载器报告文件不存在。
pub fn get_default_config_path() -> std::path::PathBuf {
    let local = std::path::PathBuf::from("config.json");
    if local.exists() {
        return local;
    }

    let system = std::path::PathBuf::from("/etc/service-sentinel/config.json");
    if system.exists() {
        return system;
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user = config_dir.join("service-sentinel").join("config.json");
        if user.exists() {
            return user;
        }
    }

    local
}
