// ==========================================
// 生物废弃物绩效指标 - 配置管理器
// ==========================================
// 职责: 模型参数加载、校验、快照
// 来源: JSON 文件 (BIOWASTE_CONFIG_PATH) / JSON 字符串 / 内置默认值
// ==========================================

use crate::config::model_params::ModelParameters;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 配置文件路径环境变量
pub const CONFIG_PATH_ENV: &str = "BIOWASTE_CONFIG_PATH";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置解析失败: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("配置校验失败: {0}")]
    Invalid(String),
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    params: ModelParameters,
}

impl ConfigManager {
    /// 使用内置默认值
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用给定参数（会校验）
    pub fn with_params(params: ModelParameters) -> Result<Self, ConfigError> {
        params.validate().map_err(ConfigError::Invalid)?;
        Ok(Self { params })
    }

    /// 从 JSON 字符串加载，缺失字段取默认值
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let params: ModelParameters = serde_json::from_str(raw)?;
        Self::with_params(params)
    }

    /// 从 JSON 文件加载
    ///
    /// # 参数
    /// - path: 配置文件路径
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manager = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), "模型参数已从文件加载");
        Ok(manager)
    }

    /// 按环境变量加载；未设置时使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => {
                tracing::debug!("未设置 {}，使用默认模型参数", CONFIG_PATH_ENV);
                Ok(Self::new())
            }
        }
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    /// 获取配置快照（JSON 格式）
    ///
    /// # 用途
    /// - 随看板结果一起记录当时使用的参数
    pub fn snapshot(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(&self.params)?)
    }
}
