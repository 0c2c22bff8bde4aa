//! 应用配置：可选 JSON 文件 + 环境变量覆盖

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::language::TargetLanguage;

pub const CONFIG_PATH_ENV: &str = "PSEUDO_TRANSLATOR_CONFIG";
pub const SERVICE_URL_ENV: &str = "PSEUDO_TRANSLATOR_SERVICE_URL";
pub const TIMEOUT_ENV: &str = "PSEUDO_TRANSLATOR_TIMEOUT_SECS";
pub const DEFAULT_CONFIG_FILE: &str = "translator.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 翻译服务根地址，例如 `http://localhost:8080`
    pub service_url: String,
    /// 单次翻译请求的超时上限（秒）
    pub request_timeout_secs: u64,
    pub default_language: TargetLanguage,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: "http://localhost:8080".to_string(),
            request_timeout_secs: 15,
            default_language: TargetLanguage::Python,
        }
    }
}

impl AppConfig {
    /// 从进程环境加载
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// 按给定的环境查询函数加载：先读配置文件（不存在则用默认值），再应用环境变量覆盖
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let explicit = env(CONFIG_PATH_ENV).map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else if let Some(path) = explicit {
            return Err(ConfigError::Io {
                path,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        } else {
            Self::default()
        };

        config.apply_overrides(&env)?;
        config.validate()?;
        tracing::info!(
            service_url = %config.service_url,
            timeout_secs = config.request_timeout_secs,
            language = %config.default_language,
            "配置已加载"
        );
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    fn apply_overrides(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = env(SERVICE_URL_ENV) {
            self.service_url = url;
        }
        if let Some(raw) = env(TIMEOUT_ENV) {
            self.request_timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{} must be a number of seconds, got {:?}", TIMEOUT_ENV, raw)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.service_url.starts_with("http://") || self.service_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "service_url must start with http:// or https://, got {:?}",
                self.service_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be positive".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
