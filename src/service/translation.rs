//! 翻译服务客户端：`POST {base}/api/translate?lang=<code>`，请求与响应均为纯文本

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use thiserror::Error;

use crate::model::language::TargetLanguage;

pub const TRANSLATE_PATH: &str = "/api/translate";

/// 服务失败的具体原因；只用于日志，界面上统一显示通用错误
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("service responded with status {0}")]
    Status(u16),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response body: {0}")]
    Body(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport(err.to_string())
    }
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(&self, source: &str, language: TargetLanguage) -> Result<String, ServiceError>;
}

pub struct HttpTranslationService {
    http: Client,
    endpoint: String,
}

impl HttpTranslationService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .user_agent(concat!("pseudo-translator/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), TRANSLATE_PATH);
        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl TranslationService for HttpTranslationService {
    async fn translate(&self, source: &str, language: TargetLanguage) -> Result<String, ServiceError> {
        let res = self
            .http
            .post(&self.endpoint)
            .query(&[("lang", language.code())])
            .header(CONTENT_TYPE, "text/plain")
            .body(source.to_string())
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        res.text()
            .await
            .map_err(|e| ServiceError::Body(e.to_string()))
    }
}
