//! 伪代码翻译客户端库
//!
//! 提供输入校验、翻译服务调用、导出格式推导、剪贴板与文件导出功能
//! 遵循MVVM架构模式：model 为纯状态，vm 负责异步流程与界面同步

pub mod config;
pub mod model;
pub mod service;
pub mod utils;
pub mod vm;

// 重新导出主要类型
pub use config::{AppConfig, ConfigError};
pub use model::language::{extension_for, LanguageSelection, TargetLanguage};
pub use model::workflow::{TranslationOutcome, WorkflowError, WorkflowPhase, WorkflowSnapshot, WorkflowState};
pub use service::translation::{HttpTranslationService, ServiceError, TranslationService};
pub use vm::controller::TranslationController;
