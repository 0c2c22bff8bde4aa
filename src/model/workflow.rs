//! WorkflowState：翻译工作流的核心状态与状态迁移
//!
//! 这里只有同步的纯状态逻辑；异步 I/O（读文件、HTTP、剪贴板）由
//! `vm::controller` 负责，完成后再回到这里提交结果。

use thiserror::Error;

use crate::model::language::TargetLanguage;

/// 翻译请求允许的最大长度，按 UTF-16 码元计数（与浏览器端 `String.length` 一致）
pub const MAX_INPUT_CHARS: usize = 5000;
/// 复制按钮默认文案
pub const COPY_LABEL_DEFAULT: &str = "Copy";
/// 复制成功后的临时文案
pub const COPY_LABEL_DONE: &str = "Copied!";
/// 导出文件名（不含扩展名）
pub const OUTPUT_FILE_STEM: &str = "output";
pub const OUTPUT_MIME: &str = "text/plain";

/// 所有面向用户的错误；`Display` 文本即界面上显示的错误信息
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("enter pseudocode or load a file")]
    EmptyInput,
    #[error("pseudocode too long (max {max} characters)")]
    InputTooLong { max: usize },
    #[error("invalid file format")]
    InvalidFileFormat,
    #[error("uploaded file is empty")]
    EmptyUpload,
    #[error("could not read the file")]
    FileRead,
    #[error("could not save the file")]
    FileWrite,
    #[error("an error occurred during translation")]
    Translation,
    #[error("could not copy to the clipboard")]
    Clipboard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Validating,
    Rejected,
    Translating,
    Succeeded,
    Failed,
}

/// 一次翻译调用的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// 未通过校验，没有发出请求
    Rejected,
    Succeeded,
    Failed,
    /// 响应属于已被更新请求取代的旧请求，已丢弃
    Superseded,
}

/// 已通过校验、即将发送的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTicket {
    pub sequence: u64,
    pub source: String,
}

/// 待导出的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct WorkflowState {
    input: String,
    output: String,
    file_format: String,
    error: Option<String>,
    copy_feedback: Option<String>,
    phase: WorkflowPhase,
    latest_request: u64,
    copy_generation: u64,
    input_revision: u64,
}

/// 供视图渲染的只读快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    pub language: TargetLanguage,
    pub input: String,
    pub output: String,
    pub file_format: String,
    pub export_formats: Vec<String>,
    pub error: Option<String>,
    pub copy_label: String,
    pub phase: WorkflowPhase,
    /// 输入被界面以外的来源（上传）替换的次数；编辑不会增加
    pub input_revision: u64,
}

impl WorkflowSnapshot {
    pub fn busy(&self) -> bool {
        self.phase == WorkflowPhase::Translating
    }

    pub fn can_copy(&self) -> bool {
        !self.output.is_empty()
    }

    pub fn can_download(&self) -> bool {
        !self.output.is_empty() && !self.file_format.is_empty()
    }
}

impl WorkflowState {
    pub fn new(language: TargetLanguage) -> Self {
        Self {
            input: String::new(),
            output: String::new(),
            file_format: language.extension().to_string(),
            error: None,
            copy_feedback: None,
            phase: WorkflowPhase::Idle,
            latest_request: 0,
            copy_generation: 0,
            input_revision: 0,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn file_format(&self) -> &str {
        &self.file_format
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn copy_label(&self) -> &str {
        self.copy_feedback.as_deref().unwrap_or(COPY_LABEL_DEFAULT)
    }

    /// 直接替换输入，不做校验（校验推迟到翻译时）。旧的输出保持不变。
    pub fn set_input(&mut self, text: String) {
        self.input = text;
        self.phase = WorkflowPhase::Idle;
    }

    /// 按顺序校验，第一条失败的规则生效
    pub fn validate_input(&self) -> Result<(), WorkflowError> {
        if self.input.trim().is_empty() {
            return Err(WorkflowError::EmptyInput);
        }
        if self.input.encode_utf16().count() > MAX_INPUT_CHARS {
            return Err(WorkflowError::InputTooLong { max: MAX_INPUT_CHARS });
        }
        Ok(())
    }

    /// 校验输入并登记一个新的请求序号；之前未完成的请求从此失效
    pub fn begin_translation(&mut self) -> Result<TranslationTicket, WorkflowError> {
        self.phase = WorkflowPhase::Validating;
        if let Err(err) = self.validate_input() {
            self.record_error(err.clone());
            self.phase = WorkflowPhase::Rejected;
            return Err(err);
        }

        self.latest_request += 1;
        self.phase = WorkflowPhase::Translating;
        Ok(TranslationTicket {
            sequence: self.latest_request,
            source: self.input.clone(),
        })
    }

    /// 提交服务响应；只有最新请求的响应会被应用
    pub fn finish_translation<E>(
        &mut self,
        sequence: u64,
        result: Result<String, E>,
    ) -> TranslationOutcome {
        if sequence != self.latest_request {
            return TranslationOutcome::Superseded;
        }

        match result {
            Ok(code) => {
                self.output = code;
                self.error = None;
                self.phase = WorkflowPhase::Succeeded;
                TranslationOutcome::Succeeded
            }
            Err(_) => {
                self.record_error(WorkflowError::Translation);
                self.phase = WorkflowPhase::Failed;
                TranslationOutcome::Failed
            }
        }
    }

    /// 应用上传文件的内容：去除首尾空白，空内容不覆盖现有输入
    pub fn apply_upload(&mut self, content: &str) -> Result<(), WorkflowError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            self.record_error(WorkflowError::EmptyUpload);
            return Err(WorkflowError::EmptyUpload);
        }
        self.input = trimmed.to_string();
        self.input_revision += 1;
        self.error = None;
        self.phase = WorkflowPhase::Idle;
        Ok(())
    }

    pub fn record_error(&mut self, err: WorkflowError) {
        self.error = Some(err.to_string());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// 目标语言变化后调用：格式重置为该语言的默认扩展名，覆盖用户的手动选择
    pub fn on_language_changed(&mut self, language: TargetLanguage) {
        self.file_format = language.extension().to_string();
        self.phase = WorkflowPhase::Idle;
    }

    /// 手动选择导出格式，只接受当前语言提供的选项
    pub fn set_file_format(&mut self, format: &str, language: TargetLanguage) -> bool {
        if !language.export_formats().contains(&format) {
            return false;
        }
        self.file_format = format.to_string();
        true
    }

    /// 输出或格式为空时没有可导出的内容
    pub fn output_artifact(&self) -> Option<OutputArtifact> {
        if self.output.is_empty() || self.file_format.is_empty() {
            return None;
        }
        Some(OutputArtifact {
            file_name: format!("{}.{}", OUTPUT_FILE_STEM, self.file_format),
            mime_type: OUTPUT_MIME,
            bytes: self.output.as_bytes().to_vec(),
        })
    }

    /// 记录一次成功复制，返回本次反馈的代号（用于定时还原时判断是否过期）
    pub fn mark_copied(&mut self) -> u64 {
        self.copy_generation += 1;
        self.copy_feedback = Some(COPY_LABEL_DONE.to_string());
        self.error = None;
        self.copy_generation
    }

    /// 还原复制反馈；若之后又复制过则忽略
    pub fn revert_copy_feedback(&mut self, generation: u64) -> bool {
        if generation != self.copy_generation || self.copy_feedback.is_none() {
            return false;
        }
        self.copy_feedback = None;
        true
    }

    pub fn snapshot(&self, language: TargetLanguage) -> WorkflowSnapshot {
        WorkflowSnapshot {
            language,
            input: self.input.clone(),
            output: self.output.clone(),
            file_format: self.file_format.clone(),
            export_formats: language
                .export_formats()
                .into_iter()
                .map(str::to_string)
                .collect(),
            error: self.error.clone(),
            copy_label: self.copy_label().to_string(),
            phase: self.phase,
            input_revision: self.input_revision,
        }
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(TargetLanguage::default())
    }
}
