//! TranslationController：翻译工作流控制器
//!
//! 所有状态修改都经过这里，`WorkflowState` 由一把互斥锁保护，锁从不跨越 `.await`。
//! 每次修改后向订阅者广播一份 `WorkflowSnapshot`，视图据此刷新。

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::{sync::watch, task::JoinHandle};

use crate::model::{
    language::{LanguageSelection, TargetLanguage},
    workflow::{OutputArtifact, TranslationOutcome, WorkflowError, WorkflowSnapshot, WorkflowState},
};
use crate::service::translation::{ServiceError, TranslationService};
use crate::utils::{
    clipboard::ClipboardSink,
    fs::{read_text_file, write_file, FileHandle},
};

/// 复制成功提示的显示时长
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(2000);

#[derive(Clone)]
pub struct TranslationController {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<WorkflowState>,
    language: LanguageSelection,
    service: Arc<dyn TranslationService>,
    clipboard: Arc<dyn ClipboardSink>,
    request_timeout: Duration,
    snapshots: watch::Sender<WorkflowSnapshot>,
    /// 当前还原计时器及其对应的复制代号
    feedback_timer: Mutex<Option<(u64, JoinHandle<()>)>>,
}

impl TranslationController {
    pub fn new(
        service: Arc<dyn TranslationService>,
        clipboard: Arc<dyn ClipboardSink>,
        language: LanguageSelection,
        request_timeout: Duration,
    ) -> Self {
        let state = WorkflowState::new(language.current());
        let (snapshots, _rx) = watch::channel(state.snapshot(language.current()));
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                language,
                service,
                clipboard,
                request_timeout,
                snapshots,
                feedback_timer: Mutex::new(None),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.inner.snapshots.subscribe()
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.lock_state().snapshot(self.inner.language.current())
    }

    pub fn language(&self) -> &LanguageSelection {
        &self.inner.language
    }

    fn lock_state(&self) -> MutexGuard<'_, WorkflowState> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 在锁内修改状态，随后广播快照
    fn update<R>(&self, f: impl FnOnce(&mut WorkflowState) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.lock_state();
            let result = f(&mut state);
            (result, state.snapshot(self.inner.language.current()))
        };
        self.inner.snapshots.send_replace(snapshot);
        result
    }

    pub fn set_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.update(|state| state.set_input(text));
    }

    /// 唯一的语言写入口；语言确实变化时重置导出格式
    pub fn select_language(&self, language: TargetLanguage) {
        let changed = self.update(|state| {
            let changed = self.inner.language.select(language);
            if changed {
                state.on_language_changed(language);
            }
            changed
        });
        if changed {
            tracing::info!(language = %language, "目标语言已切换");
        }
    }

    pub fn set_file_format(&self, format: &str) {
        let language = self.inner.language.current();
        if !self.update(|state| state.set_file_format(format, language)) {
            tracing::warn!(format, language = %language, "忽略不在可选列表中的导出格式");
        }
    }

    pub fn dismiss_error(&self) {
        self.update(WorkflowState::clear_error);
    }

    /// 读取上传文件作为新输入；失败原因记录到状态中并同时返回
    pub async fn upload_file(&self, file: &FileHandle) -> Result<(), WorkflowError> {
        if !file.is_plain_text() {
            tracing::warn!(path = %file.path.display(), content_type = %file.content_type, "拒绝非纯文本文件");
            return Err(self.fail(WorkflowError::InvalidFileFormat));
        }

        let content = match read_text_file(&file.path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(path = %file.path.display(), "读取文件失败: {}", e);
                return Err(self.fail(WorkflowError::FileRead));
            }
        };

        let result = self.update(|state| state.apply_upload(&content));
        match &result {
            Ok(()) => tracing::info!(path = %file.path.display(), chars = content.trim().chars().count(), "已载入伪代码文件"),
            Err(e) => tracing::warn!(path = %file.path.display(), "上传被拒绝: {}", e),
        }
        result
    }

    /// 校验输入并调用翻译服务；只有最新一次请求的响应会被采用
    pub async fn translate(&self) -> TranslationOutcome {
        let language = self.inner.language.current();
        let ticket = match self.update(WorkflowState::begin_translation) {
            Ok(ticket) => ticket,
            Err(e) => {
                tracing::warn!("翻译请求未通过校验: {}", e);
                return TranslationOutcome::Rejected;
            }
        };

        tracing::info!(
            request = ticket.sequence,
            language = %language,
            chars = ticket.source.chars().count(),
            "发送翻译请求"
        );

        let timeout = self.inner.request_timeout;
        let result = match tokio::time::timeout(
            timeout,
            self.inner.service.translate(&ticket.source, language),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ServiceError::Timeout(timeout)),
        };

        if let Err(e) = &result {
            tracing::error!(request = ticket.sequence, "翻译服务调用失败: {}", e);
        }

        let outcome = self.update(|state| state.finish_translation(ticket.sequence, result));
        match outcome {
            TranslationOutcome::Superseded => {
                tracing::warn!(request = ticket.sequence, "丢弃过期的翻译响应")
            }
            TranslationOutcome::Succeeded => {
                tracing::info!(request = ticket.sequence, "翻译完成")
            }
            _ => {}
        }
        outcome
    }

    pub fn output_artifact(&self) -> Option<OutputArtifact> {
        self.lock_state().output_artifact()
    }

    /// 保存对话框的默认文件名；没有可导出内容时为 `None`
    pub fn suggested_file_name(&self) -> Option<String> {
        self.output_artifact().map(|a| a.file_name)
    }

    /// 把输出写入 `dir/output.<格式>`；没有输出时什么也不做
    pub async fn download_output(&self, dir: &Path) -> Option<PathBuf> {
        let artifact = self.output_artifact()?;
        let target = dir.join(&artifact.file_name);
        self.write_artifact(artifact, target).await
    }

    /// 把输出写入用户在保存对话框中选择的路径
    pub async fn save_output_as(&self, target: &Path) -> Option<PathBuf> {
        let artifact = self.output_artifact()?;
        self.write_artifact(artifact, target.to_path_buf()).await
    }

    async fn write_artifact(&self, artifact: OutputArtifact, target: PathBuf) -> Option<PathBuf> {
        match write_file(&target, &artifact.bytes).await {
            Ok(()) => {
                tracing::info!(path = %target.display(), bytes = artifact.bytes.len(), "输出已保存");
                self.update(WorkflowState::clear_error);
                Some(target)
            }
            Err(e) => {
                tracing::error!(path = %target.display(), "保存输出失败: {}", e);
                self.fail(WorkflowError::FileWrite);
                None
            }
        }
    }

    /// 复制输出到剪贴板；成功后提示文案在固定时长后自动还原
    pub async fn copy_output(&self) -> bool {
        let text = self.lock_state().output().to_string();
        if text.is_empty() {
            return false;
        }

        let clipboard = self.inner.clipboard.clone();
        let chars = text.chars().count();
        let result = tokio::task::spawn_blocking(move || clipboard.set_text(&text)).await;

        match result {
            Ok(Ok(())) => {
                let generation = self.update(WorkflowState::mark_copied);
                self.schedule_feedback_revert(generation);
                tracing::info!(chars, "输出已复制到剪贴板");
                true
            }
            Ok(Err(e)) => {
                tracing::error!("复制到剪贴板失败: {}", e);
                self.fail(WorkflowError::Clipboard);
                false
            }
            Err(e) => {
                tracing::error!("剪贴板任务异常结束: {}", e);
                self.fail(WorkflowError::Clipboard);
                false
            }
        }
    }

    /// 启动还原计时器，并取消上一次尚未触发的计时器。
    ///
    /// 计时器槽只接受不旧于当前的代号：并发复制的登记顺序可能与标记顺序相反，
    /// 较旧的复制不能顶替较新复制的计时器。
    fn schedule_feedback_revert(&self, generation: u64) {
        let mut timer = self
            .inner
            .feedback_timer
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if matches!(&*timer, Some((current, _)) if *current > generation) {
            tracing::debug!(generation, "已有更新的复制反馈计时器，跳过");
            return;
        }

        let controller = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(COPY_FEEDBACK_DURATION).await;
            controller.update(|state| state.revert_copy_feedback(generation));
        });
        if let Some((_, previous)) = timer.replace((generation, handle)) {
            previous.abort();
        }
    }

    fn fail(&self, err: WorkflowError) -> WorkflowError {
        self.update(|state| state.record_error(err.clone()));
        err
    }
}
