//! VM桥接层：连接Slint UI与翻译控制器
//!
//! 注意：回调绑定在main.rs中，因为依赖于Slint生成的类型
//! 这里只提供界面文案与状态栏映射

use crate::model::workflow::{WorkflowPhase, WorkflowSnapshot};

// === 常量定义（消除魔法值） ===
pub const STATUS_READY: &str = "Ready";
pub const STATUS_TRANSLATING: &str = "Translating...";
pub const STATUS_TRANSLATED: &str = "Translation complete";
pub const STATUS_REJECTED: &str = "Check the input and try again";
pub const STATUS_FAILED: &str = "Translation failed";
pub const STATUS_SAVED_PREFIX: &str = "Saved to ";
pub const STATUS_NO_FILE: &str = "No file selected";

/// 工作流阶段 → 状态栏文案
pub fn status_for(phase: WorkflowPhase) -> &'static str {
    match phase {
        WorkflowPhase::Idle => STATUS_READY,
        WorkflowPhase::Validating | WorkflowPhase::Translating => STATUS_TRANSLATING,
        WorkflowPhase::Rejected => STATUS_REJECTED,
        WorkflowPhase::Succeeded => STATUS_TRANSLATED,
        WorkflowPhase::Failed => STATUS_FAILED,
    }
}

/// 语言下拉框的显示文案
pub fn language_labels() -> Vec<&'static str> {
    crate::model::language::TargetLanguage::ALL
        .iter()
        .map(|l| l.label())
        .collect()
}

/// 导出格式下拉框文案（带点前缀），与快照中的格式一一对应
pub fn format_label(format: &str) -> String {
    format!(".{}", format)
}

/// 下拉框文案还原为格式
pub fn format_from_label(label: &str) -> &str {
    label.strip_prefix('.').unwrap_or(label)
}

/// 相邻两份快照之间需要重建的界面部分，其余字段每次直接赋值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRefresh {
    /// 输入框只在被上传替换时回写，用户自己的编辑不回写
    pub input: bool,
    pub formats: bool,
    pub output: bool,
}

impl ViewRefresh {
    pub const ALL: Self = Self {
        input: true,
        formats: true,
        output: true,
    };

    pub fn between(previous: &WorkflowSnapshot, next: &WorkflowSnapshot) -> Self {
        Self {
            input: next.input_revision != previous.input_revision,
            formats: next.language != previous.language || next.file_format != previous.file_format,
            output: next.output != previous.output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{language::TargetLanguage, workflow::WorkflowState};

    #[test]
    fn test_status_for_each_phase() {
        assert_eq!(status_for(WorkflowPhase::Idle), STATUS_READY);
        assert_eq!(status_for(WorkflowPhase::Translating), STATUS_TRANSLATING);
        assert_eq!(status_for(WorkflowPhase::Succeeded), STATUS_TRANSLATED);
        assert_eq!(status_for(WorkflowPhase::Failed), STATUS_FAILED);
        assert_eq!(status_for(WorkflowPhase::Rejected), STATUS_REJECTED);
    }

    #[test]
    fn test_language_labels_follow_selector_order() {
        assert_eq!(language_labels(), vec!["Python", "Java"]);
    }

    #[test]
    fn test_format_labels_round_trip() {
        assert_eq!(format_label("py"), ".py");
        assert_eq!(format_from_label(".java"), "java");
        assert_eq!(format_from_label("txt"), "txt");
    }

    #[test]
    fn test_typing_never_rewrites_input() {
        let mut state = WorkflowState::new(TargetLanguage::Python);
        let before = state.snapshot(TargetLanguage::Python);
        state.set_input("ab".into());
        let after = state.snapshot(TargetLanguage::Python);

        let refresh = ViewRefresh::between(&before, &after);
        assert!(!refresh.input);
        assert!(!refresh.formats);
        assert!(!refresh.output);
    }

    #[test]
    fn test_upload_rewrites_input() {
        let mut state = WorkflowState::new(TargetLanguage::Python);
        state.set_input("abc".into());
        let before = state.snapshot(TargetLanguage::Python);
        state.apply_upload("read x").unwrap();
        let after = state.snapshot(TargetLanguage::Python);

        assert!(ViewRefresh::between(&before, &after).input);
    }

    #[test]
    fn test_format_and_output_refresh_only_on_change() {
        let mut state = WorkflowState::new(TargetLanguage::Python);
        state.set_input("print x".into());
        let before = state.snapshot(TargetLanguage::Python);

        let ticket = state.begin_translation().unwrap();
        state.finish_translation::<()>(ticket.sequence, Ok("print(x)".into()));
        let translated = state.snapshot(TargetLanguage::Python);
        let refresh = ViewRefresh::between(&before, &translated);
        assert!(refresh.output);
        assert!(!refresh.formats);

        state.on_language_changed(TargetLanguage::Java);
        let switched = state.snapshot(TargetLanguage::Java);
        let refresh = ViewRefresh::between(&translated, &switched);
        assert!(refresh.formats);
        assert!(!refresh.output);
    }
}
