//! 目标语言与导出格式推导
//!
//! 目标语言是多个视图共享的唯一状态：只有一个写入口（`LanguageSelection::select`），
//! 其余视图通过订阅读取。文件扩展名等派生值全部由这里的纯函数计算。

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// 未知语言时使用的扩展名
pub const FALLBACK_EXTENSION: &str = "txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    #[default]
    Python,
    Java,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported target language: {0}")]
pub struct UnknownLanguage(pub String);

impl TargetLanguage {
    /// 语言选择器中的全部选项（顺序即显示顺序）
    pub const ALL: [TargetLanguage; 2] = [TargetLanguage::Python, TargetLanguage::Java];

    /// 翻译服务 `lang` 查询参数使用的代码
    pub fn code(self) -> &'static str {
        match self {
            TargetLanguage::Python => "python",
            TargetLanguage::Java => "java",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TargetLanguage::Python => "Python",
            TargetLanguage::Java => "Java",
        }
    }

    pub fn extension(self) -> &'static str {
        extension_for(self.code())
    }

    /// 当前语言可选的导出格式：语言扩展名在前，`txt` 总是可选
    pub fn export_formats(self) -> Vec<&'static str> {
        let mut formats = vec![self.extension()];
        if !formats.contains(&FALLBACK_EXTENSION) {
            formats.push(FALLBACK_EXTENSION);
        }
        formats
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|l| *l == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TargetLanguage {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.code() == code)
            .ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

/// 语言代码 → 文件扩展名。对任意输入都有结果，未知值一律回退为 `txt`。
pub fn extension_for(language: &str) -> &'static str {
    match language {
        "python" => "py",
        "java" => "java",
        _ => FALLBACK_EXTENSION,
    }
}

/// 会话级共享的目标语言单元
#[derive(Debug, Clone)]
pub struct LanguageSelection {
    tx: Arc<watch::Sender<TargetLanguage>>,
}

impl LanguageSelection {
    pub fn new(initial: TargetLanguage) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> TargetLanguage {
        *self.tx.borrow()
    }

    /// 写入新语言；值确实发生变化时返回 `true` 并通知所有订阅者
    pub fn select(&self, language: TargetLanguage) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == language {
                false
            } else {
                *current = language;
                true
            }
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<TargetLanguage> {
        self.tx.subscribe()
    }
}

impl Default for LanguageSelection {
    fn default() -> Self {
        Self::new(TargetLanguage::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_for_known_and_unknown() {
        assert_eq!(extension_for("python"), "py");
        assert_eq!(extension_for("java"), "java");
        assert_eq!(extension_for("c"), "txt");
        assert_eq!(extension_for(""), "txt");
        assert_eq!(extension_for("Python"), "txt", "匹配区分大小写");
    }

    #[test]
    fn test_export_formats_always_offer_txt() {
        assert_eq!(TargetLanguage::Python.export_formats(), vec!["py", "txt"]);
        assert_eq!(TargetLanguage::Java.export_formats(), vec!["java", "txt"]);
    }

    #[test]
    fn test_parse_language_codes() {
        assert_eq!("python".parse::<TargetLanguage>(), Ok(TargetLanguage::Python));
        assert_eq!(" Java ".parse::<TargetLanguage>(), Ok(TargetLanguage::Java));
        assert!("cobol".parse::<TargetLanguage>().is_err());
    }

    #[test]
    fn test_index_round_trip() {
        for language in TargetLanguage::ALL {
            assert_eq!(TargetLanguage::from_index(language.index()), Some(language));
        }
        assert_eq!(TargetLanguage::from_index(7), None);
    }

    #[test]
    fn test_selection_notifies_only_on_change() {
        let selection = LanguageSelection::new(TargetLanguage::Python);
        let mut rx = selection.subscribe();

        assert!(!selection.select(TargetLanguage::Python));
        assert!(!rx.has_changed().unwrap());

        assert!(selection.select(TargetLanguage::Java));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), TargetLanguage::Java);
        assert_eq!(selection.current(), TargetLanguage::Java);
    }

    #[test]
    fn test_selection_clones_share_state() {
        let selection = LanguageSelection::default();
        let view = selection.clone();
        selection.select(TargetLanguage::Java);
        assert_eq!(view.current(), TargetLanguage::Java);
    }
}
