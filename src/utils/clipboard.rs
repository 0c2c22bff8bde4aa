//! Clipboard  cross-platform clipboard helpers

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("clipboard error: {0}")]
    Clip(String),
}

/// 剪贴板写入端；控制器只依赖这个接口
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// 系统剪贴板
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<(), ClipboardError> {
        copy_to_clipboard(text)
    }
}

/// 将文本复制到系统剪贴板
pub fn copy_to_clipboard(text: &str) -> Result<(), ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.set_contents(text.to_string())
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}

/// 从系统剪贴板获取文本（用于测试）
#[cfg(test)]
pub fn get_clipboard_contents() -> Result<String, ClipboardError> {
    use copypasta::{ClipboardContext, ClipboardProvider};
    let mut ctx = ClipboardContext::new().map_err(|e| ClipboardError::Clip(e.to_string()))?;
    ctx.get_contents()
        .map_err(|e| ClipboardError::Clip(e.to_string()))
}
