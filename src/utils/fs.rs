//! IO helper: async text file read/write and declared content types

use std::path::{Path, PathBuf};

pub const TEXT_PLAIN: &str = "text/plain";

/// 用户选择的文件及其声明的内容类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub path: PathBuf,
    pub content_type: String,
}

impl FileHandle {
    /// 根据扩展名推断内容类型
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let content_type = content_type_for(&path).to_string();
        Self { path, content_type }
    }

    pub fn with_content_type(path: impl Into<PathBuf>, content_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_type: content_type.into(),
        }
    }

    pub fn is_plain_text(&self) -> bool {
        self.content_type == TEXT_PLAIN
    }
}

/// 扩展名 → MIME 类型（只覆盖常见的文本与文档类型）
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "text" => TEXT_PLAIN,
        "py" => "text/x-python",
        "java" => "text/x-java",
        "md" => "text/markdown",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// 异步读取 UTF-8 文本文件
pub async fn read_text_file(p: &Path) -> std::io::Result<String> {
    tokio::fs::read_to_string(p).await
}

/// 异步写入文件（覆盖已有内容）
pub async fn write_file(p: &Path, bytes: &[u8]) -> std::io::Result<()> {
    tokio::fs::write(p, bytes).await
}
