//! 工具层：剪贴板与文件读写

pub mod clipboard;
pub mod fs;
