//! 外部翻译服务

pub mod translation;
