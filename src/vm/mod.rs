//! 视图模型层：工作流控制器与界面桥接

pub mod bridge;
pub mod controller;
