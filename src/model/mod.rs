//! 数据层：目标语言、工作流状态与输出展示

pub mod language;
pub mod output_view;
pub mod workflow;
