//! 输出展示：把空格渲染为可见的中点，便于检查缩进

/// 空格的可见替代字符
pub const VISIBLE_SPACE: char = '·';

/// 按行渲染输出，每个空格替换为 `·`，换行保持不变
pub fn visualize_whitespace(code: &str) -> Vec<String> {
    code.lines()
        .map(|line| line.replace(' ', &VISIBLE_SPACE.to_string()))
        .collect()
}

/// 视图使用的输出文本；只影响显示，复制和下载始终使用原文
pub fn render_output(code: &str, show_whitespace: bool) -> String {
    if show_whitespace {
        visualize_whitespace(code).join("\n")
    } else {
        code.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_become_dots() {
        let lines = visualize_whitespace("def f():\n    return 1");
        assert_eq!(lines, vec!["def·f():", "····return·1"]);
    }

    #[test]
    fn test_tabs_are_left_alone() {
        assert_eq!(visualize_whitespace("\tx"), vec!["\tx"]);
    }

    #[test]
    fn test_render_passthrough_when_disabled() {
        let code = "if x:\n    y()\n";
        assert_eq!(render_output(code, false), code);
        assert_eq!(render_output(code, true), "if·x:\n····y()");
    }
}
