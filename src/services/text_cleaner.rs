//! 文本清洗
//!
//! 上传的文档经常夹带 NUL、SUB 之类的控制字符，这里统一处理。
//! 文件加载器和解析器都会调用，解析器那一侧是兜底。

/// 是否属于需要替换的控制字符（U+0000-U+001F、U+007F-U+009F）
fn is_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}

/// 统一换行符并清理控制字符
///
/// - `\r\n` 和 `\r` 统一为 `\n`
/// - NUL / SUB / ETX 直接删除
/// - 其余控制字符（`\n` 除外）替换为一个空格
/// - 去掉首尾空白
pub fn normalize_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let cleaned: String = unified
        .chars()
        .filter(|c| !matches!(c, '\u{0000}' | '\u{001A}' | '\u{0003}'))
        .map(|c| if c != '\n' && is_control(c) { ' ' } else { c })
        .collect();

    cleaned.trim().to_string()
}

/// 切分成去掉首尾空白的非空行
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_text("a\r\nb\rc\n"), "a\nb\nc");
    }

    #[test]
    fn test_control_chars_replaced() {
        assert_eq!(normalize_text("1.\tWhat\u{0085}is?"), "1. What is?");
        assert_eq!(normalize_text("A)\u{0000}3\u{001A}"), "A)3");
        assert_eq!(normalize_text("x\u{007F}y"), "x y");
    }

    #[test]
    fn test_split_lines_drops_blank() {
        let lines = split_lines("  one \n\n   \n two");
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }
}
