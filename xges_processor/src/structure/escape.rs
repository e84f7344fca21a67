//! 结构字符串中字符串值的转义规则。
//!
//! 只处理四个字符：反斜杠、双引号、空格和逗号。

/// 转义字符串值。反斜杠必须最先处理，否则会被二次转义。
#[must_use]
pub fn escape(s: &str) -> String {
    s.replace('\\', r"\\")
        .replace('"', r#"\""#)
        .replace(' ', r"\ ")
        .replace(',', r"\,")
}

/// 恰好还原 [`escape`] 产生的四种转义序列，其它反斜杠原样保留。
#[must_use]
pub fn unescape(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\\'
            && let Some(&next) = chars.peek()
            && matches!(next, '\\' | '"' | ' ' | ',')
        {
            output.push(next);
            chars.next();
            continue;
        }
        output.push(c);
    }

    output
}

/// 去掉所有转义反斜杠，保留其后的字符。
///
/// 嵌套在字符串值中的 caps（例如 `restriction-caps`）由 GStreamer 写出时，
/// `=`、`(`、`)` 等字符也会被转义，解析前需要整体还原。
#[must_use]
pub fn strip_escapes(s: &str) -> String {
    let mut output = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                output.push(next);
            }
            continue;
        }
        output.push(c);
    }

    output
}
