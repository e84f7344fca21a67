//! 结构字符串的词法/语法分析。
//!
//! 语法：`name, key=(type)value, key="quoted value";`
//! 值可以是带引号的字符串（内部允许转义的分隔符）、裸词，或 `[ ]`、`< >`、`{ }` 包围的复合值。

use super::{Field, Literal, Structure, StructureError};

pub(super) fn parse_structure(input: &str) -> Result<Structure, StructureError> {
    let mut lexer = Lexer { input, pos: 0 };
    lexer.structure()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl Lexer<'_> {
    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> StructureError {
        StructureError::Syntax {
            position: self.pos,
            message: message.into(),
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), StructureError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(format!("期望 '{expected}'")))
        }
    }

    /// 读取直到 `stop` 返回 true 的字符。转义序列原样保留，且不会被当作分隔符。
    fn token(&mut self, stop: impl Fn(char) -> bool) -> String {
        let mut token = String::new();
        while let Some(c) = self.peek() {
            if c == '\\' {
                token.push(c);
                self.bump();
                if let Some(escaped) = self.bump() {
                    token.push(escaped);
                }
                continue;
            }
            if stop(c) {
                break;
            }
            token.push(c);
            self.bump();
        }
        token
    }

    /// 读取引号内的内容（开引号已被消费），返回仍带转义的文本。
    fn quoted(&mut self) -> Result<String, StructureError> {
        let start = self.pos;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('\\') => {
                    text.push('\\');
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                }
                Some('"') => return Ok(text),
                Some(c) => text.push(c),
                None => {
                    return Err(StructureError::Syntax {
                        position: start,
                        message: "字符串缺少结束引号".to_string(),
                    });
                }
            }
        }
    }

    /// 读取 `[ ]`、`< >`、`{ }` 包围的复合值，包括括号本身。
    fn bracketed(&mut self, open: char) -> Result<String, StructureError> {
        let close = match open {
            '[' => ']',
            '<' => '>',
            _ => '}',
        };
        let start = self.pos;
        let mut depth = 0usize;
        let mut text = String::new();

        while let Some(c) = self.bump() {
            match c {
                '\\' => {
                    text.push(c);
                    if let Some(escaped) = self.bump() {
                        text.push(escaped);
                    }
                    continue;
                }
                '"' => {
                    text.push('"');
                    text.push_str(&self.quoted()?);
                    text.push('"');
                    continue;
                }
                _ => {}
            }
            text.push(c);
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(text);
                }
            }
        }

        Err(StructureError::Syntax {
            position: start,
            message: format!("复合值缺少 '{close}'"),
        })
    }

    fn structure(&mut self) -> Result<Structure, StructureError> {
        self.skip_whitespace();
        let name = self.token(|c| c == ',' || c == ';' || c.is_whitespace());
        if name.is_empty() {
            return Err(self.error("缺少结构名"));
        }

        let mut structure = Structure::new(name);
        loop {
            self.skip_whitespace();
            match self.peek() {
                // 分号之后若还有内容（caps 中的下一个结构），只取第一个结构
                None | Some(';') => return Ok(structure),
                Some(',') => {
                    self.bump();
                    let field = self.field()?;
                    structure.push_field(field);
                }
                Some(other) => return Err(self.error(format!("意外的字符 '{other}'"))),
            }
        }
    }

    fn field(&mut self) -> Result<Field, StructureError> {
        self.skip_whitespace();
        let key = self.token(|c| c == '=' || c == ',' || c == ';' || c.is_whitespace());
        if key.is_empty() {
            return Err(self.error("缺少字段名"));
        }

        self.skip_whitespace();
        self.expect('=')?;
        self.skip_whitespace();

        let type_tag = if self.eat('(') {
            let tag = self.token(|c| c == ')');
            self.expect(')')?;
            self.skip_whitespace();
            Some(tag)
        } else {
            None
        };

        let literal = match self.peek() {
            Some('"') => {
                self.bump();
                Literal::Quoted(self.quoted()?)
            }
            Some(open @ ('[' | '<' | '{')) => Literal::Bare(self.bracketed(open)?),
            _ => Literal::Bare(self.token(|c| c == ',' || c == ';' || c.is_whitespace())),
        };

        Ok(Field {
            key,
            type_tag,
            literal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_structure() {
        let s = parse_structure(r#"properties, name=(string)"clip1", mute=(boolean)false;"#)
            .unwrap();
        assert_eq!(s.name(), "properties");
        assert_eq!(s.fields().count(), 2);
        let first = s.fields().next().unwrap();
        assert_eq!(first.key, "name");
        assert_eq!(first.type_tag.as_deref(), Some("string"));
        assert_eq!(first.literal, Literal::Quoted("clip1".into()));
    }

    #[test]
    fn test_quoted_value_keeps_escaped_delimiters() {
        let s = parse_structure(
            r#"properties, restriction-caps=(string)"video/x-raw\,\ framerate\=\(fraction\)30/1", mixing=(boolean)true;"#,
        )
        .unwrap();
        let caps = s.fields().next().unwrap();
        assert_eq!(
            caps.literal,
            Literal::Quoted(r"video/x-raw\,\ framerate\=\(fraction\)30/1".into())
        );
        assert_eq!(s.fields().nth(1).unwrap().key, "mixing");
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let s = parse_structure(r#"metadatas, name=(string)"say\ \"hi\"\,\ ok";"#).unwrap();
        assert_eq!(
            s.fields().next().unwrap().literal,
            Literal::Quoted(r#"say\ \"hi\"\,\ ok"#.into())
        );
    }

    #[test]
    fn test_bracketed_values_and_namespaced_keys() {
        let s = parse_structure(
            "video/x-raw, framerate=(fraction)[ 0/1, 2147483647/1 ], GESVideoTransition::border=(uint)0",
        )
        .unwrap();
        let keys: Vec<_> = s.fields().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["framerate", "GESVideoTransition::border"]);
        assert_eq!(
            s.fields().next().unwrap().literal,
            Literal::Bare("[ 0/1, 2147483647/1 ]".into())
        );
    }

    #[test]
    fn test_only_first_structure_of_caps() {
        let s = parse_structure("video/x-raw, width=(int)640; audio/x-raw, rate=(int)48000").unwrap();
        assert_eq!(s.name(), "video/x-raw");
        assert_eq!(s.fields().count(), 1);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(
            parse_structure(""),
            Err(StructureError::Syntax { .. })
        ));
        assert!(matches!(
            parse_structure(r#"properties, name=(string)"unterminated;"#),
            Err(StructureError::Syntax { .. })
        ));
        assert!(matches!(
            parse_structure("properties, name"),
            Err(StructureError::Syntax { .. })
        ));
        assert!(matches!(
            parse_structure("properties extra"),
            Err(StructureError::Syntax { .. })
        ));
    }
}
