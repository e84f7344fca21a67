//! # GStreamer 结构字符串编解码
//!
//! XGES 中所有 `properties`、`metadatas`、`children-properties` 属性都是结构字符串：
//! `name, key1=(type1)value1, key2=(type2)value2;`。
//!
//! 字段在解析时只做词法切分，类型化的取值在访问时进行，
//! 因此某一个字段的字面量无效不会影响同一结构中的其它字段。

mod escape;
mod lexer;
mod value;

use std::{fmt, str::FromStr};

pub use escape::{escape, strip_escapes, unescape};
pub use value::{Fraction, GstValue, StructureError, ValueType};

/// 字段在源文本中的字面量。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// 带引号的字符串，保存引号内仍带转义的文本。
    Quoted(String),
    /// 裸词或复合值。
    Bare(String),
}

/// 结构中的一个字段。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub type_tag: Option<String>,
    pub literal: Literal,
}

impl Field {
    fn from_value(key: String, value: &GstValue) -> Self {
        let (text, quoted) = value.to_literal();
        Self {
            key,
            type_tag: Some(value.value_type().as_str().to_string()),
            literal: if quoted {
                Literal::Quoted(text)
            } else {
                Literal::Bare(text)
            },
        }
    }

    /// 按类型标签解析字段的值。
    pub fn value(&self) -> Result<GstValue, StructureError> {
        let text = match &self.literal {
            Literal::Quoted(text) | Literal::Bare(text) => text.as_str(),
        };

        match &self.type_tag {
            Some(tag) => {
                let value_type = ValueType::from_str(tag)
                    .map_err(|_| StructureError::UnknownType(tag.clone()))?;
                GstValue::parse(value_type, text)
            }
            None => match &self.literal {
                Literal::Quoted(text) => Ok(GstValue::String(unescape(text))),
                Literal::Bare(text) => Ok(GstValue::infer(text)),
            },
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.key)?;
        if let Some(tag) = &self.type_tag {
            write!(f, "({tag})")?;
        }
        match &self.literal {
            Literal::Quoted(text) => write!(f, "\"{text}\""),
            Literal::Bare(text) => write!(f, "{text}"),
        }
    }
}

/// 一个具名、字段有序的结构。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    name: String,
    fields: Vec<Field>,
}

impl Structure {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub(crate) fn push_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// 设置字段；已存在同名字段时替换它的值并保持位置。
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<GstValue>) {
        let field = Field::from_value(key.into(), &value.into());
        match self.fields.iter_mut().find(|f| f.key == field.key) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<GstValue>) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// 读取字段的值。`None` 表示字段不存在，这不是错误。
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Result<GstValue, StructureError>> {
        self.field(key).map(Field::value)
    }

    pub fn get_string(&self, key: &str) -> Result<Option<String>, StructureError> {
        self.get_typed(key, ValueType::String, |value| match value {
            GstValue::String(s) => Some(s),
            _ => None,
        })
    }

    pub fn get_fraction(&self, key: &str) -> Result<Option<Fraction>, StructureError> {
        self.get_typed(key, ValueType::Fraction, |value| match value {
            GstValue::Fraction(f) => Some(f),
            // 未标注类型的整数也可作为分数使用
            GstValue::Int(i) => Some(Fraction::new(i, 1)),
            _ => None,
        })
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>, StructureError> {
        self.get_typed(key, ValueType::Boolean, |value| match value {
            GstValue::Boolean(b) => Some(b),
            _ => None,
        })
    }

    /// 读取一个字符串字段，并把它的内容作为嵌套结构（例如 caps）解析。
    ///
    /// 嵌套内容在外层字符串中被完整转义过，因此这里去掉所有转义反斜杠后再解析。
    pub fn get_nested(&self, key: &str) -> Result<Option<Self>, StructureError> {
        let Some(field) = self.field(key) else {
            return Ok(None);
        };
        let text = match (&field.literal, field.type_tag.as_deref()) {
            (Literal::Quoted(text), _) => text,
            (Literal::Bare(text), None | Some("string" | "s" | "str")) => text,
            (Literal::Bare(_), Some(_)) => {
                let found = field.value()?.value_type().as_str();
                return Err(StructureError::TypeMismatch {
                    key: key.to_string(),
                    expected: ValueType::String.as_str(),
                    found,
                });
            }
        };
        strip_escapes(text).parse().map(Some)
    }

    fn get_typed<T>(
        &self,
        key: &str,
        expected: ValueType,
        extract: impl FnOnce(GstValue) -> Option<T>,
    ) -> Result<Option<T>, StructureError> {
        let Some(value) = self.get(key).transpose()? else {
            return Ok(None);
        };
        let found = value.value_type().as_str();
        extract(value).map(Some).ok_or_else(|| StructureError::TypeMismatch {
            key: key.to_string(),
            expected: expected.as_str(),
            found,
        })
    }

    /// 不带结尾分号的形式，用于 caps。
    #[must_use]
    pub fn to_caps_string(&self) -> String {
        let mut output = self.name.clone();
        for field in &self.fields {
            output.push_str(", ");
            output.push_str(&field.to_string());
        }
        output
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};", self.to_caps_string())
    }
}

impl FromStr for Structure {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lexer::parse_structure(s)
    }
}
