//! # 结构字符串的类型化字面量
//!
//! 支持的类型：boolean、int、uint、float、fraction、string。

use std::{fmt, str::FromStr};

use strum_macros::EnumString;
use thiserror::Error;

use super::escape;

/// 结构字符串解析或取值时的错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// 结构字符串本身的语法错误。
    #[error("结构字符串语法错误，位置 {position}: {message}")]
    Syntax { position: usize, message: String },
    /// 字面量无法按声明的类型解析。
    #[error("无法将 '{literal}' 解析为 {value_type}")]
    MalformedLiteral {
        value_type: &'static str,
        literal: String,
    },
    /// 分数的分母为 0。
    #[error("分数 '{0}' 的分母为 0")]
    ZeroDenominator(String),
    /// 类型标签不受支持。
    #[error("不支持的类型标签 '{0}'")]
    UnknownType(String),
    /// 字段存在，但类型与调用方期望的不同。
    #[error("字段 '{key}' 的类型为 {found}，期望 {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// 字面量的类型标签，解析时接受 GStreamer 的常见别名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ValueType {
    #[strum(serialize = "boolean", serialize = "bool", serialize = "b")]
    Boolean,
    #[strum(serialize = "int", serialize = "i", serialize = "gint", serialize = "int64")]
    Int,
    #[strum(
        serialize = "uint",
        serialize = "u",
        serialize = "guint",
        serialize = "uint64"
    )]
    UInt,
    #[strum(
        serialize = "float",
        serialize = "f",
        serialize = "double",
        serialize = "d",
        serialize = "gdouble"
    )]
    Float,
    #[strum(serialize = "fraction")]
    Fraction,
    #[strum(serialize = "string", serialize = "s", serialize = "str")]
    String,
}

impl ValueType {
    /// 输出时使用的规范类型名。
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Int => "int",
            Self::UInt => "uint",
            Self::Float => "float",
            Self::Fraction => "fraction",
            Self::String => "string",
        }
    }
}

/// 形如 `num/den` 的分数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    pub numerator: i64,
    pub denominator: i64,
}

impl Fraction {
    #[must_use]
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// 选择一个能表示给定帧率的分数：整数帧率写作 `N/1`，
    /// NTSC 类帧率写作 `N*1000/1001`，其余按千分之一精度约分。
    #[must_use]
    pub fn from_rate(rate: f64) -> Self {
        if !rate.is_finite() || rate <= 0.0 {
            return Self::new(0, 1);
        }

        let rounded = rate.round();
        if (rate - rounded).abs() < 1e-6 {
            return Self::new(rounded as i64, 1);
        }

        let ntsc = rate * 1001.0 / 1000.0;
        if (ntsc - ntsc.round()).abs() < 1e-3 {
            return Self::new(ntsc.round() as i64 * 1000, 1001);
        }

        let millis = (rate * 1000.0).round() as i64;
        let divisor = gcd(millis, 1000);
        Self::new(millis / divisor, 1000 / divisor)
    }
}

const fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    if a == 0 { 1 } else { a.abs() }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Fraction {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || StructureError::MalformedLiteral {
            value_type: ValueType::Fraction.as_str(),
            literal: s.to_string(),
        };

        let (num_str, den_str) = s.split_once('/').unwrap_or((s, "1"));
        let numerator = num_str.trim().parse::<i64>().map_err(|_| malformed())?;
        let denominator = den_str.trim().parse::<i64>().map_err(|_| malformed())?;
        if denominator == 0 {
            return Err(StructureError::ZeroDenominator(s.to_string()));
        }
        Ok(Self::new(numerator, denominator))
    }
}

/// 结构字段的值。
#[derive(Debug, Clone, PartialEq)]
pub enum GstValue {
    Boolean(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Fraction(Fraction),
    String(String),
}

impl GstValue {
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Boolean(_) => ValueType::Boolean,
            Self::Int(_) => ValueType::Int,
            Self::UInt(_) => ValueType::UInt,
            Self::Float(_) => ValueType::Float,
            Self::Fraction(_) => ValueType::Fraction,
            Self::String(_) => ValueType::String,
        }
    }

    /// 按类型解析字面量。`text` 为源文本中的原样内容（字符串仍带转义）。
    pub(super) fn parse(value_type: ValueType, text: &str) -> Result<Self, StructureError> {
        let malformed = || StructureError::MalformedLiteral {
            value_type: value_type.as_str(),
            literal: text.to_string(),
        };

        match value_type {
            ValueType::Boolean => parse_boolean(text).map(Self::Boolean).ok_or_else(malformed),
            ValueType::Int => text.parse().map(Self::Int).map_err(|_| malformed()),
            ValueType::UInt => text.parse().map(Self::UInt).map_err(|_| malformed()),
            ValueType::Float => text.parse().map(Self::Float).map_err(|_| malformed()),
            ValueType::Fraction => text.parse().map(Self::Fraction),
            ValueType::String => Ok(Self::String(escape::unescape(text))),
        }
    }

    /// 没有类型标签的裸字面量：依次尝试整数、浮点数、布尔值，最后作为字符串。
    pub(super) fn infer(text: &str) -> Self {
        if let Ok(i) = text.parse::<i64>() {
            Self::Int(i)
        } else if let Ok(f) = text.parse::<f64>() {
            Self::Float(f)
        } else if let Some(b) = parse_boolean(text) {
            Self::Boolean(b)
        } else {
            Self::String(escape::unescape(text))
        }
    }

    /// 输出为字面量文本；字符串会被转义，并需要加引号。
    pub(super) fn to_literal(&self) -> (String, bool) {
        match self {
            Self::Boolean(b) => (b.to_string(), false),
            Self::Int(i) => (i.to_string(), false),
            Self::UInt(u) => (u.to_string(), false),
            Self::Float(f) => (f.to_string(), false),
            Self::Fraction(fr) => (fr.to_string(), false),
            Self::String(s) => (escape::escape(s), true),
        }
    }
}

fn parse_boolean(text: &str) -> Option<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "t" | "1" => Some(true),
        "false" | "no" | "f" | "0" => Some(false),
        _ => None,
    }
}

impl From<bool> for GstValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for GstValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for GstValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u64> for GstValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<u32> for GstValue {
    fn from(value: u32) -> Self {
        Self::UInt(u64::from(value))
    }
}

impl From<f64> for GstValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Fraction> for GstValue {
    fn from(value: Fraction) -> Self {
        Self::Fraction(value)
    }
}

impl From<&str> for GstValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for GstValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_parsing() {
        assert_eq!("30/1".parse::<Fraction>().unwrap(), Fraction::new(30, 1));
        assert_eq!("25".parse::<Fraction>().unwrap(), Fraction::new(25, 1));
        assert!(matches!(
            "30/0".parse::<Fraction>(),
            Err(StructureError::ZeroDenominator(_))
        ));
        assert!(matches!(
            "thirty/1".parse::<Fraction>(),
            Err(StructureError::MalformedLiteral { .. })
        ));
    }

    #[test]
    fn test_fraction_from_rate() {
        assert_eq!(Fraction::from_rate(25.0), Fraction::new(25, 1));
        assert_eq!(Fraction::from_rate(24000.0 / 1001.0), Fraction::new(24000, 1001));
        assert_eq!(Fraction::from_rate(29.97), Fraction::new(30000, 1001));
        assert_eq!(Fraction::from_rate(12.5), Fraction::new(25, 2));
        assert_eq!(Fraction::from_rate(0.0), Fraction::new(0, 1));
    }

    #[test]
    fn test_value_type_aliases() {
        assert_eq!("int".parse::<ValueType>().unwrap(), ValueType::Int);
        assert_eq!("uint64".parse::<ValueType>().unwrap(), ValueType::UInt);
        assert_eq!("double".parse::<ValueType>().unwrap(), ValueType::Float);
        assert_eq!("Boolean".parse::<ValueType>().unwrap(), ValueType::Boolean);
        assert!("GstCaps".parse::<ValueType>().is_err());
    }

    #[test]
    fn test_parse_typed_literals() {
        assert_eq!(
            GstValue::parse(ValueType::Boolean, "yes").unwrap(),
            GstValue::Boolean(true)
        );
        assert_eq!(
            GstValue::parse(ValueType::String, r"Hello\ World").unwrap(),
            GstValue::String("Hello World".into())
        );
        assert!(GstValue::parse(ValueType::Int, "1.5").is_err());
        assert_eq!(GstValue::infer("1"), GstValue::Int(1));
        assert_eq!(GstValue::infer("0.5"), GstValue::Float(0.5));
        assert_eq!(GstValue::infer("bars"), GstValue::String("bars".into()));
    }

    #[test]
    fn test_float_literal_is_compact() {
        assert_eq!(GstValue::Float(1.0).to_literal(), ("1".to_string(), false));
    }
}
