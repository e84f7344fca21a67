use std::io;

use quick_xml::{DeError as QuickXmlDeError, SeError as QuickXmlSeError};
use thiserror::Error;

/// 定义时间线与 XGES 之间转换过程中可能发生的各种错误。
#[derive(Error, Debug)]
pub enum ConvertError {
    /// XML 文档无法按 XGES 结构反序列化，通常来自 `quick-xml` 库。
    #[error("解析 XGES XML 失败: {0}")]
    XmlDeserialize(#[from] QuickXmlDeError),
    /// XML 序列化错误，通常来自 `quick-xml` 库。
    #[error("生成 XGES XML 失败: {0}")]
    XmlSerialize(#[from] QuickXmlSeError),
    /// 片段既没有源范围，也没有可用范围，无法确定时长。
    #[error("无法确定 '{item}' 的时长")]
    MissingDuration {
        /// 出错条目的名称。
        item: String,
    },
    /// 配置文件解析失败。
    #[error("配置解析失败: {0}")]
    Config(#[from] toml::de::Error),
    /// 从字节序列转换为 UTF-8 字符串失败。
    #[error("UTF-8 转换错误: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    /// 读写流时的 IO 错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
}

impl From<ConvertError> for std::io::Error {
    fn from(err: ConvertError) -> Self {
        std::io::Error::other(err)
    }
}

impl ConvertError {
    /// 创建一个 `MissingDuration` 错误。
    #[must_use]
    pub fn missing_duration(item: impl Into<String>) -> Self {
        Self::MissingDuration { item: item.into() }
    }
}
