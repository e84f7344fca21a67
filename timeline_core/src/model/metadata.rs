//! 保留命名空间 `xges` 下的扩展元数据。

use serde::{Deserialize, Serialize};

/// 扩展元数据在序列化时使用的保留命名空间。
pub const XGES_METADATA_NAMESPACE: &str = "xges";

/// 时间线模型无法表达、但需要在 XGES 往返中保留的信息。
///
/// `children_properties` 是对应 XGES 元素的原始 `children-properties`
/// 字符串，编码时原样写回，因此未建模的内容可以逐字节往返。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct XgesMetadata {
    /// 原始 `children-properties` 结构字符串。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children_properties: Option<String>,
    /// 标题片段的文字内容。
    ///
    /// 只在 `children_properties` 为空时用于生成 `text` 字段；已有原始字符串时
    /// 编码器原样写回原始字符串，此处的修改不会出现在输出中。要改写解码得到的
    /// 标题文字，需同时清空 `children_properties`。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// 解码时记录的片段类别，例如 `title`。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_type: Option<String>,
}

impl XgesMetadata {
    /// 所有字段均未设置。
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.children_properties.is_none() && self.text.is_none() && self.clip_type.is_none()
    }
}

/// 片段和转场携带的元数据，按命名空间划分。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(
        rename = "xges",
        default,
        skip_serializing_if = "XgesMetadata::is_empty"
    )]
    pub xges: XgesMetadata,
}

impl Metadata {
    /// 只包含 `children-properties` 的元数据。
    #[must_use]
    pub fn with_children_properties(children_properties: impl Into<String>) -> Self {
        Self {
            xges: XgesMetadata {
                children_properties: Some(children_properties.into()),
                ..Default::default()
            },
        }
    }
}
