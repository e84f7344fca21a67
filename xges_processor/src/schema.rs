//! # XGES 文档结构
//!
//! 与 XGES XML 一一对应的 serde 结构，通过 `quick-xml` 的 serialize 功能读写。
//! 以 `@` 开头的字段映射为属性，其余字段映射为子元素。

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// GStreamer 时间单位：每秒的纳秒数。
pub const GST_SECOND: u64 = 1_000_000_000;

bitflags! {
    /// `GESTrackType` 位掩码。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct TrackTypes: u32 {
        const UNKNOWN = 1 << 0;
        const AUDIO   = 1 << 1;
        const VIDEO   = 1 << 2;
        const TEXT    = 1 << 3;
        const CUSTOM  = 1 << 4;
    }
}

impl TrackTypes {
    /// 从文档中的整数还原，忽略未定义的位。
    #[must_use]
    pub const fn from_attr(bits: u32) -> Self {
        Self::from_bits_truncate(bits)
    }
}

/// XGES 片段类型名。
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum ClipTypeName {
    #[strum(serialize = "GESUriClip")]
    Uri,
    #[strum(serialize = "GESTransitionClip")]
    Transition,
    #[strum(serialize = "GESTestClip")]
    Test,
    #[strum(serialize = "GESTitleClip")]
    Title,
}

impl ClipTypeName {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uri => "GESUriClip",
            Self::Transition => "GESTransitionClip",
            Self::Test => "GESTestClip",
            Self::Title => "GESTitleClip",
        }
    }
}

/// 根元素 `<ges>`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "ges")]
pub struct Ges {
    #[serde(rename = "@version")]
    pub version: String,
    pub project: Project,
}

/// `<project>` 元素。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "@properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
    #[serde(rename = "@metadatas", default, skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<String>,
    pub timeline: XgesTimeline,
}

/// `<timeline>` 元素。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XgesTimeline {
    #[serde(rename = "@properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
    #[serde(rename = "@metadatas", default, skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<String>,
    #[serde(rename = "track", default)]
    pub tracks: Vec<XgesTrack>,
    #[serde(rename = "layer", default)]
    pub layers: Vec<Layer>,
}

/// `<track>` 元素，声明一条输出轨道。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XgesTrack {
    #[serde(rename = "@caps", default)]
    pub caps: String,
    #[serde(rename = "@track-type")]
    pub track_type: u32,
    #[serde(rename = "@track-id", default)]
    pub track_id: u32,
    #[serde(rename = "@properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
    #[serde(rename = "@metadatas", default, skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<String>,
}

impl XgesTrack {
    #[must_use]
    pub const fn track_types(&self) -> TrackTypes {
        TrackTypes::from_attr(self.track_type)
    }
}

/// `<layer>` 元素，按优先级排列的片段容器。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    #[serde(rename = "@priority", default)]
    pub priority: u32,
    #[serde(rename = "@properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
    #[serde(rename = "@metadatas", default, skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<String>,
    #[serde(rename = "clip", default)]
    pub clips: Vec<XgesClip>,
}

/// `<clip>` 元素。所有时间均为纳秒。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XgesClip {
    #[serde(rename = "@id", default)]
    pub id: u32,
    #[serde(rename = "@asset-id", default)]
    pub asset_id: String,
    #[serde(rename = "@type-name")]
    pub type_name: String,
    #[serde(rename = "@layer-priority", default)]
    pub layer_priority: u32,
    #[serde(rename = "@track-types")]
    pub track_types: u32,
    #[serde(rename = "@start")]
    pub start: u64,
    #[serde(rename = "@duration")]
    pub duration: u64,
    #[serde(rename = "@inpoint", default)]
    pub inpoint: u64,
    /// 未使用，始终为 0。
    #[serde(rename = "@rate", default)]
    pub rate: i32,
    #[serde(rename = "@properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<String>,
    #[serde(rename = "@metadatas", default, skip_serializing_if = "Option::is_none")]
    pub metadatas: Option<String>,
    #[serde(
        rename = "@children-properties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub children_properties: Option<String>,
}

impl XgesClip {
    #[must_use]
    pub const fn track_types(&self) -> TrackTypes {
        TrackTypes::from_attr(self.track_types)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_types_bits() {
        assert_eq!(TrackTypes::AUDIO.bits(), 2);
        assert_eq!(TrackTypes::VIDEO.bits(), 4);
        let both = TrackTypes::from_attr(6);
        assert!(both.contains(TrackTypes::AUDIO | TrackTypes::VIDEO));
        assert_eq!(TrackTypes::from_attr(64), TrackTypes::empty());
    }

    #[test]
    fn test_clip_type_names() {
        assert_eq!("GESUriClip".parse::<ClipTypeName>().unwrap(), ClipTypeName::Uri);
        assert_eq!(ClipTypeName::Title.as_str(), "GESTitleClip");
        assert!("GESGroup".parse::<ClipTypeName>().is_err());
    }

    #[test]
    fn test_deserialize_clip_element() {
        let xml = r#"<clip id='3' asset-id='file:///a.mp4' type-name='GESUriClip' layer-priority='0' track-types='4' start='0' duration='1000000000' inpoint='0' rate='0' properties='properties, name=(string)"a";'/>"#;
        let clip: XgesClip = quick_xml::de::from_str(xml).unwrap();
        assert_eq!(clip.id, 3);
        assert_eq!(clip.duration, GST_SECOND);
        assert_eq!(clip.track_types(), TrackTypes::VIDEO);
        assert_eq!(clip.children_properties, None);
    }

    #[test]
    fn test_missing_duration_is_rejected() {
        let xml = "<clip type-name='GESUriClip' track-types='4' start='0'/>";
        assert!(quick_xml::de::from_str::<XgesClip>(xml).is_err());
    }
}
