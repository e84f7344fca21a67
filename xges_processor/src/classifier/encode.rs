//! 时间线节点 → XGES `<clip>` 元素。

use timeline_core::{
    Clip, ConvertError, MediaReference, Transition, XgesGenerationOptions, XgesMetadata,
};
use tracing::debug;

use super::{DEFAULT_TEST_PATTERN, TITLE_GENERATOR_KIND, transition_asset_id};
use crate::schema::{ClipTypeName, TrackTypes, XgesClip};
use crate::structure::Structure;
use crate::time::to_nanoseconds;

/// 生成单个片段元素所需的位置信息。
#[derive(Debug, Clone, Copy)]
pub(crate) struct ElementContext<'a> {
    pub id: u32,
    /// 片段在图层上的起点（纳秒）。
    pub start: u64,
    pub layer_priority: u32,
    pub track_types: TrackTypes,
    pub options: &'a XgesGenerationOptions,
}

impl ElementContext<'_> {
    fn element(&self, type_name: ClipTypeName, asset_id: String, name: &str) -> XgesClip {
        XgesClip {
            id: self.id,
            asset_id,
            type_name: type_name.as_str().to_string(),
            layer_priority: self.layer_priority,
            track_types: self.track_types.bits(),
            start: self.start,
            rate: 0,
            properties: Some(clip_properties(name)),
            ..Default::default()
        }
    }
}

/// 片段的 `properties` 结构字符串。
fn clip_properties(name: &str) -> String {
    Structure::new("properties")
        .with_field("name", name)
        .with_field("mute", false)
        .with_field("is-image", false)
        .to_string()
}

/// 标题片段的 `children-properties`：已有原始字符串时原样使用，否则由 `text` 生成。
fn title_children_properties(metadata: &XgesMetadata) -> Option<String> {
    metadata.children_properties.clone().or_else(|| {
        metadata.text.as_deref().map(|text| {
            Structure::new("properties")
                .with_field("text", text)
                .to_string()
        })
    })
}

/// 把一个片段转换为 `<clip>` 元素。
pub(crate) fn encode_clip(clip: &Clip, ctx: &ElementContext<'_>) -> Result<XgesClip, ConvertError> {
    let duration = to_nanoseconds(clip.duration()?);
    let inpoint = to_nanoseconds(clip.source_start());

    let name = if clip.name.is_empty() {
        format!("clip{}", ctx.id)
    } else {
        clip.name.clone()
    };

    let xges = &clip.metadata.xges;
    let missing_uri = || ctx.options.missing_media_uri.clone();

    let (type_name, asset_id, children_properties) = match &clip.media_reference {
        MediaReference::External { target_url, .. } => {
            let asset_id = if target_url.is_empty() {
                debug!("片段 '{name}' 的外部引用没有 URI，使用缺失文件 URI");
                missing_uri()
            } else {
                target_url.clone()
            };
            (ClipTypeName::Uri, asset_id, xges.children_properties.clone())
        }
        MediaReference::Generator { generator_kind } if generator_kind == TITLE_GENERATOR_KIND => (
            ClipTypeName::Title,
            ClipTypeName::Title.as_str().to_string(),
            title_children_properties(xges),
        ),
        MediaReference::Generator { generator_kind } => {
            let asset_id = if generator_kind.is_empty() {
                DEFAULT_TEST_PATTERN.to_string()
            } else {
                generator_kind.clone()
            };
            (ClipTypeName::Test, asset_id, xges.children_properties.clone())
        }
        MediaReference::Missing => {
            debug!("片段 '{name}' 没有媒体引用，使用缺失文件 URI");
            (
                ClipTypeName::Uri,
                missing_uri(),
                xges.children_properties.clone(),
            )
        }
    };

    Ok(XgesClip {
        duration,
        inpoint,
        children_properties,
        ..ctx.element(type_name, asset_id, &name)
    })
}

/// 把一个转场转换为 `<clip>` 元素，时长为入、出偏移之和。
pub(crate) fn encode_transition(transition: &Transition, ctx: &ElementContext<'_>) -> XgesClip {
    let name = if transition.name.is_empty() {
        format!("transition{}", ctx.id)
    } else {
        transition.name.clone()
    };

    XgesClip {
        duration: to_nanoseconds(transition.duration()),
        inpoint: 0,
        children_properties: transition.metadata.xges.children_properties.clone(),
        ..ctx.element(
            ClipTypeName::Transition,
            transition_asset_id(&transition.transition_type).to_string(),
            &name,
        )
    }
}
