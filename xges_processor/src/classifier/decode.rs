//! XGES `<clip>` 元素 → 时间线节点。

use timeline_core::{
    Clip, Composable, Gap, MediaReference, Metadata, RationalTime, TimeRange, Transition,
    XgesMetadata,
};
use tracing::{debug, warn};

use super::{
    DEFAULT_TEST_PATTERN, TITLE_GENERATOR_KIND, string_field, transition_type_from_asset,
};
use crate::schema::{ClipTypeName, XgesClip};
use crate::time::from_nanoseconds;

/// 按 `type-name` 分派，把 `<clip>` 元素转换为时间线节点。
///
/// 无法识别的类型会被替换为同样时长的空白，转换继续进行。
pub(crate) fn decode_element(element: &XgesClip, rate: f64) -> Composable {
    let Ok(type_name) = element.type_name.parse::<ClipTypeName>() else {
        warn!(
            "不支持的片段类型 '{}' (id {})，以空白代替",
            element.type_name, element.id
        );
        return Gap::new(from_nanoseconds(element.duration, rate)).into();
    };

    match type_name {
        ClipTypeName::Uri => {
            media_clip(element, rate, MediaReference::external(&element.asset_id)).into()
        }
        ClipTypeName::Test => {
            let kind = if element.asset_id.is_empty() {
                DEFAULT_TEST_PATTERN
            } else {
                element.asset_id.as_str()
            };
            media_clip(element, rate, MediaReference::generator(kind)).into()
        }
        ClipTypeName::Title => title_clip(element, rate).into(),
        ClipTypeName::Transition => transition(element, rate).into(),
    }
}

fn element_name(element: &XgesClip) -> String {
    string_field(element.properties.as_deref(), "name").unwrap_or_default()
}

fn passthrough_metadata(element: &XgesClip) -> Metadata {
    element
        .children_properties
        .as_deref()
        .map(Metadata::with_children_properties)
        .unwrap_or_default()
}

fn source_range(element: &XgesClip, rate: f64) -> TimeRange {
    TimeRange::new(
        from_nanoseconds(element.inpoint, rate),
        from_nanoseconds(element.duration, rate),
    )
}

fn media_clip(element: &XgesClip, rate: f64, media_reference: MediaReference) -> Clip {
    Clip {
        name: element_name(element),
        media_reference,
        source_range: Some(source_range(element, rate)),
        metadata: passthrough_metadata(element),
    }
}

fn title_clip(element: &XgesClip, rate: f64) -> Clip {
    let text = string_field(element.children_properties.as_deref(), "text");
    Clip {
        name: element_name(element),
        media_reference: MediaReference::generator(TITLE_GENERATOR_KIND),
        source_range: Some(source_range(element, rate)),
        metadata: Metadata {
            xges: XgesMetadata {
                children_properties: element.children_properties.clone(),
                text,
                clip_type: Some(TITLE_GENERATOR_KIND.to_string()),
            },
        },
    }
}

/// 入、出偏移各取元素总时长的一半。
fn transition(element: &XgesClip, rate: f64) -> Transition {
    let duration = from_nanoseconds(element.duration, rate);
    let half = RationalTime::new(duration.value / 2.0, duration.rate);
    let transition_type = transition_type_from_asset(&element.asset_id);
    debug!(
        "转场 '{}' 映射为 {transition_type}",
        element.asset_id
    );

    Transition {
        name: element_name(element),
        transition_type,
        in_offset: half,
        out_offset: half,
        metadata: passthrough_metadata(element),
    }
}

#[cfg(test)]
mod tests {
    use timeline_core::TransitionType;

    use super::*;

    fn element(type_name: &str, asset_id: &str) -> XgesClip {
        XgesClip {
            id: 1,
            asset_id: asset_id.into(),
            type_name: type_name.into(),
            track_types: 4,
            start: 1_000_000_000,
            duration: 2_000_000_000,
            inpoint: 500_000_000,
            properties: Some(r#"properties, name=(string)"clip\ two";"#.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_uri_element() {
        let Composable::Clip(clip) = decode_element(&element("GESUriClip", "file:///b.mp4"), 25.0)
        else {
            panic!("expected a clip");
        };
        assert_eq!(clip.name, "clip two");
        assert_eq!(clip.media_reference, MediaReference::external("file:///b.mp4"));
        let range = clip.source_range.unwrap();
        assert!((range.start_time.to_seconds() - 0.5).abs() < 1e-12);
        assert!((range.duration.value - 50.0).abs() < 1e-9);
        assert!(clip.metadata.xges.is_empty());
    }

    #[test]
    fn test_test_element_keeps_children_properties() {
        let mut test = element("GESTestClip", "bars");
        test.children_properties = Some("properties, pattern=(int)0;".into());
        let Composable::Clip(clip) = decode_element(&test, 25.0) else {
            panic!("expected a clip");
        };
        assert_eq!(clip.media_reference, MediaReference::generator("bars"));
        assert_eq!(
            clip.metadata.xges.children_properties.as_deref(),
            Some("properties, pattern=(int)0;")
        );

        let Composable::Clip(clip) = decode_element(&element("GESTestClip", ""), 25.0) else {
            panic!("expected a clip");
        };
        assert_eq!(clip.media_reference, MediaReference::generator("black"));
    }

    #[test]
    fn test_title_element() {
        let mut title = element("GESTitleClip", "GESTitleClip");
        title.children_properties = Some(r#"properties, text=(string)"Hello\ World";"#.into());
        let Composable::Clip(clip) = decode_element(&title, 25.0) else {
            panic!("expected a clip");
        };
        assert_eq!(clip.media_reference, MediaReference::generator("title"));
        assert_eq!(clip.metadata.xges.text.as_deref(), Some("Hello World"));
        assert_eq!(clip.metadata.xges.clip_type.as_deref(), Some("title"));
        assert_eq!(
            clip.metadata.xges.children_properties,
            title.children_properties
        );
    }

    #[test]
    fn test_transition_element() {
        let mut wipe = element("GESTransitionClip", "WIPE");
        wipe.duration = 1_000_000_000;
        let Composable::Transition(transition) = decode_element(&wipe, 30.0) else {
            panic!("expected a transition");
        };
        assert_eq!(transition.transition_type, TransitionType::SmpteWipe);
        assert!((transition.in_offset.value - 15.0).abs() < 1e-9);
        assert!((transition.out_offset.value - 15.0).abs() < 1e-9);

        let Composable::Transition(custom) =
            decode_element(&element("GESTransitionClip", "iris-diamond"), 30.0)
        else {
            panic!("expected a transition");
        };
        assert_eq!(
            custom.transition_type,
            TransitionType::Custom("iris-diamond".into())
        );
    }

    #[test]
    fn test_unknown_type_becomes_gap() {
        let Composable::Gap(gap) = decode_element(&element("GESGroup", "x"), 25.0) else {
            panic!("expected a gap");
        };
        assert!((gap.duration.to_seconds() - 2.0).abs() < 1e-12);
    }
}
