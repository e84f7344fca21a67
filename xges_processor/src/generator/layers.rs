//! # XGES 生成器 - 图层模块
//!
//! 每条时间线轨道生成一个 `<layer>`。空白不产生元素，只推进游标。

use timeline_core::{Composable, ConvertError, Timeline, Track, XgesGenerationOptions};
use tracing::trace;

use crate::classifier::{ElementContext, encode_clip, encode_transition};
use crate::schema::{Layer, TrackTypes};
use crate::structure::Structure;
use crate::time::to_nanoseconds;

/// 按视频在前、音频在后的顺序把所有轨道转换为图层，优先级从 0 开始递增。
/// 片段 id 在整个文档内连续编号。
pub(super) fn build_layers(
    timeline: &Timeline,
    options: &XgesGenerationOptions,
) -> Result<Vec<Layer>, ConvertError> {
    let ordered = timeline
        .video_tracks()
        .map(|track| (track, TrackTypes::VIDEO))
        .chain(timeline.audio_tracks().map(|track| (track, TrackTypes::AUDIO)));

    let mut next_clip_id = 0;
    ordered
        .enumerate()
        .map(|(priority, (track, track_types))| {
            track_to_layer(track, priority as u32, track_types, &mut next_clip_id, options)
        })
        .collect()
}

fn layer_properties() -> String {
    Structure::new("properties")
        .with_field("auto-transition", true)
        .to_string()
}

fn layer_metadatas() -> String {
    Structure::new("metadatas")
        .with_field("volume", 1.0)
        .to_string()
}

fn track_to_layer(
    track: &Track,
    priority: u32,
    track_types: TrackTypes,
    next_clip_id: &mut u32,
    options: &XgesGenerationOptions,
) -> Result<Layer, ConvertError> {
    let mut cursor: u64 = 0;
    let mut clips = Vec::with_capacity(track.children.len());

    for child in &track.children {
        let ctx = ElementContext {
            id: *next_clip_id,
            start: cursor,
            layer_priority: priority,
            track_types,
            options,
        };

        let element = match child {
            Composable::Gap(gap) => {
                cursor = cursor.saturating_add(to_nanoseconds(gap.duration));
                continue;
            }
            Composable::Clip(clip) => encode_clip(clip, &ctx)?,
            Composable::Transition(transition) => encode_transition(transition, &ctx),
        };

        trace!(
            id = element.id,
            start = element.start,
            duration = element.duration,
            "写入片段 {}",
            element.type_name
        );
        // 转场也按完整时长推进游标，不缩短相邻片段
        cursor = cursor.saturating_add(element.duration);
        *next_clip_id += 1;
        clips.push(element);
    }

    Ok(Layer {
        priority,
        properties: Some(layer_properties()),
        metadatas: Some(layer_metadatas()),
        clips,
    })
}

#[cfg(test)]
mod tests {
    use timeline_core::{
        Clip, Gap, MediaReference, RationalTime, TimeRange, TrackKind, Transition, TransitionType,
    };

    use super::*;

    fn clip(name: &str, seconds: f64) -> Clip {
        Clip {
            name: name.into(),
            media_reference: MediaReference::external(format!("file:///{name}.mov")),
            source_range: Some(TimeRange::new(
                RationalTime::new(0.0, 24.0),
                RationalTime::from_seconds(seconds, 24.0),
            )),
            ..Default::default()
        }
    }

    #[test]
    fn test_gap_only_advances_cursor() {
        let mut track = Track::new("V1", TrackKind::Video);
        track.append_child(clip("a", 1.0));
        track.append_child(Gap::new(RationalTime::new(12.0, 24.0)));
        track.append_child(clip("b", 2.0));

        let mut timeline = Timeline::new("gap");
        timeline.add_track(track);
        let layers = build_layers(&timeline, &XgesGenerationOptions::default()).unwrap();

        let clips = &layers[0].clips;
        assert_eq!(clips.len(), 2);
        assert_eq!(clips[0].start, 0);
        assert_eq!(clips[1].start, 1_500_000_000);
        assert_eq!(clips[1].duration, 2_000_000_000);
    }

    #[test]
    fn test_transition_advances_by_full_duration() {
        let mut track = Track::new("V1", TrackKind::Video);
        track.append_child(clip("a", 2.0));
        track.append_child(Transition {
            name: "x".into(),
            transition_type: TransitionType::SmpteDissolve,
            in_offset: RationalTime::new(12.0, 24.0),
            out_offset: RationalTime::new(12.0, 24.0),
            ..Default::default()
        });
        track.append_child(clip("b", 2.0));

        let mut timeline = Timeline::new("transition");
        timeline.add_track(track);
        let layers = build_layers(&timeline, &XgesGenerationOptions::default()).unwrap();

        let starts: Vec<_> = layers[0].clips.iter().map(|c| c.start).collect();
        assert_eq!(starts, [0, 2_000_000_000, 3_000_000_000]);
        assert_eq!(layers[0].clips[1].asset_id, "crossfade");
    }

    #[test]
    fn test_layer_order_and_ids() {
        let mut audio = Track::new("A1", TrackKind::Audio);
        audio.append_child(clip("music", 3.0));
        let mut video = Track::new("V1", TrackKind::Video);
        video.append_child(clip("a", 1.0));
        video.append_child(clip("b", 1.0));

        let mut timeline = Timeline::new("order");
        timeline.add_track(audio);
        timeline.add_track(video);
        let layers = build_layers(&timeline, &XgesGenerationOptions::default()).unwrap();

        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].priority, 0);
        assert_eq!(layers[0].clips[0].track_types, TrackTypes::VIDEO.bits());
        assert_eq!(layers[1].priority, 1);
        assert_eq!(layers[1].clips[0].track_types, TrackTypes::AUDIO.bits());
        assert_eq!(layers[1].clips[0].layer_priority, 1);

        let ids: Vec<_> = layers.iter().flat_map(|l| &l.clips).map(|c| c.id).collect();
        assert_eq!(ids, [0, 1, 2]);
    }

    #[test]
    fn test_layer_attribute_strings() {
        insta::assert_snapshot!(layer_properties(), @"properties, auto-transition=(boolean)true;");
        insta::assert_snapshot!(layer_metadatas(), @"metadatas, volume=(float)1;");
    }

    #[test]
    fn test_clip_without_duration_aborts() {
        let mut track = Track::new("V1", TrackKind::Video);
        track.append_child(Clip::default());
        let mut timeline = Timeline::new("broken");
        timeline.add_track(track);
        assert!(matches!(
            build_layers(&timeline, &XgesGenerationOptions::default()),
            Err(ConvertError::MissingDuration { .. })
        ));
    }
}
