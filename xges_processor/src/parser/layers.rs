//! # XGES 解析器 - 图层模块
//!
//! 把各图层中的片段按轨道类型分组，并在片段之间补回被省略的空白。

use timeline_core::{Gap, Track, TrackKind};
use tracing::{debug, warn};

use crate::classifier::decode_element;
use crate::schema::{TrackTypes, XgesClip, XgesTimeline};
use crate::time::from_nanoseconds;

const fn kind_mask(kind: TrackKind) -> TrackTypes {
    match kind {
        TrackKind::Video => TrackTypes::VIDEO,
        TrackKind::Audio => TrackTypes::AUDIO,
    }
}

/// 文档中声明过的轨道类型，视频在前。不支持的类型会被跳过。
fn declared_kinds(timeline: &XgesTimeline) -> Vec<TrackKind> {
    let declared = timeline
        .tracks
        .iter()
        .fold(TrackTypes::empty(), |acc, track| {
            let types = track.track_types();
            if !types.intersects(TrackTypes::VIDEO | TrackTypes::AUDIO) {
                debug!(
                    track_id = track.track_id,
                    track_type = track.track_type,
                    "跳过不支持的轨道类型"
                );
            }
            acc | types
        });

    [TrackKind::Video, TrackKind::Audio]
        .into_iter()
        .filter(|kind| declared.intersects(kind_mask(*kind)))
        .collect()
}

/// 为每种声明过的轨道类型生成一条时间线轨道，所有图层的片段依次追加到对应轨道。
pub(super) fn assemble_tracks(timeline: &XgesTimeline, rate: f64) -> Vec<Track> {
    let mut tracks: Vec<Track> = declared_kinds(timeline)
        .into_iter()
        .map(|kind| Track::new(String::new(), kind))
        .collect();

    for layer in &timeline.layers {
        for track in &mut tracks {
            let mask = kind_mask(track.kind);
            let group = layer
                .clips
                .iter()
                .filter(|clip| clip.track_types().intersects(mask));
            append_group(track, group, rate);
        }

        let orphaned = layer
            .clips
            .iter()
            .filter(|clip| {
                !tracks
                    .iter()
                    .any(|track| clip.track_types().intersects(kind_mask(track.kind)))
            })
            .count();
        if orphaned > 0 {
            debug!(
                layer = layer.priority,
                orphaned, "部分片段不属于任何已声明的轨道，已忽略"
            );
        }
    }

    tracks
}

/// 以 0 为起点遍历一组片段，起点超过游标时插入空白。
fn append_group<'a>(track: &mut Track, group: impl Iterator<Item = &'a XgesClip>, rate: f64) {
    let mut cursor: u64 = 0;
    let mut previous_start: Option<u64> = None;

    for element in group {
        if let Some(previous) = previous_start
            && element.start < previous
        {
            warn!(
                id = element.id,
                start = element.start,
                previous, "图层内片段未按起点排序"
            );
        }
        previous_start = Some(element.start);

        if element.start > cursor {
            track.append_child(Gap::new(from_nanoseconds(element.start - cursor, rate)));
        }
        track.append_child(decode_element(element, rate));
        cursor = element.start.saturating_add(element.duration);
    }
}
