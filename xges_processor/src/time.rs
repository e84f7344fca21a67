//! # 时间单位转换
//!
//! 有理时间与 GStreamer 纳秒整数之间的转换，以及时间线帧率的推断。
//!
//! 帧率推断是启发式的：整条时间线只使用一个帧率。混合多种帧率的时间线
//! 不保证得到正确结果，非整除帧率（例如 24000/1001）的浮点往返也不保证逐位一致。

use timeline_core::{Composable, RationalTime, Timeline, TrackKind};
use tracing::{debug, trace};

use crate::schema::{GST_SECOND, TrackTypes, XgesTimeline};
use crate::structure::Structure;

/// 有理时间转为纳秒，截断小数部分。负值视为 0。
#[must_use]
pub fn to_nanoseconds(time: RationalTime) -> u64 {
    let nanos = time.to_seconds() * GST_SECOND as f64;
    if nanos.is_finite() && nanos > 0.0 {
        nanos as u64
    } else {
        0
    }
}

/// 纳秒转为指定速率下的有理时间。
#[must_use]
pub fn from_nanoseconds(nanos: u64, rate: f64) -> RationalTime {
    RationalTime::from_seconds(nanos as f64 / GST_SECOND as f64, rate)
}

/// 从时间线推断帧率：先按顺序扫描第一条视频轨道，再扫描第一条音频轨道，
/// 取第一个时长带正速率的片段。找不到时返回 `None`。
#[must_use]
pub fn infer_timeline_rate(timeline: &Timeline) -> Option<f64> {
    [TrackKind::Video, TrackKind::Audio]
        .into_iter()
        .filter_map(|kind| timeline.tracks_of_kind(kind).next())
        .flat_map(|track| track.children.iter())
        .filter_map(|child| match child {
            Composable::Clip(clip) => clip.duration().ok(),
            _ => None,
        })
        .map(|duration| duration.rate)
        .find(|rate| *rate > 0.0)
}

/// 从 XGES 文档读取帧率。
///
/// 依次尝试：第一条包含视频类型的轨道的 `restriction-caps` 中的 `framerate`，
/// 时间线 `metadatas` 中的 `framerate`。都找不到时返回 `None`。
#[must_use]
pub fn extract_document_rate(timeline: &XgesTimeline) -> Option<f64> {
    let from_caps = timeline
        .tracks
        .iter()
        .filter(|track| track.track_types().contains(TrackTypes::VIDEO))
        .find_map(|track| track.properties.as_deref().and_then(rate_from_track_properties));
    if let Some(rate) = from_caps {
        debug!(rate, "从 restriction-caps 读取帧率");
        return Some(rate);
    }

    let from_metadata = timeline
        .metadatas
        .as_deref()
        .and_then(|metadatas| metadatas.parse::<Structure>().ok())
        .and_then(|structure| positive_framerate(&structure));
    if let Some(rate) = from_metadata {
        debug!(rate, "从时间线 metadatas 读取帧率");
    }
    from_metadata
}

/// 解析轨道 `properties` 中 `restriction-caps` 内嵌 caps 的帧率。
#[must_use]
pub fn rate_from_track_properties(properties: &str) -> Option<f64> {
    let structure = properties
        .parse::<Structure>()
        .inspect_err(|e| trace!("无法解析轨道 properties: {e}"))
        .ok()?;
    let caps = structure
        .get_nested("restriction-caps")
        .inspect_err(|e| trace!("无法解析 restriction-caps: {e}"))
        .ok()
        .flatten()?;
    positive_framerate(&caps)
}

fn positive_framerate(structure: &Structure) -> Option<f64> {
    structure
        .get_fraction("framerate")
        .inspect_err(|e| trace!("忽略无效的 framerate: {e}"))
        .ok()
        .flatten()
        .map(crate::structure::Fraction::as_f64)
        .filter(|rate| *rate > 0.0)
}
