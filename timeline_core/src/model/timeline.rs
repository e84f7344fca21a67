use serde::{Deserialize, Serialize};

use crate::{Track, TrackKind};

/// 一条完整的时间线。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeline {
    pub name: String,
    /// 按顺序排列的所有轨道，视频与音频可以交错。
    pub tracks: Vec<Track>,
}

impl Timeline {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    pub fn add_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// 指定类型的轨道，保持原有顺序。
    pub fn tracks_of_kind(&self, kind: TrackKind) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(move |track| track.kind == kind)
    }

    pub fn video_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks_of_kind(TrackKind::Video)
    }

    pub fn audio_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks_of_kind(TrackKind::Audio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_partitioned_by_kind() {
        let mut timeline = Timeline::new("edit");
        timeline.add_track(Track::new("A1", TrackKind::Audio));
        timeline.add_track(Track::new("V1", TrackKind::Video));
        timeline.add_track(Track::new("V2", TrackKind::Video));

        let video: Vec<_> = timeline.video_tracks().map(|t| t.name.as_str()).collect();
        assert_eq!(video, ["V1", "V2"]);
        assert_eq!(timeline.audio_tracks().count(), 1);
    }
}
