use std::fmt;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;
use tracing::trace;

use crate::{ConvertError, Metadata, RationalTime, TimeRange};

/// 轨道类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TrackKind {
    #[default]
    Video,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "Video"),
            Self::Audio => write!(f, "Audio"),
        }
    }
}

/// 片段引用的媒体。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum MediaReference {
    /// 指向外部文件的引用。
    External {
        target_url: String,
        /// 媒体本身的可用范围。
        #[serde(default)]
        available_range: Option<TimeRange>,
    },
    /// 程序生成的内容，例如测试图案或标题文字。
    Generator { generator_kind: String },
    /// 没有媒体引用。
    #[default]
    Missing,
}

impl MediaReference {
    #[must_use]
    pub fn external(target_url: impl Into<String>) -> Self {
        Self::External {
            target_url: target_url.into(),
            available_range: None,
        }
    }

    #[must_use]
    pub fn generator(generator_kind: impl Into<String>) -> Self {
        Self::Generator {
            generator_kind: generator_kind.into(),
        }
    }

    const fn available_range(&self) -> Option<&TimeRange> {
        match self {
            Self::External {
                available_range, ..
            } => available_range.as_ref(),
            _ => None,
        }
    }
}

/// 一个媒体片段。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Builder)]
#[builder(setter(into), default)]
pub struct Clip {
    pub name: String,
    pub media_reference: MediaReference,
    /// 片段在媒体中使用的范围。
    pub source_range: Option<TimeRange>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Clip {
    /// 片段时长：优先使用源范围，否则使用媒体引用的可用范围。
    pub fn duration(&self) -> Result<RationalTime, ConvertError> {
        if let Some(range) = &self.source_range {
            return Ok(range.duration);
        }
        let range = self
            .media_reference
            .available_range()
            .ok_or_else(|| ConvertError::missing_duration(&self.name))?;
        trace!("片段 '{}' 没有源范围，使用媒体可用范围", self.name);
        Ok(range.duration)
    }

    /// 片段在媒体中的入点，未知时为 0。
    #[must_use]
    pub fn source_start(&self) -> RationalTime {
        self.source_range
            .as_ref()
            .or_else(|| self.media_reference.available_range())
            .map(|range| range.start_time)
            .unwrap_or_default()
    }
}

/// 轨道上的空白。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Gap {
    pub duration: RationalTime,
}

impl Gap {
    #[must_use]
    pub const fn new(duration: RationalTime) -> Self {
        Self { duration }
    }
}

/// 转场类型：一组 SMPTE 标准类型，以及任意自定义字符串。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, EnumString, Serialize, Deserialize)]
pub enum TransitionType {
    #[default]
    #[strum(serialize = "SMPTE_Dissolve")]
    SmpteDissolve,
    #[strum(serialize = "SMPTE_Wipe")]
    SmpteWipe,
    #[strum(serialize = "SMPTE_ClockWipe")]
    SmpteClockWipe,
    #[strum(serialize = "SMPTE_BarWipe")]
    SmpteBarWipe,
    #[strum(serialize = "SMPTE_BoxWipe")]
    SmpteBoxWipe,
    /// 其它类型，包括 `Custom_Transition`。
    #[strum(default)]
    Custom(String),
}

impl fmt::Display for TransitionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SmpteDissolve => "SMPTE_Dissolve",
            Self::SmpteWipe => "SMPTE_Wipe",
            Self::SmpteClockWipe => "SMPTE_ClockWipe",
            Self::SmpteBarWipe => "SMPTE_BarWipe",
            Self::SmpteBoxWipe => "SMPTE_BoxWipe",
            Self::Custom(s) => s.as_str(),
        };
        write!(f, "{name}")
    }
}

/// 两个相邻片段之间的转场。
///
/// 转场的时间窗口在前一个片段上重叠 `in_offset`，在后一个片段上重叠 `out_offset`。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Transition {
    pub name: String,
    pub transition_type: TransitionType,
    pub in_offset: RationalTime,
    pub out_offset: RationalTime,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Transition {
    /// 转场窗口的总长度。
    #[must_use]
    pub fn duration(&self) -> RationalTime {
        self.in_offset + self.out_offset
    }
}

/// 轨道上的子项。相邻关系由在轨道中的位置决定。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Composable {
    Clip(Clip),
    Gap(Gap),
    Transition(Transition),
}

impl Composable {
    /// 子项在轨道上占据的时长。
    pub fn duration(&self) -> Result<RationalTime, ConvertError> {
        match self {
            Self::Clip(clip) => clip.duration(),
            Self::Gap(gap) => Ok(gap.duration),
            Self::Transition(transition) => Ok(transition.duration()),
        }
    }

    #[must_use]
    pub const fn as_clip(&self) -> Option<&Clip> {
        match self {
            Self::Clip(clip) => Some(clip),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_gap(&self) -> Option<&Gap> {
        match self {
            Self::Gap(gap) => Some(gap),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_transition(&self) -> Option<&Transition> {
        match self {
            Self::Transition(transition) => Some(transition),
            _ => None,
        }
    }
}

impl From<Clip> for Composable {
    fn from(clip: Clip) -> Self {
        Self::Clip(clip)
    }
}

impl From<Gap> for Composable {
    fn from(gap: Gap) -> Self {
        Self::Gap(gap)
    }
}

impl From<Transition> for Composable {
    fn from(transition: Transition) -> Self {
        Self::Transition(transition)
    }
}

/// 一条轨道及其有序子项。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub kind: TrackKind,
    pub children: Vec<Composable>,
}

impl Track {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            name: name.into(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn append_child(&mut self, child: impl Into<Composable>) {
        self.children.push(child.into());
    }

    /// 轨道中的片段（不含空白和转场）。
    pub fn clips(&self) -> impl Iterator<Item = &Clip> {
        self.children.iter().filter_map(Composable::as_clip)
    }
}
