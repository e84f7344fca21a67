//! # XGES 生成器
//!
//! 把时间线组装为完整的 XGES 文档树，再一次性序列化输出。

mod layers;

use std::io::Write;

use quick_xml::se::Serializer;
use serde::Serialize;
use timeline_core::{ConvertError, Timeline, TrackKind, XgesGenerationOptions};
use tracing::debug;

use crate::schema::{Ges, Project, TrackTypes, XgesTimeline, XgesTrack};
use crate::structure::{Fraction, Structure};
use crate::time::infer_timeline_rate;

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";

/// XGES 生成的主入口函数。
///
/// 帧率从时间线推断，推断不到时使用 `options.default_frame_rate`。
///
/// # Errors
///
/// * `ConvertError::MissingDuration` - 某个片段既没有源区间也没有可用区间。
/// * `ConvertError::XmlSerialize` - 文档树序列化失败。
pub fn generate_xges(
    timeline: &Timeline,
    options: &XgesGenerationOptions,
) -> Result<String, ConvertError> {
    let rate = resolve_rate(timeline, options);
    let document = build_document(timeline, rate, options)?;
    serialize_document(&document, options)
}

fn resolve_rate(timeline: &Timeline, options: &XgesGenerationOptions) -> f64 {
    infer_timeline_rate(timeline).unwrap_or_else(|| {
        debug!(
            rate = options.default_frame_rate,
            "时间线中没有可用帧率，使用默认值"
        );
        options.default_frame_rate
    })
}

/// 构建完整的文档树。
fn build_document(
    timeline: &Timeline,
    rate: f64,
    options: &XgesGenerationOptions,
) -> Result<Ges, ConvertError> {
    let layers = layers::build_layers(timeline, options)?;

    Ok(Ges {
        version: options.project_version.clone(),
        project: Project {
            properties: Some(Structure::new("properties").to_string()),
            metadatas: Some(project_metadatas(&timeline.name)),
            timeline: XgesTimeline {
                properties: Some(
                    Structure::new("properties")
                        .with_field("auto-transition", true)
                        .to_string(),
                ),
                metadatas: Some(
                    Structure::new("metadatas")
                        .with_field("framerate", Fraction::from_rate(rate))
                        .to_string(),
                ),
                tracks: sink_tracks(timeline, rate, options),
                layers,
            },
        },
    })
}

fn project_metadatas(name: &str) -> String {
    let metadatas = Structure::new("metadatas");
    if name.is_empty() {
        metadatas.to_string()
    } else {
        metadatas.with_field("name", name).to_string()
    }
}

/// 每种出现过的轨道类型声明一条输出轨道，视频在前。
fn sink_tracks(timeline: &Timeline, rate: f64, options: &XgesGenerationOptions) -> Vec<XgesTrack> {
    [TrackKind::Video, TrackKind::Audio]
        .into_iter()
        .filter(|kind| timeline.tracks_of_kind(*kind).next().is_some())
        .enumerate()
        .map(|(track_id, kind)| {
            let (caps, track_types, restriction) = match kind {
                TrackKind::Video => (
                    "video/x-raw(ANY)",
                    TrackTypes::VIDEO,
                    video_restriction(rate, options),
                ),
                TrackKind::Audio => (
                    "audio/x-raw(ANY)",
                    TrackTypes::AUDIO,
                    audio_restriction(options),
                ),
            };
            XgesTrack {
                caps: caps.to_string(),
                track_type: track_types.bits(),
                track_id: track_id as u32,
                properties: Some(track_properties(&restriction)),
                metadatas: Some(Structure::new("metadatas").to_string()),
            }
        })
        .collect()
}

fn video_restriction(rate: f64, options: &XgesGenerationOptions) -> Structure {
    Structure::new("video/x-raw")
        .with_field("width", i64::from(options.video_width))
        .with_field("height", i64::from(options.video_height))
        .with_field("framerate", Fraction::from_rate(rate))
}

fn audio_restriction(options: &XgesGenerationOptions) -> Structure {
    Structure::new("audio/x-raw")
        .with_field("rate", i64::from(options.audio_sample_rate))
        .with_field("channels", i64::from(options.audio_channels))
}

fn track_properties(restriction: &Structure) -> String {
    Structure::new("properties")
        .with_field("restriction-caps", restriction.to_caps_string())
        .with_field("mixing", true)
        .to_string()
}

fn serialize_document(
    document: &Ges,
    options: &XgesGenerationOptions,
) -> Result<String, ConvertError> {
    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    if options.format {
        serializer.indent(' ', 2);
    }
    document.serialize(serializer)?;

    let mut output = String::with_capacity(XML_DECLARATION.len() + body.len() + 1);
    output.push_str(XML_DECLARATION);
    output.push_str(&body);
    output.push('\n');
    Ok(output)
}

/// 把时间线写入任意输出流的编码器。
///
/// 每次调用 [`XgesEncoder::encode`] 都会重新推断帧率，可通过 [`XgesEncoder::rate`] 读取。
#[derive(Debug)]
pub struct XgesEncoder<W: Write> {
    writer: W,
    rate: f64,
    options: XgesGenerationOptions,
}

impl<W: Write> XgesEncoder<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, XgesGenerationOptions::default())
    }

    pub fn with_options(writer: W, options: XgesGenerationOptions) -> Self {
        Self {
            writer,
            rate: options.default_frame_rate,
            options,
        }
    }

    /// 最近一次编码使用的帧率。
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// 编码时间线并写入输出流。
    ///
    /// # Errors
    ///
    /// 除 [`generate_xges`] 的错误外，写入失败时返回 `ConvertError::Io`。
    pub fn encode(&mut self, timeline: &Timeline) -> Result<(), ConvertError> {
        self.rate = resolve_rate(timeline, &self.options);
        let document = build_document(timeline, self.rate, &self.options)?;
        let output = serialize_document(&document, &self.options)?;
        self.writer.write_all(output.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use timeline_core::{
        Clip, MediaReference, RationalTime, TimeRange, Track, XgesGenerationOptionsBuilder,
    };

    use super::*;

    fn timeline_at(rate: f64) -> Timeline {
        let mut track = Track::new("V1", TrackKind::Video);
        track.append_child(Clip {
            name: "a".into(),
            media_reference: MediaReference::external("file:///a.mov"),
            source_range: Some(TimeRange::new(
                RationalTime::new(0.0, rate),
                RationalTime::new(rate, rate),
            )),
            ..Default::default()
        });
        let mut timeline = Timeline::new("My \"Edit\"");
        timeline.add_track(track);
        timeline
    }

    #[test]
    fn test_video_track_properties() {
        let options = XgesGenerationOptions::default();
        insta::assert_snapshot!(
            track_properties(&video_restriction(30.0, &options)),
            @r#"properties, restriction-caps=(string)"video/x-raw\,\ width=(int)1920\,\ height=(int)1080\,\ framerate=(fraction)30/1", mixing=(boolean)true;"#
        );
        insta::assert_snapshot!(
            track_properties(&audio_restriction(&options)),
            @r#"properties, restriction-caps=(string)"audio/x-raw\,\ rate=(int)48000\,\ channels=(int)2", mixing=(boolean)true;"#
        );
    }

    #[test]
    fn test_project_metadatas() {
        insta::assert_snapshot!(project_metadatas(""), @"metadatas;");
        insta::assert_snapshot!(
            project_metadatas("My \"Edit\""),
            @r#"metadatas, name=(string)"My\ \"Edit\"";"#
        );
    }

    #[test]
    fn test_document_tracks_and_constants() {
        let options = XgesGenerationOptions::default();
        let document = build_document(&timeline_at(24.0), 24.0, &options).unwrap();
        assert_eq!(document.version, "0.3");

        let timeline = &document.project.timeline;
        assert_eq!(timeline.tracks.len(), 1);
        assert_eq!(timeline.tracks[0].caps, "video/x-raw(ANY)");
        assert_eq!(timeline.tracks[0].track_type, 4);
        assert_eq!(timeline.tracks[0].track_id, 0);
        assert_eq!(
            timeline.metadatas.as_deref(),
            Some("metadatas, framerate=(fraction)24/1;")
        );
        assert_eq!(document.project.properties.as_deref(), Some("properties;"));
    }

    #[test]
    fn test_output_framing() {
        let output = generate_xges(&timeline_at(25.0), &XgesGenerationOptions::default()).unwrap();
        assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ges version=\"0.3\">"));
        assert!(output.ends_with("</ges>\n"));
        assert!(output.contains("\n  <project"));
    }

    #[test]
    fn test_compact_output() {
        let options = XgesGenerationOptionsBuilder::default()
            .format(false)
            .build()
            .unwrap();
        let output = generate_xges(&timeline_at(25.0), &options).unwrap();
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_encoder_records_rate() {
        let mut encoder = XgesEncoder::new(Vec::new());
        assert!((encoder.rate() - 25.0).abs() < f64::EPSILON);
        encoder.encode(&timeline_at(30.0)).unwrap();
        assert!((encoder.rate() - 30.0).abs() < f64::EPSILON);

        let written = String::from_utf8(encoder.into_inner()).unwrap();
        assert!(written.contains("framerate=(fraction)30/1"));
    }
}
