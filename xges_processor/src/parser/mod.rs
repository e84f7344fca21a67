//! # XGES 解析器
//!
//! 先把整个文档读入内存并反序列化为文档树，再转换为时间线。

mod layers;

use std::io::Read;

use timeline_core::{ConvertError, Timeline, XgesParsingOptions};
use tracing::{debug, error};

use crate::classifier::string_field;
use crate::schema::Ges;
use crate::time::extract_document_rate;

/// 解析 XGES 文档。
///
/// # 参数
///
/// * `content` - XGES 文档内容字符串。
/// * `options` - 解析选项，提供文档中找不到帧率时使用的默认帧率。
///
/// # Errors
///
/// * `ConvertError::XmlDeserialize` - 文档不是有效的 XML，或缺少必需的属性
///   （例如片段的 `duration`）。
pub fn parse_xges(content: &str, options: &XgesParsingOptions) -> Result<Timeline, ConvertError> {
    decode_document(content, options).map(|(timeline, _)| timeline)
}

/// 返回时间线与解析时使用的帧率。
fn decode_document(
    content: &str,
    options: &XgesParsingOptions,
) -> Result<(Timeline, f64), ConvertError> {
    let document: Ges = quick_xml::de::from_str(content).inspect_err(|e| {
        error!("XGES 文档解析失败: {e}");
    })?;

    let xges_timeline = &document.project.timeline;
    let rate = extract_document_rate(xges_timeline).unwrap_or_else(|| {
        debug!(
            rate = options.default_frame_rate,
            "文档中没有可用帧率，使用默认值"
        );
        options.default_frame_rate
    });

    let name = string_field(document.project.metadatas.as_deref(), "name").unwrap_or_default();
    let mut timeline = Timeline::new(name);
    for track in layers::assemble_tracks(xges_timeline, rate) {
        timeline.add_track(track);
    }

    debug!(
        version = %document.version,
        tracks = timeline.tracks.len(),
        rate,
        "XGES 文档解析完成"
    );
    Ok((timeline, rate))
}

/// 从任意输入流读取 XGES 文档的解码器。
#[derive(Debug)]
pub struct XgesDecoder<R: Read> {
    reader: R,
    rate: f64,
    options: XgesParsingOptions,
}

impl<R: Read> XgesDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, XgesParsingOptions::default())
    }

    pub fn with_options(reader: R, options: XgesParsingOptions) -> Self {
        Self {
            reader,
            rate: options.default_frame_rate,
            options,
        }
    }

    /// 最近一次解码使用的帧率。
    pub const fn rate(&self) -> f64 {
        self.rate
    }

    /// 读取全部输入并解码。
    ///
    /// # Errors
    ///
    /// 除 [`parse_xges`] 的错误外：
    ///
    /// * `ConvertError::Io` - 读取失败。
    /// * `ConvertError::FromUtf8` - 输入不是有效的 UTF-8。
    pub fn decode(&mut self) -> Result<Timeline, ConvertError> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        let content = String::from_utf8(bytes)?;
        let (timeline, rate) = decode_document(&content, &self.options)?;
        self.rate = rate;
        Ok(timeline)
    }
}
