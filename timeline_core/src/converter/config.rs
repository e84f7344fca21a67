use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::ConvertError;

/// 无法从文档或时间线推断帧率时使用的帧率。
pub const DEFAULT_FRAME_RATE: f64 = 25.0;

/// 片段没有可用媒体引用时写入的占位 URI。
pub const MISSING_MEDIA_URI: &str = "file:///missing";

/// XGES 解析选项
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct XgesParsingOptions {
    /// 文档中找不到可解析的帧率时使用的帧率。
    pub default_frame_rate: f64,
}

impl Default for XgesParsingOptions {
    fn default() -> Self {
        Self {
            default_frame_rate: DEFAULT_FRAME_RATE,
        }
    }
}

impl XgesParsingOptions {
    /// 从 TOML 文本加载选项，缺省的键使用默认值。
    pub fn from_toml_str(config_str: &str) -> Result<Self, ConvertError> {
        Ok(toml::from_str(config_str)?)
    }
}

/// XGES 生成选项
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[builder(setter(into), default)]
#[serde(default)]
pub struct XgesGenerationOptions {
    /// 是否输出带缩进的 XML。
    pub format: bool,
    /// 时间线中没有带正帧率的片段时使用的帧率。
    pub default_frame_rate: f64,
    /// 写入 `<ges version>` 的格式版本。
    pub project_version: String,
    /// 缺失媒体引用时使用的 URI。
    pub missing_media_uri: String,
    /// 视频轨道限制的宽度。
    pub video_width: u32,
    /// 视频轨道限制的高度。
    pub video_height: u32,
    /// 音频轨道限制的采样率。
    pub audio_sample_rate: u32,
    /// 音频轨道限制的声道数。
    pub audio_channels: u32,
}

impl Default for XgesGenerationOptions {
    fn default() -> Self {
        Self {
            format: true,
            default_frame_rate: DEFAULT_FRAME_RATE,
            project_version: "0.3".to_string(),
            missing_media_uri: MISSING_MEDIA_URI.to_string(),
            video_width: 1920,
            video_height: 1080,
            audio_sample_rate: 48000,
            audio_channels: 2,
        }
    }
}

impl XgesGenerationOptions {
    /// 从 TOML 文本加载选项，缺省的键使用默认值。
    pub fn from_toml_str(config_str: &str) -> Result<Self, ConvertError> {
        Ok(toml::from_str(config_str)?)
    }
}
