//! # 片段分类
//!
//! 在时间线节点（外部引用片段、生成器片段、转场）与 XGES 片段类型之间双向映射。
//!
//! | 时间线节点 | type-name | asset-id |
//! |---|---|---|
//! | 外部引用 | `GESUriClip` | URI，为空时使用缺失文件 URI |
//! | 生成器 `title` | `GESTitleClip` | `GESTitleClip` |
//! | 其它生成器 | `GESTestClip` | 生成器类型，为空时为 `black` |
//! | 无引用 | `GESUriClip` | 缺失文件 URI |
//! | 转场 | `GESTransitionClip` | 转场资源名，见 [`transition_asset_id`] |

mod decode;
mod encode;

use std::str::FromStr;

use strum_macros::EnumString;
use timeline_core::TransitionType;
use tracing::trace;

use crate::structure::Structure;

pub(crate) use decode::decode_element;
pub(crate) use encode::{ElementContext, encode_clip, encode_transition};

/// 标题生成器的类型名。
pub const TITLE_GENERATOR_KIND: &str = "title";

/// 测试片段未指定图案时使用的生成器类型。
pub const DEFAULT_TEST_PATTERN: &str = "black";

/// GES 内置转场资源。
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
enum TransitionAsset {
    #[strum(serialize = "crossfade")]
    Crossfade,
    #[strum(serialize = "wipe")]
    Wipe,
    #[strum(serialize = "clock-wipe")]
    ClockWipe,
    #[strum(serialize = "barwipe")]
    BarWipe,
    #[strum(serialize = "box-wipe")]
    BoxWipe,
}

impl TransitionAsset {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Crossfade => "crossfade",
            Self::Wipe => "wipe",
            Self::ClockWipe => "clock-wipe",
            Self::BarWipe => "barwipe",
            Self::BoxWipe => "box-wipe",
        }
    }
}

/// 转场类型对应的 GES 资源名。自定义或无法识别的类型使用 `crossfade`。
#[must_use]
pub fn transition_asset_id(transition_type: &TransitionType) -> &'static str {
    let asset = match transition_type {
        TransitionType::SmpteDissolve | TransitionType::Custom(_) => TransitionAsset::Crossfade,
        TransitionType::SmpteWipe => TransitionAsset::Wipe,
        TransitionType::SmpteClockWipe => TransitionAsset::ClockWipe,
        TransitionType::SmpteBarWipe => TransitionAsset::BarWipe,
        TransitionType::SmpteBoxWipe => TransitionAsset::BoxWipe,
    };
    asset.as_str()
}

/// GES 资源名对应的转场类型（不区分大小写）。无法识别的资源名保留为自定义类型。
#[must_use]
pub fn transition_type_from_asset(asset_id: &str) -> TransitionType {
    match TransitionAsset::from_str(asset_id) {
        Ok(TransitionAsset::Crossfade) => TransitionType::SmpteDissolve,
        Ok(TransitionAsset::Wipe) => TransitionType::SmpteWipe,
        Ok(TransitionAsset::ClockWipe) => TransitionType::SmpteClockWipe,
        Ok(TransitionAsset::BarWipe) => TransitionType::SmpteBarWipe,
        Ok(TransitionAsset::BoxWipe) => TransitionType::SmpteBoxWipe,
        Err(_) => TransitionType::Custom(asset_id.to_string()),
    }
}

/// 读取结构字符串中的某个字符串字段；字段缺失或无效时返回 `None`。
pub(crate) fn string_field(structure_str: Option<&str>, key: &str) -> Option<String> {
    let structure = structure_str?
        .parse::<Structure>()
        .inspect_err(|e| trace!("无法解析结构字符串: {e}"))
        .ok()?;
    structure
        .get_string(key)
        .inspect_err(|e| trace!("忽略字段 {key}: {e}"))
        .ok()
        .flatten()
}
