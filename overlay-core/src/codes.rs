//! WMO weather code lookups.
//!
//! Two independent tables: a fine-grained text label for the center panel
//! and a coarser icon descriptor for nationwide markers. Both are total over
//! `Option<i32>`; anything not listed falls through to an "unknown" entry that
//! carries the raw code.

use serde::Serialize;

/// Visual nudge applied to a glyph whose ink is not centered in its box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IconOffset {
    pub x: f32,
    pub y: f32,
}

impl IconOffset {
    pub const NONE: IconOffset = IconOffset { x: 0.0, y: 0.0 };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconDescriptor {
    /// Material Icons glyph name.
    pub icon: &'static str,
    /// CSS hex color.
    pub color: &'static str,
    pub label: String,
    pub offset: IconOffset,
}

/// Codes with a dedicated entry in [`code_to_text`].
pub const DOCUMENTED_CODES: &[i32] = &[
    0, 1, 2, 3, 45, 48, 51, 53, 55, 56, 57, 61, 63, 65, 66, 67, 71, 73, 75, 77, 80, 81, 82, 85,
    86, 95, 96, 99,
];

pub fn code_to_text(code: Option<i32>) -> String {
    let text = match code {
        Some(0) => "快晴",
        Some(1) => "ほぼ晴れ",
        Some(2) => "一部曇り",
        Some(3) => "曇り",
        Some(45 | 48) => "霧",
        Some(51 | 53 | 55) => "霧雨",
        Some(56 | 57) => "着氷性霧雨",
        Some(61 | 63 | 65) => "雨",
        Some(66 | 67) => "着氷性雨",
        Some(71 | 73 | 75) => "雪",
        Some(77) => "雪粒",
        Some(80..=82) => "にわか雨",
        Some(85 | 86) => "にわか雪",
        Some(95) => "雷雨",
        Some(96 | 99) => "雹を伴う雷雨",
        _ => return unknown_text(code),
    };
    text.to_string()
}

pub fn code_to_icon(code: Option<i32>) -> IconDescriptor {
    let (icon, color, label, offset) = match code {
        Some(0) => ("wb_sunny", "#fbc02d", "快晴", IconOffset::NONE),
        Some(1 | 2) => ("partly_cloudy_day", "#ffca28", "晴れ時々曇り", IconOffset::NONE),
        // the cloud glyph sits a pixel right of center
        Some(3) => ("cloud", "#90a4ae", "曇り", IconOffset { x: -1.0, y: 0.0 }),
        Some(45 | 48) => ("foggy", "#9e9e9e", "霧", IconOffset::NONE),
        Some(61 | 63 | 65 | 80 | 81 | 82) => ("umbrella", "#1976d2", "雨", IconOffset::NONE),
        Some(71 | 73 | 75) => ("ac_unit", "#64b5f6", "雪", IconOffset::NONE),
        Some(95) => ("thunderstorm", "#d32f2f", "雷雨", IconOffset::NONE),
        _ => {
            return IconDescriptor {
                icon: "help_outline",
                color: "#757575",
                label: unknown_text(code),
                offset: IconOffset::NONE,
            };
        }
    };

    IconDescriptor {
        icon,
        color,
        label: label.to_string(),
        offset,
    }
}

fn unknown_text(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("不明（code={c}）"),
        None => "不明（code=null）".to_string(),
    }
}
