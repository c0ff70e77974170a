//! Color normalization for list-sourced event colors.
//!
//! List columns hold free text, so a "color" can be anything a person typed:
//! `ff0000`, `#F00`, `255, 0, 0`, `rgb(255,0,0)` or `reddish`. This module
//! turns that text into a token the calendar renderer accepts, and derives a
//! readable foreground color for it.
//!
//! Only hex and loose RGB forms are recognised. Anything else normalizes to
//! `None` so the renderer falls back to its own default instead of receiving
//! an unvalidated CSS value.

use std::sync::LazyLock;

use regex::Regex;

/// Foreground used on light backgrounds and whenever contrast cannot be computed.
pub const DARK_TEXT: &str = "#000";

/// Foreground used on dark backgrounds.
pub const LIGHT_TEXT: &str = "#fff";

/// Luminance above which dark text is chosen.
///
/// Deliberately higher than the WCAG crossover point so mid-tone colors get
/// white text.
pub const LUMINANCE_THRESHOLD: f64 = 0.55;

static HEX_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^#?([0-9a-f]{3}|[0-9a-f]{6})$").expect("Invalid hex color regex")
});

static RGB_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(rgb\()?([0-9]{1,3},\s*[0-9]{1,3},\s*[0-9]{1,3})\)?$")
        .expect("Invalid rgb color regex")
});

/// Normalizes a raw color value into a renderable color token.
///
/// - 3 or 6 hex digits, with or without `#`: returned with a leading `#`,
///   digits untouched.
/// - Three 1-3 digit numbers separated by commas, optionally wrapped in
///   `rgb(...)`: returned as `rgb(<numbers as written>)`. Channels are not
///   clamped to 0-255.
/// - Anything else (including empty or whitespace-only input): `None`.
pub fn normalize_color(input: Option<&str>) -> Option<String> {
    let color = input?.trim();
    if color.is_empty() {
        return None;
    }

    if HEX_REGEX.is_match(color) {
        if color.starts_with('#') {
            return Some(color.to_string());
        }
        return Some(format!("#{}", color));
    }

    RGB_REGEX
        .captures(color)
        .and_then(|caps| caps.get(2))
        .map(|channels| format!("rgb({})", channels.as_str()))
}

/// Picks a readable text color for the given background.
///
/// Only hex colors are understood; `None`, `rgb(...)` values and malformed
/// hex all yield [`DARK_TEXT`].
pub fn contrasting_text_color(background: Option<&str>) -> &'static str {
    match background.and_then(relative_luminance) {
        Some(luminance) if luminance > LUMINANCE_THRESHOLD => DARK_TEXT,
        Some(_) => LIGHT_TEXT,
        None => DARK_TEXT,
    }
}

/// Computes the sRGB relative luminance of a hex color.
///
/// Accepts `#rgb`, `#rrggbb` and the same without `#`. Returns `None` for
/// anything that is not exactly 3 or 6 hex digits.
pub fn relative_luminance(hex: &str) -> Option<f64> {
    let digits = hex.strip_prefix('#').unwrap_or(hex).trim();
    let full: String = if digits.chars().count() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };

    if full.len() != 6 || !full.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| -> Option<f64> {
        u8::from_str_radix(&full[range], 16)
            .ok()
            .map(|v| linearize(f64::from(v) / 255.0))
    };

    let r = channel(0..2)?;
    let g = channel(2..4)?;
    let b = channel(4..6)?;

    Some(0.2126 * r + 0.7152 * g + 0.0722 * b)
}

fn linearize(v: f64) -> f64 {
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}
