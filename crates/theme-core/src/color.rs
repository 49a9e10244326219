//! Color parsing and conversion utilities
//!
//! Theme authors may write colors in any of the syntaxes the dashboard's
//! stylesheets accept: hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`),
//! `rgb()`/`rgba()`, `hsl()`/`hsla()` and `hsv()`/`hsva()`. This module parses
//! those into [`Rgba`], converts between RGB, HSL and HSV, and derives the two
//! computed values the stylesheet generator needs: a legible contrast color and
//! a desaturated night-mode variant.
//!
//! # Example
//!
//! ```rust
//! use theme_core::color::{contrast_color, night_variant, parse_color};
//!
//! let red = parse_color("#ff0000").unwrap();
//! assert_eq!((red.r, red.g, red.b), (255, 0, 0));
//! assert_eq!(contrast_color("#1E3A5F"), "#ffffff");
//! assert_eq!(night_variant("#ff0000"), "#D92626");
//! ```

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Saturation multiplier applied to light colors to derive their night variant
pub const NIGHT_SATURATION_FACTOR: f64 = 0.7;

/// Luminance above which black text reads better than white
pub const CONTRAST_LUMINANCE_THRESHOLD: f64 = 0.179;

/// Contrast color used on light backgrounds
pub const CONTRAST_DARK: &str = "#000000";

/// Contrast color used on dark backgrounds
pub const CONTRAST_LIGHT: &str = "#ffffff";

const HEX_PATTERN: &str = r"^#(?:[0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$";
const RGB_PATTERN: &str =
    r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$";
const HSX_PATTERN: &str = r"(?i)^(hsla?|hsva?)\(\s*(\d*\.?\d+)\s*,\s*(\d*\.?\d+)%?\s*,\s*(\d*\.?\d+)%?\s*(?:,\s*(\d*\.?\d+)\s*)?\)$";

static HEX_REGEX: OnceLock<Regex> = OnceLock::new();
static RGB_REGEX: OnceLock<Regex> = OnceLock::new();
static HSX_REGEX: OnceLock<Regex> = OnceLock::new();

fn hex_regex() -> &'static Regex {
    HEX_REGEX.get_or_init(|| Regex::new(HEX_PATTERN).expect("hex color pattern is valid"))
}

fn rgb_regex() -> &'static Regex {
    RGB_REGEX.get_or_init(|| Regex::new(RGB_PATTERN).expect("rgb color pattern is valid"))
}

fn hsx_regex() -> &'static Regex {
    HSX_REGEX.get_or_init(|| Regex::new(HSX_PATTERN).expect("hsl/hsv color pattern is valid"))
}

// =============================================================================
// Error Types
// =============================================================================

/// Color parsing errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    /// Text does not match any accepted color syntax
    #[error("Unsupported color syntax: '{0}'")]
    Unsupported(String),

    /// A component is outside its allowed range
    #[error("Color component {component} out of range in '{input}'")]
    OutOfRange {
        /// Which component failed (e.g. "red", "saturation", "alpha")
        component: &'static str,
        /// The original input text
        input: String,
    },
}

/// Result type for color operations
pub type Result<T> = std::result::Result<T, ColorError>;

// =============================================================================
// Color Types
// =============================================================================

/// An sRGB color with alpha in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel (1.0 = opaque)
    pub a: f64,
}

impl Rgba {
    /// Create an opaque color
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Render as hex text; the alpha byte is appended only when not opaque
    pub fn to_hex(&self) -> String {
        if self.a >= 1.0 {
            rgb_to_hex(self.r, self.g, self.b)
        } else {
            let alpha = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("{}{:02X}", rgb_to_hex(self.r, self.g, self.b), alpha)
        }
    }

    /// Convert to HSL
    pub fn to_hsl(&self) -> Hsl {
        rgb_to_hsl(self.r, self.g, self.b)
    }

    /// Convert to HSV
    pub fn to_hsv(&self) -> Hsv {
        rgb_to_hsv(self.r, self.g, self.b)
    }

    /// WCAG relative luminance of the color channels
    pub fn luminance(&self) -> f64 {
        relative_luminance(self.r, self.g, self.b)
    }
}

/// Hue (degrees, `0.0..360.0`), saturation and lightness (`0.0..=1.0`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// Hue in degrees
    pub h: f64,
    /// Saturation
    pub s: f64,
    /// Lightness
    pub l: f64,
}

/// Hue (degrees, `0.0..360.0`), saturation and value (`0.0..=1.0`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    /// Hue in degrees
    pub h: f64,
    /// Saturation
    pub s: f64,
    /// Value
    pub v: f64,
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a hex color string to RGB components
///
/// Accepts 3 and 6 digit forms, with or without the leading `#`. Any alpha
/// digits are ignored.
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let expanded = match hex.len() {
        3 | 4 => hex.chars().take(3).flat_map(|c| [c, c]).collect::<String>(),
        6 | 8 => hex[..6].to_string(),
        _ => return None,
    };
    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Convert RGB to hex string
pub fn rgb_to_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}

/// Check whether text is written in one of the accepted color syntaxes
///
/// This is the check the raw text color editor runs on every keystroke; it
/// validates syntax and component ranges but never alters the input.
pub fn is_valid_color_text(text: &str) -> bool {
    parse_color(text).is_ok()
}

/// Parse color text in any accepted syntax
pub fn parse_color(text: &str) -> Result<Rgba> {
    let input = text.trim();

    if hex_regex().is_match(input) {
        return parse_hex_rgba(input).ok_or_else(|| ColorError::Unsupported(text.to_string()));
    }

    if let Some(caps) = rgb_regex().captures(input) {
        let r = channel(&caps[1], "red", text)?;
        let g = channel(&caps[2], "green", text)?;
        let b = channel(&caps[3], "blue", text)?;
        let a = alpha(caps.get(4).map(|m| m.as_str()), text)?;
        return Ok(Rgba { r, g, b, a });
    }

    if let Some(caps) = hsx_regex().captures(input) {
        let kind = caps[1].to_ascii_lowercase();
        let h = number(&caps[2], 360.0, "hue", text)?;
        let s = number(&caps[3], 100.0, "saturation", text)? / 100.0;
        let third_name = if kind.starts_with("hsl") { "lightness" } else { "value" };
        let third = number(&caps[4], 100.0, third_name, text)? / 100.0;
        let a = alpha(caps.get(5).map(|m| m.as_str()), text)?;

        let (r, g, b) = if kind.starts_with("hsl") {
            hsl_to_rgb(Hsl { h, s, l: third })
        } else {
            hsv_to_rgb(Hsv { h, s, v: third })
        };
        return Ok(Rgba { r, g, b, a });
    }

    Err(ColorError::Unsupported(text.to_string()))
}

fn parse_hex_rgba(input: &str) -> Option<Rgba> {
    let digits = input.trim_start_matches('#');
    let (r, g, b) = parse_hex_color(digits)?;
    let a = match digits.len() {
        4 => {
            let d = &digits[3..4];
            u8::from_str_radix(&format!("{d}{d}"), 16).ok()? as f64 / 255.0
        }
        8 => u8::from_str_radix(&digits[6..8], 16).ok()? as f64 / 255.0,
        _ => 1.0,
    };
    Some(Rgba { r, g, b, a })
}

fn channel(text: &str, component: &'static str, input: &str) -> Result<u8> {
    text.parse::<u16>()
        .ok()
        .filter(|v| *v <= 255)
        .map(|v| v as u8)
        .ok_or_else(|| ColorError::OutOfRange { component, input: input.to_string() })
}

fn number(text: &str, max: f64, component: &'static str, input: &str) -> Result<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|v| (0.0..=max).contains(v))
        .ok_or_else(|| ColorError::OutOfRange { component, input: input.to_string() })
}

fn alpha(text: Option<&str>, input: &str) -> Result<f64> {
    match text {
        Some(t) => number(t, 1.0, "alpha", input),
        None => Ok(1.0),
    }
}

// =============================================================================
// Conversions
// =============================================================================

/// Convert RGB to HSL
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> Hsl {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;

    if delta == 0.0 {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let s = delta / (1.0 - (2.0 * l - 1.0).abs());
    Hsl { h: hue(r, g, b, max, delta), s: s.clamp(0.0, 1.0), l }
}

/// Convert HSL to RGB
pub fn hsl_to_rgb(hsl: Hsl) -> (u8, u8, u8) {
    let c = (1.0 - (2.0 * hsl.l - 1.0).abs()) * hsl.s;
    let m = hsl.l - c / 2.0;
    from_chroma(hsl.h, c, m)
}

/// Convert RGB to HSV
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let s = if max == 0.0 { 0.0 } else { delta / max };
    let h = if delta == 0.0 { 0.0 } else { hue(r, g, b, max, delta) };
    Hsv { h, s, v: max }
}

/// Convert HSV to RGB
pub fn hsv_to_rgb(hsv: Hsv) -> (u8, u8, u8) {
    let c = hsv.v * hsv.s;
    let m = hsv.v - c;
    from_chroma(hsv.h, c, m)
}

fn hue(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    let h = if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

fn from_chroma(h: f64, c: f64, m: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0) / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_byte = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_byte(r), to_byte(g), to_byte(b))
}

// =============================================================================
// Derived Colors
// =============================================================================

/// Calculate relative luminance per WCAG formula (0.0 = black, 1.0 = white)
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn linear(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Pick black or white, whichever reads better on top of `background`
///
/// Unparseable input yields black.
pub fn contrast_color(background: &str) -> &'static str {
    match parse_color(background) {
        Ok(color) if color.luminance() <= CONTRAST_LUMINANCE_THRESHOLD => CONTRAST_LIGHT,
        _ => CONTRAST_DARK,
    }
}

/// Scale the HSL saturation of a color, keeping hue, lightness and alpha
///
/// Unparseable input is returned unchanged so that a typo in a theme never
/// removes a variable from the stylesheet.
pub fn desaturate(text: &str, factor: f64) -> String {
    match parse_color(text) {
        Ok(color) => {
            let hsl = color.to_hsl();
            let (r, g, b) = hsl_to_rgb(Hsl { s: (hsl.s * factor).clamp(0.0, 1.0), ..hsl });
            Rgba { r, g, b, a: color.a }.to_hex()
        }
        Err(_) => text.to_string(),
    }
}

/// The lower-saturation counterpart of a light color used in night mode
pub fn night_variant(text: &str) -> String {
    desaturate(text, NIGHT_SATURATION_FACTOR)
}
