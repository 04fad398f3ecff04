//! Color normalization helpers
//!
//! Every color the analyzers see goes through [`to_hex`], which folds the
//! CSS color syntaxes found in computed styles and stylesheets into a single
//! uppercase `#RRGGBB` form. Alpha is dropped; callers decide beforehand
//! whether a value is worth keeping with [`is_valid_color`].

mod named;

#[cfg(test)]
mod tests;

use regex::Regex;
use std::sync::LazyLock;

/// Default HSV saturation below which a color is considered neutral
pub const NEUTRAL_SATURATION: f64 = 0.10;

/// Keywords that never denote a concrete color
const NON_COLOR_KEYWORDS: &[&str] = &[
    "transparent",
    "initial",
    "inherit",
    "unset",
    "revert",
    "currentcolor",
    "none",
];

static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)url\([^)]*\)").expect("valid url token regex"));

static COLOR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#[0-9a-f]{3,8}\b|(?:rgba?|hsla?)\([^)]*\)|\b[a-z]+\b")
        .expect("valid color token regex")
});

/// Converts a CSS color value to an uppercase `#RRGGBB` string.
///
/// Accepts `rgb()`/`rgba()`, `hsl()`/`hsla()`, 3/4/6/8-digit hex and named
/// colors. Returns `None` for keywords such as `transparent` and for anything
/// that cannot be parsed.
pub fn to_hex(value: &str) -> Option<String> {
    parse_rgb(value).map(|[r, g, b]| format!("#{r:02X}{g:02X}{b:02X}"))
}

/// Parses a CSS color value into RGB channels, ignoring alpha
pub fn parse_rgb(value: &str) -> Option<[u8; 3]> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_digits(hex).map(|(rgb, _)| rgb);
    }

    if let Some((name, args)) = functional_args(value) {
        return match name.as_str() {
            "rgb" | "rgba" => rgb_from_args(&args),
            "hsl" | "hsla" => hsl_from_args(&args),
            _ => None,
        };
    }

    named::lookup(value)
}

/// Returns `true` when the value names a concrete, at least partly opaque color.
///
/// Rejects empty values, CSS-wide keywords, `transparent`, `currentcolor`
/// and any color whose alpha component is zero.
pub fn is_valid_color(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    if value.is_empty() || NON_COLOR_KEYWORDS.contains(&value.as_str()) {
        return false;
    }

    match alpha_component(&value) {
        Some(alpha) => alpha > 0.0,
        None => true,
    }
}

/// HSV saturation of a hex color, or `None` if the hex cannot be parsed
pub fn saturation(hex: &str) -> Option<f64> {
    let [r, g, b] = hex_to_rgb(hex)?;
    let max = r.max(g).max(b) as f64;
    let min = r.min(g).min(b) as f64;
    if max == 0.0 {
        return Some(0.0);
    }
    Some((max - min) / max)
}

/// Whether a hex color is near-gray (saturation below [`NEUTRAL_SATURATION`])
pub fn is_neutral(hex: &str) -> bool {
    is_neutral_with(hex, NEUTRAL_SATURATION)
}

/// Whether a hex color's saturation is below the given threshold
pub fn is_neutral_with(hex: &str, threshold: f64) -> bool {
    saturation(hex).is_some_and(|s| s < threshold)
}

/// Parses a `#RGB`, `#RRGGBB` (and alpha variants) string into channels
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    parse_hex_digits(hex.trim().strip_prefix('#')?).map(|(rgb, _)| rgb)
}

/// Finds the first color token in a composite value such as a `background`
/// or `border` shorthand and returns it verbatim.
///
/// `url(...)` tokens are ignored so file names like `red.png` do not match.
pub fn find_color_token(value: &str) -> Option<String> {
    let without_urls = URL_TOKEN.replace_all(value, " ");
    COLOR_TOKEN
        .find_iter(&without_urls)
        .map(|m| m.as_str())
        .find(|token| {
            let lower = token.to_ascii_lowercase();
            lower == "transparent" || lower == "currentcolor" || parse_rgb(token).is_some()
        })
        .map(str::to_string)
}

/// Splits `name(args)` into a lowercase function name and its argument tokens.
///
/// Both the legacy comma syntax and the space/slash syntax are accepted.
fn functional_args(value: &str) -> Option<(String, Vec<String>)> {
    let open = value.find('(')?;
    let inner = value[open + 1..].strip_suffix(')')?;
    let name = value[..open].trim().to_ascii_lowercase();
    let args = inner
        .replace([',', '/'], " ")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    Some((name, args))
}

fn parse_hex_digits(digits: &str) -> Option<([u8; 3], Option<u8>)> {
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();

    match digits.len() {
        3 => Some(([nibble(0)?, nibble(1)?, nibble(2)?], None)),
        4 => Some(([nibble(0)?, nibble(1)?, nibble(2)?], Some(nibble(3)?))),
        6 => Some(([byte(0)?, byte(2)?, byte(4)?], None)),
        8 => Some(([byte(0)?, byte(2)?, byte(4)?], Some(byte(6)?))),
        _ => None,
    }
}

fn rgb_from_args(args: &[String]) -> Option<[u8; 3]> {
    if args.len() < 3 {
        return None;
    }
    Some([
        parse_channel(&args[0])?,
        parse_channel(&args[1])?,
        parse_channel(&args[2])?,
    ])
}

fn parse_channel(token: &str) -> Option<u8> {
    let value = match token.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? * 255.0 / 100.0,
        None => token.parse::<f64>().ok()?,
    };
    Some(value.clamp(0.0, 255.0).round() as u8)
}

fn hsl_from_args(args: &[String]) -> Option<[u8; 3]> {
    if args.len() < 3 {
        return None;
    }
    let hue = parse_hue(&args[0])?;
    let sat = parse_percentage(&args[1])?;
    let light = parse_percentage(&args[2])?;
    Some(hsl_to_rgb(hue, sat, light))
}

fn parse_hue(token: &str) -> Option<f64> {
    let token = token.to_ascii_lowercase();
    if let Some(deg) = token.strip_suffix("deg") {
        deg.parse().ok()
    } else if let Some(grad) = token.strip_suffix("grad") {
        grad.parse::<f64>().ok().map(|g| g * 0.9)
    } else if let Some(rad) = token.strip_suffix("rad") {
        rad.parse::<f64>().ok().map(f64::to_degrees)
    } else if let Some(turn) = token.strip_suffix("turn") {
        turn.parse::<f64>().ok().map(|t| t * 360.0)
    } else {
        token.parse().ok()
    }
}

fn parse_percentage(token: &str) -> Option<f64> {
    let number: f64 = token.strip_suffix('%').unwrap_or(token).parse().ok()?;
    Some((number / 100.0).clamp(0.0, 1.0))
}

/// Converts HSL (hue in degrees, saturation and lightness in 0..=1) to RGB
pub fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> [u8; 3] {
    let h = hue.rem_euclid(360.0) / 360.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let (r, g, b) = if s == 0.0 {
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    [to_byte(r), to_byte(g), to_byte(b)]
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Alpha in 0..=1 when the value carries one explicitly
fn alpha_component(value: &str) -> Option<f64> {
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_digits(hex)
            .and_then(|(_, alpha)| alpha)
            .map(|a| a as f64 / 255.0);
    }

    let (name, args) = functional_args(value)?;
    if !matches!(name.as_str(), "rgb" | "rgba" | "hsl" | "hsla") {
        return None;
    }
    let token = args.get(3)?;
    match token.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok().map(|a| a / 100.0),
        None => token.parse::<f64>().ok(),
    }
}
