//! Classification of token values for native theme emission.
//!
//! Stylesheet targets can print token values verbatim. Native targets need to
//! know whether a value is a color, a dimension or a plain number so they can
//! emit `Color(0xFF3B82F6)` or `16.dp` instead of a string.

use prism_core::TokenValue;
use regex::Regex;
use std::sync::OnceLock;

/// Root font size used to convert `rem`/`em` to pixels.
pub const ROOT_FONT_SIZE: f64 = 16.0;

/// Interpreted shape of a token value.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    /// `#rgb`, `#rrggbb` or `#rrggbbaa`, normalised to ARGB.
    Color { argb: u32 },
    /// Number with a CSS unit.
    Dimension { value: f64, unit: String },
    Number(f64),
    Text(String),
}

impl ValueKind {
    pub fn classify(value: &TokenValue) -> Self {
        match value {
            TokenValue::Number(n) => n
                .as_f64()
                .map(ValueKind::Number)
                .unwrap_or_else(|| ValueKind::Text(n.to_string())),
            TokenValue::String(s) => classify_str(s),
            other => ValueKind::Text(other.render()),
        }
    }

    /// Dimension in logical pixels (`rem`/`em` scaled by [`ROOT_FONT_SIZE`]).
    pub fn as_points(&self) -> Option<f64> {
        match self {
            ValueKind::Dimension { value, unit } => match unit.as_str() {
                "px" | "pt" | "dp" | "sp" => Some(*value),
                "rem" | "em" => Some(value * ROOT_FONT_SIZE),
                _ => None,
            },
            ValueKind::Number(n) => Some(*n),
            _ => None,
        }
    }
}

fn color_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").ok())
        .as_ref()
}

fn dimension_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(-?\d+(?:\.\d+)?)(px|rem|em|pt|dp|sp|%|vh|vw|ms|s)$").ok())
        .as_ref()
}

fn classify_str(s: &str) -> ValueKind {
    let trimmed = s.trim();

    if let Some(caps) = color_pattern().and_then(|re| re.captures(trimmed)) {
        if let Some(argb) = parse_hex(&caps[1]) {
            return ValueKind::Color { argb };
        }
    }

    if let Some(caps) = dimension_pattern().and_then(|re| re.captures(trimmed)) {
        if let Ok(value) = caps[1].parse::<f64>() {
            return ValueKind::Dimension {
                value,
                unit: caps[2].to_string(),
            };
        }
    }

    match trimmed.parse::<f64>() {
        Ok(n) => ValueKind::Number(n),
        Err(_) => ValueKind::Text(s.to_string()),
    }
}

fn parse_hex(hex: &str) -> Option<u32> {
    let expanded = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect::<String>(),
        _ => hex.to_string(),
    };
    let raw = u32::from_str_radix(&expanded, 16).ok()?;
    Some(match expanded.len() {
        6 => 0xFF00_0000 | raw,
        // #rrggbbaa -> aarrggbb
        8 => (raw >> 8) | ((raw & 0xFF) << 24),
        _ => return None,
    })
}

/// Format a float without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

fn escape_with(s: &str, quote: char, extra: &[char]) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            c if c == quote || extra.contains(&c) => {
                escaped.push('\\');
                escaped.push(c);
            }
            c => escaped.push(c),
        }
    }
    escaped
}

/// Escape a string for a double-quoted literal (Swift).
pub fn escape_double(s: &str) -> String {
    escape_with(s, '"', &[])
}

/// Escape a string for a double-quoted Kotlin literal, where `$` starts a
/// template.
pub fn escape_kotlin(s: &str) -> String {
    escape_with(s, '"', &['$'])
}

/// Escape a string for a single-quoted literal (TypeScript, Dart). `$` is
/// escaped for Dart interpolation; TypeScript reads `\$` as `$`.
pub fn escape_single(s: &str) -> String {
    escape_with(s, '\'', &['$'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    fn s(v: &str) -> TokenValue {
        TokenValue::String(v.to_string())
    }

    #[test]
    fn test_classify_colors() {
        assert_eq!(
            ValueKind::classify(&s("#3b82f6")),
            ValueKind::Color { argb: 0xFF3B82F6 }
        );
        assert_eq!(
            ValueKind::classify(&s("#fff")),
            ValueKind::Color { argb: 0xFFFFFFFF }
        );
        assert_eq!(
            ValueKind::classify(&s("#00000080")),
            ValueKind::Color { argb: 0x80000000 }
        );
    }

    #[test]
    fn test_rem_converts_to_points() {
        let kind = ValueKind::classify(&s("1.5rem"));
        assert_eq!(kind.as_points(), Some(24.0));
        assert_eq!(ValueKind::classify(&s("8px")).as_points(), Some(8.0));
        assert_eq!(ValueKind::classify(&s("50%")).as_points(), None);
    }

    #[test]
    fn test_numbers_and_text() {
        assert_eq!(
            ValueKind::classify(&TokenValue::Number(Number::from(600))),
            ValueKind::Number(600.0)
        );
        assert_eq!(ValueKind::classify(&s("1.25")), ValueKind::Number(1.25));
        assert_eq!(
            ValueKind::classify(&s("Inter, sans-serif")),
            ValueKind::Text("Inter, sans-serif".into())
        );
    }

    #[test]
    fn test_escapes_keep_literals_terminated() {
        assert_eq!(escape_single("it's"), "it\\'s");
        assert_eq!(escape_single("C:\\fonts\\"), "C:\\\\fonts\\\\");
        assert_eq!(escape_single("two\nlines"), "two\\nlines");
        assert_eq!(escape_single("$price"), "\\$price");
        assert_eq!(escape_double("say \"hi\"\n"), "say \\\"hi\\\"\\n");
        assert_eq!(escape_double("$5"), "$5");
        assert_eq!(escape_kotlin("$5"), "\\$5");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(1.5), "1.5");
    }
}
