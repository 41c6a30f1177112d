use std::sync::OnceLock;

use regex::Regex;

use super::{AttrName, AttributeSet, RuleAttributes, ValueKind};

fn length_regex() -> &'static Regex {
    static LENGTH: OnceLock<Regex> = OnceLock::new();
    LENGTH.get_or_init(|| {
        Regex::new(r"(?i)^(0|-?(\d+(\.\d+)?|\.\d+)(px|rem|em|%|pt|vh|vw))$")
            .expect("Invalid length regex")
    })
}

fn color_regex() -> &'static Regex {
    static COLOR: OnceLock<Regex> = OnceLock::new();
    COLOR.get_or_init(|| {
        Regex::new(r"(?i)^(#[0-9a-f]{3,8}|(rgba?|hsla?)\([0-9.,%\s/]+\)|[a-z]+)$")
            .expect("Invalid color regex")
    })
}

const LINE_STYLES: [&str; 5] = ["solid", "dashed", "dotted", "double", "none"];

pub(super) fn is_valid(name: AttrName, value: &str) -> bool {
    let value = value.trim();
    match name.kind() {
        ValueKind::Length => length_regex().is_match(value),
        ValueKind::Color => color_regex().is_match(value),
        ValueKind::LineStyle => LINE_STYLES.contains(&value.to_ascii_lowercase().as_str()),
    }
}

/// Normalise user input for `name`. Blank input yields `None`.
pub(super) fn normalize(name: AttrName, raw: &str) -> Option<String> {
    match name.kind() {
        ValueKind::Length => normalize_length(raw),
        ValueKind::Color => Some(raw.trim()).filter(|v| !v.is_empty()).map(str::to_string),
        ValueKind::LineStyle => Some(raw.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_ascii_lowercase),
    }
}

/// Normalise a length the way the property panel does: a bare number
/// becomes pixels, `"0"` stays unitless, and blank input clears.
pub fn normalize_length(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed == "0" {
        return Some("0".to_string());
    }
    let bare_number = trimmed.parse::<f64>().is_ok_and(f64::is_finite)
        && trimmed.chars().all(|c| c.is_ascii_digit() || c == '.' || c == '-');
    if bare_number {
        Some(format!("{trimmed}px"))
    } else {
        Some(trimmed.to_string())
    }
}

/// Split an inline style attribute into `(property, value)` declarations.
///
/// Properties are lowercased; empty or malformed declarations are skipped.
pub fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return None;
            }
            Some((property, value.to_string()))
        })
        .collect()
}

fn is_zero(value: &str) -> bool {
    value
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%')
        .parse::<f64>()
        .is_ok_and(|n| n == 0.0)
}

/// Build the inline style for a resolved attribute set.
///
/// Declarations appear in a fixed order and only for stored values; zero
/// padding is omitted. Feeding the result back through the legacy source
/// reproduces the same string.
pub fn synthesize_style(attrs: &AttributeSet) -> String {
    let mut parts = Vec::new();
    let mut push = |property: &str, value: Option<&str>| {
        if let Some(value) = value {
            parts.push(format!("{property}: {value};"));
        }
    };

    push("margin-top", attrs.margin_top.stored_value());
    push("margin-bottom", attrs.margin_bottom.stored_value());
    push(
        "padding-top",
        attrs.padding_top.stored_value().filter(|v| !is_zero(v)),
    );
    push(
        "padding-bottom",
        attrs.padding_bottom.stored_value().filter(|v| !is_zero(v)),
    );
    push("background-color", attrs.background.stored_value());

    parts.join(" ")
}

/// CSS border for a rule: `"{thickness} {style} {color}"`, or `none`.
pub fn rule_border(rule: &RuleAttributes) -> String {
    let thickness = rule.thickness.value().unwrap_or("1px");
    let style = rule.line_style.value().unwrap_or("solid");
    let color = rule.line_color.value().unwrap_or("#e5e7eb");
    if style.eq_ignore_ascii_case("none") {
        "none".to_string()
    } else {
        format!("{thickness} {style} {color}")
    }
}
