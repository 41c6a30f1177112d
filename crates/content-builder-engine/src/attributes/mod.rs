//! # Block Attributes
//!
//! Visual attributes of block nodes (spacing, background, rule styling) can
//! come from three places. In order of precedence:
//!
//! 1. **Canonical**: explicit `data-*` fields, the source of truth.
//! 2. **Legacy**: declarations recovered from an inline `style` attribute
//!    written by older documents.
//! 3. **Default**: the block kind's fallback.
//!
//! [`read_attributes`] composes those into one [`AttributeSet`] and records
//! where each value came from. [`write_attributes`] produces a replacement
//! node; nodes are never changed in place. The inline style is derived from
//! the resolved set by [`synthesize_style`] and is never read back as the
//! source of truth when a canonical field exists.

mod style;

pub use style::{normalize_length, parse_style, rule_border, synthesize_style};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::{BlockKind, Node};

/// A block attribute the compositor knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttrName {
    MarginTop,
    MarginBottom,
    PaddingTop,
    PaddingBottom,
    Background,
    RuleThickness,
    RuleStyle,
    RuleColor,
}

impl AttrName {
    pub const ALL: [AttrName; 8] = [
        AttrName::MarginTop,
        AttrName::MarginBottom,
        AttrName::PaddingTop,
        AttrName::PaddingBottom,
        AttrName::Background,
        AttrName::RuleThickness,
        AttrName::RuleStyle,
        AttrName::RuleColor,
    ];

    /// Canonical markup field carrying this attribute.
    pub fn data_key(self) -> &'static str {
        match self {
            AttrName::MarginTop => "data-mt",
            AttrName::MarginBottom => "data-mb",
            AttrName::PaddingTop => "data-pt",
            AttrName::PaddingBottom => "data-pb",
            AttrName::Background => "data-bg",
            AttrName::RuleThickness => "data-hr-thickness",
            AttrName::RuleStyle => "data-hr-style",
            AttrName::RuleColor => "data-hr-color",
        }
    }

    /// Inline style property for attributes that have a legacy source.
    pub fn css_property(self) -> Option<&'static str> {
        match self {
            AttrName::MarginTop => Some("margin-top"),
            AttrName::MarginBottom => Some("margin-bottom"),
            AttrName::PaddingTop => Some("padding-top"),
            AttrName::PaddingBottom => Some("padding-bottom"),
            AttrName::Background => Some("background-color"),
            AttrName::RuleThickness | AttrName::RuleStyle | AttrName::RuleColor => None,
        }
    }

    pub fn from_data_key(key: &str) -> Option<AttrName> {
        AttrName::ALL.into_iter().find(|name| name.data_key() == key)
    }

    pub fn from_css_property(property: &str) -> Option<AttrName> {
        let property = property.trim().to_ascii_lowercase();
        AttrName::ALL
            .into_iter()
            .find(|name| name.css_property() == Some(property.as_str()))
    }

    pub fn is_rule_only(self) -> bool {
        matches!(
            self,
            AttrName::RuleThickness | AttrName::RuleStyle | AttrName::RuleColor
        )
    }

    fn kind(self) -> ValueKind {
        match self {
            AttrName::MarginTop
            | AttrName::MarginBottom
            | AttrName::PaddingTop
            | AttrName::PaddingBottom
            | AttrName::RuleThickness => ValueKind::Length,
            AttrName::Background | AttrName::RuleColor => ValueKind::Color,
            AttrName::RuleStyle => ValueKind::LineStyle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Length,
    Color,
    LineStyle,
}

/// Raw attribute values stored on a node, one map per source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttrSources {
    canonical: BTreeMap<AttrName, String>,
    legacy: BTreeMap<AttrName, String>,
}

impl AttrSources {
    pub fn canonical(&self, name: AttrName) -> Option<&str> {
        self.canonical.get(&name).map(String::as_str)
    }

    pub fn legacy(&self, name: AttrName) -> Option<&str> {
        self.legacy.get(&name).map(String::as_str)
    }

    pub fn with_canonical(mut self, name: AttrName, value: impl Into<String>) -> Self {
        self.canonical.insert(name, value.into());
        self
    }

    /// Record a legacy inline-style value. Attributes without a style
    /// property are ignored.
    pub fn with_legacy(mut self, name: AttrName, value: impl Into<String>) -> Self {
        if name.css_property().is_some() {
            self.legacy.insert(name, value.into());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty() && self.legacy.is_empty()
    }
}

/// Where a resolved attribute value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttrSource {
    Canonical,
    Legacy,
    Default,
}

/// One resolved attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttrValue {
    value: Option<String>,
    source: AttrSource,
}

impl AttrValue {
    fn stored(value: &str, source: AttrSource) -> Self {
        Self {
            value: Some(value.to_string()),
            source,
        }
    }

    fn fallback(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            source: AttrSource::Default,
        }
    }

    /// Effective value, defaults included.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn source(&self) -> AttrSource {
        self.source
    }

    /// Whether a stored source supplied the value.
    pub fn is_set(&self) -> bool {
        self.source != AttrSource::Default
    }

    /// The value if it came from a stored source; `None` for defaults.
    pub fn stored_value(&self) -> Option<&str> {
        if self.is_set() { self.value() } else { None }
    }
}

/// Rule-only styling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleAttributes {
    pub thickness: AttrValue,
    pub line_style: AttrValue,
    pub line_color: AttrValue,
}

/// Fully resolved attributes of one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSet {
    pub margin_top: AttrValue,
    pub margin_bottom: AttrValue,
    pub padding_top: AttrValue,
    pub padding_bottom: AttrValue,
    pub background: AttrValue,
    /// Present only for horizontal rules.
    pub rule: Option<RuleAttributes>,
}

impl AttributeSet {
    pub fn get(&self, name: AttrName) -> Option<&AttrValue> {
        match name {
            AttrName::MarginTop => Some(&self.margin_top),
            AttrName::MarginBottom => Some(&self.margin_bottom),
            AttrName::PaddingTop => Some(&self.padding_top),
            AttrName::PaddingBottom => Some(&self.padding_bottom),
            AttrName::Background => Some(&self.background),
            AttrName::RuleThickness => self.rule.as_ref().map(|r| &r.thickness),
            AttrName::RuleStyle => self.rule.as_ref().map(|r| &r.line_style),
            AttrName::RuleColor => self.rule.as_ref().map(|r| &r.line_color),
        }
    }

    /// Set for nodes that carry no block attributes: nothing stored and no
    /// spacing.
    fn inert() -> Self {
        let none = || AttrValue::fallback(None);
        Self {
            margin_top: none(),
            margin_bottom: none(),
            padding_top: none(),
            padding_bottom: none(),
            background: none(),
            rule: None,
        }
    }
}

/// Fallback value for an attribute on a block kind.
pub fn kind_default(kind: &BlockKind, name: AttrName) -> Option<&'static str> {
    match kind {
        BlockKind::HorizontalRule => match name {
            AttrName::MarginTop | AttrName::MarginBottom => Some("10px"),
            AttrName::PaddingTop | AttrName::PaddingBottom => Some("12px"),
            AttrName::Background => None,
            AttrName::RuleThickness => Some("1px"),
            AttrName::RuleStyle => Some("solid"),
            AttrName::RuleColor => Some("#e5e7eb"),
        },
        BlockKind::Paragraph
        | BlockKind::Heading { .. }
        | BlockKind::BulletList
        | BlockKind::OrderedList { .. }
        | BlockKind::ListItem
        | BlockKind::Blockquote
        | BlockKind::CodeBlock { .. } => match name {
            AttrName::MarginTop | AttrName::MarginBottom => Some("10px"),
            AttrName::PaddingTop | AttrName::PaddingBottom => Some("0"),
            AttrName::Background
            | AttrName::RuleThickness
            | AttrName::RuleStyle
            | AttrName::RuleColor => None,
        },
    }
}

fn resolve(kind: &BlockKind, sources: &AttrSources, name: AttrName) -> AttrValue {
    let valid = |value: &&str| !value.trim().is_empty() && style::is_valid(name, value);
    if let Some(value) = sources.canonical(name).filter(valid) {
        return AttrValue::stored(value.trim(), AttrSource::Canonical);
    }
    if let Some(value) = sources.legacy(name).filter(valid) {
        return AttrValue::stored(value.trim(), AttrSource::Legacy);
    }
    AttrValue::fallback(kind_default(kind, name))
}

/// Resolve every attribute of `node`. Never fails: malformed stored values
/// fall through to the next source, and nodes without block attributes get
/// an inert set.
pub fn read_attributes(node: &Node) -> AttributeSet {
    let Some(kind) = node.block_kind() else {
        return AttributeSet::inert();
    };
    let sources = node.attrs();
    let rule = matches!(kind, BlockKind::HorizontalRule).then(|| RuleAttributes {
        thickness: resolve(kind, sources, AttrName::RuleThickness),
        line_style: resolve(kind, sources, AttrName::RuleStyle),
        line_color: resolve(kind, sources, AttrName::RuleColor),
    });
    AttributeSet {
        margin_top: resolve(kind, sources, AttrName::MarginTop),
        margin_bottom: resolve(kind, sources, AttrName::MarginBottom),
        padding_top: resolve(kind, sources, AttrName::PaddingTop),
        padding_bottom: resolve(kind, sources, AttrName::PaddingBottom),
        background: resolve(kind, sources, AttrName::Background),
        rule,
    }
}

/// A partial attribute update. `None` (or a blank string) clears the
/// attribute back to unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributePatch {
    changes: BTreeMap<AttrName, Option<String>>,
}

impl AttributePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: AttrName, value: impl Into<String>) -> Self {
        self.changes.insert(name, Some(value.into()));
        self
    }

    pub fn clear(mut self, name: AttrName) -> Self {
        self.changes.insert(name, None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttrName, Option<&str>)> {
        self.changes
            .iter()
            .map(|(name, value)| (*name, value.as_deref()))
    }
}

/// Merge `patch` over the attributes of `node`, returning the replacement.
///
/// Returns `None` for nodes that carry no block attributes. Lengths are
/// normalised (`"12"` becomes `"12px"`); values that still fail validation
/// clear the attribute. Every written attribute drops its legacy source.
pub fn write_attributes(node: &Node, patch: &AttributePatch) -> Option<Node> {
    let kind = node.block_kind()?;
    let mut sources = node.attrs().clone();

    for (name, value) in patch.iter() {
        if name.is_rule_only() && !matches!(kind, BlockKind::HorizontalRule) {
            log::warn!("ignoring {} on {}", name.data_key(), kind.name());
            continue;
        }
        sources.legacy.remove(&name);
        match value.and_then(|v| style::normalize(name, v)) {
            Some(normalized) if style::is_valid(name, &normalized) => {
                sources.canonical.insert(name, normalized);
            }
            Some(rejected) => {
                log::warn!("clearing {}: malformed value {rejected:?}", name.data_key());
                sources.canonical.remove(&name);
            }
            None => {
                sources.canonical.remove(&name);
            }
        }
    }

    Some(node.with_attrs(sources))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn para_with(sources: AttrSources) -> Node {
        Node::paragraph("x").with_attrs(sources)
    }

    #[test]
    fn canonical_beats_legacy_beats_default() {
        let node = para_with(
            AttrSources::default()
                .with_canonical(AttrName::MarginTop, "4px")
                .with_legacy(AttrName::MarginTop, "8px")
                .with_legacy(AttrName::MarginBottom, "2rem"),
        );
        let attrs = read_attributes(&node);

        assert_eq!(attrs.margin_top.value(), Some("4px"));
        assert_eq!(attrs.margin_top.source(), AttrSource::Canonical);
        assert_eq!(attrs.margin_bottom.value(), Some("2rem"));
        assert_eq!(attrs.margin_bottom.source(), AttrSource::Legacy);
        assert_eq!(attrs.padding_top.value(), Some("0"));
        assert_eq!(attrs.padding_top.source(), AttrSource::Default);
        assert_eq!(attrs.background.value(), None);
        assert!(attrs.rule.is_none());
    }

    #[test]
    fn empty_and_malformed_values_fall_through() {
        let node = para_with(
            AttrSources::default()
                .with_canonical(AttrName::MarginTop, "  ")
                .with_legacy(AttrName::MarginTop, "6px")
                .with_canonical(AttrName::Background, "not a colour!"),
        );
        let attrs = read_attributes(&node);
        assert_eq!(attrs.margin_top.value(), Some("6px"));
        assert_eq!(attrs.margin_top.source(), AttrSource::Legacy);
        assert_eq!(attrs.background.source(), AttrSource::Default);
    }

    #[test]
    fn rules_report_documented_fallbacks() {
        let attrs = read_attributes(&Node::horizontal_rule());
        let rule = attrs.rule.expect("rule attributes");
        assert_eq!(rule.thickness.value(), Some("1px"));
        assert_eq!(rule.line_style.value(), Some("solid"));
        assert_eq!(rule.line_color.value(), Some("#e5e7eb"));
        assert_eq!(rule.thickness.stored_value(), None);
        assert_eq!(attrs.padding_top.value(), Some("12px"));
    }

    #[test]
    fn inline_nodes_read_as_inert() {
        let attrs = read_attributes(&Node::text("x"));
        assert!(AttrName::ALL.iter().all(|n| attrs.get(*n).is_none_or(|v| !v.is_set())));
        assert_eq!(attrs.margin_top.value(), None);
    }

    #[test]
    fn write_round_trips_and_clears_to_default() {
        let node = Node::paragraph("x");
        let written =
            write_attributes(&node, &AttributePatch::new().set(AttrName::MarginTop, "12px"))
                .unwrap();
        let attrs = read_attributes(&written);
        assert_eq!(attrs.margin_top.value(), Some("12px"));
        assert_eq!(attrs.margin_top.source(), AttrSource::Canonical);

        let cleared = write_attributes(&written, &AttributePatch::new().clear(AttrName::MarginTop))
            .unwrap();
        let attrs = read_attributes(&cleared);
        assert_eq!(attrs.margin_top.source(), AttrSource::Default);
        assert_eq!(attrs.margin_top.stored_value(), None);
        assert!(cleared.attrs().is_empty());
    }

    #[test]
    fn write_normalises_lengths_and_drops_legacy() {
        let node = para_with(AttrSources::default().with_legacy(AttrName::PaddingTop, "3px"));
        let written = write_attributes(
            &node,
            &AttributePatch::new()
                .set(AttrName::PaddingTop, "")
                .set(AttrName::MarginBottom, "12")
                .set(AttrName::MarginTop, "0"),
        )
        .unwrap();
        let attrs = read_attributes(&written);
        assert_eq!(attrs.padding_top.source(), AttrSource::Default);
        assert_eq!(attrs.margin_bottom.value(), Some("12px"));
        assert_eq!(attrs.margin_top.value(), Some("0"));
    }

    #[test]
    fn write_rejects_non_blocks_and_ignores_rule_fields_elsewhere() {
        assert!(write_attributes(&Node::text("x"), &AttributePatch::new()).is_none());

        let written = write_attributes(
            &Node::paragraph("x"),
            &AttributePatch::new().set(AttrName::RuleStyle, "dashed"),
        )
        .unwrap();
        assert!(written.attrs().is_empty());
    }

    #[test]
    fn malformed_write_clears_the_attribute() {
        let node = para_with(AttrSources::default().with_canonical(AttrName::Background, "#fff"));
        let written = write_attributes(
            &node,
            &AttributePatch::new().set(AttrName::Background, "url(javascript:x)"),
        )
        .unwrap();
        assert_eq!(read_attributes(&written).background.source(), AttrSource::Default);
    }
}
