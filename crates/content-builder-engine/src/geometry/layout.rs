use serde::{Deserialize, Serialize};

use crate::attributes::{AttrValue, read_attributes};
use crate::document::{BlockKind, Document, Node};

use super::resolver::BlockBounds;

/// Source of rendered block geometry.
///
/// The rendering layer implements this so drag resolution can ask where
/// each top-level block ended up on screen. Coordinates are in pixels and
/// share an origin with the pointer events fed to the drag session.
pub trait BlockLayout {
    /// Bounds of every top-level block, in document order.
    fn block_bounds(&self, doc: &Document) -> Vec<BlockBounds>;

    /// Top edge of the editing surface. Indicator offsets are relative to it.
    fn surface_top(&self) -> f64 {
        0.0
    }

    /// Bottom edge of the last block, or the surface top for an empty
    /// document.
    fn document_end(&self, doc: &Document) -> f64 {
        self.block_bounds(doc)
            .last()
            .map_or(self.surface_top(), |block| block.bottom)
    }
}

/// Fixed layout parameters for [`StackLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    /// Height of one line of text, in pixels
    pub line_height: f64,
    /// Multiplier applied to attribute lengths
    pub px_scale: f64,
    /// Y of the surface's top edge
    pub origin_y: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            line_height: 24.0,
            px_scale: 1.0,
            origin_y: 0.0,
        }
    }
}

/// Blocks stacked top to bottom with CSS-style margin collapsing.
///
/// A block's height is its line count times the line height plus vertical
/// padding. Between two blocks the gap is the larger of the upper block's
/// bottom margin and the lower block's top margin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StackLayout {
    pub metrics: LayoutMetrics,
}

impl StackLayout {
    pub fn new(metrics: LayoutMetrics) -> Self {
        Self { metrics }
    }

    fn length(&self, value: &AttrValue) -> f64 {
        value.value().and_then(parse_px).unwrap_or(0.0) * self.metrics.px_scale
    }

    fn content_height(&self, node: &Node) -> f64 {
        match node.block_kind() {
            Some(BlockKind::HorizontalRule) => {
                let thickness = read_attributes(node)
                    .rule
                    .and_then(|rule| rule.thickness.value().and_then(parse_px))
                    .unwrap_or(1.0);
                thickness * self.metrics.px_scale
            }
            _ => line_count(node) as f64 * self.metrics.line_height,
        }
    }
}

impl BlockLayout for StackLayout {
    fn block_bounds(&self, doc: &Document) -> Vec<BlockBounds> {
        let mut bounds = Vec::new();
        let mut cursor = self.metrics.origin_y;
        let mut previous_margin: Option<f64> = None;

        for block in doc.top_level_blocks() {
            let attrs = read_attributes(block.node);
            let margin_top = self.length(&attrs.margin_top);
            cursor += match previous_margin {
                Some(margin_bottom) => margin_top.max(margin_bottom),
                None => margin_top,
            };

            let height = self.length(&attrs.padding_top)
                + self.content_height(block.node)
                + self.length(&attrs.padding_bottom);
            bounds.push(BlockBounds {
                start: block.start,
                end: block.end,
                top: cursor,
                bottom: cursor + height,
            });

            cursor += height;
            previous_margin = Some(self.length(&attrs.margin_bottom));
        }

        bounds
    }

    fn surface_top(&self) -> f64 {
        self.metrics.origin_y
    }
}

/// Number of rendered text lines in a block, at least one.
pub fn line_count(node: &Node) -> usize {
    node.text_content().split('\n').count().max(1)
}

/// Pixel value of a CSS length. `rem` and `em` assume a 16px root font;
/// relative units this layout cannot resolve yield `None`.
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let (number, scale) = if let Some(n) = value.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = value.strip_suffix("rem") {
        (n, 16.0)
    } else if let Some(n) = value.strip_suffix("em") {
        (n, 16.0)
    } else if let Some(n) = value.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else {
        (value.as_str(), 1.0)
    };
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| n * scale)
}
