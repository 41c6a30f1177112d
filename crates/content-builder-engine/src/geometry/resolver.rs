/// Position range and rendered vertical extent of one top-level block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockBounds {
    pub start: usize,
    pub end: usize,
    pub top: f64,
    pub bottom: f64,
}

impl BlockBounds {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Inclusive on both edges.
    pub fn contains_y(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }

    /// Vertical distance from `y` to the nearest edge; zero inside.
    pub fn distance_to(&self, y: f64) -> f64 {
        if y < self.top {
            self.top - y
        } else if y > self.bottom {
            y - self.bottom
        } else {
            0.0
        }
    }
}

/// Find the top-level block a pointer is over, or nearest to.
///
/// The first block (in document order) whose vertical extent contains `y`
/// wins. Otherwise the block at the smallest vertical distance wins, with
/// equal distances going to the earlier block. The horizontal coordinate
/// does not participate: blocks span the full surface width.
///
/// Returns `None` when there are no blocks or `y` is not a finite number.
pub fn resolve_block_at<'a, I>(_x: f64, y: f64, blocks: I) -> Option<&'a BlockBounds>
where
    I: IntoIterator<Item = &'a BlockBounds>,
{
    if !y.is_finite() {
        return None;
    }

    let mut nearest: Option<(&BlockBounds, f64)> = None;
    for block in blocks {
        if block.contains_y(y) {
            return Some(block);
        }
        let distance = block.distance_to(y);
        match nearest {
            Some((_, best)) if best <= distance => {}
            _ => nearest = Some((block, distance)),
        }
    }
    nearest.map(|(block, _)| block)
}
