use serde::{Deserialize, Serialize};

/// Which edge of the target block a drop lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropSide {
    Before,
    After,
}

/// Edge-snap tuning: within `snap_distance` of an edge the drop goes to that
/// edge, otherwise the block's midpoint decides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapPolicy {
    /// Fraction of the block height used as the snap zone
    pub ratio: f64,
    /// Smallest snap zone, in pixels
    pub min: f64,
    /// Largest snap zone, in pixels
    pub max: f64,
}

impl Default for SnapPolicy {
    fn default() -> Self {
        Self {
            ratio: 0.25,
            min: 6.0,
            max: 16.0,
        }
    }
}

impl SnapPolicy {
    /// Snap zone for a block of the given height.
    ///
    /// Applied as floor then ceiling, so a policy with `min > max` yields
    /// `max` rather than panicking like `f64::clamp`.
    pub fn snap_distance(&self, height: f64) -> f64 {
        (height * self.ratio).max(self.min).min(self.max)
    }

    pub fn resolve_drop_side(&self, pointer_y: f64, top: f64, bottom: f64) -> DropSide {
        let height = (bottom - top).max(1.0);
        let snap = self.snap_distance(height);
        if pointer_y <= top + snap {
            DropSide::Before
        } else if pointer_y >= bottom - snap {
            DropSide::After
        } else if pointer_y < top + height * 0.5 {
            DropSide::Before
        } else {
            DropSide::After
        }
    }
}

/// [`SnapPolicy::resolve_drop_side`] with the default policy.
pub fn resolve_drop_side(pointer_y: f64, top: f64, bottom: f64) -> DropSide {
    SnapPolicy::default().resolve_drop_side(pointer_y, top, bottom)
}
