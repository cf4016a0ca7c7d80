//! Split axis selection strategies for BSP construction.
//!
//! Every split halves the node's box at its midpoint; the strategy only
//! decides which axis to cut.

use crate::{Axis, AxisAlignedBox};

/// Strategy for choosing the axis a BSP node is split along.
pub trait SplitSelector {
    /// Picks the split axis for a node covering `bounds`.
    fn select(&self, bounds: &AxisAlignedBox) -> Axis;
}

/// Splits along the axis with the largest extent.
///
/// X wins if it is at least as long as Y and strictly longer than Z; Y wins
/// under the same test against X and Z; otherwise Z. A cube therefore splits
/// along Z.
#[derive(Debug, Clone, Copy, Default)]
pub struct LongestAxis;

impl SplitSelector for LongestAxis {
    fn select(&self, bounds: &AxisAlignedBox) -> Axis {
        let e = bounds.extents();
        if e.x >= e.y && e.x > e.z {
            Axis::X
        } else if e.y >= e.x && e.y > e.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }
}
