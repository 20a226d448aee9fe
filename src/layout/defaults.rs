//! Default sizes and settings (all in layout units; one unit is roughly one
//! label line)

use crate::text::FontRange;

/// Deepest generation count accepted for either direction
pub const MAX_GENERATIONS: usize = 12;
pub const DEFAULT_ASCENDANT_GENERATIONS: usize = 5;
pub const DEFAULT_DESCENDANT_GENERATIONS: usize = 4;

/// Chart radius per displayed generation in circular layouts
pub const RING_WIDTH: f64 = 2.0;

/// Horizontal trees: box length along the generation axis, gap, row height
pub const HTREE_BOX_DEPTH: f64 = 3.0;
pub const HTREE_GAP: f64 = 1.0;
pub const HTREE_CROSS_UNIT: f64 = 1.0;

/// Vertical trees: box height along the generation axis, gap, column width
pub const VTREE_BOX_DEPTH: f64 = 1.2;
pub const VTREE_GAP: f64 = 0.8;
pub const VTREE_CROSS_UNIT: f64 = 3.2;

/// Fraction of a slot left empty around a tree box
pub const BOX_MARGIN: f64 = 0.1;
/// Largest box, in slots, across the generation axis
pub const MAX_BOX_WEIGHT: f64 = 1.5;
/// Fraction of a shape's size available to its label
pub const LABEL_PADDING: f64 = 0.85;

pub const LABEL_FONTS: FontRange = FontRange {
    max: 0.45,
    min: 0.06,
};
