//! Horizontal and vertical tree layouts.
//!
//! Generations are columns (horizontal trees) or rows (vertical trees) of
//! boxes. A node's cross-axis extent is split among its next-generation
//! nodes, separators included, and boxes are centred in their extent.

use glam::{DVec2, dvec2};

use crate::geometry::{BoundingBox, NodeShape, Rect, split_extent};
use crate::log;
use crate::types::NodeId;

use super::defaults::{
    BOX_MARGIN, HTREE_BOX_DEPTH, HTREE_CROSS_UNIT, HTREE_GAP, LABEL_PADDING, MAX_BOX_WEIGHT,
    VTREE_BOX_DEPTH, VTREE_CROSS_UNIT, VTREE_GAP,
};
use super::node::{GenerationStats, LayoutNode};
use super::{ChartShape, Distribution, LayoutSession};

/// Direction in which generations advance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn of(shape: ChartShape) -> Axis {
        match shape {
            ChartShape::TreeVertical => Axis::Vertical,
            _ => Axis::Horizontal,
        }
    }
}

/// Maps (depth, cross) tree coordinates to layout space for one side of a
/// chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TreeFrame {
    pub axis: Axis,
    /// +1 when generations advance towards increasing coordinates
    pub sign: f64,
    /// Depth of generation 0's near edge, before applying `sign`
    pub origin: f64,
    pub box_depth: f64,
    pub gap: f64,
    pub cross_unit: f64,
    pub spouses: bool,
}

impl TreeFrame {
    pub fn new(axis: Axis, sign: f64, spouses: bool) -> Self {
        let (box_depth, gap, cross_unit) = match axis {
            Axis::Horizontal => (HTREE_BOX_DEPTH, HTREE_GAP, HTREE_CROSS_UNIT),
            Axis::Vertical => (VTREE_BOX_DEPTH, VTREE_GAP, VTREE_CROSS_UNIT),
        };
        Self {
            axis,
            sign,
            origin: 0.0,
            box_depth,
            gap,
            cross_unit,
            spouses,
        }
    }

    /// Generation 0 straddles depth 0, so both sides share the centre box
    pub fn centered(mut self) -> Self {
        self.origin = -self.box_depth / 2.0;
        self
    }

    pub fn pitch(&self) -> f64 {
        let columns = if self.spouses { 2.0 } else { 1.0 };
        self.box_depth * columns + self.gap
    }

    /// Near and far edges of a generation's person (or spouse) column
    pub fn edges(&self, generation: usize, spouse: bool) -> (f64, f64) {
        let near = self.origin
            + generation as f64 * self.pitch()
            + if spouse { self.box_depth } else { 0.0 };
        (near * self.sign, (near + self.box_depth) * self.sign)
    }

    pub fn point(&self, depth: f64, cross: f64) -> DVec2 {
        match self.axis {
            Axis::Horizontal => dvec2(depth, cross),
            Axis::Vertical => dvec2(cross, depth),
        }
    }

    pub fn rect(&self, generation: usize, spouse: bool, center: f64, cross_size: f64) -> Rect {
        let (near, far) = self.edges(generation, spouse);
        let lo = near.min(far);
        let c0 = center - cross_size / 2.0;
        match self.axis {
            Axis::Horizontal => Rect::new(lo, c0, self.box_depth, cross_size),
            Axis::Vertical => Rect::new(c0, lo, cross_size, self.box_depth),
        }
    }

    /// Bounds of `generations` generations spanning `span` across the axis
    pub fn bounds(&self, generations: usize, span: f64) -> BoundingBox {
        let last = generations.saturating_sub(1);
        let (near, _) = self.edges(0, false);
        let (_, far) = self.edges(last, self.spouses);
        let lo = near.min(far);
        let depth = (far - near).abs();
        match self.axis {
            Axis::Horizontal => BoundingBox::from_xywh(lo, -span / 2.0, depth, span),
            Axis::Vertical => BoundingBox::from_xywh(-span / 2.0, lo, span, depth),
        }
    }
}

/// Frames and cross extents computed by `init`
#[derive(Debug, Clone, Default)]
pub(crate) struct TreeGeometry {
    pub ascendants: Option<TreeFrame>,
    pub descendants: Option<TreeFrame>,
    pub ascendant_span: f64,
    pub descendant_span: f64,
}

fn geometry(
    session: &mut LayoutSession<'_>,
    init: fn(&mut LayoutSession<'_>) -> BoundingBox,
) -> TreeGeometry {
    if session.tree.is_none() {
        init(session);
    }
    session.tree.clone().unwrap_or_default()
}

/// Cross extent, in slots, of an equally distributed ancestor tree
fn equal_span(nodes: &[LayoutNode], id: NodeId) -> f64 {
    let parents: Vec<NodeId> = nodes[id.0]
        .children
        .iter()
        .copied()
        .filter(|c| !nodes[c.0].is_separator())
        .collect();
    if parents.is_empty() {
        return 1.0;
    }
    let widest = parents
        .iter()
        .map(|&p| equal_span(nodes, p))
        .fold(0.0, f64::max);
    parents.len() as f64 * widest
}

fn ascendant_span(session: &LayoutSession<'_>, frame: &TreeFrame) -> f64 {
    let Some(root) = session.ascendants().map(|t| t.root) else {
        return 0.0;
    };
    let slots = match session.kind().distribution() {
        Distribution::Equal => equal_span(session.nodes(), root),
        Distribution::Proportional => session.node(root).weight,
    };
    slots * frame.cross_unit
}

fn descendant_span(session: &LayoutSession<'_>, frame: &TreeFrame) -> f64 {
    session
        .descendants()
        .map_or(0.0, |t| session.node(t.root).weight * frame.cross_unit)
}

fn depth(stats: Option<&GenerationStats>) -> usize {
    stats.map_or(0, |s| s.depth())
}

// ============================================================================
// init
// ============================================================================

pub(crate) fn init_ascending(session: &mut LayoutSession<'_>) -> BoundingBox {
    let axis = Axis::of(session.kind().shape());
    // Ancestors grow rightwards, or upwards in vertical trees
    let sign = if axis == Axis::Vertical { -1.0 } else { 1.0 };
    let frame = TreeFrame::new(axis, sign, false);
    let span = ascendant_span(session, &frame);
    let generations = depth(session.ascendants().map(|t| &t.stats));
    session.tree = Some(TreeGeometry {
        ascendants: Some(frame),
        ascendant_span: span,
        ..TreeGeometry::default()
    });
    log::debug!(generations, span, "ascending tree init");
    frame.bounds(generations, span)
}

pub(crate) fn init_descending(session: &mut LayoutSession<'_>) -> BoundingBox {
    let axis = Axis::of(session.kind().shape());
    let frame = TreeFrame::new(axis, 1.0, session.kind().spouses());
    let span = descendant_span(session, &frame);
    let generations = depth(session.descendants().map(|t| &t.stats));
    session.tree = Some(TreeGeometry {
        descendants: Some(frame),
        descendant_span: span,
        ..TreeGeometry::default()
    });
    log::debug!(generations, span, "descending tree init");
    frame.bounds(generations, span)
}

pub(crate) fn init_combined(session: &mut LayoutSession<'_>) -> BoundingBox {
    let axis = Axis::of(session.kind().shape());
    let asc = TreeFrame::new(axis, -1.0, false).centered();
    let dsc = TreeFrame::new(axis, 1.0, session.kind().spouses()).centered();
    let asc_span = ascendant_span(session, &asc);
    let dsc_span = descendant_span(session, &dsc);
    let asc_generations = depth(session.ascendants().map(|t| &t.stats));
    let dsc_generations = depth(session.descendants().map(|t| &t.stats));
    session.tree = Some(TreeGeometry {
        ascendants: Some(asc),
        descendants: Some(dsc),
        ascendant_span: asc_span,
        descendant_span: dsc_span,
    });
    log::debug!(asc_span, dsc_span, "combined tree init");
    let mut bounds = asc.bounds(asc_generations, asc_span);
    bounds.expand_box(&dsc.bounds(dsc_generations, dsc_span));
    bounds
}

// ============================================================================
// build
// ============================================================================

pub(crate) fn build_ascending(session: &mut LayoutSession<'_>) {
    let geo = geometry(session, init_ascending);
    place_ascendants(session, &geo);
}

pub(crate) fn build_descending(session: &mut LayoutSession<'_>) {
    let geo = geometry(session, init_descending);
    place_descendants(session, &geo, true);
}

pub(crate) fn build_combined(session: &mut LayoutSession<'_>) {
    let geo = geometry(session, init_combined);
    place_ascendants(session, &geo);
    place_descendants(session, &geo, false);
}

fn place_ascendants(session: &mut LayoutSession<'_>, geo: &TreeGeometry) {
    let (Some(frame), Some(traversal)) = (geo.ascendants, session.ascendants()) else {
        return;
    };
    let root = traversal.root;
    let placer = Placer {
        frame,
        stats: traversal.stats.clone(),
        equal: session.kind().distribution() == Distribution::Equal,
    };
    let half = geo.ascendant_span / 2.0;
    placer.ascendant(session, root, (-half, half), None);
}

fn place_descendants(session: &mut LayoutSession<'_>, geo: &TreeGeometry, draw_root: bool) {
    let (Some(frame), Some(traversal)) = (geo.descendants, session.descendants()) else {
        return;
    };
    let root = traversal.root;
    let placer = Placer {
        frame,
        stats: traversal.stats.clone(),
        equal: false,
    };
    let half = geo.descendant_span / 2.0;
    placer.descendant(session, root, (-half, half), None, draw_root);
}

/// Point on a box edge, in tree coordinates
#[derive(Debug, Clone, Copy)]
struct Anchor {
    depth: f64,
    cross: f64,
}

struct Placer {
    frame: TreeFrame,
    stats: GenerationStats,
    equal: bool,
}

impl Placer {
    fn box_size(&self, generation: usize, extent: f64) -> f64 {
        let slots = self.stats.min_weight_at(generation).min(MAX_BOX_WEIGHT);
        let preferred = self.frame.cross_unit * slots;
        preferred.min(extent) * (1.0 - BOX_MARGIN)
    }

    /// Box of a node whose extent is `cross`, with its near and far anchors
    fn layout_box(
        &self,
        generation: usize,
        spouse: bool,
        cross: (f64, f64),
    ) -> (Rect, Anchor, Anchor) {
        let center = (cross.0 + cross.1) / 2.0;
        let size = self.box_size(generation, cross.1 - cross.0);
        let rect = self.frame.rect(generation, spouse, center, size);
        let (near, far) = self.frame.edges(generation, spouse);
        (
            rect,
            Anchor {
                depth: near,
                cross: center,
            },
            Anchor {
                depth: far,
                cross: center,
            },
        )
    }

    fn paint_box(&self, session: &mut LayoutSession<'_>, id: NodeId, rect: Rect) {
        session.assign_shape(id, NodeShape::Rect(rect));
        let w = rect.size.x * LABEL_PADDING;
        let h = rect.size.y * LABEL_PADDING;
        if let Some(text) = session.fit_label(id, w, h) {
            session.add_label(id, rect.center(), 0.0, text);
        }
    }

    /// Elbow from `from` to `to`, owned by node `id`
    fn link(&self, session: &mut LayoutSession<'_>, id: NodeId, from: Anchor, to: Anchor) {
        let mid = (from.depth + to.depth) / 2.0;
        let points = [
            self.frame.point(from.depth, from.cross),
            self.frame.point(mid, from.cross),
            self.frame.point(mid, to.cross),
            self.frame.point(to.depth, to.cross),
        ];
        for pair in points.windows(2) {
            session.add_line(id, pair[0], pair[1]);
        }
    }

    fn ascendant(
        &self,
        session: &mut LayoutSession<'_>,
        id: NodeId,
        cross: (f64, f64),
        from: Option<Anchor>,
    ) {
        let node = session.node(id);
        let generation = node.generation;
        let next: Vec<NodeId> = if self.equal {
            node.children
                .iter()
                .copied()
                .filter(|&c| !session.node(c).is_separator())
                .collect()
        } else {
            node.children.clone()
        };

        let (rect, near, far) = self.layout_box(generation, false, cross);
        self.paint_box(session, id, rect);
        if let Some(from) = from {
            self.link(session, id, from, near);
        }

        let weights: Vec<f64> = next
            .iter()
            .map(|&c| if self.equal { 1.0 } else { session.node(c).weight })
            .collect();
        for (child, sub) in next.into_iter().zip(split_extent(cross.0, cross.1, &weights)) {
            if !session.node(child).is_separator() {
                self.ascendant(session, child, sub, Some(far));
            }
        }
    }

    fn descendant(
        &self,
        session: &mut LayoutSession<'_>,
        id: NodeId,
        cross: (f64, f64),
        from: Option<Anchor>,
        draw: bool,
    ) {
        let node = session.node(id);
        let generation = node.generation;
        let slots = node.spouses.clone();
        let children = node.children.clone();

        let (rect, near, far) = self.layout_box(generation, false, cross);
        if draw {
            self.paint_box(session, id, rect);
            if let Some(from) = from {
                self.link(session, id, from, near);
            }
        }

        if slots.is_empty() {
            self.children(session, &children, cross, far);
            return;
        }

        let weights: Vec<f64> = slots.iter().map(|&s| session.node(s).weight).collect();
        for (slot, sub) in slots.into_iter().zip(split_extent(cross.0, cross.1, &weights)) {
            let (spouse_rect, spouse_near, spouse_far) = self.layout_box(generation, true, sub);
            self.paint_box(session, slot, spouse_rect);
            self.link(session, slot, far, spouse_near);
            let kids = session.node(slot).children.clone();
            self.children(session, &kids, sub, spouse_far);
        }
    }

    fn children(
        &self,
        session: &mut LayoutSession<'_>,
        children: &[NodeId],
        cross: (f64, f64),
        from: Anchor,
    ) {
        let weights: Vec<f64> = children.iter().map(|&c| session.node(c).weight).collect();
        for (&child, sub) in children.iter().zip(split_extent(cross.0, cross.1, &weights)) {
            if !session.node(child).is_separator() {
                self.descendant(session, child, sub, Some(from), true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centred_frames_share_the_root_box() {
        let asc = TreeFrame::new(Axis::Horizontal, -1.0, false).centered();
        let dsc = TreeFrame::new(Axis::Horizontal, 1.0, true).centered();
        let a = asc.rect(0, false, 0.0, 1.0);
        let d = dsc.rect(0, false, 0.0, 1.0);
        assert_eq!(a, d);
        assert_eq!(a.origin.x, -HTREE_BOX_DEPTH / 2.0);
    }

    #[test]
    fn generations_advance_by_pitch() {
        let frame = TreeFrame::new(Axis::Vertical, 1.0, false);
        assert_eq!(frame.edges(0, false), (0.0, VTREE_BOX_DEPTH));
        let (near, _) = frame.edges(2, false);
        assert!((near - 2.0 * (VTREE_BOX_DEPTH + VTREE_GAP)).abs() < 1e-12);

        let mirrored = TreeFrame::new(Axis::Vertical, -1.0, false);
        let (near, far) = mirrored.edges(1, false);
        assert!(near < 0.0 && far < near);
    }

    #[test]
    fn spouse_column_widens_the_pitch() {
        let plain = TreeFrame::new(Axis::Horizontal, 1.0, false);
        let spouses = TreeFrame::new(Axis::Horizontal, 1.0, true);
        assert_eq!(spouses.pitch() - plain.pitch(), HTREE_BOX_DEPTH);
        let (person_near, person_far) = spouses.edges(1, false);
        let (spouse_near, _) = spouses.edges(1, true);
        assert_eq!(person_far, spouse_near);
        assert!(person_near < spouse_near);
    }

    #[test]
    fn bounds_cover_every_generation() {
        let frame = TreeFrame::new(Axis::Horizontal, 1.0, false);
        let bb = frame.bounds(3, 8.0);
        assert_eq!(bb.min, dvec2(0.0, -4.0));
        let expected = 2.0 * (HTREE_BOX_DEPTH + HTREE_GAP) + HTREE_BOX_DEPTH;
        assert!((bb.width() - expected).abs() < 1e-12);
        assert_eq!(bb.height(), 8.0);
    }
}
