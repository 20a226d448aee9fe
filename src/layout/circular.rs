//! Wheel and hemisphere layouts.
//!
//! Each generation occupies a ring; a node's angular range is split among
//! its next-generation nodes (equally or by weight) and they are placed
//! recursively. The root is a disc for full wheels and a half disc for
//! hemispheres.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec2;

use crate::geometry::{AngleRange, BoundingBox, NodeShape, Sector, polar};
use crate::log;
use crate::types::NodeId;

use super::LayoutSession;
use super::defaults::{LABEL_PADDING, RING_WIDTH};
use super::radii::{self, Band, RingTable};
use super::{ChartShape, Distribution};

/// Full turn starting at the bottom
const WHEEL: AngleRange = AngleRange::new(FRAC_PI_2, FRAC_PI_2 + TAU);
/// Upper half, left to right
const UPPER: AngleRange = AngleRange::new(PI, TAU);
/// Lower half, left to right
const LOWER: AngleRange = AngleRange::new(PI, 0.0);

/// Ring tables and chart radius computed by `init`
#[derive(Debug, Clone, Default)]
pub(crate) struct CircleGeometry {
    pub ascendants: RingTable,
    pub descendants: RingTable,
    pub radius: f64,
}

fn geometry(
    session: &mut LayoutSession<'_>,
    init: fn(&mut LayoutSession<'_>) -> BoundingBox,
) -> CircleGeometry {
    if session.circle.is_none() {
        init(session);
    }
    session.circle.clone().unwrap_or_default()
}

fn disc_bounds(radius: f64) -> BoundingBox {
    BoundingBox::from_xywh(-radius, -radius, 2.0 * radius, 2.0 * radius)
}

// ============================================================================
// Ascending
// ============================================================================

pub(crate) fn init_ascending(session: &mut LayoutSession<'_>) -> BoundingBox {
    let kind = session.kind();
    let hemisphere = kind.shape() == ChartShape::Hemisphere;
    let stats = session
        .ascendants()
        .map(|t| t.stats.clone())
        .unwrap_or_default();
    let depth = stats.depth();
    let outer = match kind.distribution() {
        Distribution::Equal => radii::equal_radii(depth, if hemisphere { PI } else { TAU }),
        Distribution::Proportional => radii::proportional_radii(&stats.population),
    };
    let radius = RING_WIDTH * depth as f64;
    session.circle = Some(CircleGeometry {
        ascendants: RingTable::from_outer(&outer),
        descendants: RingTable::default(),
        radius,
    });
    log::debug!(depth, radius, hemisphere, "ascending circle init");
    if hemisphere {
        BoundingBox::from_xywh(-radius, -radius, 2.0 * radius, radius)
    } else {
        disc_bounds(radius)
    }
}

pub(crate) fn build_ascending(session: &mut LayoutSession<'_>) {
    let geo = geometry(session, init_ascending);
    let Some(root) = session.ascendants().map(|t| t.root) else {
        return;
    };
    let hemisphere = session.kind().shape() == ChartShape::Hemisphere;
    let range = if hemisphere { UPPER } else { WHEEL };
    let placer = Placer {
        rings: &geo.ascendants,
        radius: geo.radius,
        equal: session.kind().distribution() == Distribution::Equal,
        full_center: !hemisphere,
    };
    placer.ascendant(session, root, range);
}

// ============================================================================
// Descending
// ============================================================================

pub(crate) fn init_descending(session: &mut LayoutSession<'_>) -> BoundingBox {
    let kind = session.kind();
    let hemisphere = kind.shape() == ChartShape::Hemisphere;
    let stats = session
        .descendants()
        .map(|t| t.stats.clone())
        .unwrap_or_default();
    let depth = stats.depth();
    let outer = radii::proportional_radii(&stats.population);
    let (rings, rings_depth) = if kind.spouses() {
        let (table, _) = RingTable::with_spouse_rings(&outer);
        (table, depth as f64 * (1.0 + radii::SPOUSE_BAND_FRACTION))
    } else {
        (RingTable::from_outer(&outer), depth as f64)
    };
    let radius = RING_WIDTH * rings_depth;
    session.circle = Some(CircleGeometry {
        ascendants: RingTable::default(),
        descendants: rings,
        radius,
    });
    log::debug!(depth, radius, hemisphere, "descending circle init");
    if hemisphere {
        BoundingBox::from_xywh(-radius, 0.0, 2.0 * radius, radius)
    } else {
        disc_bounds(radius)
    }
}

pub(crate) fn build_descending(session: &mut LayoutSession<'_>) {
    let geo = geometry(session, init_descending);
    let Some(root) = session.descendants().map(|t| t.root) else {
        return;
    };
    let hemisphere = session.kind().shape() == ChartShape::Hemisphere;
    let range = if hemisphere { LOWER } else { WHEEL };
    let placer = Placer {
        rings: &geo.descendants,
        radius: geo.radius,
        equal: false,
        full_center: !hemisphere,
    };
    placer.descendant(session, root, range, true);
}

// ============================================================================
// Combined
// ============================================================================

pub(crate) fn init_combined(session: &mut LayoutSession<'_>) -> BoundingBox {
    let spouses = session.kind().spouses();
    let asc_stats = session
        .ascendants()
        .map(|t| t.stats.clone())
        .unwrap_or_default();
    let dsc_stats = session
        .descendants()
        .map(|t| t.stats.clone())
        .unwrap_or_default();
    let asc_depth = asc_stats.depth();
    let dsc_depth = dsc_stats.depth();

    let merged = radii::reconcile(
        &radii::proportional_radii(&asc_stats.population),
        &radii::proportional_radii(&dsc_stats.population),
    );
    let asc = RingTable::from_outer(&merged[..asc_depth.min(merged.len())]);
    let dsc_outer = &merged[..dsc_depth.min(merged.len())];
    let (asc, dsc, dsc_rings_depth) = if spouses {
        let dsc = RingTable::spouse_rings(dsc_outer);
        let r = asc.outer().max(dsc.outer());
        let factor = if r > 0.0 { 1.0 / r } else { 1.0 };
        (
            asc.scaled(factor),
            dsc.scaled(factor),
            dsc_depth as f64 * (1.0 + radii::SPOUSE_BAND_FRACTION),
        )
    } else {
        (asc, RingTable::from_outer(dsc_outer), dsc_depth as f64)
    };

    let radius = RING_WIDTH * (asc_depth as f64).max(dsc_rings_depth);
    session.circle = Some(CircleGeometry {
        ascendants: asc,
        descendants: dsc,
        radius,
    });
    log::debug!(asc_depth, dsc_depth, radius, "combined circle init");
    disc_bounds(radius)
}

pub(crate) fn build_combined(session: &mut LayoutSession<'_>) {
    let geo = geometry(session, init_combined);
    if let Some(root) = session.ascendants().map(|t| t.root) {
        let placer = Placer {
            rings: &geo.ascendants,
            radius: geo.radius,
            equal: false,
            full_center: true,
        };
        placer.ascendant(session, root, UPPER);
    }
    // The centre disc was drawn by the ascendant pass
    if let Some(root) = session.descendants().map(|t| t.root) {
        let placer = Placer {
            rings: &geo.descendants,
            radius: geo.radius,
            equal: false,
            full_center: true,
        };
        placer.descendant(session, root, LOWER, false);
    }
}

// ============================================================================
// Placement
// ============================================================================

struct Placer<'r> {
    rings: &'r RingTable,
    radius: f64,
    equal: bool,
    /// Generation 0 is a full disc rather than a half-disc sector
    full_center: bool,
}

impl Placer<'_> {
    fn ascendant(&self, session: &mut LayoutSession<'_>, id: NodeId, range: AngleRange) {
        let node = session.node(id);
        let generation = node.generation;
        let children = node.children.clone();
        let Some(band) = self.rings.person(generation) else {
            return;
        };
        self.paint_person(session, id, generation, band, range);

        let weights: Vec<f64> = children
            .iter()
            .map(|&c| if self.equal { 1.0 } else { session.node(c).weight })
            .collect();
        for (child, sub) in children.into_iter().zip(range.split(&weights)) {
            if !session.node(child).is_separator() {
                self.ascendant(session, child, sub);
            }
        }
    }

    fn descendant(
        &self,
        session: &mut LayoutSession<'_>,
        id: NodeId,
        range: AngleRange,
        draw: bool,
    ) {
        let node = session.node(id);
        let generation = node.generation;
        let slots = node.spouses.clone();
        let children = node.children.clone();
        if draw {
            let Some(band) = self.rings.person(generation) else {
                return;
            };
            self.paint_person(session, id, generation, band, range);
        }

        if slots.is_empty() {
            self.children(session, &children, range);
            return;
        }

        let weights: Vec<f64> = slots.iter().map(|&s| session.node(s).weight).collect();
        for (slot, sub) in slots.into_iter().zip(range.split(&weights)) {
            if let Some(band) = self.rings.spouse(generation) {
                let sector = self.sector(sub, band);
                session.assign_shape(slot, NodeShape::Sector(sector));
                sector_label(session, slot, sector);
            }
            let kids = session.node(slot).children.clone();
            self.children(session, &kids, sub);
        }
    }

    fn children(&self, session: &mut LayoutSession<'_>, children: &[NodeId], range: AngleRange) {
        let weights: Vec<f64> = children.iter().map(|&c| session.node(c).weight).collect();
        for (&child, sub) in children.iter().zip(range.split(&weights)) {
            if !session.node(child).is_separator() {
                self.descendant(session, child, sub, true);
            }
        }
    }

    fn sector(&self, range: AngleRange, band: Band) -> Sector {
        Sector::new(range, band.inner * self.radius, band.outer * self.radius)
    }

    fn paint_person(
        &self,
        session: &mut LayoutSession<'_>,
        id: NodeId,
        generation: usize,
        band: Band,
        range: AngleRange,
    ) {
        if generation == 0 && self.full_center {
            let radius = band.outer * self.radius;
            session.assign_shape(
                id,
                NodeShape::Disc {
                    center: DVec2::ZERO,
                    radius,
                },
            );
            // Largest square inside the disc
            let side = radius * std::f64::consts::SQRT_2 * LABEL_PADDING;
            if let Some(text) = session.fit_label(id, side, side) {
                session.add_label(id, DVec2::ZERO, 0.0, text);
            }
            return;
        }
        let sector = self.sector(range, band);
        session.assign_shape(id, NodeShape::Sector(sector));
        sector_label(session, id, sector);
    }
}

/// Fit a label into a sector, written along the arc or along the radius,
/// whichever allows the larger font. Rotations keep text upright.
fn sector_label(session: &mut LayoutSession<'_>, id: NodeId, sector: Sector) {
    let mid = sector.angles.mid();
    let arc = sector.mid_arc() * LABEL_PADDING;
    let band = sector.band() * LABEL_PADDING;
    let center = polar(sector.mid_radius(), mid);

    let tangential = session.fit_label(id, arc, band);
    let radial = session.fit_label(id, band, arc);
    let use_radial = match (&tangential, &radial) {
        (Some(t), Some(r)) => r.font_size > t.font_size,
        (None, Some(_)) => true,
        _ => false,
    };

    let (text, rotation) = if use_radial {
        let mut rotation = mid.to_degrees();
        if mid.cos() < 0.0 {
            rotation -= 180.0;
        }
        (radial, rotation)
    } else {
        let mut rotation = mid.to_degrees() + 90.0;
        if mid.sin() > 0.0 {
            rotation -= 180.0;
        }
        (tangential, rotation)
    };
    if let Some(text) = text {
        session.add_label(id, center, normalize_degrees(rotation), text);
    }
}

/// Map an angle in degrees into `(-180, 180]`
fn normalize_degrees(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}
