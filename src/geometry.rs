//! Geometry primitives in layout units (SVG orientation: y grows downward,
//! angles in radians grow clockwise from +x).

use std::f64::consts::TAU;

use glam::{DVec2, dvec2};

/// Point at radius `r` and angle `angle` around the origin
#[inline]
pub fn polar(r: f64, angle: f64) -> DVec2 {
    dvec2(r * angle.cos(), r * angle.sin())
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl BoundingBox {
    /// Empty box that any point expands
    pub fn new() -> Self {
        Self {
            min: DVec2::splat(f64::INFINITY),
            max: DVec2::splat(f64::NEG_INFINITY),
        }
    }

    pub fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min: dvec2(x, y),
            max: dvec2(x + w, y + h),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min.x < self.max.x && self.min.y < self.max.y)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn expand_box(&mut self, other: &BoundingBox) {
        self.expand_point(other.min);
        self.expand_point(other.max);
    }

    pub fn inflate(&self, margin: f64) -> BoundingBox {
        BoundingBox {
            min: self.min - DVec2::splat(margin),
            max: self.max + DVec2::splat(margin),
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new()
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub origin: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            origin: dvec2(x, y),
            size: dvec2(w, h),
        }
    }

    pub fn center(&self) -> DVec2 {
        self.origin + self.size * 0.5
    }

    pub fn contains(&self, p: DVec2) -> bool {
        let d = p - self.origin;
        d.x >= 0.0 && d.y >= 0.0 && d.x <= self.size.x && d.y <= self.size.y
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            min: self.origin,
            max: self.origin + self.size,
        }
    }
}

/// Angular range `[start, end]`; `end < start` runs counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleRange {
    pub start: f64,
    pub end: f64,
}

impl AngleRange {
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    pub fn mid(&self) -> f64 {
        (self.start + self.end) * 0.5
    }

    /// Split into consecutive sub-ranges proportional to `weights`.
    ///
    /// The first range starts at `start` and the last ends exactly at
    /// `end`, so the pieces tile the range with no gap or overlap.
    pub fn split(&self, weights: &[f64]) -> Vec<AngleRange> {
        split_extent(self.start, self.end, weights)
            .into_iter()
            .map(|(a, b)| AngleRange::new(a, b))
            .collect()
    }
}

/// Split `[start, end]` into consecutive pieces proportional to `weights`
pub fn split_extent(start: f64, end: f64, weights: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = weights.iter().sum();
    let n = weights.len();
    let mut out = Vec::with_capacity(n);
    let mut acc = 0.0;
    let mut from = start;
    for (i, w) in weights.iter().enumerate() {
        acc += w;
        let to = if i + 1 == n {
            end
        } else if total > 0.0 {
            start + (end - start) * acc / total
        } else {
            start + (end - start) * (i + 1) as f64 / n as f64
        };
        out.push((from, to));
        from = to;
    }
    out
}

/// Annular sector `angles × [inner, outer]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub angles: AngleRange,
    pub inner: f64,
    pub outer: f64,
}

impl Sector {
    pub fn new(angles: AngleRange, inner: f64, outer: f64) -> Self {
        Self {
            angles,
            inner,
            outer,
        }
    }

    pub fn mid_radius(&self) -> f64 {
        (self.inner + self.outer) * 0.5
    }

    pub fn band(&self) -> f64 {
        self.outer - self.inner
    }

    /// Arc length at the middle radius
    pub fn mid_arc(&self) -> f64 {
        self.angles.span().abs() * self.mid_radius()
    }

    pub fn is_full_turn(&self) -> bool {
        self.angles.span().abs() >= TAU - 1e-9
    }

    pub fn contains(&self, p: DVec2) -> bool {
        let r = p.length();
        if r < self.inner || r > self.outer {
            return false;
        }
        if self.is_full_turn() {
            return true;
        }
        let lo = self.angles.start.min(self.angles.end);
        let offset = (p.y.atan2(p.x) - lo).rem_euclid(TAU);
        offset <= self.angles.span().abs()
    }

    /// Bounds sampled along both arcs plus the four corners
    pub fn bounds(&self) -> BoundingBox {
        let mut bb = BoundingBox::new();
        let steps = 32;
        for i in 0..=steps {
            let a = self.angles.start + self.angles.span() * i as f64 / steps as f64;
            bb.expand_point(polar(self.outer, a));
            bb.expand_point(polar(self.inner, a));
        }
        bb
    }
}

/// Geometry assigned to a painted layout node, used for hit-testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    Disc { center: DVec2, radius: f64 },
    Sector(Sector),
    Rect(Rect),
}

impl NodeShape {
    pub fn contains(&self, p: DVec2) -> bool {
        match self {
            NodeShape::Disc { center, radius } => p.distance(*center) <= *radius,
            NodeShape::Sector(s) => s.contains(p),
            NodeShape::Rect(r) => r.contains(p),
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        match self {
            NodeShape::Disc { center, radius } => BoundingBox {
                min: *center - DVec2::splat(*radius),
                max: *center + DVec2::splat(*radius),
            },
            NodeShape::Sector(s) => s.bounds(),
            NodeShape::Rect(r) => r.bounds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn split_tiles_the_range_exactly() {
        let parts = split_extent(0.3, 2.9, &[1.0, 0.3, 2.0, 1.7]);
        assert_eq!(parts.first().map(|p| p.0), Some(0.3));
        assert_eq!(parts.last().map(|p| p.1), Some(2.9));
        for pair in parts.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
        let second = parts[1].1 - parts[1].0;
        assert!((second - 2.6 * 0.3 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn split_handles_reversed_ranges() {
        let parts = AngleRange::new(PI, 0.0).split(&[1.0, 1.0]);
        assert_eq!(parts[0], AngleRange::new(PI, FRAC_PI_2));
        assert_eq!(parts[1], AngleRange::new(FRAC_PI_2, 0.0));
    }

    #[test]
    fn sector_contains_across_wraparound() {
        // Lower-left quadrant expressed past 2π
        let s = Sector::new(AngleRange::new(FRAC_PI_2, PI), 1.0, 2.0);
        assert!(s.contains(polar(1.5, 3.0 * PI / 4.0)));
        assert!(!s.contains(polar(1.5, -PI / 4.0)));
        assert!(!s.contains(polar(0.5, 3.0 * PI / 4.0)));

        let wrapped = Sector::new(AngleRange::new(3.0 * PI / 2.0, 5.0 * PI / 2.0), 0.0, 1.0);
        assert!(wrapped.contains(polar(0.5, 0.1)));
        assert!(wrapped.contains(polar(0.5, -0.1)));
        assert!(!wrapped.contains(polar(0.5, PI)));
    }

    #[test]
    fn bounding_box_expands() {
        let mut bb = BoundingBox::new();
        assert!(bb.is_empty());
        bb.expand_point(dvec2(1.0, -2.0));
        bb.expand_point(dvec2(-3.0, 4.0));
        assert_eq!(bb.width(), 4.0);
        assert_eq!(bb.height(), 6.0);
        assert_eq!(bb.center(), dvec2(-1.0, 1.0));
    }

    #[test]
    fn rect_and_disc_hit_testing() {
        let r = NodeShape::Rect(Rect::new(0.0, 0.0, 2.0, 1.0));
        assert!(r.contains(dvec2(1.0, 0.5)));
        assert!(!r.contains(dvec2(2.5, 0.5)));
        let d = NodeShape::Disc {
            center: DVec2::ZERO,
            radius: 1.0,
        };
        assert!(d.contains(dvec2(0.6, 0.6)));
        assert!(!d.contains(dvec2(0.8, 0.8)));
    }
}
