//! Ring radius allocation for circular layouts.
//!
//! Radii are normalised: the outermost ring ends at 1.0 and builders scale
//! them by the chart radius.

/// Width of the centre disc in band units
pub const CENTER_BAND: f64 = 1.0;
/// Arc length (band units) a tangential label needs in one slot
pub const TANGENTIAL_TEXT_LENGTH: f64 = 3.0;
/// Band width of rings whose labels are written radially
pub const RADIAL_BAND: f64 = 2.0;
/// Smallest proportional band, relative to the most populated generation
pub const MIN_BAND_FRACTION: f64 = 0.25;
/// Spouse ring width relative to the person ring it follows
pub const SPOUSE_BAND_FRACTION: f64 = 0.5;

/// Radial extent of one ring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub inner: f64,
    pub outer: f64,
}

impl Band {
    pub fn width(&self) -> f64 {
        self.outer - self.inner
    }

    fn scaled(self, factor: f64) -> Band {
        Band {
            inner: self.inner * factor,
            outer: self.outer * factor,
        }
    }
}

/// Person rings per generation, plus spouse rings when spouses are shown
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RingTable {
    pub persons: Vec<Band>,
    pub spouses: Vec<Band>,
}

impl RingTable {
    /// Consecutive rings from normalised outer radii
    pub fn from_outer(outer: &[f64]) -> Self {
        let mut inner = 0.0;
        let persons = outer
            .iter()
            .map(|&o| {
                let band = Band { inner, outer: o };
                inner = o;
                band
            })
            .collect();
        Self {
            persons,
            spouses: Vec::new(),
        }
    }

    /// Insert a half-width spouse ring after every person ring, then rescale
    /// so the last spouse ring ends at 1.0. Returns the rescale factor.
    pub fn with_spouse_rings(outer: &[f64]) -> (Self, f64) {
        let table = Self::spouse_rings(outer);
        let r = table.outer();
        let factor = if r > 0.0 { 1.0 / r } else { 1.0 };
        (table.scaled(factor), factor)
    }

    /// Person and spouse rings without rescaling; the table ends past 1.0
    pub fn spouse_rings(outer: &[f64]) -> Self {
        let mut persons = Vec::with_capacity(outer.len());
        let mut spouses = Vec::with_capacity(outer.len());
        let mut r = 0.0;
        let mut prev = 0.0;
        for &o in outer {
            let width = o - prev;
            prev = o;
            persons.push(Band {
                inner: r,
                outer: r + width,
            });
            r += width;
            let half = width * SPOUSE_BAND_FRACTION;
            spouses.push(Band {
                inner: r,
                outer: r + half,
            });
            r += half;
        }
        Self { persons, spouses }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            persons: self.persons.into_iter().map(|b| b.scaled(factor)).collect(),
            spouses: self.spouses.into_iter().map(|b| b.scaled(factor)).collect(),
        }
    }

    pub fn person(&self, generation: usize) -> Option<Band> {
        self.persons.get(generation).copied()
    }

    pub fn spouse(&self, generation: usize) -> Option<Band> {
        self.spouses.get(generation).copied()
    }

    /// Outermost radius in use
    pub fn outer(&self) -> f64 {
        let p = self.persons.last().map_or(0.0, |b| b.outer);
        let s = self.spouses.last().map_or(0.0, |b| b.outer);
        p.max(s)
    }
}

/// Population-independent rings for `generations` generations spread over
/// `span` radians.
///
/// Generation `g` is assumed to hold `2^g` slots. A ring stays thin while a
/// slot's arc can hold a tangential label, and widens to [`RADIAL_BAND`]
/// once labels have to be written along the radius. Rings therefore get
/// wider, not thinner, as the available arc per slot shrinks.
pub fn equal_radii(generations: usize, span: f64) -> Vec<f64> {
    let mut outer = Vec::with_capacity(generations);
    if generations == 0 {
        return outer;
    }
    let mut r = CENTER_BAND;
    outer.push(r);
    for g in 1..generations {
        let slots = 2f64.powi(g as i32);
        let arc = span.abs() * r / slots;
        r += if arc >= TANGENTIAL_TEXT_LENGTH {
            1.0
        } else {
            RADIAL_BAND
        };
        outer.push(r);
    }
    normalize(outer)
}

/// Rings whose widths follow each generation's population, capped at the
/// most populated generation and floored at [`MIN_BAND_FRACTION`].
pub fn proportional_radii(population: &[usize]) -> Vec<f64> {
    let max = population.iter().copied().max().unwrap_or(0).max(1) as f64;
    let mut r = 0.0;
    let outer = population
        .iter()
        .map(|&pop| {
            r += (pop as f64 / max).clamp(MIN_BAND_FRACTION, 1.0);
            r
        })
        .collect();
    normalize(outer)
}

/// Merge ascendant and descendant tables: the smaller radius wins on the
/// shared generations, the deeper table supplies the rest.
pub fn reconcile(asc: &[f64], dsc: &[f64]) -> Vec<f64> {
    let (long, short) = if asc.len() >= dsc.len() {
        (asc, dsc)
    } else {
        (dsc, asc)
    };
    long.iter()
        .enumerate()
        .map(|(i, &r)| short.get(i).map_or(r, |&s| r.min(s)))
        .collect()
}

fn normalize(mut outer: Vec<f64>) -> Vec<f64> {
    let last = outer.last().copied().unwrap_or(0.0);
    if last > 0.0 {
        for r in &mut outer {
            *r /= last;
        }
    }
    outer
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{PI, TAU};

    #[test]
    fn equal_radii_widen_once_arcs_shrink() {
        let outer = equal_radii(4, TAU);
        // r0 = 1; arc(1) = 2π/2 = 3.14 -> +1; arc(2) = 2π*2/4 = 3.14 -> +1;
        // arc(3) = 2π*3/8 = 2.36 -> +2
        let raw = [1.0, 2.0, 3.0, 5.0];
        for (o, r) in outer.iter().zip(raw) {
            assert!((o - r / 5.0).abs() < 1e-12);
        }
        assert_eq!(outer.last(), Some(&1.0));
    }

    #[test]
    fn equal_radii_depend_on_span() {
        let full = equal_radii(3, TAU);
        let half = equal_radii(3, PI);
        assert_ne!(full, half);
        assert!(equal_radii(0, TAU).is_empty());
    }

    #[test]
    fn proportional_radii_follow_population() {
        let outer = proportional_radii(&[1, 2, 4]);
        // bands: 0.25 (floored), 0.5, 1.0 -> total 1.75
        let expected = [0.25 / 1.75, 0.75 / 1.75, 1.0];
        for (o, e) in outer.iter().zip(expected) {
            assert!((o - e).abs() < 1e-12);
        }
    }

    #[test]
    fn proportional_radii_survive_empty_generations() {
        let outer = proportional_radii(&[1, 0, 0]);
        assert!(outer.iter().all(|r| r.is_finite()));
        assert_eq!(outer.last(), Some(&1.0));
        let empty = proportional_radii(&[0]);
        assert_eq!(empty, vec![1.0]);
    }

    #[test]
    fn reconcile_takes_the_smaller_radius() {
        let merged = reconcile(&[0.5, 1.0], &[0.2, 0.6, 1.0]);
        assert_eq!(merged, vec![0.2, 0.6, 1.0]);
        let merged = reconcile(&[0.3, 0.5, 0.8, 1.0], &[0.4, 1.0]);
        assert_eq!(merged, vec![0.3, 0.5, 0.8, 1.0]);
    }

    #[test]
    fn spouse_rings_fit_inside_unit_radius() {
        let (table, factor) = RingTable::with_spouse_rings(&[0.5, 1.0]);
        // raw: person [0, .5], spouse [.5, .75], person [.75, 1.25], spouse [1.25, 1.5]
        assert!((factor - 1.0 / 1.5).abs() < 1e-12);
        assert!((table.outer() - 1.0).abs() < 1e-12);
        assert_eq!(table.persons.len(), 2);
        assert_eq!(table.spouses.len(), 2);
        assert_eq!(table.persons[0].inner, 0.0);
        assert!((table.spouses[0].width() - table.persons[0].width() / 2.0).abs() < 1e-12);
        assert_eq!(table.spouses[0].outer, table.persons[1].inner);
    }

    #[test]
    fn rings_from_outer_are_contiguous() {
        let table = RingTable::from_outer(&[0.25, 0.6, 1.0]);
        assert_eq!(table.persons[0], Band { inner: 0.0, outer: 0.25 });
        assert_eq!(table.persons[2], Band { inner: 0.6, outer: 1.0 });
        assert!(table.spouses.is_empty());
        assert_eq!(table.outer(), 1.0);
    }
}
