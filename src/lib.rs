//! Genealogical chart layout and SVG rendering.
//!
//! Given a person/family graph and a centre person, the crate lays out one
//! of 22 chart kinds (ancestor wheels and hemispheres, descendant trees,
//! combined charts, with or without spouses), records typed paint commands
//! per node and replays them onto a [`render::Surface`], such as the SVG
//! writer. [`view::TreeView`] adds the interactive side: a clamped pan/zoom
//! viewport, hit-testing, popups and time-sliced painting.
//!
//! ```
//! use pedigree_svg::graph::{Database, Person};
//! use pedigree_svg::layout::LayoutOptions;
//! use pedigree_svg::render::SvgOptions;
//! use pedigree_svg::types::Gender;
//!
//! let mut db = Database::new();
//! let father = db.add_person(Person::new("Pierre Martin", Gender::Male));
//! let mother = db.add_person(Person::new("Anne Roux", Gender::Female));
//! let child = db.add_person(Person::new("Jean Martin", Gender::Male));
//! db.add_family(&[father, mother], &[child]);
//!
//! let svg = pedigree_svg::render_svg(&db, child, &LayoutOptions::default(), &SvgOptions::default())
//!     .unwrap();
//! assert!(svg.contains("tree-node-0"));
//! ```

pub mod errors;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod log;
pub mod render;
pub mod text;
pub mod types;
pub mod view;
pub mod viewport;

pub use errors::{LayoutError, ViewError, ViewportError};
pub use graph::{Database, FamilyGraph};
pub use layout::{Layout, LayoutKind, LayoutOptions, compute_layout};
pub use render::{SvgOptions, SvgSurface};
pub use types::{FamilyId, NodeId, PersonId};
pub use view::TreeView;

/// Lay out a chart around `center` and render it to an SVG document.
pub fn render_svg(
    graph: &dyn FamilyGraph,
    center: PersonId,
    options: &LayoutOptions,
    svg: &SvgOptions,
) -> Result<String, miette::Report> {
    let layout = compute_layout(graph, center, *options)?;
    let mut surface = SvgSurface::new(layout.bounds, svg.clone());
    layout.paint(&mut surface);
    Ok(surface.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Person;
    use crate::types::Gender;

    #[test]
    fn unknown_centre_is_a_diagnostic() {
        let db = Database::new();
        let err = render_svg(&db, PersonId(3), &LayoutOptions::default(), &SvgOptions::default())
            .unwrap_err();
        assert!(err.to_string().contains("unknown person"));
    }

    #[test]
    fn every_kind_renders_a_lone_person() {
        let mut db = Database::new();
        let p = db.add_person(Person::new("Solo", Gender::Unknown));
        for kind in LayoutKind::all() {
            let svg = render_svg(&db, p, &LayoutOptions::new(kind), &SvgOptions::default())
                .unwrap_or_else(|e| panic!("{kind:?}: {e}"));
            assert!(svg.contains("tree-node-0"), "{kind:?}");
        }
    }
}
