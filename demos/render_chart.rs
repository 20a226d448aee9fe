//! Render a small family as an SVG chart.
//!
//! ```sh
//! cargo run --example render_chart --features tracing -- 17 > chart.svg
//! RUST_LOG=pedigree_svg=debug cargo run --example render_chart --features tracing
//! ```
//!
//! The optional argument is the graph-type index (0 to 21).

use miette::IntoDiagnostic;
use pedigree_svg::graph::{Database, Event, Family, Person};
use pedigree_svg::layout::{LayoutKind, LayoutOptions};
use pedigree_svg::render::SvgOptions;
use pedigree_svg::types::{Gender, PersonId};
use tracing_subscriber::EnvFilter;

fn family() -> (Database, PersonId) {
    let mut db = Database::new();
    let mut add = |name: &str, gender, born: i32| {
        db.add_person(Person::new(name, gender).with_birth(Event::year(born)))
    };
    let gf = add("Louis Martin", Gender::Male, 1790);
    let gm = add("Rose Petit", Gender::Female, 1795);
    let father = add("Pierre Martin", Gender::Male, 1820);
    let mother = add("Anne Roux", Gender::Female, 1824);
    let root = add("Jean Martin", Gender::Male, 1850);
    let sister = add("Marie Martin", Gender::Female, 1853);
    let wife = add("Claire Dubois", Gender::Female, 1855);
    let son = add("Luc Martin", Gender::Male, 1880);
    let daughter = add("Julie Martin", Gender::Female, 1882);
    let grandson = add("Paul Martin", Gender::Male, 1910);

    db.add_family(&[gf, gm], &[father]);
    db.add_family_with(Family {
        spouses: vec![father, mother],
        children: vec![root, sister],
        marriage: Event::new(Some(1845), Some("Lyon")),
    });
    db.add_family(&[root, wife], &[son, daughter]);
    db.add_family(&[son], &[grandson]);
    (db, root)
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let index = match std::env::args().nth(1) {
        Some(arg) => arg.parse().into_diagnostic()?,
        None => LayoutKind::default().index(),
    };
    let options = LayoutOptions::new(LayoutKind::from_index(index)?);
    let (db, root) = family();
    let svg = pedigree_svg::render_svg(
        &db,
        root,
        &options,
        &SvgOptions::default().with_detail_href("/person/{id}"),
    )?;
    println!("{svg}");
    Ok(())
}
