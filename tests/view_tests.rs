use glam::{DVec2, dvec2};
use pedigree_svg::geometry::{BoundingBox, NodeShape, polar};
use pedigree_svg::graph::{Database, Event, Family, Person};
use pedigree_svg::layout::LayoutOptions;
use pedigree_svg::render::{BatchOutcome, CommandLog};
use pedigree_svg::types::{Gender, NodeId, PersonId};
use pedigree_svg::view::TreeView;
use pedigree_svg::viewport::interact::{NodeAction, Popup};
use pedigree_svg::viewport::{Viewport, ViewportConfig};

struct Sample {
    db: Database,
    root: PersonId,
    father: PersonId,
    mother: PersonId,
}

fn sample() -> Sample {
    let mut db = Database::new();
    let father = db.add_person(
        Person::new("Pierre Martin", Gender::Male)
            .with_birth(Event::year(1820))
            .with_death(Event::new(Some(1890), Some("Lyon"))),
    );
    let mother = db.add_person(Person::new("Anne Roux", Gender::Female));
    let root = db.add_person(
        Person::new("Jean Martin", Gender::Male).with_birth(Event::new(Some(1850), Some("Paris"))),
    );
    let gf = db.add_person(Person::new("Louis Martin", Gender::Male));
    db.add_family_with(Family {
        spouses: vec![father, mother],
        children: vec![root],
        marriage: Event::new(Some(1845), Some("Lyon")),
    });
    db.add_family(&[gf], &[father]);
    Sample {
        db,
        root,
        father,
        mother,
    }
}

const SCREEN: DVec2 = DVec2::new(800.0, 600.0);

fn view(s: &Sample) -> TreeView<'_> {
    TreeView::new(
        &s.db,
        s.root,
        LayoutOptions::default(),
        SCREEN,
        ViewportConfig::default(),
    )
    .unwrap()
}

/// Screen position of the middle of `person`'s node
fn screen_point(view: &TreeView<'_>, person: PersonId) -> DVec2 {
    let node = view
        .layout()
        .nodes()
        .iter()
        .find(|n| n.person() == Some(person))
        .unwrap();
    let content = match node.shape.unwrap() {
        NodeShape::Disc { center, .. } => center,
        NodeShape::Sector(s) => polar(s.mid_radius(), s.angles.mid()),
        NodeShape::Rect(r) => r.center(),
    };
    view.viewport().content_to_screen(content)
}

#[test]
fn zoom_out_stops_at_the_fit_scale() {
    let content = BoundingBox::from_xywh(0.0, 0.0, 200.0, 100.0);
    let mut vp = Viewport::new(content, dvec2(400.0, 400.0), ViewportConfig::default()).unwrap();
    assert_eq!(vp.scale(), 2.0);
    // Centred vertically: 200px of content on a 400px screen
    assert_eq!(vp.translation(), dvec2(0.0, 100.0));

    vp.zoom_out();
    assert_eq!(vp.scale(), 2.0);

    vp.wheel(dvec2(100.0, 200.0), -1.0);
    assert!((vp.scale() - 2.2).abs() < 1e-9);
    // Wider than the screen now: still covering it horizontally
    let left = vp.content_to_screen(content.min).x;
    let right = vp.content_to_screen(content.max).x;
    assert!(left <= 1e-9 && right >= 400.0 - 1e-9);
}

#[test]
fn clicking_an_ancestor_recenters_the_chart() {
    let s = sample();
    let mut view = view(&s);
    let before = view.render_generation();
    let at = screen_point(&view, s.father);

    view.pointer_down(at);
    let action = view.pointer_up(at).unwrap();
    assert_eq!(action, NodeAction::Recenter(s.father));
    assert_eq!(view.center(), s.father);
    assert_eq!(view.render_generation(), before + 1);

    // The new centre opens its detail page instead
    let at = screen_point(&view, s.father);
    view.pointer_down(at);
    assert_eq!(view.pointer_up(at).unwrap(), NodeAction::OpenDetails(s.father));
    assert_eq!(view.render_generation(), before + 1);
}

#[test]
fn drags_pan_instead_of_clicking() {
    let s = sample();
    let mut view = view(&s);
    let at = screen_point(&view, s.father);
    view.pointer_down(at);
    assert!(view.pointer_move(at + dvec2(40.0, 0.0)));
    assert!(view.hover(at).is_none());
    assert_eq!(view.pointer_up(at).unwrap(), NodeAction::Nothing);
    assert_eq!(view.center(), s.root);
    assert!(view.hover(at).is_some());
}

#[test]
fn popup_describes_the_hovered_ancestor() {
    let s = sample();
    let view = view(&s);
    let popup = view.hover(screen_point(&view, s.father)).unwrap();
    assert_eq!(popup.person, s.father);
    insta::assert_snapshot!(popup.to_string(), @r"
    Pierre Martin
    Sosa 2
    b. 1820
    m. 1845, Lyon
    d. 1890, Lyon
    ");

    let root = Popup::for_node(&s.db, view.layout(), NodeId(0)).unwrap();
    assert_eq!(root.marriage, None);
    assert_eq!(root.to_string(), "Jean Martin\nSosa 1\nb. 1850, Paris");
}

#[test]
fn context_menu_lists_the_centre_relatives() {
    let s = sample();
    let view = view(&s);
    let menu = view.context_menu(screen_point(&view, s.root)).unwrap();
    let parents: Vec<_> = menu.parents.iter().map(|e| e.person).collect();
    assert_eq!(parents, vec![s.father, s.mother]);
    assert!(menu.children.is_empty());
}

#[test]
fn pumping_paints_every_drawn_node() {
    let s = sample();
    let mut view = view(&s).with_batch_size(1);
    let mut log = CommandLog::new();
    assert_eq!(view.pump(&mut log), BatchOutcome::Pending { painted: 1 });

    // A rebuild restarts from the first node of the new layout
    view.set_spouses(true).unwrap();
    log = CommandLog::new();
    while let BatchOutcome::Pending { .. } = view.pump(&mut log) {}
    let drawn: Vec<NodeId> = view
        .layout()
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, n)| !n.commands.is_empty())
        .map(|(i, _)| NodeId(i))
        .collect();
    assert_eq!(log.nodes(), drawn);
    assert_eq!(view.pump(&mut log), BatchOutcome::Finished);
}

#[test]
fn rejected_options_keep_the_previous_chart() {
    let s = sample();
    let mut view = view(&s);
    let generation = view.render_generation();
    assert!(view.set_generations(13, 2).is_err());
    assert!(view.set_kind_index(22).is_err());
    assert_eq!(view.options().ascendant_generations, 5);
    assert_eq!(view.render_generation(), generation);

    view.set_kind_index(9).unwrap();
    assert!(view.options().kind.spouses());
}

#[test]
fn resizing_keeps_the_zoom_ratio() {
    let s = sample();
    let mut view = view(&s);
    view.zoom_in();
    let ratio = view.viewport().zoom_ratio();
    view.resize(dvec2(1000.0, 500.0)).unwrap();
    assert!((view.viewport().zoom_ratio() - ratio).abs() < 1e-9);
    assert!(view.resize(dvec2(0.0, 500.0)).is_err());
}
