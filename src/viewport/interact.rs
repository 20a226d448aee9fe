//! Hit-testing and the overlays shown for a node: hover popup, context menu
//! and click actions.

use std::fmt;

use glam::DVec2;

use crate::graph::FamilyGraph;
use crate::layout::Layout;
use crate::types::{NodeId, PersonId};

pub use crate::render::svg::NODE_ID_PREFIX;

/// Node index from an element id such as `tree-node-12`
pub fn parse_node_id(id: &str) -> Option<NodeId> {
    id.strip_prefix(NODE_ID_PREFIX)?.parse().ok().map(NodeId)
}

/// First node id found walking from the event target up through its
/// ancestors (`chain` yields element ids, target first).
pub fn hit_test_chain<'a>(chain: impl IntoIterator<Item = &'a str>) -> Option<NodeId> {
    chain.into_iter().find_map(parse_node_id)
}

/// Topmost node containing a point in content coordinates
pub fn hit_test_point(layout: &Layout, content_point: DVec2) -> Option<NodeId> {
    layout.node_at(content_point)
}

/// What clicking a node does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeAction {
    /// Rebuild the chart around this person
    Recenter(PersonId),
    /// Open the person's detail page
    OpenDetails(PersonId),
    /// Placeholder or separator
    Nothing,
}

pub fn click_action(layout: &Layout, node: NodeId) -> NodeAction {
    match layout.node(node).and_then(|n| n.person()) {
        Some(p) if p == layout.center => NodeAction::OpenDetails(p),
        Some(p) => NodeAction::Recenter(p),
        None => NodeAction::Nothing,
    }
}

/// Hover summary of one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    pub person: PersonId,
    pub name: String,
    pub sosa: Option<u64>,
    pub birth: Option<String>,
    /// Marriage of the family the node was reached through, when the person
    /// is one of its spouses
    pub marriage: Option<String>,
    pub death: Option<String>,
}

impl Popup {
    pub fn for_node(graph: &dyn FamilyGraph, layout: &Layout, node: NodeId) -> Option<Popup> {
        let n = layout.node(node)?;
        let id = n.person()?;
        let person = graph.person(id)?;
        let described = |e: &crate::graph::Event| (!e.is_empty()).then(|| e.to_string());
        let marriage = n
            .family
            .and_then(|f| graph.family(f))
            .filter(|f| f.spouses.contains(&id))
            .and_then(|f| described(&f.marriage));
        Some(Popup {
            person: id,
            name: person.name.clone(),
            sosa: n.sosa,
            birth: described(&person.birth),
            marriage,
            death: described(&person.death),
        })
    }
}

impl fmt::Display for Popup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(sosa) = self.sosa {
            write!(f, "\nSosa {sosa}")?;
        }
        for (prefix, event) in [
            ("b.", &self.birth),
            ("m.", &self.marriage),
            ("d.", &self.death),
        ] {
            if let Some(event) = event {
                write!(f, "\n{prefix} {event}")?;
            }
        }
        Ok(())
    }
}

/// One relative in the context menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub person: PersonId,
    pub label: String,
}

/// Relatives of the clicked person, in graph order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextMenu {
    pub person: Option<PersonId>,
    pub parents: Vec<MenuEntry>,
    pub spouses: Vec<MenuEntry>,
    pub siblings: Vec<MenuEntry>,
    pub children: Vec<MenuEntry>,
}

impl ContextMenu {
    pub fn for_person(graph: &dyn FamilyGraph, person: PersonId) -> ContextMenu {
        let entries = |ids: Vec<PersonId>| -> Vec<MenuEntry> {
            ids.into_iter()
                .filter_map(|p| {
                    let label = graph.person(p)?.name.clone();
                    Some(MenuEntry { person: p, label })
                })
                .collect()
        };
        ContextMenu {
            person: Some(person),
            parents: entries(graph.parents(person)),
            spouses: entries(graph.spouses(person)),
            siblings: entries(graph.siblings(person)),
            children: entries(graph.children(person)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
            && self.spouses.is_empty()
            && self.siblings.is_empty()
            && self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Database, Event, Person};
    use crate::layout::{LayoutOptions, compute_layout};
    use crate::types::Gender;

    fn family() -> (Database, PersonId, PersonId, PersonId) {
        let mut db = Database::new();
        let father =
            db.add_person(Person::new("Pierre Martin", Gender::Male).with_birth(Event::year(1820)));
        let mother = db.add_person(Person::new("Anne Roux", Gender::Female));
        let child = db.add_person(
            Person::new("Jean Martin", Gender::Male)
                .with_birth(Event::new(Some(1850), Some("Paris")))
                .with_death(Event::year(1920)),
        );
        let sister = db.add_person(Person::new("Marie Martin", Gender::Female));
        db.add_family(&[father, mother], &[child, sister]);
        (db, father, mother, child)
    }

    #[test]
    fn ids_are_found_up_the_chain() {
        assert_eq!(parse_node_id("tree-node-12"), Some(NodeId(12)));
        assert_eq!(parse_node_id("tree-node-"), None);
        assert_eq!(parse_node_id("menu"), None);
        let chain = ["label-3", "", "tree-node-4", "tree-node-1"];
        assert_eq!(hit_test_chain(chain), Some(NodeId(4)));
        assert_eq!(hit_test_chain(["svg-root"]), None);
    }

    #[test]
    fn clicks_recenter_or_open_details() {
        let (db, father, _, child) = family();
        let layout = compute_layout(&db, child, LayoutOptions::default()).unwrap();
        let root = layout.center_node().unwrap();
        assert_eq!(click_action(&layout, root), NodeAction::OpenDetails(child));
        let father_node = layout
            .nodes()
            .iter()
            .position(|n| n.person() == Some(father))
            .map(NodeId)
            .unwrap();
        assert_eq!(click_action(&layout, father_node), NodeAction::Recenter(father));
        assert_eq!(click_action(&layout, NodeId(999)), NodeAction::Nothing);
    }

    #[test]
    fn popup_lists_events() {
        let (db, _, _, child) = family();
        let layout = compute_layout(&db, child, LayoutOptions::default()).unwrap();
        let popup = Popup::for_node(&db, &layout, NodeId(0)).unwrap();
        assert_eq!(popup.to_string(), "Jean Martin\nSosa 1\nb. 1850, Paris\nd. 1920");
    }

    #[test]
    fn context_menu_groups_relatives() {
        let (db, father, mother, child) = family();
        let menu = ContextMenu::for_person(&db, child);
        let names = |entries: &[MenuEntry]| {
            entries.iter().map(|e| e.label.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&menu.parents), vec!["Pierre Martin", "Anne Roux"]);
        assert_eq!(names(&menu.siblings), vec!["Marie Martin"]);
        assert!(menu.spouses.is_empty() && menu.children.is_empty());

        let menu = ContextMenu::for_person(&db, father);
        assert_eq!(menu.spouses[0].person, mother);
        assert_eq!(menu.children.len(), 2);
        assert!(!menu.is_empty());
    }
}
