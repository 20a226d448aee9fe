//! Subtree size calculation.
//!
//! Walks the family graph from a root person, creating one [`LayoutNode`]
//! per visited occurrence and computing how many display slots every
//! subtree needs. Ascending and descending graphs are measured separately.

use crate::graph::FamilyGraph;
use crate::log;
use crate::types::{FamilyId, Gender, NodeClass, NodeId, PersonId};

use super::node::{GenerationStats, LayoutNode, NodeKind};

/// Nodes of one measured graph; node 0 is the root
#[derive(Debug, Clone)]
pub struct SizedTree {
    pub nodes: Vec<LayoutNode>,
    pub stats: GenerationStats,
}

/// Root and statistics of a traversal appended to a shared node list
#[derive(Debug, Clone)]
pub struct Traversal {
    pub root: NodeId,
    pub stats: GenerationStats,
}

/// Measure the ancestors of `root` over `generations` generations
pub fn ascending(
    graph: &dyn FamilyGraph,
    root: PersonId,
    generations: usize,
    separators: bool,
) -> SizedTree {
    let mut nodes = Vec::new();
    let traversal = SizeCalculator::new(graph, &mut nodes, generations, separators).ascending(root);
    SizedTree {
        nodes,
        stats: traversal.stats,
    }
}

/// Measure the descendants of `root`, optionally with spouse slots
pub fn descending(
    graph: &dyn FamilyGraph,
    root: PersonId,
    generations: usize,
    separators: bool,
    spouses: bool,
) -> SizedTree {
    let mut nodes = Vec::new();
    let traversal = SizeCalculator::new(graph, &mut nodes, generations, separators)
        .with_spouses(spouses)
        .descending(root);
    SizedTree {
        nodes,
        stats: traversal.stats,
    }
}

pub(crate) struct SizeCalculator<'a> {
    graph: &'a dyn FamilyGraph,
    nodes: &'a mut Vec<LayoutNode>,
    max_generations: usize,
    separators: bool,
    spouses: bool,
    stats: GenerationStats,
}

impl<'a> SizeCalculator<'a> {
    pub(crate) fn new(
        graph: &'a dyn FamilyGraph,
        nodes: &'a mut Vec<LayoutNode>,
        max_generations: usize,
        separators: bool,
    ) -> Self {
        Self {
            graph,
            nodes,
            max_generations: max_generations.max(1),
            separators,
            spouses: false,
            stats: GenerationStats::default(),
        }
    }

    pub(crate) fn with_spouses(mut self, spouses: bool) -> Self {
        self.spouses = spouses;
        self
    }

    pub(crate) fn ascending(mut self, root: PersonId) -> Traversal {
        let _first = self.nodes.len();
        let root = self.visit_ancestor(root, None, 0, Some(1));
        log::debug!(
            nodes = self.nodes.len() - _first,
            depth = self.stats.depth(),
            weight = self.nodes[root.0].weight,
            "measured ascendants"
        );
        Traversal {
            root,
            stats: self.stats,
        }
    }

    pub(crate) fn descending(mut self, root: PersonId) -> Traversal {
        let _first = self.nodes.len();
        let root = self.visit_descendant(root, None, 0);
        log::debug!(
            nodes = self.nodes.len() - _first,
            depth = self.stats.depth(),
            weight = self.nodes[root.0].weight,
            spouses = self.spouses,
            "measured descendants"
        );
        Traversal {
            root,
            stats: self.stats,
        }
    }

    fn visit_ancestor(
        &mut self,
        person: PersonId,
        family: Option<FamilyId>,
        generation: usize,
        sosa: Option<u64>,
    ) -> NodeId {
        let id = self.push_person(person, family, generation);
        self.nodes[id.0].sosa = sosa;

        let mut parents = Vec::new();
        if generation + 1 < self.max_generations {
            let graph = self.graph;
            for (fam_pos, &fam) in graph.parent_families(person).iter().enumerate() {
                for (pos, &parent) in graph.spouses_in(fam).iter().enumerate() {
                    let Some(p) = graph.person(parent) else {
                        log::warn!(%parent, %fam, "skipping unknown parent");
                        continue;
                    };
                    let parent_sosa = if fam_pos == 0 {
                        sosa.and_then(|n| parent_sosa(n, p.gender, pos))
                    } else {
                        None
                    };
                    let node = self.visit_ancestor(parent, Some(fam), generation + 1, parent_sosa);
                    parents.push(node);
                }
            }
        }
        self.finish(id, parents);
        id
    }

    fn visit_descendant(
        &mut self,
        person: PersonId,
        family: Option<FamilyId>,
        generation: usize,
    ) -> NodeId {
        let id = self.push_person(person, family, generation);
        let deeper = generation + 1 < self.max_generations;
        let graph = self.graph;

        if !self.spouses {
            let mut children = Vec::new();
            if deeper {
                for &fam in graph.spouse_families(person) {
                    children.extend(self.visit_children(fam, generation + 1));
                }
            }
            self.finish(id, children);
            return id;
        }

        let mut slots = Vec::new();
        for &fam in graph.spouse_families(person) {
            let partners: Vec<PersonId> = graph
                .partners_in(fam, person)
                .into_iter()
                .filter(|&s| {
                    let known = graph.contains(s);
                    if !known {
                        log::warn!(spouse = %s, %fam, "skipping unknown spouse");
                    }
                    known
                })
                .collect();

            let family_slots: Vec<NodeId> = if partners.is_empty() {
                vec![self.push(NodeKind::FictiveSpouse, Some(fam), generation)]
            } else {
                partners
                    .iter()
                    .map(|&s| self.push_person(s, Some(fam), generation))
                    .collect()
            };

            let children = if deeper {
                self.visit_children(fam, generation + 1)
            } else {
                Vec::new()
            };

            // Children hang under the first slot; further co-spouses of the
            // same union keep a single slot each.
            for (i, &slot) in family_slots.iter().enumerate() {
                let kids = if i == 0 { children.clone() } else { Vec::new() };
                self.finish(slot, kids);
            }
            slots.extend(family_slots);
        }

        let weight = slots
            .iter()
            .map(|s| self.nodes[s.0].weight)
            .sum::<f64>()
            .max(1.0);
        let node = &mut self.nodes[id.0];
        node.spouses = slots;
        node.weight = weight;
        self.stats.record_weight(generation, weight);
        id
    }

    fn visit_children(&mut self, family: FamilyId, generation: usize) -> Vec<NodeId> {
        let graph = self.graph;
        let mut out = Vec::new();
        for &child in graph.children_in(family) {
            if !graph.contains(child) {
                log::warn!(%child, %family, "skipping unknown child");
                continue;
            }
            out.push(self.visit_descendant(child, Some(family), generation));
        }
        out
    }

    fn push(&mut self, kind: NodeKind, family: Option<FamilyId>, generation: usize) -> NodeId {
        let mut node = LayoutNode::new(kind, family, generation);
        if kind == NodeKind::FictiveSpouse {
            node.class = NodeClass::Fictive;
        }
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    fn push_person(
        &mut self,
        person: PersonId,
        family: Option<FamilyId>,
        generation: usize,
    ) -> NodeId {
        let id = self.push(NodeKind::Person(person), family, generation);
        if let Some(p) = self.graph.person(person) {
            self.nodes[id.0].class = p.gender.into();
        }
        self.stats.record(generation);
        id
    }

    /// Attach `children` to `id`, inserting separators where needed, and
    /// settle the node weight.
    fn finish(&mut self, id: NodeId, children: Vec<NodeId>) {
        let generation = self.nodes[id.0].generation;
        let separate = self.separators && children.iter().any(|&c| self.has_next_generation(c));
        let children = if separate {
            let mut spaced = Vec::with_capacity(children.len() * 2 + 1);
            for child in children {
                spaced.push(self.push(NodeKind::Separator, None, generation + 1));
                spaced.push(child);
            }
            spaced.push(self.push(NodeKind::Separator, None, generation + 1));
            spaced
        } else {
            children
        };

        let weight = children
            .iter()
            .map(|c| self.nodes[c.0].weight)
            .sum::<f64>()
            .max(1.0);
        let node = &mut self.nodes[id.0];
        node.children = children;
        node.weight = weight;
        if matches!(node.kind, NodeKind::Person(_)) {
            self.stats.record_weight(generation, weight);
        }
    }

    /// Whether a person node has at least one person in the next generation
    fn has_next_generation(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        let real = |ids: &[NodeId]| ids.iter().any(|c| !self.nodes[c.0].is_separator());
        real(&node.children)
            || node
                .spouses
                .iter()
                .any(|s| real(&self.nodes[s.0].children))
    }
}

/// SOSA number of a parent of the person numbered `child`
fn parent_sosa(child: u64, gender: Gender, position: usize) -> Option<u64> {
    let base = child.checked_mul(2)?;
    match (gender, position) {
        (Gender::Male, _) => Some(base),
        (Gender::Female, _) => base.checked_add(1),
        (Gender::Unknown, 0) => Some(base),
        (Gender::Unknown, 1) => base.checked_add(1),
        _ => None,
    }
}
