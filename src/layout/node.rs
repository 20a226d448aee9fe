//! Layout nodes and per-generation statistics

use crate::geometry::NodeShape;
use crate::render::PaintCommand;
use crate::types::{FamilyId, NodeClass, NodeId, PersonId};

/// Weight of a separator slot relative to a person slot
pub const SEPARATOR_WEIGHT: f64 = 0.3;

/// What a layout node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Person(PersonId),
    /// Reserved spouse slot for a family without a recorded partner
    FictiveSpouse,
    /// Spacing between sibling groups in tree layouts
    Separator,
}

/// One occurrence of a person (or a placeholder) in a rendered chart.
///
/// The same person can occur in several nodes: every path from the root
/// gets its own node, so implexes and remarriages are drawn repeatedly.
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub kind: NodeKind,
    /// Family through which this node was reached (parent family for
    /// ancestors, child or union family for descendants and spouses)
    pub family: Option<FamilyId>,
    pub generation: usize,
    /// Next-generation nodes: parents when ascending, children otherwise
    pub children: Vec<NodeId>,
    /// Spouse slots, one per partner and union (descending with spouses)
    pub spouses: Vec<NodeId>,
    /// Slot count of the whole subtree, never below 1 for persons
    pub weight: f64,
    pub sosa: Option<u64>,
    pub class: NodeClass,
    pub commands: Vec<PaintCommand>,
    /// Geometry assigned by the builder
    pub shape: Option<NodeShape>,
}

impl LayoutNode {
    pub fn new(kind: NodeKind, family: Option<FamilyId>, generation: usize) -> Self {
        let weight = match kind {
            NodeKind::Separator => SEPARATOR_WEIGHT,
            _ => 1.0,
        };
        Self {
            kind,
            family,
            generation,
            children: Vec::new(),
            spouses: Vec::new(),
            weight,
            sosa: None,
            class: NodeClass::Unknown,
            commands: Vec::new(),
            shape: None,
        }
    }

    pub fn person(&self) -> Option<PersonId> {
        match self.kind {
            NodeKind::Person(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.kind == NodeKind::Separator
    }
}

/// Population statistics of one traversal direction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationStats {
    /// Person nodes per generation
    pub population: Vec<usize>,
    /// Smallest person-node weight per generation
    pub min_weight: Vec<f64>,
}

impl GenerationStats {
    /// Number of generations actually reached (root included)
    pub fn depth(&self) -> usize {
        self.population.len()
    }

    pub(crate) fn record(&mut self, generation: usize) {
        if self.population.len() <= generation {
            self.population.resize(generation + 1, 0);
            self.min_weight.resize(generation + 1, f64::INFINITY);
        }
        self.population[generation] += 1;
    }

    pub(crate) fn record_weight(&mut self, generation: usize, weight: f64) {
        if let Some(w) = self.min_weight.get_mut(generation) {
            *w = w.min(weight);
        }
    }

    /// Minimum weight at `generation`, 1 when nothing was recorded
    pub fn min_weight_at(&self, generation: usize) -> f64 {
        self.min_weight
            .get(generation)
            .copied()
            .filter(|w| w.is_finite())
            .unwrap_or(1.0)
    }
}
