//! Chart layout
//!
//! This module is organized into submodules:
//! - `defaults`: Default sizes and settings
//! - `node`: Layout nodes and generation statistics
//! - `sizes`: Subtree size calculation
//! - `radii`: Ring radius allocation for circular charts
//! - `circular`: Wheel and hemisphere builders
//! - `tree`: Horizontal and vertical tree builders
//!
//! A [`LayoutSession`] measures the graph once, then runs the `init`/`build`
//! pair registered for its [`LayoutKind`]. Every option change starts a new
//! session; nothing is carried over.

pub mod circular;
pub mod defaults;
pub mod node;
pub mod radii;
pub mod sizes;
pub mod tree;

use std::rc::Rc;

use glam::DVec2;

pub use node::{GenerationStats, LayoutNode, NodeKind, SEPARATOR_WEIGHT};
pub use sizes::{SizedTree, Traversal};

use crate::errors::LayoutError;
use crate::geometry::{BoundingBox, NodeShape};
use crate::graph::FamilyGraph;
use crate::log;
use crate::render::{
    self, CircleCmd, LineCmd, PaintCommand, RectCmd, SectorCmd, Surface, TextCmd,
};
use crate::text::{self, FittedText};
use crate::types::{NodeId, PersonId};

use sizes::SizeCalculator;

// ============================================================================
// Layout kinds
// ============================================================================

/// Overall chart shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartShape {
    Wheel,
    Hemisphere,
    TreeHorizontal,
    TreeVertical,
}

impl ChartShape {
    const ALL: [ChartShape; 4] = [
        ChartShape::Wheel,
        ChartShape::Hemisphere,
        ChartShape::TreeHorizontal,
        ChartShape::TreeVertical,
    ];

    const COMBINED: [ChartShape; 3] = [
        ChartShape::Wheel,
        ChartShape::TreeHorizontal,
        ChartShape::TreeVertical,
    ];

    pub fn is_circular(self) -> bool {
        matches!(self, ChartShape::Wheel | ChartShape::Hemisphere)
    }
}

/// How ancestors share their child's extent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Distribution {
    /// Every parent gets the same share, rings ignore population
    Equal,
    /// Shares follow subtree weights, rings follow population
    Proportional,
}

/// One of the 22 chart variants, addressable by graph-type index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    Ascending {
        shape: ChartShape,
        distribution: Distribution,
    },
    Descending {
        shape: ChartShape,
        spouses: bool,
    },
    /// Ancestors and descendants around one centre. Hemisphere is not a
    /// combined shape and is drawn as a wheel.
    Combined {
        shape: ChartShape,
        spouses: bool,
    },
}

/// `init`/`build` pair of a layout variant
#[derive(Clone, Copy)]
pub struct LayoutFns {
    /// Computes the content bounding box and any geometry `build` needs
    pub init: fn(&mut LayoutSession<'_>) -> BoundingBox,
    /// Assigns shapes and records paint commands on every node
    pub build: fn(&mut LayoutSession<'_>),
}

impl LayoutKind {
    pub const COUNT: usize = 22;

    pub fn from_index(index: usize) -> Result<Self, LayoutError> {
        let kind = match index {
            0..8 => LayoutKind::Ascending {
                shape: ChartShape::ALL[index / 2],
                distribution: if index % 2 == 0 {
                    Distribution::Equal
                } else {
                    Distribution::Proportional
                },
            },
            8..16 => LayoutKind::Descending {
                shape: ChartShape::ALL[(index - 8) / 2],
                spouses: index % 2 == 1,
            },
            16..22 => LayoutKind::Combined {
                shape: ChartShape::COMBINED[(index - 16) / 2],
                spouses: index % 2 == 1,
            },
            _ => {
                return Err(LayoutError::UnknownLayout {
                    index,
                    max: Self::COUNT - 1,
                });
            }
        };
        Ok(kind)
    }

    pub fn index(self) -> usize {
        let shape_pos = |shape: ChartShape, table: &[ChartShape]| {
            table.iter().position(|&s| s == shape).unwrap_or(0)
        };
        match self {
            LayoutKind::Ascending {
                shape,
                distribution,
            } => {
                let proportional = distribution == Distribution::Proportional;
                shape_pos(shape, &ChartShape::ALL) * 2 + proportional as usize
            }
            LayoutKind::Descending { shape, spouses } => {
                8 + shape_pos(shape, &ChartShape::ALL) * 2 + spouses as usize
            }
            LayoutKind::Combined { shape, spouses } => {
                16 + shape_pos(shape, &ChartShape::COMBINED) * 2 + spouses as usize
            }
        }
    }

    pub fn all() -> impl Iterator<Item = LayoutKind> {
        (0..Self::COUNT).filter_map(|i| Self::from_index(i).ok())
    }

    pub fn shape(self) -> ChartShape {
        match self {
            LayoutKind::Ascending { shape, .. } | LayoutKind::Descending { shape, .. } => shape,
            LayoutKind::Combined { shape, .. } => match shape {
                ChartShape::Hemisphere => ChartShape::Wheel,
                other => other,
            },
        }
    }

    pub fn has_ascendants(self) -> bool {
        !matches!(self, LayoutKind::Descending { .. })
    }

    pub fn has_descendants(self) -> bool {
        !matches!(self, LayoutKind::Ascending { .. })
    }

    pub fn spouses(self) -> bool {
        match self {
            LayoutKind::Ascending { .. } => false,
            LayoutKind::Descending { spouses, .. } | LayoutKind::Combined { spouses, .. } => spouses,
        }
    }

    /// Same chart with or without spouses; ascending charts never show them
    pub fn with_spouses(self, spouses: bool) -> Self {
        match self {
            LayoutKind::Descending { shape, .. } => LayoutKind::Descending { shape, spouses },
            LayoutKind::Combined { shape, .. } => LayoutKind::Combined { shape, spouses },
            other => other,
        }
    }

    pub fn distribution(self) -> Distribution {
        match self {
            LayoutKind::Ascending { distribution, .. } => distribution,
            _ => Distribution::Proportional,
        }
    }

    /// Separator slots are only used by non-circular charts
    pub fn uses_separators(self) -> bool {
        !self.shape().is_circular()
    }

    /// Registry of layout functions
    pub fn functions(self) -> LayoutFns {
        let circular = self.shape().is_circular();
        match (self, circular) {
            (LayoutKind::Ascending { .. }, true) => LayoutFns {
                init: circular::init_ascending,
                build: circular::build_ascending,
            },
            (LayoutKind::Ascending { .. }, false) => LayoutFns {
                init: tree::init_ascending,
                build: tree::build_ascending,
            },
            (LayoutKind::Descending { .. }, true) => LayoutFns {
                init: circular::init_descending,
                build: circular::build_descending,
            },
            (LayoutKind::Descending { .. }, false) => LayoutFns {
                init: tree::init_descending,
                build: tree::build_descending,
            },
            (LayoutKind::Combined { .. }, true) => LayoutFns {
                init: circular::init_combined,
                build: circular::build_combined,
            },
            (LayoutKind::Combined { .. }, false) => LayoutFns {
                init: tree::init_combined,
                build: tree::build_combined,
            },
        }
    }
}

impl Default for LayoutKind {
    fn default() -> Self {
        LayoutKind::Ascending {
            shape: ChartShape::Wheel,
            distribution: Distribution::Proportional,
        }
    }
}

// ============================================================================
// Options
// ============================================================================

/// Options that select and size a chart; changing any of them means a new
/// layout session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    pub kind: LayoutKind,
    /// Ascendant generations, the centre person included
    pub ascendant_generations: usize,
    /// Descendant generations, the centre person included
    pub descendant_generations: usize,
    /// Chart fills the whole window instead of its page container
    pub expanded: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            kind: LayoutKind::default(),
            ascendant_generations: defaults::DEFAULT_ASCENDANT_GENERATIONS,
            descendant_generations: defaults::DEFAULT_DESCENDANT_GENERATIONS,
            expanded: false,
        }
    }
}

impl LayoutOptions {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: LayoutKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_generations(mut self, ascendants: usize, descendants: usize) -> Self {
        self.ascendant_generations = ascendants;
        self.descendant_generations = descendants;
        self
    }

    pub fn with_spouses(mut self, spouses: bool) -> Self {
        self.kind = self.kind.with_spouses(spouses);
        self
    }

    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = expanded;
        self
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let check = |direction: &'static str, value: usize| {
            if (1..=defaults::MAX_GENERATIONS).contains(&value) {
                Ok(())
            } else {
                Err(LayoutError::InvalidGenerations {
                    direction,
                    value,
                    max: defaults::MAX_GENERATIONS,
                })
            }
        };
        check("ascendant", self.ascendant_generations)?;
        check("descendant", self.descendant_generations)
    }
}

// ============================================================================
// Session
// ============================================================================

/// State shared by the builders of one layout run.
///
/// Ascendant and descendant nodes live in one list: ascendants first (root
/// at index 0), descendants appended after them with their own root.
pub struct LayoutSession<'g> {
    graph: &'g dyn FamilyGraph,
    options: LayoutOptions,
    center: PersonId,
    pub(crate) nodes: Vec<LayoutNode>,
    ascendants: Option<Traversal>,
    descendants: Option<Traversal>,
    pub(crate) circle: Option<circular::CircleGeometry>,
    pub(crate) tree: Option<tree::TreeGeometry>,
}

impl<'g> LayoutSession<'g> {
    /// Validate options and measure the graph around `center`
    pub fn new(
        graph: &'g dyn FamilyGraph,
        center: PersonId,
        options: LayoutOptions,
    ) -> Result<Self, LayoutError> {
        options.validate()?;
        if !graph.contains(center) {
            return Err(LayoutError::UnknownPerson {
                id: center.0,
                count: graph.person_count(),
            });
        }

        let kind = options.kind;
        let separators = kind.uses_separators();
        let mut nodes = Vec::new();
        let ascendants = kind.has_ascendants().then(|| {
            SizeCalculator::new(graph, &mut nodes, options.ascendant_generations, separators)
                .ascending(center)
        });
        let descendants = kind.has_descendants().then(|| {
            SizeCalculator::new(graph, &mut nodes, options.descendant_generations, separators)
                .with_spouses(kind.spouses())
                .descending(center)
        });

        log::debug!(
            kind = kind.index(),
            %center,
            nodes = nodes.len(),
            "layout session measured"
        );

        Ok(Self {
            graph,
            options,
            center,
            nodes,
            ascendants,
            descendants,
            circle: None,
            tree: None,
        })
    }

    pub fn graph(&self) -> &'g dyn FamilyGraph {
        self.graph
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn kind(&self) -> LayoutKind {
        self.options.kind
    }

    pub fn center(&self) -> PersonId {
        self.center
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn ascendants(&self) -> Option<&Traversal> {
        self.ascendants.as_ref()
    }

    pub fn descendants(&self) -> Option<&Traversal> {
        self.descendants.as_ref()
    }

    /// Run the registered `init` then `build` and freeze the result
    pub fn run(mut self) -> Layout {
        let fns = self.kind().functions();
        let bounds = (fns.init)(&mut self);
        (fns.build)(&mut self);
        log::debug!(
            commands = self.nodes.iter().map(|n| n.commands.len()).sum::<usize>(),
            width = bounds.width(),
            height = bounds.height(),
            "layout built"
        );
        Layout {
            kind: self.kind(),
            center: self.center,
            bounds,
            ascendant_root: self.ascendants.as_ref().map(|t| t.root),
            descendant_root: self.descendants.as_ref().map(|t| t.root),
            ascendant_stats: self.ascendants.map(|t| t.stats),
            descendant_stats: self.descendants.map(|t| t.stats),
            nodes: self.nodes.into(),
        }
    }

    // ------------------------------------------------------------------------
    // Paint helpers shared by the builders
    // ------------------------------------------------------------------------

    pub(crate) fn node(&self, id: NodeId) -> &LayoutNode {
        &self.nodes[id.0]
    }

    pub(crate) fn assign_shape(&mut self, id: NodeId, shape: NodeShape) {
        let node = &mut self.nodes[id.0];
        let class = node.class;
        let cmd: PaintCommand = match shape {
            NodeShape::Disc { center, radius } => CircleCmd {
                center,
                radius,
                class,
            }
            .into(),
            NodeShape::Sector(sector) => SectorCmd { sector, class }.into(),
            NodeShape::Rect(rect) => RectCmd { rect, class }.into(),
        };
        node.commands.push(cmd);
        node.shape = Some(shape);
    }

    pub(crate) fn add_line(&mut self, id: NodeId, from: DVec2, to: DVec2) {
        if from.distance_squared(to) > 0.0 {
            self.nodes[id.0].commands.push(LineCmd { from, to }.into());
        }
    }

    /// Fit the node's label into `width` × `height`
    pub(crate) fn fit_label(&self, id: NodeId, width: f64, height: f64) -> Option<FittedText> {
        let person = self.node(id).person()?;
        let p = self.graph.person(person)?;
        let years = p.years().unwrap_or_default();
        let candidates = [
            vec![p.name.as_str(), years.as_str()],
            vec![p.short_name.as_str(), years.as_str()],
            vec![p.short_name.as_str()],
        ];
        text::fit_label(&candidates, width, height, defaults::LABEL_FONTS)
    }

    pub(crate) fn add_label(&mut self, id: NodeId, center: DVec2, rotation: f64, text: FittedText) {
        self.nodes[id.0].commands.push(
            TextCmd {
                center,
                rotation,
                text,
            }
            .into(),
        );
    }
}

// ============================================================================
// Result
// ============================================================================

/// Finished chart: nodes with their shapes and paint commands
#[derive(Debug, Clone)]
pub struct Layout {
    pub kind: LayoutKind,
    pub center: PersonId,
    /// Content bounding box computed by the variant's `init`
    pub bounds: BoundingBox,
    pub ascendant_root: Option<NodeId>,
    pub descendant_root: Option<NodeId>,
    pub ascendant_stats: Option<GenerationStats>,
    pub descendant_stats: Option<GenerationStats>,
    nodes: Rc<[LayoutNode]>,
}

impl Layout {
    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    /// Shared handle on the node list, for deferred rendering
    pub fn shared_nodes(&self) -> Rc<[LayoutNode]> {
        Rc::clone(&self.nodes)
    }

    pub fn node(&self, id: NodeId) -> Option<&LayoutNode> {
        self.nodes.get(id.0)
    }

    /// Every paint command in paint order
    pub fn commands(&self) -> impl Iterator<Item = &PaintCommand> {
        self.nodes.iter().flat_map(|n| n.commands.iter())
    }

    /// Topmost node whose shape contains `point` (content coordinates)
    pub fn node_at(&self, point: DVec2) -> Option<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .rev()
            .find(|(_, n)| n.shape.is_some_and(|s| s.contains(point)))
            .map(|(i, _)| NodeId(i))
    }

    /// Replay every node's commands onto `surface` in one go
    pub fn paint(&self, surface: &mut dyn Surface) {
        for (i, node) in self.nodes.iter().enumerate() {
            render::paint_node(NodeId(i), node, surface);
        }
    }

    /// Node drawn for the centre person
    pub fn center_node(&self) -> Option<NodeId> {
        self.ascendant_root.or(self.descendant_root)
    }
}

/// Measure, initialise and build a chart in one go
pub fn compute_layout(
    graph: &dyn FamilyGraph,
    center: PersonId,
    options: LayoutOptions,
) -> Result<Layout, LayoutError> {
    Ok(LayoutSession::new(graph, center, options)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_round_trip_through_kinds() {
        for i in 0..LayoutKind::COUNT {
            let kind = LayoutKind::from_index(i).unwrap();
            assert_eq!(kind.index(), i, "{kind:?}");
        }
        assert_eq!(LayoutKind::all().count(), 22);
    }

    #[test]
    fn index_out_of_range_is_rejected() {
        let err = LayoutKind::from_index(22).unwrap_err();
        assert_eq!(err, LayoutError::UnknownLayout { index: 22, max: 21 });
    }

    #[test]
    fn separator_allow_list_is_non_circular() {
        let with: Vec<_> = LayoutKind::all()
            .filter(|k| k.uses_separators())
            .map(|k| k.index())
            .collect();
        assert_eq!(with, vec![4, 5, 6, 7, 12, 13, 14, 15, 18, 19, 20, 21]);
    }

    #[test]
    fn spouse_flag_only_touches_descendants() {
        let asc = LayoutKind::from_index(0).unwrap();
        assert_eq!(asc.with_spouses(true), asc);
        let dsc = LayoutKind::from_index(8).unwrap();
        assert_eq!(dsc.with_spouses(true).index(), 9);
        let combined = LayoutKind::from_index(21).unwrap();
        assert_eq!(combined.with_spouses(false).index(), 20);
    }

    #[test]
    fn options_validate_generation_counts() {
        assert!(LayoutOptions::default().validate().is_ok());
        let err = LayoutOptions::default()
            .with_generations(0, 3)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidGenerations {
                direction: "ascendant",
                value: 0,
                ..
            }
        ));
        assert!(
            LayoutOptions::default()
                .with_generations(3, defaults::MAX_GENERATIONS + 1)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn combined_hemisphere_is_drawn_as_wheel() {
        let kind = LayoutKind::Combined {
            shape: ChartShape::Hemisphere,
            spouses: false,
        };
        assert_eq!(kind.shape(), ChartShape::Wheel);
        assert!(!kind.uses_separators());
    }
}
