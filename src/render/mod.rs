//! Painting layouts
//!
//! This module is organized into submodules:
//! - `commands`: typed paint commands and their dispatch trait
//! - `deferred`: time-sliced replay of commands with stale-job guards
//! - `svg`: SVG document output

pub mod commands;
pub mod deferred;
pub mod svg;

pub use commands::*;
pub use deferred::{BatchOutcome, DeferredRenderer, RenderJob};
pub use svg::{SvgOptions, SvgSurface};

use crate::layout::LayoutNode;
use crate::types::{NodeClass, NodeId, PersonId};

/// Drawing target for paint commands
pub trait Surface {
    fn begin_node(&mut self, node: NodeId, person: Option<PersonId>, class: NodeClass);
    fn end_node(&mut self);
    fn circle(&mut self, cmd: &CircleCmd);
    fn sector(&mut self, cmd: &SectorCmd);
    fn rect(&mut self, cmd: &RectCmd);
    fn line(&mut self, cmd: &LineCmd);
    fn text(&mut self, cmd: &TextCmd);
}

/// Replay one node's commands, bracketed by `begin_node`/`end_node`.
/// Nodes without commands (separators, undrawn centre copies) are skipped.
pub fn paint_node(id: NodeId, node: &LayoutNode, surface: &mut dyn Surface) {
    if node.commands.is_empty() {
        return;
    }
    surface.begin_node(id, node.person(), node.class);
    for cmd in &node.commands {
        cmd.paint(surface);
    }
    surface.end_node();
}

/// What a [`CommandLog`] saw, in order
#[derive(Debug, Clone, PartialEq)]
pub enum LoggedPaint {
    Begin(NodeId),
    End,
    Command(PaintCommand),
}

/// Surface that records everything painted on it
#[derive(Debug, Default)]
pub struct CommandLog {
    pub entries: Vec<LoggedPaint>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes begun on this surface, in paint order
    pub fn nodes(&self) -> Vec<NodeId> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                LoggedPaint::Begin(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl Surface for CommandLog {
    fn begin_node(&mut self, node: NodeId, _person: Option<PersonId>, _class: NodeClass) {
        self.entries.push(LoggedPaint::Begin(node));
    }

    fn end_node(&mut self) {
        self.entries.push(LoggedPaint::End);
    }

    fn circle(&mut self, cmd: &CircleCmd) {
        self.entries.push(LoggedPaint::Command(cmd.clone().into()));
    }

    fn sector(&mut self, cmd: &SectorCmd) {
        self.entries.push(LoggedPaint::Command(cmd.clone().into()));
    }

    fn rect(&mut self, cmd: &RectCmd) {
        self.entries.push(LoggedPaint::Command(cmd.clone().into()));
    }

    fn line(&mut self, cmd: &LineCmd) {
        self.entries.push(LoggedPaint::Command(cmd.clone().into()));
    }

    fn text(&mut self, cmd: &TextCmd) {
        self.entries.push(LoggedPaint::Command(cmd.clone().into()));
    }
}
