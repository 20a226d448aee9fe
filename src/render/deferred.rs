//! Time-sliced painting.
//!
//! A [`RenderJob`] replays a layout's commands a few nodes at a time so the
//! host can interleave painting with input handling. Every job carries the
//! generation token that was current when it started; once the renderer is
//! restarted or cancelled the job is stale and never touches the surface
//! again.

use std::cell::Cell;
use std::rc::Rc;

use super::{Surface, paint_node};
use crate::layout::LayoutNode;
use crate::log;
use crate::types::NodeId;

/// Result of one [`RenderJob::run_batch`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// More nodes remain; `painted` nodes were visited by this batch
    Pending { painted: usize },
    Finished,
    /// A newer job started, or the renderer was cancelled
    Cancelled,
}

/// Hands out render jobs and invalidates older ones
#[derive(Debug)]
pub struct DeferredRenderer {
    generation: Rc<Cell<u64>>,
    batch_size: usize,
}

impl Default for DeferredRenderer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BATCH_SIZE)
    }
}

impl DeferredRenderer {
    pub const DEFAULT_BATCH_SIZE: usize = 64;

    pub fn new(batch_size: usize) -> Self {
        Self {
            generation: Rc::new(Cell::new(0)),
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Start painting `nodes`; any job started earlier becomes stale
    pub fn start(&self, nodes: Rc<[LayoutNode]>) -> RenderJob {
        let token = self.bump();
        log::debug!(token, nodes = nodes.len(), "render job started");
        RenderJob {
            nodes,
            next: 0,
            token,
            generation: Rc::clone(&self.generation),
            batch_size: self.batch_size,
        }
    }

    /// Invalidate every outstanding job
    pub fn cancel(&self) {
        self.bump();
        log::debug!(token = self.generation(), "render jobs cancelled");
    }

    fn bump(&self) -> u64 {
        let token = self.generation.get() + 1;
        self.generation.set(token);
        token
    }
}

/// Painting of one layout, resumable batch by batch
#[derive(Debug)]
pub struct RenderJob {
    nodes: Rc<[LayoutNode]>,
    next: usize,
    token: u64,
    generation: Rc<Cell<u64>>,
    batch_size: usize,
}

impl RenderJob {
    pub fn is_stale(&self) -> bool {
        self.generation.get() != self.token
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.nodes.len()
    }

    /// Nodes visited so far and total node count
    pub fn progress(&self) -> (usize, usize) {
        (self.next, self.nodes.len())
    }

    /// Paint at most one batch of nodes
    pub fn run_batch(&mut self, surface: &mut dyn Surface) -> BatchOutcome {
        if self.is_stale() {
            log::trace!(token = self.token, "stale render job dropped");
            return BatchOutcome::Cancelled;
        }
        if self.is_finished() {
            return BatchOutcome::Finished;
        }
        let end = (self.next + self.batch_size).min(self.nodes.len());
        for i in self.next..end {
            paint_node(NodeId(i), &self.nodes[i], surface);
        }
        let painted = end - self.next;
        self.next = end;
        if self.is_finished() {
            BatchOutcome::Finished
        } else {
            BatchOutcome::Pending { painted }
        }
    }

    /// Paint every remaining batch
    pub fn run_to_end(&mut self, surface: &mut dyn Surface) -> BatchOutcome {
        loop {
            match self.run_batch(surface) {
                BatchOutcome::Pending { .. } => continue,
                outcome => return outcome,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::NodeKind;
    use crate::render::{CircleCmd, CommandLog};
    use crate::types::{NodeClass, PersonId};
    use glam::DVec2;

    fn nodes(n: usize) -> Rc<[LayoutNode]> {
        (0..n)
            .map(|i| {
                let mut node = LayoutNode::new(NodeKind::Person(PersonId(i)), None, 0);
                node.commands.push(
                    CircleCmd {
                        center: DVec2::ZERO,
                        radius: 1.0,
                        class: NodeClass::Unknown,
                    }
                    .into(),
                );
                node
            })
            .collect()
    }

    #[test]
    fn batches_cover_every_node_once() {
        let renderer = DeferredRenderer::new(2);
        let mut job = renderer.start(nodes(5));
        let mut log = CommandLog::new();
        assert_eq!(job.run_batch(&mut log), BatchOutcome::Pending { painted: 2 });
        assert_eq!(job.run_batch(&mut log), BatchOutcome::Pending { painted: 2 });
        assert_eq!(job.run_batch(&mut log), BatchOutcome::Finished);
        assert_eq!(job.run_batch(&mut log), BatchOutcome::Finished);
        assert_eq!(log.nodes(), (0..5).map(NodeId).collect::<Vec<_>>());
    }

    #[test]
    fn restart_makes_older_jobs_stale() {
        let renderer = DeferredRenderer::new(1);
        let mut old = renderer.start(nodes(3));
        let mut log = CommandLog::new();
        assert_eq!(old.run_batch(&mut log), BatchOutcome::Pending { painted: 1 });

        let mut new = renderer.start(nodes(2));
        assert!(old.is_stale());
        assert_eq!(old.run_batch(&mut log), BatchOutcome::Cancelled);
        assert_eq!(log.nodes().len(), 1);

        assert_eq!(new.run_to_end(&mut log), BatchOutcome::Finished);
        assert_eq!(log.nodes().len(), 3);
    }

    #[test]
    fn cancel_stops_the_current_job() {
        let renderer = DeferredRenderer::default();
        let mut job = renderer.start(nodes(3));
        renderer.cancel();
        let mut log = CommandLog::new();
        assert_eq!(job.run_to_end(&mut log), BatchOutcome::Cancelled);
        assert!(log.entries.is_empty());
        assert_eq!(job.progress(), (0, 3));
    }
}
