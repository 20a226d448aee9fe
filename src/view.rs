//! Interactive chart session.
//!
//! [`TreeView`] owns everything one displayed chart needs: the options, the
//! current layout, the viewport and the render job. Any option change or
//! recentering rebuilds the layout from scratch and restarts painting; the
//! previous job turns stale and stops at its next batch.

use glam::DVec2;

use crate::errors::ViewError;
use crate::graph::FamilyGraph;
use crate::layout::{Layout, LayoutKind, LayoutOptions, compute_layout};
use crate::log;
use crate::render::{BatchOutcome, DeferredRenderer, RenderJob, Surface};
use crate::types::{NodeId, PersonId};
use crate::viewport::interact::{self, ContextMenu, NodeAction, Popup};
use crate::viewport::{PointerRelease, Viewport, ViewportConfig};

pub struct TreeView<'g> {
    graph: &'g dyn FamilyGraph,
    options: LayoutOptions,
    layout: Layout,
    viewport: Viewport,
    renderer: DeferredRenderer,
    job: Option<RenderJob>,
}

impl<'g> TreeView<'g> {
    pub fn new(
        graph: &'g dyn FamilyGraph,
        center: PersonId,
        options: LayoutOptions,
        screen: DVec2,
        config: ViewportConfig,
    ) -> Result<Self, ViewError> {
        let layout = compute_layout(graph, center, options)?;
        let viewport = Viewport::new(layout.bounds, screen, config)?;
        let renderer = DeferredRenderer::default();
        let job = Some(renderer.start(layout.shared_nodes()));
        Ok(Self {
            graph,
            options,
            layout,
            viewport,
            renderer,
            job,
        })
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.renderer = DeferredRenderer::new(batch_size);
        self.job = Some(self.renderer.start(self.layout.shared_nodes()));
        self
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn center(&self) -> PersonId {
        self.layout.center
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    /// Generation token of the current render job
    pub fn render_generation(&self) -> u64 {
        self.renderer.generation()
    }

    /// Rebuild the layout for `center` and `options`; on failure the view
    /// keeps its previous state.
    fn rebuild(&mut self, center: PersonId, options: LayoutOptions) -> Result<(), ViewError> {
        let layout = compute_layout(self.graph, center, options)?;
        self.viewport.set_content(layout.bounds)?;
        self.options = options;
        self.layout = layout;
        self.job = Some(self.renderer.start(self.layout.shared_nodes()));
        log::debug!(
            %center,
            kind = options.kind.index(),
            generation = self.renderer.generation(),
            "view rebuilt"
        );
        Ok(())
    }

    pub fn relayout(&mut self) -> Result<(), ViewError> {
        self.rebuild(self.center(), self.options)
    }

    pub fn set_kind(&mut self, kind: LayoutKind) -> Result<(), ViewError> {
        self.rebuild(self.center(), self.options.with_kind(kind))
    }

    /// Select a layout by graph-type index
    pub fn set_kind_index(&mut self, index: usize) -> Result<(), ViewError> {
        self.set_kind(LayoutKind::from_index(index)?)
    }

    pub fn set_generations(
        &mut self,
        ascendants: usize,
        descendants: usize,
    ) -> Result<(), ViewError> {
        self.rebuild(
            self.center(),
            self.options.with_generations(ascendants, descendants),
        )
    }

    pub fn set_spouses(&mut self, spouses: bool) -> Result<(), ViewError> {
        self.rebuild(self.center(), self.options.with_spouses(spouses))
    }

    /// Toggle full-window display; the container size changes with it
    pub fn set_expanded(&mut self, expanded: bool, screen: DVec2) -> Result<(), ViewError> {
        self.viewport.resize(screen)?;
        self.rebuild(self.center(), self.options.with_expanded(expanded))
    }

    pub fn recenter(&mut self, person: PersonId) -> Result<(), ViewError> {
        self.rebuild(person, self.options)
    }

    /// Paint the next batch of the current job
    pub fn pump(&mut self, surface: &mut dyn Surface) -> BatchOutcome {
        match self.job.as_mut() {
            Some(job) => {
                let outcome = job.run_batch(surface);
                if !matches!(outcome, BatchOutcome::Pending { .. }) {
                    self.job = None;
                }
                outcome
            }
            None => BatchOutcome::Finished,
        }
    }

    /// Stop painting the current layout
    pub fn cancel_render(&mut self) {
        self.renderer.cancel();
        self.job = None;
    }

    fn node_at_screen(&self, at: DVec2) -> Option<NodeId> {
        interact::hit_test_point(&self.layout, self.viewport.screen_to_content(at))
    }

    pub fn pointer_down(&mut self, at: DVec2) {
        self.viewport.pointer_down(at);
    }

    pub fn pointer_move(&mut self, at: DVec2) -> bool {
        self.viewport.pointer_move(at)
    }

    /// Finish a press: pans do nothing more, clicks act on the node under
    /// the pointer. Recentering rebuilds the chart.
    pub fn pointer_up(&mut self, at: DVec2) -> Result<NodeAction, ViewError> {
        let PointerRelease::Click(point) = self.viewport.pointer_up(at) else {
            return Ok(NodeAction::Nothing);
        };
        let Some(node) = interact::hit_test_point(&self.layout, point) else {
            return Ok(NodeAction::Nothing);
        };
        self.activate(node)
    }

    /// Act on a node found through an element id chain or a direct click
    pub fn activate(&mut self, node: NodeId) -> Result<NodeAction, ViewError> {
        let action = interact::click_action(&self.layout, node);
        if let NodeAction::Recenter(person) = action {
            self.recenter(person)?;
        }
        Ok(action)
    }

    /// Popup for the node under the pointer; nothing while panning
    pub fn hover(&self, at: DVec2) -> Option<Popup> {
        if self.viewport.is_panning() {
            return None;
        }
        let node = self.node_at_screen(at)?;
        Popup::for_node(self.graph, &self.layout, node)
    }

    pub fn context_menu(&self, at: DVec2) -> Option<ContextMenu> {
        let node = self.node_at_screen(at)?;
        let person = self.layout.node(node)?.person()?;
        Some(ContextMenu::for_person(self.graph, person))
    }

    pub fn wheel(&mut self, at: DVec2, delta: f64) {
        self.viewport.wheel(at, delta);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn resize(&mut self, screen: DVec2) -> Result<(), ViewError> {
        Ok(self.viewport.resize(screen)?)
    }
}
