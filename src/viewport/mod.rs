//! Pan, zoom and resize with clamping.
//!
//! The viewport maps content (layout units) to screen pixels with a
//! uniform scale plus translation. After every change the transform is
//! clamped: the scale stays between the fit scale and `max_zoom` times it,
//! and on each axis content smaller than the screen is centred while larger
//! content must cover the screen edge to edge.

pub mod interact;

use glam::{DAffine2, DVec2, dvec2};

use crate::errors::ViewportError;
use crate::geometry::BoundingBox;
use crate::log;

/// Input tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Largest scale, as a multiple of the fit scale
    pub max_zoom: f64,
    /// Pointer travel in pixels before a press becomes a pan
    pub drag_threshold: f64,
    /// Scale factor per wheel unit
    pub wheel_base: f64,
    /// Scale factor of one zoom button press
    pub button_factor: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            max_zoom: 20.0,
            drag_threshold: 5.0,
            wheel_base: 1.1,
            button_factor: 1.25,
        }
    }
}

impl ViewportConfig {
    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom.max(1.0);
        self
    }

    pub fn with_drag_threshold(mut self, pixels: f64) -> Self {
        self.drag_threshold = pixels;
        self
    }
}

/// Screen corner an overlay (zoom buttons, toggles) is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAnchor {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub anchor: OverlayAnchor,
    /// Top-left corner in screen pixels
    pub position: DVec2,
}

/// What a pointer release amounted to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerRelease {
    /// Press and release without a pan; carries the content point
    Click(DVec2),
    /// The gesture panned the view
    Pan,
    /// No press was in progress
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start: DVec2,
    /// Content point under the pointer when pressed
    grip: DVec2,
    panning: bool,
}

/// Clamped content-to-screen transform
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    content: BoundingBox,
    screen: DVec2,
    transform: DAffine2,
    drag: Option<Drag>,
    overlays: Vec<Overlay>,
}

fn check_screen(screen: DVec2) -> Result<(), ViewportError> {
    if screen.is_finite() && screen.x > 0.0 && screen.y > 0.0 {
        Ok(())
    } else {
        Err(ViewportError::InvalidScreen {
            width: screen.x,
            height: screen.y,
        })
    }
}

fn check_config(config: &ViewportConfig) -> Result<(), ViewportError> {
    if config.max_zoom.is_finite() && config.max_zoom >= 1.0 {
        Ok(())
    } else {
        Err(ViewportError::InvalidZoom {
            max_zoom: config.max_zoom,
        })
    }
}

fn check_content(content: &BoundingBox) -> Result<(), ViewportError> {
    if content.is_empty() {
        Err(ViewportError::EmptyContent)
    } else {
        Ok(())
    }
}

impl Viewport {
    /// Viewport showing the whole of `content`, centred
    pub fn new(
        content: BoundingBox,
        screen: DVec2,
        config: ViewportConfig,
    ) -> Result<Self, ViewportError> {
        check_config(&config)?;
        check_content(&content)?;
        check_screen(screen)?;
        let mut viewport = Self {
            config,
            content,
            screen,
            transform: DAffine2::IDENTITY,
            drag: None,
            overlays: Vec::new(),
        };
        viewport.fit();
        Ok(viewport)
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn content(&self) -> BoundingBox {
        self.content
    }

    pub fn screen(&self) -> DVec2 {
        self.screen
    }

    pub fn transform(&self) -> DAffine2 {
        self.transform
    }

    pub fn scale(&self) -> f64 {
        self.transform.matrix2.x_axis.x
    }

    pub fn translation(&self) -> DVec2 {
        self.transform.translation
    }

    /// Scale at which the whole content fits the screen
    pub fn min_scale(&self) -> f64 {
        let size = self.content.size();
        (self.screen.x / size.x).min(self.screen.y / size.y)
    }

    pub fn max_scale(&self) -> f64 {
        self.min_scale() * self.config.max_zoom.max(1.0)
    }

    /// Current scale relative to the fit scale
    pub fn zoom_ratio(&self) -> f64 {
        self.scale() / self.min_scale()
    }

    pub fn screen_to_content(&self, p: DVec2) -> DVec2 {
        self.transform.inverse().transform_point2(p)
    }

    pub fn content_to_screen(&self, p: DVec2) -> DVec2 {
        self.transform.transform_point2(p)
    }

    /// Show the whole content, centred
    pub fn fit(&mut self) {
        let scale = self.min_scale();
        self.set(scale, self.screen / 2.0 - self.content.center() * scale);
    }

    /// Replace the content after a relayout and fit it
    pub fn set_content(&mut self, content: BoundingBox) -> Result<(), ViewportError> {
        check_content(&content)?;
        self.content = content;
        self.drag = None;
        self.fit();
        Ok(())
    }

    /// Apply `scale` and `translation`, then clamp
    fn set(&mut self, scale: f64, translation: DVec2) {
        let scale = scale.clamp(self.min_scale(), self.max_scale());
        let t = dvec2(
            clamp_axis(
                translation.x,
                scale,
                self.content.min.x,
                self.content.max.x,
                self.screen.x,
            ),
            clamp_axis(
                translation.y,
                scale,
                self.content.min.y,
                self.content.max.y,
                self.screen.y,
            ),
        );
        self.transform = DAffine2::from_translation(t) * DAffine2::from_scale(DVec2::splat(scale));
    }

    /// Re-apply the clamping rules to the current transform
    pub fn clamp(&mut self) {
        self.set(self.scale(), self.translation());
    }

    /// Scale by `factor` keeping the content point under `anchor` fixed
    pub fn zoom_at(&mut self, anchor: DVec2, factor: f64) {
        let target = (self.scale() * factor).clamp(self.min_scale(), self.max_scale());
        let grip = self.screen_to_content(anchor);
        self.set(target, anchor - grip * target);
        log::trace!(scale = self.scale(), "zoom");
    }

    /// Wheel zoom around the cursor: `wheel_base^(-delta)`
    pub fn wheel(&mut self, cursor: DVec2, delta: f64) {
        let factor = self.config.wheel_base.powf(-delta);
        self.zoom_at(cursor, factor);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_at(self.screen / 2.0, self.config.button_factor);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_at(self.screen / 2.0, 1.0 / self.config.button_factor);
    }

    pub fn pointer_down(&mut self, at: DVec2) {
        self.drag = Some(Drag {
            start: at,
            grip: self.screen_to_content(at),
            panning: false,
        });
    }

    /// Pan while a press is held; returns whether the view is panning
    pub fn pointer_move(&mut self, at: DVec2) -> bool {
        let Some(mut drag) = self.drag else {
            return false;
        };
        if !drag.panning && at.distance(drag.start) < self.config.drag_threshold {
            return false;
        }
        drag.panning = true;
        self.drag = Some(drag);
        let scale = self.scale();
        self.set(scale, at - drag.grip * scale);
        true
    }

    pub fn pointer_up(&mut self, at: DVec2) -> PointerRelease {
        match self.drag.take() {
            None => PointerRelease::Ignored,
            Some(drag) if drag.panning => PointerRelease::Pan,
            Some(_) => PointerRelease::Click(self.screen_to_content(at)),
        }
    }

    pub fn is_panning(&self) -> bool {
        self.drag.is_some_and(|d| d.panning)
    }

    /// New container size: keep the zoom ratio and the content point at the
    /// centre, move right/bottom overlays with the edges, then clamp.
    pub fn resize(&mut self, screen: DVec2) -> Result<(), ViewportError> {
        check_screen(screen)?;
        let ratio = self.zoom_ratio();
        let focus = self.screen_to_content(self.screen / 2.0);
        let delta = screen - self.screen;
        self.screen = screen;

        for overlay in &mut self.overlays {
            match overlay.anchor {
                OverlayAnchor::TopLeft => {}
                OverlayAnchor::TopRight => overlay.position.x += delta.x,
                OverlayAnchor::BottomLeft => overlay.position.y += delta.y,
                OverlayAnchor::BottomRight => overlay.position += delta,
            }
        }

        let scale = self.min_scale() * ratio;
        self.set(scale, screen / 2.0 - focus * scale);
        log::debug!(width = screen.x, height = screen.y, ratio, "viewport resized");
        Ok(())
    }

    pub fn add_overlay(&mut self, anchor: OverlayAnchor, position: DVec2) -> usize {
        self.overlays.push(Overlay { anchor, position });
        self.overlays.len() - 1
    }

    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }
}

/// Translation on one axis: centre content narrower than the screen, keep
/// wider content covering it.
fn clamp_axis(t: f64, scale: f64, lo: f64, hi: f64, screen: f64) -> f64 {
    let extent = (hi - lo) * scale;
    if extent <= screen {
        (screen - extent) / 2.0 - lo * scale
    } else {
        t.clamp(screen - hi * scale, -lo * scale)
    }
}
