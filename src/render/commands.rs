//! Typed paint commands.
//!
//! Builders record these per layout node; a [`Surface`] consumes them later,
//! possibly in batches, through the [`Paint`] trait.

use enum_dispatch::enum_dispatch;
use glam::DVec2;

use crate::geometry::{Rect, Sector};
use crate::text::FittedText;
use crate::types::NodeClass;

use super::Surface;

/// Replays one command onto a surface
#[enum_dispatch]
pub trait Paint {
    fn paint(&self, surface: &mut dyn Surface);
}

/// One deferred drawing primitive
#[enum_dispatch(Paint)]
#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    Circle(CircleCmd),
    Sector(SectorCmd),
    Rect(RectCmd),
    Line(LineCmd),
    Text(TextCmd),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CircleCmd {
    pub center: DVec2,
    pub radius: f64,
    pub class: NodeClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorCmd {
    pub sector: Sector,
    pub class: NodeClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    pub rect: Rect,
    pub class: NodeClass,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub from: DVec2,
    pub to: DVec2,
}

/// Fitted label centred on `center`, rotated by `rotation` degrees
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub center: DVec2,
    pub rotation: f64,
    pub text: FittedText,
}

impl Paint for CircleCmd {
    fn paint(&self, surface: &mut dyn Surface) {
        surface.circle(self);
    }
}

impl Paint for SectorCmd {
    fn paint(&self, surface: &mut dyn Surface) {
        surface.sector(self);
    }
}

impl Paint for RectCmd {
    fn paint(&self, surface: &mut dyn Surface) {
        surface.rect(self);
    }
}

impl Paint for LineCmd {
    fn paint(&self, surface: &mut dyn Surface) {
        surface.line(self);
    }
}

impl Paint for TextCmd {
    fn paint(&self, surface: &mut dyn Surface) {
        surface.text(self);
    }
}
