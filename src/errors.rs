//! Error types with diagnostics using miette
//!
//! Input graphs come from a trusted export, so these only cover what the
//! caller controls: option values, the centre person and viewport sizes.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Layout Errors
// ============================================================================

/// Errors raised while preparing a layout session
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("unknown person: {id}")]
    #[diagnostic(
        code(pedigree_svg::layout::unknown_person),
        help("the centre person must exist in the person table ({count} persons)")
    )]
    UnknownPerson { id: usize, count: usize },

    #[error("unknown layout index: {index}")]
    #[diagnostic(
        code(pedigree_svg::layout::unknown_layout),
        help("layout indices range from 0 to {max}")
    )]
    UnknownLayout { index: usize, max: usize },

    #[error("invalid {direction} generation count: {value}")]
    #[diagnostic(
        code(pedigree_svg::layout::invalid_generations),
        help("generation counts include the centre person and range from 1 to {max}")
    )]
    InvalidGenerations {
        direction: &'static str,
        value: usize,
        max: usize,
    },
}

// ============================================================================
// Viewport Errors
// ============================================================================

/// Errors raised by the viewport controller
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ViewportError {
    #[error("content bounding box is empty")]
    #[diagnostic(code(pedigree_svg::viewport::empty_content))]
    EmptyContent,

    #[error("invalid screen size: {width}x{height}")]
    #[diagnostic(
        code(pedigree_svg::viewport::invalid_screen),
        help("the container must have a positive, finite width and height")
    )]
    InvalidScreen { width: f64, height: f64 },

    #[error("invalid maximum zoom: {max_zoom}")]
    #[diagnostic(
        code(pedigree_svg::viewport::invalid_zoom),
        help("max_zoom is a multiple of the fit scale and must be finite and at least 1")
    )]
    InvalidZoom { max_zoom: f64 },
}

// ============================================================================
// View Errors
// ============================================================================

/// Errors raised by an interactive [`TreeView`](crate::view::TreeView)
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Viewport(#[from] ViewportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_errors_keep_inner_codes() {
        let err: ViewError = LayoutError::UnknownLayout { index: 30, max: 21 }.into();
        assert_eq!(err.to_string(), "unknown layout index: 30");
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("pedigree_svg::layout::unknown_layout"));
    }
}
