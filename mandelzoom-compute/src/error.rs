//! Tiled renderer error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("no pixel surface attached")]
    SurfaceUnavailable,

    #[error("pixel surface {surface_width}x{surface_height} is smaller than viewport {view_width}x{view_height}")]
    SurfaceTooSmall {
        surface_width: u32,
        surface_height: u32,
        view_width: u32,
        view_height: u32,
    },

    #[error("color palette is empty")]
    EmptyPalette,

    #[error("unsupported power {0}, expected 2, 3 or 4")]
    UnsupportedPower(u32),

    #[error("level must be a power of two, got {0}")]
    InvalidLevel(u32),
}
