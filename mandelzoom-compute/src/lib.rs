pub mod cancellation;
pub mod error;
pub mod perturbation;
pub mod render_params;
pub mod session;
pub mod tile_render;
pub mod tiles;

pub use cancellation::{AtomicBoolChecker, CancelHandle, CancellationChecker, NeverCancel};
pub use error::RenderError;
pub use perturbation::{
    EncodedSeries, OrbitPass, OrbitTermination, PerturbationSeries, ReferenceOrbit, ORBIT_SENTINEL,
};
pub use render_params::{Bounds, FractalMode, Power, RenderParams};
pub use session::{DeepZoomSession, GeneratedOrbit};
pub use tile_render::{
    color_for, compute_pixel, render_tile, PixelSurface, RenderSession, TileOutcome,
    INTERIOR_COLOR,
};
pub use tiles::{generate_tiles, DEFAULT_TILE_SIZE};

// Re-export core types for convenience
pub use mandelzoom_core::*;
