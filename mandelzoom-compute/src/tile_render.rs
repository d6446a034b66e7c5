//! Escape-time tiled renderer for shallow views.
//!
//! Pixels are iterated directly in f64. A tile is drawn at a power-of-two
//! `level` stride, each computed pixel filling a `level × level` block, and
//! refined by halving the level while skipping cells already computed.

use crate::cancellation::{AtomicBoolChecker, CancelHandle, CancellationChecker};
use crate::render_params::{FractalMode, Power, RenderParams};
use crate::tiles::generate_tiles;
use crate::RenderError;
use log::{debug, error};
use mandelzoom_core::PixelRect;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Squared escape radius.
const BAILOUT_SQ: f64 = 4.0;

/// Color written for points that never escape.
pub const INTERIOR_COLOR: u32 = 0;

/// Row-major pixel buffer handed to the renderer by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width as usize + x as usize])
    }

    pub fn fill(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    fn fill_row_span(&mut self, y: u32, x_start: u32, x_end: u32, color: u32) {
        let row = y as usize * self.width as usize;
        self.pixels[row + x_start as usize..row + x_end as usize].fill(color);
    }
}

/// How a draw call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileOutcome {
    Completed,
    /// Stopped at a row boundary; rows drawn so far remain.
    Cancelled,
}

/// One step of z ← z^p + c, expanded per power.
trait IterationFormula {
    fn step(x: f64, y: f64, cx: f64, cy: f64) -> (f64, f64);
}

struct Square;
struct Cube;
struct Quartic;

impl IterationFormula for Square {
    #[inline(always)]
    fn step(x: f64, y: f64, cx: f64, cy: f64) -> (f64, f64) {
        (x * x - y * y + cx, 2.0 * x * y + cy)
    }
}

impl IterationFormula for Cube {
    #[inline(always)]
    fn step(x: f64, y: f64, cx: f64, cy: f64) -> (f64, f64) {
        let x2 = x * x;
        let y2 = y * y;
        (x2 * x - 3.0 * y2 * x + cx, 3.0 * x2 * y - y2 * y + cy)
    }
}

impl IterationFormula for Quartic {
    #[inline(always)]
    fn step(x: f64, y: f64, cx: f64, cy: f64) -> (f64, f64) {
        let x2 = x * x;
        let y2 = y * y;
        (
            x2 * x2 + y2 * y2 - 6.0 * x2 * y2 + cx,
            4.0 * x2 * x * y - 4.0 * y2 * y * x + cy,
        )
    }
}

/// Steps taken before |z|² exceeds the bailout; `max_iterations` if never.
#[inline]
fn escape_time<F: IterationFormula>(
    mut x: f64,
    mut y: f64,
    cx: f64,
    cy: f64,
    max_iterations: u32,
) -> u32 {
    let mut iteration = 0;
    while iteration < max_iterations {
        if x * x + y * y > BAILOUT_SQ {
            break;
        }
        (x, y) = F::step(x, y, cx, cy);
        iteration += 1;
    }
    iteration
}

/// Escape time of pixel (px, py) under `params`.
pub fn compute_pixel(params: &RenderParams, px: u32, py: u32) -> u32 {
    let (x0, y0) = params.pixel_to_complex(px, py);
    match params.power {
        Power::Square => pixel_escape::<Square>(params, x0, y0),
        Power::Cube => pixel_escape::<Cube>(params, x0, y0),
        Power::Quartic => pixel_escape::<Quartic>(params, x0, y0),
    }
}

#[inline]
fn pixel_escape<F: IterationFormula>(params: &RenderParams, x0: f64, y0: f64) -> u32 {
    match params.mode {
        FractalMode::Mandelbrot => escape_time::<F>(0.0, 0.0, x0, y0, params.max_iterations),
        FractalMode::Julia { seed_x, seed_y } => {
            escape_time::<F>(x0, y0, seed_x, seed_y, params.max_iterations)
        }
    }
}

/// Palette color for an escape time.
pub fn color_for(iteration: u32, max_iterations: u32, palette: &[u32]) -> u32 {
    if iteration >= max_iterations || palette.is_empty() {
        return INTERIOR_COLOR;
    }
    let len = palette.len() as u64;
    let iter_scale = if (max_iterations as u64) < len {
        len / max_iterations as u64
    } else {
        1
    };
    palette[((iteration as u64 * iter_scale) % len) as usize]
}

/// Draw `rect` at `level` stride into `surface`.
///
/// With `fill_all == false` cells whose row and column index within the
/// pass are both even are skipped; those were computed by the previous
/// pass at twice the stride. `checker` is polled before each row.
pub fn render_tile<C: CancellationChecker>(
    params: &RenderParams,
    palette: &[u32],
    surface: &mut PixelSurface,
    rect: PixelRect,
    level: u32,
    fill_all: bool,
    checker: &C,
) -> Result<TileOutcome, RenderError> {
    check_level(level)?;
    if palette.is_empty() {
        return Err(RenderError::EmptyPalette);
    }
    if surface.width < params.view_width || surface.height < params.view_height {
        return Err(RenderError::SurfaceTooSmall {
            surface_width: surface.width,
            surface_height: surface.height,
            view_width: params.view_width,
            view_height: params.view_height,
        });
    }

    let pass = RowPass {
        params,
        palette,
        rect,
        level,
        fill_all,
    };
    match params.power {
        Power::Square => pass.draw::<Square, C>(surface, checker),
        Power::Cube => pass.draw::<Cube, C>(surface, checker),
        Power::Quartic => pass.draw::<Quartic, C>(surface, checker),
    }
}

/// One level-stride pass over a tile.
struct RowPass<'a> {
    params: &'a RenderParams,
    palette: &'a [u32],
    rect: PixelRect,
    level: u32,
    fill_all: bool,
}

impl RowPass<'_> {
    fn draw<F: IterationFormula, C: CancellationChecker>(
        &self,
        surface: &mut PixelSurface,
        checker: &C,
    ) -> Result<TileOutcome, RenderError> {
        let RowPass {
            params,
            palette,
            rect,
            level,
            fill_all,
        } = *self;
        let clip = rect.clipped(params.view_width, params.view_height);
        if clip.is_empty() {
            return Ok(TileOutcome::Completed);
        }
        let (right, bottom) = (clip.right(), clip.bottom());
        let stride = level as usize;
        let x_scale = params.x_scale();
        let y_scale = params.y_scale();
        let x0s: Vec<f64> = (clip.x..right)
            .map(|px| params.bounds.xmin + px as f64 * x_scale)
            .collect();

        for (yindex, py) in (clip.y..bottom).step_by(stride).enumerate() {
            if checker.is_cancelled() {
                return Ok(TileOutcome::Cancelled);
            }
            let y0 = params.bounds.ymin + py as f64 * y_scale;
            let block_bottom = py.saturating_add(level).min(bottom);

            for (xindex, px) in (clip.x..right).step_by(stride).enumerate() {
                if !fill_all && yindex % 2 == 0 && xindex % 2 == 0 {
                    continue;
                }
                let x0 = x0s[(px - clip.x) as usize];
                let iteration = pixel_escape::<F>(params, x0, y0);
                let color = color_for(iteration, params.max_iterations, palette);

                let block_right = px.saturating_add(level).min(right);
                for iy in py..block_bottom {
                    surface.fill_row_span(iy, px, block_right, color);
                }
            }
        }
        Ok(TileOutcome::Completed)
    }
}

fn check_level(level: u32) -> Result<(), RenderError> {
    if level.is_power_of_two() {
        Ok(())
    } else {
        Err(RenderError::InvalidLevel(level))
    }
}

/// Caller-owned render state: parameters, palette, surface and cancel flag.
pub struct RenderSession {
    params: RenderParams,
    palette: Vec<u32>,
    surface: Option<PixelSurface>,
    cancel_flag: Arc<AtomicBool>,
}

impl RenderSession {
    pub fn new(params: RenderParams) -> Self {
        Self {
            params,
            palette: Vec::new(),
            surface: None,
            cancel_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn params(&self) -> &RenderParams {
        &self.params
    }

    /// Replace the parameters and clear any pending cancellation.
    pub fn set_params(&mut self, params: RenderParams) {
        self.params = params;
        self.cancel_flag.store(false, Ordering::Relaxed);
    }

    pub fn set_palette(&mut self, colors: Vec<u32>) -> Result<(), RenderError> {
        if colors.is_empty() {
            return Err(RenderError::EmptyPalette);
        }
        self.palette = colors;
        Ok(())
    }

    pub fn palette(&self) -> &[u32] {
        &self.palette
    }

    /// Hand a surface to the session, returning the previous one.
    pub fn attach_surface(&mut self, surface: PixelSurface) -> Option<PixelSurface> {
        self.surface.replace(surface)
    }

    /// Take the surface back from the session.
    pub fn detach_surface(&mut self) -> Option<PixelSurface> {
        self.surface.take()
    }

    pub fn surface(&self) -> Option<&PixelSurface> {
        self.surface.as_ref()
    }

    /// Request that the running or next draw stops at a row boundary.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Handle for cancelling from another thread.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle::new(Arc::clone(&self.cancel_flag))
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Draw one tile at `level` stride.
    pub fn draw_tile(
        &mut self,
        rect: PixelRect,
        level: u32,
        fill_all: bool,
    ) -> Result<TileOutcome, RenderError> {
        let checker = AtomicBoolChecker::new(Arc::clone(&self.cancel_flag));
        let Some(surface) = self.surface.as_mut() else {
            error!("draw requested without a pixel surface");
            return Err(RenderError::SurfaceUnavailable);
        };
        render_tile(
            &self.params,
            &self.palette,
            surface,
            rect,
            level,
            fill_all,
            &checker,
        )
    }

    /// Draw at `start_level`, then halve the level until `end_level`,
    /// each pass filling only the cells the previous one skipped.
    pub fn draw_progressive(
        &mut self,
        rect: PixelRect,
        start_level: u32,
        end_level: u32,
    ) -> Result<TileOutcome, RenderError> {
        check_level(start_level)?;
        check_level(end_level)?;
        let mut level = start_level.max(end_level);
        if self.draw_tile(rect, level, true)? == TileOutcome::Cancelled {
            return Ok(TileOutcome::Cancelled);
        }
        while level > end_level {
            level /= 2;
            if self.draw_tile(rect, level, false)? == TileOutcome::Cancelled {
                return Ok(TileOutcome::Cancelled);
            }
        }
        Ok(TileOutcome::Completed)
    }

    /// Draw the whole viewport tile by tile, center first.
    pub fn draw_all(&mut self, tile_size: u32, start_level: u32) -> Result<TileOutcome, RenderError> {
        let tiles = generate_tiles(self.params.view_width, self.params.view_height, tile_size);
        debug!(
            "drawing {} tiles from level {}",
            tiles.len(),
            start_level
        );
        for tile in tiles {
            if self.draw_progressive(tile, start_level, 1)? == TileOutcome::Cancelled {
                return Ok(TileOutcome::Cancelled);
            }
        }
        Ok(TileOutcome::Completed)
    }
}
