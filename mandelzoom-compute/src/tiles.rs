use mandelzoom_core::PixelRect;

/// Default tile edge in pixels.
pub const DEFAULT_TILE_SIZE: u32 = 64;

/// Generate tiles covering the viewport, nearest to the center first.
///
/// Edge tiles are cut to fit. A zero `tile_size` yields no tiles.
pub fn generate_tiles(width: u32, height: u32, tile_size: u32) -> Vec<PixelRect> {
    if tile_size == 0 {
        return Vec::new();
    }
    let mut tiles = Vec::new();

    for y_start in (0..height).step_by(tile_size as usize) {
        for x_start in (0..width).step_by(tile_size as usize) {
            let w = tile_size.min(width - x_start);
            let h = tile_size.min(height - y_start);
            tiles.push(PixelRect::new(x_start, y_start, w, h));
        }
    }

    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let dist_sq = |t: &PixelRect| {
        let (x, y) = t.center();
        (x - center.0).powi(2) + (y - center.1).powi(2)
    };
    tiles.sort_by(|a, b| dist_sq(a).total_cmp(&dist_sq(b)));

    tiles
}
