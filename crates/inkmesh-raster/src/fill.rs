//! Stack-based 4-connected flood fill.

use inkmesh_math::{Point2, Rgb};
use tracing::debug;

use crate::PixelBuffer;

/// Replace the region of `seed`'s exact RGB with `color`.
///
/// Only pixels whose RGB matches the seed exactly are filled, so
/// anti-aliased stroke edges stay as the region's border. Filled pixels get
/// alpha 255. Uses an explicit stack, never recursion.
///
/// Returns the number of pixels written; 0 means the buffer is unchanged
/// (seed outside the buffer, or seed already has the fill color).
pub fn flood_fill(buffer: &mut PixelBuffer<'_>, seed: Point2, color: Rgb) -> usize {
    let (sx, sy) = (seed.x.round() as i64, seed.y.round() as i64);
    let Some(target) = buffer.rgb(sx, sy) else {
        return 0;
    };
    if target == color {
        return 0;
    }

    let fill = color.to_rgba();
    let mut filled = 0usize;
    let mut stack = vec![(sx, sy)];

    while let Some((x, y)) = stack.pop() {
        if buffer.rgb(x, y) != Some(target) {
            continue;
        }
        buffer.set_rgba(x, y, fill);
        filled += 1;
        stack.extend([(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]);
    }

    debug!(filled, color = %color, "flood fill");
    filled
}
