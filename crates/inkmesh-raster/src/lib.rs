#![warn(missing_docs)]

//! Pixel operations for the inkmesh engine.
//!
//! Works in place on a caller-owned RGBA buffer: a 4-connected flood fill
//! with exact color matching, and three grayscale gradient shaders driven
//! by distance to the drawn edges.
//!
//! Buffers are never resized and every write is bounds-checked. Only one
//! operation may touch a buffer at a time; the `&mut` borrow enforces it.

mod buffer;
mod fill;
mod gradient;

pub use buffer::PixelBuffer;
pub use fill::flood_fill;
pub use gradient::{shade_edges, shade_global, shade_shapes, GradientRamp, ShadeSummary};

use thiserror::Error;

/// Errors from pixel operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RasterError {
    /// Byte length does not match `width * height * 4`.
    #[error("buffer holds {actual} bytes, {width}x{height} RGBA needs {expected}")]
    BufferSize {
        /// Buffer width in pixels.
        width: usize,
        /// Buffer height in pixels.
        height: usize,
        /// Required byte length, `usize::MAX` when it overflows.
        expected: usize,
        /// Provided byte length.
        actual: usize,
    },

    /// Nothing to shade.
    #[error("drawing is empty")]
    EmptyDrawing,

    /// Ramp endpoints must lie in [0, 1].
    #[error("invalid gradient ramp: min={min}, max={max}")]
    InvalidRamp {
        /// Ramp start.
        min: f64,
        /// Ramp end.
        max: f64,
    },

    /// Edge threshold must lie in (0, 1].
    #[error("invalid edge threshold: {0}")]
    InvalidThreshold(f64),
}

/// Result type for pixel operations.
pub type Result<T> = std::result::Result<T, RasterError>;

#[cfg(test)]
pub(crate) mod fixtures {
    use inkmesh_graph::Stroke;
    use inkmesh_math::{Point2, Rgb};

    pub fn square(x0: f64, y0: f64, size: f64) -> Stroke {
        Stroke::new(
            vec![
                Point2::new(x0, y0),
                Point2::new(x0 + size, y0),
                Point2::new(x0 + size, y0 + size),
                Point2::new(x0, y0 + size),
                Point2::new(x0, y0),
            ],
            1.0,
            Rgb::BLACK,
        )
        .unwrap()
    }

    pub fn white(width: usize, height: usize) -> Vec<u8> {
        vec![255; width * height * 4]
    }
}
