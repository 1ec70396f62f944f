//! Borrowed view over an externally owned RGBA buffer.

use inkmesh_math::Rgb;

use crate::{RasterError, Result};

/// A `width` x `height` grid of RGBA bytes, row-major, owned by the caller.
#[derive(Debug)]
pub struct PixelBuffer<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> PixelBuffer<'a> {
    /// Wrap raw RGBA bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::BufferSize`] if the length is not `width * height * 4`.
    pub fn new(data: &'a mut [u8], width: usize, height: usize) -> Result<Self> {
        let expected = width.checked_mul(height).and_then(|n| n.checked_mul(4));
        if expected != Some(data.len()) {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected: expected.unwrap_or(usize::MAX),
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Byte offset of pixel `(x, y)`, `None` outside the grid.
    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some((y as usize * self.width + x as usize) * 4)
    }

    /// RGB of pixel `(x, y)`, `None` outside the grid.
    pub fn rgb(&self, x: i64, y: i64) -> Option<Rgb> {
        let i = self.offset(x, y)?;
        Some(Rgb::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// RGBA of pixel `(x, y)`, `None` outside the grid.
    pub fn rgba(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        let i = self.offset(x, y)?;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[i..i + 4]);
        Some(px)
    }

    /// Overwrite pixel `(x, y)`. Returns false (and writes nothing) outside the grid.
    pub fn set_rgba(&mut self, x: i64, y: i64, px: [u8; 4]) -> bool {
        match self.offset(x, y) {
            Some(i) => {
                self.data[i..i + 4].copy_from_slice(&px);
                true
            }
            None => false,
        }
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..]
    }
}
