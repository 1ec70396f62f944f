#![warn(missing_docs)]

//! inkmesh: freehand drawings to shaded regions and solid models.
//!
//! The [`Engine`] analyzes a drawing (an ordered list of polyline strokes):
//! it reports which shapes are closed, bridges accidental gaps in outlines,
//! fills and shades enclosed regions of a caller-owned RGBA buffer, and
//! extrudes the largest closed outline into a `.glb` solid.
//!
//! Every call rebuilds what it needs from the strokes it is given; the
//! engine itself only holds configuration.
//!
//! # Example
//!
//! ```
//! use inkmesh::{Engine, Point2, Rgb, Stroke};
//!
//! let engine = Engine::default();
//! let square = Stroke::new(
//!     vec![
//!         Point2::new(0.0, 0.0),
//!         Point2::new(40.0, 0.0),
//!         Point2::new(40.0, 40.0),
//!         Point2::new(0.0, 40.0),
//!         Point2::new(0.0, 0.0),
//!     ],
//!     3.0,
//!     Rgb::BLACK,
//! )
//! .unwrap();
//!
//! let report = engine.analyze(&[square.clone()]).unwrap();
//! assert!(report.all_closed());
//!
//! let glb = engine.export_glb(&[square]).unwrap();
//! assert_eq!(&glb[0..4], b"glTF");
//! ```

mod config;
mod drawing;
mod error;

pub use config::{EngineConfig, GradientConfig};
pub use drawing::{drawing_to_json, parse_drawing};
pub use error::{InkmeshError, Result};

pub use inkmesh_graph::{Brush, ShapeReport, ShapeStatus, Stroke};
pub use inkmesh_math::{Point2, Rgb, Tolerance};
pub use inkmesh_mesh::{
    Decimator, EdgeCollapseDecimator, ExportSettings, Material, Thickness, TriangleMesh,
};
pub use inkmesh_raster::{GradientRamp, PixelBuffer, ShadeSummary};

use std::borrow::Cow;

use tracing::{info, instrument, warn};

/// Log a failed operation before handing the error back.
fn logged<T>(result: Result<T>) -> Result<T> {
    if let Err(err) = &result {
        if err.is_validation() {
            warn!(%err, "nothing to do");
        } else {
            warn!(%err, "operation failed");
        }
    }
    result
}

fn pixel_buffer(pixels: &mut [u8], width: usize, height: usize) -> Result<PixelBuffer<'_>> {
    logged(PixelBuffer::new(pixels, width, height).map_err(Into::into))
}

/// Drawing analysis and export with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine.
    ///
    /// # Errors
    ///
    /// [`InkmeshError::Config`] if the configuration is out of range.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create an engine from a TOML configuration document.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(Self {
            config: EngineConfig::parse(toml_str)?,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Classify the drawing's shapes as open or closed.
    #[instrument(skip_all, fields(strokes = strokes.len()))]
    pub fn analyze(&self, strokes: &[Stroke]) -> Result<ShapeReport> {
        let report = logged(
            inkmesh_graph::classify(strokes, self.config.tolerance()).map_err(Into::into),
        )?;
        if report.all_closed() {
            info!(closed = report.closed_count(), "all shapes are closed");
        } else {
            info!(
                open = report.open_count(),
                closed = report.closed_count(),
                "some shapes are open"
            );
        }
        Ok(report)
    }

    /// Close free-standing open outlines with bridge strokes painted in the
    /// configured brush.
    ///
    /// `Cow::Borrowed(strokes)` means nothing needed repair.
    #[instrument(skip_all, fields(strokes = strokes.len()))]
    pub fn repair<'a>(&self, strokes: &'a [Stroke]) -> Cow<'a, [Stroke]> {
        inkmesh_graph::repair(strokes, &self.config.brush, self.config.tolerance())
    }

    /// Mean of every sample in the drawing, `None` when it is empty.
    pub fn centroid(&self, strokes: &[Stroke]) -> Option<Point2> {
        inkmesh_graph::drawing_centroid(strokes)
    }

    /// Centroid of each closed shape; empty when there are none.
    pub fn shape_centroids(&self, strokes: &[Stroke]) -> Vec<Point2> {
        inkmesh_graph::shape_centroids(strokes, self.config.tolerance())
    }

    /// Flood fill the region around `seed` with the configured fill color.
    ///
    /// Returns the number of pixels changed; 0 leaves the buffer untouched.
    #[instrument(skip(self, pixels))]
    pub fn flood_fill(
        &self,
        pixels: &mut [u8],
        width: usize,
        height: usize,
        seed: Point2,
    ) -> Result<usize> {
        let mut buffer = pixel_buffer(pixels, width, height)?;
        let filled = inkmesh_raster::flood_fill(&mut buffer, seed, self.config.fill_color);
        if filled == 0 {
            info!("fill left the buffer unchanged");
        }
        Ok(filled)
    }

    /// Shade the whole drawing as one region around its centroid.
    #[instrument(skip(self, pixels, strokes), fields(strokes = strokes.len()))]
    pub fn shade_global(
        &self,
        pixels: &mut [u8],
        width: usize,
        height: usize,
        strokes: &[Stroke],
    ) -> Result<ShadeSummary> {
        let mut buffer = pixel_buffer(pixels, width, height)?;
        let ramp = self.config.gradient.ramp();
        logged(inkmesh_raster::shade_global(&mut buffer, strokes, &ramp).map_err(Into::into))
    }

    /// Shade each closed shape around its own centroid.
    #[instrument(skip(self, pixels, strokes), fields(strokes = strokes.len()))]
    pub fn shade_shapes(
        &self,
        pixels: &mut [u8],
        width: usize,
        height: usize,
        strokes: &[Stroke],
    ) -> Result<ShadeSummary> {
        let mut buffer = pixel_buffer(pixels, width, height)?;
        let ramp = self.config.gradient.ramp();
        logged(
            inkmesh_raster::shade_shapes(&mut buffer, strokes, &ramp, self.config.tolerance())
                .map_err(Into::into),
        )
    }

    /// Shade each closed shape relative to its widest interior point.
    #[instrument(skip(self, pixels, strokes), fields(strokes = strokes.len()))]
    pub fn shade_edges(
        &self,
        pixels: &mut [u8],
        width: usize,
        height: usize,
        strokes: &[Stroke],
    ) -> Result<ShadeSummary> {
        let mut buffer = pixel_buffer(pixels, width, height)?;
        let gradient = &self.config.gradient;
        logged(
            inkmesh_raster::shade_edges(
                &mut buffer,
                strokes,
                &gradient.ramp(),
                gradient.threshold,
                self.config.tolerance(),
            )
            .map_err(Into::into),
        )
    }

    /// Extrude the largest closed outline and encode it as `.glb` bytes.
    #[instrument(skip_all, fields(strokes = strokes.len()))]
    pub fn export_glb(&self, strokes: &[Stroke]) -> Result<Vec<u8>> {
        self.export_glb_with(strokes, &EdgeCollapseDecimator)
    }

    /// Like [`Engine::export_glb`], decimating with `decimator` when the
    /// configuration enables decimation.
    pub fn export_glb_with(
        &self,
        strokes: &[Stroke],
        decimator: &dyn Decimator,
    ) -> Result<Vec<u8>> {
        let bytes = logged(
            inkmesh_mesh::export_glb_with(
                strokes,
                self.config.tolerance(),
                &self.config.export,
                decimator,
            )
            .map_err(Into::into),
        )?;
        info!(bytes = bytes.len(), "exported solid");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Stroke {
        Stroke::new(
            vec![
                Point2::new(x0, y0),
                Point2::new(x0 + size, y0),
                Point2::new(x0 + size, y0 + size),
                Point2::new(x0, y0 + size),
                Point2::new(x0, y0),
            ],
            2.0,
            Rgb::BLACK,
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = EngineConfig {
            merge_tolerance: -1.0,
            ..Default::default()
        };
        assert!(matches!(Engine::new(config), Err(InkmeshError::Config(_))));
    }

    #[test]
    fn test_analyze_empty_drawing() {
        let err = Engine::default().analyze(&[]).unwrap_err();
        assert!(matches!(err, InkmeshError::Graph(_)));
        assert!(err.is_validation());
    }

    #[test]
    fn test_shape_centroids_of_two_squares() {
        let engine = Engine::default();
        let strokes = [square(0.0, 0.0, 10.0), square(100.0, 50.0, 20.0)];
        let centroids = engine.shape_centroids(&strokes);
        assert_eq!(centroids.len(), 2);
        assert!((centroids[0] - Point2::new(5.0, 5.0)).norm() < 1.0);
        assert!((centroids[1] - Point2::new(110.0, 60.0)).norm() < 1.0);
    }

    #[test]
    fn test_flood_fill_uses_configured_color() {
        let engine = Engine::from_toml(r##"fill_color = "#102030""##).unwrap();
        let mut pixels = vec![255u8; 3 * 3 * 4];
        let filled = engine
            .flood_fill(&mut pixels, 3, 3, Point2::new(1.0, 1.0))
            .unwrap();
        assert_eq!(filled, 9);
        assert_eq!(&pixels[0..4], &[0x10, 0x20, 0x30, 255]);
    }

    #[test]
    fn test_flood_fill_checks_buffer_size() {
        let mut pixels = vec![0u8; 7];
        let err = Engine::default()
            .flood_fill(&mut pixels, 2, 2, Point2::origin())
            .unwrap_err();
        assert!(matches!(err, InkmeshError::Raster(_)));
    }

    #[test]
    fn test_export_open_drawing_fails_cleanly() {
        let open = Stroke::new(
            vec![Point2::new(0.0, 0.0), Point2::new(30.0, 0.0)],
            2.0,
            Rgb::BLACK,
        )
        .unwrap();
        let err = Engine::default().export_glb(&[open]).unwrap_err();
        assert!(err.is_validation());
        assert!(!err.is_geometry());
    }
}
