//! Engine configuration, loaded from TOML.
//!
//! ```toml
//! merge_tolerance = 1.0
//! fill_color = "#0000ff"
//!
//! [brush]
//! width = 10.0
//! color = "#000000"
//!
//! [gradient]
//! min = 0.0
//! max = 1.0
//! threshold = 1.0
//!
//! [export]
//! thickness = { uniform = 15.0 }
//! strict_outline = true
//! decimate = false
//! decimate_ratio = 0.5
//! scale = 1.0
//!
//! [export.material]
//! color = [0.6038, 0.6038, 0.6038]
//! metallic = 0.2
//! roughness = 0.5
//! double_sided = true
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};

use inkmesh_graph::Brush;
use inkmesh_math::{Rgb, Tolerance};
use inkmesh_mesh::ExportSettings;
use inkmesh_raster::GradientRamp;

use crate::{InkmeshError, Result};

/// Gradient shading parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    /// Gray at the edge of a region, in [0, 1].
    pub min: f64,
    /// Gray deep inside a region, in [0, 1].
    pub max: f64,
    /// Fraction of the widest interior distance at which the edge-threshold
    /// shader saturates, in (0, 1].
    pub threshold: f64,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 1.0,
            threshold: 1.0,
        }
    }
}

impl GradientConfig {
    /// The gray ramp.
    pub fn ramp(&self) -> GradientRamp {
        GradientRamp::new(self.min, self.max)
    }
}

/// Everything an [`crate::Engine`] needs besides the drawing itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples closer than this merge into one graph node.
    pub merge_tolerance: f64,
    /// Flood fill color.
    pub fill_color: Rgb,
    /// Brush used for strokes synthesized by repair.
    pub brush: Brush,
    /// Gradient shading.
    pub gradient: GradientConfig,
    /// Solid export.
    pub export: ExportSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            merge_tolerance: Tolerance::DEFAULT.merge,
            fill_color: Rgb::new(0, 0, 255),
            brush: Brush::default(),
            gradient: GradientConfig::default(),
            export: ExportSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn parse(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge tolerance as a [`Tolerance`].
    pub fn tolerance(&self) -> Tolerance {
        Tolerance::new(self.merge_tolerance)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        if !(self.merge_tolerance.is_finite() && self.merge_tolerance > 0.0) {
            return Err(InkmeshError::Config(format!(
                "merge_tolerance must be positive: {}",
                self.merge_tolerance
            )));
        }
        if !(self.brush.width.is_finite() && self.brush.width > 0.0) {
            return Err(InkmeshError::Config(format!(
                "brush.width must be positive: {}",
                self.brush.width
            )));
        }
        self.gradient
            .ramp()
            .validate()
            .map_err(|e| InkmeshError::Config(e.to_string()))?;
        let t = self.gradient.threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(InkmeshError::Config(format!(
                "gradient.threshold must be in (0, 1]: {t}"
            )));
        }
        self.export
            .validate()
            .map_err(|e| InkmeshError::Config(e.to_string()))?;
        Ok(())
    }
}
