//! Export settings.

use serde::{Deserialize, Serialize};

use crate::{MeshError, Result};

/// How thick the extruded solid is at each ring point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Thickness {
    /// Same thickness everywhere.
    Uniform(f64),
    /// Thickest at the ring centroid, falling off linearly to `min` at the
    /// ring point farthest from it.
    Tapered {
        /// Thickness at the farthest point.
        min: f64,
        /// Thickness at the centroid.
        max: f64,
    },
}

impl Default for Thickness {
    fn default() -> Self {
        Thickness::Uniform(15.0)
    }
}

impl Thickness {
    /// Thickness at `distance` from the centroid, where `farthest` is the
    /// largest such distance on the ring.
    pub fn at(&self, distance: f64, farthest: f64) -> f64 {
        match *self {
            Thickness::Uniform(h) => h,
            Thickness::Tapered { min, max } => {
                let t = if farthest > 0.0 {
                    1.0 - distance / farthest
                } else {
                    1.0
                };
                min + (max - min) * t
            }
        }
    }

    fn validate(&self) -> Result<()> {
        let ok = |h: f64| h.is_finite() && h > 0.0;
        match *self {
            Thickness::Uniform(h) if ok(h) => Ok(()),
            Thickness::Tapered { min, max } if ok(min) && ok(max) && min <= max => Ok(()),
            other => Err(MeshError::InvalidSettings(format!(
                "thickness must be positive (and min <= max): {other:?}"
            ))),
        }
    }
}

/// Fixed PBR material attached to the exported mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Linear RGB base color.
    pub color: [f32; 3],
    /// Metallic factor in [0, 1].
    pub metallic: f32,
    /// Roughness factor in [0, 1].
    pub roughness: f32,
    /// Render back faces too.
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            // #cccccc in linear space
            color: [0.6038, 0.6038, 0.6038],
            metallic: 0.2,
            roughness: 0.5,
            double_sided: true,
        }
    }
}

/// Parameters for turning an outline into an exported solid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Reject outlines with branch nodes instead of walking a truncated ring.
    pub strict_outline: bool,
    /// Run the decimator before export.
    pub decimate: bool,
    /// Fraction of triangles to keep when decimating, in (0, 1].
    pub decimate_ratio: f32,
    /// Uniform factor applied to positions last.
    pub scale: f32,
    /// Solid thickness.
    pub thickness: Thickness,
    /// Material of the single mesh.
    pub material: Material,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            strict_outline: true,
            decimate: false,
            decimate_ratio: 0.5,
            scale: 1.0,
            thickness: Thickness::default(),
            material: Material::default(),
        }
    }
}

impl ExportSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        self.thickness.validate()?;
        if !(self.decimate_ratio > 0.0 && self.decimate_ratio <= 1.0) {
            return Err(MeshError::InvalidSettings(format!(
                "decimate_ratio must be in (0, 1]: {}",
                self.decimate_ratio
            )));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(MeshError::InvalidSettings(format!(
                "scale must be positive: {}",
                self.scale
            )));
        }
        let unit = |v: f32| (0.0..=1.0).contains(&v);
        if !self.material.color.iter().all(|&c| unit(c))
            || !unit(self.material.metallic)
            || !unit(self.material.roughness)
        {
            return Err(MeshError::InvalidSettings(
                "material factors must be in [0, 1]".into(),
            ));
        }
        Ok(())
    }
}
