use thiserror::Error;

use inkmesh_graph::GraphError;
use inkmesh_mesh::MeshError;
use inkmesh_raster::RasterError;

/// Errors returned by [`crate::Engine`] operations.
#[derive(Error, Debug)]
pub enum InkmeshError {
    /// Configuration could not be parsed.
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration parsed but holds out-of-range values.
    #[error("invalid config: {0}")]
    Config(String),

    /// Stroke analysis failed.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A pixel operation failed.
    #[error(transparent)]
    Raster(#[from] RasterError),

    /// Mesh export failed.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// A drawing could not be read or written as JSON.
    #[error("invalid drawing: {0}")]
    Drawing(#[from] serde_json::Error),
}

impl InkmeshError {
    /// The input could not be used at all: an empty drawing, no closed
    /// shape, bad settings and the like.
    pub fn is_validation(&self) -> bool {
        match self {
            InkmeshError::Mesh(e) => e.is_validation(),
            _ => true,
        }
    }

    /// The input was usable but its geometry could not be processed.
    pub fn is_geometry(&self) -> bool {
        matches!(self, InkmeshError::Mesh(e) if e.is_geometry())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, InkmeshError>;
