//! JSON form of a drawing.
//!
//! A drawing is an array of strokes:
//!
//! ```json
//! [
//!   { "path": [[0, 0], [10, 0], [10, 10]], "width": 4, "color": "#000000" }
//! ]
//! ```

use inkmesh_graph::Stroke;

use crate::Result;

/// Parse a drawing. Every stroke is validated as it is read.
pub fn parse_drawing(json: &str) -> Result<Vec<Stroke>> {
    Ok(serde_json::from_str(json)?)
}

/// Serialize a drawing.
pub fn drawing_to_json(strokes: &[Stroke]) -> Result<String> {
    Ok(serde_json::to_string(strokes)?)
}
