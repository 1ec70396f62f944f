//! Strokes to exported solid, end to end.

use inkmesh_graph::{ShapeSet, Stroke};
use inkmesh_math::Tolerance;
use tracing::debug;

use crate::{
    compute_normals, extrude_ring, recenter, select_outline, triangulate_ring, write_glb,
    Decimator, EdgeCollapseDecimator, ExportSettings, MeshError, Result, TriangleMesh,
};

/// Build the extruded, recentered, normal-carrying solid for a drawing.
///
/// No decimation or scaling is applied here.
pub fn build_mesh(
    strokes: &[Stroke],
    tolerance: Tolerance,
    settings: &ExportSettings,
) -> Result<TriangleMesh> {
    settings.validate()?;
    if strokes.is_empty() {
        return Err(MeshError::EmptyDrawing);
    }

    let set = ShapeSet::build(strokes, tolerance);
    let outline = select_outline(&set, settings.strict_outline)?;

    let cap = triangulate_ring(&outline.ring)?;
    let mut mesh = extrude_ring(&outline.ring, &cap, settings.thickness);
    recenter(&mut mesh);
    compute_normals(&mut mesh);

    debug!(
        ring = outline.ring.len(),
        vertices = mesh.num_vertices(),
        triangles = mesh.num_triangles(),
        "built solid"
    );
    Ok(mesh)
}

/// Export a drawing's outline as `.glb` bytes, decimating with `decimator`
/// when the settings ask for it.
pub fn export_glb_with(
    strokes: &[Stroke],
    tolerance: Tolerance,
    settings: &ExportSettings,
    decimator: &dyn Decimator,
) -> Result<Vec<u8>> {
    let mut mesh = build_mesh(strokes, tolerance, settings)?;

    if settings.decimate {
        mesh = decimator.decimate(&mesh, settings.decimate_ratio);
        if mesh.num_triangles() == 0 {
            return Err(MeshError::TriangulationFailed);
        }
        compute_normals(&mut mesh);
    }

    mesh.scale(settings.scale);
    write_glb(&mesh, &settings.material)
}

/// Export a drawing's outline as `.glb` bytes using [`EdgeCollapseDecimator`].
///
/// # Errors
///
/// Any validation or geometry failure along the way; no bytes are produced
/// in that case.
pub fn export_glb(
    strokes: &[Stroke],
    tolerance: Tolerance,
    settings: &ExportSettings,
) -> Result<Vec<u8>> {
    export_glb_with(strokes, tolerance, settings, &EdgeCollapseDecimator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{polygon, stroke, volume};
    use crate::Thickness;
    use approx::assert_relative_eq;

    #[test]
    fn test_ring_counts() {
        for r in [3usize, 4, 7, 16] {
            let mesh =
                build_mesh(&[polygon(r, 30.0)], Tolerance::DEFAULT, &ExportSettings::default())
                    .unwrap();
            assert_eq!(mesh.num_vertices(), 2 * r);
            assert_eq!(mesh.num_triangles(), 2 * (r - 2) + 2 * r, "ring of {r}");
            assert_eq!(mesh.normals.len(), mesh.vertices.len());
        }
    }

    #[test]
    fn test_mesh_is_centered_with_thickness() {
        let settings = ExportSettings {
            thickness: Thickness::Uniform(6.0),
            ..Default::default()
        };
        let square = stroke(&[
            (10.0, 10.0),
            (50.0, 10.0),
            (50.0, 30.0),
            (10.0, 30.0),
            (10.0, 10.0),
        ]);
        let mesh = build_mesh(&[square], Tolerance::DEFAULT, &settings).unwrap();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, [-20.0, -10.0, -3.0]);
        assert_eq!(max, [20.0, 10.0, 3.0]);
        assert_relative_eq!(volume(&mesh), 40.0 * 20.0 * 6.0, epsilon = 1e-3);
    }

    #[test]
    fn test_empty_drawing_is_validation_failure() {
        let err = export_glb(&[], Tolerance::DEFAULT, &ExportSettings::default()).unwrap_err();
        assert_eq!(err, MeshError::EmptyDrawing);
        assert!(err.is_validation());
    }

    #[test]
    fn test_open_drawing_exports_nothing() {
        let strokes = [stroke(&[(0.0, 0.0), (40.0, 0.0), (40.0, 40.0)])];
        let err = export_glb(&strokes, Tolerance::DEFAULT, &ExportSettings::default()).unwrap_err();
        assert_eq!(err, MeshError::NoClosedShape);
    }

    #[test]
    fn test_invalid_settings_rejected_first() {
        let settings = ExportSettings {
            scale: 0.0,
            ..Default::default()
        };
        let err = export_glb(&[polygon(5, 10.0)], Tolerance::DEFAULT, &settings).unwrap_err();
        assert!(matches!(err, MeshError::InvalidSettings(_)));
    }

    struct Halve;

    impl Decimator for Halve {
        fn decimate(&self, mesh: &TriangleMesh, _ratio: f32) -> TriangleMesh {
            let keep = mesh.num_triangles() / 2 * 3;
            TriangleMesh {
                vertices: mesh.vertices.clone(),
                indices: mesh.indices[..keep].to_vec(),
                normals: Vec::new(),
            }
        }
    }

    #[test]
    fn test_custom_decimator_and_scale() {
        let settings = ExportSettings {
            decimate: true,
            scale: 2.0,
            ..Default::default()
        };
        let strokes = [polygon(8, 20.0)];
        let bytes = export_glb_with(&strokes, Tolerance::DEFAULT, &settings, &Halve).unwrap();
        let doc = gltf::Gltf::from_slice(&bytes).unwrap();
        let prim = doc.meshes().next().unwrap().primitives().next().unwrap();
        // 8-ring: 6 + 6 cap + 16 side = 28 triangles, halved.
        assert_eq!(prim.indices().unwrap().count(), 14 * 3);

        let pos = prim.get(&gltf::Semantic::Positions).unwrap();
        let max = pos.max().unwrap();
        let z = max.as_array().unwrap()[2].as_f64().unwrap();
        // Default thickness 15, scaled by 2.
        assert_relative_eq!(z, 15.0, epsilon = 1e-4);
    }
}
