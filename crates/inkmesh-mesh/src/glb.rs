//! Binary glTF (.glb) writer for a single mesh.
//!
//! Layout of the binary chunk: positions (VEC3 f32), normals (VEC3 f32),
//! then triangle indices (SCALAR u32), each in its own buffer view.

use std::borrow::Cow;
use std::collections::BTreeMap;

use gltf::binary::{Glb, Header};
use gltf::json;
use json::validation::Checked::Valid;
use json::validation::USize64;
use tracing::info;

use crate::{Material, MeshError, Result, TriangleMesh};

const GLB_HEADER_LEN: usize = 12;
const CHUNK_HEADER_LEN: usize = 8;

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

fn push_view(
    root: &mut json::Root,
    buffer: json::Index<json::Buffer>,
    offset: usize,
    length: usize,
    target: json::buffer::Target,
) -> json::Index<json::buffer::View> {
    root.push(json::buffer::View {
        buffer,
        byte_length: USize64::from(length),
        byte_offset: Some(USize64::from(offset)),
        byte_stride: None,
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        target: Some(Valid(target)),
    })
}

fn push_accessor(
    root: &mut json::Root,
    view: json::Index<json::buffer::View>,
    count: usize,
    component: json::accessor::ComponentType,
    type_: json::accessor::Type,
    bounds: Option<([f32; 3], [f32; 3])>,
) -> json::Index<json::Accessor> {
    let (min, max) = match bounds {
        Some((min, max)) => (
            Some(json::Value::from(min.to_vec())),
            Some(json::Value::from(max.to_vec())),
        ),
        None => (None, None),
    };
    root.push(json::Accessor {
        buffer_view: Some(view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(count),
        component_type: Valid(json::accessor::GenericComponentType(component)),
        extensions: Default::default(),
        extras: Default::default(),
        type_: Valid(type_),
        min,
        max,
        name: None,
        normalized: false,
        sparse: None,
    })
}

/// Encode `mesh` and `material` as a binary glTF 2.0 container.
///
/// The mesh must carry normals (see [`crate::compute_normals`]).
///
/// # Errors
///
/// [`MeshError::Encoding`] if the mesh is empty, lacks normals, or the JSON
/// chunk cannot be serialized.
pub fn write_glb(mesh: &TriangleMesh, material: &Material) -> Result<Vec<u8>> {
    let Some(bounds) = mesh.bounds() else {
        return Err(MeshError::Encoding("mesh has no vertices".into()));
    };
    if mesh.normals.len() != mesh.vertices.len() {
        return Err(MeshError::Encoding(format!(
            "mesh has {} normal components for {} position components",
            mesh.normals.len(),
            mesh.vertices.len()
        )));
    }

    let mut bin: Vec<u8> = Vec::with_capacity(
        (mesh.vertices.len() + mesh.normals.len()) * 4 + mesh.indices.len() * 4,
    );
    bin.extend(mesh.vertices.iter().flat_map(|v| v.to_le_bytes()));
    let normals_offset = bin.len();
    bin.extend(mesh.normals.iter().flat_map(|v| v.to_le_bytes()));
    let indices_offset = bin.len();
    bin.extend(mesh.indices.iter().flat_map(|i| i.to_le_bytes()));
    let bin_len = bin.len();
    pad_to_four(&mut bin, 0);

    let mut root = json::Root::default();
    root.asset.generator = Some(format!("inkmesh {}", env!("CARGO_PKG_VERSION")));

    let buffer = root.push(json::Buffer {
        byte_length: USize64::from(bin_len),
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        uri: None,
    });

    use json::accessor::{ComponentType, Type};
    use json::buffer::Target;

    let n = mesh.num_vertices();
    let position_view = push_view(&mut root, buffer, 0, normals_offset, Target::ArrayBuffer);
    let normal_view = push_view(
        &mut root,
        buffer,
        normals_offset,
        indices_offset - normals_offset,
        Target::ArrayBuffer,
    );
    let index_view = push_view(
        &mut root,
        buffer,
        indices_offset,
        bin_len - indices_offset,
        Target::ElementArrayBuffer,
    );

    let positions = push_accessor(
        &mut root,
        position_view,
        n,
        ComponentType::F32,
        Type::Vec3,
        Some(bounds),
    );
    let normals = push_accessor(&mut root, normal_view, n, ComponentType::F32, Type::Vec3, None);
    let indices = push_accessor(
        &mut root,
        index_view,
        mesh.indices.len(),
        ComponentType::U32,
        Type::Scalar,
        None,
    );

    let [r, g, b] = material.color;
    let material = root.push(json::Material {
        name: Some("outline".into()),
        double_sided: material.double_sided,
        pbr_metallic_roughness: json::material::PbrMetallicRoughness {
            base_color_factor: json::material::PbrBaseColorFactor([r, g, b, 1.0]),
            metallic_factor: json::material::StrengthFactor(material.metallic),
            roughness_factor: json::material::StrengthFactor(material.roughness),
            ..Default::default()
        },
        ..Default::default()
    });

    let primitive = json::mesh::Primitive {
        attributes: BTreeMap::from([
            (Valid(json::mesh::Semantic::Positions), positions),
            (Valid(json::mesh::Semantic::Normals), normals),
        ]),
        extensions: Default::default(),
        extras: Default::default(),
        indices: Some(indices),
        material: Some(material),
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    };
    let mesh_index = root.push(json::Mesh {
        extensions: Default::default(),
        extras: Default::default(),
        name: Some("outline".into()),
        primitives: vec![primitive],
        weights: None,
    });
    let node = root.push(json::Node {
        mesh: Some(mesh_index),
        ..Default::default()
    });
    let scene = root.push(json::Scene {
        extensions: Default::default(),
        extras: Default::default(),
        name: None,
        nodes: vec![node],
    });
    root.scene = Some(scene);

    let mut json_bytes =
        serde_json::to_vec(&root).map_err(|e| MeshError::Encoding(e.to_string()))?;
    pad_to_four(&mut json_bytes, b' ');

    let length =
        GLB_HEADER_LEN + CHUNK_HEADER_LEN + json_bytes.len() + CHUNK_HEADER_LEN + bin.len();
    let glb = Glb {
        header: Header {
            magic: *b"glTF",
            version: 2,
            length: u32::try_from(length)
                .map_err(|_| MeshError::Encoding(format!("{length} bytes exceeds the glb limit")))?,
        },
        json: Cow::Owned(json_bytes),
        bin: Some(Cow::Owned(bin)),
    };

    let mut out = Vec::with_capacity(length);
    glb.to_writer(&mut out)
        .map_err(|e| MeshError::Encoding(e.to_string()))?;

    info!(
        vertices = n,
        triangles = mesh.num_triangles(),
        bytes = out.len(),
        "wrote glb"
    );
    Ok(out)
}
