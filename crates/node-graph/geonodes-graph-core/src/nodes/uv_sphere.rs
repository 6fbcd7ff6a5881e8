//! UV sphere mesh primitive: a pole vertex at each end, `rings - 1` latitude rings of
//! `segments` vertices in between, triangle fans at the poles and quads elsewhere.

use std::f32::consts::PI;

use geonodes_api_core::Value;
use geonodes_geometry_core::{
    AttributeArray, AttributeDomain, GArray, GeometrySet, Mesh, MeshFace,
};

use crate::error::ContractViolation;
use crate::eval::{GeoNodeExecParams, NodeWarningType};
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::NodeSettings;

pub const UV_MAP: &str = "uv_map";

const SEGMENTS_MIN: i32 = 3;
const RINGS_MIN: i32 = 2;
const RESOLUTION_MAX: i32 = 1024;

pub fn declare(_settings: &NodeSettings) -> NodeDeclaration {
    NodeDeclaration {
        inputs: vec![
            SocketDeclaration::int("Segments")
                .default(Value::Int(32))
                .min(SEGMENTS_MIN as f32)
                .max(RESOLUTION_MAX as f32)
                .description("Horizontal resolution of the sphere"),
            SocketDeclaration::int("Rings")
                .default(Value::Int(16))
                .min(RINGS_MIN as f32)
                .max(RESOLUTION_MAX as f32)
                .description("The number of horizontal rings"),
            SocketDeclaration::float("Radius")
                .default(Value::Float(1.0))
                .min(0.0)
                .description("Distance from the generated points to the origin"),
        ],
        outputs: vec![SocketDeclaration::geometry("Mesh")],
    }
}

/// Messages for every input outside its declared range, in socket order.
pub fn sphere_input_errors(segments: i32, rings: i32, radius: f32) -> Vec<String> {
    let mut errors = Vec::new();
    if segments < SEGMENTS_MIN {
        errors.push(format!("Segments must be at least {SEGMENTS_MIN}"));
    } else if segments > RESOLUTION_MAX {
        errors.push(format!("Segments must be at most {RESOLUTION_MAX}"));
    }
    if rings < RINGS_MIN {
        errors.push(format!("Rings must be at least {RINGS_MIN}"));
    } else if rings > RESOLUTION_MAX {
        errors.push(format!("Rings must be at most {RESOLUTION_MAX}"));
    }
    if radius < 0.0 || radius.is_nan() {
        errors.push("Radius must not be negative".to_string());
    }
    errors
}

pub fn execute(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let segments: i32 = params.extract_input("Segments")?;
    let rings: i32 = params.extract_input("Rings")?;
    let radius: f32 = params.extract_input("Radius")?;
    let errors = sphere_input_errors(segments, rings, radius);
    if !errors.is_empty() {
        for message in errors {
            params.error_message_add(NodeWarningType::Info, message);
        }
        return params.set_output("Mesh", GeometrySet::new());
    }
    let mesh = create_uv_sphere_mesh(radius, segments as usize, rings as usize);
    params.set_output("Mesh", GeometrySet::create_with_mesh(mesh))
}

pub fn sphere_vert_total(segments: usize, rings: usize) -> usize {
    segments * (rings - 1) + 2
}

pub fn sphere_edge_total(segments: usize, rings: usize) -> usize {
    segments * (rings * 2 - 1)
}

pub fn sphere_face_total(segments: usize, rings: usize) -> usize {
    segments * rings
}

pub fn sphere_corner_total(segments: usize, rings: usize) -> usize {
    let triangles = segments * 3 * 2;
    let quads = segments * (rings - 2) * 4;
    triangles + quads
}

/// Build a sphere with `segments >= 3` and `rings >= 2`.
pub fn create_uv_sphere_mesh(radius: f32, segments: usize, rings: usize) -> Mesh {
    let mut mesh = Mesh::new_nomain(
        sphere_vert_total(segments, rings),
        sphere_edge_total(segments, rings),
        sphere_face_total(segments, rings),
        sphere_corner_total(segments, rings),
    );

    let normals = calculate_sphere_vertex_data(&mut mesh, radius, segments, rings);
    mesh.set_vert_normals(normals);
    calculate_sphere_edge_indices(&mut mesh, segments, rings);
    calculate_sphere_faces(&mut mesh, segments, rings);
    calculate_sphere_corners(&mut mesh, segments, rings);
    let uvs = calculate_sphere_uvs(segments, rings);
    mesh.attributes_mut().insert(
        UV_MAP,
        AttributeArray::new(AttributeDomain::Corner, GArray::Float2(uvs)),
    );

    debug_assert!(mesh.validate().is_ok());
    mesh
}

/// Writes positions and returns the matching unit normals.
fn calculate_sphere_vertex_data(mesh: &mut Mesh, radius: f32, segments: usize, rings: usize) -> Vec<[f32; 3]> {
    let delta_theta = PI / rings as f32;
    let delta_phi = (2.0 * PI) / segments as f32;

    let mut normals = Vec::with_capacity(mesh.verts_num());
    normals.push([0.0, 0.0, 1.0]);
    for ring in 1..rings {
        let theta = ring as f32 * delta_theta;
        let (sin_theta, z) = theta.sin_cos();
        for segment in 1..=segments {
            let phi = segment as f32 * delta_phi;
            let (sin_phi, cos_phi) = phi.sin_cos();
            normals.push([sin_theta * cos_phi, sin_theta * sin_phi, z]);
        }
    }
    normals.push([0.0, 0.0, -1.0]);

    for (position, normal) in mesh.positions_mut().iter_mut().zip(&normals) {
        *position = normal.map(|c| c * radius);
    }
    normals
}

fn calculate_sphere_edge_indices(mesh: &mut Mesh, segments: usize, rings: usize) {
    let last_vert = (mesh.verts_num() - 1) as u32;
    let s = segments as u32;
    let edges = mesh.edges_mut();
    let mut edge = 0;
    let mut push = |v1: u32, v2: u32| {
        edges[edge] = [v1, v2];
        edge += 1;
    };

    for segment in 0..s {
        push(0, segment + 1);
    }

    let mut ring_vert_start = 1;
    for ring in 0..rings - 1 {
        let next_ring_vert_start = ring_vert_start + s;
        for segment in 0..s {
            push(ring_vert_start + segment, ring_vert_start + (segment + 1) % s);
        }
        if ring < rings - 2 {
            for segment in 0..s {
                push(ring_vert_start + segment, next_ring_vert_start + segment);
            }
        }
        ring_vert_start += s;
    }

    let last_vert_ring_start = last_vert - s;
    for segment in 0..s {
        push(last_vert, last_vert_ring_start + segment);
    }
}

fn calculate_sphere_faces(mesh: &mut Mesh, segments: usize, rings: usize) {
    let faces = mesh.faces_mut();
    let mut corner = 0u32;
    let mut face = 0;
    for _ in 0..segments {
        faces[face] = MeshFace::new(corner, 3);
        face += 1;
        corner += 3;
    }
    for _ in 1..rings - 1 {
        for _ in 0..segments {
            faces[face] = MeshFace::new(corner, 4);
            face += 1;
            corner += 4;
        }
    }
    for _ in 0..segments {
        faces[face] = MeshFace::new(corner, 3);
        face += 1;
        corner += 3;
    }
}

fn calculate_sphere_corners(mesh: &mut Mesh, segments: usize, rings: usize) {
    let s = segments as u32;
    let r = rings as u32;
    let last_vert = (mesh.verts_num() - 1) as u32;
    let mut corners: Vec<(u32, u32)> = Vec::with_capacity(mesh.corners_num());

    // Top triangle fan.
    for segment in 0..s {
        let next = (segment + 1) % s;
        corners.push((0, segment));
        corners.push((1 + segment, s + segment));
        corners.push((1 + next, next));
    }

    let mut ring_vert_start = 1;
    let mut ring_edge_start = s;
    for _ in 1..r - 1 {
        let next_ring_vert_start = ring_vert_start + s;
        let next_ring_edge_start = ring_edge_start + s * 2;
        let vert_edge_start = ring_edge_start + s;
        for segment in 0..s {
            let next = (segment + 1) % s;
            corners.push((ring_vert_start + segment, vert_edge_start + segment));
            corners.push((next_ring_vert_start + segment, next_ring_edge_start + segment));
            corners.push((next_ring_vert_start + next, vert_edge_start + next));
            corners.push((ring_vert_start + next, ring_edge_start + segment));
        }
        ring_vert_start += s;
        ring_edge_start += s * 2;
    }

    // Bottom triangle fan.
    let last_edge_ring_start = s * (r - 2) * 2 + s;
    let bottom_edge_fan_start = last_edge_ring_start + s;
    let last_vert_ring_start = last_vert - s;
    for segment in 0..s {
        let next = (segment + 1) % s;
        corners.push((last_vert, bottom_edge_fan_start + next));
        corners.push((last_vert_ring_start + next, last_edge_ring_start + segment));
        corners.push((last_vert_ring_start + segment, bottom_edge_fan_start + segment));
    }

    let (verts, edges): (Vec<u32>, Vec<u32>) = corners.into_iter().unzip();
    mesh.corner_verts_mut().copy_from_slice(&verts);
    mesh.corner_edges_mut().copy_from_slice(&edges);
}

fn calculate_sphere_uvs(segments: usize, rings: usize) -> Vec<[f32; 2]> {
    let mut uvs = Vec::with_capacity(sphere_corner_total(segments, rings));
    let dy = 1.0 / rings as f32;
    let segments_inv = 1.0 / segments as f32;

    for segment in 0..segments {
        let s = segment as f32;
        uvs.push([(s + 0.5) * segments_inv, 0.0]);
        uvs.push([s * segments_inv, dy]);
        uvs.push([(s + 1.0) * segments_inv, dy]);
    }

    for ring in 1..rings - 1 {
        let top = ring as f32 * dy;
        let bottom = top + dy;
        for segment in 0..segments {
            let s = segment as f32;
            uvs.push([s * segments_inv, top]);
            uvs.push([s * segments_inv, bottom]);
            uvs.push([(s + 1.0) * segments_inv, bottom]);
            uvs.push([(s + 1.0) * segments_inv, top]);
        }
    }

    for segment in 0..segments {
        let s = segment as f32;
        uvs.push([(s + 0.5) * segments_inv, 1.0]);
        uvs.push([(s + 1.0) * segments_inv, 1.0 - dy]);
        uvs.push([s * segments_inv, 1.0 - dy]);
    }
    uvs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_build_a_valid_default_sphere() {
        let mesh = create_uv_sphere_mesh(1.0, 32, 16);
        assert_eq!(mesh.verts_num(), 482);
        assert_eq!(mesh.edges_num(), 992);
        assert_eq!(mesh.faces_num(), 512);
        assert_eq!(mesh.corners_num(), 1984);
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn it_should_check_every_declared_bound() {
        assert!(sphere_input_errors(3, 2, 0.0).is_empty());
        assert!(sphere_input_errors(1024, 1024, 1.0).is_empty());
        assert_eq!(sphere_input_errors(2, 16, 1.0), vec!["Segments must be at least 3"]);
        assert_eq!(sphere_input_errors(1025, 16, 1.0), vec!["Segments must be at most 1024"]);
        assert_eq!(sphere_input_errors(32, 1, 1.0), vec!["Rings must be at least 2"]);
        assert_eq!(sphere_input_errors(32, 1025, 1.0), vec!["Rings must be at most 1024"]);
        assert_eq!(sphere_input_errors(32, 16, -0.5), vec!["Radius must not be negative"]);
        assert_eq!(sphere_input_errors(0, 0, f32::NAN).len(), 3);
    }

    #[test]
    fn it_should_build_the_minimal_sphere() {
        // Two rings: one latitude ring, no quads.
        let mesh = create_uv_sphere_mesh(2.0, 3, 2);
        assert_eq!(mesh.verts_num(), 5);
        assert_eq!(mesh.edges_num(), 9);
        assert_eq!(mesh.faces_num(), 6);
        assert!(mesh.faces().iter().all(|f| f.size == 3));
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn it_should_place_vertices_on_the_radius() {
        let radius = 2.5;
        let mesh = create_uv_sphere_mesh(radius, 8, 4);
        for p in mesh.positions() {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - radius).abs() < 1e-4);
        }
        assert_eq!(mesh.positions()[0], [0.0, 0.0, radius]);
        assert_eq!(mesh.positions()[mesh.verts_num() - 1], [0.0, 0.0, -radius]);
        assert!(mesh.has_cached_vert_normals());
    }

    #[test]
    fn it_should_store_uvs_per_corner() {
        let mesh = create_uv_sphere_mesh(1.0, 4, 3);
        let uv = mesh.attributes().get(UV_MAP).unwrap();
        assert_eq!(uv.domain, AttributeDomain::Corner);
        let uvs = uv.data.typed::<[f32; 2]>().unwrap();
        assert_eq!(uvs.len(), mesh.corners_num());
        assert!(uvs.iter().all(|[u, v]| (0.0..=1.0).contains(u) && (0.0..=1.0).contains(v)));
        assert_eq!(uvs[0], [0.125, 0.0]);
    }
}
