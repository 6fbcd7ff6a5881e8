//! Polygon meshes and the mesh component.

use std::ops::Range;

use geonodes_api_core::DataType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attribute::{AttributeArray, AttributeStorage, BuiltinAttribute};
use crate::component::{position_bounds, GeometryComponent, GeometryComponentType};
use crate::domain::AttributeDomain;
use crate::garray::GArray;
use crate::mix::mix_pairs;

pub const POSITION: &str = "position";

static MESH_BUILTINS: [BuiltinAttribute; 1] =
    [BuiltinAttribute::new(POSITION, AttributeDomain::Point, DataType::Float3)];

static MESH_DOMAINS: [AttributeDomain; 4] = [
    AttributeDomain::Point,
    AttributeDomain::Edge,
    AttributeDomain::Corner,
    AttributeDomain::Face,
];

/// A face is a contiguous run of corners.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshFace {
    pub start: u32,
    pub size: u32,
}

impl MeshFace {
    pub fn new(start: u32, size: u32) -> Self {
        MeshFace { start, size }
    }

    pub fn corners(&self) -> Range<usize> {
        self.start as usize..(self.start + self.size) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshValidationError {
    #[error("position attribute has {actual} elements, expected {expected}")]
    PositionCount { expected: usize, actual: usize },
    #[error("edge {edge} references vertex {vert} which does not exist")]
    EdgeVertexOutOfRange { edge: usize, vert: u32 },
    #[error("edge {edge} connects vertex {vert} to itself")]
    DegenerateEdge { edge: usize, vert: u32 },
    #[error("face {face} has {size} corners, faces need at least 3")]
    FaceTooSmall { face: usize, size: u32 },
    #[error("face {face} starts at corner {start}, expected {expected}")]
    FaceOffset { face: usize, start: u32, expected: u32 },
    #[error("faces use {used} corners but the mesh has {corners}")]
    CornerCount { used: usize, corners: usize },
    #[error("corner vertex and corner edge arrays differ in length ({verts} vs {edges})")]
    CornerEdgeCount { verts: usize, edges: usize },
    #[error("corner {corner} references vertex {vert} which does not exist")]
    CornerVertOutOfRange { corner: usize, vert: u32 },
    #[error("corner {corner} references edge {edge} which does not exist")]
    CornerEdgeOutOfRange { corner: usize, edge: u32 },
    #[error("corner {corner} uses edge {edge} which does not connect it to the next corner")]
    CornerEdgeMismatch { corner: usize, edge: u32 },
    #[error("attribute '{name}' has {actual} elements but the {domain} domain has {expected}")]
    AttributeLength {
        name: String,
        domain: AttributeDomain,
        expected: usize,
        actual: usize,
    },
}

/// Vertices, edges and faces plus attributes on each of those and on face corners.
///
/// Vertex positions are the built-in `position` point attribute. Faces index into the corner
/// arrays; every corner stores its vertex and the edge to the next corner of the same face.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    verts_num: usize,
    edges: Vec<[u32; 2]>,
    faces: Vec<MeshFace>,
    corner_verts: Vec<u32>,
    corner_edges: Vec<u32>,
    vert_normals: Option<Vec<[f32; 3]>>,
    attributes: AttributeStorage,
}

impl Mesh {
    /// A mesh with the given element counts and default-filled topology.
    pub fn new_nomain(verts_num: usize, edges_num: usize, faces_num: usize, corners_num: usize) -> Mesh {
        let mut attributes = AttributeStorage::new();
        attributes.insert(
            POSITION,
            AttributeArray::new(AttributeDomain::Point, GArray::new_default(DataType::Float3, verts_num)),
        );
        Mesh {
            verts_num,
            edges: vec![[0, 0]; edges_num],
            faces: vec![MeshFace::default(); faces_num],
            corner_verts: vec![0; corners_num],
            corner_edges: vec![0; corners_num],
            vert_normals: None,
            attributes,
        }
    }

    pub fn verts_num(&self) -> usize {
        self.verts_num
    }

    pub fn edges_num(&self) -> usize {
        self.edges.len()
    }

    pub fn faces_num(&self) -> usize {
        self.faces.len()
    }

    pub fn corners_num(&self) -> usize {
        self.corner_verts.len()
    }

    pub fn domain_size(&self, domain: AttributeDomain) -> usize {
        match domain {
            AttributeDomain::Point => self.verts_num,
            AttributeDomain::Edge => self.edges.len(),
            AttributeDomain::Corner => self.corner_verts.len(),
            AttributeDomain::Face => self.faces.len(),
            AttributeDomain::Curve | AttributeDomain::Instance => 0,
        }
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        self.attributes
            .get(POSITION)
            .and_then(|a| a.data.typed())
            .unwrap_or_default()
    }

    /// Mutable positions. Cached vertex normals are dropped.
    pub fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        self.vert_normals = None;
        self.attributes
            .get_mut(POSITION)
            .and_then(|a| a.data.typed_mut())
            .unwrap_or_default()
    }

    pub fn edges(&self) -> &[[u32; 2]] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [[u32; 2]] {
        &mut self.edges
    }

    pub fn faces(&self) -> &[MeshFace] {
        &self.faces
    }

    pub fn faces_mut(&mut self) -> &mut [MeshFace] {
        self.vert_normals = None;
        &mut self.faces
    }

    pub fn corner_verts(&self) -> &[u32] {
        &self.corner_verts
    }

    pub fn corner_verts_mut(&mut self) -> &mut [u32] {
        self.vert_normals = None;
        &mut self.corner_verts
    }

    pub fn corner_edges(&self) -> &[u32] {
        &self.corner_edges
    }

    pub fn corner_edges_mut(&mut self) -> &mut [u32] {
        &mut self.corner_edges
    }

    pub fn attributes(&self) -> &AttributeStorage {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStorage {
        &mut self.attributes
    }

    /// Store normals computed alongside the positions, skipping the face based evaluation.
    pub fn set_vert_normals(&mut self, normals: Vec<[f32; 3]>) {
        debug_assert_eq!(normals.len(), self.verts_num);
        self.vert_normals = Some(normals);
    }

    pub fn has_cached_vert_normals(&self) -> bool {
        self.vert_normals.is_some()
    }

    /// Vertex normals: the cached ones, or the normalized sum of adjacent face normals.
    pub fn vert_normals(&self) -> Vec<[f32; 3]> {
        if let Some(normals) = &self.vert_normals {
            return normals.clone();
        }
        let positions = self.positions();
        let mut normals = vec![[0.0f32; 3]; self.verts_num];
        for face in &self.faces {
            let n = self.face_normal(face, positions);
            for corner in face.corners() {
                let v = self.corner_verts[corner] as usize;
                for k in 0..3 {
                    normals[v][k] += n[k];
                }
            }
        }
        normals.iter_mut().for_each(|n| *n = normalize(*n));
        normals
    }

    /// Newell's method, robust for non-planar faces.
    fn face_normal(&self, face: &MeshFace, positions: &[[f32; 3]]) -> [f32; 3] {
        let corners = face.corners();
        let mut n = [0.0f32; 3];
        for c in corners.clone() {
            let next = if c + 1 == corners.end { corners.start } else { c + 1 };
            let a = positions[self.corner_verts[c] as usize];
            let b = positions[self.corner_verts[next] as usize];
            n[0] += (a[1] - b[1]) * (a[2] + b[2]);
            n[1] += (a[2] - b[2]) * (a[0] + b[0]);
            n[2] += (a[0] - b[0]) * (a[1] + b[1]);
        }
        normalize(n)
    }

    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        position_bounds(self.positions())
    }

    /// Check topology indices and attribute lengths against the element counts.
    pub fn validate(&self) -> Result<(), MeshValidationError> {
        let positions = self.positions().len();
        if positions != self.verts_num {
            return Err(MeshValidationError::PositionCount {
                expected: self.verts_num,
                actual: positions,
            });
        }
        for (edge, &[a, b]) in self.edges.iter().enumerate() {
            for vert in [a, b] {
                if vert as usize >= self.verts_num {
                    return Err(MeshValidationError::EdgeVertexOutOfRange { edge, vert });
                }
            }
            if a == b {
                return Err(MeshValidationError::DegenerateEdge { edge, vert: a });
            }
        }
        if self.corner_verts.len() != self.corner_edges.len() {
            return Err(MeshValidationError::CornerEdgeCount {
                verts: self.corner_verts.len(),
                edges: self.corner_edges.len(),
            });
        }
        let mut expected = 0u32;
        for (face_index, face) in self.faces.iter().enumerate() {
            if face.start != expected {
                return Err(MeshValidationError::FaceOffset {
                    face: face_index,
                    start: face.start,
                    expected,
                });
            }
            if face.size < 3 {
                return Err(MeshValidationError::FaceTooSmall {
                    face: face_index,
                    size: face.size,
                });
            }
            expected += face.size;
        }
        if expected as usize != self.corner_verts.len() {
            return Err(MeshValidationError::CornerCount {
                used: expected as usize,
                corners: self.corner_verts.len(),
            });
        }
        for face in &self.faces {
            let corners = face.corners();
            for corner in corners.clone() {
                let vert = self.corner_verts[corner];
                if vert as usize >= self.verts_num {
                    return Err(MeshValidationError::CornerVertOutOfRange { corner, vert });
                }
                let edge = self.corner_edges[corner];
                let Some(&[a, b]) = self.edges.get(edge as usize) else {
                    return Err(MeshValidationError::CornerEdgeOutOfRange { corner, edge });
                };
                let next = if corner + 1 == corners.end { corners.start } else { corner + 1 };
                let next_vert = self.corner_verts[next];
                let connects = (a == vert && b == next_vert) || (b == vert && a == next_vert);
                if !connects {
                    return Err(MeshValidationError::CornerEdgeMismatch { corner, edge });
                }
            }
        }
        for (name, array) in self.attributes.iter() {
            let expected = self.domain_size(array.domain);
            if array.data.len() != expected {
                return Err(MeshValidationError::AttributeLength {
                    name: name.to_owned(),
                    domain: array.domain,
                    expected,
                    actual: array.data.len(),
                });
            }
        }
        Ok(())
    }

    fn face_to_corner_map(&self) -> Vec<u32> {
        let mut map = vec![0u32; self.corner_verts.len()];
        for (face_index, face) in self.faces.iter().enumerate() {
            for corner in face.corners() {
                map[corner] = face_index as u32;
            }
        }
        map
    }

    fn point_to_corner(&self, data: &GArray) -> GArray {
        data.gather(&self.corner_verts)
    }

    fn corner_to_point(&self, data: &GArray) -> GArray {
        let pairs = self
            .corner_verts
            .iter()
            .enumerate()
            .map(|(corner, &vert)| (vert as usize, corner));
        mix_pairs(data, self.verts_num, pairs)
    }

    fn face_to_corner(&self, data: &GArray) -> GArray {
        data.gather(&self.face_to_corner_map())
    }

    fn corner_to_face(&self, data: &GArray) -> GArray {
        let pairs = self
            .faces
            .iter()
            .enumerate()
            .flat_map(|(face, f)| f.corners().map(move |corner| (face, corner)));
        mix_pairs(data, self.faces.len(), pairs)
    }

    fn point_to_edge(&self, data: &GArray) -> GArray {
        let pairs = self
            .edges
            .iter()
            .enumerate()
            .flat_map(|(edge, &[a, b])| [(edge, a as usize), (edge, b as usize)]);
        mix_pairs(data, self.edges.len(), pairs)
    }

    fn edge_to_point(&self, data: &GArray) -> GArray {
        let pairs = self
            .edges
            .iter()
            .enumerate()
            .flat_map(|(edge, &[a, b])| [(a as usize, edge), (b as usize, edge)]);
        mix_pairs(data, self.verts_num, pairs)
    }

    /// Re-express `data` from one domain on another. Point-corner, face-corner and point-edge
    /// are direct; every other pair goes through points or corners.
    pub fn adapt_domain(&self, data: &GArray, from: AttributeDomain, to: AttributeDomain) -> Option<GArray> {
        use AttributeDomain::*;
        if data.len() != self.domain_size(from) {
            return None;
        }
        let adapted = match (from, to) {
            _ if from == to => data.clone(),
            (Point, Corner) => self.point_to_corner(data),
            (Corner, Point) => self.corner_to_point(data),
            (Face, Corner) => self.face_to_corner(data),
            (Corner, Face) => self.corner_to_face(data),
            (Point, Edge) => self.point_to_edge(data),
            (Edge, Point) => self.edge_to_point(data),
            (Face, Point) => self.corner_to_point(&self.face_to_corner(data)),
            (Point, Face) => self.corner_to_face(&self.point_to_corner(data)),
            (Edge, Corner) => self.point_to_corner(&self.edge_to_point(data)),
            (Corner, Edge) => self.point_to_edge(&self.corner_to_point(data)),
            (Edge, Face) => self.corner_to_face(&self.point_to_corner(&self.edge_to_point(data))),
            (Face, Edge) => self.point_to_edge(&self.corner_to_point(&self.face_to_corner(data))),
            _ => return None,
        };
        Some(adapted)
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0; 3]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshComponent {
    mesh: Option<Mesh>,
}

impl MeshComponent {
    pub fn new(mesh: Mesh) -> Self {
        MeshComponent { mesh: Some(mesh) }
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn get_for_read(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    pub fn get_for_write(&mut self) -> Option<&mut Mesh> {
        self.mesh.as_mut()
    }

    pub fn replace(&mut self, mesh: Option<Mesh>) {
        self.mesh = mesh;
    }

    pub fn release(&mut self) -> Option<Mesh> {
        self.mesh.take()
    }
}

impl GeometryComponent for MeshComponent {
    fn component_type(&self) -> GeometryComponentType {
        GeometryComponentType::Mesh
    }

    fn is_empty(&self) -> bool {
        self.mesh.as_ref().map_or(true, |m| m.verts_num() == 0)
    }

    fn supported_domains(&self) -> &'static [AttributeDomain] {
        &MESH_DOMAINS
    }

    fn attribute_domain_size(&self, domain: AttributeDomain) -> usize {
        self.mesh.as_ref().map_or(0, |m| m.domain_size(domain))
    }

    fn attributes(&self) -> Option<&AttributeStorage> {
        self.mesh.as_ref().map(Mesh::attributes)
    }

    fn attributes_mut(&mut self) -> Option<&mut AttributeStorage> {
        self.mesh.as_mut().map(Mesh::attributes_mut)
    }

    fn builtin_attributes(&self) -> &'static [BuiltinAttribute] {
        &MESH_BUILTINS
    }

    fn attribute_try_adapt_domain(
        &self,
        data: &GArray,
        from: AttributeDomain,
        to: AttributeDomain,
    ) -> Option<GArray> {
        self.mesh.as_ref()?.adapt_domain(data, from, to)
    }
}
