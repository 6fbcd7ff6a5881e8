//! Mesh line primitive: `count` vertices joined by `count - 1` edges.

use geonodes_api_core::Value;
use geonodes_geometry_core::{GeometrySet, Mesh};

use crate::error::ContractViolation;
use crate::eval::{GeoNodeExecParams, NodeWarningType};
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::{MeshLineCountMode, MeshLineMode, NodeSettings};

use super::normalized;

const COUNT_MAX: i32 = 10000;

pub fn declare(settings: &NodeSettings) -> NodeDeclaration {
    let end_points = settings.mode == MeshLineMode::EndPoints;
    let by_resolution = settings.count_mode == MeshLineCountMode::Resolution;
    NodeDeclaration {
        inputs: vec![
            SocketDeclaration::int("Count")
                .default(Value::Int(10))
                .min(1.0)
                .max(COUNT_MAX as f32)
                .description("Number of vertices on the line")
                .available(!end_points || !by_resolution),
            SocketDeclaration::float("Resolution")
                .default(Value::Float(1.0))
                .min(0.1)
                .description("Length of each individual edge")
                .available(end_points && by_resolution),
            SocketDeclaration::vector("Start Location").description("Position of the first vertex"),
            SocketDeclaration::vector("Offset")
                .default(Value::Vec3([0.0, 0.0, 1.0]))
                .description(if end_points {
                    "Position of the last vertex"
                } else {
                    "Vector between consecutive vertices"
                }),
        ],
        outputs: vec![SocketDeclaration::geometry("Mesh")],
    }
}

pub fn execute(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let settings = params.settings().clone();
    let start: [f32; 3] = params.extract_input("Start Location")?;

    let (count, delta) = match settings.mode {
        MeshLineMode::EndPoints => {
            let end: [f32; 3] = params.extract_input("Offset")?;
            let total = sub(end, start);
            match settings.count_mode {
                MeshLineCountMode::Resolution => {
                    let resolution = params.extract_input::<f32>("Resolution")?.max(0.0001);
                    let count = (f64::from(length(total)) / f64::from(resolution)).floor() + 1.0;
                    (count, scale(normalized(total), resolution))
                }
                MeshLineCountMode::Total => {
                    let count: i32 = params.extract_input("Count")?;
                    let delta = if count > 1 {
                        scale(total, 1.0 / (count - 1) as f32)
                    } else {
                        [0.0; 3]
                    };
                    (f64::from(count), delta)
                }
            }
        }
        MeshLineMode::Offset => {
            let count: i32 = params.extract_input("Count")?;
            let delta: [f32; 3] = params.extract_input("Offset")?;
            (f64::from(count), delta)
        }
    };

    let count_mode = match settings.mode {
        MeshLineMode::EndPoints => settings.count_mode,
        MeshLineMode::Offset => MeshLineCountMode::Total,
    };
    if let Some(message) = line_count_error(count, count_mode) {
        params.error_message_add(NodeWarningType::Info, message);
        return params.set_output("Mesh", GeometrySet::new());
    }
    let mesh = create_line_mesh(start, delta, count as usize);
    params.set_output("Mesh", GeometrySet::create_with_mesh(mesh))
}

/// Rejects counts outside `1..=COUNT_MAX`, including NaN and infinity.
pub fn line_count_error(count: f64, count_mode: MeshLineCountMode) -> Option<String> {
    if count.is_nan() || count < 1.0 {
        return Some("Count must be at least 1".to_string());
    }
    if count > f64::from(COUNT_MAX) {
        return Some(match count_mode {
            MeshLineCountMode::Resolution => {
                format!("Line would need more than {COUNT_MAX} vertices at this resolution")
            }
            MeshLineCountMode::Total => format!("Count must be at most {COUNT_MAX}"),
        });
    }
    None
}

/// `count` vertices starting at `start`, each `delta` from the previous one.
pub fn create_line_mesh(start: [f32; 3], delta: [f32; 3], count: usize) -> Mesh {
    let mut mesh = Mesh::new_nomain(count, count.saturating_sub(1), 0, 0);
    for (i, position) in mesh.positions_mut().iter_mut().enumerate() {
        *position = add(start, scale(delta, i as f32));
    }
    mesh.set_vert_normals(vec![normalized(delta); count]);
    for (i, edge) in mesh.edges_mut().iter_mut().enumerate() {
        *edge = [i as u32, i as u32 + 1];
    }
    mesh
}

fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(v: [f32; 3], s: f32) -> [f32; 3] {
    v.map(|c| c * s)
}

fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_space_vertices_by_delta() {
        let mesh = create_line_mesh([1.0, 0.0, 0.0], [0.0, 0.0, 2.0], 3);
        assert_eq!(mesh.positions(), &[[1.0, 0.0, 0.0], [1.0, 0.0, 2.0], [1.0, 0.0, 4.0]]);
        assert_eq!(mesh.edges(), &[[0, 1], [1, 2]]);
        assert_eq!(mesh.vert_normals()[0], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.validate(), Ok(()));
    }

    #[test]
    fn it_should_build_a_single_vertex_without_edges() {
        let mesh = create_line_mesh([0.0; 3], [0.0; 3], 1);
        assert_eq!(mesh.verts_num(), 1);
        assert_eq!(mesh.edges_num(), 0);
    }

    #[test]
    fn it_should_bound_the_vertex_count() {
        assert_eq!(line_count_error(1.0, MeshLineCountMode::Total), None);
        assert_eq!(line_count_error(10000.0, MeshLineCountMode::Total), None);
        assert_eq!(
            line_count_error(0.0, MeshLineCountMode::Total).as_deref(),
            Some("Count must be at least 1")
        );
        assert_eq!(
            line_count_error(10001.0, MeshLineCountMode::Total).as_deref(),
            Some("Count must be at most 10000")
        );
        assert!(line_count_error(1e10 + 1.0, MeshLineCountMode::Resolution).is_some());
        assert!(line_count_error(f64::INFINITY, MeshLineCountMode::Resolution).is_some());
        assert!(line_count_error(f64::NAN, MeshLineCountMode::Resolution).is_some());
    }

    #[test]
    fn it_should_toggle_sockets_with_the_mode() {
        let offset = declare(&NodeSettings::default());
        assert!(offset.input("Count").unwrap().available);
        assert!(!offset.input("Resolution").unwrap().available);

        let settings = NodeSettings {
            mode: MeshLineMode::EndPoints,
            count_mode: MeshLineCountMode::Resolution,
            ..NodeSettings::default()
        };
        let by_resolution = declare(&settings);
        assert!(!by_resolution.input("Count").unwrap().available);
        assert!(by_resolution.input("Resolution").unwrap().available);
    }
}
