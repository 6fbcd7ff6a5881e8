//! Built-in node types.
//!
//! Each node module exposes a `declare` function (sockets for the given settings) and an
//! `execute` function (the node body), and registers them in [`register_builtin`].

use geonodes_geometry_core::{
    CurveComponent, GeometryComponent, GeometryComponentType, GeometrySet, MeshComponent,
    PointCloudComponent,
};

use crate::error::ContractViolation;
use crate::schema::{NodeRegistry, NodeTypeInfo};
use crate::types::NodeType;

pub mod attribute_fill;
pub mod attribute_math;
pub mod attribute_mix;
pub mod curve_star;
pub mod group;
pub mod mesh_line;
pub mod points_to_volume;
pub mod uv_sphere;

/// Component types attribute nodes operate on and volumes are built from.
pub(crate) const REALIZED_TYPES: [GeometryComponentType; 3] = [
    GeometryComponentType::Mesh,
    GeometryComponentType::PointCloud,
    GeometryComponentType::Curve,
];

/// Run `f` on the mesh, point cloud and curve components present in `geometry`, making
/// each one exclusive to `geometry` first.
pub(crate) fn for_each_realized_component(
    geometry: &mut GeometrySet,
    mut f: impl FnMut(&mut dyn GeometryComponent) -> Result<(), ContractViolation>,
) -> Result<(), ContractViolation> {
    if geometry.has::<MeshComponent>() {
        f(geometry.get_component_for_write::<MeshComponent>())?;
    }
    if geometry.has::<PointCloudComponent>() {
        f(geometry.get_component_for_write::<PointCloudComponent>())?;
    }
    if geometry.has::<CurveComponent>() {
        f(geometry.get_component_for_write::<CurveComponent>())?;
    }
    Ok(())
}

pub(crate) fn normalized(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len > f32::EPSILON {
        [v[0] / len, v[1] / len, v[2] / len]
    } else {
        [0.0; 3]
    }
}

pub fn register_builtin(registry: &mut NodeRegistry) {
    let nodes = [
        NodeTypeInfo {
            node_type: NodeType::GroupInput,
            name: "Group Input",
            category: "Group",
            declare: group::declare_input,
            execute: group::execute_input,
        },
        NodeTypeInfo {
            node_type: NodeType::GroupOutput,
            name: "Group Output",
            category: "Group",
            declare: group::declare_output,
            execute: group::execute_output,
        },
        NodeTypeInfo {
            node_type: NodeType::MeshPrimitiveUvSphere,
            name: "UV Sphere",
            category: "Mesh Primitives",
            declare: uv_sphere::declare,
            execute: uv_sphere::execute,
        },
        NodeTypeInfo {
            node_type: NodeType::MeshPrimitiveLine,
            name: "Mesh Line",
            category: "Mesh Primitives",
            declare: mesh_line::declare,
            execute: mesh_line::execute,
        },
        NodeTypeInfo {
            node_type: NodeType::CurveStar,
            name: "Star",
            category: "Curve Primitives",
            declare: curve_star::declare,
            execute: curve_star::execute,
        },
        NodeTypeInfo {
            node_type: NodeType::AttributeMath,
            name: "Attribute Math",
            category: "Attribute",
            declare: attribute_math::declare,
            execute: attribute_math::execute,
        },
        NodeTypeInfo {
            node_type: NodeType::AttributeMix,
            name: "Attribute Mix",
            category: "Attribute",
            declare: attribute_mix::declare,
            execute: attribute_mix::execute,
        },
        NodeTypeInfo {
            node_type: NodeType::AttributeFill,
            name: "Attribute Fill",
            category: "Attribute",
            declare: attribute_fill::declare,
            execute: attribute_fill::execute,
        },
        NodeTypeInfo {
            node_type: NodeType::PointsToVolume,
            name: "Points to Volume",
            category: "Volume",
            declare: points_to_volume::declare,
            execute: points_to_volume::execute,
        },
    ];
    for info in nodes {
        registry.register(info);
    }
}
