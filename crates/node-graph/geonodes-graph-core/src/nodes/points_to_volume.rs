//! Points to Volume: a `density` fog grid covering a sphere around every point of the
//! mesh, point cloud and curve components.

use geonodes_api_core::{DataType, Value};
use geonodes_geometry_core::{
    AttributeDomain, CurveComponent, GeometryComponent, GeometrySet, MeshComponent,
    PointCloudComponent, VolumeComponent, VolumeGrid, POSITION,
};

use crate::error::ContractViolation;
use crate::eval::{GeoNodeExecParams, NodeWarningType};
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::{AttributeInputMode, NodeSettings, VolumeResolutionMode};

use super::REALIZED_TYPES;

pub const DENSITY_GRID: &str = "density";

const DEFAULT_RADIUS: f32 = 0.5;
const VOXEL_SIZE_MIN: f32 = 0.01;

pub fn declare(settings: &NodeSettings) -> NodeDeclaration {
    let by_amount = settings.resolution_mode == VolumeResolutionMode::Amount;
    let radius_is_attribute = settings.input_type_radius == AttributeInputMode::Attribute;
    NodeDeclaration {
        inputs: vec![
            SocketDeclaration::geometry("Points"),
            SocketDeclaration::float("Density").default(Value::Float(1.0)).min(0.0),
            SocketDeclaration::float("Voxel Size")
                .default(Value::Float(0.3))
                .min(VOXEL_SIZE_MIN)
                .available(!by_amount),
            SocketDeclaration::float("Voxel Amount")
                .default(Value::Float(64.0))
                .min(0.0)
                .available(by_amount),
            SocketDeclaration::string("Radius").available(radius_is_attribute),
            SocketDeclaration::float("Radius")
                .identifier("Radius_001")
                .default(Value::Float(DEFAULT_RADIUS))
                .min(0.0)
                .available(!radius_is_attribute),
        ],
        outputs: vec![SocketDeclaration::geometry("Volume")],
    }
}

pub fn execute(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let mut geometry: GeometrySet = params.extract_input("Points")?;
    let density: f32 = params.extract_input("Density")?;
    let mode = params.settings().resolution_mode;
    let resolution: f32 = match mode {
        VolumeResolutionMode::Size => params.extract_input("Voxel Size")?,
        VolumeResolutionMode::Amount => params.extract_input("Voxel Amount")?,
    };
    if density < 0.0 || density.is_nan() {
        params.error_message_add(NodeWarningType::Info, "Density must not be negative");
        return params.set_output("Volume", geometry);
    }
    if mode == VolumeResolutionMode::Size && (resolution < VOXEL_SIZE_MIN || resolution.is_nan()) {
        params.error_message_add(
            NodeWarningType::Info,
            format!("Voxel Size must be at least {VOXEL_SIZE_MIN}"),
        );
        return params.set_output("Volume", geometry);
    }

    let mut positions = Vec::new();
    let mut radii = Vec::new();
    for component in geometry.components() {
        if REALIZED_TYPES.contains(&component.component_type()) {
            gather_point_data(params, component, &mut positions, &mut radii)?;
        }
    }
    if positions.is_empty() {
        return params.set_output("Volume", geometry);
    }

    let max_radius = radii.iter().copied().fold(0.0f32, f32::max);
    let voxel_size = match mode {
        VolumeResolutionMode::Size => resolution,
        VolumeResolutionMode::Amount => geometry
            .compute_boundbox_without_instances()
            .map_or(0.0, |bounds| voxel_size_for_amount(bounds, max_radius, resolution)),
    };
    if voxel_size.is_nan() || voxel_size <= 0.0 {
        return params.set_output("Volume", geometry);
    }

    let grid = match VolumeGrid::from_spheres(DENSITY_GRID, voxel_size, &positions, &radii, density) {
        Ok(grid) => grid,
        Err(err) => {
            log::warn!("{}: {err}", params.node_id());
            params.error_message_add(NodeWarningType::Info, "Volume resolution is too high");
            return params.set_output("Volume", geometry);
        }
    };
    log::debug!(
        "{}: {} points into {} voxels of size {voxel_size}",
        params.node_id(),
        positions.len(),
        grid.active_voxels()
    );

    geometry.remove::<MeshComponent>();
    geometry.remove::<PointCloudComponent>();
    geometry.remove::<CurveComponent>();
    geometry.get_component_for_write::<VolumeComponent>().add_grid(grid);
    params.set_output("Volume", geometry)
}

/// Voxel size that splits the bounding box diagonal, extended by `radius` on both ends, into
/// `amount` voxels. Zero when `amount <= 1`.
pub fn voxel_size_for_amount(bounds: ([f32; 3], [f32; 3]), radius: f32, amount: f32) -> f32 {
    if amount <= 1.0 || amount.is_nan() {
        return 0.0;
    }
    let (min, max) = bounds;
    let diagonal = (0..3).map(|k| (max[k] - min[k]).powi(2)).sum::<f32>().sqrt();
    (diagonal + 2.0 * radius) / amount
}

fn gather_point_data(
    params: &mut GeoNodeExecParams<'_>,
    component: &dyn GeometryComponent,
    positions: &mut Vec<[f32; 3]>,
    radii: &mut Vec<f32>,
) -> Result<(), ContractViolation> {
    let size = component.attribute_domain_size(AttributeDomain::Point);
    match component
        .attribute_try_get_for_read(POSITION, AttributeDomain::Point, DataType::Float3)
        .as_ref()
        .and_then(|view| view.typed::<[f32; 3]>())
    {
        Some(view) => positions.extend(view.iter()),
        None => positions.extend(std::iter::repeat([0.0; 3]).take(size)),
    }

    let radius = params.get_input_attribute(
        "Radius",
        component,
        AttributeDomain::Point,
        DataType::Float,
        Some(&Value::Float(DEFAULT_RADIUS)),
    )?;
    match radius.typed::<f32>() {
        Some(view) => radii.extend(view.iter()),
        None => radii.extend(std::iter::repeat(DEFAULT_RADIUS).take(size)),
    }
    Ok(())
}
