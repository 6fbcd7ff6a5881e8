//! Star curve primitive: one cyclic poly curve alternating outer and inner points.

use std::f32::consts::PI;

use geonodes_api_core::{DataType, Value};
use geonodes_geometry_core::{
    AttributeDomain, CurveComponent, CurvesGeometry, GArray, GeometryComponent, GeometrySet,
};

use crate::error::ContractViolation;
use crate::eval::GeoNodeExecParams;
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::NodeSettings;

/// Point attribute selecting the outer points.
pub const OUTER_POINTS: &str = "outer_points";

pub fn declare(_settings: &NodeSettings) -> NodeDeclaration {
    NodeDeclaration {
        inputs: vec![
            SocketDeclaration::int("Points")
                .default(Value::Int(8))
                .min(3.0)
                .max(256.0)
                .description("Number of points on each of the circles"),
            SocketDeclaration::float("Inner Radius")
                .default(Value::Float(1.0))
                .min(0.0)
                .description("Radius of the inner circle; can be larger than outer radius"),
            SocketDeclaration::float("Outer Radius")
                .default(Value::Float(2.0))
                .min(0.0)
                .description("Radius of the outer circle; can be smaller than inner radius"),
            SocketDeclaration::float("Twist")
                .description("The counterclockwise rotation of the inner set of points"),
        ],
        outputs: vec![
            SocketDeclaration::geometry("Curve"),
            SocketDeclaration::string("Outer Points")
                .description("Name of a boolean point attribute selecting the outer points"),
        ],
    }
}

pub fn execute(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let points: i32 = params.extract_input("Points")?;
    let inner_radius: f32 = params.extract_input("Inner Radius")?;
    let outer_radius: f32 = params.extract_input("Outer Radius")?;
    let twist: f32 = params.extract_input("Twist")?;

    let curves = create_star_curve(
        inner_radius.max(0.0),
        outer_radius.max(0.0),
        twist,
        points.max(3) as usize,
    );
    let mut geometry = GeometrySet::create_with_curve(curves);

    if params.output_is_required("Outer Points") {
        let component = geometry.get_component_for_write::<CurveComponent>();
        let size = component.attribute_domain_size(AttributeDomain::Point);
        if let Some(selection) =
            component.attribute_try_get_for_output_only(OUTER_POINTS, AttributeDomain::Point, DataType::Bool)
        {
            *selection = GArray::Bool((0..size).map(|i| i % 2 == 0).collect());
            log::debug!("{} wrote attribute '{OUTER_POINTS}'", params.attribute_producer_name());
        }
        params.set_output("Outer Points", OUTER_POINTS.to_string())?;
    }
    params.set_output("Curve", geometry)
}

/// `points` outer points on a circle of `outer_radius`, each followed by an inner point
/// half a step further round (plus `twist`) on a circle of `inner_radius`.
pub fn create_star_curve(inner_radius: f32, outer_radius: f32, twist: f32, points: usize) -> CurvesGeometry {
    let mut curves = CurvesGeometry::from_curve_sizes(&[points * 2]);
    curves.cyclic_mut().fill(true);

    let theta_step = (2.0 * PI) / points as f32;
    for (i, pair) in curves.positions_mut().chunks_exact_mut(2).enumerate() {
        let x = i as f32 * theta_step;
        pair[0] = [outer_radius * x.cos(), outer_radius * x.sin(), 0.0];

        let inner_theta = x + theta_step * 0.5 + twist;
        pair[1] = [inner_radius * inner_theta.cos(), inner_radius * inner_theta.sin(), 0.0];
    }
    curves
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_should_alternate_outer_and_inner_points() {
        let curves = create_star_curve(1.0, 2.0, 0.0, 4);
        assert_eq!(curves.points_num(), 8);
        assert_eq!(curves.curves_num(), 1);
        assert_eq!(curves.cyclic(), vec![true]);

        let p = curves.positions();
        assert!((p[0][0] - 2.0).abs() < 1e-6 && p[0][1].abs() < 1e-6);
        let inner = (p[1][0] * p[1][0] + p[1][1] * p[1][1]).sqrt();
        assert!((inner - 1.0).abs() < 1e-5);
        // Half a step between the first outer point and the first inner point.
        assert!((p[1][1].atan2(p[1][0]) - PI / 4.0).abs() < 1e-5);
    }

    #[test]
    fn it_should_rotate_inner_points_by_twist() {
        let curves = create_star_curve(1.0, 2.0, PI / 4.0, 4);
        let p = curves.positions()[1];
        assert!((p[1].atan2(p[0]) - PI / 2.0).abs() < 1e-5);
    }
}
