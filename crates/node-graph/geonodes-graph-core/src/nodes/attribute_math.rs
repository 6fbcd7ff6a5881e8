//! Attribute Math: `Result = A <operation> B` evaluated per element as floats.

use geonodes_api_core::DataType;
use geonodes_geometry_core::{AttributeDomain, GArray, GeometryComponent, GeometrySet};

use crate::error::ContractViolation;
use crate::eval::GeoNodeExecParams;
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::{AttributeInputMode, MathOperation, NodeSettings};

use super::{for_each_realized_component, REALIZED_TYPES};

pub fn declare(settings: &NodeSettings) -> NodeDeclaration {
    let a_is_attribute = settings.input_type_a == AttributeInputMode::Attribute;
    let b_is_attribute = settings.input_type_b == AttributeInputMode::Attribute;
    NodeDeclaration {
        inputs: vec![
            SocketDeclaration::geometry("Geometry")
                .only_realized_data()
                .supported_type(&REALIZED_TYPES),
            SocketDeclaration::string("A").available(a_is_attribute),
            SocketDeclaration::float("A").identifier("A_001").available(!a_is_attribute),
            SocketDeclaration::string("B").available(b_is_attribute),
            SocketDeclaration::float("B").identifier("B_001").available(!b_is_attribute),
            SocketDeclaration::string("Result"),
        ],
        outputs: vec![SocketDeclaration::geometry("Geometry")],
    }
}

pub fn math_operation(operation: MathOperation, a: f32, b: f32) -> f32 {
    match operation {
        MathOperation::Add => a + b,
        MathOperation::Subtract => a - b,
        MathOperation::Multiply => a * b,
        MathOperation::Divide if b == 0.0 => 0.0,
        MathOperation::Divide => a / b,
    }
}

pub fn execute(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let mut geometry: GeometrySet = params.extract_input("Geometry")?;
    params.check_input_geometry_set("Geometry", &geometry)?;
    let operation = params.settings().operation;
    for_each_realized_component(&mut geometry, |component| {
        attribute_math_calc(component, params, operation)
    })?;
    params.set_output("Geometry", geometry)
}

/// Domain for the result: where an existing result attribute lives, otherwise the highest
/// priority domain among the inputs.
fn get_result_domain(
    component: &dyn GeometryComponent,
    params: &GeoNodeExecParams<'_>,
    result_name: &str,
) -> Result<AttributeDomain, ContractViolation> {
    if let Some(meta) = component.attribute_get_meta_data(result_name) {
        return Ok(meta.domain);
    }
    params.get_highest_priority_input_domain(&["A", "B"], component, AttributeDomain::Point)
}

fn attribute_math_calc(
    component: &mut dyn GeometryComponent,
    params: &mut GeoNodeExecParams<'_>,
    operation: MathOperation,
) -> Result<(), ContractViolation> {
    let result_name: String = params.get_input("Result")?;
    if result_name.is_empty() {
        return Ok(());
    }
    let domain = get_result_domain(&*component, params, &result_name)?;

    let values: Vec<f32> = {
        let a = params.get_input_attribute("A", &*component, domain, DataType::Float, None)?;
        let b = params.get_input_attribute("B", &*component, domain, DataType::Float, None)?;
        let (Some(a), Some(b)) = (a.typed::<f32>(), b.typed::<f32>()) else {
            return Ok(());
        };
        a.iter()
            .zip(b.iter())
            .map(|(a, b)| math_operation(operation, a, b))
            .collect()
    };

    let Some(result) = component.attribute_try_get_for_output_only(&result_name, domain, DataType::Float) else {
        return Ok(());
    };
    *result = GArray::Float(values);
    Ok(())
}
