//! Attribute Mix: linear interpolation between `A` and `B` by `Factor`.
//!
//! The result type is the more complex of the two input types, so mixing a float attribute
//! with a color produces a color.

use geonodes_api_core::{DataType, Value};
use geonodes_geometry_core::{
    AttributeDomain, AttributeType, GArray, GeometryComponent, GeometrySet, TypedVArray, VArray,
};

use crate::error::ContractViolation;
use crate::eval::GeoNodeExecParams;
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::{AttributeInputMode, NodeSettings};

use super::{for_each_realized_component, REALIZED_TYPES};

const DEFAULT_FACTOR: f32 = 0.5;

/// The attribute name socket plus one literal socket per input mode, all displayed as `name`.
fn mixable_input(name: &'static str, mode: AttributeInputMode) -> [SocketDeclaration; 4] {
    [
        SocketDeclaration::string(name).available(mode == AttributeInputMode::Attribute),
        SocketDeclaration::float(name)
            .identifier(format!("{name}_001"))
            .default(Value::Float(0.5))
            .min(0.0)
            .max(1.0)
            .available(mode == AttributeInputMode::Float),
        SocketDeclaration::vector(name)
            .identifier(format!("{name}_002"))
            .available(mode == AttributeInputMode::Vector),
        SocketDeclaration::color(name)
            .identifier(format!("{name}_003"))
            .default(Value::ColorRgba([0.5, 0.5, 0.5, 1.0]))
            .available(mode == AttributeInputMode::Color),
    ]
}

pub fn declare(settings: &NodeSettings) -> NodeDeclaration {
    let factor_is_attribute = settings.input_type_factor == AttributeInputMode::Attribute;
    let mut inputs = vec![
        SocketDeclaration::geometry("Geometry")
            .only_realized_data()
            .supported_type(&REALIZED_TYPES),
        SocketDeclaration::string("Factor").available(factor_is_attribute),
        SocketDeclaration::float("Factor")
            .identifier("Factor_001")
            .default(Value::Float(DEFAULT_FACTOR))
            .min(0.0)
            .max(1.0)
            .available(!factor_is_attribute),
    ];
    inputs.extend(mixable_input("A", settings.input_type_a));
    inputs.extend(mixable_input("B", settings.input_type_b));
    inputs.push(SocketDeclaration::string("Result"));
    NodeDeclaration {
        inputs,
        outputs: vec![SocketDeclaration::geometry("Geometry")],
    }
}

pub fn execute(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let mut geometry: GeometrySet = params.extract_input("Geometry")?;
    params.check_input_geometry_set("Geometry", &geometry)?;
    for_each_realized_component(&mut geometry, |component| attribute_mix_calc(component, params))?;
    params.set_output("Geometry", geometry)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_n<const N: usize>(a: [f32; N], b: [f32; N], t: f32) -> [f32; N] {
    std::array::from_fn(|i| lerp(a[i], b[i], t))
}

fn mix_typed<T: AttributeType>(
    factor: &TypedVArray<'_, f32>,
    a: &VArray<'_>,
    b: &VArray<'_>,
    mix: impl Fn(T, T, f32) -> T,
) -> Vec<T> {
    let (Some(a), Some(b)) = (a.typed::<T>(), b.typed::<T>()) else {
        return vec![T::default(); factor.len()];
    };
    (0..factor.len())
        .map(|i| mix(a.get(i), b.get(i), factor.get(i)))
        .collect()
}

/// Mix `a` and `b`, both already of `data_type`.
pub fn mix_arrays(data_type: DataType, factor: &TypedVArray<'_, f32>, a: &VArray<'_>, b: &VArray<'_>) -> GArray {
    match data_type {
        DataType::Float => mix_typed::<f32>(factor, a, b, lerp).into(),
        DataType::Int32 => mix_typed::<i32>(factor, a, b, |a, b, t| {
            lerp(a as f32, b as f32, t).round() as i32
        })
        .into(),
        DataType::Bool => mix_typed::<bool>(factor, a, b, |a, b, t| if t < 0.5 { a } else { b }).into(),
        DataType::Float2 => mix_typed::<[f32; 2]>(factor, a, b, lerp_n).into(),
        DataType::Float3 => mix_typed::<[f32; 3]>(factor, a, b, lerp_n).into(),
        DataType::Color => mix_typed::<[f32; 4]>(factor, a, b, lerp_n).into(),
    }
}

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

fn attribute_mix_calc(
    component: &mut dyn GeometryComponent,
    params: &mut GeoNodeExecParams<'_>,
) -> Result<(), ContractViolation> {
    let result_name: String = params.get_input("Result")?;
    if result_name.is_empty() {
        return Ok(());
    }

    let result_type = DataType::highest_complexity([
        params.get_input_attribute_data_type("A", &*component, DataType::Float)?,
        params.get_input_attribute_data_type("B", &*component, DataType::Float)?,
    ])
    .unwrap_or(DataType::Float);
    let domain = get_result_domain(&*component, params, &result_name)?;

    let mixed = {
        let factor = params.get_input_attribute(
            "Factor",
            &*component,
            domain,
            DataType::Float,
            Some(&Value::Float(DEFAULT_FACTOR)),
        )?;
        let a = params.get_input_attribute("A", &*component, domain, result_type, None)?;
        let b = params.get_input_attribute("B", &*component, domain, result_type, None)?;
        let Some(factor) = factor.typed::<f32>() else {
            return Ok(());
        };
        mix_arrays(result_type, &factor, &a, &b)
    };

    let Some(result) = component.attribute_try_get_for_output_only(&result_name, domain, result_type) else {
        return Ok(());
    };
    *result = mixed;
    Ok(())
}
