//! Attribute Fill: set every element of an attribute to one value.

use geonodes_api_core::{DataType, Value};
use geonodes_geometry_core::{AttributeDomain, GArray, GeometryComponent, GeometrySet};

use crate::error::ContractViolation;
use crate::eval::GeoNodeExecParams;
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::{NodeSettings, SocketValue};

use super::{for_each_realized_component, REALIZED_TYPES};

fn data_type(settings: &NodeSettings) -> DataType {
    settings.data_type.unwrap_or(DataType::Float)
}

/// Identifier of the value socket used for `data_type`.
fn value_identifier(data_type: DataType) -> &'static str {
    match data_type {
        DataType::Float2 | DataType::Float3 => "Value",
        DataType::Float => "Value_001",
        DataType::Color => "Value_002",
        DataType::Bool => "Value_003",
        DataType::Int32 => "Value_004",
    }
}

pub fn declare(settings: &NodeSettings) -> NodeDeclaration {
    let active = value_identifier(data_type(settings));
    let values = [
        SocketDeclaration::vector("Value").identifier("Value"),
        SocketDeclaration::float("Value").identifier("Value_001"),
        SocketDeclaration::color("Value").identifier("Value_002"),
        SocketDeclaration::boolean("Value").identifier("Value_003"),
        SocketDeclaration::int("Value").identifier("Value_004"),
    ];
    let mut inputs = vec![
        SocketDeclaration::geometry("Geometry")
            .only_realized_data()
            .supported_type(&REALIZED_TYPES),
        SocketDeclaration::string("Attribute"),
    ];
    inputs.extend(values.into_iter().map(|socket| {
        let available = socket.identifier == active;
        socket.available(available)
    }));
    NodeDeclaration {
        inputs,
        outputs: vec![SocketDeclaration::geometry("Geometry")],
    }
}

pub fn execute(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let mut geometry: GeometrySet = params.extract_input("Geometry")?;
    params.check_input_geometry_set("Geometry", &geometry)?;

    let data_type = data_type(params.settings());
    let value = match data_type {
        DataType::Float2 | DataType::Float3 => SocketValue::Vector(params.get_input("Value")?),
        DataType::Float => SocketValue::Float(params.get_input("Value_001")?),
        DataType::Color => SocketValue::Color(params.get_input("Value_002")?),
        DataType::Bool => SocketValue::Bool(params.get_input("Value_003")?),
        DataType::Int32 => SocketValue::Int(params.get_input("Value_004")?),
    };
    let value = value.to_value().unwrap_or_else(|| data_type.default_value());

    for_each_realized_component(&mut geometry, |component| {
        fill_attribute_on_component(component, params, data_type, &value)
    })?;
    params.set_output("Geometry", geometry)
}

fn get_result_domain(
    component: &dyn GeometryComponent,
    params: &GeoNodeExecParams<'_>,
    attribute_name: &str,
) -> AttributeDomain {
    if let Some(domain) = params.settings().domain {
        return domain;
    }
    component
        .attribute_get_meta_data(attribute_name)
        .map_or(AttributeDomain::Point, |meta| meta.domain)
}

fn fill_attribute_on_component(
    component: &mut dyn GeometryComponent,
    params: &mut GeoNodeExecParams<'_>,
    data_type: DataType,
    value: &Value,
) -> Result<(), ContractViolation> {
    let attribute_name: String = params.get_input("Attribute")?;
    if attribute_name.is_empty() {
        return Ok(());
    }
    let domain = get_result_domain(&*component, params, &attribute_name);
    let size = component.attribute_domain_size(domain);

    let Some(attribute) = component.attribute_try_get_for_output_only(&attribute_name, domain, data_type) else {
        return Ok(());
    };
    match GArray::filled(data_type, value, size) {
        Ok(filled) => *attribute = filled,
        Err(err) => log::warn!("cannot fill '{attribute_name}' with {value:?}: {err}"),
    }
    Ok(())
}
