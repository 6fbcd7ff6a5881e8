//! Graph boundary nodes. A group input hands host-staged geometry to the graph; a group
//! output marks the geometry the host reads back.

use geonodes_geometry_core::GeometrySet;

use crate::error::ContractViolation;
use crate::eval::GeoNodeExecParams;
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::NodeSettings;

pub fn declare_input(_settings: &NodeSettings) -> NodeDeclaration {
    NodeDeclaration {
        inputs: vec![SocketDeclaration::geometry("Geometry")
            .description("Filled from the runtime's staged input of the same name")],
        outputs: vec![SocketDeclaration::geometry("Geometry")],
    }
}

pub fn execute_input(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let geometry: GeometrySet = params.extract_input("Geometry")?;
    params.set_output("Geometry", geometry)
}

pub fn declare_output(_settings: &NodeSettings) -> NodeDeclaration {
    NodeDeclaration {
        inputs: vec![SocketDeclaration::geometry("Geometry")],
        outputs: vec![SocketDeclaration::geometry("Geometry").description("Result of the graph")],
    }
}

pub fn execute_output(params: &mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation> {
    let geometry: GeometrySet = params.extract_input("Geometry")?;
    params.set_output("Geometry", geometry)
}
