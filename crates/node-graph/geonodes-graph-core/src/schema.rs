//! Socket declarations and the node type registry.

use geonodes_api_core::Value;
use geonodes_geometry_core::GeometryComponentType;
use hashbrown::HashMap;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::ContractViolation;
use crate::eval::GeoNodeExecParams;
use crate::types::{NodeSettings, NodeType, SocketType, SocketValue};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SocketDeclaration {
    /// Unique within the node's inputs (or outputs).
    pub identifier: String,
    /// Display name. Several sockets may share a name as long as only one is available.
    pub name: String,
    pub socket_type: SocketType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f32>,
    pub description: &'static str,
    pub available: bool,
    pub only_realized_data: bool,
    pub only_instances: bool,
    /// Component types a geometry input understands; empty accepts all.
    pub supported_types: Vec<GeometryComponentType>,
}

impl SocketDeclaration {
    pub fn new(name: impl Into<String>, socket_type: SocketType) -> Self {
        let name = name.into();
        SocketDeclaration {
            identifier: name.clone(),
            name,
            socket_type,
            default_value: None,
            min: None,
            max: None,
            description: "",
            available: true,
            only_realized_data: false,
            only_instances: false,
            supported_types: Vec::new(),
        }
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, SocketType::Float)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, SocketType::Int)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, SocketType::Bool)
    }

    pub fn vector(name: impl Into<String>) -> Self {
        Self::new(name, SocketType::Vector)
    }

    pub fn color(name: impl Into<String>) -> Self {
        Self::new(name, SocketType::Color)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, SocketType::String)
    }

    pub fn geometry(name: impl Into<String>) -> Self {
        Self::new(name, SocketType::Geometry)
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    pub fn default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn min(mut self, min: f32) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn description(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    pub fn only_realized_data(mut self) -> Self {
        self.only_realized_data = true;
        self
    }

    pub fn only_instances(mut self) -> Self {
        self.only_instances = true;
        self
    }

    pub fn supported_type(mut self, types: &[GeometryComponentType]) -> Self {
        self.supported_types = types.to_vec();
        self
    }

    /// Value used when the socket is neither linked nor given a literal.
    pub fn default_socket_value(&self) -> SocketValue {
        self.default_value
            .as_ref()
            .and_then(|v| SocketValue::from_value(v, self.socket_type))
            .unwrap_or_else(|| self.socket_type.default_value())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeDeclaration {
    pub inputs: Vec<SocketDeclaration>,
    pub outputs: Vec<SocketDeclaration>,
}

impl NodeDeclaration {
    pub fn input(&self, identifier: &str) -> Option<&SocketDeclaration> {
        self.inputs.iter().find(|s| s.identifier == identifier)
    }

    pub fn output(&self, identifier: &str) -> Option<&SocketDeclaration> {
        self.outputs.iter().find(|s| s.identifier == identifier)
    }

    /// The available input displayed as `name`, if any.
    pub fn available_input_by_name(&self, name: &str) -> Option<&SocketDeclaration> {
        self.inputs.iter().find(|s| s.available && s.name == name)
    }

    pub fn input_identifiers(&self) -> Vec<String> {
        self.inputs.iter().map(|s| s.identifier.clone()).collect()
    }

    pub fn output_identifiers(&self) -> Vec<String> {
        self.outputs.iter().map(|s| s.identifier.clone()).collect()
    }

    /// Identifiers of the inputs enabled for the current settings.
    pub fn available_input_identifiers(&self) -> Vec<String> {
        available_identifiers(&self.inputs)
    }

    pub fn available_output_identifiers(&self) -> Vec<String> {
        available_identifiers(&self.outputs)
    }
}

fn available_identifiers(sockets: &[SocketDeclaration]) -> Vec<String> {
    sockets
        .iter()
        .filter(|s| s.available)
        .map(|s| s.identifier.clone())
        .collect()
}

pub type DeclareFn = fn(&NodeSettings) -> NodeDeclaration;
pub type ExecuteFn = fn(&mut GeoNodeExecParams<'_>) -> Result<(), ContractViolation>;

#[derive(Debug, Clone, Copy)]
pub struct NodeTypeInfo {
    pub node_type: NodeType,
    /// Display name; also the default node label.
    pub name: &'static str,
    pub category: &'static str,
    pub declare: DeclareFn,
    pub execute: ExecuteFn,
}

#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<NodeType, NodeTypeInfo>,
}

static BUILTIN: Lazy<NodeRegistry> = Lazy::new(|| {
    let mut registry = NodeRegistry::new();
    crate::nodes::register_builtin(&mut registry);
    registry
});

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every node type shipped with this crate.
    pub fn builtin() -> &'static NodeRegistry {
        &BUILTIN
    }

    /// Add or replace the entry for `info.node_type`.
    pub fn register(&mut self, info: NodeTypeInfo) -> Option<NodeTypeInfo> {
        self.nodes.insert(info.node_type, info)
    }

    pub fn get(&self, node_type: NodeType) -> Option<&NodeTypeInfo> {
        self.nodes.get(&node_type)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NodeTypeInfo> {
        self.nodes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_default_converts_to_socket_type() {
        let socket = SocketDeclaration::float("Radius").default(Value::Int(2));
        assert_eq!(socket.default_socket_value(), SocketValue::Float(2.0));
        assert_eq!(
            SocketDeclaration::geometry("Geometry").default_socket_value().socket_type(),
            SocketType::Geometry
        );
    }

    #[test]
    fn lookup_by_name_skips_unavailable_sockets() {
        let decl = NodeDeclaration {
            inputs: vec![
                SocketDeclaration::string("A").available(false),
                SocketDeclaration::float("A").identifier("A_001"),
            ],
            outputs: vec![],
        };
        assert_eq!(decl.available_input_by_name("A").unwrap().identifier, "A_001");
        assert!(decl.available_input_by_name("B").is_none());
    }

    #[test]
    fn every_builtin_node_declares_unique_identifiers() {
        let registry = NodeRegistry::builtin();
        assert!(!registry.is_empty());
        for info in registry.iter() {
            let decl = (info.declare)(&NodeSettings::default());
            for sockets in [decl.input_identifiers(), decl.output_identifiers()] {
                let mut ids = sockets.clone();
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), sockets.len(), "{}", info.name);
            }
        }
    }

    #[test]
    fn declarations_serialize_for_introspection() {
        let registry = NodeRegistry::builtin();
        let info = registry.get(NodeType::MeshPrimitiveUvSphere).unwrap();
        let json = serde_json::to_value((info.declare)(&NodeSettings::default())).unwrap();
        assert_eq!(json["inputs"][0]["name"], "Segments");
        assert_eq!(json["inputs"][0]["socket_type"], "int");
    }
}
