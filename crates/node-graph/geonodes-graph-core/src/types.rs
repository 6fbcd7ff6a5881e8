use std::fmt;

use geonodes_api_core::json::normalize_graph_spec_json;
use geonodes_api_core::{DataType, Value, ValueKind};
use geonodes_geometry_core::{AttributeDomain, GeometrySet};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::error::EvalError;

pub type NodeId = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    // Graph boundary
    GroupInput,
    GroupOutput,

    // Primitives
    MeshPrimitiveUvSphere,
    MeshPrimitiveLine,
    CurveStar,

    // Attributes
    AttributeMath,
    AttributeMix,
    AttributeFill,

    // Volumes
    PointsToVolume,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MathOperation {
    #[default]
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Which of the same-named sockets an attribute node reads an operand from.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttributeInputMode {
    #[default]
    Attribute,
    Float,
    Vector,
    Color,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MeshLineMode {
    #[default]
    Offset,
    EndPoints,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MeshLineCountMode {
    #[default]
    Total,
    Resolution,
}

/// How Points to Volume picks its voxel size.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VolumeResolutionMode {
    /// Split the extended bounding box diagonal into a number of voxels.
    #[default]
    Amount,
    Size,
}

/// Per-node options that change the node's sockets or behaviour rather than flowing
/// through a socket. Each node type reads the fields it understands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeSettings {
    pub operation: MathOperation,
    pub input_type_a: AttributeInputMode,
    pub input_type_b: AttributeInputMode,
    pub input_type_factor: AttributeInputMode,
    pub mode: MeshLineMode,
    pub count_mode: MeshLineCountMode,
    pub resolution_mode: VolumeResolutionMode,
    pub input_type_radius: AttributeInputMode,
    pub data_type: Option<DataType>,
    /// `None` picks the domain automatically.
    pub domain: Option<AttributeDomain>,
    /// Key of the staged host input a group input node reads.
    pub name: Option<String>,
}

impl Default for NodeSettings {
    fn default() -> Self {
        Self {
            operation: MathOperation::Add,
            input_type_a: AttributeInputMode::Attribute,
            input_type_b: AttributeInputMode::Attribute,
            input_type_factor: AttributeInputMode::Float,
            mode: MeshLineMode::Offset,
            count_mode: MeshLineCountMode::Total,
            resolution_mode: VolumeResolutionMode::Amount,
            input_type_radius: AttributeInputMode::Float,
            data_type: None,
            domain: None,
            name: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputConnection {
    pub node_id: NodeId,
    #[serde(default = "default_output_key")]
    pub output_key: String,
}

fn default_output_key() -> String {
    "Geometry".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub settings: NodeSettings,
    /// Literal values for unlinked inputs, keyed by socket identifier.
    #[serde(default)]
    pub values: HashMap<String, Value>,
    /// Links into this node, keyed by socket identifier.
    #[serde(default)]
    pub inputs: HashMap<String, InputConnection>,
}

impl NodeSpec {
    pub fn new(id: impl Into<NodeId>, kind: NodeType) -> Self {
        NodeSpec {
            id: id.into(),
            kind,
            label: None,
            settings: NodeSettings::default(),
            values: HashMap::new(),
            inputs: HashMap::new(),
        }
    }

    pub fn with_settings(mut self, settings: NodeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_value(mut self, identifier: impl Into<String>, value: Value) -> Self {
        self.values.insert(identifier.into(), value);
        self
    }

    pub fn with_link(
        mut self,
        identifier: impl Into<String>,
        node_id: impl Into<NodeId>,
        output_key: impl Into<String>,
    ) -> Self {
        self.inputs.insert(
            identifier.into(),
            InputConnection {
                node_id: node_id.into(),
                output_key: output_key.into(),
            },
        );
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GraphSpec {
    pub nodes: Vec<NodeSpec>,
}

impl GraphSpec {
    /// Parse a graph description, accepting shorthand literals such as `32` or `[0, 0, 1]`.
    pub fn from_json(json: &str) -> Result<GraphSpec, EvalError> {
        let normalized = normalize_graph_spec_json(json)?;
        Ok(serde_json::from_value(normalized)?)
    }

    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// Type of a socket. Geometry is the only type without a literal representation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SocketType {
    Float,
    Int,
    Bool,
    Vector,
    Color,
    String,
    Geometry,
}

impl SocketType {
    /// Literal kind carried by this socket type; `None` for geometry.
    pub fn value_kind(self) -> Option<ValueKind> {
        match self {
            SocketType::Float => Some(ValueKind::Float),
            SocketType::Int => Some(ValueKind::Int),
            SocketType::Bool => Some(ValueKind::Bool),
            SocketType::Vector => Some(ValueKind::Vec3),
            SocketType::Color => Some(ValueKind::ColorRgba),
            SocketType::String => Some(ValueKind::Text),
            SocketType::Geometry => None,
        }
    }

    pub fn default_value(self) -> SocketValue {
        match self {
            SocketType::Float => SocketValue::Float(0.0),
            SocketType::Int => SocketValue::Int(0),
            SocketType::Bool => SocketValue::Bool(false),
            SocketType::Vector => SocketValue::Vector([0.0; 3]),
            SocketType::Color => SocketValue::Color([0.0; 4]),
            SocketType::String => SocketValue::String(String::new()),
            SocketType::Geometry => SocketValue::Geometry(GeometrySet::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SocketType::Float => "Float",
            SocketType::Int => "Integer",
            SocketType::Bool => "Boolean",
            SocketType::Vector => "Vector",
            SocketType::Color => "Color",
            SocketType::String => "String",
            SocketType::Geometry => "Geometry",
        }
    }
}

impl fmt::Display for SocketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value flowing through a socket.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Vector([f32; 3]),
    Color([f32; 4]),
    String(String),
    Geometry(GeometrySet),
}

impl SocketValue {
    pub fn socket_type(&self) -> SocketType {
        match self {
            SocketValue::Float(_) => SocketType::Float,
            SocketValue::Int(_) => SocketType::Int,
            SocketValue::Bool(_) => SocketType::Bool,
            SocketValue::Vector(_) => SocketType::Vector,
            SocketValue::Color(_) => SocketType::Color,
            SocketValue::String(_) => SocketType::String,
            SocketValue::Geometry(_) => SocketType::Geometry,
        }
    }

    /// The literal carried by this socket value; `None` for geometry.
    pub fn to_value(&self) -> Option<Value> {
        Some(match self {
            SocketValue::Float(v) => Value::Float(*v),
            SocketValue::Int(v) => Value::Int(*v),
            SocketValue::Bool(v) => Value::Bool(*v),
            SocketValue::Vector(v) => Value::Vec3(*v),
            SocketValue::Color(v) => Value::ColorRgba(*v),
            SocketValue::String(v) => Value::Text(v.clone()),
            SocketValue::Geometry(_) => return None,
        })
    }

    /// Convert a literal into a value of socket type `ty` using the implicit conversions.
    pub fn from_value(value: &Value, ty: SocketType) -> Option<SocketValue> {
        let converted = value.convert(ty.value_kind()?).ok()?;
        Some(match converted {
            Value::Float(v) => SocketValue::Float(v),
            Value::Int(v) => SocketValue::Int(v),
            Value::Bool(v) => SocketValue::Bool(v),
            Value::Vec3(v) => SocketValue::Vector(v),
            Value::ColorRgba(v) => SocketValue::Color(v),
            Value::Text(v) => SocketValue::String(v),
            Value::Vec2(_) => return None,
        })
    }

    /// Re-express this value as socket type `ty`. Geometry only converts to geometry.
    pub fn convert_to(self, ty: SocketType) -> Option<SocketValue> {
        if self.socket_type() == ty {
            return Some(self);
        }
        SocketValue::from_value(&self.to_value()?, ty)
    }
}

/// Rust types that can be read from and written to sockets of one [`SocketType`].
pub trait SocketData: Sized {
    const SOCKET_TYPE: SocketType;

    fn from_socket(value: SocketValue) -> Option<Self>;

    fn into_socket(self) -> SocketValue;
}

macro_rules! socket_data {
    ($ty:ty, $variant:ident) => {
        impl SocketData for $ty {
            const SOCKET_TYPE: SocketType = SocketType::$variant;

            fn from_socket(value: SocketValue) -> Option<Self> {
                match value {
                    SocketValue::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn into_socket(self) -> SocketValue {
                SocketValue::$variant(self)
            }
        }
    };
}

socket_data!(f32, Float);
socket_data!(i32, Int);
socket_data!(bool, Bool);
socket_data!([f32; 3], Vector);
socket_data!([f32; 4], Color);
socket_data!(String, String);
socket_data!(GeometrySet, Geometry);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_convert_into_socket_types() {
        let v = SocketValue::from_value(&Value::Int(3), SocketType::Vector).unwrap();
        assert_eq!(v, SocketValue::Vector([3.0; 3]));
        assert!(SocketValue::from_value(&Value::Text("x".into()), SocketType::Float).is_none());
        assert!(SocketValue::from_value(&Value::Float(1.0), SocketType::Geometry).is_none());
    }

    #[test]
    fn geometry_only_converts_to_geometry() {
        let geometry = SocketValue::Geometry(GeometrySet::new());
        assert!(geometry.clone().convert_to(SocketType::Float).is_none());
        assert!(geometry.convert_to(SocketType::Geometry).is_some());
        assert_eq!(
            SocketValue::Bool(true).convert_to(SocketType::Float),
            Some(SocketValue::Float(1.0))
        );
    }

    #[test]
    fn node_spec_parses_with_defaults() {
        let graph = GraphSpec::from_json(
            r#"{ "nodes": [
                { "id": "line", "type": "mesh_primitive_line", "values": { "Count": 4 } },
                { "id": "out", "kind": "group_output", "inputs": { "Geometry": { "node_id": "line" } } }
            ] }"#,
        )
        .unwrap();
        let line = graph.node("line").unwrap();
        assert_eq!(line.values.get("Count"), Some(&Value::Int(4)));
        assert_eq!(line.settings, NodeSettings::default());
        let out = graph.node("out").unwrap();
        assert_eq!(out.kind, NodeType::GroupOutput);
        assert_eq!(out.inputs["Geometry"].output_key, "Geometry");
    }
}
