//! Value: runtime instances of the primitive socket and attribute types.
//! All floating point data uses f32.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::mem::{align_of, size_of};

use crate::conversion::{implicit_conversions, ConversionError};

/// Kind tag for [`Value`]. The discriminant doubles as the row/column index of the
/// conversion table, so the order here is load-bearing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Float,
    Int,
    Vec2,
    Vec3,
    ColorRgba,
    Bool,
    Text,
}

impl ValueKind {
    pub const COUNT: usize = 7;

    pub const ALL: [ValueKind; ValueKind::COUNT] = [
        ValueKind::Float,
        ValueKind::Int,
        ValueKind::Vec2,
        ValueKind::Vec3,
        ValueKind::ColorRgba,
        ValueKind::Bool,
        ValueKind::Text,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Size in bytes of one element of this kind.
    pub fn size(self) -> usize {
        match self {
            ValueKind::Float => size_of::<f32>(),
            ValueKind::Int => size_of::<i32>(),
            ValueKind::Vec2 => size_of::<[f32; 2]>(),
            ValueKind::Vec3 => size_of::<[f32; 3]>(),
            ValueKind::ColorRgba => size_of::<[f32; 4]>(),
            ValueKind::Bool => size_of::<bool>(),
            ValueKind::Text => size_of::<String>(),
        }
    }

    pub fn alignment(self) -> usize {
        match self {
            ValueKind::Float | ValueKind::Vec2 | ValueKind::Vec3 | ValueKind::ColorRgba => {
                align_of::<f32>()
            }
            ValueKind::Int => align_of::<i32>(),
            ValueKind::Bool => align_of::<bool>(),
            ValueKind::Text => align_of::<String>(),
        }
    }

    /// Default-constructed value of this kind (zeroes, `false`, empty text).
    pub fn default_value(self) -> Value {
        match self {
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Int => Value::Int(0),
            ValueKind::Vec2 => Value::Vec2([0.0; 2]),
            ValueKind::Vec3 => Value::Vec3([0.0; 3]),
            ValueKind::ColorRgba => Value::ColorRgba([0.0; 4]),
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Text => Value::Text(String::new()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Float => "float",
            ValueKind::Int => "int",
            ValueKind::Vec2 => "vec2",
            ValueKind::Vec3 => "vec3",
            ValueKind::ColorRgba => "color",
            ValueKind::Bool => "bool",
            ValueKind::Text => "text",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// Signed 32 bit integer
    Int(i32),

    /// 2D vector (UV coordinates and friends)
    Vec2([f32; 2]),

    /// 3D vector
    Vec3([f32; 3]),

    /// RGBA color (linear by convention)
    ColorRgba([f32; 4]),

    /// Boolean
    Bool(bool),

    /// Text / string
    Text(String),
}

impl Default for Value {
    fn default() -> Self {
        Value::Float(0.0)
    }
}

impl Value {
    /// Return the kind tag of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Int(_) => ValueKind::Int,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::ColorRgba(_) => ValueKind::ColorRgba,
            Value::Bool(_) => ValueKind::Bool,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// Convert into `to` through the process-wide conversion table.
    pub fn convert(&self, to: ValueKind) -> Result<Value, ConversionError> {
        implicit_conversions().convert(to, self)
    }

    /// Convenience constructors
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Value::Vec3([x, y, z])
    }

    pub fn color(r: f32, g: f32, b: f32, a: f32) -> Self {
        Value::ColorRgba([r, g, b, a])
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2(&self) -> Option<[f32; 2]> {
        match self {
            Value::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            Value::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Value::ColorRgba(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

/// Element type of a per-element attribute array. A strict subset of [`ValueKind`]:
/// attributes never store text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Bool,
    Int32,
    Float,
    Float2,
    Float3,
    Color,
}

impl DataType {
    pub const ALL: [DataType; 6] = [
        DataType::Bool,
        DataType::Int32,
        DataType::Float,
        DataType::Float2,
        DataType::Float3,
        DataType::Color,
    ];

    pub fn value_kind(self) -> ValueKind {
        match self {
            DataType::Bool => ValueKind::Bool,
            DataType::Int32 => ValueKind::Int,
            DataType::Float => ValueKind::Float,
            DataType::Float2 => ValueKind::Vec2,
            DataType::Float3 => ValueKind::Vec3,
            DataType::Color => ValueKind::ColorRgba,
        }
    }

    /// The attribute type able to store values of `kind`, if any.
    pub fn from_value_kind(kind: ValueKind) -> Option<DataType> {
        match kind {
            ValueKind::Bool => Some(DataType::Bool),
            ValueKind::Int => Some(DataType::Int32),
            ValueKind::Float => Some(DataType::Float),
            ValueKind::Vec2 => Some(DataType::Float2),
            ValueKind::Vec3 => Some(DataType::Float3),
            ValueKind::ColorRgba => Some(DataType::Color),
            ValueKind::Text => None,
        }
    }

    pub fn default_value(self) -> Value {
        self.value_kind().default_value()
    }

    /// Rank used to pick a common type when two inputs disagree; the more complex type
    /// can represent the simpler one without losing components.
    pub fn complexity(self) -> u8 {
        match self {
            DataType::Bool => 0,
            DataType::Int32 => 1,
            DataType::Float => 2,
            DataType::Float2 => 3,
            DataType::Float3 => 4,
            DataType::Color => 5,
        }
    }

    /// The most complex type among `types`, or `None` for an empty input.
    pub fn highest_complexity(types: impl IntoIterator<Item = DataType>) -> Option<DataType> {
        types.into_iter().max_by_key(|ty| ty.complexity())
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Bool => "Boolean",
            DataType::Int32 => "Integer",
            DataType::Float => "Float",
            DataType::Float2 => "Vector 2D",
            DataType::Float3 => "Vector",
            DataType::Color => "Color",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_index_in_declaration_order() {
        for (i, kind) in ValueKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn default_values_match_their_kind() {
        for kind in ValueKind::ALL {
            assert_eq!(kind.default_value().kind(), kind);
        }
        assert_eq!(DataType::Color.default_value(), Value::ColorRgba([0.0; 4]));
    }

    #[test]
    fn element_sizes() {
        assert_eq!(ValueKind::Vec3.size(), 12);
        assert_eq!(ValueKind::ColorRgba.size(), 16);
        assert_eq!(ValueKind::Bool.size(), 1);
        assert_eq!(ValueKind::Vec2.alignment(), 4);
    }

    #[test]
    fn complexity_prefers_color_over_vector() {
        let picked = DataType::highest_complexity([DataType::Float3, DataType::Color]);
        assert_eq!(picked, Some(DataType::Color));
        assert_eq!(DataType::highest_complexity([]), None);
    }

    #[test]
    fn value_serializes_with_lowercase_tag() {
        let json = serde_json::to_value(Value::Vec3([1.0, 2.0, 3.0])).unwrap();
        assert_eq!(json["type"], "vec3");
        let back: Value = serde_json::from_value(json).unwrap();
        assert_eq!(back, Value::Vec3([1.0, 2.0, 3.0]));
    }
}
