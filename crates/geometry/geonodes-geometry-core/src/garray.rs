//! Type-tagged attribute arrays.

use geonodes_api_core::{ConversionError, DataType, Value};

/// Owned per-element data of one [`DataType`].
#[derive(Clone, Debug, PartialEq)]
pub enum GArray {
    Bool(Vec<bool>),
    Int32(Vec<i32>),
    Float(Vec<f32>),
    Float2(Vec<[f32; 2]>),
    Float3(Vec<[f32; 3]>),
    Color(Vec<[f32; 4]>),
}

/// Run `$body` with `$v` bound to the inner `Vec` regardless of the element type.
macro_rules! with_vec {
    ($arr:expr, $v:ident => $body:expr) => {
        match $arr {
            GArray::Bool($v) => $body,
            GArray::Int32($v) => $body,
            GArray::Float($v) => $body,
            GArray::Float2($v) => $body,
            GArray::Float3($v) => $body,
            GArray::Color($v) => $body,
        }
    };
}

/// Like [`with_vec!`] but rewraps the resulting `Vec` in the same variant.
macro_rules! map_vec {
    ($arr:expr, $v:ident => $body:expr) => {
        match $arr {
            GArray::Bool($v) => GArray::Bool($body),
            GArray::Int32($v) => GArray::Int32($body),
            GArray::Float($v) => GArray::Float($body),
            GArray::Float2($v) => GArray::Float2($body),
            GArray::Float3($v) => GArray::Float3($body),
            GArray::Color($v) => GArray::Color($body),
        }
    };
}

impl GArray {
    /// `len` default-constructed elements of `data_type`.
    pub fn new_default(data_type: DataType, len: usize) -> GArray {
        match data_type {
            DataType::Bool => GArray::Bool(vec![false; len]),
            DataType::Int32 => GArray::Int32(vec![0; len]),
            DataType::Float => GArray::Float(vec![0.0; len]),
            DataType::Float2 => GArray::Float2(vec![[0.0; 2]; len]),
            DataType::Float3 => GArray::Float3(vec![[0.0; 3]; len]),
            DataType::Color => GArray::Color(vec![[0.0; 4]; len]),
        }
    }

    /// `len` copies of `value`, converted to `data_type` first.
    pub fn filled(data_type: DataType, value: &Value, len: usize) -> Result<GArray, ConversionError> {
        let value = value.convert(data_type.value_kind())?;
        Ok(match value {
            Value::Bool(v) => GArray::Bool(vec![v; len]),
            Value::Int(v) => GArray::Int32(vec![v; len]),
            Value::Float(v) => GArray::Float(vec![v; len]),
            Value::Vec2(v) => GArray::Float2(vec![v; len]),
            Value::Vec3(v) => GArray::Float3(vec![v; len]),
            Value::ColorRgba(v) => GArray::Color(vec![v; len]),
            Value::Text(_) => GArray::new_default(data_type, len),
        })
    }

    pub fn data_type(&self) -> DataType {
        match self {
            GArray::Bool(_) => DataType::Bool,
            GArray::Int32(_) => DataType::Int32,
            GArray::Float(_) => DataType::Float,
            GArray::Float2(_) => DataType::Float2,
            GArray::Float3(_) => DataType::Float3,
            GArray::Color(_) => DataType::Color,
        }
    }

    pub fn len(&self) -> usize {
        with_vec!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index` as a [`Value`]. Panics when out of bounds, like slice indexing.
    pub fn get(&self, index: usize) -> Value {
        match self {
            GArray::Bool(v) => Value::Bool(v[index]),
            GArray::Int32(v) => Value::Int(v[index]),
            GArray::Float(v) => Value::Float(v[index]),
            GArray::Float2(v) => Value::Vec2(v[index]),
            GArray::Float3(v) => Value::Vec3(v[index]),
            GArray::Color(v) => Value::ColorRgba(v[index]),
        }
    }

    /// Store `value` at `index`, converting it to this array's type.
    pub fn set(&mut self, index: usize, value: &Value) -> Result<(), ConversionError> {
        let value = value.convert(self.data_type().value_kind())?;
        match (self, value) {
            (GArray::Bool(v), Value::Bool(x)) => v[index] = x,
            (GArray::Int32(v), Value::Int(x)) => v[index] = x,
            (GArray::Float(v), Value::Float(x)) => v[index] = x,
            (GArray::Float2(v), Value::Vec2(x)) => v[index] = x,
            (GArray::Float3(v), Value::Vec3(x)) => v[index] = x,
            (GArray::Color(v), Value::ColorRgba(x)) => v[index] = x,
            _ => unreachable!("convert returns the requested kind"),
        }
        Ok(())
    }

    /// Grow with default elements or truncate.
    pub fn resize(&mut self, len: usize) {
        with_vec!(self, v => v.resize(len, Default::default()))
    }

    /// Element-wise conversion through the implicit conversion table.
    pub fn convert(&self, to: DataType) -> Result<GArray, ConversionError> {
        if self.data_type() == to {
            return Ok(self.clone());
        }
        let mut out = GArray::new_default(to, self.len());
        for i in 0..self.len() {
            out.set(i, &self.get(i))?;
        }
        Ok(out)
    }

    /// New array with `out[i] = self[indices[i]]`.
    pub fn gather(&self, indices: &[u32]) -> GArray {
        map_vec!(self, v => indices.iter().map(|&i| v[i as usize]).collect())
    }

    /// Append all elements of `other`, converting when the types differ.
    pub fn extend_from(&mut self, other: &GArray) -> Result<(), ConversionError> {
        let other = other.convert(self.data_type())?;
        match (self, other) {
            (GArray::Bool(a), GArray::Bool(b)) => a.extend(b),
            (GArray::Int32(a), GArray::Int32(b)) => a.extend(b),
            (GArray::Float(a), GArray::Float(b)) => a.extend(b),
            (GArray::Float2(a), GArray::Float2(b)) => a.extend(b),
            (GArray::Float3(a), GArray::Float3(b)) => a.extend(b),
            (GArray::Color(a), GArray::Color(b)) => a.extend(b),
            _ => unreachable!("convert returns the requested type"),
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    pub fn typed<T: AttributeType>(&self) -> Option<&[T]> {
        T::slice(self)
    }

    pub fn typed_mut<T: AttributeType>(&mut self) -> Option<&mut [T]> {
        T::vec_mut(self).map(|v| v.as_mut_slice())
    }
}

/// Rust element types that can back an attribute.
pub trait AttributeType: Copy + Default + PartialEq + Send + Sync + 'static {
    const DATA_TYPE: DataType;

    fn slice(array: &GArray) -> Option<&[Self]>;
    fn vec_mut(array: &mut GArray) -> Option<&mut Vec<Self>>;
    fn from_value(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
    fn into_garray(data: Vec<Self>) -> GArray;
}

macro_rules! impl_attribute_type {
    ($ty:ty, $variant:ident, $data_type:ident, $value:ident, $getter:ident) => {
        impl AttributeType for $ty {
            const DATA_TYPE: DataType = DataType::$data_type;

            fn slice(array: &GArray) -> Option<&[Self]> {
                match array {
                    GArray::$variant(v) => Some(v.as_slice()),
                    _ => None,
                }
            }

            fn vec_mut(array: &mut GArray) -> Option<&mut Vec<Self>> {
                match array {
                    GArray::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn from_value(value: &Value) -> Option<Self> {
                value.$getter()
            }

            fn into_value(self) -> Value {
                Value::$value(self)
            }

            fn into_garray(data: Vec<Self>) -> GArray {
                GArray::$variant(data)
            }
        }
    };
}

impl_attribute_type!(bool, Bool, Bool, Bool, as_bool);
impl_attribute_type!(i32, Int32, Int32, Int, as_int);
impl_attribute_type!(f32, Float, Float, Float, as_float);
impl_attribute_type!([f32; 2], Float2, Float2, Vec2, as_vec2);
impl_attribute_type!([f32; 3], Float3, Float3, Vec3, as_vec3);
impl_attribute_type!([f32; 4], Color, Color, ColorRgba, as_color);

impl<T: AttributeType> From<Vec<T>> for GArray {
    fn from(data: Vec<T>) -> Self {
        T::into_garray(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_converts_the_fill_value() {
        let arr = GArray::filled(DataType::Float3, &Value::Float(2.0), 3).unwrap();
        assert_eq!(arr, GArray::Float3(vec![[2.0; 3]; 3]));
    }

    #[test]
    fn set_converts_into_the_array_type() {
        let mut arr = GArray::new_default(DataType::Int32, 2);
        arr.set(1, &Value::Float(4.9)).unwrap();
        assert_eq!(arr.typed::<i32>(), Some(&[0, 4][..]));
    }

    #[test]
    fn gather_and_resize() {
        let arr = GArray::from(vec![10.0f32, 20.0, 30.0]);
        assert_eq!(arr.gather(&[2, 0, 2]), GArray::Float(vec![30.0, 10.0, 30.0]));
        let mut arr = arr;
        arr.resize(5);
        assert_eq!(arr.len(), 5);
        assert_eq!(arr.get(4), Value::Float(0.0));
    }

    #[test]
    fn convert_whole_array() {
        let arr = GArray::from(vec![true, false]);
        let converted = arr.convert(DataType::Color).unwrap();
        assert_eq!(
            converted,
            GArray::Color(vec![[1.0, 1.0, 1.0, 1.0], [0.0, 0.0, 0.0, 1.0]])
        );
    }

    #[test]
    fn typed_access_rejects_other_types() {
        let arr = GArray::from(vec![[1.0f32, 2.0]]);
        assert!(arr.typed::<f32>().is_none());
        assert_eq!(arr.typed::<[f32; 2]>(), Some(&[[1.0, 2.0]][..]));
    }
}
