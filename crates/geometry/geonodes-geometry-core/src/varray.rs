//! Read views over attribute data.

use geonodes_api_core::{ConversionError, DataType, Value};

use crate::garray::{AttributeType, GArray};

/// A read-only, index-addressable view over attribute data.
///
/// `Single` is the broadcast view: it reports a length but yields the same value for every
/// index, so literal inputs and per-element attributes can be consumed the same way.
#[derive(Clone, Debug, PartialEq)]
pub enum VArray<'a> {
    Span(&'a GArray),
    Owned(GArray),
    Single {
        data_type: DataType,
        value: Value,
        len: usize,
    },
}

impl<'a> VArray<'a> {
    /// Broadcast `value`, converted to `data_type`, over `len` elements.
    pub fn single(data_type: DataType, value: &Value, len: usize) -> Result<Self, ConversionError> {
        Ok(VArray::Single {
            data_type,
            value: value.convert(data_type.value_kind())?,
            len,
        })
    }

    /// Broadcast the default value of `data_type`.
    pub fn single_default(data_type: DataType, len: usize) -> Self {
        VArray::Single {
            data_type,
            value: data_type.default_value(),
            len,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            VArray::Span(arr) => arr.len(),
            VArray::Owned(arr) => arr.len(),
            VArray::Single { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            VArray::Span(arr) => arr.data_type(),
            VArray::Owned(arr) => arr.data_type(),
            VArray::Single { data_type, .. } => *data_type,
        }
    }

    pub fn is_single(&self) -> bool {
        matches!(self, VArray::Single { .. })
    }

    /// The broadcast value, if this is a single-value view.
    pub fn get_single(&self) -> Option<&Value> {
        match self {
            VArray::Single { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn get(&self, index: usize) -> Value {
        match self {
            VArray::Span(arr) => arr.get(index),
            VArray::Owned(arr) => arr.get(index),
            VArray::Single { value, len, .. } => {
                assert!(index < *len, "index {index} out of bounds for length {len}");
                value.clone()
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Copy the viewed data into an owned array.
    pub fn materialize(&self) -> GArray {
        match self {
            VArray::Span(arr) => (*arr).clone(),
            VArray::Owned(arr) => arr.clone(),
            VArray::Single {
                data_type,
                value,
                len,
            } => GArray::filled(*data_type, value, *len)
                .unwrap_or_else(|_| GArray::new_default(*data_type, *len)),
        }
    }

    /// Typed view, `None` when `T` is not this view's element type.
    pub fn typed<T: AttributeType>(&self) -> Option<TypedVArray<'_, T>> {
        match self {
            VArray::Span(arr) => arr.typed::<T>().map(TypedVArray::Span),
            VArray::Owned(arr) => arr.typed::<T>().map(TypedVArray::Span),
            VArray::Single { value, len, .. } => {
                T::from_value(value).map(|v| TypedVArray::Single(v, *len))
            }
        }
    }

    /// Convert to another element type, keeping broadcast views as broadcasts.
    pub fn convert(self, to: DataType) -> Result<VArray<'a>, ConversionError> {
        if self.data_type() == to {
            return Ok(self);
        }
        match self {
            VArray::Span(arr) => Ok(VArray::Owned(arr.convert(to)?)),
            VArray::Owned(arr) => Ok(VArray::Owned(arr.convert(to)?)),
            VArray::Single { value, len, .. } => VArray::single(to, &value, len),
        }
    }
}

/// A [`VArray`] with a statically known element type.
#[derive(Clone, Debug, PartialEq)]
pub enum TypedVArray<'a, T: AttributeType> {
    Span(&'a [T]),
    Single(T, usize),
}

impl<'a, T: AttributeType> TypedVArray<'a, T> {
    pub fn len(&self) -> usize {
        match self {
            TypedVArray::Span(s) => s.len(),
            TypedVArray::Single(_, len) => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> T {
        match self {
            TypedVArray::Span(s) => s[index],
            TypedVArray::Single(v, len) => {
                assert!(index < *len, "index {index} out of bounds for length {len}");
                *v
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_reports_length_and_repeats_value() {
        let view = VArray::single(DataType::Float3, &Value::Float(1.5), 4).unwrap();
        assert_eq!(view.len(), 4);
        assert!(view.is_single());
        assert!(view.iter().all(|v| v == Value::Vec3([1.5; 3])));
        let typed = view.typed::<[f32; 3]>().unwrap();
        assert_eq!(typed.to_vec(), vec![[1.5; 3]; 4]);
    }

    #[test]
    fn span_views_borrow() {
        let data = GArray::from(vec![1i32, 2, 3]);
        let view = VArray::Span(&data);
        assert_eq!(view.get(2), Value::Int(3));
        assert_eq!(view.typed::<i32>().unwrap().get(0), 1);
        assert!(view.typed::<f32>().is_none());
    }

    #[test]
    fn convert_keeps_broadcasts() {
        let view = VArray::single_default(DataType::Bool, 3)
            .convert(DataType::Float)
            .unwrap();
        assert_eq!(view.get_single(), Some(&Value::Float(0.0)));

        let data = GArray::from(vec![1.0f32, 0.0]);
        let view = VArray::Span(&data).convert(DataType::Bool).unwrap();
        assert_eq!(view.materialize(), GArray::Bool(vec![true, false]));
    }

    #[test]
    #[should_panic]
    fn single_rejects_out_of_bounds() {
        VArray::single_default(DataType::Float, 2).get(2);
    }
}
