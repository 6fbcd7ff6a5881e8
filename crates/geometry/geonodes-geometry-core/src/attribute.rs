//! Named attribute arrays owned by a geometry component.

use geonodes_api_core::DataType;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::AttributeDomain;
use crate::garray::GArray;

/// One named per-element array and the domain its elements belong to.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeArray {
    pub domain: AttributeDomain,
    pub data: GArray,
}

impl AttributeArray {
    pub fn new(domain: AttributeDomain, data: GArray) -> Self {
        AttributeArray { domain, data }
    }

    pub fn meta_data(&self) -> AttributeMetaData {
        AttributeMetaData {
            domain: self.domain,
            data_type: self.data.data_type(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeMetaData {
    pub domain: AttributeDomain,
    pub data_type: DataType,
}

/// An attribute with a name, domain and type fixed by the component itself (e.g. `position`).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BuiltinAttribute {
    pub name: &'static str,
    pub domain: AttributeDomain,
    pub data_type: DataType,
    pub deletable: bool,
}

impl BuiltinAttribute {
    pub const fn new(name: &'static str, domain: AttributeDomain, data_type: DataType) -> Self {
        BuiltinAttribute {
            name,
            domain,
            data_type,
            deletable: false,
        }
    }

    pub const fn deletable(self) -> Self {
        BuiltinAttribute {
            deletable: true,
            ..self
        }
    }

    pub fn meta_data(&self) -> AttributeMetaData {
        AttributeMetaData {
            domain: self.domain,
            data_type: self.data_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttributeError {
    #[error("{component} does not support the {domain} domain")]
    UnsupportedDomain {
        component: &'static str,
        domain: AttributeDomain,
    },
    #[error("attribute '{name}' has {actual} elements but the {domain} domain has {expected}")]
    LengthMismatch {
        name: String,
        domain: AttributeDomain,
        expected: usize,
        actual: usize,
    },
    #[error("built-in attribute '{name}' must be {expected:?}")]
    BuiltinMismatch {
        name: String,
        expected: AttributeMetaData,
    },
    #[error("{component} has no geometry to store attributes on")]
    NoGeometry { component: &'static str },
}

/// Insertion-ordered name -> array map.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttributeStorage {
    attributes: IndexMap<String, AttributeArray>,
}

impl AttributeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AttributeArray> {
        self.attributes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut AttributeArray> {
        self.attributes.get_mut(name)
    }

    /// Insert or replace; returns the previous array.
    pub fn insert(&mut self, name: impl Into<String>, array: AttributeArray) -> Option<AttributeArray> {
        self.attributes.insert(name.into(), array)
    }

    /// Remove while keeping the order of the remaining attributes.
    pub fn remove(&mut self, name: &str) -> Option<AttributeArray> {
        self.attributes.shift_remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeArray)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resize every array on `domain` to `len`, default-filling new elements.
    pub fn resize_domain(&mut self, domain: AttributeDomain, len: usize) {
        for array in self.attributes.values_mut().filter(|a| a.domain == domain) {
            array.data.resize(len);
        }
    }
}
