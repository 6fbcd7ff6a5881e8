//! The attribute API shared by every geometry component type.

use std::fmt;

use geonodes_api_core::DataType;
use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeArray, AttributeError, AttributeMetaData, AttributeStorage, BuiltinAttribute};
use crate::domain::AttributeDomain;
use crate::garray::GArray;
use crate::varray::VArray;

/// Tag of a component type. Declaration order is the order used when listing the types
/// present in a geometry set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryComponentType {
    Mesh,
    PointCloud,
    Curve,
    Volume,
    Instances,
}

impl GeometryComponentType {
    pub const ALL: [GeometryComponentType; 5] = [
        GeometryComponentType::Mesh,
        GeometryComponentType::PointCloud,
        GeometryComponentType::Curve,
        GeometryComponentType::Volume,
        GeometryComponentType::Instances,
    ];

    /// Human readable name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            GeometryComponentType::Mesh => "Mesh",
            GeometryComponentType::PointCloud => "Point Cloud",
            GeometryComponentType::Curve => "Curve",
            GeometryComponentType::Volume => "Volume",
            GeometryComponentType::Instances => "Instances",
        }
    }
}

impl fmt::Display for GeometryComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A geometry representation that stores named per-element attributes on a set of domains.
///
/// Implementors provide storage access, domain sizes and domain adaptation; the attribute
/// accessors are provided on top of those and behave the same for every component.
pub trait GeometryComponent: fmt::Debug + Send + Sync {
    fn component_type(&self) -> GeometryComponentType;

    fn is_empty(&self) -> bool;

    fn supported_domains(&self) -> &'static [AttributeDomain];

    /// Number of elements on `domain`; 0 for domains this component does not support.
    fn attribute_domain_size(&self, domain: AttributeDomain) -> usize;

    /// `None` when the component holds no geometry to attach attributes to.
    fn attributes(&self) -> Option<&AttributeStorage>;

    fn attributes_mut(&mut self) -> Option<&mut AttributeStorage>;

    fn builtin_attributes(&self) -> &'static [BuiltinAttribute] {
        &[]
    }

    /// Re-express `data`, stored on `from`, on the `to` domain. `None` when impossible.
    fn attribute_try_adapt_domain(
        &self,
        data: &GArray,
        from: AttributeDomain,
        to: AttributeDomain,
    ) -> Option<GArray> {
        (from == to).then(|| data.clone())
    }

    fn supports_domain(&self, domain: AttributeDomain) -> bool {
        self.supported_domains().contains(&domain)
    }

    fn builtin_attribute(&self, name: &str) -> Option<&'static BuiltinAttribute> {
        self.builtin_attributes().iter().find(|b| b.name == name)
    }

    fn attribute_exists(&self, name: &str) -> bool {
        self.attributes().is_some_and(|s| s.contains(name))
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes()
            .map(|s| s.names().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    fn attribute_get_meta_data(&self, name: &str) -> Option<AttributeMetaData> {
        self.attributes()?.get(name).map(AttributeArray::meta_data)
    }

    /// Read `name` as `data_type` on `domain`, adapting domain and type as needed.
    ///
    /// Returns `None` when the attribute does not exist or cannot be adapted or converted.
    fn attribute_try_get_for_read(
        &self,
        name: &str,
        domain: AttributeDomain,
        data_type: DataType,
    ) -> Option<VArray<'_>> {
        let array = self.attributes()?.get(name)?;
        let view = if array.domain == domain {
            VArray::Span(&array.data)
        } else {
            VArray::Owned(self.attribute_try_adapt_domain(&array.data, array.domain, domain)?)
        };
        view.convert(data_type).ok()
    }

    /// Array for `name` on `domain` with `data_type` whose previous contents do not matter.
    ///
    /// An existing array with the same domain and type is reused; otherwise a default filled
    /// array sized to the domain replaces it. `None` for unsupported domains and for built-in
    /// attributes whose fixed domain or type differs from the request.
    fn attribute_try_get_for_output_only(
        &mut self,
        name: &str,
        domain: AttributeDomain,
        data_type: DataType,
    ) -> Option<&mut GArray> {
        if !self.supports_domain(domain) {
            log::debug!(
                "{} cannot store attribute '{name}' on the {domain} domain",
                self.component_type()
            );
            return None;
        }
        if let Some(builtin) = self.builtin_attribute(name) {
            if builtin.domain != domain || builtin.data_type != data_type {
                return None;
            }
        }
        let size = self.attribute_domain_size(domain);
        let storage = self.attributes_mut()?;
        let reusable = storage.get(name).is_some_and(|a| {
            a.domain == domain && a.data.data_type() == data_type && a.data.len() == size
        });
        if !reusable {
            if let Some(previous) = storage.get(name) {
                log::warn!(
                    "replacing attribute '{name}' ({} on {}) with {data_type} on {domain}",
                    previous.data.data_type(),
                    previous.domain
                );
            }
            storage.insert(
                name,
                AttributeArray::new(domain, GArray::new_default(data_type, size)),
            );
        }
        storage.get_mut(name).map(|a| &mut a.data)
    }

    /// Existing array for in-place modification.
    fn attribute_try_get_for_write(&mut self, name: &str) -> Option<&mut GArray> {
        self.attributes_mut()?.get_mut(name).map(|a| &mut a.data)
    }

    /// Add `data` as attribute `name` on `domain`, replacing any previous attribute.
    fn attribute_try_create(
        &mut self,
        name: &str,
        domain: AttributeDomain,
        data: GArray,
    ) -> Result<(), AttributeError> {
        let component = self.component_type().name();
        if !self.supports_domain(domain) {
            return Err(AttributeError::UnsupportedDomain { component, domain });
        }
        if let Some(builtin) = self.builtin_attribute(name) {
            if builtin.domain != domain || builtin.data_type != data.data_type() {
                return Err(AttributeError::BuiltinMismatch {
                    name: name.to_owned(),
                    expected: builtin.meta_data(),
                });
            }
        }
        let expected = self.attribute_domain_size(domain);
        if data.len() != expected {
            return Err(AttributeError::LengthMismatch {
                name: name.to_owned(),
                domain,
                expected,
                actual: data.len(),
            });
        }
        let storage = self
            .attributes_mut()
            .ok_or(AttributeError::NoGeometry { component })?;
        storage.insert(name, AttributeArray::new(domain, data));
        Ok(())
    }

    /// Remove a named attribute. Non-deletable built-ins are kept and report `false`.
    fn attribute_remove(&mut self, name: &str) -> bool {
        if self.builtin_attribute(name).is_some_and(|b| !b.deletable) {
            return false;
        }
        self.attributes_mut()
            .and_then(|s| s.remove(name))
            .is_some()
    }
}

/// Axis-aligned bounds of `positions`, `None` when empty.
pub(crate) fn position_bounds(positions: &[[f32; 3]]) -> Option<([f32; 3], [f32; 3])> {
    let first = *positions.first()?;
    Some(positions.iter().fold((first, first), |(mut min, mut max), p| {
        for k in 0..3 {
            min[k] = min[k].min(p[k]);
            max[k] = max[k].max(p[k]);
        }
        (min, max)
    }))
}
