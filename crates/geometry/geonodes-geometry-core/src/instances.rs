//! Instances: transformed references to other geometry.

use serde::{Deserialize, Serialize};

use crate::attribute::AttributeStorage;
use crate::component::{GeometryComponent, GeometryComponentType};
use crate::domain::AttributeDomain;
use crate::garray::GArray;
use crate::geometry_set::GeometrySet;

static INSTANCE_DOMAINS: [AttributeDomain; 1] = [AttributeDomain::Instance];

/// Column-major 4x4 affine transform.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform(pub [[f32; 4]; 4]);

impl Default for Transform {
    fn default() -> Self {
        Transform::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub fn from_translation(t: [f32; 3]) -> Self {
        let mut m = Transform::IDENTITY;
        m.0[3] = [t[0], t[1], t[2], 1.0];
        m
    }

    pub fn translation(&self) -> [f32; 3] {
        [self.0[3][0], self.0[3][1], self.0[3][2]]
    }

    pub fn transform_point(&self, p: [f32; 3]) -> [f32; 3] {
        let m = &self.0;
        let mut out = [0.0; 3];
        for (row, o) in out.iter_mut().enumerate() {
            *o = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
        }
        out
    }
}

/// What an instance places in the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum InstanceReference {
    /// A scene object owned by the host, referenced by name.
    Object(String),
    /// A scene collection owned by the host, referenced by name.
    Collection(String),
    GeometrySet(Box<GeometrySet>),
}

/// Instances point at a deduplicated list of references through handles.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstancesComponent {
    references: Vec<InstanceReference>,
    handles: Vec<u32>,
    transforms: Vec<Transform>,
    attributes: AttributeStorage,
}

impl InstancesComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instances_num(&self) -> usize {
        self.handles.len()
    }

    pub fn references(&self) -> &[InstanceReference] {
        &self.references
    }

    pub fn handles(&self) -> &[u32] {
        &self.handles
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Handle for `reference`, adding it when no equal reference is stored yet.
    pub fn add_reference(&mut self, reference: InstanceReference) -> u32 {
        if let Some(i) = self.references.iter().position(|r| *r == reference) {
            return i as u32;
        }
        self.references.push(reference);
        (self.references.len() - 1) as u32
    }

    /// Append one instance of the reference behind `handle`. Instance attributes grow with it.
    pub fn add_instance(&mut self, handle: u32, transform: Transform) {
        debug_assert!((handle as usize) < self.references.len());
        self.handles.push(handle);
        self.transforms.push(transform);
        self.attributes
            .resize_domain(AttributeDomain::Instance, self.handles.len());
    }

    /// Geometry sets referenced by instances, each listed once.
    pub fn referenced_geometry(&self) -> impl Iterator<Item = &GeometrySet> {
        self.references.iter().filter_map(|r| match r {
            InstanceReference::GeometrySet(set) => Some(set.as_ref()),
            _ => None,
        })
    }
}

impl GeometryComponent for InstancesComponent {
    fn component_type(&self) -> GeometryComponentType {
        GeometryComponentType::Instances
    }

    fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    fn supported_domains(&self) -> &'static [AttributeDomain] {
        &INSTANCE_DOMAINS
    }

    fn attribute_domain_size(&self, domain: AttributeDomain) -> usize {
        match domain {
            AttributeDomain::Instance => self.handles.len(),
            _ => 0,
        }
    }

    fn attributes(&self) -> Option<&AttributeStorage> {
        Some(&self.attributes)
    }

    fn attributes_mut(&mut self) -> Option<&mut AttributeStorage> {
        Some(&mut self.attributes)
    }

    fn attribute_try_adapt_domain(
        &self,
        data: &GArray,
        from: AttributeDomain,
        to: AttributeDomain,
    ) -> Option<GArray> {
        (from == to && data.len() == self.handles.len()).then(|| data.clone())
    }
}
