//! Unconnected points.

use geonodes_api_core::DataType;

use crate::attribute::{AttributeArray, AttributeStorage, BuiltinAttribute};
use crate::component::{position_bounds, GeometryComponent, GeometryComponentType};
use crate::domain::AttributeDomain;
use crate::garray::GArray;
use crate::mesh::POSITION;

pub const RADIUS: &str = "radius";

static POINT_CLOUD_BUILTINS: [BuiltinAttribute; 2] = [
    BuiltinAttribute::new(POSITION, AttributeDomain::Point, DataType::Float3),
    BuiltinAttribute::new(RADIUS, AttributeDomain::Point, DataType::Float).deletable(),
];

static POINT_CLOUD_DOMAINS: [AttributeDomain; 1] = [AttributeDomain::Point];

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloud {
    points_num: usize,
    attributes: AttributeStorage,
}

impl PointCloud {
    /// `points_num` points at the origin with radius 0.05.
    pub fn new(points_num: usize) -> Self {
        let mut attributes = AttributeStorage::new();
        attributes.insert(
            POSITION,
            AttributeArray::new(AttributeDomain::Point, GArray::new_default(DataType::Float3, points_num)),
        );
        attributes.insert(
            RADIUS,
            AttributeArray::new(AttributeDomain::Point, GArray::Float(vec![0.05; points_num])),
        );
        PointCloud {
            points_num,
            attributes,
        }
    }

    pub fn from_positions(positions: Vec<[f32; 3]>) -> Self {
        let mut cloud = PointCloud::new(positions.len());
        cloud.positions_mut().copy_from_slice(&positions);
        cloud
    }

    pub fn points_num(&self) -> usize {
        self.points_num
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        self.attributes
            .get(POSITION)
            .and_then(|a| a.data.typed())
            .unwrap_or_default()
    }

    pub fn positions_mut(&mut self) -> &mut [[f32; 3]] {
        self.attributes
            .get_mut(POSITION)
            .and_then(|a| a.data.typed_mut())
            .unwrap_or_default()
    }

    pub fn attributes(&self) -> &AttributeStorage {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut AttributeStorage {
        &mut self.attributes
    }

    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        position_bounds(self.positions())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointCloudComponent {
    pointcloud: Option<PointCloud>,
}

impl PointCloudComponent {
    pub fn new(pointcloud: PointCloud) -> Self {
        PointCloudComponent {
            pointcloud: Some(pointcloud),
        }
    }

    pub fn get_for_read(&self) -> Option<&PointCloud> {
        self.pointcloud.as_ref()
    }

    pub fn get_for_write(&mut self) -> Option<&mut PointCloud> {
        self.pointcloud.as_mut()
    }

    pub fn replace(&mut self, pointcloud: Option<PointCloud>) {
        self.pointcloud = pointcloud;
    }
}

impl GeometryComponent for PointCloudComponent {
    fn component_type(&self) -> GeometryComponentType {
        GeometryComponentType::PointCloud
    }

    fn is_empty(&self) -> bool {
        self.pointcloud.as_ref().map_or(true, |p| p.points_num == 0)
    }

    fn supported_domains(&self) -> &'static [AttributeDomain] {
        &POINT_CLOUD_DOMAINS
    }

    fn attribute_domain_size(&self, domain: AttributeDomain) -> usize {
        match (&self.pointcloud, domain) {
            (Some(p), AttributeDomain::Point) => p.points_num,
            _ => 0,
        }
    }

    fn attributes(&self) -> Option<&AttributeStorage> {
        self.pointcloud.as_ref().map(PointCloud::attributes)
    }

    fn attributes_mut(&mut self) -> Option<&mut AttributeStorage> {
        self.pointcloud.as_mut().map(PointCloud::attributes_mut)
    }

    fn builtin_attributes(&self) -> &'static [BuiltinAttribute] {
        &POINT_CLOUD_BUILTINS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_point_domain_has_elements() {
        let component = PointCloudComponent::new(PointCloud::new(5));
        assert_eq!(component.attribute_domain_size(AttributeDomain::Point), 5);
        for domain in [AttributeDomain::Edge, AttributeDomain::Face, AttributeDomain::Curve] {
            assert_eq!(component.attribute_domain_size(domain), 0);
        }
    }

    #[test]
    fn radius_is_a_deletable_builtin() {
        let mut component = PointCloudComponent::new(PointCloud::new(2));
        assert!(component.attribute_remove(RADIUS));
        assert!(!component.attribute_remove(POSITION));
    }

    #[test]
    fn output_only_on_unsupported_domain_fails() {
        let mut component = PointCloudComponent::new(PointCloud::new(2));
        assert!(component
            .attribute_try_get_for_output_only("w", AttributeDomain::Face, DataType::Float)
            .is_none());
        let out = component
            .attribute_try_get_for_output_only("w", AttributeDomain::Point, DataType::Float)
            .unwrap();
        assert_eq!(out, &GArray::Float(vec![0.0, 0.0]));
    }

    #[test]
    fn bounds_cover_all_points() {
        let cloud = PointCloud::from_positions(vec![[1.0, -2.0, 0.0], [-1.0, 3.0, 0.5]]);
        assert_eq!(cloud.bounds(), Some(([-1.0, -2.0, 0.0], [1.0, 3.0, 0.5])));
    }
}
