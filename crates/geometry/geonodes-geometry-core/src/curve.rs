//! Poly curves stored as one flat point array partitioned by offsets.

use std::ops::Range;

use geonodes_api_core::DataType;

use crate::attribute::{AttributeArray, AttributeStorage, BuiltinAttribute};
use crate::component::{position_bounds, GeometryComponent, GeometryComponentType};
use crate::domain::AttributeDomain;
use crate::garray::GArray;
use crate::mesh::POSITION;
use crate::mix::mix_pairs;
use crate::pointcloud::RADIUS;

pub const TILT: &str = "tilt";
pub const CYCLIC: &str = "cyclic";

static CURVE_BUILTINS: [BuiltinAttribute; 4] = [
    BuiltinAttribute::new(POSITION, AttributeDomain::Point, DataType::Float3),
    BuiltinAttribute::new(RADIUS, AttributeDomain::Point, DataType::Float).deletable(),
    BuiltinAttribute::new(TILT, AttributeDomain::Point, DataType::Float).deletable(),
    BuiltinAttribute::new(CYCLIC, AttributeDomain::Curve, DataType::Bool).deletable(),
];

static CURVE_DOMAINS: [AttributeDomain; 2] = [AttributeDomain::Point, AttributeDomain::Curve];

/// Curves whose points are stored back to back. Curve `i` owns the points
/// `offsets[i]..offsets[i + 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct CurvesGeometry {
    offsets: Vec<u32>,
    attributes: AttributeStorage,
}

impl Default for CurvesGeometry {
    fn default() -> Self {
        CurvesGeometry::from_curve_sizes(&[])
    }
}

impl CurvesGeometry {
    /// Curves with the given point counts; positions at the origin, radius 1, not cyclic.
    pub fn from_curve_sizes(sizes: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(sizes.len() + 1);
        let mut total = 0u32;
        offsets.push(0);
        for &size in sizes {
            total += size as u32;
            offsets.push(total);
        }
        let points_num = total as usize;
        let mut attributes = AttributeStorage::new();
        attributes.insert(
            POSITION,
            AttributeArray::new(AttributeDomain::Point, GArray::new_default(DataType::Float3, points_num)),
        );
        attributes.insert(
            RADIUS,
            AttributeArray::new(AttributeDomain::Point, GArray::Float(vec![1.0; points_num])),
        );
        attributes.insert(
            CYCLIC,
            AttributeArray::new(AttributeDomain::Curve, GArray::new_default(DataType::Bool, sizes.len())),
        );
        CurvesGeometry {
            offsets,
            attributes,
        }
    }

    pub fn points_num(&self) -> usize {
        self.offsets.last().copied().unwrap_or(0) as usize
    }

    pub fn curves_num(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn points_for_curve(&self, curve: usize) -> Range<usize> {
        self.offsets[curve] as usize..self.offsets[curve + 1] as usize
    }

    pub fn domain_size(&self, domain: AttributeDomain) -> usize {
        match domain {
            AttributeDomain::Point => self.points_num(),
            AttributeDomain::Curve => self.curves_num(),
            _ => 0,
        }
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

    /// Per-curve cyclic flags; all `false` when the attribute was removed.
    pub fn cyclic(&self) -> Vec<bool> {
        self.attributes
            .get(CYCLIC)
            .and_then(|a| a.data.typed::<bool>())
            .map(<[bool]>::to_vec)
            .unwrap_or_else(|| vec![false; self.curves_num()])
    }

    /// Mutable cyclic flags, creating the attribute if needed.
    pub fn cyclic_mut(&mut self) -> &mut [bool] {
        let curves = self.curves_num();
        if !self.attributes.contains(CYCLIC) {
            self.attributes.insert(
                CYCLIC,
                AttributeArray::new(AttributeDomain::Curve, GArray::new_default(DataType::Bool, curves)),
            );
        }
        self.attributes
            .get_mut(CYCLIC)
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

    /// Point values spread to curves by averaging, curve values copied to their points.
    pub fn adapt_domain(&self, data: &GArray, from: AttributeDomain, to: AttributeDomain) -> Option<GArray> {
        if data.len() != self.domain_size(from) {
            return None;
        }
        match (from, to) {
            _ if from == to => Some(data.clone()),
            (AttributeDomain::Point, AttributeDomain::Curve) => {
                let pairs = (0..self.curves_num())
                    .flat_map(|curve| self.points_for_curve(curve).map(move |point| (curve, point)));
                Some(mix_pairs(data, self.curves_num(), pairs))
            }
            (AttributeDomain::Curve, AttributeDomain::Point) => {
                let indices: Vec<u32> = (0..self.curves_num())
                    .flat_map(|curve| self.points_for_curve(curve).map(move |_| curve as u32))
                    .collect();
                Some(data.gather(&indices))
            }
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveComponent {
    curves: Option<CurvesGeometry>,
}

impl CurveComponent {
    pub fn new(curves: CurvesGeometry) -> Self {
        CurveComponent {
            curves: Some(curves),
        }
    }

    pub fn get_for_read(&self) -> Option<&CurvesGeometry> {
        self.curves.as_ref()
    }

    pub fn get_for_write(&mut self) -> Option<&mut CurvesGeometry> {
        self.curves.as_mut()
    }

    pub fn replace(&mut self, curves: Option<CurvesGeometry>) {
        self.curves = curves;
    }
}

impl GeometryComponent for CurveComponent {
    fn component_type(&self) -> GeometryComponentType {
        GeometryComponentType::Curve
    }

    fn is_empty(&self) -> bool {
        self.curves.as_ref().map_or(true, |c| c.points_num() == 0)
    }

    fn supported_domains(&self) -> &'static [AttributeDomain] {
        &CURVE_DOMAINS
    }

    fn attribute_domain_size(&self, domain: AttributeDomain) -> usize {
        self.curves.as_ref().map_or(0, |c| c.domain_size(domain))
    }

    fn attributes(&self) -> Option<&AttributeStorage> {
        self.curves.as_ref().map(CurvesGeometry::attributes)
    }

    fn attributes_mut(&mut self) -> Option<&mut AttributeStorage> {
        self.curves.as_mut().map(CurvesGeometry::attributes_mut)
    }

    fn builtin_attributes(&self) -> &'static [BuiltinAttribute] {
        &CURVE_BUILTINS
    }

    fn attribute_try_adapt_domain(
        &self,
        data: &GArray,
        from: AttributeDomain,
        to: AttributeDomain,
    ) -> Option<GArray> {
        self.curves.as_ref()?.adapt_domain(data, from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_partition_points() {
        let curves = CurvesGeometry::from_curve_sizes(&[3, 2]);
        assert_eq!(curves.points_num(), 5);
        assert_eq!(curves.curves_num(), 2);
        assert_eq!(curves.points_for_curve(1), 3..5);
        assert_eq!(curves.cyclic(), vec![false, false]);
    }

    #[test]
    fn curve_values_copy_to_points() {
        let curves = CurvesGeometry::from_curve_sizes(&[2, 1]);
        let per_curve = GArray::from(vec![1.0f32, 5.0]);
        let points = curves
            .adapt_domain(&per_curve, AttributeDomain::Curve, AttributeDomain::Point)
            .unwrap();
        assert_eq!(points, GArray::Float(vec![1.0, 1.0, 5.0]));
    }

    #[test]
    fn point_values_average_per_curve() {
        let curves = CurvesGeometry::from_curve_sizes(&[2, 1]);
        let per_point = GArray::from(vec![1.0f32, 3.0, 7.0]);
        let per_curve = curves
            .adapt_domain(&per_point, AttributeDomain::Point, AttributeDomain::Curve)
            .unwrap();
        assert_eq!(per_curve, GArray::Float(vec![2.0, 7.0]));
    }

    #[test]
    fn read_adapts_cyclic_to_points() {
        let mut curves = CurvesGeometry::from_curve_sizes(&[2, 1]);
        curves.cyclic_mut()[1] = true;
        let component = CurveComponent::new(curves);
        let view = component
            .attribute_try_get_for_read(CYCLIC, AttributeDomain::Point, DataType::Float)
            .unwrap();
        assert_eq!(view.materialize(), GArray::Float(vec![0.0, 0.0, 1.0]));
        assert!(component
            .attribute_try_get_for_read(CYCLIC, AttributeDomain::Face, DataType::Float)
            .is_none());
    }
}
