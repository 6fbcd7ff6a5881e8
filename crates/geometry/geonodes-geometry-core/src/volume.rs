//! Volumes: named sparse voxel grids. Grids carry no attribute domains.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::attribute::AttributeStorage;
use crate::component::{GeometryComponent, GeometryComponentType};
use crate::domain::AttributeDomain;

/// Upper bound on the voxels a single rasterization may visit.
pub const MAX_RASTER_VOXELS: u64 = 1 << 24;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum VolumeError {
    #[error("voxel size must be positive, got {0}")]
    InvalidVoxelSize(f32),
    #[error("{points} points and {radii} radii")]
    LengthMismatch { points: usize, radii: usize },
    #[error("rasterization would visit {voxels} voxels (limit {limit})")]
    TooManyVoxels { voxels: u64, limit: u64 },
}

/// A float grid with a background value of zero. Voxel `i` covers
/// `[i * voxel_size, (i + 1) * voxel_size)` on each axis.
#[derive(Clone, Debug, PartialEq)]
pub struct VolumeGrid {
    pub name: String,
    pub voxel_size: f32,
    voxels: BTreeMap<[i32; 3], f32>,
}

impl VolumeGrid {
    pub fn new(name: impl Into<String>, voxel_size: f32) -> Self {
        VolumeGrid {
            name: name.into(),
            voxel_size,
            voxels: BTreeMap::new(),
        }
    }

    /// Fog volume of the union of spheres: every voxel whose centre lies inside a sphere
    /// holds `density`.
    pub fn from_spheres(
        name: impl Into<String>,
        voxel_size: f32,
        centers: &[[f32; 3]],
        radii: &[f32],
        density: f32,
    ) -> Result<Self, VolumeError> {
        if voxel_size.is_nan() || voxel_size <= 0.0 || voxel_size.is_infinite() {
            return Err(VolumeError::InvalidVoxelSize(voxel_size));
        }
        if centers.len() != radii.len() {
            return Err(VolumeError::LengthMismatch {
                points: centers.len(),
                radii: radii.len(),
            });
        }

        // Index space: voxel centres sit at half-integer world multiples of the voxel size.
        let inv = 1.0 / f64::from(voxel_size);
        let spheres: Vec<([f64; 3], f64)> = centers
            .iter()
            .zip(radii)
            .filter(|(_, r)| **r > 0.0)
            .map(|(c, r)| (c.map(|v| f64::from(v) * inv - 0.5), f64::from(*r) * inv))
            .collect();

        let mut boxes = Vec::with_capacity(spheres.len());
        let mut total = 0u64;
        for &(center, radius) in &spheres {
            let lo = center.map(|c| (c - radius).ceil());
            let hi = center.map(|c| (c + radius).floor());
            let in_range = lo
                .iter()
                .chain(hi.iter())
                .all(|v| v.is_finite() && *v >= f64::from(i32::MIN) && *v <= f64::from(i32::MAX));
            let extent: f64 = (0..3).map(|k| (hi[k] - lo[k] + 1.0).max(0.0)).product();
            if !in_range || !extent.is_finite() || extent > MAX_RASTER_VOXELS as f64 {
                return Err(VolumeError::TooManyVoxels {
                    voxels: u64::MAX,
                    limit: MAX_RASTER_VOXELS,
                });
            }
            total = total.saturating_add(extent as u64);
            if total > MAX_RASTER_VOXELS {
                return Err(VolumeError::TooManyVoxels {
                    voxels: total,
                    limit: MAX_RASTER_VOXELS,
                });
            }
            boxes.push((lo.map(|v| v as i32), hi.map(|v| v as i32)));
        }

        let mut grid = VolumeGrid::new(name, voxel_size);
        for (&(center, radius), (lo, hi)) in spheres.iter().zip(boxes) {
            let radius_sq = radius * radius;
            for x in lo[0]..=hi[0] {
                for y in lo[1]..=hi[1] {
                    for z in lo[2]..=hi[2] {
                        let d = [
                            f64::from(x) - center[0],
                            f64::from(y) - center[1],
                            f64::from(z) - center[2],
                        ];
                        if d[0] * d[0] + d[1] * d[1] + d[2] * d[2] <= radius_sq {
                            grid.voxels.insert([x, y, z], density);
                        }
                    }
                }
            }
        }
        Ok(grid)
    }

    /// Number of voxels holding a value.
    pub fn active_voxels(&self) -> usize {
        self.voxels.len()
    }

    /// Value at `index`; the background is zero.
    pub fn value(&self, index: [i32; 3]) -> f32 {
        self.voxels.get(&index).copied().unwrap_or(0.0)
    }

    /// Active voxels in index order.
    pub fn iter(&self) -> impl Iterator<Item = ([i32; 3], f32)> + '_ {
        self.voxels.iter().map(|(k, v)| (*k, *v))
    }

    pub fn voxel_center(&self, index: [i32; 3]) -> [f32; 3] {
        index.map(|i| (i as f32 + 0.5) * self.voxel_size)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VolumeComponent {
    grids: Vec<VolumeGrid>,
}

impl VolumeComponent {
    pub fn new(grids: Vec<VolumeGrid>) -> Self {
        VolumeComponent { grids }
    }

    pub fn grids(&self) -> &[VolumeGrid] {
        &self.grids
    }

    pub fn grid(&self, name: &str) -> Option<&VolumeGrid> {
        self.grids.iter().find(|g| g.name == name)
    }

    /// Add `grid`, replacing a grid with the same name.
    pub fn add_grid(&mut self, grid: VolumeGrid) {
        match self.grids.iter_mut().find(|g| g.name == grid.name) {
            Some(existing) => *existing = grid,
            None => self.grids.push(grid),
        }
    }
}

impl GeometryComponent for VolumeComponent {
    fn component_type(&self) -> GeometryComponentType {
        GeometryComponentType::Volume
    }

    fn is_empty(&self) -> bool {
        self.grids.is_empty()
    }

    fn supported_domains(&self) -> &'static [AttributeDomain] {
        &[]
    }

    fn attribute_domain_size(&self, _domain: AttributeDomain) -> usize {
        0
    }

    fn attributes(&self) -> Option<&AttributeStorage> {
        None
    }

    fn attributes_mut(&mut self) -> Option<&mut AttributeStorage> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geonodes_api_core::DataType;

    #[test]
    fn volumes_have_no_attribute_domains() {
        let mut volume = VolumeComponent::new(vec![VolumeGrid::new("density", 0.1)]);
        for domain in AttributeDomain::ALL {
            assert_eq!(volume.attribute_domain_size(domain), 0);
        }
        assert!(volume
            .attribute_try_get_for_output_only("density", AttributeDomain::Point, DataType::Float)
            .is_none());
        assert!(volume.grid("density").is_some());
        assert!(!volume.is_empty());
    }

    #[test]
    fn spheres_fill_the_voxels_around_their_centre() {
        let grid = VolumeGrid::from_spheres("density", 0.5, &[[0.0; 3]], &[1.0], 2.0).unwrap();
        // Radius of two voxels around a voxel corner: 8 inner voxels plus 4 on each face.
        assert_eq!(grid.active_voxels(), 32);
        assert!(grid.iter().all(|(_, v)| v == 2.0));
        assert_eq!(grid.value([0, 0, 0]), 2.0);
        assert_eq!(grid.value([5, 5, 5]), 0.0);

        let mut centroid = [0.0f32; 3];
        for (index, _) in grid.iter() {
            let c = grid.voxel_center(index);
            for k in 0..3 {
                centroid[k] += c[k] / 32.0;
            }
        }
        assert_eq!(centroid, [0.0; 3]);
    }

    #[test]
    fn overlapping_spheres_share_voxels() {
        let one = VolumeGrid::from_spheres("d", 0.5, &[[0.0; 3]], &[1.0], 1.0).unwrap();
        let twice =
            VolumeGrid::from_spheres("d", 0.5, &[[0.0; 3], [0.0; 3]], &[1.0, 1.0], 1.0).unwrap();
        assert_eq!(one, twice);
    }

    #[test]
    fn zero_radius_points_are_skipped() {
        let grid = VolumeGrid::from_spheres("d", 0.1, &[[0.0; 3]], &[0.0], 1.0).unwrap();
        assert_eq!(grid.active_voxels(), 0);
    }

    #[test]
    fn rasterization_is_bounded() {
        assert!(matches!(
            VolumeGrid::from_spheres("d", 0.001, &[[0.0; 3]], &[10.0], 1.0),
            Err(VolumeError::TooManyVoxels { .. })
        ));
        assert!(matches!(
            VolumeGrid::from_spheres("d", 1.0, &[[1e30, 0.0, 0.0]], &[1.0], 1.0),
            Err(VolumeError::TooManyVoxels { .. })
        ));
        assert_eq!(
            VolumeGrid::from_spheres("d", 0.0, &[], &[], 1.0),
            Err(VolumeError::InvalidVoxelSize(0.0))
        );
    }

    #[test]
    fn adding_a_grid_replaces_one_with_the_same_name() {
        let mut volume = VolumeComponent::default();
        volume.add_grid(VolumeGrid::new("density", 0.1));
        volume.add_grid(VolumeGrid::new("density", 0.2));
        assert_eq!(volume.grids().len(), 1);
        assert_eq!(volume.grid("density").unwrap().voxel_size, 0.2);
    }
}
