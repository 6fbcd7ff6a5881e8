//! The value passed along geometry sockets.
//!
//! A [`GeometrySet`] holds at most one component of each type. Components sit behind `Arc`s,
//! so cloning a set is cheap and nodes that only read never copy geometry. Writers go through
//! [`GeometrySet::get_component_for_write`], which copies a component that is still shared
//! with another set before handing out a mutable reference.

use std::sync::Arc;

use crate::component::{GeometryComponent, GeometryComponentType};
use crate::curve::{CurveComponent, CurvesGeometry};
use crate::instances::InstancesComponent;
use crate::mesh::{Mesh, MeshComponent};
use crate::pointcloud::{PointCloud, PointCloudComponent};
use crate::volume::VolumeComponent;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometrySet {
    mesh: Option<Arc<MeshComponent>>,
    pointcloud: Option<Arc<PointCloudComponent>>,
    curve: Option<Arc<CurveComponent>>,
    volume: Option<Arc<VolumeComponent>>,
    instances: Option<Arc<InstancesComponent>>,
}

/// Component types that have a slot in a [`GeometrySet`].
pub trait ComponentSlot: GeometryComponent + Clone + Default + 'static {
    const TYPE: GeometryComponentType;

    fn slot(set: &GeometrySet) -> &Option<Arc<Self>>;
    fn slot_mut(set: &mut GeometrySet) -> &mut Option<Arc<Self>>;
}

macro_rules! component_slot {
    ($ty:ty, $tag:ident, $field:ident) => {
        impl ComponentSlot for $ty {
            const TYPE: GeometryComponentType = GeometryComponentType::$tag;

            fn slot(set: &GeometrySet) -> &Option<Arc<Self>> {
                &set.$field
            }

            fn slot_mut(set: &mut GeometrySet) -> &mut Option<Arc<Self>> {
                &mut set.$field
            }
        }
    };
}

component_slot!(MeshComponent, Mesh, mesh);
component_slot!(PointCloudComponent, PointCloud, pointcloud);
component_slot!(CurveComponent, Curve, curve);
component_slot!(VolumeComponent, Volume, volume);
component_slot!(InstancesComponent, Instances, instances);

impl GeometrySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_with_mesh(mesh: Mesh) -> Self {
        let mut set = GeometrySet::new();
        set.add(MeshComponent::new(mesh));
        set
    }

    pub fn create_with_point_cloud(pointcloud: PointCloud) -> Self {
        let mut set = GeometrySet::new();
        set.add(PointCloudComponent::new(pointcloud));
        set
    }

    pub fn create_with_curve(curves: CurvesGeometry) -> Self {
        let mut set = GeometrySet::new();
        set.add(CurveComponent::new(curves));
        set
    }

    /// Whether a component of type `T` is present (it may still be empty).
    pub fn has<T: ComponentSlot>(&self) -> bool {
        T::slot(self).is_some()
    }

    pub fn get_component_for_read<T: ComponentSlot>(&self) -> Option<&T> {
        T::slot(self).as_deref()
    }

    /// Exclusive access to the `T` component, creating an empty one when missing and copying
    /// it first when another set still shares it.
    pub fn get_component_for_write<T: ComponentSlot>(&mut self) -> &mut T {
        let slot = T::slot_mut(self);
        if let Some(arc) = slot {
            if Arc::strong_count(arc) > 1 {
                log::debug!("copying shared {} component before write", T::TYPE);
            }
        }
        Arc::make_mut(slot.get_or_insert_with(Default::default))
    }

    /// Store `component`, replacing any component of the same type.
    pub fn add<T: ComponentSlot>(&mut self, component: T) {
        *T::slot_mut(self) = Some(Arc::new(component));
    }

    /// Drop the `T` component; returns whether one was present.
    pub fn remove<T: ComponentSlot>(&mut self) -> bool {
        T::slot_mut(self).take().is_some()
    }

    pub fn get_mesh_for_read(&self) -> Option<&Mesh> {
        self.get_component_for_read::<MeshComponent>()?.get_for_read()
    }

    pub fn get_mesh_for_write(&mut self) -> Option<&mut Mesh> {
        if !self.has::<MeshComponent>() {
            return None;
        }
        self.get_component_for_write::<MeshComponent>().get_for_write()
    }

    pub fn get_curves_for_read(&self) -> Option<&CurvesGeometry> {
        self.get_component_for_read::<CurveComponent>()?.get_for_read()
    }

    pub fn get_point_cloud_for_read(&self) -> Option<&PointCloud> {
        self.get_component_for_read::<PointCloudComponent>()?.get_for_read()
    }

    /// Replace the mesh; `None` removes the mesh component.
    pub fn replace_mesh(&mut self, mesh: Option<Mesh>) {
        match mesh {
            Some(mesh) => self.add(MeshComponent::new(mesh)),
            None => {
                self.remove::<MeshComponent>();
            }
        }
    }

    /// The present components as trait objects, in component type order.
    pub fn components(&self) -> Vec<&dyn GeometryComponent> {
        let mut out: Vec<&dyn GeometryComponent> = Vec::new();
        if let Some(c) = &self.mesh {
            out.push(c.as_ref());
        }
        if let Some(c) = &self.pointcloud {
            out.push(c.as_ref());
        }
        if let Some(c) = &self.curve {
            out.push(c.as_ref());
        }
        if let Some(c) = &self.volume {
            out.push(c.as_ref());
        }
        if let Some(c) = &self.instances {
            out.push(c.as_ref());
        }
        out
    }

    /// Types of the present components, ordered and without duplicates.
    ///
    /// With `recurse_into_instances`, types found in geometry referenced by instances are
    /// included as well.
    pub fn gather_component_types(
        &self,
        include_instances: bool,
        recurse_into_instances: bool,
    ) -> Vec<GeometryComponentType> {
        let mut found = [false; 5];
        self.collect_component_types(include_instances, recurse_into_instances, &mut found);
        GeometryComponentType::ALL
            .into_iter()
            .zip(found)
            .filter_map(|(ty, present)| present.then_some(ty))
            .collect()
    }

    fn collect_component_types(
        &self,
        include_instances: bool,
        recurse_into_instances: bool,
        found: &mut [bool; 5],
    ) {
        for component in self.components() {
            let ty = component.component_type();
            if ty == GeometryComponentType::Instances && !include_instances {
                continue;
            }
            found[ty as usize] = true;
        }
        if !recurse_into_instances {
            return;
        }
        if let Some(instances) = &self.instances {
            for set in instances.referenced_geometry() {
                set.collect_component_types(include_instances, true, found);
            }
        }
    }

    /// True when there is at least one instance.
    pub fn has_instances(&self) -> bool {
        self.instances
            .as_ref()
            .is_some_and(|c| c.instances_num() > 0)
    }

    /// True when any non-instance component holds data.
    pub fn has_realized_data(&self) -> bool {
        self.components()
            .iter()
            .any(|c| c.component_type() != GeometryComponentType::Instances && !c.is_empty())
    }

    /// True when no component holds data.
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(|c| c.is_empty())
    }

    /// Bounds of the realized positions, ignoring instances.
    pub fn compute_boundbox_without_instances(&self) -> Option<([f32; 3], [f32; 3])> {
        let bounds = [
            self.get_mesh_for_read().and_then(Mesh::bounds),
            self.get_point_cloud_for_read().and_then(PointCloud::bounds),
            self.get_curves_for_read().and_then(CurvesGeometry::bounds),
        ];
        bounds
            .into_iter()
            .flatten()
            .reduce(|(amin, amax), (bmin, bmax)| {
                let mut min = amin;
                let mut max = amax;
                for k in 0..3 {
                    min[k] = min[k].min(bmin[k]);
                    max[k] = max[k].max(bmax[k]);
                }
                (min, max)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instances::{InstanceReference, Transform};

    fn triangle() -> Mesh {
        let mut mesh = Mesh::new_nomain(3, 3, 1, 3);
        mesh.positions_mut()
            .copy_from_slice(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        mesh.edges_mut().copy_from_slice(&[[0, 1], [1, 2], [2, 0]]);
        mesh.faces_mut()[0] = crate::mesh::MeshFace::new(0, 3);
        mesh.corner_verts_mut().copy_from_slice(&[0, 1, 2]);
        mesh.corner_edges_mut().copy_from_slice(&[0, 1, 2]);
        mesh
    }

    #[test]
    fn write_access_copies_shared_components() {
        let original = GeometrySet::create_with_mesh(triangle());
        let mut copy = original.clone();
        copy.get_mesh_for_write().unwrap().positions_mut()[0] = [5.0, 5.0, 5.0];
        assert_eq!(original.get_mesh_for_read().unwrap().positions()[0], [0.0; 3]);
        assert_eq!(copy.get_mesh_for_read().unwrap().positions()[0], [5.0; 3]);
    }

    #[test]
    fn write_access_creates_missing_components() {
        let mut set = GeometrySet::new();
        assert!(!set.has::<InstancesComponent>());
        set.get_component_for_write::<InstancesComponent>();
        assert!(set.has::<InstancesComponent>());
        assert!(!set.has_instances());
        assert!(set.is_empty());
    }

    #[test]
    fn component_types_are_ordered_and_recursive() {
        let mut set = GeometrySet::create_with_curve(CurvesGeometry::from_curve_sizes(&[4]));
        let nested = GeometrySet::create_with_mesh(triangle());
        let instances = set.get_component_for_write::<InstancesComponent>();
        let handle = instances.add_reference(InstanceReference::GeometrySet(Box::new(nested)));
        instances.add_instance(handle, Transform::IDENTITY);

        assert_eq!(
            set.gather_component_types(true, false),
            vec![GeometryComponentType::Curve, GeometryComponentType::Instances]
        );
        assert_eq!(
            set.gather_component_types(false, true),
            vec![GeometryComponentType::Mesh, GeometryComponentType::Curve]
        );
        assert!(set.has_instances());
        assert!(set.has_realized_data());
    }

    #[test]
    fn replace_and_remove_mesh() {
        let mut set = GeometrySet::create_with_mesh(triangle());
        set.replace_mesh(None);
        assert!(!set.has::<MeshComponent>());
        assert!(!set.remove::<MeshComponent>());
        assert!(set.is_empty());
        assert!(!set.has_realized_data());
    }

    #[test]
    fn boundbox_spans_all_realized_components() {
        let mut set = GeometrySet::create_with_mesh(triangle());
        set.add(PointCloudComponent::new(PointCloud::from_positions(vec![[-2.0, 0.5, 3.0]])));
        assert_eq!(
            set.compute_boundbox_without_instances(),
            Some(([-2.0, 0.0, 0.0], [1.0, 1.0, 3.0]))
        );
        assert_eq!(GeometrySet::new().compute_boundbox_without_instances(), None);
    }
}
