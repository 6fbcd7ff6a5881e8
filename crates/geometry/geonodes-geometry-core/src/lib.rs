//! geonodes-geometry-core: per-domain attribute storage, the geometry component types and the
//! copy-on-write [`GeometrySet`] exchanged between nodes.
//!
//! - [`domain`] names the element granularities attributes live on.
//! - [`garray`] and [`varray`] hold typed attribute data and read views over it.
//! - [`attribute`] stores named arrays per component.
//! - [`component`] is the shared attribute API every geometry type implements.
//! - [`mesh`], [`pointcloud`], [`curve`], [`volume`] and [`instances`] are the concrete types.
//! - [`geometry_set`] aggregates at most one component of each type.

pub mod attribute;
pub mod component;
pub mod curve;
pub mod domain;
pub mod garray;
pub mod geometry_set;
pub mod instances;
pub mod mesh;
mod mix;
pub mod pointcloud;
pub mod varray;
pub mod volume;

pub use attribute::{AttributeArray, AttributeError, AttributeMetaData, AttributeStorage, BuiltinAttribute};
pub use component::{GeometryComponent, GeometryComponentType};
pub use curve::{CurveComponent, CurvesGeometry};
pub use domain::AttributeDomain;
pub use garray::{AttributeType, GArray};
pub use geometry_set::{ComponentSlot, GeometrySet};
pub use instances::{InstanceReference, InstancesComponent, Transform};
pub use mesh::{Mesh, MeshComponent, MeshFace, MeshValidationError, POSITION};
pub use pointcloud::{PointCloud, PointCloudComponent};
pub use varray::{TypedVArray, VArray};
pub use volume::{VolumeComponent, VolumeError, VolumeGrid, MAX_RASTER_VOXELS};
