use geonodes_api_core::{DataType, Value};
use geonodes_geometry_core::{
    AttributeDomain, AttributeError, CurveComponent, CurvesGeometry, GArray, GeometryComponent,
    GeometrySet, InstancesComponent, Mesh, MeshComponent, MeshFace, PointCloud,
    PointCloudComponent, VolumeComponent,
};

fn quad() -> Mesh {
    let mut mesh = Mesh::new_nomain(4, 4, 1, 4);
    mesh.positions_mut().copy_from_slice(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ]);
    mesh.edges_mut()
        .copy_from_slice(&[[0, 1], [1, 2], [2, 3], [3, 0]]);
    mesh.faces_mut()[0] = MeshFace::new(0, 4);
    mesh.corner_verts_mut().copy_from_slice(&[0, 1, 2, 3]);
    mesh.corner_edges_mut().copy_from_slice(&[0, 1, 2, 3]);
    mesh
}

#[test]
fn domain_size_is_zero_for_unsupported_domains() {
    let components: Vec<Box<dyn GeometryComponent>> = vec![
        Box::new(MeshComponent::new(quad())),
        Box::new(PointCloudComponent::new(PointCloud::new(3))),
        Box::new(CurveComponent::new(CurvesGeometry::from_curve_sizes(&[3]))),
        Box::new(VolumeComponent::default()),
        Box::new(InstancesComponent::default()),
    ];
    for component in &components {
        for domain in AttributeDomain::ALL {
            let size = component.attribute_domain_size(domain);
            if !component.supported_domains().contains(&domain) {
                assert_eq!(size, 0, "{} on {domain}", component.component_type());
            }
        }
    }
}

#[test]
fn read_converts_type_and_domain_together() {
    let mut component = MeshComponent::new(quad());
    component
        .attribute_try_create("weight", AttributeDomain::Face, GArray::from(vec![2i32]))
        .unwrap();

    let view = component
        .attribute_try_get_for_read("weight", AttributeDomain::Corner, DataType::Float3)
        .unwrap();
    assert_eq!(view.len(), 4);
    assert!(view.iter().all(|v| v == Value::Vec3([2.0; 3])));

    let meta = component.attribute_get_meta_data("weight").unwrap();
    assert_eq!(meta.domain, AttributeDomain::Face);
    assert_eq!(meta.data_type, DataType::Int32);
}

#[test]
fn missing_attribute_reads_as_none() {
    let component = MeshComponent::new(quad());
    assert!(component
        .attribute_try_get_for_read("nope", AttributeDomain::Point, DataType::Float)
        .is_none());
    assert!(MeshComponent::default()
        .attribute_try_get_for_read("position", AttributeDomain::Point, DataType::Float3)
        .is_none());
}

#[test]
fn output_only_replaces_mismatched_attributes() {
    let mut component = MeshComponent::new(quad());
    component
        .attribute_try_create("mask", AttributeDomain::Point, GArray::from(vec![true; 4]))
        .unwrap();
    let data = component
        .attribute_try_get_for_output_only("mask", AttributeDomain::Face, DataType::Float)
        .unwrap();
    assert_eq!(data, &GArray::Float(vec![0.0]));
    assert_eq!(component.attribute_names(), vec!["position", "mask"]);
}

#[test]
fn output_only_reuses_matching_attributes() {
    let mut component = MeshComponent::new(quad());
    component
        .attribute_try_create("w", AttributeDomain::Point, GArray::from(vec![1.0f32, 2.0, 3.0, 4.0]))
        .unwrap();
    let data = component
        .attribute_try_get_for_output_only("w", AttributeDomain::Point, DataType::Float)
        .unwrap();
    assert_eq!(data.get(3), Value::Float(4.0));
}

#[test]
fn create_checks_length_and_builtins() {
    let mut component = MeshComponent::new(quad());
    let err = component
        .attribute_try_create("w", AttributeDomain::Point, GArray::from(vec![1.0f32]))
        .unwrap_err();
    assert!(matches!(err, AttributeError::LengthMismatch { expected: 4, actual: 1, .. }));

    let err = component
        .attribute_try_create("position", AttributeDomain::Point, GArray::from(vec![0.0f32; 4]))
        .unwrap_err();
    assert!(matches!(err, AttributeError::BuiltinMismatch { .. }));

    let err = component
        .attribute_try_create("w", AttributeDomain::Curve, GArray::from(vec![0.0f32]))
        .unwrap_err();
    assert!(matches!(err, AttributeError::UnsupportedDomain { .. }));
}

#[test]
fn written_attributes_survive_validation() {
    let mut set = GeometrySet::create_with_mesh(quad());
    let component = set.get_component_for_write::<MeshComponent>();
    let uv = component
        .attribute_try_get_for_output_only("uv", AttributeDomain::Corner, DataType::Float2)
        .unwrap();
    uv.set(2, &Value::Vec2([1.0, 1.0])).unwrap();
    let mesh = set.get_mesh_for_read().unwrap();
    assert_eq!(mesh.validate(), Ok(()));
    assert_eq!(
        mesh.attributes().get("uv").unwrap().data.get(2),
        Value::Vec2([1.0, 1.0])
    );
}
