//! The API a node body sees while it runs.
//!
//! [`GeoNodeExecParams`] checks every socket access against the node's declaration. Misuse
//! (unknown or disabled sockets, wrong types, reading an input after moving it out, writing
//! an output twice) is a [`ContractViolation`]. Attribute inputs are resolved here as well:
//! a node asks for "the values of input `A` on the point domain as floats" and gets a view
//! that is either a stored attribute or a broadcast literal.

use geonodes_api_core::{DataType, Value};
use geonodes_geometry_core::{
    AttributeDomain, GeometryComponent, GeometryComponentType, GeometrySet, VArray,
};

use crate::error::ContractViolation;
use crate::schema::{NodeDeclaration, SocketDeclaration};
use crate::types::{NodeSettings, SocketData, SocketType, SocketValue};

use super::diagnostics::{LocalLogger, NodeWarningType};
use super::provider::NodeExecProvider;

pub struct GeoNodeExecParams<'a> {
    provider: &'a mut NodeExecProvider,
    logger: Option<&'a mut LocalLogger>,
}

impl<'a> GeoNodeExecParams<'a> {
    /// Without a logger, diagnostics are dropped (used for dry runs).
    pub fn new(provider: &'a mut NodeExecProvider, logger: Option<&'a mut LocalLogger>) -> Self {
        GeoNodeExecParams { provider, logger }
    }

    pub fn node_id(&self) -> &str {
        self.provider.node_id()
    }

    pub fn settings(&self) -> &NodeSettings {
        self.provider.settings()
    }

    pub fn declaration(&self) -> &NodeDeclaration {
        self.provider.declaration()
    }

    fn violation(&self, violation: ContractViolation) -> ContractViolation {
        log::error!("contract violation: {violation}");
        violation
    }

    fn input_socket(&self, identifier: &str) -> Result<&SocketDeclaration, ContractViolation> {
        let declaration = self.provider.declaration();
        let Some(socket) = declaration.input(identifier) else {
            return Err(self.violation(ContractViolation::UnknownInput {
                node_id: self.node_id().to_owned(),
                identifier: identifier.to_owned(),
                available: declaration.available_input_identifiers(),
            }));
        };
        if !socket.available {
            return Err(self.violation(ContractViolation::UnavailableInput {
                node_id: self.node_id().to_owned(),
                identifier: identifier.to_owned(),
            }));
        }
        Ok(socket)
    }

    fn check_input(&self, identifier: &str, requested: SocketType) -> Result<(), ContractViolation> {
        let socket = self.input_socket(identifier)?;
        if socket.socket_type != requested {
            return Err(self.violation(ContractViolation::InputTypeMismatch {
                node_id: self.node_id().to_owned(),
                identifier: identifier.to_owned(),
                expected: socket.socket_type,
                requested,
            }));
        }
        if !self.provider.can_get_input(identifier) {
            return Err(self.violation(ContractViolation::InputAlreadyExtracted {
                node_id: self.node_id().to_owned(),
                identifier: identifier.to_owned(),
            }));
        }
        Ok(())
    }

    fn typed<T: SocketData>(&self, identifier: &str, value: SocketValue) -> Result<T, ContractViolation> {
        let actual = value.socket_type();
        T::from_socket(value).ok_or_else(|| {
            self.violation(ContractViolation::InputTypeMismatch {
                node_id: self.node_id().to_owned(),
                identifier: identifier.to_owned(),
                expected: actual,
                requested: T::SOCKET_TYPE,
            })
        })
    }

    /// A copy of the input value. The input stays available.
    pub fn get_input<T: SocketData>(&self, identifier: &str) -> Result<T, ContractViolation> {
        self.check_input(identifier, T::SOCKET_TYPE)?;
        let value = self
            .provider
            .get_input(identifier)
            .cloned()
            .unwrap_or_else(|| T::SOCKET_TYPE.default_value());
        self.typed(identifier, value)
    }

    /// Move the input value out. Any later access to the same input is a contract violation.
    pub fn extract_input<T: SocketData>(&mut self, identifier: &str) -> Result<T, ContractViolation> {
        self.check_input(identifier, T::SOCKET_TYPE)?;
        let value = self
            .provider
            .extract_input(identifier)
            .unwrap_or_else(|| T::SOCKET_TYPE.default_value());
        self.typed(identifier, value)
    }

    pub fn set_output<T: SocketData>(&mut self, identifier: &str, value: T) -> Result<(), ContractViolation> {
        let node_id = self.node_id().to_owned();
        let declaration = self.provider.declaration();
        let violation = match declaration.output(identifier) {
            None => Some(ContractViolation::UnknownOutput {
                node_id,
                identifier: identifier.to_owned(),
                available: declaration.available_output_identifiers(),
            }),
            Some(socket) if !socket.available => Some(ContractViolation::UnavailableOutput {
                node_id,
                identifier: identifier.to_owned(),
            }),
            Some(socket) if socket.socket_type != T::SOCKET_TYPE => {
                Some(ContractViolation::OutputTypeMismatch {
                    node_id,
                    identifier: identifier.to_owned(),
                    expected: socket.socket_type,
                    requested: T::SOCKET_TYPE,
                })
            }
            Some(_) if !self.provider.can_set_output(identifier) => {
                Some(ContractViolation::OutputAlreadySet {
                    node_id,
                    identifier: identifier.to_owned(),
                })
            }
            Some(_) => None,
        };
        if let Some(violation) = violation {
            return Err(self.violation(violation));
        }
        self.provider.set_output(identifier, value.into_socket());
        Ok(())
    }

    /// True when something downstream reads the output, or it is a graph result.
    pub fn output_is_required(&self, identifier: &str) -> bool {
        self.provider.output_is_required(identifier)
    }

    /// Record a diagnostic for this node. Dropped when no logger is attached.
    pub fn error_message_add(&mut self, severity: NodeWarningType, message: impl Into<String>) {
        if let Some(logger) = self.logger.as_deref_mut() {
            logger.add(severity, message);
        }
    }

    /// Name to show as the source of attributes this node creates.
    pub fn attribute_producer_name(&self) -> String {
        format!("{} node", self.provider.label())
    }

    fn available_input(&self, name: &str) -> Option<(String, SocketType)> {
        self.provider
            .declaration()
            .available_input_by_name(name)
            .map(|s| (s.identifier.clone(), s.socket_type))
    }

    fn unsupported_attribute_socket(&self, name: &str, socket_type: SocketType) -> ContractViolation {
        self.violation(ContractViolation::UnsupportedAttributeSocket {
            node_id: self.node_id().to_owned(),
            name: name.to_owned(),
            socket_type,
        })
    }

    /// Values of the input displayed as `name`, on `domain` of `component`, as `data_type`.
    ///
    /// A string input names an attribute to read; a literal input is broadcast. Without an
    /// available input of that name, or when the named attribute does not exist, `default`
    /// (or the type's default) is broadcast over the domain.
    pub fn get_input_attribute<'c>(
        &mut self,
        name: &str,
        component: &'c dyn GeometryComponent,
        domain: AttributeDomain,
        data_type: DataType,
        default: Option<&Value>,
    ) -> Result<VArray<'c>, ContractViolation> {
        let size = component.attribute_domain_size(domain);
        let broadcast_default = || {
            default
                .and_then(|value| VArray::single(data_type, value, size).ok())
                .unwrap_or_else(|| VArray::single_default(data_type, size))
        };

        let Some((identifier, socket_type)) = self.available_input(name) else {
            return Ok(broadcast_default());
        };

        match socket_type {
            SocketType::String => {
                let attribute_name: String = self.get_input(&identifier)?;
                if let Some(view) = component.attribute_try_get_for_read(&attribute_name, domain, data_type) {
                    return Ok(view);
                }
                if !attribute_name.is_empty() && size > 0 {
                    self.error_message_add(
                        NodeWarningType::Info,
                        format!("No attribute with name \"{attribute_name}\""),
                    );
                }
                Ok(broadcast_default())
            }
            SocketType::Float
            | SocketType::Int
            | SocketType::Vector
            | SocketType::Color
            | SocketType::Bool => {
                self.check_input(&identifier, socket_type)?;
                let literal = self
                    .provider
                    .get_input(&identifier)
                    .and_then(SocketValue::to_value)
                    .unwrap_or_default();
                Ok(VArray::single(data_type, &literal, size).unwrap_or_else(|_| broadcast_default()))
            }
            SocketType::Geometry => Err(self.unsupported_attribute_socket(name, socket_type)),
        }
    }

    /// Element type an attribute input provides: the stored type of a named attribute, or
    /// the natural type of a literal socket.
    pub fn get_input_attribute_data_type(
        &self,
        name: &str,
        component: &dyn GeometryComponent,
        default_type: DataType,
    ) -> Result<DataType, ContractViolation> {
        let Some((identifier, socket_type)) = self.available_input(name) else {
            return Ok(default_type);
        };
        match socket_type {
            SocketType::String => {
                let attribute_name: String = self.get_input(&identifier)?;
                Ok(component
                    .attribute_get_meta_data(&attribute_name)
                    .map_or(default_type, |meta| meta.data_type))
            }
            SocketType::Float => Ok(DataType::Float),
            SocketType::Int => Ok(DataType::Int32),
            SocketType::Vector => Ok(DataType::Float3),
            SocketType::Color => Ok(DataType::Color),
            SocketType::Bool => Ok(DataType::Bool),
            SocketType::Geometry => Err(self.unsupported_attribute_socket(name, socket_type)),
        }
    }

    /// Highest priority domain among the attributes named by the string inputs in `names`.
    /// Literal inputs and missing attributes do not take part.
    pub fn get_highest_priority_input_domain(
        &self,
        names: &[&str],
        component: &dyn GeometryComponent,
        default_domain: AttributeDomain,
    ) -> Result<AttributeDomain, ContractViolation> {
        let mut domains = Vec::with_capacity(names.len());
        for name in names {
            let Some((identifier, SocketType::String)) = self.available_input(name) else {
                continue;
            };
            let attribute_name: String = self.get_input(&identifier)?;
            if let Some(meta) = component.attribute_get_meta_data(&attribute_name) {
                domains.push(meta.domain);
            }
        }
        Ok(AttributeDomain::highest_priority(domains).unwrap_or(default_domain))
    }

    /// Report parts of `geometry_set` the geometry input `identifier` is declared to ignore.
    pub fn check_input_geometry_set(
        &mut self,
        identifier: &str,
        geometry_set: &GeometrySet,
    ) -> Result<(), ContractViolation> {
        let socket = self.input_socket(identifier)?;
        let only_realized_data = socket.only_realized_data;
        let only_instances = socket.only_instances;
        let supported_types = socket.supported_types.clone();

        if only_realized_data && geometry_set.has_instances() {
            self.error_message_add(NodeWarningType::Info, "Instances in input geometry are ignored");
        }
        if only_instances && geometry_set.has_realized_data() {
            self.error_message_add(NodeWarningType::Info, "Realized data in input geometry is ignored");
        }
        if supported_types.is_empty() {
            return Ok(());
        }
        for ty in geometry_set.gather_component_types(true, true) {
            if ty == GeometryComponentType::Instances || supported_types.contains(&ty) {
                continue;
            }
            self.error_message_add(
                NodeWarningType::Info,
                format!("Input geometry has unsupported type: {}", ty.name()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geonodes_geometry_core::{
        GArray, InstanceReference, InstancesComponent, Mesh, MeshComponent, MeshFace,
        PointCloud, PointCloudComponent, Transform, VolumeComponent, VolumeGrid,
    };

    fn quad() -> MeshComponent {
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
        MeshComponent::new(mesh)
    }

    fn provider(inputs: Vec<(SocketDeclaration, SocketValue)>) -> NodeExecProvider {
        let declaration = NodeDeclaration {
            inputs: inputs.iter().map(|(s, _)| s.clone()).collect(),
            outputs: vec![SocketDeclaration::geometry("Geometry")],
        };
        let mut provider =
            NodeExecProvider::new("node", "Attribute Math", NodeSettings::default(), declaration);
        for (socket, value) in inputs {
            if socket.available {
                provider.bind_input(socket.identifier, value);
            }
        }
        provider
    }

    fn string(name: &str, value: &str) -> (SocketDeclaration, SocketValue) {
        (SocketDeclaration::string(name), SocketValue::String(value.into()))
    }

    // --- Socket contracts ------------------------------------------------

    #[test]
    fn it_should_allow_repeated_get_but_single_extract() {
        let mut p = provider(vec![(SocketDeclaration::float("Radius"), SocketValue::Float(2.0))]);
        let mut params = GeoNodeExecParams::new(&mut p, None);
        assert_eq!(params.get_input::<f32>("Radius"), Ok(2.0));
        assert_eq!(params.get_input::<f32>("Radius"), Ok(2.0));
        assert_eq!(params.extract_input::<f32>("Radius"), Ok(2.0));
        assert!(matches!(
            params.extract_input::<f32>("Radius"),
            Err(ContractViolation::InputAlreadyExtracted { .. })
        ));
        assert!(matches!(
            params.get_input::<f32>("Radius"),
            Err(ContractViolation::InputAlreadyExtracted { .. })
        ));
    }

    #[test]
    fn it_should_list_available_identifiers_for_unknown_inputs() {
        let mut p = provider(vec![string("A", ""), (SocketDeclaration::float("B"), SocketValue::Float(0.0))]);
        let params = GeoNodeExecParams::new(&mut p, None);
        match params.get_input::<f32>("C") {
            Err(ContractViolation::UnknownInput { available, .. }) => {
                assert_eq!(available, vec!["A".to_string(), "B".to_string()]);
            }
            other => panic!("expected unknown input, got {other:?}"),
        }
    }

    #[test]
    fn it_should_leave_disabled_sockets_out_of_the_available_list() {
        let declaration = NodeDeclaration {
            inputs: vec![
                SocketDeclaration::int("Count").available(false),
                SocketDeclaration::float("Resolution"),
            ],
            outputs: vec![
                SocketDeclaration::geometry("Mesh"),
                SocketDeclaration::string("Outer Points").available(false),
            ],
        };
        let mut p = NodeExecProvider::new("line", "Mesh Line", NodeSettings::default(), declaration);
        let mut params = GeoNodeExecParams::new(&mut p, None);
        match params.get_input::<f32>("Offset") {
            Err(ContractViolation::UnknownInput { available, .. }) => {
                assert_eq!(available, vec!["Resolution".to_string()]);
            }
            other => panic!("expected unknown input, got {other:?}"),
        }
        match params.set_output("Curve", GeometrySet::new()) {
            Err(ContractViolation::UnknownOutput { available, .. }) => {
                assert_eq!(available, vec!["Mesh".to_string()]);
            }
            other => panic!("expected unknown output, got {other:?}"),
        }
    }

    #[test]
    fn it_should_reject_mismatched_and_disabled_sockets() {
        let mut p = provider(vec![
            (SocketDeclaration::int("Count"), SocketValue::Int(3)),
            (SocketDeclaration::float("Resolution").available(false), SocketValue::Float(1.0)),
        ]);
        let mut params = GeoNodeExecParams::new(&mut p, None);
        assert!(matches!(
            params.get_input::<f32>("Count"),
            Err(ContractViolation::InputTypeMismatch {
                expected: SocketType::Int,
                requested: SocketType::Float,
                ..
            })
        ));
        assert!(matches!(
            params.get_input::<f32>("Resolution"),
            Err(ContractViolation::UnavailableInput { .. })
        ));
        assert!(matches!(
            params.set_output("Geometry", 1.0f32),
            Err(ContractViolation::OutputTypeMismatch { .. })
        ));
        assert!(matches!(
            params.set_output("Mesh", GeometrySet::new()),
            Err(ContractViolation::UnknownOutput { .. })
        ));
    }

    #[test]
    fn it_should_set_each_output_once() {
        let mut p = provider(vec![]);
        let mut params = GeoNodeExecParams::new(&mut p, None);
        params.set_output("Geometry", GeometrySet::new()).unwrap();
        assert!(matches!(
            params.set_output("Geometry", GeometrySet::new()),
            Err(ContractViolation::OutputAlreadySet { .. })
        ));
    }

    #[test]
    fn it_should_name_the_producer_after_the_label() {
        let mut p = provider(vec![]);
        let params = GeoNodeExecParams::new(&mut p, None);
        assert_eq!(params.attribute_producer_name(), "Attribute Math node");
    }

    // --- Attribute inputs ------------------------------------------------

    #[test]
    fn it_should_broadcast_defaults_for_unbound_names() {
        let component = quad();
        let mut logger = LocalLogger::new("node");
        let mut p = provider(vec![]);
        let mut params = GeoNodeExecParams::new(&mut p, Some(&mut logger));
        let view = params
            .get_input_attribute("Missing", &component, AttributeDomain::Point, DataType::Float, Some(&Value::Float(0.5)))
            .unwrap();
        assert!(view.is_single());
        assert_eq!(view.len(), 4);
        assert!(view.iter().all(|v| v == Value::Float(0.5)));
        assert!(logger.warnings().is_empty());
    }

    #[test]
    fn it_should_read_named_attributes_with_conversion() {
        let mut component = quad();
        component
            .attribute_try_create("weight", AttributeDomain::Point, GArray::from(vec![1i32, 2, 3, 4]))
            .unwrap();
        let mut p = provider(vec![string("A", "weight")]);
        let mut params = GeoNodeExecParams::new(&mut p, None);
        let view = params
            .get_input_attribute("A", &component, AttributeDomain::Point, DataType::Float, None)
            .unwrap();
        assert_eq!(view.materialize(), GArray::Float(vec![1.0, 2.0, 3.0, 4.0]));
    }

    #[test]
    fn it_should_report_missing_attributes_as_info() {
        let component = quad();
        let mut logger = LocalLogger::new("node");
        let mut p = provider(vec![string("A", "nope"), string("B", "")]);
        let mut params = GeoNodeExecParams::new(&mut p, Some(&mut logger));
        let a = params
            .get_input_attribute("A", &component, AttributeDomain::Face, DataType::Float3, None)
            .unwrap();
        assert_eq!(a.get(0), Value::Vec3([0.0; 3]));
        params
            .get_input_attribute("B", &component, AttributeDomain::Face, DataType::Float3, None)
            .unwrap();
        assert_eq!(logger.warnings().len(), 1);
        assert_eq!(logger.warnings()[0].severity, NodeWarningType::Info);
        assert_eq!(logger.warnings()[0].message, "No attribute with name \"nope\"");
    }

    #[test]
    fn it_should_stay_quiet_on_empty_domains() {
        let component = MeshComponent::default();
        let mut logger = LocalLogger::new("node");
        let mut p = provider(vec![string("A", "nope")]);
        let mut params = GeoNodeExecParams::new(&mut p, Some(&mut logger));
        let view = params
            .get_input_attribute("A", &component, AttributeDomain::Point, DataType::Float, None)
            .unwrap();
        assert!(view.is_empty());
        assert!(logger.warnings().is_empty());
    }

    #[test]
    fn it_should_broadcast_literal_inputs() {
        let component = quad();
        let mut p = provider(vec![(SocketDeclaration::vector("B"), SocketValue::Vector([1.0, 2.0, 3.0]))]);
        let mut params = GeoNodeExecParams::new(&mut p, None);
        let view = params
            .get_input_attribute("B", &component, AttributeDomain::Corner, DataType::Float, None)
            .unwrap();
        assert_eq!(view.len(), 4);
        assert_eq!(view.get_single(), Some(&Value::Float(2.0)));
    }

    #[test]
    fn it_should_refuse_geometry_sockets_as_attributes() {
        let component = quad();
        let mut p = provider(vec![(SocketDeclaration::geometry("Geometry"), SocketValue::Geometry(GeometrySet::new()))]);
        let mut params = GeoNodeExecParams::new(&mut p, None);
        assert!(matches!(
            params.get_input_attribute("Geometry", &component, AttributeDomain::Point, DataType::Float, None),
            Err(ContractViolation::UnsupportedAttributeSocket { .. })
        ));
    }

    #[test]
    fn it_should_resolve_input_data_types() {
        let mut component = quad();
        component
            .attribute_try_create("tint", AttributeDomain::Face, GArray::from(vec![[1.0f32, 0.0, 0.0, 1.0]]))
            .unwrap();
        let mut p = provider(vec![
            string("A", "tint"),
            string("B", "missing"),
            (SocketDeclaration::int("C"), SocketValue::Int(1)),
        ]);
        let params = GeoNodeExecParams::new(&mut p, None);
        let resolve = |name: &str| params.get_input_attribute_data_type(name, &component, DataType::Float).unwrap();
        assert_eq!(resolve("A"), DataType::Color);
        assert_eq!(resolve("B"), DataType::Float);
        assert_eq!(resolve("C"), DataType::Int32);
        assert_eq!(resolve("D"), DataType::Float);
    }

    #[test]
    fn it_should_pick_the_highest_priority_domain() {
        let mut component = quad();
        component
            .attribute_try_create("f", AttributeDomain::Face, GArray::from(vec![1.0f32]))
            .unwrap();
        component
            .attribute_try_create("p", AttributeDomain::Point, GArray::from(vec![0.0f32; 4]))
            .unwrap();
        let mut p = provider(vec![
            string("A", "f"),
            string("B", "p"),
            (SocketDeclaration::float("C"), SocketValue::Float(1.0)),
            string("D", "missing"),
        ]);
        let params = GeoNodeExecParams::new(&mut p, None);
        let domain = |names: &[&str]| {
            params
                .get_highest_priority_input_domain(names, &component, AttributeDomain::Instance)
                .unwrap()
        };
        assert_eq!(domain(&["A", "B", "C"]), AttributeDomain::Point);
        assert_eq!(domain(&["A", "D"]), AttributeDomain::Face);
        assert_eq!(domain(&["C", "D"]), AttributeDomain::Instance);
    }

    // --- Geometry checks -------------------------------------------------

    fn geometry_input(socket: SocketDeclaration) -> NodeExecProvider {
        provider(vec![(socket, SocketValue::Geometry(GeometrySet::new()))])
    }

    fn mesh_with_instances() -> GeometrySet {
        let mut set = GeometrySet::new();
        set.add(quad());
        let instances = set.get_component_for_write::<InstancesComponent>();
        let handle = instances.add_reference(InstanceReference::Object("Cube".into()));
        instances.add_instance(handle, Transform::IDENTITY);
        set
    }

    #[test]
    fn it_should_warn_once_about_ignored_instances() {
        let mut logger = LocalLogger::new("node");
        let mut p = geometry_input(SocketDeclaration::geometry("Geometry").only_realized_data());
        let mut params = GeoNodeExecParams::new(&mut p, Some(&mut logger));
        params.check_input_geometry_set("Geometry", &mesh_with_instances()).unwrap();
        assert_eq!(logger.warnings().len(), 1);
        assert_eq!(logger.warnings()[0].message, "Instances in input geometry are ignored");
    }

    #[test]
    fn it_should_warn_about_ignored_realized_data() {
        let mut logger = LocalLogger::new("node");
        let mut p = geometry_input(SocketDeclaration::geometry("Geometry").only_instances());
        let mut params = GeoNodeExecParams::new(&mut p, Some(&mut logger));
        params.check_input_geometry_set("Geometry", &mesh_with_instances()).unwrap();
        let messages: Vec<_> = logger.warnings().iter().map(|w| w.message.as_str()).collect();
        assert_eq!(messages, vec!["Realized data in input geometry is ignored"]);
    }

    #[test]
    fn it_should_list_each_unsupported_type() {
        let mut logger = LocalLogger::new("node");
        let mut p = geometry_input(
            SocketDeclaration::geometry("Geometry").supported_type(&[GeometryComponentType::Mesh]),
        );
        let mut set = GeometrySet::create_with_point_cloud(PointCloud::new(2));
        set.add(VolumeComponent::new(vec![VolumeGrid::new("density", 0.1)]));
        set.add(quad());
        let mut params = GeoNodeExecParams::new(&mut p, Some(&mut logger));
        params.check_input_geometry_set("Geometry", &set).unwrap();
        let messages: Vec<_> = logger.warnings().iter().map(|w| w.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Input geometry has unsupported type: Point Cloud",
                "Input geometry has unsupported type: Volume",
            ]
        );
        assert!(set.has::<PointCloudComponent>());
    }

    #[test]
    fn it_should_drop_messages_without_a_logger() {
        let mut p = geometry_input(SocketDeclaration::geometry("Geometry").only_realized_data());
        let mut params = GeoNodeExecParams::new(&mut p, None);
        params.check_input_geometry_set("Geometry", &mesh_with_instances()).unwrap();
        params.error_message_add(NodeWarningType::Error, "dropped");
    }
}
