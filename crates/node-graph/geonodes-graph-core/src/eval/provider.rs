use hashbrown::{HashMap, HashSet};

use crate::schema::NodeDeclaration;
use crate::types::{NodeId, NodeSettings, SocketValue};

/// Socket values of a single node invocation.
///
/// Every available input is bound before the node runs. Extracting an input removes it, so
/// each input can be moved out at most once; each output can be written at most once.
#[derive(Debug, Clone)]
pub struct NodeExecProvider {
    node_id: NodeId,
    label: String,
    settings: NodeSettings,
    declaration: NodeDeclaration,
    inputs: HashMap<String, SocketValue>,
    outputs: HashMap<String, SocketValue>,
    required_outputs: HashSet<String>,
}

impl NodeExecProvider {
    pub fn new(
        node_id: impl Into<NodeId>,
        label: impl Into<String>,
        settings: NodeSettings,
        declaration: NodeDeclaration,
    ) -> Self {
        NodeExecProvider {
            node_id: node_id.into(),
            label: label.into(),
            settings,
            declaration,
            inputs: HashMap::new(),
            outputs: HashMap::new(),
            required_outputs: HashSet::new(),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn settings(&self) -> &NodeSettings {
        &self.settings
    }

    pub fn declaration(&self) -> &NodeDeclaration {
        &self.declaration
    }

    pub fn bind_input(&mut self, identifier: impl Into<String>, value: SocketValue) {
        self.inputs.insert(identifier.into(), value);
    }

    pub fn require_output(&mut self, identifier: impl Into<String>) {
        self.required_outputs.insert(identifier.into());
    }

    /// False once the input has been extracted (or when it was never bound).
    pub fn can_get_input(&self, identifier: &str) -> bool {
        self.inputs.contains_key(identifier)
    }

    pub fn can_set_output(&self, identifier: &str) -> bool {
        !self.outputs.contains_key(identifier)
    }

    pub fn get_input(&self, identifier: &str) -> Option<&SocketValue> {
        self.inputs.get(identifier)
    }

    pub fn extract_input(&mut self, identifier: &str) -> Option<SocketValue> {
        self.inputs.remove(identifier)
    }

    pub fn set_output(&mut self, identifier: impl Into<String>, value: SocketValue) {
        self.outputs.insert(identifier.into(), value);
    }

    pub fn output_is_required(&self, identifier: &str) -> bool {
        self.required_outputs.contains(identifier)
    }

    pub fn output(&self, identifier: &str) -> Option<&SocketValue> {
        self.outputs.get(identifier)
    }

    /// The written outputs, with every available output the node left unset filled with
    /// its declared default.
    pub fn into_outputs(mut self) -> HashMap<String, SocketValue> {
        for socket in self.declaration.outputs.iter().filter(|s| s.available) {
            if !self.outputs.contains_key(&socket.identifier) {
                log::debug!(
                    "node '{}' left output '{}' unset; using its default",
                    self.node_id,
                    socket.identifier
                );
                self.outputs
                    .insert(socket.identifier.clone(), socket.default_socket_value());
            }
        }
        self.outputs
    }
}
