//! Per-node evaluation: bind inputs, run the node body, commit outputs and diagnostics.

use crate::error::{ContractViolation, EvalError};
use crate::schema::{NodeDeclaration, NodeTypeInfo};
use crate::types::{NodeId, NodeSpec, NodeType, SocketValue};
use hashbrown::{HashMap, HashSet};

use super::exec_params::GeoNodeExecParams;
use super::graph_runtime::GraphRuntime;
use super::diagnostics::LocalLogger;
use super::provider::NodeExecProvider;

/// Result of running one node, held until it is committed to the runtime.
#[derive(Debug)]
pub(crate) struct NodeRun {
    pub node_id: NodeId,
    pub outputs: HashMap<String, SocketValue>,
    pub logger: LocalLogger,
    pub result: Result<(), ContractViolation>,
}

/// Resolve the value of every available input of `node`.
///
/// Precedence: link, then staged host input (group inputs only), then the node's literal,
/// then the declared default.
pub(crate) fn bind_node(
    rt: &GraphRuntime,
    info: &NodeTypeInfo,
    node: &NodeSpec,
    declaration: NodeDeclaration,
    required: Option<&HashSet<String>>,
) -> Result<NodeExecProvider, EvalError> {
    if let Some(identifier) = node.values.keys().find(|k| declaration.input(k).is_none()) {
        return Err(EvalError::UnknownSocket {
            node_id: node.id.clone(),
            socket: identifier.clone(),
        });
    }

    let label = node.label.clone().unwrap_or_else(|| info.name.to_string());
    let mut provider = NodeExecProvider::new(node.id.clone(), label, node.settings.clone(), declaration);
    let mut bound = Vec::new();
    for socket in provider.declaration().inputs.iter().filter(|s| s.available) {
        let linked = node.inputs.get(&socket.identifier).and_then(|link| {
            let value = rt.output(&link.node_id, &link.output_key);
            if value.is_none() {
                log::debug!(
                    "'{}' reads missing output '{}' of '{}'; using default",
                    node.id,
                    link.output_key,
                    link.node_id
                );
            }
            value?.clone().convert_to(socket.socket_type)
        });
        let value = match linked {
            Some(value) => value,
            None => match staged_input(rt, node).and_then(|v| v.convert_to(socket.socket_type)) {
                Some(value) => value,
                None => match node.values.get(&socket.identifier) {
                    Some(literal) => SocketValue::from_value(literal, socket.socket_type).ok_or_else(|| {
                        EvalError::InvalidLiteral {
                            node_id: node.id.clone(),
                            input: socket.identifier.clone(),
                            kind: literal.kind(),
                            expected: socket.socket_type,
                        }
                    })?,
                    None => socket.default_socket_value(),
                },
            },
        };
        bound.push((socket.identifier.clone(), value));
    }
    for (identifier, value) in bound {
        provider.bind_input(identifier, value);
    }
    for identifier in required.into_iter().flatten() {
        provider.require_output(identifier.clone());
    }
    Ok(provider)
}

fn staged_input(rt: &GraphRuntime, node: &NodeSpec) -> Option<SocketValue> {
    if node.kind != NodeType::GroupInput {
        return None;
    }
    let key = node.settings.name.as_deref().unwrap_or(&node.id);
    let staged = rt.get_input(key);
    if staged.is_none() {
        log::warn!("group input '{}' has no staged value for '{key}'", node.id);
    }
    Some(staged?.value.clone())
}

/// Run the node body with its own logger.
pub(crate) fn execute_node(info: &NodeTypeInfo, mut provider: NodeExecProvider) -> NodeRun {
    let mut logger = LocalLogger::new(provider.node_id());
    let result = {
        let mut params = GeoNodeExecParams::new(&mut provider, Some(&mut logger));
        (info.execute)(&mut params)
    };
    NodeRun {
        node_id: provider.node_id().to_owned(),
        outputs: provider.into_outputs(),
        logger,
        result,
    }
}

/// Store the outputs and diagnostics of `run`; a contract violation becomes an error.
pub(crate) fn commit_node(rt: &mut GraphRuntime, run: NodeRun) -> Result<(), EvalError> {
    rt.log.merge(run.logger, rt.config.log_diagnostics);
    rt.outputs.insert(run.node_id, run.outputs);
    run.result.map_err(EvalError::from)
}

/// Evaluate a single node against the current runtime state.
pub fn eval_node(
    rt: &mut GraphRuntime,
    info: &NodeTypeInfo,
    node: &NodeSpec,
    declaration: NodeDeclaration,
    required: Option<&HashSet<String>>,
) -> Result<(), EvalError> {
    let provider = bind_node(rt, info, node, declaration, required)?;
    let run = execute_node(info, provider);
    commit_node(rt, run)
}
