//! Evaluation pipeline for geometry node graphs.
//!
//! The `eval` module turns a [`GraphSpec`](crate::types::GraphSpec) into socket values by
//! walking the graph level by level in topological order:
//!
//! - [`graph_runtime`] holds outputs, diagnostics and staged host inputs between evaluations.
//! - [`provider`] owns the socket values of one node invocation.
//! - [`exec_params`] is the checked API node bodies use to read inputs and write outputs.
//! - [`diagnostics`] collects per-invocation diagnostics and merges them at join points.
//! - [`eval_node`] binds, runs and commits a single node.
//!
//! Integration code should primarily interact with [`GraphRuntime`] and [`evaluate_all`].

use crate::error::EvalError;
use crate::schema::{NodeDeclaration, NodeRegistry, NodeTypeInfo};
use crate::types::{GraphSpec, NodeId, NodeType, SocketType};
use geonodes_api_core::implicit_conversions;
use hashbrown::{HashMap, HashSet};

pub mod diagnostics;
pub mod eval_node;
pub mod exec_params;
mod graph_runtime;
pub mod provider;

pub use eval_node::eval_node;
pub use exec_params::GeoNodeExecParams;
pub use graph_runtime::{GraphRuntime, StagedInput};
pub use diagnostics::{EvalLog, LocalLogger, NodeWarning, NodeWarningType};
pub use provider::NodeExecProvider;

use eval_node::{bind_node, commit_node, execute_node, NodeRun};


/// Evaluate every node in `spec` with the built-in node types, updating `rt` in-place.
pub fn evaluate_all(rt: &mut GraphRuntime, spec: &GraphSpec) -> Result<(), EvalError> {
    evaluate_with_registry(rt, spec, NodeRegistry::builtin())
}

/// Evaluate every node in `spec`, resolving node types through `registry`.
///
/// Outputs and diagnostics of the previous evaluation are cleared first. Values staged with
/// [`GraphRuntime::set_input`] since the last evaluation become visible. Any error halts
/// evaluation; diagnostics of nodes that already ran stay in `rt.log`.
pub fn evaluate_with_registry(
    rt: &mut GraphRuntime,
    spec: &GraphSpec,
    registry: &NodeRegistry,
) -> Result<(), EvalError> {
    rt.advance_epoch();
    rt.outputs.clear();
    rt.log.clear();

    let mut seen = HashSet::new();
    for node in &spec.nodes {
        if !seen.insert(node.id.as_str()) {
            return Err(EvalError::DuplicateNode(node.id.clone()));
        }
    }

    let mut declared: HashMap<&str, (&NodeTypeInfo, NodeDeclaration)> = HashMap::new();
    for node in &spec.nodes {
        let info = registry
            .get(node.kind)
            .ok_or(EvalError::MissingNodeType(node.kind))?;
        declared.insert(node.id.as_str(), (info, (info.declare)(&node.settings)));
    }
    validate_links(spec, &declared)?;
    let required = required_outputs(spec, &declared);

    let levels = crate::topo::topo_levels(&spec.nodes)?;
    let nodes: HashMap<&str, _> = spec.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    let parallel = rt.config.parallel && rt.config.max_threads > 1;
    for level in levels {
        let mut jobs = Vec::with_capacity(level.len());
        for id in &level {
            let (Some(node), Some((info, declaration))) = (nodes.get(id.as_str()), declared.get(id.as_str())) else {
                continue;
            };
            if !parallel || level.len() == 1 {
                eval_node(rt, info, node, declaration.clone(), required.get(id))?;
                continue;
            }
            jobs.push((*info, bind_node(rt, info, node, declaration.clone(), required.get(id))?));
        }
        if jobs.is_empty() {
            continue;
        }
        log::debug!("running {} nodes of one level in parallel", jobs.len());
        let mut first_error = None;
        for run in run_parallel(jobs, rt.config.max_threads) {
            if let Err(err) = commit_node(rt, run) {
                first_error.get_or_insert(err);
            }
        }
        if let Some(err) = first_error {
            return Err(err);
        }
    }
    Ok(())
}

/// Like [`evaluate_all`], but a contract violation aborts the process.
///
/// Contract violations are bugs in node implementations, so hosts that cannot recover from
/// them should drive evaluation through this function.
pub fn evaluate_or_abort(rt: &mut GraphRuntime, spec: &GraphSpec) -> Result<(), EvalError> {
    abort_on_violation(evaluate_all(rt, spec))
}

fn abort_on_violation(result: Result<(), EvalError>) -> Result<(), EvalError> {
    match result {
        Err(EvalError::Contract(violation)) => panic!("node contract violated: {violation}"),
        other => other,
    }
}

fn link_compatible(from: SocketType, to: SocketType) -> bool {
    if from == to {
        return true;
    }
    match (from.value_kind(), to.value_kind()) {
        (Some(from), Some(to)) => implicit_conversions().is_convertible(from, to),
        _ => false,
    }
}

fn validate_links(
    spec: &GraphSpec,
    declared: &HashMap<&str, (&NodeTypeInfo, NodeDeclaration)>,
) -> Result<(), EvalError> {
    for node in &spec.nodes {
        let Some((_, declaration)) = declared.get(node.id.as_str()) else {
            continue;
        };
        for (identifier, link) in &node.inputs {
            let input = declaration.input(identifier).ok_or_else(|| EvalError::UnknownSocket {
                node_id: node.id.clone(),
                socket: identifier.clone(),
            })?;
            let (_, upstream) = declared.get(link.node_id.as_str()).ok_or_else(|| EvalError::UnknownNode {
                node_id: node.id.clone(),
                linked: link.node_id.clone(),
            })?;
            let output = upstream.output(&link.output_key).ok_or_else(|| EvalError::UnknownSocket {
                node_id: link.node_id.clone(),
                socket: link.output_key.clone(),
            })?;
            if !link_compatible(output.socket_type, input.socket_type) {
                return Err(EvalError::IncompatibleLink {
                    node_id: node.id.clone(),
                    input: identifier.clone(),
                    from: output.socket_type,
                    to: input.socket_type,
                });
            }
        }
    }
    Ok(())
}

/// Outputs someone reads: linked outputs, group outputs, and without a group output node
/// every output of the nodes nothing links from.
fn required_outputs(
    spec: &GraphSpec,
    declared: &HashMap<&str, (&NodeTypeInfo, NodeDeclaration)>,
) -> HashMap<NodeId, HashSet<String>> {
    let mut required: HashMap<NodeId, HashSet<String>> = HashMap::new();
    for node in &spec.nodes {
        for link in node.inputs.values() {
            required
                .entry(link.node_id.clone())
                .or_default()
                .insert(link.output_key.clone());
        }
    }
    let has_group_output = spec.nodes.iter().any(|n| n.kind == NodeType::GroupOutput);
    for node in &spec.nodes {
        let is_result = if has_group_output {
            node.kind == NodeType::GroupOutput
        } else {
            !required.contains_key(&node.id)
        };
        if !is_result {
            continue;
        }
        if let Some((_, declaration)) = declared.get(node.id.as_str()) {
            required
                .entry(node.id.clone())
                .or_default()
                .extend(declaration.output_identifiers());
        }
    }
    required
}

/// Run `jobs` on up to `max_threads` scoped threads. Runs come back in job order.
fn run_parallel(
    jobs: Vec<(&NodeTypeInfo, crate::eval::NodeExecProvider)>,
    max_threads: usize,
) -> Vec<NodeRun> {
    let threads = max_threads.clamp(1, jobs.len().max(1));
    let mut batches: Vec<Vec<_>> = (0..threads).map(|_| Vec::new()).collect();
    for (i, (info, provider)) in jobs.into_iter().enumerate() {
        batches[i % threads].push((i, info, provider));
    }

    let mut runs: Vec<(usize, NodeRun)> = std::thread::scope(|scope| {
        let handles: Vec<_> = batches
            .into_iter()
            .map(|batch| {
                scope.spawn(move || {
                    batch
                        .into_iter()
                        .map(|(i, info, provider)| (i, execute_node(info, provider)))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| match handle.join() {
                Ok(runs) => runs,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });
    runs.sort_by_key(|(i, _)| *i);
    runs.into_iter().map(|(_, run)| run).collect()
}
