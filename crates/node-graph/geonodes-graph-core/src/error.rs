//! Errors raised while building or evaluating a graph.
//!
//! [`ContractViolation`]s are programming errors in a node implementation: asking for a
//! socket that does not exist, reading an input twice after moving it out, writing an output
//! twice. They are returned as values so the evaluator can attach context, and only the
//! outermost driver ([`evaluate_or_abort`](crate::eval::evaluate_or_abort)) turns them into a
//! panic. Bad user data is never an error; nodes substitute defaults and log diagnostics.

use geonodes_api_core::json::JsonError;
use geonodes_api_core::ValueKind;
use thiserror::Error;

use crate::types::{NodeId, NodeType, SocketType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractViolation {
    #[error("node '{node_id}' has no input '{identifier}' (available: {available:?})")]
    UnknownInput {
        node_id: NodeId,
        identifier: String,
        available: Vec<String>,
    },
    #[error("node '{node_id}' has no output '{identifier}' (available: {available:?})")]
    UnknownOutput {
        node_id: NodeId,
        identifier: String,
        available: Vec<String>,
    },
    #[error("input '{identifier}' of node '{node_id}' is disabled")]
    UnavailableInput { node_id: NodeId, identifier: String },
    #[error("output '{identifier}' of node '{node_id}' is disabled")]
    UnavailableOutput { node_id: NodeId, identifier: String },
    #[error("input '{identifier}' of node '{node_id}' was already extracted")]
    InputAlreadyExtracted { node_id: NodeId, identifier: String },
    #[error("output '{identifier}' of node '{node_id}' was already set")]
    OutputAlreadySet { node_id: NodeId, identifier: String },
    #[error("input '{identifier}' of node '{node_id}' is {expected}, requested {requested}")]
    InputTypeMismatch {
        node_id: NodeId,
        identifier: String,
        expected: SocketType,
        requested: SocketType,
    },
    #[error("output '{identifier}' of node '{node_id}' is {expected}, got {requested}")]
    OutputTypeMismatch {
        node_id: NodeId,
        identifier: String,
        expected: SocketType,
        requested: SocketType,
    },
    #[error("input '{name}' of node '{node_id}' is a {socket_type} socket and cannot feed an attribute")]
    UnsupportedAttributeSocket {
        node_id: NodeId,
        name: String,
        socket_type: SocketType,
    },
}

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("cycle detected in graph")]
    Cycle,
    #[error("duplicate node id '{0}'")]
    DuplicateNode(NodeId),
    #[error("node '{node_id}' links to unknown node '{linked}'")]
    UnknownNode { node_id: NodeId, linked: NodeId },
    #[error("node '{node_id}' has no socket '{socket}'")]
    UnknownSocket { node_id: NodeId, socket: String },
    #[error("cannot link {from} output into {to} input '{input}' of node '{node_id}'")]
    IncompatibleLink {
        node_id: NodeId,
        input: String,
        from: SocketType,
        to: SocketType,
    },
    #[error("no node type registered for {0:?}")]
    MissingNodeType(NodeType),
    #[error("literal for '{input}' of node '{node_id}' is {kind}, which does not convert to {expected}")]
    InvalidLiteral {
        node_id: NodeId,
        input: String,
        kind: ValueKind,
        expected: SocketType,
    },
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error("graph json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Contract(#[from] ContractViolation),
}
