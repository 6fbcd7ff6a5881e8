//! geonodes-graph-core: socket declarations, the node registry, the per-invocation execution
//! context and the evaluator that runs geometry node graphs.
//!
//! Hosts build a [`GraphSpec`], stage geometry on a [`GraphRuntime`] and call [`evaluate_all`].
//! Results and diagnostics are read back from the runtime afterwards.

pub mod config;
pub mod error;
pub mod eval;
pub mod nodes;
pub mod schema;
pub mod topo;
pub mod types;

pub use config::EvalConfig;
pub use error::{ContractViolation, EvalError};
pub use eval::{
    evaluate_all, evaluate_or_abort, evaluate_with_registry, EvalLog, GeoNodeExecParams,
    GraphRuntime, LocalLogger, NodeExecProvider, NodeWarning, NodeWarningType, StagedInput,
};
pub use schema::{NodeDeclaration, NodeRegistry, NodeTypeInfo, SocketDeclaration};
pub use topo::{topo_levels, topo_order};
pub use types::*;
