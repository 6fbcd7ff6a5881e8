//! Node diagnostics.
//!
//! Every node invocation writes into its own [`LocalLogger`]; the scheduler merges the local
//! loggers into the runtime's [`EvalLog`] once the invocations of a level have joined.

use serde::{Deserialize, Serialize};

use crate::types::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeWarningType {
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWarning {
    pub node_id: NodeId,
    pub severity: NodeWarningType,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct LocalLogger {
    node_id: NodeId,
    warnings: Vec<NodeWarning>,
}

impl LocalLogger {
    pub fn new(node_id: impl Into<NodeId>) -> Self {
        LocalLogger {
            node_id: node_id.into(),
            warnings: Vec::new(),
        }
    }

    pub fn add(&mut self, severity: NodeWarningType, message: impl Into<String>) {
        self.warnings.push(NodeWarning {
            node_id: self.node_id.clone(),
            severity,
            message: message.into(),
        });
    }

    pub fn warnings(&self) -> &[NodeWarning] {
        &self.warnings
    }
}

/// Diagnostics of one evaluation, in node execution order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalLog {
    warnings: Vec<NodeWarning>,
}

impl EvalLog {
    pub fn merge(&mut self, local: LocalLogger, echo: bool) {
        if echo {
            for w in &local.warnings {
                match w.severity {
                    NodeWarningType::Error => log::error!("[{}] {}", w.node_id, w.message),
                    NodeWarningType::Warning => log::warn!("[{}] {}", w.node_id, w.message),
                    NodeWarningType::Info => log::info!("[{}] {}", w.node_id, w.message),
                }
            }
        }
        self.warnings.extend(local.warnings);
    }

    pub fn warnings(&self) -> &[NodeWarning] {
        &self.warnings
    }

    pub fn for_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a NodeWarning> + 'a {
        self.warnings.iter().filter(move |w| w.node_id == node_id)
    }

    pub fn drain(&mut self) -> Vec<NodeWarning> {
        std::mem::take(&mut self.warnings)
    }

    pub fn clear(&mut self) {
        self.warnings.clear();
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }
}
