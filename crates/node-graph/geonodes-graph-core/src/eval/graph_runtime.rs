//! Mutable runtime state that persists across evaluations.

use crate::config::EvalConfig;
use crate::types::{NodeId, SocketValue};
use geonodes_geometry_core::GeometrySet;
use hashbrown::HashMap;

use super::diagnostics::EvalLog;

/// Data staged by the host for consumption by a group input node.
#[derive(Debug, Clone)]
pub struct StagedInput {
    pub value: SocketValue,
    pub epoch: u64,
}

/// Runtime data shared by all node evaluations.
#[derive(Debug, Default)]
pub struct GraphRuntime {
    pub outputs: HashMap<NodeId, HashMap<String, SocketValue>>,
    pub log: EvalLog,
    pub staged_inputs: HashMap<String, StagedInput>,
    pub input_epoch: u64,
    pub config: EvalConfig,
}

impl GraphRuntime {
    pub fn with_config(config: EvalConfig) -> Self {
        GraphRuntime {
            config,
            ..Default::default()
        }
    }

    /// Advance the staging epoch. Values staged for `epoch + 1` become visible for the
    /// upcoming evaluation; older entries are dropped so stale geometry cannot leak through.
    pub fn advance_epoch(&mut self) {
        self.input_epoch = self.input_epoch.saturating_add(1);
        let current = self.input_epoch;
        self.staged_inputs.retain(|_, staged| staged.epoch == current);
    }

    /// Stage an input value for the next evaluation under `name`.
    pub fn set_input(&mut self, name: impl Into<String>, value: SocketValue) -> Option<StagedInput> {
        let staged = StagedInput {
            value,
            epoch: self.input_epoch.saturating_add(1),
        };
        self.staged_inputs.insert(name.into(), staged)
    }

    /// Fetch a staged input for the current evaluation epoch, if present.
    pub fn get_input(&self, name: &str) -> Option<&StagedInput> {
        self.staged_inputs
            .get(name)
            .filter(|staged| staged.epoch == self.input_epoch)
    }

    pub fn output(&self, node_id: &str, key: &str) -> Option<&SocketValue> {
        self.outputs.get(node_id)?.get(key)
    }

    /// The geometry produced on `key` by `node_id`, if that output is a geometry socket.
    pub fn geometry_output(&self, node_id: &str, key: &str) -> Option<&GeometrySet> {
        match self.output(node_id, key)? {
            SocketValue::Geometry(set) => Some(set),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_inputs_live_for_one_epoch() {
        let mut rt = GraphRuntime::default();
        rt.set_input("mesh", SocketValue::Geometry(GeometrySet::new()));
        assert!(rt.get_input("mesh").is_none());
        rt.advance_epoch();
        assert!(rt.get_input("mesh").is_some());
        rt.advance_epoch();
        assert!(rt.get_input("mesh").is_none());
        assert!(rt.staged_inputs.is_empty());
    }
}
