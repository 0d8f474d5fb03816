use thiserror::Error;

use crate::graph::node::NodeId;

/// Configuration errors raised while building an instrument graph.
///
/// All of these are detected before the first tick runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The node dependencies do not form a DAG.
    #[error("instrument graph contains a cycle through {node}")]
    Cycle { node: NodeId },
    /// The output node or an input reference is not part of the graph.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    /// Two nodes share the same id.
    #[error("node {0} was connected twice")]
    DuplicateNode(NodeId),
    /// A node has the wrong number of inputs for its kind.
    #[error("{node} expects {expected} inputs, found {found}")]
    Arity {
        node: NodeId,
        expected: usize,
        found: usize,
    },
    /// A static parameter can never produce a meaningful signal.
    #[error("{parameter} out of range: {value}")]
    InvalidParameterRange { parameter: &'static str, value: f64 },
}

impl GraphError {
    pub(crate) fn invalid(parameter: &'static str, value: impl Into<f64>) -> Self {
        Self::InvalidParameterRange {
            parameter,
            value: value.into(),
        }
    }
}
