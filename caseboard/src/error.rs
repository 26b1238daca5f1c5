use crate::model::{EdgeId, NodeId};
use thiserror::Error;

/// Why an edge was refused at creation. Refused edges never enter the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum InvalidEdge {
    #[error("node {0} cannot be connected to itself")]
    SelfLoop(NodeId),
    #[error("node {0} does not exist")]
    UnknownEndpoint(NodeId),
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum BoardError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
    #[error("unknown edge {0}")]
    UnknownEdge(EdgeId),
    #[error("node {node} has no field `{name}`")]
    UnknownField { node: NodeId, name: String },
    #[error("parameter `{0}` must be finite")]
    NonFinite(&'static str),
    #[error(transparent)]
    InvalidEdge(#[from] InvalidEdge),
    #[error("no {0} ids left")]
    IdsExhausted(&'static str),
}

/// A document that could not be loaded at all, or a failed write.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("document root must be a JSON object")]
    NotAnObject,
    #[error("`{0}` must be a list")]
    NotAList(&'static str),
    #[error("document holds {count} {kind}, more than the limit of {max}")]
    TooLarge {
        kind: &'static str,
        count: usize,
        max: usize,
    },
    #[error("a gesture is in progress")]
    GestureActive,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("`{name}` must be a positive number, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("zoom range [{min}, {max}] must contain 1.0")]
    ZoomRange { min: f64, max: f64 },
    #[error("default node size is below the minimum node size")]
    DefaultBelowMinimum,
}

/// Failure of an external collaborator (thumbnail, assistant, geocoder).
/// Always handled at the call site; never reaches graph mutation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResourceError {
    #[error("resource unavailable: {0}")]
    Unavailable(String),
    #[error("resource not found")]
    NotFound,
}

/// A problem repaired while loading a document.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LoadWarning {
    #[error("document version {found} is newer than supported version {supported}")]
    NewerVersion { found: u32, supported: u32 },
    #[error("{kind} entry #{index} is not an object and was skipped")]
    SkippedEntry { kind: &'static str, index: usize },
    #[error("{kind} entry #{index}: `{field}` was invalid and has been reset")]
    InvalidField {
        kind: &'static str,
        index: usize,
        field: String,
    },
    #[error("{kind} entry #{index} had no id; assigned {assigned}")]
    MissingId {
        kind: &'static str,
        index: usize,
        assigned: u32,
    },
    #[error("{kind} id {id} appears more than once; assigned {assigned}")]
    DuplicateId {
        kind: &'static str,
        id: u32,
        assigned: u32,
    },
    #[error("{kind} entry #{index} has out-of-range id {id}; assigned {assigned}")]
    IdOutOfRange {
        kind: &'static str,
        index: usize,
        id: u64,
        assigned: u32,
    },
    #[error("next {kind} id {found} is out of range and was ignored")]
    CounterOutOfRange { kind: &'static str, found: u64 },
    #[error("edge entry #{index} references missing node {node} and was dropped")]
    DanglingReference { index: usize, node: NodeId },
    #[error("edge entry #{index} connects node {node} to itself and was dropped")]
    SelfLoop { index: usize, node: NodeId },
}
