//! Compile- and run-time error types (§7): `StructuralError`, `RuntimeFailure`,
//! and the top-level `CompileError` that wraps schema and structural failures
//! with the offending AST node's id attached.

use tagspace_core::SchemaError;
use thiserror::Error;

use crate::graph::NodeId;

/// A structural defect in a compiled graph (§7 item 4): duplicate ids, or an
/// unresolvable slot reference. Unknown callees are *not* a compile-time
/// structural error — §4.3 Stage 3 records a `Call`'s callee id without
/// resolving it, deferring resolution to the interpreter's
/// [`crate::error::RuntimeFailure::CalleeNotFound`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("duplicate node id: {id}")]
    DuplicateId { id: NodeId },

    #[error("in node {node_id:?}: slot {slot:?} is ambiguous; candidates: {candidates:?}")]
    AmbiguousSlot {
        node_id: NodeId,
        slot: String,
        candidates: Vec<String>,
    },

    #[error("in node {node_id:?}: slot {slot:?} does not resolve to any field in the tag space")]
    UnresolvedSlot { node_id: NodeId, slot: String },
}

/// A failure encountered while lowering the AST into a graph (§4.3): a
/// schema violation, or a structural defect the compiler itself catches.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("in node {node_id:?}: {source}")]
    Schema {
        node_id: String,
        #[source]
        source: SchemaError,
    },

    #[error(transparent)]
    Structural(#[from] StructuralError),

    #[error("consider node {node_id:?} references slot {slot:?} of unsupported kind {kind}")]
    UnsupportedConsiderSlotKind {
        node_id: String,
        slot: String,
        kind: &'static str,
    },
}

/// A failure encountered while interpreting a compiled graph (§7 item 5):
/// reaching a `Reject`, an unanswerable input, or a breached
/// [`crate::interpreter::InterpreterLimits`] ceiling.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeFailure {
    #[error("rejected: {reason}")]
    Rejected { node_id: NodeId, reason: String },

    #[error("answer {answer:?} matches no edge out of node {node_id} and no else branch exists")]
    NoMatchingEdge { node_id: NodeId, answer: String },

    #[error("call node {node_id} references unknown callee {callee}")]
    CalleeNotFound { node_id: NodeId, callee: NodeId },

    #[error("interpreter limit exceeded: {limit} (value {observed}, ceiling {ceiling})")]
    LimitExceeded {
        limit: &'static str,
        observed: usize,
        ceiling: usize,
    },

    #[error("advance called on a halted interpreter")]
    AlreadyHalted,

    #[error("answer submitted while interpreter is not awaiting input")]
    NotAwaitingInput,
}
