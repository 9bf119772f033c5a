//! Schema-level errors (§7 item 2): failures resolving or assigning a value
//! against a tag space.

use thiserror::Error;

/// An error raised while resolving a slot path or assigning a value against a
/// tag-space schema.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("slot path {path:?} has no matching field {segment:?}")]
    UnknownField { path: String, segment: String },

    #[error("slot path {path:?} descends through leaf field {segment:?}, which is not a compound")]
    NotACompound { path: String, segment: String },

    #[error("slot path {path:?} resolves to a compound, not a leaf value")]
    NotALeaf { path: String },

    #[error("value {value:?} is not a declared value of atomic type {type_name:?} at {path:?}")]
    UnknownAtomicValue {
        path: String,
        type_name: String,
        value: String,
    },

    #[error("slot {path:?} is of type {expected} but was assigned a value of kind {actual}")]
    KindMismatch {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("slot {path:?} is a placeholder field and cannot be assigned a value")]
    PlaceholderNotAssignable { path: String },
}
