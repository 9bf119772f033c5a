//! tagspace-core - tag-space type and value model
//!
//! This crate defines the tag-space schema (atomic, aggregate, compound, and
//! placeholder types) and the runtime values that conform to it, along with
//! the slot lookup and value-building machinery used to resolve and construct
//! those values from a decision-graph compiler.
//!
//! # Overview
//!
//! - **[`TagType`]**: the schema — a tree of atomic/aggregate/compound/placeholder
//!   types rooted at a single compound type (the "tag space").
//! - **[`TagValue`]**: a runtime value conforming to a `TagType`, with merge
//!   semantics for accumulating values across a decision-graph traversal.
//! - **[`SlotIndex`]**: maps partial (abbreviated) slot paths to their fully
//!   qualified form, flagging ambiguous abbreviations.
//! - **[`ValueBuilder`]**: applies atomic/aggregate assignments to a root
//!   compound value, creating intermediate compounds as needed.
//!
//! This crate has no knowledge of ASTs, decision graphs, or interpretation —
//! those live in the `decision-graph` crate, which depends on this one.

pub mod builder;
pub mod error;
pub mod slots;
pub mod types;
pub mod values;

pub use builder::ValueBuilder;
pub use error::SchemaError;
pub use slots::{SlotIndex, SlotPath, SlotResolution};
pub use types::{AggregateType, AtomicType, CompoundType, TagType};
pub use values::{merge, merge_optional, MergeError, TagValue};
