//! decision-graph - compiler and interpreter for tag-classifying decision graphs
//!
//! Takes an [`ast::AstNode`] program (produced by a surface-syntax parser
//! that lives outside this crate) and a [`tagspace_core::CompoundType`] tag
//! space, and turns it into a [`graph::DecisionGraph`] that an
//! [`interpreter::Interpreter`] can walk one answer at a time.
//!
//! # Pipeline
//!
//! 1. [`ast`] — the AST contract handed in from outside.
//! 2. [`validators`] — optional pre-compile lint passes (`RepeatId`,
//!    `DuplicateAnswer`).
//! 3. [`compiler::compile`] — id assignment, chain segmentation, and
//!    lowering into a [`graph::DecisionGraph`].
//! 4. [`interpreter::Interpreter`] — walks the compiled graph, merging `Set`
//!    deltas into an accumulator and pausing at interactive nodes.

pub mod ast;
pub mod compiler;
pub mod error;
pub mod graph;
pub mod interpreter;
pub mod validators;

pub use compiler::compile;
pub use error::{CompileError, RuntimeFailure, StructuralError};
pub use graph::{DecisionGraph, Node, NodeId};
pub use interpreter::{Interpreter, InterpreterLimits, RunState};
