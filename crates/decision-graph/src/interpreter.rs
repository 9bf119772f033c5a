//! The call-stack interpreter (C8, §4.5): walks a compiled [`DecisionGraph`]
//! node by node, merging `Set` deltas into an accumulator and pausing at
//! interactive nodes for external input.
//!
//! `End` is deliberately not unconditionally terminal (§9): with a non-empty
//! call stack it behaves as a `return` to the caller's continuation; only
//! with an empty call stack does it halt the whole run. This is the one
//! place call/return semantics are load-bearing rather than a convenience.

use tagspace_core::{values, TagValue};
use tracing::{debug, trace};

use crate::ast;
use crate::error::RuntimeFailure;
use crate::graph::{DecisionGraph, Node, NodeId};

/// Ceilings the interpreter enforces against pathological or cyclic graphs
/// (§4.5's "ADDED" safety-net subsection — the reference design has no
/// equivalent, since its call stack is the host language's own stack).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterLimits {
    pub max_call_depth: usize,
    pub max_trace_len: usize,
}

impl Default for InterpreterLimits {
    fn default() -> Self {
        Self {
            max_call_depth: 1024,
            max_trace_len: 100_000,
        }
    }
}

/// Where a run currently stands: awaiting an answer at an interactive node,
/// or having reached a terminal outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    /// Paused at an `Ask` node, awaiting a free-form or yes/no answer.
    AwaitingAnswer { node_id: NodeId, prompt: String },
    /// Halted: the run reached an `End` with an empty call stack.
    Halted { accumulator: Option<TagValue> },
    /// Halted: the run reached a `Reject`.
    Rejected { node_id: NodeId, reason: String },
}

/// Interprets one traversal of a [`DecisionGraph`]: program counter, call
/// stack (return continuations for `Call` nodes), accumulator, and trace.
pub struct Interpreter<'g> {
    graph: &'g DecisionGraph,
    limits: InterpreterLimits,
    pc: Option<NodeId>,
    call_stack: Vec<NodeId>,
    accumulator: Option<TagValue>,
    trace: Vec<NodeId>,
    state: Option<RunState>,
}

impl<'g> Interpreter<'g> {
    /// Starts a fresh traversal of `graph`, advancing through any leading
    /// non-interactive nodes until the first pause or halt.
    pub fn start(graph: &'g DecisionGraph, limits: InterpreterLimits) -> Result<Self, RuntimeFailure> {
        let mut interpreter = Self {
            graph,
            limits,
            pc: Some(graph.start().to_string()),
            call_stack: Vec::new(),
            accumulator: None,
            trace: Vec::new(),
            state: None,
        };
        interpreter.advance()?;
        Ok(interpreter)
    }

    /// The current state of the run: awaiting input, halted, or rejected.
    pub fn state(&self) -> &RunState {
        self.state.as_ref().expect("advance always sets a state before returning")
    }

    pub fn accumulator(&self) -> Option<&TagValue> {
        self.accumulator.as_ref()
    }

    pub fn trace(&self) -> &[NodeId] {
        &self.trace
    }

    /// Submits an answer to the node the interpreter is currently paused at,
    /// resuming traversal until the next pause or halt.
    pub fn answer(&mut self, text: &str) -> Result<(), RuntimeFailure> {
        let RunState::AwaitingAnswer { node_id, .. } = self.state() else {
            return Err(RuntimeFailure::NotAwaitingInput);
        };
        let node_id = node_id.clone();
        let node = self.graph.get(&node_id).expect("pc always names a real node");

        let next = match node {
            Node::Ask { edges, .. } => {
                let canonical = ast::canonicalize_answer_text(text);
                edges
                    .iter()
                    .find(|e| e.answer_text == canonical)
                    .map(|e| e.target.clone())
                    .ok_or_else(|| RuntimeFailure::NoMatchingEdge {
                        node_id: node_id.clone(),
                        answer: text.to_string(),
                    })?
            }
            Node::Consider { edges, else_target, .. } => {
                unreachable!(
                    "answer() is only for Ask nodes; Consider resolves automatically from the accumulator, node {node_id}, {edges:?}, {else_target:?}"
                )
            }
            _ => unreachable!("only Ask nodes produce RunState::AwaitingAnswer"),
        };
        self.pc = Some(next);
        self.advance()
    }

    /// Drives the interpreter forward through non-interactive nodes
    /// (`Set`, `Call`, `Todo`, `Consider`) until it reaches an `Ask` (pause),
    /// an `End` with an empty call stack, or a `Reject` (halt).
    fn advance(&mut self) -> Result<(), RuntimeFailure> {
        loop {
            let Some(node_id) = self.pc.take() else {
                return Err(RuntimeFailure::AlreadyHalted);
            };

            if self.trace.len() >= self.limits.max_trace_len {
                return Err(RuntimeFailure::LimitExceeded {
                    limit: "max_trace_len",
                    observed: self.trace.len(),
                    ceiling: self.limits.max_trace_len,
                });
            }
            trace!(node_id = %node_id, "advancing");
            self.trace.push(node_id.clone());

            let node = self
                .graph
                .get(&node_id)
                .ok_or_else(|| RuntimeFailure::CalleeNotFound {
                    node_id: node_id.clone(),
                    callee: node_id.clone(),
                })?;

            match node {
                Node::Ask { prompt, .. } => {
                    self.state = Some(RunState::AwaitingAnswer {
                        node_id: node_id.clone(),
                        prompt: prompt.clone(),
                    });
                    return Ok(());
                }
                Node::Consider { edges, else_target, slot, .. } => {
                    let next = self.resolve_consider(slot, edges, else_target.as_deref(), &node_id)?;
                    self.pc = Some(next);
                }
                Node::Set { delta, next, .. } => {
                    match values::merge_optional(self.accumulator.clone(), delta.clone()) {
                        Ok(merged) => {
                            debug!(node_id = %node_id, "merged set delta into accumulator");
                            self.accumulator = Some(merged);
                            self.pc = Some(next.clone());
                        }
                        Err(_) => {
                            let reason = "conflicting assignment to an already-set slot".to_string();
                            self.state = Some(RunState::Rejected {
                                node_id: node_id.clone(),
                                reason: reason.clone(),
                            });
                            return Err(RuntimeFailure::Rejected {
                                node_id: node_id.clone(),
                                reason,
                            });
                        }
                    }
                }
                Node::Call { callee, next, .. } => {
                    if !self.graph.contains(callee) {
                        return Err(RuntimeFailure::CalleeNotFound {
                            node_id: node_id.clone(),
                            callee: callee.clone(),
                        });
                    }
                    if self.call_stack.len() >= self.limits.max_call_depth {
                        return Err(RuntimeFailure::LimitExceeded {
                            limit: "max_call_depth",
                            observed: self.call_stack.len(),
                            ceiling: self.limits.max_call_depth,
                        });
                    }
                    debug!(node_id = %node_id, callee = %callee, "entering call");
                    self.call_stack.push(next.clone());
                    self.pc = Some(callee.clone());
                }
                Node::Todo { next, .. } => {
                    self.pc = Some(next.clone());
                }
                Node::Reject { reason, .. } => {
                    self.state = Some(RunState::Rejected {
                        node_id: node_id.clone(),
                        reason: reason.clone(),
                    });
                    return Ok(());
                }
                Node::End { .. } => match self.call_stack.pop() {
                    Some(return_to) => {
                        debug!(node_id = %node_id, return_to = %return_to, "returning from call");
                        self.pc = Some(return_to);
                    }
                    None => {
                        self.state = Some(RunState::Halted {
                            accumulator: self.accumulator.clone(),
                        });
                        return Ok(());
                    }
                },
            }
        }
    }

    /// Resolves a `Consider` node's outgoing edge by comparing each edge's
    /// key against the accumulator's projection at `slot` (§4.5): the
    /// accumulator must actually hold a value there, else the else branch
    /// (always present per compile-time lowering) is taken.
    fn resolve_consider(
        &self,
        slot: &str,
        edges: &[crate::graph::ConsiderEdge],
        else_target: Option<&str>,
        node_id: &str,
    ) -> Result<NodeId, RuntimeFailure> {
        let projected = self
            .accumulator
            .as_ref()
            .and_then(|root| project(root, slot));

        if let Some(projected) = projected {
            if let Some(edge) = edges.iter().find(|e| e.key == projected) {
                return Ok(edge.target.clone());
            }
        }
        else_target.map(str::to_string).ok_or_else(|| RuntimeFailure::NoMatchingEdge {
            node_id: node_id.to_string(),
            answer: slot.to_string(),
        })
    }
}

/// Projects `root`, a compound [`TagValue`], down to the sub-value at `path`.
/// Mirrors the compiler's own projection (see `compiler::lower`) so a
/// compiled edge key always compares against the same shape it was built
/// from.
fn project(root: &TagValue, path: &str) -> Option<TagValue> {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, init) = segments.split_last()?;
    let mut current = root.as_compound()?;
    for segment in init {
        current = current.get(segment)?.as_compound()?;
    }
    current.get(last).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::compile;
    use crate::ast::{AskAnswer, AstNode};
    use tagspace_core::CompoundType;

    #[test]
    fn empty_program_halts_immediately_with_no_accumulator() {
        let tag_space = CompoundType::new("Root", []);
        let graph = compile(Vec::new(), &tag_space, None).unwrap();
        let interpreter = Interpreter::start(&graph, InterpreterLimits::default()).unwrap();
        assert_eq!(
            interpreter.state(),
            &RunState::Halted { accumulator: None }
        );
    }

    #[test]
    fn ask_pauses_for_input_then_resumes_on_answer() {
        let tag_space = CompoundType::new("Root", []);
        let program = vec![AstNode::Ask {
            id: Some("q".to_string()),
            text: "continue?".to_string(),
            terms: Vec::new(),
            answers: vec![AskAnswer {
                text: "yes".to_string(),
                subgraph: vec![AstNode::End { id: Some("done".to_string()) }],
            }],
        }];
        let graph = compile(program, &tag_space, None).unwrap();
        let mut interpreter = Interpreter::start(&graph, InterpreterLimits::default()).unwrap();
        assert!(matches!(interpreter.state(), RunState::AwaitingAnswer { .. }));
        interpreter.answer("Yes").unwrap();
        assert_eq!(interpreter.state(), &RunState::Halted { accumulator: None });
    }

    #[test]
    fn unmatched_answer_with_no_else_is_a_runtime_failure() {
        let tag_space = CompoundType::new("Root", []);
        let program = vec![AstNode::Ask {
            id: Some("q".to_string()),
            text: "pick one".to_string(),
            terms: Vec::new(),
            answers: vec![AskAnswer {
                text: "red".to_string(),
                subgraph: vec![AstNode::End { id: None }],
            }],
        }];
        let graph = compile(program, &tag_space, None).unwrap();
        let mut interpreter = Interpreter::start(&graph, InterpreterLimits::default()).unwrap();
        let err = interpreter.answer("blue").unwrap_err();
        assert!(matches!(err, RuntimeFailure::NoMatchingEdge { .. }));
    }

    #[test]
    fn reject_node_halts_with_rejected_state() {
        let tag_space = CompoundType::new("Root", []);
        let program = vec![AstNode::Reject {
            id: Some("r".to_string()),
            reason: "ineligible".to_string(),
        }];
        let graph = compile(program, &tag_space, None).unwrap();
        let interpreter = Interpreter::start(&graph, InterpreterLimits::default()).unwrap();
        match interpreter.state() {
            RunState::Rejected { reason, .. } => assert_eq!(reason, "ineligible"),
            other => panic!("expected rejected, got {other:?}"),
        }
    }

    #[test]
    fn call_returns_to_its_continuation_after_callees_end() {
        let tag_space = CompoundType::new("Root", []);
        let program = vec![
            AstNode::Call {
                id: Some("c".to_string()),
                callee_id: "helper".to_string(),
            },
            AstNode::Todo {
                id: Some("after".to_string()),
                text: "post-call work".to_string(),
            },
            AstNode::End {
                id: Some("top-end".to_string()),
            },
            AstNode::End {
                id: Some("helper".to_string()),
            },
        ];
        let graph = compile(program, &tag_space, None).unwrap();
        let interpreter = Interpreter::start(&graph, InterpreterLimits::default()).unwrap();
        assert!(interpreter.trace().contains(&"after".to_string()));
        assert_eq!(interpreter.state(), &RunState::Halted { accumulator: None });
    }
}
