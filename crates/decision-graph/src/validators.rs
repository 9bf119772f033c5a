//! Pre-compile validators (C7): `RepeatId` and `DuplicateAnswer`.
//!
//! Both walk the AST in a single left-to-right, depth-first traversal and
//! append diagnostics in the order encountered — no sorting, no hash-based
//! iteration — so the diagnostic sequence is itself part of the deterministic
//! contract (§4.4).

use std::collections::HashSet;

use crate::ast::AstNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub node_id: Option<String>,
}

impl Diagnostic {
    fn error(message: impl Into<String>, node_id: Option<&str>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            node_id: node_id.map(str::to_string),
        }
    }

    fn warning(message: impl Into<String>, node_id: Option<&str>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            node_id: node_id.map(str::to_string),
        }
    }
}

/// Walks `program` depth-first, left to right, recording an `ERROR` for every
/// id seen more than once. Nodes without an explicit id are ignored — they
/// will each receive a distinct generated id at compile time.
pub fn check_repeat_ids(program: &[AstNode]) -> Vec<Diagnostic> {
    let mut seen = HashSet::new();
    let mut diagnostics = Vec::new();
    walk_for_repeat_ids(program, &mut seen, &mut diagnostics);
    diagnostics
}

fn walk_for_repeat_ids<'a>(
    nodes: &'a [AstNode],
    seen: &mut HashSet<&'a str>,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for node in nodes {
        if let Some(id) = node.id() {
            if !seen.insert(id) {
                diagnostics.push(Diagnostic::error(format!("Duplicate node id: {id}"), Some(id)));
            }
        }
        for subgraph in subgraphs_of(node) {
            walk_for_repeat_ids(subgraph, seen, diagnostics);
        }
    }
}

/// Walks `program` depth-first, left to right, recording a `WARNING` for
/// every ask node with a repeated answer text, or every consider node with a
/// repeated answer key.
pub fn check_duplicate_answers(program: &[AstNode]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    walk_for_duplicate_answers(program, &mut diagnostics);
    diagnostics
}

fn walk_for_duplicate_answers(nodes: &[AstNode], diagnostics: &mut Vec<Diagnostic>) {
    for node in nodes {
        match node {
            AstNode::Ask { id, answers, .. } => {
                let mut seen_texts: Vec<&str> = Vec::new();
                for answer in answers {
                    if seen_texts.contains(&answer.text.as_str()) {
                        diagnostics.push(Diagnostic::warning(
                            format!("Duplicate answer text: {}", answer.text),
                            id.as_deref(),
                        ));
                    } else {
                        seen_texts.push(answer.text.as_str());
                    }
                    walk_for_duplicate_answers(&answer.subgraph, diagnostics);
                }
            }
            AstNode::Consider {
                id,
                answers,
                else_subgraph,
                ..
            } => {
                let mut seen_keys = Vec::new();
                for answer in answers {
                    if seen_keys.contains(&&answer.key) {
                        diagnostics.push(Diagnostic::warning(
                            "Duplicate consider answer key".to_string(),
                            id.as_deref(),
                        ));
                    } else {
                        seen_keys.push(&answer.key);
                    }
                    walk_for_duplicate_answers(&answer.subgraph, diagnostics);
                }
                if let Some(else_subgraph) = else_subgraph {
                    walk_for_duplicate_answers(else_subgraph, diagnostics);
                }
            }
            _ => {}
        }
    }
}

/// All nested subgraphs directly contained in `node`, in source order.
fn subgraphs_of(node: &AstNode) -> Vec<&[AstNode]> {
    match node {
        AstNode::Ask { answers, .. } => answers.iter().map(|a| a.subgraph.as_slice()).collect(),
        AstNode::Consider {
            answers,
            else_subgraph,
            ..
        } => {
            let mut subgraphs: Vec<&[AstNode]> = answers.iter().map(|a| a.subgraph.as_slice()).collect();
            if let Some(else_subgraph) = else_subgraph {
                subgraphs.push(else_subgraph.as_slice());
            }
            subgraphs
        }
        AstNode::Set { .. }
        | AstNode::Call { .. }
        | AstNode::Todo { .. }
        | AstNode::Reject { .. }
        | AstNode::End { .. } => Vec::new(),
    }
}
