//! Stage 1 — ID assignment (§4.3): generates an id for every AST node that
//! lacks one, recursing into nested subgraphs.
//!
//! Generated ids are drawn from a counter scoped to one `assign_ids` call, so
//! two compiles of the same AST in the same process produce the same
//! generated ids (§5 determinism).

use crate::ast::AstNode;

struct IdCounter {
    next: usize,
}

impl IdCounter {
    fn new() -> Self {
        Self { next: 0 }
    }

    fn next_id(&mut self) -> String {
        let id = format!("[GEN-{}]", self.next);
        self.next += 1;
        id
    }
}

/// Assigns a generated id to every node in `program` (and every nested
/// subgraph) that doesn't already have one.
pub fn assign_ids(program: Vec<AstNode>) -> Vec<AstNode> {
    let mut counter = IdCounter::new();
    assign_ids_in(program, &mut counter)
}

fn assign_ids_in(program: Vec<AstNode>, counter: &mut IdCounter) -> Vec<AstNode> {
    program
        .into_iter()
        .map(|node| assign_id(node, counter))
        .collect()
}

fn assign_id(node: AstNode, counter: &mut IdCounter) -> AstNode {
    match node {
        AstNode::Ask {
            id,
            text,
            terms,
            answers,
        } => AstNode::Ask {
            id: Some(id.unwrap_or_else(|| counter.next_id())),
            text,
            terms,
            answers: answers
                .into_iter()
                .map(|a| crate::ast::AskAnswer {
                    text: a.text,
                    subgraph: assign_ids_in(a.subgraph, counter),
                })
                .collect(),
        },
        AstNode::Consider {
            id,
            slot,
            answers,
            else_subgraph,
        } => AstNode::Consider {
            id: Some(id.unwrap_or_else(|| counter.next_id())),
            slot,
            answers: answers
                .into_iter()
                .map(|a| crate::ast::ConsiderAnswer {
                    key: a.key,
                    subgraph: assign_ids_in(a.subgraph, counter),
                })
                .collect(),
            else_subgraph: else_subgraph.map(|sub| assign_ids_in(sub, counter)),
        },
        AstNode::Set { id, assignments } => AstNode::Set {
            id: Some(id.unwrap_or_else(|| counter.next_id())),
            assignments,
        },
        AstNode::Call { id, callee_id } => AstNode::Call {
            id: Some(id.unwrap_or_else(|| counter.next_id())),
            callee_id,
        },
        AstNode::Todo { id, text } => AstNode::Todo {
            id: Some(id.unwrap_or_else(|| counter.next_id())),
            text,
        },
        AstNode::Reject { id, reason } => AstNode::Reject {
            id: Some(id.unwrap_or_else(|| counter.next_id())),
            reason,
        },
        AstNode::End { id } => AstNode::End {
            id: Some(id.unwrap_or_else(|| counter.next_id())),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AskAnswer;

    #[test]
    fn fills_in_missing_ids_depth_first() {
        let program = vec![
            AstNode::Todo {
                id: None,
                text: "a".to_string(),
            },
            AstNode::Ask {
                id: None,
                text: "?".to_string(),
                terms: Vec::new(),
                answers: vec![AskAnswer {
                    text: "yes".to_string(),
                    subgraph: vec![AstNode::End { id: None }],
                }],
            },
        ];
        let assigned = assign_ids(program);
        let ids: Vec<&str> = assigned.iter().map(|n| n.id().unwrap()).collect();
        assert_eq!(ids, vec!["[GEN-0]", "[GEN-1]"]);
        match &assigned[1] {
            AstNode::Ask { answers, .. } => {
                assert_eq!(answers[0].subgraph[0].id(), Some("[GEN-2]"));
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn preserves_explicit_ids() {
        let program = vec![AstNode::End {
            id: Some("done".to_string()),
        }];
        let assigned = assign_ids(program);
        assert_eq!(assigned[0].id(), Some("done"));
    }

    #[test]
    fn two_compiles_of_same_ast_are_identical() {
        let make = || {
            vec![AstNode::Todo {
                id: None,
                text: "a".to_string(),
            }]
        };
        let first = assign_ids(make());
        let second = assign_ids(make());
        assert_eq!(first, second);
    }
}
