//! The AST contract (§6): the input handed to the compiler by a surface-syntax
//! parser that lives outside this crate. A tagged `enum AstNode` replaces the
//! visitor-dispatched node hierarchy of the reference design — the compiler,
//! validators, and the rest of this crate pattern-match it exhaustively.

use serde::{Deserialize, Serialize};

/// An assignment applied by a `Set` node or a `Consider` answer's compound
/// branch: `slot = value` (atomic) or `slot += value` (aggregate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Slot path as written by the author — may be an abbreviation, resolved
    /// against the tag space's Slot Index at compile time.
    pub slot: String,
    pub kind: AssignmentKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AssignmentKind {
    /// `slot = value`
    Atomic { value: String },
    /// `slot += {values...}`
    Aggregate { values: Vec<String> },
}

/// One author-provided answer branch on an [`AstNode::Ask`] node: the answer
/// text and the subgraph to take when it is chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AskAnswer {
    pub text: String,
    pub subgraph: Vec<AstNode>,
}

/// One branch of a [`AstNode::Consider`] node: either an explicit value list
/// (atomic/aggregate slot) or an assignment list (compound slot), plus the
/// subgraph to take when that key matches the accumulator's projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum ConsiderKey {
    /// For an atomic slot: exactly one value. For an aggregate slot: the
    /// full set of values the branch matches.
    Values { values: Vec<String> },
    /// For a compound slot: a list of field assignments building the
    /// comparison value.
    Assignments { assignments: Vec<Assignment> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsiderAnswer {
    pub key: ConsiderKey,
    pub subgraph: Vec<AstNode>,
}

/// A single node of the program AST, as produced by a surface-syntax parser
/// outside this crate. `id` is `None` when the author left it to be
/// generated by the compiler's ID-assignment stage (§4.3 Stage 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum AstNode {
    Ask {
        id: Option<String>,
        text: String,
        #[serde(default)]
        terms: Vec<(String, String)>,
        answers: Vec<AskAnswer>,
    },
    Consider {
        id: Option<String>,
        slot: String,
        answers: Vec<ConsiderAnswer>,
        #[serde(default)]
        else_subgraph: Option<Vec<AstNode>>,
    },
    Set {
        id: Option<String>,
        assignments: Vec<Assignment>,
    },
    Call {
        id: Option<String>,
        callee_id: String,
    },
    Todo {
        id: Option<String>,
        text: String,
    },
    Reject {
        id: Option<String>,
        reason: String,
    },
    End {
        id: Option<String>,
    },
}

impl AstNode {
    pub fn id(&self) -> Option<&str> {
        match self {
            AstNode::Ask { id, .. }
            | AstNode::Consider { id, .. }
            | AstNode::Set { id, .. }
            | AstNode::Call { id, .. }
            | AstNode::Todo { id, .. }
            | AstNode::Reject { id, .. }
            | AstNode::End { id } => id.as_deref(),
        }
    }

    /// Whether this node kind is a chain terminator (§4.3 Stage 2): an `End`
    /// or `Reject` node ends the top-level chain it appears in.
    pub fn is_terminator(&self) -> bool {
        matches!(self, AstNode::End { .. } | AstNode::Reject { .. })
    }
}

/// Canonicalizes an answer text for both authoring-time comparison (§4.3's
/// implied-answer rule) and runtime matching (§4.5): trimmed, with the
/// recognized boolean tokens "yes"/"no" folded case-insensitively to
/// `"YES"`/`"NO"`. Any other text is trimmed but otherwise left as-is.
pub fn canonicalize_answer_text(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case("yes") {
        "YES".to_string()
    } else if trimmed.eq_ignore_ascii_case("no") {
        "NO".to_string()
    } else {
        trimmed.to_string()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_dispatches_across_all_variants() {
        let ask = AstNode::Ask {
            id: Some("q1".to_string()),
            text: "ok?".to_string(),
            terms: Vec::new(),
            answers: Vec::new(),
        };
        assert_eq!(ask.id(), Some("q1"));

        let end = AstNode::End { id: None };
        assert_eq!(end.id(), None);
    }

    #[test]
    fn terminators_are_end_and_reject_only() {
        assert!(AstNode::End { id: None }.is_terminator());
        assert!(
            AstNode::Reject {
                id: None,
                reason: "no".to_string()
            }
            .is_terminator()
        );
        assert!(!AstNode::Todo {
            id: None,
            text: "x".to_string()
        }
        .is_terminator());
    }

    #[test]
    fn serde_roundtrip_through_json() {
        let node = AstNode::Consider {
            id: Some("c1".to_string()),
            slot: "incident.severity".to_string(),
            answers: vec![ConsiderAnswer {
                key: ConsiderKey::Values {
                    values: vec!["High".to_string()],
                },
                subgraph: vec![AstNode::End { id: None }],
            }],
            else_subgraph: None,
        };
        let json = serde_json::to_string(&node).unwrap();
        let back: AstNode = serde_json::from_str(&json).unwrap();
        assert_eq!(node, back);
    }
}
