//! Stage 2 — chain segmentation (§4.3): splits the top-level AST sequence at
//! every terminator (`End`/`Reject`), terminator included as the last element
//! of its segment. Nested subgraphs are not re-segmented — their structure is
//! already lexically scoped.

use crate::ast::AstNode;

/// Splits `program` into segments at each terminator. The final segment may
/// be non-empty and not end in a terminator — it falls through to whatever
/// default the caller supplies (the synthesized `[SYN-END]` node, for the
/// top-level program).
pub fn segment(program: Vec<AstNode>) -> Vec<Vec<AstNode>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for node in program {
        let is_terminator = node.is_terminator();
        current.push(node);
        if is_terminator {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
