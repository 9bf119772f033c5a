//! The three-stage compiler (§4.3): id assignment, chain segmentation, and
//! lowering, orchestrated by [`compile`].

mod ids;
mod lower;
mod segment;

use tagspace_core::{CompoundType, SlotIndex};
use tracing::{debug_span, info};

use crate::ast::AstNode;
use crate::error::CompileError;
use crate::graph::{DecisionGraph, Node};
use lower::Lowerer;

/// The synthesized halt node every compiled graph carries: the default target
/// for any chain that falls off its own end without reaching a terminator.
pub const SYNTHETIC_END_ID: &str = "[SYN-END]";

/// Compiles an AST program against `tag_space` into a [`DecisionGraph`].
///
/// `source_uri`, when given, seeds the graph's `title` from its final path
/// segment (purely cosmetic — it plays no role in compilation or execution).
pub fn compile(
    program: Vec<AstNode>,
    tag_space: &CompoundType,
    source_uri: Option<String>,
) -> Result<DecisionGraph, CompileError> {
    let program = {
        let _span = debug_span!("assign_ids").entered();
        ids::assign_ids(program)
    };

    let slot_index = {
        let _span = debug_span!("build_slot_index").entered();
        SlotIndex::build(tag_space)
    };

    let segments = {
        let _span = debug_span!("segment").entered();
        segment::segment(program)
    };

    let mut graph = DecisionGraph::new(tag_space.clone());
    graph.add(Node::End {
        id: SYNTHETIC_END_ID.to_string(),
    })
    .expect("fresh graph never already contains the synthetic end id");

    let entry = {
        let _span = debug_span!("lower").entered();
        let mut lowerer = Lowerer::new(&mut graph, &slot_index, tag_space);
        let mut first_entry = None;
        for seg in &segments {
            let entry = lowerer.compile_sequence(seg, SYNTHETIC_END_ID)?;
            if first_entry.is_none() {
                first_entry = Some(entry);
            }
        }
        first_entry.unwrap_or_else(|| SYNTHETIC_END_ID.to_string())
    };

    graph.set_start(entry);
    graph.source_uri = source_uri.clone();
    graph.title = source_uri.and_then(|uri| uri.rsplit('/').next().map(str::to_string));

    info!(node_count = graph.len(), start = graph.start(), "compiled decision graph");
    Ok(graph)
}
