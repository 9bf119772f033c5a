//! Stage 3 — lowering (§4.3): recursively compiles a segment's node list into
//! the graph arena, threading a "syntactically next" default through each
//! node kind and building `Consider` edge keys via [`tagspace_core::ValueBuilder`].

use tagspace_core::{CompoundType, SlotIndex, SlotPath, SlotResolution, TagType, TagValue, ValueBuilder};

use crate::ast::{self, Assignment, AssignmentKind, AstNode, ConsiderKey};
use crate::error::{CompileError, StructuralError};
use crate::graph::{AskEdge, ConsiderEdge, DecisionGraph, Node, NodeId};

pub struct Lowerer<'a> {
    graph: &'a mut DecisionGraph,
    slot_index: &'a SlotIndex,
    tag_space: &'a CompoundType,
}

impl<'a> Lowerer<'a> {
    pub fn new(graph: &'a mut DecisionGraph, slot_index: &'a SlotIndex, tag_space: &'a CompoundType) -> Self {
        Self {
            graph,
            slot_index,
            tag_space,
        }
    }

    fn add_node(&mut self, node: Node) -> Result<NodeId, CompileError> {
        let id = node.id().to_string();
        self.graph
            .add(node)
            .map_err(|e| CompileError::Structural(StructuralError::DuplicateId { id: e.0 }))?;
        Ok(id)
    }

    /// Compiles `nodes` with `default` as the fall-through target for an
    /// empty list or a non-terminal final node, returning the entry node id.
    pub fn compile_sequence(&mut self, nodes: &[AstNode], default: &str) -> Result<NodeId, CompileError> {
        let Some((head, tail)) = nodes.split_first() else {
            return Ok(default.to_string());
        };
        match head {
            AstNode::Ask {
                id,
                text,
                terms,
                answers,
            } => {
                let id = id.clone().expect("ids assigned by compiler stage 1");
                let next_id = self.compile_sequence(tail, default)?;
                let mut edges = Vec::new();
                for answer in answers {
                    let answer_text = ast::canonicalize_answer_text(&answer.text);
                    let target = self.compile_sequence(&answer.subgraph, &next_id)?;
                    edges.push(AskEdge { answer_text, target });
                }
                add_implied_answers(&mut edges, &next_id);
                self.add_node(Node::Ask {
                    id,
                    prompt: text.clone(),
                    terms: terms.clone(),
                    edges,
                })
            }
            AstNode::Consider {
                id,
                slot,
                answers,
                else_subgraph,
            } => {
                let id = id.clone().expect("ids assigned by compiler stage 1");
                let next_id = self.compile_sequence(tail, default)?;
                let canonical_slot = self.resolve_slot(&id, slot)?;
                let leaf_type = self
                    .slot_index
                    .type_at(&canonical_slot)
                    .expect("resolved slot always has a type")
                    .clone();

                let else_target = match else_subgraph {
                    Some(sub) => self.compile_sequence(sub, &next_id)?,
                    None => next_id.clone(),
                };

                let mut edges: Vec<ConsiderEdge> = Vec::new();
                for answer in answers {
                    let key = self.build_consider_key(&id, &canonical_slot, &leaf_type, &answer.key)?;
                    let target = self.compile_sequence(&answer.subgraph, &next_id)?;
                    if edges.iter().any(|e| e.key == key) {
                        // §4.3 / §9: first wins, duplicates silently skipped — the
                        // subgraph still compiles into the arena, only the edge is dropped.
                        continue;
                    }
                    edges.push(ConsiderEdge { key, target });
                }

                self.add_node(Node::Consider {
                    id,
                    slot: canonical_slot.as_str().to_string(),
                    edges,
                    else_target: Some(else_target),
                })
            }
            AstNode::Set { id, assignments } => {
                let id = id.clone().expect("ids assigned by compiler stage 1");
                let next_id = self.compile_sequence(tail, default)?;
                let delta = self.apply_assignments(&id, assignments)?;
                self.add_node(Node::Set {
                    id,
                    delta,
                    next: next_id,
                })
            }
            AstNode::Call { id, callee_id } => {
                let id = id.clone().expect("ids assigned by compiler stage 1");
                let next_id = self.compile_sequence(tail, default)?;
                self.add_node(Node::Call {
                    id,
                    callee: callee_id.clone(),
                    next: next_id,
                })
            }
            AstNode::Todo { id, text } => {
                let id = id.clone().expect("ids assigned by compiler stage 1");
                let next_id = self.compile_sequence(tail, default)?;
                self.add_node(Node::Todo {
                    id,
                    text: text.clone(),
                    next: next_id,
                })
            }
            AstNode::Reject { id, reason } => {
                let id = id.clone().expect("ids assigned by compiler stage 1");
                self.add_node(Node::Reject {
                    id,
                    reason: reason.clone(),
                })
            }
            AstNode::End { id } => {
                let id = id.clone().expect("ids assigned by compiler stage 1");
                self.add_node(Node::End { id })
            }
        }
    }

    fn resolve_slot(&self, node_id: &str, raw: &str) -> Result<SlotPath, CompileError> {
        match self.slot_index.resolve(raw) {
            SlotResolution::Unique(path) => Ok(path),
            SlotResolution::NotFound => Err(StructuralError::UnresolvedSlot {
                node_id: node_id.to_string(),
                slot: raw.to_string(),
            }
            .into()),
            SlotResolution::Ambiguous(candidates) => Err(StructuralError::AmbiguousSlot {
                node_id: node_id.to_string(),
                slot: raw.to_string(),
                candidates: candidates.iter().map(|p| p.as_str().to_string()).collect(),
            }
            .into()),
        }
    }

    fn apply_assignments(&self, node_id: &str, assignments: &[Assignment]) -> Result<TagValue, CompileError> {
        let mut builder = ValueBuilder::new(self.tag_space);
        for assignment in assignments {
            self.apply_assignment(&mut builder, node_id, assignment)?;
        }
        Ok(builder.finish())
    }

    fn apply_assignment(
        &self,
        builder: &mut ValueBuilder<'_>,
        node_id: &str,
        assignment: &Assignment,
    ) -> Result<(), CompileError> {
        let canonical = self.resolve_slot(node_id, &assignment.slot)?;
        match &assignment.kind {
            AssignmentKind::Atomic { value } => builder
                .assign_atomic(canonical.as_str(), value)
                .map_err(|source| CompileError::Schema {
                    node_id: node_id.to_string(),
                    source,
                }),
            AssignmentKind::Aggregate { values } => {
                for value in values {
                    builder
                        .assign_aggregate(canonical.as_str(), value)
                        .map_err(|source| CompileError::Schema {
                            node_id: node_id.to_string(),
                            source,
                        })?;
                }
                Ok(())
            }
        }
    }

    /// Builds a `Consider` edge key by applying the answer's raw key through
    /// the value builder, then projecting the accumulated root value back
    /// down to the considered slot — this is the same projection the
    /// interpreter performs at runtime (§4.5), so a compiled key always
    /// equals the projection it will be compared against.
    fn build_consider_key(
        &self,
        node_id: &str,
        slot: &SlotPath,
        leaf_type: &TagType,
        key: &ConsiderKey,
    ) -> Result<TagValue, CompileError> {
        let mut builder = ValueBuilder::new(self.tag_space);
        match (leaf_type, key) {
            (TagType::Atomic(_), ConsiderKey::Values { values }) if values.len() == 1 => {
                builder
                    .assign_atomic(slot.as_str(), &values[0])
                    .map_err(|source| CompileError::Schema {
                        node_id: node_id.to_string(),
                        source,
                    })?;
            }
            (TagType::Aggregate(_), ConsiderKey::Values { values }) => {
                for value in values {
                    builder
                        .assign_aggregate(slot.as_str(), value)
                        .map_err(|source| CompileError::Schema {
                            node_id: node_id.to_string(),
                            source,
                        })?;
                }
            }
            (TagType::Compound(_), ConsiderKey::Assignments { assignments }) => {
                for assignment in assignments {
                    self.apply_assignment(&mut builder, node_id, assignment)?;
                }
            }
            _ => {
                return Err(CompileError::UnsupportedConsiderSlotKind {
                    node_id: node_id.to_string(),
                    slot: slot.as_str().to_string(),
                    kind: leaf_type_name(leaf_type),
                });
            }
        }
        let root_value = builder.finish();
        project(&root_value, slot.as_str()).ok_or_else(|| CompileError::UnsupportedConsiderSlotKind {
            node_id: node_id.to_string(),
            slot: slot.as_str().to_string(),
            kind: "slot not present after assignment",
        })
    }
}

fn leaf_type_name(t: &TagType) -> &'static str {
    match t {
        TagType::Atomic(_) => "atomic",
        TagType::Aggregate(_) => "aggregate",
        TagType::Compound(_) => "compound",
        TagType::Placeholder(_) => "placeholder",
    }
}

/// Projects `root`, a compound `TagValue`, down to the sub-value at `path`.
fn project(root: &TagValue, path: &str) -> Option<TagValue> {
    let segments: Vec<&str> = path.split('.').collect();
    let (last, init) = segments.split_last()?;
    let mut current = root.as_compound()?;
    for segment in init {
        current = current.get(segment)?.as_compound()?;
    }
    current.get(last).cloned()
}

/// Adds implied yes/no answers per §4.3's rule: no authored answers gets
/// both; exactly one authored "yes" gets an implicit "no", and vice versa;
/// anything else gets no implied answers.
fn add_implied_answers(edges: &mut Vec<AskEdge>, next_id: &str) {
    match edges.as_slice() {
        [] => {
            edges.push(AskEdge {
                answer_text: "YES".to_string(),
                target: next_id.to_string(),
            });
            edges.push(AskEdge {
                answer_text: "NO".to_string(),
                target: next_id.to_string(),
            });
        }
        [only] if only.answer_text == "YES" => edges.push(AskEdge {
            answer_text: "NO".to_string(),
            target: next_id.to_string(),
        }),
        [only] if only.answer_text == "NO" => edges.push(AskEdge {
            answer_text: "YES".to_string(),
            target: next_id.to_string(),
        }),
        _ => {}
    }
}
