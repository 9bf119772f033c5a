//! Slot Index (C3): resolves partial (abbreviated) slot paths against a tag
//! space to their unique fully qualified canonical path.
//!
//! A slot path is a dotted sequence of field names descending from the tag
//! space's root compound type to *any* field — not only leaves: an interior
//! compound field is itself an addressable slot, since a `Consider` node may
//! compare the accumulator's whole sub-record at that slot (§3/§4.3's
//! compound-kind branch). Authors write abbreviated *suffixes* of the
//! canonical path; the index enumerates every full path once at construction
//! time and resolves a suffix by finding all canonical paths it ends with.
//! Enumeration walks each compound's fields in declaration order (see
//! [`crate::types`]), so the index's internal ordering — and therefore any
//! "first match" or diagnostic ordering built on it — is reproducible across
//! runs.

use std::collections::HashMap;

use crate::types::{CompoundType, TagType};

/// A fully qualified, dot-separated slot path, e.g. `"incident.severity"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotPath(String);

impl SlotPath {
    fn from_segments(segments: &[&str]) -> Self {
        Self(segments.join("."))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits into dot-separated segments, root first.
    pub fn segments(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }

    /// Whether `self` ends with the segments of `suffix`, aligned on a
    /// segment boundary (so `"severity"` matches `"incident.severity"` but
    /// `"verity"` does not).
    fn ends_with_suffix(&self, suffix: &SlotPath) -> bool {
        let own = self.segments();
        let suf = suffix.segments();
        if suf.len() > own.len() {
            return false;
        }
        own[own.len() - suf.len()..] == suf[..]
    }
}

impl std::fmt::Display for SlotPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The outcome of resolving a partial slot path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotResolution {
    /// Exactly one canonical path ends with the given suffix.
    Unique(SlotPath),
    /// No canonical path ends with the given suffix.
    NotFound,
    /// More than one canonical path ends with the given suffix; all
    /// candidates are listed in enumeration order (declaration order,
    /// depth-first).
    Ambiguous(Vec<SlotPath>),
}

/// Maps every leaf slot in a tag space to its canonical path, and resolves
/// partial (suffix) paths against that set.
#[derive(Debug, Clone)]
pub struct SlotIndex {
    /// All canonical leaf paths, in depth-first declaration order.
    paths: Vec<SlotPath>,
    /// Canonical path -> leaf type, for callers that need the resolved type.
    types: HashMap<SlotPath, TagType>,
}

impl SlotIndex {
    /// Builds the index by walking `root`'s fields depth-first in declaration
    /// order. Every field is indexed, leaves and interior compounds alike.
    pub fn build(root: &CompoundType) -> Self {
        let mut paths = Vec::new();
        let mut types = HashMap::new();
        let mut stack = Vec::new();
        Self::walk(root, &mut stack, &mut paths, &mut types);
        Self { paths, types }
    }

    fn walk<'a>(
        compound: &'a CompoundType,
        stack: &mut Vec<&'a str>,
        paths: &mut Vec<SlotPath>,
        types: &mut HashMap<SlotPath, TagType>,
    ) {
        for (name, field_type) in compound.fields() {
            stack.push(name.as_str());
            let path = SlotPath::from_segments(stack);
            types.insert(path.clone(), field_type.clone());
            paths.push(path);
            if let TagType::Compound(inner) = field_type {
                Self::walk(inner, stack, paths, types);
            }
            stack.pop();
        }
    }

    /// All canonical leaf paths, in declaration order.
    pub fn paths(&self) -> &[SlotPath] {
        &self.paths
    }

    /// The type at a canonical path, if any.
    pub fn type_at(&self, path: &SlotPath) -> Option<&TagType> {
        self.types.get(path)
    }

    /// Resolves a (possibly abbreviated) dotted path against the index.
    pub fn resolve(&self, query: &str) -> SlotResolution {
        let query_path = SlotPath(query.to_string());
        let matches: Vec<SlotPath> = self
            .paths
            .iter()
            .filter(|p| p.ends_with_suffix(&query_path))
            .cloned()
            .collect();
        match matches.len() {
            0 => SlotResolution::NotFound,
            1 => SlotResolution::Unique(matches.into_iter().next().unwrap()),
            _ => SlotResolution::Ambiguous(matches),
        }
    }
}
