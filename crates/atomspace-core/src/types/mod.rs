//! # Core Type Definitions
//!
//! This module contains all core types of the AtomSpace engine:
//! - Atom identifiers and kinds (`AtomId`, `NodeType`, `LinkType`, `AtomType`)
//! - Value triples (`TruthValue`, `AttentionValue`)
//! - The atom record itself (`Atom`, `AtomState`)
//! - Error types (`AtomSpaceError`)
//!
//! ## Range Guarantees
//!
//! Every constructor in this module clamps into the documented ranges:
//! - truth strength and confidence: `[0, 1]`
//! - short-term importance: `[-1, 1]`
//! - long-term and very-long-term importance: `[0, 1]`
//!
//! NaN collapses to the lower bound of the range (zero for all fields).

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// CLAMPING HELPERS
// =============================================================================

/// Clamp a value into `[0, 1]`. NaN becomes 0.
#[must_use]
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Clamp a value into `[-1, 1]`. NaN becomes 0.
#[must_use]
pub fn clamp_signed(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// Reject NaN and infinities coming in from callers.
pub(crate) fn ensure_finite(field: &str, value: f32) -> Result<(), AtomSpaceError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AtomSpaceError::InvalidArgument(format!(
            "{} must be finite, got {}",
            field, value
        )))
    }
}

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Unique identifier of an atom within one table.
///
/// Ids start at 1, grow monotonically and are never reused,
/// not even after the atom they named has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AtomId(pub u64);

impl AtomId {
    /// Get the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AtomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// =============================================================================
// ATOM KINDS
// =============================================================================

/// Kinds of atoms without outgoing references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Concept,
    Predicate,
    Variable,
}

/// Kinds of atoms that name other atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Inheritance,
    Evaluation,
    Implication,
    Similarity,
    Member,
}

/// The full kind of an atom: either a node subtype or a link subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AtomType {
    Node(NodeType),
    Link(LinkType),
}

impl AtomType {
    /// Every atom type, nodes first.
    pub const ALL: [AtomType; 8] = [
        AtomType::Node(NodeType::Concept),
        AtomType::Node(NodeType::Predicate),
        AtomType::Node(NodeType::Variable),
        AtomType::Link(LinkType::Inheritance),
        AtomType::Link(LinkType::Evaluation),
        AtomType::Link(LinkType::Implication),
        AtomType::Link(LinkType::Similarity),
        AtomType::Link(LinkType::Member),
    ];

    #[must_use]
    pub fn is_node(&self) -> bool {
        matches!(self, AtomType::Node(_))
    }

    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(self, AtomType::Link(_))
    }

    /// Canonical name, e.g. `ConceptNode` or `InheritanceLink`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            AtomType::Node(NodeType::Concept) => "ConceptNode",
            AtomType::Node(NodeType::Predicate) => "PredicateNode",
            AtomType::Node(NodeType::Variable) => "VariableNode",
            AtomType::Link(LinkType::Inheritance) => "InheritanceLink",
            AtomType::Link(LinkType::Evaluation) => "EvaluationLink",
            AtomType::Link(LinkType::Implication) => "ImplicationLink",
            AtomType::Link(LinkType::Similarity) => "SimilarityLink",
            AtomType::Link(LinkType::Member) => "MemberLink",
        }
    }

    /// Parse a canonical name back into a type.
    #[must_use]
    pub fn from_name(name: &str) -> Option<AtomType> {
        AtomType::ALL.into_iter().find(|t| t.name() == name)
    }
}

impl From<NodeType> for AtomType {
    fn from(t: NodeType) -> Self {
        AtomType::Node(t)
    }
}

impl From<LinkType> for AtomType {
    fn from(t: LinkType) -> Self {
        AtomType::Link(t)
    }
}

impl fmt::Display for AtomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TRUTH VALUE
// =============================================================================

/// PLN truth value: a probabilistic belief about an atom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TruthValue {
    /// Probability-like strength, `[0, 1]`.
    pub strength: f32,
    /// How much the strength is to be trusted, `[0, 1]`.
    pub confidence: f32,
    /// Amount of evidence behind the belief, `>= 0`.
    pub count: f32,
}

impl TruthValue {
    /// Create a truth value, clamping every field into range.
    #[must_use]
    pub fn new(strength: f32, confidence: f32, count: f32) -> Self {
        Self {
            strength,
            confidence,
            count,
        }
        .clamped()
    }

    /// Same value with strength and confidence forced into `[0, 1]`
    /// and count forced to be non-negative.
    #[must_use]
    pub fn clamped(self) -> Self {
        let count = if self.count.is_nan() {
            0.0
        } else {
            self.count.max(0.0)
        };
        Self {
            strength: clamp_unit(self.strength),
            confidence: clamp_unit(self.confidence),
            count,
        }
    }
}

// =============================================================================
// ATTENTION VALUE
// =============================================================================

/// ECAN attention value: short-, long- and very-long-term importance.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AttentionValue {
    /// Short-term importance, `[-1, 1]`.
    pub sti: f32,
    /// Long-term importance, `[0, 1]`.
    pub lti: f32,
    /// Very-long-term importance, `[0, 1]`.
    pub vlti: f32,
}

impl AttentionValue {
    /// Create an attention value, clamping every field into range.
    #[must_use]
    pub fn new(sti: f32, lti: f32, vlti: f32) -> Self {
        Self { sti, lti, vlti }.clamped()
    }

    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            sti: clamp_signed(self.sti),
            lti: clamp_unit(self.lti),
            vlti: clamp_unit(self.vlti),
        }
    }
}

// =============================================================================
// ATOM
// =============================================================================

/// Lifecycle state of an atom. Deleted atoms keep their slot and their id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AtomState {
    #[default]
    Active,
    Deleted,
}

/// A node or link record in the knowledge graph.
///
/// Atoms are owned by the table. `outgoing` and `incoming` hold ids only;
/// an id listed there may name a deleted atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub id: AtomId,
    pub atom_type: AtomType,
    pub name: String,
    pub truth: TruthValue,
    pub attention: AttentionValue,
    /// Ordered targets of a link. Empty for nodes.
    pub outgoing: Vec<AtomId>,
    /// Links naming this atom, in the order they were created.
    pub incoming: Vec<AtomId>,
    /// Back-reference to a producer-side knowledge unit.
    pub external_ref: Option<u64>,
    /// Opaque embedding attached by the embedding layer.
    pub features: Option<Vec<f32>>,
    /// Logical clock tick at creation.
    pub created_at: u64,
    /// Logical clock tick of the last successful lookup.
    pub last_accessed_at: u64,
    pub state: AtomState,
}

impl Atom {
    #[must_use]
    pub fn is_node(&self) -> bool {
        self.atom_type.is_node()
    }

    #[must_use]
    pub fn is_link(&self) -> bool {
        self.atom_type.is_link()
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.state == AtomState::Deleted
    }

    /// True when this atom's outgoing set contains `id`.
    #[must_use]
    pub fn references(&self, id: AtomId) -> bool {
        self.outgoing.contains(&id)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Atom {}: {} ({})", self.id, self.name, self.atom_type)?;
        writeln!(
            f,
            "  Truth: strength={:.2}, confidence={:.2}",
            self.truth.strength, self.truth.confidence
        )?;
        writeln!(
            f,
            "  Attention: sti={:.2}, lti={:.2}, vlti={:.2}",
            self.attention.sti, self.attention.lti, self.attention.vlti
        )?;
        write!(
            f,
            "  Outgoing: {}, Incoming: {}",
            self.outgoing.len(),
            self.incoming.len()
        )?;
        if let Some(unit) = self.external_ref {
            write!(f, "\n  Knowledge unit: {}", unit)?;
        }
        Ok(())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the AtomSpace engine.
///
/// - No silent failures
/// - Every error is fatal to the attempted call only, never to the table
#[derive(Debug, Error, PartialEq)]
pub enum AtomSpaceError {
    /// The referenced atom does not exist or has been deleted.
    #[error("Atom not found: {0}")]
    NotFound(AtomId),

    /// The table already holds as many atoms as it was built for.
    #[error("Atom table capacity exhausted ({capacity} atoms)")]
    CapacityExhausted { capacity: usize },

    /// A caller-supplied argument was rejected.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The confidence combinator denominator collapsed toward zero.
    #[error("Degenerate truth-value combinator (denominator {denominator})")]
    DegenerateCombinator { denominator: f32 },

    /// Feature-vector bytes could not be decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    /// The operation is declared but not provided by this engine.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

// =============================================================================
// TESTS
// =============================================================================
