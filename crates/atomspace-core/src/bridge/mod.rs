//! # Bridge Module
//!
//! Entry points for the layers around the engine.
//!
//! - Knowledge-unit import from the producer side
//! - Feature-vector exchange with the embedding layer
//!
//! The engine never calls back into either layer.

mod features;

pub use features::{FeatureHeader, decode_features, encode_features};

use crate::attention::AttentionBank;
use crate::primitives::MAX_FEATURE_DIMENSIONS;
use crate::table::AtomTable;
use crate::types::{AtomId, AtomSpaceError, LinkType, NodeType, ensure_finite};
use serde::{Deserialize, Serialize};

// =============================================================================
// KNOWLEDGE UNITS
// =============================================================================

/// Kinds of producer-side knowledge units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Concept,
    Relation,
    Workflow,
    Rule,
    Pattern,
}

/// A knowledge unit handed over by the producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeUnit {
    pub kind: UnitKind,
    pub name: String,
    /// Becomes the atom's truth strength.
    pub truth_value: f32,
    pub confidence: f32,
    /// Becomes the atom's sti.
    pub attention: f32,
    /// Becomes the atom's lti.
    pub activation: f32,
    #[serde(default)]
    pub features: Option<Vec<f32>>,
    /// Producer-side id, kept as the atom's `external_ref`.
    pub external_id: u64,
    /// Atoms a relation or rule connects. Ignored for the other kinds.
    #[serde(default)]
    pub members: Vec<AtomId>,
}

/// Import a knowledge unit as one atom.
///
/// Concept, workflow and pattern units become concept nodes. A relation
/// becomes an inheritance link over `members`, a rule an implication link.
/// Every input is checked before the atom is created.
pub fn from_knowledge_unit(
    table: &mut AtomTable,
    unit: &KnowledgeUnit,
) -> Result<AtomId, AtomSpaceError> {
    ensure_finite("truth_value", unit.truth_value)?;
    ensure_finite("confidence", unit.confidence)?;
    ensure_finite("attention", unit.attention)?;
    ensure_finite("activation", unit.activation)?;
    if let Some(features) = &unit.features {
        if features.iter().any(|v| !v.is_finite()) {
            return Err(AtomSpaceError::InvalidArgument(format!(
                "knowledge unit {} has non-finite features",
                unit.external_id
            )));
        }
        if features.len() > MAX_FEATURE_DIMENSIONS {
            return Err(AtomSpaceError::InvalidArgument(format!(
                "knowledge unit {} has {} feature dimensions, limit is {}",
                unit.external_id,
                features.len(),
                MAX_FEATURE_DIMENSIONS
            )));
        }
    }

    let id = match unit.kind {
        UnitKind::Concept | UnitKind::Workflow | UnitKind::Pattern => {
            table.add_node(NodeType::Concept, &unit.name)?
        }
        UnitKind::Relation => table.add_link(LinkType::Inheritance, members(unit)?)?,
        UnitKind::Rule => table.add_link(LinkType::Implication, members(unit)?)?,
    };

    table.set_truth_value(id, unit.truth_value, unit.confidence)?;
    AttentionBank::set_attention(table, id, unit.attention, unit.activation, 0.0)?;
    if let Some(features) = &unit.features {
        table.set_features(id, features.clone())?;
    }
    table.set_external_ref(id, unit.external_id)?;

    tracing::debug!(
        atom = id.0,
        unit = unit.external_id,
        kind = ?unit.kind,
        "imported knowledge unit"
    );
    Ok(id)
}

fn members(unit: &KnowledgeUnit) -> Result<&[AtomId], AtomSpaceError> {
    if unit.members.is_empty() {
        return Err(AtomSpaceError::InvalidArgument(format!(
            "{:?} unit {} has no members",
            unit.kind, unit.external_id
        )));
    }
    Ok(&unit.members)
}

// =============================================================================
// EMBEDDING EXCHANGE
// =============================================================================

/// Encoded feature vector of a live atom. No features encode as empty.
pub fn atom_to_vector(table: &AtomTable, id: AtomId) -> Result<Vec<u8>, AtomSpaceError> {
    let atom = table.peek(id).ok_or(AtomSpaceError::NotFound(id))?;
    encode_features(atom.features.as_deref().unwrap_or_default())
}

/// Decode a feature vector and attach it to a new concept node `name`.
pub fn vector_to_atom(
    table: &mut AtomTable,
    bytes: &[u8],
    name: &str,
) -> Result<AtomId, AtomSpaceError> {
    let features = decode_features(bytes)?;
    let id = table.add_node(NodeType::Concept, name)?;
    table.set_features(id, features)?;
    Ok(id)
}

// =============================================================================
// TESTS
// =============================================================================
