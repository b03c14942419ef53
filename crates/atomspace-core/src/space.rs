//! # AtomSpace Module
//!
//! One owner for an [`AtomTable`] and its [`InferenceEngine`].
//!
//! `AtomSpace` is the surface the surrounding layers talk to: the orchestrator
//! (node creation, attention ticks, accuracy), the producer (knowledge units)
//! and the embedding layer (feature vectors). Every method forwards to the
//! component that owns the behavior.

use crate::attention::AttentionBank;
use crate::bridge::{self, KnowledgeUnit};
use crate::config::EngineConfig;
use crate::inference::{InferenceEngine, InferenceStats};
use crate::query::Query;
use crate::system::AtomSpaceStats;
use crate::table::AtomTable;
use crate::types::{
    Atom, AtomId, AtomSpaceError, AtomType, AttentionValue, LinkType, NodeType, TruthValue,
};
use std::path::Path;

/// An atom table plus inference counters.
#[derive(Debug, Clone, Default)]
pub struct AtomSpace {
    table: AtomTable,
    inference: InferenceEngine,
}

impl AtomSpace {
    /// Create an empty space with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty space after validating `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self, AtomSpaceError> {
        Ok(Self {
            table: AtomTable::with_config(config)?,
            inference: InferenceEngine::new(),
        })
    }

    /// Read access to the underlying table.
    #[must_use]
    pub fn table(&self) -> &AtomTable {
        &self.table
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        self.table.config()
    }

    // =========================================================================
    // ATOMS
    // =========================================================================

    pub fn add_node(&mut self, node_type: NodeType, name: &str) -> Result<AtomId, AtomSpaceError> {
        self.table.add_node(node_type, name)
    }

    pub fn add_link(
        &mut self,
        link_type: LinkType,
        outgoing: &[AtomId],
    ) -> Result<AtomId, AtomSpaceError> {
        self.table.add_link(link_type, outgoing)
    }

    /// Look up a live atom and mark it as accessed.
    pub fn get(&mut self, id: AtomId) -> Result<&Atom, AtomSpaceError> {
        self.table.get(id)
    }

    #[must_use]
    pub fn peek(&self, id: AtomId) -> Option<&Atom> {
        self.table.peek(id)
    }

    pub fn delete(&mut self, id: AtomId) -> Result<(), AtomSpaceError> {
        self.table.delete(id)
    }

    pub fn set_truth_value(
        &mut self,
        id: AtomId,
        strength: f32,
        confidence: f32,
    ) -> Result<(), AtomSpaceError> {
        self.table.set_truth_value(id, strength, confidence)
    }

    pub fn truth_value(&self, id: AtomId) -> Result<TruthValue, AtomSpaceError> {
        self.table.truth_value(id)
    }

    pub fn set_features(&mut self, id: AtomId, features: Vec<f32>) -> Result<(), AtomSpaceError> {
        self.table.set_features(id, features)
    }

    /// Human-readable rendering of a live atom. Does not touch access time.
    pub fn describe(&self, id: AtomId) -> Result<String, AtomSpaceError> {
        self.table
            .peek(id)
            .map(ToString::to_string)
            .ok_or(AtomSpaceError::NotFound(id))
    }

    // =========================================================================
    // ATTENTION
    // =========================================================================

    pub fn set_attention(
        &mut self,
        id: AtomId,
        sti: f32,
        lti: f32,
        vlti: f32,
    ) -> Result<(), AtomSpaceError> {
        AttentionBank::set_attention(&mut self.table, id, sti, lti, vlti)
    }

    pub fn get_attention(&self, id: AtomId) -> Result<AttentionValue, AtomSpaceError> {
        AttentionBank::get_attention(&self.table, id)
    }

    pub fn decay_tick(&mut self) -> usize {
        AttentionBank::decay_tick(&mut self.table)
    }

    pub fn spread(&mut self, source: AtomId, amount: f32) -> Result<(), AtomSpaceError> {
        AttentionBank::spread(&mut self.table, source, amount)
    }

    pub fn spread_diffused(&mut self, source: AtomId) -> Result<f32, AtomSpaceError> {
        AttentionBank::spread_diffused(&mut self.table, source)
    }

    // =========================================================================
    // INFERENCE
    // =========================================================================

    pub fn infer_inheritance(
        &mut self,
        a: AtomId,
        b: AtomId,
        c: AtomId,
    ) -> Result<bool, AtomSpaceError> {
        self.inference.infer_inheritance(&mut self.table, a, b, c)
    }

    pub fn infer_similarity(&mut self, a: AtomId, b: AtomId) -> Result<bool, AtomSpaceError> {
        self.inference.infer_similarity(&mut self.table, a, b)
    }

    pub fn compute_similarity(&self, a: AtomId, b: AtomId) -> Result<f32, AtomSpaceError> {
        InferenceEngine::compute_similarity(&self.table, a, b)
    }

    #[must_use]
    pub fn reasoning_accuracy(&self) -> f32 {
        self.inference.reasoning_accuracy()
    }

    #[must_use]
    pub fn inference_stats(&self) -> InferenceStats {
        self.inference.stats()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn query_by_type(&self, atom_type: impl Into<AtomType>) -> Vec<AtomId> {
        self.table.query_by_type(atom_type)
    }

    pub fn query_by_name(&self, name: &str) -> Vec<AtomId> {
        self.table.query_by_name(name)
    }

    pub fn query_incoming(&self, id: AtomId) -> Vec<AtomId> {
        self.table.query_incoming(id)
    }

    pub fn query_outgoing(&self, id: AtomId) -> Vec<AtomId> {
        self.table.query_outgoing(id)
    }

    pub fn execute(&self, query: &Query) -> Vec<AtomId> {
        self.table.execute(query)
    }

    // =========================================================================
    // BRIDGES
    // =========================================================================

    pub fn import_knowledge_unit(&mut self, unit: &KnowledgeUnit) -> Result<AtomId, AtomSpaceError> {
        bridge::from_knowledge_unit(&mut self.table, unit)
    }

    pub fn atom_to_vector(&self, id: AtomId) -> Result<Vec<u8>, AtomSpaceError> {
        bridge::atom_to_vector(&self.table, id)
    }

    pub fn vector_to_atom(&mut self, bytes: &[u8], name: &str) -> Result<AtomId, AtomSpaceError> {
        bridge::vector_to_atom(&mut self.table, bytes, name)
    }

    // =========================================================================
    // STATISTICS & PERSISTENCE
    // =========================================================================

    #[must_use]
    pub fn stats(&self) -> AtomSpaceStats {
        AtomSpaceStats::collect(&self.table, self.inference.stats())
    }

    /// Saving an atom space is not supported.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AtomSpaceError> {
        tracing::warn!(path = %path.as_ref().display(), "save requested");
        Err(AtomSpaceError::Unsupported("saving an atom space"))
    }

    /// Loading an atom space is not supported.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), AtomSpaceError> {
        tracing::warn!(path = %path.as_ref().display(), "load requested");
        Err(AtomSpaceError::Unsupported("loading an atom space"))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facade_runs_a_full_cycle() {
        let mut space = AtomSpace::new();
        let a = space.add_node(NodeType::Concept, "Human").expect("add");
        let b = space.add_node(NodeType::Concept, "Mammal").expect("add");
        let c = space.add_node(NodeType::Concept, "Animal").expect("add");
        let ab = space.add_link(LinkType::Inheritance, &[a, b]).expect("link");
        let bc = space.add_link(LinkType::Inheritance, &[b, c]).expect("link");
        space.set_truth_value(ab, 0.9, 0.8).expect("tv");
        space.set_truth_value(bc, 0.85, 0.9).expect("tv");

        assert!(space.infer_inheritance(a, b, c).expect("infer"));
        assert_eq!(space.query_incoming(c).len(), 2);

        space.set_attention(a, 0.5, 0.0, 0.0).expect("attention");
        assert_eq!(space.decay_tick(), 6);

        let stats = space.stats();
        assert_eq!(stats.live_atoms, 6);
        assert_eq!(stats.successful_inferences, 1);
        assert!((space.reasoning_accuracy() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn describe_renders_atom() {
        let mut space = AtomSpace::new();
        let id = space.add_node(NodeType::Concept, "Cat").expect("add");
        let text = space.describe(id).expect("describe");
        assert!(text.starts_with("Atom #1: Cat (ConceptNode)"));
        assert!(space.describe(AtomId(9)).is_err());
    }

    #[test]
    fn save_and_load_are_unsupported() {
        let mut space = AtomSpace::new();
        assert!(matches!(
            space.save("space.bin"),
            Err(AtomSpaceError::Unsupported(_))
        ));
        assert!(matches!(
            space.load("space.bin"),
            Err(AtomSpaceError::Unsupported(_))
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = EngineConfig {
            decay_rate: 1.5,
            ..EngineConfig::default()
        };
        assert!(AtomSpace::with_config(config).is_err());
    }
}
