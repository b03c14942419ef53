//! # Inference Engine
//!
//! Simplified PLN reasoning on top of the atom table:
//! - inheritance deduction: `A->B, B->C => A->C`
//! - similarity from shared inheritance relations (weighted Jaccard)
//! - similarity scoring, by feature-vector cosine when available
//!
//! Inference only ever adds atoms. Derived links are not merged with existing
//! ones, so running the same inference twice yields two links.

use crate::primitives::{SIMILARITY_CONFIDENCE_CAP, SIMILARITY_EVIDENCE_SCALE, SIMILARITY_GATE};
use crate::table::AtomTable;
use crate::truth;
use crate::types::{AtomId, AtomSpaceError, LinkType};
use serde::{Deserialize, Serialize};

// =============================================================================
// STATISTICS
// =============================================================================

/// Inference counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InferenceStats {
    /// Every inference attempt, successful or not.
    pub total: u64,
    /// Attempts that created a derived link.
    pub successful: u64,
}

impl InferenceStats {
    /// `successful / total`, or 0 before the first attempt.
    #[must_use]
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.successful as f64 / self.total as f64) as f32
    }
}

// =============================================================================
// RELATION OVERLAP
// =============================================================================

/// Strength-weighted inheritance relations around two atoms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelationOverlap {
    /// Sum of strengths of links touching both atoms.
    pub common: f32,
    /// Sum of strengths of links touching the first atom.
    pub total_a: f32,
    /// Sum of strengths of links touching the second atom.
    pub total_b: f32,
}

impl RelationOverlap {
    /// Collect the overlap over live inheritance links.
    #[must_use]
    pub fn measure(table: &AtomTable, a: AtomId, b: AtomId) -> Self {
        let mut overlap = Self::default();
        for link in table.links_of(LinkType::Inheritance) {
            let touches_a = link.references(a);
            let touches_b = link.references(b);
            let strength = link.truth.strength;

            if touches_a && touches_b {
                overlap.common += strength;
            }
            if touches_a {
                overlap.total_a += strength;
            }
            if touches_b {
                overlap.total_b += strength;
            }
        }
        overlap
    }

    /// `common / (total_a + total_b - common)`, 0 when the union is empty.
    #[must_use]
    pub fn ratio(&self) -> f32 {
        let union = self.total_a + self.total_b - self.common;
        if union > 0.0 {
            (self.common / union).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Cosine of two feature vectors.
///
/// `None` when the dimensions differ, a vector is empty, or a norm is zero.
#[must_use]
pub fn cosine_similarity(x: &[f32], y: &[f32]) -> Option<f32> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }

    let mut dot = 0.0f64;
    let mut norm_x = 0.0f64;
    let mut norm_y = 0.0f64;
    for (&p, &q) in x.iter().zip(y) {
        let (p, q) = (f64::from(p), f64::from(q));
        dot += p * q;
        norm_x += p * p;
        norm_y += q * q;
    }

    if norm_x <= 0.0 || norm_y <= 0.0 {
        return None;
    }
    Some((dot / (norm_x.sqrt() * norm_y.sqrt())).clamp(-1.0, 1.0) as f32)
}

// =============================================================================
// ENGINE
// =============================================================================

/// Inference rules plus the counters behind `reasoning_accuracy`.
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    stats: InferenceStats,
}

impl InferenceEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stats(&self) -> InferenceStats {
        self.stats
    }

    #[must_use]
    pub fn reasoning_accuracy(&self) -> f32 {
        self.stats.accuracy()
    }

    /// Deduce `A->C` from inheritance links `A->B` and `B->C`.
    ///
    /// The first live link (in creation order) with outgoing exactly `[a, b]`
    /// and the first with exactly `[b, c]` are used. Returns `Ok(false)` when a
    /// premise is missing. A new `[a, c]` link is created on every success.
    pub fn infer_inheritance(
        &mut self,
        table: &mut AtomTable,
        a: AtomId,
        b: AtomId,
        c: AtomId,
    ) -> Result<bool, AtomSpaceError> {
        self.stats.total = self.stats.total.saturating_add(1);

        let premise = |from: AtomId, to: AtomId| {
            table
                .links_of(LinkType::Inheritance)
                .find(|link| link.outgoing == [from, to])
                .map(|link| link.truth)
        };
        let (Some(tv_ab), Some(tv_bc)) = (premise(a, b), premise(b, c)) else {
            tracing::debug!(a = a.0, b = b.0, c = c.0, "inheritance premise missing");
            return Ok(false);
        };

        let derived = truth::deduce(tv_ab, tv_bc);
        let link = table.add_link(LinkType::Inheritance, &[a, c])?;
        table.set_truth_value(link, derived.strength, derived.confidence)?;
        self.stats.successful = self.stats.successful.saturating_add(1);

        tracing::info!(
            from = a.0,
            to = c.0,
            link = link.0,
            strength = derived.strength,
            confidence = derived.confidence,
            "inferred inheritance"
        );
        Ok(true)
    }

    /// Derive a similarity link between `a` and `b` from shared relations.
    ///
    /// Creates the link only when the overlap ratio exceeds the similarity
    /// gate. Its confidence grows with the shared evidence, capped at 0.9.
    pub fn infer_similarity(
        &mut self,
        table: &mut AtomTable,
        a: AtomId,
        b: AtomId,
    ) -> Result<bool, AtomSpaceError> {
        self.stats.total = self.stats.total.saturating_add(1);

        let overlap = RelationOverlap::measure(table, a, b);
        let similarity = overlap.ratio();
        if similarity <= SIMILARITY_GATE {
            tracing::debug!(a = a.0, b = b.0, similarity, "similarity below gate");
            return Ok(false);
        }

        let confidence = SIMILARITY_CONFIDENCE_CAP.min(overlap.common / SIMILARITY_EVIDENCE_SCALE);
        let link = table.add_link(LinkType::Similarity, &[a, b])?;
        table.set_truth_value(link, similarity, confidence)?;
        self.stats.successful = self.stats.successful.saturating_add(1);

        tracing::info!(
            a = a.0,
            b = b.0,
            link = link.0,
            strength = similarity,
            confidence,
            "inferred similarity"
        );
        Ok(true)
    }

    /// Similarity score of two live atoms.
    ///
    /// Cosine of their feature vectors when both carry one of the same
    /// non-zero-norm dimensionality, otherwise the relation overlap ratio.
    pub fn compute_similarity(
        table: &AtomTable,
        a: AtomId,
        b: AtomId,
    ) -> Result<f32, AtomSpaceError> {
        let first = table.peek(a).ok_or(AtomSpaceError::NotFound(a))?;
        let second = table.peek(b).ok_or(AtomSpaceError::NotFound(b))?;

        if let (Some(x), Some(y)) = (&first.features, &second.features) {
            if let Some(cosine) = cosine_similarity(x, y) {
                return Ok(cosine);
            }
        }

        Ok(RelationOverlap::measure(table, a, b).ratio())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::types::NodeType;

    fn inherit(table: &mut AtomTable, from: AtomId, to: AtomId, s: f32, c: f32) -> AtomId {
        let link = table
            .add_link(LinkType::Inheritance, &[from, to])
            .expect("link");
        table.set_truth_value(link, s, c).expect("truth");
        link
    }

    fn links_between(table: &AtomTable, kind: LinkType, from: AtomId, to: AtomId) -> Vec<AtomId> {
        table
            .links_of(kind)
            .filter(|l| l.outgoing == [from, to])
            .map(|l| l.id)
            .collect()
    }

    #[test]
    fn deduction_creates_transitive_link() {
        let mut table = AtomTable::new();
        let mut engine = InferenceEngine::new();
        let a = table.add_node(NodeType::Concept, "Human").expect("add");
        let b = table.add_node(NodeType::Concept, "Mammal").expect("add");
        let c = table.add_node(NodeType::Concept, "Animal").expect("add");
        inherit(&mut table, a, b, 0.9, 0.8);
        inherit(&mut table, b, c, 0.85, 0.9);

        assert!(engine.infer_inheritance(&mut table, a, b, c).expect("infer"));

        let derived = links_between(&table, LinkType::Inheritance, a, c);
        assert_eq!(derived.len(), 1);
        let tv = table.truth_value(derived[0]).expect("tv");
        assert!((tv.strength - 0.765).abs() < 1e-4);
        assert!((tv.confidence - 0.72 / 0.98).abs() < 1e-4);
        assert_eq!(engine.stats(), InferenceStats { total: 1, successful: 1 });
        assert!((engine.reasoning_accuracy() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn missing_premise_counts_as_failed_attempt() {
        let mut table = AtomTable::new();
        let mut engine = InferenceEngine::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        let c = table.add_node(NodeType::Concept, "C").expect("add");
        inherit(&mut table, a, b, 0.9, 0.9);

        assert!(!engine.infer_inheritance(&mut table, a, b, c).expect("infer"));
        assert_eq!(table.len(), 4);
        assert_eq!(engine.stats(), InferenceStats { total: 1, successful: 0 });
        assert_eq!(engine.reasoning_accuracy(), 0.0);
    }

    #[test]
    fn premise_order_matters() {
        let mut table = AtomTable::new();
        let mut engine = InferenceEngine::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        let c = table.add_node(NodeType::Concept, "C").expect("add");
        inherit(&mut table, b, a, 0.9, 0.9);
        inherit(&mut table, c, b, 0.9, 0.9);

        assert!(!engine.infer_inheritance(&mut table, a, b, c).expect("infer"));
    }

    #[test]
    fn first_matching_premise_wins() {
        let mut table = AtomTable::new();
        let mut engine = InferenceEngine::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        let c = table.add_node(NodeType::Concept, "C").expect("add");
        inherit(&mut table, a, b, 0.5, 0.9);
        inherit(&mut table, a, b, 1.0, 0.9);
        inherit(&mut table, b, c, 1.0, 0.9);

        engine.infer_inheritance(&mut table, a, b, c).expect("infer");
        let derived = links_between(&table, LinkType::Inheritance, a, c);
        let tv = table.truth_value(derived[0]).expect("tv");
        assert!((tv.strength - 0.5).abs() < 1e-6);
    }

    #[test]
    fn deleted_premise_is_ignored() {
        let mut table = AtomTable::new();
        let mut engine = InferenceEngine::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        let c = table.add_node(NodeType::Concept, "C").expect("add");
        let ab = inherit(&mut table, a, b, 0.9, 0.9);
        inherit(&mut table, b, c, 0.9, 0.9);
        table.delete(ab).expect("delete");

        assert!(!engine.infer_inheritance(&mut table, a, b, c).expect("infer"));
    }

    #[test]
    fn repeated_deduction_duplicates_the_link() {
        let mut table = AtomTable::new();
        let mut engine = InferenceEngine::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        let c = table.add_node(NodeType::Concept, "C").expect("add");
        inherit(&mut table, a, b, 0.9, 0.9);
        inherit(&mut table, b, c, 0.9, 0.9);

        engine.infer_inheritance(&mut table, a, b, c).expect("infer");
        engine.infer_inheritance(&mut table, a, b, c).expect("infer");
        assert_eq!(links_between(&table, LinkType::Inheritance, a, c).len(), 2);
    }

    #[test]
    fn deduction_on_full_table_reports_capacity() {
        let mut table = AtomTable::with_config(EngineConfig::with_capacity(5)).expect("config");
        let mut engine = InferenceEngine::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        let c = table.add_node(NodeType::Concept, "C").expect("add");
        inherit(&mut table, a, b, 0.9, 0.9);
        inherit(&mut table, b, c, 0.9, 0.9);

        let result = engine.infer_inheritance(&mut table, a, b, c);
        assert_eq!(result, Err(AtomSpaceError::CapacityExhausted { capacity: 5 }));
        assert_eq!(engine.stats(), InferenceStats { total: 1, successful: 0 });
    }

    #[test]
    fn similarity_link_from_shared_relations() {
        let mut table = AtomTable::new();
        let mut engine = InferenceEngine::new();
        let dog = table.add_node(NodeType::Concept, "Dog").expect("add");
        let cat = table.add_node(NodeType::Concept, "Cat").expect("add");
        let pet = table.add_node(NodeType::Concept, "Pet").expect("add");
        inherit(&mut table, dog, cat, 0.8, 0.9);
        inherit(&mut table, dog, pet, 0.9, 0.9);
        inherit(&mut table, cat, pet, 0.9, 0.9);

        assert!(engine.infer_similarity(&mut table, dog, cat).expect("infer"));

        let links = links_between(&table, LinkType::Similarity, dog, cat);
        assert_eq!(links.len(), 1);
        let tv = table.truth_value(links[0]).expect("tv");
        assert!((tv.strength - 0.8 / 2.6).abs() < 1e-4);
        assert!((tv.confidence - 0.08).abs() < 1e-4);
    }

    #[test]
    fn similarity_without_overlap_creates_nothing() {
        let mut table = AtomTable::new();
        let mut engine = InferenceEngine::new();
        let dog = table.add_node(NodeType::Concept, "Dog").expect("add");
        let cat = table.add_node(NodeType::Concept, "Cat").expect("add");
        let pet = table.add_node(NodeType::Concept, "Pet").expect("add");
        inherit(&mut table, dog, pet, 0.95, 0.9);
        inherit(&mut table, cat, pet, 0.9, 0.85);

        assert!(!engine.infer_similarity(&mut table, dog, cat).expect("infer"));
        assert!(table.query_by_type(LinkType::Similarity).is_empty());
        assert_eq!(engine.stats().total, 1);
    }

    #[test]
    fn similarity_of_unrelated_atoms_is_zero() {
        let mut table = AtomTable::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        let score = InferenceEngine::compute_similarity(&table, a, b).expect("score");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn compute_similarity_falls_back_to_overlap() {
        let mut table = AtomTable::new();
        let dog = table.add_node(NodeType::Concept, "Dog").expect("add");
        let cat = table.add_node(NodeType::Concept, "Cat").expect("add");
        let pet = table.add_node(NodeType::Concept, "Pet").expect("add");
        inherit(&mut table, dog, cat, 0.8, 0.9);
        inherit(&mut table, dog, pet, 0.9, 0.9);
        inherit(&mut table, cat, pet, 0.9, 0.9);

        let score = InferenceEngine::compute_similarity(&table, dog, cat).expect("score");
        assert!((score - 0.8 / 2.6).abs() < 1e-4);
        assert!(table.query_by_type(LinkType::Similarity).is_empty());
    }

    #[test]
    fn compute_similarity_prefers_cosine() {
        let mut table = AtomTable::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        table.set_features(a, vec![1.0, 0.0, 1.0]).expect("features");
        table.set_features(b, vec![1.0, 0.0, 1.0]).expect("features");

        let score = InferenceEngine::compute_similarity(&table, a, b).expect("score");
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mismatched_dimensions_fall_back() {
        let mut table = AtomTable::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let b = table.add_node(NodeType::Concept, "B").expect("add");
        table.set_features(a, vec![1.0, 0.0]).expect("features");
        table.set_features(b, vec![1.0, 0.0, 1.0]).expect("features");

        let score = InferenceEngine::compute_similarity(&table, a, b).expect("score");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn compute_similarity_requires_live_atoms() {
        let mut table = AtomTable::new();
        let a = table.add_node(NodeType::Concept, "A").expect("add");
        let result = InferenceEngine::compute_similarity(&table, a, AtomId(40));
        assert_eq!(result, Err(AtomSpaceError::NotFound(AtomId(40))));
    }

    #[test]
    fn cosine_edge_cases() {
        assert_eq!(cosine_similarity(&[], &[]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
        let opposite = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).expect("cosine");
        assert!((opposite + 1.0).abs() < 1e-6);
    }

    #[test]
    fn accuracy_mixes_successes_and_failures() {
        let stats = InferenceStats {
            total: 4,
            successful: 3,
        };
        assert!((stats.accuracy() - 0.75).abs() < 1e-6);
        assert_eq!(InferenceStats::default().accuracy(), 0.0);
    }
}
