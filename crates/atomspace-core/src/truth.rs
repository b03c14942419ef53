//! # Truth Value Algebra
//!
//! PLN-style combinators over `(strength, confidence, count)` triples.
//!
//! - Pure and stateless: no table access, usable as instruction semantics
//! - Inputs are clamped before use, outputs are clamped after
//! - The confidence denominator `c1 + c2 - c1*c2` is guarded by
//!   `CONFIDENCE_EPSILON`; it only collapses when both confidences are ~0
//!
//! The `try_*` variants report a collapsed denominator as
//! `AtomSpaceError::DegenerateCombinator`. The total variants map it to
//! confidence 0, the limit of the formula at that corner.

use crate::primitives::CONFIDENCE_EPSILON;
use crate::types::{AtomSpaceError, TruthValue, clamp_unit};

/// Combined confidence of two independent beliefs: `c1*c2 / (c1 + c2 - c1*c2)`.
pub fn combine_confidence(c1: f32, c2: f32) -> Result<f32, AtomSpaceError> {
    let (c1, c2) = (clamp_unit(c1), clamp_unit(c2));
    let denominator = c1 + c2 - c1 * c2;
    if denominator < CONFIDENCE_EPSILON {
        return Err(AtomSpaceError::DegenerateCombinator { denominator });
    }
    Ok(clamp_unit(c1 * c2 / denominator))
}

/// Conjunction: min strength, combined confidence, min count.
pub fn try_and(tv1: TruthValue, tv2: TruthValue) -> Result<TruthValue, AtomSpaceError> {
    let (a, b) = (tv1.clamped(), tv2.clamped());
    let confidence = combine_confidence(a.confidence, b.confidence)?;
    Ok(TruthValue::new(
        a.strength.min(b.strength),
        confidence,
        a.count.min(b.count),
    ))
}

/// Disjunction: max strength, combined confidence, max count.
pub fn try_or(tv1: TruthValue, tv2: TruthValue) -> Result<TruthValue, AtomSpaceError> {
    let (a, b) = (tv1.clamped(), tv2.clamped());
    let confidence = combine_confidence(a.confidence, b.confidence)?;
    Ok(TruthValue::new(
        a.strength.max(b.strength),
        confidence,
        a.count.max(b.count),
    ))
}

/// Deduction for `A->B, B->C => A->C`: product of strengths, combined confidence.
pub fn try_deduce(tv_ab: TruthValue, tv_bc: TruthValue) -> Result<TruthValue, AtomSpaceError> {
    let (ab, bc) = (tv_ab.clamped(), tv_bc.clamped());
    let confidence = combine_confidence(ab.confidence, bc.confidence)?;
    Ok(TruthValue::new(
        ab.strength * bc.strength,
        confidence,
        ab.count.min(bc.count),
    ))
}

/// Conjunction. A degenerate confidence becomes 0.
#[must_use]
pub fn and(tv1: TruthValue, tv2: TruthValue) -> TruthValue {
    try_and(tv1, tv2).unwrap_or_else(|_| {
        let (a, b) = (tv1.clamped(), tv2.clamped());
        TruthValue::new(a.strength.min(b.strength), 0.0, a.count.min(b.count))
    })
}

/// Disjunction. A degenerate confidence becomes 0.
#[must_use]
pub fn or(tv1: TruthValue, tv2: TruthValue) -> TruthValue {
    try_or(tv1, tv2).unwrap_or_else(|_| {
        let (a, b) = (tv1.clamped(), tv2.clamped());
        TruthValue::new(a.strength.max(b.strength), 0.0, a.count.max(b.count))
    })
}

/// Negation: `1 - strength`, confidence and count unchanged.
#[must_use]
pub fn not(tv: TruthValue) -> TruthValue {
    let tv = tv.clamped();
    TruthValue::new(1.0 - tv.strength, tv.confidence, tv.count)
}

/// Deduction. A degenerate confidence becomes 0.
#[must_use]
pub fn deduce(tv_ab: TruthValue, tv_bc: TruthValue) -> TruthValue {
    try_deduce(tv_ab, tv_bc).unwrap_or_else(|_| {
        let (ab, bc) = (tv_ab.clamped(), tv_bc.clamped());
        TruthValue::new(ab.strength * bc.strength, 0.0, ab.count.min(bc.count))
    })
}

// =============================================================================
// TESTS
// =============================================================================
