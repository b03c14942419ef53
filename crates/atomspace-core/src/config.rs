//! # Engine Configuration
//!
//! Tunable parameters of one atom table: capacity, attention dynamics and
//! default truth values.
//!
//! The struct deserializes with `#[serde(default)]`, so a configuration source
//! only needs to name the fields it overrides. Misspelled fields are rejected.
//! Reading the source (file, environment) is the app layer's business.

use crate::primitives::DEFAULT_CAPACITY;
use crate::types::AtomSpaceError;
use serde::{Deserialize, Serialize};

/// Parameters fixed at table construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Number of atom slots. Deleted atoms keep their slot.
    pub capacity: usize,
    /// Multiplier applied to sti and lti on every decay tick.
    pub decay_rate: f32,
    /// Post-decay sti above which sti consolidates into lti.
    pub attention_threshold: f32,
    /// Share of an atom's sti handed to its neighbours by diffusion.
    pub importance_diffusion_rate: f32,
    /// Truth strength of a freshly created atom.
    pub default_strength: f32,
    /// Truth confidence of a freshly created atom.
    pub default_confidence: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            decay_rate: 0.95,
            attention_threshold: 0.1,
            importance_diffusion_rate: 0.1,
            default_strength: 0.8,
            default_confidence: 0.9,
        }
    }
}

impl EngineConfig {
    /// Default configuration with a different capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Check every parameter against its valid range.
    pub fn validate(&self) -> Result<(), AtomSpaceError> {
        if self.capacity == 0 {
            return Err(AtomSpaceError::InvalidArgument(
                "capacity must be at least 1".to_string(),
            ));
        }

        let unit_fields = [
            ("decay_rate", self.decay_rate),
            ("importance_diffusion_rate", self.importance_diffusion_rate),
            ("default_strength", self.default_strength),
            ("default_confidence", self.default_confidence),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(AtomSpaceError::InvalidArgument(format!(
                    "{} must be within [0, 1], got {}",
                    field, value
                )));
            }
        }

        // sti lives in [-1, 1], so any threshold outside it is meaningless
        if !(-1.0..=1.0).contains(&self.attention_threshold) {
            return Err(AtomSpaceError::InvalidArgument(format!(
                "attention_threshold must be within [-1, 1], got {}",
                self.attention_threshold
            )));
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
