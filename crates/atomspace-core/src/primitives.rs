//! # Engine Primitives
//!
//! Hardcoded constants of the AtomSpace engine.
//!
//! Tunable parameters (capacity, decay rate, defaults) live in
//! [`EngineConfig`](crate::config::EngineConfig). The values here are fixed
//! parts of the algorithms and are not meant to be configured.

/// Default number of atom slots in a table.
pub const DEFAULT_CAPACITY: usize = 2048;

/// Prefix of the generated name of every link (`Link_<id>`).
pub const LINK_NAME_PREFIX: &str = "Link_";

/// Below this value the PLN confidence denominator is treated as zero.
pub const CONFIDENCE_EPSILON: f32 = 1e-6;

/// Evidence count given to freshly created atoms and to explicit truth updates.
pub const INITIAL_COUNT: f32 = 1.0;

/// Share of short-term importance moved into long-term importance per decay
/// tick, once short-term importance is above the attention threshold.
pub const STI_TO_LTI_TRANSFER: f32 = 0.1;

/// Minimum relation overlap for `infer_similarity` to create a link.
pub const SIMILARITY_GATE: f32 = 0.1;

/// Upper bound on the confidence of an inferred similarity link.
pub const SIMILARITY_CONFIDENCE_CAP: f32 = 0.9;

/// Shared evidence needed to reach full similarity confidence.
pub const SIMILARITY_EVIDENCE_SCALE: f32 = 10.0;

// =============================================================================
// FEATURE VECTOR FORMAT
// =============================================================================

/// Magic bytes of an encoded feature vector.
pub const FEATURE_MAGIC: &[u8; 4] = b"ATVF";

/// Current feature vector format version.
pub const FEATURE_FORMAT_VERSION: u8 = 1;

/// Largest feature vector the codec accepts.
pub const MAX_FEATURE_DIMENSIONS: usize = 65536;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_share_is_ten_percent() {
        assert!((STI_TO_LTI_TRANSFER - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn magic_bytes_correct() {
        assert_eq!(FEATURE_MAGIC, b"ATVF");
    }
}
