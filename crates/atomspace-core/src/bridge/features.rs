//! # Feature Vector Format
//!
//! Byte encoding of atom feature vectors exchanged with the embedding layer.
//!
//! Format: Header (5 bytes) + postcard-serialized `Vec<f32>`.
//! - 4 bytes: Magic ("ATVF")
//! - 1 byte: Version
//!
//! Size and header are validated before the payload is decoded, and the
//! decoded vector must have at most `MAX_FEATURE_DIMENSIONS` finite values.

use crate::primitives::{FEATURE_FORMAT_VERSION, FEATURE_MAGIC, MAX_FEATURE_DIMENSIONS};
use crate::types::AtomSpaceError;

const HEADER_SIZE: usize = 5;

/// Largest payload a valid vector can take: varint length plus 4 bytes per value.
const MAX_PAYLOAD_SIZE: usize = 10 + 4 * MAX_FEATURE_DIMENSIONS;

// =============================================================================
// HEADER
// =============================================================================

/// Header in front of every encoded feature vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl FeatureHeader {
    /// Header for the current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *FEATURE_MAGIC,
            version: FEATURE_FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), AtomSpaceError> {
        if &self.magic != FEATURE_MAGIC {
            return Err(AtomSpaceError::Codec("invalid magic bytes".to_string()));
        }
        if self.version != FEATURE_FORMAT_VERSION {
            return Err(AtomSpaceError::Codec(format!(
                "unsupported version: {} (expected {})",
                self.version, FEATURE_FORMAT_VERSION
            )));
        }
        Ok(())
    }

    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AtomSpaceError> {
        let Some(header) = bytes.get(..HEADER_SIZE) else {
            return Err(AtomSpaceError::Codec(format!(
                "data too short: {} bytes, header needs {}",
                bytes.len(),
                HEADER_SIZE
            )));
        };
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&header[0..4]);
        Ok(Self {
            magic,
            version: header[4],
        })
    }
}

impl Default for FeatureHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a feature vector (header + payload).
pub fn encode_features(features: &[f32]) -> Result<Vec<u8>, AtomSpaceError> {
    if features.len() > MAX_FEATURE_DIMENSIONS {
        return Err(AtomSpaceError::Codec(format!(
            "{} dimensions exceeds the limit of {}",
            features.len(),
            MAX_FEATURE_DIMENSIONS
        )));
    }

    let payload =
        postcard::to_stdvec(features).map_err(|e| AtomSpaceError::Codec(e.to_string()))?;

    let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
    bytes.extend_from_slice(&FeatureHeader::new().to_bytes());
    bytes.extend_from_slice(&payload);
    Ok(bytes)
}

/// Decode bytes produced by [`encode_features`].
pub fn decode_features(bytes: &[u8]) -> Result<Vec<f32>, AtomSpaceError> {
    let header = FeatureHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[HEADER_SIZE..];
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(AtomSpaceError::Codec(format!(
            "payload of {} bytes exceeds the limit of {}",
            payload.len(),
            MAX_PAYLOAD_SIZE
        )));
    }

    let features: Vec<f32> = postcard::from_bytes(payload)
        .map_err(|e| AtomSpaceError::Codec(format!("failed to decode feature vector: {}", e)))?;

    if features.len() > MAX_FEATURE_DIMENSIONS {
        return Err(AtomSpaceError::Codec(format!(
            "{} dimensions exceeds the limit of {}",
            features.len(),
            MAX_FEATURE_DIMENSIONS
        )));
    }
    if features.iter().any(|v| !v.is_finite()) {
        return Err(AtomSpaceError::Codec(
            "feature vector holds non-finite values".to_string(),
        ));
    }
    Ok(features)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout() {
        let bytes = FeatureHeader::new().to_bytes();
        assert_eq!(&bytes[0..4], b"ATVF");
        assert_eq!(bytes[4], FEATURE_FORMAT_VERSION);
    }

    #[test]
    fn vector_survives_encoding() {
        let features = vec![0.25, -1.5, 3.0];
        let bytes = encode_features(&features).expect("encode");
        assert_eq!(decode_features(&bytes).expect("decode"), features);
    }

    #[test]
    fn empty_vector_is_header_plus_length() {
        let bytes = encode_features(&[]).expect("encode");
        assert_eq!(bytes.len(), HEADER_SIZE + 1);
        assert!(decode_features(&bytes).expect("decode").is_empty());
    }

    #[test]
    fn short_input_rejected() {
        assert!(matches!(
            decode_features(b"ATV"),
            Err(AtomSpaceError::Codec(_))
        ));
    }

    #[test]
    fn wrong_magic_rejected() {
        let mut bytes = encode_features(&[1.0]).expect("encode");
        bytes[0] = b'X';
        assert!(matches!(
            decode_features(&bytes),
            Err(AtomSpaceError::Codec(_))
        ));
    }

    #[test]
    fn wrong_version_rejected() {
        let mut bytes = encode_features(&[1.0]).expect("encode");
        bytes[4] = FEATURE_FORMAT_VERSION + 1;
        assert!(decode_features(&bytes).is_err());
    }

    #[test]
    fn truncated_payload_rejected() {
        let bytes = encode_features(&[1.0, 2.0]).expect("encode");
        assert!(decode_features(&bytes[..bytes.len() - 2]).is_err());
    }

    #[test]
    fn oversized_vector_rejected() {
        let features = vec![0.0; MAX_FEATURE_DIMENSIONS + 1];
        assert!(encode_features(&features).is_err());
    }

    #[test]
    fn non_finite_payload_rejected() {
        let mut bytes = FeatureHeader::new().to_bytes().to_vec();
        bytes.extend(postcard::to_stdvec(&vec![f32::NAN]).expect("payload"));
        assert!(decode_features(&bytes).is_err());
    }
}
