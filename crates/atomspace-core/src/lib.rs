//! # atomspace-core
//!
//! The in-memory probabilistic knowledge graph - THE ENGINE.
//!
//! Knowledge is stored as typed atoms: nodes carry a name, links carry an
//! ordered list of the atoms they connect. Every atom holds a PLN truth value
//! and an ECAN attention value.
//!
//! ## Components
//!
//! - `table`: fixed-capacity atom store, adjacency, soft delete
//! - `truth`: pure truth-value combinators
//! - `attention`: importance decay and spreading
//! - `inference`: inheritance deduction and relation-overlap similarity
//! - `query`: by-type, by-name and adjacency lookups
//! - `bridge`: knowledge-unit import and the feature-vector codec
//! - `space`: the `AtomSpace` facade over all of the above
//!
//! ## Architectural Constraints
//!
//! - Single-threaded and synchronous: every mutation takes `&mut self`
//! - No async, no network, no file I/O
//! - Capacity is fixed when a table is built
//! - Ordered maps only, so every iteration follows creation order

// =============================================================================
// MODULES
// =============================================================================

pub mod attention;
pub mod bridge;
pub mod config;
pub mod inference;
pub mod primitives;
pub mod query;
pub mod space;
pub mod system;
pub mod table;
pub mod truth;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    Atom, AtomId, AtomSpaceError, AtomState, AtomType, AttentionValue, LinkType, NodeType,
    TruthValue, clamp_signed, clamp_unit,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use attention::AttentionBank;
pub use config::EngineConfig;
pub use inference::{InferenceEngine, InferenceStats, RelationOverlap, cosine_similarity};
pub use query::{Query, QueryIndex, QueryType};
pub use space::AtomSpace;
pub use table::AtomTable;

// =============================================================================
// RE-EXPORTS: Bridge & System
// =============================================================================

pub use bridge::{
    FeatureHeader, KnowledgeUnit, UnitKind, atom_to_vector, decode_features, encode_features,
    from_knowledge_unit, vector_to_atom,
};
pub use system::{AtomSpaceStats, TypeCount};
