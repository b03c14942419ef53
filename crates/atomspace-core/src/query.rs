//! # Query Module
//!
//! Typed and linear lookups over the atom table.
//!
//! - `QueryIndex` keeps `type -> [ids]` and `name -> [ids]` buckets, filled in
//!   creation order as atoms are inserted
//! - Deleted atoms stay in the buckets and are filtered at read time
//! - An unknown target and an empty answer are both an empty `Vec`

use crate::table::AtomTable;
use crate::types::{Atom, AtomId, AtomType};
use std::collections::BTreeMap;

// =============================================================================
// QUERY VALUES
// =============================================================================

/// Query operation types supported by the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryType {
    /// All live atoms of one type.
    ByType(AtomType),

    /// All live atoms carrying this exact name.
    ByName(String),

    /// Live links whose outgoing set names the target.
    Incoming(AtomId),

    /// Live atoms named by the target's outgoing set, in order.
    Outgoing(AtomId),
}

/// A structured query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub query_type: QueryType,
}

impl Query {
    #[must_use]
    pub fn new(query_type: QueryType) -> Self {
        Self { query_type }
    }

    /// By-type helper.
    #[must_use]
    pub fn by_type(atom_type: impl Into<AtomType>) -> Self {
        Self::new(QueryType::ByType(atom_type.into()))
    }

    /// By-name helper.
    #[must_use]
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::new(QueryType::ByName(name.into()))
    }

    /// Incoming helper.
    #[must_use]
    pub fn incoming(id: AtomId) -> Self {
        Self::new(QueryType::Incoming(id))
    }

    /// Outgoing helper.
    #[must_use]
    pub fn outgoing(id: AtomId) -> Self {
        Self::new(QueryType::Outgoing(id))
    }
}

// =============================================================================
// INDEX
// =============================================================================

/// Auxiliary multimaps maintained by the table on every insertion.
#[derive(Debug, Clone, Default)]
pub struct QueryIndex {
    by_type: BTreeMap<AtomType, Vec<AtomId>>,
    by_name: BTreeMap<String, Vec<AtomId>>,
}

impl QueryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly created atom.
    pub fn record(&mut self, atom: &Atom) {
        self.by_type.entry(atom.atom_type).or_default().push(atom.id);
        self.by_name
            .entry(atom.name.clone())
            .or_default()
            .push(atom.id);
    }

    /// Every id ever recorded under this type, deleted ones included.
    #[must_use]
    pub fn type_bucket(&self, atom_type: AtomType) -> &[AtomId] {
        self.by_type.get(&atom_type).map_or(&[], Vec::as_slice)
    }

    /// Every id ever recorded under this name, deleted ones included.
    #[must_use]
    pub fn name_bucket(&self, name: &str) -> &[AtomId] {
        self.by_name.get(name).map_or(&[], Vec::as_slice)
    }
}

// =============================================================================
// TABLE QUERIES
// =============================================================================

impl AtomTable {
    /// Live atoms of the given type, in creation order.
    pub fn query_by_type(&self, atom_type: impl Into<AtomType>) -> Vec<AtomId> {
        self.live_only(self.index().type_bucket(atom_type.into()))
    }

    /// Live atoms named `name`, in creation order. Names are not unique.
    pub fn query_by_name(&self, name: &str) -> Vec<AtomId> {
        self.live_only(self.index().name_bucket(name))
    }

    /// Live links that reference `id`.
    pub fn query_incoming(&self, id: AtomId) -> Vec<AtomId> {
        self.peek(id)
            .map(|atom| self.live_only(&atom.incoming))
            .unwrap_or_default()
    }

    /// Live atoms referenced by `id`, in outgoing order.
    pub fn query_outgoing(&self, id: AtomId) -> Vec<AtomId> {
        self.peek(id)
            .map(|atom| self.live_only(&atom.outgoing))
            .unwrap_or_default()
    }

    /// Run a structured query.
    pub fn execute(&self, query: &Query) -> Vec<AtomId> {
        match &query.query_type {
            QueryType::ByType(atom_type) => self.query_by_type(*atom_type),
            QueryType::ByName(name) => self.query_by_name(name),
            QueryType::Incoming(id) => self.query_incoming(*id),
            QueryType::Outgoing(id) => self.query_outgoing(*id),
        }
    }

    fn live_only(&self, ids: &[AtomId]) -> Vec<AtomId> {
        ids.iter()
            .copied()
            .filter(|id| self.contains(*id))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
