//! # Atom Table
//!
//! Fixed-capacity store of atoms for the AtomSpace engine.
//!
//! - Ids come from a per-table counter: unique, increasing, never reused
//! - `BTreeMap<AtomId, Atom>` keeps iteration in creation order
//! - Links register themselves in the `incoming` set of every atom they name
//! - Deletion only flips the atom's state; adjacency is filtered at read time
//! - Timestamps come from a per-table logical clock, not the wall clock

use crate::config::EngineConfig;
use crate::primitives::{INITIAL_COUNT, LINK_NAME_PREFIX, MAX_FEATURE_DIMENSIONS};
use crate::query::QueryIndex;
use crate::types::{
    Atom, AtomId, AtomSpaceError, AtomState, AtomType, AttentionValue, LinkType, NodeType,
    TruthValue, ensure_finite,
};
use std::collections::BTreeMap;

/// The atom table.
///
/// Owns every atom record. Other atoms refer to a record by id only.
#[derive(Debug, Clone)]
pub struct AtomTable {
    /// Atom storage: AtomId -> Atom
    atoms: BTreeMap<AtomId, Atom>,

    /// Type and name buckets
    index: QueryIndex,

    config: EngineConfig,

    /// Next id to hand out
    next_atom_id: u64,

    /// Logical clock behind `created_at` / `last_accessed_at`
    clock: u64,
}

impl Default for AtomTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomTable {
    /// Create an empty table with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(EngineConfig::default())
    }

    /// Create an empty table after validating `config`.
    pub fn with_config(config: EngineConfig) -> Result<Self, AtomSpaceError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        Self {
            atoms: BTreeMap::new(),
            index: QueryIndex::new(),
            config,
            next_atom_id: 1,
            clock: 0,
        }
    }

    // =========================================================================
    // CREATION
    // =========================================================================

    /// Add a node with the configured default truth value and zero attention.
    pub fn add_node(&mut self, node_type: NodeType, name: &str) -> Result<AtomId, AtomSpaceError> {
        validate_name(name)?;
        self.ensure_capacity()?;

        let id = self.insert(AtomType::Node(node_type), name.to_string(), Vec::new());
        tracing::debug!(atom = id.0, name, kind = %node_type_name(node_type), "added node");
        Ok(id)
    }

    /// Add a link over `outgoing`.
    ///
    /// Every referenced atom must be live. On any failure nothing is mutated.
    /// Identical links are not merged: two calls create two atoms.
    pub fn add_link(
        &mut self,
        link_type: LinkType,
        outgoing: &[AtomId],
    ) -> Result<AtomId, AtomSpaceError> {
        if outgoing.is_empty() {
            return Err(AtomSpaceError::InvalidArgument(
                "link outgoing set must not be empty".to_string(),
            ));
        }
        if let Some(missing) = outgoing.iter().copied().find(|id| !self.contains(*id)) {
            return Err(AtomSpaceError::NotFound(missing));
        }
        self.ensure_capacity()?;

        let name = format!("{}{}", LINK_NAME_PREFIX, self.next_atom_id);
        let id = self.insert(AtomType::Link(link_type), name, outgoing.to_vec());

        for target in outgoing {
            if let Some(atom) = self.atoms.get_mut(target) {
                if !atom.incoming.contains(&id) {
                    atom.incoming.push(id);
                }
            }
        }

        tracing::debug!(
            atom = id.0,
            kind = %AtomType::Link(link_type),
            arity = outgoing.len(),
            "added link"
        );
        Ok(id)
    }

    fn ensure_capacity(&self) -> Result<(), AtomSpaceError> {
        if self.is_full() {
            tracing::warn!(capacity = self.config.capacity, "atom table full");
            return Err(AtomSpaceError::CapacityExhausted {
                capacity: self.config.capacity,
            });
        }
        Ok(())
    }

    fn insert(&mut self, atom_type: AtomType, name: String, outgoing: Vec<AtomId>) -> AtomId {
        let id = AtomId(self.next_atom_id);
        self.next_atom_id = self.next_atom_id.saturating_add(1);
        let now = self.tick();

        let atom = Atom {
            id,
            atom_type,
            name,
            truth: TruthValue::new(
                self.config.default_strength,
                self.config.default_confidence,
                INITIAL_COUNT,
            ),
            attention: AttentionValue::default(),
            outgoing,
            incoming: Vec::new(),
            external_ref: None,
            features: None,
            created_at: now,
            last_accessed_at: now,
            state: AtomState::Active,
        };

        self.index.record(&atom);
        self.atoms.insert(id, atom);
        id
    }

    fn tick(&mut self) -> u64 {
        self.clock = self.clock.saturating_add(1);
        self.clock
    }

    // =========================================================================
    // LOOKUP
    // =========================================================================

    /// Look up a live atom and mark it as accessed.
    pub fn get(&mut self, id: AtomId) -> Result<&Atom, AtomSpaceError> {
        let now = self.clock.saturating_add(1);
        match self.atoms.get_mut(&id) {
            Some(atom) if !atom.is_deleted() => {
                self.clock = now;
                atom.last_accessed_at = now;
                Ok(&*atom)
            }
            _ => Err(AtomSpaceError::NotFound(id)),
        }
    }

    /// Look up a live atom without touching its access time.
    #[must_use]
    pub fn peek(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(&id).filter(|atom| !atom.is_deleted())
    }

    /// Check if `id` names a live atom.
    #[must_use]
    pub fn contains(&self, id: AtomId) -> bool {
        self.peek(id).is_some()
    }

    /// Mutable access to a live atom. Callers keep the range invariants.
    pub(crate) fn atom_mut(&mut self, id: AtomId) -> Result<&mut Atom, AtomSpaceError> {
        self.atoms
            .get_mut(&id)
            .filter(|atom| !atom.is_deleted())
            .ok_or(AtomSpaceError::NotFound(id))
    }

    /// All live atoms, in creation order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.values().filter(|atom| !atom.is_deleted())
    }

    pub(crate) fn atoms_mut(&mut self) -> impl Iterator<Item = &mut Atom> {
        self.atoms.values_mut().filter(|atom| !atom.is_deleted())
    }

    /// Live links of one type, in creation order.
    pub fn links_of(&self, link_type: LinkType) -> impl Iterator<Item = &Atom> {
        let wanted = AtomType::Link(link_type);
        self.atoms().filter(move |atom| atom.atom_type == wanted)
    }

    pub(crate) fn index(&self) -> &QueryIndex {
        &self.index
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Soft-delete an atom. Other atoms' adjacency is left as is.
    pub fn delete(&mut self, id: AtomId) -> Result<(), AtomSpaceError> {
        let atom = self.atom_mut(id)?;
        atom.state = AtomState::Deleted;
        tracing::debug!(atom = id.0, "deleted atom");
        Ok(())
    }

    /// Set strength and confidence, clamped to `[0, 1]`. Resets the count.
    pub fn set_truth_value(
        &mut self,
        id: AtomId,
        strength: f32,
        confidence: f32,
    ) -> Result<(), AtomSpaceError> {
        ensure_finite("strength", strength)?;
        ensure_finite("confidence", confidence)?;
        let atom = self.atom_mut(id)?;
        atom.truth = TruthValue::new(strength, confidence, INITIAL_COUNT);
        Ok(())
    }

    /// Truth value of a live atom.
    pub fn truth_value(&self, id: AtomId) -> Result<TruthValue, AtomSpaceError> {
        self.peek(id)
            .map(|atom| atom.truth)
            .ok_or(AtomSpaceError::NotFound(id))
    }

    /// Attach or replace the opaque feature vector of a live atom.
    ///
    /// At most `MAX_FEATURE_DIMENSIONS` values, so a stored vector always encodes.
    pub fn set_features(&mut self, id: AtomId, features: Vec<f32>) -> Result<(), AtomSpaceError> {
        if features.len() > MAX_FEATURE_DIMENSIONS {
            return Err(AtomSpaceError::InvalidArgument(format!(
                "{} feature dimensions exceeds the limit of {}",
                features.len(),
                MAX_FEATURE_DIMENSIONS
            )));
        }
        if let Some(bad) = features.iter().find(|v| !v.is_finite()) {
            return Err(AtomSpaceError::InvalidArgument(format!(
                "feature values must be finite, got {}",
                bad
            )));
        }
        let atom = self.atom_mut(id)?;
        atom.features = Some(features);
        Ok(())
    }

    /// Record the producer-side knowledge unit an atom came from.
    pub fn set_external_ref(&mut self, id: AtomId, unit: u64) -> Result<(), AtomSpaceError> {
        self.atom_mut(id)?.external_ref = Some(unit);
        Ok(())
    }

    // =========================================================================
    // SIZE & CONFIG
    // =========================================================================

    /// Number of occupied slots, deleted atoms included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Number of live atoms.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.atoms().count()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.atoms.len() >= self.config.capacity
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The id the next created atom will get.
    #[must_use]
    pub fn next_atom_id(&self) -> u64 {
        self.next_atom_id
    }

    /// Current logical clock value.
    #[must_use]
    pub fn clock(&self) -> u64 {
        self.clock
    }
}

fn validate_name(name: &str) -> Result<(), AtomSpaceError> {
    if name.is_empty() {
        return Err(AtomSpaceError::InvalidArgument(
            "node name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn node_type_name(node_type: NodeType) -> &'static str {
    AtomType::Node(node_type).name()
}

// =============================================================================
// TESTS
// =============================================================================
