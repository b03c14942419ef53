//! # Engine Statistics
//!
//! Counts per atom type, capacity usage, inference counters and mean
//! importance, gathered into one serializable snapshot.

use crate::inference::InferenceStats;
use crate::table::AtomTable;
use crate::types::AtomType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of live atoms of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub atom_type: AtomType,
    pub count: usize,
}

/// Snapshot of an atom table and its inference counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomSpaceStats {
    /// Live atoms.
    pub live_atoms: usize,
    /// Occupied slots, deleted atoms included.
    pub used_slots: usize,
    pub capacity: usize,
    /// Live atoms per type, every type listed, nodes first.
    pub type_counts: Vec<TypeCount>,
    pub total_inferences: u64,
    pub successful_inferences: u64,
    pub reasoning_accuracy: f32,
    /// Mean sti over live atoms (0 when empty).
    pub average_sti: f32,
    /// Mean lti over live atoms (0 when empty).
    pub average_lti: f32,
}

impl AtomSpaceStats {
    /// Collect statistics from a table and an inference engine's counters.
    #[must_use]
    pub fn collect(table: &AtomTable, inference: InferenceStats) -> Self {
        let mut counts: BTreeMap<AtomType, usize> = BTreeMap::new();
        let mut sti_sum = 0.0f64;
        let mut lti_sum = 0.0f64;
        let mut live_atoms = 0usize;

        for atom in table.atoms() {
            *counts.entry(atom.atom_type).or_default() += 1;
            sti_sum += f64::from(atom.attention.sti);
            lti_sum += f64::from(atom.attention.lti);
            live_atoms += 1;
        }

        let mean = |sum: f64| {
            if live_atoms == 0 {
                0.0
            } else {
                (sum / live_atoms as f64) as f32
            }
        };

        Self {
            live_atoms,
            used_slots: table.len(),
            capacity: table.capacity(),
            type_counts: AtomType::ALL
                .into_iter()
                .map(|atom_type| TypeCount {
                    atom_type,
                    count: counts.get(&atom_type).copied().unwrap_or(0),
                })
                .collect(),
            total_inferences: inference.total,
            successful_inferences: inference.successful,
            reasoning_accuracy: inference.accuracy(),
            average_sti: mean(sti_sum),
            average_lti: mean(lti_sum),
        }
    }

    /// Live atoms of the given type.
    #[must_use]
    pub fn count_of(&self, atom_type: impl Into<AtomType>) -> usize {
        let wanted = atom_type.into();
        self.type_counts
            .iter()
            .find(|entry| entry.atom_type == wanted)
            .map_or(0, |entry| entry.count)
    }

    /// Occupied share of the capacity, in `[0, 1]`.
    #[must_use]
    pub fn capacity_usage(&self) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }
        (self.used_slots as f64 / self.capacity as f64) as f32
    }
}

impl fmt::Display for AtomSpaceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AtomSpace Statistics:")?;
        writeln!(
            f,
            "  Atoms: {} live, {}/{} slots used ({:.1}%)",
            self.live_atoms,
            self.used_slots,
            self.capacity,
            self.capacity_usage() * 100.0
        )?;
        for entry in self.type_counts.iter().filter(|entry| entry.count > 0) {
            writeln!(f, "  {}: {}", entry.atom_type, entry.count)?;
        }
        writeln!(
            f,
            "  Inferences: {} total, {} successful (accuracy {:.2})",
            self.total_inferences, self.successful_inferences, self.reasoning_accuracy
        )?;
        write!(
            f,
            "  Average attention: sti={:.3}, lti={:.3}",
            self.average_sti, self.average_lti
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
