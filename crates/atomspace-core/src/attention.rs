//! # Attention Bank
//!
//! ECAN-style importance dynamics over the atom table.
//!
//! - `decay_tick` fades sti and lti, and funnels part of a high sti into lti
//! - `spread` pushes sti along outgoing and incoming adjacency
//!
//! Spreading is bidirectional diffusion, not a conservation law: the same
//! amount is split over the outgoing set and again over the incoming set.

use crate::primitives::STI_TO_LTI_TRANSFER;
use crate::table::AtomTable;
use crate::types::{AtomId, AtomSpaceError, AttentionValue, clamp_signed, ensure_finite};

/// Importance bookkeeping over an [`AtomTable`].
///
/// Stateless: the attention values live on the atoms and the rates live in
/// the table's configuration.
pub struct AttentionBank;

impl AttentionBank {
    /// Overwrite an atom's attention value, clamping every field.
    pub fn set_attention(
        table: &mut AtomTable,
        id: AtomId,
        sti: f32,
        lti: f32,
        vlti: f32,
    ) -> Result<(), AtomSpaceError> {
        ensure_finite("sti", sti)?;
        ensure_finite("lti", lti)?;
        ensure_finite("vlti", vlti)?;
        table.atom_mut(id)?.attention = AttentionValue::new(sti, lti, vlti);
        Ok(())
    }

    /// Attention value of a live atom.
    pub fn get_attention(table: &AtomTable, id: AtomId) -> Result<AttentionValue, AtomSpaceError> {
        table
            .peek(id)
            .map(|atom| atom.attention)
            .ok_or(AtomSpaceError::NotFound(id))
    }

    /// Apply one decay step to every live atom. Returns how many were touched.
    ///
    /// `sti` and `lti` are multiplied by the decay rate. If the decayed `sti`
    /// is still above the attention threshold, 10% of it moves into `lti`.
    pub fn decay_tick(table: &mut AtomTable) -> usize {
        let decay_rate = table.config().decay_rate;
        let threshold = table.config().attention_threshold;

        let mut touched = 0usize;
        let mut consolidated = 0usize;
        for atom in table.atoms_mut() {
            let mut av = atom.attention;
            av.sti *= decay_rate;
            av.lti *= decay_rate;

            if av.sti > threshold {
                let transfer = av.sti * STI_TO_LTI_TRANSFER;
                av.lti += transfer;
                av.sti -= transfer;
                consolidated = consolidated.saturating_add(1);
            }

            atom.attention = av.clamped();
            touched = touched.saturating_add(1);
        }

        tracing::debug!(touched, consolidated, "attention decay tick");
        touched
    }

    /// Spread `amount` of sti from `source` to its neighbours.
    ///
    /// Each outgoing target receives `amount / |outgoing|`; each incoming link
    /// receives `amount / |incoming|`. Deleted neighbours are skipped but still
    /// count in the divisor. The source itself is not debited.
    pub fn spread(table: &mut AtomTable, source: AtomId, amount: f32) -> Result<(), AtomSpaceError> {
        ensure_finite("amount", amount)?;
        let (outgoing, incoming) = {
            let atom = table.peek(source).ok_or(AtomSpaceError::NotFound(source))?;
            (atom.outgoing.clone(), atom.incoming.clone())
        };

        let reached = Self::distribute(table, &outgoing, amount)
            .saturating_add(Self::distribute(table, &incoming, amount));

        tracing::debug!(source = source.0, amount, reached, "spread attention");
        Ok(())
    }

    /// Spread `sti(source) * importance_diffusion_rate` from `source`.
    ///
    /// Returns the amount that was spread.
    pub fn spread_diffused(table: &mut AtomTable, source: AtomId) -> Result<f32, AtomSpaceError> {
        let sti = Self::get_attention(table, source)?.sti;
        let amount = sti * table.config().importance_diffusion_rate;
        Self::spread(table, source, amount)?;
        Ok(amount)
    }

    fn distribute(table: &mut AtomTable, targets: &[AtomId], amount: f32) -> usize {
        if targets.is_empty() {
            return 0;
        }
        let share = amount / targets.len() as f32;

        let mut reached = 0usize;
        for target in targets {
            if let Ok(atom) = table.atom_mut(*target) {
                atom.attention.sti = clamp_signed(atom.attention.sti + share);
                reached = reached.saturating_add(1);
            }
        }
        reached
    }
}

// =============================================================================
// TESTS
// =============================================================================
