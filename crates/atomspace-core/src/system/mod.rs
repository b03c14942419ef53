//! # System Module
//!
//! Whole-engine statistics.
//!
//! Pure snapshots: computing them never mutates the table, ticks the logical
//! clock or touches attention.

mod stats;

pub use stats::*;
