//! Matching logic
//!
//! Crossing detection lives here; the loop that drives it is in the
//! engine module.

pub mod crossing;
