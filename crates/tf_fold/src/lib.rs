//! The tf_fold crate.
//!
//! Minimum free energy folding of RNA sequences under a nearest-neighbor
//! model with coaxial stacking, terminal mismatches and dangles, plus
//! duplicate-free suboptimal enumeration:
//!  - `FoldContext::fold` fills the DP tables and tracebacks the MFE
//!    structure with its CTD annotation.
//!  - `FoldContext::suboptimal` enumerates all structures within an
//!    energy window and/or up to a structure count, best-first.
//!
//! Energies and models come from `tf_energy`; structures are returned
//! as `tf_structure` pair tables with per-base CTDs.

mod context;
mod dp;
mod expand;
mod exterior;
mod index;
mod precomp;
mod subopt;
mod tables;
mod traceback;

pub use context::*;
pub use index::{DpState, ExtState, Index};
