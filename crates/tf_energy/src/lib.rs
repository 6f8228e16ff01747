//! The tf_energy crate.
//!
//! Provides the thermodynamic side of thermofold:
//!  - the RNA base alphabet and immutable `Primary` sequences.
//!  - the nearest-neighbor `EnergyModel` (pure lookup functions over
//!    loop geometry, a Boltzmann transform, seeded random construction).
//!  - independent structure re-scoring (`compute_energy`), including
//!    optimal CTD selection per loop.
//!
//! Parameter-file parsing lives outside this workspace; models are built
//! from explicit tables or `EnergyModel::random`.

mod base;
mod model;
mod efn;

pub use base::*;
pub use model::*;
pub use efn::*;


/// Energies are in tenths of kcal/mol, as signed 32-bit integers.
pub type Energy = i32;

/// Sentinel for "impossible"; strictly above any reachable energy.
pub const MAX_E: Energy = 0x0F0F_0F0F;

/// Cap for capped comparisons: only values below this are treated as
/// valid before adding further terms, so sums of a handful of terms
/// stay far away from `i32` overflow.
pub const CAP_E: Energy = MAX_E / 4;

/// Minimum number of unpaired bases enclosed by a hairpin pair.
pub const HAIRPIN_MIN_SZ: i32 = 3;

/// Maximum number of unpaired bases in a two-loop (bulge/internal).
pub const TWOLOOP_MAX_SZ: i32 = 30;

/// Number of tabulated loop-initiation sizes; larger loops clamp.
pub const INITIATION_CACHE_SZ: usize = 31;

/// Cap on the Ninio internal-loop asymmetry penalty.
pub const NINIO_MAX_ASYM: Energy = 300;

/// Gas constant in kcal/(mol*K).
pub const R: f64 = 1.9872036e-3;

/// Folding temperature in Kelvin (37 degrees Celsius).
pub const T: f64 = 310.15;
