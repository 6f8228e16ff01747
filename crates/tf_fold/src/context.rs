//! Folding entry points.
//!
//! A `FoldContext` borrows a sequence and an energy model, fills the DP
//! tables with the configured algorithm, and exposes MFE traceback and
//! suboptimal enumeration over them.

use std::fmt;

use tf_energy::{CAP_E, Energy, EnergyModel, Primary};
use tf_structure::{Ctd, PairTable};

use crate::dp::{compute_tables_one, compute_tables_zero};
use crate::exterior::compute_exterior;
use crate::index::ExtState::Ext;
use crate::subopt::{suboptimal_cached, suboptimal_priority};
use crate::tables::FoldState;
use crate::traceback::traceback;

/// Which table-fill algorithm to run. Both produce identical tables;
/// `One` goes through precomputed per-branch costs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TableAlg {
    #[default]
    Zero,
    One,
}

/// Which suboptimal enumerator to run. Both produce identical structure
/// sets; `Cached` shares work between nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuboptAlg {
    #[default]
    Priority,
    Cached,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldOptions {
    pub table_alg: TableAlg,
    pub subopt_alg: SuboptAlg,
}

/// Bounds for suboptimal enumeration. `delta` is relative to the MFE;
/// unset and negative bounds mean "everything foldable". Requesting
/// zero structures is rejected up front.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuboptOptions {
    pub delta: Option<Energy>,
    pub max_structures: Option<usize>,
    /// Sort the result by (energy, pairs, CTDs) instead of returning
    /// enumeration order.
    pub sorted: bool,
}

/// One complete folded structure: pairs, per-base CTD annotation, and
/// its energy under the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Computed {
    pub pt: PairTable,
    pub ctds: Vec<Ctd>,
    pub energy: Energy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldError {
    /// Folding an empty sequence.
    EmptySequence,

    /// Suboptimal enumeration with `max_structures == 0`.
    NoStructuresRequested,
}

impl fmt::Display for FoldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FoldError::EmptySequence => write!(f, "cannot fold an empty sequence"),
            FoldError::NoStructuresRequested => {
                write!(f, "suboptimal folding requires max_structures > 0")
            }
        }
    }
}

impl std::error::Error for FoldError {}

pub struct FoldContext<'a> {
    r: &'a Primary,
    em: &'a EnergyModel,
    options: FoldOptions,
}

impl<'a> FoldContext<'a> {
    pub fn new(
        r: &'a Primary,
        em: &'a EnergyModel,
        options: FoldOptions,
    ) -> Result<Self, FoldError> {
        if r.is_empty() {
            return Err(FoldError::EmptySequence);
        }
        Ok(FoldContext { r, em, options })
    }

    fn compute(&self) -> FoldState<'a> {
        let mut s = FoldState::new(self.r, self.em);
        match self.options.table_alg {
            TableAlg::Zero => compute_tables_zero(&mut s),
            TableAlg::One => compute_tables_one(&mut s),
        }
        compute_exterior(&mut s);
        log::debug!(
            "filled tables for n = {} with {:?}, mfe = {}",
            s.n(),
            self.options.table_alg,
            s.ext(0, Ext)
        );
        s
    }

    /// Minimum free energy structure with its CTD annotation.
    pub fn fold(&self) -> Computed {
        let s = self.compute();
        let (pt, ctds, energy) = traceback(&s);
        Computed { pt, ctds, energy }
    }

    /// All structures within the given bounds, duplicate-free.
    pub fn suboptimal(&self, options: SuboptOptions) -> Result<Vec<Computed>, FoldError> {
        if options.max_structures == Some(0) {
            return Err(FoldError::NoStructuresRequested);
        }
        let s = self.compute();
        // Negative and unset deltas both mean "everything foldable".
        let max_energy = match options.delta {
            Some(delta) if delta >= 0 => s.ext(0, Ext).saturating_add(delta).min(CAP_E),
            _ => CAP_E,
        };
        let max_structures = options.max_structures.unwrap_or(usize::MAX / 2);
        let mut computeds = match self.options.subopt_alg {
            SuboptAlg::Priority => suboptimal_priority(&s, max_energy, max_structures),
            SuboptAlg::Cached => suboptimal_cached(&s, max_energy, max_structures),
        };
        log::debug!(
            "suboptimal folding with {:?} produced {} structures",
            self.options.subopt_alg,
            computeds.len()
        );
        if options.sorted {
            computeds.sort_by(|a, b| {
                (a.energy, &a.pt, &a.ctds).cmp(&(b.energy, &b.pt, &b.ctds))
            });
        }
        Ok(computeds)
    }

    /// Streams suboptimal structures through a callback; returns how
    /// many were produced.
    pub fn suboptimal_into<F: FnMut(&Computed)>(
        &self,
        options: SuboptOptions,
        mut f: F,
    ) -> Result<usize, FoldError> {
        let computeds = self.suboptimal(options)?;
        for computed in &computeds {
            f(computed);
        }
        Ok(computeds.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sequence_is_rejected() {
        let em = EnergyModel::random(0);
        let r = Primary::from(vec![]);
        assert_eq!(FoldContext::new(&r, &em, FoldOptions::default()).err(),
            Some(FoldError::EmptySequence));
    }

    #[test]
    fn test_zero_structures_is_rejected() {
        let em = EnergyModel::random(0);
        let r = Primary::try_from("GCGAAACGC").unwrap();
        let ctx = FoldContext::new(&r, &em, FoldOptions::default()).unwrap();
        let options = SuboptOptions { max_structures: Some(0), ..Default::default() };
        assert_eq!(ctx.suboptimal(options).err(), Some(FoldError::NoStructuresRequested));
    }
}
