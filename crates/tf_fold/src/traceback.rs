//! MFE traceback by re-derivation.
//!
//! No backtracking pointers are stored during the fill. Instead, each
//! popped obligation re-enumerates its candidates and follows the first
//! one whose energy equals the stored cell value. The fill and the
//! expansion lists enumerate identical candidates, so a match always
//! exists for any reachable cell.

use tf_energy::Energy;
use tf_structure::{Ctd, NAIDX, PairTable};

use crate::expand::expansions;
use crate::index::DpState::P;
use crate::index::ExtState::Ext;
use crate::index::Index;
use crate::tables::FoldState;

pub(crate) fn traceback(s: &FoldState) -> (PairTable, Vec<Ctd>, Energy) {
    let n = s.n() as usize;
    let mut pt = PairTable::new(n);
    let mut ctds = vec![Ctd::Na; n];
    let mut stack = vec![Index::ext(0, Ext)];

    while let Some(idx) = stack.pop() {
        if let Index::Dp { st, en, a: P } = idx {
            pt.set_pair(st as NAIDX, en as NAIDX);
        }
        let target = s.at(idx);
        let exp = expansions(s, idx)
            .into_iter()
            .find(|exp| exp.energy == target)
            .unwrap_or_else(|| unreachable!("no expansion matches table value at {idx:?}"));
        if let Some((i, ctd)) = exp.ctd0 {
            ctds[i as usize] = ctd;
        }
        if let Some((i, ctd)) = exp.ctd1 {
            ctds[i as usize] = ctd;
        }
        if let Some(idx0) = exp.idx0 {
            stack.push(idx0);
        }
        if let Some(idx1) = exp.idx1 {
            stack.push(idx1);
        }
    }

    (pt, ctds, s.ext(0, Ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dp::compute_tables_zero;
    use crate::exterior::compute_exterior;
    use tf_energy::{EnergyModel, Primary, compute_energy};

    #[test]
    fn test_traceback_energy_matches_rescore() {
        for seed in 0..6 {
            let em = EnergyModel::random(seed);
            let r = Primary::try_from("GCGCAAAAGCGCAAGCGAAAACGCAA").unwrap();
            let mut s = FoldState::new(&r, &em);
            compute_tables_zero(&mut s);
            compute_exterior(&mut s);
            let (pt, ctds, energy) = traceback(&s);
            let (rescored, _) = compute_energy(&r, &pt, Some(&ctds), &em);
            assert_eq!(energy, rescored, "seed {seed}");
        }
    }

    #[test]
    fn test_unpairable_sequence_traces_to_empty() {
        let em = EnergyModel::random(1);
        let r = Primary::try_from("CCCCCCCC").unwrap();
        let mut s = FoldState::new(&r, &em);
        compute_tables_zero(&mut s);
        compute_exterior(&mut s);
        let (pt, ctds, energy) = traceback(&s);
        assert_eq!(energy, 0);
        assert_eq!(pt.num_pairs(), 0);
        assert!(ctds.iter().all(|&c| c == Ctd::Na));
    }
}
