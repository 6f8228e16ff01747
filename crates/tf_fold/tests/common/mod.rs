//! Brute-force oracle shared by the integration tests.
//!
//! Enumerates every non-crossing structure over the same candidate
//! pairs the DP admits, scoring each with the independent re-scorer
//! and its optimal CTD choice. Only usable for short sequences.

use tf_energy::{Energy, EnergyModel, HAIRPIN_MIN_SZ, Primary, can_pair, compute_energy};
use tf_structure::{NAIDX, PairTable};

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// The non-lonely candidate pair rule the fill uses.
pub fn viable_pair(r: &Primary, st: usize, en: usize) -> bool {
    let n = r.len();
    can_pair(r[st], r[en])
        && ((en - st >= HAIRPIN_MIN_SZ as usize + 3 && can_pair(r[st + 1], r[en - 1]))
            || (st > 0 && en < n - 1 && can_pair(r[st - 1], r[en + 1])))
}

fn structures_in(r: &Primary, st: usize, en: usize) -> Vec<Vec<(usize, usize)>> {
    if st >= en {
        return vec![vec![]];
    }
    // Leave |st| unpaired.
    let mut out = structures_in(r, st + 1, en);
    for piv in (st + HAIRPIN_MIN_SZ as usize + 1)..en {
        if !viable_pair(r, st, piv) {
            continue;
        }
        let inners = structures_in(r, st + 1, piv);
        let outers = structures_in(r, piv + 1, en);
        for inner in &inners {
            for outer in &outers {
                let mut pairs = vec![(st, piv)];
                pairs.extend_from_slice(inner);
                pairs.extend_from_slice(outer);
                out.push(pairs);
            }
        }
    }
    out
}

/// Every non-crossing structure over viable pairs, as pair tables.
pub fn enumerate_structures(r: &Primary) -> Vec<PairTable> {
    structures_in(r, 0, r.len())
        .into_iter()
        .map(|pairs| {
            let mut pt = PairTable::new(r.len());
            for (st, en) in pairs {
                pt.set_pair(st as NAIDX, en as NAIDX);
            }
            pt
        })
        .collect()
}

/// Minimum energy over all structures, each scored with optimal CTDs.
pub fn brute_force_mfe(r: &Primary, em: &EnergyModel) -> Energy {
    enumerate_structures(r)
        .iter()
        .map(|pt| compute_energy(r, pt, None, em).0)
        .min()
        .unwrap_or(0)
}

pub fn random_primary(rng: &mut impl rand::Rng, len: usize) -> Primary {
    Primary::from((0..len).map(|_| rng.random_range(0..4u8)).collect::<Vec<_>>())
}
