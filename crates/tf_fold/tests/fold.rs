mod common;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tf_energy::{C, EnergyModel, G, Primary, compute_energy};
use tf_fold::{FoldContext, FoldOptions, TableAlg};

use crate::common::{brute_force_mfe, random_primary};

#[test]
fn test_triple_helix() {
    // A model where only GC-on-GC stacking is rewarded folds GGGAAACCC
    // into the maximally stacked hairpin.
    let mut em = EnergyModel::default();
    em.stack[G as usize][G as usize][C as usize][C as usize] = -21;
    let r = Primary::try_from("GGGAAACCC").unwrap();
    let ctx = FoldContext::new(&r, &em, FoldOptions::default()).unwrap();
    let computed = ctx.fold();
    assert_eq!(computed.energy, -42);
    let pairs: Vec<_> = (0..9).filter_map(|i| computed.pt.pair(i).map(|j| (i, j as usize)))
        .filter(|&(i, j)| i < j)
        .collect();
    assert_eq!(pairs, vec![(0, 8), (1, 7), (2, 6)]);
}

#[test]
fn test_too_short_to_pair() {
    let em = EnergyModel::random(4);
    for seq in ["A", "GC", "GGC", "GAAC"] {
        let r = Primary::try_from(seq).unwrap();
        let ctx = FoldContext::new(&r, &em, FoldOptions::default()).unwrap();
        let computed = ctx.fold();
        assert_eq!(computed.energy, 0, "{seq}");
        assert_eq!(computed.pt.num_pairs(), 0, "{seq}");
    }
}

#[test]
fn test_mfe_matches_brute_force() {
    common::init();
    for seed in 0..16 {
        let mut rng = StdRng::seed_from_u64(seed);
        let em = EnergyModel::random(seed);
        let len = rng.random_range(1..=14);
        let r = random_primary(&mut rng, len);
        let ctx = FoldContext::new(&r, &em, FoldOptions::default()).unwrap();
        assert_eq!(ctx.fold().energy, brute_force_mfe(&r, &em), "seed {seed}, {r}");
    }
}

#[test]
fn test_table_algs_fold_identically() {
    for seed in 0..8 {
        let mut rng = StdRng::seed_from_u64(seed);
        let em = EnergyModel::random(seed);
        let len = rng.random_range(1..=30);
        let r = random_primary(&mut rng, len);
        let zero = FoldContext::new(
            &r,
            &em,
            FoldOptions { table_alg: TableAlg::Zero, ..Default::default() },
        )
        .unwrap()
        .fold();
        let one = FoldContext::new(
            &r,
            &em,
            FoldOptions { table_alg: TableAlg::One, ..Default::default() },
        )
        .unwrap()
        .fold();
        assert_eq!(zero, one, "seed {seed}, {r}");
    }
}

// The traceback's CTD annotation must rescore to the MFE under the
// independent energy function.
#[test]
fn test_mfe_rescores_to_itself() {
    for seed in 0..12 {
        let mut rng = StdRng::seed_from_u64(seed ^ 0xf01d);
        let em = EnergyModel::random(seed);
        let len = rng.random_range(1..=40);
        let r = random_primary(&mut rng, len);
        let ctx = FoldContext::new(&r, &em, FoldOptions::default()).unwrap();
        let computed = ctx.fold();
        let (rescored, _) = compute_energy(&r, &computed.pt, Some(&computed.ctds), &em);
        assert_eq!(computed.energy, rescored, "seed {seed}, {r}");
        // Optimal CTD selection cannot beat the DP either.
        let (optimal, _) = compute_energy(&r, &computed.pt, None, &em);
        assert_eq!(computed.energy, optimal, "seed {seed}, {r}");
    }
}
