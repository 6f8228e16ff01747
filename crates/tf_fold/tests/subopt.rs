mod common;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tf_energy::{EnergyModel, Primary, compute_energy};
use tf_fold::{FoldContext, FoldOptions, SuboptAlg, SuboptOptions};
use tf_structure::PairSet;

use crate::common::{brute_force_mfe, enumerate_structures, random_primary};

fn ctx<'a>(r: &'a Primary, em: &'a EnergyModel, alg: SuboptAlg) -> FoldContext<'a> {
    FoldContext::new(r, em, FoldOptions { subopt_alg: alg, ..Default::default() }).unwrap()
}

#[test]
fn test_variants_agree() {
    common::init();
    let options = SuboptOptions { delta: Some(120), sorted: true, ..Default::default() };
    for seed in 0..10 {
        let mut rng = StdRng::seed_from_u64(seed);
        let em = EnergyModel::random(seed);
        let len = rng.random_range(1..=16);
        let r = random_primary(&mut rng, len);
        let priority = ctx(&r, &em, SuboptAlg::Priority).suboptimal(options).unwrap();
        let cached = ctx(&r, &em, SuboptAlg::Cached).suboptimal(options).unwrap();
        assert_eq!(priority, cached, "seed {seed}, {r}");
    }
}

#[test]
fn test_no_duplicates_and_window() {
    let delta = 150;
    let options = SuboptOptions { delta: Some(delta), sorted: true, ..Default::default() };
    for (seed, alg) in [(1, SuboptAlg::Priority), (2, SuboptAlg::Cached)] {
        let mut rng = StdRng::seed_from_u64(seed);
        let em = EnergyModel::random(seed);
        let len = rng.random_range(8..=16);
        let r = random_primary(&mut rng, len);
        let c = ctx(&r, &em, alg);
        let mfe = c.fold().energy;
        let computeds = c.suboptimal(options).unwrap();

        assert!(!computeds.is_empty());
        assert_eq!(computeds[0].energy, mfe);
        let mut seen = HashSet::new();
        let mut last = mfe;
        for computed in &computeds {
            assert!(computed.energy >= last);
            last = computed.energy;
            assert!(computed.energy <= mfe + delta);
            assert!(seen.insert((computed.pt.clone(), computed.ctds.clone())));
        }
    }
}

// Every enumerated structure must carry a self-consistent energy under
// the independent re-scorer.
#[test]
fn test_each_structure_rescores_to_itself() {
    let options =
        SuboptOptions { delta: Some(200), max_structures: Some(64), ..Default::default() };
    for seed in 0..6 {
        let mut rng = StdRng::seed_from_u64(seed ^ 0x5b0b);
        let em = EnergyModel::random(seed);
        let len = rng.random_range(8..=20);
        let r = random_primary(&mut rng, len);
        for alg in [SuboptAlg::Priority, SuboptAlg::Cached] {
            for computed in ctx(&r, &em, alg).suboptimal(options).unwrap() {
                let (rescored, _) = compute_energy(&r, &computed.pt, Some(&computed.ctds), &em);
                assert_eq!(computed.energy, rescored, "seed {seed}, {r}");
            }
        }
    }
}

#[test]
fn test_max_structures_is_respected() {
    let em = EnergyModel::random(7);
    let r = Primary::try_from("GCGCAAAAGCGC").unwrap();
    for alg in [SuboptAlg::Priority, SuboptAlg::Cached] {
        let c = ctx(&r, &em, alg);
        let all = c.suboptimal(SuboptOptions::default()).unwrap();
        assert!(all.len() > 5);
        let options = SuboptOptions { max_structures: Some(5), sorted: true, ..Default::default() };
        let capped = c.suboptimal(options).unwrap();
        assert_eq!(capped.len(), 5);
        // The cap keeps the best structures.
        assert_eq!(capped[0].energy, c.fold().energy);
    }
}

// A negative delta is treated as unset, and an extreme delta must not
// overflow the energy bound.
#[test]
fn test_degenerate_deltas_enumerate_everything() {
    let em = EnergyModel::random(7);
    let r = Primary::try_from("GCGCAAAAGCGC").unwrap();
    for alg in [SuboptAlg::Priority, SuboptAlg::Cached] {
        let c = ctx(&r, &em, alg);
        let all = c.suboptimal(SuboptOptions { sorted: true, ..Default::default() }).unwrap();
        assert!(!all.is_empty());
        for delta in [Some(-50), Some(i32::MAX)] {
            let options = SuboptOptions { delta, sorted: true, ..Default::default() };
            assert_eq!(c.suboptimal(options).unwrap(), all);
        }
    }
}

// With no bounds at all, the distinct pair sets enumerated must be
// exactly the brute-force structure space, and the best energy per
// pair set must match optimal-CTD re-scoring.
#[test]
fn test_unbounded_enumeration_is_complete() {
    for seed in 0..4 {
        let mut rng = StdRng::seed_from_u64(seed);
        let em = EnergyModel::random(seed);
        let len = rng.random_range(6..=10);
        let r = random_primary(&mut rng, len);
        let computeds =
            ctx(&r, &em, SuboptAlg::Priority).suboptimal(SuboptOptions::default()).unwrap();
        assert_eq!(computeds[0].energy, brute_force_mfe(&r, &em), "seed {seed}, {r}");

        let mut best_by_pairs: Vec<(PairSet, i32)> = Vec::new();
        for computed in &computeds {
            let ps = PairSet::from(&computed.pt);
            match best_by_pairs.iter_mut().find(|(p, _)| *p == ps) {
                Some((_, best)) => *best = (*best).min(computed.energy),
                None => best_by_pairs.push((ps, computed.energy)),
            }
        }

        let all = enumerate_structures(&r);
        assert_eq!(best_by_pairs.len(), all.len(), "seed {seed}, {r}");
        for pt in &all {
            let (optimal, _) = compute_energy(&r, pt, None, &em);
            let ps = PairSet::from(pt);
            let found = best_by_pairs.iter().find(|(p, _)| *p == ps);
            assert_eq!(found.map(|(_, e)| *e), Some(optimal), "seed {seed}, {r}");
        }
    }
}
