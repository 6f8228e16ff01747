//! The nearest-neighbor energy model.
//!
//! All tables are public so callers can construct a model directly.
//! The lookup methods are pure functions over loop geometry; the DP
//! engine and the re-scoring walk both go through them, so they cannot
//! disagree on what a loop costs.

use ahash::AHashMap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::base::{Base, C, G, U, is_augu, is_gu, is_wc};
use crate::{
    CAP_E, Energy, HAIRPIN_MIN_SZ, INITIATION_CACHE_SZ, MAX_E, NINIO_MAX_ASYM, Primary, R, T,
};

/// Random model energies are drawn uniformly from this range, in tenths
/// of kcal/mol.
const RAND_MIN_E: Energy = -100;
const RAND_MAX_E: Energy = 100;

type T4 = [[[[Energy; 4]; 4]; 4]; 4];
type T3 = [[[Energy; 4]; 4]; 4];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyModel {
    /// Stacking, indexed `[5' outer][5' inner][3' inner][3' outer]`.
    pub stack: T4,
    /// Terminal mismatches, indexed `[5' closing][5' unpaired][3' unpaired][3' closing]`.
    pub terminal: T4,
    /// Internal loop mismatches, same index order as `terminal`.
    pub internal_mismatch: T4,
    /// 5' dangle, indexed `[3' closing][dangling base][5' closing]`.
    pub dangle5: T3,
    /// 3' dangle, same index order.
    pub dangle3: T3,

    pub hairpin_init: [Energy; INITIATION_CACHE_SZ],
    /// Special hairpin sequences (closing pair included), looked up whole.
    pub hairpin_special: AHashMap<String, Energy>,
    pub hairpin_uu_ga_first_mismatch: Energy,
    pub hairpin_gg_first_mismatch: Energy,
    pub hairpin_special_gu_closure: Energy,
    pub hairpin_c3_loop: Energy,
    pub hairpin_all_c_a: Energy,
    pub hairpin_all_c_b: Energy,

    pub bulge_init: [Energy; INITIATION_CACHE_SZ],
    pub bulge_special_c: Energy,

    pub internal_init: [Energy; INITIATION_CACHE_SZ],
    /// Per-unit Ninio asymmetry penalty, capped at `NINIO_MAX_ASYM`.
    pub internal_asym: Energy,
    pub internal_augu_penalty: Energy,

    pub multiloop_a: Energy,
    pub multiloop_b: Energy,

    pub coax_mismatch_non_contiguous: Energy,
    pub coax_mismatch_wc_bonus: Energy,
    pub coax_mismatch_gu_bonus: Energy,

    pub augu_penalty: Energy,
}

impl Default for EnergyModel {
    fn default() -> Self {
        EnergyModel {
            stack: [[[[0; 4]; 4]; 4]; 4],
            terminal: [[[[0; 4]; 4]; 4]; 4],
            internal_mismatch: [[[[0; 4]; 4]; 4]; 4],
            dangle5: [[[0; 4]; 4]; 4],
            dangle3: [[[0; 4]; 4]; 4],
            hairpin_init: [0; INITIATION_CACHE_SZ],
            hairpin_special: AHashMap::new(),
            hairpin_uu_ga_first_mismatch: 0,
            hairpin_gg_first_mismatch: 0,
            hairpin_special_gu_closure: 0,
            hairpin_c3_loop: 0,
            hairpin_all_c_a: 0,
            hairpin_all_c_b: 0,
            bulge_init: [0; INITIATION_CACHE_SZ],
            bulge_special_c: 0,
            internal_init: [0; INITIATION_CACHE_SZ],
            internal_asym: 0,
            internal_augu_penalty: 0,
            multiloop_a: 0,
            multiloop_b: 0,
            coax_mismatch_non_contiguous: 0,
            coax_mismatch_wc_bonus: 0,
            coax_mismatch_gu_bonus: 0,
            augu_penalty: 0,
        }
    }
}

impl EnergyModel {
    /// A model with every energy drawn from a seeded RNG. Deterministic
    /// per seed, used heavily by the cross-validation tests.
    pub fn random(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut em = EnergyModel::default();
        let e = |rng: &mut StdRng| rng.random_range(RAND_MIN_E..=RAND_MAX_E);

        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    em.dangle5[a][b][c] = e(&mut rng);
                    em.dangle3[a][b][c] = e(&mut rng);
                    for d in 0..4 {
                        em.stack[a][b][c][d] = e(&mut rng);
                        em.terminal[a][b][c][d] = e(&mut rng);
                        em.internal_mismatch[a][b][c][d] = e(&mut rng);
                    }
                }
            }
        }
        for i in 0..INITIATION_CACHE_SZ {
            em.hairpin_init[i] = e(&mut rng);
            em.bulge_init[i] = e(&mut rng);
            em.internal_init[i] = e(&mut rng);
        }
        em.hairpin_uu_ga_first_mismatch = e(&mut rng);
        em.hairpin_gg_first_mismatch = e(&mut rng);
        em.hairpin_special_gu_closure = e(&mut rng);
        em.hairpin_c3_loop = e(&mut rng);
        em.hairpin_all_c_a = e(&mut rng);
        em.hairpin_all_c_b = e(&mut rng);
        em.bulge_special_c = e(&mut rng);
        // Asymmetry stays a penalty, never a bonus.
        em.internal_asym = rng.random_range(0..=RAND_MAX_E);
        em.internal_augu_penalty = e(&mut rng);
        em.multiloop_a = e(&mut rng);
        em.multiloop_b = e(&mut rng);
        em.coax_mismatch_non_contiguous = e(&mut rng);
        em.coax_mismatch_wc_bonus = e(&mut rng);
        em.coax_mismatch_gu_bonus = e(&mut rng);
        em.augu_penalty = e(&mut rng);
        em
    }

    /// Helix-end penalty for a branch closed by `(a, b)`.
    pub fn au_gu_penalty(&self, a: Base, b: Base) -> Energy {
        if is_augu(a, b) { self.augu_penalty } else { 0 }
    }

    /// Affine multiloop initiation for `branches` total branches,
    /// including the closing one.
    pub fn multiloop_initiation(&self, branches: i32) -> Energy {
        self.multiloop_a + branches * self.multiloop_b
    }

    fn hairpin_initiation(&self, n: i32) -> Energy {
        debug_assert!(n >= HAIRPIN_MIN_SZ);
        let n = (n as usize).min(INITIATION_CACHE_SZ - 1);
        self.hairpin_init[n]
    }

    fn bulge_initiation(&self, n: i32) -> Energy {
        debug_assert!(n >= 1);
        let n = (n as usize).min(INITIATION_CACHE_SZ - 1);
        self.bulge_init[n]
    }

    // 1x1 and 1x2 loops read the generic initiation entries; there are
    // no dedicated small-loop tables.
    fn internal_loop_initiation(&self, n: i32) -> Energy {
        debug_assert!(n >= 2);
        let n = (n as usize).min(INITIATION_CACHE_SZ - 1);
        self.internal_init[n]
    }

    /// Energy of the hairpin closed by `(st, en)`.
    pub fn hairpin(&self, r: &Primary, st: usize, en: usize) -> Energy {
        let length = (en - st - 1) as i32;
        debug_assert!(length >= HAIRPIN_MIN_SZ);

        if !self.hairpin_special.is_empty() {
            if let Some(&e) = self.hairpin_special.get(&r.subseq_string(st, en)) {
                return e;
            }
        }

        let all_c = (st + 1..en).all(|i| r[i] == C);
        let mut energy = self.hairpin_initiation(length);
        if length == 3 {
            if all_c {
                energy += self.hairpin_c3_loop;
            }
            return energy;
        }

        let left = r[st + 1];
        let right = r[en - 1];
        energy += self.terminal[r[st] as usize][left as usize][right as usize][r[en] as usize];
        if (left == U && right == U) || (left == G && right == crate::base::A) {
            energy += self.hairpin_uu_ga_first_mismatch;
        }
        if left == G && right == G {
            energy += self.hairpin_gg_first_mismatch;
        }
        if all_c {
            energy += self.hairpin_all_c_a * length + self.hairpin_all_c_b;
        }
        if r[st] == G && r[en] == U && st >= 2 && r[st - 1] == G && r[st - 2] == G {
            energy += self.hairpin_special_gu_closure;
        }
        energy
    }

    fn bulge(&self, r: &Primary, ost: usize, oen: usize, ist: usize, ien: usize) -> Energy {
        let length = ((ist - ost) + (oen - ien)) as i32 - 2;
        let mut energy = self.bulge_initiation(length);
        if length > 1 {
            // Bulges of length > 1 are considered separate helices; both
            // they and the closing pairs pay the helix-end penalty.
            energy += self.au_gu_penalty(r[ost], r[oen]) + self.au_gu_penalty(r[ist], r[ien]);
            return energy;
        }
        // Single-base bulges maintain the stack.
        energy += self.stack[r[ost] as usize][r[ist] as usize][r[ien] as usize][r[oen] as usize];
        let unpaired = if ost + 1 == ist { ien + 1 } else { ost + 1 };
        if r[unpaired] == C && (r[unpaired - 1] == C || r[unpaired + 1] == C) {
            energy += self.bulge_special_c;
        }
        energy
    }

    fn internal_loop(&self, r: &Primary, ost: usize, oen: usize, ist: usize, ien: usize) -> Energy {
        let toplen = (ist - ost) as i32 - 1;
        let botlen = (oen - ien) as i32 - 1;
        let mut energy = self.internal_loop_initiation(toplen + botlen);
        energy += NINIO_MAX_ASYM.min((toplen - botlen).abs() * self.internal_asym);
        if is_augu(r[ost], r[oen]) {
            energy += self.internal_augu_penalty;
        }
        if is_augu(r[ist], r[ien]) {
            energy += self.internal_augu_penalty;
        }
        energy += self.internal_mismatch[r[ost] as usize][r[ost + 1] as usize][r[oen - 1] as usize]
            [r[oen] as usize];
        energy += self.internal_mismatch[r[ien] as usize][r[ien + 1] as usize][r[ist - 1] as usize]
            [r[ist] as usize];
        energy
    }

    /// Energy of the two-loop with outer pair `(ost, oen)` and inner pair
    /// `(ist, ien)`: a stack, a bulge or an internal loop.
    pub fn two_loop(&self, r: &Primary, ost: usize, oen: usize, ist: usize, ien: usize) -> Energy {
        debug_assert!(ost < ist && ist < ien && ien < oen);
        let toplen = ist - ost - 1;
        let botlen = oen - ien - 1;
        if toplen == 0 && botlen == 0 {
            return self.stack[r[ost] as usize][r[ist] as usize][r[ien] as usize][r[oen] as usize];
        }
        if toplen == 0 || botlen == 0 {
            return self.bulge(r, ost, oen, ist, ien);
        }
        self.internal_loop(r, ost, oen, ist, ien)
    }

    /// Coaxial stack mediated by a mismatch. `five_top` and `three_bottom`
    /// are the bases of the stacking pairs adjacent to the mismatch.
    pub fn mismatch_coaxial(
        &self,
        five_top: Base,
        mismatch_top: Base,
        mismatch_bot: Base,
        three_bottom: Base,
    ) -> Energy {
        let mut coax = self.terminal[five_top as usize][mismatch_top as usize]
            [mismatch_bot as usize][three_bottom as usize]
            + self.coax_mismatch_non_contiguous;
        if is_wc(mismatch_top, mismatch_bot) {
            coax += self.coax_mismatch_wc_bonus;
        } else if is_gu(mismatch_top, mismatch_bot) {
            coax += self.coax_mismatch_gu_bonus;
        }
        coax
    }

    /// Boltzmann weight of an energy, zero for anything at or above the cap.
    pub fn boltz(&self, energy: Energy) -> f64 {
        debug_assert!(energy <= MAX_E);
        if energy >= CAP_E {
            return 0.0;
        }
        (-f64::from(energy) / (10.0 * R * T)).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::A;

    #[test]
    fn test_random_is_deterministic() {
        let a = EnergyModel::random(12);
        let b = EnergyModel::random(12);
        let c = EnergyModel::random(13);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.internal_asym >= 0);
    }

    #[test]
    fn test_serde_round_trip() {
        let mut em = EnergyModel::random(4);
        em.hairpin_special.insert("CGAAAG".to_string(), -42);
        let s = serde_json::to_string(&em).unwrap();
        let back: EnergyModel = serde_json::from_str(&s).unwrap();
        assert_eq!(em, back);
    }

    #[test]
    fn test_special_hairpin_lookup() {
        let mut em = EnergyModel::default();
        em.hairpin_special.insert("CGAAAG".to_string(), -42);
        em.hairpin_init = [7; INITIATION_CACHE_SZ];
        let r = Primary::try_from("CGAAAG").unwrap();
        assert_eq!(em.hairpin(&r, 0, 5), -42);
        let r = Primary::try_from("CGAUAG").unwrap();
        assert_eq!(em.hairpin(&r, 0, 5), 7);
    }

    #[test]
    fn test_two_loop_dispatch() {
        let mut em = EnergyModel::default();
        em.stack[G as usize][G as usize][C as usize][C as usize] = -21;
        // Stack.
        let r = Primary::try_from("GGAAACCC").unwrap();
        assert_eq!(em.two_loop(&r, 0, 7, 1, 6), -21);
        // Single-base bulge keeps the stack term.
        em.bulge_init[1] = 32;
        let r = Primary::try_from("GAGAAACCC").unwrap();
        assert_eq!(em.two_loop(&r, 0, 8, 2, 7), 32 - 21);
        // Internal loop pays initiation plus capped asymmetry.
        em.internal_init[6] = 25;
        em.internal_asym = 90;
        let r = Primary::try_from("GAGAAACAAAAAC").unwrap();
        assert_eq!(em.two_loop(&r, 0, 12, 2, 6), 25 + NINIO_MAX_ASYM.min(4 * 90));
    }

    #[test]
    fn test_small_internal_loops() {
        let mut em = EnergyModel::default();
        em.internal_init[2] = 17;
        em.internal_init[3] = 19;
        em.internal_asym = 4;
        // 1x1.
        let r = Primary::try_from("GAGAAACAC").unwrap();
        assert_eq!(em.two_loop(&r, 0, 8, 2, 6), 17);
        // 1x2.
        let r = Primary::try_from("GAGAAACAAC").unwrap();
        assert_eq!(em.two_loop(&r, 0, 9, 2, 6), 19 + 4);
    }

    #[test]
    fn test_augu_penalty() {
        let mut em = EnergyModel::default();
        em.augu_penalty = 5;
        assert_eq!(em.au_gu_penalty(A, U), 5);
        assert_eq!(em.au_gu_penalty(G, U), 5);
        assert_eq!(em.au_gu_penalty(G, C), 0);
    }

    #[test]
    fn test_boltz() {
        let em = EnergyModel::default();
        assert_eq!(em.boltz(CAP_E), 0.0);
        assert_eq!(em.boltz(MAX_E), 0.0);
        assert!((em.boltz(0) - 1.0).abs() < 1e-12);
        assert!(em.boltz(-10) > 1.0);
    }
}
