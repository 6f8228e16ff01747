//! The interval DP fill.
//!
//! Two algorithms compute the same recurrence: `compute_tables_zero`
//! evaluates every term directly from the model, `compute_tables_one`
//! goes through the precomputed per-branch costs and the fast two-loop
//! dispatch. They must agree cell for cell; the cross-check test relies
//! on it.
//!
//! Cells are only ever lowered through `min_update`, which refuses
//! anything at or above `CAP_E`, so a cell is either a real energy or
//! exactly `MAX_E`.

use tf_energy::{CAP_E, Energy, HAIRPIN_MIN_SZ, MAX_E, TWOLOOP_MAX_SZ, is_gu};

use crate::index::DpState::{P, U, U2, UGu, URcoax, UWc};
use crate::precomp::fast_two_loop;
use crate::tables::FoldState;

#[inline]
pub(crate) fn min_update(slot: &mut Energy, value: Energy) {
    if value < CAP_E && value < *slot {
        *slot = value;
    }
}

pub(crate) fn compute_tables_zero(s: &mut FoldState) {
    let n = s.n();
    for st in (0..n).rev() {
        for en in (st + HAIRPIN_MIN_SZ + 1)..n {
            let (stb, st1b, st2b) = (s.base(st), s.base(st + 1), s.base(st + 2));
            let (enb, en1b, en2b) = (s.base(en), s.base(en - 1), s.base(en - 2));

            if s.viable_pair(st, en) {
                let mut p_min = MAX_E;
                let max_inter = TWOLOOP_MAX_SZ.min(en - st - HAIRPIN_MIN_SZ - 3);
                for ist in (st + 1)..(st + max_inter + 2) {
                    for ien in (en - max_inter + ist - st - 2)..en {
                        if s.dp(ist, ien, P) < CAP_E {
                            let two = s.em.two_loop(
                                s.r,
                                st as usize,
                                en as usize,
                                ist as usize,
                                ien as usize,
                            );
                            min_update(&mut p_min, two + s.dp(ist, ien, P));
                        }
                    }
                }
                min_update(&mut p_min, s.em.hairpin(s.r, st as usize, en as usize));

                // Multiloop closure: initiation plus the closing branch,
                // with its helix-end penalty.
                let base_branch_cost =
                    s.em.au_gu_penalty(stb, enb) + s.em.multiloop_a + s.em.multiloop_b;

                // (<   ><   >)
                min_update(&mut p_min, base_branch_cost + s.dp(st + 1, en - 1, U2));
                // (3<   ><   >) 3'
                min_update(
                    &mut p_min,
                    base_branch_cost
                        + s.dp(st + 2, en - 1, U2)
                        + s.em.dangle3[stb as usize][st1b as usize][enb as usize],
                );
                // (<   ><   >5) 5'
                min_update(
                    &mut p_min,
                    base_branch_cost
                        + s.dp(st + 1, en - 2, U2)
                        + s.em.dangle5[stb as usize][en1b as usize][enb as usize],
                );
                // (.<   ><   >.) Terminal mismatch
                min_update(
                    &mut p_min,
                    base_branch_cost
                        + s.dp(st + 2, en - 2, U2)
                        + s.em.terminal[stb as usize][st1b as usize][en1b as usize][enb as usize],
                );

                for piv in (st + HAIRPIN_MIN_SZ + 2)..(en - HAIRPIN_MIN_SZ - 2) {
                    let (pl1b, plb) = (s.base(piv - 1), s.base(piv));
                    let (prb, pr1b) = (s.base(piv + 1), s.base(piv + 2));

                    // (.(   )   .) Left outer coax
                    let outer_coax = s.em.mismatch_coaxial(stb, st1b, en1b, enb);
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 2, piv, P)
                            + s.em.multiloop_b
                            + s.em.au_gu_penalty(st2b, plb)
                            + s.dp(piv + 1, en - 2, U)
                            + outer_coax,
                    );
                    // (.   (   ).) Right outer coax
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 2, piv, U)
                            + s.em.multiloop_b
                            + s.em.au_gu_penalty(prb, en2b)
                            + s.dp(piv + 1, en - 2, P)
                            + outer_coax,
                    );
                    // (.(   ).   ) Left inner coax
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 2, piv - 1, P)
                            + s.em.multiloop_b
                            + s.em.au_gu_penalty(st2b, pl1b)
                            + s.dp(piv + 1, en - 1, U)
                            + s.em.mismatch_coaxial(pl1b, plb, st1b, st2b),
                    );
                    // (   .(   ).) Right inner coax
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 1, piv, U)
                            + s.em.multiloop_b
                            + s.em.au_gu_penalty(pr1b, en2b)
                            + s.dp(piv + 2, en - 2, P)
                            + s.em.mismatch_coaxial(en2b, en1b, prb, pr1b),
                    );
                    // ((   )   ) Left flush coax
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 1, piv, P)
                            + s.em.multiloop_b
                            + s.em.au_gu_penalty(st1b, plb)
                            + s.dp(piv + 1, en - 1, U)
                            + s.em.stack[stb as usize][st1b as usize][plb as usize][enb as usize],
                    );
                    // (   (   )) Right flush coax
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 1, piv, U)
                            + s.em.multiloop_b
                            + s.em.au_gu_penalty(prb, en1b)
                            + s.dp(piv + 1, en - 1, P)
                            + s.em.stack[stb as usize][prb as usize][en1b as usize][enb as usize],
                    );
                }
                s.set_dp(st, en, P, p_min);
            }

            let mut u_min = MAX_E;
            let mut u2_min = MAX_E;
            let mut wc_min = MAX_E;
            let mut gu_min = MAX_E;
            let mut rcoax_min = MAX_E;

            // Leave |st| unpaired.
            if st + 1 < en {
                min_update(&mut u_min, s.dp(st + 1, en, U));
                min_update(&mut u2_min, s.dp(st + 1, en, U2));
            }
            // Or place a branch starting at |st|.
            for piv in (st + HAIRPIN_MIN_SZ + 1)..=en {
                let (pb, pl1b) = (s.base(piv), s.base(piv - 1));
                // baseAB: A bases unpaired on the left, B on the right.
                let base00 = s.dp(st, piv, P) + s.em.au_gu_penalty(stb, pb) + s.em.multiloop_b;
                let base01 =
                    s.dp(st, piv - 1, P) + s.em.au_gu_penalty(stb, pl1b) + s.em.multiloop_b;
                let base10 =
                    s.dp(st + 1, piv, P) + s.em.au_gu_penalty(st1b, pb) + s.em.multiloop_b;
                let base11 =
                    s.dp(st + 1, piv - 1, P) + s.em.au_gu_penalty(st1b, pl1b) + s.em.multiloop_b;
                // Either more unpaired bases after the branch, or nothing.
                let right_unpaired = s.dp(piv + 1, en, U).min(0);

                // (   )<   >
                min_update(&mut u2_min, base00 + s.dp(piv + 1, en, U));
                let val = base00 + right_unpaired;
                min_update(&mut u_min, val);
                if is_gu(stb, pb) {
                    min_update(&mut gu_min, val);
                } else {
                    min_update(&mut wc_min, val);
                }

                // (   )3<   > 3'
                let d3 = s.em.dangle3[pl1b as usize][pb as usize][stb as usize];
                min_update(&mut u_min, base01 + d3 + right_unpaired);
                min_update(&mut u2_min, base01 + d3 + s.dp(piv + 1, en, U));
                // 5(   )<   > 5'
                let d5 = s.em.dangle5[pb as usize][stb as usize][st1b as usize];
                min_update(&mut u_min, base10 + d5 + right_unpaired);
                min_update(&mut u2_min, base10 + d5 + s.dp(piv + 1, en, U));
                // .(   ).<   > Terminal mismatch
                let tm = s.em.terminal[pl1b as usize][pb as usize][stb as usize][st1b as usize];
                min_update(&mut u_min, base11 + tm + right_unpaired);
                min_update(&mut u2_min, base11 + tm + s.dp(piv + 1, en, U));
                // .(   ).<(   ) > Left coax
                let val = base11
                    + s.em.mismatch_coaxial(pl1b, pb, stb, st1b)
                    + s.dp(piv + 1, en, UWc).min(s.dp(piv + 1, en, UGu));
                min_update(&mut u_min, val);
                min_update(&mut u2_min, val);

                // (   ).<(   ). > Right coax forward and backward
                let val = base01 + s.dp(piv + 1, en, URcoax);
                min_update(&mut u_min, val);
                min_update(&mut u2_min, val);
                if st > 0 {
                    min_update(
                        &mut rcoax_min,
                        base01
                            + s.em.mismatch_coaxial(pl1b, pb, s.base(st - 1), stb)
                            + right_unpaired,
                    );
                }

                // Flush coax needs a base after the branch.
                if piv < en {
                    let pr1b = s.base(piv + 1);
                    // (   )<(   ) > Flush coax against a Watson-Crick branch.
                    let val = base00
                        + s.em.stack[pb as usize][pr1b as usize][(pr1b ^ 3) as usize][stb as usize]
                        + s.dp(piv + 1, en, UWc);
                    min_update(&mut u_min, val);
                    min_update(&mut u2_min, val);
                    if pr1b == tf_energy::G || pr1b == tf_energy::U {
                        let val = base00
                            + s.em.stack[pb as usize][pr1b as usize][(pr1b ^ 1) as usize]
                                [stb as usize]
                            + s.dp(piv + 1, en, UGu);
                        min_update(&mut u_min, val);
                        min_update(&mut u2_min, val);
                    }
                }
            }

            s.set_dp(st, en, U, u_min);
            s.set_dp(st, en, U2, u2_min);
            s.set_dp(st, en, UWc, wc_min);
            s.set_dp(st, en, UGu, gu_min);
            s.set_dp(st, en, URcoax, rcoax_min);
        }
    }
}

pub(crate) fn compute_tables_one(s: &mut FoldState) {
    let n = s.n();
    for st in (0..n).rev() {
        for en in (st + HAIRPIN_MIN_SZ + 1)..n {
            let (stb, st1b, st2b) = (s.base(st), s.base(st + 1), s.base(st + 2));
            let (enb, en1b, en2b) = (s.base(en), s.base(en - 1), s.base(en - 2));

            if s.viable_pair(st, en) {
                let mut p_min = MAX_E;
                let max_inter = TWOLOOP_MAX_SZ.min(en - st - HAIRPIN_MIN_SZ - 3);
                for ist in (st + 1)..(st + max_inter + 2) {
                    for ien in (en - max_inter + ist - st - 2)..en {
                        if s.dp(ist, ien, P) < CAP_E {
                            let two = fast_two_loop(s.em, s.r, st, en, ist, ien);
                            min_update(&mut p_min, two + s.dp(ist, ien, P));
                        }
                    }
                }
                min_update(&mut p_min, s.em.hairpin(s.r, st as usize, en as usize));

                let base_branch_cost =
                    s.pc.augubranch[stb as usize][enb as usize] + s.em.multiloop_a;

                min_update(&mut p_min, base_branch_cost + s.dp(st + 1, en - 1, U2));
                min_update(
                    &mut p_min,
                    base_branch_cost
                        + s.dp(st + 2, en - 1, U2)
                        + s.em.dangle3[stb as usize][st1b as usize][enb as usize],
                );
                min_update(
                    &mut p_min,
                    base_branch_cost
                        + s.dp(st + 1, en - 2, U2)
                        + s.em.dangle5[stb as usize][en1b as usize][enb as usize],
                );
                min_update(
                    &mut p_min,
                    base_branch_cost
                        + s.dp(st + 2, en - 2, U2)
                        + s.em.terminal[stb as usize][st1b as usize][en1b as usize][enb as usize],
                );

                for piv in (st + HAIRPIN_MIN_SZ + 2)..(en - HAIRPIN_MIN_SZ - 2) {
                    let (pl1b, plb) = (s.base(piv - 1), s.base(piv));
                    let (prb, pr1b) = (s.base(piv + 1), s.base(piv + 2));

                    let outer_coax = s.em.mismatch_coaxial(stb, st1b, en1b, enb);
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 2, piv, P)
                            + s.pc.augubranch[st2b as usize][plb as usize]
                            + s.dp(piv + 1, en - 2, U)
                            + outer_coax,
                    );
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 2, piv, U)
                            + s.pc.augubranch[prb as usize][en2b as usize]
                            + s.dp(piv + 1, en - 2, P)
                            + outer_coax,
                    );
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 2, piv - 1, P)
                            + s.pc.augubranch[st2b as usize][pl1b as usize]
                            + s.dp(piv + 1, en - 1, U)
                            + s.em.mismatch_coaxial(pl1b, plb, st1b, st2b),
                    );
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 1, piv, U)
                            + s.pc.augubranch[pr1b as usize][en2b as usize]
                            + s.dp(piv + 2, en - 2, P)
                            + s.em.mismatch_coaxial(en2b, en1b, prb, pr1b),
                    );
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 1, piv, P)
                            + s.pc.augubranch[st1b as usize][plb as usize]
                            + s.dp(piv + 1, en - 1, U)
                            + s.em.stack[stb as usize][st1b as usize][plb as usize][enb as usize],
                    );
                    min_update(
                        &mut p_min,
                        base_branch_cost
                            + s.dp(st + 1, piv, U)
                            + s.pc.augubranch[prb as usize][en1b as usize]
                            + s.dp(piv + 1, en - 1, P)
                            + s.em.stack[stb as usize][prb as usize][en1b as usize][enb as usize],
                    );
                }
                s.set_dp(st, en, P, p_min);
            }

            let mut u_min = MAX_E;
            let mut u2_min = MAX_E;
            let mut wc_min = MAX_E;
            let mut gu_min = MAX_E;
            let mut rcoax_min = MAX_E;

            if st + 1 < en {
                min_update(&mut u_min, s.dp(st + 1, en, U));
                min_update(&mut u2_min, s.dp(st + 1, en, U2));
            }
            for piv in (st + HAIRPIN_MIN_SZ + 1)..=en {
                let (pb, pl1b) = (s.base(piv), s.base(piv - 1));
                let base00 = s.dp(st, piv, P) + s.pc.augubranch[stb as usize][pb as usize];
                let base01 = s.dp(st, piv - 1, P) + s.pc.augubranch[stb as usize][pl1b as usize];
                let base10 = s.dp(st + 1, piv, P) + s.pc.augubranch[st1b as usize][pb as usize];
                let base11 =
                    s.dp(st + 1, piv - 1, P) + s.pc.augubranch[st1b as usize][pl1b as usize];
                let right_unpaired = s.dp(piv + 1, en, U).min(0);

                min_update(&mut u2_min, base00 + s.dp(piv + 1, en, U));
                let val = base00 + right_unpaired;
                min_update(&mut u_min, val);
                if is_gu(stb, pb) {
                    min_update(&mut gu_min, val);
                } else {
                    min_update(&mut wc_min, val);
                }

                let d3 = s.em.dangle3[pl1b as usize][pb as usize][stb as usize];
                min_update(&mut u_min, base01 + d3 + right_unpaired);
                min_update(&mut u2_min, base01 + d3 + s.dp(piv + 1, en, U));
                let d5 = s.em.dangle5[pb as usize][stb as usize][st1b as usize];
                min_update(&mut u_min, base10 + d5 + right_unpaired);
                min_update(&mut u2_min, base10 + d5 + s.dp(piv + 1, en, U));
                let tm = s.em.terminal[pl1b as usize][pb as usize][stb as usize][st1b as usize];
                min_update(&mut u_min, base11 + tm + right_unpaired);
                min_update(&mut u2_min, base11 + tm + s.dp(piv + 1, en, U));
                let val = base11
                    + s.em.mismatch_coaxial(pl1b, pb, stb, st1b)
                    + s.dp(piv + 1, en, UWc).min(s.dp(piv + 1, en, UGu));
                min_update(&mut u_min, val);
                min_update(&mut u2_min, val);

                let val = base01 + s.dp(piv + 1, en, URcoax);
                min_update(&mut u_min, val);
                min_update(&mut u2_min, val);
                if st > 0 {
                    min_update(
                        &mut rcoax_min,
                        base01
                            + s.em.mismatch_coaxial(pl1b, pb, s.base(st - 1), stb)
                            + right_unpaired,
                    );
                }

                if piv < en {
                    let pr1b = s.base(piv + 1);
                    let val = base00
                        + s.em.stack[pb as usize][pr1b as usize][(pr1b ^ 3) as usize][stb as usize]
                        + s.dp(piv + 1, en, UWc);
                    min_update(&mut u_min, val);
                    min_update(&mut u2_min, val);
                    if pr1b == tf_energy::G || pr1b == tf_energy::U {
                        let val = base00
                            + s.em.stack[pb as usize][pr1b as usize][(pr1b ^ 1) as usize]
                                [stb as usize]
                            + s.dp(piv + 1, en, UGu);
                        min_update(&mut u_min, val);
                        min_update(&mut u2_min, val);
                    }
                }
            }

            s.set_dp(st, en, U, u_min);
            s.set_dp(st, en, U2, u2_min);
            s.set_dp(st, en, UWc, wc_min);
            s.set_dp(st, en, UGu, gu_min);
            s.set_dp(st, en, URcoax, rcoax_min);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use tf_energy::{EnergyModel, Primary};

    fn random_primary(rng: &mut StdRng, len: usize) -> Primary {
        Primary::from((0..len).map(|_| rng.random_range(0..4u8)).collect::<Vec<_>>())
    }

    #[test]
    fn test_table_algs_agree() {
        for seed in 0..8 {
            let mut rng = StdRng::seed_from_u64(seed);
            let em = EnergyModel::random(seed);
            let len = rng.random_range(1..24);
            let r = random_primary(&mut rng, len);

            let mut s0 = FoldState::new(&r, &em);
            compute_tables_zero(&mut s0);
            let mut s1 = FoldState::new(&r, &em);
            compute_tables_one(&mut s1);

            assert_eq!(s0.dp, s1.dp, "seed {seed}, {r}");
        }
    }

    #[test]
    fn test_short_sequence_has_no_pairs() {
        let em = EnergyModel::random(11);
        let r = Primary::try_from("GAAC").unwrap();
        let mut s = FoldState::new(&r, &em);
        compute_tables_zero(&mut s);
        // No interval admits a hairpin, every paired state stays impossible.
        for st in 0..4 {
            for en in 0..4 {
                assert_eq!(s.dp(st, en, P), MAX_E);
            }
        }
    }
}
