//! Independent re-scoring of a (sequence, structure) pair.
//!
//! `compute_energy` walks the loop tree of a pair table and sums the
//! model energy of every loop. With a supplied CTD annotation it scores
//! exactly that annotation; without one it picks the optimal CTD
//! configuration per loop.
//!
//! Branches are `(st, en)` tuples. The closing pair of a multiloop takes
//! part in the loop's branch cycle as the flipped tuple `(en, st)`, which
//! makes every CTD energy a uniform function of the tuple: the 5' side of
//! a branch within its loop is always `b.0 - 1` and the 3' side `b.1 + 1`.
//! A branch's CTD tag lives at index `b.0` of the annotation.

use itertools::Itertools;
use tf_structure::{Ctd, PairTable};

use crate::{Energy, EnergyModel, MAX_E, Primary};

type Branch = (usize, usize);

/// Scores `(r, pt)` under `em` and returns the total energy together with
/// the per-index CTD annotation actually scored. With `ctds` given, that
/// annotation is scored verbatim; otherwise the optimal one is chosen.
pub fn compute_energy(
    r: &Primary,
    pt: &PairTable,
    ctds: Option<&[Ctd]>,
    em: &EnergyModel,
) -> (Energy, Vec<Ctd>) {
    debug_assert_eq!(r.len(), pt.len());
    let mut efn = Efn { r, pt, em, given: ctds, ctd: vec![Ctd::Na; r.len()] };
    let energy = efn.exterior();
    (energy, efn.ctd)
}

struct Efn<'a> {
    r: &'a Primary,
    pt: &'a PairTable,
    em: &'a EnergyModel,
    given: Option<&'a [Ctd]>,
    ctd: Vec<Ctd>,
}

/// One step of the linear CTD scan: a single-branch config, or a coaxial
/// stack consuming this branch and the next. The flag says whether the
/// step consumed the base shared with the branch after the step.
#[derive(Clone, Copy)]
enum Step {
    One(Ctd, bool),
    Two(Ctd, Ctd, bool),
}

impl Efn<'_> {
    fn exterior(&mut self) -> Energy {
        let branches = self.branches_in(None);
        let mut energy = 0;
        for &(st, en) in &branches {
            energy += self.em.au_gu_penalty(self.r[st], self.r[en]);
            energy += self.pair(st, en);
        }
        if branches.is_empty() {
            return energy;
        }

        let n = self.r.len();
        let mut gaps = Vec::with_capacity(branches.len() + 1);
        gaps.push(branches[0].0);
        for (a, b) in branches.iter().tuple_windows() {
            gaps.push(b.0 - a.1 - 1);
        }
        gaps.push(n - 1 - branches[branches.len() - 1].1);

        if let Some(given) = self.given {
            energy += self.score_tags(&branches, false, given);
        } else {
            let (e, tags) = self.linear_ctd(&branches, &gaps, false, false);
            energy += e;
            for (b, t) in branches.iter().zip(tags) {
                self.ctd[b.0] = t;
            }
        }
        energy
    }

    /// Energy of the loop closed by `(st, en)` and everything below it.
    fn pair(&mut self, st: usize, en: usize) -> Energy {
        debug_assert_eq!(self.pt.pair(st), Some(en as tf_structure::NAIDX));
        let branches = self.branches_in(Some((st, en)));
        match branches[..] {
            [] => self.em.hairpin(self.r, st, en),
            [(ist, ien)] => self.em.two_loop(self.r, st, en, ist, ien) + self.pair(ist, ien),
            _ => {
                let mut energy = self.em.multiloop_initiation(branches.len() as i32 + 1);
                energy += self.em.au_gu_penalty(self.r[st], self.r[en]);
                for &(bst, ben) in &branches {
                    energy += self.em.au_gu_penalty(self.r[bst], self.r[ben]);
                }
                let mut cycle = Vec::with_capacity(branches.len() + 1);
                cycle.push((en, st));
                cycle.extend_from_slice(&branches);
                energy += self.multiloop_ctds(&cycle);
                for &(bst, ben) in &branches {
                    energy += self.pair(bst, ben);
                }
                energy
            }
        }
    }

    /// Direct child branches of the loop closed by `enclosing`, or the
    /// top-level branches of the exterior loop.
    fn branches_in(&self, enclosing: Option<Branch>) -> Vec<Branch> {
        let (lo, hi) = match enclosing {
            Some((st, en)) => (st + 1, en),
            None => (0, self.r.len()),
        };
        let mut branches = Vec::new();
        let mut i = lo;
        while i < hi {
            if let Some(j) = self.pt.pair(i) {
                let j = j as usize;
                debug_assert!(j > i);
                branches.push((i, j));
                i = j;
            }
            i += 1;
        }
        branches
    }

    // Uniform CTD energies over (possibly flipped) branch tuples.

    fn d3(&self, b: Branch) -> Energy {
        self.em.dangle3[self.r[b.1] as usize][self.r[b.1 + 1] as usize][self.r[b.0] as usize]
    }

    fn d5(&self, b: Branch) -> Energy {
        self.em.dangle5[self.r[b.1] as usize][self.r[b.0 - 1] as usize][self.r[b.0] as usize]
    }

    fn terminal_mismatch(&self, b: Branch) -> Energy {
        self.em.terminal[self.r[b.1] as usize][self.r[b.1 + 1] as usize]
            [self.r[b.0 - 1] as usize][self.r[b.0] as usize]
    }

    /// Coax where the mismatch flanks branch `b`.
    fn coax_mismatch(&self, b: Branch) -> Energy {
        self.em
            .mismatch_coaxial(self.r[b.1], self.r[b.1 + 1], self.r[b.0 - 1], self.r[b.0])
    }

    /// Flush coax of `cur` onto `next`. When `next` is a flipped closing
    /// pair the stack reads in the other direction.
    fn flush_coax(&self, cur: Branch, next: Branch) -> Energy {
        if next.0 > next.1 {
            self.em.stack[self.r[next.1] as usize][self.r[cur.0] as usize]
                [self.r[cur.1] as usize][self.r[next.0] as usize]
        } else {
            self.em.stack[self.r[cur.1] as usize][self.r[next.0] as usize]
                [self.r[next.1] as usize][self.r[cur.0] as usize]
        }
    }

    /// CTD energy of a multiloop's branch cycle. `cycle[0]` is the flipped
    /// closing pair.
    fn multiloop_ctds(&mut self, cycle: &[Branch]) -> Energy {
        if let Some(given) = self.given {
            return self.score_tags(cycle, true, given);
        }

        let head = cycle[0];
        let rest = &cycle[1..];
        let k = rest.len();
        // gaps[i] is the number of unpaired bases 5' of rest[i]; gaps[k]
        // sits between the last branch and the closing pair.
        let mut gaps = Vec::with_capacity(k + 1);
        gaps.push(rest[0].0 - head.1 - 1);
        for (a, b) in rest.iter().tuple_windows() {
            gaps.push(b.0 - a.1 - 1);
        }
        gaps.push(head.0 - rest[k - 1].1 - 1);
        let (gap0, gapk) = (gaps[0], gaps[k]);

        let mut best = MAX_E;
        let mut best_tags: Vec<Ctd> = Vec::new();
        let mut best_head = Ctd::Unused;
        let mut best_partner: Option<(usize, Ctd)> = None;

        // The cycle is broken by fixing how the closing pair participates,
        // then scanning the remaining branches linearly.
        let mut consider = |head_cost: Energy,
                            head_tag: Ctd,
                            partner: Option<(usize, Ctd)>,
                            run: (Energy, Vec<Ctd>)| {
            let total = head_cost + run.0;
            if total < best {
                best = total;
                best_tags = run.1;
                best_head = head_tag;
                best_partner = partner;
            }
        };

        // Closing pair in a non-coax config; all branches stay in the scan.
        {
            let run = self.linear_ctd(rest, &gaps, false, false);
            consider(0, Ctd::Unused, None, run);
            if gap0 >= 1 {
                let run = self.linear_ctd(rest, &gaps, gap0 == 1, false);
                consider(self.d3(head), Ctd::ThreeDangle, None, run);
            }
            if gapk >= 1 {
                let run = self.linear_ctd(rest, &gaps, false, gapk == 1);
                consider(self.d5(head), Ctd::FiveDangle, None, run);
            }
            if gap0 >= 1 && gapk >= 1 {
                let run = self.linear_ctd(rest, &gaps, gap0 == 1, gapk == 1);
                consider(self.terminal_mismatch(head), Ctd::Mismatch, None, run);
            }
        }

        // Closing pair coaxes with the first branch.
        {
            let (bs, gs) = (&rest[1..], &gaps[1..]);
            if gap0 == 0 {
                let run = self.linear_ctd(bs, gs, false, false);
                consider(
                    self.flush_coax(head, rest[0]),
                    Ctd::FcoaxWithNext,
                    Some((0, Ctd::FcoaxWithPrev)),
                    run,
                );
            }
            if gap0 >= 1 && gapk >= 1 {
                let run = self.linear_ctd(bs, gs, false, gapk == 1);
                consider(
                    self.coax_mismatch(head),
                    Ctd::LcoaxWithNext,
                    Some((0, Ctd::LcoaxWithPrev)),
                    run,
                );
            }
            if gap0 >= 1 && gaps[1] >= 1 {
                let run = self.linear_ctd(bs, gs, gaps[1] == 1, false);
                consider(
                    self.coax_mismatch(rest[0]),
                    Ctd::RcoaxWithNext,
                    Some((0, Ctd::RcoaxWithPrev)),
                    run,
                );
            }
        }

        // Closing pair coaxes with the last branch.
        {
            let (bs, gs) = (&rest[..k - 1], &gaps[..k]);
            if gapk == 0 {
                let run = self.linear_ctd(bs, gs, false, false);
                consider(
                    self.flush_coax(rest[k - 1], head),
                    Ctd::FcoaxWithPrev,
                    Some((k - 1, Ctd::FcoaxWithNext)),
                    run,
                );
            }
            if gaps[k - 1] >= 1 && gapk >= 1 {
                let run = self.linear_ctd(bs, gs, false, gaps[k - 1] == 1);
                consider(
                    self.coax_mismatch(rest[k - 1]),
                    Ctd::LcoaxWithPrev,
                    Some((k - 1, Ctd::LcoaxWithNext)),
                    run,
                );
            }
            if gapk >= 1 && gap0 >= 1 {
                let run = self.linear_ctd(bs, gs, gap0 == 1, false);
                consider(
                    self.coax_mismatch(head),
                    Ctd::RcoaxWithPrev,
                    Some((k - 1, Ctd::RcoaxWithNext)),
                    run,
                );
            }
        }

        debug_assert!(best < MAX_E);
        self.ctd[head.0] = best_head;
        if let Some((i, tag)) = best_partner {
            self.ctd[rest[i].0] = tag;
            let skip = i;
            for (off, t) in best_tags.iter().enumerate() {
                // The scanned run excludes the coax partner.
                let idx = if skip == 0 { off + 1 } else { off };
                self.ctd[rest[idx].0] = *t;
            }
        } else {
            for (b, t) in rest.iter().zip(best_tags) {
                self.ctd[b.0] = t;
            }
        }
        best
    }

    /// Minimum CTD energy over a linear run of interior branches.
    ///
    /// `gaps` has one more entry than `bs`: the unpaired-base counts
    /// before each branch and after the last. `init_used` marks the base
    /// 5' of `bs[0]` as already consumed; `last_forbidden` marks the base
    /// 3' of the last branch as consumed by whatever follows the run.
    fn linear_ctd(
        &self,
        bs: &[Branch],
        gaps: &[usize],
        init_used: bool,
        last_forbidden: bool,
    ) -> (Energy, Vec<Ctd>) {
        let m = bs.len();
        debug_assert_eq!(gaps.len(), m + 1);
        if m == 0 {
            return (0, Vec::new());
        }

        // dp[i][u]: best for bs[i..], u = the base 5' of bs[i] is consumed.
        let mut dp = vec![[MAX_E; 2]; m + 1];
        let mut choice = vec![[Step::One(Ctd::Unused, false); 2]; m];
        dp[m] = [0, 0];
        for i in (0..m).rev() {
            let b = bs[i];
            for u in 0..2 {
                let lspace = gaps[i] >= 1 && u == 0;
                let rspace = gaps[i + 1] >= 1;
                let right_ok = rspace && !(i + 1 == m && last_forbidden);
                // Consuming the 3' base hands a used flag to the next
                // branch when exactly one base separates them.
                let shares_right = gaps[i + 1] == 1 && i + 1 < m;

                let mut relax = |cost: Energy, step: Step, dp: &mut Vec<[Energy; 2]>| {
                    let (jump, next_used) = match step {
                        Step::One(_, nu) => (1, nu),
                        Step::Two(_, _, nu) => (2, nu),
                    };
                    let total = cost + dp[i + jump][next_used as usize];
                    if total < dp[i][u] {
                        dp[i][u] = total;
                        choice[i][u] = step;
                    }
                };

                relax(0, Step::One(Ctd::Unused, false), &mut dp);
                if right_ok {
                    relax(self.d3(b), Step::One(Ctd::ThreeDangle, shares_right), &mut dp);
                }
                if lspace {
                    relax(self.d5(b), Step::One(Ctd::FiveDangle, false), &mut dp);
                }
                if lspace && right_ok {
                    relax(
                        self.terminal_mismatch(b),
                        Step::One(Ctd::Mismatch, shares_right),
                        &mut dp,
                    );
                }
                if i + 1 < m {
                    let nb = bs[i + 1];
                    let n_right_ok = gaps[i + 2] >= 1 && !(i + 2 == m && last_forbidden);
                    let n_shares_right = gaps[i + 2] == 1 && i + 2 < m;
                    if gaps[i + 1] == 0 {
                        relax(
                            self.flush_coax(b, nb),
                            Step::Two(Ctd::FcoaxWithNext, Ctd::FcoaxWithPrev, false),
                            &mut dp,
                        );
                    }
                    if lspace && rspace {
                        relax(
                            self.coax_mismatch(b),
                            Step::Two(Ctd::LcoaxWithNext, Ctd::LcoaxWithPrev, false),
                            &mut dp,
                        );
                    }
                    if rspace && n_right_ok {
                        relax(
                            self.coax_mismatch(nb),
                            Step::Two(Ctd::RcoaxWithNext, Ctd::RcoaxWithPrev, n_shares_right),
                            &mut dp,
                        );
                    }
                }
            }
        }

        let start = usize::from(init_used);
        let mut tags = Vec::with_capacity(m);
        let mut i = 0;
        let mut u = start;
        while i < m {
            match choice[i][u] {
                Step::One(t, nu) => {
                    tags.push(t);
                    u = nu as usize;
                    i += 1;
                }
                Step::Two(t, pt, nu) => {
                    tags.push(t);
                    tags.push(pt);
                    u = nu as usize;
                    i += 2;
                }
            }
        }
        (dp[0][start], tags)
    }

    /// Scores a caller-supplied annotation over one loop's branch list
    /// and copies the tags into the output.
    fn score_tags(&mut self, list: &[Branch], cyclic: bool, given: &[Ctd]) -> Energy {
        let m = list.len();
        let mut energy = 0;
        for i in 0..m {
            let b = list[i];
            let tag = given[b.0];
            self.ctd[b.0] = tag;
            let next = || {
                debug_assert!(cyclic || i + 1 < m);
                list[(i + 1) % m]
            };
            energy += match tag {
                Ctd::Na | Ctd::Unused => 0,
                Ctd::ThreeDangle => self.d3(b),
                Ctd::FiveDangle => self.d5(b),
                Ctd::Mismatch => self.terminal_mismatch(b),
                Ctd::LcoaxWithNext => {
                    debug_assert_eq!(given[next().0], Ctd::LcoaxWithPrev);
                    self.coax_mismatch(b)
                }
                Ctd::RcoaxWithNext => {
                    debug_assert_eq!(given[next().0], Ctd::RcoaxWithPrev);
                    self.coax_mismatch(next())
                }
                Ctd::FcoaxWithNext => {
                    debug_assert_eq!(given[next().0], Ctd::FcoaxWithPrev);
                    self.flush_coax(b, next())
                }
                Ctd::LcoaxWithPrev | Ctd::RcoaxWithPrev | Ctd::FcoaxWithPrev => 0,
            };
        }
        energy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{C, G};

    fn parse(seq: &str, db: &str) -> (Primary, PairTable) {
        (Primary::try_from(seq).unwrap(), PairTable::try_from(db).unwrap())
    }

    #[test]
    fn test_empty_and_unpaired() {
        let em = EnergyModel::random(1);
        let (r, pt) = parse("AAAA", "....");
        let (e, ctds) = compute_energy(&r, &pt, None, &em);
        assert_eq!(e, 0);
        assert!(ctds.iter().all(|&c| c == Ctd::Na));
    }

    #[test]
    fn test_stacked_hairpin() {
        let mut em = EnergyModel::default();
        em.stack[G as usize][G as usize][C as usize][C as usize] = -21;
        em.hairpin_init[3] = 40;
        let (r, pt) = parse("GGGAAACCC", "(((...)))");
        let (e, _) = compute_energy(&r, &pt, None, &em);
        assert_eq!(e, -21 * 2 + 40);
    }

    #[test]
    fn test_exterior_dangle_choice() {
        let mut em = EnergyModel::default();
        em.hairpin_init[3] = 10;
        em.dangle3[C as usize][0][G as usize] = -7;
        let (r, pt) = parse("GAAACA", "(...).");
        let (e, ctds) = compute_energy(&r, &pt, None, &em);
        assert_eq!(e, 3);
        assert_eq!(ctds[0], Ctd::ThreeDangle);

        // Verbatim scoring of a worse annotation.
        let mut given = vec![Ctd::Na; 6];
        given[0] = Ctd::Unused;
        let (e, ctds) = compute_energy(&r, &pt, Some(&given), &em);
        assert_eq!(e, 10);
        assert_eq!(ctds[0], Ctd::Unused);
    }

    #[test]
    fn test_exterior_flush_coax() {
        let mut em = EnergyModel::default();
        em.hairpin_init[3] = 10;
        em.stack[C as usize][G as usize][C as usize][G as usize] = -13;
        let (r, pt) = parse("GAAACGAAAC", "(...)(...)");
        let (e, ctds) = compute_energy(&r, &pt, None, &em);
        assert_eq!(e, 20 - 13);
        assert_eq!(ctds[0], Ctd::FcoaxWithNext);
        assert_eq!(ctds[5], Ctd::FcoaxWithPrev);
    }

    #[test]
    fn test_multiloop_interior_coax() {
        let mut em = EnergyModel::default();
        em.hairpin_init[3] = 10;
        em.multiloop_a = 51;
        em.multiloop_b = 5;
        em.stack[C as usize][G as usize][C as usize][G as usize] = -13;
        let (r, pt) = parse("GGAAACGAAACC", "((...)(...))");
        let (e, ctds) = compute_energy(&r, &pt, None, &em);
        // Closing pair, two branches, the interior flush coax.
        assert_eq!(e, (51 + 3 * 5) + 2 * 10 - 13);
        assert_eq!(ctds[1], Ctd::FcoaxWithNext);
        assert_eq!(ctds[6], Ctd::FcoaxWithPrev);
        assert_eq!(ctds[11], Ctd::Unused);
    }

    #[test]
    fn test_optimal_not_worse_than_given() {
        let em = EnergyModel::random(7);
        let (r, pt) = parse("GGAAACGAAACCA", "((...)(...)).");
        let (opt, ctds) = compute_energy(&r, &pt, None, &em);
        let (rescore, _) = compute_energy(&r, &pt, Some(&ctds), &em);
        assert_eq!(opt, rescore);
        let unused = vec![Ctd::Unused; r.len()];
        let (plain, _) = compute_energy(&r, &pt, Some(&unused), &em);
        assert!(opt <= plain);
    }
}
