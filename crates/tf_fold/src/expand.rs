//! Candidate enumeration for one obligation index.
//!
//! An `Expansion` is one way the table value at an index can be
//! produced: its total candidate energy, up to two child obligations,
//! and up to two CTD annotations. The enumeration order here is fixed
//! and doubles as the tie-break for traceback, which takes the first
//! expansion matching the stored cell value.
//!
//! Candidate energies are relative to the expanded cell, not to a whole
//! structure; callers add their own base energy. Anything at or above
//! `CAP_E` is culled at generation.

use tf_energy::{CAP_E, Energy, G, HAIRPIN_MIN_SZ, TWOLOOP_MAX_SZ, U, is_gu, is_wc};
use tf_structure::Ctd;

use crate::index::DpState::{self, P, U2, UGu, URcoax, UWc};
use crate::index::ExtState::{self, Ext, ExtGu, ExtRcoax, ExtWc};
use crate::index::Index;
use crate::tables::FoldState;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Expansion {
    pub energy: Energy,
    pub idx0: Option<Index>,
    pub idx1: Option<Index>,
    pub ctd0: Option<(i32, Ctd)>,
    pub ctd1: Option<(i32, Ctd)>,
}

fn push(exps: &mut Vec<Expansion>, exp: Expansion) {
    if exp.energy < CAP_E {
        exps.push(exp);
    }
}

pub(crate) fn expansions(s: &FoldState, to_expand: Index) -> Vec<Expansion> {
    let mut exps = Vec::new();
    match to_expand {
        Index::Ext { st, a } => ext_expansions(s, st, a, &mut exps),
        Index::Dp { st, en, a: P } => pair_expansions(s, st, en, &mut exps),
        Index::Dp { st, en, a } => unpaired_expansions(s, st, en, a, &mut exps),
    }
    exps
}

fn ext_expansions(s: &FoldState, st: i32, a: ExtState, exps: &mut Vec<Expansion>) {
    let n = s.n();
    if a == Ext {
        if st == n {
            // Base case: empty suffix.
            push(exps, Expansion::default());
            return;
        }
        // No pair starting here.
        push(
            exps,
            Expansion {
                energy: s.ext(st + 1, Ext),
                idx0: Some(Index::ext(st + 1, Ext)),
                ..Default::default()
            },
        );
    }
    let stb = s.base(st);
    for en in (st + HAIRPIN_MIN_SZ + 1)..n {
        let st1b = s.base(st + 1);
        let (enb, en1b) = (s.base(en), s.base(en - 1));
        let base00 = s.dp(st, en, P) + s.em.au_gu_penalty(stb, enb);
        let base01 = s.dp(st, en - 1, P) + s.em.au_gu_penalty(stb, en1b);
        let base10 = s.dp(st + 1, en, P) + s.em.au_gu_penalty(st1b, enb);
        let base11 = s.dp(st + 1, en - 1, P) + s.em.au_gu_penalty(st1b, en1b);

        // (   ).<( * ). > Right coax backward; CTDs were set by the
        // forward case.
        if st > 0 && a == ExtRcoax {
            push(
                exps,
                Expansion {
                    energy: base01
                        + s.em.mismatch_coaxial(en1b, enb, s.base(st - 1), stb)
                        + s.ext(en + 1, Ext),
                    idx0: Some(Index::ext(en + 1, Ext)),
                    idx1: Some(Index::dp(st, en - 1, P)),
                    ..Default::default()
                },
            );
        }

        // (   )<   >
        let energy = base00 + s.ext(en + 1, Ext);
        if a == Ext {
            push(
                exps,
                Expansion {
                    energy,
                    idx0: Some(Index::ext(en + 1, Ext)),
                    idx1: Some(Index::dp(st, en, P)),
                    ctd0: Some((st, Ctd::Unused)),
                    ..Default::default()
                },
            );
        }
        // For ExtWc and ExtGu the CTD was already set by a coaxial
        // stack to the left.
        if (a == ExtWc && is_wc(stb, enb)) || (a == ExtGu && is_gu(stb, enb)) {
            push(
                exps,
                Expansion {
                    energy,
                    idx0: Some(Index::ext(en + 1, Ext)),
                    idx1: Some(Index::dp(st, en, P)),
                    ..Default::default()
                },
            );
        }
        if a != Ext {
            continue;
        }

        // (   )3<   > 3'
        push(
            exps,
            Expansion {
                energy: base01
                    + s.em.dangle3[en1b as usize][enb as usize][stb as usize]
                    + s.ext(en + 1, Ext),
                idx0: Some(Index::ext(en + 1, Ext)),
                idx1: Some(Index::dp(st, en - 1, P)),
                ctd0: Some((st, Ctd::ThreeDangle)),
                ..Default::default()
            },
        );
        // 5(   )<   > 5'
        push(
            exps,
            Expansion {
                energy: base10
                    + s.em.dangle5[enb as usize][stb as usize][st1b as usize]
                    + s.ext(en + 1, Ext),
                idx0: Some(Index::ext(en + 1, Ext)),
                idx1: Some(Index::dp(st + 1, en, P)),
                ctd0: Some((st + 1, Ctd::FiveDangle)),
                ..Default::default()
            },
        );
        // .(   ).<   > Terminal mismatch
        push(
            exps,
            Expansion {
                energy: base11
                    + s.em.terminal[en1b as usize][enb as usize][stb as usize][st1b as usize]
                    + s.ext(en + 1, Ext),
                idx0: Some(Index::ext(en + 1, Ext)),
                idx1: Some(Index::dp(st + 1, en - 1, P)),
                ctd0: Some((st + 1, Ctd::Mismatch)),
                ..Default::default()
            },
        );

        if en < n - 1 {
            // .(   ).<(   ) > Left coax
            let energy = base11 + s.em.mismatch_coaxial(en1b, enb, stb, st1b);
            push(
                exps,
                Expansion {
                    energy: energy + s.ext(en + 1, ExtGu),
                    idx0: Some(Index::ext(en + 1, ExtGu)),
                    idx1: Some(Index::dp(st + 1, en - 1, P)),
                    ctd0: Some((en + 1, Ctd::LcoaxWithPrev)),
                    ctd1: Some((st + 1, Ctd::LcoaxWithNext)),
                },
            );
            push(
                exps,
                Expansion {
                    energy: energy + s.ext(en + 1, ExtWc),
                    idx0: Some(Index::ext(en + 1, ExtWc)),
                    idx1: Some(Index::dp(st + 1, en - 1, P)),
                    ctd0: Some((en + 1, Ctd::LcoaxWithPrev)),
                    ctd1: Some((st + 1, Ctd::LcoaxWithNext)),
                },
            );
            // (   ).<(   ). > Right coax forward
            push(
                exps,
                Expansion {
                    energy: base01 + s.ext(en + 1, ExtRcoax),
                    idx0: Some(Index::ext(en + 1, ExtRcoax)),
                    idx1: Some(Index::dp(st, en - 1, P)),
                    ctd0: Some((en + 1, Ctd::RcoaxWithPrev)),
                    ctd1: Some((st, Ctd::RcoaxWithNext)),
                },
            );
            // (   )<(   ) > Flush coax
            let enrb = s.base(en + 1);
            push(
                exps,
                Expansion {
                    energy: base00
                        + s.em.stack[enb as usize][enrb as usize][(enrb ^ 3) as usize]
                            [stb as usize]
                        + s.ext(en + 1, ExtWc),
                    idx0: Some(Index::ext(en + 1, ExtWc)),
                    idx1: Some(Index::dp(st, en, P)),
                    ctd0: Some((en + 1, Ctd::FcoaxWithPrev)),
                    ctd1: Some((st, Ctd::FcoaxWithNext)),
                },
            );
            if enrb == G || enrb == U {
                push(
                    exps,
                    Expansion {
                        energy: base00
                            + s.em.stack[enb as usize][enrb as usize][(enrb ^ 1) as usize]
                                [stb as usize]
                            + s.ext(en + 1, ExtGu),
                        idx0: Some(Index::ext(en + 1, ExtGu)),
                        idx1: Some(Index::dp(st, en, P)),
                        ctd0: Some((en + 1, Ctd::FcoaxWithPrev)),
                        ctd1: Some((st, Ctd::FcoaxWithNext)),
                    },
                );
            }
        }
    }
}

fn pair_expansions(s: &FoldState, st: i32, en: i32, exps: &mut Vec<Expansion>) {
    let (stb, st1b, st2b) = (s.base(st), s.base(st + 1), s.base(st + 2));
    let (enb, en1b, en2b) = (s.base(en), s.base(en - 1), s.base(en - 2));

    // Two loops.
    let max_inter = TWOLOOP_MAX_SZ.min(en - st - HAIRPIN_MIN_SZ - 3);
    for ist in (st + 1)..(st + max_inter + 2) {
        for ien in (en - max_inter + ist - st - 2)..en {
            push(
                exps,
                Expansion {
                    energy: s.em.two_loop(s.r, st as usize, en as usize, ist as usize, ien as usize)
                        + s.dp(ist, ien, P),
                    idx0: Some(Index::dp(ist, ien, P)),
                    ..Default::default()
                },
            );
        }
    }

    // Hairpin loop.
    push(
        exps,
        Expansion {
            energy: s.em.hairpin(s.r, st as usize, en as usize),
            ..Default::default()
        },
    );

    // Multiloop cases. The closing pair's tag lives at |en|, since the
    // pair is oriented (en, st) seen from inside the loop.
    let branch = s.em.au_gu_penalty(stb, enb) + s.em.multiloop_a + s.em.multiloop_b;
    // (<   ><    >)
    push(
        exps,
        Expansion {
            energy: branch + s.dp(st + 1, en - 1, U2),
            idx0: Some(Index::dp(st + 1, en - 1, U2)),
            ctd0: Some((en, Ctd::Unused)),
            ..Default::default()
        },
    );
    // (3<   ><   >) 3'
    push(
        exps,
        Expansion {
            energy: branch
                + s.dp(st + 2, en - 1, U2)
                + s.em.dangle3[stb as usize][st1b as usize][enb as usize],
            idx0: Some(Index::dp(st + 2, en - 1, U2)),
            ctd0: Some((en, Ctd::ThreeDangle)),
            ..Default::default()
        },
    );
    // (<   ><   >5) 5'
    push(
        exps,
        Expansion {
            energy: branch
                + s.dp(st + 1, en - 2, U2)
                + s.em.dangle5[stb as usize][en1b as usize][enb as usize],
            idx0: Some(Index::dp(st + 1, en - 2, U2)),
            ctd0: Some((en, Ctd::FiveDangle)),
            ..Default::default()
        },
    );
    // (.<   ><   >.) Terminal mismatch
    push(
        exps,
        Expansion {
            energy: branch
                + s.dp(st + 2, en - 2, U2)
                + s.em.terminal[stb as usize][st1b as usize][en1b as usize][enb as usize],
            idx0: Some(Index::dp(st + 2, en - 2, U2)),
            ctd0: Some((en, Ctd::Mismatch)),
            ..Default::default()
        },
    );

    for piv in (st + HAIRPIN_MIN_SZ + 2)..(en - HAIRPIN_MIN_SZ - 2) {
        let (pl1b, plb) = (s.base(piv - 1), s.base(piv));
        let (prb, pr1b) = (s.base(piv + 1), s.base(piv + 2));

        // (.(   )   .) Left outer coax
        let outer_coax = s.em.mismatch_coaxial(stb, st1b, en1b, enb);
        push(
            exps,
            Expansion {
                energy: branch
                    + s.dp(st + 2, piv, P)
                    + s.em.multiloop_b
                    + s.em.au_gu_penalty(st2b, plb)
                    + s.dp(piv + 1, en - 2, DpState::U)
                    + outer_coax,
                idx0: Some(Index::dp(st + 2, piv, P)),
                idx1: Some(Index::dp(piv + 1, en - 2, DpState::U)),
                ctd0: Some((st + 2, Ctd::LcoaxWithPrev)),
                ctd1: Some((en, Ctd::LcoaxWithNext)),
            },
        );
        // (.   (   ).) Right outer coax
        push(
            exps,
            Expansion {
                energy: branch
                    + s.dp(st + 2, piv, DpState::U)
                    + s.em.multiloop_b
                    + s.em.au_gu_penalty(prb, en2b)
                    + s.dp(piv + 1, en - 2, P)
                    + outer_coax,
                idx0: Some(Index::dp(st + 2, piv, DpState::U)),
                idx1: Some(Index::dp(piv + 1, en - 2, P)),
                ctd0: Some((piv + 1, Ctd::RcoaxWithNext)),
                ctd1: Some((en, Ctd::RcoaxWithPrev)),
            },
        );
        // (.(   ).   ) Left inner coax
        push(
            exps,
            Expansion {
                energy: branch
                    + s.dp(st + 2, piv - 1, P)
                    + s.em.multiloop_b
                    + s.em.au_gu_penalty(st2b, pl1b)
                    + s.dp(piv + 1, en - 1, DpState::U)
                    + s.em.mismatch_coaxial(pl1b, plb, st1b, st2b),
                idx0: Some(Index::dp(st + 2, piv - 1, P)),
                idx1: Some(Index::dp(piv + 1, en - 1, DpState::U)),
                ctd0: Some((st + 2, Ctd::RcoaxWithPrev)),
                ctd1: Some((en, Ctd::RcoaxWithNext)),
            },
        );
        // (   .(   ).) Right inner coax
        push(
            exps,
            Expansion {
                energy: branch
                    + s.dp(st + 1, piv, DpState::U)
                    + s.em.multiloop_b
                    + s.em.au_gu_penalty(pr1b, en2b)
                    + s.dp(piv + 2, en - 2, P)
                    + s.em.mismatch_coaxial(en2b, en1b, prb, pr1b),
                idx0: Some(Index::dp(st + 1, piv, DpState::U)),
                idx1: Some(Index::dp(piv + 2, en - 2, P)),
                ctd0: Some((piv + 2, Ctd::LcoaxWithNext)),
                ctd1: Some((en, Ctd::LcoaxWithPrev)),
            },
        );
        // ((   )   ) Left flush coax
        push(
            exps,
            Expansion {
                energy: branch
                    + s.dp(st + 1, piv, P)
                    + s.em.multiloop_b
                    + s.em.au_gu_penalty(st1b, plb)
                    + s.dp(piv + 1, en - 1, DpState::U)
                    + s.em.stack[stb as usize][st1b as usize][plb as usize][enb as usize],
                idx0: Some(Index::dp(st + 1, piv, P)),
                idx1: Some(Index::dp(piv + 1, en - 1, DpState::U)),
                ctd0: Some((st + 1, Ctd::FcoaxWithPrev)),
                ctd1: Some((en, Ctd::FcoaxWithNext)),
            },
        );
        // (   (   )) Right flush coax
        push(
            exps,
            Expansion {
                energy: branch
                    + s.dp(st + 1, piv, DpState::U)
                    + s.em.multiloop_b
                    + s.em.au_gu_penalty(prb, en1b)
                    + s.dp(piv + 1, en - 1, P)
                    + s.em.stack[stb as usize][prb as usize][en1b as usize][enb as usize],
                idx0: Some(Index::dp(st + 1, piv, DpState::U)),
                idx1: Some(Index::dp(piv + 1, en - 1, P)),
                ctd0: Some((piv + 1, Ctd::FcoaxWithNext)),
                ctd1: Some((en, Ctd::FcoaxWithPrev)),
            },
        );
    }
}

fn unpaired_expansions(s: &FoldState, st: i32, en: i32, a: DpState, exps: &mut Vec<Expansion>) {
    let (stb, st1b) = (s.base(st), s.base(st + 1));

    // Leave |st| unpaired.
    if st + 1 < en && (a == DpState::U || a == U2) {
        push(
            exps,
            Expansion {
                energy: s.dp(st + 1, en, a),
                idx0: Some(Index::dp(st + 1, en, a)),
                ..Default::default()
            },
        );
    }

    // Pair here.
    for piv in (st + HAIRPIN_MIN_SZ + 1)..=en {
        let (pb, pl1b) = (s.base(piv), s.base(piv - 1));
        let base00 = s.dp(st, piv, P) + s.em.au_gu_penalty(stb, pb) + s.em.multiloop_b;
        let base01 = s.dp(st, piv - 1, P) + s.em.au_gu_penalty(stb, pl1b) + s.em.multiloop_b;
        let base10 = s.dp(st + 1, piv, P) + s.em.au_gu_penalty(st1b, pb) + s.em.multiloop_b;
        let base11 = s.dp(st + 1, piv - 1, P) + s.em.au_gu_penalty(st1b, pl1b) + s.em.multiloop_b;

        // (   ).<( ** ). > Right coax backward; CTDs were set by the
        // forward case.
        if a == URcoax {
            if st > 0 {
                let energy = base01 + s.em.mismatch_coaxial(pl1b, pb, s.base(st - 1), stb);
                push(
                    exps,
                    Expansion {
                        energy,
                        idx0: Some(Index::dp(st, piv - 1, P)),
                        ..Default::default()
                    },
                );
                push(
                    exps,
                    Expansion {
                        energy: energy + s.dp(piv + 1, en, DpState::U),
                        idx0: Some(Index::dp(st, piv - 1, P)),
                        idx1: Some(Index::dp(piv + 1, en, DpState::U)),
                        ..Default::default()
                    },
                );
            }
            continue;
        }

        // (   )<   >
        let energy = base00;
        if a == DpState::U {
            push(
                exps,
                Expansion {
                    energy,
                    idx0: Some(Index::dp(st, piv, P)),
                    ctd0: Some((st, Ctd::Unused)),
                    ..Default::default()
                },
            );
            push(
                exps,
                Expansion {
                    energy: energy + s.dp(piv + 1, en, DpState::U),
                    idx0: Some(Index::dp(st, piv, P)),
                    idx1: Some(Index::dp(piv + 1, en, DpState::U)),
                    ctd0: Some((st, Ctd::Unused)),
                    ..Default::default()
                },
            );
        }
        if a == U2 {
            push(
                exps,
                Expansion {
                    energy: energy + s.dp(piv + 1, en, DpState::U),
                    idx0: Some(Index::dp(st, piv, P)),
                    idx1: Some(Index::dp(piv + 1, en, DpState::U)),
                    ctd0: Some((st, Ctd::Unused)),
                    ..Default::default()
                },
            );
        }
        if a == UWc || a == UGu {
            // Only branches of the right pair class can land here.
            if (a == UWc && is_wc(stb, pb)) || (a == UGu && is_gu(stb, pb)) {
                push(
                    exps,
                    Expansion {
                        energy,
                        idx0: Some(Index::dp(st, piv, P)),
                        ..Default::default()
                    },
                );
                push(
                    exps,
                    Expansion {
                        energy: energy + s.dp(piv + 1, en, DpState::U),
                        idx0: Some(Index::dp(st, piv, P)),
                        idx1: Some(Index::dp(piv + 1, en, DpState::U)),
                        ..Default::default()
                    },
                );
            }
            continue;
        }
        debug_assert!(a == DpState::U || a == U2);

        // (   )3<   > 3'; the rest may only stay unpaired for U.
        let energy = base01 + s.em.dangle3[pl1b as usize][pb as usize][stb as usize];
        if a == DpState::U {
            push(
                exps,
                Expansion {
                    energy,
                    idx0: Some(Index::dp(st, piv - 1, P)),
                    ctd0: Some((st, Ctd::ThreeDangle)),
                    ..Default::default()
                },
            );
        }
        push(
            exps,
            Expansion {
                energy: energy + s.dp(piv + 1, en, DpState::U),
                idx0: Some(Index::dp(st, piv - 1, P)),
                idx1: Some(Index::dp(piv + 1, en, DpState::U)),
                ctd0: Some((st, Ctd::ThreeDangle)),
                ..Default::default()
            },
        );

        // 5(   )<   > 5'
        let energy = base10 + s.em.dangle5[pb as usize][stb as usize][st1b as usize];
        if a == DpState::U {
            push(
                exps,
                Expansion {
                    energy,
                    idx0: Some(Index::dp(st + 1, piv, P)),
                    ctd0: Some((st + 1, Ctd::FiveDangle)),
                    ..Default::default()
                },
            );
        }
        push(
            exps,
            Expansion {
                energy: energy + s.dp(piv + 1, en, DpState::U),
                idx0: Some(Index::dp(st + 1, piv, P)),
                idx1: Some(Index::dp(piv + 1, en, DpState::U)),
                ctd0: Some((st + 1, Ctd::FiveDangle)),
                ..Default::default()
            },
        );

        // .(   ).<   > Terminal mismatch
        let energy =
            base11 + s.em.terminal[pl1b as usize][pb as usize][stb as usize][st1b as usize];
        if a == DpState::U {
            push(
                exps,
                Expansion {
                    energy,
                    idx0: Some(Index::dp(st + 1, piv - 1, P)),
                    ctd0: Some((st + 1, Ctd::Mismatch)),
                    ..Default::default()
                },
            );
        }
        push(
            exps,
            Expansion {
                energy: energy + s.dp(piv + 1, en, DpState::U),
                idx0: Some(Index::dp(st + 1, piv - 1, P)),
                idx1: Some(Index::dp(piv + 1, en, DpState::U)),
                ctd0: Some((st + 1, Ctd::Mismatch)),
                ..Default::default()
            },
        );

        // .(   ).<(   ) > Left coax
        let energy = base11 + s.em.mismatch_coaxial(pl1b, pb, stb, st1b);
        push(
            exps,
            Expansion {
                energy: energy + s.dp(piv + 1, en, UWc),
                idx0: Some(Index::dp(st + 1, piv - 1, P)),
                idx1: Some(Index::dp(piv + 1, en, UWc)),
                ctd0: Some((st + 1, Ctd::LcoaxWithNext)),
                ctd1: Some((piv + 1, Ctd::LcoaxWithPrev)),
            },
        );
        push(
            exps,
            Expansion {
                energy: energy + s.dp(piv + 1, en, UGu),
                idx0: Some(Index::dp(st + 1, piv - 1, P)),
                idx1: Some(Index::dp(piv + 1, en, UGu)),
                ctd0: Some((st + 1, Ctd::LcoaxWithNext)),
                ctd1: Some((piv + 1, Ctd::LcoaxWithPrev)),
            },
        );

        // (   ).<(   ). > Right coax forward
        push(
            exps,
            Expansion {
                energy: base01 + s.dp(piv + 1, en, URcoax),
                idx0: Some(Index::dp(st, piv - 1, P)),
                idx1: Some(Index::dp(piv + 1, en, URcoax)),
                ctd0: Some((st, Ctd::RcoaxWithNext)),
                ctd1: Some((piv + 1, Ctd::RcoaxWithPrev)),
            },
        );

        // Flush coax needs a base after the branch.
        if piv < en {
            let pr1b = s.base(piv + 1);
            // (   )<(   ) > Flush coax
            push(
                exps,
                Expansion {
                    energy: base00
                        + s.em.stack[pb as usize][pr1b as usize][(pr1b ^ 3) as usize][stb as usize]
                        + s.dp(piv + 1, en, UWc),
                    idx0: Some(Index::dp(st, piv, P)),
                    idx1: Some(Index::dp(piv + 1, en, UWc)),
                    ctd0: Some((st, Ctd::FcoaxWithNext)),
                    ctd1: Some((piv + 1, Ctd::FcoaxWithPrev)),
                },
            );
            if pr1b == G || pr1b == U {
                push(
                    exps,
                    Expansion {
                        energy: base00
                            + s.em.stack[pb as usize][pr1b as usize][(pr1b ^ 1) as usize]
                                [stb as usize]
                            + s.dp(piv + 1, en, UGu),
                        idx0: Some(Index::dp(st, piv, P)),
                        idx1: Some(Index::dp(piv + 1, en, UGu)),
                        ctd0: Some((st, Ctd::FcoaxWithNext)),
                        ctd1: Some((piv + 1, Ctd::FcoaxWithPrev)),
                    },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dp::compute_tables_zero;
    use crate::exterior::compute_exterior;
    use tf_energy::{EnergyModel, Primary};

    // Every filled cell must be derivable from its own expansion list,
    // otherwise traceback has nothing to follow.
    #[test]
    fn test_every_cell_has_a_matching_expansion() {
        let em = EnergyModel::random(5);
        let r = Primary::try_from("GCGAAACGCAGCAAAGCU").unwrap();
        let mut s = FoldState::new(&r, &em);
        compute_tables_zero(&mut s);
        compute_exterior(&mut s);
        let n = s.n();

        for st in 0..n {
            for a in [Ext, ExtWc, ExtGu, ExtRcoax] {
                let val = s.ext(st, a);
                if val < CAP_E {
                    let idx = Index::ext(st, a);
                    assert!(
                        expansions(&s, idx).iter().any(|e| e.energy == val),
                        "no expansion for {idx:?}"
                    );
                }
            }
            for en in st..n {
                for a in [P, DpState::U, U2, UWc, UGu, URcoax] {
                    let val = s.dp(st, en, a);
                    if val < CAP_E {
                        let idx = Index::dp(st, en, a);
                        assert!(
                            expansions(&s, idx).iter().any(|e| e.energy == val),
                            "no expansion for {idx:?}"
                        );
                    }
                }
            }
        }
    }
}
