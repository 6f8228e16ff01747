//! Exterior-loop DP, run after the interval tables are filled.
//!
//! `ext[st][Ext]` is the best energy of `[st, n)` given everything
//! before `st` is already accounted for. The `ExtWc`, `ExtGu` and
//! `ExtRcoax` states carry the extra requirement that a branch starts
//! exactly at `st` (of the named pair class, or with `st - 1` free for
//! the backward coax mismatch), so a coaxial stack formed to the left
//! can land on it.

use tf_energy::{G, HAIRPIN_MIN_SZ, MAX_E, U, is_gu};

use crate::dp::min_update;
use crate::index::DpState::P;
use crate::index::ExtState::{Ext, ExtGu, ExtRcoax, ExtWc};
use crate::tables::FoldState;

pub(crate) fn compute_exterior(s: &mut FoldState) {
    let n = s.n();
    for st in (0..n).rev() {
        let mut e_min = MAX_E;
        let mut wc_min = MAX_E;
        let mut gu_min = MAX_E;
        let mut rcoax_min = MAX_E;

        // Base case: |st| is not paired.
        min_update(&mut e_min, s.ext(st + 1, Ext));

        let stb = s.base(st);
        for en in (st + HAIRPIN_MIN_SZ + 1)..n {
            let st1b = s.base(st + 1);
            let (enb, en1b) = (s.base(en), s.base(en - 1));
            let base00 = s.dp(st, en, P) + s.em.au_gu_penalty(stb, enb);
            let base01 = s.dp(st, en - 1, P) + s.em.au_gu_penalty(stb, en1b);
            let base10 = s.dp(st + 1, en, P) + s.em.au_gu_penalty(st1b, enb);
            let base11 = s.dp(st + 1, en - 1, P) + s.em.au_gu_penalty(st1b, en1b);

            // (   )<   >
            let val = base00 + s.ext(en + 1, Ext);
            min_update(&mut e_min, val);
            if is_gu(stb, enb) {
                min_update(&mut gu_min, val);
            } else {
                min_update(&mut wc_min, val);
            }

            // (   )3<   > 3'
            min_update(
                &mut e_min,
                base01
                    + s.em.dangle3[en1b as usize][enb as usize][stb as usize]
                    + s.ext(en + 1, Ext),
            );
            // 5(   )<   > 5'
            min_update(
                &mut e_min,
                base10
                    + s.em.dangle5[enb as usize][stb as usize][st1b as usize]
                    + s.ext(en + 1, Ext),
            );
            // .(   ).<   > Terminal mismatch
            min_update(
                &mut e_min,
                base11
                    + s.em.terminal[en1b as usize][enb as usize][stb as usize][st1b as usize]
                    + s.ext(en + 1, Ext),
            );
            // .(   ).<(   ) > Left coax
            let val = base11 + s.em.mismatch_coaxial(en1b, enb, stb, st1b);
            min_update(&mut e_min, val + s.ext(en + 1, ExtGu));
            min_update(&mut e_min, val + s.ext(en + 1, ExtWc));
            // (   ).<(   ). > Right coax forward
            min_update(&mut e_min, base01 + s.ext(en + 1, ExtRcoax));
            // (   ).<( * ). > Right coax backward, delivered to the left
            if st > 0 {
                min_update(
                    &mut rcoax_min,
                    base01
                        + s.em.mismatch_coaxial(en1b, enb, s.base(st - 1), stb)
                        + s.ext(en + 1, Ext),
                );
            }
            // (   )<(   ) > Flush coax
            if en < n - 1 {
                let enrb = s.base(en + 1);
                min_update(
                    &mut e_min,
                    base00
                        + s.em.stack[enb as usize][enrb as usize][(enrb ^ 3) as usize]
                            [stb as usize]
                        + s.ext(en + 1, ExtWc),
                );
                if enrb == G || enrb == U {
                    min_update(
                        &mut e_min,
                        base00
                            + s.em.stack[enb as usize][enrb as usize][(enrb ^ 1) as usize]
                                [stb as usize]
                            + s.ext(en + 1, ExtGu),
                    );
                }
            }
        }

        s.set_ext(st, Ext, e_min);
        s.set_ext(st, ExtWc, wc_min);
        s.set_ext(st, ExtGu, gu_min);
        s.set_ext(st, ExtRcoax, rcoax_min);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_energy::{EnergyModel, Primary};

    #[test]
    fn test_unfoldable_sequence_is_zero() {
        let em = EnergyModel::random(3);
        let r = Primary::try_from("AAAAAAAA").unwrap();
        let mut s = FoldState::new(&r, &em);
        crate::dp::compute_tables_zero(&mut s);
        compute_exterior(&mut s);
        assert_eq!(s.ext(0, Ext), 0);
    }
}
