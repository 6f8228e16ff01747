//! Per-fold table storage.
//!
//! Tables are sized one past the sequence length and default to the
//! `MAX_E` sentinel, so reads just outside an interval (for example the
//! empty suffix `[en + 1, en]`) come back impossible without special
//! casing. Cells are filled bottom-up and read-only afterwards.

use ndarray::{Array2, Array3};
use tf_energy::{Energy, EnergyModel, HAIRPIN_MIN_SZ, MAX_E, Primary, can_pair};

use crate::index::{DP_SIZE, DpState, EXT_SIZE, ExtState, Index};
use crate::precomp::Precomp;

/// All state owned by one fold: sequence, model, precomputed data, the
/// interval table and the exterior table. Never shared across folds.
pub(crate) struct FoldState<'a> {
    pub r: &'a Primary,
    pub em: &'a EnergyModel,
    pub pc: Precomp,
    pub dp: Array3<Energy>,
    pub ext: Array2<Energy>,
}

impl<'a> FoldState<'a> {
    pub fn new(r: &'a Primary, em: &'a EnergyModel) -> Self {
        let n = r.len() + 1;
        let mut ext = Array2::from_elem((n, EXT_SIZE), MAX_E);
        ext[[r.len(), ExtState::Ext as usize]] = 0;
        FoldState {
            r,
            em,
            pc: Precomp::new(em),
            dp: Array3::from_elem((n, n, DP_SIZE), MAX_E),
            ext,
        }
    }

    pub fn n(&self) -> i32 {
        self.r.len() as i32
    }

    pub fn base(&self, i: i32) -> u8 {
        self.r[i as usize]
    }

    pub fn dp(&self, st: i32, en: i32, a: DpState) -> Energy {
        self.dp[[st as usize, en as usize, a as usize]]
    }

    pub fn set_dp(&mut self, st: i32, en: i32, a: DpState, value: Energy) {
        self.dp[[st as usize, en as usize, a as usize]] = value;
    }

    pub fn ext(&self, st: i32, a: ExtState) -> Energy {
        self.ext[[st as usize, a as usize]]
    }

    pub fn set_ext(&mut self, st: i32, a: ExtState, value: Energy) {
        self.ext[[st as usize, a as usize]] = value;
    }

    /// Table value at an arbitrary obligation index.
    pub fn at(&self, idx: Index) -> Energy {
        match idx {
            Index::Dp { st, en, a } => self.dp(st, en, a),
            Index::Ext { st, a } => self.ext(st, a),
        }
    }

    /// True when `(st, en)` can pair and would not be an isolated pair:
    /// it can be extended by a pair directly inside or directly outside.
    pub fn viable_pair(&self, st: i32, en: i32) -> bool {
        can_pair(self.base(st), self.base(en))
            && ((en - st - 3 >= HAIRPIN_MIN_SZ && can_pair(self.base(st + 1), self.base(en - 1)))
                || (st > 0
                    && en < self.n() - 1
                    && can_pair(self.base(st - 1), self.base(en + 1))))
    }
}
