//! State tags and indices for the folding tables.

/// Interval table states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpState {
    /// `(st, en)` are paired.
    P,
    /// At least one branch in `[st, en]`, the rest unpaired.
    U,
    /// Like `U` but at least two branches.
    U2,
    /// Like `U` but must start with a Watson-Crick branch not involved
    /// in any CTD interaction.
    UWc,
    /// Like `UWc` but the branch is GU.
    UGu,
    /// Must start with a branch that is the right side of a right
    /// coaxial stack; its coax energy is included.
    URcoax,
}

pub const DP_SIZE: usize = 6;

/// Exterior loop states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtState {
    Ext,
    /// Must start with a Watson-Crick branch free of CTD interactions.
    ExtWc,
    /// Like `ExtWc` but GU.
    ExtGu,
    /// Must start with the right side of a right coaxial stack.
    ExtRcoax,
}

pub const EXT_SIZE: usize = 4;

/// One table cell obligation: an interval state or an exterior suffix
/// state. Used as the work-list element of the traceback and as the
/// expansion-cache key of the suboptimal enumerators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Index {
    Dp { st: i32, en: i32, a: DpState },
    Ext { st: i32, a: ExtState },
}

impl Index {
    pub fn dp(st: i32, en: i32, a: DpState) -> Index {
        Index::Dp { st, en, a }
    }

    pub fn ext(st: i32, a: ExtState) -> Index {
        Index::Ext { st, a }
    }
}
