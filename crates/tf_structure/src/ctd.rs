//! Per-base CTD annotation (coaxial stacking, terminal mismatches, dangles).
//!
//! Every branch end of a multiloop or the exterior loop uses at most one
//! of these configurations; the tag records which. A branch (i, j) used as
//! an interior branch of a loop carries its tag at index i; the closing
//! pair of a multiloop carries its outer-loop tag at index j. The same
//! physical pair can hold both tags at once, one per endpoint.

/// The dangle/mismatch/coaxial configuration of one branch end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Ctd {
    /// Not a branch end, or not yet decided.
    #[default]
    Na,
    /// A branch end that takes part in no interaction.
    Unused,
    /// 3' dangle on the unpaired base following the branch.
    ThreeDangle,
    /// 5' dangle on the unpaired base preceding the branch.
    FiveDangle,
    /// Terminal mismatch on both flanking unpaired bases.
    Mismatch,
    /// Mismatch-mediated coaxial stack with the next branch; this branch
    /// carries the mismatch and the energy.
    LcoaxWithNext,
    /// Counterpart tag on the next branch of `LcoaxWithNext`.
    LcoaxWithPrev,
    /// Mismatch-mediated coaxial stack with the next branch; the next
    /// branch carries the mismatch, this tag carries the energy.
    RcoaxWithNext,
    /// Counterpart tag on the next branch of `RcoaxWithNext`.
    RcoaxWithPrev,
    /// Flush coaxial stack with the next branch; carries the energy.
    FcoaxWithNext,
    /// Counterpart tag on the next branch of `FcoaxWithNext`.
    FcoaxWithPrev,
}

impl Ctd {
    /// True for the `*WithPrev` tags, whose energy is attributed to the
    /// paired `*WithNext` tag.
    pub fn is_with_prev(self) -> bool {
        matches!(
            self,
            Ctd::LcoaxWithPrev | Ctd::RcoaxWithPrev | Ctd::FcoaxWithPrev
        )
    }

    /// True for the `*WithNext` tags.
    pub fn is_with_next(self) -> bool {
        matches!(
            self,
            Ctd::LcoaxWithNext | Ctd::RcoaxWithNext | Ctd::FcoaxWithNext
        )
    }

    /// The matching tag on the other branch of a coaxial stack.
    pub fn partner(self) -> Option<Ctd> {
        match self {
            Ctd::LcoaxWithNext => Some(Ctd::LcoaxWithPrev),
            Ctd::LcoaxWithPrev => Some(Ctd::LcoaxWithNext),
            Ctd::RcoaxWithNext => Some(Ctd::RcoaxWithPrev),
            Ctd::RcoaxWithPrev => Some(Ctd::RcoaxWithNext),
            Ctd::FcoaxWithNext => Some(Ctd::FcoaxWithPrev),
            Ctd::FcoaxWithPrev => Some(Ctd::FcoaxWithNext),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctd_partner_symmetry() {
        let coax = [
            Ctd::LcoaxWithNext,
            Ctd::LcoaxWithPrev,
            Ctd::RcoaxWithNext,
            Ctd::RcoaxWithPrev,
            Ctd::FcoaxWithNext,
            Ctd::FcoaxWithPrev,
        ];
        for c in coax {
            assert_eq!(c.partner().unwrap().partner(), Some(c));
        }
        assert_eq!(Ctd::Mismatch.partner(), None);
        assert_eq!(Ctd::default(), Ctd::Na);
    }
}
