//! PairTable: the canonical pair-assignment representation.
//!
//! One `Option<NAIDX>` per base, symmetric by construction through
//! `set_pair`. Parsing from a dot-bracket string guarantees the
//! non-crossing invariant; tables built pair-by-pair keep it as long
//! as the caller inserts nested pairs (debug-checked on conversion).

use std::fmt;

use crate::DotBracket;
use crate::DotBracketVec;
use crate::NAIDX;
use crate::StructureError;

/// A pair assignment: base index -> partner index or unpaired.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairTable(Vec<Option<NAIDX>>);

impl PairTable {
    /// Create an all-unpaired table for a given sequence length.
    pub fn new(length: usize) -> Self {
        PairTable(vec![None; length])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Partner of base `i`, or None if unpaired.
    pub fn pair(&self, i: usize) -> Option<NAIDX> {
        self.0[i]
    }

    /// Record the pair (i, j), both directions.
    pub fn set_pair(&mut self, i: NAIDX, j: NAIDX) {
        debug_assert!(i < j);
        debug_assert!(self.0[i as usize].is_none() && self.0[j as usize].is_none());
        self.0[i as usize] = Some(j);
        self.0[j as usize] = Some(i);
    }

    /// Number of pairs (not bases) in the table.
    pub fn num_pairs(&self) -> usize {
        self.0.iter().flatten().count() / 2
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Option<NAIDX>> {
        self.0.iter()
    }
}

impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PairTable::try_from(&DotBracketVec::try_from(s)?)
    }
}

impl TryFrom<&DotBracketVec> for PairTable {
    type Error = StructureError;

    fn try_from(dbv: &DotBracketVec) -> Result<Self, Self::Error> {
        let mut pt = PairTable::new(dbv.0.len());
        let mut stack = Vec::new();
        for (pos, db) in dbv.0.iter().enumerate() {
            match db {
                DotBracket::Unpaired => {}
                DotBracket::Open => stack.push(pos),
                DotBracket::Close => {
                    let open = stack.pop().ok_or(StructureError::UnbalancedClose(pos))?;
                    pt.set_pair(open as NAIDX, pos as NAIDX);
                }
            }
        }
        if let Some(&open) = stack.last() {
            return Err(StructureError::UnbalancedOpen(open));
        }
        Ok(pt)
    }
}

impl From<&PairTable> for DotBracketVec {
    fn from(pt: &PairTable) -> Self {
        let mut v = vec![DotBracket::Unpaired; pt.len()];
        for (i, &j_opt) in pt.iter().enumerate() {
            if let Some(j) = j_opt {
                if (i as NAIDX) < j {
                    v[i] = DotBracket::Open;
                    v[j as usize] = DotBracket::Close;
                }
            }
        }
        DotBracketVec(v)
    }
}

impl fmt::Display for PairTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", DotBracketVec::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_table_parse() {
        let pt = PairTable::try_from("((..))").unwrap();
        assert_eq!(pt.len(), 6);
        assert_eq!(pt.pair(0), Some(5));
        assert_eq!(pt.pair(1), Some(4));
        assert_eq!(pt.pair(2), None);
        assert_eq!(pt.num_pairs(), 2);
    }

    #[test]
    fn test_pair_table_unbalanced() {
        assert_eq!(
            PairTable::try_from("(()").unwrap_err(),
            StructureError::UnbalancedOpen(0)
        );
        assert_eq!(
            PairTable::try_from("())").unwrap_err(),
            StructureError::UnbalancedClose(2)
        );
    }

    #[test]
    fn test_pair_table_display_roundtrip() {
        let s = ".((...))";
        let pt = PairTable::try_from(s).unwrap();
        assert_eq!(format!("{pt}"), s);
    }
}
