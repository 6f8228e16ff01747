//! Dot-bracket symbols and strings.
//!
//! The textual exchange format for non-crossing structures: `.` for an
//! unpaired base, `(` and `)` for the two sides of a pair.

use std::fmt;

use crate::StructureError;

/// One symbol of a dot-bracket string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotBracket {
    Unpaired,
    Open,
    Close,
}

impl TryFrom<char> for DotBracket {
    type Error = char;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '.' => Ok(DotBracket::Unpaired),
            '(' => Ok(DotBracket::Open),
            ')' => Ok(DotBracket::Close),
            _ => Err(c),
        }
    }
}

impl fmt::Display for DotBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            DotBracket::Unpaired => '.',
            DotBracket::Open => '(',
            DotBracket::Close => ')',
        };
        write!(f, "{c}")
    }
}

/// A dot-bracket string as a vector of symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DotBracketVec(pub Vec<DotBracket>);

impl TryFrom<&str> for DotBracketVec {
    type Error = StructureError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut v = Vec::with_capacity(s.len());
        for (pos, c) in s.chars().enumerate() {
            let db = DotBracket::try_from(c)
                .map_err(|c| StructureError::UnknownSymbol(pos, c))?;
            v.push(db);
        }
        Ok(DotBracketVec(v))
    }
}

impl fmt::Display for DotBracketVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for db in &self.0 {
            write!(f, "{db}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dotbracket_roundtrip() {
        let s = "((..))..";
        let dbv = DotBracketVec::try_from(s).unwrap();
        assert_eq!(format!("{dbv}"), s);
    }

    #[test]
    fn test_dotbracket_unknown_symbol() {
        let err = DotBracketVec::try_from("((x))").unwrap_err();
        assert_eq!(err, StructureError::UnknownSymbol(2, 'x'));
    }
}
