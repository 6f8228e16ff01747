use std::fmt;

/// Error type for secondary structure parsing and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// A closing bracket without a matching open bracket.
    UnbalancedClose(usize),

    /// An open bracket that was never closed.
    UnbalancedOpen(usize),

    /// A character that is not one of `.`, `(`, `)`.
    UnknownSymbol(usize, char),
}

impl fmt::Display for StructureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructureError::UnbalancedClose(pos) => {
                write!(f, "unmatched ')' at position {pos}")
            }
            StructureError::UnbalancedOpen(pos) => {
                write!(f, "unmatched '(' at position {pos}")
            }
            StructureError::UnknownSymbol(pos, ch) => {
                write!(f, "unknown structure symbol '{ch}' at position {pos}")
            }
        }
    }
}

impl std::error::Error for StructureError {}
