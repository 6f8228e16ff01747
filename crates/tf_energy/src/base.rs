//! The RNA base alphabet and primary sequences.
//!
//! Bases are small integers so they can index energy tables directly.
//! The encoding makes the usual bit tricks hold: `b ^ 3` is the
//! Watson-Crick partner and `b ^ 1` flips G<->U.

use std::fmt;
use std::ops::Index;

pub type Base = u8;

pub const A: Base = 0;
pub const C: Base = 1;
pub const G: Base = 2;
pub const U: Base = 3;

pub fn base_from_char(c: char) -> Option<Base> {
    match c {
        'A' => Some(A),
        'C' => Some(C),
        'G' => Some(G),
        'U' => Some(U),
        _ => None,
    }
}

pub fn base_to_char(b: Base) -> char {
    debug_assert!(b < 4);
    ['A', 'C', 'G', 'U'][b as usize]
}

/// AU, GC or GU.
pub fn can_pair(a: Base, b: Base) -> bool {
    let s = a + b;
    s == 3 || s == 5
}

/// AU or GC.
pub fn is_wc(a: Base, b: Base) -> bool {
    a + b == 3
}

/// GU (wobble).
pub fn is_gu(a: Base, b: Base) -> bool {
    a + b == 5
}

/// AU or GU, the pairs that attract the helix-end penalty.
pub fn is_augu(a: Base, b: Base) -> bool {
    (a + b == 3 && (a == A || b == A)) || a + b == 5
}

/// Error type for primary sequence parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// A character outside the ACGU alphabet.
    UnknownBase(usize, char),
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceError::UnknownBase(pos, ch) => {
                write!(f, "unknown base '{ch}' at position {pos}")
            }
        }
    }
}

impl std::error::Error for SequenceError {}

/// An immutable RNA sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Primary(Vec<Base>);

impl Primary {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Base] {
        &self.0
    }

    /// The subsequence [st, en] as an ACGU string (inclusive on both ends).
    pub fn subseq_string(&self, st: usize, en: usize) -> String {
        self.0[st..=en].iter().map(|&b| base_to_char(b)).collect()
    }
}

impl From<Vec<Base>> for Primary {
    fn from(v: Vec<Base>) -> Self {
        debug_assert!(v.iter().all(|&b| b < 4));
        Primary(v)
    }
}

impl TryFrom<&str> for Primary {
    type Error = SequenceError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut v = Vec::with_capacity(s.len());
        for (pos, c) in s.chars().enumerate() {
            let b = base_from_char(c).ok_or(SequenceError::UnknownBase(pos, c))?;
            v.push(b);
        }
        Ok(Primary(v))
    }
}

impl Index<usize> for Primary {
    type Output = Base;

    fn index(&self, i: usize) -> &Base {
        &self.0[i]
    }
}

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", base_to_char(b))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_pairing() {
        assert!(can_pair(A, U));
        assert!(can_pair(G, C));
        assert!(can_pair(G, U));
        assert!(!can_pair(A, G));
        assert!(!can_pair(C, U));

        assert!(is_wc(A, U) && is_wc(C, G));
        assert!(!is_wc(G, U));
        assert!(is_gu(U, G));

        assert!(is_augu(A, U) && is_augu(G, U));
        assert!(!is_augu(G, C));
    }

    #[test]
    fn test_base_xor_tricks() {
        assert_eq!(A ^ 3, U);
        assert_eq!(C ^ 3, G);
        assert_eq!(G ^ 1, U);
        assert_eq!(U ^ 1, G);
    }

    #[test]
    fn test_primary_parse() {
        let r = Primary::try_from("GGGAAACCC").unwrap();
        assert_eq!(r.len(), 9);
        assert_eq!(r[0], G);
        assert_eq!(r[4], A);
        assert_eq!(format!("{r}"), "GGGAAACCC");

        let err = Primary::try_from("GGTAC").unwrap_err();
        assert_eq!(err, SequenceError::UnknownBase(2, 'T'));
    }
}
