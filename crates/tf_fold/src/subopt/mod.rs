//! Duplicate-free suboptimal structure enumeration.
//!
//! Two interchangeable enumerators over the same expansion tree; they
//! must produce identical structure sets for identical bounds.

pub(crate) mod bounded;
mod cached;
mod priority;

pub(crate) use cached::suboptimal_cached;
pub(crate) use priority::suboptimal_priority;
