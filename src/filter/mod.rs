//! Boolean composition of conditions into groups and sets.
//!
//! Groups fold their conditions and subgroups with AND/OR and may negate
//! the result; sets fold their top-level groups with a top operator. The
//! matched result of a set is turned into a vote by its action, see
//! [`SetVerdict`].

pub mod group;
pub mod set;

pub use set::SetVerdict;
