//! Error types for Land operations.
//!
//! Three families share one enum: capability gaps
//! ([`LandError::Unimplemented`]), resource exhaustion
//! ([`LandError::AllocationFailed`]), and contract violations (everything
//! else). "No range large enough" is not an error; finds report it as
//! `Ok(None)`.

use std::error::Error;
use std::fmt;

use crate::addr::{Addr, Align};
use crate::range::Range;

/// Errors that can occur during Land construction or operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LandError {
    /// The Land's class does not support this operation.
    Unimplemented {
        /// Name of the class that was asked.
        class: &'static str,
        /// Name of the unsupported operation.
        operation: &'static str,
    },
    /// The arena's control pool could not satisfy a reservation.
    AllocationFailed {
        /// Number of bytes requested.
        requested: usize,
        /// Bytes still available in the pool.
        available: usize,
    },
    /// An alignment that is zero or not a power of two.
    InvalidAlignment {
        /// The rejected value.
        value: usize,
    },
    /// Range bounds with `base > limit`.
    InvalidRange {
        /// Requested base.
        base: Addr,
        /// Requested limit.
        limit: Addr,
    },
    /// A range whose bounds are not multiples of the Land's alignment.
    Misaligned {
        /// The offending range.
        range: Range,
        /// The Land's alignment.
        align: Align,
    },
    /// A find size that is not a multiple of the Land's alignment.
    MisalignedSize {
        /// The offending size.
        size: usize,
        /// The Land's alignment.
        align: Align,
    },
    /// A mutation was given an empty range.
    EmptyRange {
        /// The offending range.
        range: Range,
    },
    /// An inserted range overlaps a range already in the set.
    Overlap {
        /// The range being inserted.
        range: Range,
        /// The present range it collides with.
        existing: Range,
    },
    /// A deleted range is not wholly inside a single present range.
    NotCovered {
        /// The range being deleted.
        range: Range,
    },
    /// A malformed argument (bad constructor argument, zero size, ...).
    InvalidArgument {
        /// What was wrong.
        reason: String,
    },
    /// A class descriptor failed its well-formedness check.
    InvalidClass {
        /// What was wrong.
        reason: String,
    },
    /// A backing store failed its structural self-check.
    Corrupt {
        /// Description of the broken invariant.
        reason: String,
    },
}

impl LandError {
    /// Whether this error reports caller misuse or internal corruption
    /// rather than a capability gap or resource exhaustion.
    ///
    /// Contract violations are programming errors; callers should treat
    /// them as fatal rather than retry.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(
            self,
            Self::Unimplemented { .. } | Self::AllocationFailed { .. }
        )
    }
}

impl fmt::Display for LandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unimplemented { class, operation } => {
                write!(f, "class '{class}' does not implement {operation}")
            }
            Self::AllocationFailed {
                requested,
                available,
            } => {
                write!(
                    f,
                    "control allocation failed: requested {requested} bytes, {available} bytes available"
                )
            }
            Self::InvalidAlignment { value } => {
                write!(f, "alignment {value} is not a power of two")
            }
            Self::InvalidRange { base, limit } => {
                write!(f, "invalid range: base {base} exceeds limit {limit}")
            }
            Self::Misaligned { range, align } => {
                write!(f, "range {range} is not aligned to {align}")
            }
            Self::MisalignedSize { size, align } => {
                write!(f, "size {size} is not aligned to {align}")
            }
            Self::EmptyRange { range } => write!(f, "empty range {range}"),
            Self::Overlap { range, existing } => {
                write!(f, "range {range} overlaps existing range {existing}")
            }
            Self::NotCovered { range } => {
                write!(f, "range {range} is not covered by a single range in the set")
            }
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::InvalidClass { reason } => write!(f, "invalid land class: {reason}"),
            Self::Corrupt { reason } => write!(f, "land corrupt: {reason}"),
        }
    }
}

impl Error for LandError {}
