//! Half-open address intervals.

use std::fmt;

use crate::addr::{Addr, Align};
use crate::error::LandError;

/// A half-open address interval `[base, limit)`.
///
/// Construction guarantees `base <= limit`. A range with
/// `base == limit` is empty; Land mutations reject empty ranges but
/// queries and iteration may still see them as values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    base: Addr,
    limit: Addr,
}

impl Range {
    /// Create a range from its bounds.
    ///
    /// Returns `Err(LandError::InvalidRange)` if `base > limit`.
    pub fn new(base: Addr, limit: Addr) -> Result<Self, LandError> {
        if base > limit {
            return Err(LandError::InvalidRange { base, limit });
        }
        Ok(Self { base, limit })
    }

    /// Create a range of `size` bytes starting at `base`.
    ///
    /// Returns `Err(LandError::InvalidRange)` if `base + size` overflows.
    pub fn from_base_size(base: Addr, size: usize) -> Result<Self, LandError> {
        let limit = base.checked_add(size).ok_or(LandError::InvalidRange {
            base,
            limit: Addr(usize::MAX),
        })?;
        Ok(Self { base, limit })
    }

    /// Lowest address in the range.
    pub fn base(&self) -> Addr {
        self.base
    }

    /// One past the highest address in the range.
    pub fn limit(&self) -> Addr {
        self.limit
    }

    /// Length in bytes.
    pub fn size(&self) -> usize {
        self.limit.0 - self.base.0
    }

    /// Whether the range covers no addresses.
    pub fn is_empty(&self) -> bool {
        self.base == self.limit
    }

    /// Whether both bounds are multiples of `align`.
    pub fn is_aligned(&self, align: Align) -> bool {
        align.is_aligned(self.base) && align.is_aligned(self.limit)
    }

    /// Whether `addr` lies inside the range.
    pub fn contains(&self, addr: Addr) -> bool {
        self.base <= addr && addr < self.limit
    }

    /// Whether every address of `other` lies inside `self`.
    pub fn contains_range(&self, other: &Range) -> bool {
        self.base <= other.base && other.limit <= self.limit
    }

    /// Whether the two ranges share at least one address.
    ///
    /// An empty range overlaps nothing.
    pub fn overlaps(&self, other: &Range) -> bool {
        self.base.max(other.base) < self.limit.min(other.limit)
    }

    /// Whether the two ranges touch end-to-start without overlapping.
    pub fn abuts(&self, other: &Range) -> bool {
        self.limit == other.base || other.limit == self.base
    }

    /// Smallest range covering both inputs.
    pub fn hull(&self, other: &Range) -> Range {
        Range {
            base: self.base.min(other.base),
            limit: self.limit.max(other.limit),
        }
    }

    /// Addresses common to both ranges, or `None` if they are disjoint.
    pub fn intersection(&self, other: &Range) -> Option<Range> {
        let base = self.base.max(other.base);
        let limit = self.limit.min(other.limit);
        (base < limit).then_some(Range { base, limit })
    }

    /// The first `size` bytes of the range.
    ///
    /// # Panics
    ///
    /// Panics if `size > self.size()`.
    pub fn low_slice(&self, size: usize) -> Range {
        assert!(size <= self.size(), "low_slice({size}) of {self}");
        Range {
            base: self.base,
            limit: Addr(self.base.0 + size),
        }
    }

    /// The last `size` bytes of the range.
    ///
    /// # Panics
    ///
    /// Panics if `size > self.size()`.
    pub fn high_slice(&self, size: usize) -> Range {
        assert!(size <= self.size(), "high_slice({size}) of {self}");
        Range {
            base: Addr(self.limit.0 - size),
            limit: self.limit,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.base, self.limit)
    }
}
