//! Strongly-typed addresses and power-of-two alignments.

use std::fmt;

use crate::error::LandError;

/// A location in the managed address space.
///
/// Addresses are plain machine words; a Land never dereferences them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Addr(pub usize);

impl Addr {
    /// The lowest address.
    pub const ZERO: Addr = Addr(0);

    /// Add a byte offset, returning `None` on overflow.
    pub fn checked_add(self, size: usize) -> Option<Addr> {
        self.0.checked_add(size).map(Addr)
    }

    /// Subtract a byte offset, returning `None` on underflow.
    pub fn checked_sub(self, size: usize) -> Option<Addr> {
        self.0.checked_sub(size).map(Addr)
    }

    /// Byte distance from `base` up to `self`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `base > self`.
    pub fn offset_from(self, base: Addr) -> usize {
        debug_assert!(base <= self, "offset_from: {base} > {self}");
        self.0 - base.0
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<usize> for Addr {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

/// A power-of-two granularity to which range bounds must conform.
///
/// The only way to obtain an `Align` is through [`Align::new`], so any
/// value of this type is known to be a non-zero power of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Align(usize);

impl Align {
    /// Byte alignment: every address is aligned.
    pub const BYTE: Align = Align(1);

    /// Machine-word alignment.
    pub const WORD: Align = Align(std::mem::size_of::<usize>());

    /// Validate `value` as an alignment.
    ///
    /// Returns `Err(LandError::InvalidAlignment)` if `value` is zero or
    /// not a power of two.
    pub fn new(value: usize) -> Result<Self, LandError> {
        if value.is_power_of_two() {
            Ok(Self(value))
        } else {
            Err(LandError::InvalidAlignment { value })
        }
    }

    /// The alignment in bytes.
    pub fn get(self) -> usize {
        self.0
    }

    /// Whether `addr` is a multiple of this alignment.
    pub fn is_aligned(self, addr: Addr) -> bool {
        addr.0 & (self.0 - 1) == 0
    }

    /// Whether `size` is a multiple of this alignment.
    pub fn is_size_aligned(self, size: usize) -> bool {
        size & (self.0 - 1) == 0
    }

    /// Round `addr` down to this alignment.
    pub fn align_down(self, addr: Addr) -> Addr {
        Addr(addr.0 & !(self.0 - 1))
    }

    /// Round `addr` up to this alignment, returning `None` on overflow.
    pub fn align_up(self, addr: Addr) -> Option<Addr> {
        addr.0
            .checked_add(self.0 - 1)
            .map(|v| Addr(v & !(self.0 - 1)))
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
