//! Coarse address zones and the [`ZoneSet`] bitset.
//!
//! The address space is striped into 64 zones: address `a` belongs to
//! zone `(a >> zone_shift) % 64`. The stripe width `1 << zone_shift` is
//! owned by the arena; this module only does the arithmetic.

use std::fmt;

use crate::addr::Addr;
use crate::range::Range;

/// A set of address zones, one bit per zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ZoneSet(pub u64);

impl ZoneSet {
    /// Number of distinct zones.
    pub const ZONES: u32 = u64::BITS;

    /// The empty set.
    pub const EMPTY: ZoneSet = ZoneSet(0);

    /// The set of all zones.
    pub const UNIV: ZoneSet = ZoneSet(u64::MAX);

    /// Zone index of an address for the given stripe shift.
    pub fn zone_of(addr: Addr, zone_shift: u32) -> u32 {
        (addr.0.checked_shr(zone_shift).unwrap_or(0) % Self::ZONES as usize) as u32
    }

    /// Set containing exactly one zone.
    pub fn single(zone: u32) -> Self {
        Self(1u64 << (zone % Self::ZONES))
    }

    /// Set with `zone` added.
    pub fn add(self, zone: u32) -> Self {
        Self(self.0 | Self::single(zone).0)
    }

    /// Whether `zone` is in the set.
    pub fn contains(&self, zone: u32) -> bool {
        self.0 & Self::single(zone).0 != 0
    }

    /// Whether the zone of `addr` is in the set.
    pub fn contains_addr(&self, addr: Addr, zone_shift: u32) -> bool {
        self.contains(Self::zone_of(addr, zone_shift))
    }

    /// Return the union of two sets (`self | other`).
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Return the intersection of two sets (`self & other`).
    pub fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Whether the sets share a zone.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether the set contains no zones.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether the set contains every zone.
    pub fn is_univ(self) -> bool {
        self.0 == u64::MAX
    }

    /// The zones touched by any address of `range`.
    pub fn of_range(range: &Range, zone_shift: u32) -> Self {
        if range.is_empty() {
            return Self::EMPTY;
        }
        let first = range.base().0.checked_shr(zone_shift).unwrap_or(0);
        let last = (range.limit().0 - 1).checked_shr(zone_shift).unwrap_or(0);
        if last - first >= Self::ZONES as usize - 1 {
            return Self::UNIV;
        }
        (first..=last).fold(Self::EMPTY, |set, stripe| {
            set.add((stripe % Self::ZONES as usize) as u32)
        })
    }
}

impl fmt::Display for ZoneSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
