//! The arena collaborator: identity, zone geometry, and the control pool.
//!
//! A real memory manager's arena does far more than this. Lands only need
//! a bootstrap allocator for their own instance storage and backing-store
//! nodes, plus the zone stripe width for zone-constrained search.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use rangeland_core::LandError;

use crate::config::ArenaConfig;

/// Counter for unique [`ArenaId`] allocation.
static ARENA_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for an [`Arena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    fn next() -> Self {
        Self(ARENA_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "arena#{}", self.0)
    }
}

/// A reservation of control-pool bytes.
///
/// Grants are neither `Clone` nor `Copy`: the only way to give bytes back
/// is to hand the grant to [`Arena::control_free`], which consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a dropped ControlGrant leaks control-pool bytes"]
pub struct ControlGrant {
    arena: ArenaId,
    size: usize,
}

impl ControlGrant {
    /// Number of bytes reserved.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Merge another grant from the same arena into this one.
    pub fn absorb(&mut self, other: ControlGrant) {
        debug_assert_eq!(self.arena, other.arena, "grants from different arenas");
        self.size += other.size;
    }

    /// Split `size` bytes off into a separate grant.
    ///
    /// # Panics
    ///
    /// Panics if `size` exceeds the bytes held.
    pub fn split(&mut self, size: usize) -> ControlGrant {
        assert!(
            size <= self.size,
            "split {size} bytes from a grant of {}",
            self.size
        );
        self.size -= size;
        ControlGrant {
            arena: self.arena,
            size,
        }
    }
}

/// The owning memory-management context of a set of Lands.
///
/// Shared by reference: every Land borrows its arena for its whole
/// lifetime, so an arena can never be dropped while a Land still uses it.
/// Control-pool accounting is lock-free so that Land lifecycle calls may
/// nest inside other control-pool users.
#[derive(Debug)]
pub struct Arena {
    id: ArenaId,
    config: ArenaConfig,
    control_in_use: AtomicUsize,
}

impl Arena {
    /// Create an arena after validating its configuration.
    pub fn new(config: ArenaConfig) -> Result<Self, LandError> {
        config.validate()?;
        Ok(Self {
            id: ArenaId::next(),
            config,
            control_in_use: AtomicUsize::new(0),
        })
    }

    /// This arena's identity.
    pub fn id(&self) -> ArenaId {
        self.id
    }

    /// The configuration the arena was built from.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Log2 of the zone stripe width.
    pub fn zone_shift(&self) -> u32 {
        self.config.zone_shift
    }

    /// Capacity of the control pool in bytes.
    pub fn control_limit(&self) -> usize {
        self.config.control_limit
    }

    /// Bytes currently reserved from the control pool.
    pub fn control_in_use(&self) -> usize {
        self.control_in_use.load(Ordering::Acquire)
    }

    /// Bytes still available in the control pool.
    pub fn control_available(&self) -> usize {
        self.control_limit().saturating_sub(self.control_in_use())
    }

    /// An empty grant tied to this arena, for accumulating reservations.
    pub fn empty_grant(&self) -> ControlGrant {
        ControlGrant {
            arena: self.id,
            size: 0,
        }
    }

    /// Reserve `size` bytes from the control pool.
    ///
    /// Returns `Err(LandError::AllocationFailed)` if the reservation would
    /// exceed the pool limit. Zero-byte reservations always succeed.
    pub fn control_alloc(&self, size: usize) -> Result<ControlGrant, LandError> {
        let limit = self.control_limit();
        self.control_in_use
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                used.checked_add(size).filter(|&total| total <= limit)
            })
            .map_err(|used| LandError::AllocationFailed {
                requested: size,
                available: limit.saturating_sub(used),
            })?;
        Ok(ControlGrant {
            arena: self.id,
            size,
        })
    }

    /// Return a grant's bytes to the control pool.
    pub fn control_free(&self, grant: ControlGrant) {
        debug_assert_eq!(
            grant.arena, self.id,
            "grant from {} freed into {}",
            grant.arena, self.id
        );
        let previous = self.control_in_use.fetch_sub(grant.size, Ordering::AcqRel);
        debug_assert!(previous >= grant.size, "control pool underflow");
    }
}
