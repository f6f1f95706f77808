//! Arena and Land configuration parameters.

use rangeland_core::LandError;

/// Configuration for the arena collaborator.
///
/// Controls the size of the control (bootstrap) pool that Land instances
/// and their backing stores draw from, and the zone stripe width.
/// Validated by [`Arena::new`](crate::arena::Arena::new).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Maximum bytes the control pool hands out at once.
    ///
    /// Default: 1 MiB.
    pub control_limit: usize,

    /// Log2 of the zone stripe width in bytes.
    ///
    /// Address `a` lies in zone `(a >> zone_shift) % 64`. Default: 20
    /// (1 MiB stripes). Must be less than `usize::BITS`.
    pub zone_shift: u32,
}

impl ArenaConfig {
    /// Default control pool size: 1 MiB.
    pub const DEFAULT_CONTROL_LIMIT: usize = 1 << 20;

    /// Default zone shift: 1 MiB stripes.
    pub const DEFAULT_ZONE_SHIFT: u32 = 20;

    /// Create a config with the given control pool limit and default zones.
    pub fn new(control_limit: usize) -> Self {
        Self {
            control_limit,
            zone_shift: Self::DEFAULT_ZONE_SHIFT,
        }
    }

    /// Replace the zone shift.
    pub fn with_zone_shift(mut self, zone_shift: u32) -> Self {
        self.zone_shift = zone_shift;
        self
    }

    /// Check the parameters for consistency.
    pub fn validate(&self) -> Result<(), LandError> {
        if self.zone_shift >= usize::BITS {
            return Err(LandError::InvalidArgument {
                reason: format!(
                    "zone_shift {} must be less than {}",
                    self.zone_shift,
                    usize::BITS
                ),
            });
        }
        Ok(())
    }

    /// Width of one zone stripe in bytes.
    pub fn zone_width(&self) -> usize {
        1usize << self.zone_shift
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CONTROL_LIMIT)
    }
}

/// Per-Land construction parameters shared by every class.
///
/// Class-specific parameters travel separately in an
/// [`ArgList`](crate::args::ArgList).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LandConfig {
    /// Granularity of every range the Land accepts or returns.
    ///
    /// Validated as a power of two at creation.
    pub alignment: usize,

    /// Optional label for the component that owns the Land, recorded in
    /// the creation event.
    pub owner: Option<String>,
}

impl LandConfig {
    /// Default alignment: one machine word.
    pub const DEFAULT_ALIGNMENT: usize = std::mem::size_of::<usize>();

    /// Create a config with the given alignment and no owner label.
    pub fn new(alignment: usize) -> Self {
        Self {
            alignment,
            owner: None,
        }
    }

    /// Attach an owner label.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

impl Default for LandConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ALIGNMENT)
    }
}
