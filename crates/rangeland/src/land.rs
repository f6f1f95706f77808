//! The generic Land handle: lifecycle, precondition checks, and dispatch.
//!
//! Every public operation is validated here and then forwarded to the
//! class's [`LandBackend`]. Backends report errors; this layer never masks
//! or retries them. The only recovery it performs is rolling back the
//! instance-storage reservation when a class initialiser fails.
//!
//! There is no runtime validity signature on a `Land`: a value of this
//! type exists only after successful initialisation, [`Land::destroy`]
//! consumes it, and the `'a` borrow ties it to its arena. Use after
//! destroy, double destroy, and outliving the arena are all compile
//! errors.

use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicU64, Ordering};

use rangeland_core::{Align, FindDelete, Found, LandError, Range, ZoneSet};
use tracing::{debug, trace, warn};

use crate::arena::{Arena, ControlGrant};
use crate::args::ArgList;
use crate::backend::{LandBackend, LandContext};
use crate::class::LandClass;
use crate::config::LandConfig;

/// Control-pool bytes occupied by the generic part of every Land.
///
/// Class instance sizes must be at least this large.
pub const LAND_HEADER_SIZE: usize = std::mem::size_of::<Land<'static>>();

/// Counter for unique [`LandId`] allocation.
static LAND_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a [`Land`].
///
/// Used in diagnostics in place of a memory address so that
/// [`Land::describe`] output is reproducible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LandId(u64);

impl LandId {
    fn next() -> Self {
        Self(LAND_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for LandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "land#{}", self.0)
    }
}

/// A set of disjoint, aligned address ranges backed by a class-specific
/// store.
///
/// # Concurrency
///
/// No internal locking. Mutations take `&mut self` and queries `&self`;
/// callers serialise access (typically under an arena-wide lock).
/// [`Land::iterate`] holds a shared borrow, so its visitor cannot mutate
/// the Land being walked.
pub struct Land<'a> {
    id: LandId,
    alignment: Align,
    arena: &'a Arena,
    class: &'static LandClass,
    backend: Box<dyn LandBackend>,
    /// Instance storage; taken on teardown.
    storage: Option<ControlGrant>,
}

impl<'a> Land<'a> {
    /// Create a Land of the given class in `arena`.
    ///
    /// Reserves `class.instance_size()` control-pool bytes, then runs the
    /// class initialiser with `args`. If initialisation fails the
    /// reservation is released and the initialiser's error returned.
    pub fn create(
        class: &'static LandClass,
        arena: &'a Arena,
        config: &LandConfig,
        args: &ArgList,
    ) -> Result<Self, LandError> {
        let alignment = Align::new(config.alignment)?;
        class.check()?;
        args.check()?;

        let storage = arena.control_alloc(class.instance_size())?;
        let cx = LandContext {
            id: LandId::next(),
            arena,
            alignment,
            class,
        };

        match class.init(&cx, args) {
            Ok(backend) => {
                debug!(
                    land = %cx.id,
                    class = class.name(),
                    arena = %arena.id(),
                    align = alignment.get(),
                    owner = config.owner.as_deref().unwrap_or("-"),
                    "land initialised"
                );
                Ok(Self {
                    id: cx.id,
                    alignment,
                    arena,
                    class,
                    backend,
                    storage: Some(storage),
                })
            }
            Err(err) => {
                arena.control_free(storage);
                debug!(
                    class = class.name(),
                    arena = %arena.id(),
                    error = %err,
                    "land initialisation failed"
                );
                Err(err)
            }
        }
    }

    /// Finish the backing store and release the instance storage.
    ///
    /// Dropping a Land has the same effect; `destroy` makes the end of
    /// its life explicit at the call site.
    pub fn destroy(self) {
        drop(self);
    }

    /// This Land's identity.
    pub fn id(&self) -> LandId {
        self.id
    }

    /// Granularity of every range this Land accepts or returns.
    pub fn alignment(&self) -> Align {
        self.alignment
    }

    /// The arena this Land belongs to.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// The class descriptor this Land was created from.
    pub fn class(&self) -> &'static LandClass {
        self.class
    }

    /// Add `range` to the set, coalescing with ranges it abuts.
    ///
    /// `range` must be non-empty and aligned. Returns the coalesced range
    /// that now contains it. Overlap with a present range is reported as
    /// [`LandError::Overlap`] and leaves the set unchanged.
    pub fn insert(&mut self, range: Range) -> Result<Range, LandError> {
        self.check_range(range)?;
        let cx = self.cx();
        let result = self.backend.insert(&cx, range);
        self.after_mutation("insert", &result);
        self.observe("insert", result)
    }

    /// Remove `range` from the set.
    ///
    /// `range` must be non-empty, aligned, and wholly inside one present
    /// range. Returns that covering range as it was before deletion.
    pub fn delete(&mut self, range: Range) -> Result<Range, LandError> {
        self.check_range(range)?;
        let cx = self.cx();
        let result = self.backend.delete(&cx, range);
        self.after_mutation("delete", &result);
        self.observe("delete", result)
    }

    /// Visit every range in the class's iteration order.
    ///
    /// Returns `Ok(true)` if the walk completed and `Ok(false)` if the
    /// visitor broke out early.
    pub fn iterate<F>(&self, mut visitor: F) -> Result<bool, LandError>
    where
        F: FnMut(&Range) -> ControlFlow<()>,
    {
        let result = self.backend.iterate(&self.cx(), &mut visitor);
        self.observe("iterate", result)
    }

    /// Collect every range in iteration order.
    pub fn ranges(&self) -> Result<Vec<Range>, LandError> {
        let mut out = Vec::new();
        self.iterate(|range| {
            out.push(*range);
            ControlFlow::Continue(())
        })?;
        Ok(out)
    }

    /// Total bytes covered by the set.
    pub fn total_size(&self) -> Result<usize, LandError> {
        let mut total = 0usize;
        self.iterate(|range| {
            total += range.size();
            ControlFlow::Continue(())
        })?;
        Ok(total)
    }

    /// First range in address order of at least `size` bytes.
    ///
    /// `Ok(None)` means nothing is large enough.
    pub fn find_first(&mut self, size: usize, policy: FindDelete) -> Result<Option<Found>, LandError> {
        self.check_size(size)?;
        let cx = self.cx();
        let result = self.backend.find_first(&cx, size, policy);
        self.after_mutation("find_first", &result);
        self.observe("find_first", result)
    }

    /// Last range in address order of at least `size` bytes.
    ///
    /// Under [`FindDelete::SizeOnly`] the slice comes from the high end.
    pub fn find_last(&mut self, size: usize, policy: FindDelete) -> Result<Option<Found>, LandError> {
        self.check_size(size)?;
        let cx = self.cx();
        let result = self.backend.find_last(&cx, size, policy);
        self.after_mutation("find_last", &result);
        self.observe("find_last", result)
    }

    /// Largest range of at least `size` bytes; the lowest wins ties.
    pub fn find_largest(
        &mut self,
        size: usize,
        policy: FindDelete,
    ) -> Result<Option<Found>, LandError> {
        self.check_size(size)?;
        let cx = self.cx();
        let result = self.backend.find_largest(&cx, size, policy);
        self.after_mutation("find_largest", &result);
        self.observe("find_largest", result)
    }

    /// Find and delete `size` bytes lying wholly inside `zones`.
    ///
    /// Scans upward from low addresses, or downward when `high` is set.
    /// Any bit pattern is accepted for `zones`.
    pub fn find_in_zones(
        &mut self,
        size: usize,
        zones: ZoneSet,
        high: bool,
    ) -> Result<Option<Found>, LandError> {
        self.check_size(size)?;
        let cx = self.cx();
        let result = self.backend.find_in_zones(&cx, size, zones, high);
        self.after_mutation("find_in_zones", &result);
        self.observe("find_in_zones", result)
    }

    /// Write a diagnostic rendering of the Land to `out`.
    ///
    /// Output is deterministic for a given state. Never mutates.
    pub fn describe(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "Land {} {{", self.id)?;
        writeln!(
            out,
            "  class \"{}\" ({} bytes)",
            self.class.name(),
            self.class.instance_size()
        )?;
        writeln!(out, "  arena {}", self.arena.id())?;
        writeln!(out, "  align {}", self.alignment)?;
        self.backend.describe(&self.cx(), out)?;
        writeln!(out, "}} Land {}", self.id)
    }

    /// Validate the class descriptor and the backing store's structure.
    pub fn check(&self) -> Result<(), LandError> {
        self.class.check()?;
        self.backend.check(&self.cx())
    }

    fn cx(&self) -> LandContext<'a> {
        LandContext {
            id: self.id,
            arena: self.arena,
            alignment: self.alignment,
            class: self.class,
        }
    }

    fn check_range(&self, range: Range) -> Result<(), LandError> {
        let err = if range.is_empty() {
            LandError::EmptyRange { range }
        } else if !range.is_aligned(self.alignment) {
            LandError::Misaligned {
                range,
                align: self.alignment,
            }
        } else {
            return Ok(());
        };
        warn!(land = %self.id, error = %err, "rejected range");
        Err(err)
    }

    fn check_size(&self, size: usize) -> Result<(), LandError> {
        let err = if size == 0 {
            LandError::InvalidArgument {
                reason: "find size must be non-zero".to_string(),
            }
        } else if !self.alignment.is_size_aligned(size) {
            LandError::MisalignedSize {
                size,
                align: self.alignment,
            }
        } else {
            return Ok(());
        };
        warn!(land = %self.id, error = %err, "rejected size");
        Err(err)
    }

    /// Debug builds re-verify the store after every successful mutation.
    fn after_mutation<T>(&self, operation: &'static str, result: &Result<T, LandError>) {
        if cfg!(debug_assertions) && result.is_ok() {
            let checked = self.backend.check(&self.cx());
            debug_assert!(
                checked.is_ok(),
                "{} corrupt after {operation}: {checked:?}",
                self.id
            );
        }
    }

    fn observe<T: fmt::Debug>(
        &self,
        operation: &'static str,
        result: Result<T, LandError>,
    ) -> Result<T, LandError> {
        match &result {
            Ok(value) => trace!(land = %self.id, operation, ?value, "ok"),
            Err(err) if err.is_contract_violation() => {
                warn!(land = %self.id, operation, error = %err, "contract violation")
            }
            Err(err) => trace!(land = %self.id, operation, error = %err, "failed"),
        }
        result
    }
}

impl Drop for Land<'_> {
    fn drop(&mut self) {
        let Some(storage) = self.storage.take() else {
            return;
        };
        let cx = self.cx();
        self.backend.finish(&cx);
        self.arena.control_free(storage);
        debug!(land = %self.id, class = self.class.name(), "land destroyed");
    }
}

impl fmt::Debug for Land<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Land")
            .field("id", &self.id)
            .field("class", &self.class.name())
            .field("arena", &self.arena.id())
            .field("alignment", &self.alignment)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Land<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.describe(f)
    }
}
