//! The backing-store protocol every Land class implements.
//!
//! [`LandBackend`] is the operation table of a Land class. Every method
//! has a default that reports [`LandError::Unimplemented`] (or does
//! nothing, for `finish`, `describe` and `check`), so the trait's defaults
//! *are* the abstract base class: a concrete store overrides exactly the
//! operations it supports and inherits the rest.
//!
//! Backends never see unvalidated input. The dispatch layer in
//! [`Land`](crate::land::Land) has already checked that ranges are
//! non-empty and aligned and that sizes are non-zero and aligned.

use std::fmt;
use std::ops::ControlFlow;

use rangeland_core::{Align, FindDelete, Found, LandError, Range, ZoneSet};

use crate::arena::Arena;
use crate::class::LandClass;
use crate::land::LandId;

/// Everything a backend may need from the Land that owns it.
///
/// Passed by reference into every backend call rather than stored in the
/// backend, so backing stores stay `'static` while the Land itself
/// borrows its arena.
#[derive(Clone, Copy, Debug)]
pub struct LandContext<'a> {
    pub(crate) id: LandId,
    pub(crate) arena: &'a Arena,
    pub(crate) alignment: Align,
    pub(crate) class: &'static LandClass,
}

impl<'a> LandContext<'a> {
    /// Identity of the Land being operated on.
    pub fn id(&self) -> LandId {
        self.id
    }

    /// The owning arena, for control-pool reservations and zone geometry.
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// The Land's alignment.
    pub fn alignment(&self) -> Align {
        self.alignment
    }

    /// The Land's class descriptor.
    pub fn class(&self) -> &'static LandClass {
        self.class
    }

    /// The error a backend returns for an operation it does not support.
    pub fn unimplemented(&self, operation: &'static str) -> LandError {
        LandError::Unimplemented {
            class: self.class.name(),
            operation,
        }
    }
}

/// Visitor callback for [`LandBackend::iterate`].
///
/// Return `ControlFlow::Break(())` to stop the walk early.
pub type Visitor<'v> = dyn FnMut(&Range) -> ControlFlow<()> + 'v;

/// Operation table of a Land class.
///
/// # Object Safety
///
/// Used as `Box<dyn LandBackend>`; the class's init function constructs
/// the concrete store.
///
/// # Thread Safety
///
/// `Send` so that a Land can move between threads along with the lock
/// that serialises access to it. Backends do no locking of their own.
pub trait LandBackend: Send {
    /// Release everything the backing store privately owns.
    ///
    /// Called exactly once, before the Land's instance storage is released.
    /// Implementations must return every control-pool byte they reserved.
    fn finish(&mut self, cx: &LandContext<'_>) {
        let _ = cx;
    }

    /// Add `range` to the set, coalescing with ranges it abuts.
    ///
    /// Returns the coalesced range that now contains `range`. Must fail
    /// with [`LandError::Overlap`] and leave the set unchanged if `range`
    /// overlaps a present range.
    fn insert(&mut self, cx: &LandContext<'_>, range: Range) -> Result<Range, LandError> {
        let _ = range;
        Err(cx.unimplemented("insert"))
    }

    /// Remove `range`, which must lie inside a single present range.
    ///
    /// Returns the covering range as it was before deletion. Must fail
    /// with [`LandError::NotCovered`] and leave the set unchanged otherwise.
    fn delete(&mut self, cx: &LandContext<'_>, range: Range) -> Result<Range, LandError> {
        let _ = range;
        Err(cx.unimplemented("delete"))
    }

    /// Call `visitor` on every range in a consistent order.
    ///
    /// Returns `Ok(true)` if every range was visited, `Ok(false)` if the
    /// visitor stopped the walk.
    fn iterate(&self, cx: &LandContext<'_>, visitor: &mut Visitor<'_>) -> Result<bool, LandError> {
        let _ = visitor;
        Err(cx.unimplemented("iterate"))
    }

    /// First range in address order with at least `size` bytes.
    fn find_first(
        &mut self,
        cx: &LandContext<'_>,
        size: usize,
        policy: FindDelete,
    ) -> Result<Option<Found>, LandError> {
        let _ = (size, policy);
        Err(cx.unimplemented("find_first"))
    }

    /// Last range in address order with at least `size` bytes.
    fn find_last(
        &mut self,
        cx: &LandContext<'_>,
        size: usize,
        policy: FindDelete,
    ) -> Result<Option<Found>, LandError> {
        let _ = (size, policy);
        Err(cx.unimplemented("find_last"))
    }

    /// Largest range with at least `size` bytes, lowest address on ties.
    fn find_largest(
        &mut self,
        cx: &LandContext<'_>,
        size: usize,
        policy: FindDelete,
    ) -> Result<Option<Found>, LandError> {
        let _ = (size, policy);
        Err(cx.unimplemented("find_largest"))
    }

    /// Find and delete `size` bytes lying wholly inside `zones`.
    ///
    /// Scans from low addresses, or from high addresses when `high` is set.
    fn find_in_zones(
        &mut self,
        cx: &LandContext<'_>,
        size: usize,
        zones: ZoneSet,
        high: bool,
    ) -> Result<Option<Found>, LandError> {
        let _ = (size, zones, high);
        Err(cx.unimplemented("find_in_zones"))
    }

    /// Write the store's own diagnostic lines.
    ///
    /// The dispatch layer writes the header and trailer; backends write
    /// only their contents, each line indented by two spaces.
    fn describe(&self, cx: &LandContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
        let _ = (cx, out);
        Ok(())
    }

    /// Verify the store's structural invariants.
    fn check(&self, cx: &LandContext<'_>) -> Result<(), LandError> {
        let _ = cx;
        Ok(())
    }
}

/// Backing store of the abstract base class: overrides nothing.
#[derive(Debug, Default)]
pub(crate) struct AbstractBackend;

impl LandBackend for AbstractBackend {}
