//! `RangeList`: the reference Land class.
//!
//! Ranges are kept in a `Vec` sorted by base address, fully coalesced, so
//! no two blocks overlap or abut. Lookups are binary searches; finds are
//! linear scans. Every block is charged [`RangeList::BLOCK_BYTES`] of
//! control-pool space, so a Land backed by this class obeys the same memory
//! discipline as a node-based store: a split that cannot reserve a new block fails
//! with [`LandError::AllocationFailed`] and leaves the set untouched.

use std::fmt;
use std::mem;
use std::ops::ControlFlow;

use rangeland_core::{Addr, Align, FindDelete, Found, LandError, Range, ZoneSet};
use tracing::trace;

use crate::arena::ControlGrant;
use crate::args::{Arg, ArgList};
use crate::backend::{LandBackend, LandContext, Visitor};
use crate::class::LandClass;
use crate::land::LAND_HEADER_SIZE;

/// Maximum zone stripes walked per block by a zone-constrained search.
///
/// Zone membership repeats every 64 stripes, so three periods cover the
/// first gap, every distinct run start, and the end of the last run.
const MAX_STRIPES: usize = 3 * ZoneSet::ZONES as usize;

/// The sorted-vector Land class.
///
/// Accepts [`Arg::Capacity`] to pre-size the block vector; any other
/// argument is rejected.
pub static RANGE_LIST: LandClass = LandClass::inherit(
    "RangeList",
    LAND_HEADER_SIZE + mem::size_of::<RangeList>(),
    init,
);

fn init(cx: &LandContext<'_>, args: &ArgList) -> Result<Box<dyn LandBackend>, LandError> {
    let mut capacity = 0;
    for arg in args.iter() {
        match arg {
            Arg::Capacity(n) => capacity = *n,
            other => {
                return Err(LandError::InvalidArgument {
                    reason: format!("RangeList does not accept argument '{}'", other.key()),
                });
            }
        }
    }
    Ok(Box::new(RangeList {
        blocks: Vec::with_capacity(capacity),
        reserved: cx.arena().empty_grant(),
    }))
}

/// Backing store of [`RANGE_LIST`] Lands.
///
/// Only reachable through a [`Land`](crate::land::Land); the type is
/// public for its constants.
pub struct RangeList {
    blocks: Vec<Range>,
    /// One [`RangeList::BLOCK_BYTES`] share per entry in `blocks`.
    reserved: ControlGrant,
}

impl RangeList {
    /// Control-pool bytes charged per stored block.
    pub const BLOCK_BYTES: usize = mem::size_of::<Range>();

    /// Index of the block containing `range`, if any.
    fn covering(&self, range: &Range) -> Option<usize> {
        let idx = self
            .blocks
            .partition_point(|b| b.base() <= range.base())
            .checked_sub(1)?;
        self.blocks[idx].contains_range(range).then_some(idx)
    }

    fn reserve_block(&mut self, cx: &LandContext<'_>) -> Result<(), LandError> {
        let grant = cx.arena().control_alloc(Self::BLOCK_BYTES)?;
        self.reserved.absorb(grant);
        Ok(())
    }

    fn release_block(&mut self, cx: &LandContext<'_>) {
        let grant = self.reserved.split(Self::BLOCK_BYTES);
        cx.arena().control_free(grant);
    }

    /// Remove `range` from the block at `idx`, which must contain it.
    fn delete_at(
        &mut self,
        cx: &LandContext<'_>,
        idx: usize,
        range: Range,
    ) -> Result<(), LandError> {
        let block = self.blocks[idx];
        let keep_low = block.base() < range.base();
        let keep_high = range.limit() < block.limit();
        match (keep_low, keep_high) {
            (false, false) => {
                self.blocks.remove(idx);
                self.release_block(cx);
            }
            (true, false) => self.blocks[idx] = Range::new(block.base(), range.base())?,
            (false, true) => self.blocks[idx] = Range::new(range.limit(), block.limit())?,
            (true, true) => {
                self.reserve_block(cx)?;
                self.blocks[idx] = Range::new(block.base(), range.base())?;
                self.blocks
                    .insert(idx + 1, Range::new(range.limit(), block.limit())?);
                trace!(land = %cx.id(), %block, %range, "split block");
            }
        }
        Ok(())
    }

    /// Apply a find policy to the block at `idx`.
    fn take(
        &mut self,
        cx: &LandContext<'_>,
        idx: usize,
        size: usize,
        policy: FindDelete,
        from_high: bool,
    ) -> Result<Option<Found>, LandError> {
        let block = self.blocks[idx];
        let range = match policy {
            FindDelete::Keep | FindDelete::Entire => block,
            FindDelete::SizeOnly if from_high => block.high_slice(size),
            FindDelete::SizeOnly => block.low_slice(size),
        };
        if policy != FindDelete::Keep {
            self.delete_at(cx, idx, range)?;
        }
        Ok(Some(Found {
            range,
            old_range: block,
        }))
    }

    /// Lowest aligned `size`-byte slice of `block` lying inside `zones`.
    fn lowest_in_zones(
        block: Range,
        size: usize,
        zones: ZoneSet,
        shift: u32,
        align: Align,
    ) -> Option<Range> {
        if zones.is_univ() {
            return fit_low(block.base(), block.limit(), size, align);
        }
        let mut run_base = None;
        let mut cursor = block.base();
        for _ in 0..MAX_STRIPES {
            if cursor >= block.limit() {
                break;
            }
            let stripe_end =
                next_stripe(cursor, shift).map_or(block.limit(), |end| end.min(block.limit()));
            if zones.contains_addr(cursor, shift) {
                let base = *run_base.get_or_insert(cursor);
                if let Some(found) = fit_low(base, stripe_end, size, align) {
                    return Some(found);
                }
            } else {
                run_base = None;
            }
            cursor = stripe_end;
        }
        None
    }

    /// Highest aligned `size`-byte slice of `block` lying inside `zones`.
    fn highest_in_zones(
        block: Range,
        size: usize,
        zones: ZoneSet,
        shift: u32,
        align: Align,
    ) -> Option<Range> {
        if zones.is_univ() {
            return fit_high(block.base(), block.limit(), size, align);
        }
        let mut run_limit = None;
        let mut cursor = block.limit();
        for _ in 0..MAX_STRIPES {
            if cursor <= block.base() {
                break;
            }
            let stripe_base = stripe_start(Addr(cursor.0 - 1), shift).max(block.base());
            if zones.contains_addr(stripe_base, shift) {
                let limit = *run_limit.get_or_insert(cursor);
                if let Some(found) = fit_high(stripe_base, limit, size, align) {
                    return Some(found);
                }
            } else {
                run_limit = None;
            }
            cursor = stripe_base;
        }
        None
    }
}

fn stripe_start(addr: Addr, shift: u32) -> Addr {
    Addr((addr.0 >> shift) << shift)
}

fn next_stripe(addr: Addr, shift: u32) -> Option<Addr> {
    (addr.0 >> shift)
        .checked_add(1)?
        .checked_mul(1usize << shift)
        .map(Addr)
}

fn fit_low(base: Addr, limit: Addr, size: usize, align: Align) -> Option<Range> {
    let base = align.align_up(base)?;
    let limit = align.align_down(limit);
    if base < limit && limit.offset_from(base) >= size {
        Range::from_base_size(base, size).ok()
    } else {
        None
    }
}

fn fit_high(base: Addr, limit: Addr, size: usize, align: Align) -> Option<Range> {
    let base = align.align_up(base)?;
    let limit = align.align_down(limit);
    if base < limit && limit.offset_from(base) >= size {
        Range::new(Addr(limit.0 - size), limit).ok()
    } else {
        None
    }
}

impl LandBackend for RangeList {
    fn finish(&mut self, cx: &LandContext<'_>) {
        let reserved = mem::replace(&mut self.reserved, cx.arena().empty_grant());
        cx.arena().control_free(reserved);
        self.blocks.clear();
    }

    fn insert(&mut self, cx: &LandContext<'_>, range: Range) -> Result<Range, LandError> {
        let idx = self.blocks.partition_point(|b| b.base() < range.base());
        let prev = idx.checked_sub(1).map(|i| self.blocks[i]);
        let next = self.blocks.get(idx).copied();

        for existing in [prev, next].into_iter().flatten() {
            if existing.overlaps(&range) {
                return Err(LandError::Overlap { range, existing });
            }
        }

        let merge_prev = prev.filter(|p| p.limit() == range.base());
        let merge_next = next.filter(|n| n.base() == range.limit());
        let merged = match (merge_prev, merge_next) {
            (Some(p), Some(n)) => {
                let merged = p.hull(&n);
                self.blocks[idx - 1] = merged;
                self.blocks.remove(idx);
                self.release_block(cx);
                merged
            }
            (Some(p), None) => {
                let merged = p.hull(&range);
                self.blocks[idx - 1] = merged;
                merged
            }
            (None, Some(n)) => {
                let merged = range.hull(&n);
                self.blocks[idx] = merged;
                merged
            }
            (None, None) => {
                self.reserve_block(cx)?;
                self.blocks.insert(idx, range);
                range
            }
        };
        Ok(merged)
    }

    fn delete(&mut self, cx: &LandContext<'_>, range: Range) -> Result<Range, LandError> {
        let idx = self
            .covering(&range)
            .ok_or(LandError::NotCovered { range })?;
        let old = self.blocks[idx];
        self.delete_at(cx, idx, range)?;
        Ok(old)
    }

    fn iterate(&self, _cx: &LandContext<'_>, visitor: &mut Visitor<'_>) -> Result<bool, LandError> {
        for block in &self.blocks {
            if let ControlFlow::Break(()) = visitor(block) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn find_first(
        &mut self,
        cx: &LandContext<'_>,
        size: usize,
        policy: FindDelete,
    ) -> Result<Option<Found>, LandError> {
        match self.blocks.iter().position(|b| b.size() >= size) {
            Some(idx) => self.take(cx, idx, size, policy, false),
            None => Ok(None),
        }
    }

    fn find_last(
        &mut self,
        cx: &LandContext<'_>,
        size: usize,
        policy: FindDelete,
    ) -> Result<Option<Found>, LandError> {
        match self.blocks.iter().rposition(|b| b.size() >= size) {
            Some(idx) => self.take(cx, idx, size, policy, true),
            None => Ok(None),
        }
    }

    fn find_largest(
        &mut self,
        cx: &LandContext<'_>,
        size: usize,
        policy: FindDelete,
    ) -> Result<Option<Found>, LandError> {
        let mut best: Option<usize> = None;
        for (idx, block) in self.blocks.iter().enumerate() {
            if block.size() >= size && best.is_none_or(|b| block.size() > self.blocks[b].size()) {
                best = Some(idx);
            }
        }
        match best {
            Some(idx) => self.take(cx, idx, size, policy, false),
            None => Ok(None),
        }
    }

    fn find_in_zones(
        &mut self,
        cx: &LandContext<'_>,
        size: usize,
        zones: ZoneSet,
        high: bool,
    ) -> Result<Option<Found>, LandError> {
        if zones.is_empty() {
            return Ok(None);
        }
        let shift = cx.arena().zone_shift();
        let align = cx.alignment();
        let hit = if high {
            self.blocks.iter().enumerate().rev().find_map(|(idx, block)| {
                RangeList::highest_in_zones(*block, size, zones, shift, align).map(|r| (idx, r))
            })
        } else {
            self.blocks.iter().enumerate().find_map(|(idx, block)| {
                RangeList::lowest_in_zones(*block, size, zones, shift, align).map(|r| (idx, r))
            })
        };
        let Some((idx, range)) = hit else {
            return Ok(None);
        };
        let old_range = self.blocks[idx];
        self.delete_at(cx, idx, range)?;
        trace!(land = %cx.id(), %zones, %range, "zoned find");
        Ok(Some(Found { range, old_range }))
    }

    fn describe(&self, _cx: &LandContext<'_>, out: &mut dyn fmt::Write) -> fmt::Result {
        let total: usize = self.blocks.iter().map(Range::size).sum();
        writeln!(out, "  blocks {}, total {} bytes", self.blocks.len(), total)?;
        for block in &self.blocks {
            writeln!(out, "  {block}")?;
        }
        Ok(())
    }

    fn check(&self, cx: &LandContext<'_>) -> Result<(), LandError> {
        let corrupt = |reason: String| LandError::Corrupt { reason };
        for (idx, block) in self.blocks.iter().enumerate() {
            if block.is_empty() {
                return Err(corrupt(format!("empty block {block} at {idx}")));
            }
            if !block.is_aligned(cx.alignment()) {
                return Err(corrupt(format!(
                    "block {block} not aligned to {}",
                    cx.alignment()
                )));
            }
            if let Some(prev) = idx.checked_sub(1).map(|i| self.blocks[i]) {
                if prev.limit() >= block.base() {
                    return Err(corrupt(format!(
                        "blocks {prev} and {block} are unordered, overlapping or uncoalesced"
                    )));
                }
            }
        }
        let expected = self.blocks.len() * Self::BLOCK_BYTES;
        if self.reserved.size() != expected {
            return Err(corrupt(format!(
                "{} control bytes reserved for {} blocks, expected {expected}",
                self.reserved.size(),
                self.blocks.len()
            )));
        }
        Ok(())
    }
}
