//! Test classes and invariant helpers for rangeland development.
//!
//! Provides deliberately partial Land classes ([`classes::FIRST_FIT_ONLY`],
//! [`classes::FAILING_INIT`]) for exercising the dispatch layer, plus
//! construction shortcuts and assertions shared by integration tests and
//! benches.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod classes;

use rangeland::{Arena, ArenaConfig, ArgList, Land, LandClass, LandConfig};
use rangeland_core::{Addr, Range};

/// Shorthand range constructor. Panics on inverted bounds.
pub fn r(base: usize, limit: usize) -> Range {
    Range::new(Addr(base), Addr(limit)).unwrap()
}

/// An arena with a 64 KiB control pool and 16-byte zone stripes.
pub fn small_arena() -> Arena {
    Arena::new(ArenaConfig::new(64 * 1024).with_zone_shift(4)).unwrap()
}

/// A Land of `class` with the given alignment and no class arguments.
pub fn land_of<'a>(class: &'static LandClass, arena: &'a Arena, align: usize) -> Land<'a> {
    Land::create(class, arena, &LandConfig::new(align), &ArgList::new()).unwrap()
}

/// A Land of `class` holding `ranges`, inserted in the order given.
pub fn land_with<'a>(
    class: &'static LandClass,
    arena: &'a Arena,
    align: usize,
    ranges: &[Range],
) -> Land<'a> {
    let mut land = land_of(class, arena, align);
    for &range in ranges {
        land.insert(range).unwrap();
    }
    land
}

/// Assert the ranges are strictly ascending, non-overlapping and
/// non-abutting.
pub fn assert_sorted_disjoint(ranges: &[Range]) {
    for pair in ranges.windows(2) {
        assert!(
            pair[0].limit() < pair[1].base(),
            "{} and {} are out of order, overlapping or abutting",
            pair[0],
            pair[1]
        );
    }
}

/// Assert every range in the Land is non-empty and aligned.
pub fn assert_aligned(land: &Land<'_>) {
    for range in land.ranges().unwrap() {
        assert!(!range.is_empty(), "empty range {range}");
        assert!(
            range.is_aligned(land.alignment()),
            "{range} not aligned to {}",
            land.alignment()
        );
    }
}
