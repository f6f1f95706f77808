//! Benchmark profiles for rangeland Land classes.
//!
//! Provides deterministic free-space layouts so that benches measure the
//! same fragmentation on every run:
//!
//! - [`fragmented_profile`]: `blocks` equal holes separated by equal gaps
//! - [`sawtooth_profile`]: hole sizes cycling through a small set, for
//!   largest-fit searches

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rangeland::{Arena, ArenaConfig, Arg, ArgList, Land, LandClass, LandConfig};
use rangeland_core::{Addr, Range};

/// Alignment used by every profile.
pub const ALIGN: usize = 16;

/// An arena whose control pool can hold `blocks` blocks of any class
/// shipped with the workspace, with 64 KiB zone stripes.
pub fn bench_arena(blocks: usize) -> Arena {
    let limit = (blocks + 64) * 256;
    Arena::new(ArenaConfig::new(limit).with_zone_shift(16)).unwrap()
}

/// Build a Land of `class` with `blocks` holes of `hole` bytes, each
/// followed by a gap of `gap` bytes.
pub fn fragmented_profile<'a>(
    class: &'static LandClass,
    arena: &'a Arena,
    blocks: usize,
    hole: usize,
    gap: usize,
) -> Land<'a> {
    let args = ArgList::new().with(Arg::Capacity(blocks));
    let mut land = Land::create(class, arena, &LandConfig::new(ALIGN), &args).unwrap();
    let stride = hole + gap;
    for i in 0..blocks {
        let base = Addr(i * stride);
        land.insert(Range::from_base_size(base, hole).unwrap()).unwrap();
    }
    land
}

/// Build a Land of `class` whose hole sizes cycle through 1, 2, 3, 5 and 8
/// alignment units, separated by one-unit gaps.
pub fn sawtooth_profile<'a>(class: &'static LandClass, arena: &'a Arena, blocks: usize) -> Land<'a> {
    const UNITS: [usize; 5] = [1, 2, 3, 5, 8];
    let args = ArgList::new().with(Arg::Capacity(blocks));
    let mut land = Land::create(class, arena, &LandConfig::new(ALIGN), &args).unwrap();
    let mut base = 0;
    for i in 0..blocks {
        let size = UNITS[i % UNITS.len()] * ALIGN;
        land.insert(Range::from_base_size(Addr(base), size).unwrap()).unwrap();
        base += size + ALIGN;
    }
    land
}
