//! Land contract compliance helpers.
//!
//! These functions verify that a Land class honours the contract every
//! caller relies on: disjoint aligned ranges, coalescing insert, exact
//! delete, the find policies, and rejection of bad input without touching
//! the set. Each helper builds its own arena and Land of the class under
//! test.

use std::ops::ControlFlow;

use rangeland_core::{Addr, FindDelete, LandError, Range};

use crate::arena::Arena;
use crate::args::ArgList;
use crate::class::LandClass;
use crate::config::{ArenaConfig, LandConfig};
use crate::land::Land;

pub fn r(base: usize, limit: usize) -> Range {
    Range::new(Addr(base), Addr(limit)).unwrap()
}

fn arena() -> Arena {
    Arena::new(ArenaConfig::new(64 * 1024)).unwrap()
}

fn land<'a>(class: &'static LandClass, arena: &'a Arena, align: usize) -> Land<'a> {
    Land::create(class, arena, &LandConfig::new(align), &ArgList::new()).unwrap()
}

fn filled<'a>(
    class: &'static LandClass,
    arena: &'a Arena,
    align: usize,
    ranges: &[Range],
) -> Land<'a> {
    let mut land = land(class, arena, align);
    for &range in ranges {
        land.insert(range).unwrap();
    }
    land
}

/// Assert no two ranges overlap or abut.
pub fn assert_disjoint(land: &Land<'_>) {
    let mut ranges = land.ranges().unwrap();
    ranges.sort_by_key(Range::base);
    for pair in ranges.windows(2) {
        assert!(
            pair[0].limit() < pair[1].base(),
            "{} and {} overlap or abut in {}",
            pair[0],
            pair[1],
            land.id()
        );
    }
}

/// Assert every range is non-empty and aligned to the Land's alignment.
pub fn assert_aligned(land: &Land<'_>) {
    for range in land.ranges().unwrap() {
        assert!(!range.is_empty(), "empty range {range} in {}", land.id());
        assert!(
            range.is_aligned(land.alignment()),
            "{range} not aligned to {}",
            land.alignment()
        );
    }
}

/// Assert abutting inserts coalesce into one range.
pub fn assert_coalesces(class: &'static LandClass) {
    let arena = arena();
    let mut land = land(class, &arena, 1);
    assert_eq!(land.insert(r(0, 10)).unwrap(), r(0, 10));
    assert_eq!(land.insert(r(10, 20)).unwrap(), r(0, 20));
    assert_eq!(land.ranges().unwrap(), vec![r(0, 20)]);
    assert_eq!(land.insert(r(30, 40)).unwrap(), r(30, 40));
    assert_eq!(land.insert(r(20, 30)).unwrap(), r(0, 40));
    assert_eq!(land.ranges().unwrap(), vec![r(0, 40)]);
}

/// Assert `delete(insert(S, r), r) == S` when `r` is disjoint from `S`.
pub fn assert_insert_delete_inverse(class: &'static LandClass) {
    let arena = arena();
    let mut land = filled(class, &arena, 8, &[r(0, 16), r(64, 96), r(128, 136)]);
    let before = land.ranges().unwrap();
    for range in [r(16, 64), r(96, 128), r(200, 208), r(32, 48)] {
        land.insert(range).unwrap();
        assert_disjoint(&land);
        assert_aligned(&land);
        land.delete(range).unwrap();
        assert_eq!(land.ranges().unwrap(), before, "after insert/delete {range}");
    }
}

/// Assert first fit picks the lowest range large enough.
pub fn assert_find_first_lowest(class: &'static LandClass) {
    let arena = arena();
    let mut land = filled(class, &arena, 1, &[r(0, 5), r(20, 100), r(200, 210)]);
    let found = land.find_first(50, FindDelete::Keep).unwrap().unwrap();
    assert_eq!(found.range, r(20, 100));
    assert_eq!(found.old_range, r(20, 100));
    let found = land.find_first(10, FindDelete::Keep).unwrap().unwrap();
    assert_eq!(found.range, r(20, 100));
    assert!(land.find_first(81, FindDelete::Keep).unwrap().is_none());
    assert!(land.find_first(200, FindDelete::Keep).unwrap().is_none());
    assert_eq!(
        land.ranges().unwrap(),
        vec![r(0, 5), r(20, 100), r(200, 210)]
    );
}

/// Assert largest fit breaks ties towards the lowest address.
pub fn assert_find_largest_tie(class: &'static LandClass) {
    let arena = arena();
    let mut land = filled(class, &arena, 1, &[r(0, 30), r(100, 130)]);
    let found = land.find_largest(20, FindDelete::Keep).unwrap().unwrap();
    assert_eq!(found.range, r(0, 30));
    let found = land.find_largest(5, FindDelete::Keep).unwrap().unwrap();
    assert_eq!(found.range, r(0, 30));
    assert!(land.find_largest(31, FindDelete::Keep).unwrap().is_none());
}

/// Assert each deletion policy removes exactly what it reports.
pub fn assert_policy_variants(class: &'static LandClass) {
    let arena = arena();

    let mut land = filled(class, &arena, 1, &[r(0, 50)]);
    let kept = land.find_first(10, FindDelete::Keep).unwrap().unwrap();
    assert_eq!((kept.range, kept.old_range), (r(0, 50), r(0, 50)));
    assert_eq!(land.ranges().unwrap(), vec![r(0, 50)]);

    let low = land.find_first(10, FindDelete::SizeOnly).unwrap().unwrap();
    assert_eq!((low.range, low.old_range), (r(0, 10), r(0, 50)));
    let high = land.find_last(10, FindDelete::SizeOnly).unwrap().unwrap();
    assert_eq!((high.range, high.old_range), (r(40, 50), r(10, 50)));
    assert_eq!(land.ranges().unwrap(), vec![r(10, 40)]);

    let whole = land.find_largest(1, FindDelete::Entire).unwrap().unwrap();
    assert_eq!((whole.range, whole.old_range), (r(10, 40), r(10, 40)));
    assert_eq!(land.total_size().unwrap(), 0);

    let mut land = filled(class, &arena, 1, &[r(0, 10)]);
    let exact = land.find_first(10, FindDelete::SizeOnly).unwrap().unwrap();
    assert_eq!(exact.range, r(0, 10));
    assert!(land.ranges().unwrap().is_empty());
}

/// Assert contract violations are reported and leave the set unchanged.
pub fn assert_violations_rejected(class: &'static LandClass) {
    let arena = arena();
    let mut land = filled(class, &arena, 8, &[r(16, 48), r(64, 80)]);
    let before = land.ranges().unwrap();

    let cases: [(Result<Range, LandError>, &str); 6] = [
        (land.insert(r(40, 56)), "overlapping insert"),
        (land.insert(r(16, 16)), "empty insert"),
        (land.insert(r(84, 96)), "unaligned insert"),
        (land.delete(r(40, 72)), "delete spanning a gap"),
        (land.delete(r(0, 8)), "delete of absent range"),
        (land.delete(r(16, 20)), "unaligned delete"),
    ];
    for (result, what) in cases {
        let err = result.expect_err(what);
        assert!(err.is_contract_violation(), "{what}: {err}");
    }
    assert!(land.find_first(0, FindDelete::Entire).is_err());
    assert!(land.find_first(12, FindDelete::Entire).is_err());
    assert_eq!(land.ranges().unwrap(), before);
}

/// Assert iteration is repeatable and early exit is honoured.
pub fn assert_iteration_consistent(class: &'static LandClass) {
    let arena = arena();
    let land = filled(class, &arena, 8, &[r(64, 72), r(0, 8), r(32, 40)]);
    assert_eq!(land.ranges().unwrap(), land.ranges().unwrap());

    let mut visits = 0;
    let completed = land
        .iterate(|_| {
            visits += 1;
            ControlFlow::Break(())
        })
        .unwrap();
    assert!(!completed);
    assert_eq!(visits, 1);
    assert_eq!(land.total_size().unwrap(), 24);
}

/// Assert the class releases every control-pool byte on destroy.
pub fn assert_control_pool_balanced(class: &'static LandClass) {
    let arena = arena();
    let mut land = filled(class, &arena, 8, &[r(0, 8), r(16, 24), r(32, 40)]);
    land.delete(r(16, 24)).unwrap();
    assert!(arena.control_in_use() >= class.instance_size());
    land.destroy();
    assert_eq!(arena.control_in_use(), 0);
}

/// Run every compliance check against `class`.
pub fn run_full_compliance(class: &'static LandClass) {
    assert_coalesces(class);
    assert_insert_delete_inverse(class);
    assert_find_first_lowest(class);
    assert_find_largest_tie(class);
    assert_policy_variants(class);
    assert_violations_rejected(class);
    assert_iteration_consistent(class);
    assert_control_pool_balanced(class);
}
