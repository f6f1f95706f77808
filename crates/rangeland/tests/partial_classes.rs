//! Integration test: dispatch through partially implemented classes.
//!
//! A class that overrides only some operations must still expose the full
//! Land surface, with the rest reporting `Unimplemented`. A class whose
//! initialiser fails must leave the arena's control pool as it found it.

use std::ops::ControlFlow;

use rangeland::{ArgList, Land, LandConfig, LandError, ABSTRACT_LAND};
use rangeland_core::{FindDelete, ZoneSet};
use rangeland_test_utils::classes::{FAILING_INIT, FIRST_FIT_ONLY};
use rangeland_test_utils::{land_of, land_with, r, small_arena};

fn is_unimplemented(err: &LandError, class: &str, operation: &str) -> bool {
    matches!(err, LandError::Unimplemented { class: c, operation: o } if *c == class && *o == operation)
}

// ── FirstFitOnly ────────────────────────────────────────────────

#[test]
fn partial_class_supports_its_operations() {
    let arena = small_arena();
    let mut land = land_with(&FIRST_FIT_ONLY, &arena, 8, &[r(64, 128), r(0, 16)]);
    assert_eq!(land.insert(r(16, 32)).unwrap(), r(0, 32));

    let found = land.find_first(24, FindDelete::SizeOnly).unwrap().unwrap();
    assert_eq!(found.range, r(0, 24));
    assert_eq!(found.old_range, r(0, 32));

    let found = land.find_first(16, FindDelete::Keep).unwrap().unwrap();
    assert_eq!(found.range, r(64, 128));
}

#[test]
fn partial_class_reports_missing_operations() {
    let arena = small_arena();
    let mut land = land_with(&FIRST_FIT_ONLY, &arena, 8, &[r(0, 64)]);

    let err = land.delete(r(0, 8)).unwrap_err();
    assert!(is_unimplemented(&err, "FirstFitOnly", "delete"), "{err}");
    let err = land.iterate(|_| ControlFlow::Continue(())).unwrap_err();
    assert!(is_unimplemented(&err, "FirstFitOnly", "iterate"), "{err}");
    let err = land.find_last(8, FindDelete::Keep).unwrap_err();
    assert!(is_unimplemented(&err, "FirstFitOnly", "find_last"), "{err}");
    let err = land.find_largest(8, FindDelete::Keep).unwrap_err();
    assert!(is_unimplemented(&err, "FirstFitOnly", "find_largest"), "{err}");
    let err = land.find_in_zones(8, ZoneSet::UNIV, false).unwrap_err();
    assert!(is_unimplemented(&err, "FirstFitOnly", "find_in_zones"), "{err}");
    assert!(!err.is_contract_violation());

    // Queries built on iterate inherit its gap.
    assert!(land.ranges().is_err());
    assert!(land.total_size().is_err());
}

#[test]
fn partial_class_still_rejects_bad_input() {
    let arena = small_arena();
    let mut land = land_with(&FIRST_FIT_ONLY, &arena, 8, &[r(0, 64)]);
    assert!(matches!(
        land.insert(r(32, 96)),
        Err(LandError::Overlap { .. })
    ));
    assert!(matches!(
        land.insert(r(100, 104)),
        Err(LandError::Misaligned { .. })
    ));
    // Preconditions are checked before dispatch, so even an unimplemented
    // operation reports the contract violation first.
    assert!(matches!(
        land.delete(r(0, 0)),
        Err(LandError::EmptyRange { .. })
    ));
}

#[test]
fn partial_class_describe_uses_default_dump() {
    let arena = small_arena();
    let land = land_of(&FIRST_FIT_ONLY, &arena, 8);
    let text = land.to_string();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[1].starts_with("  class \"FirstFitOnly\""));
    assert!(land.check().is_ok());
}

// ── Abstract and failing classes ────────────────────────────────

#[test]
fn abstract_class_has_no_operations() {
    let arena = small_arena();
    let mut land = land_of(&ABSTRACT_LAND, &arena, 8);
    let err = land.insert(r(0, 8)).unwrap_err();
    assert!(is_unimplemented(&err, "LAND", "insert"), "{err}");
}

#[test]
fn failing_init_rolls_back_instance_storage() {
    let arena = small_arena();
    let before = arena.control_in_use();
    let err = Land::create(&FAILING_INIT, &arena, &LandConfig::default(), &ArgList::new())
        .unwrap_err();
    assert!(matches!(err, LandError::InvalidArgument { .. }));
    assert_eq!(arena.control_in_use(), before);
}

#[test]
fn failing_init_after_exhaustion_reports_allocation() {
    let arena = rangeland::Arena::new(rangeland::ArenaConfig::new(16)).unwrap();
    let err = Land::create(&FAILING_INIT, &arena, &LandConfig::default(), &ArgList::new())
        .unwrap_err();
    assert!(matches!(err, LandError::AllocationFailed { .. }));
    assert_eq!(arena.control_in_use(), 0);
}
