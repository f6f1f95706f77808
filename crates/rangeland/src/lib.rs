//! Polymorphic sets of disjoint address ranges ("Lands").
//!
//! A Land tracks a collection of disjoint, aligned, half-open address
//! ranges, typically the free space of an arena. The same operation set
//! (insert, delete, first/last/largest-fit search, zone-constrained
//! search, iteration, structural check, diagnostic dump) is offered no
//! matter which data structure backs a particular Land.
//!
//! # Architecture
//!
//! ```text
//! Land (dispatch + lifecycle, borrows &Arena)
//! ├── &'static LandClass (name, instance size, init fn, parent link)
//! ├── Box<dyn LandBackend> (class-specific store; trait defaults = abstract base)
//! └── ControlGrant (instance storage reserved from the arena control pool)
//! ```
//!
//! # Classes
//!
//! - [`ABSTRACT_LAND`]: the root class; every operation is unimplemented.
//! - [`RANGE_LIST`]: sorted, coalesced `Vec` of ranges.
//!
//! New classes are declared as statics with [`LandClass::inherit`] and a
//! [`LandBackend`] implementation that overrides the supported operations.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod arena;
pub mod args;
pub mod backend;
pub mod class;
pub mod config;
pub mod land;
pub mod range_list;
pub mod registry;

#[cfg(test)]
pub(crate) mod compliance;

pub use arena::{Arena, ArenaId, ControlGrant};
pub use args::{Arg, ArgList};
pub use backend::{LandBackend, LandContext, Visitor};
pub use class::{InitFn, LandClass, ABSTRACT_LAND};
pub use config::{ArenaConfig, LandConfig};
pub use land::{Land, LandId, LAND_HEADER_SIZE};
pub use range_list::{RangeList, RANGE_LIST};
pub use registry::ClassRegistry;

pub use rangeland_core::{Addr, Align, FindDelete, Found, LandError, Range, ZoneSet};
