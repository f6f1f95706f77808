//! Core value types for the rangeland workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary every Land implementation speaks: addresses and
//! alignments, half-open address ranges, coarse zone sets, find
//! policies, and the shared error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod addr;
pub mod error;
pub mod find;
pub mod range;
pub mod zone;

pub use addr::{Addr, Align};
pub use error::LandError;
pub use find::{FindDelete, Found};
pub use range::Range;
pub use zone::ZoneSet;
