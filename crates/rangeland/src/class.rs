//! Land class descriptors and the single-level class hierarchy.
//!
//! A [`LandClass`] is a process-wide, immutable `static` that names a
//! backing-store strategy and knows how to build one. Descriptors can
//! only be made with [`LandClass::inherit`], which stamps the protocol
//! signature and links the class under [`ABSTRACT_LAND`].

use std::fmt;
use std::ptr;

use rangeland_core::LandError;

use crate::args::ArgList;
use crate::backend::{AbstractBackend, LandBackend, LandContext};
use crate::land::LAND_HEADER_SIZE;

/// Class initialiser: consumes the class-specific arguments and builds
/// the backing store.
pub type InitFn = fn(&LandContext<'_>, &ArgList) -> Result<Box<dyn LandBackend>, LandError>;

#[derive(Clone, Copy, PartialEq, Eq)]
struct ClassSig(u32);

const LAND_CLASS_SIG: ClassSig = ClassSig(0x519C_1A55);

/// Type descriptor for a family of Lands.
pub struct LandClass {
    name: &'static str,
    instance_size: usize,
    init: InitFn,
    parent: Option<&'static LandClass>,
    sig: ClassSig,
}

/// The abstract base class. Its Lands support no operations: every
/// search, mutation and iteration reports [`LandError::Unimplemented`].
pub static ABSTRACT_LAND: LandClass = LandClass {
    name: "LAND",
    instance_size: LAND_HEADER_SIZE,
    init: abstract_init,
    parent: None,
    sig: LAND_CLASS_SIG,
};

fn abstract_init(
    _cx: &LandContext<'_>,
    _args: &ArgList,
) -> Result<Box<dyn LandBackend>, LandError> {
    Ok(Box::new(AbstractBackend))
}

impl LandClass {
    /// Derive a concrete class from [`ABSTRACT_LAND`].
    ///
    /// `instance_size` is the number of control-pool bytes each instance
    /// reserves; it must be at least [`LAND_HEADER_SIZE`].
    pub const fn inherit(name: &'static str, instance_size: usize, init: InitFn) -> Self {
        Self {
            name,
            instance_size,
            init,
            parent: Some(&ABSTRACT_LAND),
            sig: LAND_CLASS_SIG,
        }
    }

    /// Human-readable class name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Control-pool bytes reserved per instance.
    pub fn instance_size(&self) -> usize {
        self.instance_size
    }

    /// The class this one was derived from, `None` for the root.
    pub fn parent(&self) -> Option<&'static LandClass> {
        self.parent
    }

    /// Whether `self` is `ancestor` or derives from it.
    pub fn is_subclass_of(&self, ancestor: &LandClass) -> bool {
        let mut class = Some(self);
        while let Some(c) = class {
            if ptr::eq(c, ancestor) {
                return true;
            }
            class = c.parent;
        }
        false
    }

    /// Check the descriptor is well formed.
    pub fn check(&self) -> Result<(), LandError> {
        if self.sig != LAND_CLASS_SIG {
            return Err(self.invalid("bad signature"));
        }
        if self.name.is_empty() {
            return Err(self.invalid("empty name"));
        }
        if self.instance_size < LAND_HEADER_SIZE {
            return Err(self.invalid(&format!(
                "instance size {} is smaller than the land header ({LAND_HEADER_SIZE})",
                self.instance_size
            )));
        }
        if !self.is_subclass_of(&ABSTRACT_LAND) {
            return Err(self.invalid("not derived from the abstract land class"));
        }
        Ok(())
    }

    /// Run the class initialiser.
    pub(crate) fn init(
        &self,
        cx: &LandContext<'_>,
        args: &ArgList,
    ) -> Result<Box<dyn LandBackend>, LandError> {
        (self.init)(cx, args)
    }

    fn invalid(&self, reason: &str) -> LandError {
        LandError::InvalidClass {
            reason: format!("{:?}: {reason}", self.name),
        }
    }
}

impl fmt::Debug for LandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LandClass")
            .field("name", &self.name)
            .field("instance_size", &self.instance_size)
            .field("parent", &self.parent.map(|p| p.name))
            .finish()
    }
}

impl fmt::Display for LandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
