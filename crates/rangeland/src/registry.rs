//! Name-indexed registry of Land classes.

use indexmap::IndexMap;
use rangeland_core::LandError;
use tracing::debug;

use crate::class::{LandClass, ABSTRACT_LAND};
use crate::range_list::RANGE_LIST;

/// Lookup table from class name to descriptor.
///
/// Lets callers pick a backing store from configuration text. Iteration
/// follows registration order.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: IndexMap<&'static str, &'static LandClass>,
}

impl ClassRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every class this crate defines.
    pub fn with_builtin() -> Self {
        let mut classes = IndexMap::new();
        for class in [&ABSTRACT_LAND, &RANGE_LIST] {
            classes.insert(class.name(), class);
        }
        Self { classes }
    }

    /// Add a class.
    ///
    /// The descriptor is checked first. A second class with the same name
    /// is rejected; registering the same descriptor twice is a no-op.
    pub fn register(&mut self, class: &'static LandClass) -> Result<(), LandError> {
        class.check()?;
        match self.classes.get(class.name()) {
            Some(existing) if std::ptr::eq(*existing, class) => Ok(()),
            Some(_) => Err(LandError::InvalidClass {
                reason: format!("{:?}: name already registered", class.name()),
            }),
            None => {
                self.classes.insert(class.name(), class);
                debug!(class = class.name(), "land class registered");
                Ok(())
            }
        }
    }

    /// Look a class up by name.
    pub fn get(&self, name: &str) -> Option<&'static LandClass> {
        self.classes.get(name).copied()
    }

    /// Registered classes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &'static LandClass> + '_ {
        self.classes.values().copied()
    }

    /// Number of registered classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Whether no class is registered.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
