//! Class-specific constructor arguments.

use smallvec::SmallVec;

use rangeland_core::LandError;

/// A single keyed constructor argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Arg {
    /// Expected number of blocks; lets a backing store pre-size itself.
    Capacity(usize),
    /// A class-defined argument not known to this crate.
    Custom {
        /// Argument key. Must be unique within an [`ArgList`].
        key: &'static str,
        /// Argument value.
        value: usize,
    },
}

impl Arg {
    /// The key under which this argument is looked up.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Capacity(_) => "capacity",
            Self::Custom { key, .. } => *key,
        }
    }
}

/// An ordered list of constructor arguments for a Land class.
///
/// Classes look arguments up by key and reject keys they do not
/// understand. Most Lands take zero to two arguments, so the list lives
/// inline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArgList {
    args: SmallVec<[Arg; 4]>,
}

impl ArgList {
    /// An empty argument list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with(mut self, arg: Arg) -> Self {
        self.args.push(arg);
        self
    }

    /// Append an argument.
    pub fn push(&mut self, arg: Arg) {
        self.args.push(arg);
    }

    /// Look up an argument by key.
    pub fn get(&self, key: &str) -> Option<&Arg> {
        self.args.iter().find(|arg| arg.key() == key)
    }

    /// Iterate over the arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.args.iter()
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Whether the list holds no arguments.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Check the list is well formed: no key appears twice and no key is
    /// empty.
    pub fn check(&self) -> Result<(), LandError> {
        for (i, arg) in self.args.iter().enumerate() {
            if arg.key().is_empty() {
                return Err(LandError::InvalidArgument {
                    reason: "argument with empty key".to_string(),
                });
            }
            if self.args[i + 1..].iter().any(|other| other.key() == arg.key()) {
                return Err(LandError::InvalidArgument {
                    reason: format!("duplicate argument '{}'", arg.key()),
                });
            }
        }
        Ok(())
    }
}

impl FromIterator<Arg> for ArgList {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().collect(),
        }
    }
}
