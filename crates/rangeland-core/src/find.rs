//! Find policies and results shared by every Land search.

use crate::range::Range;

/// What a find operation does with the range it locates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FindDelete {
    /// Leave the set untouched; the whole matching range is reported.
    #[default]
    Keep,
    /// Delete the whole matching range from the set.
    Entire,
    /// Delete exactly the requested size from one end of the matching
    /// range. First-fit and largest-fit take from the low end, last-fit
    /// from the high end. A block consumed completely is deleted.
    SizeOnly,
}

/// Outcome of a successful find.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct Found {
    /// The range handed to the caller. Under [`FindDelete::SizeOnly`]
    /// this is exactly the requested size; otherwise it is the whole
    /// matching block.
    pub range: Range,
    /// The block that contained `range` before any deletion.
    pub old_range: Range,
}

impl Found {
    /// Size of the range handed to the caller.
    pub fn size(&self) -> usize {
        self.range.size()
    }
}
