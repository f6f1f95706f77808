//! Partial Land classes for dispatch-layer tests.

use rangeland::{ArgList, LandBackend, LandClass, LandContext, LAND_HEADER_SIZE};
use rangeland_core::{FindDelete, Found, LandError, Range};

/// A class that supports only `insert` and `find_first`.
///
/// Ranges live in an unsorted `Vec`. Every other operation falls through
/// to the abstract defaults and reports `Unimplemented`.
pub static FIRST_FIT_ONLY: LandClass =
    LandClass::inherit("FirstFitOnly", LAND_HEADER_SIZE + 24, first_fit_init);

/// A class whose initialiser always fails.
pub static FAILING_INIT: LandClass =
    LandClass::inherit("FailingInit", LAND_HEADER_SIZE + 64, failing_init);

fn first_fit_init(
    _cx: &LandContext<'_>,
    _args: &ArgList,
) -> Result<Box<dyn LandBackend>, LandError> {
    Ok(Box::new(FirstFitOnly::default()))
}

fn failing_init(_cx: &LandContext<'_>, _args: &ArgList) -> Result<Box<dyn LandBackend>, LandError> {
    Err(LandError::InvalidArgument {
        reason: "FailingInit never initialises".to_string(),
    })
}

#[derive(Default)]
struct FirstFitOnly {
    ranges: Vec<Range>,
}

impl LandBackend for FirstFitOnly {
    fn insert(&mut self, _cx: &LandContext<'_>, range: Range) -> Result<Range, LandError> {
        if let Some(existing) = self.ranges.iter().find(|r| r.overlaps(&range)) {
            return Err(LandError::Overlap {
                range,
                existing: *existing,
            });
        }
        let mut merged = range;
        self.ranges.retain(|r| {
            if r.abuts(&merged) {
                merged = merged.hull(r);
                false
            } else {
                true
            }
        });
        self.ranges.push(merged);
        Ok(merged)
    }

    fn find_first(
        &mut self,
        _cx: &LandContext<'_>,
        size: usize,
        policy: FindDelete,
    ) -> Result<Option<Found>, LandError> {
        let Some(idx) = self
            .ranges
            .iter()
            .enumerate()
            .filter(|(_, r)| r.size() >= size)
            .min_by_key(|(_, r)| r.base())
            .map(|(idx, _)| idx)
        else {
            return Ok(None);
        };
        let block = self.ranges[idx];
        let range = match policy {
            FindDelete::Keep | FindDelete::Entire => block,
            FindDelete::SizeOnly => block.low_slice(size),
        };
        match policy {
            FindDelete::Keep => {}
            FindDelete::Entire => {
                self.ranges.swap_remove(idx);
            }
            FindDelete::SizeOnly => {
                let rest = Range::new(range.limit(), block.limit())?;
                if rest.is_empty() {
                    self.ranges.swap_remove(idx);
                } else {
                    self.ranges[idx] = rest;
                }
            }
        }
        Ok(Some(Found {
            range,
            old_range: block,
        }))
    }
}
