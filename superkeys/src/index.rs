use core::ops::Range;

use heapless::Vec;
use superkeys_types::key::Key;

/// Byte offsets of every super key list in the stored map.
///
/// Derived from the map by a linear scan and rebuilt whenever the map changes.
/// Entry `i` is the offset right after the sentinel closing list `i`, so list `i`
/// spans from the end of list `i - 1` (or 0) to entry `i`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OffsetIndex<const N: usize> {
    pub(crate) ends: Vec<u16, N>,
    /// Offset right after the last list of the map, indexed or not
    pub(crate) end: u16,
    pub(crate) terminated: bool,
}

impl<const N: usize> OffsetIndex<N> {
    pub const fn new() -> Self {
        Self {
            ends: Vec::new(),
            end: 0,
            terminated: false,
        }
    }

    /// Number of super keys defined in the map
    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    /// Whether the scan found the double sentinel closing the map
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Byte span of list `list`, including its sentinel
    pub fn list(&self, list: usize) -> Option<Range<u16>> {
        let end = *self.ends.get(list)?;
        let start = if list == 0 { 0 } else { self.ends[list - 1] };
        Some(start..end)
    }

    /// Offset right after the last list stored, including lists beyond `N`.
    /// The terminating sentinel lives here.
    pub fn data_end(&self) -> u16 {
        self.end
    }

    /// Offset of action slot `slot` of list `list`, if the list is long enough.
    pub fn slot_offset(&self, list: usize, slot: usize) -> Option<u16> {
        let span = self.list(list)?;
        let pos = span.start as usize + slot * Key::SIZE;
        // The last code of a list is its sentinel
        if pos + Key::SIZE < span.end as usize {
            Some(pos as u16)
        } else {
            None
        }
    }
}
