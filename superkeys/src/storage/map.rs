//! Encoding of the super key map.
//!
//! The map is a flat run of 2-byte key codes. Each super key owns one list of
//! action slots closed by a `Key::NO_KEY` sentinel, and a sentinel right after
//! another sentinel closes the whole map:
//!
//! ```text
//! [A, B, 0] [C, 0] [0]
//!  list 0    list 1 end of map
//! ```

use superkeys_types::key::Key;

use super::{SettingsStorage, SuperKeyStore};
use crate::error::Error;
use crate::index::OffsetIndex;

impl<S: SettingsStorage> SuperKeyStore<S> {
    /// Scan the map and build the offset index.
    ///
    /// Stops at the double sentinel, or at the end of the region for a map that
    /// was never terminated. Lists beyond the capacity `N` are not indexed, but
    /// still count towards the end of the map so that [`Self::store`] keeps them.
    pub fn scan<const N: usize>(&mut self) -> Result<OffsetIndex<N>, Error> {
        let mut index = OffsetIndex::new();
        let map_size = self.map_size();
        let mut pos = 0u16;
        let mut previous_ended = false;
        let mut dropped = 0usize;

        while pos < map_size {
            let key = self.read_code(pos)?;
            pos += Key::SIZE as u16;

            if !key.is_no_key() {
                previous_ended = false;
                continue;
            }
            if previous_ended {
                index.terminated = true;
                break;
            }
            if index.ends.push(pos).is_err() {
                dropped += 1;
            }
            index.end = pos;
            previous_ended = true;
        }

        if dropped > 0 {
            warn!("Super key map holds {} more lists than the {} supported", dropped, N);
        }
        if !index.terminated {
            warn!("Super key map isn't terminated, {} lists indexed", index.len());
        }
        Ok(index)
    }

    /// Replace the list at `list` with `codes`, moving every following list.
    ///
    /// `list` can be one past the last list to append. A trailing sentinel in
    /// `codes` is optional, any other sentinel is rejected. When the moved tail
    /// doesn't fit anymore it is truncated. The caller has to rebuild the index.
    pub fn store<const N: usize>(&mut self, index: &OffsetIndex<N>, list: usize, codes: &[Key]) -> Result<(), Error> {
        let codes = match codes.split_last() {
            Some((last, init)) if last.is_no_key() => init,
            _ => codes,
        };
        if codes.iter().any(|k| k.is_no_key()) {
            return Err(Error::InvalidList);
        }
        if list > index.len() || list >= N {
            return Err(Error::OutOfRange);
        }

        let start = match list {
            0 => 0,
            _ => index.ends[list - 1],
        };
        let old_end = index.ends.get(list).copied().unwrap_or(start);
        let data_end = index.data_end();

        // A lone sentinel following another sentinel would close the map early
        let placeholder = [Key::TRANSPARENT];
        let codes = if codes.is_empty() && list > 0 { &placeholder[..] } else { codes };

        let map_size = self.map_size() as usize;
        let new_end = start as usize + (codes.len() + 1) * Key::SIZE;
        if new_end > map_size {
            warn!("Super key list {} of {} codes doesn't fit the map", list, codes.len());
            return Err(Error::OutOfRange);
        }

        let tail = (data_end - old_end) as usize;
        let moved = tail.min(map_size - new_end);
        if moved < tail {
            warn!("Super key map full, dropping {} bytes after list {}", tail - moved, list);
        }
        self.move_codes(old_end, new_end as u16, moved as u16)?;

        debug!("Storing super key list {} at {}: {:?}", list, start, codes);
        let mut pos = start;
        for &key in codes {
            self.write_code(pos, key)?;
            pos += Key::SIZE as u16;
        }
        self.write_code(pos, Key::NO_KEY)?;

        // Close the map after the moved lists
        let terminator = new_end + moved;
        if terminator + Key::SIZE <= map_size {
            self.write_code(terminator as u16, Key::NO_KEY)?;
        }
        Ok(())
    }

    /// Overwrite the map with raw codes, starting at offset 0.
    ///
    /// Codes are written as given, it's up to the writer to terminate the map.
    /// Returns the number of codes written.
    pub fn write_map<I>(&mut self, codes: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = Key>,
    {
        let mut written = 0;
        for key in codes {
            self.write_code((written * Key::SIZE) as u16, key)?;
            written += 1;
        }
        debug!("Wrote {} super key map codes", written);
        Ok(written)
    }

    /// Iterate every code of the map area, in storage order
    pub fn read_map(&mut self) -> MapCodes<'_, S> {
        MapCodes { store: self, pos: 0 }
    }

    /// Move `len` bytes of codes from `from` to `to`, overlapping ranges allowed
    fn move_codes(&mut self, from: u16, to: u16, len: u16) -> Result<(), Error> {
        let step = Key::SIZE as u16;
        if to > from {
            let mut i = len;
            while i >= step {
                i -= step;
                let key = self.read_code(from + i)?;
                self.write_code(to + i, key)?;
            }
        } else if to < from {
            let mut i = 0;
            while i + step <= len {
                let key = self.read_code(from + i)?;
                self.write_code(to + i, key)?;
                i += step;
            }
        }
        Ok(())
    }
}

/// Iterator over the stored map codes, see [`SuperKeyStore::read_map`]
pub struct MapCodes<'a, S: SettingsStorage> {
    store: &'a mut SuperKeyStore<S>,
    pos: u16,
}

impl<S: SettingsStorage> Iterator for MapCodes<'_, S> {
    type Item = Result<Key, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.store.map_size() {
            return None;
        }
        let key = self.store.read_code(self.pos);
        self.pos += Key::SIZE as u16;
        Some(key)
    }
}
