use embedded_storage::{ReadStorage, Storage};

use super::SettingsStorage;

/// Error of the RAM backed storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfBounds;

/// Settings storage kept in RAM, for boards without EEPROM and for testing.
///
/// Starts erased (every byte 0xFF), like a fresh EEPROM.
pub struct RamStorage<const SIZE: usize> {
    data: [u8; SIZE],
    commits: usize,
}

impl<const SIZE: usize> Default for RamStorage<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const SIZE: usize> RamStorage<SIZE> {
    pub const fn new() -> Self {
        Self {
            data: [0xFF; SIZE],
            commits: 0,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// How many times the content was committed
    pub fn commits(&self) -> usize {
        self.commits
    }

    fn range(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, OutOfBounds> {
        let start = offset as usize;
        match start.checked_add(len) {
            Some(end) if end <= SIZE => Ok(start..end),
            _ => Err(OutOfBounds),
        }
    }
}

impl<const SIZE: usize> ReadStorage for RamStorage<SIZE> {
    type Error = OutOfBounds;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        SIZE
    }
}

impl<const SIZE: usize> Storage for RamStorage<SIZE> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        let range = self.range(offset, bytes.len())?;
        self.data[range].copy_from_slice(bytes);
        Ok(())
    }
}

impl<const SIZE: usize> SettingsStorage for RamStorage<SIZE> {
    fn commit(&mut self) -> Result<(), Self::Error> {
        self.commits += 1;
        Ok(())
    }
}
