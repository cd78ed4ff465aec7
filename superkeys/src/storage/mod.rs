pub mod map;
pub mod ram;

use byteorder::{ByteOrder, LittleEndian};
use embedded_storage::Storage;
use superkeys_types::key::Key;

use crate::config::TimingConfig;
use crate::error::Error;

/// Size of the settings header in front of the super key map.
///
/// Layout, little endian: `wait_for: u16`, `time_out: u16`, `hold_start: u16`, `repeat_interval: u8`.
pub const HEADER_SIZE: u32 = 7;

const WAIT_FOR_ADDR: usize = 0;
const TIME_OUT_ADDR: usize = 2;
const HOLD_START_ADDR: usize = 4;
const REPEAT_ADDR: usize = 6;

/// Byte addressable storage holding the settings.
///
/// EEPROM emulations that buffer writes in RAM flush them in `commit`.
pub trait SettingsStorage: Storage {
    fn commit(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A slice of the settings storage, claimed once at setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StorageRegion {
    pub base: u32,
    pub len: u32,
}

/// Hands out consecutive regions of a shared settings area.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsArena {
    next: u32,
    end: u32,
}

impl SettingsArena {
    pub const fn new(start: u32, capacity: u32) -> Self {
        Self {
            next: start,
            end: start + capacity,
        }
    }

    /// Claim `len` bytes. Regions are never returned or resized.
    pub fn request_slice(&mut self, len: u32) -> Result<StorageRegion, Error> {
        if self.end - self.next < len {
            error!("Settings arena exhausted, requested {} bytes, {} left", len, self.end - self.next);
            return Err(Error::RegionExhausted);
        }
        let region = StorageRegion { base: self.next, len };
        self.next += len;
        Ok(region)
    }

    /// Bytes not claimed yet
    pub fn remaining(&self) -> u32 {
        self.end - self.next
    }
}

/// Settings region of the super keys: timing header followed by the map.
pub struct SuperKeyStore<S: SettingsStorage> {
    storage: S,
    region: StorageRegion,
}

impl<S: SettingsStorage> SuperKeyStore<S> {
    /// Wrap an already claimed region. It must be larger than the header.
    pub fn new(storage: S, region: StorageRegion) -> Result<Self, Error> {
        if region.len <= HEADER_SIZE {
            error!("Super key region of {} bytes can't hold the header", region.len);
            return Err(Error::OutOfRange);
        }
        Ok(Self { storage, region })
    }

    /// Claim a region with room for `map_size` bytes of map from the arena.
    pub fn setup(storage: S, arena: &mut SettingsArena, map_size: u16) -> Result<Self, Error> {
        let region = arena.request_slice(map_size as u32 + HEADER_SIZE)?;
        Self::new(storage, region)
    }

    pub fn region(&self) -> StorageRegion {
        self.region
    }

    /// Size of the map area in bytes, always a whole number of key codes
    pub fn map_size(&self) -> u16 {
        let size = (self.region.len - HEADER_SIZE).min(u16::MAX as u32) as u16;
        size & !1
    }

    /// Number of key codes the map area can hold
    pub fn map_capacity(&self) -> usize {
        self.map_size() as usize / Key::SIZE
    }

    /// Access the underlying storage
    pub fn storage(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Read the timing header. Erased fields fall back to the defaults.
    pub fn read_timing(&mut self) -> Result<TimingConfig, Error> {
        let mut buf = [0u8; HEADER_SIZE as usize];
        self.read(self.region.base, &mut buf)?;

        let default = TimingConfig::default();
        let field = |addr: usize, fallback: u16| match LittleEndian::read_u16(&buf[addr..addr + 2]) {
            u16::MAX => fallback,
            v => v,
        };
        Ok(TimingConfig {
            wait_for: field(WAIT_FOR_ADDR, default.wait_for),
            time_out: field(TIME_OUT_ADDR, default.time_out),
            hold_start: field(HOLD_START_ADDR, default.hold_start),
            repeat_interval: match buf[REPEAT_ADDR] {
                u8::MAX => default.repeat_interval,
                v => v,
            },
        })
    }

    /// Write the whole timing header.
    ///
    /// The erased values (`0xFFFF`, `0xFF` for the repeat interval) can't be
    /// stored, they would read back as the defaults.
    pub fn write_timing(&mut self, timing: &TimingConfig) -> Result<(), Error> {
        let erased = [timing.wait_for, timing.time_out, timing.hold_start].contains(&u16::MAX)
            || timing.repeat_interval == u8::MAX;
        if erased {
            warn!("Super key timing {:?} uses a reserved value", timing);
            return Err(Error::InvalidArgument);
        }
        let mut buf = [0u8; HEADER_SIZE as usize];
        LittleEndian::write_u16(&mut buf[WAIT_FOR_ADDR..], timing.wait_for);
        LittleEndian::write_u16(&mut buf[TIME_OUT_ADDR..], timing.time_out);
        LittleEndian::write_u16(&mut buf[HOLD_START_ADDR..], timing.hold_start);
        buf[REPEAT_ADDR] = timing.repeat_interval;
        debug!("Writing super key timing: {:?}", timing);
        self.write(self.region.base, &buf)
    }

    /// Read the key code at byte offset `pos` of the map
    pub fn read_code(&mut self, pos: u16) -> Result<Key, Error> {
        let addr = self.map_addr(pos)?;
        let mut buf = [0u8; Key::SIZE];
        self.read(addr, &mut buf)?;
        Ok(Key(LittleEndian::read_u16(&buf)))
    }

    /// Write a key code at byte offset `pos` of the map
    pub fn write_code(&mut self, pos: u16, key: Key) -> Result<(), Error> {
        let addr = self.map_addr(pos)?;
        let mut buf = [0u8; Key::SIZE];
        LittleEndian::write_u16(&mut buf, key.raw());
        self.write(addr, &buf)
    }

    pub fn commit(&mut self) -> Result<(), Error> {
        self.storage.commit().map_err(|_| {
            print_storage_error("commit", self.region.base);
            Error::Storage
        })
    }

    fn map_addr(&self, pos: u16) -> Result<u32, Error> {
        if pos as usize + Key::SIZE > self.map_size() as usize {
            return Err(Error::OutOfRange);
        }
        Ok(self.region.base + HEADER_SIZE + pos as u32)
    }

    fn read(&mut self, addr: u32, buf: &mut [u8]) -> Result<(), Error> {
        self.storage.read(addr, buf).map_err(|_| {
            print_storage_error("read", addr);
            Error::Storage
        })
    }

    fn write(&mut self, addr: u32, buf: &[u8]) -> Result<(), Error> {
        self.storage.write(addr, buf).map_err(|_| {
            print_storage_error("write", addr);
            Error::Storage
        })
    }
}

pub(crate) fn print_storage_error(op: &str, addr: u32) {
    error!("Storage {} failed at {}", op, addr);
}
