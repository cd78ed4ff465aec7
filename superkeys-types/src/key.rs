//! Raw key codes.
//!
//! Every slot of the super key map stores one 16-bit code. Plain keyboard keys
//! keep their HID usage in the low byte, everything else lives in one of the
//! reserved ranges below.

/// A raw key code, as stored in the settings area and exchanged with the configurator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Key(pub u16);

impl Key {
    /// Reserved "no key" code. Terminates an action list in the super key map.
    pub const NO_KEY: Self = Self(0x0000);
    /// Transparent key. Also the value of an erased storage cell.
    pub const TRANSPARENT: Self = Self(0xFFFF);
    /// Consumer control: volume increment.
    pub const VOLUME_UP: Self = Self(23785);
    /// Consumer control: volume decrement.
    pub const VOLUME_DOWN: Self = Self(23786);

    /// Size of a stored key code in bytes.
    pub const SIZE: usize = 2;

    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Key code of the keyboard usage `code` without any flags
    pub const fn hid(code: u8) -> Self {
        Self(code as u16)
    }

    /// Key code of the super key with the given ordinal
    pub const fn super_key(ordinal: u8) -> Self {
        Self(SUPER_KEY.first + ordinal as u16)
    }

    pub const fn is_no_key(self) -> bool {
        self.0 == Self::NO_KEY.0
    }

    /// `true` for codes that never bind an action: the sentinel and transparent
    pub const fn is_unbound(self) -> bool {
        self.0 == Self::NO_KEY.0 || self.0 == Self::TRANSPARENT.0
    }

    /// Returns the super key ordinal if this code is inside the super key range
    pub const fn super_key_ordinal(self) -> Option<u8> {
        match SUPER_KEY.offset_of(self) {
            Some(ordinal) => Some(ordinal as u8),
            None => None,
        }
    }

    /// Keys whose held repetition needs an explicit report flush on every repeat
    pub const fn is_repeatable(self) -> bool {
        self.0 == Self::VOLUME_UP.0 || self.0 == Self::VOLUME_DOWN.0
    }
}

impl From<u16> for Key {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Key> for u16 {
    fn from(key: Key) -> Self {
        key.0
    }
}

/// An inclusive range of reserved key codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyRange {
    pub first: u16,
    pub last: u16,
}

impl KeyRange {
    pub const fn new(first: u16, last: u16) -> Self {
        Self { first, last }
    }

    pub const fn contains(&self, key: Key) -> bool {
        key.0 >= self.first && key.0 <= self.last
    }

    /// Offset of `key` from the start of the range, `None` if it's outside
    pub const fn offset_of(&self, key: Key) -> Option<u16> {
        if self.contains(key) {
            Some(key.0 - self.first)
        } else {
            None
        }
    }

    pub const fn len(&self) -> usize {
        (self.last - self.first) as usize + 1
    }
}

/// Momentarily shift to layer 0..=9
pub const LAYER_SHIFT: KeyRange = KeyRange::new(17450, 17459);
/// Move to layer 0..=9
pub const LAYER_MOVE: KeyRange = KeyRange::new(17492, 17501);
/// Play one of the dynamic macros
pub const MACRO: KeyRange = KeyRange::new(53852, 53979);
/// Super keys
pub const SUPER_KEY: KeyRange = KeyRange::new(53980, 54107);
