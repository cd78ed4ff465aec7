//! Keyswitch events as delivered by the matrix scan.

use bitfield_struct::bitfield;

/// State of a keyswitch in the current scan cycle.
///
/// A key that stays down is reported every cycle with both `is_pressed` and
/// `was_pressed` set. Events generated by the firmware itself carry `injected`.
#[bitfield(u8, defmt = cfg(feature = "defmt"))]
#[derive(Eq, PartialEq)]
pub struct KeySwitchState {
    #[bits(1)]
    pub is_pressed: bool,
    #[bits(1)]
    pub was_pressed: bool,
    #[bits(1)]
    pub injected: bool,
    #[bits(5)]
    _reserved: u8,
}

impl KeySwitchState {
    /// Physical press in this cycle
    pub const PRESSED: Self = Self::new().with_is_pressed(true);
    /// Still down since an earlier cycle
    pub const HELD: Self = Self::new().with_is_pressed(true).with_was_pressed(true);
    /// Physical release in this cycle
    pub const RELEASED: Self = Self::new().with_was_pressed(true);

    pub const fn toggled_on(&self) -> bool {
        self.is_pressed() && !self.was_pressed()
    }

    pub const fn toggled_off(&self) -> bool {
        !self.is_pressed() && self.was_pressed()
    }

    /// Same state, marked as generated by the firmware
    pub const fn as_injected(self) -> Self {
        self.with_injected(true)
    }
}

/// Physical position of a key in the matrix.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyAddr {
    pub row: u8,
    pub col: u8,
}

impl KeyAddr {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}
