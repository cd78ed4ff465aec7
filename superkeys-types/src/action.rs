//! Actions bound to super key slots.
//!
//! Stored key codes are decoded exactly once, when a slot is read, so the rest
//! of the engine never compares raw code ranges.

use crate::key::{Key, LAYER_MOVE, LAYER_SHIFT, MACRO};

/// A single action that a super key slot can execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// An ordinary key, injected into the keyboard as if it was pressed.
    Key(Key),
    /// Move to a layer, replacing the active layer stack.
    LayerMove(u8),
    /// Activate a layer while the action is held, deactivate it on release.
    LayerShift(u8),
    /// Play a dynamic macro by id.
    MacroPlay(u8),
}

impl Action {
    /// Decode a stored key code.
    ///
    /// Returns `None` for codes that don't bind anything (`NO_KEY`, `TRANSPARENT`).
    /// Ranges are checked in order: layer move, layer shift, macro, then any other
    /// code is an ordinary key.
    pub const fn decode(key: Key) -> Option<Self> {
        if key.is_unbound() {
            return None;
        }
        if let Some(layer) = LAYER_MOVE.offset_of(key) {
            return Some(Action::LayerMove(layer as u8));
        }
        if let Some(layer) = LAYER_SHIFT.offset_of(key) {
            return Some(Action::LayerShift(layer as u8));
        }
        if let Some(id) = MACRO.offset_of(key) {
            return Some(Action::MacroPlay(id as u8));
        }
        Some(Action::Key(key))
    }

    /// Encode the action back to its stored key code.
    pub const fn encode(self) -> Key {
        match self {
            Action::Key(key) => key,
            Action::LayerMove(layer) => Key(LAYER_MOVE.first + layer as u16),
            Action::LayerShift(layer) => Key(LAYER_SHIFT.first + layer as u16),
            Action::MacroPlay(id) => Key(MACRO.first + id as u16),
        }
    }
}
