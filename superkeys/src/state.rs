//! Per-key tap/hold state.

use superkeys_types::keyswitch::KeyAddr;
use superkeys_types::rank::{ActionPhase, TapRank};

/// Where a super key is in its sequence.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyPhase {
    /// Not part of any sequence
    #[default]
    Idle,

    /// Taps are being counted, nothing was fired yet.
    /// `pressed` tracks the physical key between taps.
    Tapping { pressed: bool },

    /// The sequence is decided and its action fired, the key is still down.
    /// `held` is set once the hold action fired.
    Triggered { held: bool },

    /// The key was released, the release action fires on the next cycle
    PendingRelease,
}

/// An action the engine has to resolve after a transition.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Resolution {
    pub rank: TapRank,
    pub phase: ActionPhase,
}

impl Resolution {
    const fn new(rank: TapRank, phase: ActionPhase) -> Self {
        Self { rank, phase }
    }
}

/// State of one super key.
///
/// Transitions are plain functions of the current state. Each returns the action
/// to resolve, or `None` when the stimulus doesn't apply in the current phase.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyState {
    pub phase: KeyPhase,
    pub rank: TapRank,
    /// Matrix position the sequence was started from, used for injected events
    pub addr: KeyAddr,
}

impl KeyState {
    pub const fn new() -> Self {
        Self {
            phase: KeyPhase::Idle,
            rank: TapRank::None,
            addr: KeyAddr::new(0, 0),
        }
    }

    pub fn pressed(&self) -> bool {
        matches!(
            self.phase,
            KeyPhase::Tapping { pressed: true } | KeyPhase::Triggered { .. }
        )
    }

    pub fn triggered(&self) -> bool {
        matches!(self.phase, KeyPhase::Triggered { .. })
    }

    pub fn held(&self) -> bool {
        matches!(self.phase, KeyPhase::Triggered { held: true })
    }

    pub fn pending_release(&self) -> bool {
        self.phase == KeyPhase::PendingRelease
    }

    /// One more tap of an undecided sequence
    pub fn tap(&mut self) -> Option<Resolution> {
        match self.phase {
            KeyPhase::Idle | KeyPhase::Tapping { .. } => {
                self.rank = self.rank.tapped();
                self.phase = KeyPhase::Tapping { pressed: true };
                Some(Resolution::new(self.rank, ActionPhase::Tap))
            }
            _ => None,
        }
    }

    /// The key is held down.
    ///
    /// The first hold moves the rank to its hold counterpart and triggers the
    /// sequence, every later call repeats the hold action.
    pub fn hold(&mut self) -> Option<Resolution> {
        match self.phase {
            KeyPhase::Tapping { pressed: true } | KeyPhase::Triggered { held: false } => {
                self.rank = self.rank.held();
                self.phase = KeyPhase::Triggered { held: true };
                Some(Resolution::new(self.rank, ActionPhase::Hold))
            }
            KeyPhase::Triggered { held: true } => Some(Resolution::new(self.rank, ActionPhase::Hold)),
            _ => None,
        }
    }

    /// Decide an undecided sequence with the taps counted so far.
    ///
    /// `phase` is either `Interrupt` or `Timeout`.
    pub fn trigger(&mut self, phase: ActionPhase) -> Option<Resolution> {
        match self.phase {
            KeyPhase::Tapping { .. } => {
                self.phase = KeyPhase::Triggered { held: false };
                Some(Resolution::new(self.rank, phase))
            }
            _ => None,
        }
    }

    /// The physical key went up. Only an undecided sequence keeps going.
    pub fn lift(&mut self) {
        if let KeyPhase::Tapping { pressed } = &mut self.phase {
            *pressed = false;
        }
    }

    /// The physical key is down again, within the current sequence
    pub fn press(&mut self) {
        if let KeyPhase::Tapping { pressed } = &mut self.phase {
            *pressed = true;
        }
    }

    /// End the sequence, the release action is owed to the next cycle
    pub fn release(&mut self) {
        self.phase = KeyPhase::PendingRelease;
    }

    /// Settle a pending release, going back to idle.
    pub fn finish(&mut self) -> Option<Resolution> {
        match self.phase {
            KeyPhase::PendingRelease => {
                let rank = self.rank;
                self.phase = KeyPhase::Idle;
                self.rank = TapRank::None;
                Some(Resolution::new(rank, ActionPhase::Release))
            }
            _ => None,
        }
    }
}
