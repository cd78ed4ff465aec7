//! Tap ranks and action phases.

use strum::FromRepr;

/// Position of a super key in its tap/hold progression.
///
/// The progression only moves forward within one sequence and goes back to
/// `None` when the key is fully released.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TapRank {
    #[default]
    None = 0,
    TapOnce = 1,
    TapTwice = 2,
    TapThrice = 3,
    HoldOnce = 4,
    TapHold = 5,
    TapTwiceHold = 6,
    TapThriceHold = 7,
}

impl TapRank {
    /// Number of action slots a super key list can hold.
    pub const SLOT_COUNT: usize = 6;

    /// Rank after one more tap, saturating at `TapThrice`
    pub const fn tapped(self) -> Self {
        match self {
            TapRank::None => TapRank::TapOnce,
            TapRank::TapOnce => TapRank::TapTwice,
            TapRank::TapTwice | TapRank::TapThrice => TapRank::TapThrice,
            // A hold already closed the tap count
            held => held,
        }
    }

    /// Hold counterpart of the current rank
    pub const fn held(self) -> Self {
        match self {
            TapRank::None | TapRank::TapOnce => TapRank::HoldOnce,
            TapRank::TapTwice => TapRank::TapHold,
            TapRank::TapThrice => TapRank::TapTwiceHold,
            held => held,
        }
    }

    pub const fn is_hold(self) -> bool {
        matches!(
            self,
            TapRank::HoldOnce | TapRank::TapHold | TapRank::TapTwiceHold | TapRank::TapThriceHold
        )
    }

    /// Index of the action slot bound to this rank, `None` for `TapRank::None`
    pub const fn slot(self) -> Option<usize> {
        match self {
            TapRank::None => None,
            TapRank::TapOnce => Some(0),
            TapRank::TapTwice => Some(1),
            TapRank::TapThrice => Some(2),
            TapRank::HoldOnce => Some(3),
            TapRank::TapHold => Some(4),
            TapRank::TapTwiceHold | TapRank::TapThriceHold => Some(5),
        }
    }

    /// The next lower tap rank, used when a tap slot isn't bound
    pub const fn fewer_taps(self) -> Option<Self> {
        match self {
            TapRank::TapThrice => Some(TapRank::TapTwice),
            TapRank::TapTwice => Some(TapRank::TapOnce),
            _ => None,
        }
    }
}

/// Why an action is being resolved.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromRepr)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActionPhase {
    /// A tap was counted. Emits nothing, it's a hook point for feedback.
    Tap,
    /// The key is held, fired on the first hold and on every held cycle after it.
    Hold,
    /// Another key was pressed before the sequence was decided.
    Interrupt,
    /// The sequence timed out with the key released.
    Timeout,
    /// The sequence is over, release whatever was pressed.
    Release,
}
