//! Resolving a super key slot to the action bound to it.

use superkeys_types::action::Action;
use superkeys_types::keyswitch::{KeyAddr, KeySwitchState};
use superkeys_types::rank::{ActionPhase, TapRank};

use crate::clock::{Clock, has_elapsed};
use crate::runtime::Runtime;
use crate::storage::SettingsStorage;
use crate::superkey::{HoldTimer, SuperKeys};

impl<S: SettingsStorage, C: Clock, const N: usize> SuperKeys<S, C, N> {
    /// Action bound to `rank` of super key `ordinal`.
    ///
    /// An unbound tap rank falls back to the closest lower tap rank that is bound,
    /// hold ranks never fall back.
    pub fn bound_action(&mut self, ordinal: u8, rank: TapRank) -> Option<Action> {
        let list = ordinal.checked_sub(self.offset)? as usize;
        let mut rank = rank;
        loop {
            if let Some(action) = self.slot_action(list, rank) {
                return Some(action);
            }
            rank = rank.fewer_taps()?;
        }
    }

    fn slot_action(&mut self, list: usize, rank: TapRank) -> Option<Action> {
        let pos = self.index.slot_offset(list, rank.slot()?)?;
        match self.store.read_code(pos) {
            Ok(key) => Action::decode(key),
            Err(e) => {
                error!("Failed to read super key slot at {}: {:?}", pos, e);
                None
            }
        }
    }

    /// Execute the action bound to `rank` of super key `ordinal` in `phase`.
    ///
    /// Returns false when nothing is bound, which callers treat as a no-op.
    pub(crate) fn resolve<R: Runtime>(
        &mut self,
        ordinal: u8,
        rank: TapRank,
        phase: ActionPhase,
        addr: KeyAddr,
        runtime: &mut R,
    ) -> bool {
        let Some(action) = self.bound_action(ordinal, rank) else {
            debug!("No action bound to super key {} at {:?}", ordinal, rank);
            return false;
        };
        debug!("Resolving super key {} {:?} {:?}: {:?}", ordinal, rank, phase, action);

        match phase {
            // Taps only count, the sequence decides later
            ActionPhase::Tap => {}
            ActionPhase::Interrupt | ActionPhase::Timeout => match action {
                Action::LayerMove(layer) => runtime.layer_move(layer),
                Action::MacroPlay(id) => runtime.play_macro(id),
                Action::LayerShift(layer) => runtime.layer_activate(layer),
                Action::Key(key) => runtime.inject_key(key, addr, KeySwitchState::PRESSED.as_injected()),
            },
            ActionPhase::Hold => self.resolve_hold(action, addr, runtime),
            ActionPhase::Release => match action {
                Action::LayerShift(layer) => runtime.layer_deactivate(layer),
                Action::LayerMove(_) | Action::MacroPlay(_) => runtime.send_report(),
                Action::Key(key) => {
                    runtime.send_report();
                    runtime.inject_key(key, addr, KeySwitchState::RELEASED.as_injected());
                }
            },
        }
        true
    }

    fn resolve_hold<R: Runtime>(&mut self, action: Action, addr: KeyAddr, runtime: &mut R) {
        let now = self.clock.now();

        let Some(mut timer) = self.hold_timer else {
            match action {
                Action::LayerShift(layer) => runtime.layer_activate(layer),
                Action::LayerMove(layer) => runtime.layer_move(layer),
                Action::MacroPlay(id) => runtime.play_macro(id),
                Action::Key(key) => runtime.inject_key(key, addr, KeySwitchState::HELD.as_injected()),
            }
            self.hold_timer = Some(HoldTimer {
                since: now,
                last_repeat: now,
                repeating: false,
            });
            return;
        };

        // `since` is only compared until the first repeat, a long hold wraps it
        let repeating = timer.repeating || has_elapsed(timer.since, now, self.timing.wait_for);
        let repeat = repeating && has_elapsed(timer.last_repeat, now, self.timing.repeat_interval as u16);
        if repeat {
            timer.last_repeat = now;
            timer.repeating = true;
            self.hold_timer = Some(timer);
        }

        match action {
            Action::MacroPlay(id) if repeat => runtime.play_macro(id),
            Action::Key(key) => {
                if repeat && key.is_repeatable() {
                    runtime.send_report();
                }
                runtime.inject_key(key, addr, KeySwitchState::HELD.as_injected());
            }
            _ => {}
        }
    }
}
