//! The super key engine.
//!
//! Keyswitch events go through [`SuperKeys::on_keyswitch_event`], and
//! [`SuperKeys::after_each_cycle`] has to run once at the end of every scan
//! cycle to fire deferred releases and close timed out sequences.

use superkeys_types::key::Key;
use superkeys_types::keyswitch::{KeyAddr, KeySwitchState};
use superkeys_types::rank::ActionPhase;

use crate::clock::{Clock, has_elapsed};
use crate::config::{SuperKeysConfig, TimingConfig};
use crate::error::Error;
use crate::index::OffsetIndex;
use crate::runtime::Runtime;
use crate::state::{KeyState, Resolution};
use crate::storage::{SettingsStorage, SuperKeyStore};

/// What the host should do with a keyswitch event after the engine saw it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventResult {
    /// Keep processing the event
    Ok,
    /// The event was handled here, don't send it in this cycle
    Consumed,
}

/// Timestamps of the hold action in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct HoldTimer {
    /// When the hold action first fired
    pub(crate) since: u16,
    /// When it last repeated
    pub(crate) last_repeat: u16,
    /// Set once `wait_for` passed, later repeats only look at `last_repeat`
    pub(crate) repeating: bool,
}

/// Super key engine for up to `N` super keys.
pub struct SuperKeys<S: SettingsStorage, C: Clock, const N: usize> {
    pub(crate) store: SuperKeyStore<S>,
    pub(crate) clock: C,
    /// Ordinals below this are super keys defined elsewhere
    pub(crate) offset: u8,
    pub(crate) timing: TimingConfig,
    pub(crate) index: OffsetIndex<N>,
    states: [KeyState; N],
    /// Ordinal of the super key whose sequence is in progress
    active: Option<u8>,
    /// Time of the last tap of the active sequence
    sequence_start: u16,
    pub(crate) hold_timer: Option<HoldTimer>,
}

impl<S: SettingsStorage, C: Clock, const N: usize> SuperKeys<S, C, N> {
    /// Create the engine. Nothing is read from storage until [`Self::load`].
    pub fn new(store: SuperKeyStore<S>, clock: C, config: SuperKeysConfig) -> Self {
        Self {
            store,
            clock,
            offset: config.offset,
            timing: config.timing,
            index: OffsetIndex::new(),
            states: [KeyState::new(); N],
            active: None,
            sequence_start: 0,
            hold_timer: None,
        }
    }

    /// Reload the timing and rebuild the offset index from storage.
    pub fn load(&mut self) -> Result<(), Error> {
        self.timing = self.store.read_timing()?;
        self.index = self.store.scan()?;
        info!("Loaded {} super keys, timing: {:?}", self.index.len(), self.timing);
        Ok(())
    }

    /// Replace the action list of list `list`, `list == count()` appends one.
    pub fn store(&mut self, list: usize, codes: &[Key]) -> Result<(), Error> {
        self.store.store(&self.index, list, codes)?;
        self.store.commit()?;
        self.load()
    }

    /// Overwrite the raw map from its start.
    ///
    /// Fails without writing anything when the codes don't fit the region.
    pub fn write_map<I>(&mut self, codes: I) -> Result<usize, Error>
    where
        I: IntoIterator<Item = Key>,
        I::IntoIter: Clone,
    {
        let codes = codes.into_iter();
        let len = codes.clone().count();
        if len > self.store.map_capacity() {
            warn!("Super key map of {} codes exceeds the {} available", len, self.store.map_capacity());
            return Err(Error::OutOfRange);
        }
        let written = self.store.write_map(codes)?;
        self.store.commit()?;
        self.load()?;
        Ok(written)
    }

    /// Persist new timing parameters
    pub fn set_timing(&mut self, timing: TimingConfig) -> Result<(), Error> {
        self.store.write_timing(&timing)?;
        self.store.commit()?;
        self.load()
    }

    pub fn timing(&self) -> TimingConfig {
        self.timing
    }

    /// Number of super keys in the stored map
    pub fn count(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &OffsetIndex<N> {
        &self.index
    }

    /// State of the super key with the given ordinal
    pub fn state(&self, ordinal: u8) -> Option<&KeyState> {
        self.states.get(ordinal as usize)
    }

    /// Ordinal of the super key whose sequence is in progress
    pub fn active(&self) -> Option<u8> {
        self.active
    }

    pub fn settings(&mut self) -> &mut SuperKeyStore<S> {
        &mut self.store
    }

    pub fn into_store(self) -> SuperKeyStore<S> {
        self.store
    }

    /// Handle a keyswitch event from the matrix scan.
    ///
    /// Every event of a super key is consumed. Other keys pass through, except a
    /// press that decided a pending sequence: it's consumed for this cycle and
    /// comes back as a held key on the next scan.
    pub fn on_keyswitch_event<R: Runtime>(
        &mut self,
        key: Key,
        addr: KeyAddr,
        event: KeySwitchState,
        runtime: &mut R,
    ) -> EventResult {
        if event.injected() {
            return EventResult::Ok;
        }

        let Some(ordinal) = key.super_key_ordinal() else {
            if self.active.is_some() && event.toggled_on() && self.interrupt(runtime) {
                return EventResult::Consumed;
            }
            return EventResult::Ok;
        };

        let idx = ordinal as usize;
        if idx >= N {
            warn!("Super key {} is beyond the {} supported", ordinal, N);
            return EventResult::Consumed;
        }

        if event.toggled_off() {
            self.states[idx].lift();
        }

        if self.active != Some(ordinal) {
            match self.active {
                None => {
                    if self.states[idx].triggered() {
                        // Decided by a timeout or another key, only the release is left
                        if event.toggled_off() {
                            self.release(ordinal);
                        }
                        return EventResult::Consumed;
                    }
                    if event.toggled_on() {
                        self.start(ordinal, addr, runtime);
                    }
                    return EventResult::Consumed;
                }
                Some(_) => {
                    if event.toggled_off() {
                        self.release(ordinal);
                        return EventResult::Consumed;
                    }
                    if !event.toggled_on() {
                        return EventResult::Consumed;
                    }
                    self.interrupt(runtime);
                }
            }
        }

        // In sequence
        if event.toggled_off() {
            if self.states[idx].triggered() {
                self.release(ordinal);
            }
            return EventResult::Consumed;
        }

        if event.toggled_on() {
            self.start(ordinal, addr, runtime);
            return EventResult::Consumed;
        }

        self.states[idx].press();
        if self.states[idx].triggered() {
            self.hold(runtime);
        }
        EventResult::Consumed
    }

    /// Run once at the end of every scan cycle.
    pub fn after_each_cycle<R: Runtime>(&mut self, runtime: &mut R) {
        for ordinal in 0..N {
            if self.states[ordinal].pending_release() {
                self.finish(ordinal as u8, runtime);
            }
        }

        if self.active.is_none() {
            return;
        }
        if has_elapsed(self.sequence_start, self.clock.now(), self.timing.time_out) {
            self.timeout(runtime);
        }
    }

    /// Make `ordinal` the active key and count a tap
    fn start<R: Runtime>(&mut self, ordinal: u8, addr: KeyAddr, runtime: &mut R) {
        if self.states[ordinal as usize].pending_release() {
            // The previous sequence of this key still owes its release
            self.finish(ordinal, runtime);
        }
        self.active = Some(ordinal);
        self.states[ordinal as usize].addr = addr;
        self.tap(runtime);
    }

    /// Count a tap of the active key and restart the sequence window
    pub(crate) fn tap<R: Runtime>(&mut self, runtime: &mut R) {
        let Some(ordinal) = self.active else {
            return;
        };
        if let Some(resolution) = self.states[ordinal as usize].tap() {
            self.sequence_start = self.clock.now();
            debug!("Super key {} tapped: {:?}", ordinal, resolution.rank);
            self.apply(ordinal, resolution, runtime);
        }
    }

    /// Fire or repeat the hold action of the active key
    pub(crate) fn hold<R: Runtime>(&mut self, runtime: &mut R) {
        let Some(ordinal) = self.active else {
            return;
        };
        let first = !self.states[ordinal as usize].held();
        if let Some(resolution) = self.states[ordinal as usize].hold() {
            if first {
                self.hold_timer = None;
                debug!("Super key {} held: {:?}", ordinal, resolution.rank);
            }
            self.apply(ordinal, resolution, runtime);
        }
    }

    /// Another key was pressed while the active sequence was undecided.
    ///
    /// Returns true when the other key has to be consumed.
    pub(crate) fn interrupt<R: Runtime>(&mut self, runtime: &mut R) -> bool {
        let Some(ordinal) = self.active else {
            return false;
        };
        let state = self.states[ordinal as usize];

        if state.pressed() {
            let hold_reached = has_elapsed(self.sequence_start, self.clock.now(), self.timing.hold_start);
            if hold_reached || state.triggered() {
                debug!("Super key {} interrupted, holding", ordinal);
                self.hold(runtime);
                runtime.send_report();
                return false;
            }

            debug!("Super key {} interrupted while pressed", ordinal);
            if let Some(resolution) = self.states[ordinal as usize].trigger(ActionPhase::Interrupt) {
                self.apply(ordinal, resolution, runtime);
            }
            self.active = None;
            runtime.send_report();
            return true;
        }

        debug!("Super key {} interrupted after release", ordinal);
        if let Some(resolution) = self.states[ordinal as usize].trigger(ActionPhase::Interrupt) {
            self.apply(ordinal, resolution, runtime);
        }
        runtime.send_report();
        runtime.release_all_keys();
        self.release(ordinal);
        true
    }

    /// The sequence window of the active key elapsed.
    pub(crate) fn timeout<R: Runtime>(&mut self, runtime: &mut R) {
        let Some(ordinal) = self.active else {
            return;
        };
        let state = self.states[ordinal as usize];
        if state.triggered() {
            return;
        }
        if state.pressed() {
            debug!("Super key {} timed out while pressed, holding", ordinal);
            self.hold(runtime);
            return;
        }

        debug!("Super key {} timed out: {:?}", ordinal, state.rank);
        if let Some(resolution) = self.states[ordinal as usize].trigger(ActionPhase::Timeout) {
            self.apply(ordinal, resolution, runtime);
        }
        self.active = None;
        self.release(ordinal);
    }

    /// End the sequence of `ordinal`, its release action fires on the next cycle
    pub(crate) fn release(&mut self, ordinal: u8) {
        debug!("Super key {} released", ordinal);
        self.states[ordinal as usize].release();
        if self.active == Some(ordinal) {
            self.active = None;
        }
    }

    /// Fire the owed release action and reset the key
    fn finish<R: Runtime>(&mut self, ordinal: u8, runtime: &mut R) {
        if let Some(resolution) = self.states[ordinal as usize].finish() {
            self.apply(ordinal, resolution, runtime);
        }
    }

    fn apply<R: Runtime>(&mut self, ordinal: u8, resolution: Resolution, runtime: &mut R) {
        let addr = self.states[ordinal as usize].addr;
        self.resolve(ordinal, resolution.rank, resolution.phase, addr, runtime);
    }
}
