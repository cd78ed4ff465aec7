pub mod test_macro;

use std::cell::Cell;
use std::rc::Rc;

use superkeys::storage::ram::RamStorage;
use superkeys::types::key::Key;
use superkeys::types::keyswitch::{KeyAddr, KeySwitchState};
use superkeys::{Clock, EventResult, Runtime, SettingsArena, SuperKeyStore, SuperKeys, SuperKeysConfig};

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub const A: Key = Key::hid(0x04);
pub const B: Key = Key::hid(0x05);
pub const C: Key = Key::hid(0x06);
pub const D: Key = Key::hid(0x07);
pub const H: Key = Key::hid(0x0B);
pub const X: Key = Key::NO_KEY;
pub const T: Key = Key::TRANSPARENT;

pub const STORAGE_SIZE: usize = 128;
pub const MAP_SIZE: u16 = 64;
pub const SUPER_KEY_NUM: usize = 4;

pub type TestSuperKeys = SuperKeys<RamStorage<STORAGE_SIZE>, ManualClock, SUPER_KEY_NUM>;

/// Millisecond clock advanced by hand
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<u16>>);

impl ManualClock {
    pub fn advance(&self, ms: u16) {
        self.0.set(self.0.get().wrapping_add(ms));
    }

    pub fn set(&self, now: u16) {
        self.0.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u16 {
        self.0.get()
    }
}

/// Everything the engine asked the keyboard to do
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeEvent {
    Inject(Key, KeySwitchState),
    SendReport,
    ReleaseAll,
    LayerMove(u8),
    LayerOn(u8),
    LayerOff(u8),
    Macro(u8),
}

pub fn pressed(key: Key) -> RuntimeEvent {
    RuntimeEvent::Inject(key, KeySwitchState::PRESSED.as_injected())
}

pub fn held(key: Key) -> RuntimeEvent {
    RuntimeEvent::Inject(key, KeySwitchState::HELD.as_injected())
}

pub fn released(key: Key) -> RuntimeEvent {
    RuntimeEvent::Inject(key, KeySwitchState::RELEASED.as_injected())
}

/// Runtime recording every call along with the time it was made
pub struct RecordingRuntime {
    clock: ManualClock,
    pub events: Vec<(u16, RuntimeEvent)>,
    pub addrs: Vec<KeyAddr>,
}

impl RecordingRuntime {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            events: Vec::new(),
            addrs: Vec::new(),
        }
    }

    fn record(&mut self, event: RuntimeEvent) {
        self.events.push((self.clock.now(), event));
    }
}

impl Runtime for RecordingRuntime {
    fn inject_key(&mut self, key: Key, addr: KeyAddr, state: KeySwitchState) {
        self.addrs.push(addr);
        self.record(RuntimeEvent::Inject(key, state));
    }

    fn send_report(&mut self) {
        self.record(RuntimeEvent::SendReport);
    }

    fn release_all_keys(&mut self) {
        self.record(RuntimeEvent::ReleaseAll);
    }

    fn layer_move(&mut self, layer: u8) {
        self.record(RuntimeEvent::LayerMove(layer));
    }

    fn layer_activate(&mut self, layer: u8) {
        self.record(RuntimeEvent::LayerOn(layer));
    }

    fn layer_deactivate(&mut self, layer: u8) {
        self.record(RuntimeEvent::LayerOff(layer));
    }

    fn play_macro(&mut self, id: u8) {
        self.record(RuntimeEvent::Macro(id));
    }
}

#[derive(Debug, Clone)]
pub struct TestKeyPress {
    pub col: u8,
    pub pressed: bool,
    pub delay: u16, // Delay before this key event in milliseconds
}

struct MatrixKey {
    key: Key,
    pressed: bool,
    was_pressed: bool,
}

/// A one row keyboard scanned every millisecond
pub struct TestKeyboard {
    pub engine: TestSuperKeys,
    pub clock: ManualClock,
    pub runtime: RecordingRuntime,
    /// Events the host would process after the super keys, with the time they were let through
    pub forwarded: Vec<(u16, Key, KeySwitchState)>,
    matrix: Vec<MatrixKey>,
}

pub fn create_engine(map: &[Key], clock: ManualClock) -> TestSuperKeys {
    let mut arena = SettingsArena::new(0, STORAGE_SIZE as u32);
    let store = SuperKeyStore::setup(RamStorage::new(), &mut arena, MAP_SIZE).unwrap();
    let mut engine = SuperKeys::new(store, clock, SuperKeysConfig::default());
    engine.write_map(map.iter().copied()).unwrap();
    engine
}

impl TestKeyboard {
    /// `layout` is the key of every column
    pub fn new(map: &[Key], layout: &[Key]) -> Self {
        let clock = ManualClock::default();
        let engine = create_engine(map, clock.clone());
        Self {
            engine,
            runtime: RecordingRuntime::new(clock.clone()),
            clock,
            forwarded: Vec::new(),
            matrix: layout
                .iter()
                .map(|&key| MatrixKey {
                    key,
                    pressed: false,
                    was_pressed: false,
                })
                .collect(),
        }
    }

    pub fn now(&self) -> u16 {
        self.clock.now()
    }

    /// One scan cycle at the current time
    pub fn scan(&mut self) {
        let now = self.clock.now();
        for (col, key) in self.matrix.iter_mut().enumerate() {
            if !key.pressed && !key.was_pressed {
                continue;
            }
            let state = KeySwitchState::new()
                .with_is_pressed(key.pressed)
                .with_was_pressed(key.was_pressed);
            let addr = KeyAddr::new(0, col as u8);
            if self.engine.on_keyswitch_event(key.key, addr, state, &mut self.runtime) == EventResult::Ok {
                self.forwarded.push((now, key.key, state));
            }
            key.was_pressed = key.pressed;
        }
        self.engine.after_each_cycle(&mut self.runtime);
    }

    /// Let `ms` milliseconds pass, scanning every millisecond
    pub fn wait(&mut self, ms: u16) {
        for _ in 0..ms {
            self.clock.advance(1);
            self.scan();
        }
    }

    pub fn set_key(&mut self, col: u8, pressed: bool) {
        self.matrix[col as usize].pressed = pressed;
    }

    pub fn run_sequence(&mut self, sequence: &[TestKeyPress]) {
        for press in sequence {
            self.wait(press.delay);
            self.set_key(press.col, press.pressed);
            self.scan();
        }
    }

    /// Recorded runtime calls without their timestamps
    pub fn actions(&self) -> Vec<RuntimeEvent> {
        self.runtime.events.iter().map(|&(_, event)| event).collect()
    }

    /// Recorded runtime calls, leaving out the held key re-injections
    pub fn actions_without_held(&self) -> Vec<RuntimeEvent> {
        self.runtime
            .events
            .iter()
            .map(|&(_, event)| event)
            .filter(|event| !matches!(event, RuntimeEvent::Inject(_, state) if state.is_pressed() && state.was_pressed()))
            .collect()
    }

    /// Times at which `event` was recorded
    pub fn times_of(&self, event: RuntimeEvent) -> Vec<u16> {
        self.runtime
            .events
            .iter()
            .filter(|(_, e)| *e == event)
            .map(|&(time, _)| time)
            .collect()
    }

    /// Forwarded key presses, ignoring held and released events
    pub fn forwarded_presses(&self) -> Vec<(u16, Key)> {
        self.forwarded
            .iter()
            .filter(|(_, _, state)| state.toggled_on())
            .map(|&(time, key, _)| (time, key))
            .collect()
    }
}
