use superkeys_types::key::Key;
use superkeys_types::keyswitch::{KeyAddr, KeySwitchState};

/// Keyboard services a resolved super key action is handed to.
///
/// Implemented by the firmware hosting the super keys: key injection and the HID
/// report are owned by the keyboard, layers and macros by their own subsystems.
pub trait Runtime {
    /// Feed a synthetic keyswitch event back into the keyboard.
    ///
    /// `state` always has `injected` set, so the super key handler ignores it.
    fn inject_key(&mut self, key: Key, addr: KeyAddr, state: KeySwitchState);

    /// Send the keyboard HID report built so far
    fn send_report(&mut self);

    /// Drop every key from the report being built
    fn release_all_keys(&mut self);

    fn layer_move(&mut self, layer: u8);

    fn layer_activate(&mut self, layer: u8);

    fn layer_deactivate(&mut self, layer: u8);

    fn play_macro(&mut self, id: u8);
}
