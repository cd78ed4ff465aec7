extern crate superkeys;

// a rust macro to create a key sequence to simulate key presses on the test row
#[macro_export]
macro_rules! key_sequence {
    ($([$col:expr, $pressed:expr, $delay:expr]),* $(,)?) => {
        vec![
            $(
                $crate::common::TestKeyPress {
                    col: $col,
                    pressed: $pressed,
                    delay: $delay,
                },
            )*
        ]
    };
}

/// Run a key sequence on a fresh keyboard, let every pending sequence settle,
/// then compare the runtime calls, held re-injections left out.
#[macro_export]
macro_rules! super_key_test {
    (
        map: [$($code:expr),* $(,)?],
        layout: [$($key:expr),* $(,)?],
        sequence: [$([$col:expr, $pressed:expr, $delay:expr]),* $(,)?],
        expected: [$($event:expr),* $(,)?] $(,)?
    ) => {{
        let mut keyboard = $crate::common::TestKeyboard::new(&[$($code),*], &[$($key),*]);
        keyboard.run_sequence(&$crate::key_sequence!($([$col, $pressed, $delay]),*));
        keyboard.wait(500);
        let expected: Vec<$crate::common::RuntimeEvent> = vec![$($event),*];
        assert_eq!(keyboard.actions_without_held(), expected);
        keyboard
    }};
}
