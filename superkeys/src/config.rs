/// Timing parameters shared by every super key.
///
/// All values are in milliseconds. They are persisted in the header of the
/// super key settings region and can be changed from the configurator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// How long a hold action stays held before it starts repeating
    pub wait_for: u16,
    /// Inactivity window that closes an undecided tap sequence
    pub time_out: u16,
    /// How long the key must be down before another key press turns it into a hold
    pub hold_start: u16,
    /// Spacing between repeats while holding
    pub repeat_interval: u8,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            wait_for: 500,
            time_out: 200,
            hold_start: 100,
            repeat_interval: 20,
        }
    }
}

/// Config for super keys
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SuperKeysConfig {
    /// Timing used until the settings region has been loaded
    pub timing: TimingConfig,
    /// Number of super key ordinals handled elsewhere, the stored map starts right after them
    pub offset: u8,
}
