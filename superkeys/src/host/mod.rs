//! Configuration channel of the super keys.
//!
//! The host talks a line based text protocol: a command name optionally
//! followed by whitespace separated decimal arguments. Without arguments a
//! command reads the current value, with arguments it writes it.

mod command;

pub use command::CommandOutcome;
use strum::{EnumIter, EnumString, IntoStaticStr};

/// Prefix shared by every super key command
pub const COMMAND_PREFIX: &str = "superkeys.";

/// Command listing the commands of every handler
pub const HELP_COMMAND: &str = "help";

/// Super key commands of the configuration channel.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumString, IntoStaticStr, EnumIter)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HostCommand {
    /// Raw codes of the super key map, in storage order
    #[strum(serialize = "superkeys.map")]
    Map,
    #[strum(serialize = "superkeys.waitfor")]
    WaitFor,
    #[strum(serialize = "superkeys.timeout")]
    Timeout,
    #[strum(serialize = "superkeys.holdstart")]
    HoldStart,
    #[strum(serialize = "superkeys.repeat")]
    Repeat,
}

impl HostCommand {
    pub fn name(self) -> &'static str {
        self.into()
    }
}
