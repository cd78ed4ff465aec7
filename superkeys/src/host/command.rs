use core::fmt::Write;
use core::str::{FromStr, SplitWhitespace};

use strum::IntoEnumIterator;
use superkeys_types::key::Key;

use super::{COMMAND_PREFIX, HELP_COMMAND, HostCommand};
use crate::clock::Clock;
use crate::config::TimingConfig;
use crate::error::Error;
use crate::storage::SettingsStorage;
use crate::superkey::SuperKeys;

/// Whether a configuration line was meant for the super keys.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// The line was a super key command, no other handler should see it
    Handled,
    /// Not a super key command, pass it to the next handler
    Ignored,
}

impl<S: SettingsStorage, C: Clock, const N: usize> SuperKeys<S, C, N> {
    /// Process one line of the configuration channel, writing the response to `out`.
    ///
    /// Writes validate every argument before anything is persisted, then commit
    /// and reload the map.
    pub fn handle_command<W: Write>(&mut self, line: &str, out: &mut W) -> Result<CommandOutcome, Error> {
        let mut args = line.split_whitespace();
        let Some(name) = args.next() else {
            return Ok(CommandOutcome::Ignored);
        };

        if name == HELP_COMMAND {
            for command in HostCommand::iter() {
                writeln!(out, "{}", command.name())?;
            }
            return Ok(CommandOutcome::Ignored);
        }
        if !name.starts_with(COMMAND_PREFIX) {
            return Ok(CommandOutcome::Ignored);
        }

        let Ok(command) = HostCommand::from_str(name) else {
            debug!("Unknown super key command");
            return Ok(CommandOutcome::Handled);
        };
        debug!("Super key command: {:?}", command);

        match command {
            HostCommand::Map => self.map_command(args, out)?,
            HostCommand::WaitFor => {
                if let Some(wait_for) = single_arg(args)? {
                    self.set_timing(TimingConfig { wait_for, ..self.timing })?;
                } else {
                    writeln!(out, "{}", self.timing.wait_for)?;
                }
            }
            HostCommand::Timeout => {
                if let Some(time_out) = single_arg(args)? {
                    self.set_timing(TimingConfig { time_out, ..self.timing })?;
                } else {
                    writeln!(out, "{}", self.timing.time_out)?;
                }
            }
            HostCommand::HoldStart => {
                if let Some(hold_start) = single_arg(args)? {
                    self.set_timing(TimingConfig { hold_start, ..self.timing })?;
                } else {
                    writeln!(out, "{}", self.timing.hold_start)?;
                }
            }
            HostCommand::Repeat => {
                if let Some(repeat_interval) = single_arg(args)? {
                    self.set_timing(TimingConfig {
                        repeat_interval,
                        ..self.timing
                    })?;
                } else {
                    writeln!(out, "{}", self.timing.repeat_interval)?;
                }
            }
        }
        Ok(CommandOutcome::Handled)
    }

    fn map_command<W: Write>(&mut self, args: SplitWhitespace<'_>, out: &mut W) -> Result<(), Error> {
        if args.clone().next().is_none() {
            let mut separator = "";
            for key in self.store.read_map() {
                write!(out, "{}{}", separator, key?.raw())?;
                separator = " ";
            }
            writeln!(out)?;
            return Ok(());
        }

        if args.clone().any(|arg| arg.parse::<u16>().is_err()) {
            warn!("Invalid code in super key map command");
            return Err(Error::InvalidArgument);
        }
        let codes = args.filter_map(|arg| arg.parse::<u16>().ok()).map(Key);
        self.write_map(codes)?;
        Ok(())
    }
}

/// Parse the only argument of a setter, `None` for the getter form
fn single_arg<T: FromStr>(mut args: SplitWhitespace<'_>) -> Result<Option<T>, Error> {
    let Some(arg) = args.next() else {
        return Ok(None);
    };
    if args.next().is_some() {
        return Err(Error::InvalidArgument);
    }
    arg.parse().map(Some).map_err(|_| Error::InvalidArgument)
}
