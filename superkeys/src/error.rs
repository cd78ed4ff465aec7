/// Errors returned by configuration operations.
///
/// The real-time paths never produce errors: a super key that isn't configured
/// simply does nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The storage driver reported an error
    Storage,
    /// The settings arena has no room for the requested region
    RegionExhausted,
    /// Offset or list index outside the configured region
    OutOfRange,
    /// An action list containing a sentinel before its end
    InvalidList,
    /// A configurator argument that isn't a valid number for the field
    InvalidArgument,
    /// Writing a response to the configuration channel failed
    Output,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::Output
    }
}
