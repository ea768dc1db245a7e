use core::fmt;

/// Errors raised by the watch face core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// A digit outside 0..=9 was requested
    OutOfRange(u8),
    /// Hour or minute outside the 24-hour clock
    InvalidTime { hour: u8, minute: u8 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfRange(value) => write!(f, "digit {} out of range 0..=9", value),
            Error::InvalidTime { hour, minute } => {
                write!(f, "invalid time {:02}:{:02}", hour, minute)
            }
        }
    }
}
