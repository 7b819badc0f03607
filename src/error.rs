//! Error definitions shared by every chip driver.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<BusError> {
    /// Underlying register transaction failed; carries the transport's fault code.
    Transport(BusError),
    /// No divider combination places the oscillator inside its band.
    UnsolvableDivider,
    /// Provided parameter was outside datasheet limits.
    OutOfRange,
    /// Register contents describe a configuration the operation cannot handle.
    InvalidConfig,
}

impl<BusError> Error<BusError> {
    /// Fault code reported by the transport, if this error came from the bus.
    pub fn fault_code(&self) -> Option<&BusError> {
        match self {
            Error::Transport(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl<BusError: core::fmt::Debug> core::fmt::Display for Error<BusError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "register transport error: {:?}", e),
            Error::UnsolvableDivider => write!(f, "no valid divider combination for requested frequency"),
            Error::OutOfRange => write!(f, "parameter out of range"),
            Error::InvalidConfig => write!(f, "invalid configuration for current mode"),
        }
    }
}

/// Raising call form: unwrap a driver result or panic with the error text.
///
/// Every driver operation returns `Result`; callers that treat a bus fault as
/// fatal can write `chip.reset(&mut delay).raise()` instead of matching.
pub trait Raise<T> {
    fn raise(self) -> T;
}

impl<T, BusError: core::fmt::Debug> Raise<T> for Result<T, Error<BusError>> {
    #[track_caller]
    fn raise(self) -> T {
        match self {
            Ok(value) => value,
            Err(e) => panic!("{}", e),
        }
    }
}
