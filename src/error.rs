//! Error types for tick source bring-up.

use core::fmt;

/// Invalid timer or animation parameters. Fatal at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The prescaler divides the input clock by zero.
    ZeroPrescaler,
    /// The period does not fit the hardware period register (or is zero).
    PeriodOutOfRange { period_ticks: u32, max: u32 },
    /// Interrupt priority above [`MAX_PRIORITY`](crate::config::MAX_PRIORITY).
    PriorityOutOfRange(u8),
    /// Input clock divided by the prescaler leaves a counter rate of 0 Hz.
    CounterRateTooLow,
    /// The sweep edges would be divided by zero.
    ZeroSweepScale,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::ZeroPrescaler => write!(f, "prescaler must be non-zero"),
            ConfigError::PeriodOutOfRange { period_ticks, max } => {
                write!(f, "period {} outside 1..={}", period_ticks, max)
            }
            ConfigError::PriorityOutOfRange(p) => {
                write!(f, "interrupt priority {} out of range", p)
            }
            ConfigError::CounterRateTooLow => write!(f, "counter rate below 1 Hz"),
            ConfigError::ZeroSweepScale => write!(f, "sweep scale must be non-zero"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ConfigError::ZeroPrescaler => defmt::write!(f, "Zero prescaler"),
            ConfigError::PeriodOutOfRange { period_ticks, max } => {
                defmt::write!(f, "Period {} outside 1..={}", period_ticks, max)
            }
            ConfigError::PriorityOutOfRange(p) => defmt::write!(f, "Priority {} out of range", p),
            ConfigError::CounterRateTooLow => defmt::write!(f, "Counter rate too low"),
            ConfigError::ZeroSweepScale => defmt::write!(f, "Zero sweep scale"),
        }
    }
}

/// Errors from starting a tick source.
#[derive(Debug)]
pub enum Error<E> {
    /// Rejected timer parameters.
    Config(ConfigError),
    /// The platform timer refused the configuration.
    Timer(E),
}

impl<E> From<ConfigError> for Error<E> {
    fn from(error: ConfigError) -> Self {
        Error::Config(error)
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "timer configuration error: {}", e),
            Error::Timer(e) => write!(f, "timer error: {:?}", e),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for Error<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Config(e) => defmt::write!(f, "Timer configuration error: {}", e),
            Error::Timer(e) => defmt::write!(f, "Timer error: {}", e),
        }
    }
}
