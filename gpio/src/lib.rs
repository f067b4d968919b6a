pub mod gpiod;
pub mod lcd;

use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum GpioError {
    #[error("line already in use")]
    AlreadyInUse,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for GpioError {
    fn from(err: std::io::Error) -> Self {
        GpioError::Io(err.kind())
    }
}

pub type GpioResult<T> = Result<T, GpioError>;

pub trait GpioDriver: Debug {
    /// Gets the amount of GPIO lines available.
    fn count(&self) -> GpioResult<usize>;

    /// Acquires the GPIO line at the given index as an output.
    ///
    /// The line stays reserved until the returned handle is dropped.
    /// Acquisition failures happen here, never later during writes.
    fn acquire_output(&self, index: usize) -> GpioResult<Box<dyn GpioOutput + '_>>;
}

pub trait GpioOutput: Debug {
    /// Writes the state of the GPIO line.
    fn write(&self, value: bool) -> GpioResult<()>;
}

/// Blocking delay source.
///
/// A sleep always completes its full duration; there is no cancellation.
pub trait Delay: Debug {
    /// Sleeps for at least the given duration.
    fn sleep(&self, duration: Duration);
}

/// [Delay] backed by [std::thread::sleep].
#[derive(Debug, Default)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
