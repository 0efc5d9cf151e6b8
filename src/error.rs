//! Unified error types for the BattFan firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! main loop's error handling uniform.  All variants are `Copy` so they can
//! be passed around without allocation.

use core::fmt;

use crate::app::ports::StorageError;
use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The key-value store failed.
    Storage(StorageError),
    /// The persisted speed could not be loaded or saved.
    Persistence(PersistenceError),
    /// The deferred-event queue overflowed.
    Scheduler(SchedulerError),
    /// Peripheral bring-up failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "storage: {e}"),
            Self::Persistence(e) => write!(f, "persistence: {e}"),
            Self::Scheduler(e) => write!(f, "scheduler: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

// ---------------------------------------------------------------------------
// Persistence errors
// ---------------------------------------------------------------------------

/// Failures loading or saving the selected speed.
///
/// Read-side variants are always recovered by falling back to
/// `SpeedState::Idle`; the write-side variant is logged and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceError {
    /// No value stored under the speed key (first boot).
    Missing,
    /// Stored value is not a decimal integer.
    Malformed,
    /// Stored value parsed but is not a valid speed ordinal.
    OutOfRange(u8),
    /// The store failed to read an existing value.
    Read(StorageError),
    /// The store rejected the write.
    Write(StorageError),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "no stored speed"),
            Self::Malformed => write!(f, "stored speed is not a number"),
            Self::OutOfRange(v) => write!(f, "stored speed {v} out of range"),
            Self::Read(e) => write!(f, "read failed: {e}"),
            Self::Write(e) => write!(f, "write failed: {e}"),
        }
    }
}

impl From<PersistenceError> for Error {
    fn from(e: PersistenceError) -> Self {
        Self::Persistence(e)
    }
}

// ---------------------------------------------------------------------------
// Scheduler errors
// ---------------------------------------------------------------------------

/// The deferred-event queue could not accept a raise.
///
/// Never recovered: a full queue means the main loop stopped draining, and
/// dropping a power-line event could leave the fan and LED stale forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    Overflow,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => write!(f, "event queue overflow"),
        }
    }
}

impl From<SchedulerError> for Error {
    fn from(e: SchedulerError) -> Self {
        Self::Scheduler(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
