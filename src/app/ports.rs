//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ SpeedController (domain)
//! ```
//!
//! Driven adapters (fan PWM, status pixel, charger lines, animation timer,
//! clock, storage, event sinks) implement these traits.  The
//! [`SpeedController`](super::controller::SpeedController) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::color::Rgb;
use crate::power::PowerState;

// ───────────────────────────────────────────────────────────────
// Actuator ports (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// PWM fan output.
pub trait FanPort {
    /// Set duty as a 16-bit fraction of full scale.
    fn set_fan_duty(&mut self, duty: u16);
}

/// Single addressable status pixel.
pub trait LedPort {
    fn write_led(&mut self, rgb: Rgb);
}

/// The timer that drives LED animations.  Firing raises
/// `Event::AnimationTimer`; it never runs animation code itself.
pub trait AnimationTimerPort {
    /// Fire once after `period_ms`.
    fn arm_one_shot(&mut self, period_ms: u32);

    /// Fire every `period_ms` until disarmed.
    fn arm_periodic(&mut self, period_ms: u32);

    /// Cancel any armed timer.  Must be a no-op when nothing is armed.
    fn disarm(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Sensor ports (hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Live charger status.
pub trait PowerSensePort {
    fn power_state(&mut self) -> PowerState;
}

/// Monotonic milliseconds since boot.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

/// Everything the controller drives or samples during one state
/// application, bundled so call sites take a single `&mut hw`.
pub trait FanHardware: FanPort + LedPort + AnimationTimerPort + PowerSensePort + ClockPort {}

impl<T> FanHardware for T where T: FanPort + LedPort + AnimationTimerPort + PowerSensePort + ClockPort {}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Storage port (domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage.  The firmware keeps a single value here,
/// so get and set are all the port offers.
pub trait StoragePort {
    /// Copy the value into `buf` and return its length.
    ///
    /// A value that does not fit is reported as [`StorageError::TooLong`];
    /// it is never truncated.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Replace the value.  A power cut leaves either the old or new value.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`StoragePort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key does not exist.
    NotFound,
    /// Stored value is larger than the caller's buffer.
    TooLong,
    /// Storage partition is full.
    Full,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "key not found"),
            Self::TooLong => write!(f, "stored value too long"),
            Self::Full => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
