//! Selected-speed persistence.
//!
//! The speed ordinal is stored as a decimal string under
//! `fanctl::state`.  Any read problem restarts the device at `Idle`.

use core::fmt::Write as _;

use log::{info, warn};

use crate::app::ports::{StorageError, StoragePort};
use crate::error::PersistenceError;
use crate::speed::SpeedState;

pub const SPEED_NAMESPACE: &str = "fanctl";
pub const SPEED_KEY: &str = "state";

/// Read the stored speed.
pub fn load_speed(store: &impl StoragePort) -> Result<SpeedState, PersistenceError> {
    let mut buf = [0u8; 8];
    let len = store
        .read(SPEED_NAMESPACE, SPEED_KEY, &mut buf)
        .map_err(|e| match e {
            StorageError::NotFound => PersistenceError::Missing,
            StorageError::TooLong => PersistenceError::Malformed,
            other => PersistenceError::Read(other),
        })?;

    let text = core::str::from_utf8(&buf[..len]).map_err(|_| PersistenceError::Malformed)?;
    let ordinal: u8 = text
        .trim()
        .parse()
        .map_err(|_| PersistenceError::Malformed)?;
    SpeedState::from_ordinal(ordinal).ok_or(PersistenceError::OutOfRange(ordinal))
}

/// Read the stored speed, falling back to `Idle` on any failure.
pub fn load_speed_or_default(store: &impl StoragePort) -> SpeedState {
    match load_speed(store) {
        Ok(speed) => {
            info!("persistence: restored speed {}", speed.name());
            speed
        }
        Err(PersistenceError::Missing) => {
            info!("persistence: no stored speed, starting Idle");
            SpeedState::Idle
        }
        Err(e) => {
            warn!("persistence: {e}, starting Idle");
            SpeedState::Idle
        }
    }
}

/// Store `speed`.  A single write; callers decide what a failure means.
pub fn save_speed(store: &mut impl StoragePort, speed: SpeedState) -> Result<(), PersistenceError> {
    let mut text: heapless::String<4> = heapless::String::new();
    // Ordinals are single digits; the buffer cannot overflow.
    let _ = write!(text, "{}", speed.ordinal());
    store
        .write(SPEED_NAMESPACE, SPEED_KEY, text.as_bytes())
        .map_err(PersistenceError::Write)
}
