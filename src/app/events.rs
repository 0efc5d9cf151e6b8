//! Outbound application events.
//!
//! The [`SpeedController`](super::controller::SpeedController) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them — today they go to the serial log.

use serde::Serialize;

use crate::app::animator::AnimationMode;
use crate::error::PersistenceError;
use crate::power::PowerState;
use crate::speed::SpeedState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The controller applied its boot state.
    Started(StateReport),

    /// The button moved the speed to a new level.
    SpeedChanged { from: SpeedState, to: SpeedState },

    /// Fan duty, animation and persistence were (re)applied.
    StateApplied(StateReport),

    /// The selected speed could not be written to storage.
    PersistFailed(PersistenceError),

    /// The battery flash window ran out and the LED went dark.
    AnimationExpired,

    /// Periodic tachometer measurement.
    FanRpm { rpm: u32, pulses: u32 },
}

/// Snapshot of what a state application put on the hardware.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StateReport {
    pub speed: SpeedState,
    pub power: PowerState,
    pub animation: AnimationMode,
    pub duty: u16,
}
