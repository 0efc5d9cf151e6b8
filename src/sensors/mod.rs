//! Sensor subsystem.
//!
//! The only sensor is the fan tachometer: a [`pulse_counter`] fed by the
//! [`pcnt`] peripheral on the target, sampled by the [`tachometer`] into RPM.

pub mod pcnt;
pub mod pulse_counter;
pub mod tachometer;
