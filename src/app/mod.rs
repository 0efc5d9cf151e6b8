//! Application core — pure domain logic, zero I/O.
//!
//! Speed selection, power-state reactions and the status-pixel animation
//! live here.  All interaction with hardware happens through **port
//! traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod animator;
pub mod controller;
pub mod events;
pub mod persistence;
pub mod ports;
