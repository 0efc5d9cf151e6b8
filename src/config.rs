//! System configuration parameters
//!
//! All tunable parameters for the fan controller.  These are compile-time
//! defaults; the only value persisted across reboots is the selected speed.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanConfig {
    // --- Status LED ---
    /// Brightness multiplier applied to every LED colour (0.0-1.0)
    pub max_brightness: f32,
    /// How long the LED stays lit on battery after a state change (ms)
    pub battery_flash_ms: u32,
    /// Tick period of the charging "breathing" animation (ms)
    pub charging_tick_ms: u32,

    // --- Fan ---
    /// Tachometer pulses emitted per fan revolution
    pub tach_pulses_per_rev: u32,
    /// Tachometer sampling interval (ms)
    pub tach_sample_interval_ms: u32,

    // --- Input ---
    /// Minimum spacing between two accepted button presses (ms)
    pub button_debounce_ms: u32,

    // --- Timing ---
    /// Main loop sleep between scheduler drains (ms)
    pub idle_poll_ms: u32,
}

impl Default for FanConfig {
    fn default() -> Self {
        Self {
            // Status LED
            max_brightness: 0.125,
            battery_flash_ms: 5000,
            charging_tick_ms: 10,

            // Fan
            tach_pulses_per_rev: 2,
            tach_sample_interval_ms: 1000,

            // Input
            button_debounce_ms: 50,

            // Timing
            idle_poll_ms: 5,
        }
    }
}
