//! GPIO / peripheral pin assignments for the BattFan controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Battery charger status (TP4056-style, open-drain, active-low)
// ---------------------------------------------------------------------------

/// Digital input: LOW while the charger reports "standby" (external power
/// present, battery full).
pub const STANDBY_GPIO: i32 = 4;
/// Digital input: LOW while the charger is actively charging the battery.
pub const CHARGING_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// User button (active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Momentary push-button that cycles the fan speed.
pub const BUTTON_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Fan
// ---------------------------------------------------------------------------

/// Open-collector tachometer output of the 4-wire fan.
pub const TACH_GPIO: i32 = 7;
/// LEDC PWM output to the fan's control input.
pub const FAN_PWM_GPIO: i32 = 8;

// ---------------------------------------------------------------------------
// Status pixel (WS2812B, single LED)
// ---------------------------------------------------------------------------

/// RMT data line to the pixel.
pub const LED_DATA_GPIO: i32 = 48;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC base frequency for the fan (25 kHz — Intel 4-wire fan spec).
pub const FAN_PWM_FREQ_HZ: u32 = 25_000;
/// LEDC timer resolution (bits).  80 MHz / 25 kHz leaves room for 11 bits.
pub const FAN_PWM_RESOLUTION_BITS: u32 = 11;
