//! Battery charger status decoding.
//!
//! The charger IC exposes two open-drain, active-low status lines:
//!
//! | CHRG (charging) | STDBY (standby) | Power state |
//! |-----------------|-----------------|-------------|
//! | LOW             | any             | Charging    |
//! | HIGH            | LOW             | PluggedIn   |
//! | HIGH            | HIGH            | Battery     |
//!
//! Charging takes precedence over standby; the order must not change.

use embedded_hal::digital::InputPin;
use log::warn;
use serde::Serialize;

/// Where the fan is currently drawing power from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PowerState {
    /// Running from the battery, no external supply.
    Battery,
    /// External supply present, battery charging.
    Charging,
    /// External supply present, battery full.
    PluggedIn,
}

impl PowerState {
    /// Decode raw line levels (`true` = electrically high = not asserted).
    pub fn decode(charging_high: bool, standby_high: bool) -> Self {
        if !charging_high {
            Self::Charging
        } else if !standby_high {
            Self::PluggedIn
        } else {
            Self::Battery
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Battery => "Battery",
            Self::Charging => "Charging",
            Self::PluggedIn => "PluggedIn",
        }
    }
}

/// Reads the two charger lines on demand.  Holds no state besides the pins.
pub struct PowerStateDetector<C, S> {
    charging: C,
    standby: S,
}

impl<C: InputPin, S: InputPin> PowerStateDetector<C, S> {
    pub fn new(charging: C, standby: S) -> Self {
        Self { charging, standby }
    }

    /// Sample both lines and decode.
    ///
    /// A failed pin read is treated as "not asserted" (the pull-up level),
    /// which degrades towards `Battery`.
    pub fn read(&mut self) -> PowerState {
        let charging_high = self.charging.is_high().unwrap_or_else(|_| {
            warn!("power: charging line read failed, assuming not asserted");
            true
        });
        let standby_high = self.standby.is_high().unwrap_or_else(|_| {
            warn!("power: standby line read failed, assuming not asserted");
            true
        });
        PowerState::decode(charging_high, standby_high)
    }
}
