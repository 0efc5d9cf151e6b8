//! Fan speed levels.
//!
//! Each level maps 1:1 to an HSV colour shown on the status pixel and to a
//! normalized fan-speed fraction.
//!
//! | Level      | Ordinal | Colour (h, s, v) | Fan    |
//! |------------|---------|------------------|--------|
//! | Idle       | 0       | white            | 0 %    |
//! | Low        | 1       | blue             | 20 %   |
//! | LowPlus    | 2       | cyan             | 40 %   |
//! | Medium     | 3       | green            | 60 %   |
//! | MediumPlus | 4       | yellow           | 80 %   |
//! | High       | 5       | red              | 100 %  |

use serde::Serialize;

/// Hue (degrees), saturation and value (0.0-1.0).
pub type Hsv = (f32, f32, f32);

const COLORS: [Hsv; SpeedState::COUNT] = [
    (0.0, 0.0, 1.0),
    (240.0, 1.0, 1.0),
    (180.0, 1.0, 1.0),
    (120.0, 1.0, 1.0),
    (60.0, 1.0, 1.0),
    (0.0, 1.0, 1.0),
];

const FRACTIONS: [f32; SpeedState::COUNT] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// Selected fan speed.  Ordered; advancing past `High` wraps to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum SpeedState {
    Idle = 0,
    Low = 1,
    LowPlus = 2,
    Medium = 3,
    MediumPlus = 4,
    High = 5,
}

impl SpeedState {
    /// Total number of speed levels.
    pub const COUNT: usize = 6;

    /// Every level in ascending order.
    pub const ALL: [SpeedState; Self::COUNT] = [
        Self::Idle,
        Self::Low,
        Self::LowPlus,
        Self::Medium,
        Self::MediumPlus,
        Self::High,
    ];

    /// Convert a stored ordinal back to a level.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// The next level, wrapping `High` → `Idle`.
    pub fn next(self) -> Self {
        Self::ALL[(self as usize + 1) % Self::COUNT]
    }

    pub fn hsv(self) -> Hsv {
        COLORS[self as usize]
    }

    /// Normalized fan speed in `[0, 1]`.
    pub fn fan_fraction(self) -> f32 {
        FRACTIONS[self as usize]
    }

    /// PWM duty as a 16-bit fraction of full scale.
    pub fn duty_u16(self) -> u16 {
        duty_from_fraction(self.fan_fraction())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Low => "Low",
            Self::LowPlus => "LowPlus",
            Self::Medium => "Medium",
            Self::MediumPlus => "MediumPlus",
            Self::High => "High",
        }
    }
}

/// Scale a normalized fraction to a 16-bit duty.  Out-of-range input is
/// clamped.
pub fn duty_from_fraction(fraction: f32) -> u16 {
    (fraction.clamp(0.0, 1.0) * f32::from(u16::MAX)) as u16
}
