//! 4-wire PWM fan driver.
//!
//! Takes duty as a 16-bit fraction of full scale and rescales it to the
//! LEDC channel's resolution.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives real PWM via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

/// Top of the LEDC duty range.
const LEDC_DUTY_MAX: u32 = (1 << pins::FAN_PWM_RESOLUTION_BITS) - 1;

/// Rescale a 16-bit duty to LEDC counts, rounding to nearest.
pub fn ledc_duty(duty: u16) -> u32 {
    (u32::from(duty) * LEDC_DUTY_MAX + u32::from(u16::MAX) / 2) / u32::from(u16::MAX)
}

#[derive(Default)]
pub struct FanDriver {
    duty: u16,
}

impl FanDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_duty(&mut self, duty: u16) {
        hw_init::ledc_set(hw_init::LEDC_CH_FAN, ledc_duty(duty));
        self.duty = duty;
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}
