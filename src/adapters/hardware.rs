//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the fan, status pixel, animation timer, charger status detector
//! and clock, exposing them through the actuator and sensor ports.  This
//! is the only module in the system that touches actual hardware.  On
//! non-espidf targets, the underlying drivers use cfg-gated simulation
//! stubs.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::adapters::time::Esp32TimeAdapter;
use crate::app::ports::{AnimationTimerPort, ClockPort, FanPort, LedPort, PowerSensePort};
use crate::color::Rgb;
use crate::drivers::fan::FanDriver;
use crate::drivers::hw_timer::AnimationTimer;
use crate::drivers::pixel_led::PixelLed;
use crate::power::{PowerState, PowerStateDetector};

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<C, S> {
    fan: FanDriver,
    led: PixelLed,
    timer: AnimationTimer,
    power: PowerStateDetector<C, S>,
    clock: Esp32TimeAdapter,
}

impl<C: InputPin, S: InputPin> HardwareAdapter<C, S> {
    pub fn new(
        fan: FanDriver,
        led: PixelLed,
        timer: AnimationTimer,
        power: PowerStateDetector<C, S>,
        clock: Esp32TimeAdapter,
    ) -> Self {
        Self {
            fan,
            led,
            timer,
            power,
            clock,
        }
    }

    pub fn fan(&self) -> &FanDriver {
        &self.fan
    }

    pub fn led(&self) -> &PixelLed {
        &self.led
    }

    pub fn timer(&self) -> &AnimationTimer {
        &self.timer
    }
}

// ── Actuator ports ────────────────────────────────────────────

impl<C, S> FanPort for HardwareAdapter<C, S> {
    fn set_fan_duty(&mut self, duty: u16) {
        self.fan.set_duty(duty);
    }
}

impl<C, S> LedPort for HardwareAdapter<C, S> {
    fn write_led(&mut self, rgb: Rgb) {
        if let Err(e) = self.led.write(rgb) {
            warn!("hardware: pixel write failed: {:?}", e);
        }
    }
}

impl<C, S> AnimationTimerPort for HardwareAdapter<C, S> {
    fn arm_one_shot(&mut self, period_ms: u32) {
        self.timer.start_once(period_ms);
    }

    fn arm_periodic(&mut self, period_ms: u32) {
        self.timer.start_periodic(period_ms);
    }

    fn disarm(&mut self) {
        self.timer.stop();
    }
}

// ── Sensor ports ──────────────────────────────────────────────

impl<C: InputPin, S: InputPin> PowerSensePort for HardwareAdapter<C, S> {
    fn power_state(&mut self) -> PowerState {
        self.power.read()
    }
}

impl<C, S> ClockPort for HardwareAdapter<C, S> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
