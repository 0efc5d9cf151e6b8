//! Status pixel animation state machine.
//!
//! One animation per power state:
//!
//! | Power     | Animation     | Behaviour                                    |
//! |-----------|---------------|----------------------------------------------|
//! | Battery   | BatteryBlink  | Speed colour for 5 s, then off               |
//! | Charging  | ChargingPulse | Speed colour, brightness `max × |cos(t)|`    |
//! | PluggedIn | PluggedSolid  | Speed colour, steady, no timer               |
//!
//! The animator never touches hardware from the timer callback.  The timer
//! only raises `Event::AnimationTimer`; the main loop then calls
//! [`LedAnimator::on_timer`].
//!
//! Exactly one [`AnimatorContext`] is live at a time.  Every transition
//! disarms the animation timer before arming a new one, so two logical
//! timers can never race on the pixel.

use log::debug;
use serde::Serialize;

use crate::app::ports::{AnimationTimerPort, ClockPort, LedPort};
use crate::color::{self, OFF};
use crate::config::FanConfig;
use crate::power::PowerState;
use crate::speed::SpeedState;

/// Which animation a power state calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AnimationMode {
    BatteryBlink,
    ChargingPulse,
    PluggedSolid,
}

impl AnimationMode {
    pub fn for_power(power: PowerState) -> Self {
        match power {
            PowerState::Battery => Self::BatteryBlink,
            PowerState::Charging => Self::ChargingPulse,
            PowerState::PluggedIn => Self::PluggedSolid,
        }
    }
}

/// The live animation and the data its timer ticks need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorContext {
    /// Nothing animating; the pixel holds whatever was last written.
    Idle,
    /// Pixel lit until `deadline_ms`, then switched off.
    BatteryBlink { deadline_ms: u64 },
    /// Breathing since `start_ms`.
    ChargingPulse { start_ms: u64 },
    /// Pixel lit, no timer armed.
    PluggedSolid,
}

impl AnimatorContext {
    /// Whether a timer belonging to this context is armed.
    pub fn is_running(self) -> bool {
        matches!(self, Self::BatteryBlink { .. } | Self::ChargingPulse { .. })
    }

    pub fn mode(self) -> Option<AnimationMode> {
        match self {
            Self::Idle => None,
            Self::BatteryBlink { .. } => Some(AnimationMode::BatteryBlink),
            Self::ChargingPulse { .. } => Some(AnimationMode::ChargingPulse),
            Self::PluggedSolid => Some(AnimationMode::PluggedSolid),
        }
    }
}

/// Outcome of one animation timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tick belonged to no live animation (or arrived early) and was dropped.
    Ignored,
    /// Charging pulse wrote a new brightness.
    Pulsed,
    /// Battery flash window ended; pixel is off.
    Expired,
}

/// Breathing brightness `elapsed_secs` into a charging pulse.
///
/// The phase is the raw elapsed time in seconds and is never wrapped.
pub fn pulse_brightness(max_brightness: f32, elapsed_secs: f32) -> f32 {
    max_brightness * elapsed_secs.cos().abs()
}

pub struct LedAnimator {
    ctx: AnimatorContext,
    max_brightness: f32,
    flash_ms: u32,
    tick_ms: u32,
}

impl LedAnimator {
    pub fn new(config: &FanConfig) -> Self {
        Self {
            ctx: AnimatorContext::Idle,
            max_brightness: config.max_brightness,
            flash_ms: config.battery_flash_ms,
            tick_ms: config.charging_tick_ms,
        }
    }

    pub fn context(&self) -> AnimatorContext {
        self.ctx
    }

    pub fn is_running(&self) -> bool {
        self.ctx.is_running()
    }

    /// Start `mode` for `speed`, replacing whatever was running.
    pub fn start<H>(&mut self, mode: AnimationMode, speed: SpeedState, hw: &mut H)
    where
        H: LedPort + AnimationTimerPort + ClockPort,
    {
        hw.disarm();

        self.ctx = match mode {
            AnimationMode::BatteryBlink => {
                hw.write_led(color::speed_rgb(speed, self.max_brightness));
                let deadline_ms = hw.now_ms() + u64::from(self.flash_ms);
                hw.arm_one_shot(self.flash_ms);
                AnimatorContext::BatteryBlink { deadline_ms }
            }
            AnimationMode::ChargingPulse => {
                let start_ms = hw.now_ms();
                hw.arm_periodic(self.tick_ms);
                AnimatorContext::ChargingPulse { start_ms }
            }
            AnimationMode::PluggedSolid => {
                hw.write_led(color::speed_rgb(speed, self.max_brightness));
                AnimatorContext::PluggedSolid
            }
        };
        debug!("animator: {:?} for {}", self.ctx, speed.name());
    }

    /// Handle one animation timer tick.
    ///
    /// Ticks queued by a timer that has since been disarmed may still be
    /// drained; a battery tick before the current deadline is one of those
    /// and is dropped.
    pub fn on_timer<H>(&mut self, speed: SpeedState, hw: &mut H) -> TickOutcome
    where
        H: LedPort + AnimationTimerPort + ClockPort,
    {
        match self.ctx {
            AnimatorContext::BatteryBlink { deadline_ms } => {
                if hw.now_ms() < deadline_ms {
                    return TickOutcome::Ignored;
                }
                hw.disarm();
                hw.write_led(OFF);
                self.ctx = AnimatorContext::Idle;
                TickOutcome::Expired
            }
            AnimatorContext::ChargingPulse { start_ms } => {
                let elapsed_ms = hw.now_ms().saturating_sub(start_ms);
                let brightness = pulse_brightness(self.max_brightness, elapsed_ms as f32 / 1000.0);
                hw.write_led(color::speed_rgb(speed, brightness));
                TickOutcome::Pulsed
            }
            AnimatorContext::Idle | AnimatorContext::PluggedSolid => TickOutcome::Ignored,
        }
    }
}
