//! Speed controller — the hexagonal core.
//!
//! [`SpeedController`] owns the selected speed and the LED animator.  It is
//! driven entirely by drained [`Event`]s and reaches hardware, storage and
//! logging only through port traits injected at call sites.
//!
//! ```text
//!  Event ──▶ ┌──────────────────┐ ──▶ FanPort / LedPort / timer
//!            │  SpeedController │ ──▶ StoragePort
//!            │  speed · animator│ ──▶ EventSink
//!            └──────────────────┘
//! ```
//!
//! Every state change ends in [`apply`](SpeedController::apply): fan duty,
//! the animation for the live power state, then persistence, in that order
//! and always together.

use log::{debug, info, warn};

use crate::app::animator::{AnimationMode, LedAnimator, TickOutcome};
use crate::app::events::{AppEvent, StateReport};
use crate::app::persistence;
use crate::app::ports::{EventSink, FanHardware, StoragePort};
use crate::config::FanConfig;
use crate::events::Event;
use crate::power::PowerState;
use crate::speed::SpeedState;

pub struct SpeedController {
    speed: SpeedState,
    animator: LedAnimator,
    debounce_ms: u64,
    last_press_ms: Option<u64>,
}

impl SpeedController {
    /// Build the controller around the speed restored at boot.
    ///
    /// Does not touch hardware; call [`start`](Self::start) next.
    pub fn new(config: &FanConfig, initial: SpeedState) -> Self {
        Self {
            speed: initial,
            animator: LedAnimator::new(config),
            debounce_ms: u64::from(config.button_debounce_ms),
            last_press_ms: None,
        }
    }

    pub fn speed(&self) -> SpeedState {
        self.speed
    }

    pub fn animator(&self) -> &LedAnimator {
        &self.animator
    }

    /// Apply the boot state once so fan and LED reflect the restored speed.
    pub fn start(
        &mut self,
        hw: &mut impl FanHardware,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        info!("controller: starting at {}", self.speed.name());
        let report = self.apply(hw, store, sink);
        sink.emit(&AppEvent::Started(report));
    }

    /// Dispatch one drained event.
    pub fn handle(
        &mut self,
        event: Event,
        hw: &mut impl FanHardware,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        match event {
            Event::SpeedButton => self.on_button(hw, store, sink),
            Event::StandbyLine | Event::ChargingLine => self.on_power_changed(hw, store, sink),
            Event::AnimationTimer => self.on_animation_timer(hw, sink),
        }
    }

    /// Speed button pressed.
    ///
    /// On battery with the LED already dark, the press only re-lights the
    /// current speed.  Otherwise the speed advances one level, wrapping
    /// `High` to `Idle`.  Presses closer than the debounce window to the
    /// last accepted one are contact bounce and are dropped.
    pub fn on_button(
        &mut self,
        hw: &mut impl FanHardware,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        let now = hw.now_ms();
        if self
            .last_press_ms
            .is_some_and(|last| now.saturating_sub(last) < self.debounce_ms)
        {
            debug!("controller: bounce dropped");
            return;
        }
        self.last_press_ms = Some(now);

        let power = hw.power_state();
        if power == PowerState::Battery && !self.animator.is_running() {
            debug!("controller: wake press, speed stays {}", self.speed.name());
        } else {
            let from = self.speed;
            self.speed = from.next();
            info!("controller: speed {} -> {}", from.name(), self.speed.name());
            sink.emit(&AppEvent::SpeedChanged { from, to: self.speed });
        }
        self.apply(hw, store, sink);
    }

    /// A charger status line changed.  Speed is untouched; the animation
    /// for the new power state is started.
    pub fn on_power_changed(
        &mut self,
        hw: &mut impl FanHardware,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) {
        self.apply(hw, store, sink);
    }

    /// The animation timer fired.
    pub fn on_animation_timer(&mut self, hw: &mut impl FanHardware, sink: &mut impl EventSink) {
        if self.animator.on_timer(self.speed, hw) == TickOutcome::Expired {
            sink.emit(&AppEvent::AnimationExpired);
        }
    }

    /// Push the current speed to every output.
    ///
    /// A failed persist is reported and dropped; the selection stays in
    /// effect until the next power cycle.
    pub fn apply(
        &mut self,
        hw: &mut impl FanHardware,
        store: &mut impl StoragePort,
        sink: &mut impl EventSink,
    ) -> StateReport {
        let duty = self.speed.duty_u16();
        hw.set_fan_duty(duty);

        let power = hw.power_state();
        let animation = AnimationMode::for_power(power);
        self.animator.start(animation, self.speed, hw);

        if let Err(e) = persistence::save_speed(store, self.speed) {
            warn!("controller: speed not persisted: {e}");
            sink.emit(&AppEvent::PersistFailed(e));
        }

        let report = StateReport {
            speed: self.speed,
            power,
            animation,
            duty,
        };
        sink.emit(&AppEvent::StateApplied(report));
        report
    }
}
