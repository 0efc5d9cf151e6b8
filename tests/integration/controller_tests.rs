//! End-to-end controller behaviour: events raised into a scheduler, drained
//! into the controller, observed on mock hardware.

use battfan::app::animator::AnimationMode;
use battfan::app::controller::SpeedController;
use battfan::app::events::AppEvent;
use battfan::app::persistence::{self, SPEED_KEY, SPEED_NAMESPACE};
use battfan::config::FanConfig;
use battfan::events::{Event, EventScheduler};
use battfan::power::PowerState;
use battfan::speed::SpeedState;

use crate::mock_hw::{HwCall, MockHardware, MockNvs, RecordingSink};

const OFF: (u8, u8, u8) = (0, 0, 0);

struct Rig {
    sched: EventScheduler,
    ctl: SpeedController,
    hw: MockHardware,
    nvs: MockNvs,
    sink: RecordingSink,
}

impl Rig {
    fn boot(power: PowerState, nvs: MockNvs) -> Self {
        let initial = persistence::load_speed_or_default(&nvs);
        let mut rig = Self {
            sched: EventScheduler::new(),
            ctl: SpeedController::new(&FanConfig::default(), initial),
            hw: MockHardware::new(power),
            nvs,
            sink: RecordingSink::new(),
        };
        rig.ctl.start(&mut rig.hw, &mut rig.nvs, &mut rig.sink);
        rig
    }

    fn drain(&mut self) {
        let Self {
            sched,
            ctl,
            hw,
            nvs,
            sink,
        } = self;
        sched.drain(|e| ctl.handle(e, hw, nvs, sink)).unwrap();
    }

    fn raise(&mut self, event: Event) {
        self.sched.raise(event).unwrap();
        self.drain();
    }

    fn press(&mut self) {
        self.raise(Event::SpeedButton);
    }

    fn plug(&mut self, power: PowerState) {
        self.hw.power = power;
        self.raise(Event::ChargingLine);
    }

    /// Let `ms` pass one millisecond at a time, delivering timer expiries
    /// through the scheduler like the real timer callback does.
    fn advance(&mut self, ms: u64) {
        let end = self.hw.now() + ms;
        while self.hw.now() < end {
            let next = self.hw.now() + 1;
            self.hw.set_now(next);
            if self.hw.timer_due() {
                self.hw.fire();
                self.sched.raise(Event::AnimationTimer).unwrap();
            }
            self.drain();
        }
    }

    fn stored(&self) -> Option<&[u8]> {
        self.nvs.raw(SPEED_NAMESPACE, SPEED_KEY)
    }
}

fn stored_speed(speed: SpeedState) -> MockNvs {
    let digit = [b'0' + speed.ordinal()];
    MockNvs::with(SPEED_NAMESPACE, SPEED_KEY, &digit)
}

#[test]
fn fresh_boot_on_battery_one_press() {
    let mut rig = Rig::boot(PowerState::Battery, MockNvs::new());
    assert_eq!(rig.ctl.speed(), SpeedState::Idle);

    rig.advance(1000);
    rig.press();

    assert_eq!(rig.ctl.speed(), SpeedState::Low);
    assert_eq!(rig.hw.last_duty(), Some(SpeedState::Low.duty_u16()));
    assert_eq!(rig.hw.last_led(), Some((0, 0, 31)));
    assert_eq!(rig.stored(), Some(&b"1"[..]));

    rig.advance(4999);
    assert_eq!(rig.hw.last_led(), Some((0, 0, 31)));
    assert!(rig.ctl.animator().is_running());

    rig.advance(1);
    assert_eq!(rig.hw.last_led(), Some(OFF));
    assert!(!rig.ctl.animator().is_running());
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::AnimationExpired)),
        1
    );
}

#[test]
fn press_after_timeout_only_relights() {
    let mut rig = Rig::boot(PowerState::Battery, stored_speed(SpeedState::Medium));
    rig.advance(5000);
    assert_eq!(rig.hw.last_led(), Some(OFF));

    rig.press();
    assert_eq!(rig.ctl.speed(), SpeedState::Medium);
    assert_eq!(rig.hw.last_led(), Some((0, 31, 0)));
    assert!(rig.ctl.animator().is_running());
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::SpeedChanged { .. })),
        0
    );
}

#[test]
fn press_while_lit_advances_and_restarts_window() {
    let mut rig = Rig::boot(PowerState::Battery, MockNvs::new());
    rig.advance(2000);
    rig.press();
    assert_eq!(rig.ctl.speed(), SpeedState::Low);

    // The boot flash would have ended here.
    rig.advance(3000);
    assert_eq!(rig.hw.last_led(), Some((0, 0, 31)));

    rig.advance(2000);
    assert_eq!(rig.hw.last_led(), Some(OFF));
}

#[test]
fn stale_timer_tick_does_not_cut_flash_short() {
    let mut rig = Rig::boot(PowerState::Battery, MockNvs::new());
    rig.advance(3000);
    rig.press();

    // A tick left in the queue by the previous window.
    rig.hw.set_now(5000);
    rig.raise(Event::AnimationTimer);
    assert_eq!(rig.hw.last_led(), Some((0, 0, 31)));
    assert!(rig.ctl.animator().is_running());
}

#[test]
fn charging_breathes_at_current_speed() {
    let mut rig = Rig::boot(PowerState::Battery, stored_speed(SpeedState::High));
    rig.advance(100);
    rig.hw.clear_calls();

    rig.plug(PowerState::Charging);
    assert_eq!(rig.ctl.speed(), SpeedState::High);
    assert_eq!(
        rig.hw.calls,
        vec![
            HwCall::SetDuty(u16::MAX),
            HwCall::Disarm,
            HwCall::ArmPeriodic(10),
        ]
    );

    rig.advance(10);
    assert_eq!(rig.hw.last_led(), Some((31, 0, 0)));

    // |cos| bottoms out near π/2 s and peaks again near π s.
    rig.advance(1560);
    assert_eq!(rig.hw.last_led(), Some(OFF));
    rig.advance(1570);
    assert_eq!(rig.hw.last_led(), Some((31, 0, 0)));

    assert_eq!(rig.stored(), Some(&b"5"[..]));
}

#[test]
fn plugged_in_holds_solid_colour() {
    let mut rig = Rig::boot(PowerState::Battery, stored_speed(SpeedState::LowPlus));
    rig.plug(PowerState::Charging);
    rig.plug(PowerState::PluggedIn);

    assert!(!rig.hw.is_armed());
    assert!(!rig.ctl.animator().is_running());
    assert_eq!(rig.hw.last_led(), Some((0, 31, 31)));

    rig.hw.clear_calls();
    rig.advance(1000);
    assert!(rig.hw.calls.is_empty());
}

#[test]
fn plugged_press_wraps_high_to_idle() {
    let mut rig = Rig::boot(PowerState::PluggedIn, stored_speed(SpeedState::High));
    rig.press();
    assert_eq!(rig.ctl.speed(), SpeedState::Idle);
    assert_eq!(rig.hw.last_duty(), Some(0));
    assert_eq!(rig.hw.last_led(), Some((31, 31, 31)));
}

#[test]
fn contact_bounce_counts_once() {
    let mut rig = Rig::boot(PowerState::PluggedIn, MockNvs::new());
    rig.press();
    rig.advance(10);
    rig.press();
    assert_eq!(rig.ctl.speed(), SpeedState::Low);

    rig.advance(100);
    rig.press();
    assert_eq!(rig.ctl.speed(), SpeedState::LowPlus);
}

#[test]
fn persist_failure_keeps_selection() {
    let mut nvs = MockNvs::new();
    nvs.fail_writes = true;
    let mut rig = Rig::boot(PowerState::PluggedIn, nvs);

    rig.press();
    assert_eq!(rig.ctl.speed(), SpeedState::Low);
    assert_eq!(rig.hw.last_duty(), Some(SpeedState::Low.duty_u16()));
    assert_eq!(rig.stored(), None);
    assert!(rig.sink.count(|e| matches!(e, AppEvent::PersistFailed(_))) >= 2);
}

#[test]
fn selection_survives_reboot() {
    let mut rig = Rig::boot(PowerState::PluggedIn, MockNvs::new());
    for _ in 0..3 {
        rig.advance(100);
        rig.press();
    }
    assert_eq!(rig.ctl.speed(), SpeedState::Medium);

    let rig = Rig::boot(PowerState::Battery, rig.nvs);
    assert_eq!(rig.ctl.speed(), SpeedState::Medium);
    assert_eq!(rig.hw.last_duty(), Some(SpeedState::Medium.duty_u16()));
}

#[test]
fn coalesced_line_edges_apply_once_per_source() {
    let mut rig = Rig::boot(PowerState::PluggedIn, MockNvs::new());
    rig.sink.events.clear();

    for _ in 0..3 {
        rig.sched.raise(Event::StandbyLine).unwrap();
        rig.sched.raise(Event::ChargingLine).unwrap();
    }
    rig.drain();

    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::StateApplied(_))),
        2
    );
}

#[test]
fn every_arm_follows_a_disarm() {
    let mut rig = Rig::boot(PowerState::Battery, MockNvs::new());
    rig.press();
    rig.plug(PowerState::Charging);
    rig.advance(50);
    rig.plug(PowerState::Battery);
    rig.advance(200);
    rig.press();
    rig.plug(PowerState::PluggedIn);

    let mut disarmed = true;
    for call in &rig.hw.calls {
        match call {
            HwCall::Disarm => disarmed = true,
            HwCall::ArmOneShot(_) | HwCall::ArmPeriodic(_) => {
                assert!(disarmed, "timer armed twice without disarm: {:?}", rig.hw.calls);
                disarmed = false;
            }
            _ => {}
        }
    }
}

#[test]
fn state_report_tracks_power_mode() {
    let mut rig = Rig::boot(PowerState::Battery, MockNvs::new());
    rig.plug(PowerState::Charging);

    let last = rig.sink.events.iter().rev().find_map(|e| match e {
        AppEvent::StateApplied(r) => Some(*r),
        _ => None,
    });
    let report = last.unwrap();
    assert_eq!(report.power, PowerState::Charging);
    assert_eq!(report.animation, AnimationMode::ChargingPulse);
    assert_eq!(report.speed, SpeedState::Idle);
}
