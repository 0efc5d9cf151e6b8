//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.  The clock is manual
//! and the animation timer is simulated against it.

use battfan::app::events::AppEvent;
use battfan::app::ports::{
    AnimationTimerPort, ClockPort, EventSink, FanPort, LedPort, PowerSensePort, StorageError,
    StoragePort,
};
use battfan::color::Rgb;
use battfan::power::PowerState;
use std::collections::HashMap;

// ── Hardware call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    SetDuty(u16),
    WriteLed(Rgb),
    ArmOneShot(u32),
    ArmPeriodic(u32),
    Disarm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Armed {
    No,
    OneShot { due_ms: u64 },
    Periodic { due_ms: u64, period_ms: u32 },
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<HwCall>,
    pub power: PowerState,
    now_ms: u64,
    armed: Armed,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(power: PowerState) -> Self {
        Self {
            calls: Vec::new(),
            power,
            now_ms: 0,
            armed: Armed::No,
        }
    }

    pub fn now(&self) -> u64 {
        self.now_ms
    }

    pub fn set_now(&mut self, ms: u64) {
        self.now_ms = ms;
    }

    pub fn last_duty(&self) -> Option<u16> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::SetDuty(d) => Some(*d),
            _ => None,
        })
    }

    pub fn last_led(&self) -> Option<Rgb> {
        self.calls.iter().rev().find_map(|c| match c {
            HwCall::WriteLed(rgb) => Some(*rgb),
            _ => None,
        })
    }

    pub fn is_armed(&self) -> bool {
        self.armed != Armed::No
    }

    /// Whether the simulated timer has reached its next expiry.
    pub fn timer_due(&self) -> bool {
        match self.armed {
            Armed::No => false,
            Armed::OneShot { due_ms } | Armed::Periodic { due_ms, .. } => self.now_ms >= due_ms,
        }
    }

    /// Consume one expiry, as the real timer does when it fires.
    pub fn fire(&mut self) {
        self.armed = match self.armed {
            Armed::OneShot { .. } | Armed::No => Armed::No,
            Armed::Periodic { due_ms, period_ms } => Armed::Periodic {
                due_ms: due_ms + u64::from(period_ms),
                period_ms,
            },
        };
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl FanPort for MockHardware {
    fn set_fan_duty(&mut self, duty: u16) {
        self.calls.push(HwCall::SetDuty(duty));
    }
}

impl LedPort for MockHardware {
    fn write_led(&mut self, rgb: Rgb) {
        self.calls.push(HwCall::WriteLed(rgb));
    }
}

impl AnimationTimerPort for MockHardware {
    fn arm_one_shot(&mut self, period_ms: u32) {
        self.calls.push(HwCall::ArmOneShot(period_ms));
        self.armed = Armed::OneShot {
            due_ms: self.now_ms + u64::from(period_ms),
        };
    }

    fn arm_periodic(&mut self, period_ms: u32) {
        self.calls.push(HwCall::ArmPeriodic(period_ms));
        self.armed = Armed::Periodic {
            due_ms: self.now_ms + u64::from(period_ms),
            period_ms,
        };
    }

    fn disarm(&mut self) {
        self.calls.push(HwCall::Disarm);
        self.armed = Armed::No;
    }
}

impl PowerSensePort for MockHardware {
    fn power_state(&mut self) -> PowerState {
        self.power
    }
}

impl ClockPort for MockHardware {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

// ── MockNvs ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub writes: usize,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(namespace: &str, key: &str, data: &[u8]) -> Self {
        let mut nvs = Self::new();
        nvs.store.insert(format!("{}::{}", namespace, key), data.to_vec());
        nvs
    }

    pub fn raw(&self, namespace: &str, key: &str) -> Option<&[u8]> {
        self.store
            .get(&format!("{}::{}", namespace, key))
            .map(Vec::as_slice)
    }
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        if self.fail_reads {
            return Err(StorageError::IoError);
        }
        match self.store.get(&format!("{}::{}", namespace, key)) {
            Some(v) if v.len() > buf.len() => Err(StorageError::TooLong),
            Some(v) => {
                buf[..v.len()].copy_from_slice(v);
                Ok(v.len())
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::Full);
        }
        self.writes += 1;
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
