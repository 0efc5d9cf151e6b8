//! Fan speed measurement from tachometer pulses.
//!
//! Samples a [`PulseCounter`] at a fixed interval and turns the pulse
//! delta into revolutions per minute:
//!
//! ```text
//! rpm = Δpulses × 60 000 / (Δms × pulses_per_rev)
//! ```

use crate::config::FanConfig;
use crate::sensors::pulse_counter::{MAX_COUNT, PulseCounter, PulseSource};

/// Result of one tachometer sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpmReading {
    /// Pulses counted in the sample window.
    pub pulses: u32,
    /// Calculated fan speed.
    pub rpm: u32,
}

/// RPM for `pulses` counted over `elapsed_ms`.  Zero for an empty window.
pub fn rpm(pulses: u32, elapsed_ms: u64, pulses_per_rev: u32) -> u32 {
    let denom = elapsed_ms * u64::from(pulses_per_rev.max(1));
    if denom == 0 {
        return 0;
    }
    (u64::from(pulses) * 60_000 / denom).min(u64::from(u32::MAX)) as u32
}

pub struct Tachometer<S> {
    counter: PulseCounter<S>,
    pulses_per_rev: u32,
    interval_ms: u64,
    /// (time, count) at the previous sample.
    last: Option<(u64, u32)>,
}

impl<S: PulseSource> Tachometer<S> {
    pub fn new(counter: PulseCounter<S>, config: &FanConfig) -> Self {
        Self {
            counter,
            pulses_per_rev: config.tach_pulses_per_rev,
            interval_ms: u64::from(config.tach_sample_interval_ms),
            last: None,
        }
    }

    /// Take a sample if the interval has elapsed.
    ///
    /// The first call only records a baseline.
    pub fn sample(&mut self, now_ms: u64) -> Option<RpmReading> {
        let count = self.counter.read();
        let Some((then_ms, then_count)) = self.last else {
            self.last = Some((now_ms, count));
            return None;
        };

        let elapsed_ms = now_ms.saturating_sub(then_ms);
        if elapsed_ms < self.interval_ms {
            return None;
        }
        self.last = Some((now_ms, count));

        let pulses = count.wrapping_sub(then_count) & MAX_COUNT;
        Some(RpmReading {
            pulses,
            rpm: rpm(pulses, elapsed_ms, self.pulses_per_rev),
        })
    }
}
