//! Tach edge counting on the PCNT peripheral.
//!
//! The unit counts down on every rising edge of the tach line without any
//! CPU involvement.  Its counter is only 16 bits wide, so it is run between
//! `WRAP_LIMIT` and zero: reaching the limit resets the counter and fires
//! the one interrupt this module installs, which adds a wrap to
//! `TACH_WRAPS`.  A snapshot combines wraps and the live counter into the
//! 32-bit decrementing register [`PulseSource`] describes.
//!
//! [`PulseSource`]: super::pulse_counter::PulseSource

/// Low limit of the hardware counter.  Each wrap is this many edges.
pub const WRAP_LIMIT: i16 = -32_000;

/// Register value after `wraps` full wraps plus a live counter reading.
///
/// `counter` is the hardware value in `WRAP_LIMIT..=0`.
pub fn register_value(base: u32, wraps: u32, counter: i16) -> u32 {
    let edges = wraps
        .wrapping_mul(u32::from(WRAP_LIMIT.unsigned_abs()))
        .wrapping_add(u32::from(counter.unsigned_abs()));
    base.wrapping_sub(edges)
}

#[cfg(target_os = "espidf")]
pub use device::PcntPulseSource;

#[cfg(target_os = "espidf")]
mod device {
    use core::sync::atomic::{AtomicU32, Ordering};

    use esp_idf_hal::gpio::{AnyInputPin, InputPin};
    use esp_idf_hal::pcnt::{
        Pcnt, PcntChannel, PcntChannelConfig, PcntControlMode, PcntCountMode, PcntDriver,
        PcntEvent, PcntEventType, PinIndex,
    };
    use esp_idf_hal::peripheral::Peripheral;
    use esp_idf_svc::sys::EspError;
    use log::{info, warn};

    use super::{WRAP_LIMIT, register_value};
    use crate::sensors::pulse_counter::PulseSource;

    /// Wraps counted by the limit interrupt.  One PCNT tach source exists.
    static TACH_WRAPS: AtomicU32 = AtomicU32::new(0);

    /// APB cycles a level must hold to count (~12.8 µs at 80 MHz).
    const GLITCH_FILTER: u16 = 1023;

    pub struct PcntPulseSource<'d> {
        unit: PcntDriver<'d>,
        base: u32,
    }

    impl<'d> PcntPulseSource<'d> {
        pub fn new<U: Pcnt>(
            pcnt: impl Peripheral<P = U> + 'd,
            tach: impl Peripheral<P = impl InputPin> + 'd,
        ) -> Result<Self, EspError> {
            let mut unit = PcntDriver::new(
                pcnt,
                Some(tach),
                Option::<AnyInputPin>::None,
                Option::<AnyInputPin>::None,
                Option::<AnyInputPin>::None,
            )?;
            unit.channel_config(
                PcntChannel::Channel0,
                PinIndex::Pin0,
                PinIndex::Pin1,
                &PcntChannelConfig {
                    lctrl_mode: PcntControlMode::Keep,
                    hctrl_mode: PcntControlMode::Keep,
                    pos_mode: PcntCountMode::Decrement,
                    neg_mode: PcntCountMode::Hold,
                    counter_h_lim: i16::MAX,
                    counter_l_lim: WRAP_LIMIT,
                },
            )?;
            unit.set_filter_value(GLITCH_FILTER)?;
            unit.filter_enable()?;

            // SAFETY: the callback only touches a static atomic.
            unsafe {
                unit.subscribe(|status| {
                    if PcntEventType::from_repr_truncated(status).contains(PcntEvent::LowLimit) {
                        TACH_WRAPS.fetch_add(1, Ordering::Relaxed);
                    }
                })?;
            }
            unit.event_enable(PcntEvent::LowLimit)?;
            info!("pcnt: tach counter ready (wrap every {} edges)", WRAP_LIMIT.unsigned_abs());

            Ok(Self { unit, base: 0 })
        }

        fn restart(&self) -> Result<(), EspError> {
            self.unit.counter_pause()?;
            self.unit.counter_clear()?;
            TACH_WRAPS.store(0, Ordering::Relaxed);
            self.unit.counter_resume()
        }
    }

    impl PulseSource for PcntPulseSource<'_> {
        fn load(&mut self, initial: u32) {
            self.base = initial;
            if let Err(e) = self.restart() {
                warn!("pcnt: reload failed ({e})");
            }
        }

        fn snapshot(&self) -> u32 {
            // Re-read if a wrap lands between the two halves.
            loop {
                let wraps = TACH_WRAPS.load(Ordering::Acquire);
                let counter = match self.unit.get_counter_value() {
                    Ok(v) => v,
                    Err(e) => {
                        warn!("pcnt: counter read failed ({e})");
                        0
                    }
                };
                if TACH_WRAPS.load(Ordering::Acquire) == wraps {
                    return register_value(self.base, wraps, counter);
                }
            }
        }
    }
}
