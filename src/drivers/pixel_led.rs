//! Single WS2812B status pixel.
//!
//! On ESP-IDF the pixel is clocked out through an RMT channel: 24 bits in
//! GRB order, MSB first, each bit a high/low pulse pair.  On host builds the
//! driver keeps the last colour in memory.

use crate::color::{OFF, Rgb};

#[cfg(target_os = "espidf")]
use esp_idf_hal::rmt::{FixedLengthSignal, PinState, Pulse, TxRmtDriver};

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::EspError;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init::HwInitError;

/// Pack `rgb` into the 24-bit GRB word the pixel expects.
pub fn grb_word(rgb: Rgb) -> u32 {
    (u32::from(rgb.1) << 16) | (u32::from(rgb.0) << 8) | u32::from(rgb.2)
}

#[cfg(target_os = "espidf")]
struct BitTiming {
    zero: (Pulse, Pulse),
    one: (Pulse, Pulse),
}

pub struct PixelLed {
    #[cfg(target_os = "espidf")]
    tx: TxRmtDriver<'static>,
    #[cfg(target_os = "espidf")]
    timing: BitTiming,
    current: Rgb,
}

impl PixelLed {
    /// Wrap an RMT channel already bound to the pixel's data pin.
    #[cfg(target_os = "espidf")]
    pub fn new(tx: TxRmtDriver<'static>) -> Result<Self, HwInitError> {
        use core::time::Duration;

        let rmt_err = |e: EspError| HwInitError::RmtInitFailed(e.code());
        let ticks_hz = tx.counter_clock().map_err(rmt_err)?;
        let pulse = |state, ns| {
            Pulse::new_with_duration(ticks_hz, state, &Duration::from_nanos(ns)).map_err(rmt_err)
        };
        let timing = BitTiming {
            zero: (pulse(PinState::High, 350)?, pulse(PinState::Low, 800)?),
            one: (pulse(PinState::High, 700)?, pulse(PinState::Low, 600)?),
        };
        Ok(Self {
            tx,
            timing,
            current: OFF,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Self {
        Self { current: OFF }
    }

    /// Last colour successfully written.
    pub fn current(&self) -> Rgb {
        self.current
    }

    #[cfg(target_os = "espidf")]
    pub fn write(&mut self, rgb: Rgb) -> Result<(), EspError> {
        let word = grb_word(rgb);
        let mut signal = FixedLengthSignal::<24>::new();
        for bit in 0..24 {
            let set = word & (1 << (23 - bit)) != 0;
            let pair = if set { &self.timing.one } else { &self.timing.zero };
            signal.set(bit, pair)?;
        }
        self.tx.start_blocking(&signal)?;
        self.current = rgb;
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn write(&mut self, rgb: Rgb) -> Result<(), core::convert::Infallible> {
        self.current = rgb;
        Ok(())
    }
}

#[cfg(not(target_os = "espidf"))]
impl Default for PixelLed {
    fn default() -> Self {
        Self::new()
    }
}
