//! BattFan Firmware — Main Entry Point
//!
//! Hexagonal architecture with interrupt-deferred, event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogEventSink   NvsAdapter              │
//! │  (Fan+LED+Timer+Power)  (EventSink)    (StoragePort)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │           SpeedController (pure logic)                 │    │
//! │  │  speed · LedAnimator · persistence                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  ISRs / esp_timer ──raise──▶ EventScheduler ──drain──▶ loop    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::rmt::TxRmtDriver;
use esp_idf_hal::rmt::config::TransmitConfig;
use log::{error, info};

use battfan::adapters::hardware::HardwareAdapter;
use battfan::adapters::log_sink::LogEventSink;
use battfan::adapters::nvs::NvsAdapter;
use battfan::adapters::time::Esp32TimeAdapter;
use battfan::app::controller::SpeedController;
use battfan::app::events::AppEvent;
use battfan::app::persistence;
use battfan::app::ports::{ClockPort, EventSink};
use battfan::config::FanConfig;
use battfan::drivers::fan::FanDriver;
use battfan::drivers::hw_init::{self, GpioInput};
use battfan::drivers::hw_timer::AnimationTimer;
use battfan::drivers::pixel_led::PixelLed;
use battfan::events::SCHEDULER;
use battfan::pins;
use battfan::power::PowerStateDetector;
use battfan::sensors::pcnt::PcntPulseSource;
use battfan::sensors::pulse_counter::PulseCounter;
use battfan::sensors::tachometer::Tachometer;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BattFan v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    let config = FanConfig::default();

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {} — restarting", e);
        hw_init::restart();
    }

    let peripherals = Peripherals::take()?;
    // SAFETY: neither pin is claimed anywhere else; `pins` is the only
    // place their numbers are defined.
    let (led_pin, tach_pin) = unsafe {
        (
            AnyOutputPin::new(pins::LED_DATA_GPIO),
            AnyInputPin::new(pins::TACH_GPIO),
        )
    };
    // WS2812 bit timing needs the undivided 80 MHz RMT clock.
    let rmt = TxRmtDriver::new(
        peripherals.rmt.channel0,
        led_pin,
        &TransmitConfig::new().clock_divider(1),
    )?;
    let led = PixelLed::new(rmt)?;
    let timer = AnimationTimer::new()?;

    let mut hw = HardwareAdapter::new(
        FanDriver::new(),
        led,
        timer,
        PowerStateDetector::new(GpioInput(pins::CHARGING_GPIO), GpioInput(pins::STANDBY_GPIO)),
        Esp32TimeAdapter::new(),
    );
    let tach_source = PcntPulseSource::new(peripherals.pcnt0, tach_pin)?;
    let mut tach = Tachometer::new(PulseCounter::new(tach_source), &config);

    // ── 3. Restore the selected speed ─────────────────────────
    let mut nvs = NvsAdapter::new()?;
    let initial = persistence::load_speed_or_default(&nvs);

    // ── 4. Start ──────────────────────────────────────────────
    let mut log_sink = LogEventSink::new();
    let mut controller = SpeedController::new(&config, initial);
    controller.start(&mut hw, &mut nvs, &mut log_sink);

    // ISRs go live only once the controller can handle their events.
    hw_init::init_isr_service()?;
    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    loop {
        let drained = SCHEDULER.drain(|event| {
            controller.handle(event, &mut hw, &mut nvs, &mut log_sink);
        });
        if let Err(e) = drained {
            error!("scheduler: {} — restarting", e);
            hw_init::restart();
        }

        if let Some(reading) = tach.sample(hw.now_ms()) {
            log_sink.emit(&AppEvent::FanRpm {
                rpm: reading.rpm,
                pulses: reading.pulses,
            });
        }

        esp_idf_hal::delay::FreeRtos::delay_ms(config.idle_poll_ms);
    }
}
