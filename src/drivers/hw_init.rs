//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions, edge interrupts and the fan LEDC channel
//! using raw ESP-IDF sys calls.  Called once from `main()` before the
//! event loop starts.
//!
//! Every ISR registered here does exactly one thing: raise an event into
//! the scheduler.  The tach line belongs to the PCNT unit
//! (`sensors::pcnt`) and is not configured here.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

use embedded_hal::digital::{ErrorType, InputPin};

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    IsrInstallFailed(i32),
    TimerCreateFailed(i32),
    RmtInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::TimerCreateFailed(rc) => write!(f, "animation timer create failed (rc={})", rc),
            Self::RmtInitFailed(rc) => write!(f, "RMT pixel channel init failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before event loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_ledc()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Charger lines: open-drain, so pull up; both edges matter.
    // Button: active-low, falling edge.
    let inputs = [
        (pins::STANDBY_GPIO, gpio_int_type_t_GPIO_INTR_ANYEDGE),
        (pins::CHARGING_GPIO, gpio_int_type_t_GPIO_INTR_ANYEDGE),
        (pins::BUTTON_GPIO, gpio_int_type_t_GPIO_INTR_NEGEDGE),
    ];

    for &(pin, intr_type) in &inputs {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_INPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
    }

    info!("hw_init: GPIO inputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

/// Simulation: every input idles at its pull-up level.
#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    true
}

/// A configured input pin exposed through `embedded-hal`.
///
/// Register reads cannot fail once the pin is configured.
#[derive(Debug, Clone, Copy)]
pub struct GpioInput(pub i32);

impl ErrorType for GpioInput {
    type Error = core::convert::Infallible;
}

impl InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio_read(self.0))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!gpio_read(self.0))
    }
}

// ── LEDC PWM ─────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() -> Result<(), HwInitError> {
    // Timer 0: fan (25 kHz, 11-bit)
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: pins::FAN_PWM_RESOLUTION_BITS,
        freq_hz: pins::FAN_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    let ret = unsafe { ledc_timer_config(&timer0) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    // Channel 0: fan PWM, starts stopped
    let ret = unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: LEDC_CH_FAN,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::FAN_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        })
    };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed(ret));
    }

    info!(
        "hw_init: LEDC configured (fan=CH0 @ {} Hz, {}-bit)",
        pins::FAN_PWM_FREQ_HZ,
        pins::FAN_PWM_RESOLUTION_BITS
    );
    Ok(())
}

pub const LEDC_CH_FAN: u32 = 0;

#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only main loop calls this function.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) {}

// ── GPIO ISR Service ──────────────────────────────────────────

#[cfg(target_os = "espidf")]
use crate::events::{raise_from_isr, Event};

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_gpio_isr(_arg: *mut core::ffi::c_void) {
    raise_from_isr(Event::SpeedButton);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn standby_gpio_isr(_arg: *mut core::ffi::c_void) {
    raise_from_isr(Event::StandbyLine);
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn charging_gpio_isr(_arg: *mut core::ffi::c_void) {
    raise_from_isr(Event::ChargingLine);
}

/// Install per-pin GPIO ISR service and register interrupt handlers.
/// Call after init_peripherals() and before the event loop.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: gpio_install_isr_service is idempotent; ESP_ERR_INVALID_STATE
    // means it was already installed (acceptable). ISR handlers registered
    // below are static functions that only touch lock-free atomics.
    unsafe {
        let ret = gpio_install_isr_service(0);
        if ret != ESP_OK && ret != ESP_ERR_INVALID_STATE as i32 {
            return Err(HwInitError::IsrInstallFailed(ret));
        }

        let handlers: [(i32, unsafe extern "C" fn(*mut core::ffi::c_void)); 3] = [
            (pins::BUTTON_GPIO, button_gpio_isr),
            (pins::STANDBY_GPIO, standby_gpio_isr),
            (pins::CHARGING_GPIO, charging_gpio_isr),
        ];
        for (pin, isr) in handlers {
            let ret = gpio_isr_handler_add(pin, Some(isr), core::ptr::null_mut());
            if ret != ESP_OK {
                return Err(HwInitError::IsrInstallFailed(ret));
            }
            gpio_intr_enable(pin);
        }

        info!("hw_init: ISR service installed (button, standby, charging)");
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

// ── Restart ───────────────────────────────────────────────────

/// Reboot the chip.  Used for conditions the firmware cannot recover from.
#[cfg(target_os = "espidf")]
pub fn restart() -> ! {
    // SAFETY: esp_restart never returns and has no preconditions.
    unsafe { esp_restart() }
}

/// Simulation: there is no chip to reboot.
#[cfg(not(target_os = "espidf"))]
pub fn restart() -> ! {
    panic!("restart requested");
}
