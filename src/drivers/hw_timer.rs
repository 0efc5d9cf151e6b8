//! LED animation timer using ESP-IDF's esp_timer API.
//!
//! A single timer serves every animation: armed one-shot for the battery
//! flash, periodic for the charging pulse, stopped for solid colour.  Its
//! callback only raises `Event::AnimationTimer`; the animation step itself
//! runs in the main loop.
//!
//! Timer callbacks execute in the ESP timer task context (not ISR), so
//! they can safely call the lock-free `raise_from_isr()`.
//!
//! On simulation targets the timer only records how it was last armed.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::warn;

use log::debug;

use crate::drivers::hw_init::HwInitError;

/// How the timer is currently armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerArm {
    Disarmed,
    OneShot(u32),
    Periodic(u32),
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn animation_tick_cb(_arg: *mut core::ffi::c_void) {
    crate::events::raise_from_isr(crate::events::Event::AnimationTimer);
}

pub struct AnimationTimer {
    #[cfg(target_os = "espidf")]
    handle: esp_timer_handle_t,
    arm: TimerArm,
}

impl AnimationTimer {
    /// Create the timer, disarmed.
    #[cfg(target_os = "espidf")]
    pub fn new() -> Result<Self, HwInitError> {
        let args = esp_timer_create_args_t {
            callback: Some(animation_tick_cb),
            arg: core::ptr::null_mut(),
            dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
            name: b"anim\0".as_ptr() as *const _,
            // A late periodic tick is useless; the next one recomputes
            // brightness from the clock anyway.
            skip_unhandled_events: true,
        };
        let mut handle: esp_timer_handle_t = core::ptr::null_mut();
        // SAFETY: called once at boot from the main task; the callback only
        // raises into the lock-free scheduler.
        let ret = unsafe { esp_timer_create(&args, &mut handle) };
        if ret != ESP_OK {
            return Err(HwInitError::TimerCreateFailed(ret));
        }
        log::info!("hw_timer: animation timer created");
        Ok(Self {
            handle,
            arm: TimerArm::Disarmed,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, HwInitError> {
        log::info!("hw_timer(sim): animation timer recorded only");
        Ok(Self {
            arm: TimerArm::Disarmed,
        })
    }

    pub fn arm(&self) -> TimerArm {
        self.arm
    }

    pub fn start_once(&mut self, period_ms: u32) {
        self.stop();
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: handle was created in new() and is never deleted.
            let ret = unsafe { esp_timer_start_once(self.handle, u64::from(period_ms) * 1_000) };
            if ret != ESP_OK {
                warn!("hw_timer: one-shot start failed (rc={})", ret);
                return;
            }
        }
        debug!("hw_timer: one-shot {} ms", period_ms);
        self.arm = TimerArm::OneShot(period_ms);
    }

    pub fn start_periodic(&mut self, period_ms: u32) {
        self.stop();
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: handle was created in new() and is never deleted.
            let ret =
                unsafe { esp_timer_start_periodic(self.handle, u64::from(period_ms) * 1_000) };
            if ret != ESP_OK {
                warn!("hw_timer: periodic start failed (rc={})", ret);
                return;
            }
        }
        debug!("hw_timer: periodic {} ms", period_ms);
        self.arm = TimerArm::Periodic(period_ms);
    }

    /// Stop the timer.  Stopping an idle timer is a no-op.
    pub fn stop(&mut self) {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: handle was created in new() and is never deleted.
            // ESP_ERR_INVALID_STATE only means the timer was not running.
            unsafe {
                esp_timer_stop(self.handle);
            }
        }
        self.arm = TimerArm::Disarmed;
    }
}
