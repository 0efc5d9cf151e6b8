//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - GPIO ISRs (speed button, charger standby / charging lines)
//! - The LED animation timer callback
//!
//! Events are consumed by the main loop, which drains them one at a time
//! in FIFO order.  Every piece of controller state is touched only from
//! that drain, so handlers never run concurrently and need no locks.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────────┐
//! │ Button ISR  │────▶│              │     │                  │
//! │ Standby ISR │────▶│  Event Queue │────▶│  Main Loop       │
//! │ Charge ISR  │────▶│  (lock-free) │     │  SpeedController │
//! │ Anim timer  │────▶│              │     │                  │
//! └─────────────┘     └──────────────┘     └──────────────────┘
//! ```

use core::sync::atomic::{AtomicBool, Ordering};

use heapless::mpmc::MpMcQueue;

use crate::error::SchedulerError;

/// Maximum number of pending events.
/// Power of 2 (MPMC requirement); twice the number of sources so a
/// coalesced queue can never fill during normal operation.
const EVENT_QUEUE_CAP: usize = 8;

/// Deferred-work sources.  One variant per interrupt source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    /// Speed-select button falling edge.
    SpeedButton = 0,
    /// Charger standby line changed level.
    StandbyLine = 1,
    /// Charger charging line changed level.
    ChargingLine = 2,
    /// LED animation timer fired (one-shot or periodic).
    AnimationTimer = 3,
}

impl Event {
    /// Number of distinct sources.
    pub const COUNT: usize = 4;

    const fn index(self) -> usize {
        self as usize
    }
}

/// Deferred-callback queue shared between interrupt and main contexts.
///
/// `raise` is the only method that may be called from an ISR or timer
/// callback.  `drain` belongs to the main loop.
pub struct EventScheduler<const N: usize = EVENT_QUEUE_CAP> {
    queue: MpMcQueue<Event, N>,
    /// Set while a source has an undrained entry in the queue.
    pending: [AtomicBool; Event::COUNT],
    /// Latched by a failed raise; reported by the next drain.
    overflowed: AtomicBool,
}

impl<const N: usize> Default for EventScheduler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> EventScheduler<N> {
    pub const fn new() -> Self {
        Self {
            queue: MpMcQueue::new(),
            pending: [const { AtomicBool::new(false) }; Event::COUNT],
            overflowed: AtomicBool::new(false),
        }
    }

    /// Request deferred handling of `event`.
    ///
    /// Lock-free and allocation-free — safe from interrupt context.  A source
    /// that is already queued is not queued again; the pending entry will
    /// observe whatever state caused the new signal.
    pub fn raise(&self, event: Event) -> Result<(), SchedulerError> {
        if self.pending[event.index()].swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        if self.queue.enqueue(event).is_err() {
            self.pending[event.index()].store(false, Ordering::Release);
            self.overflowed.store(true, Ordering::Release);
            return Err(SchedulerError::Overflow);
        }
        Ok(())
    }

    /// Run `handler` for every pending event in FIFO order.
    ///
    /// Events raised while draining (including by the handler itself) are
    /// handled in the same pass.  Returns the number of events handled, or
    /// [`SchedulerError::Overflow`] if any raise has failed since the last
    /// drain — the caller must treat that as fatal.
    pub fn drain(&self, mut handler: impl FnMut(Event)) -> Result<usize, SchedulerError> {
        if self.overflowed.swap(false, Ordering::AcqRel) {
            return Err(SchedulerError::Overflow);
        }

        let mut handled = 0;
        while let Some(event) = self.queue.dequeue() {
            // Clear before handling so a signal arriving mid-handler is
            // queued again rather than lost.
            self.pending[event.index()].store(false, Ordering::Release);
            handler(event);
            handled += 1;
        }
        Ok(handled)
    }

    /// Whether `event` is queued and not yet drained.
    pub fn is_pending(&self, event: Event) -> bool {
        self.pending[event.index()].load(Ordering::Acquire)
    }

    /// Number of pending events.
    pub fn pending_count(&self) -> usize {
        self.pending
            .iter()
            .filter(|p| p.load(Ordering::Acquire))
            .count()
    }
}

/// The firmware's single scheduler instance.  ISR trampolines in
/// `drivers::hw_init` and `drivers::hw_timer` raise into it.
pub static SCHEDULER: EventScheduler = EventScheduler::new();

/// Raise from interrupt context.  The overflow is latched inside the
/// scheduler and reported by the next drain, so the result is not needed.
pub fn raise_from_isr(event: Event) {
    let _ = SCHEDULER.raise(event);
}
