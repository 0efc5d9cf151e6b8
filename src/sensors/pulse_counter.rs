//! Fan tachometer edge counter.
//!
//! The counting register only ever decrements: it is loaded with an initial
//! value and each rising edge on the tach line takes one off.  Reading
//! converts the register back to a forward count:
//!
//! ```text
//! count = (initial − raw) mod 2³¹
//! ```
//!
//! Counting never involves the main loop, so it cannot compete with the
//! event scheduler and a read never disturbs it.  On the target the source
//! is the PCNT peripheral (`sensors::pcnt`); [`AtomicPulseSource`] is the
//! software register used by host builds.

use core::sync::atomic::{AtomicU32, Ordering};

/// Largest value the 31-bit register holds.  Default initial load.
pub const MAX_COUNT: u32 = 0x7FFF_FFFF;

/// Something that decrements a register on every edge.
pub trait PulseSource {
    /// Load the register with `initial`.
    fn load(&mut self, initial: u32);

    /// Snapshot the raw register value.
    fn snapshot(&self) -> u32;
}

/// [`PulseSource`] backed by an atomic register that whoever sees the
/// edges decrements.
pub struct AtomicPulseSource {
    register: &'static AtomicU32,
}

impl AtomicPulseSource {
    pub fn new(register: &'static AtomicU32) -> Self {
        Self { register }
    }
}

impl PulseSource for AtomicPulseSource {
    fn load(&mut self, initial: u32) {
        self.register.store(initial, Ordering::Relaxed);
    }

    fn snapshot(&self) -> u32 {
        self.register.load(Ordering::Relaxed)
    }
}

/// Forward pulse count on top of a decrementing [`PulseSource`].
pub struct PulseCounter<S> {
    source: S,
    initial: u32,
}

impl<S: PulseSource> PulseCounter<S> {
    /// Load the source with [`MAX_COUNT`].
    pub fn new(source: S) -> Self {
        Self::with_initial(source, MAX_COUNT)
    }

    pub fn with_initial(mut source: S, initial: u32) -> Self {
        let initial = initial & MAX_COUNT;
        source.load(initial);
        Self { source, initial }
    }

    /// Reload the register; the count restarts from zero.
    pub fn reset(&mut self) {
        self.source.load(self.initial);
    }

    /// Edges seen since the last load.
    pub fn read(&self) -> u32 {
        self.initial.wrapping_sub(self.source.snapshot()) & MAX_COUNT
    }
}
