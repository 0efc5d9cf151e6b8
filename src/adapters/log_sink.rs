//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).
//! State reports are rendered as one JSON object per line so a serial
//! capture can be post-processed.

use log::{info, warn};

use crate::app::events::{AppEvent, StateReport};
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn report_json(report: &StateReport) -> String {
    serde_json::to_string(report).unwrap_or_else(|_| format!("{report:?}"))
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(report) => {
                info!("START | {}", report_json(report));
            }
            AppEvent::SpeedChanged { from, to } => {
                info!("SPEED | {} -> {}", from.name(), to.name());
            }
            AppEvent::StateApplied(report) => {
                info!("APPLY | {}", report_json(report));
            }
            AppEvent::PersistFailed(e) => {
                warn!("PERSIST | {}", e);
            }
            AppEvent::AnimationExpired => {
                info!("LED | battery flash expired");
            }
            AppEvent::FanRpm { rpm, pulses } => {
                info!("TACH | rpm={} pulses={}", rpm, pulses);
            }
        }
    }
}
