//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements          | Connects to                |
//! |----------------|---------------------|----------------------------|
//! | `hardware`     | FanPort, LedPort    | LEDC PWM, RMT pixel        |
//! |                | AnimationTimerPort  | esp_timer                  |
//! |                | PowerSensePort      | Charger status GPIOs       |
//! |                | ClockPort           | ESP32 system timer         |
//! | `log_sink`     | EventSink           | Serial log output          |
//! | `nvs`          | StoragePort         | NVS / in-memory store      |
//! | `time`         | ClockPort           | ESP32 system timer         |

pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
