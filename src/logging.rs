//! Logger setup for ESP32 targets.
//!
//! The crate logs through the `log` facade; this installs the
//! `esp-println` backend for it.

/// Install the `esp-println` logger with `level` as the maximum level
pub fn init(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}
