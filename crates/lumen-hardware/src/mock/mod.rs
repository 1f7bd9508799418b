//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be
//! controlled programmatically without requiring physical hardware.

pub mod rgb_led;
pub mod sensor;

// Re-export commonly used types
pub use rgb_led::{MockRgbLed, MockRgbLedHandle};
pub use sensor::{MockSensor, MockSensorHandle};
