//! Presence-indicator controller: the polling-and-mapping core.
//!
//! This crate ties the hardware abstractions together into the indicator
//! proper: it polls a presence sensor on a fixed cadence, classifies each
//! reading into one of four detection states, resolves the state through a
//! configurable color table, and drives a tri-color LED to match.
//!
//! # Modules
//!
//! - [`config`] — attribute parsing and validation ([`IndicatorConfig`])
//! - [`colors`] — the detection-state → color mapping ([`ColorTable`])
//! - [`state_machine`] — lifecycle enforcement ([`IndicatorState`])
//! - [`indicator`] — the control surface and poll loop ([`PresenceIndicator`])
//!
//! # Quick Start
//!
//! ```no_run
//! use lumen_hardware::mock::{MockRgbLed, MockSensor};
//! use lumen_indicator::{IndicatorConfig, PresenceIndicator};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> lumen_core::Result<()> {
//!     let (sensor, sensor_handle) = MockSensor::new();
//!     let (led, _led_handle) = MockRgbLed::new();
//!
//!     let config = IndicatorConfig::from_attributes(&json!({
//!         "board": "pi",
//!         "sensor": "radar-1",
//!         "rgb_led": "led-1",
//!         "color_attributes": {
//!             "moving_target": { "red": 1.0, "green": 0.5, "blue": 0.0 }
//!         }
//!     }))?;
//!
//!     let mut indicator = PresenceIndicator::new(sensor, led);
//!     indicator.start(config).await?;
//!
//!     // ... push readings, query status ...
//!     let _ = sensor_handle;
//!
//!     indicator.close().await?;
//!     Ok(())
//! }
//! ```

pub mod colors;
pub mod config;
pub mod indicator;
pub mod state_machine;

// Re-export the public surface
pub use colors::{ColorOverrides, ColorSpec, ColorTable};
pub use config::IndicatorConfig;
pub use indicator::{IndicatorStatus, PresenceIndicator};
pub use state_machine::{IndicatorState, StateMachine, StateTransition};
