//! Hardware device abstraction layer for the presence indicator.
//!
//! This crate provides trait-based abstractions for the two devices the
//! indicator loop drives: a radar presence sensor and a tri-color PWM LED.
//! These traits enable polymorphic behavior and easy substitution between
//! mock implementations (for development and testing) and real hardware
//! drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native
//!   `async fn` in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Thread-safe**: All traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with detailed error
//!   information.
//!
//! # Device Traits
//!
//! ## Presence Sensor
//!
//! The [`SensorDevice`] trait represents the radar presence sensor:
//!
//! ```no_run
//! use lumen_hardware::traits::SensorDevice;
//! use lumen_hardware::error::Result;
//!
//! async fn target_present<S: SensorDevice>(sensor: &mut S) -> Result<bool> {
//!     let state = sensor.read_state().await?;
//!     Ok(state.is_present())
//! }
//! ```
//!
//! ## RGB LED
//!
//! The [`RgbLedDevice`] trait represents three PWM output lines driven
//! together:
//!
//! ```no_run
//! use lumen_hardware::traits::RgbLedDevice;
//! use lumen_hardware::error::Result;
//! use lumen_core::constants::UNLIT_COLOR;
//!
//! async fn shut_down<L: RgbLedDevice>(led: &mut L) -> Result<()> {
//!     led.set_color(UNLIT_COLOR).await?;
//!     led.release().await
//! }
//! ```
//!
//! # Error Handling
//!
//! All operations return [`Result<T>`][error::Result] which uses the
//! [`HardwareError`] error type, covering disconnections, unreachable
//! sensors, released pin handles, and rejected duty-cycle writes.
//!
//! # Mock Implementations
//!
//! The [`mock`] module ships a scriptable sensor and a recording LED; these
//! are the only backends in this crate. Real GPIO/serial backends are
//! declared as empty feature flags for later.
//!
//! [`SensorDevice`]: traits::SensorDevice
//! [`RgbLedDevice`]: traits::RgbLedDevice

pub mod error;
pub mod mock;
pub mod traits;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{RgbLedDevice, SensorDevice};
