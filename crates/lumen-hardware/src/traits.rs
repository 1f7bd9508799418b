//! Hardware device trait definitions.
//!
//! This module defines the two capability interfaces the indicator loop is
//! built against: a presence sensor that can be read, and a tri-color LED
//! whose channels can be driven with PWM duty cycles. The traits establish
//! the contract between the polling loop and the devices, enabling easy
//! substitution between mock implementations and real hardware drivers.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use std::future::Future;

use crate::error::Result;
use lumen_core::{ColorValue, DetectionState};

/// Presence sensor abstraction.
///
/// Represents a radar-style motion/presence sensor that reports one of the
/// four [`DetectionState`] categories per reading. Decoding raw sensor
/// fields into a category happens behind this trait; callers only ever see
/// the closed enum.
///
/// # Dynamic Dispatch
///
/// **NOTE**: This trait is NOT object-safe because `async fn` methods return
/// `impl Future`, which is an opaque type that cannot be used in trait
/// objects (Edition 2024 RPITIT). You cannot use `Box<dyn SensorDevice>`.
/// Use generic type parameters instead:
///
/// ```no_run
/// use lumen_hardware::traits::SensorDevice;
/// use lumen_hardware::error::Result;
/// use lumen_core::DetectionState;
///
/// async fn next_state<S: SensorDevice>(sensor: &mut S) -> Result<DetectionState> {
///     sensor.read_state().await
/// }
/// ```
pub trait SensorDevice: Send + Sync {
    /// Read the current detection state from the sensor.
    ///
    /// Blocks asynchronously until the sensor produces a reading. Callers
    /// that need an upper bound wrap this in a timeout; the trait itself
    /// does not time out.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The sensor cannot be reached (`SensorUnavailable`)
    /// - The device is disconnected (`Disconnected`)
    ///
    /// No retry happens at this layer. Retry policy belongs to the caller.
    fn read_state(&mut self) -> impl Future<Output = Result<DetectionState>> + Send;
}

/// Tri-color LED output abstraction.
///
/// Represents three PWM output lines (red, green, blue) driven together
/// from a single [`ColorValue`]. Implementations own the underlying pin
/// handles for the lifetime of the device.
///
/// # Dynamic Dispatch
///
/// Like [`SensorDevice`], this trait is not object-safe; use generic type
/// parameters.
pub trait RgbLedDevice: Send + Sync {
    /// Set the three output channels to the given intensities.
    ///
    /// Each channel value is a normalized [0, 1] duty cycle. The write is
    /// all-or-nothing from the caller's perspective: on error the caller
    /// must assume the previous color is still showing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pin handles have been released (`InvalidPin`)
    /// - The board rejects the duty-cycle write (`WriteRejected`)
    /// - The device is disconnected (`Disconnected`)
    fn set_color(&mut self, color: ColorValue) -> impl Future<Output = Result<()>> + Send;

    /// Return the pins to a safe (off) state and free them.
    ///
    /// Called on shutdown. Idempotent: releasing already-released pins is
    /// not an error. After release, `set_color` fails with `InvalidPin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the device cannot be reached to perform the
    /// release.
    fn release(&mut self) -> impl Future<Output = Result<()>> + Send;
}
