//! Shared constants for the presence-indicator controller.
//!
//! This module centralizes the built-in color palette and the timing and
//! retry parameters of the polling loop. Everything here is a documented,
//! stable default: user configuration may override the palette per detection
//! state and tune the loop parameters within the validated ranges below.
//!
//! # Default Palette
//!
//! | Detection state | Color | Channels (r, g, b) |
//! |-----------------|-------|--------------------|
//! | NoTarget | blue | (0.0, 0.0, 1.0) |
//! | MovingTarget | red | (1.0, 0.0, 0.0) |
//! | StaticTarget | green | (0.0, 1.0, 0.0) |
//! | MovingAndStaticTargets | purple | (1.0, 0.0, 1.0) |
//!
//! Before the first successful sensor read, and again on shutdown, the LED
//! is held at [`UNLIT_COLOR`] (all channels off). Off is deliberately
//! distinct from NoTarget's blue: "no reading yet" and "confirmed empty"
//! must be visually distinguishable.
//!
//! # Usage
//!
//! ```
//! use lumen_core::constants::*;
//! use std::time::Duration;
//!
//! let cadence = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
//! assert_eq!(cadence.as_millis(), 500);
//!
//! assert_eq!(DEFAULT_NO_TARGET_COLOR.as_rgb(), (0.0, 0.0, 1.0));
//! ```

use crate::types::ColorValue;

// ============================================================================
// Default Color Palette
// ============================================================================

/// Default color for [`DetectionState::NoTarget`]: blue.
///
/// [`DetectionState::NoTarget`]: crate::types::DetectionState::NoTarget
pub const DEFAULT_NO_TARGET_COLOR: ColorValue = ColorValue::rgb(0.0, 0.0, 1.0);

/// Default color for [`DetectionState::MovingTarget`]: red.
///
/// [`DetectionState::MovingTarget`]: crate::types::DetectionState::MovingTarget
pub const DEFAULT_MOVING_TARGET_COLOR: ColorValue = ColorValue::rgb(1.0, 0.0, 0.0);

/// Default color for [`DetectionState::StaticTarget`]: green.
///
/// [`DetectionState::StaticTarget`]: crate::types::DetectionState::StaticTarget
pub const DEFAULT_STATIC_TARGET_COLOR: ColorValue = ColorValue::rgb(0.0, 1.0, 0.0);

/// Default color for [`DetectionState::MovingAndStaticTargets`]: purple.
///
/// [`DetectionState::MovingAndStaticTargets`]: crate::types::DetectionState::MovingAndStaticTargets
pub const DEFAULT_MOVING_AND_STATIC_COLOR: ColorValue = ColorValue::rgb(1.0, 0.0, 1.0);

/// Neutral "no reading yet" state: all channels off.
///
/// Applied once when the loop starts (before the first successful sensor
/// read) and again right before the pins are released on shutdown. Never
/// used for a successful reading, so an unlit LED always means "not
/// observing", not "nothing observed".
pub const UNLIT_COLOR: ColorValue = ColorValue::rgb(0.0, 0.0, 0.0);

// ============================================================================
// Polling Cadence
// ============================================================================

/// Default poll interval (milliseconds).
///
/// One sensor read and at most one LED write per interval.
///
/// # Value: 500ms
///
/// Fast enough that a person walking into range sees the LED react
/// immediately; slow enough to keep the sensor transport mostly idle.
///
/// # Examples
///
/// ```
/// use lumen_core::constants::DEFAULT_POLL_INTERVAL_MS;
/// use std::time::Duration;
///
/// let cadence = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);
/// assert_eq!(cadence.as_millis(), 500);
/// ```
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Minimum allowed poll interval (milliseconds).
///
/// Values below this would busy-loop the sensor transport for no visible
/// benefit on an indicator LED.
///
/// # Value: 50ms
pub const MIN_POLL_INTERVAL_MS: u64 = 50;

/// Maximum allowed poll interval (milliseconds).
///
/// Values above this make the indicator useless as a live presence signal.
///
/// # Value: 60000ms (1 minute)
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

// ============================================================================
// Sensor Read Timeout
// ============================================================================

/// Default per-read timeout (milliseconds).
///
/// A read that has not answered within this bound counts as one sensor
/// failure tick, exactly like a transport error.
///
/// # Value: 1000ms
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 1_000;

/// Minimum allowed read timeout (milliseconds).
///
/// # Value: 50ms
pub const MIN_READ_TIMEOUT_MS: u64 = 50;

/// Maximum allowed read timeout (milliseconds).
///
/// The timeout also bounds how long `close()` may have to wait for an
/// in-flight read, so it is capped well below the poll-interval maximum.
///
/// # Value: 30000ms (30 seconds)
pub const MAX_READ_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// Failure Policy
// ============================================================================

/// Default number of consecutive failed reads before the loop reports
/// itself degraded.
///
/// Failures below the threshold are logged and retried on the next tick;
/// crossing the threshold flips the degraded flag in the runtime status
/// (the loop keeps running and the LED keeps its last color).
///
/// # Value: 3
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Minimum allowed failure threshold.
///
/// A threshold of 1 means the very first failed read is already reported.
///
/// # Value: 1
pub const MIN_FAILURE_THRESHOLD: u32 = 1;
