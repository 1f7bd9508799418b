//! Indicator configuration parsing and validation.
//!
//! The hosting layer hands configuration over as a JSON attribute object.
//! [`IndicatorConfig::from_attributes`] validates it up front so that a bad
//! configuration is rejected before any hardware is touched: required
//! device identifiers must be present strings, loop parameters must lie in
//! their documented ranges, and the optional `color_attributes` block must
//! parse into recognized per-state overrides.
//!
//! Unknown top-level keys are ignored (the hosting layer carries keys of
//! its own); unknown keys inside `color_attributes` are rejected.

use crate::colors::{ColorOverrides, ColorTable};
use lumen_core::constants::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_POLL_INTERVAL_MS, DEFAULT_READ_TIMEOUT_MS,
    MAX_POLL_INTERVAL_MS, MAX_READ_TIMEOUT_MS, MIN_FAILURE_THRESHOLD, MIN_POLL_INTERVAL_MS,
    MIN_READ_TIMEOUT_MS,
};
use lumen_core::{Error, Result};
use serde_json::Value;
use std::time::Duration;

/// Resolved configuration for one running indicator instance.
///
/// # Examples
///
/// ```
/// use lumen_indicator::config::IndicatorConfig;
/// use serde_json::json;
///
/// let attrs = json!({
///     "board": "pi",
///     "sensor": "radar-1",
///     "rgb_led": "led-1",
///     "poll_interval_ms": 250,
///     "color_attributes": {
///         "moving_target": { "red": 1.0, "green": 0.5, "blue": 0.0 }
///     }
/// });
///
/// let config = IndicatorConfig::from_attributes(&attrs).unwrap();
/// assert_eq!(config.sensor, "radar-1");
/// assert_eq!(config.poll_interval.as_millis(), 250);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorConfig {
    /// Identifier of the host board providing the PWM pins.
    pub board: String,

    /// Identifier of the presence-sensor component.
    pub sensor: String,

    /// Identifier of the LED component.
    pub rgb_led: String,

    /// Per-state color overrides; unspecified states use the defaults.
    pub colors: ColorOverrides,

    /// Cadence of the poll-read-resolve-apply loop.
    pub poll_interval: Duration,

    /// Upper bound on a single sensor read.
    pub read_timeout: Duration,

    /// Consecutive failed reads before the degraded report.
    pub failure_threshold: u32,
}

impl IndicatorConfig {
    /// Create a configuration with default loop parameters and no color
    /// overrides.
    pub fn new(
        board: impl Into<String>,
        sensor: impl Into<String>,
        rgb_led: impl Into<String>,
    ) -> Self {
        Self {
            board: board.into(),
            sensor: sensor.into(),
            rgb_led: rgb_led.into(),
            colors: ColorOverrides::default(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
        }
    }

    /// Parse and validate a JSON attribute object.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if the attributes are not an object, a field has
    ///   the wrong type, or a loop parameter lies outside its documented
    ///   range
    /// - `Error::MissingConfig` if `board`, `sensor`, or `rgb_led` is
    ///   absent
    /// - `Error::InvalidColorConfig` if the `color_attributes` block has
    ///   unknown keys or malformed channel values
    pub fn from_attributes(attrs: &Value) -> Result<Self> {
        let obj = attrs
            .as_object()
            .ok_or_else(|| Error::Config("attributes must be a JSON object".to_string()))?;

        let board = required_string(obj, "board")?;
        let sensor = required_string(obj, "sensor")?;
        let rgb_led = required_string(obj, "rgb_led")?;

        let colors = match obj.get("color_attributes") {
            None | Some(Value::Null) => ColorOverrides::default(),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| Error::InvalidColorConfig(e.to_string()))?,
        };

        let poll_interval_ms = optional_u64_in_range(
            obj,
            "poll_interval_ms",
            DEFAULT_POLL_INTERVAL_MS,
            MIN_POLL_INTERVAL_MS,
            MAX_POLL_INTERVAL_MS,
        )?;
        let read_timeout_ms = optional_u64_in_range(
            obj,
            "read_timeout_ms",
            DEFAULT_READ_TIMEOUT_MS,
            MIN_READ_TIMEOUT_MS,
            MAX_READ_TIMEOUT_MS,
        )?;
        let failure_threshold = optional_u64_in_range(
            obj,
            "failure_threshold",
            u64::from(DEFAULT_FAILURE_THRESHOLD),
            u64::from(MIN_FAILURE_THRESHOLD),
            u64::from(u32::MAX),
        )? as u32;

        let config = Self {
            board,
            sensor,
            rgb_led,
            colors,
            poll_interval: Duration::from_millis(poll_interval_ms),
            read_timeout: Duration::from_millis(read_timeout_ms),
            failure_threshold,
        };

        // Channel-range validation happens here too, so a bad override is
        // caught at parse time rather than at start
        config.build_color_table()?;

        Ok(config)
    }

    /// Build the complete color table for this configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidColorConfig` if any override channel is out
    /// of range.
    pub fn build_color_table(&self) -> Result<ColorTable> {
        ColorTable::build(&self.colors)
    }

    /// Check that this configuration targets the same devices as another.
    ///
    /// Device handles are injected once at construction, so a reconfigure
    /// that names different hardware cannot be honored: rebinding devices
    /// requires closing and constructing a new instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first mismatched identifier.
    pub fn ensure_same_devices(&self, other: &IndicatorConfig) -> Result<()> {
        for (key, ours, theirs) in [
            ("board", &self.board, &other.board),
            ("sensor", &self.sensor, &other.sensor),
            ("rgb_led", &self.rgb_led, &other.rgb_led),
        ] {
            if ours != theirs {
                return Err(Error::Config(format!(
                    "cannot rebind {key} from '{ours}' to '{theirs}' on reconfigure; \
                     close and construct a new instance instead"
                )));
            }
        }
        Ok(())
    }
}

fn required_string(obj: &serde_json::Map<String, Value>, key: &str) -> Result<String> {
    match obj.get(key) {
        None | Some(Value::Null) => Err(Error::MissingConfig(key.to_string())),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(Error::Config(format!("{key} must not be empty"))),
        Some(other) => Err(Error::Config(format!(
            "{key} must be a string, got {other}"
        ))),
    }
}

fn optional_u64_in_range(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    default: u64,
    min: u64,
    max: u64,
) -> Result<u64> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => {
            let n = value
                .as_u64()
                .ok_or_else(|| Error::Config(format!("{key} must be an integer, got {value}")))?;
            if !(min..=max).contains(&n) {
                return Err(Error::Config(format!(
                    "{key} must be between {min} and {max}, got {n}"
                )));
            }
            Ok(n)
        }
    }
}
