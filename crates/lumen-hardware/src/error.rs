//! Error types for hardware operations.
//!
//! This module defines error types specific to the presence sensor and the
//! RGB LED output, covering device disconnection, unreachable sensors, and
//! rejected pin writes.

/// Result type alias for hardware operations.
pub type Result<T> = std::result::Result<T, HardwareError>;

/// Errors that can occur during hardware device operations.
#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// Device is not connected or has been disconnected.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// The presence sensor could not be reached for a reading.
    #[error("Sensor unavailable: {message}")]
    SensorUnavailable { message: String },

    /// A pin handle is no longer valid (e.g., already released).
    #[error("Invalid pin handle: {pin}")]
    InvalidPin { pin: String },

    /// The board rejected a duty-cycle write.
    #[error("Write rejected: {message}")]
    WriteRejected { message: String },
}

impl HardwareError {
    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new sensor unavailable error.
    pub fn sensor_unavailable(message: impl Into<String>) -> Self {
        Self::SensorUnavailable {
            message: message.into(),
        }
    }

    /// Create a new invalid pin handle error.
    pub fn invalid_pin(pin: impl Into<String>) -> Self {
        Self::InvalidPin { pin: pin.into() }
    }

    /// Create a new rejected write error.
    pub fn write_rejected(message: impl Into<String>) -> Self {
        Self::WriteRejected {
            message: message.into(),
        }
    }

    /// Returns `true` for failures the polling loop retries on the next
    /// tick instead of propagating.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::SensorUnavailable { .. } | Self::WriteRejected { .. }
        )
    }
}
