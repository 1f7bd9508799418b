//! Mock presence sensor implementation for testing and development.
//!
//! This module provides a simulated radar presence sensor that can be
//! scripted programmatically for testing without requiring physical
//! hardware.

use crate::{HardwareError, Result, traits::SensorDevice};
use lumen_core::DetectionState;
use tokio::sync::mpsc;

/// Mock presence sensor for testing and development.
///
/// The sensor consumes a script of readings pushed through its handle:
/// each `read_state` call yields the next scripted reading (or scripted
/// failure) in order, blocking until one is available. This gives tests
/// tick-by-tick control over what the polling loop observes.
///
/// # Examples
///
/// ```
/// use lumen_hardware::mock::MockSensor;
/// use lumen_hardware::traits::SensorDevice;
/// use lumen_core::DetectionState;
///
/// #[tokio::main]
/// async fn main() -> lumen_hardware::Result<()> {
///     let (mut sensor, handle) = MockSensor::new();
///
///     handle.push_reading(DetectionState::MovingTarget).await?;
///
///     let state = sensor.read_state().await?;
///     assert_eq!(state, DetectionState::MovingTarget);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockSensor {
    /// Channel receiver for scripted readings
    reading_rx: mpsc::Receiver<ReadingEvent>,

    /// Device name
    name: String,
}

impl MockSensor {
    /// Create a new mock sensor with the default name.
    ///
    /// Returns a tuple of (MockSensor, MockSensorHandle) where the handle
    /// is used to script readings and failures.
    pub fn new() -> (Self, MockSensorHandle) {
        Self::with_name("Mock Presence Sensor".to_string())
    }

    /// Create a new mock sensor with a custom name.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_hardware::mock::MockSensor;
    ///
    /// let (sensor, handle) = MockSensor::with_name("radar-1".to_string());
    /// assert_eq!(handle.name(), "radar-1");
    /// ```
    pub fn with_name(name: String) -> (Self, MockSensorHandle) {
        let (reading_tx, reading_rx) = mpsc::channel(32);

        let sensor = Self {
            reading_rx,
            name: name.clone(),
        };

        let handle = MockSensorHandle { reading_tx, name };

        (sensor, handle)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl SensorDevice for MockSensor {
    async fn read_state(&mut self) -> Result<DetectionState> {
        let event = self
            .reading_rx
            .recv()
            .await
            .ok_or_else(|| HardwareError::disconnected("sensor reading channel closed"))?;

        match event {
            ReadingEvent::Reading(result) => result,
        }
    }
}

/// Internal event type for the mock sensor.
#[derive(Debug)]
enum ReadingEvent {
    Reading(Result<DetectionState>),
}

/// Handle for scripting a mock presence sensor.
///
/// Readings are consumed by the sensor in push order. Dropping the handle
/// closes the channel; a subsequent `read_state` fails with `Disconnected`
/// once the script is exhausted.
///
/// # Examples
///
/// ```
/// use lumen_hardware::mock::MockSensor;
/// use lumen_core::DetectionState;
///
/// #[tokio::main]
/// async fn main() -> lumen_hardware::Result<()> {
///     let (_sensor, handle) = MockSensor::new();
///
///     handle.push_reading(DetectionState::NoTarget).await?;
///     handle.push_failure("transport error").await?;
///     handle.push_reading(DetectionState::StaticTarget).await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MockSensorHandle {
    /// Channel sender for scripted readings
    reading_tx: mpsc::Sender<ReadingEvent>,

    /// Device name
    name: String,
}

impl MockSensorHandle {
    /// Script a successful reading.
    ///
    /// # Errors
    ///
    /// Returns `Disconnected` if the sensor has been dropped.
    pub async fn push_reading(&self, state: DetectionState) -> Result<()> {
        self.reading_tx
            .send(ReadingEvent::Reading(Ok(state)))
            .await
            .map_err(|_| HardwareError::disconnected("sensor reading channel closed"))
    }

    /// Script a failed reading.
    ///
    /// The sensor will yield `SensorUnavailable` with the given message.
    ///
    /// # Errors
    ///
    /// Returns `Disconnected` if the sensor has been dropped.
    pub async fn push_failure(&self, message: impl Into<String>) -> Result<()> {
        self.reading_tx
            .send(ReadingEvent::Reading(Err(
                HardwareError::sensor_unavailable(message),
            )))
            .await
            .map_err(|_| HardwareError::disconnected("sensor reading channel closed"))
    }

    /// Script several successful readings in order.
    ///
    /// # Errors
    ///
    /// Returns `Disconnected` if the sensor has been dropped.
    pub async fn push_sequence(&self, states: &[DetectionState]) -> Result<()> {
        for state in states {
            self.push_reading(*state).await?;
        }
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
