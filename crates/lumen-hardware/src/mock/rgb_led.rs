//! Mock tri-color LED implementation for testing and development.
//!
//! This module provides a simulated RGB LED that records every physical
//! write, so tests can assert exactly which colors were rendered and in
//! what order.

use crate::{HardwareError, Result, traits::RgbLedDevice};
use lumen_core::ColorValue;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mock RGB LED for testing and development.
///
/// The device and its handle share the same recorded state: the device is
/// normally moved into the polling loop while the handle stays with the
/// test and observes what the loop rendered.
///
/// # Examples
///
/// ```
/// use lumen_hardware::mock::MockRgbLed;
/// use lumen_hardware::traits::RgbLedDevice;
/// use lumen_core::ColorValue;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let (mut led, handle) = MockRgbLed::new();
///
///     let red = ColorValue::new(1.0, 0.0, 0.0)?;
///     led.set_color(red).await?;
///
///     assert_eq!(handle.current().await, Some(red));
///     assert_eq!(handle.write_count().await, 1);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRgbLed {
    /// Shared recorded state
    state: Arc<Mutex<LedState>>,

    /// Device name
    name: String,
}

#[derive(Debug, Default)]
struct LedState {
    /// Every accepted physical write, in order
    applied: Vec<ColorValue>,

    /// Color currently showing, `None` when off/released
    current: Option<ColorValue>,

    /// Pins have been released
    released: bool,

    /// Reject writes until cleared
    fail_writes: bool,
}

impl MockRgbLed {
    /// Create a new mock LED with the default name.
    ///
    /// Returns a tuple of (MockRgbLed, MockRgbLedHandle) where the handle
    /// observes the writes the device accepted.
    pub fn new() -> (Self, MockRgbLedHandle) {
        Self::with_name("Mock RGB LED".to_string())
    }

    /// Create a new mock LED with a custom name.
    pub fn with_name(name: String) -> (Self, MockRgbLedHandle) {
        let state = Arc::new(Mutex::new(LedState::default()));

        let led = Self {
            state: Arc::clone(&state),
            name: name.clone(),
        };

        let handle = MockRgbLedHandle { state, name };

        (led, handle)
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for MockRgbLed {
    fn default() -> Self {
        Self::new().0
    }
}

impl RgbLedDevice for MockRgbLed {
    async fn set_color(&mut self, color: ColorValue) -> Result<()> {
        let mut state = self.state.lock().await;

        if state.released {
            return Err(HardwareError::invalid_pin(format!(
                "{}: pins released",
                self.name
            )));
        }
        if state.fail_writes {
            return Err(HardwareError::write_rejected(format!(
                "{}: injected write failure",
                self.name
            )));
        }

        state.applied.push(color);
        state.current = Some(color);
        Ok(())
    }

    async fn release(&mut self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.current = None;
        state.released = true;
        Ok(())
    }
}

/// Handle for observing and controlling a mock RGB LED.
///
/// Cheap to clone; all clones observe the same device.
#[derive(Debug, Clone)]
pub struct MockRgbLedHandle {
    /// Shared recorded state
    state: Arc<Mutex<LedState>>,

    /// Device name
    name: String,
}

impl MockRgbLedHandle {
    /// Every color the device accepted, in write order.
    pub async fn applied(&self) -> Vec<ColorValue> {
        self.state.lock().await.applied.clone()
    }

    /// The color currently showing, `None` when off or released.
    pub async fn current(&self) -> Option<ColorValue> {
        self.state.lock().await.current
    }

    /// Number of physical writes the device accepted.
    pub async fn write_count(&self) -> usize {
        self.state.lock().await.applied.len()
    }

    /// Whether the pins have been released.
    pub async fn is_released(&self) -> bool {
        self.state.lock().await.released
    }

    /// Reject subsequent writes with `WriteRejected` until cleared.
    pub async fn set_write_failure(&self, fail: bool) {
        self.state.lock().await.fail_writes = fail;
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
