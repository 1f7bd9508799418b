//! Presence indicator control surface and polling loop.
//!
//! [`PresenceIndicator`] owns the lifecycle of one indicator instance: it
//! is constructed with the two injected device handles, started with a
//! validated configuration, reconfigured by atomically swapping the active
//! configuration, and closed by stopping the loop and releasing the pins.
//!
//! # Polling Loop
//!
//! The loop runs on a spawned task. Each tick:
//!
//! 1. Takes a snapshot of the active configuration (an `Arc` clone), so
//!    the whole tick resolves against one consistent color table.
//! 2. Reads the sensor, bounded by the configured read timeout.
//! 3. On success, resolves the color and writes it to the LED only if it
//!    differs from the last successfully applied color.
//! 4. On failure (error or timeout), skips the tick and counts it; after
//!    the configured consecutive-failure threshold the status reports
//!    degraded, but the loop stays alive and the LED keeps its last color.
//! 5. Sleeps one poll interval.
//!
//! Every await point races the stop signal, so `close()` takes effect at
//! the next tick boundary at the latest, even while a read is in flight.
//!
//! # Examples
//!
//! ```no_run
//! use lumen_hardware::mock::{MockRgbLed, MockSensor};
//! use lumen_indicator::{IndicatorConfig, PresenceIndicator};
//!
//! #[tokio::main]
//! async fn main() -> lumen_core::Result<()> {
//!     let (sensor, _sensor_handle) = MockSensor::new();
//!     let (led, _led_handle) = MockRgbLed::new();
//!
//!     let mut indicator = PresenceIndicator::new(sensor, led);
//!     indicator
//!         .start(IndicatorConfig::new("pi", "radar-1", "led-1"))
//!         .await?;
//!
//!     // ... the loop is now polling in the background ...
//!
//!     indicator.close().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{RwLock, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use lumen_core::constants::UNLIT_COLOR;
use lumen_core::{ColorValue, DetectionState, Error, Result};
use lumen_hardware::{RgbLedDevice, SensorDevice};

use crate::colors::ColorTable;
use crate::config::IndicatorConfig;
use crate::state_machine::{IndicatorState, StateMachine, StateTransition};

/// The configuration a poll tick resolves against.
///
/// Swapped wholesale behind the `RwLock` on reconfigure; a tick clones the
/// `Arc` once at its start and uses that snapshot throughout, so it sees
/// either the fully-old or the fully-new table, never a mix.
#[derive(Debug)]
struct ActiveConfig {
    config: IndicatorConfig,
    table: ColorTable,
}

/// Mutable runtime state shared between the poll task and the query
/// surface.
#[derive(Debug, Default)]
struct RuntimeStatus {
    last_detection: Option<DetectionState>,
    last_read_at: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    degraded: bool,
    led_write_errors: u64,
}

/// Diagnostics snapshot of a running indicator.
///
/// This is the status/query surface through which all contained failures
/// are reported; nothing the loop encounters crashes the hosting process.
#[derive(Debug, Clone, Serialize)]
pub struct IndicatorStatus {
    /// Current lifecycle state.
    pub state: IndicatorState,

    /// Last successfully observed detection, `None` before the first
    /// successful read.
    pub last_detection: Option<DetectionState>,

    /// Timestamp of the last successful sensor read.
    pub last_read_at: Option<DateTime<Utc>>,

    /// Consecutive failed reads since the last success.
    pub consecutive_failures: u32,

    /// Set once the failure threshold is crossed; cleared by the next
    /// successful read.
    pub degraded: bool,

    /// Total LED writes the board rejected.
    pub led_write_errors: u64,
}

/// Presence indicator: polls a sensor and drives a tri-color LED.
///
/// Device handles are injected once at construction and resolved by the
/// hosting layer; `reconfigure` can change colors and loop parameters but
/// not rebind hardware.
///
/// # Lifecycle
///
/// 1. Construct with the sensor and LED devices
/// 2. `start(config)` validates the configuration and spawns the loop
/// 3. `reconfigure(config)` atomically swaps the active configuration
/// 4. `close()` stops the loop, waits for it, and releases the pins
///
/// `close()` is idempotent and the only way out; a closed indicator is
/// terminal.
pub struct PresenceIndicator<S, L>
where
    S: SensorDevice + 'static,
    L: RgbLedDevice + 'static,
{
    /// Lifecycle state and transition history.
    machine: StateMachine,

    /// Devices held until the loop is started (or released by a close
    /// before start).
    devices: Option<(S, L)>,

    /// Active configuration, swapped atomically on reconfigure.
    active: Option<Arc<RwLock<Arc<ActiveConfig>>>>,

    /// Runtime state shared with the poll task.
    runtime: Arc<RwLock<RuntimeStatus>>,

    /// Stop signal for the poll task.
    stop_tx: Option<watch::Sender<bool>>,

    /// Running poll task; returns the devices when it exits.
    task: Option<JoinHandle<(S, L)>>,
}

impl<S, L> PresenceIndicator<S, L>
where
    S: SensorDevice + 'static,
    L: RgbLedDevice + 'static,
{
    /// Create a new indicator owning the given devices.
    ///
    /// The indicator starts in the `Stopped` state; nothing is polled and
    /// no pin is touched until [`start`](Self::start).
    pub fn new(sensor: S, led: L) -> Self {
        Self {
            machine: StateMachine::new(),
            devices: Some((sensor, led)),
            active: None,
            runtime: Arc::new(RwLock::new(RuntimeStatus::default())),
            stop_tx: None,
            task: None,
        }
    }

    /// Get the current lifecycle state.
    pub fn state(&self) -> IndicatorState {
        self.machine.current_state()
    }

    /// Get the lifecycle transition history, oldest first.
    pub fn transition_history(&self) -> Vec<StateTransition> {
        self.machine.history().iter().cloned().collect()
    }

    /// The last successfully observed detection state.
    ///
    /// `None` before the first successful read. During sensor outages this
    /// keeps reporting the last known state: an indeterminate sensor is
    /// not the same as an empty room.
    pub async fn current_detection(&self) -> Option<DetectionState> {
        self.runtime.read().await.last_detection
    }

    /// Diagnostics snapshot of the runtime status.
    pub async fn status(&self) -> IndicatorStatus {
        let rt = self.runtime.read().await;
        IndicatorStatus {
            state: self.machine.current_state(),
            last_detection: rt.last_detection,
            last_read_at: rt.last_read_at,
            consecutive_failures: rt.consecutive_failures,
            degraded: rt.degraded,
            led_write_errors: rt.led_write_errors,
        }
    }

    /// Validate the configuration and start the polling loop.
    ///
    /// The color table is built before any state changes, so an invalid
    /// configuration leaves the indicator untouched in `Stopped`.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidColorConfig` if a color override is out of range
    /// - `Error::InvalidStateTransition` if not in `Stopped`
    pub async fn start(&mut self, config: IndicatorConfig) -> Result<()> {
        // Fail-fast validation before any state change
        let table = config.build_color_table()?;

        if !self
            .machine
            .current_state()
            .can_transition_to(&IndicatorState::Running)
        {
            return Err(Error::InvalidStateTransition {
                from: self.machine.current_state().to_string(),
                to: IndicatorState::Running.to_string(),
            });
        }

        let (sensor, led) = self
            .devices
            .take()
            .ok_or_else(|| Error::Config("hardware devices already consumed".to_string()))?;

        let sensor_name = config.sensor.clone();
        let active = Arc::new(RwLock::new(Arc::new(ActiveConfig { config, table })));
        let (stop_tx, stop_rx) = watch::channel(false);

        self.task = Some(tokio::spawn(run_poll_loop(
            sensor,
            led,
            Arc::clone(&active),
            Arc::clone(&self.runtime),
            stop_rx,
        )));
        self.active = Some(active);
        self.stop_tx = Some(stop_tx);
        self.machine.transition_to(IndicatorState::Running)?;

        info!(sensor = %sensor_name, "presence indicator started");
        Ok(())
    }

    /// Atomically replace the active configuration.
    ///
    /// The new color table is built first; if validation fails the old
    /// configuration stays active and the state is untouched. In-flight
    /// poll ticks finish against whichever snapshot they captured.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidStateTransition` if not in `Running`
    /// - `Error::Config` if the new configuration names different devices
    /// - `Error::InvalidColorConfig` if a color override is out of range
    pub async fn reconfigure(&mut self, config: IndicatorConfig) -> Result<()> {
        if self.machine.current_state() != IndicatorState::Running {
            return Err(Error::InvalidStateTransition {
                from: self.machine.current_state().to_string(),
                to: IndicatorState::Reconfiguring.to_string(),
            });
        }

        let active = self
            .active
            .as_ref()
            .ok_or_else(|| Error::Config("no active configuration".to_string()))?;

        // Fail-fast validation: old config stays active on any error
        {
            let current = active.read().await.clone();
            current.config.ensure_same_devices(&config)?;
        }
        let table = config.build_color_table()?;

        self.machine.transition_to(IndicatorState::Reconfiguring)?;
        let sensor_name = config.sensor.clone();
        {
            let mut guard = active.write().await;
            *guard = Arc::new(ActiveConfig { config, table });
        }
        self.machine.transition_to(IndicatorState::Running)?;

        info!(sensor = %sensor_name, "presence indicator reconfigured");
        Ok(())
    }

    /// Stop polling, wait for the loop to finish, and release the pins.
    ///
    /// Idempotent: closing an already-closed indicator returns `Ok` and
    /// does nothing. Pin release is guaranteed to happen after the poll
    /// task has fully completed, even if a read was in flight.
    ///
    /// # Errors
    ///
    /// Returns `Error::Hardware` if the poll task panicked or the device
    /// rejects the pin release.
    pub async fn close(&mut self) -> Result<()> {
        if self.machine.current_state() == IndicatorState::Closed {
            return Ok(());
        }

        if let Some(stop_tx) = self.stop_tx.take() {
            // The loop may already be gone; nothing to signal then
            let _ = stop_tx.send(true);
        }

        // Wait for any in-flight tick to complete before touching the pins
        let devices = match self.task.take() {
            Some(task) => Some(
                task.await
                    .map_err(|e| Error::Hardware(format!("poll task failed: {e}")))?,
            ),
            None => self.devices.take(),
        };

        self.machine.transition_to(IndicatorState::Closed)?;

        if let Some((_sensor, mut led)) = devices {
            // Best effort: a dark LED on the way out, then free the pins
            if let Err(e) = led.set_color(UNLIT_COLOR).await {
                warn!(error = %e, "failed to blank LED during close");
            }
            led.release()
                .await
                .map_err(|e| Error::Hardware(e.to_string()))?;
        }

        info!("presence indicator closed");
        Ok(())
    }
}

/// The poll-read-resolve-apply loop.
///
/// Owns both devices for its lifetime and hands them back on exit so the
/// control surface can release the pins after joining.
async fn run_poll_loop<S, L>(
    mut sensor: S,
    mut led: L,
    active: Arc<RwLock<Arc<ActiveConfig>>>,
    runtime: Arc<RwLock<RuntimeStatus>>,
    mut stop_rx: watch::Receiver<bool>,
) -> (S, L)
where
    S: SensorDevice,
    L: RgbLedDevice,
{
    // Neutral state before the first successful read: deliberately
    // distinct from NoTarget's blue
    let mut last_applied: Option<ColorValue> = None;
    match led.set_color(UNLIT_COLOR).await {
        Ok(()) => last_applied = Some(UNLIT_COLOR),
        Err(e) => {
            runtime.write().await.led_write_errors += 1;
            error!(error = %e, "failed to apply startup color");
        }
    }

    loop {
        // One consistent snapshot for the whole tick
        let snapshot = { active.read().await.clone() };

        // The only value ever sent is `true`, and a dropped sender also
        // means the control surface is gone, so any wakeup is a stop
        let read_result = tokio::select! {
            _ = stop_rx.changed() => break,
            result = tokio::time::timeout(
                snapshot.config.read_timeout,
                sensor.read_state(),
            ) => result,
        };

        match read_result {
            Ok(Ok(state)) => {
                {
                    let mut rt = runtime.write().await;
                    if rt.degraded {
                        info!(
                            sensor = %snapshot.config.sensor,
                            failures = rt.consecutive_failures,
                            "sensor recovered"
                        );
                        rt.degraded = false;
                    }
                    rt.consecutive_failures = 0;
                    if rt.last_detection != Some(state) {
                        debug!(sensor = %snapshot.config.sensor, %state, "detection changed");
                    }
                    rt.last_detection = Some(state);
                    rt.last_read_at = Some(Utc::now());
                }

                let color = snapshot.table.resolve(state);
                if last_applied != Some(color) {
                    match led.set_color(color).await {
                        Ok(()) => {
                            debug!(rgb_led = %snapshot.config.rgb_led, %color, "color applied");
                            last_applied = Some(color);
                        }
                        Err(e) => {
                            // The LED is cosmetic next to presence
                            // detection: record and carry on
                            runtime.write().await.led_write_errors += 1;
                            error!(rgb_led = %snapshot.config.rgb_led, error = %e, "LED write failed");
                        }
                    }
                }
            }
            Ok(Err(e)) => {
                record_read_failure(
                    &runtime,
                    &snapshot.config,
                    &format!("sensor read failed: {e}"),
                )
                .await;
            }
            Err(_) => {
                record_read_failure(&runtime, &snapshot.config, "sensor read timed out").await;
            }
        }

        tokio::select! {
            _ = stop_rx.changed() => break,
            _ = tokio::time::sleep(snapshot.config.poll_interval) => {}
        }
    }

    (sensor, led)
}

/// Count one failed tick; cross into degraded at the threshold.
///
/// The LED keeps its last-known color: an unavailable sensor says nothing
/// about whether the room is empty.
async fn record_read_failure(
    runtime: &Arc<RwLock<RuntimeStatus>>,
    config: &IndicatorConfig,
    reason: &str,
) {
    let mut rt = runtime.write().await;
    rt.consecutive_failures += 1;
    warn!(
        sensor = %config.sensor,
        failures = rt.consecutive_failures,
        "{reason}, retrying next tick"
    );

    if rt.consecutive_failures >= config.failure_threshold && !rt.degraded {
        rt.degraded = true;
        error!(
            sensor = %config.sensor,
            threshold = config.failure_threshold,
            "failure threshold reached, reporting degraded (loop stays alive)"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_hardware::mock::{MockRgbLed, MockSensor};

    fn indicator() -> (
        PresenceIndicator<MockSensor, MockRgbLed>,
        lumen_hardware::mock::MockSensorHandle,
        lumen_hardware::mock::MockRgbLedHandle,
    ) {
        let (sensor, sensor_handle) = MockSensor::new();
        let (led, led_handle) = MockRgbLed::new();
        (
            PresenceIndicator::new(sensor, led),
            sensor_handle,
            led_handle,
        )
    }

    #[tokio::test]
    async fn test_initial_state() {
        let (indicator, _sensor, _led) = indicator();

        assert_eq!(indicator.state(), IndicatorState::Stopped);
        assert_eq!(indicator.current_detection().await, None);

        let status = indicator.status().await;
        assert_eq!(status.state, IndicatorState::Stopped);
        assert!(!status.degraded);
        assert_eq!(status.consecutive_failures, 0);
        assert_eq!(status.led_write_errors, 0);
    }

    #[tokio::test]
    async fn test_start_with_invalid_colors_stays_stopped() {
        let (mut indicator, _sensor, led_handle) = indicator();

        let mut config = IndicatorConfig::new("pi", "radar-1", "led-1");
        config.colors.no_target = Some(crate::colors::ColorSpec {
            red: 2.0,
            green: 0.0,
            blue: 0.0,
        });

        let result = indicator.start(config).await;
        assert!(matches!(result, Err(Error::InvalidColorConfig(_))));
        assert_eq!(indicator.state(), IndicatorState::Stopped);
        // No hardware was touched
        assert_eq!(led_handle.write_count().await, 0);
    }

    #[tokio::test]
    async fn test_reconfigure_requires_running() {
        let (mut indicator, _sensor, _led) = indicator();

        let result = indicator
            .reconfigure(IndicatorConfig::new("pi", "radar-1", "led-1"))
            .await;
        assert!(matches!(result, Err(Error::InvalidStateTransition { .. })));
    }

    #[tokio::test]
    async fn test_close_before_start_releases_pins() {
        let (mut indicator, _sensor, led_handle) = indicator();

        indicator.close().await.unwrap();

        assert_eq!(indicator.state(), IndicatorState::Closed);
        assert!(led_handle.is_released().await);

        // Idempotent
        indicator.close().await.unwrap();
        assert_eq!(indicator.state(), IndicatorState::Closed);
    }

    #[tokio::test]
    async fn test_start_after_close_fails() {
        let (mut indicator, _sensor, _led) = indicator();

        indicator.close().await.unwrap();

        let result = indicator
            .start(IndicatorConfig::new("pi", "radar-1", "led-1"))
            .await;
        assert!(matches!(result, Err(Error::InvalidStateTransition { .. })));
    }
}
