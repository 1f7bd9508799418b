//! Integration tests for the full poll-read-resolve-apply cycle.
//!
//! These tests drive a real `PresenceIndicator` against mock devices:
//! scripted sensor readings go in, and the recorded LED writes come out.
//! Every wait is wrapped in a timeout so a wedged loop fails the test
//! instead of hanging it.

use std::time::Duration;

use serde_json::json;

use lumen_core::constants::UNLIT_COLOR;
use lumen_core::{ColorValue, DetectionState, Error};
use lumen_hardware::mock::{MockRgbLed, MockRgbLedHandle, MockSensor};
use lumen_indicator::{ColorSpec, IndicatorConfig, IndicatorState, PresenceIndicator};

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn rgb(r: f64, g: f64, b: f64) -> ColorValue {
    ColorValue::new(r, g, b).unwrap()
}

/// A config with a fast cadence so tests finish quickly.
fn fast_config() -> IndicatorConfig {
    let mut config = IndicatorConfig::new("pi", "radar-1", "led-1");
    config.poll_interval = Duration::from_millis(50);
    config
}

async fn wait_for_writes(led: &MockRgbLedHandle, count: usize) {
    tokio::time::timeout(TEST_TIMEOUT, async {
        while led.write_count().await < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("expected {count} LED writes within the test timeout"));
}

/// Overridden states use their overrides; unspecified states fall back
/// to the defaults.
#[tokio::test]
async fn test_override_palette_sequence() {
    let (sensor, sensor_handle) = MockSensor::new();
    let (led, led_handle) = MockRgbLed::new();

    let mut config = fast_config();
    config.colors.no_target = Some(ColorSpec {
        red: 0.1,
        green: 0.1,
        blue: 0.8,
    });
    config.colors.moving_target = Some(ColorSpec {
        red: 1.0,
        green: 0.5,
        blue: 0.0,
    });

    sensor_handle
        .push_sequence(&[
            DetectionState::NoTarget,
            DetectionState::MovingTarget,
            DetectionState::StaticTarget,
        ])
        .await
        .unwrap();

    let mut indicator = PresenceIndicator::new(sensor, led);
    indicator.start(config).await.unwrap();

    // Startup blank plus one write per distinct reading
    wait_for_writes(&led_handle, 4).await;

    assert_eq!(
        led_handle.applied().await,
        vec![
            UNLIT_COLOR,
            rgb(0.1, 0.1, 0.8),
            rgb(1.0, 0.5, 0.0),
            // StaticTarget has no override: default green
            rgb(0.0, 1.0, 0.0),
        ]
    );

    indicator.close().await.unwrap();
    assert!(led_handle.is_released().await);
}

/// Repeated identical readings produce exactly one physical write.
#[tokio::test]
async fn test_redundant_colors_are_not_rewritten() {
    let (sensor, sensor_handle) = MockSensor::new();
    let (led, led_handle) = MockRgbLed::new();

    sensor_handle
        .push_sequence(&[
            DetectionState::NoTarget,
            DetectionState::NoTarget,
            DetectionState::NoTarget,
            DetectionState::MovingTarget,
        ])
        .await
        .unwrap();

    let mut indicator = PresenceIndicator::new(sensor, led);
    indicator.start(fast_config()).await.unwrap();

    // Wait until the whole script is consumed
    tokio::time::timeout(TEST_TIMEOUT, async {
        while indicator.current_detection().await != Some(DetectionState::MovingTarget) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("script not consumed within the test timeout");
    wait_for_writes(&led_handle, 3).await;

    // Blank, blue (once, despite three NoTarget readings), red
    assert_eq!(
        led_handle.applied().await,
        vec![UNLIT_COLOR, rgb(0.0, 0.0, 1.0), rgb(1.0, 0.0, 0.0)]
    );

    indicator.close().await.unwrap();
}

/// Three consecutive sensor failures with threshold 3: the loop stays
/// alive and Running, the LED keeps its last color, and the last known
/// detection is still reported. The next successful read clears the
/// degraded flag.
#[tokio::test]
async fn test_failure_threshold_keeps_last_color() {
    let (sensor, sensor_handle) = MockSensor::new();
    let (led, led_handle) = MockRgbLed::new();

    sensor_handle
        .push_reading(DetectionState::NoTarget)
        .await
        .unwrap();
    for _ in 0..3 {
        sensor_handle.push_failure("transport error").await.unwrap();
    }

    let mut indicator = PresenceIndicator::new(sensor, led);
    indicator.start(fast_config()).await.unwrap();

    tokio::time::timeout(TEST_TIMEOUT, async {
        while !indicator.status().await.degraded {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("degraded flag not set within the test timeout");

    let status = indicator.status().await;
    assert_eq!(status.state, IndicatorState::Running);
    assert!(status.consecutive_failures >= 3);
    assert_eq!(status.last_detection, Some(DetectionState::NoTarget));
    assert_eq!(
        indicator.current_detection().await,
        Some(DetectionState::NoTarget)
    );
    // LED still shows the last successfully applied color, not off
    assert_eq!(led_handle.current().await, Some(rgb(0.0, 0.0, 1.0)));

    // The next successful read recovers
    sensor_handle
        .push_reading(DetectionState::MovingTarget)
        .await
        .unwrap();

    tokio::time::timeout(TEST_TIMEOUT, async {
        while led_handle.current().await != Some(rgb(1.0, 0.0, 0.0)) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("LED did not recover within the test timeout");

    let status = indicator.status().await;
    assert!(!status.degraded);
    assert_eq!(status.consecutive_failures, 0);
    assert_eq!(status.last_detection, Some(DetectionState::MovingTarget));

    indicator.close().await.unwrap();
}

/// Reconfigure swaps the whole table atomically: readings after the swap
/// resolve against the new table.
#[tokio::test]
async fn test_reconfigure_applies_new_table() {
    let (sensor, sensor_handle) = MockSensor::new();
    let (led, led_handle) = MockRgbLed::new();

    sensor_handle
        .push_reading(DetectionState::NoTarget)
        .await
        .unwrap();

    let mut indicator = PresenceIndicator::new(sensor, led);
    indicator.start(fast_config()).await.unwrap();

    // Default blue first
    wait_for_writes(&led_handle, 2).await;
    assert_eq!(led_handle.current().await, Some(rgb(0.0, 0.0, 1.0)));

    let mut new_config = fast_config();
    new_config.colors.no_target = Some(ColorSpec {
        red: 0.2,
        green: 0.2,
        blue: 0.2,
    });
    indicator.reconfigure(new_config).await.unwrap();
    assert_eq!(indicator.state(), IndicatorState::Running);

    sensor_handle
        .push_reading(DetectionState::NoTarget)
        .await
        .unwrap();

    wait_for_writes(&led_handle, 3).await;
    assert_eq!(led_handle.current().await, Some(rgb(0.2, 0.2, 0.2)));

    indicator.close().await.unwrap();
}

/// A reconfigure that fails validation leaves the old configuration fully
/// active.
#[tokio::test]
async fn test_failed_reconfigure_keeps_old_config() {
    let (sensor, sensor_handle) = MockSensor::new();
    let (led, led_handle) = MockRgbLed::new();

    let mut indicator = PresenceIndicator::new(sensor, led);
    indicator.start(fast_config()).await.unwrap();

    // Out-of-range override is rejected before any swap
    let mut bad_colors = fast_config();
    bad_colors.colors.moving_target = Some(ColorSpec {
        red: 7.0,
        green: 0.0,
        blue: 0.0,
    });
    let result = indicator.reconfigure(bad_colors).await;
    assert!(matches!(result, Err(Error::InvalidColorConfig(_))));
    assert_eq!(indicator.state(), IndicatorState::Running);

    // Renaming a device is rejected: handles are injected once
    let mut other_sensor = fast_config();
    other_sensor.sensor = "radar-2".to_string();
    let result = indicator.reconfigure(other_sensor).await;
    assert!(matches!(result, Err(Error::Config(_))));
    assert_eq!(indicator.state(), IndicatorState::Running);

    // The old (default) table is still in effect
    sensor_handle
        .push_reading(DetectionState::MovingTarget)
        .await
        .unwrap();
    wait_for_writes(&led_handle, 2).await;
    assert_eq!(led_handle.current().await, Some(rgb(1.0, 0.0, 0.0)));

    indicator.close().await.unwrap();
}

/// Close stops the loop promptly even with a read in flight, blanks the
/// LED, releases the pins, and is idempotent.
#[tokio::test]
async fn test_close_is_prompt_and_idempotent() {
    let (sensor, _sensor_handle) = MockSensor::new();
    let (led, led_handle) = MockRgbLed::new();

    let mut indicator = PresenceIndicator::new(sensor, led);
    // No scripted readings: the loop sits in a blocked read
    indicator.start(fast_config()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    // Close must not wait out the read timeout
    tokio::time::timeout(Duration::from_millis(500), indicator.close())
        .await
        .expect("close did not complete promptly")
        .unwrap();

    assert_eq!(indicator.state(), IndicatorState::Closed);
    assert!(led_handle.is_released().await);
    assert_eq!(led_handle.current().await, None);

    // Second close is a no-op
    indicator.close().await.unwrap();
    assert_eq!(indicator.state(), IndicatorState::Closed);

    // The lifecycle history records exactly start and close
    let history = indicator.transition_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].from, IndicatorState::Stopped);
    assert_eq!(history[0].to, IndicatorState::Running);
    assert_eq!(history[1].from, IndicatorState::Running);
    assert_eq!(history[1].to, IndicatorState::Closed);
}

/// Rejected LED writes are counted and retried once the resolved color
/// changes; the loop itself keeps running.
#[tokio::test]
async fn test_led_write_failure_does_not_stop_loop() {
    let (sensor, sensor_handle) = MockSensor::new();
    let (led, led_handle) = MockRgbLed::new();

    sensor_handle
        .push_reading(DetectionState::NoTarget)
        .await
        .unwrap();

    let mut indicator = PresenceIndicator::new(sensor, led);
    indicator.start(fast_config()).await.unwrap();
    wait_for_writes(&led_handle, 2).await;

    // Board starts rejecting writes
    led_handle.set_write_failure(true).await;
    sensor_handle
        .push_reading(DetectionState::MovingTarget)
        .await
        .unwrap();

    tokio::time::timeout(TEST_TIMEOUT, async {
        while indicator.status().await.led_write_errors == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("LED write error not recorded within the test timeout");

    let status = indicator.status().await;
    assert_eq!(status.state, IndicatorState::Running);
    assert_eq!(status.last_detection, Some(DetectionState::MovingTarget));
    // The previous color is still showing
    assert_eq!(led_handle.current().await, Some(rgb(0.0, 0.0, 1.0)));

    // Board recovers: the next reading renders normally
    led_handle.set_write_failure(false).await;
    sensor_handle
        .push_reading(DetectionState::StaticTarget)
        .await
        .unwrap();

    tokio::time::timeout(TEST_TIMEOUT, async {
        while led_handle.current().await != Some(rgb(0.0, 1.0, 0.0)) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("LED did not recover within the test timeout");

    indicator.close().await.unwrap();
}

/// The JSON attribute surface drives the whole lifecycle end to end.
#[tokio::test]
async fn test_attribute_driven_lifecycle() {
    let (sensor, sensor_handle) = MockSensor::new();
    let (led, led_handle) = MockRgbLed::new();

    let config = IndicatorConfig::from_attributes(&json!({
        "board": "pi",
        "sensor": "radar-1",
        "rgb_led": "led-1",
        "poll_interval_ms": 50,
        "color_attributes": {
            "moving_and_static_targets": { "red": 1.0, "green": 1.0, "blue": 0.0 }
        }
    }))
    .unwrap();

    sensor_handle
        .push_reading(DetectionState::MovingAndStaticTargets)
        .await
        .unwrap();

    let mut indicator = PresenceIndicator::new(sensor, led);
    indicator.start(config).await.unwrap();

    wait_for_writes(&led_handle, 2).await;
    assert_eq!(led_handle.current().await, Some(rgb(1.0, 1.0, 0.0)));

    let status = indicator.status().await;
    assert_eq!(
        status.last_detection,
        Some(DetectionState::MovingAndStaticTargets)
    );
    assert!(status.last_read_at.is_some());

    indicator.close().await.unwrap();
    assert!(led_handle.is_released().await);
}
