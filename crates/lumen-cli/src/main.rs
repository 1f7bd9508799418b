//! Demo host for the presence indicator.
//!
//! Wires the indicator up against mock devices: attributes come from a
//! JSON file, a scripted reading sequence is replayed through the mock
//! sensor at the poll cadence, and Ctrl-C closes the indicator cleanly.
//! Doubles as a manual smoke test of the full public API.
//!
//! ```text
//! lumen --config indicator.json --readings 0,1,2,3,0
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use lumen_core::DetectionState;
use lumen_hardware::mock::{MockRgbLed, MockSensor};
use lumen_indicator::{IndicatorConfig, PresenceIndicator};

#[derive(Parser, Debug)]
#[command(about = "Presence indicator demo host (mock devices)", version)]
struct Args {
    /// Path to the JSON attribute file
    #[arg(short, long, default_value = "indicator.json")]
    config: PathBuf,

    /// Detection codes (0-3) to replay through the mock sensor, in a loop
    #[arg(short, long, default_value = "0,1,2,3", value_delimiter = ',')]
    readings: Vec<DetectionState>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match load_config(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load config: {e:#}");
            eprintln!();
            eprintln!(
                "Example config:\n\n{}",
                serde_json::to_string_pretty(&example_attributes())?
            );
            return Ok(());
        }
    };

    let (sensor, sensor_handle) = MockSensor::with_name(config.sensor.clone());
    let (led, led_handle) = MockRgbLed::with_name(config.rgb_led.clone());

    let poll_interval = config.poll_interval;
    let mut indicator = PresenceIndicator::new(sensor, led);
    indicator.start(config).await?;

    // Replay the scripted readings at the poll cadence until shutdown
    let readings = args.readings.clone();
    let feeder = tokio::spawn(async move {
        for state in readings.iter().cycle() {
            if sensor_handle.push_reading(*state).await.is_err() {
                break;
            }
            tokio::time::sleep(poll_interval).await;
        }
    });

    info!(readings = ?args.readings, "indicator running, press Ctrl-C to stop");
    tokio::signal::ctrl_c().await?;

    feeder.abort();
    indicator.close().await?;

    let status = indicator.status().await;
    info!(
        led_writes = led_handle.write_count().await,
        "indicator closed"
    );
    println!("{}", serde_json::to_string_pretty(&status)?);

    Ok(())
}

/// Read and validate the attribute file.
fn load_config(path: &Path) -> anyhow::Result<IndicatorConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let attrs: serde_json::Value =
        serde_json::from_str(&raw).context("config file is not valid JSON")?;
    IndicatorConfig::from_attributes(&attrs).context("invalid indicator attributes")
}

fn example_attributes() -> serde_json::Value {
    serde_json::json!({
        "board": "pi",
        "sensor": "radar-1",
        "rgb_led": "led-1",
        "poll_interval_ms": 500,
        "read_timeout_ms": 1000,
        "failure_threshold": 3,
        "color_attributes": {
            "no_target": { "red": 0.0, "green": 0.0, "blue": 1.0 },
            "moving_target": { "red": 1.0, "green": 0.0, "blue": 0.0 }
        }
    })
}
