use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Presence category reported by the radar sensor.
///
/// The physical sensor publishes its current reading as a small integer
/// code (0-3); [`DetectionState::from_code`] performs the conversion at the
/// sensor boundary so the rest of the system only ever sees a closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DetectionState {
    /// Nothing in range.
    NoTarget = 0,
    /// A moving target is in range.
    MovingTarget = 1,
    /// A stationary target is in range.
    StaticTarget = 2,
    /// Both a moving and a stationary target are in range.
    MovingAndStaticTargets = 3,
}

impl DetectionState {
    /// Create a detection state from the sensor's numeric code.
    ///
    /// # Errors
    /// Returns `Error::UnknownDetectionCode` if the code is not 0-3.
    #[inline]
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(DetectionState::NoTarget),
            1 => Ok(DetectionState::MovingTarget),
            2 => Ok(DetectionState::StaticTarget),
            3 => Ok(DetectionState::MovingAndStaticTargets),
            _ => Err(Error::UnknownDetectionCode { code }),
        }
    }

    /// Convert the detection state to the sensor's numeric code.
    #[inline]
    #[must_use]
    pub fn to_code(self) -> u8 {
        self as u8
    }

    /// Returns `true` if any target (moving, static, or both) is in range.
    #[inline]
    #[must_use]
    pub fn is_present(self) -> bool {
        !matches!(self, DetectionState::NoTarget)
    }
}

impl fmt::Display for DetectionState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DetectionState::NoTarget => write!(f, "NoTarget"),
            DetectionState::MovingTarget => write!(f, "MovingTarget"),
            DetectionState::StaticTarget => write!(f, "StaticTarget"),
            DetectionState::MovingAndStaticTargets => write!(f, "MovingAndStaticTargets"),
        }
    }
}

impl std::str::FromStr for DetectionState {
    type Err = Error;

    /// Parse the decimal string form used by the sensor transport ("0"-"3").
    fn from_str(s: &str) -> Result<Self> {
        let code: u8 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidDetectionState(s.to_string()))?;
        DetectionState::from_code(code)
    }
}

/// RGB intensity triple with each channel normalized to [0.0, 1.0].
///
/// Channel values are PWM duty cycles. Out-of-range values are rejected at
/// configuration time by [`ColorValue::new`]; the built-in palette in
/// [`crate::constants`] is constructed from known-good literals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorValue {
    red: f64,
    green: f64,
    blue: f64,
}

impl ColorValue {
    /// Create a color with channel validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidColorConfig` if any channel lies outside
    /// [0.0, 1.0] or is not a finite number.
    pub fn new(red: f64, green: f64, blue: f64) -> Result<Self> {
        for (channel, value) in [("red", red), ("green", green), ("blue", blue)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidColorConfig(format!(
                    "{channel} channel must be in [0.0, 1.0], got {value}"
                )));
            }
        }
        Ok(ColorValue { red, green, blue })
    }

    /// Construct from literals known to be in range. Not validated.
    pub(crate) const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        ColorValue { red, green, blue }
    }

    /// Red channel intensity.
    #[must_use]
    pub fn red(&self) -> f64 {
        self.red
    }

    /// Green channel intensity.
    #[must_use]
    pub fn green(&self) -> f64 {
        self.green
    }

    /// Blue channel intensity.
    #[must_use]
    pub fn blue(&self) -> f64 {
        self.blue
    }

    /// Get the three channel intensities as an (r, g, b) tuple.
    #[must_use]
    pub fn as_rgb(&self) -> (f64, f64, f64) {
        (self.red, self.green, self.blue)
    }

    /// Returns `true` if all channels are off.
    #[must_use]
    pub fn is_unlit(&self) -> bool {
        self.red == 0.0 && self.green == 0.0 && self.blue == 0.0
    }
}

impl fmt::Display for ColorValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "({:.2}, {:.2}, {:.2})",
            self.red, self.green, self.blue
        )
    }
}
