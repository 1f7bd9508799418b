//! Color policy: the mapping from detection state to LED color.
//!
//! A [`ColorTable`] always covers all four detection states. It is built
//! once per configuration from the built-in palette plus any user
//! overrides, and the polling loop resolves against an immutable snapshot
//! of it, so a tick can never observe a half-updated table.

use lumen_core::constants::{
    DEFAULT_MOVING_AND_STATIC_COLOR, DEFAULT_MOVING_TARGET_COLOR, DEFAULT_NO_TARGET_COLOR,
    DEFAULT_STATIC_TARGET_COLOR,
};
use lumen_core::{ColorValue, DetectionState, Result};
use serde::Deserialize;

/// A single user-supplied color override, as it appears in configuration.
///
/// Channel values are validated when the table is built, not here;
/// deserialization only rejects structural problems (unknown keys,
/// non-numeric values).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorSpec {
    /// Red channel intensity.
    pub red: f64,

    /// Green channel intensity.
    pub green: f64,

    /// Blue channel intensity.
    pub blue: f64,
}

/// Partial per-state color overrides from the `color_attributes`
/// configuration block.
///
/// States left unset fall back to the built-in defaults. Unknown keys in
/// the block are a configuration error, not silently ignored: a typo like
/// `moving_tagret` must not quietly leave the default in place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorOverrides {
    /// Override for [`DetectionState::NoTarget`].
    #[serde(default)]
    pub no_target: Option<ColorSpec>,

    /// Override for [`DetectionState::MovingTarget`].
    #[serde(default)]
    pub moving_target: Option<ColorSpec>,

    /// Override for [`DetectionState::StaticTarget`].
    #[serde(default)]
    pub static_target: Option<ColorSpec>,

    /// Override for [`DetectionState::MovingAndStaticTargets`].
    #[serde(default)]
    pub moving_and_static_targets: Option<ColorSpec>,
}

impl ColorOverrides {
    /// Returns `true` if no state is overridden.
    pub fn is_empty(&self) -> bool {
        self.no_target.is_none()
            && self.moving_target.is_none()
            && self.static_target.is_none()
            && self.moving_and_static_targets.is_none()
    }
}

/// Complete mapping from detection state to LED color.
///
/// The table is immutable once built and covers every [`DetectionState`]
/// variant, so [`resolve`](ColorTable::resolve) is total and infallible.
///
/// # Examples
///
/// ```
/// use lumen_indicator::colors::{ColorOverrides, ColorSpec, ColorTable};
/// use lumen_core::DetectionState;
///
/// let overrides = ColorOverrides {
///     moving_target: Some(ColorSpec { red: 1.0, green: 0.5, blue: 0.0 }),
///     ..Default::default()
/// };
///
/// let table = ColorTable::build(&overrides).unwrap();
///
/// // Overridden state
/// assert_eq!(
///     table.resolve(DetectionState::MovingTarget).as_rgb(),
///     (1.0, 0.5, 0.0)
/// );
/// // Unspecified state falls back to the default (green)
/// assert_eq!(
///     table.resolve(DetectionState::StaticTarget).as_rgb(),
///     (0.0, 1.0, 0.0)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTable {
    /// One entry per detection state, indexed by the sensor code.
    entries: [ColorValue; 4],
}

impl ColorTable {
    /// Build a table from the built-in defaults plus the given overrides.
    ///
    /// Validation is all-or-nothing: any out-of-range channel fails the
    /// whole build and no partial table is produced.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidColorConfig` if any override channel lies
    /// outside [0.0, 1.0].
    pub fn build(overrides: &ColorOverrides) -> Result<Self> {
        let mut entries = [
            DEFAULT_NO_TARGET_COLOR,
            DEFAULT_MOVING_TARGET_COLOR,
            DEFAULT_STATIC_TARGET_COLOR,
            DEFAULT_MOVING_AND_STATIC_COLOR,
        ];

        let slots = [
            (DetectionState::NoTarget, overrides.no_target),
            (DetectionState::MovingTarget, overrides.moving_target),
            (DetectionState::StaticTarget, overrides.static_target),
            (
                DetectionState::MovingAndStaticTargets,
                overrides.moving_and_static_targets,
            ),
        ];

        for (state, spec) in slots {
            if let Some(spec) = spec {
                entries[state.to_code() as usize] =
                    ColorValue::new(spec.red, spec.green, spec.blue)?;
            }
        }

        Ok(Self { entries })
    }

    /// Build a table with no overrides: the documented default palette.
    pub fn defaults() -> Self {
        Self {
            entries: [
                DEFAULT_NO_TARGET_COLOR,
                DEFAULT_MOVING_TARGET_COLOR,
                DEFAULT_STATIC_TARGET_COLOR,
                DEFAULT_MOVING_AND_STATIC_COLOR,
            ],
        }
    }

    /// Resolve the color for a detection state. Total, never fails.
    #[inline]
    #[must_use]
    pub fn resolve(&self, state: DetectionState) -> ColorValue {
        self.entries[state.to_code() as usize]
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::Error;
    use rstest::rstest;

    #[rstest]
    #[case(DetectionState::NoTarget, (0.0, 0.0, 1.0))]
    #[case(DetectionState::MovingTarget, (1.0, 0.0, 0.0))]
    #[case(DetectionState::StaticTarget, (0.0, 1.0, 0.0))]
    #[case(DetectionState::MovingAndStaticTargets, (1.0, 0.0, 1.0))]
    fn test_default_table_resolves_documented_palette(
        #[case] state: DetectionState,
        #[case] expected: (f64, f64, f64),
    ) {
        let table = ColorTable::defaults();
        assert_eq!(table.resolve(state).as_rgb(), expected);
    }

    #[test]
    fn test_build_empty_overrides_equals_defaults() {
        let table = ColorTable::build(&ColorOverrides::default()).unwrap();
        assert_eq!(table, ColorTable::defaults());
    }

    #[test]
    fn test_build_partial_overrides_fall_back_per_state() {
        let overrides = ColorOverrides {
            no_target: Some(ColorSpec {
                red: 0.1,
                green: 0.1,
                blue: 0.8,
            }),
            moving_target: Some(ColorSpec {
                red: 1.0,
                green: 0.5,
                blue: 0.0,
            }),
            ..Default::default()
        };

        let table = ColorTable::build(&overrides).unwrap();

        assert_eq!(table.resolve(DetectionState::NoTarget).as_rgb(), (0.1, 0.1, 0.8));
        assert_eq!(
            table.resolve(DetectionState::MovingTarget).as_rgb(),
            (1.0, 0.5, 0.0)
        );
        // Unspecified states keep the defaults
        assert_eq!(
            table.resolve(DetectionState::StaticTarget).as_rgb(),
            (0.0, 1.0, 0.0)
        );
        assert_eq!(
            table.resolve(DetectionState::MovingAndStaticTargets).as_rgb(),
            (1.0, 0.0, 1.0)
        );
    }

    #[rstest]
    #[case(-0.1, 0.0, 0.0)]
    #[case(0.0, 1.5, 0.0)]
    #[case(0.0, 0.0, 255.0)]
    fn test_build_rejects_out_of_range_channels(
        #[case] red: f64,
        #[case] green: f64,
        #[case] blue: f64,
    ) {
        let overrides = ColorOverrides {
            static_target: Some(ColorSpec { red, green, blue }),
            ..Default::default()
        };

        let result = ColorTable::build(&overrides);
        assert!(matches!(result, Err(Error::InvalidColorConfig(_))));
    }

    #[test]
    fn test_overrides_deserialization_rejects_unknown_state_key() {
        let json = serde_json::json!({
            "no_target": { "red": 0.0, "green": 0.0, "blue": 1.0 },
            "hovering_target": { "red": 1.0, "green": 1.0, "blue": 1.0 }
        });

        let result: std::result::Result<ColorOverrides, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_spec_deserialization_rejects_unknown_channel_key() {
        let json = serde_json::json!({ "red": 1.0, "green": 0.0, "blue": 0.0, "alpha": 0.5 });

        let result: std::result::Result<ColorSpec, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_is_empty() {
        assert!(ColorOverrides::default().is_empty());

        let overrides = ColorOverrides {
            no_target: Some(ColorSpec {
                red: 0.0,
                green: 0.0,
                blue: 0.0,
            }),
            ..Default::default()
        };
        assert!(!overrides.is_empty());
    }
}
