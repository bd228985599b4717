//! Bounding-box volume and surface-area estimation.
//!
//! The estimate is deliberately an approximation: only the axis-aligned
//! bounding box of the harvested points is measured, never the enclosed solid.
//! Material-cost pricing downstream is calibrated against the box volume, so
//! the formulas here must not be "corrected" to true solid volume.
//!
//! ```text
//! length_x     = max(x) - min(x)
//! width_y      = max(y) - min(y)
//! height_z     = max(z) - min(z)
//! volume       = length_x * width_y * height_z * FILL_FRACTION
//! surface_area = 2 * (length_x*width_y + width_y*height_z + height_z*length_x)
//! ```
//!
//! Every field is finite and non-negative. Finite coordinates can still be
//! far enough apart that an extent or a product overflows; such values
//! saturate at `f64::MAX` instead of becoming `inf` (or NaN, via `inf * 0`).
//! [`GeometryEstimate::is_saturated`] reports when that happened.

use serde::{Deserialize, Serialize};

use crate::bbox::Aabb3;
use crate::error::{GeometryError, Result};

/// Fraction of the bounding-box volume counted as material.
///
/// `1.0` quotes the full bounding-box volume, which is what live pricing is
/// calibrated against. The archived AutoCAD extractor used `0.5`.
pub const FILL_FRACTION: f64 = 1.0;

/// Minimum height used for the volume of flat drawings (DXF).
///
/// A 2-D drawing measures zero along Z, but the part it describes has a
/// physical thickness.
pub const MIN_HEIGHT_CLAMP: f64 = 1.0;

/// Estimate returned when a recognized file yields no usable points.
pub const EMPTY_GEOMETRY_PLACEHOLDER: GeometryEstimate =
    GeometryEstimate::placeholder((10.0, 10.0, 10.0), 1000.0, 600.0);

/// Estimate returned for DWG files, which are binary and never parsed.
///
/// The surface area is a fixed quote input, not derived from the box.
pub const DWG_PLACEHOLDER: GeometryEstimate =
    GeometryEstimate::placeholder((50.0, 30.0, 20.0), 5000.0, 1500.0);

/// Whether the height used for volume may be clamped up to
/// [`EstimatorConfig::min_height_clamp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightPolicy {
    /// Use the measured height as-is.
    Measured,
    /// Use `max(measured, min_height_clamp)` for the volume only.
    ClampToMinimum,
}

/// Tunable estimator constants.
///
/// Every field defaults to the matching module constant, so a partial TOML
/// table overrides only what it names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Fraction of bounding-box volume counted as material, in `(0, 1]`.
    pub fill_fraction: f64,
    /// Minimum height for clamped volumes, `>= 0`.
    pub min_height_clamp: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            fill_fraction: FILL_FRACTION,
            min_height_clamp: MIN_HEIGHT_CLAMP,
        }
    }
}

impl EstimatorConfig {
    /// Check that the values keep every estimate non-negative.
    pub fn validate(&self) -> Result<()> {
        if !(self.fill_fraction > 0.0 && self.fill_fraction <= 1.0) {
            return Err(GeometryError::InvalidConfig(format!(
                "fill_fraction must be in (0, 1], got {}",
                self.fill_fraction
            )));
        }
        if !(self.min_height_clamp.is_finite() && self.min_height_clamp >= 0.0) {
            return Err(GeometryError::InvalidConfig(format!(
                "min_height_clamp must be finite and >= 0, got {}",
                self.min_height_clamp
            )));
        }
        Ok(())
    }
}

/// Size estimate for one uploaded file. All values are non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryEstimate {
    /// Extent along X.
    pub length_x: f64,
    /// Extent along Y.
    pub width_y: f64,
    /// Measured extent along Z (never clamped).
    pub height_z: f64,
    /// Bounding-box volume, scaled by the fill fraction.
    pub volume: f64,
    /// Bounding-box surface area.
    pub surface_area: f64,
}

impl GeometryEstimate {
    /// Derive an estimate from a bounding box.
    ///
    /// With [`HeightPolicy::ClampToMinimum`] only the volume sees the clamped
    /// height; `height_z` and `surface_area` keep the measured value.
    pub fn from_bounding_box(bbox: &Aabb3, config: &EstimatorConfig, policy: HeightPolicy) -> Self {
        let (length_x, width_y, height_z) = bbox.extent();
        let volume_height = match policy {
            HeightPolicy::Measured => height_z,
            HeightPolicy::ClampToMinimum => height_z.max(config.min_height_clamp),
        };

        // Saturate after every step so no later product sees `inf * 0`.
        let volume = mul(
            mul(mul(length_x, width_y), volume_height),
            config.fill_fraction,
        );
        let faces = mul(length_x, width_y) + mul(width_y, height_z) + mul(height_z, length_x);

        Self {
            length_x,
            width_y,
            height_z,
            volume,
            surface_area: mul(2.0, faces.min(f64::MAX)),
        }
    }

    /// True if any field hit `f64::MAX` because the geometry overflowed.
    pub fn is_saturated(&self) -> bool {
        [
            self.length_x,
            self.width_y,
            self.height_z,
            self.volume,
            self.surface_area,
        ]
        .contains(&f64::MAX)
    }

    /// A fixed estimate that was not measured from any geometry.
    pub const fn placeholder(
        dimensions: (f64, f64, f64),
        volume: f64,
        surface_area: f64,
    ) -> Self {
        Self {
            length_x: dimensions.0,
            width_y: dimensions.1,
            height_z: dimensions.2,
            volume,
            surface_area,
        }
    }

    /// Bounding-box dimensions as `(length, width, height)`.
    pub fn dimensions(&self) -> (f64, f64, f64) {
        (self.length_x, self.width_y, self.height_z)
    }
}

fn mul(a: f64, b: f64) -> f64 {
    (a * b).min(f64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point3;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn bbox(max: (f64, f64, f64)) -> Aabb3 {
        Aabb3::new(Point3::origin(), Point3::new(max.0, max.1, max.2))
    }

    #[test]
    fn test_box_formulas() {
        let est = GeometryEstimate::from_bounding_box(
            &bbox((10.0, 5.0, 2.0)),
            &EstimatorConfig::default(),
            HeightPolicy::Measured,
        );
        assert_eq!(est.dimensions(), (10.0, 5.0, 2.0));
        assert_relative_eq!(est.volume, 100.0);
        assert_relative_eq!(est.surface_area, 160.0);
    }

    #[test]
    fn test_clamp_affects_volume_only() {
        let est = GeometryEstimate::from_bounding_box(
            &bbox((3.0, 4.0, 0.0)),
            &EstimatorConfig::default(),
            HeightPolicy::ClampToMinimum,
        );
        assert_eq!(est.height_z, 0.0);
        assert_relative_eq!(est.volume, 12.0);
        assert_relative_eq!(est.surface_area, 24.0);
    }

    #[test]
    fn test_clamp_leaves_tall_parts_alone() {
        let est = GeometryEstimate::from_bounding_box(
            &bbox((2.0, 2.0, 3.0)),
            &EstimatorConfig::default(),
            HeightPolicy::ClampToMinimum,
        );
        assert_relative_eq!(est.volume, 12.0);
    }

    #[test]
    fn test_fill_fraction_scales_volume() {
        let config = EstimatorConfig {
            fill_fraction: 0.5,
            ..EstimatorConfig::default()
        };
        let est = GeometryEstimate::from_bounding_box(
            &bbox((10.0, 5.0, 2.0)),
            &config,
            HeightPolicy::Measured,
        );
        assert_relative_eq!(est.volume, 50.0);
        assert_relative_eq!(est.surface_area, 160.0);
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(EMPTY_GEOMETRY_PLACEHOLDER.dimensions(), (10.0, 10.0, 10.0));
        assert_eq!(EMPTY_GEOMETRY_PLACEHOLDER.volume, 1000.0);
        assert_eq!(EMPTY_GEOMETRY_PLACEHOLDER.surface_area, 600.0);
        assert_eq!(DWG_PLACEHOLDER.dimensions(), (50.0, 30.0, 20.0));
        assert_eq!(DWG_PLACEHOLDER.volume, 5000.0);
        assert_eq!(DWG_PLACEHOLDER.surface_area, 1500.0);
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: EstimatorConfig = toml::from_str("fill_fraction = 0.5").unwrap();
        assert_eq!(config.fill_fraction, 0.5);
        assert_eq!(config.min_height_clamp, MIN_HEIGHT_CLAMP);
    }

    #[test]
    fn test_config_validation() {
        assert!(EstimatorConfig::default().validate().is_ok());
        let zero_fill = EstimatorConfig {
            fill_fraction: 0.0,
            ..EstimatorConfig::default()
        };
        assert!(matches!(
            zero_fill.validate(),
            Err(GeometryError::InvalidConfig(_))
        ));
        let negative_clamp = EstimatorConfig {
            min_height_clamp: -1.0,
            ..EstimatorConfig::default()
        };
        assert!(negative_clamp.validate().is_err());
    }

    #[test]
    fn test_overflow_saturates() {
        let wide = Aabb3::new(Point3::new(-1.0e308, 0.0, 0.0), Point3::new(1.0e308, 0.0, 0.0));
        let est = GeometryEstimate::from_bounding_box(
            &wide,
            &EstimatorConfig::default(),
            HeightPolicy::Measured,
        );
        assert_eq!(est.length_x, f64::MAX);
        assert_eq!(est.volume, 0.0);
        assert_eq!(est.surface_area, 0.0);
        assert!(est.is_saturated());

        let huge = bbox((1.0e200, 1.0e200, 1.0e200));
        let est = GeometryEstimate::from_bounding_box(
            &huge,
            &EstimatorConfig::default(),
            HeightPolicy::ClampToMinimum,
        );
        assert_eq!(est.volume, f64::MAX);
        assert_eq!(est.surface_area, f64::MAX);

        let normal = GeometryEstimate::from_bounding_box(
            &bbox((10.0, 5.0, 2.0)),
            &EstimatorConfig::default(),
            HeightPolicy::Measured,
        );
        assert!(!normal.is_saturated());
    }

    fn finite() -> impl Strategy<Value = f64> {
        any::<f64>().prop_filter("finite", |v| v.is_finite())
    }

    fn point() -> impl Strategy<Value = Point3> {
        (finite(), finite(), finite()).prop_map(|(x, y, z)| Point3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_estimate_is_finite_and_non_negative(
            points in prop::collection::vec(point(), 1..6),
            fill_fraction in 0.001f64..=1.0,
            min_height_clamp in 0.0f64..1.0e6,
        ) {
            let bbox = Aabb3::from_points(&points).unwrap();
            let config = EstimatorConfig { fill_fraction, min_height_clamp };
            for policy in [HeightPolicy::Measured, HeightPolicy::ClampToMinimum] {
                let est = GeometryEstimate::from_bounding_box(&bbox, &config, policy);
                for value in [est.length_x, est.width_y, est.height_z, est.volume, est.surface_area] {
                    prop_assert!(value.is_finite(), "{:?} under {:?}", est, policy);
                    prop_assert!(value >= 0.0, "{:?} under {:?}", est, policy);
                }
            }
        }
    }
}
