//! Format dispatch and estimate derivation.

use serde::Serialize;
use tracing::{debug, warn};

use crate::bbox::Aabb3;
use crate::error::{GeometryError, Result};
use crate::estimate::{
    EstimatorConfig, GeometryEstimate, HeightPolicy, DWG_PLACEHOLDER, EMPTY_GEOMETRY_PLACEHOLDER,
};
use crate::format::Format;
use crate::math::PointCloud;
use crate::{dxf, step, stl};

/// Where an estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateOrigin {
    /// Derived from the bounding box of harvested points.
    Measured,
    /// No usable points were found; the empty-geometry placeholder was used.
    EmptyGeometryPlaceholder,
    /// The format is never parsed (DWG); its fixed placeholder was used.
    FormatPlaceholder,
}

/// Full result of one extraction, for callers that want more than the
/// estimate itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Format the bytes were parsed as.
    pub format: Format,
    /// The size estimate handed to pricing.
    pub estimate: GeometryEstimate,
    /// Whether the estimate was measured or substituted.
    pub origin: EstimateOrigin,
    /// Number of points harvested (zero for placeholders).
    pub point_count: usize,
    /// Bounding box of the harvested points, if any.
    pub bounding_box: Option<Aabb3>,
}

/// Harvest the point cloud of a file, or `None` for formats that are not
/// parsed.
pub fn harvest_points(bytes: &[u8], format: Format) -> Option<PointCloud> {
    match format {
        Format::Step => Some(step::harvest_points(bytes)),
        Format::Dxf => Some(dxf::harvest_points(bytes)),
        Format::Stl => Some(stl::harvest_points(bytes)),
        Format::Dwg => None,
    }
}

/// Height handling per format. Flat DXF drawings get the minimum-height
/// clamp; 3-D formats use the measured height.
pub fn height_policy(format: Format) -> HeightPolicy {
    match format {
        Format::Dxf => HeightPolicy::ClampToMinimum,
        Format::Step | Format::Stl | Format::Dwg => HeightPolicy::Measured,
    }
}

/// Geometry extractor with a fixed estimator configuration.
///
/// Stateless apart from its configuration; one instance can serve any number
/// of concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: EstimatorConfig,
}

impl Extractor {
    /// Extractor with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor with a custom configuration, validated up front.
    pub fn with_config(config: EstimatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The estimator configuration in use.
    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate from bytes and a file extension (`".stp"`, `"DXF"`, ...).
    ///
    /// Fails only for unrecognized extensions. A recognized file without
    /// usable geometry returns [`EMPTY_GEOMETRY_PLACEHOLDER`].
    pub fn extract(&self, bytes: &[u8], extension: &str) -> Result<GeometryEstimate> {
        let format = Format::from_extension(extension)?;
        Ok(self.analyze(bytes, format).estimate)
    }

    /// Estimate from a point cloud, failing with
    /// [`GeometryError::EmptyGeometry`] if it has no points.
    pub fn estimate(&self, cloud: &PointCloud, policy: HeightPolicy) -> Result<GeometryEstimate> {
        let bbox = cloud.bounding_box().ok_or(GeometryError::EmptyGeometry)?;
        Ok(GeometryEstimate::from_bounding_box(&bbox, &self.config, policy))
    }

    /// Run the full pipeline for an already-resolved format.
    pub fn analyze(&self, bytes: &[u8], format: Format) -> Extraction {
        let Some(cloud) = harvest_points(bytes, format) else {
            debug!(%format, bytes = bytes.len(), "format is not parsed; using fixed placeholder");
            return Extraction {
                format,
                estimate: DWG_PLACEHOLDER,
                origin: EstimateOrigin::FormatPlaceholder,
                point_count: 0,
                bounding_box: None,
            };
        };

        match self.estimate(&cloud, height_policy(format)) {
            Ok(estimate) => {
                if estimate.is_saturated() {
                    warn!(%format, ?estimate, "geometry overflowed; estimate saturated at f64::MAX");
                }
                Extraction {
                    format,
                    estimate,
                    origin: EstimateOrigin::Measured,
                    point_count: cloud.len(),
                    bounding_box: cloud.bounding_box(),
                }
            }
            Err(err) => {
                warn!(%format, bytes = bytes.len(), error = %err, "using placeholder estimate");
                Extraction {
                    format,
                    estimate: EMPTY_GEOMETRY_PLACEHOLDER,
                    origin: EstimateOrigin::EmptyGeometryPlaceholder,
                    point_count: 0,
                    bounding_box: None,
                }
            }
        }
    }
}

/// Estimate from bytes and a file extension with the default constants.
///
/// Shorthand for `Extractor::new().extract(bytes, extension)`.
pub fn extract(bytes: &[u8], extension: &str) -> Result<GeometryEstimate> {
    Extractor::new().extract(bytes, extension)
}
