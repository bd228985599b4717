//! JSON shape of an analysis as surfaced to pricing and the UI.

use serde::{Deserialize, Serialize};

use crate::estimate::GeometryEstimate;

/// Bounding-box dimensions of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxDimensions {
    /// Extent along X.
    pub length: f64,
    /// Extent along Y.
    pub width: f64,
    /// Extent along Z.
    pub height: f64,
}

/// `{ volume, surface_area, bounding_box: { length, width, height } }`,
/// optionally tagged with the analysed file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Estimated volume.
    pub volume: f64,
    /// Estimated surface area.
    pub surface_area: f64,
    /// Bounding-box dimensions.
    pub bounding_box: BoundingBoxDimensions,
    /// Name of the analysed file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl AnalysisReport {
    /// Attach the analysed file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

impl From<&GeometryEstimate> for AnalysisReport {
    fn from(estimate: &GeometryEstimate) -> Self {
        Self {
            volume: estimate.volume,
            surface_area: estimate.surface_area,
            bounding_box: BoundingBoxDimensions {
                length: estimate.length_x,
                width: estimate.width_y,
                height: estimate.height_z,
            },
            file_name: None,
        }
    }
}
