#![warn(missing_docs)]

//! Bounding-box geometry extraction for SmartSpec quoting.
//!
//! Turns the raw bytes of an uploaded CAD or mesh file into a size estimate
//! (bounding box, volume, surface area) for the pricing stage. Supported
//! inputs are STEP (`.step`/`.stp`), ASCII DXF (`.dxf`) and ASCII STL
//! (`.stl`); DWG (`.dwg`) is recognized but never parsed and always yields a
//! fixed placeholder.
//!
//! Each format runs the same pipeline: a tokenizer harvests a point cloud,
//! the cloud is reduced to an axis-aligned bounding box, and the box is turned
//! into an estimate (see [`estimate`] for the formulas).
//!
//! # Example
//!
//! ```
//! use smartspec_geometry::extract;
//!
//! let step = b"#1=CARTESIAN_POINT('',(0.0,0.0,0.0));\n#2=CARTESIAN_POINT('',(10.0,5.0,2.0));";
//! let estimate = extract(step, ".step").unwrap();
//! assert_eq!(estimate.volume, 100.0);
//! assert_eq!(estimate.surface_area, 160.0);
//! ```

mod bbox;
mod error;
mod extract;
mod format;
mod math;
mod report;

pub mod dxf;
pub mod estimate;
pub mod step;
pub mod stl;

pub use bbox::Aabb3;
pub use error::{GeometryError, Result};
pub use estimate::{
    EstimatorConfig, GeometryEstimate, HeightPolicy, DWG_PLACEHOLDER, EMPTY_GEOMETRY_PLACEHOLDER,
    FILL_FRACTION, MIN_HEIGHT_CLAMP,
};
pub use extract::{extract, harvest_points, height_policy, EstimateOrigin, Extraction, Extractor};
pub use format::Format;
pub use math::{Point3, PointCloud};
pub use report::{AnalysisReport, BoundingBoxDimensions};
