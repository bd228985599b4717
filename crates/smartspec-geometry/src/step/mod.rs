//! STEP (ISO 10303-21) coordinate harvesting.
//!
//! Collects every 3-D `CARTESIAN_POINT` in the file. Edges, faces and solids
//! are not reconstructed; the bounding box of the raw control and vertex
//! points is what the estimator needs.

mod lexer;
mod scanner;

pub use lexer::{Lexer, Position, SpannedToken, Token};
pub use scanner::PointScanner;

use tracing::debug;

use crate::math::PointCloud;

/// Harvest all 3-D Cartesian points from STEP text.
///
/// Malformed records are skipped; the scan never fails.
pub fn harvest_points(input: &[u8]) -> PointCloud {
    let (cloud, skipped) = PointScanner::new(input).collect_points();
    debug!(
        bytes = input.len(),
        points = cloud.len(),
        skipped,
        "parsed STEP file"
    );
    cloud
}
