//! STL vertex harvesting (ASCII only).
//!
//! Each facet contributes its three vertices. Vertices shared between facets
//! are not deduplicated; duplicates do not change the bounding box.
//! Binary STL is not parsed and yields an empty cloud.

mod reader;

pub use reader::{Facet, FacetReader};

use tracing::debug;

use crate::math::PointCloud;

const BINARY_HEADER_LEN: usize = 80;
const BINARY_TRIANGLE_LEN: usize = 50;

/// True if the bytes have the exact size of a binary STL: an 80-byte header,
/// a little-endian `u32` triangle count, then 50 bytes per triangle.
///
/// Binary files may start with `solid` too, so the keyword cannot be used.
pub fn looks_binary(input: &[u8]) -> bool {
    let count_end = BINARY_HEADER_LEN + 4;
    if input.len() < count_end {
        return false;
    }
    let mut count = [0u8; 4];
    count.copy_from_slice(&input[BINARY_HEADER_LEN..count_end]);
    let triangles = u32::from_le_bytes(count) as usize;
    triangles
        .checked_mul(BINARY_TRIANGLE_LEN)
        .and_then(|body| body.checked_add(count_end))
        == Some(input.len())
}

/// Harvest facet vertices from ASCII STL bytes.
pub fn harvest_points(input: &[u8]) -> PointCloud {
    if looks_binary(input) {
        debug!(bytes = input.len(), "binary STL is not supported");
        return PointCloud::new();
    }

    let text = String::from_utf8_lossy(input);
    let mut reader = FacetReader::new(&text);
    let mut cloud = PointCloud::new();
    for facet in reader.by_ref() {
        cloud.extend(facet.vertices);
    }

    debug!(
        bytes = input.len(),
        points = cloud.len(),
        skipped = reader.skipped(),
        "parsed STL file"
    );
    cloud
}
