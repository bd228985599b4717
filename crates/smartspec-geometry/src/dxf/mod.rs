//! DXF vertex harvesting.
//!
//! Every group code `10` (primary X) yields one point. Its Y and Z come from
//! the nearest following `20` and `30` codes, searched only inside the same
//! vertex group: the span ends at the next `10` or at the next entity boundary
//! (code `0`, or `9` in the HEADER section). A missing Y or Z defaults to `0`,
//! so 2-D entities such as `LWPOLYLINE` produce points on the Z = 0 plane.
//!
//! Only the primary point codes are read. Secondary points (`11`/`21`/`31`,
//! e.g. a LINE's end point) are not harvested; a structured entity reader
//! would be needed to interpret them per entity type.

mod reader;

pub use reader::{GroupPair, PairReader};

use tracing::debug;

use crate::math::{Point3, PointCloud};

const X_CODE: i32 = 10;
const Y_CODE: i32 = 20;
const Z_CODE: i32 = 30;

/// Sentinel at the start of binary DXF files, which are not parsed.
const BINARY_SENTINEL: &[u8] = b"AutoCAD Binary DXF";

/// Harvest vertex points from ASCII DXF bytes.
///
/// Binary DXF yields an empty cloud. Pairs with malformed coordinates are
/// skipped; the scan never fails.
pub fn harvest_points(input: &[u8]) -> PointCloud {
    if input.starts_with(BINARY_SENTINEL) {
        debug!(bytes = input.len(), "binary DXF is not supported");
        return PointCloud::new();
    }

    let text = String::from_utf8_lossy(input);
    let mut reader = PairReader::new(&text);
    let mut cloud = PointCloud::new();
    let mut entity: Vec<GroupPair<'_>> = Vec::new();
    let mut skipped = 0;

    for pair in reader.by_ref() {
        if pair.is_entity_boundary() {
            skipped += collect_entity_points(&entity, &mut cloud);
            entity.clear();
        }
        entity.push(pair);
    }
    skipped += collect_entity_points(&entity, &mut cloud);

    debug!(
        bytes = input.len(),
        points = cloud.len(),
        skipped,
        bad_codes = reader.skipped(),
        "parsed DXF file"
    );
    cloud
}

/// Add the points of one entity's pairs to `cloud`. Returns how many vertex
/// groups were dropped as malformed.
fn collect_entity_points(pairs: &[GroupPair<'_>], cloud: &mut PointCloud) -> usize {
    let mut skipped = 0;
    for (i, pair) in pairs.iter().enumerate() {
        if pair.code != X_CODE {
            continue;
        }
        match vertex_at(pairs, i) {
            Some(point) => cloud.push(point),
            None => {
                debug!(line = pair.line, value = pair.value, "skipping malformed DXF vertex");
                skipped += 1;
            }
        }
    }
    skipped
}

/// Build the point whose X pair is `pairs[start]`.
fn vertex_at(pairs: &[GroupPair<'_>], start: usize) -> Option<Point3> {
    let x = pairs[start].real()?;
    let mut y = None;
    let mut z = None;

    for pair in pairs[start + 1..].iter().take_while(|p| p.code != X_CODE) {
        match pair.code {
            Y_CODE if y.is_none() => y = Some(pair.real()?),
            Z_CODE if z.is_none() => z = Some(pair.real()?),
            _ => {}
        }
    }

    Some(Point3::new(x, y.unwrap_or(0.0), z.unwrap_or(0.0)))
}
