//! Facet block reader for ASCII STL.
//!
//! ```text
//! solid name
//!   facet normal nx ny nz
//!     outer loop
//!       vertex x y z
//!       vertex x y z
//!       vertex x y z
//!     endloop
//!   endfacet
//! endsolid name
//! ```
//!
//! Keywords are matched case-insensitively. Facet normals are ignored.

use std::str::SplitAsciiWhitespace;

use tracing::debug;

use crate::math::Point3;

/// One triangular facet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    /// The three corner vertices, in file order.
    pub vertices: [Point3; 3],
}

/// Iterator over the well-formed facets of an ASCII STL document.
///
/// A facet is kept only if it has exactly three vertices with finite
/// numeric coordinates. Any other facet block is skipped and counted.
pub struct FacetReader<'a> {
    words: SplitAsciiWhitespace<'a>,
    /// A `facet` keyword was consumed while reading the previous body.
    pending: bool,
    skipped: usize,
}

impl<'a> FacetReader<'a> {
    /// Create a reader over STL text.
    pub fn new(text: &'a str) -> Self {
        Self {
            words: text.split_ascii_whitespace(),
            pending: false,
            skipped: 0,
        }
    }

    /// Number of facet blocks dropped as malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Read one facet body after its `facet` keyword.
    ///
    /// Returns the parsed vertices and whether another `facet` keyword was
    /// consumed (a facet missing its `endfacet`).
    fn read_body(&mut self) -> (Option<Vec<Point3>>, bool) {
        let mut vertices = Some(Vec::with_capacity(3));
        while let Some(word) = self.words.next() {
            if word.eq_ignore_ascii_case("endfacet") {
                return (vertices, false);
            }
            if word.eq_ignore_ascii_case("facet") {
                return (vertices, true);
            }
            if word.eq_ignore_ascii_case("vertex") {
                let point = self.read_coords();
                vertices = match (vertices, point) {
                    (Some(mut list), Some(p)) => {
                        list.push(p);
                        Some(list)
                    }
                    _ => None,
                };
            }
        }
        (vertices, false)
    }

    fn read_coords(&mut self) -> Option<Point3> {
        let mut coords = [0.0f64; 3];
        for c in &mut coords {
            *c = self
                .words
                .next()?
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())?;
        }
        Some(Point3::new(coords[0], coords[1], coords[2]))
    }
}

impl Iterator for FacetReader<'_> {
    type Item = Facet;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if !self.pending {
                loop {
                    let word = self.words.next()?;
                    if word.eq_ignore_ascii_case("facet") {
                        break;
                    }
                }
            }

            let (vertices, next_started) = self.read_body();
            self.pending = next_started;

            if let Some(&[a, b, c]) = vertices.as_deref() {
                return Some(Facet {
                    vertices: [a, b, c],
                });
            }
            debug!("skipping malformed STL facet");
            self.skipped += 1;
        }
    }
}
