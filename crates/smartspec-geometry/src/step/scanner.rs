//! Coordinate harvesting over a STEP token stream.
//!
//! The scanner does not build the entity graph. It walks the token stream,
//! and whenever it meets a `CARTESIAN_POINT(...)` record (as a plain entity
//! or inside a complex entity instance) it reads that record's argument list
//! and keeps the coordinate triple. Topology and every other entity type are
//! ignored.

use tracing::{debug, trace};

use super::lexer::{Lexer, SpannedToken, Token};
use crate::math::{Point3, PointCloud};

const CARTESIAN_POINT: &str = "CARTESIAN_POINT";

/// One argument value inside a record.
#[derive(Debug, Clone, PartialEq)]
enum StepValue {
    Real(f64),
    Integer(i64),
    /// A string argument; the contents are never needed.
    String,
    List(Vec<StepValue>),
    /// Anything the scanner does not need to inspect.
    Other,
}

impl StepValue {
    fn as_real(&self) -> Option<f64> {
        match self {
            StepValue::Real(v) => Some(*v),
            StepValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    fn as_list(&self) -> Option<&[StepValue]> {
        match self {
            StepValue::List(v) => Some(v),
            _ => None,
        }
    }
}

/// Streaming `CARTESIAN_POINT` reader.
pub struct PointScanner<'a> {
    lexer: Lexer<'a>,
    peeked: Option<SpannedToken<'a>>,
    skipped: usize,
}

impl<'a> PointScanner<'a> {
    /// Create a scanner over raw STEP bytes.
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
            skipped: 0,
        }
    }

    /// Number of records dropped so far because they were malformed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Collect every 3-D Cartesian point in the input.
    pub fn collect_points(mut self) -> (PointCloud, usize) {
        let mut cloud = PointCloud::new();
        while let Some(point) = self.next_point() {
            cloud.push(point);
        }
        (cloud, self.skipped)
    }

    /// Advance to the next well-formed 3-D Cartesian point.
    pub fn next_point(&mut self) -> Option<Point3> {
        loop {
            let tok = self.next_token()?;
            if !tok.token.is_keyword(CARTESIAN_POINT)
                || !self.peek_token().is_some_and(|next| next.token == Token::LParen)
            {
                continue;
            }
            self.next_token();

            let Some(args) = self.read_args() else {
                self.skipped += 1;
                continue;
            };
            match point_from_args(&args) {
                Some(point) => return Some(point),
                None => {
                    trace!(line = tok.pos.line, "CARTESIAN_POINT without a 3-D coordinate triple");
                    self.skipped += 1;
                }
            }
        }
    }

    /// Read the argument list after an opening parenthesis has been consumed.
    ///
    /// Returns `None` if the record is cut short by a lexer error or the end
    /// of input.
    fn read_args(&mut self) -> Option<Vec<StepValue>> {
        let mut stack: Vec<Vec<StepValue>> = vec![Vec::new()];
        loop {
            let tok = match self.lexer.next_token() {
                Ok(Some(tok)) => tok,
                Ok(None) => return None,
                Err(err) => {
                    debug!(error = %err, "skipping malformed STEP record");
                    self.lexer.skip_record();
                    return None;
                }
            };

            let value = match tok.token {
                Token::LParen => {
                    stack.push(Vec::new());
                    continue;
                }
                Token::RParen => {
                    let list = stack.pop()?;
                    match stack.last_mut() {
                        Some(parent) => {
                            parent.push(StepValue::List(list));
                            continue;
                        }
                        None => return Some(list),
                    }
                }
                Token::Comma => continue,
                Token::Semicolon => {
                    debug!(line = tok.pos.line, "STEP record ended before its argument list closed");
                    return None;
                }
                Token::Real(v) => StepValue::Real(v),
                Token::Integer(v) => StepValue::Integer(v),
                Token::String(_) => StepValue::String,
                _ => StepValue::Other,
            };
            stack.last_mut()?.push(value);
        }
    }

    fn next_token(&mut self) -> Option<SpannedToken<'a>> {
        if let Some(tok) = self.peeked.take() {
            return Some(tok);
        }
        self.lex()
    }

    fn peek_token(&mut self) -> Option<&SpannedToken<'a>> {
        if self.peeked.is_none() {
            self.peeked = self.lex();
        }
        self.peeked.as_ref()
    }

    /// Next token from the lexer, resynchronising past malformed records.
    fn lex(&mut self) -> Option<SpannedToken<'a>> {
        loop {
            match self.lexer.next_token() {
                Ok(tok) => return tok,
                Err(err) => {
                    debug!(error = %err, "skipping malformed STEP record");
                    self.skipped += 1;
                    self.lexer.skip_record();
                }
            }
        }
    }
}

/// `CARTESIAN_POINT(name, (x, y, z))`: take the coordinate list. 2-D points
/// (parameter-space) and lists with non-numeric or non-finite entries are
/// rejected.
fn point_from_args(args: &[StepValue]) -> Option<Point3> {
    let coords = match args {
        [StepValue::String, list, ..] => list.as_list()?,
        [list] => list.as_list()?,
        _ => return None,
    };
    if coords.len() != 3 {
        return None;
    }
    let x = coords[0].as_real()?;
    let y = coords[1].as_real()?;
    let z = coords[2].as_real()?;
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return None;
    }
    Some(Point3::new(x, y, z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(input: &str) -> (Vec<Point3>, usize) {
        let (cloud, skipped) = PointScanner::new(input.as_bytes()).collect_points();
        (cloud.as_slice().to_vec(), skipped)
    }

    #[test]
    fn test_plain_records() {
        let (points, skipped) = scan(
            "#1 = CARTESIAN_POINT('', (0.0, 0.0, 0.0));\n\
             #2 = DIRECTION('', (1.0, 0.0, 0.0));\n\
             #3 = CARTESIAN_POINT('corner', (10.0, 5.0, 2.0));",
        );
        assert_eq!(
            points,
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 5.0, 2.0)]
        );
        assert_eq!(skipped, 0);
    }

    #[test]
    fn test_integer_and_exponent_coordinates() {
        let (points, _) = scan("#7=CARTESIAN_POINT('',(1,-2.5E1,3.E-1));");
        assert_eq!(points, vec![Point3::new(1.0, -25.0, 0.3)]);
    }

    #[test]
    fn test_two_dimensional_points_ignored() {
        let (points, skipped) = scan("#1 = CARTESIAN_POINT('', (0.5, 0.25));");
        assert!(points.is_empty());
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_malformed_record_skipped_scan_continues() {
        let (points, skipped) = scan(
            "#1 = CARTESIAN_POINT('', (1.0, 2.0E, 3.0));\n\
             #2 = CARTESIAN_POINT('', (4.0, 5.0, 6.0));",
        );
        assert_eq!(points, vec![Point3::new(4.0, 5.0, 6.0)]);
        assert_eq!(skipped, 1);
    }

    #[test]
    fn test_stray_characters_outside_records() {
        let (points, _) = scan(
            "@@@ garbage;\n#1 = CARTESIAN_POINT('', (1.0, 1.0, 1.0));",
        );
        assert_eq!(points, vec![Point3::new(1.0, 1.0, 1.0)]);
    }

    #[test]
    fn test_point_inside_complex_entity() {
        let (points, _) = scan(
            "#9 = ( GEOMETRIC_REPRESENTATION_ITEM() CARTESIAN_POINT('', (7.0, 8.0, 9.0)) );",
        );
        assert_eq!(points, vec![Point3::new(7.0, 8.0, 9.0)]);
    }

    #[test]
    fn test_keyword_without_arguments_ignored() {
        let (points, _) = scan("FILE_DESCRIPTION(('CARTESIAN_POINT'), '2;1'); CARTESIAN_POINT;");
        assert!(points.is_empty());
    }

    #[test]
    fn test_truncated_record() {
        let (points, skipped) = scan("#1 = CARTESIAN_POINT('', (1.0, 2.0");
        assert!(points.is_empty());
        assert_eq!(skipped, 1);
    }
}
