//! Group-code/value pair reader for ASCII DXF.
//!
//! An ASCII DXF file is a sequence of line pairs: an integer group code on
//! one line and its value on the next. Codes are often right-aligned with
//! leading spaces, and lines may end in `\r\n`.

use tracing::debug;

/// One group-code/value pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPair<'a> {
    /// Group code (e.g. `0` entity type, `10`/`20`/`30` point X/Y/Z).
    pub code: i32,
    /// Value line with surrounding whitespace removed.
    pub value: &'a str,
    /// 1-indexed line number of the group code.
    pub line: usize,
}

impl GroupPair<'_> {
    /// Parse the value as a finite real number.
    pub fn real(&self) -> Option<f64> {
        self.value.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// True if this pair starts a new entity, section marker or header variable.
    pub fn is_entity_boundary(&self) -> bool {
        self.code == 0 || self.code == 9
    }
}

/// Iterator over the group pairs of a DXF document.
///
/// A code line that is not an integer is dropped and reading resumes on the
/// following line, so one corrupt line shifts the stream by at most one pair.
pub struct PairReader<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    skipped: usize,
}

impl<'a> PairReader<'a> {
    /// Create a reader over DXF text.
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            skipped: 0,
        }
    }

    /// Number of code lines dropped because they were not integers.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<'a> Iterator for PairReader<'a> {
    type Item = GroupPair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (idx, code_line) = self.lines.next()?;
            let code_str = code_line.trim();
            if code_str.is_empty() {
                continue;
            }
            let code = match code_str.parse::<i32>() {
                Ok(code) => code,
                Err(_) => {
                    debug!(line = idx + 1, text = code_str, "skipping non-integer DXF group code");
                    self.skipped += 1;
                    continue;
                }
            };
            let (_, value_line) = self.lines.next()?;
            return Some(GroupPair {
                code,
                value: value_line.trim(),
                line: idx + 1,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairs_with_padding_and_crlf() {
        let text = "  0\r\nSECTION\r\n  2\r\nENTITIES\r\n 10\r\n1.5\r\n";
        let pairs: Vec<_> = PairReader::new(text).collect();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].code, 0);
        assert_eq!(pairs[0].value, "SECTION");
        assert_eq!(pairs[1].value, "ENTITIES");
        assert_eq!(pairs[2].code, 10);
        assert_eq!(pairs[2].real(), Some(1.5));
        assert_eq!(pairs[2].line, 5);
    }

    #[test]
    fn test_bad_code_line_resyncs() {
        let text = "garbage\n10\n2.0\n20\n3.0\n";
        let mut reader = PairReader::new(text);
        let pairs: Vec<_> = reader.by_ref().collect();
        assert_eq!(reader.skipped(), 1);
        assert_eq!(
            pairs.iter().map(|p| (p.code, p.value)).collect::<Vec<_>>(),
            vec![(10, "2.0"), (20, "3.0")]
        );
    }

    #[test]
    fn test_dangling_code_dropped() {
        let pairs: Vec<_> = PairReader::new("0\nEOF\n10").collect();
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_real_rejects_garbage() {
        let pair = GroupPair {
            code: 10,
            value: "1.0abc",
            line: 1,
        };
        assert_eq!(pair.real(), None);
        let inf = GroupPair {
            code: 10,
            value: "inf",
            line: 1,
        };
        assert_eq!(inf.real(), None);
    }
}
