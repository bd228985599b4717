//! File format dispatch by extension.

use std::fmt;

use crate::error::{GeometryError, Result};

/// CAD formats recognized by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// ISO 10303-21 STEP (`.step`, `.stp`).
    Step,
    /// AutoCAD Drawing Exchange Format (`.dxf`).
    Dxf,
    /// Stereolithography mesh, ASCII variant (`.stl`).
    Stl,
    /// AutoCAD native drawing (`.dwg`). Binary and proprietary; never parsed.
    Dwg,
}

impl Format {
    /// Every recognized format.
    pub const ALL: [Format; 4] = [Format::Step, Format::Dxf, Format::Stl, Format::Dwg];

    /// Resolve a format from an extension such as `".STEP"` or `"stl"`.
    ///
    /// The match is case-insensitive; a leading dot is optional.
    pub fn from_extension(extension: &str) -> Result<Self> {
        let ext = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "step" | "stp" => Ok(Format::Step),
            "dxf" => Ok(Format::Dxf),
            "stl" => Ok(Format::Stl),
            "dwg" => Ok(Format::Dwg),
            _ => Err(GeometryError::unsupported(extension)),
        }
    }

    /// Resolve a format from a file name, using the text after the last `.`.
    ///
    /// A name without a dot is unsupported.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        match file_name.rfind('.') {
            Some(idx) => Self::from_extension(&file_name[idx..]),
            None => Err(GeometryError::unsupported(file_name)),
        }
    }

    /// Extensions (without the dot) that map to this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Step => &["step", "stp"],
            Format::Dxf => &["dxf"],
            Format::Stl => &["stl"],
            Format::Dwg => &["dwg"],
        }
    }

    /// Short display name.
    pub fn name(self) -> &'static str {
        match self {
            Format::Step => "STEP",
            Format::Dxf => "DXF",
            Format::Stl => "STL",
            Format::Dwg => "DWG",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extensions_case_insensitive() {
        assert_eq!(Format::from_extension(".STEP").unwrap(), Format::Step);
        assert_eq!(Format::from_extension("stp").unwrap(), Format::Step);
        assert_eq!(Format::from_extension(".Dxf").unwrap(), Format::Dxf);
        assert_eq!(Format::from_extension(".stl").unwrap(), Format::Stl);
        assert_eq!(Format::from_extension(".DWG").unwrap(), Format::Dwg);
    }

    #[test]
    fn test_unsupported_extension() {
        assert_eq!(
            Format::from_extension(".xyz"),
            Err(GeometryError::UnsupportedFormat(".xyz".into()))
        );
        assert!(Format::from_extension("").is_err());
    }

    #[test]
    fn test_from_file_name_uses_last_dot() {
        assert_eq!(Format::from_file_name("bracket.v2.STP").unwrap(), Format::Step);
        assert_eq!(Format::from_file_name("plate.dxf").unwrap(), Format::Dxf);
        assert!(Format::from_file_name("archive.stl.zip").is_err());
        assert!(Format::from_file_name("README").is_err());
    }

    #[test]
    fn test_every_extension_round_trips() {
        for format in Format::ALL {
            for ext in format.extensions() {
                assert_eq!(Format::from_extension(ext).unwrap(), format);
            }
        }
    }
}
