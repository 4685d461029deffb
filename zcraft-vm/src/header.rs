//! # Story Header
//!
//! Fixed-offset fields at the start of a story image. Only the version byte
//! is required; the rest of the layout is read when a full 64-byte header is
//! present.

use crate::error::{self, Error, Result};
use serde::Serialize;
use std::fmt;

/// Size of the fixed story header
pub const HEADER_SIZE: usize = 64;

/// Byte offsets of header fields
pub mod offset {
    pub const VERSION: usize = 0x00;
    pub const FLAGS1: usize = 0x01;
    pub const RELEASE: usize = 0x02;
    pub const HIGH_BASE: usize = 0x04;
    pub const INITIAL_PC: usize = 0x06;
    pub const DICTIONARY: usize = 0x08;
    pub const OBJECT_TABLE: usize = 0x0A;
    pub const GLOBALS: usize = 0x0C;
    pub const STATIC_BASE: usize = 0x0E;
    pub const FLAGS2: usize = 0x10;
    pub const SERIAL: usize = 0x12;
    pub const ABBREVIATIONS: usize = 0x18;
    pub const FILE_LENGTH: usize = 0x1A;
    pub const CHECKSUM: usize = 0x1C;
    pub const ROUTINES_OFFSET: usize = 0x28;
    pub const STRINGS_OFFSET: usize = 0x2A;
}

/// Story file format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
#[repr(u8)]
pub enum Version {
    V1 = 1,
    V2 = 2,
    V3 = 3,
    V4 = 4,
    V5 = 5,
    V6 = 6,
    V7 = 7,
    V8 = 8,
}

impl Version {
    /// The version number as stored in the header
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The addressing band this version belongs to
    pub fn band(self) -> VersionBand {
        match self {
            Version::V1 | Version::V2 | Version::V3 => VersionBand::Early,
            Version::V4 | Version::V5 => VersionBand::Standard,
            Version::V6 | Version::V7 => VersionBand::Offset,
            Version::V8 => VersionBand::Large,
        }
    }
}

impl TryFrom<u8> for Version {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Version::V1),
            2 => Ok(Version::V2),
            3 => Ok(Version::V3),
            4 => Ok(Version::V4),
            5 => Ok(Version::V5),
            6 => Ok(Version::V6),
            7 => Ok(Version::V7),
            8 => Ok(Version::V8),
            other => Err(error::unsupported_version(other)),
        }
    }
}

impl From<Version> for u8 {
    fn from(version: Version) -> u8 {
        version.number()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.number())
    }
}

/// Versions grouped by how they scale packed addresses and the file length.
///
/// Every version-dependent constant lives here so adding a band touches one
/// table instead of every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionBand {
    /// Versions 1-3
    Early,
    /// Versions 4-5
    Standard,
    /// Versions 6-7, which add header offsets to routine and string addresses
    Offset,
    /// Version 8
    Large,
}

impl VersionBand {
    /// Generic packed address scale factor: 2 for versions 1-3, 4 after
    pub const fn packed_multiplier(self) -> usize {
        match self {
            VersionBand::Early => 2,
            VersionBand::Standard | VersionBand::Offset | VersionBand::Large => 4,
        }
    }

    /// Scale factor for routine and string addresses. Version 8 stories are
    /// twice as large, so their routines and strings sit on 8-byte boundaries.
    pub const fn unpack_multiplier(self) -> usize {
        match self {
            VersionBand::Early => 2,
            VersionBand::Standard | VersionBand::Offset => 4,
            VersionBand::Large => 8,
        }
    }

    /// Scale factor applied to the header file-length word
    pub const fn file_length_divisor(self) -> usize {
        match self {
            VersionBand::Early => 2,
            VersionBand::Standard => 4,
            VersionBand::Offset | VersionBand::Large => 8,
        }
    }

    /// Whether routine and string offsets from the header apply
    pub const fn uses_offsets(self) -> bool {
        matches!(self, VersionBand::Offset)
    }
}

/// Header fields beyond the version byte
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub flags1: u8,
    pub release: u16,
    /// First byte of high memory
    pub high_base: u16,
    /// Initial program counter (packed routine address in version 6)
    pub initial_pc: u16,
    pub dictionary: u16,
    pub object_table: u16,
    pub globals: u16,
    /// First byte of static memory; everything below it is dynamic
    pub static_base: u16,
    pub flags2: u16,
    pub serial: String,
    pub abbreviations: u16,
    /// Story length in bytes, already scaled. Zero when the story omits it.
    pub file_length: usize,
    pub checksum: u16,
    pub routines_offset: u16,
    pub strings_offset: u16,
}

impl Layout {
    fn parse(bytes: &[u8], band: VersionBand) -> Self {
        let word = |at: usize| u16::from_be_bytes([bytes[at], bytes[at + 1]]);
        let serial = bytes[offset::SERIAL..offset::SERIAL + 6]
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '?' })
            .collect();

        Self {
            flags1: bytes[offset::FLAGS1],
            release: word(offset::RELEASE),
            high_base: word(offset::HIGH_BASE),
            initial_pc: word(offset::INITIAL_PC),
            dictionary: word(offset::DICTIONARY),
            object_table: word(offset::OBJECT_TABLE),
            globals: word(offset::GLOBALS),
            static_base: word(offset::STATIC_BASE),
            flags2: word(offset::FLAGS2),
            serial,
            abbreviations: word(offset::ABBREVIATIONS),
            file_length: word(offset::FILE_LENGTH) as usize * band.file_length_divisor(),
            checksum: word(offset::CHECKSUM),
            routines_offset: word(offset::ROUTINES_OFFSET),
            strings_offset: word(offset::STRINGS_OFFSET),
        }
    }
}

/// Immutable view of a story's header, parsed once at load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    version: Version,
    band: VersionBand,
    layout: Option<Layout>,
}

impl Header {
    /// Parse the header at the start of `bytes`.
    ///
    /// Fails with `MemoryFault` on an empty image and `UnsupportedVersion`
    /// when the version byte is not 1-8.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let raw = *bytes
            .get(offset::VERSION)
            .ok_or_else(|| error::memory_fault(offset::VERSION, 1, bytes.len()))?;
        let version = Version::try_from(raw).map_err(|e| e.with_operation("header::parse"))?;
        let band = version.band();

        let layout = if bytes.len() >= HEADER_SIZE {
            Some(Layout::parse(bytes, band))
        } else {
            tracing::warn!(
                len = bytes.len(),
                "story shorter than header; only the version is available"
            );
            None
        };

        tracing::debug!(%version, ?band, "parsed story header");
        Ok(Self {
            version,
            band,
            layout,
        })
    }

    /// Format version
    pub fn version(&self) -> Version {
        self.version
    }

    /// Addressing band of the version
    pub fn band(&self) -> VersionBand {
        self.band
    }

    /// Full field layout, absent for images shorter than `HEADER_SIZE`
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    /// First byte of static memory
    pub fn static_base(&self) -> Option<usize> {
        self.layout.as_ref().map(|l| l.static_base as usize)
    }

    /// First byte of high memory
    pub fn high_base(&self) -> Option<usize> {
        self.layout.as_ref().map(|l| l.high_base as usize)
    }

    /// Raw initial PC word
    pub fn initial_pc(&self) -> Option<u16> {
        self.layout.as_ref().map(|l| l.initial_pc)
    }

    /// Release number
    pub fn release(&self) -> Option<u16> {
        self.layout.as_ref().map(|l| l.release)
    }

    /// Routine offset word, zero without a layout
    pub fn routines_offset(&self) -> u16 {
        self.layout.as_ref().map_or(0, |l| l.routines_offset)
    }

    /// String offset word, zero without a layout
    pub fn strings_offset(&self) -> u16 {
        self.layout.as_ref().map_or(0, |l| l.strings_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::fixtures::StoryImage;

    #[test]
    fn test_version_only() {
        let mut bytes = vec![0u8; 10];
        bytes[0] = 3;

        let header = Header::parse(&bytes).unwrap();
        assert_eq!(header.version(), Version::V3);
        assert_eq!(header.band(), VersionBand::Early);
        assert!(header.layout().is_none());
        assert_eq!(header.routines_offset(), 0);
    }

    #[test]
    fn test_unsupported_version() {
        for raw in [0u8, 9, 0xFF] {
            let mut bytes = vec![0u8; 10];
            bytes[0] = raw;
            let result = Header::parse(&bytes);
            assert!(result.is_err_and(|e| e.kind() == ErrorKind::UnsupportedVersion));
        }
    }

    #[test]
    fn test_empty_image() {
        let result = Header::parse(&[]);
        assert!(result.is_err_and(|e| e.kind() == ErrorKind::MemoryFault));
    }

    #[test]
    fn test_bands() {
        assert_eq!(Version::V1.band().packed_multiplier(), 2);
        assert_eq!(Version::V3.band().packed_multiplier(), 2);
        assert_eq!(Version::V4.band().packed_multiplier(), 4);
        assert_eq!(Version::V5.band().packed_multiplier(), 4);
        assert_eq!(Version::V7.band().packed_multiplier(), 4);
        assert_eq!(Version::V8.band().packed_multiplier(), 4);
        assert_eq!(Version::V5.band().unpack_multiplier(), 4);
        assert_eq!(Version::V8.band().unpack_multiplier(), 8);
        assert!(Version::V6.band().uses_offsets());
        assert!(!Version::V8.band().uses_offsets());
    }

    #[test]
    fn test_full_layout() {
        let image = StoryImage::new(5, 0x400)
            .static_base(0x200)
            .high_base(0x300)
            .initial_pc(0x310)
            .release(88)
            .build();

        let header = Header::parse(&image).unwrap();
        let layout = header.layout().unwrap();
        assert_eq!(layout.release, 88);
        assert_eq!(layout.static_base, 0x200);
        assert_eq!(layout.high_base, 0x300);
        assert_eq!(layout.initial_pc, 0x310);
        assert_eq!(layout.serial, "840726");
        assert_eq!(layout.file_length, 0x400);
        assert_eq!(header.static_base(), Some(0x200));
    }

    #[test]
    fn test_file_length_scaling() {
        let image = StoryImage::new(8, 0x800).build();
        let header = Header::parse(&image).unwrap();
        assert_eq!(header.layout().unwrap().file_length, 0x800);

        let image = StoryImage::new(3, 0x800).build();
        let header = Header::parse(&image).unwrap();
        assert_eq!(header.layout().unwrap().file_length, 0x800);
    }

    #[test]
    fn test_serialize() {
        let mut bytes = vec![0u8; 4];
        bytes[0] = 6;
        let header = Header::parse(&bytes).unwrap();
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["version"], 6);
        assert_eq!(json["band"], "offset");
        assert!(json["layout"].is_null());
    }
}
