//! # Packed Addresses
//!
//! Instruction operands are 16 bits wide, but routines and strings may sit
//! anywhere in a story of up to 512 KiB. Operands that name them carry a
//! packed address which the translator scales by a per-band multiplier.
//!
//! | versions | generic | routine            | string             |
//! |----------|---------|--------------------|--------------------|
//! | 1-3      | 2P      | 2P                 | 2P                 |
//! | 4-5      | 4P      | 4P                 | 4P                 |
//! | 6-7      | 4P      | 4P + 8R            | 4P + 8S            |
//! | 8        | 4P      | 8P                 | 8P                 |
//!
//! R and S are the routine and string offset words from the header.
//! Translation is pure arithmetic: the result is not bounds checked, and a
//! bad address faults only when it is dereferenced.

use crate::header::{Header, Version, VersionBand};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 16-bit packed address as it appears in an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackedAddress(pub u16);

impl From<u16> for PackedAddress {
    fn from(value: u16) -> Self {
        PackedAddress(value)
    }
}

impl fmt::Display for PackedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{:#06x}", self.0)
    }
}

/// What a packed address refers to. Only matters for versions 6-7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    Routine,
    String,
}

/// Converts packed addresses to byte addresses for one story
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    band: VersionBand,
    routines_offset: usize,
    strings_offset: usize,
}

impl Translator {
    /// Translator for the story described by `header`
    pub fn new(header: &Header) -> Self {
        Self {
            band: header.band(),
            routines_offset: header.routines_offset() as usize,
            strings_offset: header.strings_offset() as usize,
        }
    }

    /// Translator with zero routine and string offsets
    pub fn for_version(version: Version) -> Self {
        Self {
            band: version.band(),
            routines_offset: 0,
            strings_offset: 0,
        }
    }

    /// Version band the multipliers come from
    pub fn band(&self) -> VersionBand {
        self.band
    }

    /// `2P` for versions 1-3, `4P` for every later version.
    /// Ignores routine/string offsets and the version 8 scale.
    pub fn to_byte_address(&self, packed: impl Into<PackedAddress>) -> usize {
        packed.into().0 as usize * self.band.packed_multiplier()
    }

    /// Byte address of a packed routine
    pub fn routine_address(&self, packed: impl Into<PackedAddress>) -> usize {
        self.unpack(packed, AddressKind::Routine)
    }

    /// Byte address of a packed string
    pub fn string_address(&self, packed: impl Into<PackedAddress>) -> usize {
        self.unpack(packed, AddressKind::String)
    }

    /// Byte address of a packed routine or string, with the version 8 scale
    /// and the version 6-7 header offsets applied
    pub fn unpack(&self, packed: impl Into<PackedAddress>, kind: AddressKind) -> usize {
        let base = packed.into().0 as usize * self.band.unpack_multiplier();
        if !self.band.uses_offsets() {
            return base;
        }
        let offset = match kind {
            AddressKind::Routine => self.routines_offset,
            AddressKind::String => self.strings_offset,
        };
        base + offset * 8
    }
}
