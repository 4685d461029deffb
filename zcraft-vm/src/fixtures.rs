//! Story image builder shared by the unit tests.

use crate::header::{offset, HEADER_SIZE};

pub(crate) struct StoryImage {
    version: u8,
    len: usize,
    release: u16,
    static_base: u16,
    high_base: u16,
    initial_pc: u16,
    routines_offset: u16,
    strings_offset: u16,
}

impl StoryImage {
    /// A zero-filled story of `len` bytes with a full header.
    /// Static and high memory both start halfway through by default.
    pub(crate) fn new(version: u8, len: usize) -> Self {
        assert!(len >= HEADER_SIZE, "fixture needs a full header");
        let half = (len / 2) as u16;
        Self {
            version,
            len,
            release: 1,
            static_base: half,
            high_base: half,
            initial_pc: half,
            routines_offset: 0,
            strings_offset: 0,
        }
    }

    pub(crate) fn release(mut self, release: u16) -> Self {
        self.release = release;
        self
    }

    pub(crate) fn static_base(mut self, base: u16) -> Self {
        self.static_base = base;
        self
    }

    pub(crate) fn high_base(mut self, base: u16) -> Self {
        self.high_base = base;
        self
    }

    pub(crate) fn initial_pc(mut self, pc: u16) -> Self {
        self.initial_pc = pc;
        self
    }

    pub(crate) fn routines_offset(mut self, value: u16) -> Self {
        self.routines_offset = value;
        self
    }

    pub(crate) fn strings_offset(mut self, value: u16) -> Self {
        self.strings_offset = value;
        self
    }

    /// Lay out the header and stamp a valid checksum.
    pub(crate) fn build(self) -> Vec<u8> {
        let mut bytes = vec![0u8; self.len];
        let mut put = |at: usize, value: u16| {
            bytes[at..at + 2].copy_from_slice(&value.to_be_bytes());
        };

        let divisor = match self.version {
            1..=3 => 2,
            4 | 5 => 4,
            _ => 8,
        };
        put(offset::RELEASE, self.release);
        put(offset::HIGH_BASE, self.high_base);
        put(offset::INITIAL_PC, self.initial_pc);
        put(offset::STATIC_BASE, self.static_base);
        put(offset::FILE_LENGTH, (self.len / divisor) as u16);
        put(offset::ROUTINES_OFFSET, self.routines_offset);
        put(offset::STRINGS_OFFSET, self.strings_offset);
        bytes[offset::VERSION] = self.version;
        bytes[offset::SERIAL..offset::SERIAL + 6].copy_from_slice(b"840726");

        let checksum = bytes[HEADER_SIZE..]
            .iter()
            .fold(0u16, |sum, &b| sum.wrapping_add(b as u16));
        bytes[offset::CHECKSUM..offset::CHECKSUM + 2].copy_from_slice(&checksum.to_be_bytes());
        bytes
    }
}
