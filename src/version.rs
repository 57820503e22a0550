//! Versions, error correction levels, mask ids and the capacity tables keyed by them.

use core::convert::TryFrom;
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::QrError;

/// A QR code version (1–40).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The minimum version number supported in the QR Code Model 2 standard.
    pub const MIN: Version = Version(1);

    /// The maximum version number supported in the QR Code Model 2 standard.
    pub const MAX: Version = Version(40);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 40]. Use `Version::try_from`
    /// for user supplied values.
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the value, which is in the range [1, 40].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Side length of the symbol in modules, `4 * version + 17`.
    pub const fn size(self) -> usize {
        (self.0 as usize) * 4 + 17
    }

    /// Iterates all versions from 1 to 40.
    pub fn all() -> impl Iterator<Item = Version> {
        (Version::MIN.0..=Version::MAX.0).map(Version)
    }

    /// Number of modules left for codewords once every function pattern and
    /// format/version area is removed. Includes the 0–7 remainder bits.
    pub fn num_raw_data_modules(self) -> usize {
        let ver = usize::from(self.0);
        let mut result: usize = (16 * ver + 128) * ver + 64;
        if ver >= 2 {
            let numalign: usize = ver / 7 + 2;
            result -= (25 * numalign - 10) * numalign - 55;
            if ver >= 7 {
                result -= 36;
            }
        }
        debug_assert!((208..=29648).contains(&result));
        result
    }

    /// Total codewords (data plus error correction) the symbol holds.
    pub fn total_codewords(self) -> usize {
        self.num_raw_data_modules() / 8
    }

    /// Data codewords available at the given error correction level.
    pub fn data_codewords(self, ecl: EccLevel) -> usize {
        self.total_codewords() - ecl.ecc_codewords_per_block(self) * ecl.num_blocks(self)
    }

    /// Number of characters a single byte-mode segment can carry.
    pub fn byte_capacity(self, ecl: EccLevel) -> usize {
        let ccbits = if self.0 <= 9 { 8 } else { 16 };
        (self.data_codewords(ecl) * 8 - 4 - ccbits) / 8
    }

    /// Ascending centre coordinates of the alignment patterns, used on both axes.
    /// Empty for version 1.
    pub fn alignment_pattern_positions(self) -> Vec<usize> {
        let ver = usize::from(self.0);
        if ver == 1 {
            return Vec::new();
        }
        let numalign: usize = ver / 7 + 2;
        let step: usize = if ver == 32 {
            26
        } else {
            (ver * 4 + numalign * 2 + 1) / (numalign * 2 - 2) * 2
        };
        let size = self.size();
        let mut result: Vec<usize> = (0..numalign - 1).map(|i| size - 7 - i * step).collect();
        result.push(6);
        result.reverse();
        result
    }
}

impl TryFrom<u8> for Version {
    type Error = QrError;

    fn try_from(ver: u8) -> Result<Self, Self::Error> {
        if (Version::MIN.0..=Version::MAX.0).contains(&ver) {
            Ok(Version(ver))
        } else {
            Err(QrError::InvalidOption(format!("version {} is outside 1..=40", ver)))
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error correction level for a QR code.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EccLevel {
    /// Tolerates ~7% erroneous codewords.
    L,
    /// Tolerates ~15% erroneous codewords.
    #[default]
    M,
    /// Tolerates ~25% erroneous codewords.
    Q,
    /// Tolerates ~30% erroneous codewords.
    H,
}

impl EccLevel {
    /// All levels from weakest to strongest.
    pub const ALL: [EccLevel; 4] = [EccLevel::L, EccLevel::M, EccLevel::Q, EccLevel::H];

    fn ordinal(self) -> usize {
        use EccLevel::*;
        match self {
            L => 0,
            M => 1,
            Q => 2,
            H => 3,
        }
    }

    /// Returns the 2-bit code stored in the format information.
    pub fn format_bits(self) -> u8 {
        use EccLevel::*;
        match self {
            L => 0b01,
            M => 0b00,
            Q => 0b11,
            H => 0b10,
        }
    }

    /// The next weaker level, `None` for `L`.
    pub fn lower(self) -> Option<EccLevel> {
        use EccLevel::*;
        match self {
            L => None,
            M => Some(L),
            Q => Some(M),
            H => Some(Q),
        }
    }

    /// Error correction codewords in each Reed-Solomon block.
    pub fn ecc_codewords_per_block(self, ver: Version) -> usize {
        table_get(&ECC_CODEWORDS_PER_BLOCK, ver, self)
    }

    /// Number of Reed-Solomon blocks the codewords are split into.
    pub fn num_blocks(self, ver: Version) -> usize {
        table_get(&NUM_ERROR_CORRECTION_BLOCKS, ver, self)
    }
}

impl fmt::Display for EccLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EccLevel::L => "L",
            EccLevel::M => "M",
            EccLevel::Q => "Q",
            EccLevel::H => "H",
        };
        f.write_str(s)
    }
}

impl FromStr for EccLevel {
    type Err = QrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(EccLevel::L),
            "M" | "MEDIUM" => Ok(EccLevel::M),
            "Q" | "QUARTILE" => Ok(EccLevel::Q),
            "H" | "HIGH" => Ok(EccLevel::H),
            _ => Err(QrError::InvalidOption(format!(
                "ECC level {:?} is not one of L, M, Q, H",
                s
            ))),
        }
    }
}

/// A mask pattern (0–7).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Mask(u8);

impl Mask {
    /// Creates a mask object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [0, 7].
    pub const fn new(mask: u8) -> Self {
        assert!(mask <= 7, "Mask value out of range");
        Self(mask)
    }

    /// Returns the value, which is in the range [0, 7].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// All eight masks in ascending order.
    pub fn all() -> impl Iterator<Item = Mask> {
        (0u8..8).map(Mask)
    }

    /// Whether the module at (`row`, `col`) is inverted by this mask.
    pub fn inverts(self, row: usize, col: usize) -> bool {
        let (r, c) = (row, col);
        match self.0 {
            0 => (r + c) % 2 == 0,
            1 => r % 2 == 0,
            2 => c % 3 == 0,
            3 => (r + c) % 3 == 0,
            4 => (r / 2 + c / 3) % 2 == 0,
            5 => (r * c) % 2 + (r * c) % 3 == 0,
            6 => ((r * c) % 2 + (r * c) % 3) % 2 == 0,
            7 => ((r + c) % 2 + (r * c) % 3) % 2 == 0,
            _ => unreachable!(),
        }
    }
}

impl TryFrom<u8> for Mask {
    type Error = QrError;

    fn try_from(mask: u8) -> Result<Self, Self::Error> {
        if mask <= 7 {
            Ok(Mask(mask))
        } else {
            Err(QrError::InvalidOption(format!("mask {} is outside 0..=7", mask)))
        }
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn table_get(table: &'static [[i8; 41]; 4], ver: Version, ecl: EccLevel) -> usize {
    table[ecl.ordinal()][usize::from(ver.value())] as usize
}

// ISO/IEC 18004 Table 9, indexed [level][version]; column 0 is unused.
static ECC_CODEWORDS_PER_BLOCK: [[i8; 41]; 4] = [
    [
        -1, 7, 10, 15, 20, 26, 18, 20, 24, 30, 18, 20, 24, 26, 30, 22, 24, 28, 30, 28, 28, 28, 28, 30,
        30, 26, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // L
    [
        -1, 10, 16, 26, 18, 24, 16, 18, 22, 22, 26, 30, 22, 22, 24, 24, 28, 28, 26, 26, 26, 26, 28, 28,
        28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28, 28,
    ], // M
    [
        -1, 13, 22, 18, 26, 18, 24, 18, 22, 20, 24, 28, 26, 24, 20, 30, 24, 28, 28, 26, 30, 28, 30, 30,
        30, 30, 28, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // Q
    [
        -1, 17, 28, 22, 16, 22, 28, 26, 26, 24, 28, 24, 28, 22, 24, 24, 30, 28, 28, 26, 28, 30, 24, 30,
        30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30, 30,
    ], // H
];

static NUM_ERROR_CORRECTION_BLOCKS: [[i8; 41]; 4] = [
    [
        -1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 4, 4, 4, 4, 4, 6, 6, 6, 6, 7, 8, 8, 9, 9, 10, 12, 12, 12,
        13, 14, 15, 16, 17, 18, 19, 19, 20, 21, 22, 24, 25,
    ], // L
    [
        -1, 1, 1, 1, 2, 2, 4, 4, 4, 5, 5, 5, 8, 9, 9, 10, 10, 11, 13, 14, 16, 17, 17, 18, 20, 21,
        23, 25, 26, 28, 29, 31, 33, 35, 37, 38, 40, 43, 45, 47, 49,
    ], // M
    [
        -1, 1, 1, 2, 2, 4, 4, 6, 6, 8, 8, 8, 10, 12, 16, 12, 17, 16, 18, 21, 20, 23, 23, 25, 27, 29,
        34, 34, 35, 38, 40, 43, 45, 48, 51, 53, 56, 59, 62, 65, 68,
    ], // Q
    [
        -1, 1, 1, 2, 4, 4, 4, 5, 6, 8, 8, 11, 11, 16, 16, 18, 16, 19, 21, 25, 25, 25, 34, 30, 32, 35,
        37, 40, 42, 45, 48, 51, 54, 57, 60, 63, 66, 70, 74, 77, 81,
    ], // H
];
