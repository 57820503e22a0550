//! BCH protected format information (15 bits) and version information (18 bits).

use crate::matrix::QrMatrix;
use crate::version::{EccLevel, Mask, Version};

const FORMAT_GENERATOR: u32 = 0b101_0011_0111;
const FORMAT_XOR_MASK: u32 = 0b101_0100_0001_0010;
const VERSION_GENERATOR: u32 = 0b1_1111_0010_0101;

/// The 15-bit format word for `ecl` and `mask`, already XOR-masked.
pub fn format_bits(ecl: EccLevel, mask: Mask) -> u16 {
    let data = u32::from((ecl.format_bits() << 3) | mask.value());
    let mut rem: u32 = data;
    for _ in 0..10 {
        rem = (rem << 1) ^ ((rem >> 9) * FORMAT_GENERATOR);
    }
    let bits = ((data << 10) | rem) ^ FORMAT_XOR_MASK;
    debug_assert_eq!(bits >> 15, 0);
    bits as u16
}

/// The 18-bit version word, only defined from version 7 upward.
pub fn version_bits(ver: Version) -> Option<u32> {
    if ver.value() < 7 {
        return None;
    }
    let data = u32::from(ver.value());
    let mut rem: u32 = data;
    for _ in 0..12 {
        rem = (rem << 1) ^ ((rem >> 11) * VERSION_GENERATOR);
    }
    let bits = (data << 12) | rem;
    debug_assert_eq!(bits >> 18, 0);
    Some(bits)
}

/// Writes both copies of the format information and the always-dark module.
///
/// Bit 0 is the least significant bit of [`format_bits`].
pub fn place_format_info(matrix: &mut QrMatrix, ecl: EccLevel, mask: Mask) {
    let bits = u32::from(format_bits(ecl, mask));
    let size = matrix.size();

    // Copy around the top-left finder
    for i in 0..6 {
        matrix.set_function(i, 8, get_bit(bits, i));
    }
    matrix.set_function(7, 8, get_bit(bits, 6));
    matrix.set_function(8, 8, get_bit(bits, 7));
    matrix.set_function(8, 7, get_bit(bits, 8));
    for i in 9..15 {
        matrix.set_function(8, 14 - i, get_bit(bits, i));
    }

    // Copy split between the top-right and bottom-left finders
    for i in 0..8 {
        matrix.set_function(8, size - 1 - i, get_bit(bits, i));
    }
    for i in 8..15 {
        matrix.set_function(size - 15 + i, 8, get_bit(bits, i));
    }
    matrix.set_function(size - 8, 8, true);
}

/// Writes both 6x3 version blocks. No-op below version 7.
pub fn place_version_info(matrix: &mut QrMatrix) {
    let Some(bits) = version_bits(matrix.version()) else {
        return;
    };
    let size = matrix.size();
    for i in 0..18 {
        let bit = get_bit(bits, i);
        let a = size - 11 + i % 3;
        let b = i / 3;
        // bottom-left block, then its transpose at top-right
        matrix.set_function(a, b, bit);
        matrix.set_function(b, a, bit);
    }
}

fn get_bit(x: u32, i: usize) -> bool {
    ((x >> i) & 1) != 0
}
