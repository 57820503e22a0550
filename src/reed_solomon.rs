//! Reed-Solomon error correction codewords and the block split/interleave of ISO/IEC 18004.

use crate::error::Result;
use crate::gf::GaloisField;
use crate::polynomial::Polynomial;
use crate::version::{EccLevel, Version};

/// Computes error correction codewords for a fixed number of ECC codewords.
pub struct ReedSolomonEncoder {
    field: &'static GaloisField,
    generator: Polynomial,
}

impl ReedSolomonEncoder {
    pub fn new(degree: usize) -> Self {
        let field = GaloisField::get();
        Self {
            field,
            generator: generator_polynomial(degree, field),
        }
    }

    pub fn degree(&self) -> usize {
        self.generator.degree()
    }

    pub fn generator(&self) -> &Polynomial {
        &self.generator
    }

    /// Returns the `degree` ECC codewords for `data`.
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut shifted = Vec::with_capacity(data.len() + self.degree());
        shifted.extend_from_slice(data);
        shifted.resize(data.len() + self.degree(), 0);
        let remainder = Polynomial::new(shifted).remainder(&self.generator, self.field)?;
        Ok(remainder.into_coefficients())
    }
}

/// Product of `(x + 2^i)` for `i` in `0..degree`.
pub fn generator_polynomial(degree: usize, gf: &GaloisField) -> Polynomial {
    (0..degree).fold(Polynomial::new(vec![1]), |acc, i| {
        acc.multiply(&Polynomial::new(vec![1, gf.exp(i)]), gf)
    })
}

/// How the data codewords of one (version, level) pair are split into blocks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BlockLayout {
    pub num_blocks: usize,
    pub ecc_per_block: usize,
    /// Blocks in group 1, each holding `short_data_len` data codewords.
    pub num_short_blocks: usize,
    pub short_data_len: usize,
}

impl BlockLayout {
    pub fn new(ver: Version, ecl: EccLevel) -> Self {
        let num_blocks = ecl.num_blocks(ver);
        let ecc_per_block = ecl.ecc_codewords_per_block(ver);
        let raw = ver.total_codewords();
        Self {
            num_blocks,
            ecc_per_block,
            num_short_blocks: num_blocks - raw % num_blocks,
            short_data_len: raw / num_blocks - ecc_per_block,
        }
    }

    pub fn data_len(&self, block: usize) -> usize {
        self.short_data_len + usize::from(block >= self.num_short_blocks)
    }

    pub fn total_data(&self) -> usize {
        (0..self.num_blocks).map(|b| self.data_len(b)).sum()
    }
}

/// Splits `data` into blocks, appends each block's ECC and interleaves the result.
///
/// Data codewords are interleaved round-robin across blocks (the longer group 2
/// blocks contribute the final column), followed by the ECC codewords round-robin.
pub fn add_ecc_and_interleave(data: &[u8], ver: Version, ecl: EccLevel) -> Result<Vec<u8>> {
    let layout = BlockLayout::new(ver, ecl);
    assert_eq!(data.len(), layout.total_data(), "Illegal argument");
    let rs = ReedSolomonEncoder::new(layout.ecc_per_block);

    let mut data_blocks: Vec<&[u8]> = Vec::with_capacity(layout.num_blocks);
    let mut ecc_blocks: Vec<Vec<u8>> = Vec::with_capacity(layout.num_blocks);
    let mut rest = data;
    for i in 0..layout.num_blocks {
        let (dat, tail) = rest.split_at(layout.data_len(i));
        ecc_blocks.push(rs.encode(dat)?);
        data_blocks.push(dat);
        rest = tail;
    }
    debug_assert!(rest.is_empty());

    let mut result = Vec::with_capacity(ver.total_codewords());
    for i in 0..=layout.short_data_len {
        for block in &data_blocks {
            if let Some(&b) = block.get(i) {
                result.push(b);
            }
        }
    }
    for i in 0..layout.ecc_per_block {
        for block in &ecc_blocks {
            result.push(block[i]);
        }
    }
    debug_assert_eq!(result.len(), ver.total_codewords());
    Ok(result)
}
