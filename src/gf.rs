//! Arithmetic over GF(2^8) with primitive polynomial x^8 + x^4 + x^3 + x^2 + 1 (0x11D).

use once_cell::sync::Lazy;

use crate::error::{QrError, Result};

const PRIMITIVE: u16 = 0x11D;

static FIELD: Lazy<GaloisField> = Lazy::new(GaloisField::build);

/// Exp/log lookup tables for GF(256). Built once, never mutated.
pub struct GaloisField {
    exp: [u8; 255],
    log: [u8; 256],
}

impl GaloisField {
    /// The process-wide field instance.
    pub fn get() -> &'static GaloisField {
        &FIELD
    }

    fn build() -> Self {
        let mut exp = [0u8; 255];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for (i, e) in exp.iter_mut().enumerate() {
            *e = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x >= 256 {
                x ^= PRIMITIVE;
            }
        }
        Self { exp, log }
    }

    /// α^`i`, with the exponent reduced mod 255.
    pub fn exp(&self, i: usize) -> u8 {
        self.exp[i % 255]
    }

    /// Discrete log of a nonzero element.
    pub fn log(&self, a: u8) -> Result<u8> {
        if a == 0 {
            return Err(QrError::Arithmetic("log of zero in GF(256)".into()));
        }
        Ok(self.log[usize::from(a)])
    }

    #[inline]
    pub fn add(&self, a: u8, b: u8) -> u8 {
        a ^ b
    }

    #[inline]
    pub fn multiply(&self, a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let idx = usize::from(self.log[usize::from(a)]) + usize::from(self.log[usize::from(b)]);
        self.exp[idx % 255]
    }

    pub fn divide(&self, a: u8, b: u8) -> Result<u8> {
        if b == 0 {
            return Err(QrError::Arithmetic("division by zero in GF(256)".into()));
        }
        if a == 0 {
            return Ok(0);
        }
        let idx = usize::from(self.log[usize::from(a)]) + 255 - usize::from(self.log[usize::from(b)]);
        Ok(self.exp[idx % 255])
    }

    pub fn inverse(&self, a: u8) -> Result<u8> {
        self.divide(1, a)
    }

    pub fn power(&self, a: u8, n: u32) -> u8 {
        if n == 0 {
            return 1;
        }
        if a == 0 {
            return 0;
        }
        let idx = (u64::from(self.log[usize::from(a)]) * u64::from(n)) % 255;
        self.exp[idx as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        let gf = GaloisField::get();
        assert_eq!(gf.exp(0), 1);
        assert_eq!(gf.exp(1), 2);
        assert_eq!(gf.exp(8), 0x1D);
        assert_eq!(gf.exp(255), 1);
        assert_eq!(gf.log(2).unwrap(), 1);
        assert!(gf.log(0).is_err());
    }

    #[test]
    fn test_multiply_matches_carryless_reduction() {
        fn slow(x: u8, y: u8) -> u8 {
            let mut z: u8 = 0;
            for i in (0..8).rev() {
                z = (z << 1) ^ ((z >> 7) * 0x1D);
                z ^= ((y >> i) & 1) * x;
            }
            z
        }
        let gf = GaloisField::get();
        for a in 0..=255u8 {
            for b in [0u8, 1, 2, 3, 0x53, 0x80, 0xCA, 0xFF] {
                assert_eq!(gf.multiply(a, b), slow(a, b), "{} * {}", a, b);
            }
        }
    }

    #[test]
    fn test_inverse_identity() {
        let gf = GaloisField::get();
        for a in 1..=255u8 {
            let inv = gf.divide(1, a).unwrap();
            assert_eq!(gf.multiply(a, inv), 1);
            assert_eq!(gf.power(a, 1), a);
            assert_eq!(gf.multiply(a, 0), 0);
        }
    }

    #[test]
    fn test_divide_by_zero() {
        let gf = GaloisField::get();
        assert!(matches!(gf.divide(7, 0), Err(QrError::Arithmetic(_))));
        assert_eq!(gf.divide(0, 7).unwrap(), 0);
    }

    #[test]
    fn test_power() {
        let gf = GaloisField::get();
        assert_eq!(gf.power(0, 0), 1);
        assert_eq!(gf.power(0, 5), 0);
        assert_eq!(gf.power(2, 8), 0x1D);
        assert_eq!(gf.power(2, 255), 1);
        assert_eq!(gf.power(3, 2), gf.multiply(3, 3));
    }
}
