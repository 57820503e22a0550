//! Polynomials with GF(256) coefficients, highest degree first.

use crate::error::{QrError, Result};
use crate::gf::GaloisField;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Polynomial {
    coefficients: Vec<u8>,
}

impl Polynomial {
    /// An empty coefficient list is taken as the zero polynomial `[0]`.
    pub fn new(coefficients: Vec<u8>) -> Self {
        if coefficients.is_empty() {
            Self::zero()
        } else {
            Self { coefficients }
        }
    }

    pub fn zero() -> Self {
        Self {
            coefficients: vec![0],
        }
    }

    pub fn coefficients(&self) -> &[u8] {
        &self.coefficients
    }

    pub fn into_coefficients(self) -> Vec<u8> {
        self.coefficients
    }

    /// `len - 1`; leading zero coefficients are not stripped.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0)
    }

    pub fn add(&self, other: &Polynomial, gf: &GaloisField) -> Polynomial {
        let len = self.coefficients.len().max(other.coefficients.len());
        let pad_a = len - self.coefficients.len();
        let pad_b = len - other.coefficients.len();
        let coefficients = (0..len)
            .map(|i| {
                let a = if i < pad_a { 0 } else { self.coefficients[i - pad_a] };
                let b = if i < pad_b { 0 } else { other.coefficients[i - pad_b] };
                gf.add(a, b)
            })
            .collect();
        Polynomial { coefficients }
    }

    pub fn multiply(&self, other: &Polynomial, gf: &GaloisField) -> Polynomial {
        let mut result = vec![0u8; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, &a) in self.coefficients.iter().enumerate() {
            for (j, &b) in other.coefficients.iter().enumerate() {
                result[i + j] = gf.add(result[i + j], gf.multiply(a, b));
            }
        }
        Polynomial {
            coefficients: result,
        }
    }

    pub fn multiply_scalar(&self, scalar: u8, gf: &GaloisField) -> Polynomial {
        Polynomial {
            coefficients: self.coefficients.iter().map(|&c| gf.multiply(c, scalar)).collect(),
        }
    }

    /// Horner's rule.
    pub fn evaluate(&self, x: u8, gf: &GaloisField) -> u8 {
        self.coefficients
            .iter()
            .fold(0u8, |acc, &c| gf.add(gf.multiply(acc, x), c))
    }

    /// Remainder of long division by `divisor`, always `divisor.degree()`
    /// coefficients long. The quotient is discarded.
    pub fn remainder(&self, divisor: &Polynomial, gf: &GaloisField) -> Result<Polynomial> {
        let lead_pos = divisor
            .coefficients
            .iter()
            .position(|&c| c != 0)
            .ok_or_else(|| QrError::Arithmetic("polynomial division by zero".into()))?;
        let div = &divisor.coefficients[lead_pos..];
        let lead = div[0];
        let rem_len = div.len() - 1;

        let mut buf = self.coefficients.clone();
        if buf.len() < div.len() {
            let mut padded = vec![0u8; rem_len - buf.len()];
            padded.extend_from_slice(&buf);
            return Ok(Polynomial::new(padded));
        }
        for i in 0..=buf.len() - div.len() {
            if buf[i] == 0 {
                continue;
            }
            let factor = gf.divide(buf[i], lead)?;
            for (j, &d) in div.iter().enumerate() {
                buf[i + j] = gf.add(buf[i + j], gf.multiply(d, factor));
            }
        }
        let tail = buf.split_off(buf.len() - rem_len);
        Ok(Polynomial::new(tail))
    }
}
