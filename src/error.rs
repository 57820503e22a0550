use thiserror::Error;

use crate::version::EccLevel;

/// Errors raised while validating options or encoding data into a QR Code.
///
/// Ways to handle [`QrError::CapacityExceeded`]:
///
/// - Decrease the error correction level if it was greater than `EccLevel::L`,
///   or set [`EncodeOptions::ecc_fallback`](crate::options::EncodeOptions) to let
///   the encoder do it.
/// - Unpin the version if one was fixed.
/// - Change the text to fit a denser segment mode (e.g. uppercase for alphanumeric).
/// - Propagate the error upward to the caller/user.
#[derive(Error, Debug)]
pub enum QrError {
    /// The data to encode was empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The data does not fit in the allowed versions at the requested level.
    #[error(
        "Data length = {required_bits} bits, max capacity = {capacity_bits} bits at ECC level {ecc_level}"
    )]
    CapacityExceeded {
        required_bits: usize,
        capacity_bits: usize,
        ecc_level: EccLevel,
    },

    /// An ECC level, version or mask outside its legal range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// GF(256) division by zero.
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, QrError>;
