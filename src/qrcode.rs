//! QR code generation.
//!
//! Sequences segmentation, version selection, bitstream construction, Reed-Solomon
//! blocks, module placement, mask selection and format/version information into
//! a finished [`QrCode`].

use tracing::{debug, debug_span, warn};

use crate::bitstream;
use crate::error::{QrError, Result};
use crate::info::place_version_info;
use crate::matrix::QrMatrix;
use crate::options::EncodeOptions;
use crate::reed_solomon::add_ecc_and_interleave;
use crate::segment::{
    capacity_error, find_minimum_version, find_version_in_range, segment_input, total_bits,
    Segment,
};
use crate::version::{EccLevel, Mask, Version};

/// A finished QR Code symbol together with the encoding decisions behind it.
///
/// Instances are immutable once returned.
///
/// # Example
///
/// ```rust
/// use qrcraft::{generate, EccLevel, EncodeOptions};
///
/// let qr = generate("HELLO WORLD", &EncodeOptions::default().ecc_level(EccLevel::Q)).unwrap();
/// assert_eq!(qr.version().value(), 1);
/// assert_eq!(qr.size(), 21);
/// ```
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QrCode {
    matrix: QrMatrix,
    version: Version,
    ecc_level: EccLevel,
    mask: Mask,
    segments: Vec<Segment>,
    total_bits: usize,
    total_codewords: usize,
    quiet_zone: u32,
}

impl QrCode {
    pub fn matrix(&self) -> &QrMatrix {
        &self.matrix
    }

    /// Returns this QR Code's version, in the range [1, 40].
    pub fn version(&self) -> Version {
        self.version
    }

    /// The error correction level actually used, which differs from the
    /// requested one after ECC boost or fallback.
    pub fn error_correction_level(&self) -> EccLevel {
        self.ecc_level
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Bits used by the segments, before terminator and padding.
    pub fn total_bits(&self) -> usize {
        self.total_bits
    }

    /// Data plus error correction codewords placed in the symbol.
    pub fn total_codewords(&self) -> usize {
        self.total_codewords
    }

    /// Light border, in modules, renderers should draw around the symbol.
    pub fn quiet_zone(&self) -> u32 {
        self.quiet_zone
    }

    /// Returns this QR Code's size, in the range [21, 177].
    pub fn size(&self) -> usize {
        self.matrix.size()
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size() as i32;
        range.contains(&x) && range.contains(&y) && self.matrix.is_dark(y as usize, x as usize)
    }
}

/// Encodes a text string into a QR code.
///
/// The text is split into numeric, alphanumeric and byte segments, and unless
/// `options` pins them the smallest fitting version and the lowest-penalty mask
/// are chosen.
///
/// # Errors
///
/// - [`QrError::InvalidInput`] for empty `data`.
/// - [`QrError::InvalidOption`] for a version outside 1–40 or a mask outside 0–7.
/// - [`QrError::CapacityExceeded`] when the data does not fit.
pub fn generate(data: &str, options: &EncodeOptions) -> Result<QrCode> {
    let segs = segment_input(data)?;
    generate_segments(segs, options)
}

/// Encodes binary data as a single byte mode segment.
pub fn generate_bytes(data: &[u8], options: &EncodeOptions) -> Result<QrCode> {
    if data.is_empty() {
        return Err(QrError::InvalidInput("data must not be empty".into()));
    }
    generate_segments(vec![Segment::bytes(data)], options)
}

/// Encodes caller-built segments, in order.
pub fn generate_segments(segs: Vec<Segment>, options: &EncodeOptions) -> Result<QrCode> {
    let _span = debug_span!("qr generate", segments = segs.len()).entered();
    if segs.is_empty() {
        return Err(QrError::InvalidInput("no segments to encode".into()));
    }
    let pinned_version = options.version.resolve()?;
    let pinned_mask = options.mask.resolve()?;

    let (version, mut ecl) = select_version(&segs, options.ecc_level, pinned_version, options.ecc_fallback)?;
    let used_bits = total_bits(&segs, version).ok_or_else(|| capacity_error(&segs, version, ecl))?;

    // Increase the error correction level while the data still fits
    if options.boost_ecc {
        for newecl in [EccLevel::M, EccLevel::Q, EccLevel::H] {
            if newecl > ecl && used_bits <= version.data_codewords(newecl) * 8 {
                ecl = newecl;
            }
        }
    }

    let datacodewords = bitstream::build(&segs, version, ecl)?.into_bytes();
    let allcodewords = add_ecc_and_interleave(&datacodewords, version, ecl)?;

    let mut base = QrMatrix::with_function_patterns(version);
    place_version_info(&mut base);
    let placed = base.place_data(&allcodewords);
    debug_assert_eq!(placed, allcodewords.len() * 8);

    let mask = match pinned_mask {
        Some(m) => m,
        None => base.best_mask(ecl),
    };
    let matrix = base.masked(mask, ecl);
    debug!(
        version = version.value(),
        ecc = %ecl,
        mask = mask.value(),
        bits = used_bits,
        "encoded QR code"
    );

    Ok(QrCode {
        matrix,
        version,
        ecc_level: ecl,
        mask,
        segments: segs,
        total_bits: used_bits,
        total_codewords: allcodewords.len(),
        quiet_zone: options.quiet_zone,
    })
}

fn select_version(
    segs: &[Segment],
    mut ecl: EccLevel,
    pinned: Option<Version>,
    fallback: bool,
) -> Result<(Version, EccLevel)> {
    loop {
        let found = match pinned {
            Some(v) => find_version_in_range(segs, ecl, v, v),
            None => find_minimum_version(segs, ecl),
        };
        match found {
            Ok(version) => return Ok((version, ecl)),
            Err(err @ QrError::CapacityExceeded { .. }) => match ecl.lower() {
                Some(lower) if fallback => {
                    warn!(from = %ecl, to = %lower, "data does not fit, lowering ECC level");
                    ecl = lower;
                }
                _ => return Err(err),
            },
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{MaskChoice, VersionChoice};

    #[test]
    fn test_hello_world_q() {
        let qr = generate("HELLO WORLD", &EncodeOptions::default().ecc_level(EccLevel::Q)).unwrap();
        assert_eq!(qr.version(), Version::new(1));
        assert_eq!(qr.size(), 21);
        assert_eq!(qr.error_correction_level(), EccLevel::Q);
        assert_eq!(qr.total_bits(), 74);
        assert_eq!(qr.total_codewords(), 26);
        assert_eq!(qr.segments().len(), 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            generate("", &EncodeOptions::default()),
            Err(QrError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_bytes(&[], &EncodeOptions::default()),
            Err(QrError::InvalidInput(_))
        ));
        assert!(matches!(
            generate_segments(Vec::new(), &EncodeOptions::default()),
            Err(QrError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_invalid_options() {
        let o = EncodeOptions::default().version(VersionChoice::Fixed(41));
        assert!(matches!(generate("A", &o), Err(QrError::InvalidOption(_))));
        let o = EncodeOptions::default().mask(MaskChoice::Fixed(8));
        assert!(matches!(generate("A", &o), Err(QrError::InvalidOption(_))));
    }

    #[test]
    fn test_pinned_version_and_mask() {
        let o = EncodeOptions::default()
            .version(VersionChoice::Fixed(10))
            .mask(MaskChoice::Fixed(3));
        let qr = generate("pinned", &o).unwrap();
        assert_eq!(qr.version().value(), 10);
        assert_eq!(qr.mask().value(), 3);
        assert_eq!(qr.size(), 57);
    }

    #[test]
    fn test_pinned_version_too_small() {
        let o = EncodeOptions::default().version(VersionChoice::Fixed(1));
        assert!(matches!(
            generate(&"z".repeat(40), &o),
            Err(QrError::CapacityExceeded { .. })
        ));
    }

    #[test]
    fn test_boost_ecc() {
        let o = EncodeOptions::default().ecc_level(EccLevel::L).boost_ecc(true);
        let qr = generate("1", &o).unwrap();
        assert_eq!(qr.version().value(), 1);
        assert_eq!(qr.error_correction_level(), EccLevel::H);
    }

    #[test]
    fn test_ecc_fallback() {
        // 1-H holds 7 bytes, 40-H 1273, 40-Q 1663
        let data = "x".repeat(1500);
        let strict = EncodeOptions::default().ecc_level(EccLevel::H);
        assert!(matches!(generate(&data, &strict), Err(QrError::CapacityExceeded { .. })));
        let qr = generate(&data, &strict.ecc_fallback(true)).unwrap();
        assert_eq!(qr.error_correction_level(), EccLevel::Q);
        assert_eq!(qr.version().value(), 40);
    }

    #[test]
    fn test_get_module_out_of_bounds() {
        let qr = generate("HELLO", &EncodeOptions::default()).unwrap();
        assert!(qr.get_module(0, 0));
        assert!(!qr.get_module(-1, 0));
        assert!(!qr.get_module(0, 21));
    }
}
