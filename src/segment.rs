//! Splitting input text into mode segments and sizing them against versions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{QrError, Result};
use crate::version::{EccLevel, Version};

/// The 45-symbol alphanumeric charset; a character's index is its code value.
pub static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Encoding mode of a segment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Mode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl Mode {
    /// The 4-bit mode indicator.
    pub fn mode_bits(self) -> u32 {
        use Mode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }

    /// Width of the character count indicator for the version range 1–9, 10–26 or 27–40.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use Mode::*;
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
        })[usize::from((ver.value() + 7) / 17)]
    }

    /// The narrowest mode able to encode `c`.
    pub fn for_char(c: char) -> Mode {
        if c.is_ascii_digit() {
            Mode::Numeric
        } else if ALPHANUMERIC_CHARSET.contains(c) {
            Mode::Alphanumeric
        } else {
            Mode::Byte
        }
    }
}

/// A run of input encoded in a single mode.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Segment {
    mode: Mode,
    data: Vec<u8>,
    numchars: usize,
}

impl Segment {
    /// Creates a segment for a string of decimal digits.
    pub fn numeric(text: &str) -> Result<Self> {
        if !is_numeric(text) {
            return Err(QrError::InvalidInput(format!("{:?} is not numeric", text)));
        }
        Ok(Self::new(Mode::Numeric, text.as_bytes().to_vec(), text.len()))
    }

    /// Creates a segment for text in the alphanumeric charset.
    pub fn alphanumeric(text: &str) -> Result<Self> {
        if !is_alphanumeric(text) {
            return Err(QrError::InvalidInput(format!(
                "{:?} contains characters outside the alphanumeric charset",
                text
            )));
        }
        Ok(Self::new(Mode::Alphanumeric, text.as_bytes().to_vec(), text.len()))
    }

    /// Creates a byte mode segment; the character count is the byte count.
    pub fn bytes(data: &[u8]) -> Self {
        Self::new(Mode::Byte, data.to_vec(), data.len())
    }

    fn new(mode: Mode, data: Vec<u8>, numchars: usize) -> Self {
        Self {
            mode,
            data,
            numchars,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Number of characters (bytes for byte mode) in this segment.
    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    /// Raw bytes of the segment. For numeric and alphanumeric segments these are ASCII.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The segment's text, when it is valid UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }

    /// Bits taken by the payload, excluding mode and count indicators.
    pub fn encoded_bit_len(&self) -> usize {
        let n = self.numchars;
        match self.mode {
            Mode::Numeric => 10 * (n / 3) + [0, 4, 7][n % 3],
            Mode::Alphanumeric => 11 * (n / 2) + 6 * (n % 2),
            Mode::Byte => 8 * n,
        }
    }
}

/// Splits `text` into segments, choosing the narrowest mode per character and
/// merging neighbours that share a mode.
pub fn segment_input(text: &str) -> Result<Vec<Segment>> {
    if text.is_empty() {
        return Err(QrError::InvalidInput("data must be a non-empty string".into()));
    }
    let mut segs: Vec<Segment> = Vec::new();
    let mut start = 0;
    let mut current: Option<Mode> = None;
    for (idx, c) in text.char_indices() {
        let mode = Mode::for_char(c);
        match current {
            Some(m) if m == mode => {}
            Some(m) => {
                segs.push(make_run(m, &text[start..idx]));
                start = idx;
                current = Some(mode);
            }
            None => current = Some(mode),
        }
    }
    if let Some(m) = current {
        segs.push(make_run(m, &text[start..]));
    }
    Ok(segs)
}

fn make_run(mode: Mode, run: &str) -> Segment {
    let numchars = match mode {
        Mode::Byte => run.len(),
        Mode::Numeric | Mode::Alphanumeric => run.chars().count(),
    };
    Segment::new(mode, run.as_bytes().to_vec(), numchars)
}

/// Total bits the segments occupy at `version`, or `None` if a segment's
/// character count overflows its count indicator.
pub fn total_bits(segs: &[Segment], version: Version) -> Option<usize> {
    let mut result: usize = 0;
    for seg in segs {
        let ccbits: u8 = seg.mode.num_char_count_bits(version);
        if let Some(limit) = 1usize.checked_shl(ccbits.into()) {
            if seg.numchars >= limit {
                return None;
            }
        }
        result = result.checked_add(4 + usize::from(ccbits))?;
        result = result.checked_add(seg.encoded_bit_len())?;
    }
    Some(result)
}

// Bits at `version` ignoring count indicator overflow; only used for error reports.
fn required_bits(segs: &[Segment], version: Version) -> usize {
    segs.iter()
        .map(|s| 4 + usize::from(s.mode.num_char_count_bits(version)) + s.encoded_bit_len())
        .sum()
}

pub(crate) fn capacity_error(segs: &[Segment], version: Version, ecl: EccLevel) -> QrError {
    QrError::CapacityExceeded {
        required_bits: required_bits(segs, version),
        capacity_bits: version.data_codewords(ecl) * 8,
        ecc_level: ecl,
    }
}

/// Smallest version in `min..=max` whose data capacity holds the segments.
pub fn find_version_in_range(
    segs: &[Segment],
    ecl: EccLevel,
    min: Version,
    max: Version,
) -> Result<Version> {
    for v in min.value()..=max.value() {
        let ver = Version::new(v);
        let capacity = ver.data_codewords(ecl) * 8;
        if total_bits(segs, ver).map_or(false, |n| n <= capacity) {
            return Ok(ver);
        }
    }
    Err(capacity_error(segs, max, ecl))
}

/// Smallest version from 1 to 40 that fits the segments at `ecl`.
pub fn find_minimum_version(segs: &[Segment], ecl: EccLevel) -> Result<Version> {
    find_version_in_range(segs, ecl, Version::MIN, Version::MAX)
}

pub fn is_numeric(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit())
}

pub fn is_alphanumeric(text: &str) -> bool {
    text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric() {
        assert!(is_numeric("1234567890"));
        assert!(!is_numeric("1234abc"));
    }

    #[test]
    fn test_is_alphanumeric() {
        assert!(is_alphanumeric("HELLO WORLD"));
        assert!(!is_alphanumeric("Hello World"));
    }

    #[test]
    fn test_segment_mixed() {
        let segs = segment_input("123ABC").unwrap();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].mode(), Mode::Numeric);
        assert_eq!(segs[0].text(), Some("123"));
        assert_eq!(segs[1].mode(), Mode::Alphanumeric);
        assert_eq!(segs[1].text(), Some("ABC"));
    }

    #[test]
    fn test_segment_single_numeric() {
        let segs = segment_input("12345").unwrap();
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].mode(), Mode::Numeric);
        assert_eq!(segs[0].num_chars(), 5);
    }

    #[test]
    fn test_segment_byte_counts_utf8_bytes() {
        let segs = segment_input("A\u{e9}b9").unwrap();
        let modes: Vec<Mode> = segs.iter().map(Segment::mode).collect();
        assert_eq!(modes, vec![Mode::Alphanumeric, Mode::Byte, Mode::Numeric]);
        assert_eq!(segs[1].text(), Some("\u{e9}b"));
        assert_eq!(segs[1].num_chars(), 3);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(segment_input(""), Err(QrError::InvalidInput(_))));
    }

    #[test]
    fn test_encoded_bit_len() {
        assert_eq!(Segment::numeric("12345").unwrap().encoded_bit_len(), 17);
        assert_eq!(Segment::numeric("1").unwrap().encoded_bit_len(), 4);
        assert_eq!(Segment::alphanumeric("HELLO WORLD").unwrap().encoded_bit_len(), 61);
        assert_eq!(Segment::bytes(b"abc").encoded_bit_len(), 24);
        assert!(Segment::numeric("12a").is_err());
        assert!(Segment::alphanumeric("abc").is_err());
    }

    #[test]
    fn test_char_count_bits() {
        assert_eq!(Mode::Numeric.num_char_count_bits(Version::new(9)), 10);
        assert_eq!(Mode::Numeric.num_char_count_bits(Version::new(10)), 12);
        assert_eq!(Mode::Alphanumeric.num_char_count_bits(Version::new(26)), 11);
        assert_eq!(Mode::Alphanumeric.num_char_count_bits(Version::new(27)), 13);
        assert_eq!(Mode::Byte.num_char_count_bits(Version::new(40)), 16);
    }

    #[test]
    fn test_find_minimum_version() {
        let segs = segment_input("HELLO WORLD").unwrap();
        assert_eq!(find_minimum_version(&segs, EccLevel::Q).unwrap(), Version::new(1));
        // 14 bytes fill 1-M exactly, 15 need version 2
        let segs = vec![Segment::bytes(&[b'a'; 14])];
        assert_eq!(find_minimum_version(&segs, EccLevel::M).unwrap(), Version::new(1));
        let segs = vec![Segment::bytes(&[b'a'; 15])];
        assert_eq!(find_minimum_version(&segs, EccLevel::M).unwrap(), Version::new(2));
    }

    #[test]
    fn test_capacity_exceeded() {
        let segs = vec![Segment::bytes(&vec![b'x'; 1274])];
        match find_minimum_version(&segs, EccLevel::H) {
            Err(QrError::CapacityExceeded {
                required_bits,
                capacity_bits,
                ecc_level,
            }) => {
                assert_eq!(required_bits, 4 + 16 + 1274 * 8);
                assert_eq!(capacity_bits, 1276 * 8);
                assert_eq!(ecc_level, EccLevel::H);
            }
            other => panic!("unexpected {:?}", other),
        }
        let segs = vec![Segment::bytes(&vec![b'x'; 1273])];
        assert_eq!(find_minimum_version(&segs, EccLevel::H).unwrap(), Version::MAX);
    }
}
