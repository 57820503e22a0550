//! Turns segments into the padded data codeword sequence for one (version, level).

use core::convert::TryFrom;

use crate::bits::BitBuffer;
use crate::error::{QrError, Result};
use crate::segment::{capacity_error, total_bits, Mode, Segment, ALPHANUMERIC_CHARSET};
use crate::version::{EccLevel, Version};

/// Appends one segment's mode indicator, count indicator and payload.
pub fn append_segment(bb: &mut BitBuffer, seg: &Segment, version: Version) -> Result<()> {
    let ccbits = seg.mode().num_char_count_bits(version);
    let count = u32::try_from(seg.num_chars())
        .ok()
        .filter(|&n| u64::from(n) < 1u64 << ccbits)
        .ok_or_else(|| {
            QrError::InvalidInput(format!(
                "segment of {} characters overflows a {}-bit count indicator",
                seg.num_chars(),
                ccbits
            ))
        })?;
    bb.append_bits(seg.mode().mode_bits(), 4);
    bb.append_bits(count, ccbits);
    match seg.mode() {
        Mode::Numeric => append_numeric(bb, seg.data()),
        Mode::Alphanumeric => append_alphanumeric(bb, seg.data())?,
        Mode::Byte => {
            for &b in seg.data() {
                bb.append_bits(u32::from(b), 8);
            }
        }
    }
    Ok(())
}

fn append_numeric(bb: &mut BitBuffer, digits: &[u8]) {
    for chunk in digits.chunks(3) {
        let value = chunk
            .iter()
            .fold(0u32, |acc, &d| acc * 10 + u32::from(d - b'0'));
        bb.append_bits(value, [0, 4, 7, 10][chunk.len()]);
    }
}

fn append_alphanumeric(bb: &mut BitBuffer, text: &[u8]) -> Result<()> {
    let code = |c: u8| {
        ALPHANUMERIC_CHARSET
            .find(char::from(c))
            .map(|i| i as u32)
            .ok_or_else(|| {
                QrError::InvalidInput(format!("{:?} is not in the alphanumeric charset", char::from(c)))
            })
    };
    for pair in text.chunks(2) {
        match pair {
            &[a, b] => bb.append_bits(code(a)? * 45 + code(b)?, 11),
            &[a] => bb.append_bits(code(a)?, 6),
            _ => unreachable!(),
        }
    }
    Ok(())
}

/// Builds the complete data bit stream: all segments, terminator, byte
/// alignment and alternating `0xEC`/`0x11` pad codewords up to capacity.
pub fn build(segs: &[Segment], version: Version, ecl: EccLevel) -> Result<BitBuffer> {
    let capacity_bits = version.data_codewords(ecl) * 8;
    let used = total_bits(segs, version)
        .filter(|&n| n <= capacity_bits)
        .ok_or_else(|| capacity_error(segs, version, ecl))?;

    let mut bb = BitBuffer::with_capacity(capacity_bits);
    for seg in segs {
        append_segment(&mut bb, seg, version)?;
    }
    debug_assert_eq!(bb.len(), used);

    // Add terminator and pad up to a byte if applicable
    let numzerobits = core::cmp::min(4, capacity_bits - bb.len());
    bb.append_bits(0, numzerobits as u8);
    let numzerobits = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    // Pad with alternating bytes until data capacity is reached
    for &padbyte in [0xEC, 0x11].iter().cycle() {
        if bb.len() >= capacity_bits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }
    Ok(bb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment_input;

    #[test]
    fn test_numeric_01234567_1m() {
        let segs = vec![Segment::numeric("01234567").unwrap()];
        let bb = build(&segs, Version::new(1), EccLevel::M).unwrap();
        assert_eq!(
            bb.into_bytes(),
            vec![
                0x10, 0x20, 0x0C, 0x56, 0x61, 0x80, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11, 0xEC, 0x11,
                0xEC, 0x11
            ]
        );
    }

    #[test]
    fn test_alphanumeric_pairs() {
        let mut bb = BitBuffer::new();
        let seg = Segment::alphanumeric("AC-42").unwrap();
        append_segment(&mut bb, &seg, Version::new(1)).unwrap();
        let mut expected = BitBuffer::new();
        expected.append_bits(0b0010, 4);
        expected.append_bits(5, 9);
        expected.append_bits(10 * 45 + 12, 11);
        expected.append_bits(41 * 45 + 4, 11);
        expected.append_bits(2, 6);
        assert_eq!(bb, expected);
        assert_eq!(bb.len(), 41);
    }

    #[test]
    fn test_byte_payload() {
        let mut bb = BitBuffer::new();
        append_segment(&mut bb, &Segment::bytes(&[0xAB, 0x01]), Version::new(10)).unwrap();
        assert_eq!(bb.len(), 4 + 16 + 16);
        assert_eq!(bb.into_bytes(), vec![0x40, 0x00, 0x2A, 0xB0, 0x10]);
    }

    #[test]
    fn test_terminator_bounded_by_capacity() {
        // 1-H holds 9 data codewords = 72 bits; 17 digits take 4 + 10 + 57 = 71
        let segs = vec![Segment::numeric("12345678901234567").unwrap()];
        let bb = build(&segs, Version::new(1), EccLevel::H).unwrap();
        assert_eq!(bb.len(), 72);
    }

    #[test]
    fn test_pads_to_capacity() {
        // 74 bits do not fit 1-H
        for ecl in [EccLevel::L, EccLevel::M, EccLevel::Q] {
            let segs = segment_input("HELLO WORLD").unwrap();
            let bb = build(&segs, Version::new(1), ecl).unwrap();
            assert_eq!(bb.len(), Version::new(1).data_codewords(ecl) * 8);
        }
    }

    #[test]
    fn test_over_capacity() {
        let segs = vec![Segment::bytes(&[0u8; 20])];
        assert!(matches!(
            build(&segs, Version::new(1), EccLevel::L),
            Err(QrError::CapacityExceeded { .. })
        ));
    }
}
