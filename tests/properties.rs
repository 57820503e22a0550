//! Property-based tests for the encoder pipeline.
//!
//! Uses proptest to check field identities, Reed-Solomon syndromes, mask
//! selection and determinism over arbitrary inputs.

use proptest::prelude::*;
use qrcraft::gf::GaloisField;
use qrcraft::polynomial::Polynomial;
use qrcraft::reed_solomon::ReedSolomonEncoder;
use qrcraft::{generate, generate_bytes, EccLevel, EncodeOptions, Mask, QrMatrix, Version};

fn ecc_level() -> impl Strategy<Value = EccLevel> {
    prop::sample::select(EccLevel::ALL.to_vec())
}

// =============================================================================
// GF(256) Properties
// =============================================================================

proptest! {
    /// a * b = b * a
    #[test]
    fn prop_multiply_commutes(a: u8, b: u8) {
        let gf = GaloisField::get();
        prop_assert_eq!(gf.multiply(a, b), gf.multiply(b, a));
    }

    /// a * (b + c) = a * b + a * c
    #[test]
    fn prop_multiply_distributes(a: u8, b: u8, c: u8) {
        let gf = GaloisField::get();
        prop_assert_eq!(
            gf.multiply(a, gf.add(b, c)),
            gf.add(gf.multiply(a, b), gf.multiply(a, c))
        );
    }

    /// (a / b) * b = a for non-zero b
    #[test]
    fn prop_divide_inverts_multiply(a: u8, b in 1u8..=255) {
        let gf = GaloisField::get();
        prop_assert_eq!(gf.multiply(gf.divide(a, b).unwrap(), b), a);
    }

    /// exp(log(a)) = a for non-zero a
    #[test]
    fn prop_exp_log_roundtrip(a in 1u8..=255) {
        let gf = GaloisField::get();
        prop_assert_eq!(gf.exp(usize::from(gf.log(a).unwrap())), a);
    }
}

// =============================================================================
// Reed-Solomon Properties
// =============================================================================

proptest! {
    /// Every codeword evaluates to zero at the generator's roots 2^0 .. 2^(n-1)
    #[test]
    fn prop_codeword_syndromes_vanish(
        data in prop::collection::vec(any::<u8>(), 1..120),
        degree in 7usize..=30,
    ) {
        let gf = GaloisField::get();
        let rs = ReedSolomonEncoder::new(degree);
        let ecc = rs.encode(&data).unwrap();
        prop_assert_eq!(ecc.len(), degree);

        let mut codeword = data.clone();
        codeword.extend_from_slice(&ecc);
        let poly = Polynomial::new(codeword);
        for i in 0..degree {
            prop_assert_eq!(poly.evaluate(gf.exp(i), gf), 0, "syndrome {} non-zero", i);
        }
    }
}

// =============================================================================
// Matrix Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// The chosen mask has the lowest penalty, and the lowest id among ties
    #[test]
    fn prop_best_mask_is_minimal(
        data in prop::collection::vec(any::<u8>(), 26..=26),
        ecl in ecc_level(),
    ) {
        let mut m = QrMatrix::with_function_patterns(Version::MIN);
        m.place_data(&data);
        let penalties = m.mask_penalties(ecl);
        let best = m.best_mask(ecl);
        let min = *penalties.iter().min().unwrap();
        prop_assert_eq!(penalties[usize::from(best.value())], min);
        prop_assert!(penalties[..usize::from(best.value())].iter().all(|&p| p > min));
        prop_assert_eq!(m.masked(best, ecl).penalty_score(), min);
    }

    /// Masking twice restores the data modules
    #[test]
    fn prop_mask_is_involution(
        data in prop::collection::vec(any::<u8>(), 44..=44),
        mask in 0u8..8,
    ) {
        let mut m = QrMatrix::with_function_patterns(Version::new(2));
        m.place_data(&data);
        let before = m.clone();
        let mask = Mask::new(mask);
        m.apply_mask(mask);
        m.apply_mask(mask);
        prop_assert_eq!(m, before);
    }
}

// =============================================================================
// End-to-End Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Encoding the same input twice gives identical symbols
    #[test]
    fn prop_generate_is_deterministic(text in "[ -~]{1,120}", ecl in ecc_level()) {
        let options = EncodeOptions::default().ecc_level(ecl);
        let a = generate(&text, &options).unwrap();
        let b = generate(&text, &options).unwrap();
        prop_assert_eq!(a, b);
    }

    /// The symbol side is 4v + 17 and the codeword count matches the version
    #[test]
    fn prop_symbol_matches_version(data in prop::collection::vec(any::<u8>(), 1..400)) {
        let qr = generate_bytes(&data, &EncodeOptions::default()).unwrap();
        let v = qr.version();
        prop_assert_eq!(qr.size(), 4 * usize::from(v.value()) + 17);
        prop_assert_eq!(qr.total_codewords(), v.total_codewords());
        prop_assert!(qr.total_bits() <= v.data_codewords(qr.error_correction_level()) * 8);
        if v > Version::MIN {
            let smaller = Version::new(v.value() - 1);
            prop_assert!(data.len() > smaller.byte_capacity(qr.error_correction_level()));
        }
    }
}
