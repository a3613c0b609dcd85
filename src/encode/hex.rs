//! Uppercase hexadecimal encoding, two digits per byte, no separators.
//!
//! ```rust
//! use audio_to_hex::encode::encode;
//!
//! assert_eq!(encode([0x00u8, 0x0A, 0x80, 0xFF]), "000A80FF");
//! assert_eq!(encode([0u8; 0]), "");
//! ```

/// Render `bytes` as uppercase hex in input order.
///
/// Empty input yields an empty string.  Rejecting empty audio is the
/// pipeline's job, not the encoder's.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    ::hex::encode_upper(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::QuantizedSamples;

    #[test]
    fn every_byte_is_two_uppercase_digits() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = encode(&bytes);
        assert_eq!(text.len(), 512);

        for (i, pair) in text.as_bytes().chunks(2).enumerate() {
            let pair = std::str::from_utf8(pair).unwrap();
            assert!(
                pair.chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)),
                "bad pair {pair}"
            );
            assert_eq!(u8::from_str_radix(pair, 16).unwrap() as usize, i);
        }
    }

    #[test]
    fn zero_padded_extremes() {
        assert_eq!(encode([0u8]), "00");
        assert_eq!(encode([255u8]), "FF");
        assert_eq!(encode([1u8, 16]), "0110");
    }

    #[test]
    fn quantized_samples_encode_directly() {
        let q = QuantizedSamples::from(vec![0x80; 3]);
        assert_eq!(encode(&q), "808080");
    }

    #[test]
    fn empty_is_empty() {
        assert!(encode(Vec::<u8>::new()).is_empty());
    }
}
