//! Unsigned integer to decimal ASCII
//!
//! Status responses are built without `core::fmt` so the formatting code stays
//! small and its output shape is fixed: minimal digits, no sign, no padding,
//! no separators.

/// Digits needed for the largest `u32` (4294967295)
pub const MAX_DIGITS: usize = 10;

/// Errors from decimal encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Output buffer shorter than the encoded value
    BufferTooSmall,
}

/// Number of decimal digits in `value`
pub const fn digit_count(mut value: u32) -> usize {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}

/// Encode `value` as decimal ASCII into the start of `buffer`
///
/// Returns the number of bytes written. Zero encodes as the single byte `0`.
/// Nothing is written if `buffer` cannot hold every digit.
pub fn encode(value: u32, buffer: &mut [u8]) -> Result<usize, EncodeError> {
    let len = digit_count(value);
    if buffer.len() < len {
        return Err(EncodeError::BufferTooSmall);
    }

    // Fill from the least significant digit backwards; a do-while shape so
    // zero still emits one digit.
    let mut remaining = value;
    let mut idx = len;
    loop {
        idx -= 1;
        buffer[idx] = b'0' + (remaining % 10) as u8;
        remaining /= 10;
        if remaining == 0 {
            break;
        }
    }

    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::string::ToString;

    #[test]
    fn test_zero_is_single_digit() {
        let mut buf = [0xAAu8; MAX_DIGITS];
        let len = encode(0, &mut buf).unwrap();
        assert_eq!(len, 1);
        assert_eq!(&buf[..len], b"0");
        // Rest of the buffer untouched
        assert_eq!(buf[1], 0xAA);
    }

    #[test]
    fn test_no_leading_zeros() {
        let mut buf = [0u8; MAX_DIGITS];
        let len = encode(1000, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"1000");

        let len = encode(7, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"7");
    }

    #[test]
    fn test_u32_max_fits_max_digits() {
        let mut buf = [0u8; MAX_DIGITS];
        let len = encode(u32::MAX, &mut buf).unwrap();
        assert_eq!(len, MAX_DIGITS);
        assert_eq!(&buf[..len], b"4294967295");
    }

    #[test]
    fn test_buffer_too_small_writes_nothing() {
        let mut buf = [0u8; 3];
        assert_eq!(encode(1234, &mut buf), Err(EncodeError::BufferTooSmall));
        assert_eq!(buf, [0, 0, 0]);

        let mut empty: [u8; 0] = [];
        assert_eq!(encode(0, &mut empty), Err(EncodeError::BufferTooSmall));
    }

    #[test]
    fn test_digit_count_boundaries() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(99_999), 5);
        assert_eq!(digit_count(100_000), 6);
        assert_eq!(digit_count(u32::MAX), 10);
    }

    proptest! {
        #[test]
        fn prop_matches_core_formatting(value in any::<u32>()) {
            let mut buf = [0u8; MAX_DIGITS];
            let len = encode(value, &mut buf).unwrap();
            let expected = value.to_string();
            prop_assert_eq!(&buf[..len], expected.as_bytes());
        }

        #[test]
        fn prop_never_leading_zero(value in 1u32..) {
            let mut buf = [0u8; MAX_DIGITS];
            let len = encode(value, &mut buf).unwrap();
            prop_assert!(len >= 1);
            prop_assert_ne!(buf[0], b'0');
        }
    }
}
