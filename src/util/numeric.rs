//! Prefix-coded numeric term encoding.
//!
//! Numeric values are indexed as byte terms so that they can be matched by
//! plain term lookups. Each term stores the value shifted right by `shift`
//! bits, with the sign bit flipped so that byte order equals numeric order,
//! spread over 7-bit chunks. The first byte records the value width and the
//! shift, so terms of different precision never collide.
//!
//! The same functions must be used on the query side and the document side;
//! a term built any other way will never match.
//!
//! ```
//! use percolator::util::numeric::{int_to_prefix_coded, prefix_coded_to_int};
//!
//! let term = int_to_prefix_coded(42, 0);
//! assert_eq!(prefix_coded_to_int(&term).unwrap(), 42);
//! ```

use crate::error::{PercolatorError, Result};

/// Marker added to the shift in the first byte of a 64-bit term.
pub const SHIFT_START_LONG: u8 = 0x20;

/// Marker added to the shift in the first byte of a 32-bit term.
pub const SHIFT_START_INT: u8 = 0x60;

/// Maximum encoded length of a 64-bit term.
pub const BUF_SIZE_LONG: usize = 63 / 7 + 2;

/// Maximum encoded length of a 32-bit term.
pub const BUF_SIZE_INT: usize = 31 / 7 + 2;

/// Encode a 32-bit integer shifted right by `shift` bits.
///
/// A shift above 31 is treated as 31, the coarsest level.
pub fn int_to_prefix_coded(value: i32, shift: u32) -> Vec<u8> {
    let shift = shift.min(31);
    let mut n_chars = (((31 - shift) * 37) >> 8) as usize + 1;
    let mut bytes = vec![0u8; n_chars + 1];
    bytes[0] = SHIFT_START_INT + shift as u8;

    let mut sortable = ((value as u32) ^ 0x8000_0000) >> shift;
    while n_chars > 0 {
        bytes[n_chars] = (sortable & 0x7f) as u8;
        sortable >>= 7;
        n_chars -= 1;
    }
    bytes
}

/// Encode a 64-bit integer shifted right by `shift` bits.
///
/// A shift above 63 is treated as 63, the coarsest level.
pub fn long_to_prefix_coded(value: i64, shift: u32) -> Vec<u8> {
    let shift = shift.min(63);
    let mut n_chars = (((63 - shift) * 37) >> 8) as usize + 1;
    let mut bytes = vec![0u8; n_chars + 1];
    bytes[0] = SHIFT_START_LONG + shift as u8;

    let mut sortable = ((value as u64) ^ 0x8000_0000_0000_0000) >> shift;
    while n_chars > 0 {
        bytes[n_chars] = (sortable & 0x7f) as u8;
        sortable >>= 7;
        n_chars -= 1;
    }
    bytes
}

/// Shift stored in a 32-bit prefix-coded term.
pub fn int_shift(term: &[u8]) -> Result<u32> {
    let first = *term
        .first()
        .ok_or_else(|| PercolatorError::analysis("empty numeric term"))?;
    let shift = first.wrapping_sub(SHIFT_START_INT) as u32;
    if shift > 31 {
        return Err(PercolatorError::analysis(format!(
            "not a 32-bit prefix coded term (first byte {first:#x})"
        )));
    }
    Ok(shift)
}

/// Shift stored in a 64-bit prefix-coded term.
pub fn long_shift(term: &[u8]) -> Result<u32> {
    let first = *term
        .first()
        .ok_or_else(|| PercolatorError::analysis("empty numeric term"))?;
    let shift = first.wrapping_sub(SHIFT_START_LONG) as u32;
    if shift > 63 {
        return Err(PercolatorError::analysis(format!(
            "not a 64-bit prefix coded term (first byte {first:#x})"
        )));
    }
    Ok(shift)
}

/// Decode a 32-bit prefix-coded term back to the (shifted) integer.
pub fn prefix_coded_to_int(term: &[u8]) -> Result<i32> {
    let shift = int_shift(term)?;
    let mut sortable: u32 = 0;
    for &b in &term[1..] {
        if b & 0x80 != 0 {
            return Err(PercolatorError::analysis("invalid prefix coded numeric term"));
        }
        sortable = (sortable << 7) | b as u32;
    }
    Ok(((sortable << shift) ^ 0x8000_0000) as i32)
}

/// Decode a 64-bit prefix-coded term back to the (shifted) integer.
pub fn prefix_coded_to_long(term: &[u8]) -> Result<i64> {
    let shift = long_shift(term)?;
    let mut sortable: u64 = 0;
    for &b in &term[1..] {
        if b & 0x80 != 0 {
            return Err(PercolatorError::analysis("invalid prefix coded numeric term"));
        }
        sortable = (sortable << 7) | b as u64;
    }
    Ok(((sortable << shift) ^ 0x8000_0000_0000_0000) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_full_precision_length() {
        let term = int_to_prefix_coded(8, 0);
        assert_eq!(term.len(), 6);
        assert_eq!(term[0], SHIFT_START_INT);
    }

    #[test]
    fn test_distinct_values_give_distinct_terms() {
        let terms: Vec<Vec<u8>> = (8..=15).map(|i| int_to_prefix_coded(i, 0)).collect();
        for (i, a) in terms.iter().enumerate() {
            for b in &terms[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_byte_order_matches_numeric_order() {
        let values = [i32::MIN, -100, -1, 0, 1, 100, i32::MAX];
        for pair in values.windows(2) {
            assert!(int_to_prefix_coded(pair[0], 0) < int_to_prefix_coded(pair[1], 0));
            assert!(long_to_prefix_coded(pair[0] as i64, 0) < long_to_prefix_coded(pair[1] as i64, 0));
        }
    }

    #[test]
    fn test_decode() {
        for value in [i32::MIN, -7, 0, 15, i32::MAX] {
            assert_eq!(prefix_coded_to_int(&int_to_prefix_coded(value, 0)).unwrap(), value);
        }
        assert_eq!(prefix_coded_to_long(&long_to_prefix_coded(-3, 0)).unwrap(), -3);
        // Lower bits are dropped by the shift.
        assert_eq!(prefix_coded_to_int(&int_to_prefix_coded(0x1ff, 8)).unwrap(), 0x100);
    }

    #[test]
    fn test_oversized_shift_is_clamped() {
        assert_eq!(int_to_prefix_coded(-5, 32), int_to_prefix_coded(-5, 31));
        assert_eq!(int_to_prefix_coded(7, u32::MAX), int_to_prefix_coded(7, 31));
        assert_eq!(long_to_prefix_coded(-5, 64), long_to_prefix_coded(-5, 63));
        assert_eq!(long_to_prefix_coded(7, u32::MAX), long_to_prefix_coded(7, 63));
        assert_eq!(int_shift(&int_to_prefix_coded(1, 40)).unwrap(), 31);
        assert_eq!(long_shift(&long_to_prefix_coded(1, 80)).unwrap(), 63);
    }

    #[test]
    fn test_int_and_long_terms_never_collide() {
        assert_ne!(int_to_prefix_coded(1, 0)[0], long_to_prefix_coded(1, 0)[0]);
        assert!(int_shift(&long_to_prefix_coded(1, 0)).is_err());
    }
}
