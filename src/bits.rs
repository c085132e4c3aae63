//! Bit utilities over byte-string keys.
//!
//! Bit `0` is the most significant bit of byte `0`, increasing toward the end
//! of the key. Bytes past the end of a slice read as `0`.

use std::cmp::Ordering;

#[inline]
pub(crate) fn byte_at(key: &[u8], idx: usize) -> u8 {
    key.get(idx).copied().unwrap_or(0)
}

/// Value (0 or 1) of bit `pos`.
#[inline]
pub(crate) fn bit_at(key: &[u8], pos: u32) -> usize {
    let shift = 7 - (pos & 7);
    ((byte_at(key, (pos >> 3) as usize) >> shift) & 1) as usize
}

/// Position of the first bit where `a` and `b` differ.
///
/// Scanning starts at the byte holding bit `from`; bits before `from` must
/// already be known equal. Stops once `until` bits are covered, returning the
/// byte-aligned position it stopped at (`>= until`) when no difference was found.
#[inline]
pub(crate) fn equal_bits(a: &[u8], b: &[u8], from: u32, until: u32) -> u32 {
    let mut pos = from & !7;
    while pos < until {
        let idx = (pos >> 3) as usize;
        let diff = byte_at(a, idx) ^ byte_at(b, idx);
        if diff != 0 {
            return pos + diff.leading_zeros();
        }
        pos += 8;
    }
    pos
}

/// Order of `a` relative to `b` on bit `pos` alone.
#[inline]
pub(crate) fn cmp_bits(a: &[u8], b: &[u8], pos: u32) -> Ordering {
    bit_at(a, pos).cmp(&bit_at(b, pos))
}

/// Whether bytes `from..to` of `a` and `b` are equal.
#[inline]
pub(crate) fn range_equal(a: &[u8], b: &[u8], from: usize, to: usize) -> bool {
    if from >= to {
        return true;
    }
    match (a.get(from..to), b.get(from..to)) {
        (Some(a), Some(b)) => a == b,
        _ => (from..to).all(|i| byte_at(a, i) == byte_at(b, i)),
    }
}

/// Length of a zero-terminated key, not counting the terminator. The end of
/// the slice counts as a terminator.
#[inline]
pub(crate) fn terminated_len(key: &[u8]) -> usize {
    key.iter().position(|&b| b == 0).unwrap_or(key.len())
}

/// Largest key length, in bytes, whose bit positions fit a node's `bit`.
pub(crate) const MAX_KEY_LEN: usize = (i32::MAX as usize) >> 3;

/// Number of bits covered by `len` bytes.
///
/// # Panics
/// Panics if `len` exceeds [`MAX_KEY_LEN`].
#[inline]
pub(crate) fn len_bits(len: usize) -> u32 {
    match u32::try_from(len).ok().and_then(|l| l.checked_mul(8)) {
        Some(bits) if len <= MAX_KEY_LEN => bits,
        _ => panic!("key too long: {len} bytes, at most {MAX_KEY_LEN} are supported"),
    }
}
