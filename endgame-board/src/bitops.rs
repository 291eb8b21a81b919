//! Allocation-free bit-twiddling primitives on raw integers.
//!
//! These are the building blocks for move generation and move ordering.
//! Bit scans are unchecked: scanning a zero value returns a documented but
//! meaningless index, so callers must test for emptiness first.

/// Octal decomposition of a bit index: `index == hi * 8 + lo`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct HiLo {
    pub hi: u8,
    pub lo: u8,
}

// Masks for the SWAR population count.
const M1: u64 = 0x5555555555555555;
const M2: u64 = 0x3333333333333333;
const M4: u64 = 0x0f0f0f0f0f0f0f0f;
const H01: u64 = 0x0101010101010101;

/// `LOG2[i]` is the index of the most significant bit of `i`, and 0 for `i == 0`.
const LOG2: [u8; 256] = build_log2_table();

const fn build_log2_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 2;
    while i < 256 {
        table[i] = table[i / 2] + 1;
        i += 1;
    }
    table
}

const DEBRUIJN_64_MAGIC: u64 = 0x07EDD5E59A4E28C2;
const DEBRUIJN_64_SHIFT: u32 = 58;

/// Maps the top 6 bits of `isolated_bit * DEBRUIJN_64_MAGIC` to the bit index.
const DEBRUIJN_64_INDEX: [u8; 64] = [
    63, 0, 58, 1, 59, 47, 53, 2, //
    60, 39, 48, 27, 54, 33, 42, 3, //
    61, 51, 37, 40, 49, 18, 28, 20, //
    55, 30, 34, 11, 43, 14, 22, 4, //
    62, 57, 46, 52, 38, 26, 32, 41, //
    50, 36, 17, 19, 29, 10, 13, 21, //
    56, 45, 25, 31, 35, 16, 9, 12, //
    44, 24, 15, 8, 23, 7, 6, 5,
];

/// Count the set bits of `x` with a SWAR reduction and one multiply.
#[inline]
pub const fn popcount(x: u64) -> u8 {
    let mut x = x;
    x -= (x >> 1) & M1; // 2-bit partial sums
    x = (x & M2) + ((x >> 2) & M2); // 4-bit partial sums
    x = (x + (x >> 4)) & M4; // 8-bit partial sums
    (x.wrapping_mul(H01) >> 56) as u8
}

/// Index (0..63) of the most significant set bit.
/// Returns 0 when `x == 0`, which is indistinguishable from a lone bit 0.
#[inline]
pub const fn bitscan_ms1b_64(x: u64) -> u8 {
    let mut tmp = x;
    let mut result = 0u8;
    if tmp & 0xFFFFFFFF00000000 != 0 {
        tmp >>= 32;
        result = 32;
    }
    if tmp > 0xFFFF {
        tmp >>= 16;
        result |= 16;
    }
    if tmp > 0xFF {
        tmp >>= 8;
        result |= 8;
    }
    result | LOG2[tmp as usize]
}

/// Index (0..7) of the most significant set bit of a byte; 0 when `x == 0`.
#[inline]
pub const fn bitscan_ms1b_8(x: u8) -> u8 {
    LOG2[x as usize]
}

/// Octal form of [`bitscan_ms1b_64`]: `{hi: row, lo: bit within the byte}`.
/// Returns `{0, 0}` when `x == 0`.
#[inline]
pub const fn bitscan_ms1b_to_base8(x: u64) -> HiLo {
    let mut tmp: u32;
    let mut hi = 0u8;

    if x & 0xFFFFFFFF00000000 != 0 {
        tmp = (x >> 32) as u32;
        hi += 4;
    } else {
        tmp = x as u32;
    }
    if tmp & 0xFFFF0000 != 0 {
        tmp >>= 16;
        hi += 2;
    }
    if tmp & 0x0000FF00 != 0 {
        tmp >>= 8;
        hi += 1;
    }

    HiLo {
        hi,
        lo: LOG2[tmp as usize],
    }
}

/// Index (0..63) of the least significant set bit, by de Bruijn multiplication.
/// Returns 63 when `x == 0`.
#[inline]
pub const fn bitscan_ls1b_64(x: u64) -> u8 {
    let isolated = x & x.wrapping_neg();
    DEBRUIJN_64_INDEX[(isolated.wrapping_mul(DEBRUIJN_64_MAGIC) >> DEBRUIJN_64_SHIFT) as usize]
}

/// Keep only the lowest set bit of `x`.
#[inline]
pub const fn lowest_bit_set_64(x: u64) -> u64 {
    (x & x.wrapping_sub(1)) ^ x
}

/// Keep only the lowest set bit of `x`.
#[inline]
pub const fn lowest_bit_set_32(x: u32) -> u32 {
    (x & x.wrapping_sub(1)) ^ x
}

/// Keep only the lowest set bit of `x`.
#[inline]
pub const fn lowest_bit_set_8(x: u8) -> u8 {
    (x & x.wrapping_sub(1)) ^ x
}

/// Keep only the highest set bit of `x`.
#[inline]
pub const fn highest_bit_set_32(x: u32) -> u32 {
    if x == 0 {
        return 0;
    }
    let mut result = 1u32;
    let mut tmp = x;
    if tmp & 0xFFFF0000 != 0 {
        tmp >>= 16;
        result = 0x00010000;
    }
    if tmp > 0xFF {
        tmp >>= 8;
        result <<= 8;
    }
    result << LOG2[tmp as usize]
}

/// Keep only the highest set bit of `x`.
#[inline]
pub const fn highest_bit_set_8(x: u8) -> u8 {
    if x == 0 {
        return 0;
    }
    1 << LOG2[x as usize]
}

/// Given a byte with one or two bits set, return the bits strictly between them
/// (`0b00100010` gives `0b00011100`). A single set bit gives 0.
/// Any other input produces an unspecified value.
#[inline]
pub const fn fill_in_between(x: u8) -> u8 {
    ((1u8 << bitscan_ms1b_8(x)) - 1) & (!x ^ x.wrapping_sub(1))
}

/// Shift left by `shift`, or right by `-shift` when it is negative.
/// Shifts of 64 or more positions clear every bit.
#[inline]
pub fn signed_left_shift(x: u64, shift: i32) -> u64 {
    if shift >= 0 {
        x.checked_shl(shift as u32).unwrap_or(0)
    } else {
        x.checked_shr(shift.unsigned_abs()).unwrap_or(0)
    }
}
