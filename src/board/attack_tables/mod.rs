//! Attack tables for move generation.
//!
//! Uses Hyperbola Quintessence for sliding piece attacks (bishop, rook, queen).
//! This is a fast, branch-free algorithm that uses the `o^(o-2r)` trick.
//! Leaper tables live in `tables`; `BETWEEN` feeds pin and check detection.

#![allow(clippy::needless_range_loop)] // Index loops are clearer for board coordinates
#![allow(clippy::inline_always)] // Performance-critical hot path functions

mod tables;

pub(crate) use tables::{KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};

use once_cell::sync::Lazy;

// File mask for column A
const FILE_A: u64 = 0x0101010101010101;

/// Walk one ray from `sq` (exclusive) and collect the squares it crosses
fn ray_mask(sq: usize, dr: isize, df: isize) -> u64 {
    let mut mask = 0u64;
    let mut r = (sq / 8) as isize + dr;
    let mut f = (sq % 8) as isize + df;
    while (0..8).contains(&r) && (0..8).contains(&f) {
        mask |= 1u64 << (r * 8 + f);
        r += dr;
        f += df;
    }
    mask
}

/// Diagonal masks for each square (bottom-left to top-right direction)
static DIAG_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = (1u64 << sq) | ray_mask(sq, 1, 1) | ray_mask(sq, -1, -1);
    }
    masks
});

/// Anti-diagonal masks for each square (top-left to bottom-right direction)
static ANTI_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = (1u64 << sq) | ray_mask(sq, 1, -1) | ray_mask(sq, -1, 1);
    }
    masks
});

/// File masks for each square
static FILE_MASKS: Lazy<[u64; 64]> = Lazy::new(|| {
    let mut masks = [0u64; 64];
    for sq in 0..64 {
        masks[sq] = FILE_A << (sq % 8);
    }
    masks
});

/// Rank attack lookup table: `[8 * occupancy_6bit + file]` -> attacks on that rank
/// Only stores attacks for file positions, shifted to rank 0
static RANK_ATTACKS: Lazy<[u64; 512]> = Lazy::new(|| {
    let mut attacks = [0u64; 512];
    for occ_6bit in 0..64 {
        for file in 0..8 {
            let mut attack = 0u64;
            for f in (file + 1)..8 {
                attack |= 1u64 << f;
                // Occupancy bits 0-5 stand for files b-g
                if (1..=6).contains(&f) && (occ_6bit & (1 << (f - 1))) != 0 {
                    break;
                }
            }
            for f in (0..file).rev() {
                attack |= 1u64 << f;
                if (1..=6).contains(&f) && (occ_6bit & (1 << (f - 1))) != 0 {
                    break;
                }
            }
            attacks[8 * occ_6bit + file] = attack;
        }
    }
    attacks
});

/// `BETWEEN[a][b]`: squares strictly between two aligned squares, empty otherwise
static BETWEEN: Lazy<Box<[[u64; 64]; 64]>> = Lazy::new(|| {
    let mut table = Box::new([[0u64; 64]; 64]);
    for a in 0..64 {
        for b in 0..64 {
            if a == b {
                continue;
            }
            let (ra, fa) = ((a / 8) as isize, (a % 8) as isize);
            let (rb, fb) = ((b / 8) as isize, (b % 8) as isize);
            let a_bit = 1u64 << a;
            let b_bit = 1u64 << b;
            table[a][b] = if ra == rb || fa == fb {
                rook_attacks(a, b_bit) & rook_attacks(b, a_bit)
            } else if (ra - rb).abs() == (fa - fb).abs() {
                bishop_attacks(a, b_bit) & bishop_attacks(b, a_bit)
            } else {
                0
            };
        }
    }
    table
});

#[inline(always)]
const fn byteswap(x: u64) -> u64 {
    x.swap_bytes()
}

/// Hyperbola Quintessence attack calculation for a single line through `square`.
/// Uses the o^(o-2r) trick with byteswap for the reverse direction.
#[inline(always)]
fn hyp_quint(occupied: u64, mask: u64, square: usize) -> u64 {
    let piece_bit = 1u64 << square;
    let forward = occupied & mask;
    let backward = byteswap(forward);
    let forward_attacks = forward.wrapping_sub(piece_bit.wrapping_mul(2));
    let backward_attacks = byteswap(backward.wrapping_sub(byteswap(piece_bit).wrapping_mul(2)));
    (forward_attacks ^ backward_attacks) & mask
}

#[inline(always)]
fn diag_attacks(occupied: u64, square: usize) -> u64 {
    hyp_quint(occupied, DIAG_MASKS[square], square)
}

#[inline(always)]
fn anti_attacks(occupied: u64, square: usize) -> u64 {
    hyp_quint(occupied, ANTI_MASKS[square], square)
}

#[inline(always)]
fn file_attacks(occupied: u64, square: usize) -> u64 {
    hyp_quint(occupied, FILE_MASKS[square], square)
}

/// Rank attacks (horizontal) - uses lookup table since byteswap doesn't help
#[inline(always)]
fn rank_attacks(occupied: u64, square: usize) -> u64 {
    let rank = square / 8;
    let file = square % 8;
    let rank_occ = occupied >> (rank * 8);
    let occ_6bit = ((rank_occ >> 1) & 63) as usize;
    RANK_ATTACKS[8 * occ_6bit + file] << (rank * 8)
}

/// Get bishop attacks (diagonals only)
#[inline]
pub(crate) fn bishop_attacks(square: usize, occupancy: u64) -> u64 {
    diag_attacks(occupancy, square) | anti_attacks(occupancy, square)
}

/// Get rook attacks (ranks and files only)
#[inline]
pub(crate) fn rook_attacks(square: usize, occupancy: u64) -> u64 {
    file_attacks(occupancy, square) | rank_attacks(occupancy, square)
}

/// Get queen attacks (all 8 directions)
#[inline]
pub(crate) fn queen_attacks(square: usize, occupancy: u64) -> u64 {
    bishop_attacks(square, occupancy) | rook_attacks(square, occupancy)
}

#[inline]
pub(crate) fn between(a: usize, b: usize) -> u64 {
    BETWEEN[a][b]
}
