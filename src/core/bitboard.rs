//! A [`BitBoard`] is a 64-bit set where bit `i` marks square `i`. Used
//! everywhere occupancy, attacks, or any other square-set needs representing.
//!
//! ```md,ignore
//! 8 | 56 57 58 59 60 61 62 63
//! 7 | 48 49 50 51 52 53 54 55
//! 6 | 40 41 42 43 44 45 46 47
//! 5 | 32 33 34 35 36 37 38 39
//! 4 | 24 25 26 27 28 29 30 31
//! 3 | 16 17 18 19 20 21 22 23
//! 2 | 8  9  10 11 12 13 14 15
//! 1 | 0  1  2  3  4  5  6  7
//!   -------------------------
//!      a  b  c  d  e  f  g  h
//! ```
//!
//! [`BitBoard`]: struct.BitBoard.html

use super::masks::*;
use super::sq::SQ;
use super::Player;
use crate::prng::PRNG;

use std::fmt;
use std::ops::{
    BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Shl, Shr, Sub,
};

/// A set of squares, one bit per square.
#[derive(Copy, Clone, Default, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct BitBoard(pub u64);

impl BitBoard {
    pub const FILE_A: BitBoard = BitBoard(FILE_A);
    pub const FILE_B: BitBoard = BitBoard(FILE_B);
    pub const FILE_C: BitBoard = BitBoard(FILE_C);
    pub const FILE_D: BitBoard = BitBoard(FILE_D);
    pub const FILE_E: BitBoard = BitBoard(FILE_E);
    pub const FILE_F: BitBoard = BitBoard(FILE_F);
    pub const FILE_G: BitBoard = BitBoard(FILE_G);
    pub const FILE_H: BitBoard = BitBoard(FILE_H);
    pub const RANK_1: BitBoard = BitBoard(RANK_1);
    pub const RANK_2: BitBoard = BitBoard(RANK_2);
    pub const RANK_3: BitBoard = BitBoard(RANK_3);
    pub const RANK_4: BitBoard = BitBoard(RANK_4);
    pub const RANK_5: BitBoard = BitBoard(RANK_5);
    pub const RANK_6: BitBoard = BitBoard(RANK_6);
    pub const RANK_7: BitBoard = BitBoard(RANK_7);
    pub const RANK_8: BitBoard = BitBoard(RANK_8);

    pub const DARK_SQUARES: BitBoard = BitBoard(DARK_SQUARES);
    pub const LIGHT_SQUARES: BitBoard = BitBoard(LIGHT_SQUARES);
    pub const EMPTY: BitBoard = BitBoard(0);
    pub const ALL: BitBoard = BitBoard(!0);

    /// Converts to a square.
    ///
    /// # Safety
    /// Only meaningful if exactly one bit is set; otherwise returns the
    /// least-significant set square.
    #[inline(always)]
    pub fn to_sq(self) -> SQ {
        debug_assert_eq!(self.count_bits(), 1);
        SQ(self.0.trailing_zeros() as u8)
    }

    #[inline(always)]
    pub fn count_bits(self) -> u8 {
        self.0.count_ones() as u8
    }

    /// # Panics
    /// Panics if empty.
    #[inline(always)]
    pub fn bit_scan_forward(self) -> SQ {
        debug_assert!(self.is_not_empty());
        SQ(self.0.trailing_zeros() as u8)
    }

    #[inline(always)]
    pub fn more_than_one(self) -> bool {
        (self.0 & self.0.wrapping_sub(1)) != 0
    }

    #[inline(always)]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline(always)]
    pub fn is_not_empty(self) -> bool {
        self.0 != 0
    }

    /// Isolates the least-significant set bit.
    #[inline(always)]
    pub fn lsb(self) -> BitBoard {
        BitBoard(self.0 & self.0.wrapping_neg())
    }

    /// Isolates the most-significant set bit.
    ///
    /// # Panics
    /// Panics if empty.
    #[inline(always)]
    pub fn msb(self) -> BitBoard {
        debug_assert!(self.is_not_empty());
        BitBoard(1u64 << (63 - self.0.leading_zeros()))
    }

    /// Pops the least-significant set square off of `self` and returns it.
    ///
    /// # Panics
    /// Panics if empty.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> SQ {
        let sq = self.bit_scan_forward();
        self.0 &= self.0 - 1;
        sq
    }

    #[inline(always)]
    pub fn pop_some_lsb(&mut self) -> Option<SQ> {
        if self.is_empty() {
            None
        } else {
            Some(self.pop_lsb())
        }
    }

    #[inline(always)]
    pub fn pop_lsb_and_bit(&mut self) -> (SQ, BitBoard) {
        let sq = self.bit_scan_forward();
        let bit = self.lsb();
        self.0 &= self.0 - 1;
        (sq, bit)
    }

    #[inline(always)]
    pub fn pop_some_lsb_and_bit(&mut self) -> Option<(SQ, BitBoard)> {
        if self.is_empty() {
            None
        } else {
            Some(self.pop_lsb_and_bit())
        }
    }

    /// The square furthest in the player's direction of travel.
    ///
    /// # Panics
    /// Panics if empty.
    #[inline]
    pub fn frontmost_sq(self, player: Player) -> SQ {
        match player {
            Player::White => self.msb().to_sq(),
            Player::Black => self.bit_scan_forward(),
        }
    }

    /// The square nearest the player's own back rank.
    ///
    /// # Panics
    /// Panics if empty.
    #[inline]
    pub fn backmost_sq(self, player: Player) -> SQ {
        match player {
            Player::White => self.bit_scan_forward(),
            Player::Black => self.msb().to_sq(),
        }
    }
}

impl Not for BitBoard {
    type Output = BitBoard;
    #[inline(always)]
    fn not(self) -> BitBoard {
        BitBoard(!self.0)
    }
}

impl BitAnd for BitBoard {
    type Output = BitBoard;
    #[inline(always)]
    fn bitand(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 & rhs.0)
    }
}

impl BitOr for BitBoard {
    type Output = BitBoard;
    #[inline(always)]
    fn bitor(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 | rhs.0)
    }
}

impl BitXor for BitBoard {
    type Output = BitBoard;
    #[inline(always)]
    fn bitxor(self, rhs: BitBoard) -> BitBoard {
        BitBoard(self.0 ^ rhs.0)
    }
}

impl BitAndAssign for BitBoard {
    #[inline(always)]
    fn bitand_assign(&mut self, rhs: BitBoard) {
        self.0 &= rhs.0;
    }
}

impl BitOrAssign for BitBoard {
    #[inline(always)]
    fn bitor_assign(&mut self, rhs: BitBoard) {
        self.0 |= rhs.0;
    }
}

impl BitXorAssign for BitBoard {
    #[inline(always)]
    fn bitxor_assign(&mut self, rhs: BitBoard) {
        self.0 ^= rhs.0;
    }
}

impl Sub<u64> for BitBoard {
    type Output = BitBoard;
    #[inline(always)]
    fn sub(self, rhs: u64) -> BitBoard {
        BitBoard(self.0.wrapping_sub(rhs))
    }
}

impl Shl<u32> for BitBoard {
    type Output = BitBoard;
    #[inline(always)]
    fn shl(self, rhs: u32) -> BitBoard {
        BitBoard(self.0.wrapping_shl(rhs))
    }
}

impl Shr<u32> for BitBoard {
    type Output = BitBoard;
    #[inline(always)]
    fn shr(self, rhs: u32) -> BitBoard {
        BitBoard(self.0.wrapping_shr(rhs))
    }
}

impl Iterator for BitBoard {
    type Item = SQ;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.pop_some_lsb()
    }
}

impl fmt::Debug for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BitBoard({:#018x})", self.0)
    }
}

impl fmt::Display for BitBoard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let sq = rank * 8 + file;
                let bit = if self.0 & (1u64 << sq) != 0 { '1' } else { '.' };
                write!(f, "{} ", bit)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// How densely a generated random bitboard should be populated.
#[derive(Eq, PartialEq)]
enum RandAmount {
    VeryDense,       // ~48 bits
    Dense,           // ~32 bits
    Standard,        // ~16 bits
    Sparse,          // ~8 bits
    VerySparse,      // ~6 bits
    ExtremelySparse, // ~4 bits
    Singular,        // exactly one bit
}

/// Builder for fuzz-test bitboards with a reproducible seed.
///
/// Only used by tests/benches (see [`crate::position::RandPosition`], which
/// builds on this same pattern at the board level).
///
/// [`crate::position::RandPosition`]: ../../position/struct.RandPosition.html
pub struct RandBitBoard {
    prng: PRNG,
    rand: RandAmount,
    max: u16,
    min: u16,
}

impl Default for RandBitBoard {
    fn default() -> Self {
        RandBitBoard {
            prng: PRNG::new(1),
            rand: RandAmount::Standard,
            max: 64,
            min: 1,
        }
    }
}

impl RandBitBoard {
    pub fn many(mut self, amount: usize) -> Vec<BitBoard> {
        (0..amount).map(|_| self.go()).collect()
    }

    pub fn one(mut self) -> BitBoard {
        self.go()
    }

    pub fn avg(mut self, bits: u8) -> Self {
        self.rand = if bits >= 36 {
            RandAmount::VeryDense
        } else if bits >= 26 {
            RandAmount::Dense
        } else if bits >= 12 {
            RandAmount::Standard
        } else if bits >= 7 {
            RandAmount::Sparse
        } else if bits >= 5 {
            RandAmount::VerySparse
        } else {
            RandAmount::ExtremelySparse
        };
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.min = 0;
        self
    }

    pub fn max(mut self, max: u16) -> Self {
        self.max = max;
        self
    }

    pub fn min(mut self, min: u16) -> Self {
        self.min = min;
        self
    }

    pub fn pseudo_random(mut self, seed: u64) -> Self {
        self.prng = PRNG::new(if seed == 0 { 1 } else { seed });
        self
    }

    fn go(&mut self) -> BitBoard {
        if self.rand == RandAmount::Singular {
            return BitBoard(1u64 << (self.prng.rand() % 64));
        }

        loop {
            let num = match self.rand {
                RandAmount::VeryDense => self.prng.rand() | self.prng.rand(),
                RandAmount::Dense => self.prng.rand(),
                RandAmount::Standard => self.prng.rand() & self.prng.rand(),
                RandAmount::Sparse => self.prng.sparse_rand(),
                RandAmount::VerySparse => {
                    self.prng.sparse_rand() & (self.prng.rand() | self.prng.rand())
                }
                RandAmount::ExtremelySparse => self.prng.sparse_rand() & self.prng.rand(),
                RandAmount::Singular => unreachable!(),
            };
            let count = num.count_ones() as u16;
            if count >= self.min && count <= self.max {
                return BitBoard(num);
            }
        }
    }
}
