//! Magic-bitboard attack tables for bishops and rooks. Queen attacks are the
//! union of both.
//!
//! Magics are searched at process startup with a fixed-seed PRNG rather than
//! baked into source as 128 pre-computed constants — the same tradeoff the
//! teacher crate makes, and the one the wider corpus's newer engines make too.
//! Startup search costs a few milliseconds once; it buys a much smaller diff
//! to audit than a 128-entry constant table would.

use lazy_static::lazy_static;
use tracing::debug;

use crate::core::bitboard::BitBoard;
use crate::core::masks::{FILE_A, FILE_H, RANK_1, RANK_8};
use crate::core::sq::SQ;
use crate::core::{file_bb, rank_bb};
use crate::prng::PRNG;

const B_DELTAS: [i8; 4] = [7, 9, -9, -7];
const R_DELTAS: [i8; 4] = [8, 1, -8, -1];

/// Same search seeds, one set per player-relative magic table, as
/// `pleco`'s `helper/magic.rs`. Index 1 (originally meant for the "black"
/// half of a combined table) is the one actually used for both bishop and
/// rook generation, matching `pleco`'s own call site.
const SEEDS: [u64; 8] = [728, 10_316, 55_013, 32_803, 12_281, 15_100, 16_645, 255];

#[derive(Clone)]
struct SlidingTable {
    entries: [SlideEntry; 64],
    attacks: Vec<u64>,
}

#[derive(Copy, Clone)]
struct SlideEntry {
    offset: usize,
    mask: u64,
    magic: u64,
    shift: u32,
}

impl SlideEntry {
    const fn empty() -> Self {
        SlideEntry {
            offset: 0,
            mask: 0,
            magic: 0,
            shift: 0,
        }
    }
}

lazy_static! {
    static ref BISHOP_TABLE: SlidingTable = {
        debug!(piece = "bishop", "searching magic attack table");
        build_sliding_table(&B_DELTAS)
    };
    static ref ROOK_TABLE: SlidingTable = {
        debug!(piece = "rook", "searching magic attack table");
        build_sliding_table(&R_DELTAS)
    };
}

/// Forces both tables to build. Call once at process start if a predictable
/// first-call latency matters; otherwise the tables build lazily on first use.
pub fn init() {
    lazy_static::initialize(&BISHOP_TABLE);
    lazy_static::initialize(&ROOK_TABLE);
}

#[inline]
pub fn bishop_attacks(occupied: BitBoard, sq: SQ) -> BitBoard {
    BitBoard(index_table(&BISHOP_TABLE, occupied.0, sq))
}

#[inline]
pub fn rook_attacks(occupied: BitBoard, sq: SQ) -> BitBoard {
    BitBoard(index_table(&ROOK_TABLE, occupied.0, sq))
}

#[inline]
fn index_table(table: &SlidingTable, occupied: u64, sq: SQ) -> u64 {
    let entry = &table.entries[sq.0 as usize];
    let masked = occupied & entry.mask;
    let index = masked.wrapping_mul(entry.magic).wrapping_shr(entry.shift) as usize;
    table.attacks[entry.offset + index]
}

fn build_sliding_table(deltas: &[i8; 4]) -> SlidingTable {
    let mut entries = [SlideEntry::empty(); 64];
    let mut attacks: Vec<u64> = Vec::new();

    let mut occupancy = [0u64; 4096];
    let mut reference = [0u64; 4096];
    let mut age = [0i32; 4096];

    for s in 0u8..64 {
        let edges = ((RANK_1 | RANK_8) & !rank_bb(s)) | ((FILE_A | FILE_H) & !file_bb(s));
        let mask = sliding_attack(deltas, s, 0) & !edges;
        let shift = 64 - mask.count_ones();

        let mut size = 0usize;
        let mut b: u64 = 0;
        loop {
            occupancy[size] = b;
            reference[size] = sliding_attack(deltas, s, b);
            size += 1;
            b = b.wrapping_sub(mask) & mask;
            if b == 0 {
                break;
            }
        }

        let offset = attacks.len();
        attacks.resize(offset + size, 0);
        for slot in age.iter_mut().take(size) {
            *slot = 0;
        }

        let mut rng = PRNG::new(SEEDS[SQ(s).rank() as usize]);
        let mut current = 0i32;
        let mut magic;
        'search: loop {
            loop {
                magic = rng.sparse_rand();
                if (magic.wrapping_mul(mask)).wrapping_shr(56).count_ones() >= 6 {
                    break;
                }
            }
            current += 1;
            let mut i = 0usize;
            while i < size {
                let index = (occupancy[i] & mask)
                    .wrapping_mul(magic)
                    .wrapping_shr(shift) as usize;
                if age[index] < current {
                    age[index] = current;
                    attacks[offset + index] = reference[i];
                } else if attacks[offset + index] != reference[i] {
                    break;
                }
                i += 1;
            }
            if i >= size {
                break 'search;
            }
        }

        entries[s as usize] = SlideEntry {
            offset,
            mask,
            magic,
            shift,
        };
    }

    SlidingTable { entries, attacks }
}

/// Sliding attack in the four directions named by `deltas`, stopping at (and
/// including) the first occupied square in each direction.
fn sliding_attack(deltas: &[i8; 4], sq: u8, occupied: u64) -> u64 {
    let mut attack: u64 = 0;
    let square = sq as i16;
    for delta in deltas.iter() {
        let mut s = (square + *delta as i16) as u8;
        while s < 64 && SQ(s).distance(SQ(((s as i16) - (*delta as i16)) as u8)) == 1 {
            attack |= 1u64.wrapping_shl(s as u32);
            if occupied & 1u64.wrapping_shl(s as u32) != 0 {
                break;
            }
            s = ((s as i16) + (*delta as i16)) as u8;
        }
    }
    attack
}
