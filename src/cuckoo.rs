//! Cuckoo cycle detector: a double-hash table of every reversible
//! single-piece move, used to answer "is a draw forceable by repetition on
//! the next move?" in O(1) rather than by walking the whole state stack.
//!
//! Every non-pawn piece move is its own inverse (a knight on `c3` that can
//! reach `e4` can also go back from `e4` to `c3`), so the Zobrist key delta
//! of playing such a move and then playing it again is the identity — which
//! means two positions a reversible move apart differ by exactly that move's
//! `z_square(from) ^ z_square(to) ^ z_side()`. Building a hash set of every
//! such delta lets [`crate::position::Position::has_upcoming_repetition`]
//! check a candidate delta against the table instead of replaying moves.

use lazy_static::lazy_static;
use tracing::debug;

use crate::core::bitboard::BitBoard;
use crate::core::piece_move::BitMove;
use crate::core::sq::SQ;
use crate::core::{Piece, PieceType, ALL_PLAYERS};
use crate::magic;
use crate::zobrist;

/// Number of slots in each of the table's two hash functions' domain. Kept a
/// power of two so the hash functions are plain masks.
const TABLE_SIZE: usize = 8192;

/// Piece types that can make a reversible move. Pawns can't (pushes and
/// captures are never their own inverse) and the king/rook's castling moves
/// aren't single-piece moves, so they're excluded here and handled by
/// ordinary repetition detection instead.
const REVERSIBLE_PIECE_TYPES: [PieceType; 5] = [
    PieceType::N,
    PieceType::B,
    PieceType::R,
    PieceType::Q,
    PieceType::K,
];

struct CuckooTable {
    keys: [u64; TABLE_SIZE],
    moves: [BitMove; TABLE_SIZE],
    count: usize,
}

lazy_static! {
    static ref TABLE: CuckooTable = {
        debug!("building cuckoo cycle-detection table");
        build_table()
    };
}

/// Forces construction of the cuckoo table. Idempotent.
pub fn init() {
    lazy_static::initialize(&TABLE);
}

#[inline(always)]
fn h1(key: u64) -> usize {
    (key & (TABLE_SIZE as u64 - 1)) as usize
}

#[inline(always)]
fn h2(key: u64) -> usize {
    ((key >> 16) & (TABLE_SIZE as u64 - 1)) as usize
}

/// The number of (piece, from, to) reversible-move entries the table holds.
pub fn entry_count() -> usize {
    TABLE.count
}

/// Looks up `key` (the Zobrist delta between two positions one reversible
/// move apart) in the table. Returns the quiet move responsible for that
/// delta, if any — there is no guarantee the move is legal or even possible
/// in the *current* position; the caller (`Position::has_upcoming_repetition`)
/// still has to check that both squares are actually in the right state.
pub fn probe(key: u64) -> Option<BitMove> {
    let i1 = h1(key);
    if TABLE.keys[i1] == key {
        return Some(TABLE.moves[i1]);
    }
    let i2 = h2(key);
    if TABLE.keys[i2] == key {
        return Some(TABLE.moves[i2]);
    }
    None
}

fn pseudo_attacks(pt: PieceType, sq: SQ) -> BitBoard {
    match pt {
        PieceType::N => magic::knight_moves(sq),
        PieceType::B => magic::bishop_attacks(BitBoard::EMPTY, sq),
        PieceType::R => magic::rook_attacks(BitBoard::EMPTY, sq),
        PieceType::Q => magic::queen_attacks(BitBoard::EMPTY, sq),
        PieceType::K => magic::king_moves(sq),
        _ => unreachable!("pawns have no reversible single-piece move"),
    }
}

fn build_table() -> CuckooTable {
    let mut keys = [0u64; TABLE_SIZE];
    let mut moves = [BitMove::null(); TABLE_SIZE];
    let mut count = 0usize;

    for &player in &ALL_PLAYERS {
        for &pt in &REVERSIBLE_PIECE_TYPES {
            let piece = Piece::make_lossy(player, pt);
            for s1 in 0u8..64 {
                let sq1 = SQ(s1);
                let attacks = pseudo_attacks(pt, sq1);
                if attacks.is_empty() {
                    continue;
                }
                for s2 in (s1 + 1)..64 {
                    let sq2 = SQ(s2);
                    if (attacks & sq2.to_bb()).is_empty() {
                        continue;
                    }
                    let mut key =
                        zobrist::z_square(sq1, piece) ^ zobrist::z_square(sq2, piece) ^ zobrist::z_side();
                    let mut mv = BitMove::make_quiet(sq1, sq2);

                    let mut i = h1(key);
                    loop {
                        std::mem::swap(&mut keys[i], &mut key);
                        std::mem::swap(&mut moves[i], &mut mv);
                        if mv.is_null() {
                            break;
                        }
                        i = if i == h1(key) { h2(key) } else { h1(key) };
                    }
                    count += 1;
                }
            }
        }
    }

    CuckooTable { keys, moves, count }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_count_matches_reference() {
        assert_eq!(entry_count(), 3668);
    }

    #[test]
    fn knight_reversible_delta_round_trips() {
        zobrist::init();
        let piece = Piece::WhiteKnight;
        let key = zobrist::z_square(SQ::B1, piece) ^ zobrist::z_square(SQ::C3, piece) ^ zobrist::z_side();
        let mv = probe(key).expect("b1-c3 is a legal knight move, must be in the table");
        let (a, b) = (mv.get_src(), mv.get_dest());
        assert!((a == SQ::B1 && b == SQ::C3) || (a == SQ::C3 && b == SQ::B1));
    }

    #[test]
    fn unrelated_key_misses() {
        zobrist::init();
        assert!(probe(0xDEAD_BEEF_0000_0001).is_none());
    }
}
