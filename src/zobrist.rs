//! Zobrist hashing: a fixed-seed set of pseudo-random keys XORed together to
//! produce a near-collision-free hash for a position, updated incrementally
//! on every make/unmake rather than recomputed from scratch.

use lazy_static::lazy_static;
use tracing::debug;

use crate::core::masks::{ALL_CASTLING_RIGHTS, FILE_CNT, PIECE_CNT, SQ_CNT};
use crate::core::sq::SQ;
use crate::core::{Piece, ALL_PLAYERS};
use crate::prng::PRNG;

/// Same fixed seed `pleco` uses, kept so the key stream (and thus
/// any externally-persisted hash) stays reproducible across rebuilds.
const ZOBRIST_SEED: u64 = 23_081;

struct ZobristKeys {
    piece_square: [[u64; PIECE_CNT]; SQ_CNT],
    en_passant: [u64; FILE_CNT],
    castle: [u64; ALL_CASTLING_RIGHTS],
    side: u64,
    no_pawns: u64,
}

lazy_static! {
    static ref KEYS: ZobristKeys = {
        debug!(seed = ZOBRIST_SEED, "generating zobrist keys");
        generate_keys()
    };
}

/// Forces key generation. Idempotent; first real lookup triggers the same
/// build if this is never called.
pub fn init() {
    lazy_static::initialize(&KEYS);
}

/// Zobrist key contribution of `piece` sitting on `sq`.
#[inline(always)]
pub fn z_square(sq: SQ, piece: Piece) -> u64 {
    debug_assert!(sq.is_okay());
    KEYS.piece_square[sq.0 as usize][piece as usize]
}

/// Zobrist key contribution of the `idx`-th (0-indexed) copy of a non-pawn
/// `piece` present on the board.
///
/// Reuses the piece-square table with the ordinal standing in for a square
/// index (ordinals never exceed 9, well inside the 64-entry domain): the
/// same trick Stockfish-family engines use so a second, dedicated table
/// isn't needed. `material_key` is the XOR of this over `0..count` for every
/// non-pawn piece type (pawns are excluded — pawn counts are already
/// tracked by `pawn_key`); adding a piece XORs in the slot for its new
/// count, removing one XORs out the slot for its old count. See
/// `Position::compute_keys_from_scratch`, which this must stay consistent
/// with.
#[inline(always)]
pub fn z_material(piece: Piece, idx: u8) -> u64 {
    debug_assert!(idx < 16);
    KEYS.piece_square[idx as usize][piece as usize]
}

/// Zobrist key contribution of an en-passant target on `sq`'s file.
#[inline(always)]
pub fn z_ep(sq: SQ) -> u64 {
    debug_assert!(sq.is_okay());
    KEYS.en_passant[sq.file().index() as usize]
}

/// Zobrist key contribution of a 4-bit castling-rights value (bit 0 = white
/// kingside, bit 1 = white queenside, bit 2 = black kingside, bit 3 = black
/// queenside — see [`crate::board::castle_rights`]).
#[inline(always)]
pub fn z_castle(castle: u8) -> u64 {
    debug_assert!((castle as usize) < ALL_CASTLING_RIGHTS);
    KEYS.castle[castle as usize]
}

/// Zobrist key contribution of the side to move being Black. XORed in
/// whenever the side to move changes; never applied for White.
#[inline(always)]
pub fn z_side() -> u64 {
    KEYS.side
}

/// Key used by the pawnless-endgame (KPK bitbase) path to distinguish a
/// position with no pawns at all.
#[inline(always)]
pub fn z_no_pawns() -> u64 {
    KEYS.no_pawns
}

fn generate_keys() -> ZobristKeys {
    let mut rng = PRNG::new(ZOBRIST_SEED);

    let mut piece_square = [[0u64; PIECE_CNT]; SQ_CNT];
    for square_keys in piece_square.iter_mut() {
        for (piece_idx, key) in square_keys.iter_mut().enumerate() {
            if piece_idx != 0 {
                *key = rng.rand();
            }
        }
    }

    let mut en_passant = [0u64; FILE_CNT];
    for key in en_passant.iter_mut() {
        *key = rng.rand();
    }

    // ALL_CASTLE = K_white ^ Q_white ^ K_black ^ Q_black: a combined-rights
    // value's key is the XOR of each single right's key, so it's built once
    // the single-bit keys are known rather than drawn fresh from the PRNG.
    let mut single_bit_keys = [0u64; 4];
    for key in single_bit_keys.iter_mut() {
        *key = rng.rand();
    }
    let mut castle = [0u64; ALL_CASTLING_RIGHTS];
    for (cr, key) in castle.iter_mut().enumerate() {
        let mut combined = 0u64;
        for (bit, single) in single_bit_keys.iter().enumerate() {
            if cr & (1 << bit) != 0 {
                combined ^= single;
            }
        }
        *key = combined;
    }

    let side = rng.rand();
    let no_pawns = rng.rand();

    debug_assert_eq!(ALL_PLAYERS.len(), 2);
    ZobristKeys {
        piece_square,
        en_passant,
        castle,
        side,
        no_pawns,
    }
}
