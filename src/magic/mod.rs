//! Attack tables: magic bitboards for sliders (bishop/rook; queen is their
//! union), precomputed leaper tables (knight/king/pawn), and the
//! square-relationship tables (`distance`, `between`, `line`, rings, and the
//! forward-file/passed-pawn spans `Position` uses for pawn-structure queries).
//!
//! Every table here is process-wide and immutable once built — there is no
//! per-position or per-thread state. [`init`] forces eager construction;
//! without calling it, each table builds lazily on first access.

pub mod leapers;
pub mod sliders;

pub use leapers::{
    adjacent_file, aligned, between_bb, distance_of_sqs, forward_file_bb, forward_rank_bb,
    king_moves, knight_moves, line_bb, passed_pawn_mask, pawn_attacks_from, pawn_attacks_span,
    ring_distance,
};
pub use sliders::{bishop_attacks, rook_attacks};

use crate::core::bitboard::BitBoard;
use crate::core::sq::SQ;

/// Forces construction of every attack table. Idempotent; safe to call from
/// multiple threads or not at all (first real use triggers the same build).
pub fn init() {
    sliders::init();
    leapers::init();
}

/// Queen attacks: the union of bishop and rook attacks from `sq`.
#[inline(always)]
pub fn queen_attacks(occupied: BitBoard, sq: SQ) -> BitBoard {
    BitBoard(bishop_attacks(occupied, sq).0 | rook_attacks(occupied, sq).0)
}
