//! Per-ply incremental state: everything about a position that changes on
//! make/unmake but isn't piece placement itself.
//!
//! `Position` keeps these in a `Vec`, one pushed per ply played. Unmake pops
//! the most recent entry and restores it as current — the same LIFO
//! discipline `pleco`'s `Arc`-linked `BoardState` chain gives, without
//! needing reference counting: nothing else ever points into the middle of
//! the stack, so indices (or, here, a plain `Vec`) are enough.

use crate::board::castle_rights::Castling;
use crate::core::bitboard::BitBoard;
use crate::core::masks::PIECE_TYPE_CNT;
use crate::core::sq::{SQ, NO_SQ};
use crate::core::Piece;

/// A single ply's worth of incremental position state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub position_key: u64,
    pub pawn_key: u64,
    pub material_key: u64,
    pub castling: Castling,
    pub ep_square: SQ,
    pub rule50: u8,
    pub plies_from_null: u16,
    pub checkers: BitBoard,
    pub blockers_for_king: [BitBoard; 2],
    pub pinners: [BitBoard; 2],
    /// Squares from which a piece of a given type would check the enemy
    /// king, indexed by `PieceType as usize` (`None`/`All` entries unused).
    pub checked_squares: [BitBoard; PIECE_TYPE_CNT],
    pub captured_piece: Piece,
    /// 0 if this position hasn't repeated; otherwise `±i`, where `i` is the
    /// ply distance to the equal-key predecessor and the sign is inherited
    /// from that predecessor's own `repetition` field (see
    /// [`crate::position::Position::update_repetition`]).
    pub repetition: i16,
}

impl State {
    /// A blank record suitable only as the very first entry in a fresh
    /// position's state stack — every incremental field is filled in by
    /// [`crate::position::Position::set_state_from_scratch`] immediately
    /// after construction.
    pub fn blank() -> State {
        State {
            position_key: 0,
            pawn_key: 0,
            material_key: 0,
            castling: Castling::empty_set(),
            ep_square: NO_SQ,
            rule50: 0,
            plies_from_null: 0,
            checkers: BitBoard::EMPTY,
            blockers_for_king: [BitBoard::EMPTY; 2],
            pinners: [BitBoard::EMPTY; 2],
            checked_squares: [BitBoard::EMPTY; PIECE_TYPE_CNT],
            captured_piece: Piece::None,
            repetition: 0,
        }
    }
}
