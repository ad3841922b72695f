//! Traits and dummy types used for compile-time mono-morphization of the
//! move generator.
//!
//! None of these should be used in place of the enums they mirror — their
//! only purpose is to let the compiler generate a separate, fully-inlined
//! copy of the move generator for each side to move, each stage, and each
//! legality mode, instead of branching on an enum value at runtime.

use super::bitboard::BitBoard;
use super::sq::SQ;
use super::{GenTypes, PieceType, Player};

/// Specific functions in relation to a certain player. Only used for
/// compile-time optimization through mono-morphism.
pub trait PlayerTrait {
    fn player() -> Player;
    fn opp_player() -> Player;
    fn player_idx() -> usize;

    fn down(sq: SQ) -> SQ;
    fn up(sq: SQ) -> SQ;
    fn left(sq: SQ) -> SQ;
    fn right(sq: SQ) -> SQ;
    fn down_left(sq: SQ) -> SQ;
    fn down_right(sq: SQ) -> SQ;
    fn up_left(sq: SQ) -> SQ;
    fn up_right(sq: SQ) -> SQ;

    fn shift_down(bb: BitBoard) -> BitBoard;
    fn shift_up(bb: BitBoard) -> BitBoard;
    fn shift_left(bb: BitBoard) -> BitBoard;
    fn shift_right(bb: BitBoard) -> BitBoard;
    fn shift_down_left(bb: BitBoard) -> BitBoard;
    fn shift_down_right(bb: BitBoard) -> BitBoard;
    fn shift_up_left(bb: BitBoard) -> BitBoard;
    fn shift_up_right(bb: BitBoard) -> BitBoard;
}

/// Dummy type representing `Player::White`.
pub struct WhiteType {}
/// Dummy type representing `Player::Black`.
pub struct BlackType {}

impl PlayerTrait for WhiteType {
    #[inline(always)]
    fn player() -> Player {
        Player::White
    }
    #[inline(always)]
    fn opp_player() -> Player {
        Player::Black
    }
    #[inline(always)]
    fn player_idx() -> usize {
        Player::White as usize
    }

    #[inline(always)]
    fn down(sq: SQ) -> SQ {
        sq - SQ(8)
    }
    #[inline(always)]
    fn up(sq: SQ) -> SQ {
        sq + SQ(8)
    }
    #[inline(always)]
    fn left(sq: SQ) -> SQ {
        sq - SQ(1)
    }
    #[inline(always)]
    fn right(sq: SQ) -> SQ {
        sq + SQ(1)
    }
    #[inline(always)]
    fn down_left(sq: SQ) -> SQ {
        sq - SQ(9)
    }
    #[inline(always)]
    fn down_right(sq: SQ) -> SQ {
        sq - SQ(7)
    }
    #[inline(always)]
    fn up_left(sq: SQ) -> SQ {
        sq + SQ(7)
    }
    #[inline(always)]
    fn up_right(sq: SQ) -> SQ {
        sq + SQ(9)
    }

    #[inline(always)]
    fn shift_down(bb: BitBoard) -> BitBoard {
        bb >> 8
    }
    #[inline(always)]
    fn shift_up(bb: BitBoard) -> BitBoard {
        bb << 8
    }
    #[inline(always)]
    fn shift_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) >> 1
    }
    #[inline(always)]
    fn shift_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) << 1
    }
    #[inline(always)]
    fn shift_down_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) >> 9
    }
    #[inline(always)]
    fn shift_down_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) >> 7
    }
    #[inline(always)]
    fn shift_up_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) << 7
    }
    #[inline(always)]
    fn shift_up_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) << 9
    }
}

impl PlayerTrait for BlackType {
    #[inline(always)]
    fn player() -> Player {
        Player::Black
    }
    #[inline(always)]
    fn opp_player() -> Player {
        Player::White
    }
    #[inline(always)]
    fn player_idx() -> usize {
        Player::Black as usize
    }

    #[inline(always)]
    fn down(sq: SQ) -> SQ {
        sq + SQ(8)
    }
    #[inline(always)]
    fn up(sq: SQ) -> SQ {
        sq - SQ(8)
    }
    #[inline(always)]
    fn left(sq: SQ) -> SQ {
        sq + SQ(1)
    }
    #[inline(always)]
    fn right(sq: SQ) -> SQ {
        sq - SQ(1)
    }
    #[inline(always)]
    fn down_left(sq: SQ) -> SQ {
        sq + SQ(9)
    }
    #[inline(always)]
    fn down_right(sq: SQ) -> SQ {
        sq + SQ(7)
    }
    #[inline(always)]
    fn up_left(sq: SQ) -> SQ {
        sq - SQ(7)
    }
    #[inline(always)]
    fn up_right(sq: SQ) -> SQ {
        sq - SQ(9)
    }

    #[inline(always)]
    fn shift_down(bb: BitBoard) -> BitBoard {
        bb << 8
    }
    #[inline(always)]
    fn shift_up(bb: BitBoard) -> BitBoard {
        bb >> 8
    }
    #[inline(always)]
    fn shift_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) << 1
    }
    #[inline(always)]
    fn shift_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) >> 1
    }
    #[inline(always)]
    fn shift_down_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) << 9
    }
    #[inline(always)]
    fn shift_down_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) << 7
    }
    #[inline(always)]
    fn shift_up_left(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_H) >> 7
    }
    #[inline(always)]
    fn shift_up_right(bb: BitBoard) -> BitBoard {
        (bb & !BitBoard::FILE_A) >> 9
    }
}

/// Specific functions in relation to a move-generation stage. Only used for
/// compile-time optimization through mono-morphism.
pub trait GenTypeTrait {
    fn gen_type() -> GenTypes;
}

pub struct CapturesGenType {}
pub struct QuietsGenType {}
pub struct QuietChecksGenType {}
pub struct EvasionsGenType {}
pub struct NonEvasionsGenType {}
pub struct LegalGenType {}

impl GenTypeTrait for CapturesGenType {
    #[inline(always)]
    fn gen_type() -> GenTypes {
        GenTypes::Captures
    }
}

impl GenTypeTrait for QuietsGenType {
    #[inline(always)]
    fn gen_type() -> GenTypes {
        GenTypes::Quiets
    }
}

impl GenTypeTrait for QuietChecksGenType {
    #[inline(always)]
    fn gen_type() -> GenTypes {
        GenTypes::QuietChecks
    }
}

impl GenTypeTrait for EvasionsGenType {
    #[inline(always)]
    fn gen_type() -> GenTypes {
        GenTypes::Evasions
    }
}

impl GenTypeTrait for NonEvasionsGenType {
    #[inline(always)]
    fn gen_type() -> GenTypes {
        GenTypes::NonEvasions
    }
}

impl GenTypeTrait for LegalGenType {
    #[inline(always)]
    fn gen_type() -> GenTypes {
        GenTypes::Legal
    }
}

/// Specific functions in relation to a piece type. Only used for
/// compile-time optimization through mono-morphism.
pub trait PieceTrait {
    fn piece_type() -> PieceType;
}

pub struct PawnType {}
pub struct KnightType {}
pub struct BishopType {}
pub struct RookType {}
pub struct QueenType {}
pub struct KingType {}

impl PieceTrait for PawnType {
    #[inline(always)]
    fn piece_type() -> PieceType {
        PieceType::P
    }
}

impl PieceTrait for KnightType {
    #[inline(always)]
    fn piece_type() -> PieceType {
        PieceType::N
    }
}

impl PieceTrait for BishopType {
    #[inline(always)]
    fn piece_type() -> PieceType {
        PieceType::B
    }
}

impl PieceTrait for RookType {
    #[inline(always)]
    fn piece_type() -> PieceType {
        PieceType::R
    }
}

impl PieceTrait for QueenType {
    #[inline(always)]
    fn piece_type() -> PieceType {
        PieceType::Q
    }
}

impl PieceTrait for KingType {
    #[inline(always)]
    fn piece_type() -> PieceType {
        PieceType::K
    }
}

/// Whether generated moves are filtered for full legality or left
/// pseudo-legal (movement-rule-valid, but possibly leaving the mover's own
/// king in check). Mono-morphized the same way as [`PlayerTrait`] so the
/// legality filter can be compiled away entirely for the pseudo-legal path.
pub trait Legality {
    const FILTER_LEGAL: bool;
}

/// Generated moves are guaranteed legal: the king is never left in check.
pub struct Legal {}
/// Generated moves respect movement rules only; the caller must filter.
pub struct PseudoLegal {}

impl Legality for Legal {
    const FILTER_LEGAL: bool = true;
}

impl Legality for PseudoLegal {
    const FILTER_LEGAL: bool = false;
}
