//! Staged pseudo-legal move generation, filtered down to fully legal moves.
//!
//! Mirrors `pleco`'s `InnerMoveGen` structure: a generic function
//! mono-morphized over the side to move (`WhiteType`/`BlackType`) so the
//! compiler builds a separate, branch-free copy of the generator for each
//! color, rather than checking `self.turn` on every piece. Writes go through
//! the safe [`MoveList::push`] instead of `pleco`'s raw-pointer buffer.

use crate::core::bitboard::BitBoard;
use crate::core::mono_traits::{
    BishopType, BlackType, KingType, KnightType, Legality, PieceTrait, PlayerTrait, QueenType,
    RookType, WhiteType,
};
use crate::core::move_list::MoveList;
use crate::core::piece_move::{BitMove, MoveFlag, PreMoveInfo};
use crate::core::sq::SQ;
use crate::core::{CastleType, GenTypes, Piece, PieceType, Player, Rank};
use crate::magic;

use super::Position;

/// Generates moves of `gen_type` for `pos`, filtering to legal moves
/// whenever `L::FILTER_LEGAL` is set.
pub fn generate<L: Legality>(pos: &Position, gen_type: GenTypes) -> MoveList {
    match pos.turn() {
        Player::White => generate_helper::<WhiteType, L>(pos, gen_type),
        Player::Black => generate_helper::<BlackType, L>(pos, gen_type),
    }
}

fn generate_helper<P: PlayerTrait, L: Legality>(pos: &Position, gen_type: GenTypes) -> MoveList {
    let mut list = MoveList::default();
    let in_check = pos.in_check();

    let effective_type = match gen_type {
        GenTypes::Legal | GenTypes::All => {
            if in_check {
                GenTypes::Evasions
            } else {
                GenTypes::NonEvasions
            }
        }
        other => other,
    };

    match effective_type {
        GenTypes::Evasions => generate_evasions::<P>(pos, &mut list),
        GenTypes::QuietChecks => generate_quiet_checks::<P>(pos, &mut list),
        other => generate_normal::<P>(pos, other, &mut list),
    }

    if L::FILTER_LEGAL {
        list.iter().copied().filter(|m| pos.legal_move(*m)).collect()
    } else {
        list
    }
}

/// Target-square semantics shared by every non-pawn piece and by
/// [`generate_pawn_moves`]: `target` is the full set of allowed destination
/// squares for this call, already narrowed for `Captures`/`Quiets`/etc, so
/// individual generators never need to special-case the gen type themselves.
fn target_squares_for<P: PlayerTrait>(pos: &Position, gen_type: GenTypes) -> BitBoard {
    let us = P::player();
    let them = P::opp_player();
    match gen_type {
        GenTypes::Captures => pos.occupied_by(them),
        GenTypes::Quiets => !pos.occupied(),
        _ => !pos.occupied_by(us),
    }
}

fn generate_normal<P: PlayerTrait>(pos: &Position, gen_type: GenTypes, list: &mut MoveList) {
    let us = P::player();
    let target = target_squares_for::<P>(pos, gen_type);

    generate_pawn_moves::<P>(pos, list, target);
    moves_per_piece::<P, KnightType>(pos, list, target);
    moves_per_piece::<P, BishopType>(pos, list, target);
    moves_per_piece::<P, RookType>(pos, list, target);
    moves_per_piece::<P, QueenType>(pos, list, target);
    moves_per_piece::<P, KingType>(pos, list, target);

    if matches!(gen_type, GenTypes::NonEvasions | GenTypes::Quiets) {
        generate_castling::<P>(pos, list);
    }
    let _ = us;
}

/// King in check: only captures of the checker, blocks of a single-checker
/// sliding ray, or king moves off the attacked squares, are pseudo-legal.
fn generate_evasions<P: PlayerTrait>(pos: &Position, list: &mut MoveList) {
    let us = P::player();
    let ksq = pos.king_sq(us);
    let checkers = pos.checkers();
    debug_assert!(checkers.is_not_empty());

    // Squares a sliding checker would still attack through if the king
    // simply stepped back along the same ray — those don't escape check.
    let mut slider_ray_squares = BitBoard::EMPTY;
    let mut sliders = checkers;
    while let Some(checker_sq) = sliders.pop_some_lsb() {
        if matches!(pos.piece_at(checker_sq).type_of(), PieceType::B | PieceType::R | PieceType::Q) {
            slider_ray_squares |= magic::line_bb(checker_sq, ksq) & !checker_sq.to_bb() & !ksq.to_bb();
        }
    }

    let king_targets = !pos.occupied_by(us) & !slider_ray_squares;
    moves_per_piece_for_sq::<KingType>(pos, list, ksq, king_targets);

    if checkers.more_than_one() {
        return;
    }

    let checker_sq = checkers.to_sq();
    let target = magic::between_bb(checker_sq, ksq) | checker_sq.to_bb();

    generate_pawn_moves::<P>(pos, list, target);
    moves_per_piece::<P, KnightType>(pos, list, target);
    moves_per_piece::<P, BishopType>(pos, list, target);
    moves_per_piece::<P, RookType>(pos, list, target);
    moves_per_piece::<P, QueenType>(pos, list, target);
}

/// Not currently in check: every quiet move (by any piece, including pawns)
/// that itself delivers check, found by generating quiet moves and keeping
/// the ones [`Position::gives_check`] confirms.
fn generate_quiet_checks<P: PlayerTrait>(pos: &Position, list: &mut MoveList) {
    let mut quiets = MoveList::default();
    generate_normal::<P>(pos, GenTypes::Quiets, &mut quiets);
    for m in quiets.iter() {
        if pos.gives_check(*m) {
            list.push(*m);
        }
    }
}

fn piece_attacks(pt: PieceType, sq: SQ, occupied: BitBoard) -> BitBoard {
    match pt {
        PieceType::N => magic::knight_moves(sq),
        PieceType::B => magic::bishop_attacks(occupied, sq),
        PieceType::R => magic::rook_attacks(occupied, sq),
        PieceType::Q => magic::queen_attacks(occupied, sq),
        PieceType::K => magic::king_moves(sq),
        _ => BitBoard::EMPTY,
    }
}

fn moves_per_piece<P: PlayerTrait, Pt: PieceTrait>(pos: &Position, list: &mut MoveList, target: BitBoard) {
    let mut bb = pos.piece_bb(P::player(), Pt::piece_type());
    while let Some(from) = bb.pop_some_lsb() {
        moves_per_piece_for_sq::<Pt>(pos, list, from, target);
    }
}

fn moves_per_piece_for_sq<Pt: PieceTrait>(pos: &Position, list: &mut MoveList, from: SQ, target: BitBoard) {
    let mut attacks = piece_attacks(Pt::piece_type(), from, pos.occupied()) & target;
    while let Some(to) = attacks.pop_some_lsb() {
        if pos.piece_at(to) == Piece::None {
            list.push(BitMove::make_quiet(from, to));
        } else {
            list.push(BitMove::make_capture(from, to));
        }
    }
}

fn generate_pawn_moves<P: PlayerTrait>(pos: &Position, list: &mut MoveList, target: BitBoard) {
    let us = P::player();
    let them = P::opp_player();
    let rank_7 = us.relative_rank(Rank::R7).bb();
    let rank_3 = us.relative_rank(Rank::R3).bb();

    let pawns = pos.piece_bb(us, PieceType::P);
    let pawns_on_7 = pawns & rank_7;
    let pawns_not_on_7 = pawns & !rank_7;

    let empty = !pos.occupied();
    let enemies = pos.occupied_by(them);

    let push_1 = P::shift_up(pawns_not_on_7) & empty;
    let push_2 = P::shift_up(push_1 & rank_3) & empty;

    let mut single = push_1 & target;
    while let Some(to) = single.pop_some_lsb() {
        list.push(BitMove::make_quiet(P::down(to), to));
    }
    let mut double = push_2 & target;
    while let Some(to) = double.pop_some_lsb() {
        list.push(BitMove::make_pawn_push(P::down(P::down(to)), to));
    }

    if pawns_on_7.is_not_empty() {
        generate_promotions::<P>(pos, list, pawns_on_7, target);
    }

    let mut left_caps = P::shift_up_left(pawns_not_on_7) & enemies & target;
    while let Some(to) = left_caps.pop_some_lsb() {
        list.push(BitMove::make_capture(P::down_right(to), to));
    }
    let mut right_caps = P::shift_up_right(pawns_not_on_7) & enemies & target;
    while let Some(to) = right_caps.pop_some_lsb() {
        list.push(BitMove::make_capture(P::down_left(to), to));
    }

    let ep_sq = pos.ep_square();
    if ep_sq.is_okay() {
        let captured_sq = SQ((ep_sq.0 as i8).wrapping_sub(us.pawn_push()) as u8);
        if (target & (ep_sq.to_bb() | captured_sq.to_bb())).is_not_empty() {
            let mut attackers = magic::pawn_attacks_from(ep_sq, them) & pawns_not_on_7;
            while let Some(from) = attackers.pop_some_lsb() {
                list.push(BitMove::make_ep_capture(from, ep_sq));
            }
        }
    }
}

fn generate_promotions<P: PlayerTrait>(pos: &Position, list: &mut MoveList, pawns_on_7: BitBoard, target: BitBoard) {
    let them = P::opp_player();
    let empty = !pos.occupied();
    let enemies = pos.occupied_by(them);

    let mut push = P::shift_up(pawns_on_7) & empty & target;
    while let Some(to) = push.pop_some_lsb() {
        push_all_promos(list, P::down(to), to, false);
    }
    let mut left = P::shift_up_left(pawns_on_7) & enemies & target;
    while let Some(to) = left.pop_some_lsb() {
        push_all_promos(list, P::down_right(to), to, true);
    }
    let mut right = P::shift_up_right(pawns_on_7) & enemies & target;
    while let Some(to) = right.pop_some_lsb() {
        push_all_promos(list, P::down_left(to), to, true);
    }
}

fn push_all_promos(list: &mut MoveList, from: SQ, to: SQ, capture: bool) {
    for &prom in &[PieceType::Q, PieceType::R, PieceType::B, PieceType::N] {
        list.push(BitMove::init(PreMoveInfo {
            src: from,
            dst: to,
            flags: MoveFlag::Promotion { capture, prom },
        }));
    }
}

fn generate_castling<P: PlayerTrait>(pos: &Position, list: &mut MoveList) {
    let us = P::player();
    if pos.in_check() {
        return;
    }
    for &side in &[CastleType::KingSide, CastleType::QueenSide] {
        if !pos.can_castle(us, side) {
            continue;
        }
        let Some(rook_from) = pos.castling_paths().rook_start(us, side) else {
            continue;
        };
        if !castling_side_clear_and_safe(pos, us, side) {
            continue;
        }
        let king_from = pos.castling_paths().king_start(us);
        list.push(BitMove::init(PreMoveInfo {
            src: king_from,
            dst: rook_from,
            flags: MoveFlag::Castle {
                king_side: side == CastleType::KingSide,
            },
        }));
    }
}

fn castling_side_clear_and_safe(pos: &Position, us: Player, side: CastleType) -> bool {
    let paths = pos.castling_paths();
    for sq in paths.path_squares(us, side) {
        if !pos.board().is_empty(sq) {
            return false;
        }
    }
    let them = us.other_player();
    for sq in paths.king_path_squares(us, side) {
        if (pos.attackers_to(sq, pos.occupied()) & pos.occupied_by(them)).is_not_empty() {
            return false;
        }
    }
    true
}
