//! Staged move-generation correctness: each [`GenTypes`] variant returns
//! exactly the subset its name promises, checked against random legal
//! positions built with [`RandPosition`]. Also covers [`BitMove`]'s packed
//! encoding directly, independent of any position.

use plinth::core::piece_move::*;
use plinth::core::sq::SQ;
use plinth::core::*;
use plinth::position::RandPosition;

#[test]
fn captures_are_all_actually_captures() {
    let positions = RandPosition::default().pseudo_random(11).no_check().many(9);
    for pos in &positions {
        for m in pos.generate_moves_of_type(GenTypes::Captures).iter() {
            if m.is_promo() {
                continue;
            }
            assert!(m.is_capture());
            if m.is_en_passant() {
                assert!(pos.ep_square().is_okay());
            } else {
                assert!(pos.piece_at(m.get_dest()) != Piece::None);
            }
        }
    }
}

#[test]
fn quiets_never_capture() {
    let positions = RandPosition::default().pseudo_random(13).no_check().many(6);
    for pos in &positions {
        for m in pos.generate_moves_of_type(GenTypes::Quiets).iter() {
            if m.is_promo() || m.is_castle() {
                continue;
            }
            assert!(!m.is_capture());
            assert_eq!(pos.piece_at(m.get_dest()), Piece::None);
        }
    }
}

#[test]
fn quiet_checks_generate_without_panicking() {
    let positions = RandPosition::default().pseudo_random(17).no_check().many(5);
    for pos in &positions {
        for m in pos.generate_moves_of_type(GenTypes::QuietChecks).iter() {
            assert!(!m.is_capture());
        }
    }
}

#[test]
fn legal_moves_are_exactly_captures_plus_quiets_when_not_in_check() {
    let positions = RandPosition::default().pseudo_random(19).no_check().many(8);
    for pos in &positions {
        let mut legal: Vec<BitMove> = pos.generate_moves().vec();
        legal.sort_by_key(|m| m.get_raw());
        let mut split: Vec<BitMove> = pos
            .generate_moves_of_type(GenTypes::Captures)
            .iter()
            .chain(pos.generate_moves_of_type(GenTypes::Quiets).iter())
            .copied()
            .collect();
        split.sort_by_key(|m| m.get_raw());
        assert_eq!(legal, split);
    }
}

#[test]
fn evasions_match_legal_moves_while_in_check() {
    let positions = RandPosition::default().pseudo_random(23).in_check().many(8);
    for pos in &positions {
        let mut legal: Vec<BitMove> = pos.generate_moves().vec();
        legal.sort_by_key(|m| m.get_raw());
        let mut evasions: Vec<BitMove> = pos.generate_moves_of_type(GenTypes::Evasions).vec();
        evasions.sort_by_key(|m| m.get_raw());
        assert_eq!(legal, evasions);
    }
}

#[test]
fn start_pos_has_the_textbook_twenty_moves() {
    let pos = plinth::Position::start_pos();
    let moves = pos.generate_moves();
    assert_eq!(moves.len(), (8 * 2) + (2 * 2));
}

// ----- BitMove encoding, independent of any position -----

#[test]
fn bit_move_position_from_raw_bits() {
    let bits: u16 = 0b0000111011010000;
    let bit_move = BitMove::new(bits);
    assert_eq!(bit_move.get_src().0, 0b010000);
    assert_eq!(bit_move.get_dest().0, 0b111011);
    assert!(bit_move.is_quiet_move());
    assert!(!bit_move.is_promo());
    assert!(!bit_move.is_capture());
    assert!(!bit_move.is_castle());
    assert!(!bit_move.is_king_castle());
    assert!(!bit_move.is_queen_castle());
    assert!(!bit_move.is_double_push().0);
    assert!(!bit_move.is_en_passant());
}

#[test]
fn move_flag_permutations_round_trip() {
    for move_flag in all_move_flags() {
        let move_info = BitMove::init(PreMoveInfo {
            src: SQ(9),
            dst: SQ(42),
            flags: move_flag,
        });
        assert_eq!(move_flag == MoveFlag::QuietMove, move_info.is_quiet_move());
        assert_eq!(
            move_flag == MoveFlag::Castle { king_side: true }
                || move_flag == MoveFlag::Castle { king_side: false },
            move_info.is_castle()
        );
        assert_eq!(move_flag == MoveFlag::Castle { king_side: true }, move_info.is_king_castle());
        assert_eq!(move_flag == MoveFlag::Castle { king_side: false }, move_info.is_queen_castle());
        assert_eq!(move_flag == MoveFlag::DoublePawnPush, move_info.is_double_push().0);
        assert_eq!(move_flag == MoveFlag::Capture { ep_capture: true }, move_info.is_en_passant());
    }
}

#[test]
fn promotions_encode_capture_flag_and_piece_type() {
    for (prom, capture) in [
        (PieceType::N, true),
        (PieceType::B, true),
        (PieceType::R, true),
        (PieceType::Q, true),
        (PieceType::N, false),
        (PieceType::B, false),
        (PieceType::R, false),
        (PieceType::Q, false),
    ] {
        let move_info = BitMove::init(PreMoveInfo {
            src: SQ(9),
            dst: SQ(42),
            flags: MoveFlag::Promotion { capture, prom },
        });
        assert_eq!(move_info.is_capture(), capture);
        assert!(move_info.is_promo());
        assert_eq!(move_info.promo_piece(), prom);
    }
}

fn all_move_flags() -> Vec<MoveFlag> {
    vec![
        MoveFlag::Promotion { capture: true, prom: PieceType::N },
        MoveFlag::Promotion { capture: true, prom: PieceType::B },
        MoveFlag::Promotion { capture: true, prom: PieceType::R },
        MoveFlag::Promotion { capture: true, prom: PieceType::Q },
        MoveFlag::Promotion { capture: false, prom: PieceType::N },
        MoveFlag::Promotion { capture: false, prom: PieceType::B },
        MoveFlag::Promotion { capture: false, prom: PieceType::R },
        MoveFlag::Promotion { capture: false, prom: PieceType::Q },
        MoveFlag::Castle { king_side: true },
        MoveFlag::Castle { king_side: false },
        MoveFlag::Capture { ep_capture: true },
        MoveFlag::Capture { ep_capture: false },
        MoveFlag::DoublePawnPush,
        MoveFlag::QuietMove,
    ]
}
