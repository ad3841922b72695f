//! `Position`: a [`crate::board::Board`] plus the incremental state stack,
//! side to move, ply counter and Chess960 castling metadata needed to make
//! and unmake moves, detect check, and generate legal moves.
//!
//! This is the crate's central entity — everything else (perft, the cuckoo
//! detector, FEN I/O, the transposition table's key) is a client of it.

pub mod fen;
pub mod movegen;
pub mod perft;
mod rand_position;
mod state;

use tracing::trace;

use crate::board::castle_rights::{Castling, CastlingPaths};
use crate::board::Board;
use crate::core::bitboard::BitBoard;
use crate::core::masks::PIECE_TYPE_CNT;
use crate::core::mono_traits::{Legal, PseudoLegal};
use crate::core::move_list::MoveList;
use crate::core::piece_move::{BitMove, MoveType};
use crate::core::sq::{SQ, NO_SQ};
use crate::core::{CastleType, GenTypes, Piece, PieceType, Player, Rank, ALL_PLAYERS};
use crate::error::MoveError;
use crate::magic;
use crate::zobrist;

pub use self::rand_position::RandPosition;
pub use self::state::State;

/// The central position-representation entity: owns a [`Board`], the
/// per-ply [`State`] stack, and everything else needed to make/unmake moves
/// and generate legal ones.
///
/// Not safe for concurrent mutation — each search worker (or client thread)
/// owns its own `Position`, per §5 of the design this crate follows.
#[derive(Clone, Debug)]
pub struct Position {
    board: Board,
    states: Vec<State>,
    turn: Player,
    ply: u16,
    chess960: bool,
    castling_paths: CastlingPaths,
}

impl Position {
    /// The standard chess starting position.
    pub fn start_pos() -> Position {
        magic::init();
        zobrist::init();
        let mut pos = Position {
            board: Board::start_pos(),
            states: vec![State::blank()],
            turn: Player::White,
            ply: 0,
            chess960: false,
            castling_paths: CastlingPaths::standard(),
        };
        pos.cur_state_mut().castling = Castling::all_castling();
        pos.set_state_from_scratch();
        pos
    }

    /// An empty board with no pieces, white to move, no castling rights.
    /// Useful as a base for hand-constructing test positions.
    pub fn blank() -> Position {
        magic::init();
        zobrist::init();
        let mut pos = Position {
            board: Board::blank(),
            states: vec![State::blank()],
            turn: Player::White,
            ply: 0,
            chess960: false,
            castling_paths: CastlingPaths::standard(),
        };
        pos.set_state_from_scratch();
        pos
    }

    #[inline]
    fn cur_state(&self) -> &State {
        self.states.last().expect("state stack is never empty")
    }

    #[inline]
    fn cur_state_mut(&mut self) -> &mut State {
        self.states.last_mut().expect("state stack is never empty")
    }

    // ----- basic accessors -----

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn turn(&self) -> Player {
        self.turn
    }

    #[inline]
    pub fn ply(&self) -> u16 {
        self.ply
    }

    #[inline]
    pub fn is_chess960(&self) -> bool {
        self.chess960
    }

    #[inline]
    pub fn castling_paths(&self) -> &CastlingPaths {
        &self.castling_paths
    }

    #[inline]
    pub fn zobrist(&self) -> u64 {
        self.cur_state().position_key
    }

    #[inline]
    pub fn pawn_key(&self) -> u64 {
        self.cur_state().pawn_key
    }

    #[inline]
    pub fn material_key(&self) -> u64 {
        self.cur_state().material_key
    }

    #[inline]
    pub fn ep_square(&self) -> SQ {
        self.cur_state().ep_square
    }

    #[inline]
    pub fn rule50(&self) -> u8 {
        self.cur_state().rule50
    }

    #[inline]
    pub fn plies_from_null(&self) -> u16 {
        self.cur_state().plies_from_null
    }

    #[inline]
    pub fn king_sq(&self, player: Player) -> SQ {
        self.board.king_sq(player)
    }

    #[inline]
    pub fn piece_at(&self, sq: SQ) -> Piece {
        self.board.piece_at(sq)
    }

    #[inline]
    pub fn occupied(&self) -> BitBoard {
        self.board.occupied()
    }

    #[inline]
    pub fn occupied_by(&self, player: Player) -> BitBoard {
        self.board.occupied_by(player)
    }

    #[inline]
    pub fn piece_bb(&self, player: Player, piece_type: PieceType) -> BitBoard {
        self.board.piece_bb(player, piece_type)
    }

    #[inline]
    pub fn piece_bb_both_players(&self, piece_type: PieceType) -> BitBoard {
        self.board.piece_bb_both_players(piece_type)
    }

    fn sliding_piece_bb(&self, player: Player) -> BitBoard {
        self.board.piece_bb(player, PieceType::R) | self.board.piece_bb(player, PieceType::Q)
    }

    fn diagonal_piece_bb(&self, player: Player) -> BitBoard {
        self.board.piece_bb(player, PieceType::B) | self.board.piece_bb(player, PieceType::Q)
    }

    #[inline]
    pub fn captured_piece(&self) -> Piece {
        self.cur_state().captured_piece
    }

    #[inline]
    pub fn can_castle(&self, player: Player, side: CastleType) -> bool {
        self.cur_state().castling.castle_rights(player, side)
    }

    #[inline]
    pub fn castling_rights(&self) -> Castling {
        self.cur_state().castling
    }

    // ----- check / pin queries -----

    #[inline]
    pub fn checkers(&self) -> BitBoard {
        self.cur_state().checkers
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        self.checkers().is_not_empty()
    }

    /// Mate is not a stored field: it's `in_check() && generate(Legal).is_empty()`.
    pub fn in_checkmate(&self) -> bool {
        self.in_check() && self.generate_moves().is_empty()
    }

    /// Stalemate is not a stored field either: no legal moves, not in check.
    pub fn in_stalemate(&self) -> bool {
        !self.in_check() && self.generate_moves().is_empty()
    }

    /// Pieces of `player` that are pinned to `player`'s own king.
    #[inline]
    pub fn pinned_pieces(&self, player: Player) -> BitBoard {
        self.cur_state().blockers_for_king[player as usize] & self.board.occupied_by(player)
    }

    /// Pieces of the side to move that are blocking a check on the *other*
    /// king — moving one discovers a check. Used by quiet-check generation.
    #[inline]
    pub fn discovered_check_candidates(&self) -> BitBoard {
        self.cur_state().blockers_for_king[self.turn.other_player() as usize]
            & self.board.occupied_by(self.turn)
    }

    /// Every piece (either color) that attacks/defends `sq` given `occupied`.
    pub fn attackers_to(&self, sq: SQ, occupied: BitBoard) -> BitBoard {
        (magic::pawn_attacks_from(sq, Player::Black) & self.board.piece_bb(Player::White, PieceType::P))
            | (magic::pawn_attacks_from(sq, Player::White) & self.board.piece_bb(Player::Black, PieceType::P))
            | (magic::king_moves(sq) & self.board.piece_bb_both_players(PieceType::K))
            | (magic::knight_moves(sq) & self.board.piece_bb_both_players(PieceType::N))
            | (magic::rook_attacks(occupied, sq)
                & (self.sliding_piece_bb(Player::White) | self.sliding_piece_bb(Player::Black)))
            | (magic::bishop_attacks(occupied, sq)
                & (self.diagonal_piece_bb(Player::White) | self.diagonal_piece_bb(Player::Black)))
    }

    /// Blockers (of either color) standing between `sliders` and `sq`, one
    /// square deep, plus (via `pinners`) which of `sliders` is doing the
    /// pinning. A blocker only counts as *pinned* (as opposed to merely
    /// discovered-check material) when it belongs to the opponent of
    /// whichever side `sliders` belongs to — the caller discriminates that
    /// by checking who owns the blocker relative to `sq`'s occupant.
    fn slider_blockers(&self, sliders: BitBoard, sq: SQ, pinners: &mut BitBoard) -> BitBoard {
        let mut result = BitBoard::EMPTY;
        *pinners = BitBoard::EMPTY;
        let occupied = self.board.occupied();

        let mut snipers = sliders
            & ((magic::rook_attacks(BitBoard::EMPTY, sq)
                & (self.board.piece_bb_both_players(PieceType::R) | self.board.piece_bb_both_players(PieceType::Q)))
                | (magic::bishop_attacks(BitBoard::EMPTY, sq)
                    & (self.board.piece_bb_both_players(PieceType::B) | self.board.piece_bb_both_players(PieceType::Q))));

        while let Some(sniper_sq) = snipers.pop_some_lsb() {
            let between = magic::between_bb(sq, sniper_sq) & occupied;
            if !between.more_than_one() {
                result |= between;
                if let Some(owner) = self.board.piece_at(sq).player() {
                    if (between & self.board.occupied_by(owner)).is_not_empty() {
                        *pinners |= sniper_sq.to_bb();
                    }
                }
            }
        }
        result
    }

    /// Recomputes `checkers`, `blockers_for_king`, `pinners` and
    /// `checked_squares` for the *current* side to move, from scratch. Called
    /// after every make/unmake; never incremental, since each of these
    /// depends on the whole-board occupancy, not just the moved piece.
    fn set_check_info(&mut self) {
        let mut white_pinners = BitBoard::EMPTY;
        let white_blockers =
            self.slider_blockers(self.board.occupied_by(Player::Black), self.king_sq(Player::White), &mut white_pinners);
        let mut black_pinners = BitBoard::EMPTY;
        let black_blockers =
            self.slider_blockers(self.board.occupied_by(Player::White), self.king_sq(Player::Black), &mut black_pinners);

        let them_ksq = self.king_sq(self.turn.other_player());
        let occupied = self.board.occupied();
        let them = self.turn.other_player();

        let mut checked_squares = [BitBoard::EMPTY; PIECE_TYPE_CNT];
        checked_squares[PieceType::P as usize] = magic::pawn_attacks_from(them_ksq, them);
        checked_squares[PieceType::N as usize] = magic::knight_moves(them_ksq);
        checked_squares[PieceType::B as usize] = magic::bishop_attacks(occupied, them_ksq);
        checked_squares[PieceType::R as usize] = magic::rook_attacks(occupied, them_ksq);
        checked_squares[PieceType::Q as usize] =
            checked_squares[PieceType::B as usize] | checked_squares[PieceType::R as usize];

        let state = self.cur_state_mut();
        state.blockers_for_king[Player::White as usize] = white_blockers;
        state.pinners[Player::White as usize] = white_pinners;
        state.blockers_for_king[Player::Black as usize] = black_blockers;
        state.pinners[Player::Black as usize] = black_pinners;
        state.checked_squares = checked_squares;
    }

    /// Checkers attacking the side to move's king. Recomputed in full on
    /// demand rather than folded into `set_check_info` so callers that need
    /// it *before* the side flips (e.g. `gives_check`) can call it directly.
    fn checkers_to(&self, attacked_player: Player) -> BitBoard {
        self.attackers_to(self.king_sq(attacked_player), self.board.occupied())
            & self.board.occupied_by(attacked_player.other_player())
    }

    /// Rebuilds every Zobrist key and the checking-info fields from the
    /// current board, as opposed to incrementally maintaining them. Used
    /// once at construction and by `is_okay`'s consistency check.
    fn set_state_from_scratch(&mut self) {
        let (zob, pawn_key, material_key) = self.compute_keys_from_scratch();
        {
            let state = self.cur_state_mut();
            state.position_key = zob;
            state.pawn_key = pawn_key;
            state.material_key = material_key;
        }
        let checkers = self.checkers_to(self.turn);
        self.cur_state_mut().checkers = checkers;
        self.set_check_info();
    }

    fn compute_keys_from_scratch(&self) -> (u64, u64, u64) {
        let mut zob = 0u64;
        let mut pawn_key = 0u64;
        let mut material_key = 0u64;
        let mut occ = self.board.occupied();
        while let Some(sq) = occ.pop_some_lsb() {
            let piece = self.board.piece_at(sq);
            let key = zobrist::z_square(sq, piece);
            zob ^= key;
            if piece.type_of() == PieceType::P {
                pawn_key ^= key;
            }
        }
        for &player in &ALL_PLAYERS {
            for &pt in &[PieceType::N, PieceType::B, PieceType::R, PieceType::Q, PieceType::K] {
                let count = self.board.count_piece(player, pt);
                for idx in 0..count {
                    material_key ^= zobrist::z_square(SQ(idx), Piece::make_lossy(player, pt));
                }
            }
        }
        if self.ep_square().is_okay() {
            zob ^= zobrist::z_ep(self.ep_square());
        }
        if self.turn == Player::Black {
            zob ^= zobrist::z_side();
        }
        zob ^= zobrist::z_castle(self.cur_state().castling.bits());
        (zob, pawn_key, material_key)
    }

    // ----- move generation -----

    pub fn generate_moves(&self) -> MoveList {
        movegen::generate::<Legal>(self, GenTypes::Legal)
    }

    pub fn generate_moves_of_type(&self, gen_type: GenTypes) -> MoveList {
        movegen::generate::<Legal>(self, gen_type)
    }

    pub fn generate_pseudo_legal_moves(&self) -> MoveList {
        movegen::generate::<PseudoLegal>(self, GenTypes::All)
    }

    /// Tests whether a pseudo-legal move is actually legal: the mover's king
    /// must not end up attacked. Assumes `m` is pseudo-legal for this
    /// position — never call with a move this position didn't itself
    /// generate.
    pub fn legal_move(&self, m: BitMove) -> bool {
        if m.get_src() == m.get_dest() {
            return false;
        }
        let us = self.turn;
        let them = us.other_player();
        let src = m.get_src();
        let src_bb = src.to_bb();
        let dst = m.get_dest();

        if m.move_type() == MoveType::EnPassant {
            let ksq = self.king_sq(us);
            let dst_bb = dst.to_bb();
            let captured_sq = SQ((dst.0 as i8).wrapping_sub(us.pawn_push()) as u8);
            let occupied = (self.board.occupied() ^ src_bb ^ captured_sq.to_bb()) | dst_bb;
            return (magic::rook_attacks(occupied, ksq) & self.sliding_piece_bb(them)).is_empty()
                && (magic::bishop_attacks(occupied, ksq) & self.diagonal_piece_bb(them)).is_empty();
        }

        let piece = self.board.piece_at(src);
        if piece == Piece::None {
            return false;
        }

        if piece.type_of() == PieceType::K {
            return m.move_type() == MoveType::Castle
                || (self.attackers_to(dst, self.board.occupied()) & self.board.occupied_by(them)).is_empty();
        }

        (self.pinned_pieces(us) & src_bb).is_empty() || magic::aligned(src, dst, self.king_sq(us))
    }

    /// Whether playing `m` (assumed legal in this position) delivers check.
    pub fn gives_check(&self, m: BitMove) -> bool {
        let src = m.get_src();
        let dst = m.get_dest();
        let src_bb = src.to_bb();
        let dst_bb = dst.to_bb();
        let opp_king_sq = self.king_sq(self.turn.other_player());

        if (self.cur_state().checked_squares[self.board.piece_at(src).type_of() as usize] & dst_bb).is_not_empty() {
            return true;
        }

        if (self.discovered_check_candidates() & src_bb).is_not_empty()
            && !magic::aligned(src, dst, opp_king_sq)
        {
            return true;
        }

        match m.move_type() {
            MoveType::Normal => false,
            MoveType::Promotion => {
                let occ = self.board.occupied() ^ src_bb;
                let attacks = match m.promo_piece() {
                    PieceType::N => magic::knight_moves(dst),
                    PieceType::B => magic::bishop_attacks(occ, dst),
                    PieceType::R => magic::rook_attacks(occ, dst),
                    PieceType::Q => magic::bishop_attacks(occ, dst) | magic::rook_attacks(occ, dst),
                    _ => unreachable!("promotion target can't be pawn or king"),
                };
                (attacks & opp_king_sq.to_bb()).is_not_empty()
            }
            MoveType::EnPassant => {
                let captured_sq = SQ::make(dst.file(), src.rank());
                let occ = (self.board.occupied() ^ src_bb ^ captured_sq.to_bb()) | dst_bb;
                ((magic::rook_attacks(occ, opp_king_sq) & self.sliding_piece_bb(self.turn))
                    | (magic::bishop_attacks(occ, opp_king_sq) & self.diagonal_piece_bb(self.turn)))
                    .is_not_empty()
            }
            MoveType::Castle => {
                let k_from = src;
                let r_from = dst;
                let side = if r_from > k_from { CastleType::KingSide } else { CastleType::QueenSide };
                let k_to = self.castling_paths.king_landing(self.turn, side);
                let r_to = self.castling_paths.rook_landing(self.turn, side);
                let opp_k_bb = opp_king_sq.to_bb();
                (magic::rook_attacks(BitBoard::EMPTY, r_to) & opp_k_bb).is_not_empty()
                    && (magic::rook_attacks(
                        r_to.to_bb() | k_to.to_bb() | (self.board.occupied() ^ k_from.to_bb() ^ r_from.to_bb()),
                        r_to,
                    ) & opp_k_bb)
                        .is_not_empty()
            }
        }
    }

    // ----- make / unmake -----

    /// Applies `m`, computing `gives_check` itself. Prefer
    /// [`Position::apply_move_with_check`] if the caller already knows it
    /// (e.g. from the move generator), to avoid computing it twice.
    pub fn apply_move(&mut self, m: BitMove) {
        let gives_check = self.gives_check(m);
        self.apply_move_with_check(m, gives_check);
    }

    /// Applies `m`. The caller must supply whether `m` gives check; an
    /// incorrect value corrupts `checkers` for the resulting position.
    pub fn apply_move_with_check(&mut self, m: BitMove, gives_check: bool) {
        debug_assert_ne!(m.get_src(), m.get_dest());
        let us = self.turn;
        let them = us.other_player();
        let from = m.get_src();
        let mut to = m.get_dest();
        let piece = self.board.piece_at(from);
        debug_assert_ne!(piece, Piece::None);
        debug_assert_eq!(piece.player_lossy(), us);

        let mut new_state = self.cur_state().clone();
        new_state.rule50 += 1;
        new_state.plies_from_null += 1;
        new_state.captured_piece = Piece::None;

        let mut zob = new_state.position_key ^ zobrist::z_side();
        let mut pawn_key = new_state.pawn_key;
        let mut material_key = new_state.material_key;

        let captured = if m.is_en_passant() {
            Piece::make_lossy(them, PieceType::P)
        } else {
            self.board.piece_at(to)
        };

        if m.is_castle() {
            debug_assert_eq!(captured.type_of(), PieceType::R);
            debug_assert_eq!(piece.type_of(), PieceType::K);
            let side = if to > from { CastleType::KingSide } else { CastleType::QueenSide };
            let r_src = to;
            let r_dst = self.castling_paths.rook_landing(us, side);
            let k_dst = self.castling_paths.king_landing(us, side);

            self.board.remove_piece(from);
            self.board.remove_piece(r_src);
            self.board.add_piece(us, PieceType::K, k_dst);
            self.board.add_piece(us, PieceType::R, r_dst);

            zob ^= zobrist::z_square(r_src, Piece::make_lossy(us, PieceType::R))
                ^ zobrist::z_square(r_dst, Piece::make_lossy(us, PieceType::R));
            to = k_dst;
        } else if captured != Piece::None {
            let mut cap_sq = to;
            if m.is_en_passant() {
                cap_sq = SQ((to.0 as i8).wrapping_sub(us.pawn_push()) as u8);
                debug_assert_eq!(cap_sq, self.ep_square());
            }
            if captured.type_of() == PieceType::P {
                pawn_key ^= zobrist::z_square(cap_sq, captured);
            }
            if captured.type_of() != PieceType::P {
                let captured_count = self.board.count_piece(them, captured.type_of());
                material_key ^= zobrist::z_material(captured, captured_count - 1);
            }
            self.board.remove_piece(cap_sq);
            zob ^= zobrist::z_square(cap_sq, captured);
            new_state.rule50 = 0;
            new_state.captured_piece = captured;
        }

        zob ^= zobrist::z_square(to, piece) ^ zobrist::z_square(from, piece);

        if self.ep_square().is_okay() {
            zob ^= zobrist::z_ep(self.ep_square());
            new_state.ep_square = NO_SQ;
        }

        if !new_state.castling.is_empty() {
            let revoked = self.castling_paths.update_mask(to, from);
            if !revoked.is_empty() {
                let before = new_state.castling.bits();
                new_state.castling &= !revoked;
                zob ^= zobrist::z_castle(before) ^ zobrist::z_castle(new_state.castling.bits());
            }
        }

        if !m.is_castle() {
            self.board.move_piece(from, to);
        }

        if piece.type_of() == PieceType::P {
            if from.distance(to) == 2 {
                let ep_candidate = SQ((to.0 + from.0) / 2);
                if (magic::pawn_attacks_from(ep_candidate, us) & self.board.piece_bb(them, PieceType::P))
                    .is_not_empty()
                {
                    new_state.ep_square = ep_candidate;
                    zob ^= zobrist::z_ep(ep_candidate);
                }
            } else if m.is_promo() {
                let promo_piece = m.promo_piece();
                let promo_count_before = self.board.count_piece(us, promo_piece);
                self.board.change_piece_type(to, promo_piece);
                zob ^= zobrist::z_square(to, Piece::make_lossy(us, promo_piece)) ^ zobrist::z_square(to, piece);
                pawn_key ^= zobrist::z_square(from, piece);
                material_key ^= zobrist::z_material(Piece::make_lossy(us, promo_piece), promo_count_before);
            }
            pawn_key ^= zobrist::z_square(from, piece) ^ zobrist::z_square(to, piece);
            new_state.rule50 = 0;
        }

        new_state.position_key = zob;
        new_state.pawn_key = pawn_key;
        new_state.material_key = material_key;

        self.states.push(new_state);
        self.turn = them;
        self.ply += 1;

        let checkers = if gives_check {
            self.attackers_to(self.king_sq(them), self.board.occupied()) & self.board.occupied_by(us)
        } else {
            BitBoard::EMPTY
        };
        self.cur_state_mut().checkers = checkers;
        self.set_check_info();
        self.update_repetition();

        trace!(mv = %m, key = self.zobrist(), "applied move");
        debug_assert!(self.is_ok_quick());
    }

    /// Reverses the most recently applied move. Panics if no move has been
    /// applied (the state stack has only its initial entry).
    pub fn unmake_move(&mut self, m: BitMove) {
        debug_assert!(self.states.len() > 1);
        self.turn = self.turn.other_player();
        let us = self.turn;
        let from = m.get_src();
        let to = m.get_dest();

        if m.is_castle() {
            let king_side = to > from;
            let k_dst = self.castling_paths.king_landing(us, if king_side { CastleType::KingSide } else { CastleType::QueenSide });
            let r_dst = self.castling_paths.rook_landing(us, if king_side { CastleType::KingSide } else { CastleType::QueenSide });
            self.board.remove_piece(k_dst);
            self.board.remove_piece(r_dst);
            self.board.add_piece(us, PieceType::K, from);
            self.board.add_piece(us, PieceType::R, to);
        } else {
            let moved_to_piece = if m.is_promo() {
                self.board.change_piece_type(to, PieceType::P);
                self.board.piece_at(to)
            } else {
                self.board.piece_at(to)
            };
            debug_assert_ne!(moved_to_piece, Piece::None);
            self.board.move_piece(to, from);

            let captured = self.cur_state().captured_piece;
            if captured != Piece::None {
                let mut cap_sq = to;
                if m.is_en_passant() {
                    cap_sq = SQ((to.0 as i8).wrapping_sub(us.pawn_push()) as u8);
                }
                self.board.add_piece(us.other_player(), captured.type_of(), cap_sq);
            }
        }

        self.states.pop();
        self.ply -= 1;
        debug_assert!(!self.states.is_empty());
    }

    /// Walks the state chain back two plies at a time (up to
    /// `min(rule50, plies_from_null)`) looking for an equal-key predecessor,
    /// setting `repetition` on the current state per §4.6. The magnitude is
    /// always `i`, the ply distance to the match; the sign is inherited from
    /// the matching predecessor — negative if *it* already had a nonzero
    /// `repetition` (this is a third-or-later occurrence, chained off an
    /// earlier repeat), positive otherwise (this is the first repeat found
    /// so far). That keeps a chain of repeats distinguishable as pre-root
    /// (positive, only the ply distance matters) vs. post-root (negative,
    /// an immediate draw regardless of distance) per §9(b).
    fn update_repetition(&mut self) {
        let key = self.zobrist();
        let end = self.rule50().min(self.plies_from_null() as u8) as usize;
        let len = self.states.len();
        let mut i = 4usize;
        let mut found = 0i16;
        while i <= end && i < len {
            let idx = len - 1 - i;
            if self.states[idx].position_key == key {
                let predecessor_rep = self.states[idx].repetition;
                found = if predecessor_rep != 0 { -(i as i16) } else { i as i16 };
                break;
            }
            i += 2;
        }
        self.cur_state_mut().repetition = found;
    }

    #[inline]
    pub fn repetition(&self) -> i16 {
        self.cur_state().repetition
    }

    /// Draw by repetition, or the 50-move rule. Does not check for
    /// insufficient material or stalemate.
    ///
    /// The repetition check is the signed Stockfish-style comparison, not an
    /// absolute-value one: a negative `repetition` (the matching predecessor
    /// had itself already repeated) is always `< ply` and so is always a
    /// draw regardless of how far back the match sits — any repeat chained
    /// off an earlier repeat recurs again by force. A positive `repetition`
    /// is a draw only if the match lies within the current game's window
    /// (`repetition < ply`); one found further back than the root is the
    /// game's own first-ever repeat of that position, not yet a forced one.
    pub fn is_draw(&self) -> bool {
        self.rule50() >= 100 || (self.repetition() != 0 && (self.repetition() as i32) < self.ply as i32)
    }

    // ----- repetition / cuckoo -----

    /// Cuckoo-table upcoming-repetition check (§4.6): true if some
    /// reversible single-piece move, played right now by either side along
    /// the path that led here, would repeat a position already seen within
    /// the last `end_plies` plies. Cheaper than replaying the whole state
    /// stack — a client's search calls this once per node instead of
    /// walking history, the same way [`Position::update_repetition`] does
    /// for the exact (not upcoming) case.
    pub fn has_upcoming_repetition(&self, end_plies: u16) -> bool {
        let end = self
            .rule50()
            .min(self.plies_from_null() as u8)
            .min(end_plies as u8) as usize;
        if end < 3 {
            return false;
        }
        let original_key = self.zobrist();
        let len = self.states.len();
        let mut i = 3usize;
        while i <= end && i < len {
            let idx = len - 1 - i;
            let candidate_key = original_key ^ self.states[idx].position_key;
            if let Some(mv) = crate::cuckoo::probe(candidate_key) {
                let (s1, s2) = (mv.get_src(), mv.get_dest());
                // The cuckoo table only records that *some* reversible move
                // connects these two keys; it says nothing about whether
                // that move is actually playable on the current board, so
                // confirm the path between the two squares is clear.
                if (magic::between_bb(s1, s2) & self.board.occupied()).is_empty() {
                    return true;
                }
            }
            i += 2;
        }
        false
    }

    // ----- UCI move strings -----

    /// UCI move string for `m` in this position's castling variant:
    /// standard chess renders castling as king-to-landing-square (`e1g1`);
    /// Chess960 renders it as king-to-rook-square (`e1h1`), per §6.2.
    /// Non-castling moves are identical either way.
    pub fn uci_string(&self, m: BitMove) -> String {
        if self.chess960 && m.is_castle() {
            let mut s = format!("{}{}", m.get_src(), m.get_dest());
            if m.is_promo() {
                s.push(m.promo_piece().char_lower());
            }
            s
        } else {
            m.stringify()
        }
    }

    /// Parses a UCI move string (`e2e4`, `e7e8q`) against this position's
    /// legal moves, rendering candidates with [`Position::uci_string`] so
    /// Chess960 castling notation (king-to-rook-square) round-trips too.
    pub fn uci_move(&self, s: &str) -> Result<BitMove, MoveError> {
        if s.len() < 4 || s.len() > 5 {
            return Err(MoveError::Malformed(s.to_owned()));
        }
        self.generate_moves()
            .iter()
            .find(|m| self.uci_string(**m) == s)
            .copied()
            .ok_or_else(|| MoveError::IllegalForPosition(s.to_owned()))
    }

    // ----- debug invariants -----

    /// Expensive full consistency check, per §3/§8's board invariants. Debug
    /// builds only; panics (rather than returning a `Result`) because this is
    /// a programmer-error class, not a data-validation class (§7).
    pub fn is_okay(&self) -> bool {
        if self.piece_bb(Player::White, PieceType::K).count_bits() != 1 {
            return false;
        }
        if self.piece_bb(Player::Black, PieceType::K).count_bits() != 1 {
            return false;
        }
        let (zob, pawn_key, material_key) = self.compute_keys_from_scratch();
        if zob != self.zobrist() {
            return false;
        }
        if pawn_key != self.pawn_key() {
            return false;
        }
        if material_key != self.material_key() {
            return false;
        }
        let expected_checkers = self.checkers_to(self.turn);
        if expected_checkers != self.checkers() {
            return false;
        }
        true
    }

    /// Cheaper sanity check for release builds: only the invariants that are
    /// O(1) to verify.
    pub fn is_ok_quick(&self) -> bool {
        self.piece_bb(Player::White, PieceType::K).count_bits() == 1
            && self.piece_bb(Player::Black, PieceType::K).count_bits() == 1
    }

    /// A human-readable ASCII board, rank 8 at the top, files A-H labeled.
    pub fn pretty_string(&self) -> String {
        let mut s = String::new();
        for rank_idx in (0..8u8).rev() {
            s.push_str(&format!("{}  ", rank_idx + 1));
            for file_idx in 0..8u8 {
                let sq = SQ::make(crate::core::File::from_index(file_idx), Rank::from_index(rank_idx));
                s.push(self.board.piece_at(sq).to_string().chars().next().unwrap());
                s.push(' ');
            }
            s.push('\n');
        }
        s.push_str("   a b c d e f g h\n");
        s
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start_pos()
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        self.board == other.board
            && self.turn == other.turn
            && self.cur_state().castling == other.cur_state().castling
            && self.ep_square() == other.ep_square()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pos_has_no_checkers_and_20_moves() {
        let pos = Position::start_pos();
        assert!(!pos.in_check());
        assert_eq!(pos.generate_moves().len(), 20);
    }

    #[test]
    fn make_unmake_restores_zobrist() {
        let mut pos = Position::start_pos();
        let key_before = pos.zobrist();
        let m = BitMove::make_pawn_push(SQ::E2, SQ::E4);
        pos.apply_move(m);
        assert_ne!(pos.zobrist(), key_before);
        pos.unmake_move(m);
        assert_eq!(pos.zobrist(), key_before);
        assert_eq!(pos.turn(), Player::White);
    }

    #[test]
    fn double_push_sets_ep_square_only_when_capturable() {
        let mut pos = Position::start_pos();
        pos.apply_move(BitMove::make_pawn_push(SQ::E2, SQ::E4));
        assert_eq!(pos.ep_square(), NO_SQ);
    }

    #[test]
    fn e4_e5_creates_capturable_ep_square() {
        let mut pos = Position::start_pos();
        pos.apply_move(BitMove::make_pawn_push(SQ::E2, SQ::E4));
        pos.apply_move(BitMove::make_quiet(SQ::A7, SQ::A6));
        pos.apply_move(BitMove::make_pawn_push(SQ::E4, SQ::E5));
        pos.apply_move(BitMove::make_pawn_push(SQ::D7, SQ::D5));
        assert_eq!(pos.ep_square(), SQ::D6);
    }

    #[test]
    fn knight_shuffle_has_upcoming_repetition() {
        // Nf3 Nf6, then Ng1 walks straight back into a position one
        // reversible knight move away from one already on the stack.
        let mut pos = Position::start_pos();
        pos.apply_move(BitMove::make_quiet(SQ::G1, SQ::F3));
        pos.apply_move(BitMove::make_quiet(SQ::G8, SQ::F6));
        assert!(pos.has_upcoming_repetition(4));
    }

    #[test]
    fn start_pos_has_no_upcoming_repetition() {
        let pos = Position::start_pos();
        assert!(!pos.has_upcoming_repetition(10));
    }

    #[test]
    fn uci_move_round_trips_through_uci_string() {
        let pos = Position::start_pos();
        let m = BitMove::make_pawn_push(SQ::E2, SQ::E4);
        let s = pos.uci_string(m);
        assert_eq!(s, "e2e4");
        assert_eq!(pos.uci_move(&s).unwrap(), m);
    }

    #[test]
    fn chess960_castle_uci_string_names_rook_square() {
        let mut pos = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            true,
        )
        .unwrap();
        pos.apply_move(BitMove::make_quiet(SQ::G1, SQ::F3));
        pos.apply_move(BitMove::make_quiet(SQ::B8, SQ::C6));
        pos.apply_move(BitMove::make_quiet(SQ::G2, SQ::G3));
        pos.apply_move(BitMove::make_quiet(SQ::C6, SQ::B8));
        pos.apply_move(BitMove::make_quiet(SQ::F1, SQ::G2));
        pos.apply_move(BitMove::make_quiet(SQ::B8, SQ::C6));
        let castle = pos
            .generate_moves()
            .iter()
            .find(|m| m.is_castle())
            .copied()
            .expect("white can castle kingside");
        assert_eq!(pos.uci_string(castle), "e1h1");
    }
}
