//! King-and-pawn-vs-king (KPK) endgame bitbase.
//!
//! A king, a pawn, and a lone enemy king is small enough (at most
//! 2 * 64 * 64 * 24 = 196,608 arrangements, once the pawn's square is
//! reduced to the a-d files by left-right symmetry) to classify exhaustively
//! at startup rather than search on demand. Classification works backward
//! from the positions whose outcome is obvious — the side to move has no
//! king move that doesn't walk into its own king's attack range, or the pawn
//! is capturable for free — propagating WIN/DRAW outward until a full pass
//! changes nothing (§4.8's "iterative fixed-point classification").
//!
//! The table only ever stores positions with a *white* king, pawn, and a
//! lone *black* king; [`probe`] mirrors an arbitrary query onto that
//! canonical layout before indexing.

use lazy_static::lazy_static;
use tracing::debug;

use crate::core::sq::SQ;
use crate::core::{File, Player, Rank};
use crate::magic;

/// 2 (side to move) * 64 (defending king) * 64 (attacking king) * 24
/// (attacking pawn square, reduced to files a-d and ranks 2-7).
const MAX_INDEX: usize = 2 * 64 * 64 * 24;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Verdict {
    Invalid,
    Unknown,
    Draw,
    Win,
}

struct Position {
    /// Whether it's the side with the king+pawn ("strong side") to move.
    strong_to_move: bool,
    weak_king: SQ,
    strong_king: SQ,
    pawn: SQ,
}

impl Position {
    fn from_index(idx: usize) -> Position {
        let pawn_component = idx % 24;
        let rest = idx / 24;
        let strong_king = SQ((rest % 64) as u8);
        let rest = rest / 64;
        let weak_king = SQ((rest % 64) as u8);
        let strong_to_move = (rest / 64) != 0;

        let file = File::from_index((pawn_component / 6) as u8);
        let rank = Rank::from_index((pawn_component % 6 + 1) as u8);
        Position {
            strong_to_move,
            weak_king,
            strong_king,
            pawn: SQ::make(file, rank),
        }
    }

    fn index(&self) -> usize {
        index(self.strong_to_move, self.weak_king, self.strong_king, self.pawn)
    }

    /// Every position in the table where classification is immediate,
    /// without needing to look at any other table entry: kings coincide or
    /// sit adjacent, the pawn sits under a king, or the side *not* to move
    /// is already in check (a position that could never have been reached).
    fn classify_trivial(&self) -> Option<Verdict> {
        if self.weak_king == self.strong_king
            || self.weak_king == self.pawn
            || self.strong_king == self.pawn
            || magic::king_moves(self.strong_king).contains(self.weak_king)
        {
            return Some(Verdict::Invalid);
        }
        // If it's the strong side to move, the weak king must not already be
        // sitting in the pawn's attack squares — that would mean the weak
        // side was left in check on the move before this one.
        if self.strong_to_move
            && magic::pawn_attacks_from(Player::White, self.pawn).contains(self.weak_king)
        {
            return Some(Verdict::Invalid);
        }
        None
    }

    /// Expands every legal move from this position into the table index of
    /// the resulting position (always stored with the side to move flipped).
    fn children(&self) -> Vec<usize> {
        let mut out = Vec::new();
        if self.strong_to_move {
            for to in magic::king_moves(self.strong_king).into_iter() {
                if to != self.pawn {
                    out.push(index(false, self.weak_king, to, self.pawn));
                }
            }
            if self.pawn.rank() != Rank::R7 {
                if let Some(one) = step_north(self.pawn) {
                    if one != self.strong_king && one != self.weak_king {
                        out.push(index(false, self.weak_king, self.strong_king, one));
                    }
                }
            }
            if self.pawn.rank() == Rank::R2 {
                if let (Some(one), Some(two)) = (step_north(self.pawn), step_north(self.pawn).and_then(step_north)) {
                    if one != self.strong_king
                        && one != self.weak_king
                        && two != self.strong_king
                        && two != self.weak_king
                    {
                        out.push(index(false, self.weak_king, self.strong_king, two));
                    }
                }
            }
        } else {
            for to in magic::king_moves(self.weak_king).into_iter() {
                if to != self.strong_king
                    && !magic::king_moves(self.strong_king).contains(to)
                    && !magic::pawn_attacks_from(Player::White, self.pawn).contains(to)
                {
                    out.push(index(true, to, self.strong_king, self.pawn));
                }
            }
        }
        out
    }
}

#[inline]
fn step_north(sq: SQ) -> Option<SQ> {
    if sq.rank() == Rank::R8 {
        None
    } else {
        Some(SQ::make(sq.file(), Rank::from_index(sq.rank() as u8 + 1)))
    }
}

fn index(strong_to_move: bool, weak_king: SQ, strong_king: SQ, pawn: SQ) -> usize {
    let pawn_component = pawn.file() as usize * 6 + (pawn.rank() as usize - 1);
    ((((strong_to_move as usize) * 64 + weak_king.0 as usize) * 64 + strong_king.0 as usize) * 24) + pawn_component
}

struct Bitbase {
    table: Vec<Verdict>,
}

fn build() -> Bitbase {
    let mut table = vec![Verdict::Unknown; MAX_INDEX];

    for idx in 0..MAX_INDEX {
        if let Some(v) = Position::from_index(idx).classify_trivial() {
            table[idx] = v;
        }
    }

    let mut changed = true;
    let mut passes = 0;
    while changed {
        changed = false;
        passes += 1;
        for idx in 0..MAX_INDEX {
            if table[idx] != Verdict::Unknown {
                continue;
            }
            let pos = Position::from_index(idx);
            let children = pos.children();

            let mut any_unknown = false;
            let mut any_win = false;
            let mut any_draw = false;
            for &child in &children {
                match table[child] {
                    Verdict::Unknown => any_unknown = true,
                    Verdict::Win => any_win = true,
                    Verdict::Draw | Verdict::Invalid => any_draw = true,
                }
            }

            let verdict = if pos.strong_to_move {
                // The strong side wins if any move wins; it is never forced
                // into a loss (there's no mating material for the weak
                // side), so a strong-to-move position with no good move is a
                // draw.
                if any_win {
                    Verdict::Win
                } else if any_unknown {
                    continue;
                } else {
                    Verdict::Draw
                }
            } else if children.is_empty() {
                // No legal king move for the weak side: stalemate if it
                // isn't in check, otherwise mated.
                if magic::king_moves(pos.strong_king).contains(pos.weak_king)
                    || magic::pawn_attacks_from(Player::White, pos.pawn).contains(pos.weak_king)
                {
                    Verdict::Win
                } else {
                    Verdict::Draw
                }
            } else if any_draw {
                Verdict::Draw
            } else if any_unknown {
                continue;
            } else {
                Verdict::Win
            };

            table[idx] = verdict;
            changed = true;
        }
    }

    debug!(passes, "KPK bitbase converged");
    Bitbase { table }
}

lazy_static! {
    static ref BITBASE: Bitbase = {
        debug!("building KPK bitbase");
        build()
    };
}

/// Forces construction of the bitbase. Idempotent.
pub fn init() {
    lazy_static::initialize(&BITBASE);
}

/// Normalizes an arbitrary (white king, white pawn, black king) arrangement
/// onto the table's canonical a-d-file storage, mirroring everything
/// horizontally if the pawn sits on the e-h files.
fn normalize(mut white_king: SQ, mut white_pawn: SQ, mut black_king: SQ) -> (SQ, SQ, SQ) {
    if white_pawn.file() as u8 >= File::E as u8 {
        white_king = white_king.flip();
        white_pawn = white_pawn.flip();
        black_king = black_king.flip();
    }
    (white_king, white_pawn, black_king)
}

/// Returns whether the side with the king and pawn can force a win, for a
/// position with exactly one white king, one white pawn, and one black king.
/// `side_to_move` is whoever is actually on move; the pawn's owner is always
/// modeled as White internally, so callers with a black pawn must mirror the
/// whole position (colors and files) before calling this.
pub fn probe(white_king: SQ, white_pawn: SQ, black_king: SQ, side_to_move: Player) -> bool {
    let (wk, wp, bk) = normalize(white_king, white_pawn, black_king);
    let idx = index(side_to_move == Player::White, bk, wk, wp);
    BITBASE.table[idx] == Verdict::Win
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_entries_matches_spec() {
        assert_eq!(BITBASE.table.len(), 196_608);
    }

    #[test]
    fn no_entry_is_left_unknown() {
        assert!(BITBASE.table.iter().all(|v| *v != Verdict::Unknown));
    }

    #[test]
    fn adjacent_kings_are_invalid() {
        let pos = Position {
            strong_to_move: true,
            weak_king: SQ::E5,
            strong_king: SQ::E4,
            pawn: SQ::A2,
        };
        assert_eq!(pos.classify_trivial(), Some(Verdict::Invalid));
    }

    #[test]
    fn unopposed_rook_pawn_promotion_is_a_win() {
        // White king shepherds the pawn home with the black king shut out;
        // this is a textbook win regardless of who is to move.
        let win = probe(SQ::B6, SQ::A6, SQ::A8, Player::White);
        assert!(win);
    }

    #[test]
    fn pawn_mirrors_e_to_h_files_consistently() {
        // The same relative arrangement reflected onto the kingside must
        // classify identically to its queenside original once normalized.
        let queenside = probe(SQ::B6, SQ::A6, SQ::A8, Player::White);
        let kingside = probe(SQ::G6, SQ::H6, SQ::H8, Player::White);
        assert_eq!(queenside, kingside);
    }
}
