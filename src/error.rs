//! Typed errors for malformed input. Nothing in this module is raised for
//! programmer errors (those are `debug_assert!`s closer to the call site) —
//! only for data that arrived from outside the process: a FEN string, a move
//! string, a requested transposition-table size.

use std::error::Error;
use std::fmt;
use std::num::ParseIntError;

use crate::core::PieceType;

/// Everything that can go wrong turning a FEN string into a [`crate::position::Position`].
///
/// [`crate::position::Position`]: ../position/struct.Position.html
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum FenError {
    /// The string didn't split into the expected six (or four, Chess960-style)
    /// whitespace-separated sections.
    NotEnoughSections,
    /// A rank in the piece-placement section didn't sum to 8 files.
    IncorrectRankAmounts,
    /// The side-to-move section wasn't `w` or `b`.
    UnrecognizedTurn,
    /// The en-passant section wasn't `-` or a valid square.
    EPSquareUnreadable,
    /// The en-passant square was syntactically valid but semantically wrong
    /// (not on the rank a pushed pawn could have stopped on, or no matching
    /// enemy pawn beside it).
    EPSquareInvalid { ep: String },
    /// A character in the piece-placement section wasn't a recognized piece
    /// letter or digit.
    UnrecognizedPiece { letter: char },
    /// The halfmove clock or fullmove number failed to parse as an integer.
    UnreadableMoveCounter(ParseIntError),
    /// More than two pieces are giving check simultaneously.
    IllegalNumCheckingPieces { num: u32 },
    /// Two checking pieces of a combination that can never check together
    /// (e.g. two pawns, or a pawn and a knight).
    IllegalCheckState {
        piece_1: PieceType,
        piece_2: PieceType,
    },
    /// More than 8 pawns for one side.
    TooManyPawns { player: crate::core::Player, num: u8 },
    /// A pawn sits on the first or last rank.
    PawnOnLastRow,
    /// A castling-rights letter didn't name a rook that Chess960 rules allow
    /// to castle from its current square.
    IllegalCastlingRights { letter: char },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FenError::NotEnoughSections => {
                write!(f, "FEN string did not contain enough whitespace-separated sections")
            }
            FenError::IncorrectRankAmounts => {
                write!(f, "a rank in the FEN piece placement did not sum to 8 files")
            }
            FenError::UnrecognizedTurn => write!(f, "side to move was not 'w' or 'b'"),
            FenError::EPSquareUnreadable => write!(f, "en passant square was not '-' or a square"),
            FenError::EPSquareInvalid { ep } => {
                write!(f, "en passant square {} is not a legal en passant target", ep)
            }
            FenError::UnrecognizedPiece { letter } => {
                write!(f, "'{}' is not a recognized piece or file-skip digit", letter)
            }
            FenError::UnreadableMoveCounter(e) => write!(f, "move counter unreadable: {}", e),
            FenError::IllegalNumCheckingPieces { num } => {
                write!(f, "{} pieces cannot check the same king simultaneously", num)
            }
            FenError::IllegalCheckState { piece_1, piece_2 } => write!(
                f,
                "{:?} and {:?} can never check a king at the same time",
                piece_1, piece_2
            ),
            FenError::TooManyPawns { player, num } => {
                write!(f, "{:?} has {} pawns, more than the 8 possible", player, num)
            }
            FenError::PawnOnLastRow => write!(f, "a pawn is resting on the first or last rank"),
            FenError::IllegalCastlingRights { letter } => write!(
                f,
                "castling letter '{}' does not name a rook reachable by Chess960 castling rules",
                letter
            ),
        }
    }
}

impl Error for FenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FenError::UnreadableMoveCounter(e) => Some(e),
            _ => None,
        }
    }
}

/// Raised when a client asks a [`crate::position::Position`] to interpret a
/// UCI move string that is not a legal move in the current position.
///
/// [`crate::position::Position`]: ../position/struct.Position.html
#[derive(Debug, Eq, PartialEq, Clone)]
pub enum MoveError {
    /// The string wasn't even shaped like a UCI move (`e2e4`, `e7e8q`).
    Malformed(String),
    /// The move was shaped correctly but is not legal in the current
    /// position.
    IllegalForPosition(String),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MoveError::Malformed(s) => write!(f, "'{}' is not a well-formed UCI move", s),
            MoveError::IllegalForPosition(s) => {
                write!(f, "'{}' is not a legal move in this position", s)
            }
        }
    }
}

impl Error for MoveError {}

/// Raised by [`crate::tt::TranspositionTable::new`] when asked to build a
/// table of an unusable size.
///
/// [`crate::tt::TranspositionTable::new`]: ../tt/struct.TranspositionTable.html#method.new
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub enum TTSizeError {
    /// Requested zero megabytes.
    Zero,
    /// Requested a size too small to hold even one cluster.
    TooSmall { mb: usize, min_mb: usize },
}

impl fmt::Display for TTSizeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TTSizeError::Zero => write!(f, "transposition table size cannot be 0 MiB"),
            TTSizeError::TooSmall { mb, min_mb } => write!(
                f,
                "{} MiB is too small to hold a single cluster (minimum {} MiB)",
                mb, min_mb
            ),
        }
    }
}

impl Error for TTSizeError {}
