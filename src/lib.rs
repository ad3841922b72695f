//! `plinth` is a chess position, move-generation, and transposition-table
//! substrate: the bitboard plumbing a chess engine sits on top of, without
//! an engine.
//!
//! The crate is built around [`Position`], which owns piece placement (a
//! [`board::Board`]) plus the incremental per-ply state (castling rights,
//! en passant square, Zobrist keys, check info) needed to make and unmake
//! moves cheaply. Move generation is mono-morphized per side to move and
//! per piece type (see [`core::mono_traits`]) so the compiler specializes
//! each generator rather than branching on color/piece at runtime.
//!
//! # Examples
//!
//! ```
//! use plinth::Position;
//!
//! let mut pos = Position::start_pos();
//! let moves = pos.generate_moves();
//! assert_eq!(moves.len(), 20);
//!
//! let m = moves.iter().next().unwrap();
//! pos.apply_move(*m);
//! pos.unmake_move(*m);
//! assert_eq!(pos.fen(), plinth::position::fen::START_FEN);
//! ```
//!
//! Perft is the standard move-generator regression check:
//!
//! ```
//! use plinth::Position;
//!
//! let mut pos = Position::start_pos();
//! assert_eq!(pos.perft(3), 8902);
//! ```

#![allow(dead_code)]

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
extern crate num_cpus;
extern crate rand;
extern crate rayon;

pub mod bitbases;
pub mod board;
pub mod core;
pub mod cuckoo;
pub mod error;
pub mod magic;
pub mod position;
pub mod prng;
pub mod tt;
pub mod zobrist;

pub use crate::board::Board;
pub use crate::core::bitboard::BitBoard;
pub use crate::core::move_list::MoveList;
pub use crate::core::piece_move::BitMove;
pub use crate::core::sq::SQ;
pub use crate::core::{File, Piece, PieceType, Player, Rank};
pub use crate::position::Position;
pub use crate::tt::TranspositionTable;
