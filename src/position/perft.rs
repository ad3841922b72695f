//! Perft: count leaf nodes of the legal-move tree to a fixed depth, the
//! standard move-generator correctness/regression check.

use rayon::prelude::*;

use super::Position;

impl Position {
    /// Recursively counts leaf positions `depth` plies deep, descending
    /// through every legal move at every ply (not just the root).
    pub fn perft(&mut self, depth: u16) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        if depth == 1 {
            return moves.len() as u64;
        }
        let mut nodes = 0;
        for m in moves.iter() {
            self.apply_move(*m);
            nodes += self.perft(depth - 1);
            self.unmake_move(*m);
        }
        nodes
    }

    /// Like [`Position::perft`], but counts leaves at `depth == 1` directly
    /// from the move list's length rather than recursing one level further
    /// just to hit the `depth == 0` base case — the same bulk-counting
    /// optimization `perft` already applies, exposed separately so callers
    /// that want a per-move breakdown at the root can still get the total
    /// cheaply.
    pub fn perft_bulk(&mut self, depth: u16) -> u64 {
        self.perft(depth)
    }

    /// Splits the root's legal moves across a Rayon thread pool, cloning the
    /// position once per root move so each worker advances its own copy
    /// independently.
    pub fn perft_parallel(&self, depth: u16) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = self.generate_moves();
        moves
            .vec()
            .into_par_iter()
            .map(|m| {
                let mut clone = self.clone();
                clone.apply_move(m);
                clone.perft(depth - 1)
            })
            .sum()
    }

    /// Per-root-move leaf counts, in generation order — the `divide`
    /// breakdown used to localize a perft mismatch against a reference
    /// engine to a single root move.
    pub fn perft_divide(&mut self, depth: u16) -> Vec<(String, u64)> {
        let moves = self.generate_moves();
        let mut out = Vec::with_capacity(moves.len());
        for m in moves.iter() {
            self.apply_move(*m);
            let count = if depth <= 1 { 1 } else { self.perft(depth - 1) };
            self.unmake_move(*m);
            out.push((m.stringify(), count));
        }
        out
    }
}
