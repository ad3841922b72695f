//! Fuzz-style random legal-position generator, ported from `pleco`'s
//! `RandBoard` (`board/mod.rs`). Only used by tests and benches — nothing in
//! the library's own API surface depends on randomness.
//!
//! `RandBoard` biases move selection toward whatever its bundled
//! search bots think is good, so the resulting positions look more like
//! real games. That machinery is search (an explicit non-goal of this
//! crate), so this port keeps the same builder shape and stopping rule but
//! picks uniformly among legal moves at each ply instead.

use crate::prng::PRNG;

use super::Position;

#[derive(Eq, PartialEq)]
enum RandGen {
    InCheck,
    NoCheck,
    All,
}

/// Builder for random legal [`Position`]s. See module docs for how this
/// differs from `pleco`'s `RandBoard`.
pub struct RandPosition {
    gen_type: RandGen,
    minimum_ply: u16,
    prng: PRNG,
    seeded: bool,
}

impl Default for RandPosition {
    fn default() -> Self {
        RandPosition {
            gen_type: RandGen::All,
            minimum_ply: 2,
            prng: PRNG::new(1),
            seeded: false,
        }
    }
}

impl RandPosition {
    pub fn new() -> Self {
        RandPosition::default()
    }

    /// Fixes the seed so the same sequence of positions is reproducible.
    pub fn pseudo_random(mut self, seed: u64) -> Self {
        self.prng = PRNG::new(if seed == 0 { 1 } else { seed });
        self.seeded = true;
        self
    }

    /// Minimum number of plies a returned position must have had played
    /// into it.
    pub fn min_moves(mut self, plies: u16) -> Self {
        self.minimum_ply = plies;
        self
    }

    pub fn in_check(mut self) -> Self {
        self.gen_type = RandGen::InCheck;
        self
    }

    pub fn no_check(mut self) -> Self {
        self.gen_type = RandGen::NoCheck;
        self
    }

    /// Builds one random position.
    pub fn one(mut self) -> Position {
        self.go()
    }

    /// Builds `size` random positions.
    pub fn many(mut self, size: usize) -> Vec<Position> {
        (0..size).map(|_| self.go()).collect()
    }

    fn random(&mut self) -> usize {
        if self.seeded {
            self.prng.rand() as usize
        } else {
            rand::random::<usize>()
        }
    }

    fn matches(&self, pos: &Position) -> bool {
        let gen_ok = match self.gen_type {
            RandGen::All => true,
            RandGen::InCheck => pos.in_check(),
            RandGen::NoCheck => !pos.in_check(),
        };
        gen_ok && pos.ply() >= self.minimum_ply
    }

    fn go(&mut self) -> Position {
        loop {
            let mut pos = Position::start_pos();
            let mut iterations = 0u16;
            let mut moves = pos.generate_moves();

            while iterations < 100 && !moves.is_empty() {
                // Stop with ~1-in-13 odds once past the minimum, same
                // stopping cadence as `RandBoard`'s walk, minus its
                // search-driven move bias.
                let stop_odds = 13usize.max(90usize.saturating_sub(iterations as usize));
                let roll = self.random() % stop_odds;
                if roll == 0 && self.matches(&pos) {
                    return pos;
                }

                let mv = moves[self.random() % moves.len()];
                pos.apply_move(mv);
                moves = pos.generate_moves();
                iterations += 1;
            }

            if self.matches(&pos) {
                return pos;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_produces_a_legal_position() {
        let pos = RandPosition::default().pseudo_random(42).min_moves(2).one();
        assert!(pos.ply() >= 2);
        assert!(pos.is_ok_quick());
    }

    #[test]
    fn many_produces_requested_count() {
        let positions = RandPosition::default().pseudo_random(7).many(5);
        assert_eq!(positions.len(), 5);
    }

    #[test]
    fn no_check_filter_is_honored() {
        let pos = RandPosition::default().pseudo_random(99).no_check().min_moves(1).one();
        assert!(!pos.in_check());
    }

    #[test]
    fn same_seed_is_reproducible() {
        let a = RandPosition::default().pseudo_random(555).min_moves(3).one();
        let b = RandPosition::default().pseudo_random(555).min_moves(3).one();
        assert_eq!(a.fen(), b.fen());
    }
}
