//! The transposition table: a fixed-size, bucketed hash table mapping a
//! position's Zobrist key to the best information a client's search has
//! already found for it.
//!
//! Unlike every other table in this crate (attack tables, Zobrist keys, the
//! cuckoo table), the transposition table is *mutable* and, per §5 of the
//! design this crate follows, meant to be shared across search workers
//! without locks: a probe that races a store may observe a torn combination
//! of fields, but never anything worse than a spurious miss or a harmless
//! stale hit. [`TranspositionTable`] models that with interior mutability
//! (an [`UnsafeCell`] per cluster) rather than a `Mutex` — the same design
//! `pleco`'s own `tt.rs` reaches for (there with a raw heap allocation; here
//! with a `Vec` so the allocation and its `Drop` stay entirely safe code,
//! following the `fiddler` transposition table's lead on using a modern
//! `std::alloc`-free, `Vec`-backed layout instead of the unstable
//! `std::heap` API `pleco`'s original targeted).

use std::cell::UnsafeCell;
use std::mem::size_of;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

use tracing::trace;

use crate::core::piece_move::BitMove;
use crate::error::TTSizeError;

/// Number of entries packed into one cluster.
pub const CLUSTER_SIZE: usize = 4;

const BYTES_PER_MB: usize = 1024 * 1024;

/// What kind of score bound a [`TTEntry`] records, per the usual alpha-beta
/// convention: `Lower` for a fail-high, `Upper` for a fail-low, `Exact` for a
/// score that fell inside the search window.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum Bound {
    None = 0,
    Upper = 1,
    Lower = 2,
    Exact = 3,
}

/// One slot in a [`TTCluster`]. Small and `Copy` so probing and storing work
/// by value rather than by reference, which is what lets the table expose a
/// safe `&self` API over its interior-mutable clusters.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TTEntry {
    /// Upper 32 bits of the full position key — enough to make a collision
    /// between two different positions in the same cluster astronomically
    /// unlikely without storing the whole 64-bit key.
    pub key32: u32,
    pub mv: BitMove,
    pub value: i16,
    pub static_value: i16,
    pub depth: i8,
    pub generation: u8,
    pub bound: Bound,
}

impl TTEntry {
    const EMPTY: TTEntry = TTEntry {
        key32: 0,
        mv: BitMove::null(),
        value: 0,
        static_value: 0,
        depth: 0,
        generation: 0,
        bound: Bound::None,
    };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bound == Bound::None
    }

    /// Lower is more replaceable: entries from a stale generation, with a
    /// non-exact bound, and at a shallow depth all push this down. Per §4.7,
    /// the victim within a full cluster is whichever entry has the minimum
    /// score.
    fn replacement_score(&self, current_generation: u8) -> i32 {
        let same_generation = (self.generation == current_generation) as i32;
        let is_exact = (self.bound == Bound::Exact) as i32;
        same_generation * 8 + is_exact * 4 + self.depth as i32
    }
}

#[derive(Clone, Copy)]
struct TTCluster {
    entries: [TTEntry; CLUSTER_SIZE],
}

impl TTCluster {
    const EMPTY: TTCluster = TTCluster {
        entries: [TTEntry::EMPTY; CLUSTER_SIZE],
    };
}

/// A fixed-size, shared-mutable transposition table. See the module-level
/// docs for the concurrency model.
pub struct TranspositionTable {
    clusters: Vec<UnsafeCell<TTCluster>>,
    mask: u64,
    generation: AtomicU8,
    hits: AtomicU64,
}

// SAFETY: every field accessed through an `UnsafeCell` here is a plain
// `Copy` struct of primitive fields; a racing read/write pair can only ever
// observe a torn-but-still-in-range combination of those fields (per §5, a
// stale key32/bound pairing either shows up as a miss or a harmless payload
// — there is no pointer or length field that could be torn into something
// that traps on access).
unsafe impl Sync for TranspositionTable {}

impl TranspositionTable {
    /// Builds a table sized to fit within `mb` mebibytes: the cluster count
    /// is the largest power of two such that `clusters * size_of::<TTCluster>()
    /// <= mb * 1 MiB` (§4.7; this rounds *down*, unlike the two historical
    /// round-up variants in the source this crate is not replicating — see
    /// DESIGN.md's Open Questions).
    pub fn new(mb: usize) -> Result<TranspositionTable, TTSizeError> {
        if mb == 0 {
            return Err(TTSizeError::Zero);
        }
        let max_clusters = (mb * BYTES_PER_MB) / size_of::<TTCluster>();
        if max_clusters == 0 {
            let min_mb = (size_of::<TTCluster>() + BYTES_PER_MB - 1) / BYTES_PER_MB;
            return Err(TTSizeError::TooSmall { mb, min_mb: min_mb.max(1) });
        }
        let cluster_count = if max_clusters.is_power_of_two() {
            max_clusters
        } else {
            max_clusters.next_power_of_two() >> 1
        };
        trace!(mb, cluster_count, "sized transposition table");
        Ok(TranspositionTable {
            clusters: (0..cluster_count).map(|_| UnsafeCell::new(TTCluster::EMPTY)).collect(),
            mask: cluster_count as u64 - 1,
            generation: AtomicU8::new(0),
            hits: AtomicU64::new(0),
        })
    }

    #[inline]
    pub fn cluster_count(&self) -> usize {
        self.mask as usize + 1
    }

    #[inline]
    pub fn generation(&self) -> u8 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Total successful probes so far, for diagnostic output.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Advances the generation counter. Called once per new search; wraps
    /// silently (an 8-bit counter is expected to wrap over a long-running
    /// process).
    pub fn new_search(&self) {
        self.generation.fetch_add(1, Ordering::Relaxed);
    }

    /// Clears every entry without resizing.
    pub fn clear(&self) {
        for cluster in &self.clusters {
            unsafe { *cluster.get() = TTCluster::EMPTY };
        }
        self.generation.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
    }

    #[inline]
    fn cluster_index(&self, key: u64) -> usize {
        (key & self.mask) as usize
    }

    /// Probes the table for `key`. On a hit, the entry's generation is
    /// refreshed to the current one (a probe counts as "still relevant").
    /// On a miss, the second element of the tuple is meaningless — callers
    /// that want to store should just call [`TranspositionTable::store`],
    /// which redoes the victim selection itself.
    pub fn probe(&self, key: u64) -> (bool, TTEntry) {
        let key32 = (key >> 32) as u32;
        let idx = self.cluster_index(key);
        let generation = self.generation();
        // SAFETY: `idx` is in range (`cluster_index` masks by `self.mask`);
        // concurrent callers may race this mutable borrow, which is exactly
        // the torn-read/lockless-write tradeoff §5 accepts for this table.
        let cluster = unsafe { &mut *self.clusters[idx].get() };

        for entry in cluster.entries.iter_mut() {
            if !entry.is_empty() && entry.key32 == key32 {
                if entry.generation != generation {
                    entry.generation = generation;
                }
                self.hits.fetch_add(1, Ordering::Relaxed);
                return (true, *entry);
            }
        }
        (false, TTEntry::EMPTY)
    }

    /// Stores a search result for `key`. Finds a matching or empty slot in
    /// the cluster; failing that, replaces whichever entry scores lowest
    /// under [`TTEntry::replacement_score`]. An empty incoming `mv` never
    /// overwrites an existing move for the same key (§4.7).
    pub fn store(&self, key: u64, mv: BitMove, bound: Bound, depth: i8, value: i16, static_value: i16) {
        let key32 = (key >> 32) as u32;
        let idx = self.cluster_index(key);
        let generation = self.generation();
        let cluster = unsafe { &mut *self.clusters[idx].get() };

        let slot = cluster
            .entries
            .iter()
            .position(|e| e.is_empty() || e.key32 == key32)
            .unwrap_or_else(|| {
                let mut victim = 0usize;
                let mut victim_score = i32::MAX;
                for (i, e) in cluster.entries.iter().enumerate() {
                    let score = e.replacement_score(generation);
                    if score < victim_score {
                        victim_score = score;
                        victim = i;
                    }
                }
                victim
            });

        let existing = cluster.entries[slot];
        let mv = if mv.is_null() && existing.key32 == key32 && !existing.mv.is_null() {
            existing.mv
        } else {
            mv
        };

        cluster.entries[slot] = TTEntry {
            key32,
            mv,
            value,
            static_value,
            depth,
            generation,
            bound,
        };
    }

    /// Per-mille fullness, sampled over the first `min(cluster_count, 250)`
    /// clusters: the fraction of entries stamped with the current
    /// generation, scaled to `[0, 1000]`.
    pub fn fullness(&self) -> u32 {
        let sampled = self.cluster_count().min(250);
        let generation = self.generation();
        let mut filled = 0usize;
        for cluster in &self.clusters[..sampled] {
            let cluster = unsafe { &*cluster.get() };
            filled += cluster
                .entries
                .iter()
                .filter(|e| !e.is_empty() && e.generation == generation)
                .count();
        }
        ((filled * 1000) / (sampled * CLUSTER_SIZE)) as u32
    }
}
