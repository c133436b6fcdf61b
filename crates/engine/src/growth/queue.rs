use indexmap::IndexMap;

use crate::rng::RandomSource;
use crate::world::block::BlockTypeId;
use crate::world::position::Position;

/// A position waiting to be turned into `block`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub position: Position,
    pub block: BlockTypeId,
}

impl Candidate {
    pub fn new(position: Position, block: BlockTypeId) -> Self {
        Self { position, block }
    }
}

/// Pending growth, at most one target per position.
///
/// Backed by an `IndexMap` so a uniformly random entry can be drawn and
/// removed in O(1) (`swap_remove_index`). Never refuses an insert; crossing
/// the soft warning threshold is only logged.
#[derive(Debug, Clone, Default)]
pub struct GrowthQueue {
    entries: IndexMap<Position, BlockTypeId>,
    warn_threshold: usize,
}

impl GrowthQueue {
    /// `warn_threshold == 0` disables the size warning.
    pub fn new(warn_threshold: usize) -> Self {
        Self {
            entries: IndexMap::new(),
            warn_threshold,
        }
    }

    /// Queue a candidate. A later candidate for the same position replaces
    /// the earlier target, which is returned.
    pub fn push(&mut self, candidate: Candidate) -> Option<BlockTypeId> {
        let before = self.entries.len();
        let replaced = self.entries.insert(candidate.position, candidate.block);
        let after = self.entries.len();
        if self.warn_threshold > 0 && before <= self.warn_threshold && after > self.warn_threshold {
            tracing::warn!(
                "Growth queue passed {} pending candidates",
                self.warn_threshold
            );
        }
        replaced
    }

    pub fn extend<I>(&mut self, candidates: I)
    where
        I: IntoIterator<Item = Candidate>,
    {
        for candidate in candidates {
            self.push(candidate);
        }
    }

    /// Remove and return up to `n` distinct entries, drawn uniformly at
    /// random without replacement.
    pub fn drain_random<R>(&mut self, n: usize, rng: &mut R) -> Vec<Candidate>
    where
        R: RandomSource + ?Sized,
    {
        let n = n.min(self.entries.len());
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let i = rng.index(self.entries.len());
            if let Some((position, block)) = self.entries.swap_remove_index(i) {
                out.push(Candidate { position, block });
            }
        }
        out
    }

    pub fn get(&self, pos: &Position) -> Option<&BlockTypeId> {
        self.entries.get(pos)
    }

    pub fn contains(&self, pos: &Position) -> bool {
        self.entries.contains_key(pos)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
