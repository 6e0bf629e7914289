use super::PlayerId;

const WORD_BITS: usize = u64::BITS as usize;

/// Fixed-size bit vector keyed by [`PlayerId`].
///
/// Sized once from the player count; membership test and insertion are O(1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSet {
    words: Vec<u64>,
}

impl PlayerSet {
    /// Creates an empty set able to hold players `0..player_count`.
    #[must_use]
    pub fn with_capacity(player_count: usize) -> Self {
        Self {
            words: vec![0; player_count.div_ceil(WORD_BITS)],
        }
    }

    /// Returns `true` if `player` is in the set.
    ///
    /// # Panics
    ///
    /// Panics if `player` is beyond the capacity given at construction.
    #[inline]
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.words[player / WORD_BITS] & (1 << (player % WORD_BITS)) != 0
    }

    /// Adds `player` to the set, returning `true` if it was not present.
    #[inline]
    pub fn insert(&mut self, player: PlayerId) -> bool {
        let word = &mut self.words[player / WORD_BITS];
        let bit = 1 << (player % WORD_BITS);
        let inserted = *word & bit == 0;
        *word |= bit;
        inserted
    }

    #[inline]
    pub fn remove(&mut self, player: PlayerId) {
        self.words[player / WORD_BITS] &= !(1 << (player % WORD_BITS));
    }

    pub fn clear(&mut self) {
        self.words.fill(0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }
}
