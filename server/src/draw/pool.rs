use std::{
    collections::{BTreeMap, HashSet},
    fmt::Debug,
};

use rand::{seq::SliceRandom, Rng};

use crate::cards::{Card, Catalog, Pack, Rarity, RarityTable};

/// The cards a pack can produce, grouped by rarity. Rarities are iterated in
/// ascending order, which fixes the layout of the cumulative weight ranges.
#[derive(Clone, Default)]
pub struct DrawPool<'a> {
    groups: BTreeMap<Rarity, Vec<&'a Card>>,
}

impl<'a> DrawPool<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the pool for a pack. Ids which don't resolve in the catalog are
    /// left out, as are repeated listings of the same id.
    pub fn for_pack(catalog: &'a Catalog, pack: &Pack) -> Self {
        let mut pool = Self::new();
        let mut seen = HashSet::new();
        for &id in pack.card_ids() {
            if !seen.insert(id) {
                continue;
            }
            match catalog.card(id) {
                Some(card) => pool.add(card),
                None => tracing::debug!("Pack {} lists missing card {id}.", pack.id),
            }
        }
        pool
    }

    pub fn add(&mut self, card: &'a Card) {
        self.groups.entry(card.rarity).or_default().push(card);
    }

    pub fn empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn cards_of(&self, rarity: Rarity) -> &[&'a Card] {
        self.groups.get(&rarity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rarities with at least one card in the pool, ascending.
    pub fn rarities(&self) -> impl Iterator<Item = Rarity> + '_ {
        self.groups.keys().copied()
    }

    /// Sum of the weights of the rarities present. Tiers missing from the pool
    /// contribute nothing, so their share is spread over the others.
    pub fn total_weight(&self, weights: &RarityTable) -> u64 {
        self.rarities().map(|r| u64::from(weights.weight(r))).sum()
    }

    /// Map a roll in `[0, total_weight)` to the rarity whose cumulative weight
    /// range contains it.
    fn select_rarity(&self, weights: &RarityTable, roll: u64) -> Option<Rarity> {
        let mut cumulative = 0;
        self.rarities().find(|&rarity| {
            cumulative += u64::from(weights.weight(rarity));
            roll < cumulative
        })
    }

    /// Draw a single card. Returns None only when the pool is empty.
    pub fn roll<R: Rng>(&self, weights: &RarityTable, rng: &mut R) -> Option<&'a Card> {
        let total = self.total_weight(weights);
        if total == 0 {
            return None;
        }

        let rarity = self.select_rarity(weights, rng.gen_range(0..total))?;
        self.cards_of(rarity).choose(rng).copied()
    }

    /// Draw `count` cards independently. The same card may come up more than
    /// once. Slots that produce nothing are skipped.
    pub fn roll_many<R: Rng>(
        &self,
        weights: &RarityTable,
        count: usize,
        rng: &mut R,
    ) -> Vec<&'a Card> {
        (0..count).filter_map(|_| self.roll(weights, rng)).collect()
    }
}

impl Debug for DrawPool<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (rarity, cards) in &self.groups {
            map.entry(rarity, &cards.len());
        }
        map.finish()
    }
}
