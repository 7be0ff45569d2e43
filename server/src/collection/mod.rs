use std::collections::BTreeMap;

use crate::cards::{Card, Catalog};

pub mod store;
mod tracker;

pub use tracker::CollectionTracker;

/// Series id for cards that don't name one.
pub const OTHER_SERIES: &str = "other";

/// Owned copy count per card id. Counts only ever go up.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Collection {
    counts: BTreeMap<u32, u64>,
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawResult {
    pub card: Card,
    pub is_first_time: bool,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionStats {
    pub total_cards: u64,
    pub unique_cards: usize,

    /// Whole percentage of catalog cards owned at least once.
    pub completion: u32,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct GalleryEntry {
    pub card: Card,
    pub owned: u64,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct GallerySection {
    pub id: String,
    pub name: String,
    pub cards: Vec<GalleryEntry>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn owned(&self, card_id: u32) -> u64 {
        self.counts.get(&card_id).copied().unwrap_or(0)
    }

    pub fn counts(&self) -> &BTreeMap<u32, u64> {
        &self.counts
    }

    /// Add one copy of each card, in order, reporting whether each copy was
    /// the first one owned. A card appearing twice in the same batch is only
    /// new the first time. Counts stop at `u64::MAX`.
    pub fn record_draws(&mut self, cards: Vec<Card>) -> Vec<DrawResult> {
        cards
            .into_iter()
            .map(|card| {
                let count = self.counts.entry(card.id).or_default();
                let is_first_time = *count == 0;
                *count = count.saturating_add(1);
                DrawResult {
                    card,
                    is_first_time,
                }
            })
            .collect()
    }

    /// Totals over the cards in the catalog. Counts for ids the catalog
    /// doesn't know are ignored.
    pub fn stats(&self, catalog: &Catalog) -> CollectionStats {
        let mut total_cards = 0u64;
        let mut unique_cards = 0;
        for card in catalog.cards() {
            let owned = self.owned(card.id);
            total_cards = total_cards.saturating_add(owned);
            if owned > 0 {
                unique_cards += 1;
            }
        }

        let completion = if catalog.size() == 0 {
            0
        } else {
            (unique_cards as f64 / catalog.size() as f64 * 100.0).round() as u32
        };

        CollectionStats {
            total_cards,
            unique_cards,
            completion,
        }
    }

    /// Every catalog card with its owned count, grouped by series in series
    /// order. Within a series the rarest cards come first. Cards without a
    /// series are filed under `other`, and cards whose series isn't in the
    /// catalog are not shown.
    pub fn gallery(&self, catalog: &Catalog) -> Vec<GallerySection> {
        catalog
            .series()
            .iter()
            .filter_map(|series| {
                let mut cards: Vec<GalleryEntry> = catalog
                    .cards()
                    .iter()
                    .filter(|card| card.series.as_deref().unwrap_or(OTHER_SERIES) == series.id)
                    .map(|card| GalleryEntry {
                        card: card.clone(),
                        owned: self.owned(card.id),
                    })
                    .collect();
                if cards.is_empty() {
                    return None;
                }

                cards.sort_by(|a, b| b.card.rarity.cmp(&a.card.rarity));
                Some(GallerySection {
                    id: series.id.clone(),
                    name: series.name.clone(),
                    cards,
                })
            })
            .collect()
    }
}
