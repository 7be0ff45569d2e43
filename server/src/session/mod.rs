use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    cards::{Card, Catalog, Pack},
    collection::{store::KeyValueStore, CollectionStats, CollectionTracker, GallerySection},
    draw,
};

pub mod server;

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenedCard {
    pub card: Card,
    pub is_first_time: bool,

    /// Copies owned once the whole pack has been recorded.
    pub owned: u64,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct PackOpening {
    pub results: Vec<OpenedCard>,
    pub saved: bool,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct CollectionView {
    pub stats: CollectionStats,
    pub gallery: Vec<GallerySection>,
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct CardDetail {
    pub card: Card,
    pub owned: u64,
    pub packs: Vec<String>,
}

/// Everything a single user session needs: the catalog, their collection and
/// a random source. One session exists per process.
pub struct Session {
    catalog: Arc<Catalog>,
    tracker: CollectionTracker,
    rng: StdRng,
}

impl Session {
    pub fn new(catalog: Arc<Catalog>, store: Box<dyn KeyValueStore>) -> Self {
        Self::with_rng(catalog, store, StdRng::from_entropy())
    }

    pub fn with_rng(catalog: Arc<Catalog>, store: Box<dyn KeyValueStore>, rng: StdRng) -> Self {
        Self {
            catalog,
            tracker: CollectionTracker::load(store),
            rng,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Draw a pack's worth of cards and add them to the collection. None if
    /// there is no pack with this id.
    pub fn open_pack(&mut self, pack_id: &str) -> Option<PackOpening> {
        let catalog = Arc::clone(&self.catalog);
        let pack: &Pack = catalog.pack(pack_id)?;

        let cards = draw::draw_many(&catalog, pack, pack.draw_count() as usize, &mut self.rng);
        let recorded = self.tracker.record_draws(cards);
        tracing::debug!(
            "Opened pack {pack_id}: {} cards, {} new.",
            recorded.results.len(),
            recorded.results.iter().filter(|r| r.is_first_time).count()
        );

        let collection = self.tracker.collection();
        let results = recorded
            .results
            .into_iter()
            .map(|result| OpenedCard {
                owned: collection.owned(result.card.id),
                card: result.card,
                is_first_time: result.is_first_time,
            })
            .collect();

        Some(PackOpening {
            results,
            saved: recorded.saved,
        })
    }

    pub fn collection_view(&self) -> CollectionView {
        let collection = self.tracker.collection();
        CollectionView {
            stats: collection.stats(&self.catalog),
            gallery: collection.gallery(&self.catalog),
        }
    }

    pub fn card_detail(&self, card_id: u32) -> Option<CardDetail> {
        let card = self.catalog.card(card_id)?;
        Some(CardDetail {
            card: card.clone(),
            owned: self.tracker.collection().owned(card_id),
            packs: self
                .catalog
                .packs_containing(card_id)
                .into_iter()
                .map(|pack| pack.id.clone())
                .collect(),
        })
    }
}
