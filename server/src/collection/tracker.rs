use crate::cards::Card;

use super::{
    store::{load_collection, save_collection, KeyValueStore},
    Collection, DrawResult,
};

/// Outcome of recording a batch of draws.
#[derive(Debug)]
pub struct Recorded {
    pub results: Vec<DrawResult>,

    /// False if the collection couldn't be written to storage. The draws still
    /// count for the running session.
    pub saved: bool,
}

/// The in-memory collection together with the store it is persisted to. The
/// in-memory copy is authoritative; storage is overwritten after each batch.
pub struct CollectionTracker {
    collection: Collection,
    store: Box<dyn KeyValueStore>,
}

impl CollectionTracker {
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            collection: load_collection(&*store),
            store,
        }
    }

    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    pub fn record_draws(&mut self, cards: Vec<Card>) -> Recorded {
        let results = self.collection.record_draws(cards);
        let saved = match save_collection(&mut *self.store, &self.collection) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to save collection, draws may not survive a restart: {e}");
                false
            }
        };
        Recorded { results, saved }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        cards::{Card, Rarity},
        collection::store::{MemoryStore, COLLECTION_KEY},
    };

    use super::*;

    #[test]
    fn test_record_and_reload() {
        let card = Card::sample(Rarity::Epic);
        let mut tracker = CollectionTracker::load(Box::new(MemoryStore::default()));

        let recorded = tracker.record_draws(vec![card.clone(), card.clone()]);
        assert!(recorded.saved);
        assert!(recorded.results[0].is_first_time);
        assert!(!recorded.results[1].is_first_time);
        assert_eq!(tracker.collection().owned(card.id), 2);

        let raw = tracker.store.get(COLLECTION_KEY).unwrap().unwrap();
        let reloaded = CollectionTracker::load(Box::new(MemoryStore::with(COLLECTION_KEY, &raw)));
        assert_eq!(reloaded.collection().owned(card.id), 2);
    }

    #[test]
    fn test_failed_save_keeps_draws() {
        let card = Card::sample(Rarity::Normal);
        let mut tracker = CollectionTracker::load(Box::new(MemoryStore::failing()));

        let recorded = tracker.record_draws(vec![card.clone()]);
        assert!(!recorded.saved);
        assert!(recorded.results[0].is_first_time);
        assert_eq!(tracker.collection().owned(card.id), 1);

        let recorded = tracker.record_draws(vec![card.clone()]);
        assert!(!recorded.results[0].is_first_time);
        assert_eq!(tracker.collection().owned(card.id), 2);
    }
}
