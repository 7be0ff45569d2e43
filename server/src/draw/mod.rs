use rand::Rng;

use crate::cards::{Card, Catalog, Pack};

pub mod odds;
mod pool;

pub use pool::DrawPool;

/// Draw `count` cards from a pack with replacement. Each draw weights the
/// rarities present in the pack by their catalog weight; see
/// [`DrawPool::roll`] for a single draw.
pub fn draw_many<R: Rng>(catalog: &Catalog, pack: &Pack, count: usize, rng: &mut R) -> Vec<Card> {
    let pool = DrawPool::for_pack(catalog, pack);
    if pool.empty() {
        tracing::warn!("Pack {} has no drawable cards.", pack.id);
    }
    pool.roll_many(catalog.weights(), count, rng)
        .into_iter()
        .cloned()
        .collect()
}

#[cfg(test)]
mod test {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{draw_many, DrawPool};
    use crate::cards::{Card, Catalog, Pack, Rarity, RarityTable};

    #[test]
    fn test_three_commons() {
        let cards = [
            Card::sample(Rarity::Common),
            Card::sample(Rarity::Common),
            Card::sample(Rarity::Common),
        ];
        let mut catalog = Catalog::new(RarityTable::default());
        for card in &cards {
            catalog.add_card(card.clone()).unwrap();
        }
        let ids: Vec<u32> = cards.iter().map(|c| c.id).collect();
        catalog.add_pack(Pack::sample("p", ids.clone(), 3)).unwrap();
        let pack = catalog.pack("p").unwrap();

        let mut rng = StdRng::seed_from_u64(11);
        let drawn = draw_many(&catalog, pack, pack.draw_count() as usize, &mut rng);
        assert_eq!(drawn.len(), 3);
        assert!(drawn.iter().all(|c| ids.contains(&c.id)));
        let pool = DrawPool::for_pack(&catalog, pack);
        assert!(ids.contains(&pool.roll(catalog.weights(), &mut rng).unwrap().id));
    }

    #[test]
    fn test_unresolvable_pack() {
        let mut catalog = Catalog::new(RarityTable::default());
        catalog.add_pack(Pack::sample("ghost", vec![1, 2], 4)).unwrap();
        let pack = catalog.pack("ghost").unwrap();

        let mut rng = StdRng::seed_from_u64(12);
        let pool = DrawPool::for_pack(&catalog, pack);
        assert!(pool.roll(catalog.weights(), &mut rng).is_none());
        assert!(draw_many(&catalog, pack, 4, &mut rng).is_empty());
    }

    #[test]
    fn test_absent_rarities_never_drawn() {
        let mut catalog = Catalog::new(RarityTable::default());
        let rare = Card::sample(Rarity::Rare);
        let legendary = Card::sample(Rarity::Legendary);
        let normal = Card::sample(Rarity::Normal);
        for card in [&rare, &legendary, &normal] {
            catalog.add_card(card.clone()).unwrap();
        }
        catalog
            .add_pack(Pack::sample("p", vec![rare.id, legendary.id], 10))
            .unwrap();
        let pack = catalog.pack("p").unwrap();

        let mut rng = StdRng::seed_from_u64(13);
        let drawn = draw_many(&catalog, pack, 5_000, &mut rng);
        assert_eq!(drawn.len(), 5_000);
        assert!(drawn.iter().all(|c| c.rarity != Rarity::Normal));
        assert!(drawn.iter().any(|c| c.rarity == Rarity::Legendary));
    }
}
