use crate::cards::{Rarity, RarityTable};

use super::DrawPool;

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RarityOdds {
    pub rarity: Rarity,
    pub label: &'static str,
    pub weight: u32,

    /// Percentage chance that a single draw lands in this tier.
    pub chance: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct CardOdds {
    pub id: u32,
    pub name: String,
    pub chance: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct PackOdds {
    pub rarities: Vec<RarityOdds>,

    /// Individual chance of each legendary card in the pack.
    pub legendary: Vec<CardOdds>,
}

/// Per-draw odds for a pool, renormalised over the tiers it contains.
pub fn pack_odds(pool: &DrawPool, weights: &RarityTable) -> PackOdds {
    let total = pool.total_weight(weights);
    if total == 0 {
        return PackOdds::default();
    }

    let chance = |rarity: Rarity| f64::from(weights.weight(rarity)) / total as f64 * 100.0;

    let rarities = pool
        .rarities()
        .map(|rarity| RarityOdds {
            rarity,
            label: rarity.label(),
            weight: weights.weight(rarity),
            chance: chance(rarity),
        })
        .collect();

    let legendaries = pool.cards_of(Rarity::Legendary);
    let legendary = legendaries
        .iter()
        .map(|card| CardOdds {
            id: card.id,
            name: card.name(),
            chance: chance(Rarity::Legendary) / legendaries.len() as f64,
        })
        .collect();

    PackOdds {
        rarities,
        legendary,
    }
}
