use std::{collections::HashMap, path::Path};

use serde_json::{Map, Value};

use crate::{
    cards::{Card, Catalog, Pack, Rarity, RarityTable, Series},
    Res,
};

#[derive(serde::Deserialize, Debug, Default)]
struct RawRarity {
    /// Weight overrides keyed by rarity name. Missing tiers keep their
    /// default weight.
    #[serde(default)]
    weights: HashMap<String, u32>,
}

#[derive(serde::Deserialize, Debug)]
struct RawCard {
    id: u32,

    /// Rarity string, normal through legendary.
    rarity: String,

    series: Option<String>,

    #[serde(flatten)]
    display: Map<String, Value>,
}

impl RawCard {
    fn to_card(self) -> Option<Card> {
        let Some(rarity) = Rarity::parse(&self.rarity) else {
            tracing::warn!("Skipping card {} with unknown rarity {}.", self.id, self.rarity);
            return None;
        };
        Some(Card::new(self.id, rarity, self.series, self.display))
    }
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RawPack {
    id: String,
    #[serde(default)]
    cards: Vec<u32>,
    card_count: u32,
    bgm: Option<String>,
    #[serde(flatten)]
    display: Map<String, Value>,
}

#[derive(serde::Deserialize, Debug)]
struct RawCatalog {
    #[serde(default)]
    rarity: RawRarity,
    #[serde(default)]
    series: Vec<Series>,
    #[serde(default)]
    packs: Vec<RawPack>,
    #[serde(default)]
    cards: Vec<RawCard>,
}

fn weights_from(raw: RawRarity) -> Res<RarityTable> {
    let mut table = RarityTable::default();
    for (name, weight) in raw.weights {
        match Rarity::parse(&name) {
            Some(rarity) => table.set(rarity, weight)?,
            None => tracing::warn!("Ignoring weight for unknown rarity {name}."),
        }
    }
    Ok(table)
}

/// Decode a JSON catalog document into a catalog. Cards with an unrecognised
/// rarity are dropped. Packs may reference card ids which don't exist.
pub fn decode_catalog(data: &[u8]) -> Res<Catalog> {
    let raw: RawCatalog = serde_json::from_slice(data).map_err(|e| e.to_string())?;

    let mut catalog = Catalog::new(weights_from(raw.rarity)?);
    for series in raw.series {
        catalog.add_series(series);
    }
    for card in raw.cards.into_iter().filter_map(RawCard::to_card) {
        catalog.add_card(card)?;
    }
    for pack in raw.packs {
        catalog.add_pack(Pack::new(
            pack.id,
            pack.cards,
            pack.card_count,
            pack.bgm,
            pack.display,
        ))?;
    }

    Ok(catalog)
}

pub async fn load_catalog(path: &Path) -> Res<Catalog> {
    tracing::debug!("Loading catalog from {}.", path.display());
    let raw = tokio::fs::read(path).await.map_err(|e| e.to_string())?;
    tracing::debug!("Read catalog from disk. Parsing JSON.");
    let catalog = decode_catalog(&raw)?;
    tracing::debug!(
        "Loaded catalog with {} cards in {} packs.",
        catalog.size(),
        catalog.packs().len()
    );
    Ok(catalog)
}
