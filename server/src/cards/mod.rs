use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::{err, Res};

pub mod catalog;

/// Card rarity tiers, in ascending order of scarcity. The derived ordering is
/// relied upon for deterministic iteration when drawing.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Normal,
    Common,
    Rare,
    SuperRare,
    UltraRare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 7] = [
        Rarity::Normal,
        Rarity::Common,
        Rarity::Rare,
        Rarity::SuperRare,
        Rarity::UltraRare,
        Rarity::Epic,
        Rarity::Legendary,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "normal" => Some(Rarity::Normal),
            "common" => Some(Rarity::Common),
            "rare" => Some(Rarity::Rare),
            "superrare" => Some(Rarity::SuperRare),
            "ultrarare" => Some(Rarity::UltraRare),
            "epic" => Some(Rarity::Epic),
            "legendary" => Some(Rarity::Legendary),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn default_weight(self) -> u32 {
        match self {
            Rarity::Normal => 40,
            Rarity::Common => 25,
            Rarity::Rare => 15,
            Rarity::SuperRare => 10,
            Rarity::UltraRare => 6,
            Rarity::Epic => 3,
            Rarity::Legendary => 1,
        }
    }

    /// Short tier label shown on card faces.
    pub fn label(self) -> &'static str {
        match self {
            Rarity::Normal => "N",
            Rarity::Common => "R",
            Rarity::Rare => "SR",
            Rarity::SuperRare => "SSR",
            Rarity::UltraRare => "UR",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LR",
        }
    }

    pub fn stars(self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn colour(self) -> &'static str {
        match self {
            Rarity::Normal => "#8B8B8B",
            Rarity::Common => "#3A9D6A",
            Rarity::Rare => "#2AAFAF",
            Rarity::SuperRare => "#E8A020",
            Rarity::UltraRare => "#E06050",
            Rarity::Epic => "#C82020",
            Rarity::Legendary => "#FFD700",
        }
    }
}

/// Draw weight for each rarity. Every weight is strictly positive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RarityTable {
    weights: [u32; 7],
}

impl RarityTable {
    pub fn weight(&self, rarity: Rarity) -> u32 {
        self.weights[rarity.index()]
    }

    pub fn set(&mut self, rarity: Rarity, weight: u32) -> Res<()> {
        if weight == 0 {
            return err(format!("Weight for {rarity:?} must be positive."));
        }
        self.weights[rarity.index()] = weight;
        Ok(())
    }
}

impl Default for RarityTable {
    fn default() -> Self {
        Self {
            weights: Rarity::ALL.map(Rarity::default_weight),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize)]
pub struct Card {
    pub id: u32,
    pub rarity: Rarity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,

    /// Names, artwork and the like. Passed through to clients untouched.
    #[serde(flatten)]
    display: Map<String, Value>,
}

impl Card {
    pub fn new(id: u32, rarity: Rarity, series: Option<String>, display: Map<String, Value>) -> Self {
        Self {
            id,
            rarity,
            series,
            display,
        }
    }

    pub fn name(&self) -> String {
        ["nameChinese", "nameEnglish"]
            .iter()
            .filter_map(|key| self.display.get(*key).and_then(Value::as_str))
            .find(|name| !name.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Card {}", self.id))
    }

    #[cfg(test)]
    pub fn sample(rarity: Rarity) -> Self {
        static ID: std::sync::atomic::AtomicU32 = std::sync::atomic::AtomicU32::new(1);

        let id = ID.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let mut display = Map::new();
        display.insert("nameEnglish".to_string(), format!("Card {id}").into());
        display.insert(
            "image".to_string(),
            format!("images/cards/card-{id}.jpg").into(),
        );
        Self::new(id, rarity, None, display)
    }
}

#[derive(Clone, Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub id: String,
    #[serde(rename = "cards")]
    card_ids: Vec<u32>,
    #[serde(rename = "cardCount")]
    draw_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    bgm: Option<String>,
    #[serde(flatten)]
    display: Map<String, Value>,
}

impl Pack {
    pub fn new(
        id: String,
        card_ids: Vec<u32>,
        draw_count: u32,
        bgm: Option<String>,
        display: Map<String, Value>,
    ) -> Self {
        Self {
            id,
            card_ids,
            draw_count,
            bgm,
            display,
        }
    }

    /// Card ids in the order they are listed. May contain ids which don't
    /// exist in the catalog.
    pub fn card_ids(&self) -> &[u32] {
        &self.card_ids
    }

    /// Number of cards drawn when this pack is opened.
    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    #[cfg(test)]
    pub fn sample(id: &str, card_ids: Vec<u32>, draw_count: u32) -> Self {
        Self::new(id.to_string(), card_ids, draw_count, None, Map::new())
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Series {
    pub id: String,
    pub name: String,
    pub order: i64,
}

/// Static table of cards, packs and series. Built once at startup and only
/// read afterwards.
#[derive(Debug, Default)]
pub struct Catalog {
    cards: Vec<Card>,
    card_index: HashMap<u32, usize>,
    packs: Vec<Pack>,
    pack_index: HashMap<String, usize>,

    /// Map from card id to the indices of the packs listing it.
    card_packs: HashMap<u32, Vec<usize>>,

    /// Kept sorted by order.
    series: Vec<Series>,
    weights: RarityTable,
}

impl Catalog {
    pub fn new(weights: RarityTable) -> Self {
        Self {
            weights,
            ..Default::default()
        }
    }

    pub fn add_card(&mut self, card: Card) -> Res<()> {
        if self.card_index.contains_key(&card.id) {
            return err(format!("Duplicate card id: {}", card.id));
        }
        self.card_index.insert(card.id, self.cards.len());
        self.cards.push(card);
        Ok(())
    }

    pub fn add_pack(&mut self, pack: Pack) -> Res<()> {
        if self.pack_index.contains_key(&pack.id) {
            return err(format!("Duplicate pack id: {}", pack.id));
        }
        if pack.draw_count == 0 {
            return err(format!("Pack {} must draw at least one card.", pack.id));
        }

        let index = self.packs.len();
        for &card_id in &pack.card_ids {
            let packs = self.card_packs.entry(card_id).or_default();
            if !packs.contains(&index) {
                packs.push(index);
            }
        }
        self.pack_index.insert(pack.id.clone(), index);
        self.packs.push(pack);
        Ok(())
    }

    pub fn add_series(&mut self, series: Series) {
        let at = self.series.partition_point(|s| s.order <= series.order);
        self.series.insert(at, series);
    }

    pub fn card(&self, id: u32) -> Option<&Card> {
        self.card_index.get(&id).map(|&i| &self.cards[i])
    }

    pub fn pack(&self, id: &str) -> Option<&Pack> {
        self.pack_index.get(id).map(|&i| &self.packs[i])
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn packs(&self) -> &[Pack] {
        &self.packs
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    pub fn weights(&self) -> &RarityTable {
        &self.weights
    }

    /// Packs whose card list includes this card id, in catalog order.
    pub fn packs_containing(&self, card_id: u32) -> Vec<&Pack> {
        self.card_packs
            .get(&card_id)
            .map(|indices| indices.iter().map(|&i| &self.packs[i]).collect())
            .unwrap_or_default()
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }
}
