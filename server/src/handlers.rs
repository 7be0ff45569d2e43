use axum::{
    extract::{Path, State},
    http::Response,
};

use crate::{
    cards::Rarity,
    draw::{odds, DrawPool},
    session::server::SessionHandle,
    Resp,
};

#[derive(serde::Serialize)]
struct RarityInfo {
    rarity: Rarity,
    label: &'static str,
    stars: u8,
    colour: &'static str,
    weight: u32,
}

pub async fn rarities(State(session): State<SessionHandle>) -> Response<String> {
    let weights = session.catalog().weights();
    let info: Vec<RarityInfo> = Rarity::ALL
        .into_iter()
        .map(|rarity| RarityInfo {
            rarity,
            label: rarity.label(),
            stars: rarity.stars(),
            colour: rarity.colour(),
            weight: weights.weight(rarity),
        })
        .collect();
    Resp::json(&info)
}

pub async fn list_packs(State(session): State<SessionHandle>) -> Response<String> {
    Resp::json(&session.catalog().packs())
}

pub async fn pack_odds(
    State(session): State<SessionHandle>,
    Path(pack_id): Path<String>,
) -> Response<String> {
    let catalog = session.catalog();
    let Some(pack) = catalog.pack(&pack_id) else {
        return Resp::e404(format!("No pack with id: {pack_id}"));
    };
    let pool = DrawPool::for_pack(catalog, pack);
    Resp::json(&odds::pack_odds(&pool, catalog.weights()))
}

pub async fn open_pack(
    State(session): State<SessionHandle>,
    Path(pack_id): Path<String>,
) -> Response<String> {
    match session.open_pack(&pack_id).await {
        Ok(Some(opening)) => Resp::json(&opening),
        Ok(None) => Resp::e404(format!("No pack with id: {pack_id}")),
        Err(e) => Resp::e500(e),
    }
}

pub async fn collection(State(session): State<SessionHandle>) -> Response<String> {
    match session.collection().await {
        Ok(view) => Resp::json(&view),
        Err(e) => Resp::e500(e),
    }
}

pub async fn card_detail(
    State(session): State<SessionHandle>,
    Path(card_id): Path<u32>,
) -> Response<String> {
    match session.card_detail(card_id).await {
        Ok(Some(detail)) => Resp::json(&detail),
        Ok(None) => Resp::e404(format!("No card with id: {card_id}")),
        Err(e) => Resp::e500(e),
    }
}
