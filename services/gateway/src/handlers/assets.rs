use crate::error::AppError;
use crate::handlers::now_secs;
use crate::models::AssetsQuery;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use types::coin::CoinRecord;
use types::envelope::ResponseEnvelope;

pub async fn list_assets(
    State(state): State<AppState>,
    Query(params): Query<AssetsQuery>,
) -> Result<Json<ResponseEnvelope<Vec<CoinRecord>>>, AppError> {
    let request = params.into_page_request()?;

    let page = state.market.list(&request, &mut rand::thread_rng())?;

    Ok(Json(ResponseEnvelope::new(
        page.items,
        page.total_items,
        now_secs(),
    )))
}

pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResponseEnvelope<CoinRecord>>, AppError> {
    let coin = state
        .market
        .snapshot(&id, &mut rand::thread_rng())
        .ok_or_else(|| AppError::NotFound(format!("Coin {} not found", id)))?;

    Ok(Json(ResponseEnvelope::new(coin, 1, now_secs())))
}
