use crate::error::AppError;
use crate::handlers::now_secs;
use crate::models::HistoryQuery;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    Json,
};
use market_data::history::DEFAULT_WINDOW_MS;
use types::coin::HistoryPoint;
use types::envelope::ResponseEnvelope;

/// Unknown coins yield an empty history rather than 404.
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ResponseEnvelope<Vec<HistoryPoint>>>, AppError> {
    let params = query.into_params(chrono::Utc::now().timestamp_millis(), DEFAULT_WINDOW_MS)?;

    let points = state.market.history(
        &id,
        params.interval,
        params.start,
        params.end,
        &mut rand::thread_rng(),
    );

    Ok(Json(ResponseEnvelope::counted(points, now_secs())))
}
