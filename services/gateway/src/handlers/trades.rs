use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use types::trade::Trade;

use crate::error::AppError;
use crate::models::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TradeQuery {
    pub symbol: Option<String>,
}

pub async fn list_trades(
    State(state): State<AppState>,
    Query(query): Query<TradeQuery>,
) -> Result<Json<ApiResponse<Vec<Trade>>>, AppError> {
    let trades = state.engine.get_trades(query.symbol.as_deref()).await?;
    Ok(Json(ApiResponse::success(trades)))
}
