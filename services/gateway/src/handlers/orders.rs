use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use types::ids::OrderId;
use types::order::PlaceOrderRequest;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::models::{ApiResponse, PlacedOrder};
use crate::state::AppState;

pub async fn place_order(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PlaceOrderRequest>,
) -> Result<Json<ApiResponse<PlacedOrder>>, AppError> {
    let (order, trades) = state.engine.process_order(request).await?;
    Ok(Json(ApiResponse::success(PlacedOrder { order, trades })))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<types::order::Order>>, AppError> {
    // A malformed id cannot name any order
    let id = OrderId::parse(&id).map_err(|_| AppError::NotFound("Order not found".into()))?;

    let order = state
        .engine
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;
    Ok(Json(ApiResponse::success(order)))
}

pub async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let id = OrderId::parse(&id).map_err(|_| AppError::NotFound("order not found".into()))?;

    state.engine.cancel_order(id).await?;
    Ok(Json(ApiResponse::success(json!({
        "message": "Order cancelled successfully"
    }))))
}

#[derive(Debug, Deserialize)]
pub struct BookQuery {
    pub symbol: Option<String>,
}

pub async fn get_order_book(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let data = match query.symbol {
        Some(symbol) => {
            let snapshot = state.engine.get_book(&symbol).await;
            serde_json::to_value(snapshot)
        }
        // No symbol: condensed view of every book
        None => serde_json::to_value(state.engine.get_all_books().await),
    }
    .map_err(|e| AppError::from(types::errors::EngineError::Internal(e.to_string())))?;

    Ok(Json(ApiResponse::success(data)))
}
