use serde::Serialize;
use types::order::Order;
use types::trade::Trade;

/// Uniform response envelope
///
/// Success responses carry `data`, failures carry `error`; the unused
/// field is omitted entirely.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Result of placing an order: the accepted order plus its trades
#[derive(Debug, Serialize)]
pub struct PlacedOrder {
    pub order: Order,
    pub trades: Vec<Trade>,
}
