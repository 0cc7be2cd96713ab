use crate::tokens::TokenAmountError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("wallet balances are not loaded")]
    WalletNotLoaded,

    #[error("unknown token: {0}")]
    UnknownToken(String),

    #[error("not enough liquidity to fill {0}")]
    NotEnoughLiquidity(Decimal),

    #[error("insufficient ETH balance, {0} missing")]
    InsufficientBalance(Decimal),

    #[error(transparent)]
    InvalidAmount(#[from] TokenAmountError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::WalletNotLoaded => StatusCode::CONFLICT,
            ApiError::UnknownToken(_) => StatusCode::NOT_FOUND,
            ApiError::NotEnoughLiquidity(_) | ApiError::InsufficientBalance(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
