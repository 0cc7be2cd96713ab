use crate::AppState;
use crate::store::RelayerStore;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use rust_decimal::Decimal;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct UpdateRelayerRequest {
    #[serde(default)]
    pub fee_percentage: Option<Decimal>,
    #[serde(default)]
    pub fee_recipient: Option<String>,
}

pub async fn relayer_settings_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(store.relayer_settings().await))
}

pub async fn update_relayer_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(request): Json<UpdateRelayerRequest>,
) -> impl IntoResponse {
    if let Some(fee_percentage) = request.fee_percentage {
        store.set_fee_percentage(fee_percentage).await;
    }
    if let Some(fee_recipient) = request.fee_recipient {
        store.set_fee_recipient(fee_recipient).await;
    }
    (StatusCode::OK, Json(store.relayer_settings().await))
}
