use crate::AppState;
use crate::order_book::{UiOrder, build_order_book};
use crate::store::{RelayerStore, WalletSnapshot};
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

pub async fn set_orders_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(orders): Json<Vec<UiOrder>>,
) -> impl IntoResponse {
    store.set_orders(orders).await;
    StatusCode::NO_CONTENT
}

pub async fn set_user_orders_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(orders): Json<Vec<UiOrder>>,
) -> impl IntoResponse {
    store.set_user_orders(orders).await;
    StatusCode::NO_CONTENT
}

pub async fn set_wallet_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(wallet): Json<WalletSnapshot>,
) -> impl IntoResponse {
    store.set_wallet(wallet).await;
    StatusCode::NO_CONTENT
}

pub async fn order_book_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
) -> impl IntoResponse {
    let orders = store.orders().await;
    let user_orders = store.user_orders().await;
    let wallet = store.wallet().await;

    let order_book = build_order_book(&orders, &user_orders, wallet.web3_state);
    (StatusCode::OK, Json(order_book))
}
