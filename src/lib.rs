//! Trade step planning and order book aggregation for a 0x-style DEX front
//! end, served over HTTP from in-memory relayer state.
//!
//! The core ([`steps`] and [`order_book`]) is pure and synchronous; the
//! [`store`] and [`handlers`] modules wrap it in an axum service.

pub mod config;
pub mod error;
pub mod handlers;
pub mod order_book;
pub mod steps;
pub mod store;
pub mod tokens;

use crate::store::RelayerStore;
use axum::Router;
use axum::routing::{get, post, put};
use std::sync::Arc;

pub struct AppState<S: RelayerStore> {
    pub store: Arc<S>,
}

impl<S: RelayerStore> AppState<S> {
    pub fn new(store: S) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }
}

impl<S: RelayerStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            store: Arc::clone(&self.store),
        }
    }
}

pub fn router<S: RelayerStore>(app_state: AppState<S>) -> Router {
    Router::new()
        .route("/orders", put(handlers::order_book::set_orders_handler::<S>))
        .route("/user_orders", put(handlers::order_book::set_user_orders_handler::<S>))
        .route("/wallet", put(handlers::order_book::set_wallet_handler::<S>))
        .route("/order_book", get(handlers::order_book::order_book_handler::<S>))
        .route(
            "/relayer",
            get(handlers::relayer::relayer_settings_handler::<S>)
                .put(handlers::relayer::update_relayer_handler::<S>),
        )
        .route("/steps/limit", post(handlers::steps::limit_steps_handler::<S>))
        .route("/steps/market", post(handlers::steps::market_steps_handler::<S>))
        .route(
            "/steps/limit_matching",
            post(handlers::steps::limit_matching_steps_handler::<S>),
        )
        .route(
            "/steps/toggle_lock",
            post(handlers::steps::toggle_lock_steps_handler::<S>),
        )
        .route("/steps/wrap_eth", post(handlers::steps::wrap_eth_steps_handler::<S>))
        .with_state(app_state)
}
