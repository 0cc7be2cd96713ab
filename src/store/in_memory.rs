use crate::order_book::UiOrder;
use crate::store::{RelayerSettings, RelayerStore, WalletSnapshot};
use log::info;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory relayer state.
/// Clones share the same underlying state, so the store can be handed to
/// every request handler.
#[derive(Clone)]
pub struct InMemoryRelayerStore {
    orders: Arc<RwLock<Vec<UiOrder>>>,
    user_orders: Arc<RwLock<Vec<UiOrder>>>,
    wallet: Arc<RwLock<WalletSnapshot>>,
    settings: Arc<RwLock<RelayerSettings>>,
}

impl InMemoryRelayerStore {
    pub fn new(settings: RelayerSettings) -> Self {
        InMemoryRelayerStore {
            orders: Arc::new(Default::default()),
            user_orders: Arc::new(Default::default()),
            wallet: Arc::new(Default::default()),
            settings: Arc::new(RwLock::new(settings)),
        }
    }
}

#[async_trait::async_trait]
impl RelayerStore for InMemoryRelayerStore {
    async fn set_orders(&self, orders: Vec<UiOrder>) {
        info!("Relayer orders updated: {} orders", orders.len());
        *self.orders.write().await = orders;
    }

    async fn set_user_orders(&self, orders: Vec<UiOrder>) {
        info!("User orders updated: {} orders", orders.len());
        *self.user_orders.write().await = orders;
    }

    async fn set_wallet(&self, wallet: WalletSnapshot) {
        info!(
            "Wallet updated: {:?}, {} token balances",
            wallet.web3_state,
            wallet.token_balances.len()
        );
        *self.wallet.write().await = wallet;
    }

    async fn set_fee_percentage(&self, fee_percentage: Decimal) {
        info!("Fee percentage set to {fee_percentage}");
        self.settings.write().await.fee_percentage = fee_percentage;
    }

    async fn set_fee_recipient(&self, fee_recipient: String) {
        info!("Fee recipient set to {fee_recipient}");
        self.settings.write().await.fee_recipient = fee_recipient;
    }

    async fn orders(&self) -> Vec<UiOrder> {
        self.orders.read().await.clone()
    }

    async fn user_orders(&self) -> Vec<UiOrder> {
        self.user_orders.read().await.clone()
    }

    async fn wallet(&self) -> WalletSnapshot {
        self.wallet.read().await.clone()
    }

    async fn relayer_settings(&self) -> RelayerSettings {
        self.settings.read().await.clone()
    }
}
