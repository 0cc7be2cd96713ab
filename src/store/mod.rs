pub mod in_memory;

use crate::order_book::{UiOrder, Web3State};
use crate::tokens::{Token, TokenBalance, tokens_from_balances};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wallet state as last reported by the client: balances, allowances and
/// the provider connection state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletSnapshot {
    #[serde(default)]
    pub web3_state: Web3State,
    #[serde(default)]
    pub token_balances: Vec<TokenBalance>,
    #[serde(default)]
    pub weth_token_balance: Option<TokenBalance>,
    #[serde(default)]
    pub eth_balance: Decimal,
}

impl WalletSnapshot {
    pub fn tokens(&self) -> Vec<Token> {
        tokens_from_balances(&self.token_balances, self.weth_token_balance.as_ref())
    }
}

/// Fee terms the relayer advertises to clients. They are published as-is;
/// plans take their fee data from the request instead.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelayerSettings {
    pub fee_percentage: Decimal,
    pub fee_recipient: String,
}

#[async_trait::async_trait]
pub trait RelayerStore: Send + Sync + 'static {
    /// Replaces the relayer's order list.
    async fn set_orders(&self, orders: Vec<UiOrder>);

    /// Replaces the orders placed by the connected account.
    async fn set_user_orders(&self, orders: Vec<UiOrder>);

    async fn set_wallet(&self, wallet: WalletSnapshot);

    async fn set_fee_percentage(&self, fee_percentage: Decimal);

    async fn set_fee_recipient(&self, fee_recipient: String);

    async fn orders(&self) -> Vec<UiOrder>;

    async fn user_orders(&self) -> Vec<UiOrder>;

    async fn wallet(&self) -> WalletSnapshot;

    async fn relayer_settings(&self) -> RelayerSettings;
}
