use crate::AppState;
use crate::error::ApiError;
use crate::order_book::{OrderSide, fillable_asks, weth_needed_for_market_buy};
use crate::steps::{
    OrderFeeData, Step, create_buy_sell_limit_matching_steps, create_buy_sell_limit_steps,
    create_buy_sell_market_steps, create_toggle_token_lock_steps, create_wrap_eth_steps,
    eth_shortfall,
};
use crate::store::{RelayerStore, WalletSnapshot};
use crate::tokens::{
    Token, TokenBalance, find_token, quote_amount_in_units, rescale_units, units_in_token_amount,
};
use axum::Json;
use axum::extract::State;
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct LimitStepsRequest {
    pub base_token: String,
    pub quote_token: String,
    pub side: OrderSide,
    /// Base token amount in human units, e.g. `"1.5"`.
    pub amount: String,
    pub price: Decimal,
    #[serde(default)]
    pub fee_data: OrderFeeData,
}

#[derive(Deserialize)]
pub struct MarketStepsRequest {
    pub base_token: String,
    pub quote_token: String,
    pub side: OrderSide,
    pub amount: String,
    /// WETH base units, derived from the resting asks when absent.
    #[serde(default)]
    pub weth_needed_for_orders: Option<Decimal>,
    #[serde(default)]
    pub fee_data: OrderFeeData,
}

#[derive(Deserialize)]
pub struct LimitMatchingStepsRequest {
    pub base_token: String,
    pub quote_token: String,
    pub side: OrderSide,
    pub amount: String,
    pub price: Decimal,
    /// WETH base units; defaults to `amount * price`, the most a buy can
    /// cost.
    #[serde(default)]
    pub weth_needed_for_orders: Option<Decimal>,
    #[serde(default)]
    pub fee_data: OrderFeeData,
}

#[derive(Deserialize)]
pub struct ToggleLockRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct WrapEthRequest {
    /// Target WETH balance in human units.
    pub new_weth_balance: String,
}

#[derive(Serialize, Debug)]
pub struct StepsResponse {
    pub steps: Vec<Step>,
}

fn planned(steps: Vec<Step>) -> Json<StepsResponse> {
    info!(
        "Planned {} steps: {}",
        steps.len(),
        steps.iter().map(Step::describe).collect::<Vec<_>>().join(", ")
    );
    Json(StepsResponse { steps })
}

/// Wallet data a trade is planned against.
struct TradeContext {
    wallet: WalletSnapshot,
    weth_token_balance: TokenBalance,
    base_token: Token,
    quote_token: Token,
}

fn resolve_token(wallet: &WalletSnapshot, address: &str) -> Result<Token, ApiError> {
    find_token(&wallet.tokens(), address)
        .cloned()
        .ok_or_else(|| ApiError::UnknownToken(address.to_string()))
}

fn loaded_weth_balance(wallet: &WalletSnapshot) -> Result<TokenBalance, ApiError> {
    wallet
        .weth_token_balance
        .clone()
        .ok_or(ApiError::WalletNotLoaded)
}

async fn trade_context<S: RelayerStore>(
    store: &S,
    base_token: &str,
    quote_token: &str,
) -> Result<TradeContext, ApiError> {
    let wallet = store.wallet().await;
    let weth_token_balance = loaded_weth_balance(&wallet)?;
    let base_token = resolve_token(&wallet, base_token)?;
    let quote_token = resolve_token(&wallet, quote_token)?;
    Ok(TradeContext {
        wallet,
        weth_token_balance,
        base_token,
        quote_token,
    })
}

fn ensure_eth_covers_wrap(steps: &[Step], eth_balance: Decimal) -> Result<(), ApiError> {
    match eth_shortfall(steps, eth_balance) {
        Some(missing) => Err(ApiError::InsufficientBalance(missing)),
        None => Ok(()),
    }
}

pub async fn limit_steps_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(request): Json<LimitStepsRequest>,
) -> Result<Json<StepsResponse>, ApiError> {
    let context = trade_context(store.as_ref(), &request.base_token, &request.quote_token).await?;
    let amount = units_in_token_amount(&request.amount, context.base_token.decimals)?;

    let steps = create_buy_sell_limit_steps(
        &context.base_token,
        &context.quote_token,
        &context.wallet.token_balances,
        &context.weth_token_balance,
        amount,
        request.price,
        request.side,
        &request.fee_data,
    );
    ensure_eth_covers_wrap(&steps, context.wallet.eth_balance)?;
    Ok(planned(steps))
}

pub async fn market_steps_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(request): Json<MarketStepsRequest>,
) -> Result<Json<StepsResponse>, ApiError> {
    let context = trade_context(store.as_ref(), &request.base_token, &request.quote_token).await?;
    let amount = units_in_token_amount(&request.amount, context.base_token.decimals)?;

    let weth_needed_for_orders = match (request.weth_needed_for_orders, request.side) {
        (Some(weth_needed), _) => weth_needed,
        (None, OrderSide::Sell) => Decimal::ZERO,
        (None, OrderSide::Buy) => {
            let orders = store.orders().await;
            let asks = fillable_asks(&orders, context.wallet.web3_state);
            let cost = weth_needed_for_market_buy(&asks, amount)
                .ok_or(ApiError::NotEnoughLiquidity(amount))?;
            rescale_units(
                cost,
                context.base_token.decimals,
                context.quote_token.decimals,
            )
        }
    };

    let steps = create_buy_sell_market_steps(
        &context.base_token,
        &context.quote_token,
        &context.wallet.token_balances,
        &context.weth_token_balance,
        context.wallet.eth_balance,
        amount,
        request.side,
        weth_needed_for_orders,
        &request.fee_data,
    );
    ensure_eth_covers_wrap(&steps, context.wallet.eth_balance)?;
    Ok(planned(steps))
}

pub async fn limit_matching_steps_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(request): Json<LimitMatchingStepsRequest>,
) -> Result<Json<StepsResponse>, ApiError> {
    let context = trade_context(store.as_ref(), &request.base_token, &request.quote_token).await?;
    let amount = units_in_token_amount(&request.amount, context.base_token.decimals)?;
    let weth_needed_for_orders = request.weth_needed_for_orders.unwrap_or_else(|| {
        quote_amount_in_units(
            amount,
            request.price,
            &context.base_token,
            &context.quote_token,
        )
    });

    let steps = create_buy_sell_limit_matching_steps(
        &context.base_token,
        &context.quote_token,
        &context.wallet.token_balances,
        &context.weth_token_balance,
        context.wallet.eth_balance,
        amount,
        request.side,
        weth_needed_for_orders,
        request.price,
        &request.fee_data,
    );
    ensure_eth_covers_wrap(&steps, context.wallet.eth_balance)?;
    Ok(planned(steps))
}

pub async fn toggle_lock_steps_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(request): Json<ToggleLockRequest>,
) -> Result<Json<StepsResponse>, ApiError> {
    let wallet = store.wallet().await;
    let token_balance = wallet
        .weth_token_balance
        .iter()
        .chain(wallet.token_balances.iter())
        .find(|token_balance| token_balance.token.has_address(&request.token))
        .ok_or_else(|| ApiError::UnknownToken(request.token.clone()))?;

    let steps = create_toggle_token_lock_steps(&token_balance.token, token_balance.is_unlocked);
    Ok(planned(steps))
}

pub async fn wrap_eth_steps_handler<S: RelayerStore>(
    State(AppState { store }): State<AppState<S>>,
    Json(request): Json<WrapEthRequest>,
) -> Result<Json<StepsResponse>, ApiError> {
    let wallet = store.wallet().await;
    let weth_token_balance = loaded_weth_balance(&wallet)?;
    let new_weth_balance =
        units_in_token_amount(&request.new_weth_balance, weth_token_balance.token.decimals)?;

    let steps = create_wrap_eth_steps(weth_token_balance.balance, new_weth_balance);
    ensure_eth_covers_wrap(&steps, wallet.eth_balance)?;
    Ok(planned(steps))
}
