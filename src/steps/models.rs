use crate::order_book::OrderSide;
use crate::tokens::{Token, token_amount_in_units};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a step belongs to a trade flow or was requested on its own
/// (e.g. toggling a token lock from the wallet view).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepContext {
    Order,
    Standalone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StepKind {
    ToggleTokenLock,
    WrapEth,
    BuySellLimit,
    BuySellMarket,
    BuySellLimitMatching,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Step {
    ToggleTokenLock {
        token: Token,
        is_unlocked: bool,
        context: StepContext,
    },
    WrapEth {
        current_weth_balance: Decimal,
        new_weth_balance: Decimal,
        context: StepContext,
    },
    BuySellLimit {
        token: Token,
        amount: Decimal,
        price: Decimal,
        side: OrderSide,
    },
    BuySellMarket {
        token: Token,
        amount: Decimal,
        side: OrderSide,
    },
    BuySellLimitMatching {
        token: Token,
        amount: Decimal,
        price: Decimal,
        side: OrderSide,
    },
}

impl Step {
    pub fn kind(&self) -> StepKind {
        match self {
            Step::ToggleTokenLock { .. } => StepKind::ToggleTokenLock,
            Step::WrapEth { .. } => StepKind::WrapEth,
            Step::BuySellLimit { .. } => StepKind::BuySellLimit,
            Step::BuySellMarket { .. } => StepKind::BuySellMarket,
            Step::BuySellLimitMatching { .. } => StepKind::BuySellLimitMatching,
        }
    }

    /// Terminal steps submit the trade itself; every other step is a
    /// precondition for it.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Step::BuySellLimit { .. } | Step::BuySellMarket { .. } | Step::BuySellLimitMatching { .. }
        )
    }

    /// Token whose approval this step toggles, if any.
    pub fn unlocked_token(&self) -> Option<&Token> {
        match self {
            Step::ToggleTokenLock { token, .. } => Some(token),
            _ => None,
        }
    }

    /// Amount of ether to wrap for a `WrapEth` step.
    pub fn wrap_amount(&self) -> Option<Decimal> {
        match self {
            Step::WrapEth {
                current_weth_balance,
                new_weth_balance,
                ..
            } => Some(*new_weth_balance - *current_weth_balance),
            _ => None,
        }
    }

    /// One line summary of the step, amounts rendered with the token's
    /// display precision.
    pub fn describe(&self) -> String {
        match self {
            Step::ToggleTokenLock {
                token, is_unlocked, ..
            } => {
                let action = if *is_unlocked { "Lock" } else { "Unlock" };
                format!("{action} {}", token.display_symbol())
            }
            Step::WrapEth { .. } => {
                let amount = self.wrap_amount().unwrap_or_default();
                let units = token_amount_in_units(amount, 18, 4).unwrap_or_else(|_| amount.to_string());
                format!("Wrap {units} ETH")
            }
            Step::BuySellLimit {
                token,
                amount,
                price,
                side,
            }
            | Step::BuySellLimitMatching {
                token,
                amount,
                price,
                side,
            } => format!(
                "{side} {} {} at {price}",
                units_or_raw(*amount, token),
                token.display_symbol()
            ),
            Step::BuySellMarket {
                token,
                amount,
                side,
            } => format!(
                "{side} {} {} at market",
                units_or_raw(*amount, token),
                token.display_symbol()
            ),
        }
    }
}

fn units_or_raw(amount: Decimal, token: &Token) -> String {
    token_amount_in_units(amount, token.decimals, token.display_decimals)
        .unwrap_or_else(|_| amount.to_string())
}

/// Fee amounts for a trade attempt. A fee asset of `None` stands for empty
/// asset data, meaning the fee is paid in the protocol fee token.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderFeeData {
    #[serde(default)]
    pub maker_fee: Decimal,
    #[serde(default)]
    pub taker_fee: Decimal,
    #[serde(default)]
    pub maker_fee_asset: Option<String>,
    #[serde(default)]
    pub taker_fee_asset: Option<String>,
}

impl OrderFeeData {
    pub fn maker(fee: Decimal, asset: Option<&str>) -> Self {
        OrderFeeData {
            maker_fee: fee,
            maker_fee_asset: asset.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn taker(fee: Decimal, asset: Option<&str>) -> Self {
        OrderFeeData {
            taker_fee: fee,
            taker_fee_asset: asset.map(str::to_string),
            ..Default::default()
        }
    }
}
