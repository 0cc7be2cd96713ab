mod models;

pub use models::*;

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TokenAmountError {
    #[error("invalid token amount: {0}")]
    Parse(String),

    #[error("token amount must not be negative: {0}")]
    Negative(String),

    #[error("token amount out of range for {0} decimals")]
    Overflow(u32),
}

fn decimals_factor(decimals: u32) -> Result<Decimal, TokenAmountError> {
    10i128
        .checked_pow(decimals)
        .and_then(|factor| Decimal::try_from_i128_with_scale(factor, 0).ok())
        .ok_or(TokenAmountError::Overflow(decimals))
}

/// Converts a human readable amount (e.g. `"1.5"`) into base units.
/// Fractions below one base unit are dropped.
pub fn units_in_token_amount(units: &str, decimals: u32) -> Result<Decimal, TokenAmountError> {
    let units = Decimal::from_str(units.trim())
        .map_err(|_| TokenAmountError::Parse(units.to_string()))?;
    if units.is_sign_negative() && !units.is_zero() {
        return Err(TokenAmountError::Negative(units.to_string()));
    }
    let amount = units
        .checked_mul(decimals_factor(decimals)?)
        .ok_or(TokenAmountError::Overflow(decimals))?;
    Ok(amount.trunc())
}

/// Converts base units into a human readable amount with exactly
/// `display_decimals` fractional digits.
pub fn token_amount_in_units(
    amount: Decimal,
    decimals: u32,
    display_decimals: u32,
) -> Result<String, TokenAmountError> {
    let units = amount
        .checked_div(decimals_factor(decimals)?)
        .ok_or(TokenAmountError::Overflow(decimals))?
        .round_dp_with_strategy(display_decimals, RoundingStrategy::MidpointAwayFromZero);
    Ok(format!("{:.*}", display_decimals as usize, units))
}

/// Re-expresses base units of a `from_decimals` token as base units of a
/// `to_decimals` token, rounding up to a whole unit. Saturates at
/// `Decimal::MAX`.
pub fn rescale_units(amount: Decimal, from_decimals: u32, to_decimals: u32) -> Decimal {
    let rescaled = if to_decimals >= from_decimals {
        decimals_factor(to_decimals - from_decimals)
            .ok()
            .and_then(|factor| amount.checked_mul(factor))
    } else {
        decimals_factor(from_decimals - to_decimals)
            .ok()
            .and_then(|factor| amount.checked_div(factor))
    };
    rescaled.map_or(Decimal::MAX, |units| units.ceil())
}

/// Quote token base units paid for `amount` base units of `base_token` at a
/// human readable `price`.
pub fn quote_amount_in_units(
    amount: Decimal,
    price: Decimal,
    base_token: &Token,
    quote_token: &Token,
) -> Decimal {
    rescale_units(
        amount.saturating_mul(price),
        base_token.decimals,
        quote_token.decimals,
    )
}

/// Every token the wallet snapshot knows about, WETH first.
pub fn tokens_from_balances(
    token_balances: &[TokenBalance],
    weth_token_balance: Option<&TokenBalance>,
) -> Vec<Token> {
    weth_token_balance
        .into_iter()
        .chain(token_balances.iter())
        .map(|token_balance| token_balance.token.clone())
        .collect()
}

pub fn find_token<'a>(tokens: &'a [Token], address: &str) -> Option<&'a Token> {
    tokens.iter().find(|token| token.has_address(address))
}
