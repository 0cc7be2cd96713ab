use crate::order_book::OrderSide;
use crate::steps::{OrderFeeData, Step, StepContext};
use crate::tokens::{Token, TokenBalance, quote_amount_in_units};
use log::{debug, warn};
use rust_decimal::Decimal;

/// Resolves the balance entry of `token`. Wrapped ether always lives in the
/// dedicated WETH entry rather than in the generic balance list.
fn find_token_balance<'a>(
    token: &Token,
    token_balances: &'a [TokenBalance],
    weth_token_balance: &'a TokenBalance,
) -> Option<&'a TokenBalance> {
    if token.is_weth() || weth_token_balance.token.is_same(token) {
        return Some(weth_token_balance);
    }
    token_balances
        .iter()
        .find(|token_balance| token_balance.token.is_same(token))
}

fn toggle_lock_step(token_balance: &TokenBalance) -> Option<Step> {
    if token_balance.is_unlocked {
        return None;
    }
    Some(Step::ToggleTokenLock {
        token: token_balance.token.clone(),
        is_unlocked: false,
        context: StepContext::Order,
    })
}

/// Returns an unlock step when `token` has no allowance yet.
/// A token missing from the balances is treated as needing nothing.
pub fn unlock_token_step_if_needed(
    token: &Token,
    token_balances: &[TokenBalance],
    weth_token_balance: &TokenBalance,
) -> Option<Step> {
    find_token_balance(token, token_balances, weth_token_balance).and_then(toggle_lock_step)
}

/// Unlock check for the protocol fee token.
pub fn unlock_zrx_step_if_needed(token_balances: &[TokenBalance]) -> Option<Step> {
    token_balances
        .iter()
        .find(|token_balance| token_balance.token.is_zrx())
        .and_then(toggle_lock_step)
}

/// Unlock check for the token a fee is paid in. Without fee asset data the
/// fee is charged in the protocol fee token.
pub fn unlock_fee_asset_step_if_needed(
    fee_asset: Option<&str>,
    token_balances: &[TokenBalance],
    weth_token_balance: &TokenBalance,
) -> Option<Step> {
    let Some(address) = fee_asset else {
        return unlock_zrx_step_if_needed(token_balances);
    };
    let token_balance = if weth_token_balance.token.has_address(address) {
        Some(weth_token_balance)
    } else {
        token_balances
            .iter()
            .find(|token_balance| token_balance.token.has_address(address))
    };
    token_balance.and_then(toggle_lock_step)
}

/// A buy needs `amount * price` WETH; when the balance falls short, a wrap
/// step raising it to exactly that amount is returned. Sells never wrap.
pub fn wrap_eth_step_if_needed(
    amount: Decimal,
    price: Decimal,
    side: OrderSide,
    weth_token_balance: &TokenBalance,
) -> Option<Step> {
    if side == OrderSide::Sell {
        return None;
    }
    let weth_needed = amount.checked_mul(price).unwrap_or(Decimal::MAX);
    if weth_token_balance.balance >= weth_needed {
        return None;
    }
    Some(Step::WrapEth {
        current_weth_balance: weth_token_balance.balance,
        new_weth_balance: weth_needed,
        context: StepContext::Order,
    })
}

/// How much ether is missing to perform the wrap step of `steps`, if any.
pub fn eth_shortfall(steps: &[Step], eth_balance: Decimal) -> Option<Decimal> {
    steps
        .iter()
        .filter_map(Step::wrap_amount)
        .map(|wrap_amount| wrap_amount - eth_balance)
        .find(|missing| *missing > Decimal::ZERO)
}

/// Collects precondition steps and lays them out in execution order.
#[derive(Default)]
struct StepPlan {
    unlocks: Vec<Step>,
    wrap: Option<Step>,
}

impl StepPlan {
    fn unlock(&mut self, step: Option<Step>) {
        let Some(step) = step else {
            return;
        };
        let already_planned = step.unlocked_token().is_some_and(|token| {
            self.unlocks
                .iter()
                .filter_map(Step::unlocked_token)
                .any(|planned| planned.is_same(token))
        });
        if !already_planned {
            self.unlocks.push(step);
        }
    }

    fn wrap(&mut self, step: Option<Step>) {
        if step.is_some() {
            self.wrap = step;
        }
    }

    /// Unlocks come first and the wrap after them, except that a WETH unlock
    /// goes after the wrap producing the balance it approves.
    fn finish(self, terminal: Step) -> Vec<Step> {
        let mut steps = Vec::with_capacity(self.unlocks.len() + 2);
        let (weth_unlocks, other_unlocks): (Vec<Step>, Vec<Step>) = match self.wrap {
            Some(_) => self
                .unlocks
                .into_iter()
                .partition(|step| step.unlocked_token().is_some_and(Token::is_weth)),
            None => (vec![], self.unlocks),
        };
        steps.extend(other_unlocks);
        steps.extend(self.wrap);
        steps.extend(weth_unlocks);
        steps.push(terminal);

        debug!(
            "Planned steps: {:?}",
            steps.iter().map(Step::kind).collect::<Vec<_>>()
        );
        steps
    }
}

/// The token leaving the wallet: quote token for buys, base token for sells.
fn traded_token<'a>(side: OrderSide, base_token: &'a Token, quote_token: &'a Token) -> &'a Token {
    match side {
        OrderSide::Buy => quote_token,
        OrderSide::Sell => base_token,
    }
}

/// Preconditions shared by the taker flows (market and limit matching).
#[allow(clippy::too_many_arguments)]
fn taker_preconditions(
    base_token: &Token,
    quote_token: &Token,
    token_balances: &[TokenBalance],
    weth_token_balance: &TokenBalance,
    eth_balance: Decimal,
    side: OrderSide,
    weth_needed_for_orders: Decimal,
    fee_data: &OrderFeeData,
) -> StepPlan {
    let mut plan = StepPlan::default();

    if fee_data.taker_fee > Decimal::ZERO {
        plan.unlock(unlock_fee_asset_step_if_needed(
            fee_data.taker_fee_asset.as_deref(),
            token_balances,
            weth_token_balance,
        ));
    }

    plan.unlock(unlock_token_step_if_needed(
        traded_token(side, base_token, quote_token),
        token_balances,
        weth_token_balance,
    ));

    if side == OrderSide::Buy && quote_token.is_weth() {
        let wrap = wrap_eth_step_if_needed(
            weth_needed_for_orders,
            Decimal::ONE,
            side,
            weth_token_balance,
        );
        if let Some(missing) = wrap
            .as_ref()
            .and_then(|step| eth_shortfall(std::slice::from_ref(step), eth_balance))
        {
            warn!("ETH balance is {missing} short of the amount to wrap");
        }
        plan.wrap(wrap);
    }

    plan
}

#[allow(clippy::too_many_arguments)]
pub fn create_buy_sell_limit_steps(
    base_token: &Token,
    quote_token: &Token,
    token_balances: &[TokenBalance],
    weth_token_balance: &TokenBalance,
    amount: Decimal,
    price: Decimal,
    side: OrderSide,
    fee_data: &OrderFeeData,
) -> Vec<Step> {
    let mut plan = StepPlan::default();

    if fee_data.maker_fee > Decimal::ZERO {
        plan.unlock(unlock_fee_asset_step_if_needed(
            fee_data.maker_fee_asset.as_deref(),
            token_balances,
            weth_token_balance,
        ));
    }

    plan.unlock(unlock_token_step_if_needed(
        traded_token(side, base_token, quote_token),
        token_balances,
        weth_token_balance,
    ));

    if quote_token.is_weth() {
        plan.wrap(wrap_eth_step_if_needed(
            quote_amount_in_units(amount, price, base_token, quote_token),
            Decimal::ONE,
            side,
            weth_token_balance,
        ));
    }

    plan.finish(Step::BuySellLimit {
        token: base_token.clone(),
        amount,
        price,
        side,
    })
}

/// `weth_needed_for_orders` is in WETH base units.
#[allow(clippy::too_many_arguments)]
pub fn create_buy_sell_market_steps(
    base_token: &Token,
    quote_token: &Token,
    token_balances: &[TokenBalance],
    weth_token_balance: &TokenBalance,
    eth_balance: Decimal,
    amount: Decimal,
    side: OrderSide,
    weth_needed_for_orders: Decimal,
    fee_data: &OrderFeeData,
) -> Vec<Step> {
    taker_preconditions(
        base_token,
        quote_token,
        token_balances,
        weth_token_balance,
        eth_balance,
        side,
        weth_needed_for_orders,
        fee_data,
    )
    .finish(Step::BuySellMarket {
        token: base_token.clone(),
        amount,
        side,
    })
}

#[allow(clippy::too_many_arguments)]
pub fn create_buy_sell_limit_matching_steps(
    base_token: &Token,
    quote_token: &Token,
    token_balances: &[TokenBalance],
    weth_token_balance: &TokenBalance,
    eth_balance: Decimal,
    amount: Decimal,
    side: OrderSide,
    weth_needed_for_orders: Decimal,
    price: Decimal,
    fee_data: &OrderFeeData,
) -> Vec<Step> {
    taker_preconditions(
        base_token,
        quote_token,
        token_balances,
        weth_token_balance,
        eth_balance,
        side,
        weth_needed_for_orders,
        fee_data,
    )
    .finish(Step::BuySellLimitMatching {
        token: base_token.clone(),
        amount,
        price,
        side,
    })
}

/// Wallet flow: lock or unlock a single token outside of any trade.
pub fn create_toggle_token_lock_steps(token: &Token, is_unlocked: bool) -> Vec<Step> {
    vec![Step::ToggleTokenLock {
        token: token.clone(),
        is_unlocked,
        context: StepContext::Standalone,
    }]
}

/// Wallet flow: move the WETH balance to `new_weth_balance`.
pub fn create_wrap_eth_steps(current_weth_balance: Decimal, new_weth_balance: Decimal) -> Vec<Step> {
    vec![Step::WrapEth {
        current_weth_balance,
        new_weth_balance,
        context: StepContext::Standalone,
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::StepKind;
    use crate::tokens::units_in_token_amount;
    use rust_decimal_macros::dec;

    fn token(address: &str, symbol: &str) -> Token {
        Token::new(address, symbol, 18, 2)
    }

    fn zrx() -> Token {
        token("0x01", "zrx")
    }

    fn mkr() -> Token {
        token("0x02", "mkr")
    }

    fn weth() -> Token {
        token("0x100", "weth")
    }

    fn token_balances() -> Vec<TokenBalance> {
        vec![
            TokenBalance::new(zrx(), dec!(1), true),
            TokenBalance::new(mkr(), dec!(1), true),
            TokenBalance::new(token("0x03", "rep"), dec!(1), true),
            TokenBalance::new(token("0x04", "dgd"), dec!(1), true),
            TokenBalance::new(token("0x05", "mln"), dec!(1), true),
        ]
    }

    fn locked(symbol: &str) -> Vec<TokenBalance> {
        let mut balances = token_balances();
        for balance in balances.iter_mut() {
            if balance.token.symbol == symbol {
                balance.is_unlocked = false;
            }
        }
        balances
    }

    fn weth_balance(balance: Decimal, is_unlocked: bool) -> TokenBalance {
        TokenBalance::new(weth(), balance, is_unlocked)
    }

    fn one_token() -> Decimal {
        units_in_token_amount("1", 18).unwrap()
    }

    fn kinds(steps: &[Step]) -> Vec<StepKind> {
        steps.iter().map(Step::kind).collect()
    }

    #[test]
    fn limit_with_unlocked_tokens_is_a_single_step() {
        let steps = create_buy_sell_limit_steps(
            &zrx(),
            &weth(),
            &token_balances(),
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Buy,
            &OrderFeeData::maker(one_token(), Some("0x01")),
        );

        assert_eq!(kinds(&steps), vec![StepKind::BuySellLimit]);
    }

    #[test]
    fn limit_with_zero_fees_is_a_single_step() {
        let steps = create_buy_sell_limit_steps(
            &zrx(),
            &weth(),
            &locked("mkr"),
            &weth_balance(dec!(0), true),
            dec!(1),
            dec!(0),
            OrderSide::Sell,
            &OrderFeeData::default(),
        );

        assert_eq!(kinds(&steps), vec![StepKind::BuySellLimit]);
    }

    #[test]
    fn limit_buy_unlocks_locked_quote_token() {
        let steps = create_buy_sell_limit_steps(
            &zrx(),
            &weth(),
            &token_balances(),
            &weth_balance(dec!(0), false),
            dec!(0),
            dec!(0),
            OrderSide::Buy,
            &OrderFeeData::maker(one_token(), Some("0x01")),
        );

        assert_eq!(
            kinds(&steps),
            vec![StepKind::ToggleTokenLock, StepKind::BuySellLimit]
        );
        assert!(steps[0].unlocked_token().is_some_and(Token::is_weth));
    }

    #[test]
    fn limit_sell_unlocks_locked_base_token_once() {
        // zrx is both the traded token and the fee token
        let steps = create_buy_sell_limit_steps(
            &zrx(),
            &weth(),
            &locked("zrx"),
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Sell,
            &OrderFeeData::maker(one_token(), Some("0x01")),
        );

        assert_eq!(
            kinds(&steps),
            vec![StepKind::ToggleTokenLock, StepKind::BuySellLimit]
        );
        assert!(steps[0].unlocked_token().is_some_and(Token::is_zrx));
    }

    #[test]
    fn limit_unlocks_fee_token_when_maker_fee_is_positive() {
        let steps = create_buy_sell_limit_steps(
            &mkr(),
            &weth(),
            &locked("zrx"),
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Buy,
            &OrderFeeData::maker(one_token(), Some("0x01")),
        );

        assert_eq!(
            kinds(&steps),
            vec![StepKind::ToggleTokenLock, StepKind::BuySellLimit]
        );
        assert_eq!(steps[0].unlocked_token(), Some(&zrx()));
    }

    #[test]
    fn fee_token_unlock_precedes_traded_token_unlock() {
        let mut balances = locked("zrx");
        balances[1].is_unlocked = false;

        let steps = create_buy_sell_limit_steps(
            &mkr(),
            &weth(),
            &balances,
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Sell,
            &OrderFeeData::maker(one_token(), None),
        );

        let unlocked: Vec<&str> = steps
            .iter()
            .filter_map(Step::unlocked_token)
            .map(|token| token.symbol.as_str())
            .collect();
        assert_eq!(unlocked, vec!["zrx", "mkr"]);
        assert_eq!(steps.last().map(Step::kind), Some(StepKind::BuySellLimit));
    }

    #[test]
    fn limit_buy_wraps_missing_weth() {
        let steps = create_buy_sell_limit_steps(
            &zrx(),
            &weth(),
            &token_balances(),
            &weth_balance(dec!(2), true),
            dec!(10),
            dec!(0.5),
            OrderSide::Buy,
            &OrderFeeData::default(),
        );

        assert_eq!(kinds(&steps), vec![StepKind::WrapEth, StepKind::BuySellLimit]);
        assert_eq!(steps[0].wrap_amount(), Some(dec!(3)));
    }

    #[test]
    fn limit_buy_wraps_weth_in_its_own_base_units() {
        let usdc = Token::new("0x06", "usdc", 6, 2);
        let steps = create_buy_sell_limit_steps(
            &usdc,
            &weth(),
            &[TokenBalance::new(usdc.clone(), dec!(0), true)],
            &weth_balance(dec!(0), true),
            units_in_token_amount("1", 6).unwrap(),
            dec!(1),
            OrderSide::Buy,
            &OrderFeeData::default(),
        );

        assert_eq!(kinds(&steps), vec![StepKind::WrapEth, StepKind::BuySellLimit]);
        assert_eq!(steps[0].wrap_amount(), Some(one_token()));
    }

    #[test]
    fn weth_unlock_follows_the_wrap_it_depends_on() {
        let steps = create_buy_sell_limit_steps(
            &mkr(),
            &weth(),
            &locked("zrx"),
            &weth_balance(dec!(0), false),
            dec!(10),
            dec!(1),
            OrderSide::Buy,
            &OrderFeeData::maker(one_token(), None),
        );

        assert_eq!(
            kinds(&steps),
            vec![
                StepKind::ToggleTokenLock,
                StepKind::WrapEth,
                StepKind::ToggleTokenLock,
                StepKind::BuySellLimit,
            ]
        );
        assert!(steps[0].unlocked_token().is_some_and(Token::is_zrx));
        assert!(steps[2].unlocked_token().is_some_and(Token::is_weth));
    }

    #[test]
    fn market_with_unlocked_tokens_is_a_single_step() {
        let steps = create_buy_sell_market_steps(
            &zrx(),
            &weth(),
            &token_balances(),
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Buy,
            dec!(0),
            &OrderFeeData::default(),
        );

        assert_eq!(kinds(&steps), vec![StepKind::BuySellMarket]);
    }

    #[test]
    fn market_unlocks_fee_token_when_taker_fee_is_positive() {
        let steps = create_buy_sell_market_steps(
            &mkr(),
            &weth(),
            &locked("zrx"),
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Buy,
            dec!(0),
            &OrderFeeData::taker(one_token(), Some("0x01")),
        );

        assert_eq!(
            kinds(&steps),
            vec![StepKind::ToggleTokenLock, StepKind::BuySellMarket]
        );
    }

    #[test]
    fn market_ignores_maker_fee() {
        let steps = create_buy_sell_market_steps(
            &mkr(),
            &weth(),
            &locked("zrx"),
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Buy,
            dec!(0),
            &OrderFeeData::maker(one_token(), Some("0x01")),
        );

        assert_eq!(kinds(&steps), vec![StepKind::BuySellMarket]);
    }

    #[test]
    fn market_buy_wraps_weth_needed_for_orders() {
        let steps = create_buy_sell_market_steps(
            &zrx(),
            &weth(),
            &token_balances(),
            &weth_balance(dec!(1), true),
            dec!(10),
            dec!(5),
            OrderSide::Buy,
            dec!(4),
            &OrderFeeData::default(),
        );

        assert_eq!(kinds(&steps), vec![StepKind::WrapEth, StepKind::BuySellMarket]);
        assert_eq!(steps[0].wrap_amount(), Some(dec!(3)));
        assert_eq!(eth_shortfall(&steps, dec!(10)), None);
        assert_eq!(eth_shortfall(&steps, dec!(1)), Some(dec!(2)));
    }

    #[test]
    fn market_sell_never_wraps() {
        let steps = create_buy_sell_market_steps(
            &zrx(),
            &weth(),
            &token_balances(),
            &weth_balance(dec!(0), true),
            dec!(10),
            dec!(5),
            OrderSide::Sell,
            dec!(4),
            &OrderFeeData::default(),
        );

        assert_eq!(kinds(&steps), vec![StepKind::BuySellMarket]);
    }

    #[test]
    fn limit_matching_with_unlocked_tokens_is_a_single_step() {
        let steps = create_buy_sell_limit_matching_steps(
            &zrx(),
            &weth(),
            &token_balances(),
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Buy,
            dec!(0),
            dec!(0),
            &OrderFeeData::default(),
        );

        assert_eq!(kinds(&steps), vec![StepKind::BuySellLimitMatching]);
    }

    #[test]
    fn limit_matching_unlocks_fee_token_when_taker_fee_is_positive() {
        let steps = create_buy_sell_limit_matching_steps(
            &mkr(),
            &weth(),
            &locked("zrx"),
            &weth_balance(dec!(0), true),
            dec!(0),
            dec!(0),
            OrderSide::Buy,
            dec!(0),
            dec!(0),
            &OrderFeeData::taker(one_token(), None),
        );

        assert_eq!(
            kinds(&steps),
            vec![StepKind::ToggleTokenLock, StepKind::BuySellLimitMatching]
        );
        assert!(steps[1].is_terminal());
    }

    #[test]
    fn unlock_step_follows_lock_state() {
        let weth = weth_balance(dec!(0), true);

        let step = unlock_token_step_if_needed(&mkr(), &locked("mkr"), &weth);
        assert_eq!(step.map(|step| step.kind()), Some(StepKind::ToggleTokenLock));

        let step = unlock_token_step_if_needed(&mkr(), &token_balances(), &weth);
        assert!(step.is_none());
    }

    #[test]
    fn unlock_step_for_unknown_token_is_none() {
        let step = unlock_token_step_if_needed(
            &token("0x99", "abc"),
            &token_balances(),
            &weth_balance(dec!(0), false),
        );
        assert!(step.is_none());
    }

    #[test]
    fn wrap_step_only_when_weth_is_short() {
        let step = wrap_eth_step_if_needed(dec!(10), dec!(1), OrderSide::Buy, &weth_balance(dec!(0), true));
        assert_eq!(step.map(|step| step.kind()), Some(StepKind::WrapEth));

        let step = wrap_eth_step_if_needed(dec!(10), dec!(1), OrderSide::Buy, &weth_balance(dec!(11), true));
        assert!(step.is_none());

        let step = wrap_eth_step_if_needed(dec!(10), dec!(1), OrderSide::Sell, &weth_balance(dec!(0), true));
        assert!(step.is_none());
    }

    #[test]
    fn zrx_unlock_follows_zrx_lock_state() {
        let step = unlock_zrx_step_if_needed(&locked("zrx"));
        assert_eq!(step.map(|step| step.kind()), Some(StepKind::ToggleTokenLock));

        assert!(unlock_zrx_step_if_needed(&token_balances()).is_none());
    }

    #[test]
    fn standalone_flows_carry_standalone_context() {
        let steps = create_toggle_token_lock_steps(&mkr(), true);
        assert_eq!(
            steps,
            vec![Step::ToggleTokenLock {
                token: mkr(),
                is_unlocked: true,
                context: StepContext::Standalone,
            }]
        );
        assert_eq!(steps[0].describe(), "Lock MKR");

        let steps = create_wrap_eth_steps(dec!(1), dec!(4));
        assert_eq!(steps[0].wrap_amount(), Some(dec!(3)));
    }
}
