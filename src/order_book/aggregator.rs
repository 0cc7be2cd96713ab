use crate::order_book::{OrderBook, OrderBookItem, OrderSide, UiOrder, Web3State};
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Orders still open for matching. Without a connected wallet there is
/// nothing to filter against, so every order is kept.
pub fn open_orders(orders: &[UiOrder], web3_state: Web3State) -> Vec<UiOrder> {
    if !web3_state.has_wallet() {
        return orders.to_vec();
    }
    orders
        .iter()
        .filter(|order| order.is_fillable())
        .cloned()
        .collect()
}

/// Orders of one side, best bid first / worst ask first.
fn side_by_descending_price(orders: &[UiOrder], side: OrderSide) -> Vec<UiOrder> {
    let mut side_orders = orders
        .iter()
        .filter(|order| order.side == side)
        .cloned()
        .collect::<Vec<UiOrder>>();
    // stable sort, orders on the same level keep relayer order
    side_orders.sort_by(|a, b| b.price.cmp(&a.price));
    side_orders
}

pub fn open_sell_orders(open_orders: &[UiOrder]) -> Vec<UiOrder> {
    side_by_descending_price(open_orders, OrderSide::Sell)
}

pub fn open_buy_orders(open_orders: &[UiOrder]) -> Vec<UiOrder> {
    side_by_descending_price(open_orders, OrderSide::Buy)
}

/// Collapses items sharing a price into one row holding the summed size.
/// Rows keep the order in which their price first appears.
pub fn merge_by_price(items: &[OrderBookItem]) -> Vec<OrderBookItem> {
    let mut merged: Vec<OrderBookItem> = Vec::with_capacity(items.len());
    let mut level_index: HashMap<Decimal, usize> = HashMap::with_capacity(items.len());
    for item in items {
        match level_index.get(&item.price).copied() {
            Some(index) => {
                let level = &mut merged[index];
                level.size = level.size.saturating_add(item.size);
            }
            None => {
                level_index.insert(item.price, merged.len());
                merged.push(item.clone());
            }
        }
    }
    merged
}

/// Book rows for a price-sorted side, carrying each order's full size.
fn book_rows(orders: &[UiOrder]) -> Vec<OrderBookItem> {
    let items = orders
        .iter()
        .map(|order| OrderBookItem::new(order.side, order.price, order.size))
        .collect::<Vec<OrderBookItem>>();
    merge_by_price(&items)
}

/// Fillable asks with their unfilled size, as a market buy would consume
/// them.
pub fn fillable_asks(orders: &[UiOrder], web3_state: Web3State) -> Vec<OrderBookItem> {
    open_sell_orders(&open_orders(orders, web3_state))
        .iter()
        .map(UiOrder::to_book_item)
        .collect()
}

/// The user's fillable orders with their unfilled size.
pub fn my_size_orders(user_orders: &[UiOrder]) -> Vec<OrderBookItem> {
    user_orders
        .iter()
        .filter(|order| order.is_fillable())
        .map(UiOrder::to_book_item)
        .collect()
}

/// Lowest ask minus highest bid, zero when either side is empty.
pub fn spread(buy_orders: &[OrderBookItem], sell_orders: &[OrderBookItem]) -> Decimal {
    let lowest_ask = sell_orders.iter().map(|item| item.price).min();
    let highest_bid = buy_orders.iter().map(|item| item.price).max();
    match (lowest_ask, highest_bid) {
        (Some(ask), Some(bid)) => ask.saturating_sub(bid),
        _ => Decimal::ZERO,
    }
}

/// Spread relative to the lowest ask, in percent.
pub fn spread_percentage(spread: Decimal, sell_orders: &[OrderBookItem]) -> Decimal {
    match sell_orders.iter().map(|item| item.price).min() {
        Some(lowest_ask) if !lowest_ask.is_zero() => spread
            .checked_div(lowest_ask)
            .map(|ratio| ratio.saturating_mul(Decimal::ONE_HUNDRED))
            .unwrap_or(if spread.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }),
        _ => Decimal::ZERO,
    }
}

pub fn build_order_book(
    orders: &[UiOrder],
    user_orders: &[UiOrder],
    web3_state: Web3State,
) -> OrderBook {
    let open = open_orders(orders, web3_state);
    let sell_orders = book_rows(&open_sell_orders(&open));
    let buy_orders = book_rows(&open_buy_orders(&open));

    let spread = spread(&buy_orders, &sell_orders);
    let spread_percentage = spread_percentage(spread, &sell_orders);
    let total_base = sell_orders
        .iter()
        .map(|item| item.size)
        .fold(Decimal::ZERO, Decimal::saturating_add);
    let total_quote = buy_orders
        .iter()
        .map(|item| item.size.saturating_mul(item.price))
        .fold(Decimal::ZERO, Decimal::saturating_add);

    debug!(
        "Order book built: {} ask levels, {} bid levels, spread {spread}",
        sell_orders.len(),
        buy_orders.len()
    );

    OrderBook {
        sell_orders,
        buy_orders,
        my_size_orders: my_size_orders(user_orders),
        spread,
        spread_percentage,
        total_base,
        total_quote,
    }
}

/// Cost of a market buy of `amount` walking the asks from the lowest price
/// up, in base token units times price. `None` when the book cannot fill the
/// whole amount; saturates at `Decimal::MAX`.
pub fn weth_needed_for_market_buy(sell_orders: &[OrderBookItem], amount: Decimal) -> Option<Decimal> {
    let mut asks = sell_orders.to_vec();
    asks.sort_by(|a, b| a.price.cmp(&b.price));

    let mut remaining = amount;
    let mut weth_needed = Decimal::ZERO;
    for ask in asks.iter() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let filled = ask.size.min(remaining);
        weth_needed = weth_needed.saturating_add(filled.saturating_mul(ask.price));
        remaining -= filled;
    }

    if remaining > Decimal::ZERO {
        return None;
    }
    Some(weth_needed)
}
