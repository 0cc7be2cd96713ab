use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "Buy"),
            OrderSide::Sell => write!(f, "Sell"),
        }
    }
}

/// Relayer-reported order status; only `Fillable` orders can still match.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Invalid,
    InvalidMakerAssetAmount,
    InvalidTakerAssetAmount,
    Fillable,
    Expired,
    FullyFilled,
    Cancelled,
}

/// Connection state of the user's wallet provider.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Web3State {
    Done,
    Error,
    #[default]
    Loading,
    NotInstalled,
    Locked,
    Connect,
    Connecting,
}

impl Web3State {
    /// Without an unlocked wallet there is no account to check orders
    /// against, so nothing user specific can be derived.
    pub fn has_wallet(&self) -> bool {
        !matches!(self, Web3State::Locked | Web3State::NotInstalled)
    }
}

/// An order as published by the relayer.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct UiOrder {
    #[serde(default)]
    pub order_hash: String,
    pub side: OrderSide,
    pub price: Decimal,
    pub size: Decimal,
    #[serde(default)]
    pub filled: Option<Decimal>,
    pub status: OrderStatus,
}

impl UiOrder {
    pub fn new(side: OrderSide, price: Decimal, size: Decimal, status: OrderStatus) -> Self {
        UiOrder {
            order_hash: String::new(),
            side,
            price,
            size,
            filled: None,
            status,
        }
    }

    pub fn is_fillable(&self) -> bool {
        self.status == OrderStatus::Fillable
    }

    pub fn remaining_size(&self) -> Decimal {
        match self.filled {
            Some(filled) => self.size.saturating_sub(filled),
            None => self.size,
        }
    }

    pub fn to_book_item(&self) -> OrderBookItem {
        OrderBookItem::new(self.side, self.price, self.remaining_size())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct OrderBookItem {
    pub side: OrderSide,
    pub price: Decimal,
    pub size: Decimal,
}

impl OrderBookItem {
    pub fn new(side: OrderSide, price: Decimal, size: Decimal) -> Self {
        OrderBookItem { side, price, size }
    }
}

/// Display-ready order book. Both sides are merged per price level and
/// sorted by descending price.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OrderBook {
    pub sell_orders: Vec<OrderBookItem>,
    pub buy_orders: Vec<OrderBookItem>,
    pub my_size_orders: Vec<OrderBookItem>,
    pub spread: Decimal,
    pub spread_percentage: Decimal,
    /// Base token size resting on the ask side.
    pub total_base: Decimal,
    /// Quote token value resting on the bid side.
    pub total_quote: Decimal,
}

impl OrderBook {
    /// The user's own resting size at a price level.
    pub fn my_size_at(&self, side: OrderSide, price: Decimal) -> Decimal {
        self.my_size_orders
            .iter()
            .filter(|item| item.side == side && item.price == price)
            .map(|item| item.size)
            .sum()
    }

    pub fn best_bid(&self) -> Option<&OrderBookItem> {
        self.buy_orders.first()
    }

    pub fn best_ask(&self) -> Option<&OrderBookItem> {
        self.sell_orders.last()
    }

    pub fn is_empty(&self) -> bool {
        self.sell_orders.is_empty() && self.buy_orders.is_empty()
    }
}
