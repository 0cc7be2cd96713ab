use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const WETH_SYMBOL: &str = "weth";
const ZRX_SYMBOL: &str = "zrx";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub address: String,
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    pub decimals: u32,
    pub display_decimals: u32,
}

impl Token {
    pub fn new(address: &str, symbol: &str, decimals: u32, display_decimals: u32) -> Self {
        Token {
            address: address.to_string(),
            symbol: symbol.to_string(),
            name: symbol.to_uppercase(),
            decimals,
            display_decimals,
        }
    }

    /// Addresses are hex strings, so the comparison ignores case.
    pub fn has_address(&self, address: &str) -> bool {
        self.address.eq_ignore_ascii_case(address)
    }

    pub fn is_same(&self, other: &Token) -> bool {
        self.has_address(&other.address)
    }

    pub fn is_weth(&self) -> bool {
        self.symbol.eq_ignore_ascii_case(WETH_SYMBOL)
    }

    pub fn is_zrx(&self) -> bool {
        self.symbol.eq_ignore_ascii_case(ZRX_SYMBOL)
    }

    /// Symbol shown to users; wrapped ether is presented as ETH.
    pub fn display_symbol(&self) -> String {
        if self.is_weth() {
            "ETH".to_string()
        } else {
            self.symbol.to_uppercase()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub token: Token,
    pub balance: Decimal,
    pub is_unlocked: bool,
}

impl TokenBalance {
    pub fn new(token: Token, balance: Decimal, is_unlocked: bool) -> Self {
        TokenBalance {
            token,
            balance,
            is_unlocked,
        }
    }
}
