pub mod order_book;
pub mod relayer;
pub mod steps;
