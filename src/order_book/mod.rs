pub mod aggregator;
mod models;

pub use aggregator::*;
pub use models::*;
