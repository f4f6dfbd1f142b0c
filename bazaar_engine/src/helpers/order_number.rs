use chrono::{DateTime, Utc};
use rand::Rng;

pub const ORDER_NUMBER_PREFIX: &str = "ORD";
/// How many times checkout will draw a new suffix before giving up on a minute.
pub const MAX_ORDER_NUMBER_ATTEMPTS: usize = 25;

/// Builds a human-readable order number: the prefix, the time to the minute, and a three-digit suffix,
/// e.g. `ORD202403011230042`.
pub fn order_number_with_suffix(at: DateTime<Utc>, suffix: u16) -> String {
    format!("{ORDER_NUMBER_PREFIX}{}{:03}", at.format("%Y%m%d%H%M"), suffix % 1000)
}

pub fn new_order_number(at: DateTime<Utc>) -> String {
    let suffix = rand::thread_rng().gen_range(0..1000u16);
    order_number_with_suffix(at, suffix)
}
