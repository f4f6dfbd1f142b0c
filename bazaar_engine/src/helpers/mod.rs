mod order_number;
mod signatures;

pub use order_number::{new_order_number, order_number_with_suffix, MAX_ORDER_NUMBER_ATTEMPTS, ORDER_NUMBER_PREFIX};
pub use signatures::{payment_signature, sign, verify_payment_signature, verify_webhook_signature};
