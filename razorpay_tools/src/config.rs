use bazaar_common::Secret;
use log::*;

pub const DEFAULT_RAZORPAY_API_URL: &str = "https://api.razorpay.com/v1";

#[derive(Debug, Clone, Default)]
pub struct RazorpayConfig {
    /// The REST root, e.g. `https://api.razorpay.com/v1`. Overridable so that tests can point at a local stub.
    pub api_url: String,
    /// The public key id. This is also handed to the checkout client.
    pub key_id: String,
    pub key_secret: Secret<String>,
}

impl RazorpayConfig {
    pub fn new_from_env_or_default() -> Self {
        let api_url = std::env::var("BZR_RAZORPAY_API_URL").unwrap_or_else(|_| {
            debug!("BZR_RAZORPAY_API_URL not set, using {DEFAULT_RAZORPAY_API_URL}");
            DEFAULT_RAZORPAY_API_URL.to_string()
        });
        let key_id = std::env::var("BZR_RAZORPAY_KEY_ID").unwrap_or_else(|_| {
            warn!("BZR_RAZORPAY_KEY_ID not set, using (probably useless) default");
            "rzp_test_00000000000000".to_string()
        });
        let key_secret = Secret::new(std::env::var("BZR_RAZORPAY_KEY_SECRET").unwrap_or_else(|_| {
            warn!("BZR_RAZORPAY_KEY_SECRET not set, using (probably useless) default");
            "00000000000000".to_string()
        }));
        Self { api_url: api_url.trim_end_matches('/').to_string(), key_id, key_secret }
    }
}
