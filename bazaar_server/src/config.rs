use std::env;

use bazaar_common::{
    helpers::{parse_boolean_flag, parse_value},
    Secret,
    CURRENCY_CODE,
};
use bazaar_engine::{fees::FeeSchedule, payment_objects::PaymentConfig};
use log::*;
use razorpay_tools::RazorpayConfig;

const DEFAULT_BZR_HOST: &str = "127.0.0.1";
const DEFAULT_BZR_PORT: u16 = 8470;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_REFUND_SPEED: &str = "normal";
pub const DEFAULT_WEBHOOK_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Credentials for the gateway's REST API.
    pub razorpay: RazorpayConfig,
    /// Webhook secret, currency and refund settings for payment reconciliation.
    pub payments: PaymentConfig,
    /// The request header that carries the webhook signature.
    pub webhook_signature_header: String,
    pub fees: FeeSchedule,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BZR_HOST.to_string(),
            port: DEFAULT_BZR_PORT,
            database_url: String::default(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            razorpay: RazorpayConfig::default(),
            payments: PaymentConfig::default(),
            webhook_signature_header: DEFAULT_WEBHOOK_SIGNATURE_HEADER.to_string(),
            fees: FeeSchedule::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let mut config = Self::from_source(|name| env::var(name).ok());
        config.razorpay = RazorpayConfig::new_from_env_or_default();
        config
    }

    /// Builds the configuration from any key-value source. Gateway REST credentials are not read here; see
    /// [`RazorpayConfig::new_from_env_or_default`].
    pub fn from_source<F>(var: F) -> Self
    where F: Fn(&str) -> Option<String> {
        let host = var("BZR_HOST").unwrap_or_else(|| DEFAULT_BZR_HOST.into());
        let port = parse_value::<u16>(var("BZR_PORT")).unwrap_or_else(|e| {
            info!("🪛️ BZR_PORT: {e}. Using the default, {DEFAULT_BZR_PORT}.");
            DEFAULT_BZR_PORT
        });
        let database_url = var("BZR_DATABASE_URL").unwrap_or_else(|| {
            error!("🪛️ BZR_DATABASE_URL is not set. Please set it to the URL for the Bazaar database.");
            String::default()
        });
        let db_max_connections = parse_value::<u32>(var("BZR_DB_MAX_CONNECTIONS")).unwrap_or_else(|e| {
            debug!("🪛️ BZR_DB_MAX_CONNECTIONS: {e}. Using the default, {DEFAULT_DB_MAX_CONNECTIONS}.");
            DEFAULT_DB_MAX_CONNECTIONS
        });
        let webhook_secret = var("BZR_RAZORPAY_WEBHOOK_SECRET").unwrap_or_else(|| {
            error!(
                "🪛️ BZR_RAZORPAY_WEBHOOK_SECRET is not set. Payment verification and webhooks will fail until it is \
                 set to the gateway's webhook secret."
            );
            String::default()
        });
        let currency = var("BZR_CURRENCY").map(|s| s.trim().to_uppercase()).unwrap_or_else(|| CURRENCY_CODE.into());
        let refund_speed = var("BZR_REFUND_SPEED").unwrap_or_else(|| DEFAULT_REFUND_SPEED.into());
        let webhook_checks = parse_boolean_flag(var("BZR_WEBHOOK_CHECKS"), true);
        if !webhook_checks {
            warn!(
                "🚨️🚨️🚨️ Webhook signature checks are DISABLED. Anyone can mark payments as paid. Never run \
                 production like this. 🚨️🚨️🚨️"
            );
        }
        let webhook_signature_header =
            var("BZR_WEBHOOK_SIGNATURE_HEADER").unwrap_or_else(|| DEFAULT_WEBHOOK_SIGNATURE_HEADER.into());
        let payments = PaymentConfig { webhook_secret: Secret::new(webhook_secret), currency, refund_speed, webhook_checks };
        Self {
            host,
            port,
            database_url,
            db_max_connections,
            razorpay: RazorpayConfig::default(),
            payments,
            webhook_signature_header,
            fees: FeeSchedule::default(),
        }
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// A subset of the server configuration that handlers need at request time. Secrets are deliberately excluded.
#[derive(Clone, Debug)]
pub struct ServerOptions {
    pub webhook_signature_header: String,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { webhook_signature_header: config.webhook_signature_header.clone() }
    }
}
