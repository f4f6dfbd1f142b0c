use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::RazorpayConfig,
    data_objects::{NewRazorpayOrder, NewRefund, RazorpayOrder, RazorpayPayment, RazorpayRefund},
    RazorpayApiError,
};

#[derive(Clone)]
pub struct RazorpayApi {
    config: RazorpayConfig,
    client: Arc<Client>,
}

impl RazorpayApi {
    pub fn new(config: RazorpayConfig) -> Result<Self, RazorpayApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| RazorpayApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn key_id(&self) -> &str {
        self.config.key_id.as_str()
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, RazorpayApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()));
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| RazorpayApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| RazorpayApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| RazorpayApiError::RestResponseError(e.to_string()))?;
            Err(RazorpayApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    pub async fn create_order(&self, order: NewRazorpayOrder) -> Result<RazorpayOrder, RazorpayApiError> {
        if order.amount <= 0 {
            return Err(RazorpayApiError::InvalidAmount(format!("Order amount must be positive: {}", order.amount)));
        }
        debug!("💳️ Creating gateway order for receipt {} ({} minor units)", order.receipt, order.amount);
        let result = self.rest_query::<RazorpayOrder, _>(Method::POST, "/orders", &[], Some(order)).await?;
        info!("💳️ Created gateway order {}", result.id);
        Ok(result)
    }

    pub async fn fetch_payment(&self, payment_id: &str) -> Result<RazorpayPayment, RazorpayApiError> {
        let path = format!("/payments/{payment_id}");
        debug!("💳️ Fetching payment {payment_id}");
        let result =
            self.rest_query::<RazorpayPayment, ()>(Method::GET, &path, &[("expand[]", "card")], None).await?;
        debug!("💳️ Payment {payment_id} has status {}", result.status);
        Ok(result)
    }

    pub async fn refund_payment(&self, payment_id: &str, refund: NewRefund) -> Result<RazorpayRefund, RazorpayApiError> {
        let path = format!("/payments/{payment_id}/refund");
        debug!("💳️ Requesting refund of {} minor units for payment {payment_id}", refund.amount);
        let result = self.rest_query::<RazorpayRefund, _>(Method::POST, &path, &[], Some(refund)).await?;
        info!("💳️ Refund {} created for payment {payment_id}. Status: {}", result.id, result.status);
        Ok(result)
    }
}
