use thiserror::Error;

/// Errors from the gateway REST client. None of these carry credentials.
#[derive(Debug, Error)]
pub enum RazorpayApiError {
    #[error("Could not build the gateway client: {0}")]
    Initialization(String),
    #[error("The gateway could not be reached or sent an unreadable response: {0}")]
    RestResponseError(String),
    #[error("Unexpected gateway response body: {0}")]
    JsonError(String),
    #[error("Gateway request failed with HTTP {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
