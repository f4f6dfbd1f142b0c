use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use bazaar_engine::MarketplaceError;
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The {0} header is missing. Requests must be authenticated.")]
    MissingIdentity(&'static str),
    #[error("The {0} header does not contain a valid id.")]
    InvalidIdentity(&'static str),
    #[error("Could not read request: {0}")]
    InvalidRequest(String),
    #[error("{0}")]
    Marketplace(#[from] MarketplaceError),
}

impl ServerError {
    /// A stable, machine-readable code that clients can switch on.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InitializeError(_) | Self::ConfigurationError(_) | Self::IOError(_) | Self::Unspecified(_) => {
                "INTERNAL_ERROR"
            },
            Self::MissingIdentity(_) | Self::InvalidIdentity(_) => "UNAUTHENTICATED",
            Self::InvalidRequest(_) => "BAD_REQUEST",
            Self::Marketplace(e) => match e {
                MarketplaceError::NotFound(_) => "NOT_FOUND",
                MarketplaceError::Unavailable(_) => "UNAVAILABLE",
                MarketplaceError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
                MarketplaceError::VendorConflict { .. } => "VENDOR_CONFLICT",
                MarketplaceError::InvalidTransition { .. } => "INVALID_TRANSITION",
                MarketplaceError::InvalidState(_) => "INVALID_STATE",
                MarketplaceError::InvalidSignature => "INVALID_SIGNATURE",
                MarketplaceError::AlreadyExists(_) => "ALREADY_EXISTS",
                MarketplaceError::AlreadyRefunded(_) => "ALREADY_REFUNDED",
                MarketplaceError::GatewayError(_) => "GATEWAY_ERROR",
                MarketplaceError::Unauthorized(_) => "FORBIDDEN",
                MarketplaceError::EmptyCart => "EMPTY_CART",
                MarketplaceError::ValidationError(_) => "VALIDATION_ERROR",
                MarketplaceError::DatabaseError(_) => "DATABASE_ERROR",
            },
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::MissingIdentity(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidIdentity(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Marketplace(e) => match e {
                MarketplaceError::NotFound(_) => StatusCode::NOT_FOUND,
                MarketplaceError::Unavailable(_) => StatusCode::BAD_REQUEST,
                MarketplaceError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
                MarketplaceError::VendorConflict { .. } => StatusCode::CONFLICT,
                MarketplaceError::InvalidTransition { .. } => StatusCode::CONFLICT,
                MarketplaceError::InvalidState(_) => StatusCode::BAD_REQUEST,
                MarketplaceError::InvalidSignature => StatusCode::BAD_REQUEST,
                MarketplaceError::AlreadyExists(_) => StatusCode::CONFLICT,
                MarketplaceError::AlreadyRefunded(_) => StatusCode::BAD_REQUEST,
                MarketplaceError::GatewayError(_) => StatusCode::BAD_GATEWAY,
                MarketplaceError::Unauthorized(_) => StatusCode::FORBIDDEN,
                MarketplaceError::EmptyCart => StatusCode::BAD_REQUEST,
                MarketplaceError::ValidationError(_) => StatusCode::BAD_REQUEST,
                MarketplaceError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ Request failed. {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string(), "code": self.code() }).to_string())
    }
}
