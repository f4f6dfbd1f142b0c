//! Caller identity.
//!
//! Authentication happens upstream of this server. The authenticating proxy forwards the caller's id in the
//! `X-Bzr-Customer-Id` or `X-Bzr-Vendor-Id` header, and handlers receive it through the [`CustomerId`] and [`VendorId`]
//! extractors. A request without the header is rejected with a 401.
use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use log::*;

use crate::errors::ServerError;

pub const CUSTOMER_ID_HEADER: &str = "X-Bzr-Customer-Id";
pub const VENDOR_ID_HEADER: &str = "X-Bzr-Vendor-Id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorId(pub i64);

fn id_from_header(req: &HttpRequest, header: &'static str) -> Result<i64, ServerError> {
    let value = req.headers().get(header).ok_or_else(|| {
        debug!("💻️ {} {} has no {header} header", req.method(), req.path());
        ServerError::MissingIdentity(header)
    })?;
    value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            warn!("💻️ {} {} carries an invalid {header} header", req.method(), req.path());
            ServerError::InvalidIdentity(header)
        })
}

impl FromRequest for CustomerId {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(id_from_header(req, CUSTOMER_ID_HEADER).map(CustomerId))
    }
}

impl FromRequest for VendorId {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(id_from_header(req, VENDOR_ID_HEADER).map(VendorId))
    }
}
