//! # Identity Extraction
//!
//! Credential issuance and verification live with the external identity
//! provider; by the time a request reaches this service, the gateway has
//! already authenticated it and attached the caller's identity as headers.
//! This module turns those headers into a typed [`AuthUser`] so every
//! handler works with the closed role variant instead of raw strings.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use rollcall_core::errors::AttendanceError;
use rollcall_core::models::auth::{AuthUser, Role};
use uuid::Uuid;

use crate::middleware::error_handling::AppError;

/// Header carrying the authenticated caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated caller's role.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extractor wrapper for the authenticated caller.
///
/// Rejects with a 401 when either identity header is missing or malformed.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub AuthUser);

fn header_value<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AttendanceError> {
    parts
        .headers
        .get(name)
        .ok_or_else(|| AttendanceError::Authentication(format!("Missing {name} header")))?
        .to_str()
        .map_err(|_| AttendanceError::Authentication(format!("Invalid {name} header")))
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header_value(parts, USER_ID_HEADER)?
            .parse::<Uuid>()
            .map_err(|_| {
                AttendanceError::Authentication(format!("Invalid {USER_ID_HEADER} header"))
            })?;

        let role = header_value(parts, USER_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(|_| {
                AttendanceError::Authentication(format!("Invalid {USER_ROLE_HEADER} header"))
            })?;

        Ok(Identity(AuthUser { id, role }))
    }
}
