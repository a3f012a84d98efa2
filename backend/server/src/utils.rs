use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use crate::error::AppError;

/// A required form field: present and non-blank after trimming.
pub fn require(field: Option<&str>) -> Result<&str, AppError> {
    match field.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::MissingFields),
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<Uuid> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;

    Uuid::parse_str(token.trim()).ok()
}
