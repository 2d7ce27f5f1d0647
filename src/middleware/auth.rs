use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ApiError;

/// Token claims issued at login time.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated user context extracted from the JWT.
///
/// Keeps the raw `Authorization` header value so internal sub-requests
/// (the TSV transform proxy) can be made as the same principal instead
/// of a service account.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub raw_authorization: String,
}

/// JWT authentication middleware that validates tokens and injects user context
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let (raw, token) = extract_jwt_from_headers(&headers).map_err(reject)?;
    let claims = validate_jwt(&token).map_err(reject)?;

    let auth_user = AuthUser {
        username: claims.username,
        raw_authorization: raw,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn reject(msg: String) -> Response {
    let api_error = ApiError::unauthorized(msg);
    (
        StatusCode::from_u16(api_error.status_code()).unwrap_or(StatusCode::UNAUTHORIZED),
        Json(api_error.to_json()),
    )
        .into_response()
}

/// Extract the raw header value and the bare JWT token from the Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<(String, String), String> {
    let auth_header = headers
        .get("authorization")
        .or_else(|| headers.get("Authorization"))
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok((auth_str.to_string(), token.to_string()))
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Validate JWT token and extract claims
fn validate_jwt(token: &str) -> Result<Claims, String> {
    let secret = &config::config().jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data =
        decode::<Claims>(token, &decoding_key, &validation).map_err(|e| format!("Invalid JWT token: {}", e))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn rejects_missing_header() {
        let headers = HeaderMap::new();
        assert!(extract_jwt_from_headers(&headers).is_err());
    }

    #[test]
    fn rejects_non_bearer_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc123"));
        assert!(extract_jwt_from_headers(&headers).is_err());
    }

    #[test]
    fn keeps_raw_header_for_forwarding() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer some.jwt.token"));
        let (raw, token) = extract_jwt_from_headers(&headers).unwrap();
        assert_eq!(raw, "Bearer some.jwt.token");
        assert_eq!(token, "some.jwt.token");
    }
}
