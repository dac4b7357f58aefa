//! Autenticación por bearer token
//!
//! Extractor que saca el token del header Authorization, lo verifica y
//! entrega los claims al handler. La emisión de tokens y el alta de
//! usuarios son responsabilidad de un colaborador externo.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, Claims};

/// Identidad autenticada inyectada en los handlers de mutación
#[derive(Debug)]
pub struct AuthUser {
    pub username: String,
    pub claims: Claims,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|auth| auth.to_str().ok())
            .and_then(|auth| auth.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthorized("Token de autorización requerido".to_string())
            })?;

        let claims = verify_token(token, &state.config.jwt_secret)?;

        Ok(AuthUser {
            username: claims.sub.clone(),
            claims,
        })
    }
}
