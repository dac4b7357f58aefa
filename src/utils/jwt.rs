//! Utilidades JWT
//!
//! La emisión de tokens es responsabilidad de un colaborador externo;
//! aquí solo se generan tokens para pruebas y se verifican los tokens
//! presentados en cada request.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::utils::errors::AppError;

/// Claims del JWT: `sub` es el username del usuario autenticado
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
    pub iat: usize,
}

/// Generar JWT token para un usuario
pub fn generate_token(
    username: &str,
    roles: &[String],
    secret: &str,
    expiration_secs: u64,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expires_at = now + chrono::Duration::seconds(expiration_secs as i64);

    let claims = Claims {
        sub: username.to_string(),
        roles: roles.to_vec(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::Internal(format!("Error generando token: {}", e)))
}

/// Verificar y decodificar JWT token
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());

    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| AppError::Unauthorized(format!("Token inválido: {}", e)))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_preserves_claims() {
        let token = generate_token(
            "alice",
            &["ADMIN".to_string()],
            "test-secret",
            3600,
        )
        .unwrap();

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.roles, vec!["ADMIN".to_string()]);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_token("alice", &[], "secret-a", 3600).unwrap();
        assert!(verify_token(&token, "secret-b").is_err());
    }
}
