use argon2::Config as ArgonConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Hex id of the user document.
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    pub iat: usize,
    pub exp: usize,
}

/// Authentication state of a single request.
#[derive(Debug, Clone, Default)]
pub struct Identity {
    claims: Option<Claims>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Identity { claims: None }
    }

    pub fn authenticated(claims: Claims) -> Self {
        Identity { claims: Some(claims) }
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.as_ref()
    }

    pub fn require(&self) -> Result<&Claims> {
        self.claims.as_ref().ok_or(ApiError::Unauthenticated)
    }
}

/// Signs and verifies HS256 bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        TokenService {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: chrono::Duration::try_hours(ttl_hours).unwrap_or(chrono::Duration::MAX),
        }
    }

    pub fn issue(&self, user_id: &str, is_admin: bool) -> Result<String> {
        let now = chrono::Utc::now();
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(ApiError::TokenLifetime)?;
        let claims = Claims {
            id: user_id.to_string(),
            is_admin,
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> std::result::Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
    }
}

/// Hashes `password` with a fresh random salt on the blocking thread pool.
pub async fn hash_password(password: String) -> Result<String> {
    let hashed = actix_web::web::block(move || {
        let salt: [u8; 16] = rand::thread_rng().gen();
        argon2::hash_encoded(password.as_bytes(), &salt, &ArgonConfig::default())
    })
    .await??;
    Ok(hashed)
}

pub async fn verify_password(hash: String, password: String) -> Result<bool> {
    let valid = actix_web::web::block(move || argon2::verify_encoded(&hash, password.as_bytes()))
        .await??;
    Ok(valid)
}
