//! HS256 signing and verification of session tokens.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::session::Token;
use crate::error::AuthError;

/// Signs [`Token`]s with the deployment secret and verifies them on the way back in.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Config("signing secret must not be empty".to_string()));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn encode(&self, token: &Token) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), token, &self.encoding)
            .map_err(|e| AuthError::Token(e.to_string()))
    }

    /// Decode and verify signature and expiry.
    pub fn decode(&self, encoded: &str) -> Result<Token, AuthError> {
        decode::<Token>(encoded, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected session token");
                AuthError::InvalidToken
            })
    }
}
