//! Admin identity and session token claims

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Identity of a logged-in administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AdminIdentity {
    pub id: String,
    pub email: String,
    pub is_admin: bool,
}

/// JWT claims of an admin session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Admin id
    pub sub: String,
    pub email: String,
    pub is_admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Session {
    /// Session for `identity` valid for the given number of hours
    pub fn issue(identity: &AdminIdentity, hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: identity.id.clone(),
            email: identity.email.clone(),
            is_admin: identity.is_admin,
            iat: now.timestamp(),
            exp: (now + Duration::hours(hours)).timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn identity(&self) -> AdminIdentity {
        AdminIdentity {
            id: self.sub.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
        }
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Authorization("Access denied".to_string()))
        }
    }
}
