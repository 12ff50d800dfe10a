//! Admin authentication against the configured account list

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::{AdminUser, AuthConfig},
    error::{AppError, AppResult},
    models::session::{AdminIdentity, Session},
};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        if config.admins.is_empty() {
            tracing::warn!("No administrators configured; admin routes will be unreachable");
        }
        Self { config }
    }

    /// Authenticate an administrator and return their identity with a session token
    pub fn login(&self, email: &str, password: &str) -> AppResult<(AdminIdentity, String)> {
        let email = email.trim();
        let admin = self
            .config
            .admins
            .iter()
            .find(|admin| admin.email.eq_ignore_ascii_case(email))
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(admin, password)? {
            tracing::info!("Rejected login for {}", admin.email);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let identity = AdminIdentity {
            id: admin.id.clone(),
            email: admin.email.clone(),
            is_admin: true,
        };
        let token = Session::issue(&identity, self.config.jwt_expiration_hours as i64)
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!("Admin {} logged in", identity.email);
        Ok((identity, token))
    }

    /// Decode and verify a session token
    pub fn load_session(&self, token: &str) -> AppResult<Session> {
        Session::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }
}

/// Verify a password against the admin's hash, or plain password when no hash is set
fn verify_password(admin: &AdminUser, password: &str) -> AppResult<bool> {
    if let Some(ref hash) = admin.password_hash {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
        return Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok());
    }

    Ok(admin.password.as_deref() == Some(password))
}

/// Hash a password using Argon2; backs `biblioteca-server --hash-password`
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
