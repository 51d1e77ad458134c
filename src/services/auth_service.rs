use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;

use crate::web::error::{AppError, MSG_LOGIN_REQUIRED};
use crate::web::models::{AdminLoginResponse, AdminSession, Claims};

pub const ADMIN_SUBJECT: &str = "admin";

/// Password gate for the admin area.
///
/// The configured password is hashed once at startup and never kept in plain
/// text. A successful login yields a signed token that expires after the
/// session TTL; every protected route validates it.
pub struct AdminAuth {
    password_hash: Option<String>,
    jwt_secret: String,
    session_ttl: Duration,
}

impl AdminAuth {
    pub fn new(
        admin_password: Option<&str>,
        jwt_secret: &str,
        session_ttl_minutes: i64,
    ) -> Result<Self, AppError> {
        Self::with_cost(admin_password, jwt_secret, session_ttl_minutes, DEFAULT_COST)
    }

    pub fn with_cost(
        admin_password: Option<&str>,
        jwt_secret: &str,
        session_ttl_minutes: i64,
        cost: u32,
    ) -> Result<Self, AppError> {
        let session_ttl = Duration::try_minutes(session_ttl_minutes.max(1)).ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Session TTL of {session_ttl_minutes} minutes is out of range"
            ))
        })?;

        let password_hash = match admin_password.filter(|p| !p.is_empty()) {
            Some(password) => Some(hash(password, cost).map_err(|e| {
                AppError::InternalServerError(format!("Password hashing failed: {e}"))
            })?),
            None => {
                warn!("ADMIN_PASSWORD is not set; admin login is disabled.");
                None
            }
        };

        Ok(Self {
            password_hash,
            jwt_secret: jwt_secret.to_string(),
            session_ttl,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.password_hash.is_some()
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn login(&self, password: &str) -> Result<AdminLoginResponse, AppError> {
        let Some(password_hash) = self.password_hash.as_deref() else {
            warn!("Admin login attempted while no admin password is configured.");
            return Err(AppError::InvalidCredentials);
        };
        if password.is_empty() {
            return Err(AppError::InvalidCredentials);
        }

        let valid_password = verify(password, password_hash).map_err(|e| {
            AppError::InternalServerError(format!("Password verification failed: {e}"))
        })?;
        if !valid_password {
            warn!("Admin login rejected: wrong password.");
            return Err(AppError::InvalidCredentials);
        }

        let (token, expires_at) = self.issue_token()?;
        Ok(AdminLoginResponse {
            success: true,
            token,
            expires_at,
        })
    }

    pub fn issue_token(&self) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(self.session_ttl).ok_or_else(|| {
            AppError::TokenCreationError("Session expiry is out of range".to_string())
        })?;
        let claims = Claims {
            sub: ADMIN_SUBJECT.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::TokenCreationError(format!("Failed to sign session token: {e}")))?;

        Ok((token, expires_at))
    }

    pub fn validate_token(&self, token: &str) -> Result<AdminSession, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|e| {
            warn!(error = ?e, "Admin token rejected.");
            AppError::Unauthorized(MSG_LOGIN_REQUIRED.to_string())
        })?;

        if token_data.claims.sub != ADMIN_SUBJECT {
            return Err(AppError::Unauthorized(MSG_LOGIN_REQUIRED.to_string()));
        }

        let expires_at = DateTime::<Utc>::from_timestamp(token_data.claims.exp, 0)
            .ok_or_else(|| AppError::Unauthorized(MSG_LOGIN_REQUIRED.to_string()))?;

        Ok(AdminSession {
            subject: token_data.claims.sub,
            expires_at,
        })
    }
}
