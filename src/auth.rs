use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{AppConfig, Env},
    error::ApiError,
    repository::RepositoryState,
};

/// Claims
///
/// The payload structure carried inside a JSON Web Token. These claims are
/// signed with the server's secret and validated on every authenticated request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the UUID of the user, used to load the user's record and
    /// role on each request.
    pub sub: Uuid,
    /// Expiration time (exp): timestamp after which the token must be rejected.
    pub exp: usize,
    /// Issued at (iat): timestamp when the token was created.
    pub iat: usize,
}

/// issue_token
///
/// Signs a fresh bearer token for the given user, valid for the configured TTL.
/// Called by the register and login handlers.
pub fn issue_token(user_id: Uuid, config: &AppConfig) -> Result<String, ApiError> {
    let now = Utc::now();
    let expires = now + Duration::hours(config.jwt_ttl_hours);

    let claims = Claims {
        sub: user_id,
        exp: expires.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::internal(format!("token signing failed: {}", e)))
}

/// hash_password
///
/// Bcrypt hash for credential storage. The clear-text password never leaves
/// this function's scope.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| ApiError::internal(format!("password hashing failed: {}", e)))
}

/// verify_password
///
/// Compares a clear-text password against a stored bcrypt hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ApiError::internal(format!("password verification failed: {}", e)))
}

/// can_modify
///
/// The single authorization predicate for mutations: admins and superUsers may
/// modify anything, everyone else only resources they own. Applied identically
/// to places (owner = creator) and reviews (owner = author).
pub fn can_modify(actor_id: Uuid, actor_role: &str, owner_id: Uuid) -> bool {
    if actor_role == "admin" || actor_role == "superUser" {
        return true;
    }
    actor_id == owner_id
}

/// AuthUser Extractor Result
///
/// The resolved identity of an authenticated request. Handlers take this as an
/// argument to obtain the caller's id and role for ownership checks.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The unique identifier of the user, mapped to users.id.
    pub id: Uuid,
    /// The user's role: 'user', 'admin' or 'superUser'.
    pub role: String,
}

/// AuthUser Extractor Implementation
///
/// Implements Axum's FromRequestParts trait, making AuthUser usable as a
/// function argument in any authenticated handler. This cleanly separates
/// authentication (extractor) from business logic (the handler).
///
/// The process:
/// 1. Dependency resolution: repository and AppConfig from the application state.
/// 2. Local bypass: development-time access via the 'x-user-id' header.
/// 3. Token validation: Bearer token extraction and JWT decoding.
/// 4. DB lookup: fetching the user's current role and existence.
///
/// Rejection: 401 with the `{success:false, message}` envelope on any failure.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let config = AppConfig::from_ref(state);

        // Local Development Bypass
        // In Env::Local only, a known user UUID in the 'x-user-id' header
        // authenticates directly. The UUID must still resolve to a stored user
        // so roles load correctly.
        if config.env == Env::Local {
            if let Some(user_id_header) = parts.headers.get("x-user-id") {
                if let Ok(id_str) = user_id_header.to_str() {
                    if let Ok(user_id) = Uuid::parse_str(id_str) {
                        if let Ok(Some(user)) = repo.get_user(user_id).await {
                            return Ok(AuthUser {
                                id: user.id,
                                role: user.role,
                            });
                        }
                    }
                }
            }
        }
        // In Production, or when the bypass did not resolve, fall through to
        // the standard JWT validation flow.

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::unauthorized("Not authorized to access this route"))?;

        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::default();
        // Expiration validation is always active.
        validation.validate_exp = true;

        // Expired, malformed and badly-signed tokens are indistinguishable to
        // the client; detail stays in the server log.
        let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
            tracing::debug!(channel = "account", "token rejected: {}", e);
            ApiError::unauthorized("Not authorized to access this route")
        })?;

        // Final verification: the token may be valid while the user is gone.
        let user = repo
            .get_user(token_data.claims.sub)
            .await?
            .ok_or_else(|| ApiError::unauthorized("User not found"))?;

        Ok(AuthUser {
            id: user.id,
            role: user.role,
        })
    }
}
