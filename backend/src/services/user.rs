//! Account registration, login and email verification
//!
//! Password hashing runs on the blocking pool; token issuing uses the
//! pre-computed keys in `JwtService`.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{UserRecord, UserRepository};
use pantry_tracker_shared::types::{AuthTokens, UserProfile};
use pantry_tracker_shared::validation::{check_field, validate_email, validate_password};
use sqlx::PgPool;
use tracing::{debug, info};
use uuid::Uuid;

pub struct UserService;

/// Emails are compared case-insensitively
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Same rules the browser applies before submitting; returns the normalized email
fn check_registration(email: &str, password: &str) -> Result<String, ApiError> {
    let email = normalize_email(email);
    check_field("email", validate_email(&email))?;
    check_field("password", validate_password(password))?;
    Ok(email)
}

fn issue_tokens(jwt_service: &JwtService, user_id: Uuid) -> Result<AuthTokens, ApiError> {
    let access_token = jwt_service
        .generate_access_token(user_id)
        .map_err(ApiError::Internal)?;
    let refresh_token = jwt_service
        .generate_refresh_token(user_id)
        .map_err(ApiError::Internal)?;

    Ok(AuthTokens {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: jwt_service.access_token_expiry_secs(),
    })
}

fn to_profile(user: UserRecord) -> UserProfile {
    UserProfile {
        id: user.id.to_string(),
        email: user.email,
        email_verified: user.email_verified,
        created_at: user.created_at,
    }
}

impl UserService {
    /// Register a new account and issue a verification token
    ///
    /// There is no mail transport; the token is only written to the debug log.
    pub async fn register(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let email = check_registration(email, password)?;

        if UserRepository::email_exists(pool, &email)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }

        let password_hash = PasswordService::hash(password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let user = UserRepository::create(pool, &email, &password_hash)
            .await
            .map_err(ApiError::Internal)?;

        let verification_token = jwt_service
            .generate_verification_token(user.id)
            .map_err(ApiError::Internal)?;
        info!(user_id = %user.id, "User registered; email verification pending");
        debug!(
            user_id = %user.id,
            verification_token = %verification_token,
            "Verification token issued"
        );
        metrics::counter!("users_registered_total").increment(1);

        issue_tokens(jwt_service, user.id)
    }

    pub async fn login(
        pool: &PgPool,
        jwt_service: &JwtService,
        email: &str,
        password: &str,
    ) -> Result<AuthTokens, ApiError> {
        let user = UserRepository::find_by_email(pool, &normalize_email(email))
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

        let valid = PasswordService::verify(password.to_string(), user.password_hash.clone())
            .await
            .map_err(ApiError::Internal)?;

        if !valid {
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }

        info!(user_id = %user.id, "User logged in");
        issue_tokens(jwt_service, user.id)
    }

    pub async fn refresh_token(
        pool: &PgPool,
        jwt_service: &JwtService,
        refresh_token: &str,
    ) -> Result<AuthTokens, ApiError> {
        let user_id = jwt_service
            .validate_refresh_token(refresh_token)
            .and_then(|claims| claims.user_id())
            .map_err(|e| ApiError::Unauthorized(format!("Invalid refresh token: {}", e)))?;

        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        issue_tokens(jwt_service, user_id)
    }

    /// Consume an email verification token
    pub async fn verify_email(
        pool: &PgPool,
        jwt_service: &JwtService,
        token: &str,
    ) -> Result<UserProfile, ApiError> {
        let user_id = jwt_service
            .validate_verification_token(token)
            .and_then(|claims| claims.user_id())
            .map_err(|e| ApiError::Unauthorized(format!("Invalid verification token: {}", e)))?;

        if !UserRepository::mark_verified(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!(user_id = %user_id, "Email verified");
        Self::get_profile(pool, user_id).await
    }

    pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<UserProfile, ApiError> {
        UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .map(to_profile)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// Delete the account and, by cascade, every product, recipe and preference
    pub async fn delete_account(pool: &PgPool, user_id: Uuid) -> Result<(), ApiError> {
        if !UserRepository::delete(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
        {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        info!(user_id = %user_id, "Account and all data deleted");
        metrics::counter!("users_deleted_total").increment(1);
        Ok(())
    }
}
