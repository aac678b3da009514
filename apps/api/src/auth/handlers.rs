//! Axum route handlers for the Auth API.

use axum::{extract::State, Json};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// POST /api/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = validate_credentials(&request)?;

    let existing: Option<i32> = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Validation("Email already registered".to_string()));
    }

    let password_hash = hash_password(&request.password)?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING *",
    )
    .bind(&email)
    .bind(&password_hash)
    .fetch_one(&state.db)
    .await
    .map_err(registration_error)?;

    info!("Registered user {}", user.id);

    let token = state.jwt.issue(user.id, &user.email)?;
    Ok(Json(TokenResponse::bearer(token)))
}

/// A concurrent registration can win the race past the SELECT; the UNIQUE
/// constraint on `users.email` catches it.
fn registration_error(err: sqlx::Error) -> AppError {
    match err.as_database_error() {
        Some(db_err) if db_err.is_unique_violation() => {
            AppError::Validation("Email already registered".to_string())
        }
        _ => AppError::Database(err),
    }
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<Credentials>,
) -> Result<Json<TokenResponse>, AppError> {
    let email = normalize_email(&request.email);

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    let user = match user {
        Some(u) if u.is_active && verify_password(&request.password, &u.password_hash)? => u,
        _ => return Err(AppError::Unauthorized("Invalid credentials".to_string())),
    };

    info!("User {} logged in", user.id);

    let token = state.jwt.issue(user.id, &user.email)?;
    Ok(Json(TokenResponse::bearer(token)))
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns the normalized email when the credentials are acceptable for a new account.
fn validate_credentials(request: &Credentials) -> Result<String, AppError> {
    let email = normalize_email(&request.email);
    if !EmailAddress::is_valid(&email) {
        return Err(AppError::Validation(format!(
            "'{}' is not a valid email address",
            request.email.trim()
        )));
    }
    if request.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind};

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_email_is_normalized() {
        let email = validate_credentials(&creds("  Ada@Example.COM ", "secret1")).unwrap();
        assert_eq!(email, "ada@example.com");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let result = validate_credentials(&creds("not-an-email", "secret1"));
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("not a valid email")));
    }

    #[test]
    fn test_short_password_rejected() {
        let result = validate_credentials(&creds("ada@example.com", "abc"));
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("at least 6")));
    }

    #[derive(Debug)]
    struct ConstraintError(ErrorKind);

    impl std::fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "constraint violated")
        }
    }

    impl std::error::Error for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint \"users_email_key\""
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            match self.0 {
                ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
                _ => ErrorKind::Other,
            }
        }
    }

    #[test]
    fn test_duplicate_insert_reports_registered_email() {
        let err = registration_error(sqlx::Error::Database(Box::new(ConstraintError(
            ErrorKind::UniqueViolation,
        ))));
        assert!(matches!(err, AppError::Validation(msg) if msg == "Email already registered"));
    }

    #[test]
    fn test_other_insert_failures_stay_database_errors() {
        let err = registration_error(sqlx::Error::Database(Box::new(ConstraintError(
            ErrorKind::Other,
        ))));
        assert!(matches!(err, AppError::Database(_)));
        assert!(matches!(registration_error(sqlx::Error::RowNotFound), AppError::Database(_)));
    }

    #[test]
    fn test_token_response_is_bearer() {
        let json = serde_json::to_value(TokenResponse::bearer("t".to_string())).unwrap();
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["access_token"], "t");
    }
}
