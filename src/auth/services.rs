use lazy_static::lazy_static;
use regex::Regex;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::warn;

use crate::auth::jwt::JwtKeys;
use crate::auth::repo::User;
use crate::error::ApiError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Answers "who is making this request": verifies the token, then looks the
/// claimed subject up in the user table. Both failure paths collapse to the
/// same unauthorized response; the distinct cause is only logged. Every call
/// resolves independently from the token alone, nothing is cached.
pub async fn resolve_current_user(
    db: &PgPool,
    keys: &JwtKeys,
    token: &str,
    now: OffsetDateTime,
) -> Result<User, ApiError> {
    let claims = keys.verify(token, now).map_err(|e| {
        warn!(cause = %e, "token rejected");
        ApiError::Unauthorized
    })?;

    match User::find_by_email(db, &claims.sub).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            warn!(subject = %claims.sub, "token subject not found");
            Err(ApiError::Unauthorized)
        }
        Err(e) => Err(ApiError::internal(e)),
    }
}
