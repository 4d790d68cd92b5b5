use crate::error::AppError;
use actix_session::Session;
use tracing::warn;
use uuid::Uuid;

const CSRF_KEY: &str = "csrf_token";

/// The session's token, minted on first use.
pub fn token(session: &Session) -> Result<String, AppError> {
    if let Some(existing) = stored(session)? {
        return Ok(existing);
    }

    let fresh = Uuid::new_v4().to_string();
    session
        .insert(CSRF_KEY, &fresh)
        .map_err(|e| AppError::Session(e.to_string()))?;
    Ok(fresh)
}

pub fn verify(session: &Session, submitted: &str) -> Result<(), AppError> {
    match stored(session)? {
        Some(expected) if !submitted.is_empty() && expected == submitted => Ok(()),
        _ => {
            warn!("Rejected POST with missing or stale CSRF token");
            Err(AppError::Csrf)
        }
    }
}

fn stored(session: &Session) -> Result<Option<String>, AppError> {
    session
        .get::<String>(CSRF_KEY)
        .map_err(|e| AppError::Session(e.to_string()))
}
