use crate::error::AppError;
use actix_session::Session;

const FLASH_KEY: &str = "_flashes";

/// Queues a one-shot notice for the next rendered page.
pub fn push(session: &Session, message: &str) -> Result<(), AppError> {
    let mut flashes = peek(session)?;
    flashes.push(message.to_string());

    session
        .insert(FLASH_KEY, flashes)
        .map_err(|e| AppError::Session(e.to_string()))
}

/// Returns queued messages and clears them.
pub fn take(session: &Session) -> Result<Vec<String>, AppError> {
    let flashes = peek(session)?;
    if !flashes.is_empty() {
        session.remove(FLASH_KEY);
    }
    Ok(flashes)
}

fn peek(session: &Session) -> Result<Vec<String>, AppError> {
    session
        .get::<Vec<String>>(FLASH_KEY)
        .map(Option::unwrap_or_default)
        .map_err(|e| AppError::Session(e.to_string()))
}
