use crate::views;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;

#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "Leave request not found")]
    NotFound,

    #[display(fmt = "Database error: {}", _0)]
    Database(sqlx::Error),

    #[display(fmt = "Invalid or missing CSRF token")]
    Csrf,

    #[display(fmt = "Session error: {}", _0)]
    Session(String),
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Csrf => StatusCode::FORBIDDEN,
            AppError::Database(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // internals stay in the log, not the page
        let message = match self {
            AppError::NotFound | AppError::Csrf => self.to_string(),
            AppError::Database(_) | AppError::Session(_) => {
                "Something went wrong, please try again later".to_string()
            }
        };

        HttpResponse::build(status)
            .content_type(ContentType::html())
            .body(views::error_page(status, &message))
    }
}
