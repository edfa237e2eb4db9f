use axum::{
    response::{IntoResponse, Response, Json},
    http::StatusCode,
};
use crate::errors::AppError;
use crate::models::MessageResponse;

const INTERNAL_MESSAGE: &str = "Internal Server Error";

// The IntoResponse trait implementation converts AppError into a JSON response.
// Internal details stay in the server log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Authentication errors: format vs everything else, nothing finer
            AppError::AuthFormat => (StatusCode::UNAUTHORIZED, "Invalid token format"),
            AppError::AuthInvalid(reason) => {
                tracing::debug!("Rejected bearer token: {}", reason);
                (StatusCode::UNAUTHORIZED, "Invalid token")
            }

            AppError::DuplicateUser(_) => (StatusCode::CONFLICT, "Username already taken"),

            // Unknown user and wrong password look the same from outside
            AppError::UnknownUser(_) | AppError::BadPassword(_) => {
                tracing::info!("{}", self);
                (StatusCode::UNAUTHORIZED, "Login failed")
            }

            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),

            AppError::Validation(msg) => {
                return (StatusCode::BAD_REQUEST, Json(MessageResponse::new(msg.clone())))
                    .into_response();
            }

            AppError::Store(_) | AppError::Hashing(_) | AppError::Internal(_) => {
                tracing::error!("{}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
            }
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}
