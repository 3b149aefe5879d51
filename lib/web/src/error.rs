use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use registry::error::RegistryError;

#[derive(thiserror::Error, Debug)]
pub enum RegistryServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl RegistryServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            RegistryServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RegistryServerError::Registry(error) => registry_error_status(error),
        }
    }
}

/// Maps a failed search to the status code of its response.
pub fn registry_error_status(error: &RegistryError) -> StatusCode {
    match error {
        RegistryError::QueryBuild(_) => StatusCode::BAD_REQUEST,
        RegistryError::QueryExecution(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for RegistryServerError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
