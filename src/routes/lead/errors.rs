use crate::schemas::GenericResponse;
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(thiserror::Error)]
pub enum LeadError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    UnexpectedStringError(String),
}

impl std::fmt::Debug for LeadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for LeadError {
    fn status_code(&self) -> StatusCode {
        match self {
            LeadError::ValidationError(_) => StatusCode::BAD_REQUEST,
            LeadError::UnexpectedStringError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let status_code_str = status_code.as_str();
        let inner_error_msg = match self {
            LeadError::ValidationError(message) => message.to_string(),
            LeadError::UnexpectedStringError(message) => message.to_string(),
        };

        HttpResponse::build(status_code).json(GenericResponse::error(
            &inner_error_msg,
            status_code_str,
            Some(()),
        ))
    }
}
