use crate::schemas::GenericResponse;
use crate::utils::error_chain_fmt;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(thiserror::Error)]
pub enum OrderError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    PaymentGatewayError(String, anyhow::Error),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for OrderError {
    fn status_code(&self) -> StatusCode {
        match self {
            OrderError::ValidationError(_) => StatusCode::BAD_REQUEST,
            OrderError::PaymentGatewayError(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
            OrderError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let status_code_str = status_code.as_str();
        let inner_error_msg = match self {
            OrderError::ValidationError(message) => message.to_string(),
            OrderError::PaymentGatewayError(message, _err) => message.to_string(),
            OrderError::UnexpectedError(inner_error) => inner_error.to_string(),
        };

        HttpResponse::build(status_code).json(GenericResponse::error(
            &inner_error_msg,
            status_code_str,
            Some(()),
        ))
    }
}
