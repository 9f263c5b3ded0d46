use std::fmt::{Display, Formatter};

use contract_table_unifier::UnifyError;
use worker::{Response, Result};

use crate::models::{ErrorResponse, FAILURE_PREFIX, NO_TABLES_MESSAGE};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    PayloadTooLarge(String),
    Parse(String),
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "no_matching_tables",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::Parse(_) => "parse_error",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::PayloadTooLarge(message)
            | Self::Parse(message)
            | Self::Internal(message) => message,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::PayloadTooLarge(_) => 413,
            Self::Parse(_) => 422,
            Self::Internal(_) => 500,
        }
    }

    pub fn no_matching_tables() -> Self {
        Self::NotFound(NO_TABLES_MESSAGE.to_string())
    }

    /// Text shown to the user; processing failures carry the cause.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(message) => message.clone(),
            _ => format!("{FAILURE_PREFIX}: {}", self.message()),
        }
    }

    pub fn into_response(self) -> Result<Response> {
        let mut response = Response::from_json(&ErrorResponse {
            code: self.code().to_string(),
            message: self.user_message(),
        })?;
        response.headers_mut().set("Cache-Control", "no-store")?;
        Ok(response.with_status(self.status_code()))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for ApiError {}

impl From<worker::Error> for ApiError {
    fn from(error: worker::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

impl From<UnifyError> for ApiError {
    fn from(error: UnifyError) -> Self {
        match error {
            UnifyError::PdfLoad(_) | UnifyError::NoPagesSelected => Self::Parse(error.to_string()),
            UnifyError::InvalidOption(_) => Self::BadRequest(error.to_string()),
            UnifyError::Io(_) | UnifyError::Xlsx(_) | UnifyError::Csv(_) => {
                Self::Internal(error.to_string())
            }
        }
    }
}
