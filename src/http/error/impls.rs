use actix_web::{body::BoxBody, http::StatusCode, HttpResponse};
use error_stack::Report;
use serde_json::json;

use super::Error;
use crate::{database, types::Error as ErrorType};

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.error_type {
            ErrorType::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorType::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorType::NotFound => StatusCode::NOT_FOUND,
            ErrorType::HandleTaken => StatusCode::CONFLICT,
            ErrorType::InvalidFormBody { .. } => StatusCode::BAD_REQUEST,
            ErrorType::Upstream => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse<BoxBody> {
        tracing::error!(report = ?self, "request failed");

        let mut body = serde_json::to_value(&self.error_type)
            .unwrap_or_else(|_| json!({ "code": "internal" }));
        if let Some(object) = body.as_object_mut() {
            object.insert("message".into(), json!(self.error_type.to_string()));
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<Report<database::Error>> for Error {
    fn from(value: Report<database::Error>) -> Self {
        Error::from_report(ErrorType::Internal, value)
    }
}
