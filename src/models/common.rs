use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;

/// JSON envelope of every API response. Failures carry `error`, successes may
/// carry `data`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> HttpResponse {
        Self::with_data(message.into(), data).respond(StatusCode::OK)
    }

    pub fn created(message: impl Into<String>, data: T) -> HttpResponse {
        Self::with_data(message.into(), data).respond(StatusCode::CREATED)
    }

    fn with_data(message: String, data: T) -> Self {
        Self {
            success: true,
            message,
            data: Some(data),
            error: None,
        }
    }

    fn respond(&self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl ApiResponse<()> {
    /// Success without a payload.
    pub fn done(status: StatusCode, message: impl Into<String>) -> HttpResponse {
        Self {
            success: true,
            message: message.into(),
            data: None,
            error: None,
        }
        .respond(status)
    }

    pub fn fail(status: StatusCode, message: impl Into<String>) -> HttpResponse {
        let message = message.into();
        Self::fail_with_detail(status, message.clone(), message)
    }

    /// `message` is for people, `detail` names the underlying failure.
    pub fn fail_with_detail(status: StatusCode, message: impl Into<String>, detail: impl Into<String>) -> HttpResponse {
        Self {
            success: false,
            message: message.into(),
            data: None,
            error: Some(detail.into()),
        }
        .respond(status)
    }
}
