use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub enum BaseError {
    ParamInvalid(Option<String>),
    NotFound(Option<String>),
    DatabaseFatal(Option<String>),
    StoreTimeout(Option<String>),
    StoreError(Option<String>), // For AppStoreError
    InternalServerError(Option<String>),
}

impl From<crate::service::app_state::AppStoreError> for BaseError {
    fn from(err: crate::service::app_state::AppStoreError) -> Self {
        BaseError::StoreError(Some(err.to_string()))
    }
}

impl From<diesel::result::Error> for BaseError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => BaseError::NotFound(None),
            _ => BaseError::DatabaseFatal(Some(err.to_string())),
        }
    }
}

impl From<QueryRejection> for BaseError {
    fn from(rejection: QueryRejection) -> Self {
        BaseError::ParamInvalid(Some(rejection.body_text()))
    }
}

impl BaseError {
    fn parts(self) -> (StatusCode, i32, String) {
        match self {
            BaseError::ParamInvalid(msg) => (
                StatusCode::BAD_REQUEST,
                1001,
                msg.unwrap_or("request params invalid".to_string()),
            ),
            BaseError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                1002,
                msg.unwrap_or("data not found".to_string()),
            ),
            BaseError::DatabaseFatal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                1100,
                msg.unwrap_or("database unknown error".to_string()),
            ),
            BaseError::StoreTimeout(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                1102,
                msg.unwrap_or("database unavailable".to_string()),
            ),
            BaseError::StoreError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                1200,
                msg.unwrap_or("Application cache/store operation failed".to_string()),
            ),
            BaseError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                0,
                msg.unwrap_or("internal server error".to_string()),
            ),
        }
    }
}

impl IntoResponse for BaseError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message) = self.parts();
        let body = Json(json!({
            "code": error_code,
            "msg": error_message,
        }));
        (status, body).into_response()
    }
}
