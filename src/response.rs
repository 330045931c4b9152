use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::AppError;

pub type ApiResult<T> = Result<JsonApiResponse<T>, AppError>;

/// Envelope shared by every endpoint:
/// `{ success, data?, message?, error?, pagination? }`.
#[derive(Debug, Serialize)]
pub struct JsonApiResponse<T: Serialize> {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl Pagination {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            total_pages,
        }
    }
}

impl<T: Serialize> JsonApiResponse<T> {
    fn success(status: StatusCode, data: Option<T>, message: Option<String>) -> Self {
        Self {
            status,
            success: true,
            data,
            message,
            error: None,
            pagination: None,
        }
    }

    pub fn ok(data: T) -> ApiResult<T> {
        Ok(Self::success(StatusCode::OK, Some(data), None))
    }

    pub fn ok_with_message(message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self::success(StatusCode::OK, Some(data), Some(message.into())))
    }

    pub fn created(message: impl Into<String>, data: T) -> ApiResult<T> {
        Ok(Self::success(
            StatusCode::CREATED,
            Some(data),
            Some(message.into()),
        ))
    }

    pub fn paginated(data: T, pagination: Pagination) -> ApiResult<T> {
        let mut response = Self::success(StatusCode::OK, Some(data), None);
        response.pagination = Some(pagination);
        Ok(response)
    }
}

impl JsonApiResponse<()> {
    /// Success without a payload, e.g. after a delete.
    pub fn message(message: impl Into<String>) -> ApiResult<()> {
        Ok(Self::success(StatusCode::OK, None, Some(message.into())))
    }

    pub(crate) fn from_error(err: &AppError) -> Self {
        Self {
            status: status_for(err),
            success: false,
            data: None,
            message: None,
            error: Some(err.message().to_string()),
            pagination: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            log_app_error(&self, status);
        }
        JsonApiResponse::from_error(&self).into_response()
    }
}

impl<T: Serialize> IntoResponse for JsonApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub(crate) fn status_for(err: &AppError) -> StatusCode {
    match err {
        AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        AppError::Forbidden(_) => StatusCode::FORBIDDEN,
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub(crate) fn log_app_error(err: &AppError, status: StatusCode) {
    match err.source_error() {
        Some(source) => tracing::error!(
            status = status.as_u16(),
            error = %err,
            source = %source,
            source_debug = ?source,
            "request failed"
        ),
        None => tracing::error!(status = status.as_u16(), error = %err, "request failed"),
    }
}
