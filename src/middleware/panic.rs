use std::any::Any;

use axum::response::{IntoResponse, Response};
use tower_http::catch_panic::CatchPanicLayer;

use crate::{error::AppError, logging::panic_message, response::JsonApiResponse};

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

pub fn catch_panic_layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(panic_to_json as PanicHandler)
}

fn panic_to_json(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = panic_message(panic.as_ref());

    let client_message = if cfg!(debug_assertions) {
        format!("Internal server error: {details}")
    } else {
        "Internal server error".to_string()
    };

    JsonApiResponse::from_error(&AppError::internal(client_message)).into_response()
}
