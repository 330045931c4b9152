use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};

use crate::config::GeneralConfig;

/// Lets the browser frontend call the API. Without a configured origin any
/// origin is allowed.
pub fn cors_layer(cfg: &GeneralConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match cfg.cors_origin.as_deref() {
        Some(origin) => {
            let origin = HeaderValue::from_str(origin.trim())
                .with_context(|| format!("invalid general.cors_origin '{origin}'"))?;
            Ok(layer.allow_origin(origin))
        }
        None => Ok(layer.allow_origin(Any)),
    }
}
