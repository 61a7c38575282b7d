//! Settings API endpoints - JSON API

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::Json;
use cashdash_config::{Config, Theme};
use serde::{Deserialize, Serialize};

/// Effective configuration; the store API key is never serialized
pub async fn api_settings(state: axum::extract::State<AppState>) -> Json<Config> {
    Json(state.config.clone())
}

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    /// False when the preference could not be written
    pub persisted: bool,
}

#[derive(Debug, Deserialize)]
pub struct ThemeRequest {
    pub theme: String,
}

pub async fn api_theme(state: axum::extract::State<AppState>) -> Json<ThemeResponse> {
    let theme = state.theme.read().await.current();
    Json(ThemeResponse { theme, persisted: true })
}

fn theme_response(theme: Theme, result: cashdash_config::error::ConfigResult<Theme>) -> Json<ThemeResponse> {
    let persisted = match result {
        Ok(_) => true,
        Err(e) => {
            log::warn!("Theme changed to {} but not saved: {}", theme, e);
            false
        }
    };
    Json(ThemeResponse { theme, persisted })
}

pub async fn api_set_theme(
    state: axum::extract::State<AppState>,
    Json(request): Json<ThemeRequest>,
) -> ApiResult<Json<ThemeResponse>> {
    let theme: Theme = request.theme.parse().map_err(ApiError::bad_request)?;
    let mut store = state.theme.write().await;
    let result = store.set(theme);
    Ok(theme_response(store.current(), result))
}

pub async fn api_toggle_theme(state: axum::extract::State<AppState>) -> Json<ThemeResponse> {
    let mut store = state.theme.write().await;
    let result = store.toggle();
    theme_response(store.current(), result)
}
