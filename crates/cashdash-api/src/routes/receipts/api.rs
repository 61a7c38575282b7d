//! Receipts API endpoints
//!
//! Uploads carry the raw file as the request body, with its MIME type in
//! `Content-Type` and the name and month/year label in the query string.

use crate::error::{ApiError, ApiResult};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use cashdash_core::reports::ReceiptsResponse;
use cashdash_core::time::month_name;
use cashdash_core::receipts::month_label;
use cashdash_core::{GroupFilter, ReceiptFile, ReceiptTab, ReceiptUpload, ReceiptView};
use chrono::{Datelike, Utc};
use std::collections::HashMap;

fn parse_tab(raw: &str) -> ApiResult<ReceiptTab> {
    raw.parse().map_err(|_| ApiError::not_found(format!("receipt tab {}", raw)))
}

/// Receipts of a tab grouped by month/year, optionally narrowed by `filter`
pub async fn api_receipts(
    state: axum::extract::State<AppState>,
    Path(tab): Path<String>,
    params: Query<HashMap<String, String>>,
) -> ApiResult<Json<ReceiptsResponse>> {
    let tab = parse_tab(&tab)?;
    let filter = GroupFilter::parse(params.get("filter").map(String::as_str));
    let receipts = state.receipts.read().await;
    Ok(Json(ReceiptsResponse::new(tab, receipts.grouped(tab, &filter))))
}

pub async fn api_receipt_options(
    state: axum::extract::State<AppState>,
    Path(tab): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let tab = parse_tab(&tab)?;
    let receipts = state.receipts.read().await;
    Ok(Json(receipts.month_year_options(tab)))
}

pub async fn api_receipt_upload(
    state: axum::extract::State<AppState>,
    Path(tab): Path<String>,
    params: Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ReceiptFile>)> {
    let tab = parse_tab(&tab)?;
    let name = params
        .get("name")
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("name is required"))?;

    let mime_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::trim)
        .unwrap_or("application/octet-stream");

    let now = Utc::now();
    let month = match params.get("month") {
        Some(month) => month.clone(),
        None => {
            let locale = state.ledger.read().await.locale();
            month_label(month_name(now.month(), locale))
        }
    };
    let year = match params.get("year") {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map_err(|_| ApiError::bad_request(format!("Invalid year: {}", raw)))?,
        None => now.year(),
    };

    let upload = ReceiptUpload::new(name, mime_type, body.to_vec(), &month, year);
    let mut receipts = state.receipts.write().await;
    let file = receipts.add(tab, upload)?;
    Ok((StatusCode::CREATED, Json(file)))
}

/// Images come back as a `data:` URL, PDFs as the raw document
pub async fn api_receipt_view(
    state: axum::extract::State<AppState>,
    Path((tab, id)): Path<(String, String)>,
) -> ApiResult<Response> {
    let tab = parse_tab(&tab)?;
    let receipts = state.receipts.read().await;
    let response = match receipts.view(tab, &id)? {
        ReceiptView::Inline { data_url } => Json(serde_json::json!({ "data_url": data_url })).into_response(),
        ReceiptView::Document { name, mime_type, bytes } => {
            let disposition = format!("inline; filename*=UTF-8''{}", urlencoding::encode(&name));
            (
                [(header::CONTENT_TYPE, mime_type), (header::CONTENT_DISPOSITION, disposition)],
                bytes,
            )
                .into_response()
        }
    };
    Ok(response)
}

pub async fn api_receipt_delete(
    state: axum::extract::State<AppState>,
    Path((tab, id)): Path<(String, String)>,
) -> ApiResult<Json<ReceiptFile>> {
    let tab = parse_tab(&tab)?;
    let mut receipts = state.receipts.write().await;
    Ok(Json(receipts.delete(tab, &id)?))
}

/// Remove every receipt in the tab with this name
pub async fn api_receipt_delete_by_name(
    state: axum::extract::State<AppState>,
    Path((tab, name)): Path<(String, String)>,
) -> ApiResult<Json<serde_json::Value>> {
    let tab = parse_tab(&tab)?;
    let mut receipts = state.receipts.write().await;
    let deleted = receipts.delete_by_name(tab, &name);
    Ok(Json(serde_json::json!({ "deleted": deleted })))
}
