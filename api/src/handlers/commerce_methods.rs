//! Shipping, payment and tax method handlers

use axum::{
    extract::{Path, State},
    Json,
};

use crate::domain::entities::{CommerceMethod, MethodKind};
use crate::error::AppError;
use crate::AppState;

fn parse_kind(kind: &str) -> Result<MethodKind, AppError> {
    kind.parse().map_err(AppError::BadRequest)
}

/// GET /api/commerce/methods/:kind
pub async fn list_methods(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<CommerceMethod>>, AppError> {
    let kind = parse_kind(&kind)?;
    Ok(Json(state.commerce_method_service.methods(kind)))
}

/// GET /api/commerce/methods/:kind/:code
pub async fn get_method(
    State(state): State<AppState>,
    Path((kind, code)): Path<(String, String)>,
) -> Result<Json<CommerceMethod>, AppError> {
    let kind = parse_kind(&kind)?;
    let method = state
        .commerce_method_service
        .create(kind, &code)
        .ok_or_else(|| AppError::NotFound(format!("No {} method {}", kind, code)))?;
    Ok(Json(method))
}
