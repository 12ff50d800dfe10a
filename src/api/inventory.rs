//! Equipment inventory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::inventory_item::{InventoryGroup, InventoryItem, InventoryItemInput},
};

use super::AdminSession;

/// Inventory grouped by category
#[utoipa::path(
    get,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Items grouped by category", body = Vec<InventoryGroup>)
    )
)]
pub async fn list_inventory(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
) -> AppResult<Json<Vec<InventoryGroup>>> {
    Ok(Json(state.services.inventory.list_grouped().await?))
}

/// Get inventory item by ID
#[utoipa::path(
    get,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Inventory item ID")),
    responses(
        (status = 200, description = "Inventory item", body = InventoryItem)
    )
)]
pub async fn get_inventory_item(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
) -> AppResult<Json<InventoryItem>> {
    Ok(Json(state.services.inventory.get_by_id(&id).await?))
}

/// Add an inventory item
#[utoipa::path(
    post,
    path = "/inventory",
    tag = "inventory",
    security(("bearer_auth" = [])),
    request_body = InventoryItemInput,
    responses(
        (status = 201, description = "Item created", body = InventoryItem),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_inventory_item(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Json(input): Json<InventoryItemInput>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    let item = state.services.inventory.create(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an inventory item
#[utoipa::path(
    put,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Inventory item ID")),
    request_body = InventoryItemInput,
    responses(
        (status = 200, description = "Item updated", body = InventoryItem),
        (status = 409, description = "Stale expected_version", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_inventory_item(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
    Json(input): Json<InventoryItemInput>,
) -> AppResult<Json<InventoryItem>> {
    Ok(Json(state.services.inventory.update(&id, input).await?))
}

/// Delete an inventory item
#[utoipa::path(
    delete,
    path = "/inventory/{id}",
    tag = "inventory",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Inventory item ID")),
    responses(
        (status = 204, description = "Item deleted")
    )
)]
pub async fn delete_inventory_item(
    State(state): State<crate::AppState>,
    AdminSession(_session): AdminSession,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.services.inventory.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
