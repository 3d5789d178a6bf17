// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Drinks endpoints.
//!
//! Listing is public; everything else requires the matching Auth0
//! permission.

use axum::extract::{Path, State};

use super::json::Json;

use crate::{
    auth::Authorized,
    error::ApiError,
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, DrinkDetailResponse, DrinkListResponse,
        UpdateDrinkRequest,
    },
    permission,
    state::AppState,
};

permission!(
    /// Read full recipes.
    GetDrinksDetail,
    "get:drinks-detail"
);
permission!(
    /// Create drinks.
    PostDrinks,
    "post:drinks"
);
permission!(
    /// Modify drinks.
    PatchDrinks,
    "patch:drinks"
);
permission!(
    /// Remove drinks.
    DeleteDrinks,
    "delete:drinks"
);

#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses((status = 200, body = DrinkListResponse))
)]
pub async fn list_drinks(State(state): State<AppState>) -> Json<DrinkListResponse> {
    let store = state.store.read().await;
    let drinks: Vec<_> = store.list().iter().map(|d| d.short()).collect();
    Json(DrinkListResponse {
        success: true,
        num_records: drinks.len(),
        drinks,
    })
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    security(("bearer" = ["get:drinks-detail"])),
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted")
    )
)]
pub async fn list_drink_details(
    _auth: Authorized<GetDrinksDetail>,
    State(state): State<AppState>,
) -> Json<DrinkDetailResponse> {
    let store = state.store.read().await;
    Json(DrinkDetailResponse {
        success: true,
        drinks: store.list(),
    })
}

#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkRequest,
    tag = "Drinks",
    security(("bearer" = ["post:drinks"])),
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 409, description = "Title already taken")
    )
)]
pub async fn create_drink(
    Authorized(claims, _): Authorized<PostDrinks>,
    State(state): State<AppState>,
    Json(request): Json<CreateDrinkRequest>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let mut store = state.store.write().await;
    let drink = store.create(request)?;
    tracing::info!(drink_id = drink.id, user = claims.subject(), "Drink created");
    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: vec![drink],
    }))
}

#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(("id" = u64, Path, description = "Drink identifier")),
    request_body = UpdateDrinkRequest,
    tag = "Drinks",
    security(("bearer" = ["patch:drinks"])),
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 404, description = "Drink not found")
    )
)]
pub async fn update_drink(
    Authorized(claims, _): Authorized<PatchDrinks>,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateDrinkRequest>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let mut store = state.store.write().await;
    let drink = store.update(id, request)?;
    tracing::info!(drink_id = id, user = claims.subject(), "Drink updated");
    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: vec![drink],
    }))
}

#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(("id" = u64, Path, description = "Drink identifier")),
    tag = "Drinks",
    security(("bearer" = ["delete:drinks"])),
    responses(
        (status = 200, body = DeleteDrinkResponse),
        (status = 404, description = "Drink not found")
    )
)]
pub async fn delete_drink(
    Authorized(claims, _): Authorized<DeleteDrinks>,
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    let mut store = state.store.write().await;
    store.delete(id)?;
    tracing::info!(drink_id = id, user = claims.subject(), "Drink deleted");
    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}
