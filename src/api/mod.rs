// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, patch},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ApiError,
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, Drink, DrinkDetailResponse, DrinkListResponse,
        DrinkShort, Ingredient, IngredientShort, RecipeInput, UpdateDrinkRequest,
    },
    state::AppState,
};

pub mod drinks;
pub mod health;
pub mod json;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/drinks", get(drinks::list_drinks).post(drinks::create_drink))
        .route("/drinks-detail", get(drinks::list_drink_details))
        .route(
            "/drinks/{id}",
            patch(drinks::update_drink).delete(drinks::delete_drink),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        // Applies to the routes registered above, so it comes after them.
        .method_not_allowed_fallback(method_not_allowed)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        drinks::list_drinks,
        drinks::list_drink_details,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink
    ),
    components(
        schemas(
            Drink,
            DrinkShort,
            Ingredient,
            IngredientShort,
            RecipeInput,
            CreateDrinkRequest,
            UpdateDrinkRequest,
            DrinkListResponse,
            DrinkDetailResponse,
            DeleteDrinkResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Drinks", description = "Drinks catalog"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

/// Registers the `bearer` security scheme referenced by protected paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
