// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response types of the drinks catalog. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and the
//! OpenAPI document.
//!
//! A drink has two views:
//!
//! - **short**: recipe colors and parts only, served publicly
//! - **long**: full recipe including ingredient names, behind
//!   `get:drinks-detail`

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Drinks
// =============================================================================

/// One recipe ingredient.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Ingredient without its name (short view).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

/// Stored drink (long view).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Drink {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Public representation of a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkShort {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| IngredientShort {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

/// Recipe as submitted: a single ingredient or a list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum RecipeInput {
    One(Ingredient),
    Many(Vec<Ingredient>),
}

impl From<RecipeInput> for Vec<Ingredient> {
    fn from(value: RecipeInput) -> Self {
        match value {
            RecipeInput::One(ingredient) => vec![ingredient],
            RecipeInput::Many(list) => list,
        }
    }
}

/// Request to create a drink.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub title: String,
    pub recipe: RecipeInput,
}

/// Partial update of a drink.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub recipe: Option<RecipeInput>,
}

// =============================================================================
// Responses
// =============================================================================

/// `GET /drinks` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrinkListResponse {
    pub success: bool,
    pub num_records: usize,
    pub drinks: Vec<DrinkShort>,
}

/// Response carrying long-view drinks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrinkDetailResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

/// `DELETE /drinks/{id}` response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    pub delete: u64,
}
