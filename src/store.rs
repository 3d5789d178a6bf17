// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory drinks catalog.
//!
//! Ids are assigned sequentially starting at 1; titles are unique.

use std::collections::BTreeMap;

use crate::error::ApiError;
use crate::models::{CreateDrinkRequest, Drink, UpdateDrinkRequest};

#[derive(Default)]
pub struct DrinkStore {
    drinks: BTreeMap<u64, Drink>,
    next_id: u64,
}

impl DrinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All drinks, ordered by id.
    pub fn list(&self) -> Vec<Drink> {
        self.drinks.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Result<Drink, ApiError> {
        self.drinks
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    pub fn create(&mut self, request: CreateDrinkRequest) -> Result<Drink, ApiError> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(ApiError::Unprocessable);
        }
        self.ensure_unique_title(&title, None)?;

        self.next_id += 1;
        let drink = Drink {
            id: self.next_id,
            title,
            recipe: request.recipe.into(),
        };
        self.drinks.insert(drink.id, drink.clone());
        Ok(drink)
    }

    pub fn update(&mut self, id: u64, request: UpdateDrinkRequest) -> Result<Drink, ApiError> {
        if !self.drinks.contains_key(&id) {
            return Err(ApiError::NotFound);
        }

        let title = match request.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(ApiError::Unprocessable);
                }
                self.ensure_unique_title(&title, Some(id))?;
                Some(title)
            }
            None => None,
        };

        let drink = self
            .drinks
            .get_mut(&id)
            .ok_or(ApiError::NotFound)?;
        if let Some(title) = title {
            drink.title = title;
        }
        if let Some(recipe) = request.recipe {
            drink.recipe = recipe.into();
        }
        Ok(drink.clone())
    }

    pub fn delete(&mut self, id: u64) -> Result<Drink, ApiError> {
        self.drinks
            .remove(&id)
            .ok_or(ApiError::NotFound)
    }

    fn ensure_unique_title(&self, title: &str, except: Option<u64>) -> Result<(), ApiError> {
        let taken = self
            .drinks
            .values()
            .any(|d| d.title == title && Some(d.id) != except);
        if taken {
            Err(ApiError::DuplicateTitle(title.to_string()))
        } else {
            Ok(())
        }
    }
}
