//! Data models for recipes and their ingredients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of an ingredient row inside a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntryId(pub u64);

/// One row of the recipe being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngredientEntry {
    pub id: EntryId,
    pub name: String,
    pub weight: f64, // grams
    pub percentage: f64,
    pub is_reference: bool,
}

/// Ingredient as persisted; `percentage` is informational only and is
/// recomputed from weights whenever a recipe is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredIngredient {
    pub id: String,
    pub recipe_id: String,
    pub name: String,
    pub weight: f64,
    pub percentage: f64,
    pub order_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeWithIngredients {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<StoredIngredient>,
}

/// What a caller hands to the store when saving
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientInput {
    pub name: String,
    pub weight: f64,
    pub order_index: i64,
}

impl IngredientInput {
    pub fn new(name: impl Into<String>, weight: f64, order_index: i64) -> Self {
        IngredientInput {
            name: name.into(),
            weight,
            order_index,
        }
    }
}

/// Anything the metric calculator can read a name and a weight from
pub trait Weighed {
    fn name(&self) -> &str;
    fn weight(&self) -> f64;
}

impl Weighed for IngredientEntry {
    fn name(&self) -> &str {
        &self.name
    }
    fn weight(&self) -> f64 {
        self.weight
    }
}

impl Weighed for StoredIngredient {
    fn name(&self) -> &str {
        &self.name
    }
    fn weight(&self) -> f64 {
        self.weight
    }
}

impl Weighed for IngredientInput {
    fn name(&self) -> &str {
        &self.name
    }
    fn weight(&self) -> f64 {
        self.weight
    }
}

impl<T: Weighed + ?Sized> Weighed for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn weight(&self) -> f64 {
        (**self).weight()
    }
}

impl Weighed for (&str, f64) {
    fn name(&self) -> &str {
        self.0
    }
    fn weight(&self) -> f64 {
        self.1
    }
}
