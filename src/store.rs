//! Recipe persistence contract
//!
//! Storage sits outside the recalculation engine. [`RecipeStore`] is the
//! narrow interface a backend implements; [`RecipeBook`] layers the save
//! rules on top (fresh ids and timestamps, percentages recomputed from
//! weights on every save and load); [`FallbackStore`] pairs a primary
//! backend with a local one that keeps working when the primary fails.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculator::compute_percentages;
use crate::error::{Error, Result};
use crate::keywords::Classifier;
use crate::models::{IngredientInput, RecipeWithIngredients, StoredIngredient};

/// A place recipes are kept
pub trait RecipeStore {
    fn load_all(&mut self) -> Result<Vec<RecipeWithIngredients>>;

    fn insert(&mut self, recipe: &RecipeWithIngredients) -> Result<()>;

    /// Replace the recipe and its whole ingredient set
    fn replace(&mut self, recipe: &RecipeWithIngredients) -> Result<()>;

    /// Remove the recipe and all its ingredients
    fn remove(&mut self, id: &str) -> Result<()>;

    /// Overwrite the store's contents with `recipes`
    fn replace_all(&mut self, recipes: &[RecipeWithIngredients]) -> Result<()>;
}

impl<S: RecipeStore + ?Sized> RecipeStore for Box<S> {
    fn load_all(&mut self) -> Result<Vec<RecipeWithIngredients>> {
        (**self).load_all()
    }
    fn insert(&mut self, recipe: &RecipeWithIngredients) -> Result<()> {
        (**self).insert(recipe)
    }
    fn replace(&mut self, recipe: &RecipeWithIngredients) -> Result<()> {
        (**self).replace(recipe)
    }
    fn remove(&mut self, id: &str) -> Result<()> {
        (**self).remove(id)
    }
    fn replace_all(&mut self, recipes: &[RecipeWithIngredients]) -> Result<()> {
        (**self).replace_all(recipes)
    }
}

/// Primary store with a local mirror.
///
/// Reads come from the primary unless it errors or holds nothing, in which
/// case the fallback answers. Writes try the primary, log a failure, and are
/// always applied to the fallback.
pub struct FallbackStore<P, F> {
    primary: P,
    fallback: F,
}

impl<P: RecipeStore, F: RecipeStore> FallbackStore<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        FallbackStore { primary, fallback }
    }

    pub fn fallback(&self) -> &F {
        &self.fallback
    }
}

impl<P: RecipeStore, F: RecipeStore> RecipeStore for FallbackStore<P, F> {
    fn load_all(&mut self) -> Result<Vec<RecipeWithIngredients>> {
        match self.primary.load_all() {
            Ok(recipes) if !recipes.is_empty() => {
                self.fallback.replace_all(&recipes)?;
                return Ok(recipes);
            }
            Ok(_) => {}
            Err(e) => warn!("Error loading from primary store, using fallback: {}", e),
        }
        self.fallback.load_all()
    }

    fn insert(&mut self, recipe: &RecipeWithIngredients) -> Result<()> {
        if let Err(e) = self.primary.insert(recipe) {
            warn!(id = %recipe.id, "Error saving to primary store: {}", e);
        }
        self.fallback.insert(recipe)
    }

    fn replace(&mut self, recipe: &RecipeWithIngredients) -> Result<()> {
        if let Err(e) = self.primary.replace(recipe) {
            warn!(id = %recipe.id, "Error updating in primary store: {}", e);
        }
        self.fallback.replace(recipe)
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        if let Err(e) = self.primary.remove(id) {
            warn!(id, "Error deleting from primary store: {}", e);
        }
        self.fallback.remove(id)
    }

    fn replace_all(&mut self, recipes: &[RecipeWithIngredients]) -> Result<()> {
        if let Err(e) = self.primary.replace_all(recipes) {
            warn!("Error rewriting primary store: {}", e);
        }
        self.fallback.replace_all(recipes)
    }
}

/// Saved recipes plus the rules for saving them
pub struct RecipeBook<S> {
    store: S,
    classifier: Classifier,
    recipes: Vec<RecipeWithIngredients>,
}

impl<S: RecipeStore> RecipeBook<S> {
    pub fn new(store: S, classifier: Classifier) -> Self {
        RecipeBook {
            store,
            classifier,
            recipes: Vec::new(),
        }
    }

    /// Load every recipe, newest first, with percentages re-derived
    pub fn load(&mut self) -> Result<&[RecipeWithIngredients]> {
        let mut recipes = self.store.load_all()?;
        for recipe in &mut recipes {
            recipe.ingredients.sort_by_key(|i| i.order_index);
            let percentages = compute_percentages(&self.classifier, &recipe.ingredients);
            for (ing, pct) in recipe.ingredients.iter_mut().zip(percentages) {
                ing.percentage = pct;
            }
        }
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.recipes = recipes;
        Ok(&self.recipes)
    }

    pub fn recipes(&self) -> &[RecipeWithIngredients] {
        &self.recipes
    }

    pub fn get(&self, id: &str) -> Option<&RecipeWithIngredients> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn create(&mut self, name: &str, ingredients: &[IngredientInput]) -> Result<RecipeWithIngredients> {
        let id = Uuid::new_v4().to_string();
        let recipe = RecipeWithIngredients {
            ingredients: self.build_ingredients(&id, ingredients),
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.store.insert(&recipe)?;
        info!(id = %recipe.id, name, "Created recipe");
        self.recipes.insert(0, recipe.clone());
        Ok(recipe)
    }

    pub fn update(
        &mut self,
        id: &str,
        name: &str,
        ingredients: &[IngredientInput],
    ) -> Result<RecipeWithIngredients> {
        let created_at = self
            .get(id)
            .map(|r| r.created_at)
            .ok_or_else(|| Error::RecipeNotFound(id.to_string()))?;
        let recipe = RecipeWithIngredients {
            id: id.to_string(),
            name: name.to_string(),
            created_at,
            ingredients: self.build_ingredients(id, ingredients),
        };
        self.store.replace(&recipe)?;
        info!(id, name, "Updated recipe");
        for r in &mut self.recipes {
            if r.id == id {
                *r = recipe.clone();
            }
        }
        Ok(recipe)
    }

    pub fn delete(&mut self, id: &str) -> Result<()> {
        self.store.remove(id)?;
        info!(id, "Deleted recipe");
        self.recipes.retain(|r| r.id != id);
        Ok(())
    }

    fn build_ingredients(&self, recipe_id: &str, inputs: &[IngredientInput]) -> Vec<StoredIngredient> {
        let mut ordered: Vec<&IngredientInput> = inputs.iter().collect();
        ordered.sort_by_key(|i| i.order_index);
        let percentages = compute_percentages(&self.classifier, &ordered);

        ordered
            .into_iter()
            .zip(percentages)
            .enumerate()
            .map(|(idx, (input, percentage))| StoredIngredient {
                id: Uuid::new_v4().to_string(),
                recipe_id: recipe_id.to_string(),
                name: input.name.clone(),
                weight: input.weight,
                percentage,
                order_index: idx as i64,
            })
            .collect()
    }
}
