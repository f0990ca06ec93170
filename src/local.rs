//! Local JSON file store
//!
//! Keeps the whole recipe list as a single JSON document. This is the
//! fallback side of [`crate::store::FallbackStore`]; a missing file reads as
//! an empty list.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::models::RecipeWithIngredients;
use crate::store::RecipeStore;

pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    fn read(&self) -> Result<Vec<RecipeWithIngredients>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    /// Write to a temp file, then rename over the old one
    fn write(&self, recipes: &[RecipeWithIngredients]) -> Result<()> {
        let content = serde_json::to_string_pretty(recipes)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| Error::io(&tmp_path, e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| Error::io(&self.path, e))
    }
}

impl RecipeStore for JsonFileStore {
    fn load_all(&mut self) -> Result<Vec<RecipeWithIngredients>> {
        self.read()
    }

    fn insert(&mut self, recipe: &RecipeWithIngredients) -> Result<()> {
        let mut recipes = self.read()?;
        recipes.retain(|r| r.id != recipe.id);
        recipes.insert(0, recipe.clone());
        self.write(&recipes)
    }

    fn replace(&mut self, recipe: &RecipeWithIngredients) -> Result<()> {
        let mut recipes = self.read()?;
        match recipes.iter_mut().find(|r| r.id == recipe.id) {
            Some(existing) => *existing = recipe.clone(),
            None => recipes.insert(0, recipe.clone()),
        }
        self.write(&recipes)
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        let mut recipes = self.read()?;
        recipes.retain(|r| r.id != id);
        self.write(&recipes)
    }

    fn replace_all(&mut self, recipes: &[RecipeWithIngredients]) -> Result<()> {
        self.write(recipes)
    }
}
