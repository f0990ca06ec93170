//! SQLite recipe store: schema and operations

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::models::{RecipeWithIngredients, StoredIngredient};
use crate::store::RecipeStore;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS recipes (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        -- Percentages are kept for readers of the raw table only; they are
        -- recomputed from weights on load.
        CREATE TABLE IF NOT EXISTS ingredients (
            id TEXT PRIMARY KEY,
            recipe_id TEXT NOT NULL,
            name TEXT NOT NULL,
            weight REAL NOT NULL,
            percentage REAL NOT NULL,
            order_index INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_ingredients_recipe ON ingredients(recipe_id);
        "#,
    )?;
    Ok(())
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(SqliteStore { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn insert_recipe(conn: &Connection, recipe: &RecipeWithIngredients) -> Result<()> {
    conn.execute(
        "INSERT INTO recipes (id, name, created_at) VALUES (?1, ?2, ?3)",
        (
            &recipe.id,
            &recipe.name,
            recipe.created_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        ),
    )?;
    insert_ingredients(conn, &recipe.ingredients)
}

fn insert_ingredients(conn: &Connection, ingredients: &[StoredIngredient]) -> Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO ingredients (id, recipe_id, name, weight, percentage, order_index)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;
    for ing in ingredients {
        stmt.execute((
            &ing.id,
            &ing.recipe_id,
            &ing.name,
            ing.weight,
            ing.percentage,
            ing.order_index,
        ))?;
    }
    Ok(())
}

fn delete_recipe(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM ingredients WHERE recipe_id = ?1", [id])?;
    conn.execute("DELETE FROM recipes WHERE id = ?1", [id])?;
    Ok(())
}

fn parse_timestamp(value: String) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|source| Error::Timestamp { value, source })
}

/// All ingredients keyed by recipe, each list in order
fn get_ingredients(conn: &Connection) -> Result<HashMap<String, Vec<StoredIngredient>>> {
    let mut stmt = conn.prepare(
        "SELECT id, recipe_id, name, weight, percentage, order_index
         FROM ingredients
         ORDER BY recipe_id, order_index",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(StoredIngredient {
            id: row.get(0)?,
            recipe_id: row.get(1)?,
            name: row.get(2)?,
            weight: row.get(3)?,
            percentage: row.get(4)?,
            order_index: row.get(5)?,
        })
    })?;

    let mut results: HashMap<String, Vec<StoredIngredient>> = HashMap::new();
    for row in rows {
        let ing = row?;
        results.entry(ing.recipe_id.clone()).or_default().push(ing);
    }
    Ok(results)
}

impl RecipeStore for SqliteStore {
    /// Newest first
    fn load_all(&mut self) -> Result<Vec<RecipeWithIngredients>> {
        let mut ingredients = get_ingredients(&self.conn)?;

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, created_at FROM recipes ORDER BY created_at DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut results = Vec::new();
        for row in rows {
            let (id, name, created_at) = row?;
            results.push(RecipeWithIngredients {
                ingredients: ingredients.remove(&id).unwrap_or_default(),
                created_at: parse_timestamp(created_at)?,
                id,
                name,
            });
        }
        Ok(results)
    }

    fn insert(&mut self, recipe: &RecipeWithIngredients) -> Result<()> {
        let tx = self.conn.transaction()?;
        insert_recipe(&tx, recipe)?;
        tx.commit()?;
        Ok(())
    }

    fn replace(&mut self, recipe: &RecipeWithIngredients) -> Result<()> {
        let tx = self.conn.transaction()?;
        let updated = tx.execute(
            "UPDATE recipes SET name = ?1 WHERE id = ?2",
            (&recipe.name, &recipe.id),
        )?;
        if updated == 0 {
            return Err(Error::RecipeNotFound(recipe.id.clone()));
        }
        tx.execute("DELETE FROM ingredients WHERE recipe_id = ?1", [&recipe.id])?;
        insert_ingredients(&tx, &recipe.ingredients)?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, id: &str) -> Result<()> {
        let tx = self.conn.transaction()?;
        delete_recipe(&tx, id)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_all(&mut self, recipes: &[RecipeWithIngredients]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch("DELETE FROM ingredients; DELETE FROM recipes;")?;
        for recipe in recipes {
            insert_recipe(&tx, recipe)?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::Classifier;
    use crate::models::IngredientInput;
    use crate::store::RecipeBook;

    fn inputs(items: &[(&str, f64)]) -> Vec<IngredientInput> {
        items
            .iter()
            .enumerate()
            .map(|(idx, (name, weight))| IngredientInput::new(*name, *weight, idx as i64))
            .collect()
    }

    #[test]
    fn test_save_reload_recomputes_percentages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("recipes.db");

        let id = {
            let mut book = RecipeBook::new(SqliteStore::open(&path).unwrap(), Classifier::default());
            book.create("Baguette", &inputs(&[("flour", 1000.0), ("water", 650.0)]))
                .unwrap()
                .id
        };

        // Corrupt the stored percentages; load must not trust them.
        let conn = Connection::open(&path).unwrap();
        conn.execute("UPDATE ingredients SET percentage = 7", []).unwrap();
        drop(conn);

        let mut book = RecipeBook::new(SqliteStore::open(&path).unwrap(), Classifier::default());
        let loaded = book.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, id);
        let pcts: Vec<f64> = loaded[0].ingredients.iter().map(|i| i.percentage).collect();
        assert_eq!(pcts, vec![100.0, 65.0]);
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut book = RecipeBook::new(SqliteStore::open_in_memory().unwrap(), Classifier::default());
        let recipe = book
            .create("Focaccia", &inputs(&[("Flour", 500.0), ("Water", 400.0), ("Oil", 30.0)]))
            .unwrap();
        book.update(&recipe.id, "Focaccia", &inputs(&[("Flour", 500.0), ("Water", 350.0)]))
            .unwrap();

        let loaded = book.load().unwrap();
        let names: Vec<&str> = loaded[0].ingredients.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Flour", "Water"]);
        assert_eq!(loaded[0].ingredients[1].percentage, 70.0);
    }

    #[test]
    fn test_replace_missing_recipe() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let recipe = RecipeWithIngredients {
            id: "missing".to_string(),
            name: "x".to_string(),
            created_at: Utc::now(),
            ingredients: Vec::new(),
        };
        assert!(matches!(store.replace(&recipe), Err(Error::RecipeNotFound(_))));
    }

    #[test]
    fn test_remove_deletes_ingredients() {
        let mut book = RecipeBook::new(SqliteStore::open_in_memory().unwrap(), Classifier::default());
        let recipe = book.create("Gone", &inputs(&[("Flour", 100.0), ("Water", 60.0)])).unwrap();
        book.delete(&recipe.id).unwrap();

        let mut store = book.into_store();
        assert!(store.load_all().unwrap().is_empty());
        let count: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM ingredients", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_load_orders_newest_first() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        let base = Utc::now();
        for (idx, name) in ["first", "second", "third"].iter().enumerate() {
            store
                .insert(&RecipeWithIngredients {
                    id: format!("r{idx}"),
                    name: name.to_string(),
                    created_at: base + chrono::Duration::minutes(idx as i64),
                    ingredients: Vec::new(),
                })
                .unwrap();
        }
        let names: Vec<String> = store.load_all().unwrap().into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }
}
