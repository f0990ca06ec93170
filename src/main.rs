//! Dough Calculator
//!
//! Baker's percentage calculator for bread dough recipes.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use dough_calc::calculator::{self, HydrationLevel, format_percentage, format_weight};
use dough_calc::config::Config;
use dough_calc::db::SqliteStore;
use dough_calc::local::JsonFileStore;
use dough_calc::models::IngredientInput;
use dough_calc::store::{FallbackStore, RecipeBook, RecipeStore};
use dough_calc::{Classifier, Edit, EditSession, Engine, Outcome, RecipeDraft};

#[derive(Parser)]
#[command(name = "dough-calc")]
#[command(about = "Baker's percentage calculator for bread dough recipes")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the SQLite database (overrides config)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to the JSON fallback file (overrides config)
    #[arg(long)]
    fallback: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty database with schema
    Init,

    /// List saved recipes, newest first
    List,

    /// Show a recipe with weights, percentages and hydration
    Show {
        /// Recipe ID
        id: String,
    },

    /// Save a new recipe
    Create {
        /// Recipe name
        name: String,

        /// Ingredient as NAME=GRAMS, in order (repeatable)
        #[arg(short, long = "ingredient", value_parser = parse_ingredient)]
        ingredients: Vec<(String, f64)>,
    },

    /// Rescale or modify a saved recipe
    ///
    /// Edits are applied in this order: rename, add, remove, percent,
    /// weight, flour, total. Row numbers are the ones printed by `show`.
    Edit {
        /// Recipe ID
        id: String,

        /// Rename a row: ROW=NAME
        #[arg(long, value_parser = parse_row::<String>)]
        rename: Vec<(usize, String)>,

        /// Append an ingredient with this name
        #[arg(long)]
        add: Vec<String>,

        /// Remove a row
        #[arg(long, value_parser = parse_row_number)]
        remove: Vec<usize>,

        /// Set a row's percentage: ROW=PERCENT
        #[arg(long, value_parser = parse_row_amount)]
        percent: Vec<(usize, f64)>,

        /// Set a row's weight: ROW=GRAMS
        #[arg(long, value_parser = parse_row_amount)]
        weight: Vec<(usize, f64)>,

        /// Set the flour weight in grams
        #[arg(long, value_parser = parse_amount)]
        flour: Option<f64>,

        /// Set the total dough mass in grams
        #[arg(long, value_parser = parse_amount)]
        total: Option<f64>,

        /// New recipe name
        #[arg(long)]
        name: Option<String>,

        /// Persist the result (otherwise the edits are discarded)
        #[arg(long)]
        save: bool,
    },

    /// Delete a recipe and its ingredients
    Delete {
        /// Recipe ID
        id: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(database) = cli.database {
        config.storage.database = database;
    }
    if let Some(fallback) = cli.fallback {
        config.storage.fallback = fallback;
    }
    let classifier = Classifier::new(&config.keywords);

    match cli.command {
        Commands::Init => {
            SqliteStore::open(&config.storage.database).with_context(|| {
                format!("Failed to open {}", config.storage.database.display())
            })?;
            println!("Database initialized at: {}", config.storage.database.display());
        }

        Commands::List => {
            let mut book = open_book(&config, classifier);
            book.load()?;
            let recipes = book.recipes();
            if recipes.is_empty() {
                println!("No recipes saved. Run 'create' first.");
            } else {
                println!("{:<36}  {}", "ID", "Recipe");
                println!("{}", "-".repeat(96));
                for r in recipes {
                    let summary = calculator::summarize(book.classifier(), &r.name, &r.ingredients);
                    println!("{:<36}  {}", r.id, summary);
                }
            }
        }

        Commands::Show { id } => {
            let mut book = open_book(&config, classifier);
            book.load()?;
            let recipe = book
                .get(&id)
                .with_context(|| format!("Recipe '{}' not found", id))?;
            println!("{} ({})", recipe.name, recipe.created_at.format("%Y-%m-%d %H:%M"));
            let draft = RecipeDraft::from_ingredients(book.classifier(), &recipe.ingredients);
            print_draft(&draft, book.classifier(), config.mismatch_tolerance_grams);
        }

        Commands::Create { name, ingredients } => {
            let name = resolve_name(Some(name), String::new())?;
            if ingredients.is_empty() {
                bail!("At least one --ingredient NAME=GRAMS is required");
            }
            let inputs: Vec<IngredientInput> = ingredients
                .into_iter()
                .enumerate()
                .map(|(idx, (n, w))| IngredientInput::new(n, w, idx as i64))
                .collect();

            let mut book = open_book(&config, classifier);
            book.load()?;
            let recipe = book.create(&name, &inputs)?;
            println!("Created recipe {}", recipe.id);
        }

        Commands::Edit {
            id,
            rename,
            add,
            remove,
            percent,
            weight,
            flour,
            total,
            name,
            save,
        } => {
            let mut book = open_book(&config, classifier.clone());
            book.load()?;
            let recipe = book
                .get(&id)
                .cloned()
                .with_context(|| format!("Recipe '{}' not found", id))?;

            let engine = Engine::new(classifier);
            let draft = RecipeDraft::from_ingredients(engine.classifier(), &recipe.ingredients);
            let mut session = EditSession::open(engine, draft);
            session.begin_editing();

            for (index, new_name) in rename {
                apply_edit(&mut session, Edit::Rename { index, name: new_name });
            }
            for new_name in add {
                apply_edit(&mut session, Edit::AddEntry);
                let index = session.draft().ingredients().len() - 1;
                apply_edit(&mut session, Edit::Rename { index, name: new_name });
            }
            for index in remove {
                apply_edit(&mut session, Edit::RemoveEntry { index });
            }
            for (index, percentage) in percent {
                apply_edit(&mut session, Edit::SetPercentage { index, percentage });
            }
            for (index, grams) in weight {
                apply_edit(&mut session, Edit::SetWeight { index, weight: grams });
            }
            if let Some(grams) = flour {
                apply_edit(&mut session, Edit::SetReferenceWeight(grams));
            }
            if let Some(grams) = total {
                apply_edit(&mut session, Edit::SetTotalMass(grams));
            }

            let recipe_name = resolve_name(name, recipe.name)?;
            println!("{}", recipe_name);
            print_draft(
                session.draft(),
                session.engine().classifier(),
                config.mismatch_tolerance_grams,
            );

            if save {
                let inputs = session.commit().to_inputs();
                book.update(&id, &recipe_name, &inputs)?;
                info!(id = %id, "Saved edits");
                println!("Saved.");
            } else {
                session.cancel();
                println!("Not saved (pass --save to keep these changes).");
            }
        }

        Commands::Delete { id } => {
            let mut book = open_book(&config, classifier);
            book.load()?;
            if book.get(&id).is_none() {
                bail!("Recipe '{}' not found", id);
            }
            book.delete(&id)?;
            println!("Deleted recipe {}", id);
        }
    }

    Ok(())
}

/// SQLite mirrored to the JSON file, or the JSON file alone when the
/// database cannot be opened
fn open_book(config: &Config, classifier: Classifier) -> RecipeBook<Box<dyn RecipeStore>> {
    let local = JsonFileStore::new(&config.storage.fallback);
    let store: Box<dyn RecipeStore> = match SqliteStore::open(&config.storage.database) {
        Ok(db) => Box::new(FallbackStore::new(db, local)),
        Err(e) => {
            warn!(
                "Cannot open {}, using {} only: {}",
                config.storage.database.display(),
                config.storage.fallback.display(),
                e
            );
            Box::new(local)
        }
    };
    RecipeBook::new(store, classifier)
}

/// A new name replaces the current one; blank names are refused
fn resolve_name(new: Option<String>, current: String) -> Result<String> {
    match new {
        Some(n) if n.trim().is_empty() => bail!("Recipe name must not be empty"),
        Some(n) => Ok(n.trim().to_string()),
        None => Ok(current),
    }
}

fn apply_edit(session: &mut EditSession, edit: Edit) {
    if session.apply(edit.clone()) == Outcome::Unchanged {
        warn!(?edit, "Edit had no effect");
    }
}

fn print_draft(draft: &RecipeDraft, classifier: &Classifier, tolerance: f64) {
    println!("{:>3}  {:<24} {:>10} {:>8}", "#", "Ingredient", "Weight", "%");
    println!("{}", "-".repeat(48));
    for (idx, ing) in draft.ingredients().iter().enumerate() {
        let marker = if ing.is_reference { "*" } else { " " };
        println!(
            "{:>3}{} {:<24} {:>10} {:>8}",
            idx + 1,
            marker,
            ing.name,
            format_weight(ing.weight),
            format_percentage(ing.percentage)
        );
    }
    println!("{}", "-".repeat(48));
    println!(
        "     {:<24} {:>10} {:>8}",
        "Total",
        format_weight(draft.calculated_total_mass()),
        format_percentage(draft.total_percentage())
    );
    println!("Flour:         {}", format_weight(draft.reference_weight()));
    if draft.declared_total_mass() > 0.0 {
        println!("Declared mass: {}", format_weight(draft.declared_total_mass()));
    }
    if draft.reference_weight() > 0.0 && draft.total_percentage() > 0.0 {
        let hydration = draft.hydration(classifier);
        println!(
            "Hydration:     {}% ({})",
            hydration,
            HydrationLevel::from_percent(hydration)
        );
    }
    if let Some(m) = draft.mismatch(tolerance) {
        println!(
            "Warning: calculated mass ({}g) does not match the declared total ({}g)",
            m.calculated.round(),
            m.declared.round()
        );
    }
}

fn parse_ingredient(s: &str) -> Result<(String, f64), String> {
    let (name, grams) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=GRAMS, got '{}'", s))?;
    let grams = parse_amount(grams)?;
    if grams < 0.0 {
        return Err(format!("weight must not be negative: {}", grams));
    }
    Ok((name.trim().to_string(), grams))
}

/// A finite number; NaN and infinities cannot be stored
fn parse_amount(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number '{}': {}", s, e))?;
    if !value.is_finite() {
        return Err(format!("number must be finite: {}", s));
    }
    Ok(value)
}

/// 1-based row number as printed by `show`, returned 0-based
fn parse_row_number(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(format!("invalid row number '{}'", s)),
    }
}

fn parse_row<T>(s: &str) -> Result<(usize, T), String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let (row, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ROW=VALUE, got '{}'", s))?;
    let row = parse_row_number(row)?;
    let value = value
        .trim()
        .parse::<T>()
        .map_err(|e| format!("invalid value '{}': {}", value, e))?;
    Ok((row, value))
}

fn parse_row_amount(s: &str) -> Result<(usize, f64), String> {
    let (row, value) = parse_row::<String>(s)?;
    Ok((row, parse_amount(&value)?))
}
