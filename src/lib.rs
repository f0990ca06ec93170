//! Baker's percentage calculator
//!
//! Keeps an ingredient list, its flour (reference) weight, a declared total
//! dough mass and per-ingredient percentages consistent as any one of them
//! is edited, and derives hydration metrics from the result.

pub mod calculator;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod local;
pub mod models;
pub mod session;
pub mod store;

pub use engine::{Edit, Engine, Mismatch, RecipeDraft};
pub use error::{Error, Result};
pub use keywords::{Classifier, Keywords};
pub use session::{EditSession, Mode, Outcome};
