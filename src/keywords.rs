//! Name-based ingredient role classification
//!
//! An ingredient's role is a pure function of its current name: it is a
//! reference ("flour") entry when the lowercased name contains any reference
//! keyword, and a hydrating liquid when it contains any hydrating keyword.
//! Both sets are plain data so they can be replaced from config.

use serde::{Deserialize, Serialize};

/// Keyword sets used to classify ingredients by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keywords {
    /// Terms marking the scaling reference (100% baseline)
    pub reference: Vec<String>,
    /// Terms marking liquids counted towards hydration
    pub hydrating: Vec<String>,
}

impl Default for Keywords {
    fn default() -> Self {
        Keywords {
            reference: vec!["harina".to_string(), "flour".to_string()],
            hydrating: vec![
                "agua".to_string(),
                "water".to_string(),
                "leche".to_string(),
                "milk".to_string(),
            ],
        }
    }
}

/// Case-insensitive substring matcher built from a [`Keywords`] set
#[derive(Debug, Clone, PartialEq)]
pub struct Classifier {
    reference: Vec<String>,
    hydrating: Vec<String>,
}

impl Classifier {
    pub fn new(keywords: &Keywords) -> Self {
        Classifier {
            reference: normalize(&keywords.reference),
            hydrating: normalize(&keywords.hydrating),
        }
    }

    pub fn is_reference(&self, name: &str) -> bool {
        contains_any(name, &self.reference)
    }

    pub fn is_hydrating(&self, name: &str) -> bool {
        contains_any(name, &self.hydrating)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(&Keywords::default())
    }
}

// Empty keywords would match every name.
fn normalize(terms: &[String]) -> Vec<String> {
    terms
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn contains_any(name: &str, terms: &[String]) -> bool {
    let lowered = name.to_lowercase();
    terms.iter().any(|t| lowered.contains(t.as_str()))
}
