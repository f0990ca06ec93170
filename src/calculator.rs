//! Dough metric calculator
//!
//! Stateless helpers deriving summary metrics from an ingredient list:
//! reference (flour) weight, hydrating liquid weight, hydration, and the
//! reference-relative percentages used when a recipe is saved or loaded.

use std::fmt;

use crate::keywords::Classifier;
use crate::models::Weighed;

/// Round a derived mass to the nearest whole gram
pub fn round_grams(grams: f64) -> f64 {
    grams.round()
}

/// Sum of the weights of all reference-classified entries (0 if none)
pub fn total_reference_weight<W: Weighed>(classifier: &Classifier, entries: &[W]) -> f64 {
    entries
        .iter()
        .filter(|e| classifier.is_reference(e.name()))
        .map(Weighed::weight)
        .sum()
}

/// Sum of the weights of all hydrating-liquid entries
pub fn total_hydrating_weight<W: Weighed>(classifier: &Classifier, entries: &[W]) -> f64 {
    entries
        .iter()
        .filter(|e| classifier.is_hydrating(e.name()))
        .map(Weighed::weight)
        .sum()
}

/// Liquid weight as a whole percentage of the reference weight.
///
/// Defined as 0 when there is no reference weight, whatever the liquids weigh.
pub fn hydration_percent<W: Weighed>(classifier: &Classifier, entries: &[W]) -> i64 {
    let flour = total_reference_weight(classifier, entries);
    if flour == 0.0 {
        return 0;
    }
    let water = total_hydrating_weight(classifier, entries);
    (100.0 * water / flour).round() as i64
}

/// Percentage of every entry relative to the total reference weight.
///
/// All percentages are 0 when the reference weight is 0.
pub fn compute_percentages<W: Weighed>(classifier: &Classifier, entries: &[W]) -> Vec<f64> {
    let flour = total_reference_weight(classifier, entries);
    entries
        .iter()
        .map(|e| {
            if flour == 0.0 {
                0.0
            } else {
                e.weight() * 100.0 / flour
            }
        })
        .collect()
}

/// "650g" below a kilogram, "1.65 kg" from 1000 g up
pub fn format_weight(grams: f64) -> String {
    if grams >= 1000.0 {
        format!("{:.2} kg", grams / 1000.0)
    } else {
        format!("{}g", grams.round() as i64)
    }
}

/// One decimal place, e.g. "65.0%"
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Coarse dough consistency band for a hydration value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationLevel {
    Stiff,
    Medium,
    Wet,
}

impl HydrationLevel {
    pub fn from_percent(hydration: i64) -> Self {
        if hydration < 60 {
            HydrationLevel::Stiff
        } else if hydration <= 75 {
            HydrationLevel::Medium
        } else {
            HydrationLevel::Wet
        }
    }
}

impl fmt::Display for HydrationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HydrationLevel::Stiff => "stiff",
            HydrationLevel::Medium => "medium",
            HydrationLevel::Wet => "wet",
        };
        f.write_str(label)
    }
}

/// Summary of a recipe's metrics, for listings
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeSummary {
    pub name: String,
    pub ingredient_count: usize,
    pub total_weight: f64,
    pub reference_weight: f64,
    pub hydration: i64,
}

impl RecipeSummary {
    pub fn level(&self) -> HydrationLevel {
        HydrationLevel::from_percent(self.hydration)
    }
}

/// Generate a summary of an ingredient list
pub fn summarize<W: Weighed>(classifier: &Classifier, name: &str, entries: &[W]) -> RecipeSummary {
    RecipeSummary {
        name: name.to_string(),
        ingredient_count: entries.len(),
        total_weight: entries.iter().map(Weighed::weight).sum(),
        reference_weight: total_reference_weight(classifier, entries),
        hydration: hydration_percent(classifier, entries),
    }
}

impl fmt::Display for RecipeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<30} {:>3} ingred. {:>10} ",
            self.name,
            self.ingredient_count,
            format_weight(self.total_weight)
        )?;
        if self.reference_weight > 0.0 {
            write!(f, "{:>4}% ({})", self.hydration, self.level())
        } else {
            write!(f, "{:>5}", "-")
        }
    }
}
