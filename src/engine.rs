//! Baker's percentage recalculation engine
//!
//! A [`RecipeDraft`] holds four coupled quantities: the ingredient weights,
//! their percentages of the reference (flour) weight, the reference weight
//! itself, and a declared total dough mass. Every [`Edit`] names exactly one
//! of them as the driving value and the [`Engine`] re-derives the rest.
//!
//! Derived weights are rounded to whole grams after computation. Percentages
//! keep full precision unless they are edited directly. Guarded edits
//! (non-positive or non-finite inputs, zero percentage sums, out of range
//! rows) leave the draft unchanged rather than failing.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::{self, round_grams};
use crate::keywords::Classifier;
use crate::models::{EntryId, IngredientEntry, IngredientInput, StoredIngredient};

/// Name given to the placeholder row of a new recipe
pub const DEFAULT_REFERENCE_NAME: &str = "Flour";

/// The engine's working state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    ingredients: Vec<IngredientEntry>,
    declared_total_mass: f64,
    next_id: u64,
}

/// Sum of the current weights differs from the declared total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub calculated: f64,
    pub declared: f64,
}

impl RecipeDraft {
    /// A new recipe: one reference placeholder at 100%, no weight
    pub fn empty() -> Self {
        RecipeDraft {
            ingredients: vec![IngredientEntry {
                id: EntryId(0),
                name: DEFAULT_REFERENCE_NAME.to_string(),
                weight: 0.0,
                percentage: 100.0,
                is_reference: true,
            }],
            declared_total_mass: 0.0,
            next_id: 1,
        }
    }

    /// Build a draft from persisted ingredients.
    ///
    /// Stored percentages are ignored: reference rows get 100 (or 0 when the
    /// recipe has no reference weight) and every other row is re-derived from
    /// its weight. The declared total starts at the rounded sum of weights.
    pub fn from_ingredients(classifier: &Classifier, stored: &[StoredIngredient]) -> Self {
        let mut rows: Vec<&StoredIngredient> = stored.iter().collect();
        rows.sort_by_key(|i| i.order_index);

        let flour: f64 = rows
            .iter()
            .filter(|i| classifier.is_reference(&i.name))
            .map(|i| i.weight)
            .sum();

        let ingredients: Vec<IngredientEntry> = rows
            .iter()
            .enumerate()
            .map(|(idx, i)| {
                let is_reference = classifier.is_reference(&i.name);
                let percentage = if flour <= 0.0 {
                    0.0
                } else if is_reference {
                    100.0
                } else {
                    i.weight * 100.0 / flour
                };
                IngredientEntry {
                    id: EntryId(idx as u64),
                    name: i.name.clone(),
                    weight: i.weight,
                    percentage,
                    is_reference,
                }
            })
            .collect();

        if ingredients.is_empty() {
            return RecipeDraft::empty();
        }

        let declared_total_mass = if flour > 0.0 {
            round_grams(ingredients.iter().map(|i| i.weight).sum())
        } else {
            0.0
        };
        let next_id = ingredients.len() as u64;

        RecipeDraft {
            ingredients,
            declared_total_mass,
            next_id,
        }
    }

    pub fn ingredients(&self) -> &[IngredientEntry] {
        &self.ingredients
    }

    pub fn declared_total_mass(&self) -> f64 {
        self.declared_total_mass
    }

    /// Sum of reference-classified weights, the scaling denominator
    pub fn reference_weight(&self) -> f64 {
        self.ingredients
            .iter()
            .filter(|i| i.is_reference)
            .map(|i| i.weight)
            .sum()
    }

    /// Sum of every entry's percentage; each reference row adds its own 100
    pub fn total_percentage(&self) -> f64 {
        self.ingredients.iter().map(|i| i.percentage).sum()
    }

    /// Sum of the current weights
    pub fn calculated_total_mass(&self) -> f64 {
        self.ingredients.iter().map(|i| i.weight).sum()
    }

    pub fn hydration(&self, classifier: &Classifier) -> i64 {
        calculator::hydration_percent(classifier, &self.ingredients)
    }

    /// Some when a total has been declared and the weights have drifted from
    /// it by more than `tolerance` grams.
    pub fn mismatch(&self, tolerance: f64) -> Option<Mismatch> {
        let calculated = self.calculated_total_mass();
        if self.declared_total_mass > 0.0
            && (calculated - self.declared_total_mass).abs() > tolerance
        {
            Some(Mismatch {
                calculated,
                declared: self.declared_total_mass,
            })
        } else {
            None
        }
    }

    /// Ingredient rows in the shape the store expects, positions as order
    pub fn to_inputs(&self) -> Vec<IngredientInput> {
        self.ingredients
            .iter()
            .enumerate()
            .map(|(idx, i)| IngredientInput::new(i.name.clone(), i.weight, idx as i64))
            .collect()
    }

    fn usable_total(&self) -> Option<f64> {
        (self.declared_total_mass > 0.0).then_some(self.declared_total_mass)
    }

    /// Scale every row from a reference weight: reference rows take it as is
    /// (rounded), the rest take their share of it.
    fn derive_weights_from_reference(&mut self, reference_weight: f64) {
        for ing in &mut self.ingredients {
            ing.weight = if ing.is_reference {
                round_grams(reference_weight)
            } else {
                round_grams(reference_weight * ing.percentage / 100.0)
            };
        }
    }

    /// Derive the reference weight from the declared total and rescale
    fn derive_weights_from_total(&mut self, total: f64) -> bool {
        let total_percentage = self.total_percentage();
        if !is_positive(total) || total_percentage == 0.0 || !total_percentage.is_finite() {
            return false;
        }
        self.derive_weights_from_reference(total / (total_percentage / 100.0));
        true
    }
}

impl Default for RecipeDraft {
    fn default() -> Self {
        RecipeDraft::empty()
    }
}

/// A single user change to a draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Edit {
    SetTotalMass(f64),
    SetReferenceWeight(f64),
    SetPercentage { index: usize, percentage: f64 },
    SetWeight { index: usize, weight: f64 },
    Rename { index: usize, name: String },
    AddEntry,
    RemoveEntry { index: usize },
}

/// Pure reducer over drafts: `(draft, edit) -> draft`
#[derive(Debug, Clone, Default)]
pub struct Engine {
    classifier: Classifier,
}

impl Engine {
    pub fn new(classifier: Classifier) -> Self {
        Engine { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Apply one edit, returning the updated draft.
    ///
    /// The input draft is never modified. A guarded edit returns an
    /// identical copy.
    pub fn apply(&self, draft: &RecipeDraft, edit: &Edit) -> RecipeDraft {
        let mut next = draft.clone();
        let changed = match edit {
            Edit::SetTotalMass(total) => set_total_mass(&mut next, *total),
            Edit::SetReferenceWeight(weight) => set_reference_weight(&mut next, *weight),
            Edit::SetPercentage { index, percentage } => {
                set_percentage(&mut next, *index, *percentage)
            }
            Edit::SetWeight { index, weight } => set_weight(&mut next, *index, *weight),
            Edit::Rename { index, name } => rename(&self.classifier, &mut next, *index, name),
            Edit::AddEntry => add_entry(&mut next),
            Edit::RemoveEntry { index } => remove_entry(&mut next, *index),
        };
        if changed {
            debug!(?edit, total = next.declared_total_mass, "edit applied");
        } else {
            debug!(?edit, "edit ignored");
        }
        next
    }
}

/// Finite and strictly above zero; NaN fails both
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn set_total_mass(draft: &mut RecipeDraft, total: f64) -> bool {
    if !draft.derive_weights_from_total(total) {
        return false;
    }
    draft.declared_total_mass = total;
    true
}

fn set_reference_weight(draft: &mut RecipeDraft, weight: f64) -> bool {
    if !is_positive(weight) {
        return false;
    }
    for ing in &mut draft.ingredients {
        ing.weight = if ing.is_reference {
            weight
        } else {
            round_grams(weight * ing.percentage / 100.0)
        };
    }
    draft.declared_total_mass = round_grams(weight * draft.total_percentage() / 100.0);
    true
}

/// The edited row keeps the typed value even on a reference row, which then
/// shifts the baseline for this derivation. Weights follow whenever a usable
/// total exists.
fn set_percentage(draft: &mut RecipeDraft, index: usize, percentage: f64) -> bool {
    if !percentage.is_finite() {
        return false;
    }
    let Some(ing) = draft.ingredients.get_mut(index) else {
        return false;
    };
    ing.percentage = percentage;
    if let Some(total) = draft.usable_total() {
        draft.derive_weights_from_total(total);
    }
    true
}

/// A reference row drives the whole recipe; any other row is overwritten
/// alone and percentages are left stale until the next scaling edit.
fn set_weight(draft: &mut RecipeDraft, index: usize, weight: f64) -> bool {
    if !weight.is_finite() {
        return false;
    }
    let Some(is_reference) = draft.ingredients.get(index).map(|i| i.is_reference) else {
        return false;
    };
    if is_reference {
        return set_reference_weight(draft, weight);
    }
    draft.ingredients[index].weight = weight;
    true
}

fn rename(classifier: &Classifier, draft: &mut RecipeDraft, index: usize, name: &str) -> bool {
    let Some(ing) = draft.ingredients.get_mut(index) else {
        return false;
    };
    let is_reference = classifier.is_reference(name);
    let promoted = is_reference && !ing.is_reference;
    ing.name = name.to_string();
    ing.is_reference = is_reference;
    if !promoted {
        return true;
    }

    ing.percentage = 100.0;
    ing.weight = 0.0;
    let total_percentage = draft.total_percentage();
    if let Some(total) = draft.usable_total() {
        if total_percentage > 0.0 {
            draft.ingredients[index].weight = round_grams(total / (total_percentage / 100.0));
        }
    }
    true
}

fn add_entry(draft: &mut RecipeDraft) -> bool {
    let id = EntryId(draft.next_id);
    draft.next_id += 1;
    draft.ingredients.push(IngredientEntry {
        id,
        name: String::new(),
        weight: 0.0,
        percentage: 0.0,
        is_reference: false,
    });
    true
}

fn remove_entry(draft: &mut RecipeDraft, index: usize) -> bool {
    if draft.ingredients.len() <= 1 || index >= draft.ingredients.len() {
        return false;
    }
    draft.ingredients.remove(index);
    if let Some(total) = draft.usable_total() {
        draft.derive_weights_from_total(total);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored(items: &[(&str, f64)]) -> Vec<StoredIngredient> {
        items
            .iter()
            .enumerate()
            .map(|(idx, (name, weight))| StoredIngredient {
                id: format!("ing-{idx}"),
                recipe_id: "r1".to_string(),
                name: name.to_string(),
                weight: *weight,
                percentage: -1.0,
                order_index: idx as i64,
            })
            .collect()
    }

    fn draft(items: &[(&str, f64)]) -> RecipeDraft {
        RecipeDraft::from_ingredients(&Classifier::default(), &stored(items))
    }

    fn weights(d: &RecipeDraft) -> Vec<f64> {
        d.ingredients().iter().map(|i| i.weight).collect()
    }

    fn percentages(d: &RecipeDraft) -> Vec<f64> {
        d.ingredients().iter().map(|i| i.percentage).collect()
    }

    #[test]
    fn test_empty_draft_has_reference_placeholder() {
        let d = RecipeDraft::empty();
        assert_eq!(d.ingredients().len(), 1);
        assert!(d.ingredients()[0].is_reference);
        assert_eq!(d.ingredients()[0].percentage, 100.0);
        assert_eq!(d.ingredients()[0].weight, 0.0);
        assert_eq!(d.declared_total_mass(), 0.0);
    }

    #[test]
    fn test_from_ingredients_ignores_stored_percentages() {
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0), ("Salt", 20.0)]);
        assert_eq!(percentages(&d), vec![100.0, 65.0, 2.0]);
        assert_eq!(d.declared_total_mass(), 1670.0);
        assert_eq!(d.reference_weight(), 1000.0);
    }

    #[test]
    fn test_from_ingredients_respects_order_index() {
        let mut rows = stored(&[("Water", 700.0), ("Flour", 1000.0)]);
        rows[0].order_index = 1;
        rows[1].order_index = 0;
        let d = RecipeDraft::from_ingredients(&Classifier::default(), &rows);
        assert_eq!(d.ingredients()[0].name, "Flour");
        assert_eq!(d.ingredients()[1].name, "Water");
    }

    #[test]
    fn test_from_ingredients_without_flour() {
        let d = draft(&[("Water", 500.0), ("Sugar", 50.0)]);
        assert_eq!(percentages(&d), vec![0.0, 0.0]);
        assert_eq!(d.declared_total_mass(), 0.0);
    }

    #[test]
    fn test_from_no_ingredients_is_empty_draft() {
        let d = RecipeDraft::from_ingredients(&Classifier::default(), &[]);
        assert_eq!(d, RecipeDraft::empty());
    }

    #[test]
    fn test_set_total_mass() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        let d = engine.apply(&d, &Edit::SetTotalMass(1000.0));

        // 1000 / 1.65 = 606.06
        assert_eq!(weights(&d), vec![606.0, 394.0]);
        assert_eq!(percentages(&d), vec![100.0, 65.0]);
        assert_eq!(d.declared_total_mass(), 1000.0);
        assert!((d.calculated_total_mass() - 1000.0).abs() <= 2.0);
    }

    #[test]
    fn test_set_total_mass_tolerates_rounding_slack() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 300.0), ("Water", 100.0), ("Salt", 100.0), ("Yeast", 100.0)]);
        let d = engine.apply(&d, &Edit::SetTotalMass(1000.0));
        // 1000 / 2.0 = 500 flour; each 33.33% row rounds to 167
        assert_eq!(weights(&d), vec![500.0, 167.0, 167.0, 167.0]);
        assert!((d.calculated_total_mass() - 1000.0).abs() <= 2.0);
        assert!(d.mismatch(2.0).is_none());
    }

    #[test]
    fn test_set_total_mass_guards() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        assert_eq!(engine.apply(&d, &Edit::SetTotalMass(0.0)), d);
        assert_eq!(engine.apply(&d, &Edit::SetTotalMass(-5.0)), d);

        let no_pct = draft(&[("Water", 500.0)]);
        assert_eq!(engine.apply(&no_pct, &Edit::SetTotalMass(800.0)), no_pct);
    }

    #[test]
    fn test_set_total_mass_is_idempotent() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0), ("Salt", 21.0)]);
        let once = engine.apply(&d, &Edit::SetTotalMass(1234.0));
        let twice = engine.apply(&once, &Edit::SetTotalMass(1234.0));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_set_total_mass_with_multiple_reference_entries() {
        // Each reference row adds its own 100% to the baseline, so two flours
        // split the total as if the recipe held 200% flour.
        let engine = Engine::default();
        let d = draft(&[("Bread flour", 500.0), ("Rye flour", 500.0), ("Water", 700.0)]);
        assert_eq!(percentages(&d), vec![100.0, 100.0, 70.0]);
        assert_eq!(d.total_percentage(), 270.0);

        let d = engine.apply(&d, &Edit::SetTotalMass(2700.0));
        assert_eq!(weights(&d), vec![1000.0, 1000.0, 700.0]);
        assert_eq!(d.reference_weight(), 2000.0);
        assert_eq!(d.hydration(engine.classifier()), 35);
    }

    #[test]
    fn test_set_reference_weight() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0), ("Salt", 20.0)]);
        let d = engine.apply(&d, &Edit::SetReferenceWeight(500.5));

        assert_eq!(weights(&d), vec![500.5, 325.0, 10.0]);
        assert_eq!(percentages(&d), vec![100.0, 65.0, 2.0]);
        // 500.5 * 1.67 = 835.835
        assert_eq!(d.declared_total_mass(), 836.0);
    }

    #[test]
    fn test_set_reference_weight_guard() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        assert_eq!(engine.apply(&d, &Edit::SetReferenceWeight(0.0)), d);
    }

    #[test]
    fn test_non_finite_inputs_are_ignored() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let edits = [
                Edit::SetTotalMass(bad),
                Edit::SetReferenceWeight(bad),
                Edit::SetPercentage { index: 1, percentage: bad },
                Edit::SetWeight { index: 0, weight: bad },
                Edit::SetWeight { index: 1, weight: bad },
            ];
            for edit in &edits {
                let after = engine.apply(&d, edit);
                assert_eq!(after, d, "{edit:?} changed the draft");
                assert!(after.ingredients().iter().all(|i| i.weight.is_finite()));
                assert!(after.declared_total_mass().is_finite());
            }
        }
    }

    #[test]
    fn test_set_weight_on_reference_follows_reference_guard() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        assert_eq!(engine.apply(&d, &Edit::SetWeight { index: 0, weight: 0.0 }), d);
        assert_eq!(engine.apply(&d, &Edit::SetWeight { index: 0, weight: -10.0 }), d);
    }

    #[test]
    fn test_set_percentage_on_non_reference() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 600.0)]);
        assert_eq!(d.declared_total_mass(), 1600.0);

        let d = engine.apply(&d, &Edit::SetPercentage { index: 1, percentage: 100.0 });
        // total stays 1600, now split 100:100
        assert_eq!(weights(&d), vec![800.0, 800.0]);
        assert_eq!(percentages(&d), vec![100.0, 100.0]);
        assert_eq!(d.declared_total_mass(), 1600.0);
    }

    #[test]
    fn test_set_percentage_on_reference_shifts_baseline() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 500.0)]);
        let d = engine.apply(&d, &Edit::SetPercentage { index: 0, percentage: 50.0 });
        // 1500 / 1.0 = 1500 reference weight
        assert_eq!(percentages(&d), vec![50.0, 50.0]);
        assert_eq!(weights(&d), vec![1500.0, 750.0]);
    }

    #[test]
    fn test_set_percentage_without_total_keeps_weights() {
        let engine = Engine::default();
        let d = engine.apply(&RecipeDraft::empty(), &Edit::AddEntry);
        let d = engine.apply(&d, &Edit::SetPercentage { index: 1, percentage: 70.0 });
        assert_eq!(percentages(&d), vec![100.0, 70.0]);
        assert_eq!(weights(&d), vec![0.0, 0.0]);
    }

    #[test]
    fn test_set_percentage_out_of_range_is_ignored() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0)]);
        assert_eq!(engine.apply(&d, &Edit::SetPercentage { index: 4, percentage: 1.0 }), d);
    }

    #[test]
    fn test_set_weight_on_reference_drives_recipe() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        let d = engine.apply(&d, &Edit::SetWeight { index: 0, weight: 2000.0 });
        assert_eq!(weights(&d), vec![2000.0, 1300.0]);
        assert_eq!(d.declared_total_mass(), 3300.0);
    }

    #[test]
    fn test_set_weight_on_non_reference_leaves_percentages_stale() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        let d = engine.apply(&d, &Edit::SetWeight { index: 1, weight: 800.0 });

        assert_eq!(weights(&d), vec![1000.0, 800.0]);
        assert_eq!(percentages(&d), vec![100.0, 65.0]);
        assert_eq!(d.declared_total_mass(), 1650.0);
        assert_eq!(
            d.mismatch(1.0),
            Some(Mismatch {
                calculated: 1800.0,
                declared: 1650.0
            })
        );
    }

    #[test]
    fn test_mismatch_needs_declared_total() {
        let engine = Engine::default();
        let d = engine.apply(&RecipeDraft::empty(), &Edit::AddEntry);
        let d = engine.apply(&d, &Edit::SetWeight { index: 1, weight: 300.0 });
        assert_eq!(d.declared_total_mass(), 0.0);
        assert!(d.mismatch(1.0).is_none());
    }

    #[test]
    fn test_rename_to_reference_resets_entry() {
        let engine = Engine::default();
        let d = engine.apply(&RecipeDraft::empty(), &Edit::AddEntry);
        let d = engine.apply(&d, &Edit::SetWeight { index: 1, weight: 250.0 });
        let d = engine.apply(&d, &Edit::SetPercentage { index: 1, percentage: 30.0 });
        let d = engine.apply(&d, &Edit::Rename { index: 1, name: "Rye Flour".to_string() });

        let renamed = &d.ingredients()[1];
        assert!(renamed.is_reference);
        assert_eq!(renamed.percentage, 100.0);
        assert_eq!(renamed.weight, 0.0);
    }

    #[test]
    fn test_rename_to_reference_rederives_weight_from_total() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Seeds", 500.0)]);
        assert_eq!(d.declared_total_mass(), 1500.0);

        let d = engine.apply(&d, &Edit::Rename { index: 1, name: "Spelt flour".to_string() });
        // 1500 / 2.0 = 750 for the new reference row only
        assert_eq!(weights(&d), vec![1000.0, 750.0]);
        assert_eq!(percentages(&d), vec![100.0, 100.0]);
    }

    #[test]
    fn test_rename_from_reference_keeps_percentage() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        let d = engine.apply(&d, &Edit::Rename { index: 0, name: "Semolina".to_string() });
        assert!(!d.ingredients()[0].is_reference);
        assert_eq!(d.ingredients()[0].percentage, 100.0);
        assert_eq!(d.ingredients()[0].weight, 1000.0);
        assert_eq!(d.reference_weight(), 0.0);
    }

    #[test]
    fn test_rename_within_role_only_changes_name() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        let after = engine.apply(&d, &Edit::Rename { index: 1, name: "Warm water".to_string() });
        assert_eq!(after.ingredients()[1].name, "Warm water");
        assert_eq!(weights(&after), weights(&d));
        assert_eq!(percentages(&after), percentages(&d));
    }

    #[test]
    fn test_add_entry_appends_blank_row() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        let d = engine.apply(&d, &Edit::AddEntry);
        let added = d.ingredients().last().cloned();
        assert_eq!(
            added.map(|a| (a.name, a.weight, a.percentage, a.is_reference)),
            Some((String::new(), 0.0, 0.0, false))
        );
        assert_eq!(weights(&d), vec![1000.0, 650.0, 0.0]);
    }

    #[test]
    fn test_entry_ids_are_not_reused() {
        let engine = Engine::default();
        let d = engine.apply(&RecipeDraft::empty(), &Edit::AddEntry);
        let removed_id = d.ingredients()[1].id;
        let d = engine.apply(&d, &Edit::RemoveEntry { index: 1 });
        let d = engine.apply(&d, &Edit::AddEntry);
        assert_ne!(d.ingredients()[1].id, removed_id);
    }

    #[test]
    fn test_remove_last_entry_is_refused() {
        let engine = Engine::default();
        let d = RecipeDraft::empty();
        let after = engine.apply(&d, &Edit::RemoveEntry { index: 0 });
        assert_eq!(after.ingredients().len(), 1);
        assert_eq!(after, d);
    }

    #[test]
    fn test_remove_entry_rescales_to_total() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 600.0), ("Salt", 30.0)]);
        assert_eq!(d.declared_total_mass(), 1630.0);

        let d = engine.apply(&d, &Edit::RemoveEntry { index: 2 });
        // 1630 / 1.6 = 1018.75
        assert_eq!(d.ingredients().len(), 2);
        assert_eq!(weights(&d), vec![1019.0, 611.0]);
        assert_eq!(d.declared_total_mass(), 1630.0);
    }

    #[test]
    fn test_remove_entry_without_total_keeps_weights() {
        let engine = Engine::default();
        let d = draft(&[("Water", 500.0), ("Sugar", 50.0), ("Salt", 10.0)]);
        assert_eq!(d.declared_total_mass(), 0.0);

        let d = engine.apply(&d, &Edit::RemoveEntry { index: 2 });
        assert_eq!(weights(&d), vec![500.0, 50.0]);
        assert_eq!(d.declared_total_mass(), 0.0);
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let engine = Engine::default();
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        let snapshot = d.clone();
        let _ = engine.apply(&d, &Edit::SetTotalMass(3000.0));
        assert_eq!(d, snapshot);
    }

    #[test]
    fn test_to_inputs_uses_positions() {
        let d = draft(&[("Flour", 1000.0), ("Water", 650.0)]);
        let inputs = d.to_inputs();
        assert_eq!(inputs[0], IngredientInput::new("Flour", 1000.0, 0));
        assert_eq!(inputs[1], IngredientInput::new("Water", 650.0, 1));
    }
}
