//! Editing session around a recipe draft
//!
//! Owns the draft, the editable/locked flag, and the baseline snapshot that
//! cancel restores. Edits are only accepted while editing.

use tracing::debug;

use crate::engine::{Edit, Engine, RecipeDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editing,
    Locked,
}

/// What happened to an edit handed to [`EditSession::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// Accepted but guarded into a no-op
    Unchanged,
    /// Rejected because the session is not editing
    Locked,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    engine: Engine,
    draft: RecipeDraft,
    baseline: RecipeDraft,
    mode: Mode,
}

impl EditSession {
    /// Session for a recipe that does not exist yet; starts editable
    pub fn new_recipe(engine: Engine) -> Self {
        let draft = RecipeDraft::empty();
        EditSession {
            engine,
            baseline: draft.clone(),
            draft,
            mode: Mode::Editing,
        }
    }

    /// Session for a saved recipe; starts locked, mirroring the saved state
    pub fn open(engine: Engine, draft: RecipeDraft) -> Self {
        EditSession {
            engine,
            baseline: draft.clone(),
            draft,
            mode: Mode::Locked,
        }
    }

    pub fn draft(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn baseline(&self) -> &RecipeDraft {
        &self.baseline
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Enter editing mode, capturing the current draft as the cancel point
    pub fn begin_editing(&mut self) {
        if self.mode == Mode::Editing {
            return;
        }
        self.baseline = self.draft.clone();
        self.mode = Mode::Editing;
    }

    pub fn apply(&mut self, edit: Edit) -> Outcome {
        if self.mode == Mode::Locked {
            debug!(?edit, "edit rejected, session locked");
            return Outcome::Locked;
        }
        let next = self.engine.apply(&self.draft, &edit);
        if next == self.draft {
            return Outcome::Unchanged;
        }
        self.draft = next;
        Outcome::Applied
    }

    /// Snapshot the current draft as the saved baseline and lock
    pub fn commit(&mut self) -> &RecipeDraft {
        self.baseline = self.draft.clone();
        self.mode = Mode::Locked;
        &self.draft
    }

    /// Discard pending edits, restoring the baseline, and lock
    pub fn cancel(&mut self) {
        self.draft = self.baseline.clone();
        self.mode = Mode::Locked;
    }
}
