//! The post wizard: one draft per post kind, a step sequencer and the
//! submission gate, bound together.
//!
//! ```text
//! BasicInfo → Details → TradeOptions → Review → Submitted
//!     ↑__________ previous / jump back ___|
//! ```
//!
//! The wizard's own state (active kind, step, terms, unsaved edits) is kept
//! under the `wizard` key so a session survives between invocations. The
//! drafts themselves are only written on an explicit save or a forward step.

use serde::{Deserialize, Serialize};

use crate::{
    draft::DraftStore,
    gate::{GateError, SubmissionGate},
    model::{Fields, PostKind, PostRecord, Step},
    schema::{self, FieldError},
    sequencer::{JumpRejected, StepSequencer},
    storage::{self, KeyValueStore, StorageError},
};

const STATE_KEY: &str = "wizard";

/// Whether the wizard is still collecting input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Editing,
    Submitted,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedWizard {
    kind: PostKind,
    step: StepSequencer,
    terms_accepted: bool,
    phase: Phase,
    fields: Fields,
}

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{} is incomplete: {}", .step.label(), join_errors(.errors))]
    Incomplete { step: Step, errors: Vec<FieldError> },

    #[error(transparent)]
    Jump(#[from] JumpRejected),

    #[error("submit is only available at the Review step (currently at {0})")]
    NotAtReview(Step),

    #[error("the post has already been submitted; finish with `done`")]
    AlreadySubmitted,

    #[error("nothing has been submitted yet")]
    NotSubmitted,

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = core::result::Result<T, WizardError>;

/// A post-creation session.
pub struct Wizard<'a> {
    store: &'a dyn KeyValueStore,
    kind: PostKind,
    sequencer: StepSequencer,
    terms_accepted: bool,
    phase: Phase,
    draft: DraftStore,
}

impl<'a> Wizard<'a> {
    /// Resumes the stored session, or begins an item post if there is none.
    pub fn open(store: &'a dyn KeyValueStore) -> Result<Self> {
        match storage::load_json::<SavedWizard>(store, STATE_KEY)? {
            Some(saved) => Ok(Self {
                store,
                kind: saved.kind,
                sequencer: saved.step,
                terms_accepted: saved.terms_accepted,
                phase: saved.phase,
                draft: DraftStore::with_fields(saved.kind.draft_key(), saved.fields),
            }),
            None => Self::fresh(store, PostKind::Item),
        }
    }

    /// Begins a new session for `kind`, replacing any stored one.
    ///
    /// The kind's saved draft, if any, is restored.
    pub fn start(store: &'a dyn KeyValueStore, kind: PostKind) -> Result<Self> {
        let wizard = Self::fresh(store, kind)?;
        wizard.persist()?;
        tracing::info!(%kind, "post wizard started");
        Ok(wizard)
    }

    fn fresh(store: &'a dyn KeyValueStore, kind: PostKind) -> Result<Self> {
        Ok(Self {
            store,
            kind,
            sequencer: StepSequencer::new(),
            terms_accepted: false,
            phase: Phase::Editing,
            draft: DraftStore::restore(store, kind.draft_key())?,
        })
    }

    pub fn kind(&self) -> PostKind {
        self.kind
    }

    pub fn step(&self) -> Step {
        self.sequencer.current()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    pub fn draft(&self) -> &DraftStore {
        &self.draft
    }

    /// Merges field values into the active draft.
    ///
    /// If this sets one of the fields that trigger an automatic transition and
    /// completes the step, the wizard moves on (checkpointing the draft) and
    /// the new step is returned.
    pub fn update_data(&mut self, partial: Fields) -> Result<Option<Step>> {
        self.ensure_editing()?;
        let changed: Vec<String> = partial.keys().cloned().collect();
        self.draft.update_data(partial);

        let auto = self.sequencer.auto_advance_due(&changed, self.draft.fields())
            && schema::validate_stage(self.kind, self.step(), self.draft.fields()).is_ok();
        let advanced = if auto { self.advance()? } else { false };

        self.persist()?;
        Ok(advanced.then(|| self.step()))
    }

    /// Saves the active draft. Returns a human-readable save time.
    pub fn save_draft(&self) -> Result<String> {
        self.ensure_editing()?;
        Ok(self.draft.save_draft(self.store)?)
    }

    /// Validates the current step, saves the draft and moves forward.
    ///
    /// No-op at Review. Returns whether the step changed.
    pub fn next(&mut self) -> Result<bool> {
        self.ensure_editing()?;
        let advanced = self.advance()?;
        if advanced {
            self.persist()?;
        }
        Ok(advanced)
    }

    fn advance(&mut self) -> Result<bool> {
        let kind = self.kind;
        let store = self.store;
        let draft = &self.draft;
        self.sequencer.next(|step| {
            schema::validate_stage(kind, step, draft.fields())
                .map_err(|errors| WizardError::Incomplete { step, errors })?;
            draft.save_draft(store)?;
            Ok(())
        })
    }

    /// Moves back one step. No-op at Basic Info. Returns whether the step
    /// changed.
    pub fn previous(&mut self) -> Result<bool> {
        self.ensure_editing()?;
        let moved = self.sequencer.previous();
        if moved {
            self.persist()?;
        }
        Ok(moved)
    }

    /// Jumps back to an earlier step.
    pub fn jump_to(&mut self, step: Step) -> Result<()> {
        self.ensure_editing()?;
        self.sequencer.jump_to(step)?;
        self.persist()
    }

    /// Switches between item and service posts.
    ///
    /// The other kind's saved draft becomes active and the wizard returns to
    /// Basic Info. Unsaved edits to the current draft are dropped; its saved
    /// copy is left as it was. Switching to the active kind changes nothing.
    pub fn switch_post_type(&mut self, kind: PostKind) -> Result<()> {
        self.ensure_editing()?;
        if kind == self.kind {
            return Ok(());
        }
        self.draft = DraftStore::restore(self.store, kind.draft_key())?;
        self.kind = kind;
        self.sequencer.reset();
        self.terms_accepted = false;
        self.persist()?;
        tracing::info!(%kind, "post type switched");
        Ok(())
    }

    /// Ticks or unticks the terms and privacy checkbox.
    pub fn set_terms(&mut self, accepted: bool) -> Result<()> {
        self.ensure_editing()?;
        self.terms_accepted = accepted;
        self.persist()
    }

    /// Submits the active draft through the gate.
    ///
    /// On success the wizard is finished and the saved draft is cleared. A
    /// failure to clear the draft is logged and does not fail the submit. On
    /// any refusal the wizard is left as it was.
    pub fn submit(&mut self, gate: &SubmissionGate<'_>) -> Result<PostRecord> {
        self.ensure_editing()?;
        if !self.sequencer.is_terminal() {
            return Err(WizardError::NotAtReview(self.step()));
        }

        let record = gate.submit(self.kind, self.terms_accepted, self.draft.fields())?;

        // The post exists now; record that before anything else can fail.
        self.phase = Phase::Submitted;
        self.persist()?;
        tracing::info!(kind = %self.kind, title = %record.title, "post submitted");

        if let Err(e) = self.draft.discard(self.store) {
            tracing::warn!(key = self.draft.key(), error = %e, "failed to clear submitted draft");
        }
        Ok(record)
    }

    /// Leaves the success view and ends the session.
    pub fn done(&mut self) -> Result<()> {
        if self.phase != Phase::Submitted {
            return Err(WizardError::NotSubmitted);
        }
        self.store.remove(STATE_KEY)?;
        *self = Self::fresh(self.store, self.kind)?;
        Ok(())
    }

    fn ensure_editing(&self) -> Result<()> {
        match self.phase {
            Phase::Editing => Ok(()),
            Phase::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    fn persist(&self) -> Result<()> {
        let saved = SavedWizard {
            kind: self.kind,
            step: self.sequencer,
            terms_accepted: self.terms_accepted,
            phase: self.phase,
            fields: self.draft.fields().clone(),
        };
        Ok(storage::save_json(self.store, STATE_KEY, &saved)?)
    }
}
