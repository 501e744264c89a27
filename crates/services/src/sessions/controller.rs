use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};
use tutor_core::model::{ChallengeId, CompletionDialog, Continuation};
use tutor_core::{Challenge, Validator};

use crate::challenge_registry::ChallengeRegistry;
use crate::collaborators::{RenderRequest, Severity};
use crate::config::SessionConfig;
use crate::error::{ProgressError, SessionError};
use crate::progress_store::ProgressStore;

use super::debounce::Debouncer;
use super::events::{SessionDelta, SessionEvent, SubmissionOutcome};

pub const GENERIC_CHECK_FAILURE: &str = "An error occurred while checking your code.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    ChallengeActive { index: usize },
    AllComplete { index: usize },
}

impl SessionState {
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            SessionState::Idle => None,
            SessionState::ChallengeActive { index } | SessionState::AllComplete { index } => {
                Some(index)
            }
        }
    }
}

/// Drives one learner through the catalog.
///
/// Holds an in-memory mirror of the completed set and active index; the
/// progress store is written through on every change but never re-read after
/// boot, so a failed write leaves the session running on the mirror.
pub struct SessionController {
    registry: Arc<ChallengeRegistry>,
    validator: Arc<Validator>,
    store: ProgressStore,
    debouncer: Debouncer,
    state: SessionState,
    completed: Vec<ChallengeId>,
    auto_check: bool,
    dark_mode: bool,
    dialog: Option<CompletionDialog>,
}

impl SessionController {
    #[must_use]
    pub fn new(
        registry: Arc<ChallengeRegistry>,
        validator: Arc<Validator>,
        store: ProgressStore,
        config: SessionConfig,
    ) -> Self {
        Self {
            registry,
            validator,
            store,
            debouncer: Debouncer::new(config.debounce()),
            state: SessionState::Idle,
            completed: Vec::new(),
            auto_check: false,
            dark_mode: false,
            dialog: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.state.index()
    }

    #[must_use]
    pub fn active_challenge(&self) -> Option<&Challenge> {
        self.active_index().and_then(|index| self.registry.get(index))
    }

    #[must_use]
    pub fn completed(&self) -> &[ChallengeId] {
        &self.completed
    }

    #[must_use]
    pub fn auto_check(&self) -> bool {
        self.auto_check
    }

    #[must_use]
    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    #[must_use]
    pub fn dialog(&self) -> Option<&CompletionDialog> {
        self.dialog.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &ChallengeRegistry {
        &self.registry
    }

    // ─── Navigation ───────────────────────────────────────────────────────────

    /// Restore stored progress and show the stored active challenge.
    ///
    /// Completed ids that the loaded catalog does not know are dropped and
    /// the cleaned list is written back.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyCatalog` if there is nothing to show.
    pub async fn boot(&mut self) -> Result<SessionDelta, SessionError> {
        if self.registry.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }

        let mut delta = SessionDelta::default();
        if let Err(err) = self.store.init().await {
            persist_failed(&mut delta, "progress defaults", &err);
        }

        let record = self.store.load_record().await;
        let stored_count = record.completed_ids.len();
        self.completed.clear();
        for id in record.completed_ids {
            if self.registry.get_by_id(id.as_str()).is_some() && !self.completed.contains(&id) {
                self.completed.push(id);
            }
        }
        if self.completed.len() != stored_count {
            warn!(
                dropped = stored_count - self.completed.len(),
                "unknown or repeated completed challenges were dropped"
            );
            if let Err(err) = self.store.set_completed(&self.completed).await {
                persist_failed(&mut delta, "completed challenges", &err);
            }
        }
        self.dark_mode = record.dark_mode;
        delta.push(SessionEvent::ThemeChanged {
            dark: self.dark_mode,
        });
        delta.push(self.progress_event());

        let mut index = record.active_index;
        if index >= self.registry.len() {
            warn!(
                stored = index,
                count = self.registry.len(),
                "stored active index out of range, starting at the first challenge"
            );
            index = 0;
        }
        info!(index, completed = self.completed.len(), "session booted");

        delta.extend(self.load_challenge(index).await?);
        Ok(delta)
    }

    /// Make the challenge at `index` active.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` without changing any state if `index`
    /// is not in the catalog.
    pub async fn load_challenge(&mut self, index: usize) -> Result<SessionDelta, SessionError> {
        let Some(challenge) = self.registry.get(index) else {
            return Err(SessionError::OutOfRange {
                index,
                count: self.registry.len(),
            });
        };
        let id = challenge.id().clone();

        self.debouncer.cancel();
        self.state = self.state_for(index);

        let mut delta = SessionDelta::default();
        if let Err(err) = self.store.set_active_index(index).await {
            persist_failed(&mut delta, "active challenge", &err);
        }

        let code = match self.store.snapshot(&id).await {
            Some(snapshot) => snapshot,
            None => challenge.starter_code().to_string(),
        };
        debug!(index, %id, "challenge loaded");

        delta.push(SessionEvent::ActiveChanged { index });
        delta.push(SessionEvent::Render(self.render_request(index, code)));
        Ok(delta)
    }

    /// # Errors
    ///
    /// Returns `SessionError::BeforeFirst` on the first challenge.
    pub async fn previous(&mut self) -> Result<SessionDelta, SessionError> {
        let index = self.require_active()?;
        let target = index.checked_sub(1).ok_or(SessionError::BeforeFirst)?;
        self.load_challenge(target).await
    }

    /// # Errors
    ///
    /// Returns `SessionError::OutOfRange` on the last challenge.
    pub async fn next(&mut self) -> Result<SessionDelta, SessionError> {
        let index = self.require_active()?;
        self.load_challenge(index + 1).await
    }

    // ─── Editing ──────────────────────────────────────────────────────────────

    /// Save the edited text and, in auto-check mode, restart the debounce window.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `boot`.
    pub async fn on_code_edited(&mut self, text: &str) -> Result<SessionDelta, SessionError> {
        let index = self.require_active()?;
        let id = self.challenge_id(index)?;

        let mut delta = SessionDelta::default();
        if let Err(err) = self.store.save_snapshot(&id, text).await {
            persist_failed(&mut delta, "code snapshot", &err);
        }
        if self.auto_check {
            self.debouncer.schedule(index, text, Instant::now());
        }
        Ok(delta)
    }

    pub fn toggle_auto_check(&mut self) -> SessionDelta {
        self.auto_check = !self.auto_check;
        if !self.auto_check {
            self.debouncer.cancel();
        }
        debug!(enabled = self.auto_check, "auto-check toggled");

        let mut delta = SessionDelta::default();
        delta.push(SessionEvent::AutoCheckChanged {
            enabled: self.auto_check,
        });
        delta
    }

    #[must_use]
    pub fn next_auto_check_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Submit the coalesced edit if its debounce window has elapsed.
    ///
    /// Returns an empty delta when nothing is due.
    ///
    /// # Errors
    ///
    /// Propagates `submit` errors.
    pub async fn fire_auto_check(&mut self) -> Result<SessionDelta, SessionError> {
        match self.debouncer.take_due(Instant::now()) {
            Some((index, text)) if self.active_index() == Some(index) => self.submit(&text).await,
            _ => Ok(SessionDelta::default()),
        }
    }

    /// Replace the editor text with the starter code and save it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `boot`.
    pub async fn reset_code(&mut self) -> Result<SessionDelta, SessionError> {
        let index = self.require_active()?;
        let (id, code) = match self.registry.get(index) {
            Some(challenge) => (challenge.id().clone(), challenge.starter_code().to_string()),
            None => return Err(self.out_of_range(index)),
        };
        self.debouncer.cancel();

        let mut delta = SessionDelta::default();
        if let Err(err) = self.store.save_snapshot(&id, &code).await {
            persist_failed(&mut delta, "code snapshot", &err);
        }
        delta.push(SessionEvent::EditorReset { code });
        delta.notify("Code reset to the starter template", Severity::Info);
        Ok(delta)
    }

    // ─── Submission ───────────────────────────────────────────────────────────

    /// Grade `code` against the active challenge.
    ///
    /// A pass marks the challenge complete and opens the completion dialog;
    /// a fail or a validator error changes nothing durable.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `boot`.
    pub async fn submit(&mut self, code: &str) -> Result<SessionDelta, SessionError> {
        let index = self.require_active()?;
        let id = self.challenge_id(index)?;
        self.debouncer.cancel();

        let mut delta = SessionDelta::default();
        let verdict = match self.validator.check(id.as_str(), code) {
            Ok(verdict) => verdict,
            Err(err) => {
                warn!(%id, error = %err, "validator failed");
                delta.push(SessionEvent::SubmissionResult(SubmissionOutcome::Errored {
                    message: GENERIC_CHECK_FAILURE.to_string(),
                }));
                return Ok(delta);
            }
        };

        if !verdict.pass {
            debug!(%id, "submission failed");
            delta.push(SessionEvent::SubmissionResult(SubmissionOutcome::Failed {
                message: verdict.message,
            }));
            return Ok(delta);
        }

        info!(%id, index, "challenge completed");
        if !self.completed.contains(&id) {
            self.completed.push(id.clone());
        }
        if let Err(err) = self.store.mark_completed(&id).await {
            persist_failed(&mut delta, "completed challenge", &err);
        }
        self.state = self.state_for(index);

        delta.push(SessionEvent::SubmissionResult(SubmissionOutcome::Passed {
            message: verdict.message,
        }));
        delta.push(self.progress_event());
        delta.push(SessionEvent::Render(
            self.render_request(index, code.to_string()),
        ));

        let dialog = match self.registry.get(index) {
            Some(challenge) => CompletionDialog::for_completion(
                challenge,
                index,
                self.registry.len(),
                self.completed_in_catalog(),
            ),
            None => return Err(self.out_of_range(index)),
        };
        self.dialog = Some(dialog.clone());
        delta.push(SessionEvent::ModalShown(dialog));
        Ok(delta)
    }

    /// Close the completion dialog and follow its continuation.
    ///
    /// # Errors
    ///
    /// Propagates `load_challenge` errors.
    pub async fn continue_from_dialog(&mut self) -> Result<SessionDelta, SessionError> {
        let Some(dialog) = self.dialog.take() else {
            return Ok(SessionDelta::default());
        };

        let mut delta = SessionDelta::default();
        delta.push(SessionEvent::ModalHidden);
        if let Continuation::Advance(next) = dialog.continuation {
            delta.extend(self.load_challenge(next).await?);
        }
        Ok(delta)
    }

    pub fn dismiss_dialog(&mut self) -> SessionDelta {
        let mut delta = SessionDelta::default();
        if self.dialog.take().is_some() {
            delta.push(SessionEvent::ModalHidden);
        }
        delta
    }

    // ─── Preferences ──────────────────────────────────────────────────────────

    pub async fn toggle_dark_mode(&mut self) -> SessionDelta {
        self.dark_mode = !self.dark_mode;

        let mut delta = SessionDelta::default();
        if let Err(err) = self.store.set_dark_mode(self.dark_mode).await {
            persist_failed(&mut delta, "theme", &err);
        }
        delta.push(SessionEvent::ThemeChanged {
            dark: self.dark_mode,
        });
        let message = if self.dark_mode {
            "Dark mode activated"
        } else {
            "Light mode activated"
        };
        delta.notify(message, Severity::Info);
        delta
    }

    /// Forget all progress and return to the first challenge. The theme is kept.
    ///
    /// # Errors
    ///
    /// Propagates `load_challenge` errors.
    pub async fn reset_progress(&mut self) -> Result<SessionDelta, SessionError> {
        self.debouncer.cancel();

        let mut delta = SessionDelta::default();
        if self.dialog.take().is_some() {
            delta.push(SessionEvent::ModalHidden);
        }
        if let Err(err) = self.store.clear_all().await {
            persist_failed(&mut delta, "progress reset", &err);
        }
        if let Err(err) = self.store.init().await {
            persist_failed(&mut delta, "progress defaults", &err);
        }
        self.completed.clear();
        info!("progress reset");

        delta.push(self.progress_event());
        delta.extend(self.load_challenge(0).await?);
        delta.notify("Progress has been reset", Severity::Info);
        Ok(delta)
    }

    // ─── Helpers ──────────────────────────────────────────────────────────────

    fn require_active(&self) -> Result<usize, SessionError> {
        self.active_index().ok_or(SessionError::NotStarted)
    }

    fn challenge_id(&self, index: usize) -> Result<ChallengeId, SessionError> {
        self.registry
            .get(index)
            .map(|challenge| challenge.id().clone())
            .ok_or_else(|| self.out_of_range(index))
    }

    fn out_of_range(&self, index: usize) -> SessionError {
        SessionError::OutOfRange {
            index,
            count: self.registry.len(),
        }
    }

    fn completed_in_catalog(&self) -> usize {
        self.registry
            .all()
            .iter()
            .filter(|challenge| self.completed.contains(challenge.id()))
            .count()
    }

    fn state_for(&self, index: usize) -> SessionState {
        if self.completed_in_catalog() == self.registry.len() {
            SessionState::AllComplete { index }
        } else {
            SessionState::ChallengeActive { index }
        }
    }

    fn progress_event(&self) -> SessionEvent {
        SessionEvent::ProgressChanged {
            completed: self.completed.clone(),
            total: self.registry.len(),
        }
    }

    fn render_request(&self, index: usize, code: String) -> RenderRequest {
        let total = self.registry.len();
        let (title, description, hint, completed_badge) = match self.registry.get(index) {
            Some(challenge) => (
                challenge.title().to_string(),
                challenge.description().to_string(),
                challenge.hint().to_string(),
                self.completed.contains(challenge.id()),
            ),
            None => Default::default(),
        };
        RenderRequest {
            index,
            title,
            description,
            hint,
            code,
            completed_badge,
            nav_prev: index > 0,
            nav_next: index + 1 < total,
        }
    }
}

fn persist_failed(delta: &mut SessionDelta, what: &str, err: &ProgressError) {
    warn!(error = %err, "failed to save {what}");
    delta.notify(
        format!("Could not save {what}; continuing without it"),
        Severity::Warning,
    );
}
