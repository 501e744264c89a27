use tutor_core::model::{ChallengeId, CompletionDialog};

use crate::collaborators::{RenderRequest, Severity};

/// Result of running the validator over a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Passed { message: String },
    Failed { message: String },
    /// The validator itself could not decide.
    Errored { message: String },
}

impl SubmissionOutcome {
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, SubmissionOutcome::Passed { .. })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            SubmissionOutcome::Passed { message }
            | SubmissionOutcome::Failed { message }
            | SubmissionOutcome::Errored { message } => message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    ActiveChanged { index: usize },
    Render(RenderRequest),
    ProgressChanged { completed: Vec<ChallengeId>, total: usize },
    SubmissionResult(SubmissionOutcome),
    ModalShown(CompletionDialog),
    ModalHidden,
    EditorReset { code: String },
    AutoCheckChanged { enabled: bool },
    ThemeChanged { dark: bool },
    Notify { message: String, severity: Severity },
}

/// Ordered events produced by one session command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDelta {
    events: Vec<SessionEvent>,
}

impl SessionDelta {
    pub fn push(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn extend(&mut self, other: SessionDelta) {
        self.events.extend(other.events);
    }

    pub(crate) fn notify(&mut self, message: impl Into<String>, severity: Severity) {
        self.push(SessionEvent::Notify {
            message: message.into(),
            severity,
        });
    }

    #[must_use]
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The submission outcome carried by this delta, if any.
    #[must_use]
    pub fn submission(&self) -> Option<&SubmissionOutcome> {
        self.events.iter().find_map(|event| match event {
            SessionEvent::SubmissionResult(outcome) => Some(outcome),
            _ => None,
        })
    }

    /// The completion dialog shown by this delta, if any.
    #[must_use]
    pub fn dialog(&self) -> Option<&CompletionDialog> {
        self.events.iter().find_map(|event| match event {
            SessionEvent::ModalShown(dialog) => Some(dialog),
            _ => None,
        })
    }

    #[must_use]
    pub fn render(&self) -> Option<&RenderRequest> {
        self.events.iter().rev().find_map(|event| match event {
            SessionEvent::Render(request) => Some(request),
            _ => None,
        })
    }
}

impl IntoIterator for SessionDelta {
    type Item = SessionEvent;
    type IntoIter = std::vec::IntoIter<SessionEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}
