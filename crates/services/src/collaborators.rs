//! Presentation contracts the session drives.
//!
//! The controller never calls these directly; it returns a `SessionDelta`
//! and `Presenter::dispatch` routes each event to the right collaborator.

use tutor_core::model::{ChallengeId, CompletionDialog};

use crate::sessions::{SessionDelta, SessionEvent, SubmissionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

/// Everything needed to draw one challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub index: usize,
    pub title: String,
    pub description: String,
    pub hint: String,
    pub code: String,
    pub completed_badge: bool,
    pub nav_prev: bool,
    pub nav_next: bool,
}

pub trait Editor: Send {
    fn current_text(&self) -> String;
    fn replace_text(&mut self, text: &str);
}

pub trait Renderer: Send {
    fn render(&mut self, request: &RenderRequest);
    fn show_result(&mut self, outcome: &SubmissionOutcome);
    fn set_auto_check(&mut self, enabled: bool);
    fn set_theme(&mut self, dark: bool);
}

pub trait ProgressIndicator: Send {
    fn set_active(&mut self, index: usize);
    fn refresh(&mut self, completed: &[ChallengeId], total: usize);
}

pub trait Modal: Send {
    fn show(&mut self, dialog: &CompletionDialog);
    fn hide(&mut self);
}

pub trait Notifier: Send {
    fn show(&mut self, message: &str, severity: Severity);
}

/// One of each collaborator.
pub struct Presenter {
    pub editor: Box<dyn Editor>,
    pub renderer: Box<dyn Renderer>,
    pub progress: Box<dyn ProgressIndicator>,
    pub modal: Box<dyn Modal>,
    pub notifier: Box<dyn Notifier>,
}

impl Presenter {
    /// Apply every event of `delta`, in order.
    pub fn dispatch(&mut self, delta: &SessionDelta) {
        for event in delta.events() {
            self.apply(event);
        }
    }

    fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::ActiveChanged { index } => self.progress.set_active(*index),
            SessionEvent::Render(request) => {
                self.editor.replace_text(&request.code);
                self.renderer.render(request);
            }
            SessionEvent::ProgressChanged { completed, total } => {
                self.progress.refresh(completed, *total);
            }
            SessionEvent::SubmissionResult(outcome) => {
                self.renderer.show_result(outcome);
                let severity = if outcome.is_pass() {
                    Severity::Success
                } else {
                    Severity::Error
                };
                self.notifier.show(outcome.message(), severity);
            }
            SessionEvent::ModalShown(dialog) => self.modal.show(dialog),
            SessionEvent::ModalHidden => self.modal.hide(),
            SessionEvent::EditorReset { code } => self.editor.replace_text(code),
            SessionEvent::AutoCheckChanged { enabled } => self.renderer.set_auto_check(*enabled),
            SessionEvent::ThemeChanged { dark } => self.renderer.set_theme(*dark),
            SessionEvent::Notify { message, severity } => self.notifier.show(message, *severity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Recorder(Log);

    impl Recorder {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }
    }

    impl Editor for Recorder {
        fn current_text(&self) -> String {
            String::new()
        }
        fn replace_text(&mut self, text: &str) {
            self.push(format!("editor:{text}"));
        }
    }

    impl Renderer for Recorder {
        fn render(&mut self, request: &RenderRequest) {
            self.push(format!("render:{}", request.title));
        }
        fn show_result(&mut self, _outcome: &SubmissionOutcome) {
            self.push("result");
        }
        fn set_auto_check(&mut self, enabled: bool) {
            self.push(format!("auto:{enabled}"));
        }
        fn set_theme(&mut self, dark: bool) {
            self.push(format!("theme:{dark}"));
        }
    }

    impl ProgressIndicator for Recorder {
        fn set_active(&mut self, index: usize) {
            self.push(format!("active:{index}"));
        }
        fn refresh(&mut self, completed: &[ChallengeId], total: usize) {
            self.push(format!("progress:{}/{total}", completed.len()));
        }
    }

    impl Modal for Recorder {
        fn show(&mut self, dialog: &CompletionDialog) {
            self.push(format!("modal:{}", dialog.index));
        }
        fn hide(&mut self) {
            self.push("modal:hide");
        }
    }

    impl Notifier for Recorder {
        fn show(&mut self, message: &str, severity: Severity) {
            self.push(format!("notify:{severity:?}:{message}"));
        }
    }

    fn presenter(log: &Log) -> Presenter {
        Presenter {
            editor: Box::new(Recorder(Arc::clone(log))),
            renderer: Box::new(Recorder(Arc::clone(log))),
            progress: Box::new(Recorder(Arc::clone(log))),
            modal: Box::new(Recorder(Arc::clone(log))),
            notifier: Box::new(Recorder(Arc::clone(log))),
        }
    }

    #[test]
    fn dispatch_routes_events_in_order() {
        let log = Log::default();
        let mut presenter = presenter(&log);
        let mut delta = SessionDelta::default();
        delta.push(SessionEvent::ActiveChanged { index: 1 });
        delta.push(SessionEvent::Render(RenderRequest {
            index: 1,
            title: "Wallet".into(),
            description: String::new(),
            hint: String::new(),
            code: "let x;".into(),
            completed_badge: false,
            nav_prev: true,
            nav_next: true,
        }));
        delta.push(SessionEvent::SubmissionResult(SubmissionOutcome::Failed {
            message: "nope".into(),
        }));
        delta.push(SessionEvent::ThemeChanged { dark: true });

        presenter.dispatch(&delta);

        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "active:1",
                "editor:let x;",
                "render:Wallet",
                "result",
                "notify:Error:nope",
                "theme:true",
            ]
        );
    }
}
