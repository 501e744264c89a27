//! Collaborators that print to stdout.

use services::sessions::SubmissionOutcome;
use services::{
    Editor, Modal, Notifier, Presenter, ProgressIndicator, RenderRequest, Renderer, Severity,
};
use tutor_core::model::{ChallengeId, CompletionDialog};

#[derive(Default)]
struct BufferEditor {
    text: String,
}

impl Editor for BufferEditor {
    fn current_text(&self) -> String {
        self.text.clone()
    }

    fn replace_text(&mut self, text: &str) {
        self.text = text.to_string();
    }
}

struct ChallengeView {
    show_code: bool,
}

impl Renderer for ChallengeView {
    fn render(&mut self, request: &RenderRequest) {
        let badge = if request.completed_badge { " [completed]" } else { "" };
        println!("{}{badge}", request.title);
        println!();
        println!("{}", request.description);
        if !request.hint.is_empty() {
            println!();
            println!("Hint: {}", request.hint);
        }
        if self.show_code {
            println!();
            println!("{}", request.code);
        }
    }

    fn show_result(&mut self, outcome: &SubmissionOutcome) {
        let label = match outcome {
            SubmissionOutcome::Passed { .. } => "PASS",
            SubmissionOutcome::Failed { .. } => "FAIL",
            SubmissionOutcome::Errored { .. } => "ERROR",
        };
        println!("{label}");
    }

    fn set_auto_check(&mut self, enabled: bool) {
        println!("Auto-check {}", if enabled { "on" } else { "off" });
    }

    fn set_theme(&mut self, _dark: bool) {}
}

struct ProgressLine;

impl ProgressIndicator for ProgressLine {
    fn set_active(&mut self, index: usize) {
        println!("-- challenge {} --", index + 1);
    }

    fn refresh(&mut self, completed: &[ChallengeId], total: usize) {
        println!("Progress: {}/{total} completed", completed.len().min(total));
    }
}

struct DialogBox;

impl Modal for DialogBox {
    fn show(&mut self, dialog: &CompletionDialog) {
        println!();
        println!("*** {} ***", dialog.title);
        println!("{}", dialog.message);
        println!("[{}]", dialog.continuation.label());
        println!();
    }

    fn hide(&mut self) {}
}

struct Messages;

impl Notifier for Messages {
    fn show(&mut self, message: &str, severity: Severity) {
        match severity {
            Severity::Success | Severity::Info => println!("{message}"),
            Severity::Warning => eprintln!("warning: {message}"),
            Severity::Error => eprintln!("error: {message}"),
        }
    }
}

/// A presenter writing every event to the terminal.
#[must_use]
pub fn presenter(show_code: bool) -> Presenter {
    Presenter {
        editor: Box::new(BufferEditor::default()),
        renderer: Box::new(ChallengeView { show_code }),
        progress: Box::new(ProgressLine),
        modal: Box::new(DialogBox),
        notifier: Box::new(Messages),
    }
}
