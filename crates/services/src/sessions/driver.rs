use tokio::sync::mpsc;
use tokio::time::sleep_until;
use tracing::{debug, warn};

use crate::collaborators::{Presenter, Severity};
use crate::error::SessionError;

use super::controller::SessionController;
use super::events::SessionDelta;

/// Everything the presentation can ask of a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIntent {
    Load(usize),
    Previous,
    Next,
    /// Submit whatever the editor currently holds.
    Run,
    Submit(String),
    CodeEdited(String),
    ToggleAutoCheck,
    ResetCode,
    ContinueDialog,
    DismissDialog,
    ToggleDarkMode,
    ResetProgress,
    Quit,
}

/// Run `controller` until the intent channel closes or `Quit` arrives.
///
/// Waits on the next intent and the pending auto-check deadline together, so
/// an auto-check fires only once the editor has been quiet for a full window.
/// Command errors become notifications; none of them ends the loop.
pub async fn run_session(
    controller: &mut SessionController,
    intents: &mut mpsc::Receiver<SessionIntent>,
    presenter: &mut Presenter,
) {
    loop {
        let delta = match controller.next_auto_check_deadline() {
            Some(deadline) => {
                tokio::select! {
                    intent = intents.recv() => match intent {
                        Some(SessionIntent::Quit) | None => break,
                        Some(intent) => apply(controller, presenter, intent).await,
                    },
                    () = sleep_until(deadline) => {
                        debug!("auto-check window elapsed");
                        controller.fire_auto_check().await
                    }
                }
            }
            None => match intents.recv().await {
                Some(SessionIntent::Quit) | None => break,
                Some(intent) => apply(controller, presenter, intent).await,
            },
        };

        match delta {
            Ok(delta) => presenter.dispatch(&delta),
            Err(err) => presenter.dispatch(&error_delta(&err)),
        }
    }
    debug!("session loop ended");
}

async fn apply(
    controller: &mut SessionController,
    presenter: &Presenter,
    intent: SessionIntent,
) -> Result<SessionDelta, SessionError> {
    match intent {
        SessionIntent::Load(index) => controller.load_challenge(index).await,
        SessionIntent::Previous => controller.previous().await,
        SessionIntent::Next => controller.next().await,
        SessionIntent::Run => {
            let code = presenter.editor.current_text();
            controller.submit(&code).await
        }
        SessionIntent::Submit(code) => controller.submit(&code).await,
        SessionIntent::CodeEdited(text) => controller.on_code_edited(&text).await,
        SessionIntent::ToggleAutoCheck => Ok(controller.toggle_auto_check()),
        SessionIntent::ResetCode => controller.reset_code().await,
        SessionIntent::ContinueDialog => controller.continue_from_dialog().await,
        SessionIntent::DismissDialog => Ok(controller.dismiss_dialog()),
        SessionIntent::ToggleDarkMode => Ok(controller.toggle_dark_mode().await),
        SessionIntent::ResetProgress => controller.reset_progress().await,
        SessionIntent::Quit => Ok(SessionDelta::default()),
    }
}

/// Notification shown for a rejected command.
#[must_use]
pub fn error_delta(err: &SessionError) -> SessionDelta {
    warn!(error = %err, "session command rejected");
    let message = match err {
        SessionError::OutOfRange { .. } | SessionError::BeforeFirst => {
            "Invalid challenge index".to_string()
        }
        other => other.to_string(),
    };
    let mut delta = SessionDelta::default();
    delta.notify(message, Severity::Error);
    delta
}
