use std::sync::{Arc, Mutex};
use std::time::Duration;

use services::sessions::SubmissionOutcome;
use services::{
    AppServices, ChallengeRegistry, Editor, Modal, Notifier, Presenter, ProgressIndicator,
    ProgressStore, RenderRequest, Renderer, SessionConfig, SessionController, SessionIntent,
    Severity, run_session,
};
use storage::repository::InMemoryRepository;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tutor_core::model::{ChallengeId, CompletionDialog};
use tutor_core::validator::{PredicateError, Rule};
use tutor_core::Validator;

type Seen = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
struct Silent {
    notes: Seen,
}

impl Editor for Silent {
    fn current_text(&self) -> String {
        String::new()
    }
    fn replace_text(&mut self, _text: &str) {}
}

impl Renderer for Silent {
    fn render(&mut self, _request: &RenderRequest) {}
    fn show_result(&mut self, _outcome: &SubmissionOutcome) {}
    fn set_auto_check(&mut self, _enabled: bool) {}
    fn set_theme(&mut self, _dark: bool) {}
}

impl ProgressIndicator for Silent {
    fn set_active(&mut self, _index: usize) {}
    fn refresh(&mut self, _completed: &[ChallengeId], _total: usize) {}
}

impl Modal for Silent {
    fn show(&mut self, _dialog: &CompletionDialog) {}
    fn hide(&mut self) {}
}

impl Notifier for Silent {
    fn show(&mut self, message: &str, _severity: Severity) {
        self.notes.lock().unwrap().push(message.to_string());
    }
}

fn presenter(notes: &Seen) -> Presenter {
    Presenter {
        editor: Box::new(Silent::default()),
        renderer: Box::new(Silent::default()),
        progress: Box::new(Silent::default()),
        modal: Box::new(Silent::default()),
        notifier: Box::new(Silent {
            notes: Arc::clone(notes),
        }),
    }
}

/// A session whose first challenge records every text it is asked to grade.
async fn counting_session() -> (SessionController, Seen) {
    let seen = Seen::default();
    let recorder = Arc::clone(&seen);
    let mut validator = Validator::empty();
    validator.register(
        "connect",
        Rule::new(
            move |code: &str| -> Result<bool, PredicateError> {
                recorder.lock().unwrap().push(code.to_string());
                Ok(false)
            },
            "ok",
            "not yet",
        ),
    );

    let services = AppServices::from_parts(
        ChallengeRegistry::builtin(),
        validator,
        ProgressStore::new(Arc::new(InMemoryRepository::new())),
        SessionConfig::new(Duration::from_millis(500)),
    );
    let mut session = services.session();
    session.boot().await.unwrap();
    (session, seen)
}

#[tokio::test(start_paused = true)]
async fn rapid_edits_coalesce_into_one_check_of_the_last_text() {
    let (mut session, seen) = counting_session().await;
    let notes = Seen::default();
    let mut presenter = presenter(&notes);
    let (tx, mut rx) = mpsc::channel(16);

    let feeder = async move {
        tx.send(SessionIntent::ToggleAutoCheck).await.unwrap();
        for i in 0..5 {
            tx.send(SessionIntent::CodeEdited(format!("edit {i}")))
                .await
                .unwrap();
            sleep(Duration::from_millis(100)).await;
        }
        sleep(Duration::from_secs(2)).await;
        tx.send(SessionIntent::Quit).await.unwrap();
    };

    tokio::join!(run_session(&mut session, &mut rx, &mut presenter), feeder);

    assert_eq!(*seen.lock().unwrap(), vec!["edit 4".to_string()]);
    assert_eq!(*notes.lock().unwrap(), vec!["not yet".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn turning_auto_check_off_cancels_pending_check() {
    let (mut session, seen) = counting_session().await;
    let notes = Seen::default();
    let mut presenter = presenter(&notes);
    let (tx, mut rx) = mpsc::channel(16);

    let feeder = async move {
        tx.send(SessionIntent::ToggleAutoCheck).await.unwrap();
        tx.send(SessionIntent::CodeEdited("draft".into())).await.unwrap();
        sleep(Duration::from_millis(200)).await;
        tx.send(SessionIntent::ToggleAutoCheck).await.unwrap();
        sleep(Duration::from_secs(2)).await;
    };

    tokio::join!(run_session(&mut session, &mut rx, &mut presenter), feeder);

    assert!(seen.lock().unwrap().is_empty());
    assert!(!session.auto_check());
}

#[tokio::test(start_paused = true)]
async fn edits_without_auto_check_only_save_snapshots() {
    let (mut session, seen) = counting_session().await;
    let notes = Seen::default();
    let mut presenter = presenter(&notes);
    let (tx, mut rx) = mpsc::channel(16);

    let feeder = async move {
        tx.send(SessionIntent::CodeEdited("draft".into())).await.unwrap();
        sleep(Duration::from_secs(2)).await;
        tx.send(SessionIntent::Next).await.unwrap();
        tx.send(SessionIntent::Previous).await.unwrap();
        tx.send(SessionIntent::Previous).await.unwrap();
    };

    tokio::join!(run_session(&mut session, &mut rx, &mut presenter), feeder);

    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(session.active_index(), Some(0));
    assert_eq!(
        *notes.lock().unwrap(),
        vec!["Invalid challenge index".to_string()]
    );
}
