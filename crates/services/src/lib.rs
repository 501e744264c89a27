#![forbid(unsafe_code)]

pub mod app_services;
pub mod challenge_registry;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod progress_store;
pub mod sessions;

pub use app_services::AppServices;
pub use challenge_registry::{ChallengeRegistry, ChallengeSource, LoadReport, UrlSource};
pub use collaborators::{
    Editor, Modal, Notifier, Presenter, ProgressIndicator, RenderRequest, Renderer, Severity,
};
pub use config::{CatalogConfig, SessionConfig};
pub use error::{AppServicesError, LoadError, ProgressError, SessionError};
pub use progress_store::{ProgressRecord, ProgressStore};
pub use sessions::{
    SessionController, SessionDelta, SessionEvent, SessionIntent, SessionState,
    SubmissionOutcome, run_session,
};
