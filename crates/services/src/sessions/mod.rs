mod controller;
mod debounce;
mod driver;
mod events;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{GENERIC_CHECK_FAILURE, SessionController, SessionState};
pub use debounce::Debouncer;
pub use driver::{SessionIntent, error_delta, run_session};
pub use events::{SessionDelta, SessionEvent, SubmissionOutcome};
