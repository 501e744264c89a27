mod challenge;
mod dialog;
mod ids;

pub use ids::{ChallengeId, ParseIdError};

pub use challenge::{Challenge, ChallengeDocument, ChallengeError};
pub use dialog::{CompletionDialog, Continuation};
