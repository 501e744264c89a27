use crate::model::challenge::Challenge;

/// What the completion dialog's primary button does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Load the challenge at this index.
    Advance(usize),
    /// Last challenge, but others are still open: the button only closes.
    Close,
    /// Everything is complete; the button is disabled.
    Terminal,
}

impl Continuation {
    #[must_use]
    pub fn is_enabled(self) -> bool {
        !matches!(self, Continuation::Terminal)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Continuation::Advance(_) => "Next Challenge",
            Continuation::Close | Continuation::Terminal => "All Completed!",
        }
    }
}

/// Content of the dialog shown after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionDialog {
    pub title: String,
    pub index: usize,
    pub total: usize,
    pub message: String,
    pub aggregate_complete: bool,
    pub continuation: Continuation,
}

impl CompletionDialog {
    /// Build the dialog for `challenge` at `index` once it has been marked complete.
    ///
    /// The aggregate variant is only used when the last challenge was just
    /// solved and every challenge in the catalog is complete.
    #[must_use]
    pub fn for_completion(
        challenge: &Challenge,
        index: usize,
        total: usize,
        completed_count: usize,
    ) -> Self {
        let is_last = index + 1 >= total;
        let aggregate_complete = is_last && completed_count == total;

        let mut message = format!(
            "You've successfully completed Challenge {}: {}",
            index + 1,
            challenge.short_title()
        );
        if aggregate_complete {
            message.push_str(&format!(
                "\n\nCongratulations! You've completed all {total} challenges!"
            ));
        }

        let continuation = if aggregate_complete {
            Continuation::Terminal
        } else if is_last {
            Continuation::Close
        } else {
            Continuation::Advance(index + 1)
        };

        Self {
            title: challenge.title().to_string(),
            index,
            total,
            message,
            aggregate_complete,
            continuation,
        }
    }
}
