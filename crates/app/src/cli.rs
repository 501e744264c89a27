use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Work through the XRP Ledger TestNet challenges from the terminal.
#[derive(Debug, Parser)]
#[command(name = "ledger-tutor", version)]
pub struct Cli {
    /// SQLite database holding learner progress
    #[arg(
        long = "db",
        env = "TUTOR_DB_URL",
        global = true,
        default_value = "sqlite://tutor.sqlite3"
    )]
    pub db_url: String,

    /// Directory containing challenge-1.json .. challenge-5.json
    #[arg(
        long = "challenges",
        env = "TUTOR_CHALLENGES_DIR",
        global = true,
        default_value = "challenges"
    )]
    pub challenges_dir: PathBuf,

    /// Base URL to fetch the challenge files from instead of a directory
    #[arg(long = "challenges-url", env = "TUTOR_CHALLENGES_URL", global = true)]
    pub challenges_url: Option<String>,

    /// Quiet period in milliseconds before an auto-check runs
    #[arg(long, global = true, default_value_t = 500)]
    pub debounce_ms: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List every challenge with its completion state
    Status,
    /// Show the active challenge
    Show,
    /// Make challenge N (1-based) active
    Goto {
        #[arg(value_name = "N")]
        number: usize,
    },
    /// Move to the next challenge
    Next,
    /// Move to the previous challenge
    Prev,
    /// Check a file against the active challenge
    Submit {
        file: PathBuf,
        /// Stay on this challenge after it passes
        #[arg(long)]
        stay: bool,
    },
    /// Save a file as the active challenge's code without checking it
    Edit { file: PathBuf },
    /// Restore the active challenge's starter code
    ResetCode,
    /// Toggle between dark and light mode
    Theme,
    /// Forget all progress (theme is kept)
    Reset,
    /// Check a file automatically each time it changes
    Watch {
        file: PathBuf,
        /// Polling interval in milliseconds
        #[arg(long, default_value_t = 250)]
        poll_ms: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn goto_takes_a_one_based_number() {
        let cli = Cli::try_parse_from(["ledger-tutor", "goto", "3"]).unwrap();
        assert_eq!(cli.command, Some(Command::Goto { number: 3 }));
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli =
            Cli::try_parse_from(["ledger-tutor", "submit", "code.js", "--db", "sqlite::memory:"])
                .unwrap();
        assert_eq!(cli.db_url, "sqlite::memory:");
        assert_eq!(
            cli.command,
            Some(Command::Submit {
                file: PathBuf::from("code.js"),
                stay: false
            })
        );
    }
}
