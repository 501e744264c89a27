use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result, bail};
use clap::Parser;
use services::sessions::{SessionIntent, error_delta, run_session};
use services::{
    AppServices, CatalogConfig, Presenter, SessionConfig, SessionController, SessionDelta,
    SessionError,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

mod cli;
mod terminal;

use cli::{Cli, Command};

fn normalize_sqlite_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<()> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .with_context(|| format!("invalid --db value: {db_url}"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        bail!("invalid --db value: {db_url}");
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
    }
    Ok(())
}

fn catalog_config(cli: &Cli) -> Result<CatalogConfig> {
    let config = match &cli.challenges_url {
        Some(raw) => {
            let base = Url::parse(raw).with_context(|| format!("invalid --challenges-url {raw}"))?;
            CatalogConfig::from_base_url(&base)?
        }
        None => CatalogConfig::from_dir(&cli.challenges_dir)?,
    };
    Ok(config)
}

fn print_status(session: &SessionController) {
    let registry = session.registry();
    let active = session.active_index();
    for (index, challenge) in registry.all().iter().enumerate() {
        let done = if session.completed().contains(challenge.id()) {
            "x"
        } else {
            " "
        };
        let marker = if active == Some(index) { ">" } else { " " };
        println!("{marker} [{done}] {}", challenge.title());
    }
    let completed = registry
        .all()
        .iter()
        .filter(|challenge| session.completed().contains(challenge.id()))
        .count();
    println!();
    println!("{completed}/{} completed", registry.len());
    println!(
        "Theme: {}",
        if session.dark_mode() { "dark" } else { "light" }
    );
    if registry.report().is_fallback() {
        println!("(using built-in challenges)");
    }
}

async fn read_code(file: &Path) -> Result<String> {
    tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))
}

async fn modified_at(file: &Path) -> Option<SystemTime> {
    tokio::fs::metadata(file).await.ok()?.modified().ok()
}

/// Feed the file's contents to the session whenever its modification time changes.
async fn poll_file(file: PathBuf, interval: Duration, intents: mpsc::Sender<SessionIntent>) {
    let mut last_seen = modified_at(&file).await;
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        let current = modified_at(&file).await;
        if current.is_none() || current == last_seen {
            continue;
        }
        last_seen = current;
        match tokio::fs::read_to_string(&file).await {
            Ok(text) => {
                debug!(file = %file.display(), "file changed");
                if intents.send(SessionIntent::CodeEdited(text)).await.is_err() {
                    break;
                }
            }
            Err(err) => warn!(file = %file.display(), error = %err, "failed to read watched file"),
        }
    }
}

async fn watch(
    session: &mut SessionController,
    presenter: &mut Presenter,
    file: PathBuf,
    poll: Duration,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(32);
    tx.send(SessionIntent::ToggleAutoCheck).await?;
    let code = read_code(&file).await?;
    tx.send(SessionIntent::CodeEdited(code)).await?;

    let poller = tokio::spawn(poll_file(file, poll, tx.clone()));
    let quit = tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = quit.send(SessionIntent::Quit).await;
        }
    });
    drop(tx);

    println!("Watching for changes, press Ctrl-C to stop");
    run_session(session, &mut rx, presenter).await;
    poller.abort();
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let db_url = normalize_sqlite_url(&cli.db_url);
    prepare_sqlite_file(&db_url)?;
    let catalog = catalog_config(&cli)?;
    let session_config = SessionConfig::new(Duration::from_millis(cli.debounce_ms));

    let services = AppServices::new_sqlite(&db_url, &catalog, session_config)
        .await
        .with_context(|| format!("failed to open {db_url}"))?;
    let mut session = services.session();
    let booted = session.boot().await?;
    info!(db = %db_url, "session ready");

    let command = cli.command.unwrap_or(Command::Status);
    let show_code = matches!(
        command,
        Command::Show | Command::ResetCode | Command::Goto { .. } | Command::Next | Command::Prev
    );
    let mut presenter = terminal::presenter(show_code);

    let outcome = match command {
        Command::Status => {
            print_status(&session);
            return Ok(());
        }
        Command::Show => Ok(booted),
        Command::Goto { number } => match number.checked_sub(1) {
            Some(index) => session.load_challenge(index).await,
            None => bail!("challenge numbers start at 1"),
        },
        Command::Next => session.next().await,
        Command::Prev => session.previous().await,
        Command::Submit { file, stay } => {
            let code = read_code(&file).await?;
            let mut delta = session.on_code_edited(&code).await?;
            delta.extend(session.submit(&code).await?);
            presenter.dispatch(&delta);
            if !stay && delta.dialog().is_some() {
                session.continue_from_dialog().await
            } else {
                return Ok(());
            }
        }
        Command::Edit { file } => {
            let code = read_code(&file).await?;
            let delta = session.on_code_edited(&code).await;
            if delta.is_ok() {
                println!("Saved {}", file.display());
            }
            delta
        }
        Command::ResetCode => session.reset_code().await,
        Command::Theme => Ok(session.toggle_dark_mode().await),
        Command::Reset => session.reset_progress().await,
        Command::Watch { file, poll_ms } => {
            presenter.dispatch(&booted);
            return watch(
                &mut session,
                &mut presenter,
                file,
                Duration::from_millis(poll_ms),
            )
            .await;
        }
    };

    present(&mut presenter, outcome)
}

/// Show a command's outcome; a rejected command becomes the process error.
fn present(presenter: &mut Presenter, outcome: Result<SessionDelta, SessionError>) -> Result<()> {
    match outcome {
        Ok(delta) => {
            presenter.dispatch(&delta);
            Ok(())
        }
        Err(err) => {
            presenter.dispatch(&error_delta(&err));
            Err(err.into())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_urls_pass_through() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/tutor.sqlite3"),
            "sqlite:///tmp/tutor.sqlite3"
        );
    }

    #[test]
    fn bare_paths_become_absolute_urls() {
        assert_eq!(
            normalize_sqlite_url("/var/lib/tutor.sqlite3"),
            "sqlite:///var/lib/tutor.sqlite3"
        );
        assert!(normalize_sqlite_url("sqlite:tutor.sqlite3").starts_with("sqlite:///"));
    }

    #[test]
    fn rejected_command_is_returned_as_error() {
        let mut presenter = terminal::presenter(false);
        let err = present(&mut presenter, Err(SessionError::BeforeFirst)).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SessionError>(),
            Some(&SessionError::BeforeFirst)
        );
        assert!(present(&mut presenter, Ok(SessionDelta::default())).is_ok());
    }

    #[test]
    fn memory_database_needs_no_file() {
        assert!(prepare_sqlite_file("sqlite::memory:").is_ok());
        assert!(prepare_sqlite_file("postgres://nope").is_err());
    }
}
