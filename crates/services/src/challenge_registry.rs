use std::collections::HashSet;

use async_trait::async_trait;
use futures::future::try_join_all;
use tracing::{debug, info, warn};
use tutor_core::catalog::builtin_challenges;
use tutor_core::model::{Challenge, ChallengeDocument};
use url::Url;

use crate::error::LoadError;

/// Fetches the raw text of one challenge document.
#[async_trait]
pub trait ChallengeSource: Send + Sync {
    /// Return the document stored at `location`.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the document cannot be read.
    async fn fetch(&self, location: &Url) -> Result<String, LoadError>;
}

/// Reads `file://` locations from disk and `http(s)://` locations over HTTP.
#[derive(Clone, Default)]
pub struct UrlSource {
    client: reqwest::Client,
}

impl UrlSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn fetch_error(location: &Url, reason: impl ToString) -> LoadError {
    LoadError::Fetch {
        location: location.to_string(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl ChallengeSource for UrlSource {
    async fn fetch(&self, location: &Url) -> Result<String, LoadError> {
        match location.scheme() {
            "file" => {
                let path = location
                    .to_file_path()
                    .map_err(|()| LoadError::UnsupportedLocation(location.to_string()))?;
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|err| fetch_error(location, err))
            }
            "http" | "https" => {
                let response = self
                    .client
                    .get(location.clone())
                    .send()
                    .await
                    .map_err(|err| fetch_error(location, err))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(fetch_error(location, format!("status {status}")));
                }
                response.text().await.map_err(|err| fetch_error(location, err))
            }
            _ => Err(LoadError::UnsupportedLocation(location.to_string())),
        }
    }
}

/// How the catalog held by a registry was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadReport {
    /// Every configured document loaded.
    Loaded { count: usize },
    /// The embedded catalog was substituted.
    Fallback { reason: String },
}

impl LoadReport {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadReport::Fallback { .. })
    }
}

/// Ordered, immutable challenge catalog.
#[derive(Debug, Clone)]
pub struct ChallengeRegistry {
    challenges: Vec<Challenge>,
    report: LoadReport,
}

impl ChallengeRegistry {
    /// Wrap an already loaded catalog.
    #[must_use]
    pub fn from_challenges(challenges: Vec<Challenge>) -> Self {
        let count = challenges.len();
        Self {
            challenges,
            report: LoadReport::Loaded { count },
        }
    }

    /// The embedded catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_challenges(builtin_challenges())
    }

    /// Load every document in `locations`, or fall back to the embedded catalog.
    ///
    /// The load is all-or-nothing: a single failed fetch, parse, or validation
    /// discards everything fetched so far.
    pub async fn load(source: &dyn ChallengeSource, locations: &[Url]) -> Self {
        match Self::try_load(source, locations).await {
            Ok(challenges) => {
                info!(count = challenges.len(), "loaded challenge catalog");
                Self::from_challenges(challenges)
            }
            Err(err) => {
                warn!(error = %err, "falling back to built-in challenges");
                Self {
                    challenges: builtin_challenges(),
                    report: LoadReport::Fallback {
                        reason: err.to_string(),
                    },
                }
            }
        }
    }

    /// Fetch and parse every document concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first `LoadError` encountered; no partial catalog is returned.
    pub async fn try_load(
        source: &dyn ChallengeSource,
        locations: &[Url],
    ) -> Result<Vec<Challenge>, LoadError> {
        if locations.is_empty() {
            return Err(LoadError::NoLocations);
        }

        let challenges = try_join_all(locations.iter().map(|location| async move {
            let text = source.fetch(location).await?;
            debug!(%location, bytes = text.len(), "fetched challenge document");
            parse_document(location, &text)
        }))
        .await?;

        let mut seen = HashSet::with_capacity(challenges.len());
        for challenge in &challenges {
            if !seen.insert(challenge.id().clone()) {
                return Err(LoadError::DuplicateId(challenge.id().clone()));
            }
        }
        Ok(challenges)
    }

    #[must_use]
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    #[must_use]
    pub fn all(&self) -> &[Challenge] {
        &self.challenges
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Challenge> {
        self.challenges.get(index)
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id().as_str() == id)
    }

    #[must_use]
    pub fn get_index(&self, id: &str) -> Option<usize> {
        self.challenges.iter().position(|c| c.id().as_str() == id)
    }
}

fn parse_document(location: &Url, text: &str) -> Result<Challenge, LoadError> {
    let document: ChallengeDocument =
        serde_json::from_str(text).map_err(|source| LoadError::Parse {
            location: location.to_string(),
            source,
        })?;
    document.validate().map_err(|source| LoadError::Invalid {
        location: location.to_string(),
        source,
    })
}
