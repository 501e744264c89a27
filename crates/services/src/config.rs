use std::path::Path;
use std::time::Duration;

use url::Url;

use crate::error::LoadError;

/// Challenge files shipped with the tutorial, in order.
pub const DEFAULT_CHALLENGE_FILES: [&str; 5] = [
    "challenge-1.json",
    "challenge-2.json",
    "challenge-3.json",
    "challenge-4.json",
    "challenge-5.json",
];

/// Quiet period after the last edit before an auto-check runs.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Runtime knobs for a tutorial session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    debounce: Duration,
}

impl SessionConfig {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self { debounce }
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        self.debounce
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Ordered list of challenge document locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    locations: Vec<Url>,
}

impl CatalogConfig {
    #[must_use]
    pub fn new(locations: Vec<Url>) -> Self {
        Self { locations }
    }

    /// The default challenge files inside a local directory.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::UnsupportedLocation` if the directory cannot be
    /// expressed as a `file://` URL.
    pub fn from_dir(dir: &Path) -> Result<Self, LoadError> {
        let dir = std::path::absolute(dir)
            .map_err(|_| LoadError::UnsupportedLocation(dir.display().to_string()))?;
        let locations = DEFAULT_CHALLENGE_FILES
            .iter()
            .map(|name| {
                let path = dir.join(name);
                Url::from_file_path(&path)
                    .map_err(|()| LoadError::UnsupportedLocation(path.display().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { locations })
    }

    /// The default challenge files under a remote base URL.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::UnsupportedLocation` if a file name cannot be joined
    /// onto `base`.
    pub fn from_base_url(base: &Url) -> Result<Self, LoadError> {
        let base = if base.path().ends_with('/') {
            base.clone()
        } else {
            let mut with_slash = base.clone();
            with_slash.set_path(&format!("{}/", base.path()));
            with_slash
        };
        let locations = DEFAULT_CHALLENGE_FILES
            .iter()
            .map(|name| {
                base.join(name)
                    .map_err(|err| LoadError::UnsupportedLocation(format!("{base}{name}: {err}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { locations })
    }

    #[must_use]
    pub fn locations(&self) -> &[Url] {
        &self.locations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_debounce_is_half_a_second() {
        assert_eq!(SessionConfig::default().debounce(), Duration::from_millis(500));
    }

    #[test]
    fn from_dir_builds_ordered_file_urls() {
        let config = CatalogConfig::from_dir(Path::new("/srv/tutor/challenges")).unwrap();
        let urls: Vec<&str> = config.locations().iter().map(Url::as_str).collect();
        assert_eq!(urls.len(), 5);
        assert_eq!(urls[0], "file:///srv/tutor/challenges/challenge-1.json");
        assert_eq!(urls[4], "file:///srv/tutor/challenges/challenge-5.json");
    }

    #[test]
    fn from_base_url_appends_missing_slash() {
        let base = Url::parse("https://example.com/tutor/challenges").unwrap();
        let config = CatalogConfig::from_base_url(&base).unwrap();
        assert_eq!(
            config.locations()[1].as_str(),
            "https://example.com/tutor/challenges/challenge-2.json"
        );
    }
}
