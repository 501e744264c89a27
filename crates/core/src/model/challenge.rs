use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{ChallengeId, ParseIdError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChallengeError {
    #[error("challenge id cannot be empty")]
    EmptyId,

    #[error(transparent)]
    InvalidId(#[from] ParseIdError),

    #[error("challenge {id} has an empty title")]
    EmptyTitle { id: ChallengeId },
}

//
// ─── SOURCE DOCUMENT ───────────────────────────────────────────────────────────
//

/// On-disk shape of one challenge definition.
///
/// Field names follow the published challenge files, so `code` holds the
/// starter code shown in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChallengeDocument {
    pub id: String,
    pub title: String,
    pub description: String,
    pub code: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub hint: String,
}

impl ChallengeDocument {
    /// Validate the document into an immutable `Challenge`.
    ///
    /// # Errors
    ///
    /// Returns `ChallengeError` if the id is blank or contains whitespace, or
    /// if the title is blank.
    pub fn validate(self) -> Result<Challenge, ChallengeError> {
        if self.id.trim().is_empty() {
            return Err(ChallengeError::EmptyId);
        }
        let id: ChallengeId = self.id.parse()?;
        if self.title.trim().is_empty() {
            return Err(ChallengeError::EmptyTitle { id });
        }

        Ok(Challenge {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            starter_code: self.code,
            solution: self.solution,
            hint: self.hint.trim().to_string(),
        })
    }
}

//
// ─── CHALLENGE ─────────────────────────────────────────────────────────────────
//

/// One exercise of the tutorial. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    id: ChallengeId,
    title: String,
    description: String,
    starter_code: String,
    solution: String,
    hint: String,
}

impl Challenge {
    pub(crate) fn from_parts(
        id: &str,
        title: &str,
        description: &str,
        starter_code: &str,
        solution: &str,
        hint: &str,
    ) -> Self {
        Self {
            id: ChallengeId::new(id),
            title: title.to_string(),
            description: description.to_string(),
            starter_code: starter_code.to_string(),
            solution: solution.to_string(),
            hint: hint.to_string(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &ChallengeId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title without the leading "Challenge N: " numbering.
    #[must_use]
    pub fn short_title(&self) -> &str {
        let Some(rest) = self.title.strip_prefix("Challenge ") else {
            return &self.title;
        };
        let digits = rest.chars().take_while(char::is_ascii_digit).count();
        if digits == 0 {
            return &self.title;
        }
        rest[digits..].strip_prefix(": ").unwrap_or(&self.title)
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn starter_code(&self) -> &str {
        &self.starter_code
    }

    /// Reference answer. Informational only; grading never consults it.
    #[must_use]
    pub fn solution(&self) -> &str {
        &self.solution
    }

    #[must_use]
    pub fn hint(&self) -> &str {
        &self.hint
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, title: &str) -> ChallengeDocument {
        ChallengeDocument {
            id: id.to_string(),
            title: title.to_string(),
            description: "  describe  ".to_string(),
            code: "const x = 1;\n".to_string(),
            solution: String::new(),
            hint: "hint".to_string(),
        }
    }

    #[test]
    fn document_validates_into_challenge() {
        let challenge = doc(" connect ", "Challenge 1: Connect").validate().unwrap();
        assert_eq!(challenge.id().as_str(), "connect");
        assert_eq!(challenge.description(), "describe");
        assert_eq!(challenge.starter_code(), "const x = 1;\n");
    }

    #[test]
    fn document_rejects_blank_id() {
        let err = doc("  ", "Title").validate().unwrap_err();
        assert_eq!(err, ChallengeError::EmptyId);
    }

    #[test]
    fn document_rejects_id_with_inner_whitespace() {
        let err = doc("send xrp", "Title").validate().unwrap_err();
        assert!(matches!(err, ChallengeError::InvalidId(_)));
    }

    #[test]
    fn document_rejects_blank_title() {
        let err = doc("wallet", " ").validate().unwrap_err();
        assert!(matches!(err, ChallengeError::EmptyTitle { .. }));
    }

    #[test]
    fn document_rejects_unknown_fields() {
        let json = r#"{"id":"a","title":"b","description":"c","code":"d","extra":1}"#;
        assert!(serde_json::from_str::<ChallengeDocument>(json).is_err());
    }

    #[test]
    fn short_title_strips_numbering() {
        let challenge = doc("escrow", "Challenge 5: Create an Escrow")
            .validate()
            .unwrap();
        assert_eq!(challenge.short_title(), "Create an Escrow");

        let plain = doc("escrow", "Create an Escrow").validate().unwrap();
        assert_eq!(plain.short_title(), "Create an Escrow");
    }
}
