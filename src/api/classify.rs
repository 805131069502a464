//! Turning response status codes into errors.

use crate::core::envelope::{Envelope, is_success};
use crate::error::{Result, WykopError};

/// Per-endpoint status classification.
///
/// Checked in order: an exact match in `reasons` fails with that reason
/// prefixed to the server's error text, a code in `allowed` passes, anything
/// else outside `200..=299` fails with the server's error text alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusPolicy {
    reasons: &'static [(u16, &'static str)],
    allowed: &'static [u16],
}

impl StatusPolicy {
    /// 2xx passes, everything else fails with the server's message.
    pub const GENERIC: Self = Self::new(&[]);

    #[must_use]
    pub const fn new(reasons: &'static [(u16, &'static str)]) -> Self {
        Self {
            reasons,
            allowed: &[],
        }
    }

    /// Codes outside 2xx that should still count as success.
    #[must_use]
    pub const fn allowing(mut self, allowed: &'static [u16]) -> Self {
        self.allowed = allowed;
        self
    }

    #[must_use]
    pub fn reason(&self, status: u16) -> Option<&'static str> {
        self.reasons
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, reason)| *reason)
    }

    /// # Errors
    ///
    /// Returns [`WykopError::Api`] when the envelope's status is classified
    /// as a failure.
    pub fn check(&self, envelope: &Envelope) -> Result<()> {
        let status = envelope.status;
        if let Some(reason) = self.reason(status) {
            return Err(WykopError::api(
                status,
                format!("{reason} {}", envelope.error_text()),
            ));
        }
        if self.allowed.contains(&status) || is_success(status) {
            return Ok(());
        }
        Err(WykopError::api(status, envelope.error_text()))
    }
}

/// Reason texts as published in the service documentation.
pub mod reasons {
    pub const QUERY_TOO_SHORT: &str = "Brak parametru query lub parametr zbyt krótki";
    pub const TAG_TOO_SHORT: &str = "Brak tagu lub tag jest za krótki";
    pub const TAG_EDIT_FORBIDDEN: &str = "Brak uprawnień do usunięcia znaleziska.";
    pub const TAG_MISSING: &str = "Tag nie istnieje";
    pub const TAG_UNAVAILABLE: &str = "Podany tag nie istnieje lub jego dane są niedostępne.";
    pub const PERMISSION_REQUIRED: &str = "Brak wymaganych uprawnień.";
    pub const FORM_INVALID: &str = "Wystąpił błąd podczas walidacji formularza.";

    pub const PAGINATION_LIMIT: &str = "Osiągnięto limit paginacji.";
    pub const BAD_REQUEST: &str = "Gdy użytkownik wykona niepoprawny request.";
    pub const ENTRY_MISSING: &str = "Nie odnaleziono wpisu.";
    pub const ENTRY_EDIT_FORBIDDEN: &str = "Brak uprawnień do modyfikacji wpisu.";
    pub const ENTRY_DELETE_FORBIDDEN: &str = "Brak uprawnień do usunięcia wpisu.";
    pub const ENTRY_ALREADY_VOTED: &str =
        "Użytkownik głosował wcześniej na wpis lub jest jego autorem.";
    pub const ENTRY_NOT_VOTED: &str = "Użytkownik nie głosował wcześniej na wpis.";

    pub const COMMENT_TARGET_MISSING: &str = "Nie odnaleziono znaleziska lub komentarza";
    pub const COMMENT_MISSING: &str = "Nie odnaleziono wpisu lub komentarza.";
    pub const COMMENT_EDIT_FORBIDDEN: &str = "Brak uprawnień do modyfikacji komentarza.";
    pub const COMMENT_DELETE_FORBIDDEN: &str = "Brak uprawnień do usunięcia komentarza.";
    pub const COMMENT_ALREADY_VOTED: &str =
        "Użytkownik głosował wcześniej na komentarz lub jest jego autorem.";
    pub const COMMENT_NOT_VOTED: &str = "Użytkownik nie głosował wcześniej na komentarz.";

    pub const NO_FILE: &str = "Nie załączono pliku.";
    pub const FILE_TOO_LARGE: &str = "Za duży plik.";
    pub const BAD_MIME: &str = "Nieobsługiwane mime type.";
    pub const UPLOAD_RATE_LIMITED: &str = "Za dużo prób dodania zdjęcia w którtkim okresie czasu.";
    pub const PHOTO_DELETE_FORBIDDEN: &str = "Brak uprawnień do usunięcia pliku.";
    pub const PHOTO_MISSING: &str = "Plik nie został odnaleziony lub neleży do innego użytkownika.";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NOT_FOUND: StatusPolicy = StatusPolicy::new(&[(404, "Nie ma.")]);

    fn envelope(status: u16, message: &str) -> Envelope {
        Envelope::from_json(status, json!({"error": {"message": message}}))
    }

    #[test]
    fn reason_table_wins() {
        let err = NOT_FOUND.check(&envelope(404, "gone")).unwrap_err();
        let WykopError::Api { code, message } = err else {
            panic!("expected Api error");
        };
        assert_eq!(code, 404);
        assert!(message.starts_with("Nie ma. {"));
        assert!(message.contains("gone"));
    }

    #[test]
    fn unlisted_failure_uses_server_text() {
        let err = NOT_FOUND.check(&envelope(500, "boom")).unwrap_err();
        assert_eq!(err.status_code(), Some(500));
        assert_eq!(err.to_string(), r#"CODE 500: {"message":"boom"}"#);
    }

    #[test]
    fn success_and_whitelist_pass() {
        assert!(StatusPolicy::GENERIC.check(&Envelope::empty(204)).is_ok());
        let lenient = StatusPolicy::GENERIC.allowing(&[304]);
        assert!(lenient.check(&Envelope::empty(304)).is_ok());
        assert!(StatusPolicy::GENERIC.check(&Envelope::empty(304)).is_err());
    }

    #[test]
    fn reason_is_checked_before_whitelist() {
        let policy = StatusPolicy::new(&[(409, "konflikt")]).allowing(&[409]);
        assert!(policy.check(&Envelope::empty(409)).is_err());
    }
}
