use super::LlmError;

/// Substrings that mark an otherwise successful-looking response as a failure.
///
/// The upstream service reports some errors in-band, either with the Thai
/// "system has a problem" notice or with an English `Error` prefix.
pub const SENTINEL_MARKERS: [&str; 2] = ["ระบบมีปัญหา", "Error"];

/// Outcome of a single backend call, after classification
#[derive(Debug)]
pub enum BackendReply {
    /// Usable text returned by the backend
    Success(String),
    /// The call did not produce a usable answer
    Failure(FailureReason),
}

/// Why a backend call was classified as a failure
#[derive(Debug)]
pub enum FailureReason {
    /// Response text contained one of [`SENTINEL_MARKERS`]
    Sentinel(&'static str),
    /// The provider returned a structured error
    Backend(LlmError),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sentinel(marker) => write!(f, "response contained error marker {marker:?}"),
            Self::Backend(e) => write!(f, "{e}"),
        }
    }
}

impl BackendReply {
    /// Returns `true` for [`BackendReply::Success`]
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Classifies a raw provider result into a [`BackendReply`].
///
/// # Examples
///
/// ```
/// use relay_translator::llm::{classify, BackendReply};
///
/// assert!(classify(Ok("สวัสดี".to_string())).is_success());
/// assert!(!classify(Ok("Error: upstream timeout".to_string())).is_success());
/// ```
#[must_use]
pub fn classify(raw: Result<String, LlmError>) -> BackendReply {
    match raw {
        Ok(text) => match SENTINEL_MARKERS.iter().copied().find(|m| text.contains(*m)) {
            Some(marker) => BackendReply::Failure(FailureReason::Sentinel(marker)),
            None => BackendReply::Success(text),
        },
        Err(e) => BackendReply::Failure(FailureReason::Backend(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_success() {
        match classify(Ok("สวัสดี".to_string())) {
            BackendReply::Success(text) => assert_eq!(text, "สวัสดี"),
            BackendReply::Failure(reason) => panic!("unexpected failure: {reason}"),
        }
    }

    #[test]
    fn test_thai_sentinel_is_failure() {
        let reply = classify(Ok("ขออภัย ระบบมีปัญหา กรุณาลองใหม่".to_string()));
        assert!(matches!(
            reply,
            BackendReply::Failure(FailureReason::Sentinel("ระบบมีปัญหา"))
        ));
    }

    #[test]
    fn test_english_sentinel_is_case_sensitive() {
        assert!(!classify(Ok("Error 502".to_string())).is_success());
        // Lowercase "error" is ordinary text
        assert!(classify(Ok("no error here".to_string())).is_success());
    }

    #[test]
    fn test_provider_error_is_failure() {
        let reply = classify(Err(LlmError::NetworkError("reset".to_string())));
        assert!(matches!(
            reply,
            BackendReply::Failure(FailureReason::Backend(LlmError::NetworkError(_)))
        ));
    }
}
