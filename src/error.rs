use thiserror::Error;

/// Failure of a single call against the reply backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode {endpoint} response: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn endpoint(&self) -> &str {
        match self {
            ApiError::Http { endpoint, .. }
            | ApiError::Status { endpoint, .. }
            | ApiError::Decode { endpoint, .. } => endpoint,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The user-facing feature a failed call belongs to.
///
/// Every failure inside one area collapses to the same banner text; the
/// underlying [`ApiError`] only goes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureArea {
    Load,
    Generate,
    Send,
    Feedback,
    Save,
    Simulate,
}

impl FeatureArea {
    pub fn user_message(&self) -> &'static str {
        match self {
            FeatureArea::Load => "Failed to load data. Please try again.",
            FeatureArea::Generate => "Failed to generate reply. Please try again.",
            FeatureArea::Send => "Failed to send reply. Please try again.",
            FeatureArea::Feedback => "Failed to submit feedback.",
            FeatureArea::Save => "Failed to save settings. Please try again.",
            FeatureArea::Simulate => "Failed to simulate a new post.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            endpoint: "/tweets".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
            body: "{\"error\":\"Tweet not found\"}".to_string(),
        };
        assert_eq!(err.endpoint(), "/tweets");
        assert!(err.to_string().starts_with("/tweets returned 404"));
    }

    #[test]
    fn test_decode_error_keeps_endpoint() {
        let source = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err = ApiError::Decode {
            endpoint: "/replies".to_string(),
            source,
        };
        assert_eq!(err.endpoint(), "/replies");
    }

    #[test]
    fn test_each_area_has_its_own_message() {
        let areas = [
            FeatureArea::Load,
            FeatureArea::Generate,
            FeatureArea::Send,
            FeatureArea::Feedback,
            FeatureArea::Save,
            FeatureArea::Simulate,
        ];
        for (i, a) in areas.iter().enumerate() {
            for b in &areas[i + 1..] {
                assert_ne!(a.user_message(), b.user_message());
            }
        }
    }
}
