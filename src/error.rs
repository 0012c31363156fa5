use thiserror::Error;

/// Everything that can abort a single crawl pipeline run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Transport failure, timeout or non-success status.
    #[error("failed to fetch {url}{}: {reason}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Fetch {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    /// An expected markup container is gone, i.e. the page layout changed.
    #[error("container not found: {selector}")]
    ContainerNotFound { selector: String },

    /// A mandatory pattern did not match the normalized container text.
    #[error("required field `{field}` missing from text: \"{source_text}\"")]
    RequiredFieldMissing { field: String, source_text: String },

    #[error("not a number: \"{text}\"")]
    NumericFormat { text: String },

    #[error("unknown month name: \"{name}\"")]
    UnknownMonth { name: String },

    #[error("invalid date: {text}")]
    InvalidDate { text: String },

    #[error("invalid selector: {selector}")]
    InvalidSelector { selector: String },

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

/// Fieldless mirror of [`CrawlError`], used to label a failed pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    ContainerNotFound,
    RequiredFieldMissing,
    NumericFormat,
    UnknownMonth,
    InvalidDate,
    InvalidSelector,
    Pattern,
    InvalidConfig,
}

impl CrawlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CrawlError::Fetch { .. } => ErrorKind::Fetch,
            CrawlError::ContainerNotFound { .. } => ErrorKind::ContainerNotFound,
            CrawlError::RequiredFieldMissing { .. } => ErrorKind::RequiredFieldMissing,
            CrawlError::NumericFormat { .. } => ErrorKind::NumericFormat,
            CrawlError::UnknownMonth { .. } => ErrorKind::UnknownMonth,
            CrawlError::InvalidDate { .. } => ErrorKind::InvalidDate,
            CrawlError::InvalidSelector { .. } => ErrorKind::InvalidSelector,
            CrawlError::Pattern(_) => ErrorKind::Pattern,
            CrawlError::InvalidConfig { .. } => ErrorKind::InvalidConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display_includes_status_and_url() {
        let err = CrawlError::Fetch {
            url: "https://example.org/fallzahlen".to_string(),
            status: Some(503),
            reason: "Service Unavailable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.org/fallzahlen"));
        assert!(msg.contains("HTTP 503"));
        assert_eq!(err.kind(), ErrorKind::Fetch);
    }

    #[test]
    fn test_fetch_error_display_without_status() {
        let err = CrawlError::Fetch {
            url: "https://example.org".to_string(),
            status: None,
            reason: "timed out".to_string(),
        };
        assert_eq!(err.to_string(), "failed to fetch https://example.org: timed out");
    }

    #[test]
    fn test_required_field_display_carries_text() {
        let err = CrawlError::RequiredFieldMissing {
            field: "incidence".to_string(),
            source_text: "Neuinfektionen je 100.000".to_string(),
        };
        assert!(err.to_string().contains("Neuinfektionen je 100.000"));
        assert_eq!(err.kind(), ErrorKind::RequiredFieldMissing);
    }
}
