use thiserror::Error;

/// Raised by the tree builder when the input cannot be read as XML.
///
/// The walker never lets this escape: it logs it and returns whatever
/// fields were populated before the failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed XML at byte {position}: {message}")]
pub struct MalformedDocument {
    /// Byte offset into the input where reading stopped.
    pub position: u64,
    pub message: String,
}

/// Errors surfaced by the client.
#[derive(Debug, Error)]
pub enum PicasaError {
    /// The document could not be parsed as XML at all.
    #[error(transparent)]
    MalformedDocument(#[from] MalformedDocument),

    /// No resolver rule matched the category markers of a parsed feed.
    #[error("Unknown feed type\n feed:  {}\n entry: {}", .feed.as_deref().unwrap_or(""), .entry.as_deref().unwrap_or(""))]
    UnknownFeedType {
        feed: Option<String>,
        entry: Option<String>,
    },

    /// A request option is outside its allowed set. Raised before any request.
    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    /// The token source failed to produce credentials.
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// A lazy accessor needed a session and none was reachable.
    #[error("No session is attached to this record")]
    NoSession,

    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Response body exceeded the configured size limit
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
}

impl PicasaError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<String>) -> Self {
        PicasaError::InvalidParameter {
            name,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_feed_type_names_both_schemes() {
        let err = PicasaError::UnknownFeedType {
            feed: Some("http://schemas.google.com/photos/2007#comment".to_string()),
            entry: None,
        };
        let msg = err.to_string();
        assert!(msg.contains("Unknown feed type"));
        assert!(msg.contains("2007#comment"));
        assert!(msg.contains("entry: "));
    }

    #[test]
    fn test_malformed_document_converts() {
        let err: PicasaError = MalformedDocument {
            position: 12,
            message: "unexpected end".to_string(),
        }
        .into();
        assert!(matches!(err, PicasaError::MalformedDocument(_)));
        assert!(err.to_string().contains("byte 12"));
    }
}
