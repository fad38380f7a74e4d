//! Error types for sugerir operations.
//!
//! Provides rich error context for library consumers.

use std::fmt;

/// Main error type for sugerir operations.
///
/// Distinguishes fatal pipeline errors (missing source tables, empty
/// corpora) from conditions that callers recover from locally (an
/// unresolved query title).
///
/// # Examples
///
/// ```
/// use sugerir::error::SugerirError;
///
/// let err = SugerirError::DataLoad {
///     message: "missing column 'Title'".to_string(),
/// };
/// assert!(err.to_string().contains("missing column"));
/// ```
#[derive(Debug)]
pub enum SugerirError {
    /// Required source table or column is missing or unreadable.
    DataLoad {
        /// What failed to load
        message: String,
    },

    /// Vectorization cannot proceed (empty corpus, degenerate vocabulary).
    Vectorization {
        /// Why fitting failed
        message: String,
    },

    /// Query title absent from the corpus.
    ///
    /// Recovered locally by the recommender (empty result list); surfaced
    /// only when a caller asks for strict resolution.
    TitleNotFound {
        /// The unresolved title
        title: String,
    },

    /// Invalid configuration value provided.
    InvalidParameter {
        /// Parameter name
        param: String,
        /// Provided value
        value: String,
        /// Constraint description
        constraint: String,
    },

    /// I/O error (file not found, permission denied, etc.).
    Io(std::io::Error),

    /// Serialization/deserialization error.
    Serialization(String),

    /// Generic error with string message.
    Other(String),
}

impl fmt::Display for SugerirError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SugerirError::DataLoad { message } => {
                write!(f, "Data load failed: {message}")
            }
            SugerirError::Vectorization { message } => {
                write!(f, "Vectorization failed: {message}")
            }
            SugerirError::TitleNotFound { title } => {
                write!(f, "Title not found in corpus: '{title}'")
            }
            SugerirError::InvalidParameter {
                param,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter: {param} = {value}, expected {constraint}"
                )
            }
            SugerirError::Io(e) => write!(f, "I/O error: {e}"),
            SugerirError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            SugerirError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SugerirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SugerirError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SugerirError {
    fn from(err: std::io::Error) -> Self {
        SugerirError::Io(err)
    }
}

impl From<&str> for SugerirError {
    fn from(msg: &str) -> Self {
        SugerirError::Other(msg.to_string())
    }
}

impl From<String> for SugerirError {
    fn from(msg: String) -> Self {
        SugerirError::Other(msg)
    }
}

impl SugerirError {
    /// Create a data-load error with descriptive context.
    #[must_use]
    pub fn data_load(message: impl Into<String>) -> Self {
        Self::DataLoad {
            message: message.into(),
        }
    }

    /// Create a vectorization error.
    #[must_use]
    pub fn vectorization(message: impl Into<String>) -> Self {
        Self::Vectorization {
            message: message.into(),
        }
    }

    /// Create a title-not-found error.
    #[must_use]
    pub fn title_not_found(title: impl Into<String>) -> Self {
        Self::TitleNotFound {
            title: title.into(),
        }
    }

    /// Create an invalid-parameter error.
    #[must_use]
    pub fn invalid_parameter(param: &str, value: impl fmt::Display, constraint: &str) -> Self {
        Self::InvalidParameter {
            param: param.to_string(),
            value: value.to_string(),
            constraint: constraint.to_string(),
        }
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, SugerirError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_load_display() {
        let err = SugerirError::data_load("books.csv: missing column 'Title'");
        assert!(err.to_string().contains("Data load failed"));
        assert!(err.to_string().contains("books.csv"));
    }

    #[test]
    fn test_vectorization_display() {
        let err = SugerirError::vectorization("empty corpus");
        assert!(err.to_string().contains("Vectorization failed"));
        assert!(err.to_string().contains("empty corpus"));
    }

    #[test]
    fn test_title_not_found_display() {
        let err = SugerirError::title_not_found("Despicable Me 4");
        assert!(err.to_string().contains("Title not found"));
        assert!(err.to_string().contains("Despicable Me 4"));
    }

    #[test]
    fn test_invalid_parameter_display() {
        let err = SugerirError::invalid_parameter("test_size", 1.5, "0 < test_size < 1");
        assert!(err.to_string().contains("Invalid parameter"));
        assert!(err.to_string().contains("test_size"));
        assert!(err.to_string().contains("1.5"));
    }

    #[test]
    fn test_from_str() {
        let err: SugerirError = "plain message".into();
        assert!(matches!(err, SugerirError::Other(_)));
        assert_eq!(err.to_string(), "plain message");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SugerirError = io_err.into();
        assert!(matches!(err, SugerirError::Io(_)));
    }

    #[test]
    fn test_error_source_io() {
        use std::error::Error;
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SugerirError::Io(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_error_source_other() {
        use std::error::Error;
        let err = SugerirError::Other("test".to_string());
        assert!(err.source().is_none());
    }
}
