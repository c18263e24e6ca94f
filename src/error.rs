//! Top-level error type.

use crate::config::ConfigError;
use crate::sources::SourceError;
use crate::title::TitleError;

/// Any failure that ends a run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Title(#[from] TitleError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_is_transparent() {
        let err: Error = SourceError::Status {
            provider: "DBLP".to_string(),
            code: "500".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "DBLP search did not complete successfully (status 500)");

        let err: Error = TitleError::NotFound(PathBuf::from("x.pdf")).into();
        assert!(matches!(err, Error::Title(_)));
    }
}
