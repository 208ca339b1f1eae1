use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManifestError>;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Number of --{flag} arguments ({actual}) must match number of --platform arguments ({expected})")]
    ArgumentCountMismatch {
        flag: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid variant '{spec}': {reason}")]
    InvalidVariantSpec { spec: String, reason: String },

    #[error("I/O error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ManifestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_unknown_platform_message() {
        let err = ManifestError::UnknownPlatform("windows-x86_64".to_string());
        assert_eq!(err.to_string(), "Unknown platform: windows-x86_64");
    }

    #[test]
    fn test_count_mismatch_names_flag() {
        let err = ManifestError::ArgumentCountMismatch {
            flag: "library-path",
            expected: 2,
            actual: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("--library-path"));
        assert!(msg.contains("(1)"));
        assert!(msg.contains("(2)"));
    }

    #[test]
    fn test_io_error_keeps_source() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ManifestError::io("out/info.json", source);

        assert!(err.to_string().contains("out/info.json"));
        assert_eq!(err.source().map(|s| s.to_string()), Some("denied".to_string()));
    }
}
