//! Error types for SBOM ingestion.
//!
//! Every fallible operation in this crate returns [`Error`]. The
//! [`Error::DoesNotProvide`] variant is special: it means the input is not a
//! syft JSON SBOM at all, and callers are expected to fall back to another
//! input strategy rather than report a failure.

use std::path::PathBuf;
use thiserror::Error;

use crate::cpe::CpeError;
use crate::distro::DistroError;

/// Main error type for decoding a syft JSON document.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The input could not be resolved to a syft JSON document.
    #[error("input does not provide a syft JSON SBOM")]
    DoesNotProvide,

    /// An explicitly requested SBOM (`sbom:<path>`) could not be opened.
    #[error("unable to use specified SBOM {path:?}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input stream failed while the document was being read.
    #[error("failed to read SBOM input")]
    Read(#[source] std::io::Error),

    /// An artifact's fields do not match the shape its type claims.
    #[error("failed to decode artifact {index} ({name:?})")]
    Artifact {
        index: usize,
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// An artifact carries a CPE string that failed validation.
    #[error("invalid CPE on artifact {index} ({name:?})")]
    Cpe {
        index: usize,
        name: String,
        #[source]
        source: CpeError,
    },

    /// The declared distro could not be constructed.
    #[error("unable to construct distro")]
    Distro(#[from] DistroError),
}

impl Error {
    /// Returns true if the caller should try a different input strategy.
    pub fn is_does_not_provide(&self) -> bool {
        matches!(self, Error::DoesNotProvide)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_does_not_provide_is_distinguished() {
        assert!(Error::DoesNotProvide.is_does_not_provide());

        let err = Error::Distro(DistroError::UnknownType("plan9".to_string()));
        assert!(!err.is_does_not_provide());
    }

    #[test]
    fn test_cpe_error_keeps_source() {
        let err = Error::Cpe {
            index: 3,
            name: "openssl".to_string(),
            source: CpeError::InvalidPrefix("nope".to_string()),
        };

        assert_eq!(err.to_string(), "invalid CPE on artifact 3 (\"openssl\")");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_read_error_is_not_a_fallback() {
        let err = Error::Read(std::io::Error::new(
            std::io::ErrorKind::TimedOut,
            "stream stalled",
        ));

        assert!(!err.is_does_not_provide());
        assert!(err.source().is_some());
    }
}
