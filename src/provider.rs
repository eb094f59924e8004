//! Input resolution for syft JSON documents.
//!
//! A document can be handed over in three ways, tried in order:
//!
//! 1. An already-open reader supplied by the caller.
//! 2. User input prefixed with `sbom:` (configurable), naming a path that
//!    must open. Failure here is a hard error.
//! 3. Bare user input, tried as a path as a last resort. Failure here yields
//!    [`Error::DoesNotProvide`] so the caller can fall back to another
//!    provider.
//!
//! Paths starting with `~` are expanded against the current user's home
//! directory.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use crate::config::{Config, IgnoreConfig};
use crate::error::{Error, Result};

/// Everything a provider needs to locate and decode a document.
pub struct ProviderConfig {
    pub user_input: String,
    pub reader: Option<Box<dyn Read>>,
    pub explicit_prefix: String,
    pub fallback_to_path: bool,
    pub ignore: IgnoreConfig,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("user_input", &self.user_input)
            .field("reader", &self.reader.as_ref().map(|_| "<reader>"))
            .field("explicit_prefix", &self.explicit_prefix)
            .field("fallback_to_path", &self.fallback_to_path)
            .field("ignore", &self.ignore)
            .finish()
    }
}

impl ProviderConfig {
    /// Creates a config that resolves `user_input` with default settings.
    pub fn new(user_input: impl Into<String>) -> Self {
        let defaults = Config::default();
        Self {
            user_input: user_input.into(),
            reader: None,
            explicit_prefix: defaults.explicit_prefix,
            fallback_to_path: defaults.fallback_to_path,
            ignore: defaults.ignore,
        }
    }

    /// Creates a config that decodes directly from `reader`.
    pub fn from_reader(reader: impl Read + 'static) -> Self {
        let mut config = Self::new(String::new());
        config.reader = Some(Box::new(reader));
        config
    }

    /// Applies the resolution and ignore settings of a loaded [`Config`].
    pub fn with_config(mut self, config: &Config) -> Self {
        self.explicit_prefix = config.explicit_prefix.clone();
        self.fallback_to_path = config.fallback_to_path;
        self.ignore = config.ignore.clone();
        self
    }

    fn explicitly_specifying_sbom(&self) -> Option<&str> {
        if self.explicit_prefix.is_empty() {
            return None;
        }
        self.user_input.strip_prefix(self.explicit_prefix.as_str())
    }
}

/// Resolves the config to a readable document stream.
pub fn resolve(config: ProviderConfig) -> Result<Box<dyn Read>> {
    let explicit = config.explicitly_specifying_sbom().map(str::to_string);

    if let Some(reader) = config.reader {
        tracing::debug!("using caller-supplied reader");
        return Ok(reader);
    }

    if let Some(path) = explicit {
        tracing::debug!(path = %path, "opening explicitly specified SBOM");
        let sbom = open_sbom(&path).map_err(|source| Error::Open {
            path: PathBuf::from(&path),
            source,
        })?;
        return Ok(sbom);
    }

    if config.fallback_to_path && !config.user_input.is_empty() {
        match open_sbom(&config.user_input) {
            Ok(sbom) => {
                tracing::debug!(path = %config.user_input, "user input names an SBOM file");
                return Ok(sbom);
            }
            Err(e) => {
                tracing::trace!(input = %config.user_input, error = %e, "user input is not an SBOM file");
            }
        }
    }

    Err(Error::DoesNotProvide)
}

fn open_sbom(path: &str) -> io::Result<Box<dyn Read>> {
    let expanded = expand_home(path)?;
    let file = File::open(expanded)?;
    Ok(Box::new(BufReader::new(file)))
}

/// Expands a leading `~` or `~/` to the current user's home directory.
///
/// `~otheruser/...` is not supported and fails.
pub fn expand_home(path: &str) -> io::Result<PathBuf> {
    let Some(rest) = path.strip_prefix('~') else {
        return Ok(PathBuf::from(path));
    };

    if !rest.is_empty() && !rest.starts_with('/') && !rest.starts_with('\\') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "cannot expand user-specific home dir",
        ));
    }

    let home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "unable to determine home directory")
    })?;

    let rest = rest.trim_start_matches(['/', '\\']);
    if rest.is_empty() {
        Ok(home)
    } else {
        Ok(home.join(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn read_all(mut reader: Box<dyn Read>) -> String {
        let mut out = String::new();
        reader.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_debug_hides_reader() {
        let config = ProviderConfig::from_reader(Cursor::new(b"{}".to_vec()));
        let debug = format!("{:?}", config);

        assert!(debug.contains("reader: Some(\"<reader>\")"));
        assert!(debug.contains("explicit_prefix: \"sbom:\""));
    }

    #[test]
    fn test_reader_takes_precedence() {
        let mut config = ProviderConfig::from_reader(Cursor::new(b"{}".to_vec()));
        config.user_input = "sbom:/does/not/exist.json".to_string();

        let reader = resolve(config).unwrap();
        assert_eq!(read_all(reader), "{}");
    }

    #[test]
    fn test_explicit_sbom_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"artifacts":[]}}"#).unwrap();

        let input = format!("sbom:{}", file.path().display());
        let reader = resolve(ProviderConfig::new(input)).unwrap();

        assert_eq!(read_all(reader), r#"{"artifacts":[]}"#);
    }

    #[test]
    fn test_explicit_sbom_missing_is_hard_error() {
        let err = resolve(ProviderConfig::new("sbom:/does/not/exist.json"))
            .err()
            .unwrap();

        assert!(matches!(err, Error::Open { .. }));
        assert!(!err.is_does_not_provide());
    }

    #[test]
    fn test_bare_path_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let input = file.path().display().to_string();
        assert!(resolve(ProviderConfig::new(input)).is_ok());
    }

    #[test]
    fn test_bare_input_that_is_not_a_file() {
        let err = resolve(ProviderConfig::new("alpine:3.12")).err().unwrap();
        assert!(err.is_does_not_provide());
    }

    #[test]
    fn test_fallback_disabled_by_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let config = Config {
            fallback_to_path: false,
            ..Config::default()
        };
        let input = file.path().display().to_string();
        let err = resolve(ProviderConfig::new(input).with_config(&config))
            .err()
            .unwrap();

        assert!(err.is_does_not_provide());
    }

    #[test]
    fn test_custom_explicit_prefix() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let config = Config {
            explicit_prefix: "bom:".to_string(),
            ..Config::default()
        };
        let input = format!("bom:{}", file.path().display());
        assert!(resolve(ProviderConfig::new(input).with_config(&config)).is_ok());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(
            expand_home("/tmp/sbom.json").unwrap(),
            PathBuf::from("/tmp/sbom.json")
        );

        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~").unwrap(), home);
            assert_eq!(expand_home("~/sbom.json").unwrap(), home.join("sbom.json"));
        }

        assert!(expand_home("~someone/sbom.json").is_err());
    }
}
