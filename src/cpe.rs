//! CPE (Common Platform Enumeration) identifiers.
//!
//! Artifacts list their CPEs as raw strings. Before they reach the matcher
//! each one is validated and normalized into a [`Cpe`], which always renders
//! in the CPE 2.3 formatted-string binding:
//!
//! ```text
//! cpe:2.3:part:vendor:product:version:update:edition:language:sw_edition:target_sw:target_hw:other
//! ```
//!
//! Both the 2.3 formatted-string binding and the legacy 2.2 URI binding
//! (`cpe:/a:vendor:product:version`) are accepted on input.
//!
//! # Example
//!
//! ```
//! use sbom_ingest::cpe::Cpe;
//!
//! let cpe = Cpe::parse("cpe:/a:gnu:bash:5.1").unwrap();
//! assert_eq!(cpe.product(), "bash");
//! assert_eq!(cpe.to_string(), "cpe:2.3:a:gnu:bash:5.1:*:*:*:*:*:*:*");
//! ```

use ::cpe::component::Component;
use ::cpe::cpe::{Cpe as _, CpeType, Language as UriLanguage};
use ::cpe::uri::Uri;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const FORMATTED_PREFIX: &str = "cpe:2.3:";
const URI_PREFIX: &str = "cpe:/";
const COMPONENT_COUNT: usize = 11;
const ANY: &str = "*";

/// Errors raised while validating a CPE string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpeError {
    #[error("not a CPE 2.3 or 2.2 string: {0:?}")]
    InvalidPrefix(String),

    #[error("CPE {cpe:?} has {count} components, expected 11")]
    ComponentCount { cpe: String, count: usize },

    #[error("CPE {cpe:?} has an empty component")]
    EmptyComponent { cpe: String },

    #[error("CPE {cpe:?} has invalid part {part:?} (expected a, o, h or *)")]
    InvalidPart { cpe: String, part: String },

    #[error("CPE {cpe:?} contains invalid character {character:?}")]
    InvalidCharacter { cpe: String, character: char },

    #[error("CPE {cpe:?} ends with a dangling escape")]
    DanglingEscape { cpe: String },

    #[error("invalid CPE URI {cpe:?}: {reason}")]
    Uri { cpe: String, reason: String },
}

/// A validated CPE, stored as its eleven formatted-string components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpe {
    components: [String; COMPONENT_COUNT],
}

impl Cpe {
    /// Parses a CPE in either the 2.3 formatted-string or 2.2 URI binding.
    pub fn parse(raw: &str) -> Result<Self, CpeError> {
        let trimmed = raw.trim();

        if let Some(rest) = trimmed.strip_prefix(FORMATTED_PREFIX) {
            Self::parse_formatted(trimmed, rest)
        } else if trimmed.starts_with(URI_PREFIX) {
            Self::parse_uri(trimmed)
        } else {
            Err(CpeError::InvalidPrefix(raw.to_string()))
        }
    }

    fn parse_formatted(cpe: &str, rest: &str) -> Result<Self, CpeError> {
        let parts = split_formatted(cpe, rest)?;
        if parts.len() != COMPONENT_COUNT {
            return Err(CpeError::ComponentCount {
                cpe: cpe.to_string(),
                count: parts.len(),
            });
        }

        for component in &parts {
            validate_component(cpe, component)?;
        }

        Self::from_components(cpe, parts)
    }

    fn parse_uri(cpe: &str) -> Result<Self, CpeError> {
        let fields = cpe[URI_PREFIX.len()..].split(':').count();
        if fields > 7 {
            return Err(CpeError::ComponentCount {
                cpe: cpe.to_string(),
                count: fields,
            });
        }

        let uri = Uri::parse(cpe).map_err(|e| CpeError::Uri {
            cpe: cpe.to_string(),
            reason: e.to_string(),
        })?;

        let part = match uri.part() {
            CpeType::Any | CpeType::Empty => ANY.to_string(),
            part => part.to_string(),
        };
        let language = match uri.language() {
            UriLanguage::Any => ANY.to_string(),
            UriLanguage::Language(tag) => bind_value(cpe, &tag.to_string())?,
        };

        let mut parts = vec![part];
        for component in [uri.vendor(), uri.product(), uri.version(), uri.update(), uri.edition()] {
            parts.push(bind_component(cpe, &component)?);
        }
        parts.push(language);
        for component in [uri.sw_edition(), uri.target_sw(), uri.target_hw(), uri.other()] {
            parts.push(bind_component(cpe, &component)?);
        }

        Self::from_components(cpe, parts)
    }

    fn from_components(cpe: &str, parts: Vec<String>) -> Result<Self, CpeError> {
        let components: [String; COMPONENT_COUNT] =
            parts.try_into().map_err(|parts: Vec<String>| CpeError::ComponentCount {
                cpe: cpe.to_string(),
                count: parts.len(),
            })?;

        if !matches!(components[0].as_str(), "a" | "o" | "h" | ANY) {
            return Err(CpeError::InvalidPart {
                cpe: cpe.to_string(),
                part: components[0].clone(),
            });
        }

        Ok(Self { components })
    }

    pub fn part(&self) -> &str {
        &self.components[0]
    }

    pub fn vendor(&self) -> &str {
        &self.components[1]
    }

    pub fn product(&self) -> &str {
        &self.components[2]
    }

    pub fn version(&self) -> &str {
        &self.components[3]
    }

    pub fn update(&self) -> &str {
        &self.components[4]
    }

    pub fn target_sw(&self) -> &str {
        &self.components[8]
    }
}

/// Parses every raw CPE string, failing on the first invalid one.
pub fn new_slice<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Cpe>, CpeError> {
    raw.iter().map(|s| Cpe::parse(s.as_ref())).collect()
}

impl fmt::Display for Cpe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", FORMATTED_PREFIX, self.components.join(":"))
    }
}

impl TryFrom<String> for Cpe {
    type Error = CpeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cpe::parse(&value)
    }
}

impl From<Cpe> for String {
    fn from(cpe: Cpe) -> Self {
        cpe.to_string()
    }
}

/// Splits a formatted-string body on unescaped colons, keeping escapes intact.
fn split_formatted(cpe: &str, body: &str) -> Result<Vec<String>, CpeError> {
    let mut parts = Vec::with_capacity(COMPONENT_COUNT);
    let mut current = String::new();
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escaped = chars.next().ok_or_else(|| CpeError::DanglingEscape {
                    cpe: cpe.to_string(),
                })?;
                current.push(c);
                current.push(escaped);
            }
            ':' => parts.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    parts.push(current);

    Ok(parts)
}

fn validate_component(cpe: &str, component: &str) -> Result<(), CpeError> {
    if component.is_empty() {
        return Err(CpeError::EmptyComponent {
            cpe: cpe.to_string(),
        });
    }
    if component == ANY || component == "-" {
        return Ok(());
    }

    let last = component.chars().count() - 1;
    let mut escaped = false;
    for (i, c) in component.chars().enumerate() {
        if escaped {
            if !c.is_ascii_graphic() {
                return Err(invalid_char(cpe, c));
            }
            escaped = false;
            continue;
        }

        match c {
            '\\' => escaped = true,
            '*' if i == 0 || i == last => {}
            '?' => {}
            c if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') => {}
            _ => return Err(invalid_char(cpe, c)),
        }
    }

    Ok(())
}

/// Renders a decoded URI component in formatted-string form.
fn bind_component(cpe: &str, component: &Component<'_>) -> Result<String, CpeError> {
    match component {
        Component::Any => Ok(ANY.to_string()),
        Component::NotApplicable => Ok("-".to_string()),
        Component::Value(value) => bind_value(cpe, value),
    }
}

/// Quotes every character the formatted-string binding does not allow bare.
/// `*` and `?` stay unquoted: the URI decoder only yields them for `%02` and
/// `%01`, which are wildcards.
fn bind_value(cpe: &str, value: &str) -> Result<String, CpeError> {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '*' | '?') {
            out.push(c);
        } else if c.is_ascii_graphic() {
            out.push('\\');
            out.push(c);
        } else {
            return Err(invalid_char(cpe, c));
        }
    }
    Ok(out)
}

fn invalid_char(cpe: &str, character: char) -> CpeError {
    CpeError::InvalidCharacter {
        cpe: cpe.to_string(),
        character,
    }
}
