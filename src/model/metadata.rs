use serde::{Deserialize, Serialize};
use std::fmt;

use super::null_as_default;

/// Discriminator naming the shape of an artifact's `metadata` payload.
///
/// Both the legacy Go-type names (`RpmdbMetadata`) and the newer
/// kebab-case names (`rpm-db-entry`) are recognized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MetadataType {
    #[default]
    Unknown,
    Rpmdb,
    Dpkg,
    Java,
    Other(String),
}

impl MetadataType {
    pub fn as_str(&self) -> &str {
        match self {
            MetadataType::Unknown => "",
            MetadataType::Rpmdb => "RpmdbMetadata",
            MetadataType::Dpkg => "DpkgMetadata",
            MetadataType::Java => "JavaMetadata",
            MetadataType::Other(s) => s,
        }
    }
}

impl From<String> for MetadataType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => MetadataType::Unknown,
            "RpmdbMetadata" | "RpmMetadata" | "rpm-db-entry" | "rpmdb" | "rpm" => {
                MetadataType::Rpmdb
            }
            "DpkgMetadata" | "dpkg-db-entry" | "dpkg" => MetadataType::Dpkg,
            "JavaMetadata" | "java-archive" | "java" => MetadataType::Java,
            _ => MetadataType::Other(s),
        }
    }
}

impl From<MetadataType> for String {
    fn from(t: MetadataType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for MetadataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ecosystem-specific metadata attached to a package.
///
/// Only the variants the matcher needs are modeled; artifacts with any other
/// discriminator carry no metadata at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Metadata {
    Rpm(RpmMetadata),
    Dpkg(DpkgMetadata),
    Java(JavaMetadata),
}

impl Metadata {
    pub fn metadata_type(&self) -> MetadataType {
        match self {
            Metadata::Rpm(_) => MetadataType::Rpmdb,
            Metadata::Dpkg(_) => MetadataType::Dpkg,
            Metadata::Java(_) => MetadataType::Java,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpmMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source_rpm: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epoch: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modularity_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpkgMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_version: Option<String>,
}

/// Identity of a Java archive, gathered from its pom.properties and
/// MANIFEST.MF. Any of the three may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaMetadata {
    pub pom_artifact_id: String,
    pub pom_group_id: String,
    pub manifest_name: String,
}
