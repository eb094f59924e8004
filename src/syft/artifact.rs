use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

use crate::config::IgnoreConfig;
use crate::model::{
    null_as_default, DpkgMetadata, JavaMetadata, Language, Location, Metadata, MetadataType,
    PackageType, RpmMetadata,
};

/// A decoded artifact: the fields every package has, plus whatever metadata
/// its discriminator resolved to.
#[derive(Debug, Default)]
pub(crate) struct PartialSyftPackage {
    pub basic: PackageBasicMetadata,
    pub metadata_type: MetadataType,
    pub metadata: Option<Metadata>,
}

/// Fields whose type does not depend on the package ecosystem.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PackageBasicMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub package_type: PackageType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub locations: Vec<Location>,
    #[serde(default, deserialize_with = "licenses")]
    pub licenses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: Language,
    #[serde(default, deserialize_with = "raw_cpes")]
    pub cpes: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purl: String,
}

/// The discriminator and its still-undecoded payload.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageMetadataUnpacker {
    #[serde(default, deserialize_with = "null_as_default")]
    metadata_type: String,
    #[serde(default)]
    metadata: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialSyftJavaMetadata {
    #[serde(default)]
    manifest: Option<PartialSyftJavaManifest>,
    #[serde(default)]
    pom_properties: Option<PartialSyftPomProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialSyftPomProperties {
    #[serde(default, deserialize_with = "null_as_default")]
    group_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    artifact_id: String,
}

#[derive(Debug, Default, Deserialize)]
struct PartialSyftJavaManifest {
    #[serde(default)]
    main: Option<ManifestMain>,
}

/// The manifest's main section: a map in older schemas, an ordered list of
/// key/value pairs in newer ones. Only `Name` is read.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ManifestMain {
    Pairs(Vec<ManifestEntry>),
    Map {
        #[serde(rename = "Name", default)]
        name: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    value: String,
}

impl ManifestMain {
    fn name(self) -> Option<String> {
        match self {
            ManifestMain::Pairs(entries) => entries
                .into_iter()
                .find(|entry| entry.key == "Name")
                .map(|entry| entry.value),
            ManifestMain::Map { name } => name,
        }
    }
}

impl From<PartialSyftJavaMetadata> for JavaMetadata {
    fn from(partial: PartialSyftJavaMetadata) -> Self {
        let (artifact, group) = partial
            .pom_properties
            .map(|pom| (pom.artifact_id, pom.group_id))
            .unwrap_or_default();

        let name = partial
            .manifest
            .and_then(|manifest| manifest.main)
            .and_then(ManifestMain::name)
            .unwrap_or_default();

        JavaMetadata {
            pom_artifact_id: artifact,
            pom_group_id: group,
            manifest_name: name,
        }
    }
}

impl PartialSyftPackage {
    /// Decodes one raw artifact in two passes: common fields first, then the
    /// discriminated metadata payload.
    pub(crate) fn decode(raw: Value, ignore: &IgnoreConfig) -> Result<Self, serde_json::Error> {
        if raw.is_null() {
            return Ok(Self::default());
        }
        if !raw.is_object() {
            return Err(serde_json::Error::custom("artifact is not a JSON object"));
        }

        let basic = PackageBasicMetadata::deserialize(&raw)?;

        let unpacker = PackageMetadataUnpacker::deserialize(raw)?;
        let metadata_type = MetadataType::from(unpacker.metadata_type.clone());

        let mut package = Self {
            basic,
            metadata_type,
            metadata: None,
        };

        if ignore.should_ignore_metadata_type(&unpacker.metadata_type)
            || ignore.should_ignore_metadata_type(package.metadata_type.as_str())
        {
            tracing::debug!(package = %package, metadata_type = %unpacker.metadata_type, "metadata ignored by config");
            return Ok(package);
        }

        package.metadata = unpack_metadata(&package.metadata_type, unpacker.metadata)?;
        if package.metadata.is_none() && !unpacker.metadata_type.is_empty() {
            tracing::debug!(package = %package, metadata_type = %unpacker.metadata_type, "no decoder for metadata type");
        }

        Ok(package)
    }
}

impl fmt::Display for PartialSyftPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pkg(type={}, name={}, version={})",
            self.basic.package_type, self.basic.name, self.basic.version
        )
    }
}

fn unpack_metadata(
    metadata_type: &MetadataType,
    payload: Value,
) -> Result<Option<Metadata>, serde_json::Error> {
    let metadata = match metadata_type {
        MetadataType::Rpmdb => Metadata::Rpm(decode_payload::<RpmMetadata>(payload)?),
        MetadataType::Dpkg => Metadata::Dpkg(decode_payload::<DpkgMetadata>(payload)?),
        MetadataType::Java => {
            Metadata::Java(decode_payload::<PartialSyftJavaMetadata>(payload)?.into())
        }
        MetadataType::Unknown | MetadataType::Other(_) => return Ok(None),
    };
    Ok(Some(metadata))
}

fn decode_payload<T: DeserializeOwned + Default>(payload: Value) -> Result<T, serde_json::Error> {
    if payload.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(payload)
}

/// Licenses are plain strings in older schemas and objects carrying a
/// `value` in newer ones.
fn licenses<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum License {
        Plain(String),
        Detailed { value: String },
    }

    let entries = Option::<Vec<License>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            License::Plain(value) | License::Detailed { value } => value,
        })
        .collect())
}

/// CPEs are plain strings in older schemas and `{cpe, source}` objects in
/// newer ones.
fn raw_cpes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCpe {
        Plain(String),
        Detailed { cpe: String },
    }

    let entries = Option::<Vec<RawCpe>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            RawCpe::Plain(cpe) | RawCpe::Detailed { cpe } => cpe,
        })
        .collect())
}
