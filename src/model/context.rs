use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::distro::Distro;

/// Document-level provenance for a decoded package set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub source: SourceMetadata,
    /// Absent when the document declared no distro name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distro: Option<Distro>,
}

/// What the SBOM generator scanned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "lowercase")]
pub enum SourceMetadata {
    Image(ImageMetadata),
    Directory {
        path: String,
    },
    File {
        path: String,
    },
    #[default]
    Unknown,
}

impl SourceMetadata {
    pub fn scheme(&self) -> &'static str {
        match self {
            SourceMetadata::Image(_) => "image",
            SourceMetadata::Directory { .. } => "directory",
            SourceMetadata::File { .. } => "file",
            SourceMetadata::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageMetadata {
    #[serde(deserialize_with = "null_as_default")]
    pub user_input: String,
    #[serde(rename = "imageID", deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub manifest_digest: String,
    #[serde(deserialize_with = "null_as_default")]
    pub media_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(rename = "imageSize", deserialize_with = "null_as_default")]
    pub size: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub repo_digests: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub architecture: String,
    #[serde(deserialize_with = "null_as_default")]
    pub os: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_metadata_ignores_unknown_fields() {
        let image: ImageMetadata = serde_json::from_value(serde_json::json!({
            "userInput": "alpine:3.12",
            "imageID": "sha256:a24bb4013296",
            "manifestDigest": "sha256:c0e9560cda11",
            "tags": ["alpine:3.12"],
            "imageSize": 5570176,
            "layers": [{"digest": "sha256:50644c29ef5a"}],
        }))
        .unwrap();

        assert_eq!(image.user_input, "alpine:3.12");
        assert_eq!(image.id, "sha256:a24bb4013296");
        assert_eq!(image.size, 5570176);
        assert!(image.repo_digests.is_empty());
    }

    #[test]
    fn test_source_scheme() {
        assert_eq!(SourceMetadata::default().scheme(), "unknown");
        assert_eq!(
            SourceMetadata::Directory {
                path: "/src".to_string()
            }
            .scheme(),
            "directory"
        );
    }
}
