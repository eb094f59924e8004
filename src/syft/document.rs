use serde::de::value::MapAccessDeserializer;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::model::{null_as_default, ImageMetadata, SourceMetadata};

/// The top-level fields of a syft JSON document that ingestion needs.
///
/// Artifacts are kept as raw JSON so that a malformed artifact surfaces as a
/// decode error for that artifact instead of rejecting the whole document.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PartialSyftDoc {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: SourceFragment,
    #[serde(default, deserialize_with = "null_as_default")]
    pub distro: DistroFragment,
    #[serde(default, deserialize_with = "null_as_default")]
    pub artifacts: Vec<Value>,
}

impl PartialSyftDoc {
    /// Decodes the first JSON value in the stream. Anything that is not a
    /// JSON object of the expected shape is reported as
    /// [`Error::DoesNotProvide`]; a failing reader is [`Error::Read`].
    pub(crate) fn decode<R: Read>(reader: R) -> Result<Self> {
        let mut stream = serde_json::Deserializer::from_reader(reader).into_iter::<JsonObject<Self>>();

        match stream.next() {
            Some(Ok(JsonObject(doc))) => Ok(doc),
            Some(Err(e)) if e.is_io() => Err(Error::Read(e.into())),
            Some(Err(e)) => {
                tracing::debug!(error = %e, "input is not a syft JSON document");
                Err(Error::DoesNotProvide)
            }
            None => {
                tracing::debug!("input is empty");
                Err(Error::DoesNotProvide)
            }
        }
    }
}

/// The `source` block. Older schemas carry the scanned target under
/// `target`, newer ones under `metadata`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct SourceFragment {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(default)]
    pub target: Option<Value>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl SourceFragment {
    /// Converts to the normalized source description. Never fails: shapes
    /// that cannot be read degrade to defaults.
    pub(crate) fn to_source_metadata(self) -> SourceMetadata {
        let payload = self.target.or(self.metadata).unwrap_or(Value::Null);

        match self.kind.to_lowercase().as_str() {
            "image" => {
                let image = ImageMetadata::deserialize(&payload).unwrap_or_else(|e| {
                    tracing::debug!(error = %e, "unreadable image source metadata");
                    ImageMetadata::default()
                });
                SourceMetadata::Image(image)
            }
            "directory" | "dir" => SourceMetadata::Directory {
                path: path_of(&payload),
            },
            "file" => SourceMetadata::File {
                path: path_of(&payload),
            },
            _ => SourceMetadata::Unknown,
        }
    }
}

fn path_of(payload: &Value) -> String {
    match payload {
        Value::String(path) => path.clone(),
        Value::Object(map) => map
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

/// The `distro` block. Every field may be empty.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DistroFragment {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(default, deserialize_with = "id_like")]
    pub id_like: String,
}

/// `idLike` is a single string in older schemas and a list in newer ones.
fn id_like<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdLike {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<IdLike>::deserialize(deserializer)? {
        Some(IdLike::One(s)) => s,
        Some(IdLike::Many(v)) => v.join(" "),
        None => String::new(),
    })
}

/// Accepts only a JSON object, where a derived struct would also accept an
/// array of positional fields.
struct JsonObject<T>(T);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for JsonObject<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ObjectVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ObjectVisitor<T> {
            type Value = T;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, map: A) -> std::result::Result<T, A::Error>
            where
                A: MapAccess<'de>,
            {
                T::deserialize(MapAccessDeserializer::new(map))
            }
        }

        deserializer
            .deserialize_map(ObjectVisitor(PhantomData))
            .map(JsonObject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode(value: Value) -> Result<PartialSyftDoc> {
        PartialSyftDoc::decode(value.to_string().as_bytes())
    }

    #[test]
    fn test_decode_ignores_unknown_top_level_fields() {
        let doc = decode(json!({
            "schema": {"version": "1.0.0"},
            "descriptor": {"name": "syft", "version": "0.9.0"},
            "artifactRelationships": [],
            "artifacts": [{"name": "bash"}],
            "distro": {"name": "debian", "version": "10"},
        }))
        .unwrap();

        assert_eq!(doc.artifacts.len(), 1);
        assert_eq!(doc.distro.name, "debian");
        assert_eq!(doc.distro.version, "10");
    }

    #[test]
    fn test_decode_empty_object() {
        let doc = decode(json!({})).unwrap();

        assert!(doc.artifacts.is_empty());
        assert!(doc.distro.name.is_empty());
        assert_eq!(doc.source.to_source_metadata(), SourceMetadata::Unknown);
    }

    #[test]
    fn test_decode_null_sections() {
        let doc = decode(json!({"artifacts": null, "distro": null, "source": null})).unwrap();
        assert!(doc.artifacts.is_empty());
    }

    #[test]
    fn test_decode_rejects_non_documents() {
        assert!(PartialSyftDoc::decode("not json".as_bytes())
            .unwrap_err()
            .is_does_not_provide());
        assert!(PartialSyftDoc::decode("".as_bytes())
            .unwrap_err()
            .is_does_not_provide());
        assert!(decode(json!([{}, {}, []])).unwrap_err().is_does_not_provide());
        assert!(decode(json!({"artifacts": "bash"}))
            .unwrap_err()
            .is_does_not_provide());
    }

    /// Yields its bytes once, then fails every later read.
    struct StalledReader {
        data: &'static [u8],
        sent: bool,
    }

    impl Read for StalledReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.sent {
                return Err(std::io::Error::new(std::io::ErrorKind::TimedOut, "stalled"));
            }
            self.sent = true;
            let n = self.data.len().min(buf.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            Ok(n)
        }
    }

    #[test]
    fn test_decode_reader_failure_is_read_error() {
        let reader = StalledReader {
            data: br#"{"artifacts":["#,
            sent: false,
        };

        match PartialSyftDoc::decode(reader) {
            Err(Error::Read(e)) => assert_eq!(e.kind(), std::io::ErrorKind::TimedOut),
            other => panic!("expected read error, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_reads_only_first_value() {
        let doc = PartialSyftDoc::decode(r#"{"artifacts":[{}]} trailing"#.as_bytes()).unwrap();
        assert_eq!(doc.artifacts.len(), 1);
    }

    #[test]
    fn test_id_like_string_or_list() {
        let doc = decode(json!({"distro": {"name": "centos", "idLike": "rhel fedora"}})).unwrap();
        assert_eq!(doc.distro.id_like, "rhel fedora");

        let doc = decode(json!({"distro": {"name": "centos", "idLike": ["rhel", "fedora"]}})).unwrap();
        assert_eq!(doc.distro.id_like, "rhel fedora");
    }

    #[test]
    fn test_image_source() {
        let doc = decode(json!({
            "source": {
                "type": "image",
                "target": {
                    "userInput": "debian:10",
                    "imageID": "sha256:1510e8501783",
                    "tags": ["debian:10"],
                    "imageSize": 114062336,
                }
            }
        }))
        .unwrap();

        match doc.source.to_source_metadata() {
            SourceMetadata::Image(image) => {
                assert_eq!(image.user_input, "debian:10");
                assert_eq!(image.tags, vec!["debian:10".to_string()]);
            }
            other => panic!("expected image source, got {:?}", other),
        }
    }

    #[test]
    fn test_directory_source_string_and_object() {
        let doc = decode(json!({"source": {"type": "directory", "target": "/app"}})).unwrap();
        assert_eq!(
            doc.source.to_source_metadata(),
            SourceMetadata::Directory {
                path: "/app".to_string()
            }
        );

        let doc = decode(json!({"source": {"type": "directory", "metadata": {"path": "/app"}}})).unwrap();
        assert_eq!(
            doc.source.to_source_metadata(),
            SourceMetadata::Directory {
                path: "/app".to_string()
            }
        );
    }

    #[test]
    fn test_image_source_with_null_fields() {
        let doc = decode(json!({
            "source": {
                "type": "image",
                "target": {"userInput": "debian:10", "tags": null, "imageSize": null}
            }
        }))
        .unwrap();

        assert_eq!(
            doc.source.to_source_metadata(),
            SourceMetadata::Image(ImageMetadata {
                user_input: "debian:10".to_string(),
                ..ImageMetadata::default()
            })
        );
    }

    #[test]
    fn test_unreadable_image_source_degrades() {
        let doc = decode(json!({"source": {"type": "image", "target": 42}})).unwrap();
        assert_eq!(
            doc.source.to_source_metadata(),
            SourceMetadata::Image(ImageMetadata::default())
        );
    }
}
