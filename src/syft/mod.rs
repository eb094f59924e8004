//! Syft JSON decoding.
//!
//! Only the parts of a syft document the matcher needs are decoded, rather
//! than the full syft JSON shape, so ingestion keeps working as the syft
//! schema evolves. Unknown fields are ignored everywhere, and artifacts
//! whose metadata type is not recognized are kept without metadata.
//!
//! # Example
//!
//! ```
//! use sbom_ingest::syft::parse_syft_json;
//!
//! let doc = r#"{
//!     "distro": {},
//!     "artifacts": [{
//!         "name": "bash",
//!         "version": "5.1",
//!         "type": "deb",
//!         "cpes": ["cpe:2.3:a:gnu:bash:5.1:*:*:*:*:*:*:*"],
//!         "metadataType": "dpkg",
//!         "metadata": {}
//!     }]
//! }"#;
//!
//! let (packages, context) = parse_syft_json(doc.as_bytes()).unwrap();
//!
//! assert_eq!(packages.len(), 1);
//! assert_eq!(packages[0].name, "bash");
//! assert!(context.distro.is_none());
//! ```

mod artifact;
mod document;

use serde_json::Value;
use std::io::Read;

use crate::config::IgnoreConfig;
use crate::cpe;
use crate::distro::Distro;
use crate::error::{Error, Result};
use crate::model::{Context, Metadata, Package, PackageId};
use crate::provider::{self, ProviderConfig};
use artifact::PartialSyftPackage;
use document::{DistroFragment, PartialSyftDoc, SourceFragment};

/// Resolves the configured input and decodes it as a syft JSON document.
///
/// Returns [`Error::DoesNotProvide`] when the input is not a syft JSON
/// document, so the caller can try another provider.
pub fn syft_json_provider(config: ProviderConfig) -> Result<(Vec<Package>, Context)> {
    let ignore = config.ignore.clone();
    let reader = provider::resolve(config)?;
    parse_syft_json_with(reader, &ignore)
}

/// Decodes a syft JSON document from `reader`.
pub fn parse_syft_json<R: Read>(reader: R) -> Result<(Vec<Package>, Context)> {
    parse_syft_json_with(reader, &IgnoreConfig::default())
}

/// Decodes a syft JSON document, discarding metadata the ignore list names.
pub fn parse_syft_json_with<R: Read>(
    reader: R,
    ignore: &IgnoreConfig,
) -> Result<(Vec<Package>, Context)> {
    let doc = PartialSyftDoc::decode(reader)?;
    tracing::debug!(artifacts = doc.artifacts.len(), "decoded syft document");

    let packages = doc
        .artifacts
        .into_iter()
        .enumerate()
        .map(|(index, raw)| normalize(index, raw, ignore))
        .collect::<Result<Vec<_>>>()?;

    let context = build_context(doc.source, doc.distro)?;

    Ok((packages, context))
}

/// Turns one raw artifact into a package whose id is its position.
fn normalize(index: usize, raw: Value, ignore: &IgnoreConfig) -> Result<Package> {
    let name = raw
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let artifact = PartialSyftPackage::decode(raw, ignore).map_err(|source| Error::Artifact {
        index,
        name: name.clone(),
        source,
    })?;

    let cpes = cpe::new_slice(&artifact.basic.cpes).map_err(|source| Error::Cpe {
        index,
        name,
        source,
    })?;

    tracing::trace!(
        id = index,
        package = %artifact,
        metadata_type = %artifact.metadata_type,
        metadata = ?artifact.metadata.as_ref().map(Metadata::metadata_type),
        "normalized artifact"
    );

    let basic = artifact.basic;
    Ok(
        Package::new(PackageId::new(index), basic.name, basic.version, basic.package_type)
            .with_locations(basic.locations)
            .with_licenses(basic.licenses)
            .with_language(basic.language)
            .with_cpes(cpes)
            .with_purl(basic.purl)
            .with_metadata(artifact.metadata),
    )
}

fn build_context(source: SourceFragment, distro: DistroFragment) -> Result<Context> {
    let distro = if distro.name.is_empty() {
        tracing::debug!("document declares no distro");
        None
    } else {
        Some(Distro::new(&distro.name, &distro.version, &distro.id_like)?)
    };

    let source = source.to_source_metadata();
    tracing::debug!(scheme = source.scheme(), "decoded document source");

    Ok(Context { source, distro })
}
