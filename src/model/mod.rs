//! Core data types for decoded packages and their context.
//!
//! This module contains the types handed to the matching pipeline:
//!
//! - [`Package`] - A package decoded from an SBOM artifact
//! - [`PackageType`] - The ecosystem tag of a package (rpm, deb, ...)
//! - [`Language`] - The source language of a package
//! - [`Metadata`] - Ecosystem-specific metadata (RPM, dpkg, Java)
//! - [`Context`] - What was scanned and which distro it runs
//!
//! # Example
//!
//! ```
//! use sbom_ingest::model::{Package, PackageId, PackageType};
//!
//! let package = Package::new(PackageId::new(0), "bash", "5.1", PackageType::Deb);
//!
//! assert_eq!(package.to_string(), "Pkg(type=deb, name=bash, version=5.1)");
//! ```

use serde::{Deserialize, Deserializer};

mod context;
mod metadata;
mod package;

pub use context::*;
pub use metadata::*;
pub use package::*;

/// Treats an explicit JSON `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
