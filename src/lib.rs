//! Schema-tolerant ingestion of syft JSON SBOMs.
//!
//! Decodes the package inventory and its context (source, distro) from a
//! syft JSON document for vulnerability matching. Only the fields the matcher
//! needs are read, so documents produced by newer or older syft versions keep
//! decoding.
//!
//! # Example
//!
//! ```no_run
//! use sbom_ingest::{syft_json_provider, Config, ProviderConfig};
//!
//! let config = Config::load().unwrap_or_default();
//! let input = ProviderConfig::new("sbom:~/scans/alpine.json").with_config(&config);
//!
//! match syft_json_provider(input) {
//!     Ok((packages, context)) => {
//!         println!("{} packages, distro: {:?}", packages.len(), context.distro);
//!     }
//!     Err(e) if e.is_does_not_provide() => println!("not a syft SBOM"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

pub mod config;
pub mod cpe;
pub mod distro;
pub mod error;
pub mod model;
pub mod provider;
pub mod syft;

pub use config::Config;
pub use crate::cpe::Cpe;
pub use distro::Distro;
pub use error::{Error, Result};
pub use model::{Context, Metadata, Package, PackageId, PackageType};
pub use provider::ProviderConfig;
pub use syft::{parse_syft_json, syft_json_provider};
