//! Linux distribution descriptors.
//!
//! A [`Distro`] is only ever built from a non-empty distro name. Unknown
//! distro types and unparseable versions are rejected, since the matcher
//! keys its vulnerability namespaces on both.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistroError {
    #[error("unrecognized distro type: {0:?}")]
    UnknownType(String),

    #[error("unable to parse version {version:?} for {distro}: {reason}")]
    InvalidVersion {
        distro: String,
        version: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistroType {
    Debian,
    Ubuntu,
    RedHat,
    CentOS,
    Fedora,
    Alpine,
    Busybox,
    AmazonLinux,
    OracleLinux,
    ArchLinux,
    OpenSuseLeap,
    Sles,
    Photon,
    Windows,
    RockyLinux,
    AlmaLinux,
    Mariner,
    Wolfi,
}

impl DistroType {
    /// Resolves a distro name or os-release ID to its type.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        let distro = match normalized.as_str() {
            "debian" => DistroType::Debian,
            "ubuntu" => DistroType::Ubuntu,
            "redhat" | "rhel" => DistroType::RedHat,
            "centos" => DistroType::CentOS,
            "fedora" => DistroType::Fedora,
            "alpine" => DistroType::Alpine,
            "busybox" => DistroType::Busybox,
            "amazon" | "amazonlinux" | "amzn" => DistroType::AmazonLinux,
            "oracle" | "oraclelinux" | "ol" => DistroType::OracleLinux,
            "arch" | "archlinux" => DistroType::ArchLinux,
            "opensuse-leap" | "opensuseleap" | "opensuse" => DistroType::OpenSuseLeap,
            "sles" | "suse" => DistroType::Sles,
            "photon" => DistroType::Photon,
            "windows" => DistroType::Windows,
            "rocky" | "rockylinux" => DistroType::RockyLinux,
            "almalinux" | "alma" => DistroType::AlmaLinux,
            "mariner" => DistroType::Mariner,
            "wolfi" => DistroType::Wolfi,
            _ => return None,
        };
        Some(distro)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DistroType::Debian => "debian",
            DistroType::Ubuntu => "ubuntu",
            DistroType::RedHat => "redhat",
            DistroType::CentOS => "centos",
            DistroType::Fedora => "fedora",
            DistroType::Alpine => "alpine",
            DistroType::Busybox => "busybox",
            DistroType::AmazonLinux => "amazonlinux",
            DistroType::OracleLinux => "oraclelinux",
            DistroType::ArchLinux => "archlinux",
            DistroType::OpenSuseLeap => "opensuse-leap",
            DistroType::Sles => "sles",
            DistroType::Photon => "photon",
            DistroType::Windows => "windows",
            DistroType::RockyLinux => "rockylinux",
            DistroType::AlmaLinux => "almalinux",
            DistroType::Mariner => "mariner",
            DistroType::Wolfi => "wolfi",
        }
    }
}

impl fmt::Display for DistroType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A dotted numeric version such as `20.04` or `7.9.2009`.
///
/// Pre-release (`-rc1`) and build (`+build`) suffixes are kept in the raw
/// string but not in the numeric segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistroVersion {
    raw: String,
    segments: Vec<u64>,
}

impl DistroVersion {
    pub fn parse(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim().trim_start_matches('v');
        let numeric = trimmed
            .split(['-', '+'])
            .next()
            .unwrap_or_default();

        if numeric.is_empty() {
            return Err("no numeric segments".to_string());
        }

        let segments = numeric
            .split('.')
            .map(|s| {
                s.parse::<u64>()
                    .map_err(|_| format!("segment {:?} is not numeric", s))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn major(&self) -> u64 {
        self.segments.first().copied().unwrap_or_default()
    }

    pub fn minor(&self) -> Option<u64> {
        self.segments.get(1).copied()
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }
}

impl fmt::Display for DistroVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// A normalized OS distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distro {
    #[serde(rename = "type")]
    pub distro_type: DistroType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<DistroVersion>,
    pub raw_version: String,
    pub id_like: String,
}

impl Distro {
    /// Builds a distro from the name, version and id-like hint declared in
    /// the document. An empty version is allowed; a non-empty one must parse.
    pub fn new(name: &str, version: &str, id_like: &str) -> Result<Self, DistroError> {
        let distro_type =
            DistroType::from_name(name).ok_or_else(|| DistroError::UnknownType(name.to_string()))?;

        let parsed = if version.trim().is_empty() {
            None
        } else {
            let parsed =
                DistroVersion::parse(version).map_err(|reason| DistroError::InvalidVersion {
                    distro: distro_type.to_string(),
                    version: version.to_string(),
                    reason,
                })?;
            Some(parsed)
        };

        Ok(Self {
            distro_type,
            version: parsed,
            raw_version: version.to_string(),
            id_like: id_like.to_string(),
        })
    }

    pub fn name(&self) -> &'static str {
        self.distro_type.as_str()
    }

    pub fn major_version(&self) -> Option<u64> {
        self.version.as_ref().map(DistroVersion::major)
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.raw_version.is_empty() {
            write!(f, "{}", self.distro_type)
        } else {
            write!(f, "{} {}", self.distro_type, self.raw_version)
        }
    }
}
