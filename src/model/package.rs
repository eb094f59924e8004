use serde::{Deserialize, Serialize};
use std::fmt;

use super::Metadata;
use crate::cpe::Cpe;

/// Position of a package within a single decoded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(usize);

impl PackageId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Package ecosystem tag.
///
/// The set of tags grows upstream over time, so anything unrecognized is kept
/// verbatim in [`PackageType::Other`] instead of being rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PackageType {
    #[default]
    Unknown,
    Apk,
    Alpm,
    Binary,
    Deb,
    Gem,
    GoModule,
    JavaArchive,
    JenkinsPlugin,
    Npm,
    Python,
    Rpm,
    RustCrate,
    PhpComposer,
    DartPub,
    Dotnet,
    Conan,
    Hackage,
    Cocoapods,
    Portage,
    Hex,
    Other(String),
}

impl PackageType {
    pub fn as_str(&self) -> &str {
        match self {
            PackageType::Unknown => "",
            PackageType::Apk => "apk",
            PackageType::Alpm => "alpm",
            PackageType::Binary => "binary",
            PackageType::Deb => "deb",
            PackageType::Gem => "gem",
            PackageType::GoModule => "go-module",
            PackageType::JavaArchive => "java-archive",
            PackageType::JenkinsPlugin => "jenkins-plugin",
            PackageType::Npm => "npm",
            PackageType::Python => "python",
            PackageType::Rpm => "rpm",
            PackageType::RustCrate => "rust-crate",
            PackageType::PhpComposer => "php-composer",
            PackageType::DartPub => "dart-pub",
            PackageType::Dotnet => "dotnet",
            PackageType::Conan => "conan",
            PackageType::Hackage => "hackage",
            PackageType::Cocoapods => "pod",
            PackageType::Portage => "portage",
            PackageType::Hex => "hex",
            PackageType::Other(s) => s,
        }
    }
}

impl From<String> for PackageType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => PackageType::Unknown,
            "apk" => PackageType::Apk,
            "alpm" => PackageType::Alpm,
            "binary" => PackageType::Binary,
            "deb" => PackageType::Deb,
            "gem" => PackageType::Gem,
            "go-module" => PackageType::GoModule,
            "java-archive" => PackageType::JavaArchive,
            "jenkins-plugin" => PackageType::JenkinsPlugin,
            "npm" => PackageType::Npm,
            "python" => PackageType::Python,
            "rpm" => PackageType::Rpm,
            "rust-crate" => PackageType::RustCrate,
            "php-composer" => PackageType::PhpComposer,
            "dart-pub" => PackageType::DartPub,
            "dotnet" => PackageType::Dotnet,
            "conan" => PackageType::Conan,
            "hackage" => PackageType::Hackage,
            "pod" => PackageType::Cocoapods,
            "portage" => PackageType::Portage,
            "hex" => PackageType::Hex,
            _ => PackageType::Other(s),
        }
    }
}

impl From<PackageType> for String {
    fn from(t: PackageType) -> Self {
        t.as_str().to_string()
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source language of a package, independent of its [`PackageType`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    Unknown,
    Java,
    JavaScript,
    Python,
    Php,
    Ruby,
    Go,
    Rust,
    Dart,
    Dotnet,
    Swift,
    Cpp,
    Haskell,
    Elixir,
    Erlang,
    Other(String),
}

impl Language {
    pub fn as_str(&self) -> &str {
        match self {
            Language::Unknown => "",
            Language::Java => "java",
            Language::JavaScript => "javascript",
            Language::Python => "python",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Dart => "dart",
            Language::Dotnet => "dotnet",
            Language::Swift => "swift",
            Language::Cpp => "c++",
            Language::Haskell => "haskell",
            Language::Elixir => "elixir",
            Language::Erlang => "erlang",
            Language::Other(s) => s,
        }
    }
}

impl From<String> for Language {
    fn from(s: String) -> Self {
        match s.as_str() {
            "" => Language::Unknown,
            "java" => Language::Java,
            "javascript" => Language::JavaScript,
            "python" => Language::Python,
            "php" => Language::Php,
            "ruby" => Language::Ruby,
            "go" => Language::Go,
            "rust" => Language::Rust,
            "dart" => Language::Dart,
            "dotnet" => Language::Dotnet,
            "swift" => Language::Swift,
            "c++" => Language::Cpp,
            "haskell" => Language::Haskell,
            "elixir" => Language::Elixir,
            "erlang" => Language::Erlang,
            _ => Language::Other(s),
        }
    }
}

impl From<Language> for String {
    fn from(l: Language) -> Self {
        l.as_str().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where a package was found. Passed through from the document untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default)]
    pub path: String,
    #[serde(rename = "layerID", default, skip_serializing_if = "Option::is_none")]
    pub layer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub id: PackageId,
    pub name: String,
    pub version: String,
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub locations: Vec<Location>,
    pub licenses: Vec<String>,
    pub language: Language,
    pub cpes: Vec<Cpe>,
    pub purl: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl Package {
    pub fn new(
        id: PackageId,
        name: impl Into<String>,
        version: impl Into<String>,
        package_type: PackageType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            version: version.into(),
            package_type,
            locations: Vec::new(),
            licenses: Vec::new(),
            language: Language::Unknown,
            cpes: Vec::new(),
            purl: String::new(),
            metadata: None,
        }
    }

    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_licenses(mut self, licenses: Vec<String>) -> Self {
        self.licenses = licenses;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn with_cpes(mut self, cpes: Vec<Cpe>) -> Self {
        self.cpes = cpes;
        self
    }

    pub fn with_purl(mut self, purl: impl Into<String>) -> Self {
        self.purl = purl.into();
        self
    }

    pub fn with_metadata(mut self, metadata: Option<Metadata>) -> Self {
        self.metadata = metadata;
        self
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pkg(type={}, name={}, version={})",
            self.package_type, self.name, self.version
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_package_type_known_and_other() {
        assert_eq!(PackageType::from("deb".to_string()), PackageType::Deb);
        assert_eq!(
            PackageType::from("java-archive".to_string()),
            PackageType::JavaArchive
        );
        assert_eq!(PackageType::from(String::new()), PackageType::Unknown);
        assert_eq!(
            PackageType::from("wasm-module".to_string()),
            PackageType::Other("wasm-module".to_string())
        );
    }

    #[test]
    fn test_package_type_serde_keeps_wire_tag() {
        let t: PackageType = serde_json::from_str("\"nix\"").unwrap();
        assert_eq!(t.as_str(), "nix");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"nix\"");
    }

    #[test]
    fn test_language_cpp() {
        let l: Language = serde_json::from_str("\"c++\"").unwrap();
        assert_eq!(l, Language::Cpp);
    }

    #[test]
    fn test_location_layer_id() {
        let loc: Location =
            serde_json::from_str(r#"{"path":"/var/lib/dpkg/status","layerID":"sha256:abc"}"#)
                .unwrap();

        assert_eq!(loc.path, "/var/lib/dpkg/status");
        assert_eq!(loc.layer_id.as_deref(), Some("sha256:abc"));
        assert!(loc.access_path.is_none());
    }

    #[test]
    fn test_package_builder_and_display() {
        let package = Package::new(PackageId::new(4), "log4j-core", "2.14.1", PackageType::JavaArchive)
            .with_language(Language::Java)
            .with_purl("pkg:maven/org.apache.logging.log4j/log4j-core@2.14.1");

        assert_eq!(package.id.value(), 4);
        assert_eq!(package.language, Language::Java);
        assert!(package.metadata.is_none());
        assert_eq!(
            package.to_string(),
            "Pkg(type=java-archive, name=log4j-core, version=2.14.1)"
        );
    }
}
