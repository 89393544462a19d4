use crate::domain::version;
use semver::Version;

/// A repository tag together with its parsed semantic version.
///
/// Tags that do not parse carry `None` and are excluded from every ordering
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub version: Option<Version>,
}

impl Tag {
    /// Build a tag, deriving the semantic version when the name validates
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let version = version::parse(&name).ok();
        Tag { name, version }
    }

    /// True iff the tag name parses as a semantic version
    pub fn is_semver(&self) -> bool {
        self.version.is_some()
    }
}
