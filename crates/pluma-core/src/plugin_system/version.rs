use std::fmt;
use std::str::FromStr;

use semver::{Version, VersionReq};

use crate::kernel::constants::CORE_VERSION;

/// Error type for version parsing and compatibility checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Version parse error: {0}")]
    ParseError(String),
    #[error("Version {found} does not satisfy {required}")]
    Incompatible { found: String, required: String },
}

/// Represents a version requirement range using semver constraints.
#[derive(Debug, Clone)]
pub struct VersionRange {
    /// The original constraint string (e.g., "^1.2.3", ">=2.0")
    constraint: String,
    req: VersionReq,
}

impl VersionRange {
    /// Creates a new version range from a constraint string.
    pub fn from_constraint(constraint: &str) -> Result<Self, VersionError> {
        let req = VersionReq::parse(constraint).map_err(|e| {
            VersionError::ParseError(format!("Invalid version constraint '{}': {}", constraint, e))
        })?;
        Ok(Self {
            constraint: constraint.to_string(),
            req,
        })
    }

    /// Range of pluma-core versions whose plugins this build can load.
    pub fn host_compatible() -> Result<Self, VersionError> {
        Self::from_constraint(&format!("^{}", CORE_VERSION))
    }

    /// Checks if a specific `semver::Version` satisfies this range.
    pub fn includes(&self, version: &Version) -> bool {
        self.req.matches(version)
    }

    /// Parses `version` and checks it against this range.
    pub fn check(&self, version: &str) -> Result<(), VersionError> {
        let parsed = Version::parse(version)
            .map_err(|e| VersionError::ParseError(format!("Invalid version '{}': {}", version, e)))?;
        if self.includes(&parsed) {
            Ok(())
        } else {
            Err(VersionError::Incompatible {
                found: version.to_string(),
                required: self.constraint.clone(),
            })
        }
    }

    /// Returns the original constraint string.
    pub fn constraint_string(&self) -> &str {
        &self.constraint
    }
}

/// Implement Display to show the original constraint string.
impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constraint)
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VersionRange::from_constraint(s)
    }
}
