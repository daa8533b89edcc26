use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Release version representation
///
/// Components are plain integers. Signs and leading zeros are accepted on
/// input because the integer parser accepts them; only the canonical form
/// survives a parse/display round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: i64,
    pub minor: i64,
    pub patch: i64,
}

impl Version {
    /// Create a new version
    pub fn new(major: i64, minor: i64, patch: i64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse version from "MAJOR.MINOR.PATCH"
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::VersionFormat(text.to_string()));
        }

        Ok(Version {
            major: parse_component(parts[0])?,
            minor: parse_component(parts[1])?,
            patch: parse_component(parts[2])?,
        })
    }
}

fn parse_component(part: &str) -> Result<i64> {
    part.parse::<i64>()
        .map_err(|source| ReleaseError::VersionComponent {
            component: part.to_string(),
            source,
        })
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
