use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::VersionParseError;

/// Maximum number of dotted components in a version.
pub const MAX_COMPONENTS: usize = 4;

/// Dotted numeric mod version: `major[.minor[.build[.revision]]]`.
///
/// Only the components present in the source text are stored, so `"2.3"`
/// and `"2.3.0"` are distinct versions and display back as written.
///
/// Ordering compares component by component; a missing component sorts
/// before any present one (`1.0 < 1.0.0`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModVersion {
    major: u32,
    // Present components are contiguous: `build` implies `minor`, and
    // `revision` implies `build`.
    minor: Option<u32>,
    build: Option<u32>,
    revision: Option<u32>,
}

impl ModVersion {
    /// A two-component version (`major.minor`).
    pub const fn new(major: u32, minor: u32) -> Self {
        Self {
            major,
            minor: Some(minor),
            build: None,
            revision: None,
        }
    }

    /// Parse dotted version text. Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Result<Self, VersionParseError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(VersionParseError::Empty);
        }

        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() > MAX_COMPONENTS {
            return Err(VersionParseError::TooManyComponents { count: parts.len() });
        }

        let mut components = [None; MAX_COMPONENTS];
        for (index, part) in parts.iter().enumerate() {
            components[index] = Some(parse_component(index, part)?);
        }

        Ok(Self {
            // split() always yields at least one part
            major: components[0].unwrap_or_default(),
            minor: components[1],
            build: components[2],
            revision: components[3],
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> Option<u32> {
        self.minor
    }

    pub fn build(&self) -> Option<u32> {
        self.build
    }

    pub fn revision(&self) -> Option<u32> {
        self.revision
    }

    /// Number of components present (1 to 4).
    pub fn component_count(&self) -> usize {
        1 + [self.minor, self.build, self.revision]
            .iter()
            .take_while(|c| c.is_some())
            .count()
    }

    /// Present components in order.
    pub fn components(&self) -> Vec<u32> {
        std::iter::once(self.major)
            .chain(
                [self.minor, self.build, self.revision]
                    .into_iter()
                    .map_while(|c| c),
            )
            .collect()
    }
}

fn parse_component(index: usize, part: &str) -> Result<u32, VersionParseError> {
    if part.is_empty() {
        return Err(VersionParseError::EmptyComponent { index });
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionParseError::InvalidComponent {
            index,
            component: part.to_string(),
        });
    }
    part.parse::<u32>()
        .map_err(|_| VersionParseError::Overflow {
            index,
            component: part.to_string(),
        })
}

impl FromStr for ModVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ModVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ModVersion> for String {
    fn from(version: ModVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Debug for ModVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModVersion({self})")
    }
}

impl fmt::Display for ModVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.major)?;
        for component in self.components().iter().skip(1) {
            write!(f, ".{component}")?;
        }
        Ok(())
    }
}
