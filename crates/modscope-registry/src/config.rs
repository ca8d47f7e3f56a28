use serde::{Deserialize, Serialize};

/// What the registry does when an identifier is registered again with a
/// different display name or version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Return the first-registered record and log a warning.
    #[default]
    KeepFirst,
    /// Fail with [`RegistryError::Conflict`](crate::RegistryError::Conflict).
    Reject,
}

/// Configuration for a [`ModRegistry`](crate::ModRegistry).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub conflict_policy: ConflictPolicy,
}

impl RegistryConfig {
    /// A registry that treats metadata mismatches as errors.
    pub fn strict() -> Self {
        Self {
            conflict_policy: ConflictPolicy::Reject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_first() {
        assert_eq!(RegistryConfig::default().conflict_policy, ConflictPolicy::KeepFirst);
        assert_eq!(RegistryConfig::strict().conflict_policy, ConflictPolicy::Reject);
    }

    #[test]
    fn deserializes_snake_case_policy() {
        let config: RegistryConfig = toml::from_str("conflict_policy = \"reject\"").unwrap();
        assert_eq!(config.conflict_policy, ConflictPolicy::Reject);

        let config: RegistryConfig = toml::from_str("").unwrap();
        assert_eq!(config, RegistryConfig::default());
    }
}
