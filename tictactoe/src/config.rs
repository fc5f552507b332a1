use crate::board::Marks;
use crate::error::Result;
use crate::players::SelectionPolicy;
use serde::{Deserialize, Serialize};

/// Settings for one human-vs-computer match.
///
/// Every field is optional in JSON, so `{}` yields the defaults: human plays X,
/// computer plays O and picks random squares from an entropy-seeded source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub human: Marks,
    pub computer: Marks,
    pub policy: SelectionPolicy,
    /// Fixed seed for the computer's random source.
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            human: Marks::Cross,
            computer: Marks::Nought,
            policy: SelectionPolicy::default(),
            seed: None,
        }
    }
}

impl MatchConfig {
    pub fn new(human: Marks, computer: Marks) -> Self {
        MatchConfig {
            human,
            computer,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_json_gives_defaults() {
        let config = MatchConfig::from_json_str("{}").unwrap();
        assert_eq!(config, MatchConfig::default());
        assert_eq!(config.human, Marks::Cross);
        assert_eq!(config.computer, Marks::Nought);
        assert_eq!(config.policy, SelectionPolicy::RandomEmpty);
    }

    #[test]
    fn json_overrides_fields() {
        let config = MatchConfig::from_json_str(
            r#"{ "human": "O", "computer": "X", "policy": "first_empty", "seed": 9 }"#,
        )
        .unwrap();
        assert_eq!(
            config,
            MatchConfig {
                human: Marks::Nought,
                computer: Marks::Cross,
                policy: SelectionPolicy::FirstEmpty,
                seed: Some(9),
            }
        );
    }

    #[test]
    fn unknown_mark_is_a_config_error() {
        let err = MatchConfig::from_json_str(r#"{ "human": "Z" }"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
