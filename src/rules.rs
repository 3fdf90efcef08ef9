//! Table rules.
//!
//! House-rule switches fixed for the length of a game. They can be loaded
//! from JSON or set one at a time through named options.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Option name for [`TableRules::allow_self_guard`].
pub const OPT_SELF_GUARD: &str = "SelfGuard";
/// Option name for [`TableRules::medium_reveal`].
pub const OPT_MEDIUM_REVEAL: &str = "MediumReveal";
/// Option name for [`TableRules::seed`].
pub const OPT_SEED: &str = "Seed";

/// Rules a table agrees on before dealing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// Whether the guard may protect itself.
    pub allow_self_guard: bool,
    /// Whether a living medium learns the alignment of the previous day's
    /// executed player during the night.
    pub medium_reveal: bool,
    /// Seed for each game's random source. `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for TableRules {
    fn default() -> Self {
        TableRules {
            allow_self_guard: true,
            medium_reveal: true,
            seed: None,
        }
    }
}

impl TableRules {
    /// Parses rules from a JSON object. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Loads rules from a JSON file.
    pub fn load(path: &Path) -> std::result::Result<Self, String> {
        let data = fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
        Self::from_json(&data).map_err(|e| format!("failed to parse {}: {}", path.display(), e))
    }

    /// Applies one named option. Option names are case-insensitive.
    ///
    /// A `Seed` of 0 means entropy, like the simulation CLI.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<()> {
        let invalid = || EngineError::InvalidOptionValue {
            name: name.to_string(),
            value: value.unwrap_or("").to_string(),
        };

        if name.eq_ignore_ascii_case(OPT_SELF_GUARD) {
            self.allow_self_guard = parse_flag(value).ok_or_else(invalid)?;
        } else if name.eq_ignore_ascii_case(OPT_MEDIUM_REVEAL) {
            self.medium_reveal = parse_flag(value).ok_or_else(invalid)?;
        } else if name.eq_ignore_ascii_case(OPT_SEED) {
            let seed: u64 = value.and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
            self.seed = (seed != 0).then_some(seed);
        } else {
            return Err(EngineError::UnknownOption(name.to_string()));
        }
        Ok(())
    }
}

fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value?.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}
