use crate::provider::FACE_SCANNING_ANIM;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// Flag names this crate reads.
pub const KNOWN_FLAGS: &[&str] = &[FACE_SCANNING_ANIM];

#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Feature flags by name. Absent flags are disabled.
    #[serde(default)]
    pub flags: BTreeMap<String, bool>,
}

impl Config {
    pub fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.flags
            .keys()
            .filter(|name| !KNOWN_FLAGS.contains(&name.as_str()))
            .map(|name| ConfigIssue::warning(format!("unknown flag '{}' is ignored", name)))
            .collect()
    }
}

/// A non-fatal problem found while validating a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub message: String,
}

impl ConfigIssue {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
