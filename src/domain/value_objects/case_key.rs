use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a record within one collection. Case number for
/// claims, database id for reviewed entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseKey(String);

impl CaseKey {
    pub fn new(value: String) -> Result<Self, String> {
        Self::validate(&value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(value: &str) -> Result<(), String> {
        if value.trim().is_empty() {
            return Err("Case key cannot be empty".to_string());
        }
        Ok(())
    }
}

impl fmt::Display for CaseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<CaseKey> for String {
    fn from(value: CaseKey) -> Self {
        value.0
    }
}
