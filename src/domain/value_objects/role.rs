use serde::{Deserialize, Serialize};
use std::fmt;

/// User role ladder. Rank ordering matches the backend's permission table:
/// Tech < Lead < Phone Analyst < Manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Tech,
    Lead,
    PhoneAnalyst,
    Manager,
}

impl Role {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tech" => Some(Role::Tech),
            "lead" => Some(Role::Lead),
            "phone analyst" | "phone_analyst" | "phoneanalyst" => Some(Role::PhoneAnalyst),
            "manager" => Some(Role::Manager),
            _ => None,
        }
    }

    pub fn rank(&self) -> u8 {
        match self {
            Role::Tech => 1,
            Role::Lead => 2,
            Role::PhoneAnalyst => 3,
            Role::Manager => 4,
        }
    }

    pub fn has_minimum(&self, minimum: Role) -> bool {
        self.rank() >= minimum.rank()
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Tech => "Tech",
            Role::Lead => "Lead",
            Role::PhoneAnalyst => "Phone Analyst",
            Role::Manager => "Manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_ordering_matches_hierarchy() {
        assert!(Role::Manager.has_minimum(Role::Lead));
        assert!(Role::PhoneAnalyst.has_minimum(Role::Lead));
        assert!(Role::Lead.has_minimum(Role::Lead));
        assert!(!Role::Tech.has_minimum(Role::Lead));
    }

    #[test]
    fn test_parse_accepts_display_form() {
        assert_eq!(Role::parse("Phone Analyst"), Some(Role::PhoneAnalyst));
        assert_eq!(Role::parse("lead"), Some(Role::Lead));
        assert_eq!(Role::parse("auditor"), None);
    }
}
