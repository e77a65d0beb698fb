//! Configuration types for the synchronizer
//!
//! All configuration is read once at process start and handed to the
//! components as immutable values; there is no ambient global state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the remote system interprets a rule's `value`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchType {
    /// Exact IP address
    #[serde(rename = "IP")]
    Ip,
    /// CIDR block
    #[serde(rename = "CIDR")]
    Cidr,
    /// URL path
    #[serde(rename = "PATH")]
    Path,
}

impl FromStr for MatchType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "IP" => Ok(MatchType::Ip),
            "CIDR" => Ok(MatchType::Cidr),
            "PATH" => Ok(MatchType::Path),
            other => Err(crate::Error::config(format!(
                "Invalid rule match type '{}'. Valid values: IP, CIDR, PATH",
                other
            ))),
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchType::Ip => "IP",
            MatchType::Cidr => "CIDR",
            MatchType::Path => "PATH",
        };
        f.write_str(s)
    }
}

/// Action taken by the remote system when a rule matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleAction {
    #[serde(rename = "ACCEPT")]
    Accept,
    #[serde(rename = "DROP")]
    Drop,
}

impl FromStr for RuleAction {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCEPT" => Ok(RuleAction::Accept),
            "DROP" => Ok(RuleAction::Drop),
            other => Err(crate::Error::config(format!(
                "Invalid rule action '{}'. Valid values: ACCEPT, DROP",
                other
            ))),
        }
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleAction::Accept => "ACCEPT",
            RuleAction::Drop => "DROP",
        };
        f.write_str(s)
    }
}

/// Identity of the single remote rule this process manages
///
/// The rule is externally owned: the synchronizer only reads it and
/// overwrites its `value`, never creates or deletes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTarget {
    /// Resource the rule is scoped under
    pub resource_id: String,
    /// Rule identifier within the resource
    pub rule_id: i64,
}

impl RuleTarget {
    pub fn new(resource_id: impl Into<String>, rule_id: i64) -> Self {
        Self {
            resource_id: resource_id.into(),
            rule_id,
        }
    }

    /// Validate the target identifiers
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.resource_id.is_empty() {
            return Err(crate::Error::config("Resource ID cannot be empty"));
        }
        Ok(())
    }
}

/// Rule fields re-sent verbatim on every update
///
/// Only `value` changes between updates; these fields come from
/// configuration and are replayed as-is in each full-replace call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSpec {
    pub action: RuleAction,
    pub match_type: MatchType,
    pub priority: i64,
    pub enabled: bool,
}

impl Default for RuleSpec {
    fn default() -> Self {
        Self {
            action: RuleAction::Accept,
            match_type: MatchType::Ip,
            priority: 100,
            enabled: true,
        }
    }
}

/// Trigger listener settings (listener mode only)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerConfig {
    /// Externally visible hostname a trigger request must carry
    pub domain: String,
    /// Request path a trigger request must carry
    pub path: String,
    /// Port to bind on 0.0.0.0
    pub port: u16,
}

impl TriggerConfig {
    /// Validate the listener settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::config("Trigger domain cannot be empty"));
        }
        if !self.path.starts_with('/') {
            return Err(crate::Error::config(format!(
                "Trigger path must start with '/'. Got: {}",
                self.path
            )));
        }
        if self.port == 0 {
            return Err(crate::Error::config("Trigger port cannot be 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_type_parses_all_valid_values() {
        assert_eq!("IP".parse::<MatchType>().unwrap(), MatchType::Ip);
        assert_eq!("CIDR".parse::<MatchType>().unwrap(), MatchType::Cidr);
        assert_eq!("PATH".parse::<MatchType>().unwrap(), MatchType::Path);
    }

    #[test]
    fn match_type_rejects_unknown_value() {
        let err = "FOO".parse::<MatchType>().unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn match_type_is_case_sensitive() {
        // Callers uppercase environment input before parsing
        assert!("ip".parse::<MatchType>().is_err());
    }

    #[test]
    fn rule_action_parses_and_rejects() {
        assert_eq!("ACCEPT".parse::<RuleAction>().unwrap(), RuleAction::Accept);
        assert_eq!("DROP".parse::<RuleAction>().unwrap(), RuleAction::Drop);
        assert!("REJECT".parse::<RuleAction>().is_err());
    }

    #[test]
    fn wire_names_round_trip_through_display() {
        assert_eq!(MatchType::Cidr.to_string(), "CIDR");
        assert_eq!(RuleAction::Accept.to_string(), "ACCEPT");
    }

    #[test]
    fn rule_target_rejects_empty_resource() {
        let target = RuleTarget::new("", 7);
        assert!(target.validate().is_err());
        assert!(RuleTarget::new("res-1", 7).validate().is_ok());
    }

    #[test]
    fn trigger_config_validation() {
        let good = TriggerConfig {
            domain: "trigger.my.dyn.dns.com".to_string(),
            path: "/update".to_string(),
            port: 8080,
        };
        assert!(good.validate().is_ok());

        let mut bad = good.clone();
        bad.path = "update".to_string();
        assert!(bad.validate().is_err());

        let mut bad = good.clone();
        bad.domain = String::new();
        assert!(bad.validate().is_err());

        let mut bad = good;
        bad.port = 0;
        assert!(bad.validate().is_err());
    }
}
