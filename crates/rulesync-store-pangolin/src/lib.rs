// # Pangolin Rule Store
//
// RuleStore implementation against the Pangolin access-control API.
//
// Two single-shot operations, each one HTTP call:
//
// - Fetch: GET `/v1/resource/{resourceId}/rules?limit=1000&offset=0`,
//   scan the listing for the managed rule ID. The page size is large
//   enough to cover all rules of a resource in one call.
// - Update: POST `/v1/resource/{resourceId}/rule/{ruleId}` with the
//   full field set (action, match, value, priority, enabled); only
//   `value` ever differs between calls, so re-sending is idempotent.
//
// Both calls carry `Authorization: Bearer {api_key}` and a bounded
// timeout. The store never retries, never caches, and never decides
// whether an update is needed.
//
// ## Security
//
// The API key never appears in logs; the Debug implementation redacts it.

use async_trait::async_trait;
use rulesync_core::{Error, MatchType, Result, RuleAction, RuleSpec, RuleStore, RuleTarget};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Timeout for rule store API requests
const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);

/// Page size for the rules listing; covers all rules in one call
const RULES_PAGE_LIMIT: u32 = 1000;

/// Pangolin rule store client
pub struct PangolinRuleStore {
    /// API base URL, no trailing slash
    base_url: String,

    /// Bearer token; never logged
    api_key: String,

    /// The one rule this process manages
    target: RuleTarget,

    /// Rule fields replayed verbatim on every update
    rule: RuleSpec,

    /// HTTP client (timeout baked in)
    client: reqwest::Client,
}

impl std::fmt::Debug for PangolinRuleStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PangolinRuleStore")
            .field("base_url", &self.base_url)
            .field("api_key", &"<REDACTED>")
            .field("target", &self.target)
            .field("rule", &self.rule)
            .finish()
    }
}

/// Rules listing envelope: `{ "data": { "rules": [...] } }`
#[derive(Debug, Deserialize)]
struct RulesEnvelope {
    data: RulesPage,
}

#[derive(Debug, Deserialize)]
struct RulesPage {
    rules: Vec<RuleEntry>,
}

/// One entry of the rules listing; extra fields are ignored
#[derive(Debug, Deserialize)]
struct RuleEntry {
    #[serde(rename = "ruleId")]
    rule_id: i64,
    value: String,
}

/// Full-replace payload for the rule update call
#[derive(Debug, Serialize)]
struct UpdateRulePayload<'a> {
    action: RuleAction,
    #[serde(rename = "match")]
    match_type: MatchType,
    value: &'a str,
    priority: i64,
    enabled: bool,
}

impl PangolinRuleStore {
    /// Create a new client
    ///
    /// `base_url` is the API host (e.g. `https://api.pangolin.example:3004`);
    /// a trailing slash is tolerated and stripped.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        target: RuleTarget,
        rule: RuleSpec,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(Error::config("Pangolin API key cannot be empty"));
        }
        target.validate()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(Error::config("Pangolin host cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_API_TIMEOUT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_key,
            target,
            rule,
            client,
        })
    }

    fn rules_url(&self) -> String {
        format!(
            "{}/v1/resource/{}/rules?limit={}&offset=0",
            self.base_url, self.target.resource_id, RULES_PAGE_LIMIT
        )
    }

    fn rule_url(&self) -> String {
        format!(
            "{}/v1/resource/{}/rule/{}",
            self.base_url, self.target.resource_id, self.target.rule_id
        )
    }

    /// Map a non-success status to the error taxonomy
    async fn status_error(operation: &str, response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error response".to_string());

        match status.as_u16() {
            401 | 403 => Error::auth(format!(
                "{} rejected: invalid API key or insufficient permissions ({})",
                operation, status
            )),
            _ => Error::http(format!("{} failed: {} - {}", operation, status, body)),
        }
    }
}

#[async_trait]
impl RuleStore for PangolinRuleStore {
    async fn fetch_value(&self) -> Result<Option<String>> {
        let response = self
            .client
            .get(self.rules_url())
            .bearer_auth(&self.api_key)
            .header("accept", "*/*")
            .send()
            .await
            .map_err(|e| Error::network(format!("Rules listing request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::status_error("Rules listing", response).await);
        }

        let envelope: RulesEnvelope = response
            .json()
            .await
            .map_err(|e| Error::http(format!("Failed to parse rules listing: {}", e)))?;

        debug!("Fetched {} rules", envelope.data.rules.len());

        let value = envelope
            .data
            .rules
            .into_iter()
            .find(|r| r.rule_id == self.target.rule_id)
            .map(|r| r.value);

        if value.is_none() {
            info!("Rule {} not found", self.target.rule_id);
        }

        Ok(value)
    }

    async fn update_value(&self, value: &str) -> Result<()> {
        let payload = UpdateRulePayload {
            action: self.rule.action,
            match_type: self.rule.match_type,
            value,
            priority: self.rule.priority,
            enabled: self.rule.enabled,
        };

        let response = self
            .client
            .post(self.rule_url())
            .bearer_auth(&self.api_key)
            .header("accept", "*/*")
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::network(format!("Rule update request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::status_error("Rule update", response).await);
        }

        info!("Updated rule {} to {}", self.target.rule_id, value);
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "pangolin"
    }
}
