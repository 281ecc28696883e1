//! Firewall filtering rule models.

use serde::{Deserialize, Serialize};
use zia_core::ids::RuleId;
use zia_core::{IdNameExtension, QueryParams};

/// What the firewall does with matching traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleAction {
    /// Let the traffic through
    Allow,
    /// Drop silently
    BlockDrop,
    /// Drop and send a TCP reset
    BlockReset,
    /// Drop and send ICMP unreachable
    BlockIcmp,
    /// Evaluate network application rules
    EvalNwapp,
}

/// Whether a rule is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleState {
    /// Rule is evaluated
    #[default]
    Enabled,
    /// Rule is skipped
    Disabled,
}

/// A cloud firewall filtering rule.
///
/// The same shape is sent on create and update; `id` is ignored by the
/// upstream on create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilteringRule {
    /// Rule ID (zero before creation)
    #[serde(default)]
    pub id: i64,
    /// Unique rule name
    pub name: String,
    /// Evaluation order, 1-based
    pub order: i32,
    /// Admin rank (0-7)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
    /// Action applied to matching traffic
    pub action: RuleAction,
    /// Enabled or disabled
    #[serde(default)]
    pub state: RuleState,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Log matching traffic
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_full_logging: Option<bool>,
    /// Built-in rule that cannot be deleted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predefined: Option<bool>,
    /// The catch-all rule at the end of the policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_rule: Option<bool>,
    /// Source IP addresses or ranges
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub src_ips: Vec<String>,
    /// Destination addresses or FQDNs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dest_addresses: Vec<String>,
    /// Destination countries (ISO 3166 codes)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dest_countries: Vec<String>,
    /// Locations the rule applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<IdNameExtension>,
    /// Departments the rule applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub departments: Vec<IdNameExtension>,
    /// Groups the rule applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<IdNameExtension>,
    /// Users the rule applies to
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<IdNameExtension>,
    /// Network services matched by the rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nw_services: Vec<IdNameExtension>,
    /// Network application groups matched by the rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nw_application_groups: Vec<IdNameExtension>,
    /// Labels attached to the rule
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<IdNameExtension>,
    /// Epoch seconds of the last change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<i64>,
    /// Admin who made the last change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<IdNameExtension>,
}

impl FilteringRule {
    /// A new rule with the required fields and nothing else.
    #[must_use]
    pub fn new(name: impl Into<String>, order: i32, action: RuleAction) -> Self {
        Self {
            id: 0,
            name: name.into(),
            order,
            rank: None,
            action,
            state: RuleState::Enabled,
            description: None,
            enable_full_logging: None,
            predefined: None,
            default_rule: None,
            src_ips: Vec::new(),
            dest_addresses: Vec::new(),
            dest_countries: Vec::new(),
            locations: Vec::new(),
            departments: Vec::new(),
            groups: Vec::new(),
            users: Vec::new(),
            nw_services: Vec::new(),
            nw_application_groups: Vec::new(),
            labels: Vec::new(),
            last_modified_time: None,
            last_modified_by: None,
        }
    }

    /// Typed ID of this rule.
    #[must_use]
    pub const fn rule_id(&self) -> RuleId {
        RuleId::new(self.id)
    }
}

/// Query parameters for listing filtering rules.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilteringRuleListParams {
    /// Substring match on the rule name.
    pub search: Option<String>,
}

impl FilteringRuleListParams {
    /// Convert to query parameters (paging keys are added by the client).
    #[must_use]
    pub fn to_query(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push_opt("search", self.search.as_deref());
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rule_serializes_minimal_body() {
        let rule = FilteringRule::new("Block Tor", 3, RuleAction::BlockDrop);
        let value = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": 0,
                "name": "Block Tor",
                "order": 3,
                "action": "BLOCK_DROP",
                "state": "ENABLED"
            })
        );
    }

    #[test]
    fn list_params_skip_empty_search() {
        let params = FilteringRuleListParams {
            search: Some(String::new()),
        };
        assert!(params.to_query().is_empty());

        let params = FilteringRuleListParams {
            search: Some("tor".into()),
        };
        assert_eq!(params.to_query().into_pairs(), vec![("search", "tor".to_string())]);
    }
}
