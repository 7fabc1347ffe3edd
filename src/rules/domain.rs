use std::collections::HashMap;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::library::{LibraryResult, PatronGroup};
use crate::rules::domain::model::{CirculationRuleEntity, rule_key};

pub mod model;
pub mod service;

pub(crate) const DEFAULT_LOAN_DAYS: i64 = 14;
pub(crate) const DEFAULT_MAX_ITEMS: i64 = 5;

// CirculationPolicy is the effective policy applied to a loan
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub(crate) struct CirculationPolicy {
    pub loan_days: i64,
    pub fine_per_day: Decimal,
    pub max_items: i64,
}

impl Default for CirculationPolicy {
    fn default() -> Self {
        CirculationPolicy {
            loan_days: DEFAULT_LOAN_DAYS,
            fine_per_day: Decimal::new(50, 2),
            max_items: DEFAULT_MAX_ITEMS,
        }
    }
}

impl From<&CirculationRuleEntity> for CirculationPolicy {
    fn from(rule: &CirculationRuleEntity) -> Self {
        CirculationPolicy {
            loan_days: rule.loan_days,
            fine_per_day: rule.fine_per_day,
            max_items: rule.max_items,
        }
    }
}

// PolicySnapshot is an immutable copy of the rule table taken at the start of an operation.
#[derive(Debug, Clone, Default)]
pub(crate) struct PolicySnapshot {
    rules: HashMap<String, CirculationPolicy>,
    fallback: CirculationPolicy,
}

impl PolicySnapshot {
    pub fn new(rules: &[CirculationRuleEntity]) -> Self {
        PolicySnapshot {
            rules: rules.iter()
                .map(|r| (rule_key(r.patron_group, r.material_type.as_str()), CirculationPolicy::from(r)))
                .collect(),
            fallback: CirculationPolicy::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}

// RuleResolver finds the policy of a (group, material type) pair. It never fails; pairs
// without a rule get the system default.
pub(crate) trait RuleResolver {
    fn resolve(&self, group: PatronGroup, material_type: &str) -> CirculationPolicy;
}

impl RuleResolver for PolicySnapshot {
    fn resolve(&self, group: PatronGroup, material_type: &str) -> CirculationPolicy {
        self.rules.get(rule_key(group, material_type).as_str())
            .copied()
            .unwrap_or(self.fallback)
    }
}

#[async_trait]
pub(crate) trait RuleService: Sync + Send {
    // loads the rule table once per operation
    async fn snapshot(&self) -> LibraryResult<PolicySnapshot>;
    // creates the rule of a (group, material type) pair or replaces its limits
    async fn save_rule(&self, rule: &CirculationRuleEntity) -> LibraryResult<CirculationRuleEntity>;
    async fn find_rules(&self) -> LibraryResult<Vec<CirculationRuleEntity>>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use crate::core::library::PatronGroup;
    use crate::rules::domain::{CirculationPolicy, PolicySnapshot, RuleResolver};
    use crate::rules::domain::model::CirculationRuleEntity;

    #[tokio::test]
    async fn test_should_resolve_exact_match() {
        let snapshot = PolicySnapshot::new(&[
            CirculationRuleEntity::new(PatronGroup::Student, "REGULAR", 14, 5, Decimal::new(50, 2)),
            CirculationRuleEntity::new(PatronGroup::Teacher, "REGULAR", 28, 10, Decimal::new(25, 2)),
        ]);
        let policy = snapshot.resolve(PatronGroup::Teacher, "REGULAR");
        assert_eq!(28, policy.loan_days);
        assert_eq!(Decimal::new(25, 2), policy.fine_per_day);
        assert_eq!(10, policy.max_items);
        assert_eq!(2, snapshot.len());
    }

    #[tokio::test]
    async fn test_should_fall_back_to_default() {
        let snapshot = PolicySnapshot::new(&[
            CirculationRuleEntity::new(PatronGroup::Teacher, "REGULAR", 28, 10, Decimal::new(25, 2)),
        ]);
        let policy = snapshot.resolve(PatronGroup::Student, "REFERENCE");
        assert_eq!(CirculationPolicy::default(), policy);
        assert_eq!(14, policy.loan_days);
        assert_eq!(Decimal::new(50, 2), policy.fine_per_day);
        assert_eq!(CirculationPolicy::default(), PolicySnapshot::default().resolve(PatronGroup::Administrator, ""));
    }
}
