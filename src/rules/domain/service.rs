use std::sync::Arc;
use async_trait::async_trait;
use tracing::info;
use crate::core::library::{LibraryError, LibraryResult};
use crate::rules::domain::{PolicySnapshot, RuleService};
use crate::rules::domain::model::{CirculationRuleEntity, rule_key};
use crate::rules::repository::RuleRepository;

pub(crate) struct RuleServiceImpl {
    rule_repository: Arc<dyn RuleRepository>,
}

impl RuleServiceImpl {
    pub(crate) fn new(rule_repository: Arc<dyn RuleRepository>) -> Self {
        Self {
            rule_repository,
        }
    }
}

fn validate(rule: &CirculationRuleEntity) -> LibraryResult<()> {
    if rule.material_type.trim().is_empty() {
        return Err(LibraryError::validation("material type is required", Some("400".to_string())));
    }
    if rule.loan_days <= 0 || rule.max_items <= 0 || rule.fine_per_day.is_sign_negative() {
        return Err(LibraryError::validation(
            format!("invalid limits for rule {}", rule.rule_id).as_str(), Some("400".to_string())));
    }
    Ok(())
}

#[async_trait]
impl RuleService for RuleServiceImpl {
    async fn snapshot(&self) -> LibraryResult<PolicySnapshot> {
        let rules = self.rule_repository.find_all().await?;
        Ok(PolicySnapshot::new(&rules))
    }

    async fn save_rule(&self, rule: &CirculationRuleEntity) -> LibraryResult<CirculationRuleEntity> {
        let mut rule = rule.clone();
        rule.rule_id = rule_key(rule.patron_group, rule.material_type.as_str());
        validate(&rule)?;
        match self.rule_repository.get(rule.rule_id.as_str()).await {
            Ok(existing) => {
                rule.version = existing.version;
                self.rule_repository.update(&rule).await?;
            }
            Err(LibraryError::NotFound { .. }) => {
                rule.version = 0;
                self.rule_repository.create(&rule).await?;
            }
            Err(err) => { return Err(err); }
        }
        info!(rule_id = rule.rule_id.as_str(), loan_days = rule.loan_days,
            fine_per_day = %rule.fine_per_day, "saved circulation rule");
        self.rule_repository.get(rule.rule_id.as_str()).await
    }

    async fn find_rules(&self) -> LibraryResult<Vec<CirculationRuleEntity>> {
        let mut rules = self.rule_repository.find_all().await?;
        rules.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use crate::core::library::{LibraryError, PatronGroup};
    use crate::rules::domain::{RuleResolver, RuleService};
    use crate::rules::domain::model::CirculationRuleEntity;
    use crate::utils::testing::TestContext;

    #[tokio::test]
    async fn test_should_save_and_replace_rule() {
        let ctx = TestContext::new().await;
        let rule_svc = ctx.state.rules.clone();
        let saved = rule_svc.save_rule(&CirculationRuleEntity::new(PatronGroup::Teacher, "DVD", 7, 3, Decimal::new(100, 2)))
            .await.expect("should save rule");
        assert_eq!(0, saved.version);
        let replaced = rule_svc.save_rule(&CirculationRuleEntity::new(PatronGroup::Teacher, "DVD", 10, 3, Decimal::new(75, 2)))
            .await.expect("should replace rule");
        assert_eq!(1, replaced.version);

        let snapshot = rule_svc.snapshot().await.expect("should load snapshot");
        assert_eq!(1, snapshot.len());
        assert_eq!(10, snapshot.resolve(PatronGroup::Teacher, "DVD").loan_days);
        assert_eq!(14, snapshot.resolve(PatronGroup::Student, "DVD").loan_days);
        assert_eq!(1, rule_svc.find_rules().await.expect("should list").len());
    }

    #[tokio::test]
    async fn test_should_reject_invalid_rule() {
        let ctx = TestContext::new().await;
        let res = ctx.state.rules.save_rule(&CirculationRuleEntity::new(PatronGroup::Student, "DVD", 0, 3, Decimal::ONE)).await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
        let res = ctx.state.rules.save_rule(&CirculationRuleEntity::new(PatronGroup::Student, "DVD", 7, 3, Decimal::new(-1, 0))).await;
        assert!(matches!(res, Err(LibraryError::Validation { .. })));
    }
}
