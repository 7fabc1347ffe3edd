use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::PatronGroup;

// CirculationRuleEntity is the loan policy for one (patron group, material type) pair.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct CirculationRuleEntity {
    pub rule_id: String,
    pub version: i64,
    pub patron_group: PatronGroup,
    pub material_type: String,
    pub loan_days: i64,
    pub max_items: i64,
    pub fine_per_day: Decimal,
}

impl CirculationRuleEntity {
    pub fn new(group: PatronGroup, material_type: &str, loan_days: i64,
               max_items: i64, fine_per_day: Decimal) -> Self {
        Self {
            rule_id: rule_key(group, material_type),
            version: 0,
            patron_group: group,
            material_type: material_type.to_string(),
            loan_days,
            max_items,
            fine_per_day,
        }
    }
}

// rule_key is unique per (group, material type)
pub(crate) fn rule_key(group: PatronGroup, material_type: &str) -> String {
    format!("{}#{}", group, material_type)
}

impl Identifiable for CirculationRuleEntity {
    fn id(&self) -> String {
        self.rule_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use crate::core::library::PatronGroup;
    use crate::rules::domain::model::CirculationRuleEntity;

    #[tokio::test]
    async fn test_should_build_rule() {
        let rule = CirculationRuleEntity::new(PatronGroup::Teacher, "REFERENCE", 3, 2, Decimal::new(100, 2));
        assert_eq!("TEACHER#REFERENCE", rule.rule_id.as_str());
        assert_eq!(3, rule.loan_days);
    }
}
