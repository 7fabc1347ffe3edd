pub mod get_rules_cmd;
pub mod save_rule_cmd;
