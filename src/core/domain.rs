use std::env;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable : Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}


// Configuration abstracts config options for the circulation engine
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub(crate) struct Configuration {
    pub branch_id: String,
    // maximum active holds a patron may have across all items
    pub max_holds: usize,
    pub hold_expiry_days: i64,
    // None means renewals are unlimited
    pub max_renewals: Option<i64>,
    // attempts of read-validate-commit before a conflict is reported to the caller
    pub commit_attempts: usize,
    pub retry_backoff_millis: u64,
}

impl Configuration {
    pub fn new(branch_id: &str) -> Self {
        Configuration {
            branch_id: branch_id.to_string(),
            max_holds: 4,
            hold_expiry_days: 10,
            max_renewals: None,
            commit_attempts: 3,
            retry_backoff_millis: 10,
        }
    }

    // overrides defaults from CIRCULATION_* environment variables
    pub fn from_env(branch_id: &str) -> Self {
        let mut config = Configuration::new(branch_id);
        if let Some(max_holds) = env_value("CIRCULATION_MAX_HOLDS") {
            config.max_holds = max_holds;
        }
        if let Some(days) = env_value("CIRCULATION_HOLD_EXPIRY_DAYS") {
            config.hold_expiry_days = days;
        }
        if let Some(max_renewals) = env_value("CIRCULATION_MAX_RENEWALS") {
            config.max_renewals = Some(max_renewals);
        }
        if let Some(attempts) = env_value::<usize>("CIRCULATION_COMMIT_ATTEMPTS") {
            config.commit_attempts = attempts.max(1);
        }
        if let Some(millis) = env_value("CIRCULATION_RETRY_BACKOFF_MILLIS") {
            config.retry_backoff_millis = millis;
        }
        config
    }
}

fn env_value<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use crate::core::domain::Configuration;

    #[tokio::test]
    async fn test_should_build_config() {
        let config = Configuration::new("test");
        assert_eq!(4, config.max_holds);
        assert_eq!(10, config.hold_expiry_days);
        assert_eq!(None, config.max_renewals);
        assert_eq!(3, config.commit_attempts);
    }

    #[tokio::test]
    async fn test_should_build_config_from_env() {
        std::env::set_var("CIRCULATION_MAX_RENEWALS", "2");
        std::env::set_var("CIRCULATION_COMMIT_ATTEMPTS", "0");
        let config = Configuration::from_env("test");
        std::env::remove_var("CIRCULATION_MAX_RENEWALS");
        std::env::remove_var("CIRCULATION_COMMIT_ATTEMPTS");
        assert_eq!(Some(2), config.max_renewals);
        assert_eq!(1, config.commit_attempts);
        assert_eq!(4, config.max_holds);
    }
}
