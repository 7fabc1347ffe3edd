use std::sync::{Arc, Mutex};
use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};

// fixed width so that stored timestamps sort lexically in DynamoDB range keys
pub const DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
pub const PARSE_DATE_FMT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn format_date(date: NaiveDateTime) -> String {
    format!("{}", date.format(DATE_FMT))
}

pub fn parse_date(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, PARSE_DATE_FMT).ok()
}

pub mod serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_date, PARSE_DATE_FMT};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        format_date(*time).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let str_time: String = Deserialize::deserialize(deserializer)?;
        let time = NaiveDateTime::parse_from_str(&str_time, PARSE_DATE_FMT).map_err(D::Error::custom)?;
        Ok(time)
    }
}

pub mod opt_serializer {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde::de::Error;
    use crate::utils::date::{format_date, PARSE_DATE_FMT};

    pub fn serialize<S: Serializer>(time: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error> {
        time.map(format_date).serialize(serializer)
    }

    // empty strings are treated as absent, older records stored them that way
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error> {
        let str_time: Option<String> = Deserialize::deserialize(deserializer)?;
        match str_time {
            Some(s) if !s.is_empty() => {
                let time = NaiveDateTime::parse_from_str(&s, PARSE_DATE_FMT).map_err(D::Error::custom)?;
                Ok(Some(time))
            }
            _ => Ok(None),
        }
    }
}

// Clock abstracts the source of "now" so that due dates and fines can be tested
pub trait Clock: Sync + Send {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

// truncated to the microseconds that DATE_FMT stores
impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().naive_utc().trunc_subsecs(6)
    }
}

// FixedClock returns a settable instant, shared between clones
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut guard) = self.now.lock() {
            *guard += by;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        match self.now.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}
