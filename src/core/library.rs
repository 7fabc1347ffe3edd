use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("{message} {reason_code:?} {retryable}")]
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    #[error("{message}")]
    DuplicateKey {
        message: String,
    },
    #[error("{message}")]
    NotFound {
        message: String,
    },
    // The request is well-formed but the current state of the item, patron or loan does not
    // allow it, e.g. blocked patron, wrong item status or a hold owned by another patron.
    #[error("{message} {reason_code:?}")]
    PreconditionFailed {
        message: String,
        reason_code: Option<String>,
    },
    // This is a retry-able error, which indicates that another request changed one of the rows
    // of the unit of work after it was read. The caller can re-read and retry with or without
    // a backoff.
    #[error("{message} {reason_code:?} {retryable}")]
    ConcurrencyConflict {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    #[error("{message} {reason_code:?}")]
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    #[error("{message}")]
    Serialization {
        message: String,
    },
    #[error("{message} {reason_code:?}")]
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl LibraryError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> LibraryError {
        LibraryError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn duplicate_key(message: &str) -> LibraryError {
        LibraryError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> LibraryError {
        LibraryError::NotFound { message: message.to_string() }
    }

    pub fn precondition(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::PreconditionFailed { message: message.to_string(), reason_code }
    }

    pub fn conflict(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::ConcurrencyConflict { message: message.to_string(), reason_code, retryable: true }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> LibraryError {
        if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("ConditionalCheckFailed")
                || reason_val.as_str().contains("TransactionCanceled") {
                return LibraryError::conflict(
                    format!("conditional write rejected {:?}", message).as_str(), reason);
            }
            if reason_val.as_str().contains("404") {
                return LibraryError::not_found(
                    format!("not found error {:?} {:?}", message, reason_val).as_str());
            }
        }
        LibraryError::database(
            format!("ddb database error {:?} {:?}", message, reason).as_str(), reason, retryable)
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> LibraryError {
        LibraryError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> LibraryError {
        LibraryError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn retryable(&self) -> bool {
        match self {
            LibraryError::Database { retryable, .. } => { *retryable }
            LibraryError::DuplicateKey { .. } => { false }
            LibraryError::NotFound { .. } => { false }
            LibraryError::PreconditionFailed { .. } => { false }
            LibraryError::ConcurrencyConflict { retryable, .. } => { *retryable }
            LibraryError::Validation { .. } => { false }
            LibraryError::Serialization { .. } => { false }
            LibraryError::Runtime { .. } => { false }
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, LibraryError::ConcurrencyConflict { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            LibraryError::Database { message, .. } => { message }
            LibraryError::DuplicateKey { message } => { message }
            LibraryError::NotFound { message } => { message }
            LibraryError::PreconditionFailed { message, .. } => { message }
            LibraryError::ConcurrencyConflict { message, .. } => { message }
            LibraryError::Validation { message, .. } => { message }
            LibraryError::Serialization { message } => { message }
            LibraryError::Runtime { message, .. } => { message }
        }
    }

    // short machine readable kind, used in per-barcode failure reports
    pub fn kind(&self) -> &'static str {
        match self {
            LibraryError::Database { .. } => { "DATABASE" }
            LibraryError::DuplicateKey { .. } => { "DUPLICATE_KEY" }
            LibraryError::NotFound { .. } => { "NOT_FOUND" }
            LibraryError::PreconditionFailed { .. } => { "PRECONDITION_FAILED" }
            LibraryError::ConcurrencyConflict { .. } => { "CONCURRENCY_CONFLICT" }
            LibraryError::Validation { .. } => { "VALIDATION" }
            LibraryError::Serialization { .. } => { "SERIALIZATION" }
            LibraryError::Runtime { .. } => { "RUNTIME" }
        }
    }
}

impl From<serde_json::Error> for LibraryError {
    fn from(err: serde_json::Error) -> Self {
        LibraryError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for LibraryError {
    fn from(err: String) -> Self {
        LibraryError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

/// A specialized Result type for the circulation engine.
pub type LibraryResult<T> = Result<T, LibraryError>;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum ItemStatus {
    Available,
    Loaned,
    Lost,
    Processing,
    Held,
}

impl From<String> for ItemStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "AVAILABLE" => ItemStatus::Available,
            "LOANED" => ItemStatus::Loaned,
            "LOST" => ItemStatus::Lost,
            "PROCESSING" => ItemStatus::Processing,
            "HELD" => ItemStatus::Held,
            _ => ItemStatus::Processing,
        }
    }
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ItemStatus::Available => write!(f, "AVAILABLE"),
            ItemStatus::Loaned => write!(f, "LOANED"),
            ItemStatus::Lost => write!(f, "LOST"),
            ItemStatus::Processing => write!(f, "PROCESSING"),
            ItemStatus::Held => write!(f, "HELD"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum PatronGroup {
    Student,
    Teacher,
    Librarian,
    Administrator,
}

impl From<String> for PatronGroup {
    fn from(s: String) -> Self {
        match s.as_str() {
            "STUDENT" => PatronGroup::Student,
            "TEACHER" => PatronGroup::Teacher,
            "LIBRARIAN" => PatronGroup::Librarian,
            "ADMINISTRATOR" => PatronGroup::Administrator,
            _ => PatronGroup::Student,
        }
    }
}

impl Display for PatronGroup {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PatronGroup::Student => write!(f, "STUDENT"),
            PatronGroup::Teacher => write!(f, "TEACHER"),
            PatronGroup::Librarian => write!(f, "LIBRARIAN"),
            PatronGroup::Administrator => write!(f, "ADMINISTRATOR"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum LoanStatus {
    Active,
    Returned,
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            LoanStatus::Active => write!(f, "ACTIVE"),
            LoanStatus::Returned => write!(f, "RETURNED"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum HoldStatus {
    Active,
    Fulfilled,
    Canceled,
    Expired,
}

impl Display for HoldStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            HoldStatus::Active => write!(f, "ACTIVE"),
            HoldStatus::Fulfilled => write!(f, "FULFILLED"),
            HoldStatus::Canceled => write!(f, "CANCELED"),
            HoldStatus::Expired => write!(f, "EXPIRED"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum TransactionKind {
    FinePayment,
    ReplacementPayment,
    FineAssessment,
    ReplacementAssessment,
    DamageAssessment,
    ManualAdjustment,
    Waive,
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TransactionKind::FinePayment => write!(f, "FINE_PAYMENT"),
            TransactionKind::ReplacementPayment => write!(f, "REPLACEMENT_PAYMENT"),
            TransactionKind::FineAssessment => write!(f, "FINE_ASSESSMENT"),
            TransactionKind::ReplacementAssessment => write!(f, "REPLACEMENT_ASSESSMENT"),
            TransactionKind::DamageAssessment => write!(f, "DAMAGE_ASSESSMENT"),
            TransactionKind::ManualAdjustment => write!(f, "MANUAL_ADJUSTMENT"),
            TransactionKind::Waive => write!(f, "WAIVE"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum PaymentMethod {
    Cash,
    System,
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "CASH"),
            PaymentMethod::System => write!(f, "SYSTEM"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::library::{ItemStatus, LibraryError, PatronGroup};

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(LibraryError::not_found("test"), LibraryError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_precondition_error() {
        assert!(matches!(LibraryError::precondition("test", None), LibraryError::PreconditionFailed{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_conflict_error() {
        let err = LibraryError::conflict("test", None);
        assert!(err.is_conflict());
        assert!(err.retryable());
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("TransactionCanceledException".to_string()), false), LibraryError::ConcurrencyConflict{ .. }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("ConditionalCheckFailedException".to_string()), false), LibraryError::ConcurrencyConflict{ .. }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("404".to_string()), false), LibraryError::NotFound{ message: _ }));
        assert!(matches!(LibraryError::database_or_unavailable("test", Some("500".to_string()), true), LibraryError::Database{ retryable: true, .. }));
        assert!(matches!(LibraryError::database_or_unavailable("test", None, false), LibraryError::Database{ retryable: false, .. }));
    }

    #[tokio::test]
    async fn test_should_not_retry_precondition() {
        assert!(!LibraryError::precondition("test", None).retryable());
        assert!(!LibraryError::not_found("test").retryable());
        assert!(!LibraryError::validation("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_format_item_status() {
        let statuses = vec![
            ItemStatus::Available,
            ItemStatus::Loaned,
            ItemStatus::Lost,
            ItemStatus::Processing,
            ItemStatus::Held,
        ];
        for status in statuses {
            assert_eq!(status, ItemStatus::from(status.to_string()));
        }
    }

    #[tokio::test]
    async fn test_should_format_patron_group() {
        let groups = vec![
            PatronGroup::Student,
            PatronGroup::Teacher,
            PatronGroup::Librarian,
            PatronGroup::Administrator,
        ];
        for group in groups {
            assert_eq!(group, PatronGroup::from(group.to_string()));
        }
    }
}
