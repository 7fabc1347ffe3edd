use crate::core::library::{ItemStatus, LibraryError, LibraryResult};

pub(crate) const ITEM_NOT_AVAILABLE: &str = "ITEM_NOT_AVAILABLE";

// ItemEvent is what the circulation engine does to an item. Administrative moves into
// LOST or PROCESSING are not driven from here.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) enum ItemEvent {
    CheckedOut,
    Returned { holds_waiting: bool },
    ReservationReleased,
}

// transition returns the status the item moves into, or a precondition failure when the
// event is illegal from the current status.
pub(crate) fn transition(from: ItemStatus, event: ItemEvent) -> LibraryResult<ItemStatus> {
    match (from, event) {
        (ItemStatus::Available, ItemEvent::CheckedOut) |
        (ItemStatus::Held, ItemEvent::CheckedOut) => Ok(ItemStatus::Loaned),
        (other, ItemEvent::CheckedOut) => {
            Err(LibraryError::precondition(format!("status {}", other).as_str(),
                                           Some(ITEM_NOT_AVAILABLE.to_string())))
        }
        // a return is accepted from any status so that desynced items are reconciled
        (_, ItemEvent::Returned { holds_waiting: true }) => Ok(ItemStatus::Held),
        (_, ItemEvent::Returned { holds_waiting: false }) => Ok(ItemStatus::Available),
        (ItemStatus::Held, ItemEvent::ReservationReleased) => Ok(ItemStatus::Available),
        (other, ItemEvent::ReservationReleased) => Ok(other),
    }
}

pub(crate) fn can_checkout(status: ItemStatus) -> bool {
    matches!(status, ItemStatus::Available | ItemStatus::Held)
}

#[cfg(test)]
mod tests {
    use crate::core::library::{ItemStatus, LibraryError};
    use crate::items::domain::state::{can_checkout, ItemEvent, transition};

    #[tokio::test]
    async fn test_should_checkout_from_available_or_held() {
        assert_eq!(ItemStatus::Loaned, transition(ItemStatus::Available, ItemEvent::CheckedOut).expect("should loan"));
        assert_eq!(ItemStatus::Loaned, transition(ItemStatus::Held, ItemEvent::CheckedOut).expect("should loan"));
        assert!(can_checkout(ItemStatus::Available));
        assert!(can_checkout(ItemStatus::Held));
    }

    #[tokio::test]
    async fn test_should_reject_checkout_from_other_status() {
        for status in [ItemStatus::Loaned, ItemStatus::Lost, ItemStatus::Processing] {
            let err = transition(status, ItemEvent::CheckedOut).expect_err("should reject");
            assert!(matches!(err, LibraryError::PreconditionFailed { .. }));
            assert_eq!(format!("status {}", status), match err {
                LibraryError::PreconditionFailed { message, .. } => message,
                _ => String::new(),
            });
            assert!(!can_checkout(status));
        }
    }

    #[tokio::test]
    async fn test_should_return_to_held_or_available() {
        assert_eq!(ItemStatus::Held, transition(ItemStatus::Loaned, ItemEvent::Returned { holds_waiting: true }).unwrap());
        assert_eq!(ItemStatus::Available, transition(ItemStatus::Loaned, ItemEvent::Returned { holds_waiting: false }).unwrap());
        // desynced item
        assert_eq!(ItemStatus::Available, transition(ItemStatus::Lost, ItemEvent::Returned { holds_waiting: false }).unwrap());
    }

    #[tokio::test]
    async fn test_should_release_reservation() {
        assert_eq!(ItemStatus::Available, transition(ItemStatus::Held, ItemEvent::ReservationReleased).unwrap());
        assert_eq!(ItemStatus::Loaned, transition(ItemStatus::Loaned, ItemEvent::ReservationReleased).unwrap());
    }
}
