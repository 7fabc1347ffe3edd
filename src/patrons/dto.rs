use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::PatronGroup;
use crate::patrons::domain::model::PatronEntity;
use crate::patrons::Patron;
use crate::utils::date::serializer;

// PatronDto abstracts library member with the current fine balance.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct PatronDto {
    pub patron_id: String,
    pub version: i64,
    pub full_name: String,
    pub patron_group: PatronGroup,
    pub blocked: bool,
    pub fines: Decimal,
    pub total_paid: Decimal,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl Identifiable for PatronDto {
    fn id(&self) -> String {
        self.patron_id.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl Patron for PatronDto {
    fn group(&self) -> PatronGroup {
        self.patron_group
    }

    fn is_blocked(&self) -> bool {
        self.blocked
    }

    fn balance(&self) -> Decimal {
        self.fines
    }
}

impl From<&PatronEntity> for PatronDto {
    fn from(other: &PatronEntity) -> PatronDto {
        PatronDto {
            patron_id: other.patron_id.to_string(),
            version: other.version,
            full_name: other.full_name.to_string(),
            patron_group: other.patron_group,
            blocked: other.blocked,
            fines: other.fines,
            total_paid: other.total_paid,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&PatronDto> for PatronEntity {
    fn from(other: &PatronDto) -> PatronEntity {
        PatronEntity {
            patron_id: other.patron_id.to_string(),
            version: other.version,
            full_name: other.full_name.to_string(),
            patron_group: other.patron_group,
            blocked: other.blocked,
            fines: other.fines,
            total_paid: other.total_paid,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::library::PatronGroup;
    use crate::patrons::domain::model::PatronEntity;
    use crate::patrons::dto::PatronDto;
    use crate::patrons::Patron;

    #[tokio::test]
    async fn test_should_build_patron_dto() {
        let mut patron = PatronEntity::new("ST-1", "John Doe", PatronGroup::Student, Utc::now().naive_utc());
        patron.blocked = true;
        let dto = PatronDto::from(&patron);
        assert!(dto.is_blocked());
        assert_eq!(PatronGroup::Student, dto.group());
        assert_eq!(patron, PatronEntity::from(&dto));
    }
}
