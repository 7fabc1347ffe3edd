use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use crate::core::domain::Identifiable;
use crate::core::library::ItemStatus;
use crate::items::domain::model::ItemEntity;
use crate::utils::date::serializer;

// ItemDto abstracts a circulating copy as seen by callers of the engine.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub(crate) struct ItemDto {
    pub barcode: String,
    pub version: i64,
    pub title: String,
    pub material_type: String,
    pub item_status: ItemStatus,
    pub loan_count: i64,
    #[serde(with = "serializer")]
    pub created_at: NaiveDateTime,
    #[serde(with = "serializer")]
    pub updated_at: NaiveDateTime,
}

impl Identifiable for ItemDto {
    fn id(&self) -> String {
        self.barcode.to_string()
    }

    fn version(&self) -> i64 {
        self.version
    }
}

impl From<&ItemEntity> for ItemDto {
    fn from(other: &ItemEntity) -> ItemDto {
        ItemDto {
            barcode: other.barcode.to_string(),
            version: other.version,
            title: other.title.to_string(),
            material_type: other.material_type.to_string(),
            item_status: other.item_status,
            loan_count: other.loan_count,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

impl From<&ItemDto> for ItemEntity {
    fn from(other: &ItemDto) -> ItemEntity {
        ItemEntity {
            barcode: other.barcode.to_string(),
            version: other.version,
            title: other.title.to_string(),
            material_type: other.material_type.to_string(),
            item_status: other.item_status,
            loan_count: other.loan_count,
            created_at: other.created_at,
            updated_at: other.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use crate::core::library::ItemStatus;
    use crate::items::domain::model::ItemEntity;
    use crate::items::dto::ItemDto;

    #[tokio::test]
    async fn test_should_build_item_dto() {
        let item = ItemEntity::new("B-1", "Dune", "REGULAR", ItemStatus::Held, Utc::now().naive_utc());
        let dto = ItemDto::from(&item);
        assert_eq!("B-1", dto.barcode.as_str());
        assert_eq!(ItemStatus::Held, dto.item_status);
        assert_eq!(item, ItemEntity::from(&dto));
    }
}
