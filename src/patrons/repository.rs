pub mod ddb_patron_repository;
pub mod memory_patron_repository;

use async_trait::async_trait;
use crate::core::library::{LibraryResult, PatronGroup};
use crate::core::repository::Repository;
use crate::patrons::domain::model::PatronEntity;

#[async_trait]
pub(crate) trait PatronRepository: Repository<PatronEntity> {
    async fn find_by_group(&self, group: PatronGroup) -> LibraryResult<Vec<PatronEntity>>;
}
