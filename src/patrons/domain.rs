pub mod model;
pub mod service;

use async_trait::async_trait;
use crate::core::library::{LibraryResult, PatronGroup};
use crate::patrons::dto::PatronDto;

#[async_trait]
pub(crate) trait PatronService: Sync + Send {
    async fn add_patron(&self, patron_id: &str, full_name: &str, group: PatronGroup) -> LibraryResult<PatronDto>;
    // changes name, group and blocked flag; balances only move through the ledger
    async fn update_patron(&self, patron: &PatronDto) -> LibraryResult<PatronDto>;
    async fn find_patron_by_id(&self, id: &str) -> LibraryResult<PatronDto>;
    async fn find_patrons_by_group(&self, group: PatronGroup) -> LibraryResult<Vec<PatronDto>>;
}
