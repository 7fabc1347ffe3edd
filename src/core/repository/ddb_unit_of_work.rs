use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::types::TransactWriteItem;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::{ChangeSet, Mutation, UnitOfWork};
use crate::utils::ddb::{HOLDS_TABLE, ITEMS_TABLE, LOANS_TABLE, new_put, PATRONS_TABLE, TRANSACTIONS_TABLE, versioned_put};

// DynamoDB caps a transaction at 100 actions
const MAX_TRANSACT_ITEMS: usize = 100;

// DDBUnitOfWork commits a change set with TransactWriteItems, every put carries its
// version or not-exists condition.
#[derive(Debug)]
pub(crate) struct DDBUnitOfWork {
    client: Client,
}

impl DDBUnitOfWork {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }
}

pub(crate) fn to_transact_item(mutation: &Mutation) -> LibraryResult<TransactWriteItem> {
    let put = match mutation {
        Mutation::UpdateItem(item) => versioned_put(&ITEMS_TABLE, item)?,
        Mutation::UpdatePatron(patron) => versioned_put(&PATRONS_TABLE, patron)?,
        Mutation::CreateLoan(loan) => new_put(&LOANS_TABLE, loan)?,
        Mutation::UpdateLoan(loan) => versioned_put(&LOANS_TABLE, loan)?,
        Mutation::CreateHold(hold) => new_put(&HOLDS_TABLE, hold)?,
        Mutation::UpdateHold(hold) => versioned_put(&HOLDS_TABLE, hold)?,
        Mutation::AppendTransaction(tx) => new_put(&TRANSACTIONS_TABLE, tx)?,
    };
    Ok(TransactWriteItem::builder().put(put).build())
}

#[async_trait]
impl UnitOfWork for DDBUnitOfWork {
    async fn commit(&self, changes: &ChangeSet) -> LibraryResult<usize> {
        if changes.is_empty() {
            return Ok(0);
        }
        if changes.len() > MAX_TRANSACT_ITEMS {
            return Err(LibraryError::validation(
                format!("unit of work has {} mutations", changes.len()).as_str(), None));
        }
        let items = changes.mutations.iter()
            .map(to_transact_item)
            .collect::<LibraryResult<Vec<TransactWriteItem>>>()?;
        self.client
            .transact_write_items()
            .set_transact_items(Some(items))
            .send()
            .await.map(|_| changes.len()).map_err(LibraryError::from)
    }
}
